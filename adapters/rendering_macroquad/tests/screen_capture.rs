use snake_autopilot_rendering_macroquad::captured_frame_from_bottom_up;

fn pixel(value: u8) -> [u8; 4] {
    [value, value, value, 255]
}

#[test]
fn rows_are_reordered_top_first() {
    let bottom_up: Vec<u8> = [pixel(1), pixel(2), pixel(3), pixel(4), pixel(5), pixel(6)]
        .concat();

    let frame = captured_frame_from_bottom_up(2, 3, &bottom_up);

    let expected: Vec<u8> = [pixel(5), pixel(6), pixel(3), pixel(4), pixel(1), pixel(2)].concat();
    assert_eq!(frame.width, 2);
    assert_eq!(frame.height, 3);
    assert_eq!(frame.rgba, expected);
}

#[test]
fn short_buffers_are_padded_to_full_frame() {
    let bottom_up: Vec<u8> = pixel(9).to_vec();

    let frame = captured_frame_from_bottom_up(1, 2, &bottom_up);

    assert_eq!(frame.rgba.len(), 8);
    assert_eq!(&frame.rgba[..4], &[0, 0, 0, 0]);
    assert_eq!(&frame.rgba[4..], &pixel(9));
}
