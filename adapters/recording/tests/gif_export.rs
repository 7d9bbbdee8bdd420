use std::{fs::File, io::BufReader, path::PathBuf, time::Duration};

use image::{codecs::gif::GifDecoder, AnimationDecoder};
use snake_autopilot_recording::GifRecorder;
use snake_autopilot_rendering::{CapturedFrame, FrameRecorder};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("snake-autopilot-{}-{name}.gif", std::process::id()))
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> CapturedFrame {
    CapturedFrame {
        width,
        height,
        rgba: rgba.repeat((width * height) as usize),
    }
}

fn decode(path: &PathBuf) -> Vec<image::Frame> {
    let file = File::open(path).expect("exported file exists");
    GifDecoder::new(BufReader::new(file))
        .expect("valid gif header")
        .into_frames()
        .collect_frames()
        .expect("frames decode")
}

#[test]
fn export_writes_every_frame_in_order() {
    let path = scratch_path("ordered");
    let mut recorder = GifRecorder::new(&path);
    for color in [[0, 255, 0, 255], [255, 0, 0, 255], [0, 0, 255, 255]] {
        recorder.record(solid(6, 4, color)).expect("valid frame");
    }

    let written = recorder.export().expect("export succeeds");
    assert_eq!(written.as_deref(), Some(path.as_path()));

    let frames = decode(&path);
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.buffer().dimensions(), (6, 4));
        assert_eq!(Duration::from(frame.delay()), Duration::from_millis(100));
    }
    assert!(frames[0].buffer().get_pixel(0, 0)[1] > 200);
    assert!(frames[1].buffer().get_pixel(0, 0)[0] > 200);
    assert!(frames[2].buffer().get_pixel(5, 3)[2] > 200);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn cleared_recording_only_exports_later_frames() {
    let path = scratch_path("restart");
    let mut recorder = GifRecorder::new(&path).with_frame_delay(Duration::from_millis(50));
    recorder
        .record(solid(2, 2, [255, 255, 255, 255]))
        .expect("valid frame");
    recorder.clear();
    recorder
        .record(solid(2, 2, [0, 0, 0, 255]))
        .expect("valid frame");

    let _ = recorder.export().expect("export succeeds");

    let frames = decode(&path);
    assert_eq!(frames.len(), 1);
    assert_eq!(Duration::from(frames[0].delay()), Duration::from_millis(50));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn export_into_missing_directory_fails() {
    let path = std::env::temp_dir()
        .join(format!("snake-autopilot-missing-{}", std::process::id()))
        .join("out.gif");
    let mut recorder = GifRecorder::new(&path);
    recorder
        .record(solid(1, 1, [0, 0, 0, 255]))
        .expect("valid frame");

    let error = recorder.export().expect_err("missing directory must fail");

    assert!(error.to_string().starts_with("failed to create"));
}
