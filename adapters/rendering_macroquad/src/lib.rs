#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the snake autopilot.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! The dependency is therefore declared without default features.
//!
//! Every frame the adapter polls input, lets the caller update the scene,
//! draws it, reads the framebuffer back and hands the pixels to a
//! [`FrameRecorder`]. Closing the window exports the recording first.

use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, log, Level};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use snake_autopilot_core::SearchMethod;
use snake_autopilot_rendering::{
    CapturedFrame, Color, FrameGovernor, FrameInput, FrameRecorder, Presentation, RenderingBackend,
    Scene,
};
use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

const FONT_SIZE: f32 = 24.0;

/// Level of the once-per-second frame rate line emitted when FPS reporting is on.
pub const FPS_LOG_LEVEL: Level = Level::Debug;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardShortcuts {
    /// `Escape` closes the window.
    pub quit_requested: bool,
    /// `B` selects breadth-first search.
    pub breadth_first: bool,
    /// `D` selects the depth-first label.
    pub depth_first: bool,
    /// `N` selects the bidirectional label.
    pub bidirectional: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            breadth_first: is_key_pressed(KeyCode::B),
            depth_first: is_key_pressed(KeyCode::D),
            bidirectional: is_key_pressed(KeyCode::N),
        }
    }

    /// Search label requested this frame, preferring `B` over `D` over `N`.
    #[must_use]
    pub fn search_method(&self) -> Option<SearchMethod> {
        if self.breadth_first {
            Some(SearchMethod::BreadthFirst)
        } else if self.depth_first {
            Some(SearchMethod::DepthFirst)
        } else if self.bidirectional {
            Some(SearchMethod::Bidirectional)
        } else {
            None
        }
    }
}

/// Translates raw observations into the adapter-agnostic frame input.
///
/// A click counts only when it lands inside one of the scene's buttons.
#[must_use]
pub fn frame_input_from_observations(
    scene: &Scene,
    cursor: Vec2,
    left_click: bool,
    shortcuts: KeyboardShortcuts,
) -> FrameInput {
    FrameInput {
        button: if left_click {
            scene.button_at(cursor)
        } else {
            None
        },
        search_method: shortcuts.search_method(),
    }
}

/// Converts a framebuffer read back bottom row first into a top-down [`CapturedFrame`].
///
/// Missing trailing bytes are padded with transparent black so the frame
/// always holds `width * height` pixels.
#[doc(hidden)]
#[must_use]
pub fn captured_frame_from_bottom_up(width: u32, height: u32, bytes: &[u8]) -> CapturedFrame {
    let stride = width as usize * 4;
    let mut rgba = Vec::with_capacity(stride * height as usize);

    for row in (0..height as usize).rev() {
        let start = (row * stride).min(bytes.len());
        let end = (start + stride).min(bytes.len());
        rgba.extend_from_slice(&bytes[start..end]);
        rgba.resize(rgba.len() + stride - (end - start), 0);
    }

    CapturedFrame {
        width,
        height,
        rgba,
    }
}

/// Baseline for text whose top edge sits at `top`.
fn text_baseline(top: f32) -> f32 {
    top + FONT_SIZE * 0.75
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    governor: Option<FrameGovernor>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that renders as often as the platform presents frames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Caps the render loop using the provided governor.
    #[must_use]
    pub fn with_frame_governor(mut self, governor: FrameGovernor) -> Self {
        self.governor = Some(governor);
        self
    }

    /// Configures whether the backend logs frame rate measurements once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a frame and returns the average rate once a full second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F, R>(self, presentation: Presentation, recorder: R, update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
        R: FrameRecorder + 'static,
    {
        let Self {
            swap_interval,
            governor,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.grid.width() as i32,
            window_height: scene.grid.height() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (exit_sender, exit_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let outcome = drive(
                scene,
                clear_color,
                governor,
                show_fps,
                recorder,
                update_scene,
            )
            .await;
            let _ = exit_sender.send(outcome);
        });

        exit_receiver.recv().unwrap_or_else(|_| Ok(()))
    }
}

async fn drive<F, R>(
    mut scene: Scene,
    clear_color: Color,
    governor: Option<FrameGovernor>,
    show_fps: bool,
    mut recorder: R,
    mut update_scene: F,
) -> Result<()>
where
    F: FnMut(FrameInput, &mut Scene),
    R: FrameRecorder,
{
    macroquad::input::prevent_quit();

    let background = to_macroquad_color(clear_color);
    let mut fps_counter = FpsCounter::default();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let shortcuts = KeyboardShortcuts::poll();
        if shortcuts.quit_requested || macroquad::input::is_quit_requested() {
            export_recording(&mut recorder)?;
            break;
        }

        let (cursor_x, cursor_y) = mouse_position();
        let input = frame_input_from_observations(
            &scene,
            Vec2::new(cursor_x, cursor_y),
            is_mouse_button_pressed(MouseButton::Left),
            shortcuts,
        );
        update_scene(input, &mut scene);

        if scene.recording.restart {
            recorder.clear();
        }

        macroquad::window::clear_background(background);
        draw_scene(&scene);

        recorder
            .record(capture_screen())
            .context("failed to record frame")?;
        if scene.recording.export {
            export_recording(&mut recorder)?;
        }

        if let Some(governor) = governor {
            let remaining = governor.remaining(frame_start.elapsed());
            if !remaining.is_zero() {
                thread::sleep(remaining);
            }
        }

        let now = Instant::now();
        if let Some(per_second) = fps_counter.record_frame(now - last_frame) {
            if show_fps {
                log!(
                    FPS_LOG_LEVEL,
                    "FPS: {per_second:.2} ({} frames captured)",
                    recorder.frame_count()
                );
            }
        }
        last_frame = now;

        macroquad::window::next_frame().await;
    }

    Ok(())
}

fn export_recording<R: FrameRecorder>(recorder: &mut R) -> Result<()> {
    let frames = recorder.frame_count();
    if let Some(path) = recorder.export().context("failed to export recording")? {
        debug!("exported {frames} frames to {}", path.display());
    }
    Ok(())
}

fn capture_screen() -> CapturedFrame {
    let image = macroquad::texture::get_screen_data();
    captured_frame_from_bottom_up(image.width() as u32, image.height() as u32, &image.bytes)
}

fn draw_scene(scene: &Scene) {
    let snake_color = to_macroquad_color(scene.snake_color);
    for &cell in &scene.snake {
        let rect = scene.grid.cell_rect(cell);
        macroquad::shapes::draw_rectangle(rect.x, rect.y, rect.width, rect.height, snake_color);
    }

    let food = scene.grid.cell_rect(scene.food);
    macroquad::shapes::draw_rectangle(
        food.x,
        food.y,
        food.width,
        food.height,
        to_macroquad_color(scene.food_color),
    );

    for button in &scene.buttons {
        let rect = button.rect;
        macroquad::shapes::draw_rectangle(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            to_macroquad_color(button.fill),
        );
        let _ = macroquad::text::draw_text(
            button.button.label(),
            rect.x + button.label_offset.x,
            text_baseline(rect.y + button.label_offset.y),
            FONT_SIZE,
            to_macroquad_color(button.label_color),
        );
    }

    let instruction_color = to_macroquad_color(scene.instruction_color);
    for line in &scene.instructions {
        let _ = macroquad::text::draw_text(
            &line.text,
            line.position.x,
            text_baseline(line.position.y),
            FONT_SIZE,
            instruction_color,
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_autopilot_core::Cell;
    use snake_autopilot_rendering::{ControlButton, GridPresentation};

    fn scene() -> Scene {
        Scene::new(
            GridPresentation::standard(),
            vec![Cell::new(15, 10)],
            Cell::new(3, 3),
        )
    }

    #[test]
    fn click_inside_button_selects_it() {
        let input = frame_input_from_observations(
            &scene(),
            Vec2::new(120.0, 20.0),
            true,
            KeyboardShortcuts::default(),
        );

        assert_eq!(input.button, Some(ControlButton::Pause));
        assert_eq!(input.search_method, None);
    }

    #[test]
    fn hovering_without_click_selects_nothing() {
        let input = frame_input_from_observations(
            &scene(),
            Vec2::new(120.0, 20.0),
            false,
            KeyboardShortcuts::default(),
        );

        assert_eq!(input, FrameInput::default());
    }

    #[test]
    fn click_on_grid_is_ignored() {
        let input = frame_input_from_observations(
            &scene(),
            Vec2::new(300.0, 200.0),
            true,
            KeyboardShortcuts::default(),
        );

        assert_eq!(input.button, None);
    }

    #[test]
    fn search_shortcuts_map_to_labels() {
        let shortcuts = KeyboardShortcuts {
            bidirectional: true,
            ..KeyboardShortcuts::default()
        };
        assert_eq!(shortcuts.search_method(), Some(SearchMethod::Bidirectional));

        let shortcuts = KeyboardShortcuts {
            depth_first: true,
            bidirectional: true,
            ..KeyboardShortcuts::default()
        };
        assert_eq!(shortcuts.search_method(), Some(SearchMethod::DepthFirst));

        let shortcuts = KeyboardShortcuts {
            breadth_first: true,
            depth_first: true,
            ..KeyboardShortcuts::default()
        };
        assert_eq!(shortcuts.search_method(), Some(SearchMethod::BreadthFirst));
        assert_eq!(KeyboardShortcuts::default().search_method(), None);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();

        for _ in 0..9 {
            assert_eq!(counter.record_frame(Duration::from_millis(100)), None);
        }
        let rate = counter
            .record_frame(Duration::from_millis(100))
            .expect("a full second elapsed");
        assert!((rate - 10.0).abs() < 1e-3);
        assert_eq!(counter.record_frame(Duration::from_millis(100)), None);
    }

    #[test]
    fn text_baseline_sits_below_top_edge() {
        assert_eq!(text_baseline(15.0), 33.0);
    }
}
