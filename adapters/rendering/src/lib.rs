#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for snake autopilot adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_autopilot_core::{Cell, GridSize, PlayState, SearchMethod};
use std::{error::Error, fmt, path::PathBuf, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);
    /// Opaque green used for the snake body.
    pub const GREEN: Self = Self::from_rgb_u8(0, 255, 0);
    /// Opaque red used for the food.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Opaque blue used for button faces.
    pub const BLUE: Self = Self::from_rgb_u8(0, 0, 255);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl ScreenRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// On-screen buttons that drive the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlButton {
    /// Resumes autonomous play.
    Start,
    /// Suspends autonomous play.
    Pause,
    /// Recreates the snake and food.
    Reset,
}

impl ControlButton {
    /// Buttons in left-to-right order.
    pub const ALL: [Self; 3] = [Self::Start, Self::Pause, Self::Reset];

    /// Caption drawn on the button face.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Pause => "Pause",
            Self::Reset => "Reset",
        }
    }
}

/// Describes a clickable button drawn over the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonPresentation {
    /// Action bound to the button.
    pub button: ControlButton,
    /// Clickable region in screen pixels.
    pub rect: ScreenRect,
    /// Fill color of the button face.
    pub fill: Color,
    /// Color of the caption.
    pub label_color: Color,
    /// Caption offset relative to the top-left corner of `rect`.
    pub label_offset: Vec2,
}

impl ButtonPresentation {
    const ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
    const SIZE: Vec2 = Vec2::new(80.0, 30.0);
    const SPACING: f32 = 90.0;

    /// Start, Pause and Reset laid out in a row along the top edge.
    #[must_use]
    pub fn standard_layout() -> Vec<Self> {
        ControlButton::ALL
            .iter()
            .enumerate()
            .map(|(index, &button)| Self {
                button,
                rect: ScreenRect::new(
                    Self::ORIGIN.x + Self::SPACING * index as f32,
                    Self::ORIGIN.y,
                    Self::SIZE.x,
                    Self::SIZE.y,
                ),
                fill: Color::BLUE,
                label_color: Color::WHITE,
                label_offset: Vec2::new(20.0, 5.0),
            })
            .collect()
    }
}

/// Single line of static help text.
#[derive(Clone, Debug, PartialEq)]
pub struct InstructionLine {
    /// Text to display.
    pub text: String,
    /// Top-left corner of the line in screen pixels.
    pub position: Vec2,
}

impl InstructionLine {
    const LINES: [&'static str; 3] = [
        "Press B for BFS",
        "Press D for DFS",
        "Press N for Bidirectional Search",
    ];
    const LEFT: f32 = 10.0;
    const BOTTOM_MARGIN: f32 = 60.0;
    const LINE_HEIGHT: f32 = 20.0;

    /// Search key help anchored to the bottom of a canvas of `canvas_height` pixels.
    #[must_use]
    pub fn standard(canvas_height: f32) -> Vec<Self> {
        Self::LINES
            .iter()
            .enumerate()
            .map(|(index, text)| Self {
                text: (*text).to_owned(),
                position: Vec2::new(
                    Self::LEFT,
                    canvas_height - Self::BOTTOM_MARGIN + Self::LINE_HEIGHT * index as f32,
                ),
            })
            .collect()
    }
}

/// Describes the cell grid and its pixel scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell in pixels.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Pixel length of a cell on the standard canvas.
    pub const STANDARD_CELL_LENGTH: f32 = 20.0;

    /// Creates a new grid descriptor, rejecting non-positive cell lengths.
    pub fn new(grid: GridSize, cell_length: f32) -> Result<Self, RenderingError> {
        if !(cell_length.is_finite() && cell_length > 0.0) {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns: grid.columns(),
            rows: grid.rows(),
            cell_length,
        })
    }

    /// The 30x20 grid drawn on a 600x400 canvas.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            columns: GridSize::STANDARD.columns(),
            rows: GridSize::STANDARD.rows(),
            cell_length: Self::STANDARD_CELL_LENGTH,
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Screen-space rectangle covered by the cell.
    #[must_use]
    pub fn cell_rect(&self, cell: Cell) -> ScreenRect {
        ScreenRect::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
            self.cell_length,
            self.cell_length,
        )
    }
}

/// Tells the backend what to do with the recording around the current frame.
///
/// The default appends the frame and does nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordingCue {
    /// Discard earlier frames before capturing this one.
    pub restart: bool,
    /// Export the recording once this frame is captured.
    pub export: bool,
}

impl RecordingCue {
    /// Keep appending frames.
    pub const CONTINUE: Self = Self {
        restart: false,
        export: false,
    };
}

/// Describes everything drawn in a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Cell grid and its pixel scale.
    pub grid: GridPresentation,
    /// Snake body ordered from head to tail.
    pub snake: Vec<Cell>,
    /// Cell holding the food.
    pub food: Cell,
    /// Fill color of body cells.
    pub snake_color: Color,
    /// Fill color of the food cell.
    pub food_color: Color,
    /// Buttons drawn over the grid.
    pub buttons: Vec<ButtonPresentation>,
    /// Static help text.
    pub instructions: Vec<InstructionLine>,
    /// Color of the help text.
    pub instruction_color: Color,
    /// Lifecycle state of the session.
    pub play_state: PlayState,
    /// Active search label.
    pub search_method: SearchMethod,
    /// Recording directive for the current frame.
    pub recording: RecordingCue,
}

impl Scene {
    /// Creates a scene with the standard buttons and help text.
    #[must_use]
    pub fn new(grid: GridPresentation, snake: Vec<Cell>, food: Cell) -> Self {
        Self {
            grid,
            snake,
            food,
            snake_color: Color::GREEN,
            food_color: Color::RED,
            buttons: ButtonPresentation::standard_layout(),
            instructions: InstructionLine::standard(grid.height()),
            instruction_color: Color::BLACK,
            play_state: PlayState::Paused,
            search_method: SearchMethod::default(),
            recording: RecordingCue::CONTINUE,
        }
    }

    /// Button under the provided screen position, if any.
    #[must_use]
    pub fn button_at(&self, point: Vec2) -> Option<ControlButton> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(point))
            .map(|button| button.button)
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Button clicked during this frame.
    pub button: Option<ControlButton>,
    /// Search label selected from the keyboard during this frame.
    pub search_method: Option<SearchMethod>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Caps the render loop to a fixed number of frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameGovernor {
    budget: Duration,
}

impl FrameGovernor {
    /// Creates a governor for the provided frame rate.
    pub fn new(frames_per_second: u32) -> Result<Self, RenderingError> {
        if frames_per_second == 0 {
            return Err(RenderingError::InvalidFrameRate { frames_per_second });
        }

        Ok(Self {
            budget: Duration::from_secs(1) / frames_per_second,
        })
    }

    /// Wall-clock time allotted to one frame.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left to wait after a frame that took `elapsed`.
    #[must_use]
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.budget.saturating_sub(elapsed)
    }
}

/// Tightly packed RGBA8 pixels read back from the screen, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, four per pixel.
    pub rgba: Vec<u8>,
}

/// Sink that accumulates captured frames and persists them as an animation.
pub trait FrameRecorder {
    /// Discards every recorded frame.
    fn clear(&mut self);

    /// Appends a frame to the recording.
    fn record(&mut self, frame: CapturedFrame) -> AnyResult<()>;

    /// Number of frames recorded so far.
    fn frame_count(&self) -> usize;

    /// Writes the recording, returning the written path or `None` when no frames exist.
    fn export(&mut self) -> AnyResult<Option<PathBuf>>;
}

/// Rendering backend capable of presenting snake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// Each frame the backend gathers input, hands it to `update_scene`
    /// together with the scene, draws the updated scene and feeds the result
    /// to `recorder` according to [`Scene::recording`]. The recording is
    /// exported one final time when the window closes.
    fn run<F, R>(self, presentation: Presentation, recorder: R, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
        R: FrameRecorder + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Frame rate must be positive so each frame has a finite budget.
    InvalidFrameRate {
        /// Provided frame rate that failed validation.
        frames_per_second: u32,
    },
    /// Cell length must be a positive finite number of pixels.
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameRate { frames_per_second } => {
                write!(
                    f,
                    "frames per second must be positive (received {frames_per_second})"
                )
            }
            Self::InvalidCellLength { cell_length } => {
                write!(f, "cell length must be positive (received {cell_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_matches_button_regions() {
        let buttons = ButtonPresentation::standard_layout();

        let regions: Vec<_> = buttons
            .iter()
            .map(|button| (button.button, button.rect))
            .collect();
        assert_eq!(
            regions,
            vec![
                (ControlButton::Start, ScreenRect::new(10.0, 10.0, 80.0, 30.0)),
                (ControlButton::Pause, ScreenRect::new(100.0, 10.0, 80.0, 30.0)),
                (ControlButton::Reset, ScreenRect::new(190.0, 10.0, 80.0, 30.0)),
            ]
        );
    }

    #[test]
    fn button_hit_testing_ignores_gaps_and_grid() {
        let scene = Scene::new(GridPresentation::standard(), vec![Cell::new(15, 10)], Cell::new(1, 1));

        assert_eq!(scene.button_at(Vec2::new(10.0, 10.0)), Some(ControlButton::Start));
        assert_eq!(scene.button_at(Vec2::new(179.0, 39.0)), Some(ControlButton::Pause));
        assert_eq!(scene.button_at(Vec2::new(200.0, 25.0)), Some(ControlButton::Reset));
        assert_eq!(scene.button_at(Vec2::new(95.0, 20.0)), None);
        assert_eq!(scene.button_at(Vec2::new(90.0, 20.0)), None);
        assert_eq!(scene.button_at(Vec2::new(50.0, 40.0)), None);
        assert_eq!(scene.button_at(Vec2::new(300.0, 200.0)), None);
    }

    #[test]
    fn instructions_stack_from_bottom_margin() {
        let lines = InstructionLine::standard(400.0);

        let positions: Vec<_> = lines.iter().map(|line| line.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(10.0, 340.0),
                Vec2::new(10.0, 360.0),
                Vec2::new(10.0, 380.0),
            ]
        );
        assert_eq!(lines[2].text, "Press N for Bidirectional Search");
    }

    #[test]
    fn standard_grid_fills_canvas() {
        let grid = GridPresentation::standard();

        assert_eq!(grid.width(), 600.0);
        assert_eq!(grid.height(), 400.0);
        assert_eq!(
            grid.cell_rect(Cell::new(15, 10)),
            ScreenRect::new(300.0, 200.0, 20.0, 20.0)
        );
    }

    #[test]
    fn grid_creation_rejects_invalid_cell_length() {
        let error = GridPresentation::new(GridSize::STANDARD, 0.0)
            .expect_err("zero cell length must be rejected");
        assert_eq!(error, RenderingError::InvalidCellLength { cell_length: 0.0 });

        assert!(GridPresentation::new(GridSize::STANDARD, f32::NAN).is_err());
        assert!(GridPresentation::new(GridSize::STANDARD, f32::INFINITY).is_err());
        assert!(GridPresentation::new(GridSize::STANDARD, -4.0).is_err());
        assert_eq!(
            GridPresentation::new(GridSize::STANDARD, 20.0),
            Ok(GridPresentation::standard())
        );
    }

    #[test]
    fn governor_budgets_fixed_frame_rate() {
        let governor = FrameGovernor::new(10).expect("positive frame rate");

        assert_eq!(governor.budget(), Duration::from_millis(100));
        assert_eq!(
            governor.remaining(Duration::from_millis(30)),
            Duration::from_millis(70)
        );
        assert_eq!(governor.remaining(Duration::from_millis(250)), Duration::ZERO);
    }

    #[test]
    fn governor_rejects_zero_frame_rate() {
        let error = FrameGovernor::new(0).expect_err("zero frame rate must be rejected");
        assert_eq!(error.to_string(), "frames per second must be positive (received 0)");
    }

    #[test]
    fn palette_matches_byte_channels() {
        assert_eq!(Color::GREEN, Color::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(Color::WHITE, Color::from_rgb_u8(255, 255, 255));
    }

    #[test]
    fn new_scene_starts_paused_with_continue_cue() {
        let scene = Scene::new(GridPresentation::standard(), vec![Cell::new(15, 10)], Cell::new(1, 1));

        assert_eq!(scene.play_state, PlayState::Paused);
        assert_eq!(scene.recording, RecordingCue::CONTINUE);
        assert_eq!(scene.buttons.len(), 3);
        assert_eq!(scene.instructions.len(), 3);
    }
}
