#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Animated GIF recorder for captured snake frames.

use anyhow::Result as AnyResult;
use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame, RgbaImage,
};
use log::info;
use snake_autopilot_rendering::{CapturedFrame, FrameRecorder};
use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// File name used when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "snake_game.gif";

/// Display time of a single frame.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Quantizer speed handed to the GIF encoder, from 1 (best) to 30 (fastest).
const ENCODER_SPEED: i32 = 10;

/// Failures raised while accumulating or writing a recording.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The output file could not be created.
    #[error("failed to create {}", path.display())]
    Io {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The GIF encoder rejected a frame.
    #[error("failed to encode animation")]
    Encode(#[from] image::ImageError),
    /// A frame's dimensions differ from the first recorded frame.
    #[error("frame is {found_width}x{found_height} but the recording is {expected_width}x{expected_height}")]
    FrameSize {
        /// Width of the first recorded frame.
        expected_width: u32,
        /// Height of the first recorded frame.
        expected_height: u32,
        /// Width of the rejected frame.
        found_width: u32,
        /// Height of the rejected frame.
        found_height: u32,
    },
    /// The pixel buffer does not hold four bytes for every pixel.
    #[error("{width}x{height} frame carries {bytes} bytes")]
    MalformedFrame {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual buffer length.
        bytes: usize,
    },
}

/// Keeps every captured frame in memory and writes them as a looping GIF.
#[derive(Debug)]
pub struct GifRecorder {
    path: PathBuf,
    frame_delay: Duration,
    frames: Vec<CapturedFrame>,
}

impl Default for GifRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT)
    }
}

impl GifRecorder {
    /// Creates a recorder that writes to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame_delay: DEFAULT_FRAME_DELAY,
            frames: Vec::new(),
        }
    }

    /// Overrides how long each frame is shown.
    #[must_use]
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// Destination of the exported animation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and stores a frame.
    pub fn push(&mut self, frame: CapturedFrame) -> Result<(), RecordingError> {
        let expected_len = frame.width as usize * frame.height as usize * 4;
        if frame.rgba.len() != expected_len {
            return Err(RecordingError::MalformedFrame {
                width: frame.width,
                height: frame.height,
                bytes: frame.rgba.len(),
            });
        }

        if let Some(first) = self.frames.first() {
            if (first.width, first.height) != (frame.width, frame.height) {
                return Err(RecordingError::FrameSize {
                    expected_width: first.width,
                    expected_height: first.height,
                    found_width: frame.width,
                    found_height: frame.height,
                });
            }
        }

        self.frames.push(frame);
        Ok(())
    }

    /// Encodes all stored frames, returning `None` without touching the
    /// file system when nothing was recorded.
    pub fn write(&self) -> Result<Option<PathBuf>, RecordingError> {
        if self.frames.is_empty() {
            return Ok(None);
        }

        let file = File::create(&self.path).map_err(|source| RecordingError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), ENCODER_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;

        let delay = Delay::from_numer_denom_ms(self.frame_delay.as_millis() as u32, 1);
        for captured in &self.frames {
            let image = RgbaImage::from_raw(captured.width, captured.height, captured.rgba.clone())
                .ok_or(RecordingError::MalformedFrame {
                    width: captured.width,
                    height: captured.height,
                    bytes: captured.rgba.len(),
                })?;
            encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
        }

        info!(
            "saved {} frames to {}",
            self.frames.len(),
            self.path.display()
        );
        Ok(Some(self.path.clone()))
    }
}

impl FrameRecorder for GifRecorder {
    fn clear(&mut self) {
        self.frames.clear();
    }

    fn record(&mut self, frame: CapturedFrame) -> AnyResult<()> {
        Ok(self.push(frame)?)
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn export(&mut self) -> AnyResult<Option<PathBuf>> {
        Ok(self.write()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> CapturedFrame {
        CapturedFrame {
            width,
            height,
            rgba: rgba.repeat((width * height) as usize),
        }
    }

    #[test]
    fn empty_recording_exports_nothing() {
        let path = std::env::temp_dir().join("snake-autopilot-never-written.gif");
        let mut recorder = GifRecorder::new(&path);

        assert_eq!(recorder.export().expect("empty export succeeds"), None);
        assert!(!path.exists());
    }

    #[test]
    fn clear_discards_frames() {
        let mut recorder = GifRecorder::default();
        recorder
            .record(solid(2, 2, [0, 255, 0, 255]))
            .expect("valid frame");
        recorder
            .record(solid(2, 2, [255, 0, 0, 255]))
            .expect("valid frame");
        assert_eq!(recorder.frame_count(), 2);

        recorder.clear();

        assert_eq!(recorder.frame_count(), 0);
        assert_eq!(recorder.path(), Path::new(DEFAULT_OUTPUT));
    }

    #[test]
    fn mismatched_frame_size_is_rejected() {
        let mut recorder = GifRecorder::default();
        recorder
            .push(solid(4, 2, [0, 0, 0, 255]))
            .expect("valid frame");

        let error = recorder
            .push(solid(2, 4, [0, 0, 0, 255]))
            .expect_err("size change must be rejected");

        assert!(matches!(
            error,
            RecordingError::FrameSize {
                expected_width: 4,
                expected_height: 2,
                found_width: 2,
                found_height: 4,
            }
        ));
        assert_eq!(recorder.frame_count(), 1);
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let mut recorder = GifRecorder::default();

        let error = recorder
            .push(CapturedFrame {
                width: 3,
                height: 3,
                rgba: vec![0; 10],
            })
            .expect_err("short buffer must be rejected");

        assert_eq!(error.to_string(), "3x3 frame carries 10 bytes");
    }
}
