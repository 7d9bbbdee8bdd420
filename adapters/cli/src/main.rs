#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the snake autopilot window.

mod settings;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use snake_autopilot_core::{FoodPolicy, TailPolicy, WINDOW_TITLE};
use snake_autopilot_recording::GifRecorder;
use snake_autopilot_rendering::{Color, FrameGovernor, Presentation, RenderingBackend};
use snake_autopilot_rendering_macroquad::MacroquadBackend;

use crate::{
    settings::{Overrides, Settings},
    simulation::Simulation,
};

/// Command-line arguments accepted by the snake autopilot.
#[derive(Debug, Parser)]
#[command(name = "snake-autopilot")]
#[command(version, about = "Snake steered by breadth-first search, recorded as a GIF")]
struct CliArgs {
    /// TOML settings file; command-line flags take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where the recorded GIF is written.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation ticks per second.
    #[arg(long, value_name = "N")]
    ticks_per_second: Option<u32>,

    /// Whether the tail cell blocks route search.
    #[arg(long, value_enum)]
    tail_policy: Option<TailPolicyArg>,

    /// How new food cells are chosen.
    #[arg(long, value_enum)]
    food_policy: Option<FoodPolicyArg>,

    /// Log debug output, including frame rate measurements.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TailPolicyArg {
    Blocked,
    Vacates,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FoodPolicyArg {
    Uniform,
    AvoidSnake,
}

impl From<TailPolicyArg> for TailPolicy {
    fn from(value: TailPolicyArg) -> Self {
        match value {
            TailPolicyArg::Blocked => Self::Blocked,
            TailPolicyArg::Vacates => Self::Vacates,
        }
    }
}

impl From<FoodPolicyArg> for FoodPolicy {
    fn from(value: FoodPolicyArg) -> Self {
        match value {
            FoodPolicyArg::Uniform => Self::Uniform,
            FoodPolicyArg::AvoidSnake => Self::AvoidSnake,
        }
    }
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            output: self.output.clone(),
            seed: self.seed,
            ticks_per_second: self.ticks_per_second,
            tail_policy: self.tail_policy.map(TailPolicy::from),
            food_policy: self.food_policy.map(FoodPolicy::from),
        }
    }
}

/// Entry point for the snake autopilot command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose)?;

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_overrides(args.overrides());
    settings.validate()?;

    let governor =
        FrameGovernor::new(settings.ticks_per_second).context("invalid tick rate")?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(
        "starting session with seed {seed} at {} ticks per second, recording to {}",
        settings.ticks_per_second,
        settings.output.display()
    );

    let mut simulation = Simulation::new(&settings, seed);
    let presentation = Presentation::new(WINDOW_TITLE, Color::WHITE, simulation.initial_scene());
    let recorder = GifRecorder::new(settings.output.clone());

    MacroquadBackend::new()
        .with_frame_governor(governor)
        .with_show_fps(args.verbose)
        .run(presentation, recorder, move |input, scene| {
            simulation.update(input, scene);
        })
}

fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("snake_autopilot")
        .build();

    TermLogger::init(log_level(verbose), config, TerminalMode::Mixed, ColorChoice::Auto)
        .context("failed to install terminal logger")
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_autopilot_rendering_macroquad::FPS_LOG_LEVEL;

    #[test]
    fn flags_map_onto_overrides() {
        let args = CliArgs::parse_from([
            "snake-autopilot",
            "--output",
            "run.gif",
            "--seed",
            "42",
            "--ticks-per-second",
            "15",
            "--tail-policy",
            "vacates",
            "--food-policy",
            "avoid-snake",
        ]);

        assert_eq!(
            args.overrides(),
            Overrides {
                output: Some(PathBuf::from("run.gif")),
                seed: Some(42),
                ticks_per_second: Some(15),
                tail_policy: Some(TailPolicy::Vacates),
                food_policy: Some(FoodPolicy::AvoidSnake),
            }
        );
        assert!(!args.verbose);
    }

    #[test]
    fn no_flags_leave_settings_untouched() {
        let args = CliArgs::parse_from(["snake-autopilot"]);

        assert_eq!(args.overrides(), Overrides::default());
        assert_eq!(args.config, None);
    }

    #[test]
    fn verbose_level_admits_frame_rate_line() {
        assert!(FPS_LOG_LEVEL <= log_level(true));
        assert!(FPS_LOG_LEVEL > log_level(false));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(CliArgs::try_parse_from(["snake-autopilot", "--tail-policy", "maybe"]).is_err());
    }
}
