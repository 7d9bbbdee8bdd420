use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use snake_autopilot_core::{FoodPolicy, TailPolicy};
use snake_autopilot_recording::DEFAULT_OUTPUT;

/// Session parameters read from an optional TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Destination of the exported GIF.
    pub(crate) output: PathBuf,
    /// Seed for food placement; drawn at random when absent.
    pub(crate) seed: Option<u64>,
    /// Simulation ticks, and rendered frames, per second.
    pub(crate) ticks_per_second: u32,
    /// Whether the tail cell blocks route search.
    pub(crate) tail_policy: TailPolicy,
    /// How new food cells are drawn.
    pub(crate) food_policy: FoodPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
            ticks_per_second: 10,
            tail_policy: TailPolicy::Blocked,
            food_policy: FoodPolicy::AvoidSnake,
        }
    }
}

/// Values supplied on the command line, each replacing its file counterpart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) output: Option<PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) ticks_per_second: Option<u32>,
    pub(crate) tail_policy: Option<TailPolicy>,
    pub(crate) food_policy: Option<FoodPolicy>,
}

impl Settings {
    /// Reads settings from `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    /// Applies command-line overrides on top of these settings.
    #[must_use]
    pub(crate) fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            output: overrides.output.unwrap_or(self.output),
            seed: overrides.seed.or(self.seed),
            ticks_per_second: overrides.ticks_per_second.unwrap_or(self.ticks_per_second),
            tail_policy: overrides.tail_policy.unwrap_or(self.tail_policy),
            food_policy: overrides.food_policy.unwrap_or(self.food_policy),
        }
    }

    /// Rejects settings the session cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.ticks_per_second == 0 {
            bail!("ticks per second must be positive");
        }
        if self.output.as_os_str().is_empty() {
            bail!("output path must not be empty");
        }
        Ok(())
    }
}
