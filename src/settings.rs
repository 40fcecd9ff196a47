//! Simulation settings
//!
//! Defaults mirror the classic 400×420 box with 20px balls. Settings can be
//! loaded from and saved to a JSON file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Tick cadence presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    /// ~30 steps per second
    #[default]
    Slow,
    /// ~60 steps per second
    Normal,
    /// 100 steps per second
    Fast,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Normal => "Normal",
            SpeedPreset::Fast => "Fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" | "norm" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            _ => None,
        }
    }

    /// Sleep between two steps of the same body, in milliseconds
    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            SpeedPreset::Slow => 33,
            SpeedPreset::Normal => 16,
            SpeedPreset::Fast => 10,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Arena width including borders
    pub width: f64,
    /// Arena height including borders
    pub height: f64,
    /// Border thickness on every side
    pub border: f64,
    /// Body diameter (uniform across the world)
    pub diameter: f64,

    // === Timing ===
    /// Sleep between two steps of the same body
    pub tick_interval_ms: u64,

    // === Placement ===
    /// Per-axis initial velocity range, `[min, max)`
    pub velocity_range: (f64, f64),
    /// Body mass range, `[min, max)`; `min == max` gives uniform mass
    pub mass_range: (f64, f64),
    /// Candidate positions tried per body before giving up
    pub placement_attempts: u32,
    /// Placement seed; `None` picks one from the thread RNG
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            border: ARENA_BORDER,
            diameter: BODY_DIAMETER,

            tick_interval_ms: SpeedPreset::Slow.tick_interval_ms(),

            velocity_range: (0.0, MAX_START_SPEED),
            mass_range: (BODY_MASS, BODY_MASS),
            placement_attempts: PLACEMENT_ATTEMPTS,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a speed preset (other fields default)
    pub fn from_preset(preset: SpeedPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a speed preset (updates the tick interval)
    pub fn apply_preset(&mut self, preset: SpeedPreset) {
        self.tick_interval_ms = preset.tick_interval_ms();
    }

    /// Tick interval as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check that the settings describe a usable world
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.width,
            self.height,
            self.border,
            self.diameter,
            self.velocity_range.0,
            self.velocity_range.1,
            self.mass_range.0,
            self.mass_range.1,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid("settings contain a non-finite value"));
        }
        if self.diameter <= 0.0 {
            return Err(SimError::invalid("diameter must be positive"));
        }
        if self.border < 0.0 {
            return Err(SimError::invalid("border must not be negative"));
        }
        if self.width - self.diameter - self.border <= self.border
            || self.height - self.diameter - self.border <= self.border
        {
            return Err(SimError::invalid(format!(
                "arena {}x{} with border {} leaves no room for diameter {}",
                self.width, self.height, self.border, self.diameter
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(SimError::invalid("tick interval must be at least 1 ms"));
        }
        if self.velocity_range.0 > self.velocity_range.1 {
            return Err(SimError::invalid("velocity range is inverted"));
        }
        if self.mass_range.0 <= 0.0 || self.mass_range.0 > self.mass_range.1 {
            return Err(SimError::invalid(
                "mass range must be positive and ordered",
            ));
        }
        if self.placement_attempts == 0 {
            return Err(SimError::invalid("placement attempts must be at least 1"));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
