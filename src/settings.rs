use crate::mode::{GameMode, SourceCharacteristic};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SETTINGS_PATH: &str = "config.json";

/// User facing settings. These pick the generator configuration per play mode.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
	pub show_generated_360: bool,
	pub show_generated_90: bool,
	pub enable_wall_generator: bool,
	pub limit_rotations_360: i32,
	pub limit_rotations_90: i32,
	pub only_one_saber: bool,
	pub enable_spin: bool,
	/// Difficulty set the input beatmap was taken from
	pub based_on: SourceCharacteristic,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			show_generated_360: true,
			show_generated_90: true,
			enable_wall_generator: true,
			limit_rotations_360: 28,
			limit_rotations_90: 2,
			only_one_saber: false,
			enable_spin: false,
			based_on: SourceCharacteristic::Standard,
		}
	}
}

impl Settings {
	/// Falls back to the defaults if there's no settings file, and writes them out so they can
	/// be edited
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		use anyhow::Context as _;

		if !path.exists() {
			log::info!("No settings at {}, using defaults", path.display());
			let settings = Self::default();
			if let Err(e) = settings.save(path) {
				log::warn!("Couldn't write default settings to {}: {}", path.display(), e);
			}
			return Ok(settings);
		}

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Couldn't read settings file {}", path.display()))?;
		serde_json::from_str(&contents)
			.with_context(|| format!("Settings file {} had invalid format", path.display()))
	}

	pub fn save(&self, path: &Path) -> anyhow::Result<()> {
		serde_json::to_writer_pretty(std::fs::File::create(path)?, self)?;
		Ok(())
	}

	pub fn is_enabled(&self, mode: GameMode) -> bool {
		match mode {
			GameMode::Generated360Degree => self.show_generated_360,
			GameMode::Generated90Degree => self.show_generated_90,
		}
	}

	pub fn generator_config(&self, mode: GameMode) -> generator::GeneratorConfig {
		let limit = match mode {
			GameMode::Generated360Degree => self.limit_rotations_360,
			GameMode::Generated90Degree => self.limit_rotations_90,
		};

		generator::GeneratorConfig {
			limit_rotations: limit,
			bottleneck_rotations: limit / 2,
			wall_generator: self.enable_wall_generator,
			only_one_saber: self.only_one_saber,
			enable_spin: self.enable_spin,
			..Default::default()
		}
	}
}
