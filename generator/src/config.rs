use serde::{Deserialize, Serialize};

/// Tuning knobs of the generator. One rotation step is 15 degrees, so 24 steps make a full turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GeneratorConfig {
	/// Bar length in seconds the generator aims for. The actual bar length is snapped to a
	/// power-of-two multiple of the beat duration closest to this.
	pub preferred_bar_duration: f32,
	/// Rotation steps in either direction after which no further rotation is allowed (the
	/// player's cable would get ripped out otherwise)
	pub limit_rotations: i32,
	/// Rotation steps after which the other direction is preferred
	pub bottleneck_rotations: i32,
	/// Do a full spin on bars where all notes are hit at once
	pub enable_spin: bool,
	/// Seconds one full spin takes
	pub total_spin_time: f32,
	/// Minimum seconds between two spins
	pub spin_cooldown: f32,
	/// Seconds cut off the front of a wall when rotating towards it
	pub wall_front_cut: f32,
	/// Seconds cut off the back of a wall when rotating towards it, per rotation step
	pub wall_back_cut: f32,
	pub wall_generator: bool,
	/// Only keep the notes of one saber
	pub only_one_saber: bool,
	/// How finely a bar is divided into rotation opportunities, depending on its note count
	pub bar_dividers: BarDividers,
}

/// Note count thresholds for dividing a bar. The busier a bar, the fewer rotations it gets.
///
/// ```text
/// divider | rotations
/// 0       | . . . . (no rotations)
/// 1       | r . . . (only on first beat)
/// 2       | r . r . (on first and third beat)
/// 4       | r r r r
/// 8       |rrrrrrrr
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BarDividers {
	/// From this many notes on, the bar gets no rotations at all
	pub no_rotation: usize,
	pub whole: usize,
	pub halves: usize,
	pub quarters: usize,
}

impl Default for BarDividers {
	fn default() -> Self {
		Self {
			no_rotation: 58,
			whole: 38,
			halves: 26,
			quarters: 8,
		}
	}
}

impl BarDividers {
	pub fn divider_for(&self, note_count: usize) -> u32 {
		if note_count >= self.no_rotation {
			0
		} else if note_count >= self.whole {
			1
		} else if note_count >= self.halves {
			2
		} else if note_count >= self.quarters {
			4
		} else {
			8
		}
	}
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			// 4 beats at 130 bpm, a pretty standard tempo
			preferred_bar_duration: 1.84,
			limit_rotations: 28,
			bottleneck_rotations: 14,
			enable_spin: false,
			total_spin_time: 0.6,
			spin_cooldown: 10.0,
			wall_front_cut: 0.2,
			wall_back_cut: 0.45,
			wall_generator: false,
			only_one_saber: false,
			bar_dividers: BarDividers::default(),
		}
	}
}

impl GeneratorConfig {
	pub fn validate(&self) -> Result<(), crate::Error> {
		let bar_duration = self.preferred_bar_duration;
		let problem = if !(bar_duration > 0.0) || !bar_duration.is_normal() {
			"PreferredBarDuration must be a positive, normal number"
		} else if self.limit_rotations < 0 {
			"LimitRotations must not be negative"
		} else if self.bottleneck_rotations < 0 {
			"BottleneckRotations must not be negative"
		} else if self.enable_spin && !(self.total_spin_time > 0.0) {
			"TotalSpinTime must be positive"
		} else if self.wall_front_cut < 0.0 || self.wall_back_cut < 0.0 {
			"WallFrontCut and WallBackCut must not be negative"
		} else {
			return Ok(());
		};

		Err(crate::Error::InvalidConfig(problem.to_owned()))
	}
}
