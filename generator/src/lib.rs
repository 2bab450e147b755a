//! Turns a beatmap made for a fixed playfield into one for a rotating 360 degree playfield, by
//! generating rotation events from the notes and fixing up walls and bombs accordingly.

#![allow(clippy::neg_cmp_op_on_partial_ord)]

mod assemble;
pub use assemble::*;

mod bars;
pub use bars::*;

mod config;
pub use config::*;

mod direction;
pub use direction::*;

mod planner;
pub use planner::*;

mod rotation;
pub use rotation::*;

mod structures;
pub use structures::*;

mod walls;
pub use walls::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Beatmap has no notes to align bars to")]
	EmptyInput,
	#[error("Invalid tempo of {bpm} bpm")]
	InvalidTempo { bpm: f32 },
	#[error("Beatmap has no lanes")]
	InvalidLaneCount { lane_count: u32 },
	#[error("Invalid generator config: {0}")]
	InvalidConfig(String),
}

/// What happened during generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
	/// All emitted rotations, in emission order
	pub moments: Vec<RotationMoment>,
	pub spins: usize,
	pub notes_removed: usize,
	pub bombs_removed: usize,
	pub obstacles_synthesized: usize,
	pub obstacles_removed: usize,
	pub obstacles_split: usize,
}

impl GenerationReport {
	pub fn rotation_event_count(&self) -> usize {
		self.moments.len()
	}
}

/// Indices of all non-bomb notes, sorted by time
fn playable_notes(objects: &[BeatmapObject]) -> Vec<usize> {
	use itertools::Itertools as _;

	objects
		.iter()
		.enumerate()
		.filter(|(_, object)| {
			object
				.as_note()
				.map_or(false, |note| !note.is_bomb() && note.time.is_finite())
		})
		.map(|(i, _)| i)
		.sorted_by(|&a, &b| objects[a].time().total_cmp(&objects[b].time()))
		.collect()
}

/// Adds rotation events to the beatmap and reshapes its walls and bombs to fit a rotating
/// playfield. Afterwards, objects and events are sorted by time and removed objects are gone.
///
/// If an error is returned, the beatmap hasn't been touched.
pub fn generate(beatmap: &mut Beatmap, config: &GeneratorConfig) -> Result<GenerationReport, Error> {
	config.validate()?;
	if beatmap.lane_count == 0 {
		return Err(Error::InvalidLaneCount {
			lane_count: beatmap.lane_count,
		});
	}

	let notes = playable_notes(&beatmap.objects);
	let first_note_time = match notes.first() {
		Some(&i) => beatmap.objects[i].time(),
		None => return Err(Error::EmptyInput),
	};
	let grid = BarGrid::new(
		beatmap.beats_per_minute,
		config.preferred_bar_duration,
		first_note_time,
	)?;

	let contains_custom_walls = contains_custom_walls(&beatmap.objects);
	log::debug!(
		"Setup bpm={} beat_duration={} bar_length={} first_note_time={}",
		beatmap.beats_per_minute,
		grid.beat_duration,
		grid.bar_length,
		first_note_time,
	);

	let planner = Planner::new(config, grid, beatmap.lane_count, contains_custom_walls);
	let (state, plan_report) = planner.plan(&mut beatmap.objects, &notes);

	let wall_report =
		adjust_obstacles(&mut beatmap.objects, &state.moments, config, beatmap.lane_count);
	let bombs_removed = remove_bombs(&mut beatmap.objects, &state.moments, config, beatmap.lane_count);

	let event_count = state.event_count();
	beatmap.events.extend(state.events);
	sort_and_remove(beatmap);

	log::info!("Emitted {} rotation events", event_count);
	log::info!("Contains custom walls: {}", contains_custom_walls);

	Ok(GenerationReport {
		moments: state.moments,
		spins: plan_report.spins,
		notes_removed: plan_report.notes_removed,
		bombs_removed,
		obstacles_synthesized: plan_report.walls_synthesized,
		obstacles_removed: wall_report.removed,
		obstacles_split: wall_report.split,
	})
}
