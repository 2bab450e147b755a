//! Decides when and how far the playfield rotates.
//!
//! The song is walked bar by bar. Each bar is split into sub-beats depending on how busy it is,
//! and every sub-beat with notes gets one rotation, pointing to where its last notes lean.

use crate::bars::{Bar, BarGrid};
use crate::config::GeneratorConfig;
use crate::direction::{is_stack, last_chord, DirectionalBias};
use crate::rotation::{Direction, RotationState, STEPS_PER_SPIN};
use crate::structures::{BeatmapObject, Note, NoteColor};
use crate::walls;

/// The rotation happens a bit after the notes it was derived from
const ROTATION_DELAY: f32 = 0.01;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlanReport {
	pub spins: usize,
	pub notes_removed: usize,
	pub walls_synthesized: usize,
}

/// What the planner found out about a sub-beat
struct SubBeatAnalysis {
	last_note_time: f32,
	bias: DirectionalBias,
	note_count: usize,
	chord_size: usize,
	next_note: Option<Note>,
}

pub struct Planner<'a> {
	config: &'a GeneratorConfig,
	grid: BarGrid,
	lane_count: u32,
	generate_walls: bool,
	state: RotationState,
	report: PlanReport,
}

impl<'a> Planner<'a> {
	pub fn new(
		config: &'a GeneratorConfig,
		grid: BarGrid,
		lane_count: u32,
		contains_custom_walls: bool,
	) -> Self {
		Self {
			config,
			grid,
			lane_count,
			// the mapper already took care of walls
			generate_walls: config.wall_generator && !contains_custom_walls,
			state: RotationState::new(config.limit_rotations),
			report: PlanReport::default(),
		}
	}

	/// Emits the rotations for the notes at the given indices of `objects`. The indices must be
	/// sorted by note time and must not contain bombs.
	pub fn plan(
		mut self,
		objects: &mut Vec<BeatmapObject>,
		notes: &[usize],
	) -> (RotationState, PlanReport) {
		let times = notes.iter().map(|&i| objects[i].time()).collect::<Vec<_>>();

		for bar in self.grid.split_into_bars(&times) {
			if self.try_spin(objects, notes, &bar) {
				continue;
			}
			self.plan_bar(objects, notes, &times, &bar);
		}

		(self.state, self.report)
	}

	/// Spins around once if the bar is one big stack of notes. Returns whether it did.
	fn try_spin(&mut self, objects: &[BeatmapObject], notes: &[usize], bar: &Bar) -> bool {
		if !self.config.enable_spin || bar.notes.len() < 2 {
			return false;
		}
		if bar.start - self.state.previous_spin_time <= self.config.spin_cooldown {
			return false;
		}

		let bar_notes = notes[bar.notes.clone()]
			.iter()
			.filter_map(|&i| objects[i].as_note())
			.collect::<Vec<_>>();
		if !is_stack(&bar_notes) {
			return false;
		}

		// Turn away from where most notes point
		let bias = DirectionalBias::of_cut_directions(bar_notes.iter().copied());
		let direction = if bias.is_balanced() {
			self.state.previous_direction.opposite()
		} else if bias.left > bias.right {
			Direction::Right
		} else {
			Direction::Left
		};

		let start = self.grid.absolute(bar.start);
		log::debug!("Spin effect at {} to the {:?}", start, direction);

		let step_time = self.config.total_spin_time / STEPS_PER_SPIN as f32;
		for step in 0..STEPS_PER_SPIN {
			self.state.spin_step(start + step_time * step as f32, direction);
		}

		self.state.previous_spin_time = bar.start;
		self.report.spins += 1;
		true
	}

	fn plan_bar(&mut self, objects: &mut Vec<BeatmapObject>, notes: &[usize], times: &[f32], bar: &Bar) {
		let divider = self.config.bar_dividers.divider_for(bar.notes.len());
		log::debug!(
			"[{} -> {}] count={} divider={}",
			self.grid.absolute(bar.start),
			self.grid.absolute(bar.start + self.grid.bar_length),
			bar.notes.len(),
			divider,
		);
		// Too many notes, don't rotate
		if divider == 0 {
			return;
		}

		let sub_beat_length = self.grid.sub_beat_length(divider);
		let sub_beats = self.grid.split_into_sub_beats(bar, times, divider);
		for (j, sub_beat) in sub_beats.into_iter().enumerate() {
			if sub_beat.is_empty() {
				continue;
			}

			let analysis = self.analyze_sub_beat(objects, notes, sub_beat.clone());
			let rotation = self.choose_rotation(&analysis);

			let rotation_time = analysis.last_note_time + ROTATION_DELAY;
			let rotated = self.state.rotate(rotation_time, rotation);
			log::debug!(
				"[{}] Rotate {} (requested {}, c={}, lc={}, rc={}, last_notes={}, next_note={:?}, total={})",
				rotation_time,
				rotated,
				rotation,
				analysis.note_count,
				analysis.bias.left,
				analysis.bias.right,
				analysis.chord_size,
				analysis.next_note.as_ref().map(|note| note.time),
				self.state.total_rotation,
			);

			if self.config.only_one_saber {
				self.report.notes_removed +=
					reduce_to_one_saber(objects, &notes[sub_beat.clone()], rotation, self.lane_count);
			}

			if self.generate_walls {
				if let Some(next_note) = &analysis.next_note {
					let wall_time = self.grid.absolute(bar.start + j as f32 * sub_beat_length);
					self.report.walls_synthesized += walls::synthesize_walls(
						objects,
						&notes[sub_beat],
						wall_time,
						sub_beat_length,
						next_note,
						self.config,
						self.lane_count,
					);
				}
			}
		}
	}

	fn analyze_sub_beat(
		&self,
		objects: &[BeatmapObject],
		notes: &[usize],
		sub_beat: std::ops::Range<usize>,
	) -> SubBeatAnalysis {
		let sub_beat_notes = notes[sub_beat.clone()]
			.iter()
			.filter_map(|&i| objects[i].as_note())
			.collect::<Vec<_>>();
		let chord = last_chord(&sub_beat_notes);

		SubBeatAnalysis {
			last_note_time: sub_beat_notes.last().map_or(0.0, |note| note.time),
			bias: DirectionalBias::of_cluster(chord.iter().copied(), self.lane_count),
			note_count: sub_beat_notes.len(),
			chord_size: chord.len(),
			next_note: notes
				.get(sub_beat.end)
				.and_then(|&i| objects[i].as_note())
				.cloned(),
		}
	}

	/// How many steps to rotate at once. Longer breaks after a chord get bigger rotations.
	fn rotation_steps(&self, analysis: &SubBeatAnalysis) -> i32 {
		let next_note = match &analysis.next_note {
			Some(next_note) if analysis.note_count >= 2 => next_note,
			_ => return 1,
		};

		let gap = next_note.time - analysis.last_note_time;
		if gap >= self.grid.bar_length {
			3
		} else if gap >= self.grid.bar_length / 4.0 {
			2
		} else {
			1
		}
	}

	fn choose_rotation(&self, analysis: &SubBeatAnalysis) -> i32 {
		let steps = self.rotation_steps(analysis);
		let total = self.state.total_rotation;
		let bottleneck = self.config.bottleneck_rotations;
		let limit = self.config.limit_rotations;

		let mut rotation = if analysis.bias.left > analysis.bias.right {
			-steps
		} else if analysis.bias.right > analysis.bias.left {
			steps
		} else if total >= bottleneck {
			// rotated a lot to the right already, prefer going back left
			-steps
		} else if total <= -bottleneck {
			steps
		} else {
			self.state.previous_direction.sign() * steps
		};

		// Past the bottleneck, only creep further in small steps
		if total >= bottleneck && rotation > 1 {
			rotation = 1;
		} else if total <= -bottleneck && rotation < -1 {
			rotation = -1;
		}

		// Never end up pinned at the limit
		if rotation > 0 && total + rotation > limit - 1 {
			rotation = -rotation;
		} else if rotation < 0 && total + rotation < -(limit - 1) {
			rotation = -rotation;
		}

		rotation
	}
}

/// Removes the notes of the saber on the side the playfield turns away from. The remaining
/// notes all end up as color A, mirrored over if needed. Returns how many notes were removed.
pub fn reduce_to_one_saber(
	objects: &mut [BeatmapObject],
	sub_beat: &[usize],
	rotation: i32,
	lane_count: u32,
) -> usize {
	let dropped_color = if rotation > 0 { NoteColor::A } else { NoteColor::B };

	let mut removed = 0;
	for &i in sub_beat {
		let note = match objects[i].as_note_mut() {
			Some(note) => note,
			None => continue,
		};

		if note.color == dropped_color {
			// filtered out later
			note.time = 0.0;
			removed += 1;
		} else if note.color == NoteColor::B {
			note.mirror(lane_count);
		}
	}
	removed
}
