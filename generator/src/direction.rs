use crate::structures::Note;

/// Two notes closer than this (in seconds) at the end of a sub-beat count as one chord
pub const CHORD_TOLERANCE: f32 = 0.005;
/// A bar only counts as one big stack if all notes are closer than this (in seconds)
pub const STACK_TOLERANCE: f32 = 0.001;

/// How many notes of a cluster lean to each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionalBias {
	pub left: usize,
	pub right: usize,
}

impl DirectionalBias {
	/// Counts notes that point to a side or sit in that half of the lanes. A note can count
	/// for both sides, e.g. a right-pointing note in a left lane.
	pub fn of_cluster<'a>(notes: impl IntoIterator<Item = &'a Note>, lane_count: u32) -> Self {
		let mut bias = Self::default();
		for note in notes {
			if is_left_lane(note.lane, lane_count) || note.direction.points_left() {
				bias.left += 1;
			}
			if !is_left_lane(note.lane, lane_count) || note.direction.points_right() {
				bias.right += 1;
			}
		}
		bias
	}

	/// Counts notes by cut direction only
	pub fn of_cut_directions<'a>(notes: impl IntoIterator<Item = &'a Note>) -> Self {
		let mut bias = Self::default();
		for note in notes {
			if note.direction.points_left() {
				bias.left += 1;
			}
			if note.direction.points_right() {
				bias.right += 1;
			}
		}
		bias
	}

	pub fn is_balanced(&self) -> bool {
		self.left == self.right
	}
}

/// In 4 lanes, lanes 0 and 1 are left
pub fn is_left_lane(lane: u32, lane_count: u32) -> bool {
	lane < lane_count / 2
}

/// Whether all notes are hit (practically) at the same time
pub fn is_stack(notes: &[&Note]) -> bool {
	match notes.first() {
		Some(first) => notes
			.iter()
			.all(|note| (note.time - first.time).abs() < STACK_TOLERANCE),
		None => false,
	}
}

/// All notes that are part of the chord ending the given time-ordered cluster
pub fn last_chord<'a>(notes: &[&'a Note]) -> Vec<&'a Note> {
	let last_time = match notes.last() {
		Some(last) => last.time,
		None => return Vec::new(),
	};
	notes
		.iter()
		.copied()
		.filter(|note| (note.time - last_time).abs() < CHORD_TOLERANCE)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::structures::{CutDirection, NoteColor};

	fn note(time: f32, lane: u32, direction: CutDirection) -> Note {
		Note::new(time, lane, direction, NoteColor::A)
	}

	#[test]
	fn test_cluster_bias() {
		let notes = [
			note(1.0, 0, CutDirection::Down),
			note(1.0, 1, CutDirection::Right),
			note(1.0, 3, CutDirection::UpRight),
		];
		assert_eq!(
			DirectionalBias::of_cluster(&notes, 4),
			DirectionalBias { left: 2, right: 2 }
		);

		let notes = [note(1.0, 3, CutDirection::Left), note(1.0, 2, CutDirection::Any)];
		assert_eq!(
			DirectionalBias::of_cluster(&notes, 4),
			DirectionalBias { left: 1, right: 2 }
		);
	}

	#[test]
	fn test_cut_direction_bias() {
		let notes = [
			note(1.0, 0, CutDirection::Down),
			note(1.0, 0, CutDirection::DownRight),
			note(1.0, 3, CutDirection::UpLeft),
			note(1.0, 3, CutDirection::Left),
		];
		let bias = DirectionalBias::of_cut_directions(&notes);
		assert_eq!(bias, DirectionalBias { left: 2, right: 1 });
		assert!(!bias.is_balanced());
	}

	#[test]
	fn test_stack_and_chord() {
		let a = note(1.0, 0, CutDirection::Down);
		let b = note(1.0005, 3, CutDirection::Down);
		let c = note(1.003, 3, CutDirection::Down);
		let d = note(0.5, 3, CutDirection::Down);

		assert!(is_stack(&[&a, &b]));
		assert!(!is_stack(&[&a, &c]));
		assert!(!is_stack(&[]));

		let chord = last_chord(&[&d, &a, &b, &c]);
		assert_eq!(chord.len(), 3);
		assert!(last_chord(&[]).is_empty());
	}
}
