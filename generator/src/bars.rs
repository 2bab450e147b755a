//! Splits the note timeline into bars and sub-beats. Bars are aligned to the first note, because
//! the first note (almost always) marks the start of the first bar.

use crate::Error;
use std::ops::Range;

/// Like `floor`, but values less than 0.001 below the next integer are rounded up. This way,
/// notes that are only off due to float imprecision land in the bucket they were meant for.
pub fn lenient_floor(value: f32) -> i32 {
	let truncated = value as i32;
	if value - truncated as f32 >= 0.999 {
		truncated + 1
	} else {
		truncated
	}
}

/// Snaps the preferred bar duration to a power-of-two multiple of the beat duration
pub fn snap_bar_length(beat_duration: f32, preferred_bar_duration: f32) -> f32 {
	let mut bar_length = beat_duration;
	// the bounds keep both loops finite when a duration is out of the normal float range
	while bar_length.is_finite() && bar_length >= preferred_bar_duration * 1.25 {
		bar_length /= 2.0;
	}
	while bar_length > 0.0 && bar_length < preferred_bar_duration * 0.75 {
		bar_length *= 2.0;
	}
	bar_length
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
	/// Seconds since the first note
	pub start: f32,
	/// Indices into the note time list that was segmented
	pub notes: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGrid {
	pub beat_duration: f32,
	pub bar_length: f32,
	pub first_note_time: f32,
}

impl BarGrid {
	pub fn new(
		beats_per_minute: f32,
		preferred_bar_duration: f32,
		first_note_time: f32,
	) -> Result<Self, Error> {
		if !(beats_per_minute > 0.0) || !beats_per_minute.is_finite() {
			return Err(Error::InvalidTempo {
				bpm: beats_per_minute,
			});
		}

		let beat_duration = 60.0 / beats_per_minute;
		// tempos this slow overflow the beat duration
		if !beat_duration.is_finite() {
			return Err(Error::InvalidTempo {
				bpm: beats_per_minute,
			});
		}

		Ok(Self {
			beat_duration,
			bar_length: snap_bar_length(beat_duration, preferred_bar_duration),
			first_note_time,
		})
	}

	pub fn bar_index(&self, time: f32) -> i32 {
		lenient_floor((time - self.first_note_time) / self.bar_length)
	}

	/// Converts a time relative to the first note back to song time
	pub fn absolute(&self, relative_time: f32) -> f32 {
		self.first_note_time + relative_time
	}

	/// Groups the given ascending note times into bars. Bars without notes are left out.
	pub fn split_into_bars(&self, times: &[f32]) -> Vec<Bar> {
		let mut bars = Vec::new();

		let mut i = 0;
		while let Some(&time) = times.get(i) {
			let mut start = self.bar_index(time) as f32 * self.bar_length;
			let mut end = start + self.bar_length - 0.001;
			// the note sits in the tiny gap the end margin leaves, it belongs to the next bar
			if time - self.first_note_time >= end {
				start += self.bar_length;
				end += self.bar_length;
			}

			let bar_begin = i;
			while times.get(i).map_or(false, |&t| t - self.first_note_time < end) {
				i += 1;
			}
			// only reachable with NaN times
			i = i.max(bar_begin + 1);

			bars.push(Bar {
				start,
				notes: bar_begin..i,
			});
		}

		bars
	}

	/// Splits a bar into `divider` equally long sub-beats. Returns one (possibly empty) range
	/// per sub-beat.
	pub fn split_into_sub_beats(&self, bar: &Bar, times: &[f32], divider: u32) -> Vec<Range<usize>> {
		let sub_beat_length = self.sub_beat_length(divider);
		let last_sub_beat = divider.saturating_sub(1) as i32;

		let mut sub_beats = Vec::with_capacity(divider as usize);
		let mut k = bar.notes.start;
		for j in 0..divider as i32 {
			let sub_beat_begin = k;
			while k < bar.notes.end {
				let index = lenient_floor(
					(times[k] - self.first_note_time - bar.start) / sub_beat_length,
				)
				.min(last_sub_beat);
				if index != j {
					break;
				}
				k += 1;
			}
			sub_beats.push(sub_beat_begin..k);
		}

		sub_beats
	}

	pub fn sub_beat_length(&self, divider: u32) -> f32 {
		self.bar_length / divider as f32
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lenient_floor() {
		assert_eq!(lenient_floor(0.0), 0);
		assert_eq!(lenient_floor(1.5), 1);
		assert_eq!(lenient_floor(1.9989), 1);
		assert_eq!(lenient_floor(1.9995), 2);
		assert_eq!(lenient_floor(3.0), 3);
	}

	#[test]
	fn test_bar_length_snapping() {
		let grid = BarGrid::new(120.0, 1.84, 0.0).unwrap();
		assert_eq!(grid.beat_duration, 0.5);
		assert_eq!(grid.bar_length, 2.0);

		// 0.25 -> 0.5 -> 1.0 -> 2.0
		assert_eq!(snap_bar_length(0.25, 1.84), 2.0);
		// halved down to 1.25 which is too short, so it's doubled back up
		assert_eq!(snap_bar_length(10.0, 1.84), 2.5);
		// 130 bpm lands close to the preferred duration
		let grid = BarGrid::new(130.0, 1.84, 0.0).unwrap();
		assert!((grid.bar_length - 1.846).abs() < 0.001);
	}

	#[test]
	fn test_invalid_tempo() {
		assert!(matches!(BarGrid::new(0.0, 1.84, 0.0), Err(Error::InvalidTempo { .. })));
		assert!(matches!(BarGrid::new(-120.0, 1.84, 0.0), Err(Error::InvalidTempo { .. })));
		assert!(BarGrid::new(f32::NAN, 1.84, 0.0).is_err());
		assert!(matches!(BarGrid::new(1e-38, 1.84, 0.0), Err(Error::InvalidTempo { .. })));
	}

	#[test]
	fn test_snapping_out_of_range_durations_terminates() {
		assert_eq!(snap_bar_length(0.5, f32::MIN_POSITIVE / 4.0), 0.0);
		assert_eq!(snap_bar_length(f32::INFINITY, 1.84), f32::INFINITY);
		// the fastest representable tempo still snaps to a sensible length
		let grid = BarGrid::new(f32::MAX, 1.84, 0.0).unwrap();
		assert!(grid.bar_length >= 1.84 * 0.75 && grid.bar_length < 1.84 * 1.25);
	}

	#[test]
	fn test_split_into_bars() {
		let grid = BarGrid::new(120.0, 1.84, 1.0).unwrap();
		let times = [1.0, 1.5, 2.9995, 3.0, 4.5, 9.0, 9.5];
		let bars = grid.split_into_bars(&times);

		assert_eq!(
			bars,
			vec![
				Bar { start: 0.0, notes: 0..2 },
				Bar { start: 2.0, notes: 2..5 },
				Bar { start: 8.0, notes: 5..7 },
			]
		);
		assert_eq!(grid.bar_index(9.0), 4);
	}

	#[test]
	fn test_split_into_sub_beats() {
		let grid = BarGrid::new(120.0, 1.84, 0.0).unwrap();
		let times = [0.0, 0.1, 0.6, 1.9];
		let bars = grid.split_into_bars(&times);
		assert_eq!(bars.len(), 1);

		let sub_beats = grid.split_into_sub_beats(&bars[0], &times, 4);
		assert_eq!(sub_beats, vec![0..2, 2..3, 3..3, 3..4]);

		let sub_beats = grid.split_into_sub_beats(&bars[0], &times, 1);
		assert_eq!(sub_beats, vec![0..4]);
	}
}
