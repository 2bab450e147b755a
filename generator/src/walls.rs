//! Makes walls and bombs survivable in a rotating playfield.
//!
//! When the playfield rotates towards a side, walls on that side are moved out of the way by
//! cutting a margin around the rotation moment. Walls in the middle lanes can't be dodged
//! anymore once the player is turned, so those are deleted altogether.

use crate::config::GeneratorConfig;
use crate::direction::is_left_lane;
use crate::rotation::RotationMoment;
use crate::structures::{BeatmapObject, Note, NoteLayer, Obstacle, ObstacleKind};
use std::collections::VecDeque;

/// Pieces shorter than this (in seconds) aren't worth keeping
const NEGLIGIBLE_DURATION: f32 = 0.01;

/// Custom walls are only left alone if there's more than this many of them
pub const CUSTOM_WALL_THRESHOLD: usize = 12;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WallReport {
	pub removed: usize,
	pub split: usize,
	pub shifted: usize,
}

pub fn contains_custom_walls(objects: &[BeatmapObject]) -> bool {
	objects
		.iter()
		.filter_map(BeatmapObject::as_obstacle)
		.filter(|obstacle| obstacle.is_custom_positioned())
		.count() > CUSTOM_WALL_THRESHOLD
}

/// Walls in the middle lanes, and wide walls starting from the left, block the player
fn is_incompatible(obstacle: &Obstacle, lane_count: u32) -> bool {
	if obstacle.is_custom_positioned() {
		return false;
	}
	let is_inner_lane = obstacle.lane > 0 && obstacle.lane + 1 < lane_count;
	is_inner_lane || (obstacle.lane == 0 && obstacle.width > 1)
}

/// Whether rotating by `amount` turns the player towards a wall in `lane`
fn rotates_towards_wall(lane: u32, amount: i32, lane_count: u32) -> bool {
	if is_left_lane(lane, lane_count) {
		amount < 0
	} else {
		amount > 0
	}
}

/// Bombs are only safe on the outermost lane on the other side
fn rotates_towards_bomb(lane: u32, amount: i32, lane_count: u32) -> bool {
	if amount < 0 {
		lane + 1 < lane_count
	} else {
		amount > 0 && lane >= 1
	}
}

/// Cuts a margin around the rotation moment out of the obstacle. If that leaves a piece on both
/// sides, the obstacle keeps the first one and the second one is returned.
fn cut_obstacle(
	obstacle: &mut Obstacle,
	moment: &RotationMoment,
	config: &GeneratorConfig,
	report: &mut WallReport,
) -> Option<Obstacle> {
	// Walls at a custom position get no margin
	let (front_cut, back_cut) = if obstacle.is_custom_positioned() {
		(0.0, 0.0)
	} else {
		(config.wall_front_cut, config.wall_back_cut)
	};
	let back_cut = back_cut * moment.amount.abs() as f32;

	if moment.time < obstacle.time - front_cut || moment.time >= obstacle.end() + back_cut {
		return None;
	}

	let head_duration = (moment.time - back_cut) - obstacle.time;
	let tail_time = moment.time + front_cut;
	let tail_duration = obstacle.end() - tail_time;

	log::debug!(
		"Split wall at {}({}) -> {}({}) <|> {}({}) multiplier={}",
		obstacle.time,
		obstacle.duration,
		obstacle.time,
		head_duration,
		tail_time,
		tail_duration,
		moment.amount.abs(),
	);

	if tail_duration > 0.0 && head_duration <= NEGLIGIBLE_DURATION {
		obstacle.time = tail_time;
		obstacle.duration = tail_duration;
		report.shifted += 1;
		return None;
	}

	let tail = if tail_duration > NEGLIGIBLE_DURATION {
		report.split += 1;
		Some(Obstacle {
			time: tail_time,
			duration: tail_duration,
			..obstacle.clone()
		})
	} else {
		None
	};
	obstacle.duration = head_duration.max(0.0);
	tail
}

/// Replays all rotation moments against every obstacle. Obstacles that end up with a duration
/// of zero are left in place for the caller to filter out.
pub fn adjust_obstacles(
	objects: &mut Vec<BeatmapObject>,
	moments: &[RotationMoment],
	config: &GeneratorConfig,
	lane_count: u32,
) -> WallReport {
	let mut report = WallReport::default();

	// Split off pieces are appended to `objects` and queued up again, since later moments may
	// cut them too
	let mut queue = objects
		.iter()
		.enumerate()
		.filter(|(_, object)| object.as_obstacle().is_some())
		.map(|(i, _)| i)
		.collect::<VecDeque<_>>();

	while let Some(index) = queue.pop_front() {
		if let Some(obstacle) = objects[index].as_obstacle_mut() {
			if obstacle.duration > 0.0 && is_incompatible(obstacle, lane_count) {
				obstacle.duration = 0.0;
				report.removed += 1;
				continue;
			}
		}

		for moment in moments {
			let obstacle = match objects[index].as_obstacle_mut() {
				Some(obstacle) => obstacle,
				None => break,
			};
			if obstacle.duration <= 0.0 {
				break;
			}
			if !obstacle.is_custom_positioned()
				&& !rotates_towards_wall(obstacle.lane, moment.amount, lane_count)
			{
				continue;
			}

			if let Some(tail) = cut_obstacle(obstacle, moment, config, &mut report) {
				objects.push(BeatmapObject::Obstacle(tail));
				queue.push_back(objects.len() - 1);
			}
		}
	}

	report
}

/// Marks bombs that would be flung at the player by a nearby rotation as removed. Returns how
/// many bombs were removed.
pub fn remove_bombs(
	objects: &mut [BeatmapObject],
	moments: &[RotationMoment],
	config: &GeneratorConfig,
	lane_count: u32,
) -> usize {
	let mut removed = 0;
	for note in objects.iter_mut().filter_map(BeatmapObject::as_note_mut) {
		if !note.is_bomb() || note.time <= 0.0 {
			continue;
		}

		let is_hit = moments.iter().any(|moment| {
			moment.time >= note.time - config.wall_front_cut
				&& moment.time < note.time + config.wall_back_cut
				&& rotates_towards_bomb(note.lane, moment.amount, lane_count)
		});
		if is_hit {
			note.time = 0.0;
			removed += 1;
		}
	}
	removed
}

/// Adds walls on the outer lanes over the span of a sub-beat, if no notes are in the way.
/// `sub_beat` holds the indices of the sub-beat's notes in `objects`. Returns how many walls
/// were added.
pub fn synthesize_walls(
	objects: &mut Vec<BeatmapObject>,
	sub_beat: &[usize],
	wall_time: f32,
	wall_duration: f32,
	next_note: &Note,
	config: &GeneratorConfig,
	lane_count: u32,
) -> usize {
	if lane_count < 4 {
		return 0;
	}

	let is_occupied = objects
		.iter()
		.filter_map(BeatmapObject::as_obstacle)
		.any(|obstacle| obstacle.end() >= wall_time && obstacle.time < wall_time + wall_duration);
	if is_occupied {
		return 0;
	}

	let note_lanes = sub_beat
		.iter()
		.filter_map(|&i| objects[i].as_note())
		.filter(|note| note.time > 0.0)
		.map(|note| note.lane)
		.collect::<Vec<_>>();

	let mut created = 0;
	for (outer_lane, inner_lane) in [(lane_count - 1, lane_count - 2), (0, 1)] {
		if note_lanes.contains(&outer_lane) {
			continue;
		}

		// Duck under the wall if the player has to hit something right next to it
		let kind = if note_lanes.contains(&inner_lane) {
			ObstacleKind::Top
		} else {
			ObstacleKind::FullHeight
		};

		let mut duration = wall_duration;
		let passes_under = kind == ObstacleKind::Top && next_note.layer == NoteLayer::Base;
		if next_note.lane == outer_lane && !passes_under {
			duration = next_note.time - config.wall_back_cut - wall_time;
		}

		if duration > 0.0 {
			objects.push(BeatmapObject::Obstacle(Obstacle::new(
				wall_time, outer_lane, kind, duration, 1,
			)));
			created += 1;
		}
	}

	created
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rotation::MomentKind;
	use crate::structures::{CutDirection, NoteColor};

	fn turn(time: f32, amount: i32) -> RotationMoment {
		RotationMoment {
			time,
			amount,
			kind: MomentKind::Turn,
		}
	}

	fn wall(time: f32, lane: u32, duration: f32, width: u32) -> BeatmapObject {
		BeatmapObject::Obstacle(Obstacle::new(time, lane, ObstacleKind::FullHeight, duration, width))
	}

	fn obstacles(objects: &[BeatmapObject]) -> Vec<(f32, f32)> {
		objects
			.iter()
			.filter_map(BeatmapObject::as_obstacle)
			.map(|o| (o.time, o.duration))
			.collect()
	}

	fn custom_wall(time: f32) -> BeatmapObject {
		let mut obstacle = Obstacle::new(time, 1, ObstacleKind::FullHeight, 0.5, 1);
		obstacle
			.custom_data
			.insert("_position".into(), serde_json::json!([0.0, 0.0]));
		BeatmapObject::Obstacle(obstacle)
	}

	#[test]
	fn test_custom_wall_threshold() {
		let mut objects = (0..12).map(|i| custom_wall(i as f32)).collect::<Vec<_>>();
		// plain walls don't count
		objects.push(wall(20.0, 0, 1.0, 1));
		assert!(!contains_custom_walls(&objects));

		objects.push(custom_wall(12.0));
		assert!(contains_custom_walls(&objects));
	}

	#[test]
	fn test_inner_walls_are_removed() {
		let config = GeneratorConfig::default();
		let mut objects = vec![wall(1.0, 1, 2.0, 1), wall(1.0, 2, 2.0, 1), wall(1.0, 0, 2.0, 2)];

		// even without any rotations
		let report = adjust_obstacles(&mut objects, &[], &config, 4);
		assert_eq!(report.removed, 3);
		assert!(obstacles(&objects).iter().all(|&(_, duration)| duration == 0.0));
	}

	#[test]
	fn test_custom_inner_wall_survives() {
		let config = GeneratorConfig::default();
		let mut obstacle = Obstacle::new(1.0, 1, ObstacleKind::FullHeight, 2.0, 1);
		obstacle
			.custom_data
			.insert("_position".into(), serde_json::json!([0.0, 0.0]));
		let mut objects = vec![BeatmapObject::Obstacle(obstacle)];

		adjust_obstacles(&mut objects, &[], &config, 4);
		assert_eq!(obstacles(&objects), vec![(1.0, 2.0)]);

		// custom walls are cut without margin, regardless of direction
		adjust_obstacles(&mut objects, &[turn(2.0, 1)], &config, 4);
		assert_eq!(obstacles(&objects), vec![(1.0, 1.0), (2.0, 1.0)]);
	}

	#[test]
	fn test_wall_is_split() {
		let config = GeneratorConfig::default();
		let mut objects = vec![wall(1.0, 0, 4.0, 1)];

		let report = adjust_obstacles(&mut objects, &[turn(3.0, -2)], &config, 4);
		assert_eq!(report.split, 1);

		let pieces = obstacles(&objects);
		assert_eq!(pieces.len(), 2);
		// head ends 2 * 0.45 seconds before the rotation
		assert!((pieces[0].0 - 1.0).abs() < 1e-5);
		assert!((pieces[0].1 - 1.1).abs() < 1e-5);
		// tail starts 0.2 seconds after it
		assert!((pieces[1].0 - 3.2).abs() < 1e-5);
		assert!((pieces[1].1 - 1.8).abs() < 1e-5);
	}

	#[test]
	fn test_wall_ignores_rotation_away() {
		let config = GeneratorConfig::default();
		let mut objects = vec![wall(1.0, 0, 4.0, 1), wall(1.0, 3, 4.0, 1)];

		adjust_obstacles(&mut objects, &[turn(3.0, -1)], &config, 4);
		let pieces = obstacles(&objects);
		assert_eq!(pieces.len(), 3);
		// the right wall is untouched
		assert_eq!(pieces[1], (1.0, 4.0));
	}

	#[test]
	fn test_wall_is_shifted() {
		let config = GeneratorConfig::default();
		let mut objects = vec![wall(1.0, 3, 2.0, 1)];

		let report = adjust_obstacles(&mut objects, &[turn(1.1, 1)], &config, 4);
		assert_eq!(report.shifted, 1);
		assert_eq!(report.split, 0);

		let pieces = obstacles(&objects);
		assert_eq!(pieces.len(), 1);
		assert!((pieces[0].0 - 1.3).abs() < 1e-5);
		assert!((pieces[0].1 - 1.7).abs() < 1e-5);
	}

	#[test]
	fn test_split_piece_is_cut_again() {
		let config = GeneratorConfig::default();
		let mut objects = vec![wall(1.0, 3, 10.0, 1)];

		let report = adjust_obstacles(&mut objects, &[turn(3.0, 1), turn(7.0, 1)], &config, 4);
		assert_eq!(report.split, 2);
		let pieces = obstacles(&objects);
		assert_eq!(pieces.len(), 3);
		assert!((pieces[2].0 - 7.2).abs() < 1e-5);
		assert!((pieces[2].1 - 3.8).abs() < 1e-5);
	}

	#[test]
	fn test_remove_bombs() {
		let config = GeneratorConfig::default();
		let mut objects = vec![
			BeatmapObject::Note(Note::bomb(2.0, 0)),
			BeatmapObject::Note(Note::bomb(2.0, 3)),
			BeatmapObject::Note(Note::bomb(5.0, 0)),
			BeatmapObject::Note(Note::new(2.0, 0, CutDirection::Down, NoteColor::A)),
		];

		let removed = remove_bombs(&mut objects, &[turn(2.1, -1)], &config, 4);
		assert_eq!(removed, 1);
		let times = objects.iter().map(BeatmapObject::time).collect::<Vec<_>>();
		assert_eq!(times, vec![0.0, 2.0, 5.0, 2.0]);
	}

	#[test]
	fn test_synthesize_walls() {
		let config = GeneratorConfig::default();
		let mut objects = vec![
			BeatmapObject::Note(Note::new(1.0, 1, CutDirection::Down, NoteColor::A)),
			BeatmapObject::Note(Note::new(1.2, 3, CutDirection::Down, NoteColor::B)),
		];
		let next = Note::new(1.8, 0, CutDirection::Down, NoteColor::A);

		let created = synthesize_walls(&mut objects, &[0], 1.0, 0.5, &next, &config, 4);
		assert_eq!(created, 2);

		let right = objects[2].as_obstacle().unwrap();
		assert_eq!((right.lane, right.kind), (3, ObstacleKind::FullHeight));
		assert_eq!(right.duration, 0.5);

		// next note sits under a top wall, so nothing to trim
		let left = objects[3].as_obstacle().unwrap();
		assert_eq!((left.lane, left.kind), (0, ObstacleKind::Top));
		assert_eq!(left.duration, 0.5);

		// the span is taken now
		assert_eq!(synthesize_walls(&mut objects, &[0], 1.0, 0.5, &next, &config, 4), 0);
	}

	#[test]
	fn test_synthesized_wall_makes_room_for_next_note() {
		let config = GeneratorConfig::default();
		let mut objects = vec![BeatmapObject::Note(Note::new(1.0, 1, CutDirection::Down, NoteColor::A))];
		let next = Note::new(2.0, 3, CutDirection::Down, NoteColor::A);

		synthesize_walls(&mut objects, &[0], 1.0, 2.0, &next, &config, 4);
		let right = objects[1].as_obstacle().unwrap();
		assert_eq!(right.lane, 3);
		assert!((right.duration - 0.55).abs() < 1e-5);
	}
}
