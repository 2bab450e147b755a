use crate::structures::{Beatmap, BeatmapObject};

fn is_removed(object: &BeatmapObject) -> bool {
	match object {
		BeatmapObject::Obstacle(obstacle) if obstacle.duration <= 0.0 => true,
		object => object.time() <= 0.0,
	}
}

/// Drops everything that was marked as removed (time or duration of zero) and sorts objects and
/// events by time. Returns how many objects were dropped.
pub fn sort_and_remove(beatmap: &mut Beatmap) -> usize {
	let count_before = beatmap.objects.len();
	beatmap.objects.retain(|object| !is_removed(object));

	// stable, so objects at the same time keep their order
	beatmap.objects.sort_by(|a, b| a.time().total_cmp(&b.time()));
	beatmap.events.sort_by(|a, b| a.time.total_cmp(&b.time));

	count_before - beatmap.objects.len()
}
