use serde::{Deserialize, Serialize};

/// One difficulty of a beatmap. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
	pub beats_per_minute: f32,
	pub lane_count: u32,
	#[serde(default)]
	pub objects: Vec<BeatmapObject>,
	#[serde(default)]
	pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BeatmapObject {
	Note(Note),
	Obstacle(Obstacle),
}

impl BeatmapObject {
	pub fn time(&self) -> f32 {
		match self {
			Self::Note(note) => note.time,
			Self::Obstacle(obstacle) => obstacle.time,
		}
	}

	pub fn as_note(&self) -> Option<&Note> {
		match self {
			Self::Note(note) => Some(note),
			Self::Obstacle(_) => None,
		}
	}

	pub fn as_note_mut(&mut self) -> Option<&mut Note> {
		match self {
			Self::Note(note) => Some(note),
			Self::Obstacle(_) => None,
		}
	}

	pub fn as_obstacle(&self) -> Option<&Obstacle> {
		match self {
			Self::Obstacle(obstacle) => Some(obstacle),
			Self::Note(_) => None,
		}
	}

	pub fn as_obstacle_mut(&mut self) -> Option<&mut Obstacle> {
		match self {
			Self::Obstacle(obstacle) => Some(obstacle),
			Self::Note(_) => None,
		}
	}
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, Default, Serialize, Deserialize)]
pub enum NoteLayer {
	#[default]
	Base,
	Upper,
	Top,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum CutDirection {
	Up,
	Down,
	Left,
	Right,
	UpLeft,
	UpRight,
	DownLeft,
	DownRight,
	Any,
	/// Bombs have no cut direction
	None,
}

impl CutDirection {
	pub fn points_left(self) -> bool {
		matches!(self, Self::Left | Self::UpLeft | Self::DownLeft)
	}

	pub fn points_right(self) -> bool {
		matches!(self, Self::Right | Self::UpRight | Self::DownRight)
	}

	/// Swaps left and right, vertical directions stay as they are
	pub fn mirrored(self) -> Self {
		match self {
			Self::Left => Self::Right,
			Self::Right => Self::Left,
			Self::UpLeft => Self::UpRight,
			Self::UpRight => Self::UpLeft,
			Self::DownLeft => Self::DownRight,
			Self::DownRight => Self::DownLeft,
			other => other,
		}
	}
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum NoteColor {
	A,
	B,
	None,
}

impl NoteColor {
	pub fn flipped(self) -> Self {
		match self {
			Self::A => Self::B,
			Self::B => Self::A,
			Self::None => Self::None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
	pub time: f32,
	pub lane: u32,
	#[serde(default)]
	pub layer: NoteLayer,
	pub direction: CutDirection,
	pub color: NoteColor,
}

impl Note {
	pub fn new(time: f32, lane: u32, direction: CutDirection, color: NoteColor) -> Self {
		Self {
			time,
			lane,
			layer: NoteLayer::Base,
			direction,
			color,
		}
	}

	pub fn bomb(time: f32, lane: u32) -> Self {
		Self::new(time, lane, CutDirection::None, NoteColor::None)
	}

	pub fn is_bomb(&self) -> bool {
		self.direction == CutDirection::None
	}

	/// Reflects the note to the other side of the playfield and hands it to the other saber
	pub fn mirror(&mut self, lane_count: u32) {
		self.lane = lane_count.saturating_sub(1).saturating_sub(self.lane);
		self.direction = self.direction.mirrored();
		self.color = self.color.flipped();
	}
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
	#[default]
	FullHeight,
	Top,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
	pub time: f32,
	pub lane: u32,
	#[serde(default)]
	pub kind: ObstacleKind,
	/// An obstacle with a duration <= 0 is deleted
	pub duration: f32,
	pub width: u32,
	#[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
	pub custom_data: serde_json::Map<String, serde_json::Value>,
}

impl Obstacle {
	pub fn new(time: f32, lane: u32, kind: ObstacleKind, duration: f32, width: u32) -> Self {
		Self {
			time,
			lane,
			kind,
			duration,
			width,
			custom_data: serde_json::Map::new(),
		}
	}

	pub fn end(&self) -> f32 {
		self.time + self.duration
	}

	/// Mapping tools put externally positioned walls here
	pub fn is_custom_positioned(&self) -> bool {
		self.custom_data.contains_key("_position")
	}
}

/// Integer tag of an event, as the host game defines them
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(pub i32);

impl EventKind {
	pub const EARLY_ROTATION: Self = Self(14);
	pub const LATE_ROTATION: Self = Self(15);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub time: f32,
	pub kind: EventKind,
	pub value: i32,
}
