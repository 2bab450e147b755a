//! The rotation primitive and how rotations are encoded into events.
//!
//! Negative amounts rotate to the left, positive ones to the right. One step is 15 degrees.

use crate::structures::{Event, EventKind};

/// Largest amount that can be rotated with a single event
pub const MAX_ROTATION_STEP: i32 = 4;
/// Steps in a full revolution
pub const STEPS_PER_SPIN: u32 = 24;

/// Event value for a rotation amount in -4..=4. Zero can't be encoded.
pub fn encode_rotation(amount: i32) -> Option<i32> {
	match amount {
		1..=4 => Some(3 + amount),
		-4..=-1 => Some(4 + amount),
		_ => None,
	}
}

/// Rotation amount for an event value, the inverse of [`encode_rotation`]
pub fn decode_rotation(value: i32) -> Option<i32> {
	match value {
		0..=3 => Some(value - 4),
		4..=7 => Some(value - 3),
		_ => None,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentKind {
	/// Counts towards the rotation limit
	Turn,
	/// Part of a full revolution, doesn't change the overall orientation
	Spin,
}

/// A committed rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMoment {
	pub time: f32,
	pub amount: i32,
	pub kind: MomentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Left,
	Right,
}

impl Direction {
	pub fn of(amount: i32) -> Self {
		if amount > 0 {
			Self::Right
		} else {
			Self::Left
		}
	}

	pub fn sign(self) -> i32 {
		match self {
			Self::Left => -1,
			Self::Right => 1,
		}
	}

	pub fn opposite(self) -> Self {
		match self {
			Self::Left => Self::Right,
			Self::Right => Self::Left,
		}
	}
}

/// Running state while rotations are emitted
#[derive(Debug, Clone)]
pub struct RotationState {
	limit: i32,
	pub total_rotation: i32,
	pub previous_direction: Direction,
	pub previous_spin_time: f32,
	pub moments: Vec<RotationMoment>,
	pub events: Vec<Event>,
}

impl RotationState {
	pub fn new(limit: i32) -> Self {
		Self {
			limit,
			total_rotation: 0,
			previous_direction: Direction::Right,
			previous_spin_time: f32::NEG_INFINITY,
			moments: Vec::new(),
			events: Vec::new(),
		}
	}

	/// Rotates by `amount` at `time`, shrinking the amount if the limit would be exceeded.
	/// Returns the amount actually rotated, which is zero if nothing was emitted.
	pub fn rotate(&mut self, time: f32, amount: i32) -> i32 {
		let mut amount = amount.clamp(-MAX_ROTATION_STEP, MAX_ROTATION_STEP);
		if self.total_rotation + amount > self.limit {
			amount = amount.min((self.limit - self.total_rotation).max(0));
		} else if self.total_rotation + amount < -self.limit {
			amount = amount.max((-(self.limit + self.total_rotation)).min(0));
		}
		if amount == 0 {
			return 0;
		}

		self.total_rotation += amount;
		self.commit(time, amount, MomentKind::Turn);
		amount
	}

	/// One step of a spin. Bypasses the limit.
	pub fn spin_step(&mut self, time: f32, direction: Direction) {
		self.commit(time, direction.sign(), MomentKind::Spin);
	}

	fn commit(&mut self, time: f32, amount: i32, kind: MomentKind) {
		self.previous_direction = Direction::of(amount);
		self.moments.push(RotationMoment { time, amount, kind });
		// amount is non-zero and clamped at this point
		if let Some(value) = encode_rotation(amount) {
			self.events.push(Event {
				time,
				kind: EventKind::LATE_ROTATION,
				value,
			});
		}
	}

	pub fn event_count(&self) -> usize {
		self.events.len()
	}
}
