//! Field-of-view sampling.
//!
//! The view is split into `divisions` bins on each side of the heading; right
//! bins (non-negative offsets) come first, left bins after them. Each bin keeps
//! only its nearest occupant.

use crate::config::{SnakeConfig, THING_KINDS};
use crate::network::SIGNAL_MULTIPLIER;
use crate::physics::{signed_angle, CircleLogic};
use serpens_data::{Circle, Thing, ThingKind};

/// Spacing between two synthetic wall samples.
///
/// Chosen so that roughly twenty samples fall into one bin at full sight
/// distance. Never zero.
#[must_use]
pub fn wall_step(config: &SnakeConfig) -> usize {
    let span = config.max_sight_distance * (config.field_of_view / config.fov_divisions as f64).sin();
    ((span as i64) / 20).max(1) as usize
}

/// Point circles of radius 1 along the four edges of a `width × height` box.
pub fn wall_samples(width: f64, height: f64, step: usize) -> impl Iterator<Item = Circle> {
    let step = step.max(1);
    let horizontal = (0_u32..)
        .step_by(step)
        .map(f64::from)
        .take_while(move |&x| x < width)
        .flat_map(move |x| [Circle::new(x, 0.0, 1.0), Circle::new(x, height, 1.0)]);
    let vertical = (0_u32..)
        .step_by(step)
        .map(f64::from)
        .take_while(move |&y| y < height)
        .flat_map(move |y| [Circle::new(0.0, y, 1.0), Circle::new(width, y, 1.0)]);
    horizontal.chain(vertical)
}

/// Nearest object per field-of-view bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Retina {
    things: Vec<Thing>,
    divisions: usize,
    field_of_view: f64,
    max_sight: f64,
}

impl Retina {
    #[must_use]
    pub fn new(config: &SnakeConfig) -> Self {
        let divisions = config.fov_divisions.max(1);
        Self {
            things: vec![Thing::unseen(config.max_sight_distance); divisions * 2],
            divisions,
            field_of_view: config.field_of_view,
            max_sight: config.max_sight_distance,
        }
    }

    fn bin_of(&self, offset: f64) -> usize {
        ((offset * self.divisions as f64 / self.field_of_view) as usize).min(self.divisions - 1)
    }

    /// Records `object` as seen from `head` facing `heading`, if it is inside
    /// the view and nearer than the current occupant of its bin.
    pub fn register(&mut self, head: &Circle, heading: f64, object: &Circle, kind: ThingKind) {
        let a = signed_angle(head.angle_to(object) - heading);
        let slot = if a >= 0.0 && a < self.field_of_view {
            self.bin_of(a)
        } else if a <= 0.0 && -a < self.field_of_view {
            self.bin_of(-a) + self.divisions
        } else {
            return;
        };
        let d = head.distance_to(object);
        let thing = &mut self.things[slot];
        if d < thing.distance {
            thing.distance = d;
            thing.kind = kind;
        }
    }

    /// Right bins, then left bins.
    #[must_use]
    pub fn things(&self) -> &[Thing] {
        &self.things
    }

    fn signal(&self, thing: &Thing) -> f64 {
        SIGNAL_MULTIPLIER * (self.max_sight - thing.distance) / self.max_sight
    }

    /// Network input vector: one active slot per bin, nearer objects giving a
    /// stronger signal.
    ///
    /// Each kind owns a block of `2 × divisions` slots. The plain layout runs
    /// right bins forward and left bins backward inside that block; the
    /// symmetric layout mirrors left bins around the middle of the whole vector.
    #[must_use]
    pub fn to_input(&self, symmetric: bool) -> Vec<f64> {
        let d = self.divisions;
        let first = d * 2 * THING_KINDS;
        let mut input = vec![0.0; first];
        for i in 0..d {
            let right = &self.things[i];
            let left = &self.things[i + d];
            if symmetric {
                input[right.kind.index() * d + i] = self.signal(right);
                input[first - 1 - (left.kind.index() * d + i)] = self.signal(left);
            } else {
                input[right.kind.index() * d * 2 + i] = self.signal(right);
                input[left.kind.index() * d * 2 + d * 2 - 1 - i] = self.signal(left);
            }
        }
        input
    }
}
