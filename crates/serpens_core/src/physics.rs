//! Rigid circle physics: wall bounces, pairwise separation and chain following.
//!
//! Angles follow `atan2` conventions (range `-π..π`); use [`wrap_angle`] or
//! [`signed_angle`] when a normalized range is needed.

use serpens_data::Circle;
use std::f64::consts::TAU;

/// Wraps `a` into `[0, b)`.
#[must_use]
pub fn positive_modulo(a: f64, b: f64) -> f64 {
    a.rem_euclid(b)
}

/// Wraps `a` into `[-b/2, b/2)`.
#[must_use]
pub fn signed_modulo(a: f64, b: f64) -> f64 {
    let c = positive_modulo(a, b);
    if c >= b / 2.0 {
        c - b
    } else {
        c
    }
}

/// Wraps a heading into `[0, 2π)`.
#[must_use]
pub fn wrap_angle(a: f64) -> f64 {
    positive_modulo(a, TAU)
}

/// Wraps an angular offset into `[-π, π)`.
#[must_use]
pub fn signed_angle(a: f64) -> f64 {
    signed_modulo(a, TAU)
}

/// Physics routines over [`Circle`].
pub trait CircleLogic {
    /// Keeps the circle inside the box, reflecting and damping (×0.9) the
    /// velocity component of every crossed axis.
    fn collide_wall(&mut self, xmin: f64, ymin: f64, xmax: f64, ymax: f64);

    /// Damps both velocity components by `fadeout`, zeroes the ones below
    /// 0.001 in magnitude, then clamps each to `±max_speed`.
    ///
    /// Components are limited independently, not the speed magnitude.
    fn constrain_speed(&mut self, max_speed: f64, fadeout: f64);

    /// Euler step of one tick.
    fn update_position(&mut self);

    /// Pushes `self` out of `other` along the line between their centers so
    /// they just touch. `other` is never moved.
    fn collide_static(&mut self, other: &Circle);

    /// Like [`CircleLogic::collide_static`], plus a velocity impulse away from
    /// `other` scaled by `speed / 5`.
    fn collide_bouncy(&mut self, other: &Circle, speed: f64);

    /// Drifts toward the contact point behind `other`, keeping inertia.
    fn follow_bouncy(&mut self, other: &Circle);

    /// Snaps to the contact point behind `other`.
    fn follow_static(&mut self, other: &Circle);

    /// Whether the outlines are closer than `threshold`; a negative threshold
    /// requires overlap.
    fn is_colliding(&self, other: &Circle, threshold: f64) -> bool;

    /// Center distance corrected by half the radius difference.
    fn distance_to(&self, other: &Circle) -> f64;

    /// Direction from `self` to `other`.
    fn angle_to(&self, other: &Circle) -> f64;

    fn absolute_velocity(&self) -> f64;

    fn center_distance(&self, other: &Circle) -> f64;
}

impl CircleLogic for Circle {
    fn collide_wall(&mut self, xmin: f64, ymin: f64, xmax: f64, ymax: f64) {
        let rad = self.radius();
        if self.x - rad < xmin {
            self.x = xmin + rad;
            self.vx = -self.vx * 0.9;
        }
        if self.x + rad > xmax {
            self.x = xmax - rad;
            self.vx = -self.vx * 0.9;
        }
        if self.y - rad < ymin {
            self.y = ymin + rad;
            self.vy = -self.vy * 0.9;
        }
        if self.y + rad > ymax {
            self.y = ymax - rad;
            self.vy = -self.vy * 0.9;
        }
    }

    fn constrain_speed(&mut self, max_speed: f64, fadeout: f64) {
        self.vx *= fadeout;
        self.vy *= fadeout;
        if self.vx.abs() < 0.001 {
            self.vx = 0.0;
        }
        if self.vy.abs() < 0.001 {
            self.vy = 0.0;
        }
        self.vx = self.vx.clamp(-max_speed, max_speed);
        self.vy = self.vy.clamp(-max_speed, max_speed);
    }

    fn update_position(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    fn collide_static(&mut self, other: &Circle) {
        let s = self.radius() + other.radius();
        let d = self.center_distance(other);
        if d < s {
            let a = other.angle_to(self);
            self.x = other.x + s * a.cos();
            self.y = other.y + s * a.sin();
        }
    }

    fn collide_bouncy(&mut self, other: &Circle, speed: f64) {
        let s = self.radius() + other.radius();
        let d = self.center_distance(other);
        if d < s {
            let a = other.angle_to(self);
            self.x = other.x + s * a.cos();
            self.y = other.y + s * a.sin();
            if d > 0.0 {
                self.vx -= (other.x - self.x) * 2.0 / d * speed / 5.0;
                self.vy -= (other.y - self.y) * 2.0 / d * speed / 5.0;
            }
        }
    }

    fn follow_bouncy(&mut self, other: &Circle) {
        let s = self.radius() + other.radius();
        let a = other.angle_to(self);
        let dx = other.x + s * a.cos() - self.x;
        let dy = other.y + s * a.sin() - self.y;
        self.vx += dx / s / 32.0;
        self.vy += dy / s / 32.0;
        self.x += dx / s * 24.0 + other.vx * 0.24;
        self.y += dy / s * 24.0 + other.vy * 0.24;
    }

    fn follow_static(&mut self, other: &Circle) {
        let s = self.radius() + other.radius();
        let a = other.angle_to(self);
        self.x = other.x + s * a.cos();
        self.y = other.y + s * a.sin();
    }

    fn is_colliding(&self, other: &Circle, threshold: f64) -> bool {
        self.center_distance(other) < self.radius() + other.radius() + threshold
    }

    fn distance_to(&self, other: &Circle) -> f64 {
        self.center_distance(other) - (self.radius() - other.radius()) / 2.0
    }

    fn angle_to(&self, other: &Circle) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    fn absolute_velocity(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    fn center_distance(&self, other: &Circle) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
