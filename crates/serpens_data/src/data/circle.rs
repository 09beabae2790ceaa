use serde::{Deserialize, Serialize};

/// A circular rigid body with position, velocity and a general purpose timer.
///
/// The radius is fixed at construction; everything else is mutated by the
/// physics routines every tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Circle {
    /// Horizontal position of the center.
    pub x: f64,
    /// Vertical position of the center.
    pub y: f64,
    /// Horizontal velocity in units per tick.
    pub vx: f64,
    /// Vertical velocity in units per tick.
    pub vy: f64,
    /// Age counter in ticks.
    pub t: u64,
    rad: f64,
}

impl Circle {
    /// Creates a resting circle at `(x, y)`.
    #[must_use]
    pub fn new(x: f64, y: f64, rad: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            t: 0,
            rad,
        }
    }

    /// Creates a circle with an initial velocity.
    #[must_use]
    pub fn with_velocity(x: f64, y: f64, rad: f64, vx: f64, vy: f64) -> Self {
        Self {
            vx,
            vy,
            ..Self::new(x, y, rad)
        }
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.rad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circle_is_at_rest() {
        let c = Circle::new(3.0, 4.0, 2.0);
        assert_eq!(c.vx, 0.0);
        assert_eq!(c.vy, 0.0);
        assert_eq!(c.t, 0);
        assert_eq!(c.radius(), 2.0);
    }

    #[test]
    fn test_serde_keeps_radius() {
        let c = Circle::with_velocity(1.0, 2.0, 7.5, -1.0, 0.5);
        let json = serde_json::to_string(&c).unwrap();
        let back: Circle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
