//! The arena: bounds, global clock and the capped set of nibbles.
//!
//! Nibbles sit behind their own mutex so a reader on another thread never
//! sees the collection mid-update. Every critical section is short and never
//! waits on another guard.

use crate::config::WorldConfig;
use crate::error::{Result, SimError};
use crate::physics::CircleLogic;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serpens_data::Circle;
use std::sync::{Mutex, MutexGuard};

/// A consumable resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Nibble {
    pub id: u64,
    pub body: Circle,
}

#[derive(Debug, Default)]
struct NibbleStore {
    items: Vec<Nibble>,
    next_id: u64,
}

#[derive(Debug)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub clock: u64,
    pub max_nibbles: usize,
    nibble_radius: f64,
    wall_margin: f64,
    tick_period: u64,
    nibbles: Mutex<NibbleStore>,
}

/// Reward of a nibble of the given age: 13 while fresh, decaying toward 5.
#[must_use]
pub fn nibble_value(age: u64) -> i32 {
    let decay = (-(age as f64 - 800.0) / 2000.0).exp().min(1.0);
    (5.0 + 8.0 * decay) as i32
}

impl World {
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            clock: 0,
            max_nibbles: config.max_nibbles,
            nibble_radius: config.circle_radius,
            wall_margin: config.nibble_wall_margin,
            tick_period: config.tick_period,
            nibbles: Mutex::new(NibbleStore::default()),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, NibbleStore>> {
        self.nibbles
            .lock()
            .map_err(|_| SimError::LockPoisoned("nibbles"))
    }

    /// Resizes the arena, moves every nibble and advances the clock.
    pub fn update(&mut self, width: f64, height: f64) -> Result<()> {
        self.width = width;
        self.height = height;
        let m = self.wall_margin;
        {
            let mut store = self.store()?;
            for nibble in &mut store.items {
                nibble.body.update_position();
                nibble.body.collide_wall(m, m, width - m, height - m);
                nibble.body.t += 1;
            }
        }
        self.clock += self.tick_period;
        Ok(())
    }

    /// Spawns up to `n` nibbles, stopping at `max_nibbles`. Returns how many
    /// were added.
    pub fn new_nibble<R: Rng>(&self, n: usize, rng: &mut R) -> Result<usize> {
        let (width, height, r) = (self.width, self.height, self.nibble_radius);
        let mut store = self.store()?;
        let room = self.max_nibbles.saturating_sub(store.items.len());
        let count = n.min(room);
        for _ in 0..count {
            let x = rng.gen::<f64>() * (width - 2.0 * r) + r;
            let y = rng.gen::<f64>() * (height - 2.0 * r) + r;
            let vx = 2.0 * (rng.gen::<f64>() - 0.5);
            let vy = 2.0 * (rng.gen::<f64>() - 0.5);
            let id = store.next_id;
            store.next_id += 1;
            store.items.push(Nibble {
                id,
                body: Circle::with_velocity(x, y, r, vx, vy),
            });
        }
        Ok(count)
    }

    /// Places a nibble at an exact position, ignoring the cap.
    pub fn place_nibble(&self, body: Circle) -> Result<u64> {
        let mut store = self.store()?;
        let id = store.next_id;
        store.next_id += 1;
        store.items.push(Nibble { id, body });
        Ok(id)
    }

    pub fn calc_value(&self, nibble: &Nibble) -> i32 {
        nibble_value(nibble.body.t)
    }

    pub fn remove_nibbles(&self, ids: &[u64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut store = self.store()?;
        store.items.retain(|n| !ids.contains(&n.id));
        Ok(())
    }

    /// Removes every nibble for which `eats` returns true and hands them back.
    pub fn take_nibbles<F>(&self, mut eats: F) -> Result<Vec<Nibble>>
    where
        F: FnMut(&Circle) -> bool,
    {
        let mut store = self.store()?;
        let (eaten, kept): (Vec<Nibble>, Vec<Nibble>) =
            std::mem::take(&mut store.items)
                .into_iter()
                .partition(|n| eats(&n.body));
        store.items = kept;
        Ok(eaten)
    }

    /// Clears all nibbles and rewinds the clock.
    pub fn reset(&mut self) -> Result<()> {
        self.store()?.items.clear();
        self.clock = 0;
        Ok(())
    }

    /// Copy of the current nibbles.
    pub fn nibbles(&self) -> Result<Vec<Nibble>> {
        Ok(self.store()?.items.clone())
    }

    /// Runs `f` over the nibbles while holding the guard.
    pub fn with_nibbles<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&[Nibble]) -> T,
    {
        Ok(f(&self.store()?.items))
    }

    pub fn nibble_count(&self) -> Result<usize> {
        Ok(self.store()?.items.len())
    }
}
