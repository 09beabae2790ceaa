//! Agent behavior: spawning, sensing, steering, growth and death.

use crate::config::AppConfig;
use crate::error::Result;
use crate::genome::DnaLogic;
use crate::network::{calc_number_of_coeffs, NetworkLogic, SIGNAL_MULTIPLIER};
use crate::perception::{wall_samples, wall_step, Retina};
use crate::physics::{wrap_angle, CircleLogic};
use crate::world::World;
use rand::Rng;
use serpens_data::{Circle, Dna, NeuralNet, Snake, ThingKind};

/// Outcome of one [`SnakeLogic::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeTick {
    Alive,
    /// Died during this update.
    Died,
    /// Already dead; only the fade counter moved.
    Fading,
}

impl SnakeTick {
    #[must_use]
    pub fn died(self) -> bool {
        matches!(self, Self::Died)
    }
}

pub trait SnakeLogic: Sized {
    /// Spawns a one-segment snake facing the arena center. A missing genome
    /// is replaced by a random one of the right length.
    fn spawn_with_rng<R: Rng>(
        dna: Option<Dna>,
        world: &World,
        config: &AppConfig,
        rng: &mut R,
    ) -> Result<Self>;

    /// Rebuilds the network weights and the hue from the genome.
    fn reload_from_dna(&mut self, symmetric: bool) -> Result<()>;

    /// Advances the snake by one tick.
    fn update<R: Rng>(&mut self, world: &World, config: &AppConfig, rng: &mut R)
        -> Result<SnakeTick>;

    /// Perception plus forward pass; returns the heading change for this tick.
    fn brain(&mut self, world: &World, config: &AppConfig) -> Result<f64>;

    fn perceive(&self, world: &World, config: &AppConfig) -> Result<Retina>;

    fn fitness(&self) -> f64;

    /// Opacity in `[0, 1]` derived from the fade counter.
    fn fade_alpha(&self) -> f64;
}

impl SnakeLogic for Snake {
    fn spawn_with_rng<R: Rng>(
        dna: Option<Dna>,
        world: &World,
        config: &AppConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let thr = config.snake.wall_collision_threshold;
        let r = config.world.circle_radius;
        let x = rng.gen::<f64>() * (world.width - 2.0 * thr - 2.0 * r) + thr + r;
        let y = rng.gen::<f64>() * (world.height - 2.0 * thr - 2.0 * r) + thr + r;

        let sizes = config.stage_sizes();
        let dna = match dna {
            Some(dna) => dna,
            None => {
                let len = calc_number_of_coeffs(&sizes, config.brain.symmetric) + 1;
                Dna::random_with_rng(len, rng)
            }
        };

        let mut snake = Snake {
            segments: vec![Circle::new(x, y, r)],
            dna,
            brain: NeuralNet::with_stages(&sizes),
            age: 0.0,
            angle: (world.height / 2.0 - y).atan2(world.width / 2.0 - x),
            score: 0.0,
            health: config.snake.health_bonus * 3.0 / 2.0,
            is_dead: false,
            death_fade: config.snake.death_fade,
            hue: 0.0,
        };
        snake.reload_from_dna(config.brain.symmetric)?;
        Ok(snake)
    }

    fn reload_from_dna(&mut self, symmetric: bool) -> Result<()> {
        let loaded = if symmetric {
            self.brain.load_coeffs_symmetrical(self.dna.coeffs())
        } else {
            self.brain.load_coeffs(self.dna.coeffs())
        };
        match loaded {
            Err(e) if e.is_soft() => tracing::warn!(error = %e, "Network partially reloaded"),
            other => other?,
        }
        self.hue = self.dna.hue();
        Ok(())
    }

    fn update<R: Rng>(
        &mut self,
        world: &World,
        config: &AppConfig,
        rng: &mut R,
    ) -> Result<SnakeTick> {
        let cfg = &config.snake;
        if self.is_dead {
            self.death_fade -= cfg.death_fade_step;
            return Ok(SnakeTick::Fading);
        }
        self.age += 0.1;
        let slowdown = 49.0 / (48.0 + self.segments.len() as f64);
        let turn = self.brain(world, config)?;
        self.angle = wrap_angle(self.angle + slowdown * turn);

        let thr = cfg.wall_collision_threshold;
        let head = &self.segments[0];
        let r = head.radius();
        if head.x - r < thr
            || head.x + r > world.width - thr
            || head.y - r < thr
            || head.y + r > world.height - thr
        {
            return Ok(die(self));
        }

        let speed = cfg.max_forward_speed * slowdown;
        let head = &mut self.segments[0];
        head.vx = speed * self.angle.cos();
        head.vy = speed * self.angle.sin();
        head.update_position();
        for i in 1..self.segments.len() {
            let (done, rest) = self.segments.split_at_mut(i);
            let c = &mut rest[0];
            if cfg.inertia {
                c.follow_bouncy(&done[i - 1]);
            } else {
                c.follow_static(&done[i - 1]);
            }
            c.update_position();
            for other in done.iter() {
                c.collide_static(other);
            }
            if i > 1 && done[0].is_colliding(c, 0.0) {
                return Ok(die(self));
            }
        }

        let head = self.segments[0].clone();
        let eaten = world.take_nibbles(|n| head.is_colliding(n, -cfg.eat_slack))?;
        for nibble in &eaten {
            self.score += f64::from(world.calc_value(nibble));
            let (tx, ty) = self
                .segments
                .last()
                .map_or((head.x, head.y), |tail| (tail.x, tail.y));
            self.segments
                .push(Circle::new(tx, ty, nibble.body.radius()));
        }
        let count = eaten.len() as f64;
        self.score += count * cfg.nibble_bonus;
        if !eaten.is_empty() {
            world.new_nibble(eaten.len(), rng)?;
            tracing::debug!(count = eaten.len(), len = self.segments.len(), "Snake ate");
        }

        self.health = (self.health + count * cfg.health_bonus).min(3.0 * cfg.health_bonus);
        self.health -= cfg.health_decrement;
        if self.health <= 0.0 {
            return Ok(die(self));
        }
        Ok(SnakeTick::Alive)
    }

    fn brain(&mut self, world: &World, config: &AppConfig) -> Result<f64> {
        let input = self.perceive(world, config)?.to_input(config.brain.symmetric);
        let (left, right) = match self.brain.calc(&input) {
            [a, b, ..] => (*a, *b),
            _ => return Ok(0.0),
        };
        let max = config.snake.max_angular_speed;
        let turn = 10.0 * max / SIGNAL_MULTIPLIER * (left - right);
        Ok(turn.clamp(-max, max))
    }

    fn perceive(&self, world: &World, config: &AppConfig) -> Result<Retina> {
        let cfg = &config.snake;
        let head = self.head();
        let mut retina = Retina::new(cfg);
        world.with_nibbles(|nibbles| {
            for n in nibbles {
                retina.register(head, self.angle, &n.body, ThingKind::Nibble);
            }
        })?;
        for segment in self.segments.iter().skip(1) {
            retina.register(head, self.angle, segment, ThingKind::Snake);
        }
        for wall in wall_samples(world.width, world.height, wall_step(cfg)) {
            retina.register(head, self.angle, &wall, ThingKind::Wall);
        }
        Ok(retina)
    }

    fn fitness(&self) -> f64 {
        self.score + self.health / 4.0
    }

    fn fade_alpha(&self) -> f64 {
        (self.death_fade / 255.0).clamp(0.0, 1.0)
    }
}

/// Marks the snake dead and halves its score.
fn die(snake: &mut Snake) -> SnakeTick {
    snake.is_dead = true;
    snake.score /= 2.0;
    tracing::debug!(score = snake.score, len = snake.segments.len(), "Snake died");
    SnakeTick::Died
}
