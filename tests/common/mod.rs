use serpens_core::network::calc_number_of_coeffs;
use serpens_lib::model::config::AppConfig;
use serpens_lib::model::evolution::Simulation;
use serpens_lib::model::state::{Circle, Dna, Snake};
use serpens_lib::model::world::World;
use serpens_lib::SnakeLogic;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Builds a [`Simulation`] with a hand-placed population and nibbles.
///
/// Snakes added here skip the automatic seeding of the first tick, and the
/// builder starts without any nibbles.
#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    snakes: Vec<SnakeSpec>,
    nibbles: Vec<Circle>,
}

#[allow(dead_code)]
enum SnakeSpec {
    Random,
    Straight { x: f64, y: f64, angle: f64 },
    Ready(Snake),
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.width = 600.0;
        config.world.height = 400.0;
        config.world.seed = Some(0);
        Self {
            config,
            snakes: Vec::new(),
            nibbles: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Adds a snake with a random genome at a random spot.
    pub fn with_random_snake(mut self) -> Self {
        self.snakes.push(SnakeSpec::Random);
        self
    }

    /// Adds a zero-weight snake, which never turns.
    pub fn with_straight_snake(mut self, x: f64, y: f64, angle: f64) -> Self {
        self.snakes.push(SnakeSpec::Straight { x, y, angle });
        self
    }

    pub fn with_snake(mut self, snake: Snake) -> Self {
        self.snakes.push(SnakeSpec::Ready(snake));
        self
    }

    pub fn with_nibble(mut self, x: f64, y: f64) -> Self {
        let r = self.config.world.circle_radius;
        self.nibbles.push(Circle::new(x, y, r));
        self
    }

    pub fn build(self) -> Simulation {
        let mut sim = Simulation::new(self.config.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.world.seed.unwrap_or(0));
        for entry in self.snakes {
            let snake = match entry {
                SnakeSpec::Random => {
                    Snake::spawn_with_rng(None, &sim.world, &self.config, &mut rng)
                        .expect("Failed to spawn snake in test builder")
                }
                SnakeSpec::Straight { x, y, angle } => {
                    straight_snake(&sim.world, &self.config, x, y, angle)
                }
                SnakeSpec::Ready(snake) => snake,
            };
            sim.snakes.push(snake);
        }
        for body in self.nibbles {
            sim.world
                .place_nibble(body)
                .expect("Failed to place nibble in test builder");
        }
        sim
    }
}

/// Genome length for the configured topology, trait byte included.
#[allow(dead_code)]
pub fn genome_len(config: &AppConfig) -> usize {
    calc_number_of_coeffs(&config.stage_sizes(), config.brain.symmetric) + 1
}

/// A one-segment snake with all-zero weights at `(x, y)` heading `angle`.
#[allow(dead_code)]
pub fn straight_snake(world: &World, config: &AppConfig, x: f64, y: f64, angle: f64) -> Snake {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let dna = Dna::zeroed(genome_len(config));
    let mut snake = Snake::spawn_with_rng(Some(dna), world, config, &mut rng)
        .expect("Failed to spawn straight snake");
    snake.segments[0].x = x;
    snake.segments[0].y = y;
    snake.angle = angle;
    snake
}
