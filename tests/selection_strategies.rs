mod common;

use common::SimulationBuilder;
use serpens_lib::model::config::CrossoverKind;
use serpens_lib::model::state::Command;

fn population(n: usize) -> SimulationBuilder {
    (0..n).fold(SimulationBuilder::new().with_seed(11), |b, _| {
        b.with_random_snake()
    })
}

#[test]
fn test_mating_pool_favors_dominant_snake() {
    let mut sim = population(5).build();
    for (i, snake) in sim.snakes.iter_mut().enumerate() {
        snake.health = 0.0;
        snake.score = if i == 3 { 80.0 } else { 0.0 };
    }

    let pool = sim.mating_pool();
    assert!(pool.contains(&3));
    assert_eq!(pool.len(), 100, "The fittest snake gets the full scale");
    assert!(pool.iter().all(|&i| i == 3));
}

#[test]
fn test_mating_pool_weights_by_relative_fitness() {
    let mut sim = population(3).build();
    let scores = [100.0, 50.0, 9.0];
    for (snake, score) in sim.snakes.iter_mut().zip(scores) {
        snake.health = 0.0;
        snake.score = score;
    }

    let pool = sim.mating_pool();
    let count = |i: usize| pool.iter().filter(|&&p| p == i).count();
    assert_eq!(count(0), 100);
    assert_eq!(count(1), 50);
    assert_eq!(count(2), 9);
}

#[test]
fn test_all_zero_fitness_still_breeds() {
    let mut sim = population(4).build();
    for snake in &mut sim.snakes {
        snake.health = 0.0;
        snake.score = 0.0;
    }
    assert_eq!(sim.mating_pool(), vec![0, 1, 2, 3]);

    sim.current_max_fitness = 0.0;
    sim.new_snake().unwrap();
    assert_eq!(sim.snakes.len(), 5);
    assert!(sim.mutation_rate.is_finite());
    assert_eq!(sim.snakes[4].dna.len(), sim.snakes[0].dna.len());
}

#[test]
fn test_mutation_rate_follows_peak_fitness() {
    let mut sim = population(2).build();
    sim.current_max_fitness = 40.0;
    sim.new_snake().unwrap();
    assert_eq!(sim.mutation_rate, 10.0 / 40.0);
}

#[test]
fn test_every_crossover_kind_breeds_valid_children() {
    for kind in [
        CrossoverKind::Noise,
        CrossoverKind::Bitwise,
        CrossoverKind::Bytewise,
    ] {
        let mut sim = population(3)
            .with_config(|c| c.evolution.crossover = kind)
            .build();
        let len = sim.snakes[0].dna.len();
        for _ in 0..5 {
            sim.new_snake().unwrap();
        }
        assert_eq!(sim.snakes.len(), 8);
        assert!(sim.snakes.iter().all(|s| s.dna.len() == len), "{kind:?}");
    }
}

#[test]
fn test_generation_advances_per_birth() {
    let mut sim = SimulationBuilder::new()
        .with_config(|c| {
            c.evolution.population_size = 4;
            c.snake.health_decrement = 20.0;
        })
        .with_random_snake()
        .with_random_snake()
        .build();

    // Health 15 minus 20 starves both snakes on the first update.
    let report = sim.tick(Command::None).unwrap();
    assert_eq!(report.deaths, 2);
    assert_eq!(report.births, 2);
    assert_eq!(sim.generation, 0.5);
    assert_eq!(sim.metrics.births(), 2);
    assert_eq!(sim.metrics.deaths(), 2);
}
