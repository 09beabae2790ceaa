mod common;

use serpens_core::network::calc_number_of_coeffs;
use serpens_lib::model::config::{AppConfig, BrainConfig};
use serpens_lib::model::state::{Dna, NeuralNet};
use serpens_lib::model::world::World;
use serpens_lib::{NetworkLogic, SnakeLogic};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One bin per side gives an input stage of 2 × 3 = 6.
fn small_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.snake.fov_divisions = 1;
    config.brain = BrainConfig {
        hidden_layers: vec![4],
        symmetric: false,
    };
    config
}

#[test]
fn test_small_topology_coefficient_count() {
    let config = small_config();
    assert_eq!(config.stage_sizes(), vec![6, 4, 2]);
    assert_eq!(calc_number_of_coeffs(&[6, 4, 2], false), 4 * 7 + 2 * 5);
    assert_eq!(calc_number_of_coeffs(&[6, 4, 2], false), 38);
    assert_eq!(common::genome_len(&config), 39);
}

#[test]
fn test_load_fills_every_weight_exactly() {
    let mut net = NeuralNet::with_stages(&[6, 4, 2]);
    let coeffs: Vec<i8> = (1..=38).collect();
    net.load_coeffs(&coeffs).unwrap();

    assert_eq!(net.stages[1].coeffs, coeffs[..28].to_vec());
    assert_eq!(net.stages[2].coeffs, coeffs[28..].to_vec());
    assert!(net.stages.iter().skip(1).all(|s| !s.coeffs.contains(&0)));

    let mut short = NeuralNet::with_stages(&[6, 4, 2]);
    assert!(short.load_coeffs(&coeffs[..37]).is_err());
    assert!(short.stages.iter().all(|s| s.coeffs.iter().all(|&c| c == 0)));
}

#[test]
fn test_spawned_genome_matches_topology() {
    let config = small_config();
    let world = World::new(&config.world);
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let snake = serpens_lib::model::state::Snake::spawn_with_rng(None, &world, &config, &mut rng)
        .unwrap();
    assert_eq!(snake.dna.len(), 39);
    assert_eq!(snake.brain.stage_sizes(), vec![6, 4, 2]);
    assert_eq!(snake.brain.stages[1].coeffs, snake.dna.data[..28].to_vec());
    assert_eq!(snake.brain.stages[2].coeffs, snake.dna.data[28..38].to_vec());
}

#[test]
fn test_symmetric_genome_is_half_size() {
    let mut config = small_config();
    config.brain.symmetric = true;
    let world = World::new(&config.world);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let snake = serpens_lib::model::state::Snake::spawn_with_rng(None, &world, &config, &mut rng)
        .unwrap();
    assert_eq!(snake.dna.len(), 14 + 5 + 1);
    let stage = &snake.brain.stages[1];
    assert_eq!(stage.coeff(0, 0), stage.coeff(3, 6));
    assert_eq!(stage.coeff(1, 2), stage.coeff(2, 4));
}

#[test]
fn test_forward_pass_is_repeatable() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let dna = <Dna as serpens_lib::DnaLogic>::random_with_rng(38, &mut rng);
    let mut net = NeuralNet::with_stages(&[6, 4, 2]);
    net.load_coeffs(&dna.data).unwrap();
    let input = [0.1, 0.0, 0.05, 0.02, 0.0, 0.08];
    let first = net.calc(&input).to_vec();
    let second = net.calc(&input).to_vec();
    assert_eq!(first, second);
    assert!(first.iter().all(|&o| o > 0.0 && o <= 0.1));
}
