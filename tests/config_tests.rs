#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evovision::simulation::ecosystem::Ecosystem;
use evovision::simulation::error::ConfigError;
use evovision::simulation::organism::Species;
use evovision::simulation::params::SimConfig;

#[test]
fn test_partial_json_fills_in_defaults() {
    let config: SimConfig = serde_json::from_str(
        r#"{ "field_width": 1200.0, "start_plants": 10, "plant": { "spread_tries": 3 } }"#,
    )
    .unwrap();

    assert_eq!(config.field_width, 1200.0);
    assert_eq!(config.field_height, 2400.0);
    assert_eq!(config.start_plants, 10);
    assert_eq!(config.plant.spread_tries, 3);
    assert_eq!(config.plant.spread_min, 20.0);
    assert_eq!(config.herbivore.hidden_size, 6);
    assert_eq!(config.carnivore.hidden_size, 10);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_partial_species_table_keeps_its_own_defaults() {
    let config: SimConfig = serde_json::from_str(
        r#"{ "herbivore": { "vision_length": 150.0 }, "carnivore": { "radius": 18.0 } }"#,
    )
    .unwrap();

    assert_eq!(config.herbivore.vision_length, 150.0);
    assert_eq!(config.herbivore.hidden_size, 6);
    assert_eq!(config.herbivore.reach_divisor, 2.0);
    assert_eq!(config.carnivore.radius, 18.0);
    assert_eq!(config.carnivore.vision_length, 200.0);
    assert_eq!(config.carnivore.reach_divisor, 1.2);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_species_table_with_wrong_type_fails_to_load() {
    let result = serde_json::from_str::<SimConfig>(r#"{ "herbivore": { "radius": "big" } }"#);
    assert!(result.is_err());
}

#[test]
fn test_non_finite_values_fail_at_startup() {
    let config = SimConfig {
        birth_jitter: f32::INFINITY,
        ..SimConfig::default()
    };
    assert!(matches!(
        Ecosystem::empty(config),
        Err(ConfigError::NotFinite { name: "birth_jitter", .. })
    ));

    let config = SimConfig {
        mutation_rate: f32::NAN,
        ..SimConfig::default()
    };
    assert!(matches!(
        Ecosystem::empty(config),
        Err(ConfigError::NotFinite { name: "mutation_rate", .. })
    ));

    let mut config = SimConfig::default();
    config.carnivore.vision_length = f32::NAN;
    assert!(matches!(
        Ecosystem::empty(config),
        Err(ConfigError::CellSmallerThanVision { species: Species::Carnivore, .. })
    ));
}

#[test]
fn test_species_tables_are_distinct() {
    let config = SimConfig::default();
    assert_eq!(config.species(Species::Herbivore).reproduction_return, 80.0);
    assert_eq!(config.species(Species::Carnivore).reproduction_return, 120.0);
    assert_eq!(config.species(Species::Carnivore).feeding_gain, 0.275);
}

#[test]
fn test_spread_separation_must_fit_in_a_cell() {
    let mut config = SimConfig::default();
    config.plant.spread_min = 250.0;
    assert!(matches!(
        Ecosystem::empty(config),
        Err(ConfigError::CellSmallerThanSpread { .. })
    ));
}

#[test]
fn test_non_positive_field_is_rejected() {
    let config = SimConfig {
        field_height: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidField { .. })
    ));
}

#[test]
fn test_errors_name_the_problem() {
    let config = SimConfig {
        cell_size: 120.0,
        ..SimConfig::default()
    };
    let message = config.validate().unwrap_err().to_string();
    assert!(message.contains("herbivore"));
    assert!(message.contains("140"));
}

#[test]
fn test_small_world_from_config() {
    let config = SimConfig {
        start_plants: 30,
        start_herbivores: 5,
        start_carnivores: 2,
        ..SimConfig::default()
    };
    let mut world = Ecosystem::new(config).unwrap();
    let census = world.advance_one_tick();
    assert_eq!(census.tick, 1);
    assert!(census.plants >= 25);
    assert!(census.herbivores + census.herbivore_deaths.total() as usize >= 5);
}
