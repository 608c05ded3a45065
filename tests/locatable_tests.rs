#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::sync::Arc;

use evovision::simulation::color::Color;
use evovision::simulation::locatable::Locatable;
use evovision::simulation::organism::{DeathCause, Organism, Species};
use evovision::simulation::params::{PlantParams, SpeciesParams};
use evovision::simulation::plant::Plant;
use evovision::simulation::spatial::SpatialIndex;
use geo::Point;

fn plant_at(x: f32, y: f32) -> Plant {
    Plant::new(0, Point::new(x, y), Color::new(0, 200, 0), &PlantParams::default(), &mut rand::rng())
}

fn carnivore_at(x: f32, y: f32) -> Organism {
    Organism::new_seed(
        Species::Carnivore,
        1,
        Arc::new(SpeciesParams::carnivore()),
        Point::new(x, y),
        &mut rand::rng(),
    )
}

#[test]
fn test_plant_locatable() {
    let mut plant = plant_at(10.0, 20.0);
    assert_eq!(plant.pos(), Point::new(10.0, 20.0));
    assert!(plant.is_present());

    plant.consume();
    assert!(!plant.is_present());
}

#[test]
fn test_organism_locatable() {
    let mut carnivore = carnivore_at(300.0, 40.0);
    assert_eq!(carnivore.pos(), Point::new(300.0, 40.0));
    assert!(carnivore.is_present());

    carnivore.die(DeathCause::OldAge);
    assert!(!carnivore.is_present());
}

#[test]
fn test_index_over_plants_skips_eaten_ones() {
    let mut plants = vec![plant_at(10.0, 10.0), plant_at(30.0, 10.0), plant_at(450.0, 450.0)];
    plants[1].consume();

    let index = SpatialIndex::build(&plants, 200.0);

    assert_eq!(index.len(), 2);
    let near: Vec<usize> = index
        .query_neighborhood(Point::new(0.0, 0.0))
        .map(|entry| entry.idx)
        .collect();
    assert_eq!(near, vec![0]);
    assert_eq!(index.query(index.cell(Point::new(450.0, 450.0)))[0].idx, 2);
}

#[test]
fn test_index_keeps_build_time_positions() {
    let mut organisms = vec![carnivore_at(100.0, 100.0)];
    let index = SpatialIndex::build(&organisms, 200.0);

    organisms[0].pos = Point::new(900.0, 900.0);

    let entry = index.query((0, 0))[0];
    assert_eq!(entry.pos, Point::new(100.0, 100.0));
    assert!(index.query_neighborhood(Point::new(900.0, 900.0)).next().is_none());
}

#[test]
fn test_neighborhood_does_not_wrap_across_the_seam() {
    let plants = vec![plant_at(2390.0, 100.0)];
    let index = SpatialIndex::build(&plants, 200.0);
    assert_eq!(index.query_neighborhood(Point::new(5.0, 100.0)).count(), 0);
}
