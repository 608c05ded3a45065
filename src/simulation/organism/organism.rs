//! Organism state and the per-tick lifecycle shared by both species.
//!
//! Every living organism runs the same pipeline each tick: age, metabolize,
//! advance its gestation, sense, decide, turn, move and finally look for food
//! within reach. Anything that touches another entity (a birth, a plant or
//! prey in reach) is returned to the caller instead of applied here, so the
//! pipeline can run for many organisms in parallel.

use std::f32::consts::TAU;
use std::sync::Arc;

use geo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::brain::{MotorSignals, NeuralController};
use super::super::color::Color;
use super::super::geometric_utils::wrap_around;
use super::super::locatable::Locatable;
use super::super::params::{SimConfig, SpeciesParams};
use super::sense::{SenseVector, Surroundings};
use super::species::Species;

/// Why an organism died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Reached its lifespan.
    OldAge,
    /// Energy dropped to zero or below.
    Starvation,
    /// Killed by a carnivore.
    Eaten,
}

/// A birth due this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Birth {
    /// Species of the child.
    pub species: Species,
    /// Where the child appears (parent position plus jitter, wrapped).
    pub pos: Point<f32>,
}

/// Effects of one organism update on the rest of the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Offspring delivered this tick, if gestation finished.
    pub birth: Option<Birth>,
    /// Food in reach after moving: plant indices for herbivores, herbivore
    /// indices for carnivores.
    pub reachable: Vec<usize>,
}

/// A simulated organism with a neural controller.
#[derive(Debug, Clone)]
pub struct Organism {
    /// Identifier, unique within the species.
    pub id: u64,
    /// Species tag.
    pub species: Species,
    /// Heritable color, visible to others.
    pub color: Color,
    /// Position on the field.
    pub pos: Point<f32>,
    /// Facing angle in radians, kept in `[0, 2π)`.
    pub rot: f32,
    /// Speed chosen on the last tick.
    pub speed: f32,
    /// Body radius.
    pub radius: f32,
    /// Current energy.
    pub energy: f32,
    /// Ticks since birth.
    pub age: u32,
    /// Age at which the organism dies of old age.
    pub lifespan: u32,
    /// 1 for seed individuals, parent's generation + 1 otherwise.
    pub generation: u32,
    /// Whether an offspring is on the way.
    pub gestating: bool,
    /// Ticks until the pending offspring is born.
    pub gestation_timer: u32,
    /// Species of the pending offspring.
    pub pending_offspring: Option<Species>,
    /// Controller mapping senses to motion.
    pub brain: NeuralController,
    death: Option<DeathCause>,
    last_sense: SenseVector,
    params: Arc<SpeciesParams>,
}

impl Organism {
    /// Creates a seed individual with random color, facing, energy and controller.
    pub fn new_seed<R: Rng + ?Sized>(
        species: Species,
        id: u64,
        params: Arc<SpeciesParams>,
        pos: Point<f32>,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            species,
            color: Color::random_in(&params.color, rng),
            pos,
            rot: rng.random_range(0.0..TAU),
            speed: 0.0,
            radius: params.radius,
            energy: params.start_energy.sample(rng),
            age: 0,
            lifespan: params.lifespan.sample(rng),
            generation: 1,
            gestating: false,
            gestation_timer: 0,
            pending_offspring: None,
            brain: NeuralController::new_random(params.hidden_size),
            death: None,
            last_sense: SenseVector::default(),
            params,
        }
    }

    /// Creates the child of `parent`.
    ///
    /// Color and controller are inherited with mutation; energy is the
    /// species birth energy and facing is fresh.
    pub fn offspring<R: Rng + ?Sized>(
        parent: &Organism,
        id: u64,
        pos: Point<f32>,
        mutation_rate: f32,
        rng: &mut R,
    ) -> Self {
        let params = Arc::clone(&parent.params);
        Self {
            id,
            species: parent.species,
            color: parent.color.mutated(params.color_mutation, rng),
            pos,
            rot: rng.random_range(0.0..TAU),
            speed: 0.0,
            radius: params.radius,
            energy: params.birth_energy,
            age: 0,
            lifespan: params.lifespan.sample(rng),
            generation: parent.generation + 1,
            gestating: false,
            gestation_timer: 0,
            pending_offspring: None,
            brain: parent.brain.inherit(mutation_rate),
            death: None,
            last_sense: SenseVector::default(),
            params,
        }
    }

    /// Species constants this organism was built with.
    pub fn params(&self) -> &SpeciesParams {
        &self.params
    }

    /// Checks if the organism is alive.
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Why the organism died, or `None` while it lives.
    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    /// Controller input computed on the last update.
    pub fn sense_vector(&self) -> SenseVector {
        self.last_sense
    }

    /// Kills the organism. Later calls are ignored so the first cause sticks.
    pub fn die(&mut self, cause: DeathCause) {
        if self.death.is_some() {
            return;
        }
        self.death = Some(cause);
        self.gestating = false;
        self.gestation_timer = 0;
        self.pending_offspring = None;
        self.speed = 0.0;
        debug!(
            species = %self.species,
            id = self.id,
            ?cause,
            age = self.age,
            generation = self.generation,
            "organism died"
        );
    }

    /// Adds energy from food and starts a gestation when the energy passes
    /// the reproduction threshold.
    ///
    /// Returns `true` if this gain started a gestation. An organism that is
    /// already gestating keeps the energy and never starts a second one.
    pub fn gain_energy(&mut self, amount: f32) -> bool {
        self.energy += amount;
        let threshold = self.params.reproduction_threshold;
        if self.gestating || self.energy <= threshold {
            return false;
        }
        self.energy -= threshold - self.params.reproduction_return;
        self.gestating = true;
        self.gestation_timer = self.params.gestation_period;
        self.pending_offspring = Some(self.species);
        true
    }

    /// Runs one tick of the lifecycle.
    ///
    /// Dead organisms do nothing. Sensing reads `around`, which reflects the
    /// world at the start of the tick.
    pub fn step(&mut self, config: &SimConfig, around: &Surroundings<'_>) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if !self.is_alive() {
            return outcome;
        }

        self.age += 1;
        if self.age >= self.lifespan {
            self.die(DeathCause::OldAge);
            return outcome;
        }

        self.energy -= self.params.metabolism;
        if self.energy <= 0.0 {
            self.die(DeathCause::Starvation);
            return outcome;
        }

        outcome.birth = self.advance_gestation(config);

        self.last_sense = self.species.sense(self, around);
        let signals = self.brain.forward(&self.last_sense.0);
        self.actuate(signals);
        self.translate(config.field_width, config.field_height);

        if !self.gestating {
            outcome.reachable = self.species.reachable(self, around);
        }
        outcome
    }

    fn advance_gestation(&mut self, config: &SimConfig) -> Option<Birth> {
        if !self.gestating {
            return None;
        }
        self.gestation_timer = self.gestation_timer.saturating_sub(1);
        if self.gestation_timer > 0 {
            return None;
        }
        self.gestating = false;
        let species = self.pending_offspring.take()?;

        let mut rng = rand::rng();
        let jitter = config.birth_jitter;
        let offset = Point::new(
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
        );
        Some(Birth {
            species,
            pos: wrap_around(self.pos + offset, config.field_width, config.field_height),
        })
    }

    /// Applies motor signals: turn first, then pick a speed. Both cost energy.
    pub fn actuate(&mut self, signals: MotorSignals) {
        let params = &self.params;
        if signals.turn.abs() > params.rotate_threshold {
            let delta = signals.turn / params.rotate_multiplier;
            self.rot = (self.rot + delta).rem_euclid(TAU);
            self.energy -= delta.abs() / params.rotate_cost_divisor;
        }

        if signals.movement.abs() > params.speed_threshold {
            let multiplier = if signals.movement > 0.0 {
                params.forward_multiplier
            } else {
                params.reverse_multiplier
            };
            self.speed = signals.movement * multiplier;
            self.energy -= self.speed.abs() / params.move_cost_divisor;
        } else {
            self.speed = 0.0;
        }
    }

    /// Moves along the facing direction at the current speed, wrapping at the edges.
    pub fn translate(&mut self, width: f32, height: f32) {
        let step = Point::new(self.rot.cos(), self.rot.sin()) * self.speed;
        self.pos = wrap_around(self.pos + step, width, height);
    }
}

impl Locatable for Organism {
    fn pos(&self) -> Point<f32> {
        self.pos
    }

    fn is_present(&self) -> bool {
        self.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn herbivore() -> Organism {
        let params = Arc::new(SpeciesParams::herbivore());
        let mut organism = Organism::new_seed(
            Species::Herbivore,
            1,
            params,
            Point::new(500.0, 500.0),
            &mut rand::rng(),
        );
        organism.rot = 0.0;
        organism.energy = 100.0;
        organism
    }

    #[test]
    fn seed_draws_from_species_ranges() {
        let organism = herbivore();
        assert_eq!(organism.generation, 1);
        assert!((4000..=8000).contains(&organism.lifespan));
        assert!(organism.color.0[2] >= 192);
        assert_eq!(organism.color.0[0], 0);
        assert_eq!(organism.brain.hidden_size(), 6);
        assert!(organism.is_alive());
    }

    #[test]
    fn first_death_cause_sticks() {
        let mut organism = herbivore();
        organism.gestating = true;
        organism.die(DeathCause::Starvation);
        organism.die(DeathCause::Eaten);
        assert_eq!(organism.death_cause(), Some(DeathCause::Starvation));
        assert!(!organism.gestating);
    }

    #[test]
    fn crossing_threshold_starts_gestation_once() {
        let mut organism = herbivore();
        organism.energy = 290.0;
        assert!(organism.gain_energy(20.0));
        // 310 - (300 - 80)
        assert!((organism.energy - 90.0).abs() < 1e-4);
        assert_eq!(organism.gestation_timer, 250);
        assert_eq!(organism.pending_offspring, Some(Species::Herbivore));

        organism.energy = 400.0;
        assert!(!organism.gain_energy(20.0));
        assert_eq!(organism.energy, 420.0);
    }

    #[test]
    fn weak_signals_are_ignored() {
        let mut organism = herbivore();
        organism.actuate(MotorSignals {
            turn: 0.3,
            movement: 0.1,
        });
        assert_eq!(organism.rot, 0.0);
        assert_eq!(organism.speed, 0.0);
        assert_eq!(organism.energy, 100.0);
    }

    #[test]
    fn turning_and_moving_cost_energy() {
        let mut organism = herbivore();
        organism.actuate(MotorSignals {
            turn: 0.7,
            movement: -0.5,
        });
        assert!((organism.rot - 0.5).abs() < 1e-6);
        assert!((organism.speed + 0.6).abs() < 1e-6);
        let expected = 100.0 - 0.5 / 240.0 - 0.6 / 160.0;
        assert!((organism.energy - expected).abs() < 1e-4);
    }

    #[test]
    fn negative_turn_wraps_facing() {
        let mut organism = herbivore();
        organism.actuate(MotorSignals {
            turn: -1.0,
            movement: 0.0,
        });
        assert!(organism.rot > 0.0 && organism.rot < TAU);
        assert!((organism.rot - (TAU - 1.0 / 1.4)).abs() < 1e-5);
    }

    #[test]
    fn translation_wraps_at_edges() {
        let mut organism = herbivore();
        organism.pos = Point::new(2399.0, 10.0);
        organism.speed = 2.8;
        organism.translate(2400.0, 2400.0);
        assert!((organism.pos.x() - 1.8).abs() < 1e-3);
        assert_eq!(organism.pos.y(), 10.0);
    }

    #[test]
    fn offspring_inherits_with_mutation() {
        let parent = herbivore();
        let child = Organism::offspring(&parent, 7, Point::new(1.0, 2.0), 0.05, &mut rand::rng());
        assert_eq!(child.id, 7);
        assert_eq!(child.generation, 2);
        assert_eq!(child.energy, 70.0);
        assert_eq!(child.species, Species::Herbivore);
        for (c, p) in child.color.0.iter().zip(parent.color.0) {
            assert!(c.abs_diff(p) <= 24);
        }
        assert_eq!(child.brain.hidden_size(), parent.brain.hidden_size());
    }
}
