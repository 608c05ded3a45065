//! Main ecosystem simulation with parallel organism updates.
//!
//! One tick runs in a fixed order:
//! - rebuild the three spatial indices from the tick-start state
//! - let plants spread
//! - update herbivores in parallel, then apply their births and meals in list order
//! - update carnivores the same way
//! - sweep eaten plants and take a census
//!
//! Every sensing query of a tick reads the indices built at its start.

use std::sync::{Mutex, PoisonError};

use geo::Point;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::census::{Census, CensusHistory, Mortality};
use super::color::Color;
use super::error::ConfigError;
use super::events::{self, Applied, EventQueue, EventTargets};
use super::geometric_utils::distance;
use super::organism::{Layer, Organism, Species, Surroundings};
use super::params::SimConfig;
use super::plant::Plant;
use super::population::Population;
use super::spatial::SpatialIndex;

/// The whole simulated world.
#[derive(Debug, Clone)]
pub struct Ecosystem {
    config: SimConfig,
    plants: Vec<Plant>,
    herbivores: Population,
    carnivores: Population,
    tick: u64,
    next_plant_id: u64,
    retired: Mortality,
    history: CensusHistory,
}

impl Ecosystem {
    /// Creates a world seeded with the configured starting populations.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let mut ecosystem = Self::empty(config)?;
        let mut rng = rand::rng();
        let (width, height) = ecosystem.field();

        for _ in 0..ecosystem.config.start_plants {
            let pos = random_point(&mut rng, ecosystem.config.plant_seed_margin, width, height);
            let id = ecosystem.take_plant_id();
            let plant = Plant::new_random(id, pos, &ecosystem.config.plant, &mut rng);
            ecosystem.plants.push(plant);
        }

        let margin = ecosystem.config.organism_seed_margin;
        for species in Species::ALL {
            let count = match species {
                Species::Herbivore => ecosystem.config.start_herbivores,
                Species::Carnivore => ecosystem.config.start_carnivores,
            };
            let population = ecosystem.population_mut(species);
            for _ in 0..count {
                population.spawn_seed(random_point(&mut rng, margin, width, height), &mut rng);
            }
        }

        info!(
            plants = ecosystem.plants.len(),
            herbivores = ecosystem.herbivores.len(),
            carnivores = ecosystem.carnivores.len(),
            width,
            height,
            "seeded ecosystem"
        );
        Ok(ecosystem)
    }

    /// Creates a world with no plants or organisms.
    pub fn empty(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            herbivores: Population::new(Species::Herbivore, config.herbivore.clone()),
            carnivores: Population::new(Species::Carnivore, config.carnivore.clone()),
            history: CensusHistory::new(config.graph_memory),
            plants: Vec::new(),
            tick: 0,
            next_plant_id: 1,
            retired: Mortality::default(),
            config,
        })
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Field width and height.
    pub fn field(&self) -> (f32, f32) {
        (self.config.field_width, self.config.field_height)
    }

    /// All plants.
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// The herbivore population.
    pub fn herbivores(&self) -> &Population {
        &self.herbivores
    }

    /// The carnivore population.
    pub fn carnivores(&self) -> &Population {
        &self.carnivores
    }

    /// The population of one species.
    pub fn population(&self, species: Species) -> &Population {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Carnivore => &self.carnivores,
        }
    }

    /// Mutable access to the population of one species.
    pub fn population_mut(&mut self, species: Species) -> &mut Population {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Carnivore => &mut self.carnivores,
        }
    }

    /// Censuses of the most recent ticks.
    pub fn history(&self) -> &CensusHistory {
        &self.history
    }

    /// Deaths of organisms already evicted by [`Ecosystem::retire_dead`].
    pub fn retired(&self) -> &Mortality {
        &self.retired
    }

    fn take_plant_id(&mut self) -> u64 {
        let id = self.next_plant_id;
        self.next_plant_id += 1;
        id
    }

    /// Places a plant with the given color.
    pub fn add_plant(&mut self, pos: Point<f32>, color: Color) -> &mut Plant {
        let id = self.take_plant_id();
        let plant = Plant::new(id, pos, color, &self.config.plant, &mut rand::rng());
        self.plants.push(plant);
        let last = self.plants.len() - 1;
        &mut self.plants[last]
    }

    /// Places a seed organism of `species`.
    pub fn spawn(&mut self, species: Species, pos: Point<f32>) -> &mut Organism {
        self.population_mut(species).spawn_seed(pos, &mut rand::rng())
    }

    /// Advances the world by one tick and returns the census taken after it.
    pub fn advance_one_tick(&mut self) -> Census {
        let mut rng = rand::rng();
        let cell_size = self.config.cell_size;
        let plant_index = SpatialIndex::build(&self.plants, cell_size);
        let herbivore_index = SpatialIndex::build(self.herbivores.members(), cell_size);
        let carnivore_index = SpatialIndex::build(self.carnivores.members(), cell_size);

        let sprouted = self.spread_plants(&plant_index, &mut rng);

        let queue = update_population(
            &mut self.herbivores,
            &self.config,
            &Surroundings {
                plants: Layer::new(&self.plants, &plant_index),
                other_species: Layer::new(self.carnivores.members(), &carnivore_index),
            },
        );
        let grazing = self.apply(Species::Herbivore, queue, &mut rng);

        let queue = update_population(
            &mut self.carnivores,
            &self.config,
            &Surroundings {
                plants: Layer::new(&self.plants, &plant_index),
                other_species: Layer::new(self.herbivores.members(), &herbivore_index),
            },
        );
        let hunting = self.apply(Species::Carnivore, queue, &mut rng);

        self.plants.retain(|plant| !plant.is_consumed());
        self.tick += 1;

        let census = self.census();
        if let Some(previous) = self.history.latest() {
            report_extinctions(previous, &census);
        }
        self.history.push(census);

        debug!(
            tick = self.tick,
            sprouted,
            herbivore_births = grazing.births,
            plants_eaten = grazing.meals,
            carnivore_births = hunting.births,
            prey_killed = hunting.meals,
            "tick complete"
        );
        census
    }

    /// Lets every plant run its spread countdown.
    ///
    /// Candidates are checked against the plants indexed at the start of the
    /// tick plus the children spawned earlier in this pass. Returns the number
    /// of new plants.
    fn spread_plants<R: Rng + ?Sized>(&mut self, index: &SpatialIndex, rng: &mut R) -> usize {
        let field = self.field();
        let params = &self.config.plant;
        let min = params.spread_min;
        let mut sprouts: Vec<Plant> = Vec::new();

        for plant in &mut self.plants {
            let is_clear = |candidate: Point<f32>| {
                index
                    .query_neighborhood(candidate)
                    .all(|entry| distance(entry.pos, candidate) >= min)
                    && sprouts.iter().all(|s| distance(s.pos, candidate) >= min)
            };
            if let Some(child) = plant.try_spread(self.next_plant_id, params, field, is_clear, rng) {
                self.next_plant_id += 1;
                sprouts.push(child);
            }
        }

        let sprouted = sprouts.len();
        self.plants.extend(sprouts);
        sprouted
    }

    fn apply<R: Rng + ?Sized>(&mut self, source: Species, queue: EventQueue, rng: &mut R) -> Applied {
        let mut targets = EventTargets {
            plants: &mut self.plants,
            herbivores: &mut self.herbivores,
            carnivores: &mut self.carnivores,
            mutation_rate: self.config.mutation_rate,
        };
        events::apply_events(source, &mut targets, queue, rng)
    }

    /// Removes dead organisms from both populations.
    ///
    /// Their death causes are kept in the cumulative mortality counts first.
    /// Returns the number of organisms removed.
    pub fn retire_dead(&mut self) -> usize {
        let mut removed = 0;
        for species in Species::ALL {
            let dead = self.population_mut(species).retire_dead();
            for organism in &dead {
                self.retired.record(organism);
            }
            removed += dead.len();
        }
        if removed > 0 {
            debug!(removed, tick = self.tick, "retired dead organisms");
        }
        removed
    }

    /// Counts the current state.
    pub fn census(&self) -> Census {
        let plants = self.plants.iter().filter(|p| !p.is_consumed()).count();
        Census::take(
            self.tick,
            plants,
            self.herbivores.members(),
            self.carnivores.members(),
            &self.retired,
        )
    }

    /// Whether the ecology has broken down: a species or all plants are gone.
    ///
    /// Used by the runner to end a run early. The world itself keeps advancing
    /// after a collapse.
    pub fn is_collapsed(&self) -> bool {
        let census = self.census();
        census.plants == 0 || census.herbivores == 0 || census.carnivores == 0
    }
}

/// Runs the self-contained part of every organism update in parallel and
/// collects what the updates do to other entities.
fn update_population(
    population: &mut Population,
    config: &SimConfig,
    around: &Surroundings<'_>,
) -> EventQueue {
    let queue = Mutex::new(EventQueue::new());

    // parallel phase, only apply updates to the organism itself
    population
        .members_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, organism)| {
            let outcome = organism.step(config, around);
            if outcome.birth.is_none() && outcome.reachable.is_empty() {
                return;
            }
            queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(idx, outcome);
        });

    queue.into_inner().unwrap_or_else(PoisonError::into_inner)
}

fn report_extinctions(previous: &Census, current: &Census) {
    for species in Species::ALL {
        if previous.alive(species) > 0 && current.alive(species) == 0 {
            info!(%species, tick = current.tick, "species went extinct");
        }
    }
    if previous.plants > 0 && current.plants == 0 {
        info!(tick = current.tick, "plants went extinct");
    }
}

/// Uniform point at least `margin` away from every field edge.
fn random_point<R: Rng + ?Sized>(rng: &mut R, margin: f32, width: f32, height: f32) -> Point<f32> {
    let axis = |rng: &mut R, extent: f32| {
        let margin = margin.min(extent / 2.0);
        rng.random_range(margin..=extent - margin)
    };
    let x = axis(rng, width);
    let y = axis(rng, height);
    Point::new(x, y)
}
