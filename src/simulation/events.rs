//! Event system for thread-safe simulation state updates.
//!
//! Organisms of one species update in parallel. Whatever an update does to
//! other entities is collected here as an event and applied serially
//! afterwards, in the order of the organisms that produced the events.

use geo::Point;
use rand::Rng;

use super::organism::{Species, StepOutcome, graze, hunt};
use super::plant::Plant;
use super::population::Population;

/// Events that modify simulation state.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// Gestation finished and a child is due.
    Birth {
        /// Index of the parent in its population.
        parent_idx: usize,
        /// Species of the child.
        species: Species,
        /// Where the child appears.
        pos: Point<f32>,
    },
    /// An organism touched food after moving.
    FoodInReach {
        /// Index of the eater in its population.
        organism_idx: usize,
        /// Plant indices for a herbivore, herbivore indices for a carnivore.
        targets: Vec<usize>,
    },
}

impl SimulationEvent {
    fn source(&self) -> usize {
        match self {
            SimulationEvent::Birth { parent_idx, .. } => *parent_idx,
            SimulationEvent::FoodInReach { organism_idx, .. } => *organism_idx,
        }
    }
}

/// Queue for collecting simulation events from parallel updates.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Queues the effects of one organism update.
    pub fn record(&mut self, organism_idx: usize, outcome: StepOutcome) {
        if let Some(birth) = outcome.birth {
            self.push(SimulationEvent::Birth {
                parent_idx: organism_idx,
                species: birth.species,
                pos: birth.pos,
            });
        }
        if !outcome.reachable.is_empty() {
            self.push(SimulationEvent::FoodInReach {
                organism_idx,
                targets: outcome.reachable,
            });
        }
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains the queue in list order of the organisms that produced the events.
    ///
    /// Events of the same organism keep the order they were pushed in.
    pub fn drain_ordered(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.sort_by_key(SimulationEvent::source);
        self.events.drain(..)
    }
}

/// Mutable world state touched while applying events.
pub struct EventTargets<'a> {
    /// All plants.
    pub plants: &'a mut [Plant],
    /// The herbivore population.
    pub herbivores: &'a mut Population,
    /// The carnivore population.
    pub carnivores: &'a mut Population,
    /// Controller mutation rate for newborns.
    pub mutation_rate: f32,
}

impl EventTargets<'_> {
    fn population_mut(&mut self, species: Species) -> &mut Population {
        match species {
            Species::Herbivore => &mut *self.herbivores,
            Species::Carnivore => &mut *self.carnivores,
        }
    }
}

/// Tallies of what applying one queue did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    /// Children added.
    pub births: usize,
    /// Plants consumed or prey killed.
    pub meals: usize,
}

/// Applies all queued events produced by the members of `source`.
///
/// Contention for a target resolves to the earliest organism in list order;
/// later claimants find the plant consumed or the prey dead and skip it.
pub fn apply_events<R: Rng + ?Sized>(
    source: Species,
    targets: &mut EventTargets<'_>,
    mut queue: EventQueue,
    rng: &mut R,
) -> Applied {
    let mut applied = Applied::default();
    for event in queue.drain_ordered() {
        match event {
            SimulationEvent::Birth {
                parent_idx,
                species,
                pos,
            } => {
                // Offspring always share the parent's species.
                debug_assert_eq!(species, source);
                let rate = targets.mutation_rate;
                targets
                    .population_mut(species)
                    .spawn_offspring(parent_idx, pos, rate, rng);
                applied.births += 1;
            }
            SimulationEvent::FoodInReach {
                organism_idx,
                targets: food,
            } => {
                applied.meals += match source {
                    Species::Herbivore => graze(
                        &mut targets.herbivores.members_mut()[organism_idx],
                        targets.plants,
                        &food,
                    ),
                    Species::Carnivore => hunt(
                        &mut targets.carnivores.members_mut()[organism_idx],
                        targets.herbivores.members_mut(),
                        &food,
                    ),
                };
            }
        }
    }
    applied
}
