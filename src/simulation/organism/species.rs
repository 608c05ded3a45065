//! The two organism species and what sets them apart.
//!
//! Both species share the same update loop. They differ in their parameter
//! tables and in what they look at and eat, which is dispatched here.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::feeding::in_reach;
use super::organism::Organism;
use super::sense::{SenseVector, Surroundings};
use super::vision::{Visible, nearest_in_cone};

/// Organism species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Eats plants and watches for carnivores.
    Herbivore,
    /// Hunts herbivores.
    Carnivore,
}

impl Species {
    /// Every species, in update order.
    pub const ALL: [Species; 2] = [Species::Herbivore, Species::Carnivore];

    /// Builds the sense vector for an organism of this species.
    ///
    /// Herbivores look for carnivores first and only look at plants when no
    /// carnivore is in view. Carnivores only look at herbivores.
    pub fn sense(self, organism: &Organism, around: &Surroundings<'_>) -> SenseVector {
        let params = organism.params();
        let other = nearest_in_cone(organism.pos, organism.rot, params, around.other_species);
        let seen = match self {
            Species::Herbivore => other.map(Visible::color).or_else(|| {
                nearest_in_cone(organism.pos, organism.rot, params, around.plants).map(Visible::color)
            }),
            Species::Carnivore => other.map(Visible::color),
        };
        let energy = (organism.energy / params.reproduction_threshold).clamp(0.0, 1.0);
        SenseVector::new(seen, energy)
    }

    /// Indices of the food an organism of this species currently touches.
    ///
    /// For herbivores these index plants, for carnivores the herbivore population.
    pub fn reachable(self, organism: &Organism, around: &Surroundings<'_>) -> Vec<usize> {
        match self {
            Species::Herbivore => in_reach(organism, around.plants),
            Species::Carnivore => in_reach(organism, around.other_species),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Herbivore => write!(f, "herbivore"),
            Species::Carnivore => write!(f, "carnivore"),
        }
    }
}
