//! Contact detection and food resolution.
//!
//! Contacts are found during the parallel update pass against tick-start
//! positions. Resolving them (consuming a plant, killing prey, gaining
//! energy) happens afterwards, one organism at a time in list order, so a
//! target claimed by an earlier organism is skipped by later ones.

use tracing::trace;

use super::super::geometric_utils::distance;
use super::super::locatable::Locatable;
use super::super::plant::Plant;
use super::organism::{DeathCause, Organism};
use super::sense::Layer;

/// Entities that can be eaten.
pub trait Edible: Locatable {
    /// Body extent used for contact tests (plant edge or organism radius).
    fn extent(&self) -> f32;
}

impl Edible for Plant {
    fn extent(&self) -> f32 {
        self.size
    }
}

impl Edible for Organism {
    fn extent(&self) -> f32 {
        self.radius
    }
}

/// Indices of every present target the organism touches from its current position.
///
/// Candidates come from the grid cells around the eater; distance is measured
/// to where each target is now. A target counts when it is strictly closer
/// than `radius + extent / reach_divisor`.
pub fn in_reach<T: Edible>(eater: &Organism, layer: Layer<'_, T>) -> Vec<usize> {
    let divisor = eater.params().reach_divisor;
    layer
        .index
        .query_neighborhood(eater.pos)
        .filter(|entry| {
            let target = &layer.items[entry.idx];
            target.is_present()
                && distance(eater.pos, target.pos()) < eater.radius + target.extent() / divisor
        })
        .map(|entry| entry.idx)
        .collect()
}

/// Eats the listed plants. Plants already consumed this tick are skipped.
///
/// Returns the number of plants eaten.
pub fn graze(herbivore: &mut Organism, plants: &mut [Plant], targets: &[usize]) -> usize {
    let mut eaten = 0;
    for &idx in targets {
        let plant = &mut plants[idx];
        if plant.is_consumed() || !herbivore.is_alive() {
            continue;
        }
        plant.consume();
        let gain = herbivore.params().feeding_gain;
        herbivore.gain_energy(gain);
        trace!(herbivore = herbivore.id, plant = plant.id, gain, "grazed");
        eaten += 1;
    }
    eaten
}

/// Kills and eats the listed prey. Prey already dead is skipped.
///
/// The hunter gains its feeding fraction of the prey's energy at the moment
/// of death. Returns the number of prey killed.
pub fn hunt(carnivore: &mut Organism, prey: &mut [Organism], targets: &[usize]) -> usize {
    let mut killed = 0;
    for &idx in targets {
        let victim = &mut prey[idx];
        if !victim.is_alive() || !carnivore.is_alive() {
            continue;
        }
        let gain = victim.energy * carnivore.params().feeding_gain;
        victim.die(DeathCause::Eaten);
        carnivore.gain_energy(gain);
        trace!(carnivore = carnivore.id, prey = victim.id, gain, "hunted");
        killed += 1;
    }
    killed
}
