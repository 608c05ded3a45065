//! The living (and recently dead) members of one species.

use std::sync::Arc;

use geo::Point;
use rand::Rng;
use tracing::debug;

use super::organism::{Organism, Species};
use super::params::SpeciesParams;

/// Members of one species in update order, plus the species' id counter.
#[derive(Debug, Clone)]
pub struct Population {
    species: Species,
    params: Arc<SpeciesParams>,
    members: Vec<Organism>,
    next_id: u64,
}

impl Population {
    /// Creates an empty population.
    pub fn new(species: Species, params: SpeciesParams) -> Self {
        Self {
            species,
            params: Arc::new(params),
            members: Vec::new(),
            next_id: 1,
        }
    }

    /// Species of every member.
    pub fn species(&self) -> Species {
        self.species
    }

    /// Parameters shared by every member.
    pub fn params(&self) -> &SpeciesParams {
        &self.params
    }

    /// Members in update order. Dead members stay until [`Population::retire_dead`].
    pub fn members(&self) -> &[Organism] {
        &self.members
    }

    /// Mutable access to members. The collection itself cannot grow or shrink
    /// through this.
    pub fn members_mut(&mut self) -> &mut [Organism] {
        &mut self.members
    }

    /// Number of members, dead ones included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of living members.
    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|o| o.is_alive()).count()
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a seed individual at `pos` and returns it.
    pub fn spawn_seed<R: Rng + ?Sized>(&mut self, pos: Point<f32>, rng: &mut R) -> &mut Organism {
        let id = self.take_id();
        let organism = Organism::new_seed(self.species, id, Arc::clone(&self.params), pos, rng);
        self.push(organism)
    }

    /// Adds the child of the member at `parent_idx`, born at `pos`.
    pub fn spawn_offspring<R: Rng + ?Sized>(
        &mut self,
        parent_idx: usize,
        pos: Point<f32>,
        mutation_rate: f32,
        rng: &mut R,
    ) -> &mut Organism {
        let id = self.take_id();
        let child = Organism::offspring(&self.members[parent_idx], id, pos, mutation_rate, rng);
        debug!(
            species = %self.species,
            id,
            parent = self.members[parent_idx].id,
            generation = child.generation,
            "organism born"
        );
        self.push(child)
    }

    fn push(&mut self, organism: Organism) -> &mut Organism {
        self.members.push(organism);
        let last = self.members.len() - 1;
        &mut self.members[last]
    }

    /// Removes dead members, keeping the order of the survivors.
    ///
    /// The removed organisms are returned so callers can account for them.
    pub fn retire_dead(&mut self) -> Vec<Organism> {
        let (alive, dead) = std::mem::take(&mut self.members)
            .into_iter()
            .partition(Organism::is_alive);
        self.members = alive;
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::organism::DeathCause;

    #[test]
    fn ids_increase_across_seeds_and_offspring() {
        let mut population = Population::new(Species::Carnivore, SpeciesParams::carnivore());
        let mut rng = rand::rng();
        let first = population.spawn_seed(Point::new(0.0, 0.0), &mut rng).id;
        let second = population.spawn_seed(Point::new(5.0, 0.0), &mut rng).id;
        let child = population.spawn_offspring(0, Point::new(1.0, 1.0), 0.05, &mut rng);
        assert_eq!((first, second, child.id), (1, 2, 3));
        assert_eq!(child.generation, 2);
    }

    #[test]
    fn retiring_keeps_survivor_order() {
        let mut population = Population::new(Species::Herbivore, SpeciesParams::herbivore());
        let mut rng = rand::rng();
        for x in 0..4 {
            population.spawn_seed(Point::new(x as f32, 0.0), &mut rng);
        }
        population.members_mut()[1].die(DeathCause::Starvation);
        let dead = population.retire_dead();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, 2);
        let ids: Vec<u64> = population.members().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }
}
