//! Population and mortality statistics.
//!
//! A [`Census`] is taken after every tick and stored in a bounded
//! [`CensusHistory`]. Death counts are cumulative over the run: organisms
//! evicted by `retire_dead` are folded into [`Mortality`] first so their
//! causes are not lost.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::organism::{DeathCause, Organism, Species};

/// Deaths of one species broken down by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathTally {
    /// Deaths from reaching the lifespan.
    pub old_age: u64,
    /// Deaths from running out of energy.
    pub starvation: u64,
    /// Deaths from predation.
    pub eaten: u64,
}

impl DeathTally {
    /// Counts one death.
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::OldAge => self.old_age += 1,
            DeathCause::Starvation => self.starvation += 1,
            DeathCause::Eaten => self.eaten += 1,
        }
    }

    /// Deaths of any cause.
    pub fn total(&self) -> u64 {
        self.old_age + self.starvation + self.eaten
    }

    fn merged(mut self, other: &DeathTally) -> Self {
        self.old_age += other.old_age;
        self.starvation += other.starvation;
        self.eaten += other.eaten;
        self
    }
}

/// Death tallies of organisms already removed from the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mortality {
    herbivores: DeathTally,
    carnivores: DeathTally,
}

impl Mortality {
    /// Records a dead organism. Living organisms are ignored.
    pub fn record(&mut self, organism: &Organism) {
        if let Some(cause) = organism.death_cause() {
            self.tally_mut(organism.species).record(cause);
        }
    }

    /// Tally of one species.
    pub fn tally(&self, species: Species) -> &DeathTally {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Carnivore => &self.carnivores,
        }
    }

    fn tally_mut(&mut self, species: Species) -> &mut DeathTally {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Carnivore => &mut self.carnivores,
        }
    }
}

/// Counts for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    /// Ticks completed when the census was taken.
    pub tick: u64,
    /// Plants in the world.
    pub plants: usize,
    /// Living herbivores.
    pub herbivores: usize,
    /// Living carnivores.
    pub carnivores: usize,
    /// Cumulative herbivore deaths.
    pub herbivore_deaths: DeathTally,
    /// Cumulative carnivore deaths.
    pub carnivore_deaths: DeathTally,
}

impl Census {
    /// Takes a census of the given collections.
    ///
    /// `retired` holds the deaths of organisms no longer in the collections.
    pub fn take(
        tick: u64,
        plants: usize,
        herbivores: &[Organism],
        carnivores: &[Organism],
        retired: &Mortality,
    ) -> Self {
        let (herbivores, herbivore_deaths) = count(herbivores, retired.tally(Species::Herbivore));
        let (carnivores, carnivore_deaths) = count(carnivores, retired.tally(Species::Carnivore));
        Self {
            tick,
            plants,
            herbivores,
            carnivores,
            herbivore_deaths,
            carnivore_deaths,
        }
    }

    /// Living organisms of one species.
    pub fn alive(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    /// Cumulative deaths of one species.
    pub fn deaths(&self, species: Species) -> &DeathTally {
        match species {
            Species::Herbivore => &self.herbivore_deaths,
            Species::Carnivore => &self.carnivore_deaths,
        }
    }
}

fn count(members: &[Organism], retired: &DeathTally) -> (usize, DeathTally) {
    let mut alive = 0;
    let mut deaths = DeathTally::default();
    for organism in members {
        match organism.death_cause() {
            None => alive += 1,
            Some(cause) => deaths.record(cause),
        }
    }
    (alive, deaths.merged(retired))
}

/// Most recent censuses, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusHistory {
    entries: VecDeque<Census>,
    capacity: usize,
}

impl CensusHistory {
    /// Creates an empty history keeping at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Appends a census, dropping the oldest one when full.
    pub fn push(&mut self, census: Census) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(census);
    }

    /// All kept entries, oldest first.
    pub fn entries(&self) -> &VecDeque<Census> {
        &self.entries
    }

    /// Latest entry.
    pub fn latest(&self) -> Option<&Census> {
        self.entries.back()
    }

    /// Number of kept entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no census was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_drops_oldest_when_full() {
        let mut history = CensusHistory::new(3);
        for tick in 1..=5 {
            history.push(Census {
                tick,
                ..Census::default()
            });
        }
        let ticks: Vec<u64> = history.entries().iter().map(|c| c.tick).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
        assert_eq!(history.latest().map(|c| c.tick), Some(5));
    }

    #[test]
    fn tally_counts_each_cause() {
        let mut tally = DeathTally::default();
        tally.record(DeathCause::Eaten);
        tally.record(DeathCause::Eaten);
        tally.record(DeathCause::OldAge);
        assert_eq!(tally.eaten, 2);
        assert_eq!(tally.old_age, 1);
        assert_eq!(tally.starvation, 0);
        assert_eq!(tally.total(), 3);
    }
}
