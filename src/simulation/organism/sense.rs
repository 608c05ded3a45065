//! Sensory input shared by both species.
//!
//! An organism sees one thing per tick: the color of the nearest target in
//! its vision cone. Together with its normalized energy this forms the
//! four-value vector fed to the controller.

use super::super::color::Color;
use super::super::plant::Plant;
use super::super::spatial::SpatialIndex;
use super::Organism;

/// Color channels reported when nothing qualifying is in view.
pub const NOTHING_IN_VIEW: [f32; 3] = [-1.0, -1.0, -1.0];

/// Controller input: three color channels followed by normalized energy.
///
/// Color channels are in `[0, 1]`, or all `-1` when nothing is in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenseVector(pub [f32; 4]);

impl SenseVector {
    /// Builds a sense vector from the seen color (if any) and normalized energy.
    pub fn new(seen: Option<Color>, energy: f32) -> Self {
        let [r, g, b] = seen.map_or(NOTHING_IN_VIEW, |color| color.normalized());
        Self([r, g, b, energy])
    }

    /// Color part of the vector.
    pub fn color(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Normalized energy part of the vector.
    pub fn energy(&self) -> f32 {
        self.0[3]
    }

    /// Whether something was in view when the vector was taken.
    pub fn sees_something(&self) -> bool {
        self.color() != NOTHING_IN_VIEW
    }
}

impl Default for SenseVector {
    fn default() -> Self {
        Self::new(None, 0.0)
    }
}

/// A collection together with the spatial index built over it this tick.
#[derive(Debug)]
pub struct Layer<'a, T> {
    /// Entities, addressed by the indices stored in `index`.
    pub items: &'a [T],
    /// Grid built from `items` at the start of the tick.
    pub index: &'a SpatialIndex,
}

// Manual impls: a derive would demand `T: Copy`.
impl<T> Clone for Layer<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Layer<'_, T> {}

impl<'a, T> Layer<'a, T> {
    /// Pairs a collection with its index.
    pub fn new(items: &'a [T], index: &'a SpatialIndex) -> Self {
        Self { items, index }
    }
}

/// Read-only view of the world an organism perceives and reaches while it updates.
///
/// `other_species` holds predators for a herbivore and prey for a carnivore.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    /// Plants and their index.
    pub plants: Layer<'a, Plant>,
    /// The population of the other species and its index.
    pub other_species: Layer<'a, Organism>,
}
