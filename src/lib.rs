//! # Evovision - Predator/Prey Ecosystem Simulation
//!
//! A two-dimensional toroidal world of plants, herbivores and carnivores.
//! Organisms steer with small neural controllers, see the color of the
//! nearest thing in their vision cone, and pass mutated copies of their color
//! and controller weights on to their offspring.
//!
//! ## Features
//!
//! - Feedforward controllers (one sigmoid hidden layer, two motor outputs)
//! - Vision cones backed by a uniform grid spatial index
//! - Energy economy with metabolism, motion costs, feeding and gestation
//! - Plants spreading into free space
//! - Parallel organism updates with serial, ordered conflict resolution
//! - Per-tick census with cumulative mortality by cause
//!
//! ## Core Modules
//!
//! - [`simulation::ecosystem`] - Tick orchestration
//! - [`simulation::organism`] - Organism lifecycle, sensing and feeding
//! - [`simulation::brain`] - Neural controller
//! - [`simulation::spatial`] - Uniform grid neighbor index
//! - [`simulation::plant`] - Plants and spreading
//! - [`simulation::events`] - Event system for thread-safe updates

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural controller driving organism motion.
    pub mod brain;
    /// Population and mortality statistics.
    pub mod census;
    /// Heritable RGB coloring.
    pub mod color;
    /// Main ecosystem simulation with parallel updates.
    pub mod ecosystem;
    /// Configuration errors.
    pub mod error;
    /// Event system for thread-safe state updates.
    pub mod events;
    /// Geometric utility functions for distance, angle and wrap-around.
    pub mod geometric_utils;
    /// Trait for entities with a position on the field.
    ///
    /// The [`locatable::Locatable`] trait is implemented by everything the
    /// spatial index can hold (plants and organisms).
    pub mod locatable;
    /// Organism behavior, state, and lifecycle.
    pub mod organism;
    /// Simulation parameters.
    pub mod params;
    /// Plants that herbivores eat.
    pub mod plant;
    /// Members and id counter of one species.
    pub mod population;
    /// Uniform grid spatial index.
    pub mod spatial;
}
