//! Organism module containing the shared lifecycle and the per-species
//! sensing and feeding rules.

mod feeding;
mod organism;
mod sense;
mod species;
mod vision;

// Re-export everything from the organism module
pub use organism::*;

pub use feeding::{Edible, graze, hunt, in_reach};
pub use sense::{Layer, NOTHING_IN_VIEW, SenseVector, Surroundings};
pub use species::Species;
pub use vision::{Visible, nearest_in_cone};
