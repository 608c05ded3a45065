//! Trait for entities that occupy a position on the field.
//!
//! The spatial index is built over anything implementing [`Locatable`], which
//! lets plants and both organism species share one grid implementation.

use geo::Point;

/// Trait for entities with a position that can be bucketed by the spatial index.
pub trait Locatable {
    /// Returns the entity's position.
    fn pos(&self) -> Point<f32>;

    /// Whether the entity still takes part in the world.
    ///
    /// Dead organisms and eaten plants stay in their collections until they
    /// are swept, but they are never indexed.
    fn is_present(&self) -> bool;
}
