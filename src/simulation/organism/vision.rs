//! Vision cone search.
//!
//! An organism looks along its facing direction. Anything strictly inside
//! the cone (closer than the vision length, within the half-angle) is a
//! candidate and the closest candidate wins. Only the 3x3 block of grid cells
//! around the observer is searched, which is complete as long as the cell size
//! is at least the vision length.

use geo::Point;

use super::super::color::Color;
use super::super::geometric_utils::in_vision_cone;
use super::super::locatable::Locatable;
use super::super::params::SpeciesParams;
use super::super::plant::Plant;
use super::Organism;
use super::sense::Layer;

/// Entities that can be seen.
pub trait Visible: Locatable {
    /// Color perceived by an observer.
    fn color(&self) -> Color;
}

impl Visible for Plant {
    fn color(&self) -> Color {
        self.color
    }
}

impl Visible for Organism {
    fn color(&self) -> Color {
        self.color
    }
}

/// Finds the closest present entity inside an observer's vision cone.
///
/// Distances are measured from the observer to each entity's position when
/// the index was built. Ties keep the first entity found.
pub fn nearest_in_cone<'a, T: Visible>(
    observer: Point<f32>,
    facing: f32,
    params: &SpeciesParams,
    layer: Layer<'a, T>,
) -> Option<&'a T> {
    let mut nearest: Option<(f32, &'a T)> = None;
    for entry in layer.index.query_neighborhood(observer) {
        let item = &layer.items[entry.idx];
        if !item.is_present() {
            continue;
        }
        let Some(dist) = in_vision_cone(
            observer,
            facing,
            params.vision_length,
            params.vision_half_angle,
            entry.pos,
        ) else {
            continue;
        };
        if nearest.is_none_or(|(best, _)| dist < best) {
            nearest = Some((dist, item));
        }
    }
    nearest.map(|(_, item)| item)
}
