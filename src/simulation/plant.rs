//! Plants: static food that spreads into free space nearby.
//!
//! A plant never moves. Every tick its duplication countdown runs down; when
//! it expires the plant tries a few random spots around itself and drops one
//! child into the first spot that keeps the minimum separation from every
//! other plant.

use geo::Point;
use rand::Rng;
use tracing::trace;

use super::color::Color;
use super::geometric_utils::wrap_around;
use super::locatable::Locatable;
use super::params::PlantParams;

/// A food item herbivores can consume.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    /// Unique identifier among plants.
    pub id: u64,
    /// Position on the field.
    pub pos: Point<f32>,
    /// Edge length of the plant body.
    pub size: f32,
    /// Visible color.
    pub color: Color,
    /// Ticks until the next spread attempt.
    pub duplication_timer: u32,
    consumed: bool,
}

impl Plant {
    /// Creates a plant with a fresh first-spread countdown.
    pub fn new<R: Rng + ?Sized>(
        id: u64,
        pos: Point<f32>,
        color: Color,
        params: &PlantParams,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            pos,
            size: params.size,
            color,
            duplication_timer: params.first_spread.sample(rng),
            consumed: false,
        }
    }

    /// Creates a seed plant with a random color from the seed ranges.
    pub fn new_random<R: Rng + ?Sized>(
        id: u64,
        pos: Point<f32>,
        params: &PlantParams,
        rng: &mut R,
    ) -> Self {
        let color = Color::random_in(&params.color, rng);
        Self::new(id, pos, color, params, rng)
    }

    /// Checks if this plant has been eaten.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Removes the plant from the world.
    ///
    /// The plant stays in its collection, flagged, until the end of the tick
    /// so that spatial index slots stay valid while other updates run.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Runs the duplication countdown and, when it expires, tries to spread.
    ///
    /// `is_clear` must report whether a candidate position keeps the minimum
    /// separation from every existing plant. At most one child is returned;
    /// it gets `child_id`.
    pub fn try_spread<R: Rng + ?Sized>(
        &mut self,
        child_id: u64,
        params: &PlantParams,
        field: (f32, f32),
        is_clear: impl Fn(Point<f32>) -> bool,
        rng: &mut R,
    ) -> Option<Plant> {
        self.duplication_timer = self.duplication_timer.saturating_sub(1);
        if self.duplication_timer > 0 {
            return None;
        }
        self.duplication_timer = params.spread_period.sample(rng);

        let reach = params.spread_max;
        for _ in 0..params.spread_tries {
            let offset = Point::new(
                rng.random_range(-reach..=reach) as f32,
                rng.random_range(-reach..=reach) as f32,
            );
            let candidate = wrap_around(self.pos + offset, field.0, field.1);
            if !is_clear(candidate) {
                continue;
            }

            let color = self.color.mutated(params.color_mutation, rng);
            trace!(parent = self.id, child = child_id, "plant spread");
            return Some(Plant::new(child_id, candidate, color, params, rng));
        }
        None
    }
}

impl Locatable for Plant {
    fn pos(&self) -> Point<f32> {
        self.pos
    }

    fn is_present(&self) -> bool {
        !self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant_with_timer(timer: u32) -> Plant {
        let params = PlantParams::default();
        let mut plant = Plant::new(1, Point::new(100.0, 100.0), Color::new(0, 200, 0), &params, &mut rand::rng());
        plant.duplication_timer = timer;
        plant
    }

    #[test]
    fn countdown_runs_before_spreading() {
        let params = PlantParams::default();
        let mut plant = plant_with_timer(3);
        let child = plant.try_spread(2, &params, (2400.0, 2400.0), |_| true, &mut rand::rng());
        assert!(child.is_none());
        assert_eq!(plant.duplication_timer, 2);
    }

    #[test]
    fn expired_countdown_spawns_one_nearby_child_and_resets() {
        let params = PlantParams::default();
        let mut plant = plant_with_timer(1);
        let child = plant
            .try_spread(2, &params, (2400.0, 2400.0), |_| true, &mut rand::rng())
            .expect("a clear field always accepts the first candidate");

        assert_eq!(child.id, 2);
        assert!((child.pos.x() - 100.0).abs() <= 32.0);
        assert!((child.pos.y() - 100.0).abs() <= 32.0);
        assert!(child.color.0[1].abs_diff(200) <= 16);
        assert!((300..=1200).contains(&plant.duplication_timer));
        assert!((600..=1800).contains(&child.duplication_timer));
    }

    #[test]
    fn blocked_candidates_spawn_nothing() {
        let params = PlantParams {
            spread_tries: 5,
            ..PlantParams::default()
        };
        let mut plant = plant_with_timer(1);
        let child = plant.try_spread(2, &params, (2400.0, 2400.0), |_| false, &mut rand::rng());
        assert!(child.is_none());
        assert!(plant.duplication_timer >= 300);
    }

    #[test]
    fn children_wrap_around_the_field() {
        let params = PlantParams::default();
        let mut plant = plant_with_timer(1);
        plant.pos = Point::new(1.0, 2399.0);
        for id in 0..50 {
            plant.duplication_timer = 1;
            let child = plant
                .try_spread(id, &params, (2400.0, 2400.0), |_| true, &mut rand::rng())
                .unwrap();
            assert!(child.pos.x() >= 0.0 && child.pos.x() < 2400.0);
            assert!(child.pos.y() >= 0.0 && child.pos.y() < 2400.0);
        }
    }

    #[test]
    fn consumed_plants_are_not_present() {
        let mut plant = plant_with_timer(10);
        assert!(plant.is_present());
        plant.consume();
        assert!(plant.is_consumed());
        assert!(!plant.is_present());
    }
}
