//! Heritable RGB coloring.
//!
//! Color is the only visible trait: organisms see each other's color through
//! their vision cone, so it doubles as a genetic marker that drifts a little
//! every generation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::params::ColorBounds;

/// An RGB color with channels in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Draws a seed color from per-channel ranges.
    pub fn random_in<R: Rng + ?Sized>(bounds: &ColorBounds, rng: &mut R) -> Self {
        Self([
            bounds[0].sample(rng),
            bounds[1].sample(rng),
            bounds[2].sample(rng),
        ])
    }

    /// Applies explicit per-channel offsets, clamping every channel to `0..=255`.
    pub fn shifted(self, offsets: [i32; 3]) -> Self {
        let mut channels = self.0;
        for (channel, offset) in channels.iter_mut().zip(offsets) {
            *channel = (i32::from(*channel) + offset).clamp(0, 255) as u8;
        }
        Self(channels)
    }

    /// Returns a copy with every channel moved by an independent uniform
    /// integer offset in `-range..=range`.
    pub fn mutated<R: Rng + ?Sized>(self, range: u8, rng: &mut R) -> Self {
        let range = i32::from(range);
        let offsets = [
            rng.random_range(-range..=range),
            rng.random_range(-range..=range),
            rng.random_range(-range..=range),
        ];
        self.shifted(offsets)
    }

    /// Channels scaled to `0.0..=1.0`, the form fed to a controller.
    pub fn normalized(self) -> [f32; 3] {
        self.0.map(|c| f32::from(c) / 255.0)
    }
}
