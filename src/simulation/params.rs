//! Simulation parameters.
//!
//! Every constant the engine uses lives here so a run can be described by a
//! single serializable value. The defaults reproduce the reference ecology on a
//! 2400x2400 field.

use rand::Rng;
use rand::distr::uniform::SampleUniform;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::ConfigError;
use super::organism::Species;

/// Inclusive `min..=max` bounds for a randomly drawn quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    /// Smallest value that can be drawn.
    pub min: T,
    /// Largest value that can be drawn.
    pub max: T,
}

impl<T> Bounds<T> {
    /// Creates new bounds.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: SampleUniform + PartialOrd + Copy> Bounds<T> {
    /// Draws a value uniformly from the inclusive range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.random_range(self.min..=self.max)
    }
}

impl<T: PartialOrd + Copy + Into<f64>> Bounds<T> {
    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        for value in [self.min.into(), self.max.into()] {
            finite(name, value)?;
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min.into(),
                max: self.max.into(),
            });
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

/// Seed color ranges, one per RGB channel.
pub type ColorBounds = [Bounds<u8>; 3];

/// Parameters shared by every plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    /// Edge length of the plant body.
    pub size: f32,
    /// Seed color ranges.
    pub color: ColorBounds,
    /// Maximum per-channel color offset applied to a spread child.
    pub color_mutation: u8,
    /// Shortest allowed distance between any two plants.
    pub spread_min: f32,
    /// Largest per-axis offset of a spread candidate.
    pub spread_max: i32,
    /// Candidate positions tried per spread attempt.
    pub spread_tries: usize,
    /// Ticks between spread attempts.
    pub spread_period: Bounds<u32>,
    /// Ticks before the first spread attempt of a seeded plant.
    pub first_spread: Bounds<u32>,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: [Bounds::new(0, 0), Bounds::new(192, 255), Bounds::new(0, 0)],
            color_mutation: 16,
            spread_min: 20.0,
            spread_max: 32,
            spread_tries: 1,
            spread_period: Bounds::new(300, 1200),
            first_spread: Bounds::new(600, 1800),
        }
    }
}

/// Constant parameters attached to every organism of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Hidden neurons in the controller.
    pub hidden_size: usize,
    /// Body radius.
    pub radius: f32,
    /// Seed color ranges.
    pub color: ColorBounds,
    /// Maximum per-channel color offset applied to offspring.
    pub color_mutation: u8,
    /// Maximum sensing distance.
    pub vision_length: f32,
    /// Half-angle of the vision cone in radians.
    pub vision_half_angle: f32,
    /// Energy lost every tick.
    pub metabolism: f32,
    /// Divisor turning speed into energy cost.
    pub move_cost_divisor: f32,
    /// Divisor turning angular change into energy cost.
    pub rotate_cost_divisor: f32,
    /// Turn signals at or below this magnitude are ignored.
    pub rotate_threshold: f32,
    /// Move signals at or below this magnitude are ignored.
    pub speed_threshold: f32,
    /// Turn signal is divided by this to get radians per tick.
    pub rotate_multiplier: f32,
    /// Speed per unit of positive move signal.
    pub forward_multiplier: f32,
    /// Speed per unit of negative move signal.
    pub reverse_multiplier: f32,
    /// Herbivores gain this much per plant; carnivores gain this fraction of
    /// the prey's energy.
    pub feeding_gain: f32,
    /// The target's size is divided by this before being added to the
    /// feeding reach (plant size for herbivores, prey radius for carnivores).
    pub reach_divisor: f32,
    /// Energy above which feeding starts a gestation.
    pub reproduction_threshold: f32,
    /// Energy the parent falls back to when gestation starts (plus surplus).
    pub reproduction_return: f32,
    /// Ticks between conception and birth.
    pub gestation_period: u32,
    /// Energy of a newborn.
    pub birth_energy: f32,
    /// Energy range of seed individuals.
    pub start_energy: Bounds<f32>,
    /// Lifespan range in ticks.
    pub lifespan: Bounds<u32>,
}

impl SpeciesParams {
    /// Reference herbivore: wide short cone, cheap to run, eats plants.
    pub fn herbivore() -> Self {
        Self {
            hidden_size: 6,
            radius: 16.0,
            color: [Bounds::new(0, 0), Bounds::new(0, 0), Bounds::new(192, 255)],
            color_mutation: 24,
            vision_length: 140.0,
            vision_half_angle: std::f32::consts::PI / 4.5,
            metabolism: 0.032,
            move_cost_divisor: 160.0,
            rotate_cost_divisor: 240.0,
            rotate_threshold: 0.3,
            speed_threshold: 0.1,
            rotate_multiplier: 1.4,
            forward_multiplier: 2.8,
            reverse_multiplier: 1.2,
            feeding_gain: 20.0,
            reach_divisor: 2.0,
            reproduction_threshold: 300.0,
            reproduction_return: 80.0,
            gestation_period: 250,
            birth_energy: 70.0,
            start_energy: Bounds::new(40.0, 80.0),
            lifespan: Bounds::new(4000, 8000),
        }
    }

    /// Reference carnivore: narrow long cone, fast, eats herbivores.
    pub fn carnivore() -> Self {
        Self {
            hidden_size: 10,
            radius: 20.0,
            color: [Bounds::new(192, 255), Bounds::new(0, 0), Bounds::new(0, 0)],
            color_mutation: 32,
            vision_length: 200.0,
            vision_half_angle: std::f32::consts::PI / 9.0,
            metabolism: 0.038,
            move_cost_divisor: 300.0,
            rotate_cost_divisor: 400.0,
            rotate_threshold: 0.1,
            speed_threshold: 0.2,
            rotate_multiplier: 2.4,
            forward_multiplier: 3.8,
            reverse_multiplier: 1.8,
            feeding_gain: 0.275,
            // Larger than 1 shrinks the prey hitbox; the predator still gets its full radius.
            reach_divisor: 1.2,
            reproduction_threshold: 300.0,
            reproduction_return: 120.0,
            gestation_period: 200,
            birth_energy: 120.0,
            start_energy: Bounds::new(70.0, 140.0),
            lifespan: Bounds::new(9000, 15000),
        }
    }

    fn validate(&self, species: Species, cell_size: f32) -> Result<(), ConfigError> {
        if !(self.vision_length <= cell_size) {
            return Err(ConfigError::CellSmallerThanVision {
                cell_size,
                species,
                vision_length: self.vision_length,
            });
        }

        let positive = [
            ("hidden_size", self.hidden_size as f64),
            ("radius", self.radius as f64),
            ("move_cost_divisor", self.move_cost_divisor as f64),
            ("rotate_cost_divisor", self.rotate_cost_divisor as f64),
            ("rotate_multiplier", self.rotate_multiplier as f64),
            ("reach_divisor", self.reach_divisor as f64),
            ("reproduction_threshold", self.reproduction_threshold as f64),
            ("gestation_period", self.gestation_period as f64),
        ];
        for (name, value) in positive {
            finite(name, value)?;
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        self.start_energy.check("start_energy")?;
        self.lifespan.check("lifespan")?;
        for channel in &self.color {
            channel.check("color")?;
        }
        Ok(())
    }
}

/// Simulation parameters that control world behavior.
///
/// Fields missing from a deserialized config take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Field width; positions wrap modulo this.
    pub field_width: f32,
    /// Field height; positions wrap modulo this.
    pub field_height: f32,
    /// Spatial index cell edge length. Must be at least every vision length.
    pub cell_size: f32,
    /// Plants seeded at world creation.
    pub start_plants: usize,
    /// Herbivores seeded at world creation.
    pub start_herbivores: usize,
    /// Carnivores seeded at world creation.
    pub start_carnivores: usize,
    /// Distance from the field edge kept free when seeding plants.
    pub plant_seed_margin: f32,
    /// Distance from the field edge kept free when seeding organisms.
    pub organism_seed_margin: f32,
    /// Maximum offset applied to every controller weight on inheritance.
    pub mutation_rate: f32,
    /// Maximum per-axis offset of a newborn from its parent.
    pub birth_jitter: f32,
    /// Census entries kept in the history buffer.
    pub graph_memory: usize,
    /// Plant parameters.
    pub plant: PlantParams,
    /// Herbivore parameters. Missing entries fall back to the herbivore table.
    #[serde(deserialize_with = "herbivore_table")]
    pub herbivore: SpeciesParams,
    /// Carnivore parameters. Missing entries fall back to the carnivore table.
    #[serde(deserialize_with = "carnivore_table")]
    pub carnivore: SpeciesParams,
}

fn herbivore_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SpeciesParams, D::Error> {
    overlay_table(SpeciesParams::herbivore(), deserializer)
}

fn carnivore_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SpeciesParams, D::Error> {
    overlay_table(SpeciesParams::carnivore(), deserializer)
}

/// Reads a partial species table and fills the gaps from `base`.
fn overlay_table<'de, D: Deserializer<'de>>(
    base: SpeciesParams,
    deserializer: D,
) -> Result<SpeciesParams, D::Error> {
    let overrides = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut table = serde_json::to_value(base).map_err(D::Error::custom)?;
    if let serde_json::Value::Object(fields) = &mut table {
        fields.extend(overrides);
    }
    serde_json::from_value(table).map_err(D::Error::custom)
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: 2400.0,
            field_height: 2400.0,
            cell_size: 200.0,
            start_plants: 2000,
            start_herbivores: 100,
            start_carnivores: 40,
            plant_seed_margin: 20.0,
            organism_seed_margin: 50.0,
            mutation_rate: 0.05,
            birth_jitter: 20.0,
            graph_memory: 100_000,
            plant: PlantParams::default(),
            herbivore: SpeciesParams::herbivore(),
            carnivore: SpeciesParams::carnivore(),
        }
    }
}

impl SimConfig {
    /// Returns the parameter table of a species.
    pub fn species(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Herbivore => &self.herbivore,
            Species::Carnivore => &self.carnivore,
        }
    }

    /// Checks every startup invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0)
            || !self.field_width.is_finite()
            || !self.field_height.is_finite()
        {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        finite("cell_size", self.cell_size as f64)?;
        if self.cell_size <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "cell_size",
                value: self.cell_size as f64,
            });
        }
        if !(self.plant.spread_min <= self.cell_size) {
            return Err(ConfigError::CellSmallerThanSpread {
                cell_size: self.cell_size,
                separation: self.plant.spread_min,
            });
        }
        let non_negative = [
            ("plant_seed_margin", self.plant_seed_margin),
            ("organism_seed_margin", self.organism_seed_margin),
            ("mutation_rate", self.mutation_rate),
            ("birth_jitter", self.birth_jitter),
        ];
        for (name, value) in non_negative {
            finite(name, value as f64)?;
            if value < 0.0 {
                return Err(ConfigError::Negative {
                    name,
                    value: value as f64,
                });
            }
        }
        finite("plant.size", self.plant.size as f64)?;
        if self.plant.size <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "plant.size",
                value: self.plant.size as f64,
            });
        }
        if self.plant.spread_max < 0 {
            return Err(ConfigError::NonPositive {
                name: "plant.spread_max",
                value: self.plant.spread_max as f64,
            });
        }
        self.plant.spread_period.check("plant.spread_period")?;
        self.plant.first_spread.check("plant.first_spread")?;
        for channel in &self.plant.color {
            channel.check("plant.color")?;
        }

        self.herbivore.validate(Species::Herbivore, self.cell_size)?;
        self.carnivore.validate(Species::Carnivore, self.cell_size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn cell_smaller_than_vision_is_rejected() {
        let config = SimConfig {
            cell_size: 150.0,
            ..SimConfig::default()
        };
        match config.validate() {
            Err(ConfigError::CellSmallerThanVision { species, .. }) => {
                assert_eq!(species, Species::Carnivore);
            }
            other => panic!("unexpected validation result: {other:?}"),
        }
    }

    #[test]
    fn inverted_lifespan_is_rejected() {
        let mut config = SimConfig::default();
        config.herbivore.lifespan = Bounds::new(10, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                name: "lifespan",
                ..
            })
        ));
    }

    #[test]
    fn negative_mutation_rate_is_rejected() {
        let config = SimConfig {
            mutation_rate: -0.1,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                name: "mutation_rate",
                ..
            })
        ));
    }

    #[test]
    fn infinite_birth_jitter_is_rejected() {
        let config = SimConfig {
            birth_jitter: f32::INFINITY,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite {
                name: "birth_jitter",
                ..
            })
        ));
    }

    #[test]
    fn nan_vision_length_is_rejected() {
        let mut config = SimConfig::default();
        config.herbivore.vision_length = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CellSmallerThanVision {
                species: Species::Herbivore,
                ..
            })
        ));
    }

    #[test]
    fn infinite_start_energy_is_rejected() {
        let mut config = SimConfig::default();
        config.carnivore.start_energy = Bounds::new(70.0, f32::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite {
                name: "start_energy",
                ..
            })
        ));
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let mut config = SimConfig::default();
        config.carnivore.move_cost_divisor = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "move_cost_divisor",
                ..
            })
        ));
    }
}
