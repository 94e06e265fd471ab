//! Core type definitions for the ecosystem.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Allowed energy at creation time
pub const ENERGY_RANGE: RangeInclusive<f64> = 10.0..=100.0;
/// Allowed plant growth rate
pub const GROWTH_RATE_RANGE: RangeInclusive<f64> = 0.1..=0.5;
/// Allowed carnivore hunting efficiency
pub const HUNTING_EFFICIENCY_RANGE: RangeInclusive<f64> = 0.3..=0.7;

/// Unique identifier for an organism, minted by the environment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganismId(pub String);

impl OrganismId {
    /// Build the identifier for the `sequence`-th organism of `kind`, e.g. `P001`.
    pub fn mint(kind: OrganismKind, sequence: u64) -> Self {
        Self(format!("{}{:03}", kind.id_prefix(), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrganismId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrganismId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for OrganismId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for OrganismId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Concrete organism variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganismKind {
    Plant,
    Herbivore,
    Carnivore,
}

impl OrganismKind {
    pub fn all() -> [OrganismKind; 3] {
        [OrganismKind::Plant, OrganismKind::Herbivore, OrganismKind::Carnivore]
    }

    pub fn id_prefix(&self) -> char {
        match self {
            OrganismKind::Plant => 'P',
            OrganismKind::Herbivore => 'H',
            OrganismKind::Carnivore => 'C',
        }
    }

    pub fn is_animal(&self) -> bool {
        !matches!(self, OrganismKind::Plant)
    }
}

impl fmt::Display for OrganismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrganismKind::Plant => "Plant",
            OrganismKind::Herbivore => "Herbivore",
            OrganismKind::Carnivore => "Carnivore",
        };
        f.write_str(name)
    }
}

impl FromStr for OrganismKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plant" => Ok(OrganismKind::Plant),
            "herbivore" => Ok(OrganismKind::Herbivore),
            "carnivore" => Ok(OrganismKind::Carnivore),
            other => Err(Error::InvalidInput(format!("unknown organism type '{}'", other))),
        }
    }
}

/// Weather condition of the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
}

impl Weather {
    pub fn all() -> [Weather; 3] {
        [Weather::Sunny, Weather::Cloudy, Weather::Rainy]
    }

    /// Photosynthesis efficiency under this weather
    pub fn photosynthesis_multiplier(&self) -> f64 {
        match self {
            Weather::Sunny => 1.0,
            Weather::Cloudy => 0.6,
            Weather::Rainy => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rainy => "rainy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "sunny" => Ok(Weather::Sunny),
            "cloudy" => Ok(Weather::Cloudy),
            "rainy" => Ok(Weather::Rainy),
            other => Err(Error::InvalidInput(format!(
                "unknown weather condition '{}' (expected sunny, cloudy or rainy)",
                other
            ))),
        }
    }
}

/// Diet category of an animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Herbivore,
    Carnivore,
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DietType::Herbivore => f.write_str("herbivore"),
            DietType::Carnivore => f.write_str("carnivore"),
        }
    }
}

/// Creation request for a new organism; the environment assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NewOrganism {
    Plant {
        species: String,
        energy: f64,
        growth_rate: f64,
    },
    Herbivore {
        species: String,
        energy: f64,
        speed: u32,
        plant_preference: String,
    },
    Carnivore {
        species: String,
        energy: f64,
        speed: u32,
        hunting_efficiency: f64,
    },
}

impl NewOrganism {
    pub fn kind(&self) -> OrganismKind {
        match self {
            NewOrganism::Plant { .. } => OrganismKind::Plant,
            NewOrganism::Herbivore { .. } => OrganismKind::Herbivore,
            NewOrganism::Carnivore { .. } => OrganismKind::Carnivore,
        }
    }

    pub fn species(&self) -> &str {
        match self {
            NewOrganism::Plant { species, .. }
            | NewOrganism::Herbivore { species, .. }
            | NewOrganism::Carnivore { species, .. } => species,
        }
    }

    pub fn energy(&self) -> f64 {
        match self {
            NewOrganism::Plant { energy, .. }
            | NewOrganism::Herbivore { energy, .. }
            | NewOrganism::Carnivore { energy, .. } => *energy,
        }
    }

    /// Check every variant-specific constraint without side effects.
    pub fn validate(&self) -> Result<()> {
        if self.species().trim().is_empty() {
            return Err(Error::invalid("species name must not be empty"));
        }
        check_range("energy", self.energy(), &ENERGY_RANGE)?;

        match self {
            NewOrganism::Plant { growth_rate, .. } => {
                check_range("growth rate", *growth_rate, &GROWTH_RATE_RANGE)
            }
            NewOrganism::Herbivore {
                speed,
                plant_preference,
                ..
            } => {
                check_speed(*speed)?;
                if plant_preference.trim().is_empty() {
                    return Err(Error::invalid("plant preference must not be empty"));
                }
                Ok(())
            }
            NewOrganism::Carnivore {
                speed,
                hunting_efficiency,
                ..
            } => {
                check_speed(*speed)?;
                check_range("hunting efficiency", *hunting_efficiency, &HUNTING_EFFICIENCY_RANGE)
            }
        }
    }
}

fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if !value.is_finite() || !range.contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            field,
            range.start(),
            range.end(),
            value
        )));
    }
    Ok(())
}

fn check_speed(speed: u32) -> Result<()> {
    if speed == 0 {
        return Err(Error::invalid("speed must be a positive integer"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_id() {
        assert_eq!(OrganismId::mint(OrganismKind::Plant, 1), "P001");
        assert_eq!(OrganismId::mint(OrganismKind::Herbivore, 42), "H042");
        assert_eq!(OrganismId::mint(OrganismKind::Carnivore, 1234), "C1234");
    }

    #[test]
    fn test_weather_parse() {
        assert_eq!("sunny".parse::<Weather>().unwrap(), Weather::Sunny);
        assert_eq!("cloudy".parse::<Weather>().unwrap(), Weather::Cloudy);
        assert_eq!(" rainy ".parse::<Weather>().unwrap(), Weather::Rainy);
        assert!(matches!(
            "foggy".parse::<Weather>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_weather_multipliers() {
        assert_eq!(Weather::Sunny.photosynthesis_multiplier(), 1.0);
        assert_eq!(Weather::Cloudy.photosynthesis_multiplier(), 0.6);
        assert_eq!(Weather::Rainy.photosynthesis_multiplier(), 0.3);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Plant".parse::<OrganismKind>().unwrap(), OrganismKind::Plant);
        assert_eq!("carnivore".parse::<OrganismKind>().unwrap(), OrganismKind::Carnivore);
        assert!("fungus".parse::<OrganismKind>().is_err());
        assert!(OrganismKind::Herbivore.is_animal());
        assert!(!OrganismKind::Plant.is_animal());
    }

    #[test]
    fn test_weather_serde() {
        let json = serde_json::to_string(&Weather::Cloudy).unwrap();
        assert_eq!(json, "\"cloudy\"");
        let weather: Weather = serde_json::from_str("\"rainy\"").unwrap();
        assert_eq!(weather, Weather::Rainy);
    }

    #[test]
    fn test_new_organism_validation() {
        let plant = NewOrganism::Plant {
            species: "Grass".to_string(),
            energy: 50.0,
            growth_rate: 0.3,
        };
        assert!(plant.validate().is_ok());
        assert_eq!(plant.kind(), OrganismKind::Plant);

        let weak = NewOrganism::Plant {
            species: "Grass".to_string(),
            energy: 5.0,
            growth_rate: 0.3,
        };
        assert!(matches!(weak.validate(), Err(Error::InvalidInput(_))));

        let fast_grower = NewOrganism::Plant {
            species: "Grass".to_string(),
            energy: 50.0,
            growth_rate: 0.6,
        };
        assert!(fast_grower.validate().is_err());

        let frozen = NewOrganism::Herbivore {
            species: "Rabbit".to_string(),
            energy: 50.0,
            speed: 0,
            plant_preference: "Grass".to_string(),
        };
        assert!(frozen.validate().is_err());

        let sloppy = NewOrganism::Carnivore {
            species: "Wolf".to_string(),
            energy: 50.0,
            speed: 5,
            hunting_efficiency: 0.9,
        };
        assert!(sloppy.validate().is_err());

        let unnamed = NewOrganism::Carnivore {
            species: "  ".to_string(),
            energy: 50.0,
            speed: 5,
            hunting_efficiency: 0.5,
        };
        assert!(unnamed.validate().is_err());

        let nan = NewOrganism::Plant {
            species: "Fern".to_string(),
            energy: f64::NAN,
            growth_rate: 0.2,
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_new_organism_bounds_inclusive() {
        let low = NewOrganism::Carnivore {
            species: "Fox".to_string(),
            energy: 10.0,
            speed: 1,
            hunting_efficiency: 0.3,
        };
        let high = NewOrganism::Carnivore {
            species: "Lynx".to_string(),
            energy: 100.0,
            speed: 7,
            hunting_efficiency: 0.7,
        };
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_new_organism_deserialize() {
        let json = r#"{"kind":"herbivore","species":"Deer","energy":60.0,"speed":4,"plant_preference":"Fern"}"#;
        let request: NewOrganism = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind(), OrganismKind::Herbivore);
        assert_eq!(request.species(), "Deer");
    }
}
