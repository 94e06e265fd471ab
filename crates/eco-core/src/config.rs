//! Configuration types for the ecosystem.

use crate::types::{NewOrganism, Weather};
use serde::{Deserialize, Serialize};

/// Daily metabolic cost paid by every living organism
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpkeepConfig {
    /// Flat daily cost for plants
    pub plant_upkeep: f64,
    /// Base daily cost for animals
    pub animal_base_upkeep: f64,
    /// Additional daily cost per point of animal speed
    pub animal_speed_upkeep: f64,
}

impl Default for UpkeepConfig {
    fn default() -> Self {
        Self {
            plant_upkeep: 1.0,
            animal_base_upkeep: 2.0,
            animal_speed_upkeep: 0.1,
        }
    }
}

impl UpkeepConfig {
    pub fn animal_upkeep(&self, speed: u32) -> f64 {
        self.animal_base_upkeep + speed as f64 * self.animal_speed_upkeep
    }
}

/// Rules applied by the interaction engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionRules {
    /// Energy a carnivore loses when a hunt with candidates fails (0 disables)
    pub failed_hunt_cost: f64,
}

impl Default for InteractionRules {
    fn default() -> Self {
        Self {
            failed_hunt_cost: 5.0,
        }
    }
}

/// Full environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    /// Environment name
    pub name: String,
    /// Starting weather
    pub weather: Weather,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Daily upkeep costs
    pub upkeep: UpkeepConfig,
    /// Hunting and feeding rules
    pub rules: InteractionRules,
    /// Chance (0.0 to 1.0) that the weather changes at the start of a day
    pub weather_drift_chance: f64,
    /// Organisms added when the environment is built
    pub initial_population: Vec<NewOrganism>,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            name: "Forest Ecosystem".to_string(),
            weather: Weather::Sunny,
            seed: 0,
            upkeep: UpkeepConfig::default(),
            rules: InteractionRules::default(),
            weather_drift_chance: 0.0,
            initial_population: default_population(),
        }
    }
}

impl EcosystemConfig {
    /// Same settings with no starting organisms
    pub fn empty(name: impl Into<String>, weather: Weather) -> Self {
        Self {
            name: name.into(),
            weather,
            initial_population: Vec::new(),
            ..Default::default()
        }
    }
}

fn default_population() -> Vec<NewOrganism> {
    vec![
        NewOrganism::Plant {
            species: "Oak Tree".to_string(),
            energy: 100.0,
            growth_rate: 0.2,
        },
        NewOrganism::Plant {
            species: "Pine Tree".to_string(),
            energy: 90.0,
            growth_rate: 0.15,
        },
        NewOrganism::Plant {
            species: "Grass".to_string(),
            energy: 50.0,
            growth_rate: 0.3,
        },
        NewOrganism::Herbivore {
            species: "Rabbit".to_string(),
            energy: 70.0,
            speed: 3,
            plant_preference: "grass".to_string(),
        },
        NewOrganism::Carnivore {
            species: "Wolf".to_string(),
            energy: 80.0,
            speed: 5,
            hunting_efficiency: 0.7,
        },
    ]
}

/// Settings for the interactive shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Upper bound on days simulated by one "multiple days" command
    pub max_batch_days: u32,
    /// Ecosystem to build at startup
    pub ecosystem: EcosystemConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_batch_days: 10,
            ecosystem: EcosystemConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let upkeep = UpkeepConfig::default();
        assert_eq!(upkeep.plant_upkeep, 1.0);
        assert!((upkeep.animal_upkeep(5) - 2.5).abs() < 1e-9);

        let rules = InteractionRules::default();
        assert_eq!(rules.failed_hunt_cost, 5.0);

        let config = EcosystemConfig::default();
        assert_eq!(config.name, "Forest Ecosystem");
        assert_eq!(config.weather, Weather::Sunny);
        assert_eq!(config.weather_drift_chance, 0.0);
        assert_eq!(config.initial_population.len(), 5);
        assert!(config.initial_population.iter().all(|o| o.validate().is_ok()));

        assert_eq!(CliConfig::default().max_batch_days, 10);
    }

    #[test]
    fn test_empty_config() {
        let config = EcosystemConfig::empty("Pond", Weather::Rainy);
        assert_eq!(config.name, "Pond");
        assert!(config.initial_population.is_empty());
        assert_eq!(config.upkeep.plant_upkeep, 1.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = EcosystemConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EcosystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.name, deserialized.name);
        assert_eq!(config.initial_population, deserialized.initial_population);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"name":"Meadow","weather":"cloudy","upkeep":{"plant_upkeep":0.5}}"#;
        let config: EcosystemConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "Meadow");
        assert_eq!(config.weather, Weather::Cloudy);
        assert_eq!(config.upkeep.plant_upkeep, 0.5);
        assert_eq!(config.upkeep.animal_base_upkeep, 2.0);
        assert_eq!(config.rules.failed_hunt_cost, 5.0);
        assert_eq!(config.initial_population.len(), 5);
    }
}
