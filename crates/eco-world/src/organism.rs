//! Organism state and per-variant behavior.
//!
//! Every organism shares an id, a species name and an energy store. What it
//! is (plant, herbivore, carnivore) lives in its [`Traits`] payload, and each
//! payload implements [`Variant`] to supply its kind, its extra display
//! fields and its daily upkeep.

use eco_core::{
    DietType, Error, NewOrganism, OrganismId, OrganismKind, Result, UpkeepConfig, Weather,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capabilities each concrete organism variant provides
pub trait Variant {
    fn kind(&self) -> OrganismKind;

    /// Append this variant's fields to a display snapshot
    fn describe(&self, info: &mut OrganismInfo);

    /// Energy this variant burns per simulated day
    fn daily_upkeep(&self, upkeep: &UpkeepConfig) -> f64;

    fn animal(&self) -> Option<&Animal> {
        None
    }

    fn animal_mut(&mut self) -> Option<&mut Animal> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    growth_rate: f64,
}

impl Plant {
    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    /// Energy gained from one day of photosynthesis under `weather`
    pub fn photosynthesis_gain(&self, weather: Weather) -> f64 {
        self.growth_rate * weather.photosynthesis_multiplier()
    }
}

impl Variant for Plant {
    fn kind(&self) -> OrganismKind {
        OrganismKind::Plant
    }

    fn describe(&self, info: &mut OrganismInfo) {
        info.push("Growth Rate", self.growth_rate);
    }

    fn daily_upkeep(&self, upkeep: &UpkeepConfig) -> f64 {
        upkeep.plant_upkeep
    }
}

/// Fields shared by every animal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    speed: u32,
    diet_type: DietType,
    food_eaten: u32,
}

impl Animal {
    fn new(speed: u32, diet_type: DietType) -> Self {
        Self {
            speed,
            diet_type,
            food_eaten: 0,
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn diet_type(&self) -> DietType {
        self.diet_type
    }

    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    fn describe(&self, info: &mut OrganismInfo) {
        info.push("Speed", self.speed);
        info.push("Diet", self.diet_type);
        info.push("Food Eaten", self.food_eaten);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Herbivore {
    animal: Animal,
    plant_preference: String,
}

impl Herbivore {
    pub fn speed(&self) -> u32 {
        self.animal.speed
    }

    pub fn plant_preference(&self) -> &str {
        &self.plant_preference
    }

    /// Whether this herbivore is willing to eat plants of `species`
    pub fn prefers(&self, species: &str) -> bool {
        species.trim().eq_ignore_ascii_case(self.plant_preference.trim())
    }
}

impl Variant for Herbivore {
    fn kind(&self) -> OrganismKind {
        OrganismKind::Herbivore
    }

    fn describe(&self, info: &mut OrganismInfo) {
        self.animal.describe(info);
        info.push("Preference", &self.plant_preference);
    }

    fn daily_upkeep(&self, upkeep: &UpkeepConfig) -> f64 {
        upkeep.animal_upkeep(self.animal.speed)
    }

    fn animal(&self) -> Option<&Animal> {
        Some(&self.animal)
    }

    fn animal_mut(&mut self) -> Option<&mut Animal> {
        Some(&mut self.animal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carnivore {
    animal: Animal,
    hunting_efficiency: f64,
}

impl Carnivore {
    pub fn speed(&self) -> u32 {
        self.animal.speed
    }

    pub fn hunting_efficiency(&self) -> f64 {
        self.hunting_efficiency
    }
}

impl Variant for Carnivore {
    fn kind(&self) -> OrganismKind {
        OrganismKind::Carnivore
    }

    fn describe(&self, info: &mut OrganismInfo) {
        self.animal.describe(info);
        info.push("Hunting Efficiency", format!("{:.2}", self.hunting_efficiency));
    }

    fn daily_upkeep(&self, upkeep: &UpkeepConfig) -> f64 {
        upkeep.animal_upkeep(self.animal.speed)
    }

    fn animal(&self) -> Option<&Animal> {
        Some(&self.animal)
    }

    fn animal_mut(&mut self) -> Option<&mut Animal> {
        Some(&mut self.animal)
    }
}

/// Variant-specific payload of an organism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Traits {
    Plant(Plant),
    Herbivore(Herbivore),
    Carnivore(Carnivore),
}

impl Traits {
    fn variant(&self) -> &dyn Variant {
        match self {
            Traits::Plant(plant) => plant,
            Traits::Herbivore(herbivore) => herbivore,
            Traits::Carnivore(carnivore) => carnivore,
        }
    }

    fn variant_mut(&mut self) -> &mut dyn Variant {
        match self {
            Traits::Plant(plant) => plant,
            Traits::Herbivore(herbivore) => herbivore,
            Traits::Carnivore(carnivore) => carnivore,
        }
    }
}

/// An organism in the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    id: OrganismId,
    species_name: String,
    energy: f64,
    is_alive: bool,
    traits: Traits,
}

impl Organism {
    /// Build a living organism from a validated creation request.
    pub fn new(id: OrganismId, request: NewOrganism) -> Result<Self> {
        request.validate()?;
        if id.as_str().trim().is_empty() {
            return Err(Error::invalid("organism id must not be empty"));
        }

        let (species_name, energy, traits) = match request {
            NewOrganism::Plant {
                species,
                energy,
                growth_rate,
            } => (species, energy, Traits::Plant(Plant { growth_rate })),
            NewOrganism::Herbivore {
                species,
                energy,
                speed,
                plant_preference,
            } => (
                species,
                energy,
                Traits::Herbivore(Herbivore {
                    animal: Animal::new(speed, DietType::Herbivore),
                    plant_preference,
                }),
            ),
            NewOrganism::Carnivore {
                species,
                energy,
                speed,
                hunting_efficiency,
            } => (
                species,
                energy,
                Traits::Carnivore(Carnivore {
                    animal: Animal::new(speed, DietType::Carnivore),
                    hunting_efficiency,
                }),
            ),
        };

        Ok(Self {
            id,
            species_name,
            energy,
            is_alive: true,
            traits,
        })
    }

    pub fn id(&self) -> &OrganismId {
        &self.id
    }

    pub fn species_name(&self) -> &str {
        &self.species_name
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn kind(&self) -> OrganismKind {
        self.traits.variant().kind()
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub fn as_plant(&self) -> Option<&Plant> {
        match &self.traits {
            Traits::Plant(plant) => Some(plant),
            _ => None,
        }
    }

    pub fn as_herbivore(&self) -> Option<&Herbivore> {
        match &self.traits {
            Traits::Herbivore(herbivore) => Some(herbivore),
            _ => None,
        }
    }

    pub fn as_carnivore(&self) -> Option<&Carnivore> {
        match &self.traits {
            Traits::Carnivore(carnivore) => Some(carnivore),
            _ => None,
        }
    }

    pub fn as_animal(&self) -> Option<&Animal> {
        self.traits.variant().animal()
    }

    /// Spend `amount` energy. Returns whether the organism is still alive.
    pub fn consume_energy(&mut self, amount: f64) -> Result<bool> {
        if amount.is_nan() || amount < 0.0 {
            return Err(Error::InvalidInput(format!(
                "energy consumption must be non-negative, got {}",
                amount
            )));
        }
        self.drain_energy(amount);
        Ok(self.is_alive)
    }

    /// Photosynthesize for one day. Animals and dead plants gain nothing.
    pub fn photosynthesize(&mut self, weather: Weather) -> f64 {
        let gain = match &self.traits {
            Traits::Plant(plant) if self.is_alive => plant.photosynthesis_gain(weather),
            _ => return 0.0,
        };
        self.gain_energy(gain)
    }

    pub fn daily_upkeep(&self, upkeep: &UpkeepConfig) -> f64 {
        self.traits.variant().daily_upkeep(upkeep)
    }

    /// Structured snapshot of this organism for display
    pub fn display_info(&self) -> OrganismInfo {
        let mut info = OrganismInfo::default();
        info.push("ID", &self.id);
        info.push("Species", &self.species_name);
        info.push("Energy", format!("{:.2}", self.energy));
        info.push("Status", if self.is_alive { "Alive" } else { "Dead" });
        self.traits.variant().describe(&mut info);
        info
    }

    /// Mark the organism dead if its energy is exhausted.
    /// Returns true when this call is what recorded the death.
    pub fn confirm_death(&mut self) -> bool {
        if self.is_alive && self.energy <= 0.0 {
            self.energy = 0.0;
            self.is_alive = false;
            return true;
        }
        false
    }

    /// Subtract energy, clamping at zero. Negative amounts are ignored.
    pub(crate) fn drain_energy(&mut self, amount: f64) {
        self.set_energy(self.energy - amount.max(0.0));
    }

    /// Add energy to a living organism; returns the amount actually added.
    pub(crate) fn gain_energy(&mut self, amount: f64) -> f64 {
        if !self.is_alive || amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        self.set_energy(self.energy + amount);
        amount
    }

    /// Drop energy to zero. Returns the energy held just before.
    pub(crate) fn kill(&mut self) -> f64 {
        let energy = self.energy;
        self.set_energy(0.0);
        energy
    }

    pub(crate) fn record_meal(&mut self) {
        if let Some(animal) = self.traits.variant_mut().animal_mut() {
            animal.food_eaten += 1;
        }
    }

    fn set_energy(&mut self, value: f64) {
        if !self.is_alive {
            return;
        }
        self.energy = if value.is_nan() { 0.0 } else { value.max(0.0) };
        if self.energy <= 0.0 {
            self.energy = 0.0;
            self.is_alive = false;
        }
    }
}

/// One labelled field of an organism snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoField {
    pub label: &'static str,
    pub value: String,
}

/// Ordered display snapshot: base fields first, then variant fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganismInfo {
    pub fields: Vec<InfoField>,
}

impl OrganismInfo {
    pub fn push(&mut self, label: &'static str, value: impl fmt::Display) {
        self.fields.push(InfoField {
            label,
            value: value.to_string(),
        });
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.label).collect()
    }
}

impl fmt::Display for OrganismInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            match field.label {
                "ID" | "Species" => f.write_str(&field.value)?,
                label => write!(f, "{}: {}", label, field.value)?,
            }
        }
        Ok(())
    }
}
