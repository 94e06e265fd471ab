//! The environment: population store and day-cycle scheduler.

use crate::interaction::{self, HuntOutcome, InteractionOutcome};
use crate::organism::Organism;
use eco_core::{
    EcosystemConfig, Error, InteractionRules, NewOrganism, OrganismId, OrganismKind,
    PopulationCount, Result, UpkeepConfig, Weather,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, Level};

/// Snapshot of environment-level state for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub name: String,
    pub weather: Weather,
    pub day_count: u64,
    pub total_organisms: usize,
    pub population: PopulationCount,
}

/// One hunt performed during a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntRecord {
    pub hunter: OrganismId,
    pub outcome: HuntOutcome,
}

/// What happened during one simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    /// Day number reached at the end of this step
    pub day: u64,
    pub weather: Weather,
    /// Total energy produced by photosynthesis
    pub photosynthesis_gain: f64,
    pub hunts: Vec<HuntRecord>,
    /// Organisms that died during this day, in insertion order
    pub deaths: Vec<OrganismId>,
}

impl DayReport {
    pub fn successful_hunts(&self) -> usize {
        self.hunts.iter().filter(|h| h.outcome.is_success()).count()
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    weather: Weather,
    day_count: u64,
    organisms: Vec<Organism>,
    next_id: u64,
    organism_count: usize,
    upkeep: UpkeepConfig,
    rules: InteractionRules,
    weather_drift_chance: f64,
    rng: ChaCha8Rng,
}

impl Environment {
    /// An empty environment with default rules and seed 0
    pub fn new(name: impl Into<String>, weather: Weather) -> Self {
        let config = EcosystemConfig::empty(name, weather);
        Self {
            name: config.name,
            weather: config.weather,
            day_count: 0,
            organisms: Vec::new(),
            next_id: 1,
            organism_count: 0,
            upkeep: config.upkeep,
            rules: config.rules,
            weather_drift_chance: config.weather_drift_chance,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Build an environment and add its configured starting population.
    pub fn from_config(config: EcosystemConfig) -> Result<Self> {
        validate_config(&config)?;

        let mut env = Self {
            name: config.name,
            weather: config.weather,
            day_count: 0,
            organisms: Vec::new(),
            next_id: 1,
            organism_count: 0,
            upkeep: config.upkeep,
            rules: config.rules,
            weather_drift_chance: config.weather_drift_chance,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        };

        for request in config.initial_population {
            env.add_organism(request)?;
        }

        info!(
            environment = %env.name,
            weather = %env.weather,
            organisms = env.organisms.len(),
            "Environment created"
        );
        Ok(env)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn day_count(&self) -> u64 {
        self.day_count
    }

    /// Numeric part of the next id to be minted
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of records currently held
    pub fn organism_count(&self) -> usize {
        self.organism_count
    }

    pub fn set_weather(&mut self, weather: Weather) {
        if weather != self.weather {
            debug!(from = %self.weather, to = %weather, "Weather changed");
        }
        self.weather = weather;
    }

    /// Change the weather from its textual name.
    pub fn change_weather(&mut self, condition: &str) -> Result<Weather> {
        let weather: Weather = condition.parse()?;
        self.set_weather(weather);
        Ok(weather)
    }

    /// Validate `request`, mint its id and store the new organism.
    pub fn add_organism(&mut self, request: NewOrganism) -> Result<OrganismId> {
        let kind = request.kind();
        let id = OrganismId::mint(kind, self.next_id);
        if self.position(id.as_str()).is_some() {
            return Err(Error::InvalidInput(format!("organism id {} already exists", id)));
        }

        let organism = Organism::new(id.clone(), request)?;
        debug!(
            event = "organism_added",
            organism_id = %id,
            kind = %kind,
            species = organism.species_name(),
            energy = organism.energy(),
            "Organism added"
        );

        self.organisms.push(organism);
        self.next_id += 1;
        self.organism_count += 1;
        Ok(id)
    }

    /// Permanently delete a record, returning it.
    pub fn remove_organism(&mut self, id: &str) -> Result<Organism> {
        let index = self.position(id).ok_or_else(|| Error::not_found(id))?;
        let organism = self.organisms.remove(index);
        self.organism_count -= 1;
        debug!(event = "organism_removed", organism_id = %id, "Organism removed");
        Ok(organism)
    }

    pub fn find_organism_by_id(&self, id: &str) -> Result<&Organism> {
        self.organisms
            .iter()
            .find(|organism| organism.id() == id)
            .ok_or_else(|| Error::not_found(id))
    }

    pub fn find_organism_by_id_mut(&mut self, id: &str) -> Result<&mut Organism> {
        self.organisms
            .iter_mut()
            .find(|organism| organism.id() == id)
            .ok_or_else(|| Error::not_found(id))
    }

    /// All records, dead or alive, in insertion order
    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    /// All records of `kind`, dead or alive, in insertion order
    pub fn get_organisms_by_type(&self, kind: OrganismKind) -> Vec<&Organism> {
        self.organisms
            .iter()
            .filter(|organism| organism.kind() == kind)
            .collect()
    }

    pub fn get_population_count(&self) -> PopulationCount {
        let mut count = PopulationCount::default();
        for organism in &self.organisms {
            count.recorded.record(organism.kind());
            if organism.is_alive() {
                count.live.record(organism.kind());
            }
        }
        count
    }

    pub fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            name: self.name.clone(),
            weather: self.weather,
            day_count: self.day_count,
            total_organisms: self.organisms.len(),
            population: self.get_population_count(),
        }
    }

    /// Direct interaction of one stored organism with another.
    pub fn interact(&mut self, actor_id: &str, target_id: &str) -> Result<InteractionOutcome> {
        let actor = self.position(actor_id).ok_or_else(|| Error::not_found(actor_id))?;
        let target = self
            .position(target_id)
            .ok_or_else(|| Error::not_found(target_id))?;
        if actor == target {
            return Err(Error::invalid("an organism cannot interact with itself"));
        }

        let (actor, target) = pair_mut(&mut self.organisms, actor, target);
        Ok(interaction::interact(actor, target, &mut self.rng))
    }

    /// Advance the environment by one day.
    #[instrument(skip(self), fields(day = self.day_count + 1, environment = %self.name))]
    pub fn simulate_day(&mut self) -> DayReport {
        self.drift_weather();

        let alive_at_dawn: Vec<bool> = self.organisms.iter().map(Organism::is_alive).collect();

        let mut photosynthesis_gain = 0.0;
        for organism in self.organisms.iter_mut() {
            if organism.is_alive() && organism.kind() == OrganismKind::Plant {
                photosynthesis_gain += organism.photosynthesize(self.weather);
            }
        }

        let mut hunts = Vec::new();
        for kind in [OrganismKind::Herbivore, OrganismKind::Carnivore] {
            for index in 0..self.organisms.len() {
                let hunter = &self.organisms[index];
                if !hunter.is_alive() || hunter.kind() != kind {
                    continue;
                }
                if let Some(record) = self.hunt_at(index) {
                    hunts.push(record);
                }
            }
        }

        for organism in self.organisms.iter_mut() {
            if organism.is_alive() {
                let cost = organism.daily_upkeep(&self.upkeep);
                organism.drain_energy(cost);
            }
        }

        let mut deaths = Vec::new();
        for (organism, was_alive) in self.organisms.iter_mut().zip(alive_at_dawn) {
            organism.confirm_death();
            if was_alive && !organism.is_alive() {
                debug!(
                    event = "organism_death",
                    organism_id = %organism.id(),
                    kind = %organism.kind(),
                    species = organism.species_name(),
                    "Organism died"
                );
                deaths.push(organism.id().clone());
            }
        }

        self.day_count += 1;

        let report = DayReport {
            day: self.day_count,
            weather: self.weather,
            photosynthesis_gain,
            hunts,
            deaths,
        };
        let population = self.get_population_count();

        info!(
            event = "day_complete",
            day = report.day,
            weather = %report.weather,
            photosynthesis_gain = report.photosynthesis_gain,
            hunts = report.hunts.len(),
            successful_hunts = report.successful_hunts(),
            deaths = report.deaths.len(),
            alive = population.total_live(),
            "Day simulated"
        );
        event!(
            Level::DEBUG,
            gauge_name = "population_alive",
            gauge_value = population.total_live(),
            day = report.day,
            "Population gauge"
        );

        report
    }

    /// Advance the environment by `days` days.
    pub fn simulate_multiple_days(&mut self, days: u32) -> Result<Vec<DayReport>> {
        if days == 0 {
            return Err(Error::invalid("number of days must be positive"));
        }
        Ok((0..days).map(|_| self.simulate_day()).collect())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.organisms.iter().position(|organism| organism.id() == id)
    }

    /// Hunt with the organism at `index`; every other record is a candidate.
    fn hunt_at(&mut self, index: usize) -> Option<HuntRecord> {
        let (before, rest) = self.organisms.split_at_mut(index);
        let (hunter, after) = rest.split_first_mut()?;
        let candidates = before.iter_mut().chain(after.iter_mut());

        let outcome = interaction::hunt(hunter, candidates, &self.rules, &mut self.rng);
        Some(HuntRecord {
            hunter: hunter.id().clone(),
            outcome,
        })
    }

    fn drift_weather(&mut self) {
        if self.weather_drift_chance <= 0.0 {
            return;
        }
        if self.rng.gen::<f64>() < self.weather_drift_chance {
            if let Some(&weather) = Weather::all().choose(&mut self.rng) {
                self.set_weather(weather);
            }
        }
    }
}

fn validate_config(config: &EcosystemConfig) -> Result<()> {
    let upkeep = &config.upkeep;
    for (field, value) in [
        ("plant upkeep", upkeep.plant_upkeep),
        ("animal base upkeep", upkeep.animal_base_upkeep),
        ("animal speed upkeep", upkeep.animal_speed_upkeep),
        ("failed hunt cost", config.rules.failed_hunt_cost),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} must be a non-negative number, got {}",
                field, value
            )));
        }
    }
    if !(0.0..=1.0).contains(&config.weather_drift_chance) {
        return Err(Error::InvalidInput(format!(
            "weather drift chance must be between 0 and 1, got {}",
            config.weather_drift_chance
        )));
    }
    Ok(())
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    if first < second {
        let (low, high) = items.split_at_mut(second);
        (&mut low[first], &mut high[0])
    } else {
        let (low, high) = items.split_at_mut(first);
        (&mut high[0], &mut low[second])
    }
}
