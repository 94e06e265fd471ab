//! Population statistics.

use crate::types::OrganismKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of organisms per variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub plant: usize,
    pub herbivore: usize,
    pub carnivore: usize,
}

impl KindCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: OrganismKind) {
        match kind {
            OrganismKind::Plant => self.plant += 1,
            OrganismKind::Herbivore => self.herbivore += 1,
            OrganismKind::Carnivore => self.carnivore += 1,
        }
    }

    pub fn get(&self, kind: OrganismKind) -> usize {
        match kind {
            OrganismKind::Plant => self.plant,
            OrganismKind::Herbivore => self.herbivore,
            OrganismKind::Carnivore => self.carnivore,
        }
    }

    pub fn total(&self) -> usize {
        self.plant + self.herbivore + self.carnivore
    }
}

/// Population breakdown of an environment.
///
/// `live` only counts organisms that are still alive. `recorded` counts every
/// record the environment retains, dead ones included, until they are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCount {
    pub live: KindCounts,
    pub recorded: KindCounts,
}

impl PopulationCount {
    pub fn total_live(&self) -> usize {
        self.live.total()
    }

    pub fn total_recorded(&self) -> usize {
        self.recorded.total()
    }

    pub fn total_dead(&self) -> usize {
        self.recorded.total() - self.live.total()
    }
}

impl fmt::Display for PopulationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in OrganismKind::all() {
            writeln!(
                f,
                "  {}: {} alive ({} recorded)",
                kind,
                self.live.get(kind),
                self.recorded.get(kind)
            )?;
        }
        write!(f, "  Total: {} alive, {} dead", self.total_live(), self.total_dead())
    }
}
