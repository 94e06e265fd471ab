//! Ecosystem simulation engine.
//!
//! This crate holds the organism hierarchy, the interaction engine and the
//! environment that stores the population and advances it day by day.

pub mod organism;
pub mod interaction;
pub mod environment;

pub use organism::{Animal, Carnivore, Herbivore, InfoField, Organism, OrganismInfo, Plant, Traits, Variant};
pub use interaction::{HuntOutcome, InteractionOutcome};
pub use environment::{DayReport, Environment, EnvironmentSnapshot, HuntRecord};
