//! Interactive menu over an [`Environment`].

use anyhow::Result;
use eco_core::{Error, NewOrganism, OrganismKind};
use eco_world::{DayReport, Environment};
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

const PLANT_SPECIES: [&str; 5] = ["Oak Tree", "Pine Tree", "Grass", "Fern", "Shrub"];
const HERBIVORE_SPECIES: [&str; 5] = ["Rabbit", "Deer", "Mouse", "Squirrel", "Beaver"];
const CARNIVORE_SPECIES: [&str; 5] = ["Wolf", "Fox", "Hawk", "Snake", "Lynx"];
const GROWTH_RATES: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];
const HERBIVORE_SPEEDS: [u32; 5] = [1, 2, 3, 4, 5];
const CARNIVORE_SPEEDS: [u32; 5] = [3, 4, 5, 6, 7];
const PLANT_PREFERENCES: [&str; 5] = ["Grass", "Oak Tree", "Pine Tree", "Shrub", "Fern"];
const HUNTING_EFFICIENCIES: [f64; 5] = [0.3, 0.4, 0.5, 0.6, 0.7];

/// The input stream ended while the shell was waiting for an answer
#[derive(Debug, ThisError)]
#[error("input closed")]
struct InputClosed;

pub struct Shell<R, W> {
    env: Environment,
    max_batch_days: u32,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(env: Environment, max_batch_days: u32, input: R, output: W) -> Self {
        Self {
            env,
            max_batch_days: max_batch_days.max(1),
            input,
            output,
        }
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_status()?;
            self.print_menu()?;

            let choice = match self.prompt("\nEnter your choice (0-8): ") {
                Ok(choice) => choice,
                Err(err) if err.is::<InputClosed>() => break,
                Err(err) => return Err(err),
            };

            let outcome = match choice.as_str() {
                "1" => self.add_organism(),
                "2" => self.simulate_one_day(),
                "3" => self.simulate_many_days(),
                "4" => self.display_all(),
                "5" => self.list_by_type(),
                "6" => self.find_by_id(),
                "7" => self.remove_by_id(),
                "8" => self.change_weather(),
                "0" => {
                    writeln!(self.output, "Thank you for using the Ecosystem Simulation.")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please enter a number between 0 and 8.")?;
                    Ok(())
                }
            };

            if let Err(err) = outcome {
                if err.is::<InputClosed>() {
                    break;
                }
                if err.downcast_ref::<Error>().is_none() {
                    return Err(err);
                }
                warn!(error = %err, "Command failed");
                writeln!(self.output, "Error: {}", err)?;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn print_status(&mut self) -> Result<()> {
        let snapshot = self.env.snapshot();
        writeln!(self.output, "\n===== ECOSYSTEM SIMULATION =====")?;
        writeln!(self.output, "Environment: {}", snapshot.name)?;
        writeln!(self.output, "Weather: {}", snapshot.weather)?;
        writeln!(self.output, "Total Organisms: {}", snapshot.total_organisms)?;
        writeln!(self.output, "\nPopulation Breakdown:")?;
        writeln!(self.output, "{}", snapshot.population)?;
        writeln!(self.output, "\nSimulation Day: {}", snapshot.day_count)?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\nMenu:")?;
        writeln!(self.output, "1. Add Organism to Environment")?;
        writeln!(self.output, "2. Simulate One Day")?;
        writeln!(self.output, "3. Simulate Multiple Days")?;
        writeln!(self.output, "4. Display All Organisms")?;
        writeln!(self.output, "5. List Organisms by Type")?;
        writeln!(self.output, "6. Find Organism by ID")?;
        writeln!(self.output, "7. Remove Organism")?;
        writeln!(self.output, "8. Change Weather")?;
        writeln!(self.output, "0. Exit")?;
        Ok(())
    }

    fn add_organism(&mut self) -> Result<()> {
        let kind = self.choose("Select organism type:", &OrganismKind::all())?;

        let species_list = match kind {
            OrganismKind::Plant => PLANT_SPECIES,
            OrganismKind::Herbivore => HERBIVORE_SPECIES,
            OrganismKind::Carnivore => CARNIVORE_SPECIES,
        };
        let species = self.choose("Select species:", &species_list)?.to_string();
        let energy: f64 = self.prompt_number("Enter energy level (10-100): ")?;

        let request = match kind {
            OrganismKind::Plant => NewOrganism::Plant {
                species,
                energy,
                growth_rate: self.choose("Select growth rate:", &GROWTH_RATES)?,
            },
            OrganismKind::Herbivore => NewOrganism::Herbivore {
                species,
                energy,
                speed: self.choose("Select speed:", &HERBIVORE_SPEEDS)?,
                plant_preference: self
                    .choose("Select plant preference:", &PLANT_PREFERENCES)?
                    .to_string(),
            },
            OrganismKind::Carnivore => NewOrganism::Carnivore {
                species,
                energy,
                speed: self.choose("Select speed:", &CARNIVORE_SPEEDS)?,
                hunting_efficiency: self
                    .choose("Select hunting efficiency:", &HUNTING_EFFICIENCIES)?,
            },
        };

        let id = self.env.add_organism(request)?;
        writeln!(self.output, "{} '{}' added successfully.", kind, id)?;
        Ok(())
    }

    fn simulate_one_day(&mut self) -> Result<()> {
        let report = self.env.simulate_day();
        writeln!(self.output, "Day {} simulated successfully.", report.day)?;
        self.print_day_summary(std::slice::from_ref(&report))
    }

    fn simulate_many_days(&mut self) -> Result<()> {
        let question = format!(
            "Enter number of days to simulate (1-{}): ",
            self.max_batch_days
        );
        let days: u32 = self.prompt_number(&question)?;
        if days > self.max_batch_days {
            return Err(Error::InvalidInput(format!(
                "days must be between 1 and {}",
                self.max_batch_days
            ))
            .into());
        }

        let reports = self.env.simulate_multiple_days(days)?;
        writeln!(self.output, "{} days simulated successfully.", days)?;
        writeln!(self.output, "Current day: {}", self.env.day_count())?;
        self.print_day_summary(&reports)
    }

    fn print_day_summary(&mut self, reports: &[DayReport]) -> Result<()> {
        let fed: usize = reports.iter().map(DayReport::successful_hunts).sum();
        let died: usize = reports.iter().map(|r| r.deaths.len()).sum();
        debug!(days = reports.len(), fed, died, "Simulation command finished");

        let population = self.env.get_population_count();
        writeln!(self.output, "Living organisms: {}", population.total_live())?;
        writeln!(self.output, "Dead organisms: {}", population.total_dead())?;
        Ok(())
    }

    fn display_all(&mut self) -> Result<()> {
        writeln!(self.output, "\nAll Organisms:")?;
        if self.env.organisms().is_empty() {
            writeln!(self.output, "(none)")?;
        }
        for organism in self.env.organisms() {
            writeln!(self.output, "{}", organism.display_info())?;
        }
        Ok(())
    }

    fn list_by_type(&mut self) -> Result<()> {
        let kind = self.choose("Select organism type:", &OrganismKind::all())?;
        let organisms = self.env.get_organisms_by_type(kind);
        writeln!(self.output, "\n{} organisms: {}", kind, organisms.len())?;
        for organism in organisms {
            writeln!(self.output, "{}", organism.display_info())?;
        }
        Ok(())
    }

    fn find_by_id(&mut self) -> Result<()> {
        let id = self.prompt("Enter organism ID: ")?;
        let organism = self.env.find_organism_by_id(&id)?;
        writeln!(self.output, "{}", organism.display_info())?;
        Ok(())
    }

    fn remove_by_id(&mut self) -> Result<()> {
        let id = self.prompt("Enter organism ID to remove: ")?;
        let removed = self.env.remove_organism(&id)?;
        writeln!(self.output, "Organism '{}' removed.", removed.id())?;
        Ok(())
    }

    fn change_weather(&mut self) -> Result<()> {
        let condition = self.prompt("Enter weather (sunny, cloudy, rainy): ")?;
        let weather = self.env.change_weather(&condition.to_ascii_lowercase())?;
        writeln!(self.output, "Weather changed to {}.", weather)?;
        Ok(())
    }

    /// Show a numbered list and return the picked option
    fn choose<T: Copy + std::fmt::Display>(&mut self, title: &str, options: &[T]) -> Result<T> {
        writeln!(self.output, "\n{}", title)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, option)?;
        }

        let question = format!("Enter choice (1-{}): ", options.len());
        let picked: usize = self.prompt_number(&question)?;
        picked
            .checked_sub(1)
            .and_then(|index| options.get(index))
            .copied()
            .ok_or_else(|| Error::InvalidInput(format!("invalid selection {}", picked)).into())
    }

    fn prompt_number<T: FromStr>(&mut self, question: &str) -> Result<T> {
        let answer = self.prompt(question)?;
        answer
            .parse()
            .map_err(|_| Error::InvalidInput(format!("'{}' is not a valid number", answer)).into())
    }

    fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }
}
