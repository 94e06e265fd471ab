//! Feeding and hunting rules between organisms.
//!
//! Everything here is a free function over organisms handed in by the caller;
//! the engine keeps no state of its own. Randomness comes from the caller's
//! generator so a seeded environment replays identically.

use crate::organism::Organism;
use eco_core::{InteractionRules, OrganismId, OrganismKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Result of an animal's hunt over a set of candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HuntOutcome {
    /// Prey was caught and eaten
    Fed { prey: OrganismId, energy_gained: f64 },
    /// No candidate was suitable prey
    NoPreyFound,
    /// Suitable prey existed but every attempt failed
    Unsuccessful,
    /// The hunter is dead or cannot hunt
    Idle,
}

impl HuntOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, HuntOutcome::Fed { .. })
    }
}

/// Result of a direct interaction between two organisms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractionOutcome {
    Fed { prey: OrganismId, energy_gained: f64 },
    /// A predation attempt was made and missed
    Failed,
    /// The pair has no ecological relationship in this direction
    NoEffect,
}

/// Probability that a carnivore catches a herbivore, clamped to [0, 1]
pub fn success_chance(hunting_efficiency: f64, hunter_speed: u32, prey_speed: u32) -> f64 {
    if prey_speed == 0 {
        return 1.0;
    }
    let chance = hunting_efficiency * (hunter_speed as f64 / prey_speed as f64);
    if chance.is_nan() {
        return 0.0;
    }
    chance.clamp(0.0, 1.0)
}

/// Hunter eats prey outright: the prey dies and its whole energy store moves
/// to the hunter. Returns the energy gained.
pub fn feed(hunter: &mut Organism, prey: &mut Organism) -> f64 {
    let prey_energy = prey.kill();
    let gained = hunter.gain_energy(prey_energy);
    hunter.record_meal();

    debug!(
        event = "feeding",
        hunter_id = %hunter.id(),
        prey_id = %prey.id(),
        energy_gained = gained,
        hunter_energy = hunter.energy(),
        "Organism fed"
    );

    gained
}

/// Let `hunter` pick at most one prey from `candidates`, in iteration order.
///
/// Herbivores take the first living plant of their preferred species.
/// Carnivores roll once per living herbivore and take the first success; a
/// carnivore that had prey but caught nothing pays `rules.failed_hunt_cost`.
pub fn hunt<'a, I, R>(
    hunter: &mut Organism,
    candidates: I,
    rules: &InteractionRules,
    rng: &mut R,
) -> HuntOutcome
where
    I: IntoIterator<Item = &'a mut Organism>,
    R: Rng,
{
    if !hunter.is_alive() {
        return HuntOutcome::Idle;
    }

    match hunter.kind() {
        OrganismKind::Plant => HuntOutcome::Idle,
        OrganismKind::Herbivore => forage(hunter, candidates),
        OrganismKind::Carnivore => stalk(hunter, candidates, rules, rng),
    }
}

fn forage<'a, I>(hunter: &mut Organism, candidates: I) -> HuntOutcome
where
    I: IntoIterator<Item = &'a mut Organism>,
{
    let Some(herbivore) = hunter.as_herbivore() else {
        return HuntOutcome::Idle;
    };

    let target = candidates.into_iter().find(|candidate| {
        candidate.is_alive()
            && candidate.kind() == OrganismKind::Plant
            && herbivore.prefers(candidate.species_name())
    });

    match target {
        Some(prey) => {
            let energy_gained = feed(hunter, prey);
            HuntOutcome::Fed {
                prey: prey.id().clone(),
                energy_gained,
            }
        }
        None => {
            trace!(hunter_id = %hunter.id(), "No preferred plant available");
            HuntOutcome::NoPreyFound
        }
    }
}

fn stalk<'a, I, R>(
    hunter: &mut Organism,
    candidates: I,
    rules: &InteractionRules,
    rng: &mut R,
) -> HuntOutcome
where
    I: IntoIterator<Item = &'a mut Organism>,
    R: Rng,
{
    let Some((efficiency, speed)) = hunter
        .as_carnivore()
        .map(|carnivore| (carnivore.hunting_efficiency(), carnivore.speed()))
    else {
        return HuntOutcome::Idle;
    };

    let mut attempts = 0u32;
    for prey in candidates {
        if !prey.is_alive() {
            continue;
        }
        let Some(prey_speed) = prey.as_herbivore().map(|herbivore| herbivore.speed()) else {
            continue;
        };

        attempts += 1;
        let chance = success_chance(efficiency, speed, prey_speed);
        let roll: f64 = rng.gen();
        trace!(
            hunter_id = %hunter.id(),
            prey_id = %prey.id(),
            chance,
            roll,
            "Hunt attempt"
        );

        if roll < chance {
            let energy_gained = feed(hunter, prey);
            return HuntOutcome::Fed {
                prey: prey.id().clone(),
                energy_gained,
            };
        }
    }

    if attempts == 0 {
        return HuntOutcome::NoPreyFound;
    }

    hunter.drain_energy(rules.failed_hunt_cost);
    debug!(
        event = "hunt_failed",
        hunter_id = %hunter.id(),
        attempts,
        cost = rules.failed_hunt_cost,
        hunter_energy = hunter.energy(),
        "Carnivore hunt failed"
    );
    HuntOutcome::Unsuccessful
}

/// Direct interaction of `actor` with `other`.
///
/// Plants never initiate anything. A herbivore eats a living plant whatever
/// its species. A carnivore makes a single predation roll against a living
/// herbivore.
pub fn interact<R: Rng>(actor: &mut Organism, other: &mut Organism, rng: &mut R) -> InteractionOutcome {
    if !actor.is_alive() || !other.is_alive() {
        return InteractionOutcome::NoEffect;
    }

    match (actor.kind(), other.kind()) {
        (OrganismKind::Herbivore, OrganismKind::Plant) => {
            let energy_gained = feed(actor, other);
            InteractionOutcome::Fed {
                prey: other.id().clone(),
                energy_gained,
            }
        }
        (OrganismKind::Carnivore, OrganismKind::Herbivore) => {
            let (Some(carnivore), Some(herbivore)) = (actor.as_carnivore(), other.as_herbivore())
            else {
                return InteractionOutcome::NoEffect;
            };
            let chance = success_chance(
                carnivore.hunting_efficiency(),
                carnivore.speed(),
                herbivore.speed(),
            );

            if rng.gen::<f64>() < chance {
                let energy_gained = feed(actor, other);
                InteractionOutcome::Fed {
                    prey: other.id().clone(),
                    energy_gained,
                }
            } else {
                InteractionOutcome::Failed
            }
        }
        _ => InteractionOutcome::NoEffect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::tests::{carnivore, herbivore, plant};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Always draws 0.0, so any positive chance succeeds
    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Always draws just under 1.0, so only a certain chance succeeds
    fn unlucky() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_success_chance() {
        assert_eq!(success_chance(0.7, 10, 5), 1.0);
        assert!((success_chance(0.5, 3, 6) - 0.25).abs() < 1e-9);
        assert!((success_chance(0.3, 1, 1) - 0.3).abs() < 1e-9);
        assert_eq!(success_chance(0.5, 0, 4), 0.0);
    }

    #[test]
    fn test_herbivore_eats_first_preferred_plant() {
        let mut rabbit = herbivore("H001", 40.0, 3, "Grass");
        let mut oak = plant("P002", "Oak Tree", 90.0, 0.2);
        let mut grass_a = plant("P003", "grass", 30.0, 0.3);
        let mut grass_b = plant("P004", "Grass", 60.0, 0.3);

        let outcome = hunt(
            &mut rabbit,
            vec![&mut oak, &mut grass_a, &mut grass_b],
            &InteractionRules::default(),
            &mut lucky(),
        );

        assert_eq!(
            outcome,
            HuntOutcome::Fed {
                prey: "P003".into(),
                energy_gained: 30.0
            }
        );
        assert_eq!(rabbit.energy(), 70.0);
        assert_eq!(rabbit.as_animal().unwrap().food_eaten(), 1);
        assert!(!grass_a.is_alive());
        assert_eq!(grass_a.energy(), 0.0);
        assert!(grass_b.is_alive());
        assert!(oak.is_alive());
    }

    #[test]
    fn test_herbivore_without_preferred_plant() {
        let mut rabbit = herbivore("H001", 40.0, 3, "Fern");
        let mut oak = plant("P002", "Oak Tree", 90.0, 0.2);
        let mut dead_fern = plant("P003", "Fern", 10.0, 0.1);
        dead_fern.consume_energy(10.0).unwrap();

        let outcome = hunt(
            &mut rabbit,
            vec![&mut oak, &mut dead_fern],
            &InteractionRules::default(),
            &mut lucky(),
        );

        assert_eq!(outcome, HuntOutcome::NoPreyFound);
        assert_eq!(rabbit.energy(), 40.0);
        assert_eq!(rabbit.as_animal().unwrap().food_eaten(), 0);
        assert_eq!(oak.energy(), 90.0);
    }

    #[test]
    fn test_carnivore_certain_success() {
        let mut wolf = carnivore("C001", 50.0, 10, 0.7);
        let mut rabbit = herbivore("H002", 45.0, 5, "Grass");

        let outcome = hunt(
            &mut wolf,
            vec![&mut rabbit],
            &InteractionRules::default(),
            &mut unlucky(),
        );

        assert!(outcome.is_success());
        assert_eq!(wolf.energy(), 95.0);
        assert_eq!(wolf.as_animal().unwrap().food_eaten(), 1);
        assert!(!rabbit.is_alive());
        assert_eq!(rabbit.energy(), 0.0);
    }

    #[test]
    fn test_carnivore_takes_first_success_in_order() {
        let mut wolf = carnivore("C001", 50.0, 5, 0.5);
        let mut oak = plant("P002", "Oak Tree", 90.0, 0.2);
        let mut deer = herbivore("H003", 60.0, 5, "Fern");
        let mut mouse = herbivore("H004", 20.0, 1, "Grass");

        let outcome = hunt(
            &mut wolf,
            vec![&mut oak, &mut deer, &mut mouse],
            &InteractionRules::default(),
            &mut lucky(),
        );

        assert_eq!(
            outcome,
            HuntOutcome::Fed {
                prey: "H003".into(),
                energy_gained: 60.0
            }
        );
        assert!(mouse.is_alive());
        assert!(oak.is_alive());
    }

    #[test]
    fn test_carnivore_unsuccessful_pays_cost() {
        let mut fox = carnivore("C001", 50.0, 3, 0.3);
        let mut deer = herbivore("H002", 60.0, 5, "Fern");
        let mut beaver = herbivore("H003", 40.0, 4, "Shrub");

        let rules = InteractionRules {
            failed_hunt_cost: 5.0,
        };
        let outcome = hunt(&mut fox, vec![&mut deer, &mut beaver], &rules, &mut unlucky());

        assert_eq!(outcome, HuntOutcome::Unsuccessful);
        assert_eq!(fox.energy(), 45.0);
        assert_eq!(fox.as_animal().unwrap().food_eaten(), 0);
        assert!(deer.is_alive());
        assert!(beaver.is_alive());
    }

    #[test]
    fn test_carnivore_without_prey() {
        let mut fox = carnivore("C001", 50.0, 3, 0.3);
        let mut grass = plant("P002", "Grass", 50.0, 0.3);

        let outcome = hunt(
            &mut fox,
            vec![&mut grass],
            &InteractionRules::default(),
            &mut lucky(),
        );

        assert_eq!(outcome, HuntOutcome::NoPreyFound);
        assert_eq!(fox.energy(), 50.0);
    }

    #[test]
    fn test_dead_hunter_and_plant_are_idle() {
        let mut wolf = carnivore("C001", 10.0, 5, 0.7);
        wolf.consume_energy(10.0).unwrap();
        let mut rabbit = herbivore("H002", 40.0, 3, "Grass");
        let rules = InteractionRules::default();

        assert_eq!(
            hunt(&mut wolf, vec![&mut rabbit], &rules, &mut lucky()),
            HuntOutcome::Idle
        );
        assert!(rabbit.is_alive());

        let mut oak = plant("P003", "Oak Tree", 90.0, 0.2);
        assert_eq!(
            hunt(&mut oak, vec![&mut rabbit], &rules, &mut lucky()),
            HuntOutcome::Idle
        );
    }

    #[test]
    fn test_herbivore_interact_ignores_preference() {
        let mut rabbit = herbivore("H001", 40.0, 3, "Grass");
        let mut oak = plant("P002", "Oak Tree", 35.0, 0.2);

        let outcome = interact(&mut rabbit, &mut oak, &mut lucky());

        assert_eq!(
            outcome,
            InteractionOutcome::Fed {
                prey: "P002".into(),
                energy_gained: 35.0
            }
        );
        assert_eq!(rabbit.energy(), 75.0);
        assert!(!oak.is_alive());
    }

    #[test]
    fn test_carnivore_interact() {
        let mut wolf = carnivore("C001", 50.0, 10, 0.7);
        let mut deer = herbivore("H002", 30.0, 5, "Fern");
        assert!(matches!(
            interact(&mut wolf, &mut deer, &mut unlucky()),
            InteractionOutcome::Fed { .. }
        ));
        assert_eq!(wolf.energy(), 80.0);

        let mut fox = carnivore("C003", 50.0, 3, 0.3);
        let mut beaver = herbivore("H004", 30.0, 5, "Shrub");
        assert_eq!(
            interact(&mut fox, &mut beaver, &mut unlucky()),
            InteractionOutcome::Failed
        );
        assert_eq!(fox.energy(), 50.0);
        assert!(beaver.is_alive());
    }

    #[test]
    fn test_interact_without_relationship() {
        let mut oak = plant("P001", "Oak Tree", 90.0, 0.2);
        let mut rabbit = herbivore("H002", 40.0, 3, "Grass");
        let mut wolf = carnivore("C003", 50.0, 5, 0.7);

        assert_eq!(interact(&mut oak, &mut rabbit, &mut lucky()), InteractionOutcome::NoEffect);
        assert_eq!(interact(&mut rabbit, &mut wolf, &mut lucky()), InteractionOutcome::NoEffect);
        assert_eq!(interact(&mut wolf, &mut oak, &mut lucky()), InteractionOutcome::NoEffect);
        assert_eq!(oak.energy(), 90.0);
        assert_eq!(rabbit.energy(), 40.0);
        assert_eq!(wolf.energy(), 50.0);
    }

    #[test]
    fn test_seeded_hunts_are_reproducible() {
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut lynx = carnivore("C001", 50.0, 4, 0.4);
            let mut prey: Vec<Organism> = (0..5)
                .map(|i| herbivore(&format!("H{:03}", i + 2), 30.0, 5, "Grass"))
                .collect();
            let outcome = hunt(&mut lynx, prey.iter_mut(), &InteractionRules::default(), &mut rng);
            (outcome, lynx.energy())
        };

        assert_eq!(run(7), run(7));
        assert_eq!(run(1234), run(1234));
    }
}
