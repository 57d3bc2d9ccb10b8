pub mod acceptance;
pub mod operators;

use std::sync::Arc;
use std::time as stdtime;

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use model::base_types::Cost;
use model::instance::Instance;
use solution::Planning;

use crate::traject_builder::{Direction, Selection};
use crate::Solver;
use acceptance::AcceptanceCriterion;
use operators::{destroy, repair, DestroyOperator, RepairOperator};

enum Outcome {
    NewGlobalBest,
    BetterThanCurrent,
    Accepted,
    Rejected,
}

impl Outcome {
    fn index(&self) -> usize {
        match self {
            Outcome::NewGlobalBest => 0,
            Outcome::BetterThanCurrent => 1,
            Outcome::Accepted => 2,
            Outcome::Rejected => 3,
        }
    }
}

/// Adaptive large neighborhood search: repeatedly destroy part of the
/// current planning and repair it, choosing the operators by adaptive
/// weights and judging the result with the configured acceptance criterion.
pub struct Alns {
    instance: Arc<Instance>,
}

impl Solver for Alns {
    fn initialize(instance: Arc<Instance>) -> Alns {
        Alns { instance }
    }

    fn solve(&self) -> Planning {
        let config = &self.instance.config().alns;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let start_time = stdtime::Instant::now();

        let mut current = Planning::empty(self.instance.clone());
        repair(
            &mut current,
            RepairOperator {
                selection: Selection::Greedy,
                direction: Direction::Forward,
            },
            &mut rng,
        );
        println!("initial cost: {:.2}", current.total_cost());

        let destroy_operators = [
            DestroyOperator::RandomRemoval,
            DestroyOperator::WorstRemoval,
        ];
        let repair_operators = [
            RepairOperator {
                selection: Selection::Greedy,
                direction: Direction::Forward,
            },
            RepairOperator {
                selection: Selection::Greedy,
                direction: Direction::Reverse,
            },
            RepairOperator {
                selection: Selection::Random,
                direction: Direction::Forward,
            },
            RepairOperator {
                selection: Selection::Random,
                direction: Direction::Reverse,
            },
        ];
        let mut destroy_weights = [1.0; 2];
        let mut repair_weights = [1.0; 4];
        let mut criterion = AcceptanceCriterion::new(config.acceptance);

        let mut best = current.clone();
        let mut best_objective = objective(&best);

        for iteration in 1..=config.iterations {
            let destroy_index = roulette(&destroy_weights, &mut rng);
            let repair_index = roulette(&repair_weights, &mut rng);

            // the operators work on their own copy, rejection is cheap
            let mut candidate = current.clone();
            destroy(
                &mut candidate,
                destroy_operators[destroy_index],
                config.degree_of_destruction,
                &mut rng,
            );
            repair(&mut candidate, repair_operators[repair_index], &mut rng);
            #[cfg(debug_assertions)]
            candidate.verify_consistency();

            let current_objective = objective(&current);
            let candidate_objective = objective(&candidate);
            let accepted = criterion.accept(current_objective, candidate_objective, &mut rng);

            let outcome = if candidate_objective < best_objective {
                best = candidate.clone();
                best_objective = candidate_objective;
                println!(
                    "new best at iteration {}: cost {:.2} ({} + {}, elapsed {:0.2}sec)",
                    iteration,
                    candidate.total_cost(),
                    destroy_operators[destroy_index],
                    repair_operators[repair_index],
                    start_time.elapsed().as_secs_f32(),
                );
                current = candidate;
                Outcome::NewGlobalBest
            } else if accepted {
                let outcome = if candidate_objective < current_objective {
                    Outcome::BetterThanCurrent
                } else {
                    Outcome::Accepted
                };
                current = candidate;
                outcome
            } else {
                Outcome::Rejected
            };

            let reward = config.rewards[outcome.index()];
            destroy_weights[destroy_index] = config.operator_decay
                * destroy_weights[destroy_index]
                + (1.0 - config.operator_decay) * reward;
            repair_weights[repair_index] = config.operator_decay * repair_weights[repair_index]
                + (1.0 - config.operator_decay) * reward;
        }

        println!(
            "minimized cost: {:.2} ({} containers unplanned, elapsed {:0.2}sec)",
            best.total_cost(),
            best.number_of_unplanned(),
            start_time.elapsed().as_secs_f32(),
        );
        best
    }
}

pub fn objective(planning: &Planning) -> f64 {
    planning.total_cost() / 1000.0
}

/// Index into weights, chosen with probability proportional to the weight.
fn roulette(weights: &[Cost], rng: &mut impl Rng) -> usize {
    let total: Cost = weights.iter().sum();
    let mut pick = rng.gen::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        pick -= weight;
        if pick <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use solution::{LegChoice, Planning};

    use super::operators::{destroy, repair, DestroyOperator, RepairOperator};
    use super::{objective, Alns};
    use crate::test_utilities::{direct_leg, scenario, two_hop_legs};
    use crate::traject_builder::{Direction, Selection};
    use crate::Solver;

    #[test]
    fn worst_removal_with_greedy_repair_strictly_improves() {
        let mut spec = direct_leg();
        spec.seats = 4;
        let data = scenario(&[spec], 4);
        let mut planning = Planning::empty(data.instance.clone());
        // three containers on the scheduled leg, the fourth deliberately on
        // an expensive ad-hoc trip even though a seat is still free
        for &container in &data.containers[..3] {
            planning
                .add_traject(container, vec![LegChoice::Scheduled(data.capacities[0])])
                .unwrap();
        }
        let adhoc = data.instance.adhoc_full_trip(data.containers[3]).unwrap();
        planning
            .add_traject(data.containers[3], vec![LegChoice::Adhoc(adhoc)])
            .unwrap();
        let before = objective(&planning);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        destroy(&mut planning, DestroyOperator::WorstRemoval, 0.25, &mut rng);
        assert_eq!(planning.number_of_unplanned(), 1);
        repair(
            &mut planning,
            RepairOperator {
                selection: Selection::Greedy,
                direction: Direction::Forward,
            },
            &mut rng,
        );
        planning.verify_consistency();
        assert!(objective(&planning) < before);
        assert_eq!(planning.total_cost(), 4.0 * 105.0);
    }

    #[test]
    fn random_removal_unplans_the_requested_share() {
        let mut spec = direct_leg();
        spec.seats = 4;
        let data = scenario(&[spec], 4);
        let mut planning = Planning::empty(data.instance.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        repair(
            &mut planning,
            RepairOperator {
                selection: Selection::Greedy,
                direction: Direction::Forward,
            },
            &mut rng,
        );
        destroy(&mut planning, DestroyOperator::RandomRemoval, 0.5, &mut rng);
        planning.verify_consistency();
        assert_eq!(planning.number_of_unplanned(), 2);
    }

    #[test]
    fn alns_keeps_the_optimum_of_a_small_instance() {
        let mut legs = vec![direct_leg()];
        legs.extend(two_hop_legs());
        let data = scenario(&legs, 2);
        let best = Alns::initialize(data.instance.clone()).solve();
        best.verify_consistency();
        // one container on the direct leg (105), the other via the two hops
        // (145); no ad-hoc trip can beat either
        assert_eq!(best.total_cost(), 250.0);
        assert_eq!(best.number_of_unplanned(), 0);
    }

    #[test]
    fn alns_runs_are_reproducible_with_a_seed() {
        let data = scenario(&two_hop_legs(), 2);
        let first = Alns::initialize(data.instance.clone()).solve();
        let second = Alns::initialize(data.instance.clone()).solve();
        assert_eq!(first.total_cost(), second.total_cost());
    }
}
