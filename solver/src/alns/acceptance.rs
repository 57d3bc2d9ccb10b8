use rand::Rng;

use model::config::{Acceptance, Cooling};

/// Decides whether a candidate solution replaces the current one. The
/// simulated-annealing variant cools down by one step per asked decision.
pub enum AcceptanceCriterion {
    HillClimbing,
    SimulatedAnnealing {
        temperature: f64,
        end_temperature: f64,
        step: f64,
        cooling: Cooling,
    },
}

impl AcceptanceCriterion {
    pub fn new(acceptance: Acceptance) -> AcceptanceCriterion {
        match acceptance {
            Acceptance::HillClimbing => AcceptanceCriterion::HillClimbing,
            Acceptance::SimulatedAnnealing {
                start_temperature,
                end_temperature,
                step,
                cooling,
            } => AcceptanceCriterion::SimulatedAnnealing {
                temperature: start_temperature,
                end_temperature,
                step,
                cooling,
            },
        }
    }

    pub fn accept(&mut self, current: f64, candidate: f64, rng: &mut impl Rng) -> bool {
        match self {
            AcceptanceCriterion::HillClimbing => candidate <= current,
            AcceptanceCriterion::SimulatedAnnealing {
                temperature,
                end_temperature,
                step,
                cooling,
            } => {
                let probability = ((current - candidate) / *temperature).exp();
                let accepted = rng.gen::<f64>() < probability;
                *temperature = match cooling {
                    Cooling::Linear => (*temperature - *step).max(*end_temperature),
                    Cooling::Exponential => (*step * *temperature).max(*end_temperature),
                };
                accepted
            }
        }
    }
}
