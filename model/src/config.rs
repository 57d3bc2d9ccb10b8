use crate::base_types::Cost;

/// Solver parameters. Defaults apply when the input carries no parameters
/// object.
pub struct Config {
    pub alns: AlnsConfig,
}

pub struct AlnsConfig {
    pub iterations: u64,
    pub degree_of_destruction: f64, // fraction of containers unplanned per destroy step
    pub operator_decay: f64,
    pub rewards: [Cost; 4], // new global best / better than current / accepted / rejected
    pub seed: Option<u64>,
    pub acceptance: Acceptance,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Acceptance {
    HillClimbing,
    SimulatedAnnealing {
        start_temperature: f64,
        end_temperature: f64,
        step: f64,
        cooling: Cooling,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Cooling {
    Linear,      // temperature = max(end, temperature - step)
    Exponential, // temperature = max(end, step * temperature), 0 < step < 1
}

impl Default for Config {
    fn default() -> Config {
        Config {
            alns: AlnsConfig::default(),
        }
    }
}

impl Default for AlnsConfig {
    fn default() -> AlnsConfig {
        AlnsConfig {
            iterations: 10_000,
            degree_of_destruction: 0.25,
            operator_decay: 0.8,
            rewards: [3.0, 2.0, 1.0, 0.5],
            seed: None,
            acceptance: Acceptance::HillClimbing,
        }
    }
}
