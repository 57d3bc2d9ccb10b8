use std::sync::Arc;

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use model::instance::Instance;
use solution::Planning;

use crate::alns::operators::{repair, RepairOperator};
use crate::traject_builder::{Direction, Selection};
use crate::Solver;

/// Plans every container with the greedy forward traject builder, starting
/// from an empty planning. Also used as the initial solution of the ALNS.
pub struct Greedy {
    instance: Arc<Instance>,
}

impl Solver for Greedy {
    fn initialize(instance: Arc<Instance>) -> Greedy {
        Greedy { instance }
    }

    fn solve(&self) -> Planning {
        let mut planning = Planning::empty(self.instance.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(self.instance.config().alns.seed.unwrap_or(0));
        repair(
            &mut planning,
            RepairOperator {
                selection: Selection::Greedy,
                direction: Direction::Forward,
            },
            &mut rng,
        );
        planning
    }
}

#[cfg(test)]
mod tests {
    use super::Greedy;
    use crate::test_utilities::{direct_leg, scenario};
    use crate::Solver;

    #[test]
    fn greedy_saturates_the_scheduled_capacity_before_going_adhoc() {
        let mut spec = direct_leg();
        spec.seats = 2;
        let data = scenario(&[spec], 3);
        let planning = Greedy::initialize(data.instance.clone()).solve();
        planning.verify_consistency();
        assert_eq!(planning.number_of_unplanned(), 0);
        // two containers share the scheduled leg, the third is driven
        assert_eq!(planning.adhoc_capacities().len(), 1);
        // 260 price, 0.06 kg/tonne-km over 120 km at 2.5 t weighted by the
        // emission factor, 2h early at 5/h
        let adhoc_cost = 260.0 + 0.1 * (0.06 * 120.0 * 2.5) + 5.0 * 2.0;
        assert_eq!(planning.total_cost(), 2.0 * 105.0 + adhoc_cost);
    }
}
