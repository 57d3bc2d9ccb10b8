use std::fmt;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use model::base_types::ContainerIdx;
use solution::Planning;

use crate::traject_builder::{Direction, Selection, TrajectBuilder};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DestroyOperator {
    RandomRemoval,
    WorstRemoval,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RepairOperator {
    pub selection: Selection,
    pub direction: Direction,
}

/// Unplans floor(total containers * degree_of_destruction) containers:
/// uniformly chosen ones (random removal) or the most expensive ones (worst
/// removal).
pub fn destroy(
    planning: &mut Planning,
    operator: DestroyOperator,
    degree_of_destruction: f64,
    rng: &mut impl Rng,
) {
    let count =
        (planning.instance().number_of_containers() as f64 * degree_of_destruction) as usize;
    let mut planned: Vec<ContainerIdx> = planning.planned().sorted().collect();
    match operator {
        DestroyOperator::RandomRemoval => planned.shuffle(rng),
        DestroyOperator::WorstRemoval => planned.sort_by(|a, b| {
            planning
                .cost_of(*b)
                .partial_cmp(&planning.cost_of(*a))
                .unwrap()
                .then(a.cmp(b))
        }),
    }
    for container in planned.into_iter().take(count) {
        planning
            .remove_traject(container)
            .expect("planned container could not be removed");
    }
}

/// Rebuilds a traject for every unplanned container, in shuffled order.
/// Containers for which even the ad-hoc fallback is infeasible stay
/// unplanned.
pub fn repair(planning: &mut Planning, operator: RepairOperator, rng: &mut impl Rng) {
    let mut unplanned: Vec<ContainerIdx> = planning.unplanned().sorted().collect();
    unplanned.shuffle(rng);
    for container in unplanned {
        let legs = TrajectBuilder::new(planning).build(
            container,
            operator.selection,
            operator.direction,
            rng,
        );
        planning
            .add_traject(container, legs)
            .expect("traject builder produced an invalid chain");
    }
}

impl fmt::Display for DestroyOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DestroyOperator::RandomRemoval => write!(f, "random_removal"),
            DestroyOperator::WorstRemoval => write!(f, "worst_removal"),
        }
    }
}

impl fmt::Display for RepairOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let selection = match self.selection {
            Selection::Greedy => "greedy",
            Selection::Random => "random",
        };
        let direction = match self.direction {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        };
        write!(f, "{}_repair_{}", selection, direction)
    }
}
