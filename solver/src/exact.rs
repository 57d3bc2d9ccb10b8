use std::collections::HashMap;
use std::sync::Arc;

use time::DateTime;

use model::base_types::{ContainerIdx, LegIdx};
use model::instance::Instance;
use solution::{LegChoice, Planning};

/// Comparison sense of a linear constraint.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sense {
    Equal,
    LessEqual,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct VarId(pub usize);

/// Narrow model-building interface to an external LP/MIP back-end (CBC,
/// HiGHS, Gurobi, ...). The encoder only emits binaries, linear constraints
/// and a linear objective, so back-ends stay swappable.
pub trait MipOracle {
    fn add_binary_var(&mut self, name: String) -> VarId;
    fn add_linear_constraint(&mut self, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64);
    fn set_objective(&mut self, terms: Vec<(VarId, f64)>);
    /// Minimizes and returns a value for every variable, indexed by VarId.
    fn solve(&mut self) -> Result<Vec<f64>, String>;
}

/// Exact multi-commodity-flow formulation with time windows and seat
/// capacities. x[k,l] states that container k uses leg l; y[k,l1,l2] that k
/// transfers from l1 to l2 (introduced only for geographically adjacent
/// pairs). Penalty terms are constants per (container, leg) pair gated by
/// the x variable, as all leg and window times are fixed inputs.
pub struct Exact<O> {
    instance: Arc<Instance>,
    oracle: O,
}

impl<O: MipOracle> Exact<O> {
    pub fn initialize(instance: Arc<Instance>, oracle: O) -> Exact<O> {
        Exact { instance, oracle }
    }

    pub fn solve(mut self) -> Result<Planning, String> {
        let timetable = self.instance.timetable();

        let mut x: HashMap<(ContainerIdx, LegIdx), VarId> = HashMap::new();
        let mut y: HashMap<(ContainerIdx, LegIdx, LegIdx), VarId> = HashMap::new();
        for container in self.instance.container_indices() {
            for l1 in timetable.legs() {
                let var = self
                    .oracle
                    .add_binary_var(format!("x_({}_{})", container, l1.idx()));
                x.insert((container, l1.idx()), var);
            }
            for l1 in timetable.legs() {
                for l2 in timetable.legs() {
                    if l1.destination() == l2.origin() {
                        let var = self.oracle.add_binary_var(format!(
                            "y_({}_{}_{})",
                            container,
                            l1.idx(),
                            l2.idx()
                        ));
                        y.insert((container, l1.idx(), l2.idx()), var);
                    }
                }
            }
        }

        // objective: leg price + emission cost, plus the earliness/lateness
        // penalty on legs that end at the container destination
        let mut objective_terms = Vec::new();
        for container in self.instance.container_indices() {
            let order = self.instance.order_of(container);
            let containertype = self.instance.container(container).containertype();
            for leg in timetable.legs() {
                let mut coefficient = timetable.price(leg.idx(), containertype)
                    + order.emission_factor() * timetable.emission(leg.idx(), containertype);
                if leg.destination() == order.destination() {
                    coefficient += order.early_penalty()
                        * hours_before(leg.arrival(), order.earliest_delivery())
                        + order.late_penalty()
                            * hours_after(leg.arrival(), order.latest_delivery());
                }
                objective_terms.push((x[&(container, leg.idx())], coefficient));
            }
        }
        self.oracle.set_objective(objective_terms);

        for container in self.instance.container_indices() {
            let order = self.instance.order_of(container);

            // flow conservation at every location
            for location in self.instance.locations().indices() {
                let rhs = if location == order.origin() {
                    -1.0
                } else if location == order.destination() {
                    1.0
                } else {
                    0.0
                };
                let mut terms = Vec::new();
                for leg in timetable.legs() {
                    if leg.destination() == location {
                        terms.push((x[&(container, leg.idx())], 1.0));
                    }
                    if leg.origin() == location {
                        terms.push((x[&(container, leg.idx())], -1.0));
                    }
                }
                self.oracle.add_linear_constraint(terms, Sense::Equal, rhs);
            }

            for l1 in timetable.legs() {
                let x1 = x[&(container, l1.idx())];
                if l1.origin() == order.origin() {
                    // check-in within the pickup window
                    self.oracle.add_linear_constraint(
                        vec![(x1, seconds_from(l1.checkin(), order.earliest_pickup()))],
                        Sense::LessEqual,
                        0.0,
                    );
                    self.oracle.add_linear_constraint(
                        vec![(x1, seconds_from(order.latest_pickup(), l1.checkin()))],
                        Sense::LessEqual,
                        0.0,
                    );
                }
                if l1.destination() == order.destination() {
                    // arrival before the deadline
                    self.oracle.add_linear_constraint(
                        vec![(x1, seconds_from(order.deadline(), l1.arrival()))],
                        Sense::LessEqual,
                        0.0,
                    );
                }
                for l2 in timetable.legs() {
                    if l1.destination() != l2.origin() {
                        continue;
                    }
                    let x2 = x[&(container, l2.idx())];
                    let transfer = y[&(container, l1.idx(), l2.idx())];
                    // a used transfer must arrive before the next check-in
                    self.oracle.add_linear_constraint(
                        vec![(transfer, seconds_from(l2.checkin(), l1.arrival()))],
                        Sense::LessEqual,
                        0.0,
                    );
                    // y[l1,l2] = x[l1] AND x[l2]
                    self.oracle.add_linear_constraint(
                        vec![(x1, 1.0), (x2, 1.0), (transfer, -1.0)],
                        Sense::LessEqual,
                        1.0,
                    );
                    self.oracle.add_linear_constraint(
                        vec![(transfer, 2.0), (x1, -1.0), (x2, -1.0)],
                        Sense::LessEqual,
                        0.0,
                    );
                }
            }
        }

        // seat capacity per container type and leg
        for containertype in self.instance.container_types().indices() {
            for leg in timetable.legs() {
                let terms: Vec<_> = self
                    .instance
                    .container_indices()
                    .filter(|&container| {
                        self.instance.container(container).containertype() == containertype
                    })
                    .map(|container| (x[&(container, leg.idx())], 1.0))
                    .collect();
                self.oracle.add_linear_constraint(
                    terms,
                    Sense::LessEqual,
                    timetable.seats(leg.idx(), containertype) as f64,
                );
            }
        }

        let values = self.oracle.solve()?;

        // install the chosen legs; add_traject brings them into chain order
        let mut planning = Planning::empty(self.instance.clone());
        for container in self.instance.container_indices() {
            let containertype = self.instance.container(container).containertype();
            let mut legs = Vec::new();
            for leg in timetable.legs() {
                if values[x[&(container, leg.idx())].0] > 0.5 {
                    let capacity =
                        timetable
                            .capacity_of(leg.idx(), containertype)
                            .ok_or_else(|| {
                                format!(
                                    "oracle routed container {} over leg {} which has no capacity for its type",
                                    container,
                                    leg.id()
                                )
                            })?;
                    legs.push(LegChoice::Scheduled(capacity));
                }
            }
            planning.add_traject(container, legs)?;
        }
        Ok(planning)
    }
}

/// max(reference - time, 0) in hours.
fn hours_before(time: DateTime, reference: DateTime) -> f64 {
    if time < reference {
        (reference - time).in_hours()
    } else {
        0.0
    }
}

/// max(time - reference, 0) in hours.
fn hours_after(time: DateTime, reference: DateTime) -> f64 {
    if time > reference {
        (time - reference).in_hours()
    } else {
        0.0
    }
}

/// time - reference in seconds, negative when time lies before reference.
fn seconds_from(reference: DateTime, time: DateTime) -> f64 {
    if time >= reference {
        (time - reference).in_sec() as f64
    } else {
        -((reference - time).in_sec() as f64)
    }
}
