use std::collections::HashSet;

use rand::Rng;

use model::base_types::{ContainerIdx, Cost, LegCapacityIdx, LocationIdx};
use model::instance::Instance;
use solution::{CapacityRef, LegChoice, Planning};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Selection {
    Greedy, // cheapest estimated total cost
    Random, // uniform pick among the feasible candidates
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Forward, // from the container origin towards its destination
    Reverse, // from the destination back to the origin
}

/// Builds the traject of a single container against the current planning
/// state. Always returns some traject: scheduled legs where possible, an
/// ad-hoc suffix/prefix where the timetable runs dry, a full ad-hoc trip as
/// last resort. The result is empty only when even the ad-hoc fallback is
/// infeasible; the container then stays unplanned.
pub struct TrajectBuilder<'a> {
    planning: &'a Planning,
    instance: &'a Instance,
}

impl<'a> TrajectBuilder<'a> {
    pub fn new(planning: &'a Planning) -> TrajectBuilder<'a> {
        TrajectBuilder {
            planning,
            instance: planning.instance(),
        }
    }

    pub fn build(
        &self,
        container: ContainerIdx,
        selection: Selection,
        direction: Direction,
        rng: &mut impl Rng,
    ) -> Vec<LegChoice> {
        match direction {
            Direction::Forward => self.build_forward(container, selection, rng),
            Direction::Reverse => self.build_reverse(container, selection, rng),
        }
    }

    fn build_forward(
        &self,
        container: ContainerIdx,
        selection: Selection,
        rng: &mut impl Rng,
    ) -> Vec<LegChoice> {
        let order = self.instance.order_of(container);
        // only terminals are allowed as intermediate stops, and the traject
        // may not return to the origin
        let mut forbidden = self.non_terminals();
        forbidden.insert(order.origin());
        forbidden.remove(&order.destination());

        let mut candidates = self.candidates(container, true, |capacity| {
            self.instance.is_feasible_start(capacity, container)
                && !forbidden.contains(&self.destination(capacity))
        });
        if candidates.is_empty() {
            return self.full_trip_fallback(container);
        }

        let mut traject: Vec<LegCapacityIdx> = Vec::new();
        loop {
            let selected = select(&candidates, selection, rng);
            traject.push(selected);
            if self.destination(selected) == order.destination() {
                return traject.into_iter().map(LegChoice::Scheduled).collect();
            }
            forbidden.insert(self.destination(selected));
            candidates = self.candidates(container, true, |capacity| {
                self.instance.chains(selected, capacity)
                    && !forbidden.contains(&self.destination(capacity))
            });
            if candidates.is_empty() {
                // close the traject with an ad-hoc leg to the destination,
                // backtracking while no feasible one exists
                while let Some(&last) = traject.last() {
                    let prev_leg = self
                        .instance
                        .timetable()
                        .leg(self.instance.timetable().capacity(last).leg());
                    if let Some(adhoc) = self.instance.adhoc_suffix(prev_leg, container) {
                        let mut choices: Vec<LegChoice> =
                            traject.into_iter().map(LegChoice::Scheduled).collect();
                        choices.push(LegChoice::Adhoc(adhoc));
                        return choices;
                    }
                    traject.pop();
                    forbidden.remove(&self.destination(last));
                }
                return self.full_trip_fallback(container);
            }
        }
    }

    fn build_reverse(
        &self,
        container: ContainerIdx,
        selection: Selection,
        rng: &mut impl Rng,
    ) -> Vec<LegChoice> {
        let order = self.instance.order_of(container);
        let mut forbidden = self.non_terminals();
        forbidden.remove(&order.origin());
        forbidden.insert(order.destination());

        let mut candidates = self.candidates(container, false, |capacity| {
            self.instance.is_feasible_end(capacity, container)
                && !forbidden.contains(&self.origin(capacity))
        });
        if candidates.is_empty() {
            return self.full_trip_fallback(container);
        }

        // collected from the destination backwards, reversed before return
        let mut traject: Vec<LegCapacityIdx> = Vec::new();
        loop {
            let selected = select(&candidates, selection, rng);
            traject.push(selected);
            if self.origin(selected) == order.origin() {
                let mut choices: Vec<LegChoice> =
                    traject.into_iter().map(LegChoice::Scheduled).collect();
                choices.reverse();
                return choices;
            }
            forbidden.insert(self.origin(selected));
            candidates = self.candidates(container, false, |capacity| {
                self.instance.chains(capacity, selected)
                    && !forbidden.contains(&self.origin(capacity))
            });
            if candidates.is_empty() {
                // reach the earliest chosen leg with an ad-hoc leg from the
                // origin, backtracking while no feasible one exists
                while let Some(&last) = traject.last() {
                    let next_leg = self
                        .instance
                        .timetable()
                        .leg(self.instance.timetable().capacity(last).leg());
                    if let Some(adhoc) = self.instance.adhoc_prefix(next_leg, container) {
                        let mut choices: Vec<LegChoice> =
                            traject.into_iter().map(LegChoice::Scheduled).collect();
                        choices.push(LegChoice::Adhoc(adhoc));
                        choices.reverse();
                        return choices;
                    }
                    traject.pop();
                    forbidden.remove(&self.origin(last));
                }
                return self.full_trip_fallback(container);
            }
        }
    }

    /// All capacities passing the filter, with availability and a feasible
    /// cost estimate.
    fn candidates(
        &self,
        container: ContainerIdx,
        forward: bool,
        filter: impl Fn(LegCapacityIdx) -> bool,
    ) -> Vec<(LegCapacityIdx, Cost)> {
        self.instance
            .timetable()
            .capacities()
            .map(|capacity| capacity.idx())
            .filter(|&capacity| {
                self.planning.available(CapacityRef::Scheduled(capacity)) > 0 && filter(capacity)
            })
            .filter_map(|capacity| {
                self.instance
                    .estimate_total_cost(capacity, container, forward)
                    .map(|cost| (capacity, cost))
            })
            .collect()
    }

    fn full_trip_fallback(&self, container: ContainerIdx) -> Vec<LegChoice> {
        match self.instance.adhoc_full_trip(container) {
            Some(adhoc) => vec![LegChoice::Adhoc(adhoc)],
            None => Vec::new(),
        }
    }

    fn non_terminals(&self) -> HashSet<LocationIdx> {
        let locations = self.instance.locations();
        locations
            .shippers()
            .iter()
            .chain(locations.empty_depots().iter())
            .copied()
            .collect()
    }

    fn origin(&self, capacity: LegCapacityIdx) -> LocationIdx {
        let timetable = self.instance.timetable();
        timetable.leg(timetable.capacity(capacity).leg()).origin()
    }

    fn destination(&self, capacity: LegCapacityIdx) -> LocationIdx {
        let timetable = self.instance.timetable();
        timetable
            .leg(timetable.capacity(capacity).leg())
            .destination()
    }
}

fn select(
    candidates: &[(LegCapacityIdx, Cost)],
    selection: Selection,
    rng: &mut impl Rng,
) -> LegCapacityIdx {
    match selection {
        Selection::Greedy => {
            candidates
                .iter()
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
                .unwrap()
                .0
        }
        Selection::Random => candidates[rng.gen_range(0..candidates.len())].0,
    }
}
