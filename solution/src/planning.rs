#[cfg(test)]
mod tests;

use std::collections::HashMap as StdHashMap;
use std::sync::Arc;

use im::HashMap;
use im::HashSet;
use im::Vector;
use itertools::Itertools;
use time::DateTime;

use model::adhoc::AdhocLeg;
use model::base_types::{
    AdhocIdx, ContainerIdx, ContainerTypeIdx, Cost, EmissionKg, ExternalId, LegCapacityIdx,
    LocationIdx, OrderIdx, SeatCount,
};
use model::instance::Instance;
use model::orders::Order;
use model::timetable::Leg;

use crate::traject::{CapacityRef, LegChoice, Traject};

// id of synthesized legs until make_unique_adhoc assigns the final negative ids
const UNMERGED_ADHOC_ID: ExternalId = -999;

/// An ad-hoc capacity in use by the planning. Starts out with a single seat
/// and a single reserved container; make_unique_adhoc merges equivalent ones.
#[derive(Clone)]
pub struct AdhocCapacity {
    id: ExternalId,
    leg: AdhocLeg,
    seats: SeatCount,
    containers: Vec<ContainerIdx>,
}

impl AdhocCapacity {
    pub fn id(&self) -> ExternalId {
        self.id
    }

    pub fn leg(&self) -> &AdhocLeg {
        &self.leg
    }

    pub fn seats(&self) -> SeatCount {
        self.seats
    }

    pub fn containers(&self) -> &[ContainerIdx] {
        &self.containers
    }
}

pub struct EmissionBreakdown {
    pub kilograms: EmissionKg,
    pub cost: Cost,
}

pub struct PenaltyBreakdown {
    pub hours_early: f64,
    pub hours_late: f64,
    pub cost: Cost,
}

#[derive(Clone, Default, PartialEq)]
pub struct RouteSummary {
    pub count: SeatCount,
    pub price: Cost,
    pub emission: EmissionKg,
    pub penalty: Cost,
}

/// The mutable planning state over a shared immutable instance: which
/// container follows which traject and which capacities it reserves.
///
/// All reservation bookkeeping is kept bidirectionally consistent: every
/// capacity knows the containers reserving it and every traject knows its
/// capacities. Mutation goes through add_traject/remove_traject so both sides
/// stay in sync.
///
/// Cloning is cheap, the collections share structure (im) and the instance is
/// behind an Arc.
#[derive(Clone)]
pub struct Planning {
    instance: Arc<Instance>,

    // reserved container ids per scheduled capacity (indexed like the
    // timetable's capacity arena)
    reservations: Vector<Vector<ContainerIdx>>,

    // pool of ad-hoc capacities currently referenced by some traject
    adhoc: HashMap<AdhocIdx, AdhocCapacity>,
    adhoc_counter: usize,

    // per container id: its traject (empty if unplanned) and its cached cost
    trajecten: Vector<Traject>,
    kosten: Vector<Option<Cost>>,

    te_plannen: HashSet<ContainerIdx>,
    gepland: HashSet<ContainerIdx>,
}

// basic methods
impl Planning {
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn instance_arc(&self) -> Arc<Instance> {
        self.instance.clone()
    }

    pub fn unplanned(&self) -> impl Iterator<Item = ContainerIdx> + '_ {
        self.te_plannen.iter().copied()
    }

    pub fn planned(&self) -> impl Iterator<Item = ContainerIdx> + '_ {
        self.gepland.iter().copied()
    }

    pub fn number_of_unplanned(&self) -> usize {
        self.te_plannen.len()
    }

    pub fn number_of_planned(&self) -> usize {
        self.gepland.len()
    }

    pub fn is_planned(&self, container: ContainerIdx) -> bool {
        self.gepland.contains(&container)
    }

    pub fn traject_of(&self, container: ContainerIdx) -> &Traject {
        &self.trajecten[container.idx()]
    }

    pub fn cost_of(&self, container: ContainerIdx) -> Option<Cost> {
        self.kosten[container.idx()]
    }

    /// Total cost of the planning; containers without a cached cost are
    /// skipped.
    pub fn total_cost(&self) -> Cost {
        self.kosten.iter().flatten().sum()
    }

    pub fn price_of(&self, container: ContainerIdx) -> Option<Cost> {
        let traject = self.traject_of(container);
        if traject.is_empty() {
            return None;
        }
        Some(
            traject
                .iter()
                .map(|capacity| self.price_of_capacity(capacity))
                .sum(),
        )
    }

    pub fn emission_of(&self, container: ContainerIdx) -> Option<EmissionBreakdown> {
        let traject = self.traject_of(container);
        if traject.is_empty() {
            return None;
        }
        let kilograms = traject
            .iter()
            .map(|capacity| self.emission_of_capacity(capacity))
            .sum();
        Some(EmissionBreakdown {
            kilograms,
            cost: kilograms * self.instance.order_of(container).emission_factor(),
        })
    }

    pub fn penalty_of(&self, container: ContainerIdx) -> Option<PenaltyBreakdown> {
        let traject = self.traject_of(container);
        let last = traject.last()?;
        Some(penalty_for_arrival(
            self.instance.order_of(container),
            self.arrival_of(last),
        ))
    }
}

// capacity reference accessors
impl Planning {
    pub fn origin_of(&self, capacity: CapacityRef) -> LocationIdx {
        match capacity {
            CapacityRef::Scheduled(idx) => self.scheduled_leg(idx).origin(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.origin,
        }
    }

    pub fn destination_of(&self, capacity: CapacityRef) -> LocationIdx {
        match capacity {
            CapacityRef::Scheduled(idx) => self.scheduled_leg(idx).destination(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.destination,
        }
    }

    pub fn checkin_of(&self, capacity: CapacityRef) -> DateTime {
        match capacity {
            CapacityRef::Scheduled(idx) => self.scheduled_leg(idx).checkin(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.checkin,
        }
    }

    pub fn departure_of(&self, capacity: CapacityRef) -> DateTime {
        match capacity {
            CapacityRef::Scheduled(idx) => self.scheduled_leg(idx).departure(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.departure,
        }
    }

    pub fn arrival_of(&self, capacity: CapacityRef) -> DateTime {
        match capacity {
            CapacityRef::Scheduled(idx) => self.scheduled_leg(idx).arrival(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.arrival,
        }
    }

    pub fn containertype_of(&self, capacity: CapacityRef) -> ContainerTypeIdx {
        match capacity {
            CapacityRef::Scheduled(idx) => {
                self.instance.timetable().capacity(idx).containertype()
            }
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.containertype,
        }
    }

    pub fn price_of_capacity(&self, capacity: CapacityRef) -> Cost {
        match capacity {
            CapacityRef::Scheduled(idx) => self.instance.timetable().capacity(idx).price(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.price,
        }
    }

    pub fn emission_of_capacity(&self, capacity: CapacityRef) -> EmissionKg {
        match capacity {
            CapacityRef::Scheduled(idx) => self.instance.timetable().capacity(idx).emission(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).leg.emission,
        }
    }

    pub fn external_id_of(&self, capacity: CapacityRef) -> ExternalId {
        match capacity {
            CapacityRef::Scheduled(idx) => self.scheduled_leg(idx).id(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).id,
        }
    }

    pub fn seats_of(&self, capacity: CapacityRef) -> SeatCount {
        match capacity {
            CapacityRef::Scheduled(idx) => self.instance.timetable().capacity(idx).seats(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).seats,
        }
    }

    pub fn reserved_count(&self, capacity: CapacityRef) -> usize {
        match capacity {
            CapacityRef::Scheduled(idx) => self.reservations[idx.idx()].len(),
            CapacityRef::Adhoc(idx) => self.adhoc_capacity(idx).containers.len(),
        }
    }

    pub fn available(&self, capacity: CapacityRef) -> SeatCount {
        (self.seats_of(capacity) as usize).saturating_sub(self.reserved_count(capacity))
            as SeatCount
    }

    /// The ad-hoc capacities currently in use, in pool order.
    pub fn adhoc_capacities(&self) -> Vec<(AdhocIdx, &AdhocCapacity)> {
        let mut capacities: Vec<_> = self.adhoc.iter().map(|(idx, c)| (*idx, c)).collect();
        capacities.sort_by_key(|(idx, _)| *idx);
        capacities
    }

    fn scheduled_leg(&self, idx: LegCapacityIdx) -> &Leg {
        let timetable = self.instance.timetable();
        timetable.leg(timetable.capacity(idx).leg())
    }

    fn adhoc_capacity(&self, idx: AdhocIdx) -> &AdhocCapacity {
        self.adhoc
            .get(&idx)
            .expect("ad-hoc capacity is not in the pool")
    }
}

// modifying methods
impl Planning {
    /// Installs a traject for an unplanned container: sorts the legs into a
    /// valid chain, reserves a seat on each capacity, adds synthesized legs
    /// to the ad-hoc pool, caches the cost and moves the container to the
    /// planned set. An empty leg list is a no-op, the container stays
    /// unplanned. Nothing is changed on error.
    pub fn add_traject(
        &mut self,
        container: ContainerIdx,
        legs: Vec<LegChoice>,
    ) -> Result<(), String> {
        if legs.is_empty() {
            return Ok(());
        }
        if !self.te_plannen.contains(&container) {
            return Err(format!("container {} is already planned.", container));
        }
        let sorted = self.sort_into_chain(container, legs)?;

        let mut capacities = Vec::with_capacity(sorted.len());
        for choice in sorted {
            match choice {
                LegChoice::Scheduled(idx) => {
                    assert!(
                        self.available(CapacityRef::Scheduled(idx)) > 0,
                        "scheduled capacity is oversubscribed"
                    );
                    self.reservations
                        .get_mut(idx.idx())
                        .expect("capacity index out of range")
                        .push_back(container);
                    capacities.push(CapacityRef::Scheduled(idx));
                }
                LegChoice::Adhoc(leg) => {
                    let idx = AdhocIdx::from(self.adhoc_counter);
                    self.adhoc_counter += 1;
                    self.adhoc.insert(
                        idx,
                        AdhocCapacity {
                            id: UNMERGED_ADHOC_ID,
                            leg,
                            seats: 1,
                            containers: vec![container],
                        },
                    );
                    capacities.push(CapacityRef::Adhoc(idx));
                }
            }
        }

        let traject = Traject::new(capacities);
        let cost = self.compute_cost(container, &traject);
        self.trajecten.set(container.idx(), traject);
        self.kosten.set(container.idx(), cost);
        self.te_plannen.remove(&container);
        self.gepland.insert(container);
        Ok(())
    }

    /// Reverses add_traject: releases every reservation, drops ad-hoc
    /// capacities that carried only this container, clears the cost cache
    /// and moves the container back to the unplanned set.
    pub fn remove_traject(&mut self, container: ContainerIdx) -> Result<(), String> {
        if !self.gepland.contains(&container) {
            return Err(format!("container {} is not planned.", container));
        }
        let traject = self.trajecten[container.idx()].clone();
        for capacity in traject.iter() {
            match capacity {
                CapacityRef::Scheduled(idx) => {
                    let reserved = self
                        .reservations
                        .get_mut(idx.idx())
                        .expect("capacity index out of range");
                    let position = reserved
                        .index_of(&container)
                        .expect("reservation list does not contain the container");
                    reserved.remove(position);
                }
                CapacityRef::Adhoc(idx) => {
                    let capacity = self
                        .adhoc
                        .get_mut(&idx)
                        .expect("ad-hoc capacity is not in the pool");
                    let position = capacity
                        .containers
                        .iter()
                        .position(|&c| c == container)
                        .expect("ad-hoc capacity does not contain the container");
                    capacity.containers.remove(position);
                    capacity.seats -= 1; // every ad-hoc reservation brought its own seat
                    if capacity.containers.is_empty() {
                        self.adhoc.remove(&idx);
                    }
                }
            }
        }
        self.trajecten.set(container.idx(), Traject::empty());
        self.kosten.set(container.idx(), None);
        self.gepland.remove(&container);
        self.te_plannen.insert(container);
        Ok(())
    }

    pub fn clear_all_trajecten(&mut self) {
        for container in self.gepland.clone() {
            self.remove_traject(container)
                .expect("planned container could not be removed");
        }
    }

    /// Merges equivalent ad-hoc capacities (same leg times, endpoints, type,
    /// price and emission): the survivor collects the seats and reservations
    /// and every affected traject is rewritten to reference it. Survivors get
    /// fresh negative ids (-1, -2, ... in pool order). The ids are opaque
    /// per-run identifiers and not stable across invocations.
    pub fn make_unique_adhoc(&mut self) {
        let mut survivors: Vec<AdhocIdx> = Vec::new();
        let mut next_id: ExternalId = -1;
        let indices: Vec<AdhocIdx> = self.adhoc.keys().copied().sorted().collect();
        for idx in indices {
            let capacity = self.adhoc.get(&idx).unwrap().clone();
            let equivalent = survivors
                .iter()
                .copied()
                .find(|survivor| self.adhoc.get(survivor).unwrap().leg == capacity.leg);
            match equivalent {
                Some(survivor) => {
                    {
                        let target = self.adhoc.get_mut(&survivor).unwrap();
                        target.seats += capacity.seats;
                        target.containers.extend(capacity.containers.iter().copied());
                    }
                    self.adhoc.remove(&idx);
                    for container in capacity.containers {
                        let rewritten = self.trajecten[container.idx()]
                            .replace(CapacityRef::Adhoc(idx), CapacityRef::Adhoc(survivor));
                        self.trajecten.set(container.idx(), rewritten);
                    }
                }
                None => {
                    self.adhoc.get_mut(&idx).unwrap().id = next_id;
                    next_id -= 1;
                    survivors.push(idx);
                }
            }
        }
    }
}

// route grouping
impl Planning {
    /// Groups the planned containers by their traject.
    pub fn unique_trajecten(&self) -> StdHashMap<Traject, Vec<ContainerIdx>> {
        let mut trajecten: StdHashMap<Traject, Vec<ContainerIdx>> = StdHashMap::new();
        for container in self.planned().sorted() {
            trajecten
                .entry(self.traject_of(container).clone())
                .or_default()
                .push(container);
        }
        trajecten
    }

    /// For each order: its distinct trajecten with container count and the
    /// summed price, emission and penalty. Only planned containers count.
    pub fn unique_trajecten_per_order(
        &self,
    ) -> Vec<(OrderIdx, StdHashMap<Traject, RouteSummary>)> {
        let mut result = Vec::new();
        for order in self.instance.orders() {
            let mut trajecten: StdHashMap<Traject, RouteSummary> = StdHashMap::new();
            for container in self.instance.containers_of_order(order.idx()) {
                if !self.is_planned(container) {
                    continue;
                }
                let summary = trajecten
                    .entry(self.traject_of(container).clone())
                    .or_default();
                summary.count += 1;
                summary.price += self.price_of(container).unwrap();
                summary.emission += self.emission_of(container).unwrap().kilograms;
                summary.penalty += self.penalty_of(container).unwrap().cost;
            }
            result.push((order.idx(), trajecten));
        }
        result
    }

    pub fn print_trajecten(&self) {
        println!(
            "** planning with {} planned and {} unplanned containers:",
            self.number_of_planned(),
            self.number_of_unplanned()
        );
        for container in self.planned().sorted() {
            let legs = self
                .traject_of(container)
                .iter()
                .map(|capacity| self.external_id_of(capacity).to_string())
                .join(" - ");
            println!(
                "     {}: [{}] costing {:.2}",
                container,
                legs,
                self.cost_of(container).unwrap()
            );
        }
    }
}

// private methods
impl Planning {
    /// Brings the legs into chain order. Already-chained input is kept as-is;
    /// otherwise the chain is rebuilt by walking from the container's origin.
    /// Fails if the legs cannot be linearised or if the next leg is ambiguous.
    fn sort_into_chain(
        &self,
        container: ContainerIdx,
        legs: Vec<LegChoice>,
    ) -> Result<Vec<LegChoice>, String> {
        let chained = (0..legs.len().saturating_sub(1))
            .all(|i| self.choice_precedes(&legs[i], &legs[i + 1]));
        if chained {
            return Ok(legs);
        }
        let mut remaining = legs;
        let mut sorted = Vec::with_capacity(remaining.len());
        let mut cursor = self.instance.order_of(container).origin();
        while !remaining.is_empty() {
            let matches: Vec<usize> = remaining
                .iter()
                .positions(|choice| self.choice_origin(choice) == cursor)
                .collect();
            match matches.len() {
                0 => {
                    return Err(format!(
                        "traject legs of container {} do not form a chain",
                        container
                    ))
                }
                1 => {
                    let choice = remaining.remove(matches[0]);
                    cursor = self.choice_destination(&choice);
                    sorted.push(choice);
                }
                _ => {
                    return Err(format!(
                        "traject legs of container {} have an ambiguous order",
                        container
                    ))
                }
            }
        }
        Ok(sorted)
    }

    fn choice_origin(&self, choice: &LegChoice) -> LocationIdx {
        match choice {
            LegChoice::Scheduled(idx) => self.scheduled_leg(*idx).origin(),
            LegChoice::Adhoc(leg) => leg.origin,
        }
    }

    fn choice_destination(&self, choice: &LegChoice) -> LocationIdx {
        match choice {
            LegChoice::Scheduled(idx) => self.scheduled_leg(*idx).destination(),
            LegChoice::Adhoc(leg) => leg.destination,
        }
    }

    fn choice_precedes(&self, first: &LegChoice, second: &LegChoice) -> bool {
        let (arrival, checkin) = match (first, second) {
            (LegChoice::Scheduled(a), LegChoice::Scheduled(b)) => {
                (self.scheduled_leg(*a).arrival(), self.scheduled_leg(*b).checkin())
            }
            (LegChoice::Scheduled(a), LegChoice::Adhoc(b)) => {
                (self.scheduled_leg(*a).arrival(), b.checkin)
            }
            (LegChoice::Adhoc(a), LegChoice::Scheduled(b)) => {
                (a.arrival, self.scheduled_leg(*b).checkin())
            }
            (LegChoice::Adhoc(a), LegChoice::Adhoc(b)) => (a.arrival, b.checkin),
        };
        self.choice_destination(first) == self.choice_origin(second) && arrival <= checkin
    }

    fn compute_cost(&self, container: ContainerIdx, traject: &Traject) -> Option<Cost> {
        let last = traject.last()?;
        let price: Cost = traject
            .iter()
            .map(|capacity| self.price_of_capacity(capacity))
            .sum();
        let emission: EmissionKg = traject
            .iter()
            .map(|capacity| self.emission_of_capacity(capacity))
            .sum();
        let order = self.instance.order_of(container);
        let penalty = penalty_for_arrival(order, self.arrival_of(last));
        Some(price + order.emission_factor() * emission + penalty.cost)
    }
}

fn penalty_for_arrival(order: &Order, arrival: DateTime) -> PenaltyBreakdown {
    if arrival > order.latest_delivery() {
        let hours_late = (arrival - order.latest_delivery()).in_hours();
        PenaltyBreakdown {
            hours_early: 0.0,
            hours_late,
            cost: hours_late * order.late_penalty(),
        }
    } else if arrival < order.earliest_delivery() {
        let hours_early = (order.earliest_delivery() - arrival).in_hours();
        PenaltyBreakdown {
            hours_early,
            hours_late: 0.0,
            cost: hours_early * order.early_penalty(),
        }
    } else {
        PenaltyBreakdown {
            hours_early: 0.0,
            hours_late: 0.0,
            cost: 0.0,
        }
    }
}

// static methods
impl Planning {
    /// A planning over the instance with every container unplanned.
    pub fn empty(instance: Arc<Instance>) -> Planning {
        let reservations = (0..instance.timetable().number_of_capacities())
            .map(|_| Vector::new())
            .collect();
        let trajecten = (0..instance.number_of_containers())
            .map(|_| Traject::empty())
            .collect();
        let kosten = (0..instance.number_of_containers()).map(|_| None).collect();
        let te_plannen = instance.container_indices().collect();
        Planning {
            instance,
            reservations,
            adhoc: HashMap::new(),
            adhoc_counter: 0,
            trajecten,
            kosten,
            te_plannen,
            gepland: HashSet::new(),
        }
    }

    pub fn verify_consistency(&self) {
        let total = self.instance.number_of_containers();
        assert_eq!(self.te_plannen.len() + self.gepland.len(), total);
        for container in self.instance.container_indices() {
            let planned = self.gepland.contains(&container);
            assert_ne!(planned, self.te_plannen.contains(&container));
            assert_eq!(planned, !self.traject_of(container).is_empty());
            assert_eq!(planned, self.cost_of(container).is_some());
        }

        // reservation lists must match the traject occurrences exactly
        let mut occurrences: StdHashMap<CapacityRef, Vec<ContainerIdx>> = StdHashMap::new();
        for container in self.planned() {
            let traject = self.traject_of(container);
            assert!(!traject.is_empty());
            for capacity in traject.iter() {
                occurrences.entry(capacity).or_default().push(container);
            }

            let order = self.instance.order_of(container);
            assert_eq!(self.origin_of(traject.first().unwrap()), order.origin());
            assert_eq!(
                self.destination_of(traject.last().unwrap()),
                order.destination()
            );
            let containertype = self.instance.container(container).containertype();
            for capacity in traject.iter() {
                assert_eq!(self.containertype_of(capacity), containertype);
            }
            let capacities: Vec<CapacityRef> = traject.iter().collect();
            for (first, second) in capacities.iter().tuple_windows() {
                assert_eq!(self.destination_of(*first), self.origin_of(*second));
                assert!(self.arrival_of(*first) <= self.checkin_of(*second));
                // only terminals may be intermediate stops
                assert!(self
                    .instance
                    .locations()
                    .get(self.destination_of(*first))
                    .is_terminal());
            }
            let adhoc_count = capacities
                .iter()
                .filter(|capacity| matches!(capacity, CapacityRef::Adhoc(_)))
                .count();
            assert!(adhoc_count <= 1, "traject contains more than one ad-hoc leg");
        }

        for capacity in self.instance.timetable().capacities() {
            let reference = CapacityRef::Scheduled(capacity.idx());
            let mut reserved: Vec<ContainerIdx> =
                self.reservations[capacity.idx().idx()].iter().copied().collect();
            let mut expected = occurrences.remove(&reference).unwrap_or_default();
            reserved.sort();
            expected.sort();
            assert_eq!(reserved, expected);
            assert!(reserved.len() <= capacity.seats() as usize);
        }

        for (idx, capacity) in self.adhoc_capacities() {
            let reference = CapacityRef::Adhoc(idx);
            let mut reserved = capacity.containers.clone();
            let mut expected = occurrences.remove(&reference).unwrap_or_else(|| {
                panic!("ad-hoc capacity {} is not referenced by any traject", idx)
            });
            reserved.sort();
            expected.sort();
            assert_eq!(reserved, expected);
            assert_eq!(capacity.containers.len(), capacity.seats as usize);
        }
        assert!(occurrences.is_empty());
    }
}
