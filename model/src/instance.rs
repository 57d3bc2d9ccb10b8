use crate::adhoc::{AdhocLeg, AdhocLegModel};
use crate::base_types::{ContainerIdx, ContainerTypeIdx, Cost, LegCapacityIdx, OrderIdx, SeatCount};
use crate::config::Config;
use crate::container_types::{ContainerType, ContainerTypes};
use crate::locations::Locations;
use crate::orders::{Container, Order, OrderCapacity};
use crate::timetable::{Leg, Timetable};

/// The loaded problem instance: locations, container types, timetable,
/// orders with their materialised containers, the ad-hoc leg model and the
/// solver configuration. Immutable after loading; plannings share one
/// instance by reference.
pub struct Instance {
    locations: Locations,
    container_types: ContainerTypes,
    timetable: Timetable,
    orders: Vec<Order>,
    order_capacities: Vec<OrderCapacity>,
    containers: Vec<Container>,
    adhoc: AdhocLegModel,
    config: Config,
}

impl Instance {
    pub fn new(
        locations: Locations,
        container_types: ContainerTypes,
        timetable: Timetable,
        orders: Vec<Order>,
        order_capacities: Vec<(OrderIdx, SeatCount, ContainerTypeIdx)>,
        adhoc: AdhocLegModel,
        config: Config,
    ) -> Instance {
        let mut containers = Vec::new();
        let mut capacities = Vec::new();
        for (order, count, containertype) in order_capacities {
            let first_container = ContainerIdx::from(containers.len());
            capacities.push(OrderCapacity::new(
                order,
                count,
                containertype,
                first_container,
            ));
            for _ in 0..count {
                containers.push(Container::new(order, containertype));
            }
        }
        Instance {
            locations,
            container_types,
            timetable,
            orders,
            order_capacities: capacities,
            containers,
            adhoc,
            config,
        }
    }

    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    pub fn container_types(&self) -> &ContainerTypes {
        &self.container_types
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    pub fn adhoc(&self) -> &AdhocLegModel {
        &self.adhoc
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn order(&self, idx: OrderIdx) -> &Order {
        &self.orders[idx.idx()]
    }

    pub fn number_of_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn order_capacities(&self) -> impl Iterator<Item = &OrderCapacity> {
        self.order_capacities.iter()
    }

    pub fn number_of_containers(&self) -> usize {
        self.containers.len()
    }

    pub fn container_indices(&self) -> impl Iterator<Item = ContainerIdx> {
        (0..self.containers.len()).map(ContainerIdx::from)
    }

    pub fn container(&self, idx: ContainerIdx) -> Container {
        self.containers[idx.idx()]
    }

    pub fn order_of(&self, container: ContainerIdx) -> &Order {
        self.order(self.container(container).order())
    }

    pub fn type_of(&self, container: ContainerIdx) -> &ContainerType {
        self.container_types
            .get(self.container(container).containertype())
    }

    pub fn containers_of_order(
        &self,
        order: OrderIdx,
    ) -> impl Iterator<Item = ContainerIdx> + '_ {
        self.order_capacities
            .iter()
            .filter(move |capacity| capacity.order() == order)
            .flat_map(|capacity| capacity.containers())
    }

    /// The capacity can start the traject of the container: same origin,
    /// check-in within the pickup window, matching container type.
    /// Availability is the planning's concern.
    pub fn is_feasible_start(&self, capacity: LegCapacityIdx, container: ContainerIdx) -> bool {
        let capacity = self.timetable.capacity(capacity);
        let leg = self.timetable.leg(capacity.leg());
        let order = self.order_of(container);
        capacity.containertype() == self.container(container).containertype()
            && leg.origin() == order.origin()
            && order.earliest_pickup() <= leg.checkin()
            && leg.checkin() <= order.latest_pickup()
    }

    /// The capacity can end the traject of the container: same destination,
    /// arrival no later than the deadline, matching container type.
    pub fn is_feasible_end(&self, capacity: LegCapacityIdx, container: ContainerIdx) -> bool {
        let capacity = self.timetable.capacity(capacity);
        let leg = self.timetable.leg(capacity.leg());
        let order = self.order_of(container);
        capacity.containertype() == self.container(container).containertype()
            && leg.destination() == order.destination()
            && leg.arrival() <= order.deadline()
    }

    /// The two scheduled capacities chain: same container type and the legs
    /// chain in space and time.
    pub fn chains(&self, prev: LegCapacityIdx, next: LegCapacityIdx) -> bool {
        let prev = self.timetable.capacity(prev);
        let next = self.timetable.capacity(next);
        prev.containertype() == next.containertype()
            && self
                .timetable
                .leg(prev.leg())
                .precedes(self.timetable.leg(next.leg()))
    }

    pub fn adhoc_full_trip(&self, container: ContainerIdx) -> Option<AdhocLeg> {
        self.adhoc.full_trip(
            &self.locations,
            self.order_of(container),
            self.type_of(container),
        )
    }

    pub fn adhoc_prefix(&self, next_leg: &Leg, container: ContainerIdx) -> Option<AdhocLeg> {
        self.adhoc.prefix(
            &self.locations,
            next_leg,
            self.order_of(container),
            self.type_of(container),
        )
    }

    pub fn adhoc_suffix(&self, prev_leg: &Leg, container: ContainerIdx) -> Option<AdhocLeg> {
        self.adhoc.suffix(
            &self.locations,
            prev_leg,
            self.order_of(container),
            self.type_of(container),
        )
    }

    /// See AdhocLegModel::estimate_total_cost.
    pub fn estimate_total_cost(
        &self,
        capacity: LegCapacityIdx,
        container: ContainerIdx,
        forward: bool,
    ) -> Option<Cost> {
        let capacity = self.timetable.capacity(capacity);
        self.adhoc.estimate_total_cost(
            &self.locations,
            self.timetable.leg(capacity.leg()),
            capacity,
            self.order_of(container),
            self.type_of(container),
            forward,
        )
    }
}
