use time::DateTime;

use crate::base_types::{
    ContainerIdx, ContainerTypeIdx, Cost, ExternalId, LocationIdx, OrderIdx, SeatCount,
};

/// A transport request: a number of containers from origin to destination
/// within a five-bound time window.
pub struct Order {
    idx: OrderIdx,
    id: ExternalId,
    origin: LocationIdx,
    destination: LocationIdx,
    earliest_pickup: DateTime,
    latest_pickup: DateTime,
    earliest_delivery: DateTime,
    latest_delivery: DateTime,
    deadline: DateTime, // delivering after latest_delivery is penalized, after the deadline impossible
    emission_factor: Cost, // cost per kg CO2
    early_penalty: Cost, // cost per hour before earliest_delivery
    late_penalty: Cost, // cost per hour after latest_delivery
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        idx: OrderIdx,
        id: ExternalId,
        origin: LocationIdx,
        destination: LocationIdx,
        earliest_pickup: DateTime,
        latest_pickup: DateTime,
        earliest_delivery: DateTime,
        latest_delivery: DateTime,
        deadline: DateTime,
        emission_factor: Cost,
        early_penalty: Cost,
        late_penalty: Cost,
    ) -> Result<Order, String> {
        if earliest_pickup > latest_pickup {
            return Err(format!("order {}: pickup window is empty", id));
        }
        if earliest_delivery > latest_delivery || latest_delivery > deadline {
            return Err(format!("order {}: delivery window is invalid", id));
        }
        Ok(Order {
            idx,
            id,
            origin,
            destination,
            earliest_pickup,
            latest_pickup,
            earliest_delivery,
            latest_delivery,
            deadline,
            emission_factor,
            early_penalty,
            late_penalty,
        })
    }

    pub fn idx(&self) -> OrderIdx {
        self.idx
    }

    pub fn id(&self) -> ExternalId {
        self.id
    }

    pub fn origin(&self) -> LocationIdx {
        self.origin
    }

    pub fn destination(&self) -> LocationIdx {
        self.destination
    }

    pub fn earliest_pickup(&self) -> DateTime {
        self.earliest_pickup
    }

    pub fn latest_pickup(&self) -> DateTime {
        self.latest_pickup
    }

    pub fn earliest_delivery(&self) -> DateTime {
        self.earliest_delivery
    }

    pub fn latest_delivery(&self) -> DateTime {
        self.latest_delivery
    }

    pub fn deadline(&self) -> DateTime {
        self.deadline
    }

    pub fn emission_factor(&self) -> Cost {
        self.emission_factor
    }

    pub fn early_penalty(&self) -> Cost {
        self.early_penalty
    }

    pub fn late_penalty(&self) -> Cost {
        self.late_penalty
    }
}

/// Expanding an order capacity materialises count containers.
pub struct OrderCapacity {
    order: OrderIdx,
    count: SeatCount,
    containertype: ContainerTypeIdx,
    first_container: ContainerIdx,
}

impl OrderCapacity {
    pub(crate) fn new(
        order: OrderIdx,
        count: SeatCount,
        containertype: ContainerTypeIdx,
        first_container: ContainerIdx,
    ) -> OrderCapacity {
        OrderCapacity {
            order,
            count,
            containertype,
            first_container,
        }
    }

    pub fn order(&self) -> OrderIdx {
        self.order
    }

    pub fn count(&self) -> SeatCount {
        self.count
    }

    pub fn containertype(&self) -> ContainerTypeIdx {
        self.containertype
    }

    pub fn containers(&self) -> impl Iterator<Item = ContainerIdx> {
        let first = self.first_container.idx();
        (first..first + self.count as usize).map(ContainerIdx::from)
    }
}

/// A single logical unit to be routed. Origin, destination, windows and
/// penalties derive from the order, the type from the order capacity.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Container {
    order: OrderIdx,
    containertype: ContainerTypeIdx,
}

impl Container {
    pub(crate) fn new(order: OrderIdx, containertype: ContainerTypeIdx) -> Container {
        Container {
            order,
            containertype,
        }
    }

    pub fn order(&self) -> OrderIdx {
        self.order
    }

    pub fn containertype(&self) -> ContainerTypeIdx {
        self.containertype
    }
}
