use std::collections::HashMap;

use time::DateTime;

use crate::base_types::{
    ContainerTypeIdx, Cost, EmissionKg, ExternalId, LegCapacityIdx, LegIdx, LocationIdx, SeatCount,
};

/// A scheduled one-hop transport edge of the weekly timetable.
pub struct Leg {
    idx: LegIdx,
    id: ExternalId,
    origin: LocationIdx,
    destination: LocationIdx,
    checkin: DateTime,
    departure: DateTime,
    arrival: DateTime,
    day: String,  // timetable day label, may be empty
    mode: String, // mode label (barge, rail, road), may be empty
}

impl Leg {
    pub fn idx(&self) -> LegIdx {
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

    pub fn checkin(&self) -> DateTime {
        self.checkin
    }

    pub fn departure(&self) -> DateTime {
        self.departure
    }

    pub fn arrival(&self) -> DateTime {
        self.arrival
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Whether other can directly follow this leg in a traject: the legs
    /// chain geographically and the arrival is no later than the check-in of
    /// the next leg.
    pub fn precedes(&self, other: &Leg) -> bool {
        self.destination == other.origin && self.arrival <= other.checkin
    }
}

/// The seat pool of one leg for one container type.
pub struct LegCapacity {
    idx: LegCapacityIdx,
    leg: LegIdx,
    containertype: ContainerTypeIdx,
    seats: SeatCount,
    price: Cost,         // per container
    emission: EmissionKg, // per container
}

impl LegCapacity {
    pub fn idx(&self) -> LegCapacityIdx {
        self.idx
    }

    pub fn leg(&self) -> LegIdx {
        self.leg
    }

    pub fn containertype(&self) -> ContainerTypeIdx {
        self.containertype
    }

    pub fn seats(&self) -> SeatCount {
        self.seats
    }

    pub fn price(&self) -> Cost {
        self.price
    }

    pub fn emission(&self) -> EmissionKg {
        self.emission
    }
}

/// All scheduled legs and their capacities. Immutable after loading;
/// reservations are tracked by the planning, not here.
pub struct Timetable {
    legs: Vec<Leg>,
    capacities: Vec<LegCapacity>,
    capacity_lookup: HashMap<(LegIdx, ContainerTypeIdx), LegCapacityIdx>,
}

impl Timetable {
    pub fn new() -> Timetable {
        Timetable {
            legs: Vec::new(),
            capacities: Vec::new(),
            capacity_lookup: HashMap::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_leg(
        &mut self,
        id: ExternalId,
        origin: LocationIdx,
        destination: LocationIdx,
        checkin: DateTime,
        departure: DateTime,
        arrival: DateTime,
        day: String,
        mode: String,
    ) -> Result<LegIdx, String> {
        if departure < checkin {
            return Err(format!(
                "leg {}: departure ({}) is before check-in ({})",
                id, departure, checkin
            ));
        }
        if arrival <= departure {
            return Err(format!(
                "leg {}: arrival ({}) is not after departure ({})",
                id, arrival, departure
            ));
        }
        let idx = LegIdx::from(self.legs.len());
        self.legs.push(Leg {
            idx,
            id,
            origin,
            destination,
            checkin,
            departure,
            arrival,
            day,
            mode,
        });
        Ok(idx)
    }

    pub fn add_capacity(
        &mut self,
        leg: LegIdx,
        containertype: ContainerTypeIdx,
        seats: SeatCount,
        price: Cost,
        emission: EmissionKg,
    ) -> Result<LegCapacityIdx, String> {
        if self.capacity_lookup.contains_key(&(leg, containertype)) {
            return Err(format!(
                "leg {} already has a capacity for container type {}",
                self.leg(leg).id(),
                containertype
            ));
        }
        let idx = LegCapacityIdx::from(self.capacities.len());
        self.capacities.push(LegCapacity {
            idx,
            leg,
            containertype,
            seats,
            price,
            emission,
        });
        self.capacity_lookup.insert((leg, containertype), idx);
        Ok(idx)
    }

    pub fn leg(&self, idx: LegIdx) -> &Leg {
        &self.legs[idx.idx()]
    }

    pub fn capacity(&self, idx: LegCapacityIdx) -> &LegCapacity {
        &self.capacities[idx.idx()]
    }

    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter()
    }

    pub fn capacities(&self) -> impl Iterator<Item = &LegCapacity> {
        self.capacities.iter()
    }

    pub fn number_of_legs(&self) -> usize {
        self.legs.len()
    }

    pub fn number_of_capacities(&self) -> usize {
        self.capacities.len()
    }

    pub fn capacity_of(
        &self,
        leg: LegIdx,
        containertype: ContainerTypeIdx,
    ) -> Option<LegCapacityIdx> {
        self.capacity_lookup.get(&(leg, containertype)).copied()
    }

    /// Seat count of a leg for a container type, 0 if the leg does not carry
    /// that type at all.
    pub fn seats(&self, leg: LegIdx, containertype: ContainerTypeIdx) -> SeatCount {
        self.capacity_of(leg, containertype)
            .map(|capacity| self.capacity(capacity).seats)
            .unwrap_or(0)
    }

    pub fn price(&self, leg: LegIdx, containertype: ContainerTypeIdx) -> Cost {
        self.capacity_of(leg, containertype)
            .map(|capacity| self.capacity(capacity).price)
            .unwrap_or(0.0)
    }

    pub fn emission(&self, leg: LegIdx, containertype: ContainerTypeIdx) -> EmissionKg {
        self.capacity_of(leg, containertype)
            .map(|capacity| self.capacity(capacity).emission)
            .unwrap_or(0.0)
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Timetable::new()
    }
}
