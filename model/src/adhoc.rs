use std::collections::HashMap;

use time::{DateTime, Duration};

use crate::base_types::{ContainerTypeIdx, Cost, EmissionKg, Kilometers, LocationIdx};
use crate::container_types::ContainerType;
use crate::locations::{Location, Locations};
use crate::orders::Order;
use crate::timetable::{Leg, LegCapacity};

/// One synthesized single-container road leg. Check-in equals departure and
/// the seat count is always 1.
#[derive(Clone, Debug, PartialEq)]
pub struct AdhocLeg {
    pub origin: LocationIdx,
    pub destination: LocationIdx,
    pub checkin: DateTime,
    pub departure: DateTime,
    pub arrival: DateTime,
    pub containertype: ContainerTypeIdx,
    pub price: Cost,
    pub emission: EmissionKg,
}

/// Parameters of the ad-hoc road transport fallback: a pre-computed distance
/// matrix (keyed by location name) plus tariff, speed and emission constants.
pub struct AdhocLegModel {
    distances: HashMap<String, HashMap<String, Kilometers>>,
    start_tariff: Cost,   // fixed surcharge per trip
    tariff: Cost,         // per km
    speed: f64,           // km/h
    emission: f64,        // kg CO2 per tonne-km
    default_haul: Kilometers, // substituted for zero matrix entries between distinct locations
}

impl AdhocLegModel {
    pub fn new(
        distances: HashMap<String, HashMap<String, Kilometers>>,
        start_tariff: Cost,
        tariff: Cost,
        speed: f64,
        emission: f64,
        default_haul: Kilometers,
    ) -> AdhocLegModel {
        AdhocLegModel {
            distances,
            start_tariff,
            tariff,
            speed,
            emission,
            default_haul,
        }
    }

    /// Distance in km between two locations. A zero entry between distinct
    /// locations stands for a missing pre/post-haul measurement and is
    /// replaced by the default haul distance.
    pub fn distance(&self, from: &Location, to: &Location) -> Kilometers {
        let distance = self
            .distances
            .get(from.name())
            .and_then(|row| row.get(to.name()))
            .copied()
            .unwrap_or(0.0);
        if distance == 0.0 && from.name() != to.name() {
            self.default_haul
        } else {
            distance
        }
    }

    fn travel_time(&self, distance: Kilometers) -> Duration {
        Duration::from_hours(distance / self.speed)
    }

    fn price_for(&self, distance: Kilometers) -> Cost {
        self.start_tariff + distance * self.tariff
    }

    fn emission_for(&self, distance: Kilometers, containertype: &ContainerType) -> EmissionKg {
        self.emission * distance * containertype.weight()
    }

    /// Ad-hoc leg covering the whole trip of an order. The departure is
    /// chosen to avoid penalties where the windows allow it. Returns None if
    /// even an immediate pickup cannot make the deadline.
    pub fn full_trip(
        &self,
        locations: &Locations,
        order: &Order,
        containertype: &ContainerType,
    ) -> Option<AdhocLeg> {
        let distance = self.distance(
            locations.get(order.origin()),
            locations.get(order.destination()),
        );
        let duration = self.travel_time(distance);
        if order.earliest_pickup() + duration > order.deadline() {
            return None;
        }
        let departure = if order.latest_pickup() + duration <= order.earliest_delivery() {
            order.latest_pickup() // arrival would be early anyway, leave as late as possible
        } else if order.earliest_pickup() + duration >= order.latest_delivery() {
            order.earliest_pickup() // arrival is late anyway, leave as early as possible
        } else if order.earliest_pickup() + duration >= order.latest_pickup() {
            order.earliest_pickup()
        } else {
            order.earliest_delivery() - duration
        };
        Some(self.make_leg(
            order.origin(),
            order.destination(),
            departure,
            duration,
            distance,
            containertype,
        ))
    }

    /// Ad-hoc leg from the order origin to the origin of next_leg, departing
    /// at the earliest pickup. Returns None if it cannot arrive before the
    /// check-in of next_leg.
    pub fn prefix(
        &self,
        locations: &Locations,
        next_leg: &Leg,
        order: &Order,
        containertype: &ContainerType,
    ) -> Option<AdhocLeg> {
        let distance = self.distance(
            locations.get(next_leg.origin()),
            locations.get(order.origin()),
        );
        let duration = self.travel_time(distance);
        if order.earliest_pickup() + duration > next_leg.checkin() {
            return None;
        }
        Some(self.make_leg(
            order.origin(),
            next_leg.origin(),
            order.earliest_pickup(),
            duration,
            distance,
            containertype,
        ))
    }

    /// Ad-hoc leg from the destination of prev_leg to the order destination.
    /// Departs when the previous leg arrives, or later if waiting avoids an
    /// early delivery. Returns None if the deadline cannot be met.
    pub fn suffix(
        &self,
        locations: &Locations,
        prev_leg: &Leg,
        order: &Order,
        containertype: &ContainerType,
    ) -> Option<AdhocLeg> {
        let available = prev_leg.arrival();
        let distance = self.distance(
            locations.get(prev_leg.destination()),
            locations.get(order.destination()),
        );
        let duration = self.travel_time(distance);
        if available + duration > order.deadline() {
            return None;
        }
        let departure = if available + duration < order.earliest_delivery() {
            order.earliest_delivery() - duration
        } else {
            available
        };
        Some(self.make_leg(
            prev_leg.destination(),
            order.destination(),
            departure,
            duration,
            distance,
            containertype,
        ))
    }

    /// Cheap estimate of the total cost of a traject that continues from the
    /// given capacity with a single ad-hoc leg to the order destination
    /// (forward) or that is reached from the order origin by a single ad-hoc
    /// leg (reverse). Returns None when the estimated arrival misses the
    /// deadline (forward) or the estimated departure precedes the earliest
    /// pickup (reverse).
    pub fn estimate_total_cost(
        &self,
        locations: &Locations,
        leg: &Leg,
        capacity: &LegCapacity,
        order: &Order,
        containertype: &ContainerType,
        forward: bool,
    ) -> Option<Cost> {
        let distance = if forward {
            self.distance(
                locations.get(leg.destination()),
                locations.get(order.destination()),
            )
        } else {
            self.distance(locations.get(order.origin()), locations.get(leg.origin()))
        };
        let mut price = capacity.price();
        let mut emission = capacity.emission();
        if distance > 0.0 {
            price += self.price_for(distance);
            emission += self.emission_for(distance, containertype);
        }
        if forward {
            let arrival = if distance > 0.0 {
                leg.arrival() + self.travel_time(distance)
            } else {
                leg.arrival()
            };
            if arrival > order.deadline() {
                return None;
            }
            let penalty = if arrival > order.latest_delivery() {
                order.late_penalty() * (arrival - order.latest_delivery()).in_hours()
            } else if arrival < order.earliest_delivery() {
                order.early_penalty() * (order.earliest_delivery() - arrival).in_hours()
            } else {
                0.0
            };
            Some(price + order.emission_factor() * emission + penalty)
        } else {
            let departure = if distance > 0.0 {
                leg.checkin() - self.travel_time(distance)
            } else {
                leg.checkin()
            };
            if departure < order.earliest_pickup() {
                return None;
            }
            Some(price + order.emission_factor() * emission)
        }
    }

    fn make_leg(
        &self,
        origin: LocationIdx,
        destination: LocationIdx,
        departure: DateTime,
        duration: Duration,
        distance: Kilometers,
        containertype: &ContainerType,
    ) -> AdhocLeg {
        AdhocLeg {
            origin,
            destination,
            checkin: departure,
            departure,
            arrival: departure + duration,
            containertype: containertype.idx(),
            price: self.price_for(distance),
            emission: self.emission_for(distance, containertype),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::DateTime;

    use super::AdhocLegModel;
    use crate::base_types::OrderIdx;
    use crate::container_types::ContainerTypes;
    use crate::locations::{LocationKind, Locations};
    use crate::orders::Order;
    use crate::timetable::Timetable;

    struct Setup {
        locations: Locations,
        container_types: ContainerTypes,
        timetable: Timetable,
        order: Order,
        model: AdhocLegModel,
    }

    fn at(time: &str) -> DateTime {
        DateTime::new(time).unwrap()
    }

    // Gent (shipper) -> Rotterdam (terminal) order, pickup 08:00-10:00,
    // delivery 14:00-16:00, deadline 18:00. 60 km/h, 20 euro start tariff,
    // 2 euro/km, 0.06 kg/tonne-km, 10 km default haul. The given distance
    // parameter is the trip length Gent -> Rotterdam.
    fn setup(distance: f64) -> Setup {
        let mut locations = Locations::new();
        let gent = locations.add(String::from("Gent"), LocationKind::Shipper);
        let antwerpen = locations.add(String::from("Antwerpen"), LocationKind::Terminal);
        let rotterdam = locations.add(String::from("Rotterdam"), LocationKind::Terminal);
        locations.add(String::from("Moerdijk"), LocationKind::Terminal);

        let mut container_types = ContainerTypes::new();
        let twenty_foot = container_types.add(String::from("20ft"), 2.5);

        let mut timetable = Timetable::new();
        let to_antwerpen = timetable
            .add_leg(
                1,
                gent,
                antwerpen,
                at("2023-07-24 09:00"),
                at("2023-07-24 09:00"),
                at("2023-07-24 11:00"),
                String::new(),
                String::new(),
            )
            .unwrap();
        timetable
            .add_capacity(to_antwerpen, twenty_foot, 1, 60.0, 20.0)
            .unwrap();
        let to_rotterdam = timetable
            .add_leg(
                2,
                antwerpen,
                rotterdam,
                at("2023-07-24 12:00"),
                at("2023-07-24 12:00"),
                at("2023-07-24 15:00"),
                String::new(),
                String::new(),
            )
            .unwrap();
        timetable
            .add_capacity(to_rotterdam, twenty_foot, 1, 80.0, 30.0)
            .unwrap();

        let order = Order::new(
            OrderIdx::from(0),
            7,
            gent,
            rotterdam,
            at("2023-07-24 08:00"),
            at("2023-07-24 10:00"),
            at("2023-07-24 14:00"),
            at("2023-07-24 16:00"),
            at("2023-07-24 18:00"),
            0.1,
            5.0,
            10.0,
        )
        .unwrap();

        let distances = HashMap::from([
            (
                String::from("Gent"),
                HashMap::from([
                    (String::from("Antwerpen"), 60.0),
                    (String::from("Rotterdam"), distance),
                    (String::from("Moerdijk"), 0.0),
                ]),
            ),
            (
                String::from("Antwerpen"),
                HashMap::from([(String::from("Gent"), 60.0), (String::from("Rotterdam"), 90.0)]),
            ),
        ]);
        let model = AdhocLegModel::new(distances, 20.0, 2.0, 60.0, 0.06, 10.0);

        Setup {
            locations,
            container_types,
            timetable,
            order,
            model,
        }
    }

    #[test]
    fn zero_matrix_entries_fall_back_to_the_default_haul() {
        let setup = setup(120.0);
        let gent = setup.locations.get(0.into());
        let moerdijk = setup.locations.get(3.into());
        assert_eq!(setup.model.distance(gent, moerdijk), 10.0); // explicit zero
        assert_eq!(setup.model.distance(moerdijk, gent), 10.0); // missing row
        assert_eq!(setup.model.distance(gent, gent), 0.0); // same location stays zero
    }

    #[test]
    fn full_trip_waits_for_the_latest_pickup_when_it_would_be_early() {
        let setup = setup(120.0); // 2h drive, fits before the delivery window
        let leg = setup
            .model
            .full_trip(
                &setup.locations,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .unwrap();
        assert_eq!(leg.departure, at("2023-07-24 10:00"));
        assert_eq!(leg.checkin, leg.departure);
        assert_eq!(leg.arrival, at("2023-07-24 12:00"));
        assert_eq!(leg.price, 20.0 + 2.0 * 120.0);
        assert_eq!(leg.emission, 0.06 * 120.0 * 2.5);
    }

    #[test]
    fn full_trip_leaves_immediately_when_it_will_be_late_anyway() {
        let setup = setup(540.0); // 9h drive, arrival after the latest delivery
        let leg = setup
            .model
            .full_trip(
                &setup.locations,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .unwrap();
        assert_eq!(leg.departure, at("2023-07-24 08:00"));
        assert_eq!(leg.arrival, at("2023-07-24 17:00"));
    }

    #[test]
    fn full_trip_leaves_immediately_when_the_pickup_window_cannot_absorb_the_slack() {
        let setup = setup(300.0); // 5h drive
        let leg = setup
            .model
            .full_trip(
                &setup.locations,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .unwrap();
        assert_eq!(leg.departure, at("2023-07-24 08:00"));
        assert_eq!(leg.arrival, at("2023-07-24 13:00"));
    }

    #[test]
    fn full_trip_times_the_departure_for_a_punctual_arrival() {
        let mut setup = setup(120.0); // 2h drive
        // widen the pickup window so leaving later than the earliest pickup
        // can hit the start of the delivery window exactly
        setup.order = Order::new(
            OrderIdx::from(0),
            7,
            setup.order.origin(),
            setup.order.destination(),
            at("2023-07-24 08:00"),
            at("2023-07-24 14:00"),
            at("2023-07-24 14:00"),
            at("2023-07-24 16:00"),
            at("2023-07-24 18:00"),
            0.1,
            5.0,
            10.0,
        )
        .unwrap();
        let leg = setup
            .model
            .full_trip(
                &setup.locations,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .unwrap();
        assert_eq!(leg.departure, at("2023-07-24 12:00"));
        assert_eq!(leg.arrival, at("2023-07-24 14:00"));
    }

    #[test]
    fn full_trip_is_impossible_when_the_deadline_cannot_be_met() {
        let setup = setup(630.0); // 10.5h drive, 08:00 + 10.5h > 18:00
        assert!(setup
            .model
            .full_trip(
                &setup.locations,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .is_none());
    }

    #[test]
    fn prefix_reaches_the_next_leg_before_checkin_or_fails() {
        let setup = setup(120.0);
        let next_leg = setup.timetable.leg(1.into()); // Antwerpen -> Rotterdam, check-in 12:00
        // the haul Gent -> Antwerpen takes 1h, well before the check-in
        let leg = setup
            .model
            .prefix(
                &setup.locations,
                next_leg,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .unwrap();
        let next_origin = next_leg.origin();
        let next_destination = next_leg.destination();
        assert_eq!(leg.origin, setup.order.origin());
        assert_eq!(leg.destination, next_origin);
        assert_eq!(leg.departure, at("2023-07-24 08:00"));
        assert_eq!(leg.arrival, at("2023-07-24 09:00"));

        // a check-in at 08:30 cannot be reached from the earliest pickup
        let mut unreachable = setup;
        let early_leg_idx = unreachable
            .timetable
            .add_leg(
                3,
                next_origin,
                next_destination,
                at("2023-07-24 08:30"),
                at("2023-07-24 08:30"),
                at("2023-07-24 11:30"),
                String::new(),
                String::new(),
            )
            .unwrap();
        assert!(unreachable
            .model
            .prefix(
                &unreachable.locations,
                unreachable.timetable.leg(early_leg_idx),
                &unreachable.order,
                unreachable.container_types.get(0.into()),
            )
            .is_none());
    }

    #[test]
    fn suffix_waits_to_avoid_an_early_delivery() {
        let setup = setup(120.0);
        let prev_leg = setup.timetable.leg(0.into()); // arrives in Antwerpen at 11:00
        // Antwerpen -> Rotterdam is 90 km (1.5h); driving off immediately
        // would arrive 12:30, so the departure is delayed to arrive at 14:00
        let leg = setup
            .model
            .suffix(
                &setup.locations,
                prev_leg,
                &setup.order,
                setup.container_types.get(0.into()),
            )
            .unwrap();
        assert_eq!(leg.origin, prev_leg.destination());
        assert_eq!(leg.destination, setup.order.destination());
        assert_eq!(leg.departure, at("2023-07-24 12:30"));
        assert_eq!(leg.arrival, at("2023-07-24 14:00"));
    }

    #[test]
    fn estimates_price_the_remaining_haul_and_penalties() {
        let setup = setup(120.0);
        let capacity = setup.timetable.capacity(0.into());
        let leg = setup.timetable.leg(0.into());
        let containertype = setup.container_types.get(0.into());

        // forward: 60 price + 1.5h haul to Rotterdam arriving 12:30, which is
        // 1.5h early
        let forward = setup
            .model
            .estimate_total_cost(
                &setup.locations,
                leg,
                capacity,
                &setup.order,
                containertype,
                true,
            )
            .unwrap();
        let expected_price = 60.0 + 20.0 + 2.0 * 90.0;
        let expected_emission = 20.0 + 0.06 * 90.0 * 2.5;
        assert_eq!(
            forward,
            expected_price + 0.1 * expected_emission + 1.5 * 5.0
        );

        // reverse: the leg starts at the order origin, no haul is needed and
        // the check-in is after the earliest pickup
        let reverse = setup
            .model
            .estimate_total_cost(
                &setup.locations,
                leg,
                capacity,
                &setup.order,
                containertype,
                false,
            )
            .unwrap();
        assert_eq!(reverse, 60.0 + 0.1 * 20.0);
    }
}
