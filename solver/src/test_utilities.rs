use std::collections::HashMap;
use std::sync::Arc;

use time::DateTime;

use model::adhoc::AdhocLegModel;
use model::base_types::{ContainerIdx, LegCapacityIdx, OrderIdx, SeatCount};
use model::config::{AlnsConfig, Config};
use model::container_types::ContainerTypes;
use model::instance::Instance;
use model::locations::{LocationKind, Locations};
use model::orders::Order;
use model::timetable::Timetable;

pub(crate) struct LegSpec {
    pub(crate) from: &'static str,
    pub(crate) to: &'static str,
    pub(crate) checkin: &'static str,
    pub(crate) departure: &'static str,
    pub(crate) arrival: &'static str,
    pub(crate) seats: SeatCount,
    pub(crate) price: f64,
    pub(crate) emission: f64,
}

pub(crate) struct TestData {
    pub(crate) instance: Arc<Instance>,
    pub(crate) capacities: Vec<LegCapacityIdx>,
    pub(crate) containers: Vec<ContainerIdx>,
}

/// A small network around one order of container_count containers from the
/// shipper Gent to the terminal Rotterdam: pickup window 08:00-10:00,
/// delivery window 14:00-16:00, deadline 18:00 (all on Monday 2023-07-24),
/// emission factor 0.1, penalties 5/h early and 10/h late. The solver
/// configuration is seeded and short so tests are fast and reproducible.
pub(crate) fn scenario(legs: &[LegSpec], container_count: SeatCount) -> TestData {
    let mut locations = Locations::new();
    let gent = locations.add(String::from("Gent"), LocationKind::Shipper);
    let antwerpen = locations.add(String::from("Antwerpen"), LocationKind::Terminal);
    let rotterdam = locations.add(String::from("Rotterdam"), LocationKind::Terminal);
    let moerdijk = locations.add(String::from("Moerdijk"), LocationKind::EmptyDepot);
    let by_name = HashMap::from([
        ("Gent", gent),
        ("Antwerpen", antwerpen),
        ("Rotterdam", rotterdam),
        ("Moerdijk", moerdijk),
    ]);

    let mut container_types = ContainerTypes::new();
    let twenty_foot = container_types.add(String::from("20ft"), 2.5);

    let mut timetable = Timetable::new();
    let mut capacities = Vec::new();
    for (i, spec) in legs.iter().enumerate() {
        let leg = timetable
            .add_leg(
                i as i64 + 1,
                by_name[spec.from],
                by_name[spec.to],
                DateTime::new(spec.checkin).unwrap(),
                DateTime::new(spec.departure).unwrap(),
                DateTime::new(spec.arrival).unwrap(),
                String::from("maandag"),
                String::new(),
            )
            .unwrap();
        capacities.push(
            timetable
                .add_capacity(leg, twenty_foot, spec.seats, spec.price, spec.emission)
                .unwrap(),
        );
    }

    let order = Order::new(
        OrderIdx::from(0),
        7,
        gent,
        rotterdam,
        DateTime::new("2023-07-24 08:00").unwrap(),
        DateTime::new("2023-07-24 10:00").unwrap(),
        DateTime::new("2023-07-24 14:00").unwrap(),
        DateTime::new("2023-07-24 16:00").unwrap(),
        DateTime::new("2023-07-24 18:00").unwrap(),
        0.1,
        5.0,
        10.0,
    )
    .unwrap();

    let distances = HashMap::from([
        (
            String::from("Gent"),
            HashMap::from([
                (String::from("Gent"), 0.0),
                (String::from("Antwerpen"), 60.0),
                (String::from("Rotterdam"), 120.0),
            ]),
        ),
        (
            String::from("Antwerpen"),
            HashMap::from([
                (String::from("Gent"), 60.0),
                (String::from("Antwerpen"), 0.0),
                (String::from("Rotterdam"), 90.0),
            ]),
        ),
        (
            String::from("Rotterdam"),
            HashMap::from([
                (String::from("Gent"), 120.0),
                (String::from("Antwerpen"), 90.0),
                (String::from("Rotterdam"), 0.0),
            ]),
        ),
    ]);
    let adhoc = AdhocLegModel::new(distances, 20.0, 2.0, 60.0, 0.06, 10.0);

    let config = Config {
        alns: AlnsConfig {
            iterations: 300,
            degree_of_destruction: 0.5,
            seed: Some(7),
            ..AlnsConfig::default()
        },
    };

    let instance = Arc::new(Instance::new(
        locations,
        container_types,
        timetable,
        vec![order],
        vec![(OrderIdx::from(0), container_count, twenty_foot)],
        adhoc,
        config,
    ));
    let containers = instance.container_indices().collect();
    TestData {
        instance,
        capacities,
        containers,
    }
}

/// Direct leg Gent -> Rotterdam: check-in 09:00, departure 09:30, arrival
/// 15:00, 100 euro, 50 kg.
pub(crate) fn direct_leg() -> LegSpec {
    LegSpec {
        from: "Gent",
        to: "Rotterdam",
        checkin: "2023-07-24 09:00",
        departure: "2023-07-24 09:30",
        arrival: "2023-07-24 15:00",
        seats: 1,
        price: 100.0,
        emission: 50.0,
    }
}

/// Two-hop chain Gent -> Antwerpen -> Rotterdam (60+20 and 80+30).
pub(crate) fn two_hop_legs() -> [LegSpec; 2] {
    [
        LegSpec {
            from: "Gent",
            to: "Antwerpen",
            checkin: "2023-07-24 09:00",
            departure: "2023-07-24 09:00",
            arrival: "2023-07-24 11:00",
            seats: 1,
            price: 60.0,
            emission: 20.0,
        },
        LegSpec {
            from: "Antwerpen",
            to: "Rotterdam",
            checkin: "2023-07-24 12:00",
            departure: "2023-07-24 12:00",
            arrival: "2023-07-24 15:00",
            seats: 1,
            price: 80.0,
            emission: 30.0,
        },
    ]
}
