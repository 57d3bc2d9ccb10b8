use std::fs::File;
use std::io::Read;
use std::path::Path;

use time::DateTime;

use crate::base_types::{ContainerIdx, LegCapacityIdx, LegIdx, OrderIdx};
use crate::instance::Instance;
use crate::locations::{parse_location_label, LocationKind};
use crate::serialisation::{load_instance_from_json, load_instance_from_tables};

#[test]
fn load_from_json() {
    let mut file = File::open("resources/small_test_input.json").unwrap();
    let mut input_data = String::new();
    file.read_to_string(&mut input_data).unwrap();
    let input_data: serde_json::Value = serde_json::from_str(&input_data).unwrap();

    let instance = load_instance_from_json(input_data).unwrap();
    assert_small_instance(&instance);

    // json-specific extras
    assert_eq!(instance.config().alns.iterations, 200);
    assert_eq!(instance.config().alns.seed, Some(42));
    assert_eq!(
        instance.timetable().leg(LegIdx::from(1)).mode(),
        "barge"
    );
}

#[test]
fn load_from_tables() {
    let instance = load_instance_from_tables(Path::new("resources/tables")).unwrap();
    assert_small_instance(&instance);
}

fn assert_small_instance(instance: &Instance) {
    let locations = instance.locations();
    assert_eq!(locations.len(), 3);
    assert_eq!(locations.terminals().len(), 2);
    assert_eq!(locations.shippers().len(), 1);
    assert_eq!(locations.empty_depots().len(), 0);
    let gent = locations.get(locations.shippers()[0]);
    assert_eq!(gent.name(), "Gent");
    assert!(gent.is_shipper());

    assert_eq!(instance.container_types().len(), 1);
    let containertype = instance.container_types().iter().next().unwrap();
    assert_eq!(containertype.name(), "20ft");
    assert_eq!(containertype.weight(), 2.5);

    // the planning period starts on Monday 2023-07-24, both legs are pinned
    // to that date
    let timetable = instance.timetable();
    assert_eq!(timetable.number_of_legs(), 2);
    assert_eq!(timetable.number_of_capacities(), 2);
    let first = timetable.leg(LegIdx::from(0));
    assert_eq!(first.id(), 1);
    assert_eq!(first.checkin(), DateTime::new("2023-07-24 09:00").unwrap());
    assert_eq!(first.departure(), DateTime::new("2023-07-24 09:30").unwrap());
    assert_eq!(first.arrival(), DateTime::new("2023-07-24 12:00").unwrap());
    let second = timetable.leg(LegIdx::from(1));
    assert_eq!(second.id(), 2);
    assert_eq!(second.departure(), DateTime::new("2023-07-24 13:00").unwrap()); // departure falls back to check-in
    assert_eq!(second.arrival(), DateTime::new("2023-07-24 15:00").unwrap());
    assert!(first.precedes(second));
    assert_eq!(timetable.seats(first.idx(), containertype.idx()), 2);
    assert_eq!(timetable.price(second.idx(), containertype.idx()), 80.0);

    assert_eq!(instance.number_of_orders(), 1);
    let order = instance.order(OrderIdx::from(0));
    assert_eq!(order.id(), 7);
    assert_eq!(
        order.earliest_pickup(),
        DateTime::new("2023-07-24 08:00").unwrap()
    );
    assert_eq!(order.deadline(), DateTime::new("2023-07-24 18:00").unwrap());
    assert_eq!(order.emission_factor(), 0.1);

    // two containers materialised for the one order capacity
    assert_eq!(instance.number_of_containers(), 2);
    assert_eq!(
        instance.container(ContainerIdx::from(0)),
        instance.container(ContainerIdx::from(1))
    );
    assert_eq!(
        instance
            .containers_of_order(OrderIdx::from(0))
            .collect::<Vec<_>>(),
        vec![ContainerIdx::from(0), ContainerIdx::from(1)]
    );

    // distance lookups, including the pre/post-haul default for pairs the
    // matrix does not know
    let adhoc = instance.adhoc();
    let rotterdam = locations.get(locations.terminals()[0]); // order destination is interned before the leg stops
    assert_eq!(rotterdam.name(), "Rotterdam");
    assert_eq!(adhoc.distance(gent, rotterdam), 120.0);
    assert_eq!(adhoc.distance(gent, gent), 0.0);

    assert!(instance.is_feasible_start(LegCapacityIdx::from(0), ContainerIdx::from(0)));
    assert!(!instance.is_feasible_start(LegCapacityIdx::from(1), ContainerIdx::from(0)));
    assert!(instance.is_feasible_end(LegCapacityIdx::from(1), ContainerIdx::from(0)));
    assert!(instance.chains(LegCapacityIdx::from(0), LegCapacityIdx::from(1)));
    assert!(!instance.chains(LegCapacityIdx::from(1), LegCapacityIdx::from(0)));
}

#[test]
fn location_labels_are_normalised() {
    assert_eq!(
        parse_location_label("ROTTERDAM terminal").unwrap(),
        (String::from("Rotterdam"), LocationKind::Terminal)
    );
    assert_eq!(
        parse_location_label("Gent V").unwrap(),
        (String::from("Gent"), LocationKind::Shipper)
    );
    assert_eq!(
        parse_location_label("moerdijk empty depot").unwrap(),
        (String::from("Moerdijk"), LocationKind::EmptyDepot)
    );
    assert_eq!(
        parse_location_label("Den Haag E").unwrap(),
        (String::from("Den Haag"), LocationKind::EmptyDepot)
    );
    assert!(parse_location_label("Rotterdam").is_err());
    assert!(parse_location_label("Rotterdam Haven").is_err());
}
