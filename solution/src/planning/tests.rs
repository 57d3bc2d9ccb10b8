use crate::json_serialisation::{adhoc_legs, legs_use, planning_to_json, routes_per_order};
use crate::planning::Planning;
use crate::test_utilities::{direct_leg, scenario, two_hop_legs};
use crate::traject::{CapacityRef, LegChoice};

#[test]
fn empty_planning_has_everything_unplanned() {
    let data = scenario(&[direct_leg()], 2);
    let planning = Planning::empty(data.instance.clone());
    assert_eq!(planning.number_of_unplanned(), 2);
    assert_eq!(planning.number_of_planned(), 0);
    assert_eq!(planning.total_cost(), 0.0);
    planning.verify_consistency();
}

#[test]
fn add_traject_reserves_and_caches_cost() {
    let data = scenario(&[direct_leg()], 1);
    let mut planning = Planning::empty(data.instance.clone());
    let direct = data.capacities[0];
    let container = data.containers[0];

    planning
        .add_traject(container, vec![LegChoice::Scheduled(direct)])
        .unwrap();
    planning.verify_consistency();

    assert!(planning.is_planned(container));
    assert_eq!(planning.traject_of(container).len(), 1);
    // 100 price + 0.1 * 50 emission, arrival 15:00 is within the delivery
    // window so there is no penalty
    assert_eq!(planning.cost_of(container), Some(105.0));
    assert_eq!(planning.penalty_of(container).unwrap().cost, 0.0);
    assert_eq!(planning.total_cost(), 105.0);
    assert_eq!(planning.available(CapacityRef::Scheduled(direct)), 0);
}

#[test]
fn remove_traject_restores_the_previous_state() {
    let data = scenario(&[direct_leg()], 2);
    let mut planning = Planning::empty(data.instance.clone());
    let direct = data.capacities[0];
    let container = data.containers[0];

    planning
        .add_traject(container, vec![LegChoice::Scheduled(direct)])
        .unwrap();
    planning.remove_traject(container).unwrap();
    planning.verify_consistency();

    assert!(!planning.is_planned(container));
    assert_eq!(planning.number_of_unplanned(), 2);
    assert!(planning.traject_of(container).is_empty());
    assert_eq!(planning.cost_of(container), None);
    assert_eq!(planning.reserved_count(CapacityRef::Scheduled(direct)), 0);
    assert_eq!(planning.total_cost(), 0.0);
    assert!(planning.adhoc_capacities().is_empty());

    assert!(planning.remove_traject(container).is_err());
}

#[test]
fn add_traject_sorts_legs_into_the_chain() {
    let data = scenario(&two_hop_legs(), 1);
    let mut planning = Planning::empty(data.instance.clone());
    let [hop1, hop2] = [data.capacities[0], data.capacities[1]];
    let container = data.containers[0];

    // deliberately out of order
    planning
        .add_traject(
            container,
            vec![LegChoice::Scheduled(hop2), LegChoice::Scheduled(hop1)],
        )
        .unwrap();
    planning.verify_consistency();

    let traject: Vec<_> = planning.traject_of(container).iter().collect();
    assert_eq!(
        traject,
        vec![CapacityRef::Scheduled(hop1), CapacityRef::Scheduled(hop2)]
    );
    // 60 + 80 price + 0.1 * (20 + 30) emission
    assert_eq!(planning.cost_of(container), Some(145.0));
}

#[test]
fn add_traject_rejects_gaps_and_ambiguity() {
    let mut legs = vec![direct_leg()];
    legs.extend(two_hop_legs());
    let data = scenario(&legs, 1);
    let mut planning = Planning::empty(data.instance.clone());
    let [direct, hop1, hop2] = [data.capacities[0], data.capacities[1], data.capacities[2]];
    let container = data.containers[0];

    // hop2 alone does not start at the container origin
    assert!(planning
        .add_traject(container, vec![LegChoice::Scheduled(hop2)])
        .is_err());
    // two legs leaving the origin cannot be ordered
    assert!(planning
        .add_traject(
            container,
            vec![LegChoice::Scheduled(hop1), LegChoice::Scheduled(direct)],
        )
        .is_err());
    // nothing was mutated
    planning.verify_consistency();
    assert_eq!(planning.number_of_planned(), 0);

    // an empty leg list is a no-op, the container stays unplanned
    planning.add_traject(container, Vec::new()).unwrap();
    assert!(!planning.is_planned(container));
}

#[test]
fn late_and_early_arrivals_are_penalized() {
    let mut late = direct_leg();
    late.arrival = "2023-07-24 18:00"; // two hours after the latest delivery
    let mut early = direct_leg();
    early.arrival = "2023-07-24 13:00"; // one hour before the earliest delivery
    let data = scenario(&[late, early], 2);
    let mut planning = Planning::empty(data.instance.clone());

    planning
        .add_traject(
            data.containers[0],
            vec![LegChoice::Scheduled(data.capacities[0])],
        )
        .unwrap();
    planning
        .add_traject(
            data.containers[1],
            vec![LegChoice::Scheduled(data.capacities[1])],
        )
        .unwrap();

    let late_penalty = planning.penalty_of(data.containers[0]).unwrap();
    assert_eq!(late_penalty.hours_late, 2.0);
    assert_eq!(late_penalty.cost, 20.0);
    assert_eq!(planning.cost_of(data.containers[0]), Some(125.0));

    let early_penalty = planning.penalty_of(data.containers[1]).unwrap();
    assert_eq!(early_penalty.hours_early, 1.0);
    assert_eq!(early_penalty.cost, 5.0);
    assert_eq!(planning.cost_of(data.containers[1]), Some(110.0));
}

#[test]
#[should_panic(expected = "oversubscribed")]
fn oversubscribing_a_capacity_is_a_bug() {
    let data = scenario(&[direct_leg()], 2);
    let mut planning = Planning::empty(data.instance.clone());
    planning
        .add_traject(
            data.containers[0],
            vec![LegChoice::Scheduled(data.capacities[0])],
        )
        .unwrap();
    // the direct leg has a single seat
    let _ = planning.add_traject(
        data.containers[1],
        vec![LegChoice::Scheduled(data.capacities[0])],
    );
}

#[test]
fn adhoc_trajecten_are_pooled_and_merged() {
    let data = scenario(&[], 3);
    let mut planning = Planning::empty(data.instance.clone());
    let [c0, c1, c2] = [data.containers[0], data.containers[1], data.containers[2]];

    let leg = data.instance.adhoc_full_trip(c0).unwrap();
    // departing as late as possible: 120 km at 60 km/h fits before the
    // delivery window opens
    assert_eq!(leg.departure.to_string(), "2023-07-24 10:00:00");
    assert_eq!(leg.arrival.to_string(), "2023-07-24 12:00:00");
    assert_eq!(leg.price, 20.0 + 120.0 * 2.0);
    assert_eq!(leg.emission, 0.06 * 120.0 * 2.5);

    planning.add_traject(c0, vec![LegChoice::Adhoc(leg.clone())]).unwrap();
    planning.add_traject(c1, vec![LegChoice::Adhoc(leg.clone())]).unwrap();
    planning.add_traject(c2, vec![LegChoice::Adhoc(leg)]).unwrap();
    planning.verify_consistency();
    assert_eq!(planning.adhoc_capacities().len(), 3);

    planning.make_unique_adhoc();
    planning.verify_consistency();
    let pool = planning.adhoc_capacities();
    assert_eq!(pool.len(), 1);
    let (survivor, capacity) = (pool[0].0, pool[0].1);
    assert_eq!(capacity.id(), -1);
    assert_eq!(capacity.seats(), 3);
    assert_eq!(capacity.containers().len(), 3);
    assert_eq!(planning.traject_of(c1), planning.traject_of(c2));
    assert!(planning.traject_of(c0).contains(CapacityRef::Adhoc(survivor)));

    // removing one merged container releases its seat but keeps the survivor
    planning.remove_traject(c1).unwrap();
    planning.verify_consistency();
    let pool = planning.adhoc_capacities();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].1.seats(), 2);

    planning.remove_traject(c0).unwrap();
    planning.remove_traject(c2).unwrap();
    planning.verify_consistency();
    assert!(planning.adhoc_capacities().is_empty());
}

#[test]
fn clear_all_trajecten_unplans_everything() {
    let data = scenario(&two_hop_legs(), 1);
    let mut planning = Planning::empty(data.instance.clone());
    planning
        .add_traject(
            data.containers[0],
            vec![
                LegChoice::Scheduled(data.capacities[0]),
                LegChoice::Scheduled(data.capacities[1]),
            ],
        )
        .unwrap();
    planning.clear_all_trajecten();
    planning.verify_consistency();
    assert_eq!(planning.number_of_planned(), 0);
    assert_eq!(planning.total_cost(), 0.0);
}

#[test]
fn trajecten_group_by_capacity_sequence() {
    let mut specs = vec![direct_leg()];
    specs[0].seats = 2;
    let data = scenario(&specs, 3);
    let mut planning = Planning::empty(data.instance.clone());
    let direct = data.capacities[0];

    planning
        .add_traject(data.containers[0], vec![LegChoice::Scheduled(direct)])
        .unwrap();
    planning
        .add_traject(data.containers[1], vec![LegChoice::Scheduled(direct)])
        .unwrap();

    let groups = planning.unique_trajecten();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups.values().next().unwrap(),
        &vec![data.containers[0], data.containers[1]]
    );

    let per_order = planning.unique_trajecten_per_order();
    assert_eq!(per_order.len(), 1);
    let trajecten = &per_order[0].1;
    assert_eq!(trajecten.len(), 1);
    let summary = trajecten.values().next().unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.price, 200.0);
    assert_eq!(summary.emission, 100.0);
    assert_eq!(summary.penalty, 0.0);
}

#[test]
fn output_views_report_use_adhoc_and_routes() {
    let mut specs = vec![direct_leg()];
    specs[0].seats = 2;
    let data = scenario(&specs, 3);
    let mut planning = Planning::empty(data.instance.clone());
    let direct = data.capacities[0];
    let [c0, c1, c2] = [data.containers[0], data.containers[1], data.containers[2]];

    planning.add_traject(c0, vec![LegChoice::Scheduled(direct)]).unwrap();
    planning.add_traject(c1, vec![LegChoice::Scheduled(direct)]).unwrap();
    let adhoc = data.instance.adhoc_full_trip(c2).unwrap();
    planning.add_traject(c2, vec![LegChoice::Adhoc(adhoc)]).unwrap();
    planning.make_unique_adhoc();

    let use_rows = legs_use(&planning);
    assert_eq!(use_rows.len(), 1);
    assert_eq!(use_rows[0].leg_id, 1);
    assert_eq!(use_rows[0].container_type, "20ft");
    assert_eq!(use_rows[0].used, 2);
    assert_eq!(use_rows[0].available, 0);

    let adhoc_rows = adhoc_legs(&planning);
    assert_eq!(adhoc_rows.len(), 1);
    assert!(adhoc_rows[0].id < 0);
    assert_eq!(adhoc_rows[0].van, "Gent Verlader");
    assert_eq!(adhoc_rows[0].naar, "Rotterdam Terminal");
    assert_eq!(adhoc_rows[0].aantal, 1);

    let routes = routes_per_order(&planning);
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|route| route.order_id == 7));
    let scheduled_route = routes
        .iter()
        .find(|route| route.leg_ids == vec![1])
        .unwrap();
    assert_eq!(scheduled_route.amount, 2);
    assert_eq!(scheduled_route.prijs, 200.0);
    let adhoc_route = routes
        .iter()
        .find(|route| route.leg_ids.iter().all(|&id| id < 0))
        .unwrap();
    assert_eq!(adhoc_route.amount, 1);

    let json = planning_to_json(&planning);
    assert!(json.get("legsUse").is_some());
    assert!(json.get("adhocLegs").is_some());
    assert!(json.get("routesPerOrder").is_some());
}
