use serde::Serialize;
use serde_json::json;

use model::base_types::{Cost, EmissionKg, ExternalId, SeatCount};

use crate::planning::Planning;
use crate::traject::CapacityRef;

/// Utilization of every scheduled capacity: reserved seats and what is left.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LegUse {
    pub leg_id: ExternalId,
    pub container_type: String,
    pub used: usize,
    pub available: SeatCount,
}

/// One ad-hoc capacity in use. Ids are strictly negative once
/// make_unique_adhoc has run.
#[derive(Serialize, Debug)]
pub struct AdhocLegUse {
    pub id: ExternalId,
    pub van: String,
    pub naar: String,
    pub vertrek: String,
    pub aankomst: String,
    pub aantal: SeatCount,
    pub containertype: String,
    pub prijs: Cost,
    pub emissie: EmissionKg,
}

/// One distinct traject of an order with the summed cost components of the
/// containers following it.
#[derive(Serialize, Debug)]
pub struct Route {
    #[serde(rename = "orderId")]
    pub order_id: ExternalId,
    pub checkin: String,
    pub vertrek: String,
    pub aankomst: String,
    pub amount: SeatCount,
    #[serde(rename = "containerType")]
    pub container_type: String,
    pub prijs: Cost,
    pub co2: EmissionKg,
    pub penalty: Cost,
    #[serde(rename = "LegsIds")]
    pub leg_ids: Vec<ExternalId>,
}

pub fn legs_use(planning: &Planning) -> Vec<LegUse> {
    let instance = planning.instance();
    instance
        .timetable()
        .capacities()
        .map(|capacity| {
            let reference = CapacityRef::Scheduled(capacity.idx());
            LegUse {
                leg_id: instance.timetable().leg(capacity.leg()).id(),
                container_type: instance
                    .container_types()
                    .get(capacity.containertype())
                    .name()
                    .to_string(),
                used: planning.reserved_count(reference),
                available: planning.available(reference),
            }
        })
        .collect()
}

pub fn adhoc_legs(planning: &Planning) -> Vec<AdhocLegUse> {
    let instance = planning.instance();
    planning
        .adhoc_capacities()
        .into_iter()
        .map(|(_, capacity)| {
            let leg = capacity.leg();
            AdhocLegUse {
                id: capacity.id(),
                van: instance.locations().get(leg.origin).to_string(),
                naar: instance.locations().get(leg.destination).to_string(),
                vertrek: leg.departure.to_string(),
                aankomst: leg.arrival.to_string(),
                aantal: capacity.seats(),
                containertype: instance
                    .container_types()
                    .get(leg.containertype)
                    .name()
                    .to_string(),
                prijs: leg.price,
                emissie: leg.emission,
            }
        })
        .collect()
}

pub fn routes_per_order(planning: &Planning) -> Vec<Route> {
    let instance = planning.instance();
    let mut routes = Vec::new();
    for (order, trajecten) in planning.unique_trajecten_per_order() {
        for (traject, summary) in trajecten {
            let first = traject.first().unwrap();
            let last = traject.last().unwrap();
            routes.push(Route {
                order_id: instance.order(order).id(),
                checkin: planning.checkin_of(first).to_string(),
                vertrek: planning.departure_of(first).to_string(),
                aankomst: planning.arrival_of(last).to_string(),
                amount: summary.count,
                container_type: instance
                    .container_types()
                    .get(planning.containertype_of(first))
                    .name()
                    .to_string(),
                prijs: summary.price,
                co2: summary.emission,
                penalty: summary.penalty,
                leg_ids: traject
                    .iter()
                    .map(|capacity| planning.external_id_of(capacity))
                    .collect(),
            });
        }
    }
    routes.sort_by(|a, b| {
        (a.order_id, &a.checkin, &a.leg_ids).cmp(&(b.order_id, &b.checkin, &b.leg_ids))
    });
    routes
}

pub fn planning_to_json(planning: &Planning) -> serde_json::Value {
    json!({
        "legsUse": legs_use(planning),
        "adhocLegs": adhoc_legs(planning),
        "routesPerOrder": routes_per_order(planning),
    })
}
