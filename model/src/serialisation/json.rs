use std::collections::HashMap;

use serde::Deserialize;
use time::{DateTime, Duration, Weekday};

use crate::adhoc::AdhocLegModel;
use crate::base_types::{
    ContainerTypeIdx, Cost, EmissionKg, ExternalId, Kilometers, LocationIdx, OrderIdx, SeatCount,
    Tonnes,
};
use crate::config::{Acceptance, AlnsConfig, Config, Cooling};
use crate::container_types::ContainerTypes;
use crate::instance::Instance;
use crate::locations::{parse_location_label, LocationKind, Locations};
use crate::orders::Order;
use crate::timetable::Timetable;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    legs: Vec<JsonLeg>,
    orders: Vec<JsonOrder>,
    ad_hoc_leg_properties: JsonAdhocProperties,
    ad_hoc_leg_afstanden: HashMap<String, HashMap<String, Kilometers>>,
    #[serde(default)]
    parameters: Option<JsonParameters>,
}

#[derive(Deserialize, Debug)]
struct JsonLeg {
    #[serde(default)]
    id: Option<ExternalId>,
    van: String,
    naar: String,
    dag: String,
    checkin: String,
    #[serde(default)]
    vertrek: Option<String>,
    duur_uren: f64,
    duur_minuten: f64,
    aantal: SeatCount,
    containertype: String,
    prijs: Cost,
    co2: EmissionKg,
    #[serde(default)]
    modus: Option<String>,
}

#[derive(Deserialize, Debug)]
struct JsonOrder {
    #[serde(default)]
    id: Option<ExternalId>,
    van: String,
    naar: String,
    #[serde(rename = "minOphaalTijd")]
    min_ophaaltijd: String,
    #[serde(rename = "maxOphaalTijd")]
    max_ophaaltijd: String,
    #[serde(rename = "minLeverTijd")]
    min_levertijd: String,
    #[serde(rename = "maxLeverTijd")]
    max_levertijd: String,
    #[serde(rename = "uitersteLeverTijd")]
    uiterste_levertijd: String,
    #[serde(rename = "emissieFactor")]
    emissie_factor: Cost,
    #[serde(rename = "boeteTeVroeg")]
    boete_te_vroeg: Cost,
    #[serde(rename = "boeteTeLaat")]
    boete_te_laat: Cost,
    aantal: SeatCount,
    containertype: String,
}

#[derive(Deserialize, Debug)]
struct JsonAdhocProperties {
    snelheid: f64,
    starttarief: Cost,
    tarief: Cost,
    co2: f64,
    #[serde(rename = "voorEnNaTransport")]
    voor_en_na_transport: Kilometers,
    containergewicht: Tonnes,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonParameters {
    iterations: Option<u64>,
    degree_of_destruction: Option<f64>,
    operator_decay: Option<f64>,
    seed: Option<u64>,
    acceptance: Option<String>,
    start_temperature: Option<f64>,
    end_temperature: Option<f64>,
    temperature_step: Option<f64>,
    cooling: Option<String>,
}

pub fn load_instance_from_json(input_data: serde_json::Value) -> Result<Instance, String> {
    let json_input: JsonInput =
        serde_json::from_value(input_data).map_err(|error| format!("invalid input: {}", error))?;
    create_instance(json_input)
}

fn create_instance(input: JsonInput) -> Result<Instance, String> {
    let mut locations = Locations::new();
    let mut location_lookup: HashMap<(String, LocationKind), LocationIdx> = HashMap::new();
    let mut container_types = ContainerTypes::new();
    let container_weight = input.ad_hoc_leg_properties.containergewicht;

    // orders first, they fix the planning period
    let mut orders = Vec::new();
    let mut order_capacities = Vec::new();
    for (i, order) in input.orders.iter().enumerate() {
        let idx = OrderIdx::from(i);
        let origin = intern_location(&mut locations, &mut location_lookup, &order.van)?;
        let destination = intern_location(&mut locations, &mut location_lookup, &order.naar)?;
        let containertype = intern_container_type(
            &mut container_types,
            &order.containertype,
            container_weight,
        );
        orders.push(Order::new(
            idx,
            order.id.unwrap_or(i as ExternalId),
            origin,
            destination,
            DateTime::from_mdy(&order.min_ophaaltijd)?,
            DateTime::from_mdy(&order.max_ophaaltijd)?,
            DateTime::from_mdy(&order.min_levertijd)?,
            DateTime::from_mdy(&order.max_levertijd)?,
            DateTime::from_mdy(&order.uiterste_levertijd)?,
            order.emissie_factor,
            order.boete_te_vroeg,
            order.boete_te_laat,
        )?);
        order_capacities.push((idx, order.aantal, containertype));
    }
    let period_start = super::period_start(&orders)?;

    let mut timetable = Timetable::new();
    for (i, leg) in input.legs.iter().enumerate() {
        let origin = intern_location(&mut locations, &mut location_lookup, &leg.van)?;
        let destination = intern_location(&mut locations, &mut location_lookup, &leg.naar)?;
        let containertype =
            intern_container_type(&mut container_types, &leg.containertype, container_weight);
        let day = Weekday::parse(&leg.dag)?;
        let checkin = DateTime::from_mdy(&leg.checkin)?.time_of_day();
        let departure = match &leg.vertrek {
            Some(vertrek) if !vertrek.trim().is_empty() => {
                DateTime::from_mdy(vertrek)?.time_of_day()
            }
            _ => checkin,
        };
        let travel_time = Duration::from_seconds(
            (leg.duur_uren * 3600.0 + leg.duur_minuten * 60.0).round() as u64,
        );
        let (checkin, departure, arrival) =
            super::synthesise_leg_times(period_start, day, checkin, departure, travel_time);
        let leg_idx = timetable.add_leg(
            leg.id.unwrap_or(i as ExternalId),
            origin,
            destination,
            checkin,
            departure,
            arrival,
            leg.dag.trim().to_string(),
            leg.modus.clone().unwrap_or_default(),
        )?;
        timetable.add_capacity(leg_idx, containertype, leg.aantal, leg.prijs, leg.co2)?;
    }

    let adhoc = AdhocLegModel::new(
        normalise_distance_matrix(input.ad_hoc_leg_afstanden),
        input.ad_hoc_leg_properties.starttarief,
        input.ad_hoc_leg_properties.tarief,
        input.ad_hoc_leg_properties.snelheid,
        input.ad_hoc_leg_properties.co2,
        input.ad_hoc_leg_properties.voor_en_na_transport,
    );

    let config = create_config(input.parameters.as_ref())?;

    Ok(Instance::new(
        locations,
        container_types,
        timetable,
        orders,
        order_capacities,
        adhoc,
        config,
    ))
}

pub(super) fn intern_location(
    locations: &mut Locations,
    lookup: &mut HashMap<(String, LocationKind), LocationIdx>,
    label: &str,
) -> Result<LocationIdx, String> {
    let (name, kind) = parse_location_label(label)?;
    if let Some(idx) = lookup.get(&(name.clone(), kind)) {
        return Ok(*idx);
    }
    let idx = locations.add(name.clone(), kind);
    lookup.insert((name, kind), idx);
    Ok(idx)
}

fn intern_container_type(
    container_types: &mut ContainerTypes,
    name: &str,
    weight: Tonnes,
) -> ContainerTypeIdx {
    let name = name.trim().to_lowercase();
    match container_types.find(&name) {
        Some(idx) => idx,
        None => container_types.add(name, weight),
    }
}

pub(super) fn normalise_distance_matrix(
    matrix: HashMap<String, HashMap<String, Kilometers>>,
) -> HashMap<String, HashMap<String, Kilometers>> {
    matrix
        .into_iter()
        .map(|(from, row)| {
            (
                super::title_case_name(&from),
                row.into_iter()
                    .map(|(to, distance)| (super::title_case_name(&to), distance))
                    .collect(),
            )
        })
        .collect()
}

fn create_config(parameters: Option<&JsonParameters>) -> Result<Config, String> {
    let mut alns = AlnsConfig::default();
    if let Some(parameters) = parameters {
        if let Some(iterations) = parameters.iterations {
            alns.iterations = iterations;
        }
        if let Some(degree) = parameters.degree_of_destruction {
            alns.degree_of_destruction = degree;
        }
        if let Some(decay) = parameters.operator_decay {
            alns.operator_decay = decay;
        }
        if parameters.seed.is_some() {
            alns.seed = parameters.seed;
        }
        match parameters.acceptance.as_deref() {
            None | Some("hillClimbing") => {}
            Some("simulatedAnnealing") => {
                let cooling = match parameters.cooling.as_deref() {
                    None | Some("exponential") => Cooling::Exponential,
                    Some("linear") => Cooling::Linear,
                    Some(other) => return Err(format!("unknown cooling method: {}", other)),
                };
                alns.acceptance = Acceptance::SimulatedAnnealing {
                    start_temperature: parameters.start_temperature.unwrap_or(10_000.0),
                    end_temperature: parameters.end_temperature.unwrap_or(1.0),
                    step: parameters.temperature_step.unwrap_or(0.9),
                    cooling,
                };
            }
            Some(other) => return Err(format!("unknown acceptance criterion: {}", other)),
        }
    }
    Ok(Config { alns })
}
