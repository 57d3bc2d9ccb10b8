use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use time::{DateTime, Duration, Weekday};

use crate::adhoc::AdhocLegModel;
use crate::base_types::{
    ContainerTypeIdx, Cost, EmissionKg, ExternalId, Kilometers, LegIdx, LocationIdx, OrderIdx,
    SeatCount, Tonnes,
};
use crate::config::Config;
use crate::container_types::ContainerTypes;
use crate::instance::Instance;
use crate::locations::{LocationKind, Locations};
use crate::orders::Order;
use crate::timetable::Timetable;

use super::json::intern_location;

#[derive(Deserialize, Debug)]
struct LegRow {
    id: ExternalId,
    van: String,
    naar: String,
    dag: String,
    checkin: String,
    #[serde(default)]
    vertrek: Option<String>,
    duur: String,
}

#[derive(Deserialize, Debug)]
struct LegCapacityRow {
    leg: ExternalId,
    aantal: SeatCount,
    containertype: String,
    prijs: Cost,
    emissie: EmissionKg,
}

#[derive(Deserialize, Debug)]
struct OrderRow {
    id: ExternalId,
    van: String,
    naar: String,
    min_ophaaltijd: String,
    max_ophaaltijd: String,
    min_levertijd: String,
    max_levertijd: String,
    uiterste_levertijd: String,
    emissiefactor: Cost,
    boete_te_vroeg: Cost,
    boete_te_laat: Cost,
}

#[derive(Deserialize, Debug)]
struct OrderCapacityRow {
    order: ExternalId,
    aantal: SeatCount,
    containertype: String,
}

/// Loads an instance from a directory holding the six tables as csv files:
/// legs, legcapaciteiten, orders, ordercapaciteiten, afstanden, adhoc_legs.
pub fn load_instance_from_tables(directory: &Path) -> Result<Instance, String> {
    let leg_rows: Vec<LegRow> = read_table(directory, "legs")?;
    let leg_capacity_rows: Vec<LegCapacityRow> = read_table(directory, "legcapaciteiten")?;
    let order_rows: Vec<OrderRow> = read_table(directory, "orders")?;
    let order_capacity_rows: Vec<OrderCapacityRow> = read_table(directory, "ordercapaciteiten")?;
    let distances = read_distance_matrix(&directory.join("afstanden.csv"))?;
    let parameters = read_adhoc_parameters(&directory.join("adhoc_legs.csv"))?;

    let mut locations = Locations::new();
    let mut location_lookup: HashMap<(String, LocationKind), LocationIdx> = HashMap::new();
    let mut container_types = ContainerTypes::new();

    // orders first, they fix the planning period
    let mut orders = Vec::new();
    let mut order_lookup: HashMap<ExternalId, OrderIdx> = HashMap::new();
    for (i, row) in order_rows.iter().enumerate() {
        let idx = OrderIdx::from(i);
        if order_lookup.insert(row.id, idx).is_some() {
            return Err(format!("duplicate order id: {}", row.id));
        }
        orders.push(Order::new(
            idx,
            row.id,
            intern_location(&mut locations, &mut location_lookup, &row.van)?,
            intern_location(&mut locations, &mut location_lookup, &row.naar)?,
            DateTime::from_mdy(&row.min_ophaaltijd)?,
            DateTime::from_mdy(&row.max_ophaaltijd)?,
            DateTime::from_mdy(&row.min_levertijd)?,
            DateTime::from_mdy(&row.max_levertijd)?,
            DateTime::from_mdy(&row.uiterste_levertijd)?,
            row.emissiefactor,
            row.boete_te_vroeg,
            row.boete_te_laat,
        )?);
    }
    let period_start = super::period_start(&orders)?;

    let mut order_capacities = Vec::new();
    for row in &order_capacity_rows {
        let order = *order_lookup
            .get(&row.order)
            .ok_or_else(|| format!("ordercapaciteit references unknown order: {}", row.order))?;
        let containertype = intern_container_type(
            &mut container_types,
            &row.containertype,
            parameters.container_weight,
        );
        order_capacities.push((order, row.aantal, containertype));
    }

    let mut timetable = Timetable::new();
    let mut leg_lookup: HashMap<ExternalId, LegIdx> = HashMap::new();
    for row in &leg_rows {
        let day = Weekday::parse(&row.dag)?;
        let checkin = Duration::new(&row.checkin)?;
        let departure = match &row.vertrek {
            Some(vertrek) if !vertrek.trim().is_empty() => Duration::new(vertrek)?,
            _ => checkin,
        };
        let travel_time = Duration::new(&row.duur)?;
        let (checkin, departure, arrival) =
            super::synthesise_leg_times(period_start, day, checkin, departure, travel_time);
        let idx = timetable.add_leg(
            row.id,
            intern_location(&mut locations, &mut location_lookup, &row.van)?,
            intern_location(&mut locations, &mut location_lookup, &row.naar)?,
            checkin,
            departure,
            arrival,
            row.dag.trim().to_string(),
            String::new(),
        )?;
        if leg_lookup.insert(row.id, idx).is_some() {
            return Err(format!("duplicate leg id: {}", row.id));
        }
    }
    for row in &leg_capacity_rows {
        let leg = *leg_lookup
            .get(&row.leg)
            .ok_or_else(|| format!("legcapaciteit references unknown leg: {}", row.leg))?;
        let containertype = intern_container_type(
            &mut container_types,
            &row.containertype,
            parameters.container_weight,
        );
        timetable.add_capacity(leg, containertype, row.aantal, row.prijs, row.emissie)?;
    }

    let adhoc = AdhocLegModel::new(
        distances,
        parameters.start_tariff,
        parameters.tariff,
        parameters.speed,
        parameters.emission,
        parameters.default_haul,
    );

    Ok(Instance::new(
        locations,
        container_types,
        timetable,
        orders,
        order_capacities,
        adhoc,
        Config::default(),
    ))
}

struct AdhocParameters {
    speed: f64,
    start_tariff: Cost,
    tariff: Cost,
    emission: f64,
    default_haul: Kilometers,
    container_weight: Tonnes,
}

fn read_table<T: for<'de> Deserialize<'de>>(
    directory: &Path,
    name: &str,
) -> Result<Vec<T>, String> {
    let path = directory.join(format!("{}.csv", name));
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|error| format!("cannot read {}: {}", path.display(), error))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|error| format!("invalid row in {}: {}", path.display(), error)))
        .collect()
}

/// The afstanden table is a matrix whose column headers are the origins and
/// whose first column holds the destination names.
fn read_distance_matrix(path: &Path) -> Result<HashMap<String, HashMap<String, Kilometers>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|error| format!("cannot read {}: {}", path.display(), error))?;
    let origins: Vec<String> = reader
        .headers()
        .map_err(|error| format!("invalid header in {}: {}", path.display(), error))?
        .iter()
        .skip(1)
        .map(|name| name.to_string())
        .collect();
    let mut matrix: HashMap<String, HashMap<String, Kilometers>> = HashMap::new();
    for record in reader.records() {
        let record =
            record.map_err(|error| format!("invalid row in {}: {}", path.display(), error))?;
        let destination = record
            .get(0)
            .ok_or_else(|| format!("missing destination name in {}", path.display()))?
            .to_string();
        for (i, origin) in origins.iter().enumerate() {
            let distance: Kilometers = record
                .get(i + 1)
                .ok_or_else(|| format!("missing distance in {}", path.display()))?
                .parse()
                .map_err(|_| format!("malformed distance in {}", path.display()))?;
            matrix
                .entry(origin.clone())
                .or_default()
                .insert(destination.clone(), distance);
        }
    }
    Ok(super::json::normalise_distance_matrix(matrix))
}

/// The adhoc_legs table is a headerless parameter vector with rows of the
/// form "<name>,<value>".
fn read_adhoc_parameters(path: &Path) -> Result<AdhocParameters, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_path(path)
        .map_err(|error| format!("cannot read {}: {}", path.display(), error))?;
    let mut values: HashMap<String, f64> = HashMap::new();
    for record in reader.records() {
        let record =
            record.map_err(|error| format!("invalid row in {}: {}", path.display(), error))?;
        let name = record
            .get(0)
            .ok_or_else(|| format!("missing parameter name in {}", path.display()))?
            .to_lowercase();
        let value: f64 = record
            .get(1)
            .ok_or_else(|| format!("missing value for {} in {}", name, path.display()))?
            .parse()
            .map_err(|_| format!("malformed value for {} in {}", name, path.display()))?;
        values.insert(name, value);
    }
    let mut get = |name: &str| {
        values
            .remove(name)
            .ok_or_else(|| format!("missing parameter {} in {}", name, path.display()))
    };
    Ok(AdhocParameters {
        speed: get("snelheid")?,
        start_tariff: get("starttarief")?,
        tariff: get("tarief")?,
        emission: get("emissie")?,
        default_haul: get("voor_na_transport")?,
        container_weight: get("containergewicht")?,
    })
}

fn intern_container_type(
    container_types: &mut ContainerTypes,
    name: &str,
    weight: Tonnes,
) -> ContainerTypeIdx {
    let trimmed = name.trim();
    let name = if trimmed.parse::<u64>().is_ok() {
        format!("{}ft", trimmed)
    } else {
        trimmed.to_lowercase()
    };
    match container_types.find(&name) {
        Some(idx) => idx,
        None => container_types.add(name, weight),
    }
}
