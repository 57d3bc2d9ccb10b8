pub mod json;
pub mod tabular;

#[cfg(test)]
mod tests;

pub use json::load_instance_from_json;
pub use tabular::load_instance_from_tables;

use time::{DateTime, Duration, Weekday};

use crate::locations::title_case;
use crate::orders::Order;

/// Title-cases every word of a location name ("de haven" -> "De Haven").
fn title_case_name(name: &str) -> String {
    name.split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Start of the planning period: the earliest pickup over all orders. Legs
/// are pinned to concrete dates relative to this point.
fn period_start(orders: &[Order]) -> Result<DateTime, String> {
    orders
        .iter()
        .map(|order| order.earliest_pickup())
        .min()
        .ok_or_else(|| String::from("input contains no orders"))
}

/// Pins a timetable leg to concrete dates: check-in on the first date at or
/// after the period start whose weekday matches the leg's day label. A
/// departure time-of-day before the check-in time-of-day rolls over to the
/// next day.
fn synthesise_leg_times(
    period_start: DateTime,
    day: Weekday,
    checkin: Duration,
    departure: Duration,
    travel_time: Duration,
) -> (DateTime, DateTime, DateTime) {
    let checkin_day = period_start
        .start_of_day()
        .add_days(period_start.weekday().days_until(day));
    let checkin_time = checkin_day + checkin;
    let departure_time = if departure >= checkin {
        checkin_day + departure
    } else {
        checkin_day.add_days(1) + departure
    };
    (checkin_time, departure_time, departure_time + travel_time)
}
