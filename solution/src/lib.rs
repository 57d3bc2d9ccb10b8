pub mod json_serialisation;
mod planning;
#[cfg(test)]
mod test_utilities;
mod traject;

pub use planning::{AdhocCapacity, EmissionBreakdown, PenaltyBreakdown, Planning, RouteSummary};
pub use traject::{CapacityRef, LegChoice, Traject};
