use model::adhoc::AdhocLeg;
use model::base_types::{AdhocIdx, LegCapacityIdx};

/// Reference to a capacity a traject can reserve: either a scheduled
/// capacity of the timetable or an ad-hoc capacity of the planning's pool.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CapacityRef {
    Scheduled(LegCapacityIdx),
    Adhoc(AdhocIdx),
}

/// A leg picked by a traject builder. Synthesized ad-hoc legs are carried by
/// value until the planning adds them to its pool.
#[derive(Clone, Debug)]
pub enum LegChoice {
    Scheduled(LegCapacityIdx),
    Adhoc(AdhocLeg),
}

/// The ordered chain of capacity reservations of one container. Two trajects
/// compare and hash equal iff they reference the same capacities in the same
/// order.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Traject {
    capacities: Vec<CapacityRef>,
}

impl Traject {
    pub(crate) fn new(capacities: Vec<CapacityRef>) -> Traject {
        Traject { capacities }
    }

    pub(crate) fn empty() -> Traject {
        Traject {
            capacities: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CapacityRef> + '_ {
        self.capacities.iter().copied()
    }

    pub fn first(&self) -> Option<CapacityRef> {
        self.capacities.first().copied()
    }

    pub fn last(&self) -> Option<CapacityRef> {
        self.capacities.last().copied()
    }

    pub fn contains(&self, capacity: CapacityRef) -> bool {
        self.capacities.contains(&capacity)
    }

    /// A copy with every occurrence of old replaced by new.
    pub(crate) fn replace(&self, old: CapacityRef, new: CapacityRef) -> Traject {
        Traject {
            capacities: self
                .capacities
                .iter()
                .map(|&capacity| if capacity == old { new } else { capacity })
                .collect(),
        }
    }
}
