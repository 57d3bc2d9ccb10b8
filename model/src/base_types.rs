use derive_more::{Display, From};

pub type Cost = f64;
pub type EmissionKg = f64;
pub type Kilometers = f64;
pub type Tonnes = f64;
pub type SeatCount = u32;

/// Identifier carried over from the input data. Synthesized ad-hoc legs are
/// assigned strictly negative ids so they can never collide with input ids.
pub type ExternalId = i64;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct LocationIdx(usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct ContainerTypeIdx(usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct LegIdx(usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct LegCapacityIdx(usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct OrderIdx(usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct ContainerIdx(usize);

/// Index into the pool of ad-hoc capacities of a planning.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From)]
pub struct AdhocIdx(usize);

impl LocationIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl ContainerTypeIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl LegIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl LegCapacityIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl OrderIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl ContainerIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl AdhocIdx {
    pub fn idx(&self) -> usize {
        self.0
    }
}
