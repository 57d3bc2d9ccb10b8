use std::fmt;

use crate::base_types::{ContainerTypeIdx, Tonnes};

pub struct ContainerType {
    idx: ContainerTypeIdx,
    name: String,
    weight: Tonnes, // tare weight of one container
}

impl ContainerType {
    pub fn idx(&self) -> ContainerTypeIdx {
        self.idx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> Tonnes {
        self.weight
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub struct ContainerTypes {
    types: Vec<ContainerType>,
}

impl ContainerTypes {
    pub fn new() -> ContainerTypes {
        ContainerTypes { types: Vec::new() }
    }

    pub fn add(&mut self, name: String, weight: Tonnes) -> ContainerTypeIdx {
        let idx = ContainerTypeIdx::from(self.types.len());
        self.types.push(ContainerType { idx, name, weight });
        idx
    }

    pub fn get(&self, idx: ContainerTypeIdx) -> &ContainerType {
        &self.types[idx.idx()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerType> {
        self.types.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = ContainerTypeIdx> + '_ {
        self.types.iter().map(|containertype| containertype.idx)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<ContainerTypeIdx> {
        self.types
            .iter()
            .find(|containertype| containertype.name == name)
            .map(|containertype| containertype.idx)
    }
}

impl Default for ContainerTypes {
    fn default() -> Self {
        ContainerTypes::new()
    }
}
