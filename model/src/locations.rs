use std::fmt;

use crate::base_types::LocationIdx;

/// Role of a location in the transport network.
///
/// Only terminals are legal intermediate stops of a traject; shippers and
/// empty depots can only appear as origin or destination.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LocationKind {
    Terminal,
    Shipper,
    EmptyDepot,
}

impl LocationKind {
    /// Accepts the full role names of the input data as well as their
    /// single-letter codes, in any casing.
    pub fn parse_role(role: &str) -> Result<LocationKind, String> {
        match role.trim().to_lowercase().as_str() {
            "terminal" | "t" => Ok(LocationKind::Terminal),
            "verlader" | "v" => Ok(LocationKind::Shipper),
            "empty depot" | "e" => Ok(LocationKind::EmptyDepot),
            _ => Err(format!("unknown location role: {}", role)),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocationKind::Terminal => write!(f, "Terminal"),
            LocationKind::Shipper => write!(f, "Verlader"),
            LocationKind::EmptyDepot => write!(f, "Empty Depot"),
        }
    }
}

pub struct Location {
    idx: LocationIdx,
    name: String,
    kind: LocationKind,
}

impl Location {
    pub fn idx(&self) -> LocationIdx {
        self.idx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == LocationKind::Terminal
    }

    pub fn is_shipper(&self) -> bool {
        self.kind == LocationKind::Shipper
    }

    pub fn is_empty_depot(&self) -> bool {
        self.kind == LocationKind::EmptyDepot
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind)
    }
}

pub struct Locations {
    locations: Vec<Location>,
    terminals: Vec<LocationIdx>,
    shippers: Vec<LocationIdx>,
    empty_depots: Vec<LocationIdx>,
}

impl Locations {
    pub fn new() -> Locations {
        Locations {
            locations: Vec::new(),
            terminals: Vec::new(),
            shippers: Vec::new(),
            empty_depots: Vec::new(),
        }
    }

    pub fn add(&mut self, name: String, kind: LocationKind) -> LocationIdx {
        let idx = LocationIdx::from(self.locations.len());
        match kind {
            LocationKind::Terminal => self.terminals.push(idx),
            LocationKind::Shipper => self.shippers.push(idx),
            LocationKind::EmptyDepot => self.empty_depots.push(idx),
        }
        self.locations.push(Location { idx, name, kind });
        idx
    }

    pub fn get(&self, idx: LocationIdx) -> &Location {
        &self.locations[idx.idx()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = LocationIdx> + '_ {
        self.locations.iter().map(|location| location.idx)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn terminals(&self) -> &[LocationIdx] {
        &self.terminals
    }

    pub fn shippers(&self) -> &[LocationIdx] {
        &self.shippers
    }

    pub fn empty_depots(&self) -> &[LocationIdx] {
        &self.empty_depots
    }
}

impl Default for Locations {
    fn default() -> Self {
        Locations::new()
    }
}

/// Splits an input label of the form "<Name> <Role>" into a title-cased name
/// and a role. The role may be a full word ("Terminal", "Verlader",
/// "Empty Depot") or a single-letter code ("T", "V", "E").
pub fn parse_location_label(label: &str) -> Result<(String, LocationKind), String> {
    let words: Vec<String> = label.split_whitespace().map(title_case).collect();
    if words.len() < 2 {
        return Err(format!("malformed location label: {}", label));
    }
    let (name_words, role) = if words.len() >= 3 && words[words.len() - 2] == "Empty" {
        (
            &words[..words.len() - 2],
            format!("{} {}", words[words.len() - 2], words[words.len() - 1]),
        )
    } else {
        (&words[..words.len() - 1], words[words.len() - 1].clone())
    };
    let kind = LocationKind::parse_role(&role)?;
    Ok((name_words.join(" "), kind))
}

/// First letter upper case, rest lower case.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}
