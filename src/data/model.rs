use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Species – the primary category label
// ---------------------------------------------------------------------------

/// The three penguin species of the Palmer Archipelago.
///
/// Ordering follows declaration order, which is also the order used for
/// legends and checkbox groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Chinstrap, Species::Gentoo];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown species label '{0}'")]
pub struct ParseSpeciesError(pub String);

impl FromStr for Species {
    type Err = ParseSpeciesError;

    /// Accepts the bare name in any case, and also the long labels used by
    /// the raw LTER tables (e.g. "Adelie Penguin (Pygoscelis adeliae)").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let head = s.split_whitespace().next().unwrap_or("");
        Species::ALL
            .into_iter()
            .find(|sp| sp.as_str().eq_ignore_ascii_case(head))
            .ok_or_else(|| ParseSpeciesError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }

    /// Lenient parse: anything that is not recognisably male/female is
    /// treated as missing (the source tables use "NA" and ".").
    pub fn parse_lenient(s: &str) -> Option<Sex> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Some(Sex::Female),
            "male" | "m" => Some(Sex::Male),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PenguinRecord – one row of the table
// ---------------------------------------------------------------------------

/// One observed penguin. Missing measurements are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenguinRecord {
    pub species: Species,
    /// Island where the bird was observed.
    pub island: String,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl PenguinRecord {
    /// Minimal record with only species, island and body mass set.
    pub fn new(species: Species, island: impl Into<String>, body_mass_g: Option<f64>) -> Self {
        Self {
            species,
            island: island.into(),
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g,
            sex: None,
            year: None,
        }
    }

    pub fn with_bill(mut self, length_mm: f64, depth_mm: f64) -> Self {
        self.bill_length_mm = Some(length_mm);
        self.bill_depth_mm = Some(depth_mm);
        self
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full dataset with pre-computed category indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PenguinDataset {
    /// All records, in source order.
    pub records: Vec<PenguinRecord>,
    /// Species that occur at least once.
    pub species_present: BTreeSet<Species>,
    /// Sorted unique island names.
    pub islands: BTreeSet<String>,
}

impl PenguinDataset {
    /// Build category indices from the loaded records.
    pub fn from_records(records: Vec<PenguinRecord>) -> Self {
        let species_present = records.iter().map(|r| r.species).collect();
        let islands = records.iter().map(|r| r.island.clone()).collect();
        PenguinDataset {
            records,
            species_present,
            islands,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per species.
    pub fn species_count(&self, species: Species) -> usize {
        self.records.iter().filter(|r| r.species == species).count()
    }
}
