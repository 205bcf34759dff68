//! This module provides a struct for representing reactions
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::metabolism::compound::Compound;
use crate::metabolism::located_compound::LocatedCompound;

/// Represents a reaction from the biochemistry knowledge base
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Human-readable reaction name
    #[builder(default = "None")]
    #[serde(default)]
    pub name: Option<String>,
    /// Equation as written in the knowledge base
    #[builder(default = "None")]
    #[serde(default)]
    pub equation: Option<String>,
    /// Direction the reaction can proceed in
    #[builder(default = "Direction::Reversible")]
    #[serde(default)]
    pub direction: Direction,
    /// Compounds taking part in the reaction, reactants have negative coefficients
    #[builder(default = "Vec::new()")]
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    /// Whether this is a biomass (growth objective) reaction
    #[builder(default = "false")]
    #[serde(default)]
    pub is_biomass: bool,
}

fn default_lower_bound() -> f64 {
    CONFIGURATION.read().unwrap().lower_bound
}

fn default_upper_bound() -> f64 {
    CONFIGURATION.read().unwrap().upper_bound
}

/// A located compound with its stoichiometric coefficient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub compound: LocatedCompound,
    pub coefficient: f64,
}

impl Reaction {
    /// Create a reaction with only an id
    pub fn new_id_only(id: impl Into<String>) -> Reaction {
        let config = CONFIGURATION.read().unwrap();
        Reaction {
            id: id.into(),
            name: None,
            equation: None,
            direction: Direction::Reversible,
            participants: Vec::new(),
            lower_bound: config.lower_bound,
            upper_bound: config.upper_bound,
            is_biomass: false,
        }
    }

    /// Add a compound to the reaction, negative coefficients for reactants
    pub fn add_participant(&mut self, compound: LocatedCompound, coefficient: f64) {
        self.participants.push(Participant {
            compound,
            coefficient,
        });
    }

    /// Iterate over every located compound in the reaction
    pub fn all_compounds(&self) -> impl Iterator<Item = &LocatedCompound> {
        self.participants.iter().map(|p| &p.compound)
    }

    /// The location free compounds of this reaction keyed by compound id
    ///
    /// A compound present in several compartments appears once.
    pub fn compounds_by_id(&self) -> IndexMap<String, Compound> {
        let mut compounds = IndexMap::new();
        for located in self.all_compounds() {
            compounds
                .entry(located.id.clone())
                .or_insert_with(|| located.compound().clone());
        }
        compounds
    }

    pub fn number_of_compounds(&self) -> usize {
        self.participants.len()
    }

    pub fn has_compound(&self, compound_id: &str) -> bool {
        self.all_compounds().any(|c| c.id == compound_id)
    }

    /// Reactants (negative coefficient) of the reaction
    pub fn reactants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.coefficient < 0.)
    }

    /// Products (positive coefficient) of the reaction
    pub fn products(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.coefficient > 0.)
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.equation {
            Some(eq) => write!(f, "{}: {}", self.id, eq),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Direction a reaction is able to proceed in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `<=>`
    #[default]
    Reversible,
    /// `=>`
    Forward,
    /// `<=`
    Reverse,
}

impl FromStr for Direction {
    type Err = ReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=>" | "=" => Ok(Direction::Reversible),
            "=>" | ">" => Ok(Direction::Forward),
            "<=" | "<" => Ok(Direction::Reverse),
            other => Err(ReactionError::UnknownDirection(other.to_string())),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Reversible => write!(f, "<=>"),
            Direction::Forward => write!(f, "=>"),
            Direction::Reverse => write!(f, "<="),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("Unknown reaction direction {0:?}")]
    UnknownDirection(String),
    #[error("Unable to build reaction")]
    UnableToBuild(#[from] ReactionBuilderError),
}
