//! This module provides the Compound struct, a chemical species independent of location
//!
//! A compound by itself does not have a location, see
//! [`LocatedCompound`](crate::metabolism::located_compound::LocatedCompound) for that. Keeping the
//! two apart lets the knowledge base hold one compound per species while reactions refer to
//! the located variants required for flux balance analysis.
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::configuration::CONFIGURATION;

/// Shared behaviour of compounds with and without a location
pub trait ChemicalEntity {
    /// Identifier of the entity
    fn id(&self) -> &str;
    /// Human-readable name of the entity
    fn name(&self) -> &str;
    /// Calculate the molecular weight of the entity
    ///
    /// # Returns
    /// - `Ok(Some(weight))` when a weight could be calculated
    /// - `Ok(None)` when the implementation intentionally does nothing
    /// - `Err(CompoundError::NotImplemented)` when no calculation exists
    fn calculate_molecular_weight(&self) -> Result<Option<f64>, CompoundError>;
}

/// Represents a chemical compound
///
/// # Equality
/// Two compounds are equal, and hash equally, when their identifiers match. Matching on name
/// as well is available through [`Compound::might_be_same`], which is not an equivalence
/// relation and so is kept out of `PartialEq`.
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct Compound {
    /// Used to identify the compound (must be unique)
    pub id: String,
    /// Human readable name of the compound
    pub name: String,
    /// Short name of the compound
    #[builder(default = "None")]
    #[serde(default)]
    pub abbreviation: Option<String>,
    /// Chemical formula of the compound
    #[builder(default = "None")]
    #[serde(default)]
    pub formula: Option<String>,
    /// Molecular weight
    #[builder(default = "0.0")]
    #[serde(default)]
    pub mw: f64,
    /// Net charge
    #[builder(default = "0")]
    #[serde(default)]
    pub charge: i32,
    /// Acid dissociation constant
    #[builder(default = "0.0")]
    #[serde(default)]
    pub pka: f64,
    /// Base dissociation constant
    #[builder(default = "0.0")]
    #[serde(default)]
    pub pkb: f64,
    #[builder(default = "false")]
    #[serde(default)]
    pub is_cofactor: bool,
    #[builder(default = "false")]
    #[serde(default)]
    pub is_obsolete: bool,
    #[builder(default = "false")]
    #[serde(default)]
    pub abstract_compound: bool,
    #[builder(default = "false")]
    #[serde(default)]
    pub is_core: bool,
    /// Other ModelSEED identifiers for this compound
    #[builder(default = "HashSet::new()")]
    #[serde(default)]
    pub alternate_seed_ids: HashSet<String>,
    /// Identifier of a linked compound, if any
    #[builder(default = "None")]
    #[serde(default)]
    pub linked_compound: Option<String>,
    #[builder(default = "None")]
    #[serde(default)]
    pub inchikey: Option<String>,
    /// Ids of the reactions this compound takes part in
    #[builder(default = "HashSet::new()")]
    #[serde(default)]
    pub(crate) reactions: HashSet<String>,
    /// Cached result of the last [`Compound::is_common`] call
    #[builder(default = "false")]
    #[serde(default)]
    pub common: bool,
    /// Fields outside the base schema, see [`Compound::add_attribute`]
    #[builder(default = "IndexMap::new()")]
    #[serde(default)]
    pub(crate) extra_attributes: IndexMap<String, Value>,
}

impl Compound {
    /// Create a new compound with only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Compound {
        Compound {
            id: id.into(),
            name: name.into(),
            abbreviation: None,
            formula: None,
            mw: 0.0,
            charge: 0,
            pka: 0.0,
            pkb: 0.0,
            is_cofactor: false,
            is_obsolete: false,
            abstract_compound: false,
            is_core: false,
            alternate_seed_ids: HashSet::new(),
            linked_compound: None,
            inchikey: None,
            reactions: HashSet::new(),
            common: false,
            extra_attributes: IndexMap::new(),
        }
    }

    /// Add reactions that this compound is involved in
    ///
    /// Only collections of reaction ids are accepted, adding an id already present is a no-op.
    ///
    /// # Examples
    /// ```rust
    /// use std::collections::HashSet;
    /// use rsfba_core::metabolism::compound::Compound;
    /// let mut water = Compound::new("cpd00001", "H2O");
    /// water.add_reactions(HashSet::from(["rxn00001".to_string()]));
    /// assert!(water.has_reaction("rxn00001"));
    /// ```
    ///
    /// A single reaction id has to be wrapped in a collection:
    /// ```compile_fail
    /// use rsfba_core::metabolism::compound::Compound;
    /// let mut water = Compound::new("cpd00001", "H2O");
    /// water.add_reactions("rxn00001".to_string());
    /// ```
    pub fn add_reactions<I, S>(&mut self, reactions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reactions.extend(reactions.into_iter().map(Into::into));
    }

    /// Is this compound involved in the reaction with this id?
    pub fn has_reaction(&self, reaction_id: &str) -> bool {
        self.reactions.contains(reaction_id)
    }

    /// How many reactions is this compound involved in?
    pub fn number_of_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Ids of all the reactions this compound is involved in
    pub fn all_reactions(&self) -> &HashSet<String> {
        &self.reactions
    }

    /// Is this a common compound, using the configured reaction limit?
    ///
    /// Recomputes and stores [`Compound::common`].
    pub fn is_common(&mut self) -> bool {
        let limit = CONFIGURATION.read().unwrap().common_reaction_limit;
        self.is_common_with_limit(limit)
    }

    /// Is this compound in more than `limit` reactions?
    ///
    /// Recomputes and stores [`Compound::common`], which is otherwise never kept current.
    pub fn is_common_with_limit(&mut self, limit: usize) -> bool {
        self.common = self.number_of_reactions() > limit;
        self.common
    }

    /// Whether two compounds could describe the same species: same id or same name
    ///
    /// # Note
    /// This is not transitive. A can match B by id and C by name without B matching C.
    pub fn might_be_same(&self, other: &Compound) -> bool {
        self.id == other.id || self.name == other.name
    }

    /// Store an attribute that is not part of the base schema, replacing any previous value
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra_attributes.insert(key.into(), value.into());
    }

    /// Retrieve an attribute stored with [`Compound::add_attribute`]
    pub fn get_attribute(&self, key: &str) -> Option<&Value> {
        self.extra_attributes.get(key)
    }

    /// All attributes stored with [`Compound::add_attribute`], in insertion order
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.extra_attributes
    }
}

impl ChemicalEntity for Compound {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn calculate_molecular_weight(&self) -> Result<Option<f64>, CompoundError> {
        Err(CompoundError::NotImplemented("calculate molecular weight"))
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Compound {}

impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state); // Must agree with PartialEq, so only the id
    }
}

impl Display for Compound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.name)
    }
}

#[derive(Debug, Error)]
pub enum CompoundError {
    #[error("{0} has not yet been implemented")]
    NotImplemented(&'static str),
    #[error("Unable to build compound")]
    UnableToBuild(#[from] CompoundBuilderError),
}
