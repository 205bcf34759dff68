//! Module providing the knowledge base index, which owns the biochemistry tables for one
//! organism type and resolves compounds by id or by name.
//!
//! The by-id and by-name lookups are backed by indices that are rebuilt lazily. Every mutation
//! of the compound table bumps a version counter, and an index is rebuilt on the next lookup
//! when the version it was built from is out of date.
pub mod memory;

use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::metabolism::compound::Compound;
use crate::metabolism::enzyme::{Complex, Enzyme};
use crate::metabolism::reaction::Reaction;

/// Tables produced by a [`KnowledgeBaseLoader`] for one organism type
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BiochemistryTables {
    pub compounds: Vec<Compound>,
    /// Map of reaction ids to reactions
    pub reactions: IndexMap<String, Reaction>,
    /// Map of enzyme ids to enzymes
    pub enzymes: IndexMap<String, Enzyme>,
    /// Map of complex ids to complexes
    #[serde(default)]
    pub complexes: IndexMap<String, Complex>,
    /// Map of functional roles to the ids of the complexes they are part of
    #[serde(default)]
    pub roles: IndexMap<String, IndexSet<String>>,
}

impl BiochemistryTables {
    /// Record on each compound the ids of the reactions it takes part in, and refresh its
    /// common flag
    pub fn link_compound_reactions(&mut self) {
        let mut membership: HashMap<&str, Vec<&str>> = HashMap::new();
        for reaction in self.reactions.values() {
            for located in reaction.all_compounds() {
                membership
                    .entry(located.id.as_str())
                    .or_default()
                    .push(reaction.id.as_str());
            }
        }
        for compound in self.compounds.iter_mut() {
            if let Some(reaction_ids) = membership.get(compound.id.as_str()) {
                compound.add_reactions(reaction_ids.iter().copied());
            }
            compound.is_common();
        }
    }
}

/// Source of the compound, reaction and enzyme tables
pub trait KnowledgeBaseLoader {
    fn compounds_reactions_enzymes(
        &self,
        organism_type: &str,
    ) -> Result<BiochemistryTables, KnowledgeBaseError>;
}

/// Maps functional roles to the ids of the reactions they catalyse
pub trait RoleResolver {
    /// Roles with no known reactions may be left out of the returned map
    fn roles_to_reactions(&self, roles: &IndexSet<String>) -> IndexMap<String, IndexSet<String>>;
}

/// Provides the biomass (growth objective) reaction of an organism type
pub trait BiomassProvider {
    fn biomass_equation(&self, organism_type: &str) -> Result<Reaction, KnowledgeBaseError>;
}

/// Number of times each compound index has been rebuilt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub by_id_rebuilds: usize,
    pub by_name_rebuilds: usize,
}

#[derive(Debug, Default)]
struct CompoundIndex {
    /// Key to position in the compound table
    positions: HashMap<String, usize>,
    indexed_version: Option<u64>,
    rebuilds: usize,
}

impl CompoundIndex {
    fn refresh(&mut self, compounds: &[Compound], version: u64, key: fn(&Compound) -> &str) {
        if self.indexed_version == Some(version) {
            return;
        }
        self.positions.clear();
        // Later compounds win when keys collide
        for (position, compound) in compounds.iter().enumerate() {
            self.positions.insert(key(compound).to_string(), position);
        }
        self.indexed_version = Some(version);
        self.rebuilds += 1;
        debug!(
            compounds = compounds.len(),
            version, "Rebuilt compound index"
        );
    }

    fn invalidate(&mut self) {
        self.positions.clear();
        self.indexed_version = None;
    }
}

/// The biochemistry knowledge base for one organism type
///
/// Not thread safe, the lazily rebuilt indices use interior mutability.
#[derive(Debug, Default)]
pub struct KnowledgeBaseIndex {
    compounds: Vec<Compound>,
    /// Incremented on every change to `compounds`
    version: u64,
    /// Map of organism type to map of reaction ids to reactions
    reactions: IndexMap<String, IndexMap<String, Reaction>>,
    enzymes: IndexMap<String, Enzyme>,
    complexes: IndexMap<String, Complex>,
    roles: IndexMap<String, IndexSet<String>>,
    organism_type: Option<String>,
    by_id: RefCell<CompoundIndex>,
    by_name: RefCell<CompoundIndex>,
}

impl KnowledgeBaseIndex {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Load the tables for `organism_type` from `loader`
    pub fn load(
        loader: &dyn KnowledgeBaseLoader,
        organism_type: &str,
    ) -> Result<Self, KnowledgeBaseError> {
        let tables = loader.compounds_reactions_enzymes(organism_type)?;
        Ok(Self::from_tables(organism_type, tables))
    }

    pub fn from_tables(organism_type: &str, tables: BiochemistryTables) -> Self {
        let mut kb = Self::new_empty();
        kb.install(organism_type, tables);
        kb
    }

    /// Clear every table and load the tables for a different organism type
    pub fn reload(
        &mut self,
        loader: &dyn KnowledgeBaseLoader,
        organism_type: &str,
    ) -> Result<(), KnowledgeBaseError> {
        let tables = loader.compounds_reactions_enzymes(organism_type)?;
        self.reset();
        self.install(organism_type, tables);
        Ok(())
    }

    fn install(&mut self, organism_type: &str, mut tables: BiochemistryTables) {
        tables.link_compound_reactions();
        debug!(
            organism_type,
            compounds = tables.compounds.len(),
            reactions = tables.reactions.len(),
            enzymes = tables.enzymes.len(),
            "Installing knowledge base tables"
        );
        self.set_compounds(tables.compounds);
        self.reactions
            .insert(organism_type.to_string(), tables.reactions);
        self.enzymes = tables.enzymes;
        self.complexes = tables.complexes;
        self.roles = tables.roles;
        self.organism_type = Some(organism_type.to_string());
    }

    /// Clear all tables, used when switching organism type
    pub fn reset(&mut self) {
        self.compounds.clear();
        self.version += 1;
        self.reactions.clear();
        self.enzymes.clear();
        self.complexes.clear();
        self.roles.clear();
        self.organism_type = None;
        self.by_id.borrow_mut().invalidate();
        self.by_name.borrow_mut().invalidate();
    }

    pub fn organism_type(&self) -> Option<&str> {
        self.organism_type.as_deref()
    }

    // region Compound table
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Replace the whole compound table
    pub fn set_compounds(&mut self, compounds: Vec<Compound>) {
        self.compounds = compounds;
        self.version += 1;
    }

    /// Insert a compound, replacing (and returning) any compound with the same id
    pub fn insert_compound(&mut self, compound: Compound) -> Option<Compound> {
        self.version += 1;
        match self.compounds.iter().position(|c| c.id == compound.id) {
            Some(position) => Some(std::mem::replace(&mut self.compounds[position], compound)),
            None => {
                self.compounds.push(compound);
                None
            }
        }
    }

    /// Remove the compound with this id
    pub fn remove_compound(&mut self, id: &str) -> Option<Compound> {
        let position = self.compounds.iter().position(|c| c.id == id)?;
        self.version += 1;
        Some(self.compounds.remove(position))
    }

    /// Modify the compound with this id in place, returns false if there is no such compound
    pub fn update_compound<F: FnOnce(&mut Compound)>(&mut self, id: &str, f: F) -> bool {
        match self.compounds.iter_mut().find(|c| c.id == id) {
            Some(compound) => {
                f(compound);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Retrieve a compound by its id
    ///
    /// # Examples
    /// ```rust
    /// use rsfba_core::knowledge_base::KnowledgeBaseIndex;
    /// use rsfba_core::metabolism::compound::Compound;
    /// let mut kb = KnowledgeBaseIndex::new_empty();
    /// kb.insert_compound(Compound::new("cpd00001", "H2O"));
    /// assert_eq!(kb.lookup_by_id("cpd00001").unwrap().name, "H2O");
    /// assert!(kb.lookup_by_id("cpd99999").is_none());
    /// ```
    pub fn lookup_by_id(&self, id: &str) -> Option<&Compound> {
        let mut index = self.by_id.borrow_mut();
        index.refresh(&self.compounds, self.version, |c| c.id.as_str());
        let position = index.positions.get(id).copied();
        position.map(|p| &self.compounds[p])
    }

    /// Retrieve a compound by its name
    ///
    /// When several compounds share a name the last one in the table is returned.
    pub fn lookup_by_name(&self, name: &str) -> Option<&Compound> {
        let mut index = self.by_name.borrow_mut();
        index.refresh(&self.compounds, self.version, |c| c.name.as_str());
        let position = index.positions.get(name).copied();
        position.map(|p| &self.compounds[p])
    }

    pub fn index_stats(&self) -> IndexStats {
        IndexStats {
            by_id_rebuilds: self.by_id.borrow().rebuilds,
            by_name_rebuilds: self.by_name.borrow().rebuilds,
        }
    }
    // endregion Compound table

    // region Reaction, enzyme and role tables
    /// Reactions of the current organism type
    pub fn reactions(&self) -> Option<&IndexMap<String, Reaction>> {
        self.reactions_for(self.organism_type.as_deref()?)
    }

    pub fn reactions_for(&self, organism_type: &str) -> Option<&IndexMap<String, Reaction>> {
        self.reactions.get(organism_type)
    }

    /// Retrieve a reaction of the current organism type by id
    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions()?.get(id)
    }

    pub fn has_reaction(&self, id: &str) -> bool {
        self.reaction(id).is_some()
    }

    /// Add reactions for an organism type, replacing reactions with the same id
    pub fn insert_reactions<I: IntoIterator<Item = Reaction>>(
        &mut self,
        organism_type: &str,
        reactions: I,
    ) {
        let table = self
            .reactions
            .entry(organism_type.to_string())
            .or_default();
        for reaction in reactions {
            table.insert(reaction.id.clone(), reaction);
        }
    }

    pub fn enzymes(&self) -> &IndexMap<String, Enzyme> {
        &self.enzymes
    }

    pub fn complexes(&self) -> &IndexMap<String, Complex> {
        &self.complexes
    }

    pub fn roles(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.roles
    }
    // endregion Reaction, enzyme and role tables
}

impl RoleResolver for KnowledgeBaseIndex {
    /// Resolve roles through the role → complex → reaction tables, and through enzymes that
    /// carry the role directly
    fn roles_to_reactions(&self, roles: &IndexSet<String>) -> IndexMap<String, IndexSet<String>> {
        let mut resolved: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for role in roles {
            let mut reactions = IndexSet::new();
            if let Some(complex_ids) = self.roles.get(role) {
                for complex in complex_ids.iter().filter_map(|id| self.complexes.get(id)) {
                    reactions.extend(complex.reactions.iter().cloned());
                }
            }
            for enzyme in self.enzymes.values().filter(|e| e.has_role(role)) {
                reactions.extend(enzyme.reactions.iter().cloned());
            }
            if !reactions.is_empty() {
                resolved.insert(role.clone(), reactions);
            }
        }
        resolved
    }
}

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("No biochemistry tables for organism type {0}")]
    OrganismTypeNotFound(String),
    #[error("No biomass equation for organism type {0}")]
    BiomassNotFound(String),
    #[error("Unable to read knowledge base file")]
    UnableToRead(#[from] std::io::Error),
    #[error("Unable to parse knowledge base json")]
    UnableToParse(#[from] serde_json::Error),
}
