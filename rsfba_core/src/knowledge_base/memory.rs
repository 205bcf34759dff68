//! An in memory knowledge base, implementing the loader, resolver and biomass traits from
//! plain tables. It can be read from and written to a JSON document.
use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::knowledge_base::{
    BiochemistryTables, BiomassProvider, KnowledgeBaseError, KnowledgeBaseLoader, RoleResolver,
};
use crate::metabolism::compound::Compound;
use crate::metabolism::enzyme::{Complex, Enzyme};
use crate::metabolism::reaction::Reaction;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryKnowledgeBase {
    #[serde(default)]
    pub compounds: Vec<Compound>,
    /// Map of organism type to map of reaction ids to reactions
    #[serde(default)]
    pub reactions: IndexMap<String, IndexMap<String, Reaction>>,
    #[serde(default)]
    pub enzymes: IndexMap<String, Enzyme>,
    #[serde(default)]
    pub complexes: IndexMap<String, Complex>,
    /// Map of functional roles to complex ids
    #[serde(default)]
    pub roles: IndexMap<String, IndexSet<String>>,
    /// Map of functional roles to reaction ids
    #[serde(default)]
    pub role_reactions: IndexMap<String, IndexSet<String>>,
    /// Map of organism type to biomass reaction
    #[serde(default)]
    pub biomass: IndexMap<String, Reaction>,
}

impl InMemoryKnowledgeBase {
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeBaseError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), KnowledgeBaseError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.compounds.push(compound);
        self
    }

    pub fn with_reaction(mut self, organism_type: &str, reaction: Reaction) -> Self {
        self.reactions
            .entry(organism_type.to_string())
            .or_default()
            .insert(reaction.id.clone(), reaction);
        self
    }

    pub fn with_role<I, S>(mut self, role: &str, reaction_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_reactions
            .entry(role.to_string())
            .or_default()
            .extend(reaction_ids.into_iter().map(Into::into));
        self
    }

    pub fn with_biomass(mut self, organism_type: &str, mut reaction: Reaction) -> Self {
        reaction.is_biomass = true;
        self.biomass.insert(organism_type.to_string(), reaction);
        self
    }
}

impl KnowledgeBaseLoader for InMemoryKnowledgeBase {
    fn compounds_reactions_enzymes(
        &self,
        organism_type: &str,
    ) -> Result<BiochemistryTables, KnowledgeBaseError> {
        let reactions = self
            .reactions
            .get(organism_type)
            .ok_or_else(|| KnowledgeBaseError::OrganismTypeNotFound(organism_type.to_string()))?;
        Ok(BiochemistryTables {
            compounds: self.compounds.clone(),
            reactions: reactions.clone(),
            enzymes: self.enzymes.clone(),
            complexes: self.complexes.clone(),
            roles: self.roles.clone(),
        })
    }
}

impl RoleResolver for InMemoryKnowledgeBase {
    fn roles_to_reactions(&self, roles: &IndexSet<String>) -> IndexMap<String, IndexSet<String>> {
        roles
            .iter()
            .filter_map(|role| {
                self.role_reactions
                    .get(role)
                    .map(|reactions| (role.clone(), reactions.clone()))
            })
            .collect()
    }
}

impl BiomassProvider for InMemoryKnowledgeBase {
    fn biomass_equation(&self, organism_type: &str) -> Result<Reaction, KnowledgeBaseError> {
        self.biomass
            .get(organism_type)
            .cloned()
            .ok_or_else(|| KnowledgeBaseError::BiomassNotFound(organism_type.to_string()))
    }
}
