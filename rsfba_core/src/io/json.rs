//! Module providing the versioned document form of a saved Model, and JSON IO for it
//!
//! The document holds the same fields as the flat file format (see
//! [`flat_file`](crate::io::flat_file)), and both formats are turned back into a Model by
//! [`ModelDocument::into_model`].
use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::io::{created_on_now, PersistenceError};
use crate::knowledge_base::{BiomassProvider, KnowledgeBaseIndex, KnowledgeBaseLoader};
use crate::model::model::Model;

/// Current version of the document layout
pub const FORMAT_VERSION: u32 = 1;

// region Model document
/// Represents a saved model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub format_version: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub organism_type: Option<String>,
    /// Only stored for reference
    pub created_on: Option<String>,
    /// Map of functional roles to reaction ids
    #[serde(default)]
    pub roles: IndexMap<String, IndexSet<String>>,
    #[serde(default)]
    pub reactions: IndexSet<String>,
    /// Exported for reference, compounds are recomputed from the reactions on load
    #[serde(default)]
    pub compounds: IndexSet<String>,
    #[serde(default)]
    pub gapfilled_media: IndexSet<String>,
    #[serde(default)]
    pub gapfilled_reactions: IndexSet<String>,
}

impl ModelDocument {
    /// Capture the persisted fields of a model, stamped with the current time
    pub fn from_model(model: &Model) -> Self {
        ModelDocument {
            format_version: FORMAT_VERSION,
            id: Some(model.id.clone()),
            name: Some(model.name.clone()),
            organism_type: Some(model.organism_type.clone()),
            created_on: Some(created_on_now()),
            roles: model.roles.clone(),
            reactions: model.reactions.keys().cloned().collect(),
            compounds: model.compounds.keys().cloned().collect(),
            gapfilled_media: model.gapfilled_media.clone(),
            gapfilled_reactions: model.gf_reactions.clone(),
        }
    }

    /// Rebuild a live model, resolving reactions against a freshly loaded knowledge base
    ///
    /// # Returns
    /// - `Ok(None)` if the id, name or organism type is missing
    /// - `Ok(Some(model))` otherwise. Reaction ids the knowledge base does not know are
    ///   skipped with a warning
    pub fn into_model(
        self,
        loader: &dyn KnowledgeBaseLoader,
        biomass: &dyn BiomassProvider,
    ) -> Result<Option<Model>, PersistenceError> {
        let present = |field: &Option<String>| field.clone().filter(|v| !v.is_empty());
        let (Some(id), Some(name), Some(organism_type)) = (
            present(&self.id),
            present(&self.name),
            present(&self.organism_type),
        ) else {
            error!(
                id = ?self.id,
                name = ?self.name,
                organism_type = ?self.organism_type,
                "Could not extract model info"
            );
            return Ok(None);
        };

        let knowledge_base = KnowledgeBaseIndex::load(loader, &organism_type)?;
        let mut reactions = Vec::with_capacity(self.reactions.len());
        for reaction_id in &self.reactions {
            match knowledge_base.reaction(reaction_id) {
                Some(reaction) => reactions.push(reaction.clone()),
                None => warn!(
                    "Reaction {} was not found in the database. Skipping.",
                    reaction_id
                ),
            }
        }

        let mut model = Model::new(id, name, &organism_type);
        model.roles = self.roles;
        model.gapfilled_media = self.gapfilled_media;
        model.gf_reactions = self.gapfilled_reactions;
        model.add_reactions(reactions);
        model.set_biomass_reaction(biomass.biomass_equation(&organism_type)?)?;
        Ok(Some(model))
    }
}
// endregion Model document

impl Model {
    /// Write the model as a versioned JSON document
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let document = ModelDocument::from_model(self);
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }

    /// Read a model written by [`Model::write_json`]
    ///
    /// Returns `Ok(None)` if the document lacks the id, name or organism type.
    pub fn read_json<P: AsRef<Path>>(
        path: P,
        loader: &dyn KnowledgeBaseLoader,
        biomass: &dyn BiomassProvider,
    ) -> Result<Option<Model>, PersistenceError> {
        let data = fs::read_to_string(path)?;
        let document: ModelDocument = serde_json::from_str(&data)?;
        if document.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(
                document.format_version,
            ));
        }
        document.into_model(loader, biomass)
    }
}
