//! This module provides the Model struct for representing an assembled metabolic model
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::metabolism::compound::Compound;
use crate::metabolism::reaction::Reaction;

/// Represents a Genome Scale Metabolic Model built from functional roles
#[derive(Clone, Debug)]
pub struct Model {
    /// Id associated with the Model
    pub id: String,
    /// Name of the model, also used as the prefix of saved files
    pub name: String,
    /// Organism type selecting the reaction tables and biomass equation
    pub organism_type: String,
    /// Map of functional roles to the ids of the reactions they contribute
    pub roles: IndexMap<String, IndexSet<String>>,
    /// Map of reaction ids to Reaction objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of compound ids to Compound objects, derived from the reactions
    pub compounds: IndexMap<String, Compound>,
    /// Growth objective of the model
    pub biomass_reaction: Option<Reaction>,
    /// Media the model was gap-filled on
    pub gapfilled_media: IndexSet<String>,
    /// Ids of reactions added by gap-filling
    pub gf_reactions: IndexSet<String>,
}

impl Model {
    /// Create a new model without any reactions or roles
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organism_type: impl Into<String>,
    ) -> Self {
        Model {
            id: id.into(),
            name: name.into(),
            organism_type: organism_type.into(),
            roles: IndexMap::new(),
            reactions: IndexMap::new(),
            compounds: IndexMap::new(),
            biomass_reaction: None,
            gapfilled_media: IndexSet::new(),
            gf_reactions: IndexSet::new(),
        }
    }

    /// Add reactions to the model, along with the compounds they involve
    ///
    /// # Examples
    /// ```rust
    /// use rsfba_core::model::model::Model;
    /// use rsfba_core::metabolism::reaction::Reaction;
    /// let mut model = Model::new("m1", "my_model", "standard");
    /// model.add_reactions(vec![Reaction::new_id_only("rxn00001")]);
    /// assert!(model.has_reaction("rxn00001"));
    /// ```
    pub fn add_reactions<I: IntoIterator<Item = Reaction>>(&mut self, reactions: I) {
        for reaction in reactions {
            for (id, compound) in reaction.compounds_by_id() {
                self.compounds.entry(id).or_insert(compound);
            }
            self.reactions.insert(reaction.id.clone(), reaction);
        }
    }

    /// Associate roles with reaction ids, merging with any existing associations
    pub fn add_roles(&mut self, roles: IndexMap<String, IndexSet<String>>) {
        for (role, reaction_ids) in roles {
            self.roles.entry(role).or_default().extend(reaction_ids);
        }
    }

    /// Set the biomass reaction, which can only be done once
    pub fn set_biomass_reaction(&mut self, reaction: Reaction) -> Result<(), ModelError> {
        if let Some(ref existing) = self.biomass_reaction {
            return Err(ModelError::BiomassAlreadySet(existing.id.clone()));
        }
        self.biomass_reaction = Some(reaction);
        Ok(())
    }

    pub fn has_reaction(&self, reaction_id: &str) -> bool {
        self.reactions.contains_key(reaction_id)
    }

    pub fn number_of_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn number_of_compounds(&self) -> usize {
        self.compounds.len()
    }

    /// Remove reactions from the model
    ///
    /// Role associations pointing at removed reactions are dropped, roles left without reactions
    /// are removed, and the compound map is recomputed. Returns the removed reactions.
    pub fn remove_reactions(&mut self, reaction_ids: &IndexSet<String>) -> Vec<Reaction> {
        let removed: Vec<Reaction> = reaction_ids
            .iter()
            .filter_map(|id| self.reactions.shift_remove(id))
            .collect();
        if removed.is_empty() {
            return removed;
        }
        for ids in self.roles.values_mut() {
            ids.retain(|id| !reaction_ids.contains(id));
        }
        self.roles.retain(|_, ids| !ids.is_empty());
        self.gf_reactions.retain(|id| !reaction_ids.contains(id));
        self.recompute_compounds();
        removed
    }

    /// Rebuild the compound map from the current reactions
    pub fn recompute_compounds(&mut self) {
        let mut compounds = IndexMap::new();
        for reaction in self.reactions.values() {
            for (id, compound) in reaction.compounds_by_id() {
                compounds.entry(id).or_insert(compound);
            }
        }
        self.compounds = compounds;
    }

    /// Record media the model was gap-filled on
    pub fn add_gapfilled_media<I, S>(&mut self, media: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gapfilled_media
            .extend(media.into_iter().map(Into::into));
    }

    /// Add reactions selected by gap-filling, recording their ids as gap-filled
    pub fn add_gapfilled_reactions<I: IntoIterator<Item = Reaction>>(&mut self, reactions: I) {
        let reactions: Vec<Reaction> = reactions.into_iter().collect();
        self.gf_reactions
            .extend(reactions.iter().map(|r| r.id.clone()));
        self.add_reactions(reactions);
    }

    /// Reaction ids referenced by a role but absent from the reaction map
    ///
    /// Empty for a fully assembled model.
    pub fn unassociated_role_reactions(&self) -> IndexSet<String> {
        self.roles
            .values()
            .flatten()
            .filter(|id| !self.reactions.contains_key(*id))
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug, Error)]
pub enum ModelError {
    #[error("Biomass reaction has already been set to {0}")]
    BiomassAlreadySet(String),
}
