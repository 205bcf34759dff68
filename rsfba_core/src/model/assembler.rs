//! Module for assembling a Model from functional roles
//!
//! Assembly runs through four stages:
//! 1. Load the biochemistry tables for the organism type
//! 2. Collect the functional roles, from an assigned functions file or given directly
//! 3. Resolve each role to reaction ids. Reactions found in the loaded tables are added to the
//!    model together with the role association, the rest are skipped and reported
//! 4. Attach the biomass equation of the organism type
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::configuration::CONFIGURATION;
use crate::io::annotation::{all_roles, read_assigned_functions, AnnotationError};
use crate::knowledge_base::{
    BiomassProvider, KnowledgeBaseError, KnowledgeBaseIndex, KnowledgeBaseLoader, RoleResolver,
};
use crate::model::model::{Model, ModelError};

/// A role/reaction pair that was skipped because the reaction is not in the knowledge base
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnmatchedReaction {
    pub role: String,
    pub reaction_id: String,
}

/// The result of assembling a model
#[derive(Debug)]
pub struct Assembly {
    pub model: Model,
    /// Pairs left out of the model, callers should inspect these
    pub unmatched: Vec<UnmatchedReaction>,
}

/// Builds models from functional roles using a knowledge base loader, a role resolver and
/// a biomass provider
pub struct ModelAssembler<'a> {
    loader: &'a dyn KnowledgeBaseLoader,
    resolver: &'a dyn RoleResolver,
    biomass: &'a dyn BiomassProvider,
    verbose: bool,
}

impl<'a> ModelAssembler<'a> {
    /// Create an assembler, verbosity defaults to the configured value
    pub fn new(
        loader: &'a dyn KnowledgeBaseLoader,
        resolver: &'a dyn RoleResolver,
        biomass: &'a dyn BiomassProvider,
    ) -> Self {
        ModelAssembler {
            loader,
            resolver,
            biomass,
            verbose: CONFIGURATION.read().unwrap().verbose,
        }
    }

    /// Report skipped role/reaction pairs at warn rather than debug level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Assemble a model from the roles in an assigned functions file
    pub fn from_annotation_file<P: AsRef<Path>>(
        &self,
        path: P,
        id: &str,
        name: &str,
        organism_type: &str,
    ) -> Result<Assembly, AssemblyError> {
        let knowledge_base = self.load_knowledge_base(organism_type)?;
        let assigned = read_assigned_functions(path.as_ref())?;
        let roles = all_roles(&assigned);
        debug!(
            features = assigned.len(),
            roles = roles.len(),
            "Collected roles from {}",
            path.as_ref().display()
        );
        self.assemble(&knowledge_base, &roles, id, name, organism_type)
    }

    /// Assemble a model from a set of roles
    pub fn from_roles(
        &self,
        roles: &IndexSet<String>,
        id: &str,
        name: &str,
        organism_type: &str,
    ) -> Result<Assembly, AssemblyError> {
        let knowledge_base = self.load_knowledge_base(organism_type)?;
        debug!(roles = roles.len(), "Collected roles");
        self.assemble(&knowledge_base, roles, id, name, organism_type)
    }

    /// All reaction ids the roles resolve to, whether or not they are in the knowledge base
    pub fn resolve_reaction_ids(&self, roles: &IndexSet<String>) -> IndexSet<String> {
        self.resolver
            .roles_to_reactions(roles)
            .into_values()
            .flatten()
            .collect()
    }

    fn load_knowledge_base(
        &self,
        organism_type: &str,
    ) -> Result<KnowledgeBaseIndex, AssemblyError> {
        let knowledge_base = KnowledgeBaseIndex::load(self.loader, organism_type)?;
        debug!(organism_type, "Loaded knowledge base");
        Ok(knowledge_base)
    }

    fn assemble(
        &self,
        knowledge_base: &KnowledgeBaseIndex,
        roles: &IndexSet<String>,
        id: &str,
        name: &str,
        organism_type: &str,
    ) -> Result<Assembly, AssemblyError> {
        let mut model = Model::new(id, name, organism_type);
        let mut unmatched = Vec::new();

        for (role, reaction_ids) in self.resolver.roles_to_reactions(roles) {
            for reaction_id in reaction_ids {
                match knowledge_base.reaction(&reaction_id) {
                    Some(reaction) => {
                        model.add_reactions([reaction.clone()]);
                        model.add_roles(IndexMap::from([(
                            role.clone(),
                            IndexSet::from([reaction_id]),
                        )]));
                    }
                    None => {
                        if self.verbose {
                            warn!(
                                %role,
                                %reaction_id,
                                "Reaction is not in our reactions list. Skipped."
                            );
                        } else {
                            debug!(
                                %role,
                                %reaction_id,
                                "Skipped reaction missing from knowledge base"
                            );
                        }
                        unmatched.push(UnmatchedReaction {
                            role: role.clone(),
                            reaction_id,
                        });
                    }
                }
            }
        }
        debug!(
            reactions = model.number_of_reactions(),
            unmatched = unmatched.len(),
            "Resolved roles to reactions"
        );

        let biomass = self.biomass.biomass_equation(organism_type)?;
        model.set_biomass_reaction(biomass)?;
        Ok(Assembly { model, unmatched })
    }
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Unable to load the knowledge base")]
    KnowledgeBase(#[from] KnowledgeBaseError),
    #[error("Unable to read roles")]
    Annotation(#[from] AnnotationError),
    #[error("Unable to finalize model")]
    Model(#[from] ModelError),
}
