//! Enzymes and complexes, the link between functional roles and reactions
use derive_builder::Builder;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A protein complex, made up of one or more functional roles and catalysing reactions
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complex {
    pub id: String,
    /// Functional roles that make up the complex
    #[builder(default = "IndexSet::new()")]
    #[serde(default)]
    pub roles: IndexSet<String>,
    /// Ids of the reactions the complex catalyses
    #[builder(default = "IndexSet::new()")]
    #[serde(default)]
    pub reactions: IndexSet<String>,
}

impl Complex {
    pub fn new(id: impl Into<String>) -> Complex {
        Complex {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// An enzyme, grouping the complexes and roles that catalyse a set of reactions
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enzyme {
    pub id: String,
    #[builder(default = "IndexSet::new()")]
    #[serde(default)]
    pub roles: IndexSet<String>,
    #[builder(default = "IndexSet::new()")]
    #[serde(default)]
    pub complexes: IndexSet<String>,
    #[builder(default = "IndexSet::new()")]
    #[serde(default)]
    pub reactions: IndexSet<String>,
}

impl Enzyme {
    pub fn new(id: impl Into<String>) -> Enzyme {
        Enzyme {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
