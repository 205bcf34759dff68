//! This module provides the LocatedCompound struct, a compound bound to a cellular compartment
//!
//! The location is typically one of
//! - `e`: extracellular
//! - `c`: cytoplasmic
//! - `h`: chloroplast
//! - `p`: periplasm
//!
//! but any string is accepted.
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::metabolism::compound::{ChemicalEntity, Compound, CompoundError};

/// A compound at a specific location
///
/// Holds its own copy of the compound, so changes to the compound it was created from are not
/// seen here. Compound fields can be read directly through `Deref`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatedCompound {
    compound: Compound,
    /// Compartment the compound is in
    pub location: String,
}

impl LocatedCompound {
    /// Create a located compound from a snapshot of the current state of `compound`
    ///
    /// # Examples
    /// ```rust
    /// use rsfba_core::metabolism::compound::Compound;
    /// use rsfba_core::metabolism::located_compound::LocatedCompound;
    /// let glucose = Compound::new("cpd00027", "D-Glucose");
    /// let outside = LocatedCompound::new(&glucose, "e");
    /// assert_eq!(outside.name, "D-Glucose");
    /// ```
    pub fn new(compound: &Compound, location: impl Into<String>) -> LocatedCompound {
        LocatedCompound::from_snapshot(compound.clone(), location)
    }

    /// Create a located compound taking ownership of a compound snapshot
    pub fn from_snapshot(compound: Compound, location: impl Into<String>) -> LocatedCompound {
        LocatedCompound {
            compound,
            location: location.into(),
        }
    }

    /// The located compound's own copy of the compound
    pub fn compound(&self) -> &Compound {
        &self.compound
    }

    pub fn compound_mut(&mut self) -> &mut Compound {
        &mut self.compound
    }

    /// Give up the location, returning the compound
    pub fn into_compound(self) -> Compound {
        self.compound
    }

    /// Whether two located compounds could describe the same species: same id, or same name
    /// in the same location
    pub fn might_be_same(&self, other: &LocatedCompound) -> bool {
        self.compound.id == other.compound.id
            || (self.compound.name == other.compound.name && self.location == other.location)
    }
}

impl Deref for LocatedCompound {
    type Target = Compound;

    fn deref(&self) -> &Self::Target {
        &self.compound
    }
}

impl DerefMut for LocatedCompound {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.compound
    }
}

impl ChemicalEntity for LocatedCompound {
    fn id(&self) -> &str {
        &self.compound.id
    }

    fn name(&self) -> &str {
        &self.compound.name
    }

    /// Does nothing for located compounds
    fn calculate_molecular_weight(&self) -> Result<Option<f64>, CompoundError> {
        Ok(None)
    }
}

impl PartialEq for LocatedCompound {
    fn eq(&self, other: &Self) -> bool {
        self.compound.id == other.compound.id
    }
}

impl Eq for LocatedCompound {}

impl Hash for LocatedCompound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compound.id.hash(state);
    }
}

impl Display for LocatedCompound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (location: {})",
            self.compound.id, self.compound.name, self.location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hashing::calculate_hash;
    use serde_json::Value;
    use std::collections::HashSet;

    #[test]
    fn copies_current_state() {
        let mut glucose = Compound::new("cpd00027", "D-Glucose");
        glucose.formula = Some("C6H12O6".to_string());
        glucose.add_reactions(vec!["rxn00216"]);
        glucose.add_attribute("kegg", "C00031");

        let located = LocatedCompound::new(&glucose, "c");
        assert_eq!(located.formula.as_deref(), Some("C6H12O6"));
        assert!(located.has_reaction("rxn00216"));
        assert_eq!(located.get_attribute("kegg"), Some(&Value::from("C00031")));
        assert_eq!(located.location, "c");
    }

    #[test]
    fn snapshot_does_not_follow_source() {
        let mut glucose = Compound::new("cpd00027", "D-Glucose");
        let located = LocatedCompound::new(&glucose, "e");
        glucose.add_reactions(vec!["rxn05573"]);
        glucose.add_attribute("kegg", "C00031");
        glucose.name = "Glucose".to_string();
        assert_eq!(located.number_of_reactions(), 0);
        assert!(located.get_attribute("kegg").is_none());
        assert_eq!(located.name, "D-Glucose");
    }

    #[test]
    fn equality_uses_id() {
        let glucose = Compound::new("cpd00027", "D-Glucose");
        let inside = LocatedCompound::new(&glucose, "c");
        let outside = LocatedCompound::new(&glucose, "e");
        assert_eq!(inside, outside);
        assert_eq!(calculate_hash(&inside), calculate_hash(&outside));

        let other = LocatedCompound::new(&Compound::new("cpd26821", "D-Glucose"), "c");
        assert_ne!(inside, other);
        let set: HashSet<LocatedCompound> = HashSet::from([inside, outside, other]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn might_be_same_requires_name_and_location() {
        let glucose_c = LocatedCompound::new(&Compound::new("cpd00027", "D-Glucose"), "c");
        let alias_c = LocatedCompound::new(&Compound::new("cpd26821", "D-Glucose"), "c");
        let alias_e = LocatedCompound::new(&Compound::new("cpd26821", "D-Glucose"), "e");
        let same_id_e = LocatedCompound::new(&Compound::new("cpd00027", "Glucose"), "e");
        assert!(glucose_c.might_be_same(&alias_c));
        assert!(!glucose_c.might_be_same(&alias_e));
        assert!(glucose_c.might_be_same(&same_id_e));
    }

    #[test]
    fn molecular_weight_is_a_no_op() {
        let compound = Compound::new("cpd00027", "D-Glucose");
        let located = LocatedCompound::new(&compound, "c");
        assert!(compound.calculate_molecular_weight().is_err());
        assert_eq!(located.calculate_molecular_weight().unwrap(), None);
    }

    #[test]
    fn display() {
        let located = LocatedCompound::new(&Compound::new("cpd00027", "D-Glucose"), "e");
        assert_eq!(format!("{}", located), "cpd00027: D-Glucose (location: e)");
    }
}
