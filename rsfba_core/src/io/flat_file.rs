//! Module providing the flat file format for saved Models
//!
//! A model is saved as six files sharing the model name as prefix:
//!
//! | File           | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | `.info`        | `id`, `name`, `organism_type` and `created_on`, tab separated |
//! | `.roles`       | role, tab, `;` separated reaction ids                        |
//! | `.reactions`   | one reaction id per line                                     |
//! | `.compounds`   | one compound id per line                                     |
//! | `.gfmedia`     | one gap-filled media per line, empty if none                 |
//! | `.gfreactions` | one gap-filled reaction id per line, empty if none           |
//!
//! Values are not escaped, so values that would break the layout are refused when saving.
//! The `.compounds` file is written for reference only; on load compounds are recomputed from
//! the reactions. Files are written one at a time, a failure part way through can leave an
//! incomplete set behind.
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::io::json::{ModelDocument, FORMAT_VERSION};
use crate::io::PersistenceError;
use crate::knowledge_base::{BiomassProvider, KnowledgeBaseLoader};
use crate::model::model::Model;

/// Paths of the six files making up a saved model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatFilePaths {
    pub info: PathBuf,
    pub roles: PathBuf,
    pub reactions: PathBuf,
    pub compounds: PathBuf,
    pub gapfilled_media: PathBuf,
    pub gapfilled_reactions: PathBuf,
}

impl FlatFilePaths {
    pub fn new<P: AsRef<Path>>(dir: P, prefix: &str) -> Self {
        let dir = dir.as_ref();
        let path = |suffix: &str| dir.join(format!("{}.{}", prefix, suffix));
        FlatFilePaths {
            info: path("info"),
            roles: path("roles"),
            reactions: path("reactions"),
            compounds: path("compounds"),
            gapfilled_media: path("gfmedia"),
            gapfilled_reactions: path("gfreactions"),
        }
    }
}

/// Save all model information in the six flat files, creating `out_dir` if needed
///
/// # Examples
/// ```rust
/// use rsfba_core::io::flat_file::save_model;
/// use rsfba_core::model::model::Model;
/// let dir = tempfile::tempdir().unwrap();
/// let model = Model::new("m1", "my_model", "standard");
/// let paths = save_model(&model, dir.path()).unwrap();
/// assert!(paths.info.exists());
/// ```
pub fn save_model<P: AsRef<Path>>(
    model: &Model,
    out_dir: P,
) -> Result<FlatFilePaths, PersistenceError> {
    ModelDocument::from_model(model).write_flat_files(out_dir)
}

/// Load a model saved by [`save_model`]
///
/// Returns `Ok(None)` when the `.info` file lacks the id, name or organism type.
pub fn load_model<P: AsRef<Path>>(
    in_dir: P,
    prefix: &str,
    loader: &dyn KnowledgeBaseLoader,
    biomass: &dyn BiomassProvider,
) -> Result<Option<Model>, PersistenceError> {
    ModelDocument::from_flat_files(in_dir, prefix)?.into_model(loader, biomass)
}

impl ModelDocument {
    /// Write the document as flat files, using the model name as prefix
    pub fn write_flat_files<P: AsRef<Path>>(
        &self,
        out_dir: P,
    ) -> Result<FlatFilePaths, PersistenceError> {
        self.check_values()?;
        let prefix = self.name.as_deref().unwrap_or_default();
        fs::create_dir_all(out_dir.as_ref())?;
        let paths = FlatFilePaths::new(out_dir.as_ref(), prefix);

        let mut info = String::new();
        info.push_str(&format!("id\t{}\n", self.id.as_deref().unwrap_or_default()));
        info.push_str(&format!("name\t{}\n", prefix));
        info.push_str(&format!(
            "organism_type\t{}\n",
            self.organism_type.as_deref().unwrap_or_default()
        ));
        info.push_str(&format!(
            "created_on\t{}",
            self.created_on.as_deref().unwrap_or_default()
        ));
        fs::write(&paths.info, info)?;

        let roles: String = self
            .roles
            .iter()
            .map(|(role, ids)| {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                format!("{}\t{}\n", role, ids.join(";"))
            })
            .collect();
        fs::write(&paths.roles, roles)?;

        fs::write(&paths.reactions, join_lines(&self.reactions, true))?;
        fs::write(&paths.compounds, join_lines(&self.compounds, true))?;
        fs::write(&paths.gapfilled_media, join_lines(&self.gapfilled_media, false))?;
        fs::write(
            &paths.gapfilled_reactions,
            join_lines(&self.gapfilled_reactions, false),
        )?;
        debug!("Saved model files to {}", paths.info.display());
        Ok(paths)
    }

    /// Read a document from the flat files in `in_dir` with this prefix
    ///
    /// Also the migration path from flat files to the JSON document.
    pub fn from_flat_files<P: AsRef<Path>>(
        in_dir: P,
        prefix: &str,
    ) -> Result<ModelDocument, PersistenceError> {
        let paths = FlatFilePaths::new(in_dir, prefix);

        let mut document = ModelDocument {
            format_version: FORMAT_VERSION,
            id: None,
            name: None,
            organism_type: None,
            created_on: None,
            roles: IndexMap::new(),
            reactions: IndexSet::new(),
            compounds: IndexSet::new(),
            gapfilled_media: IndexSet::new(),
            gapfilled_reactions: IndexSet::new(),
        };

        for (item, value) in tab_separated(&paths.info)? {
            match item.as_str() {
                "id" => document.id = Some(value),
                "name" => document.name = Some(value),
                "organism_type" => document.organism_type = Some(value),
                "created_on" => document.created_on = Some(value),
                _ => {}
            }
        }

        for (role, ids) in tab_separated(&paths.roles)? {
            document.roles.insert(
                role,
                ids.split(';')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }

        document.reactions = read_lines(&paths.reactions)?;
        if paths.compounds.exists() {
            document.compounds = read_lines(&paths.compounds)?;
        }
        document.gapfilled_media = read_lines(&paths.gapfilled_media)?;
        document.gapfilled_reactions = read_lines(&paths.gapfilled_reactions)?;
        Ok(document)
    }

    /// Refuse values that the flat file layout can't represent, empty values would not survive
    /// a load
    fn check_values(&self) -> Result<(), PersistenceError> {
        const LINE: &[char] = &['\n', '\r'];
        const TAB_LINE: &[char] = &['\t', '\n', '\r'];
        const REACTION_ID: &[char] = &['\t', '\n', '\r', ';'];

        for (field, value) in [
            ("id", &self.id),
            ("name", &self.name),
            ("organism type", &self.organism_type),
        ] {
            check(field, value.as_deref().unwrap_or_default(), LINE)?;
        }
        check("name", self.name.as_deref().unwrap_or_default(), &['/', '\\'])?;
        for (role, ids) in &self.roles {
            check("role", role, TAB_LINE)?;
            for id in ids {
                check("reaction id", id, REACTION_ID)?;
            }
        }
        for id in self.reactions.iter().chain(&self.gapfilled_reactions) {
            check("reaction id", id, REACTION_ID)?;
        }
        for id in &self.compounds {
            check("compound id", id, LINE)?;
        }
        for media in &self.gapfilled_media {
            check("gap-filled media", media, LINE)?;
        }
        Ok(())
    }
}

fn check(field: &'static str, value: &str, reserved: &[char]) -> Result<(), PersistenceError> {
    if value.is_empty() {
        return Err(PersistenceError::EmptyField(field));
    }
    if value.contains(reserved) {
        return Err(PersistenceError::DelimiterInField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Newline joined values, with a trailing newline if `always_terminate` or there are values
fn join_lines(values: &IndexSet<String>, always_terminate: bool) -> String {
    if values.is_empty() {
        return if always_terminate {
            "\n".to_string()
        } else {
            String::new()
        };
    }
    let mut joined = values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    joined.push('\n');
    joined
}

fn read_lines(path: &Path) -> Result<IndexSet<String>, PersistenceError> {
    Ok(fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Non-empty lines split on their first tab
fn tab_separated(path: &Path) -> Result<Vec<(String, String)>, PersistenceError> {
    let contents = fs::read_to_string(path)?;
    let mut pairs = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once('\t')
            .ok_or_else(|| PersistenceError::MalformedLine {
                file: path.display().to_string(),
                line: number + 1,
            })?;
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::memory::InMemoryKnowledgeBase;
    use crate::metabolism::compound::Compound;
    use crate::metabolism::located_compound::LocatedCompound;
    use crate::metabolism::reaction::Reaction;
    use tempfile::tempdir;

    fn stub() -> InMemoryKnowledgeBase {
        let mut rxn1 = Reaction::new_id_only("rxn1");
        rxn1.add_participant(LocatedCompound::new(&Compound::new("cpd00001", "H2O"), "c"), -1.);
        rxn1.add_participant(LocatedCompound::new(&Compound::new("cpd00002", "ATP"), "c"), 1.);
        let mut rxn2 = Reaction::new_id_only("rxn2");
        rxn2.add_participant(LocatedCompound::new(&Compound::new("cpd00002", "ATP"), "c"), -1.);
        InMemoryKnowledgeBase::new_empty()
            .with_reaction("standard", rxn1)
            .with_reaction("standard", rxn2)
            .with_biomass("standard", Reaction::new_id_only("bio1"))
    }

    fn setup_model(kb: &InMemoryKnowledgeBase) -> Model {
        let reactions = &kb.reactions["standard"];
        let mut model = Model::new("m1", "test_model", "standard");
        model.add_reactions([reactions["rxn1"].clone()]);
        model.add_gapfilled_reactions([reactions["rxn2"].clone()]);
        model.add_roles(IndexMap::from([
            ("roleA".to_string(), IndexSet::from(["rxn1".to_string()])),
            (
                "roleB".to_string(),
                IndexSet::from(["rxn1".to_string(), "rxn2".to_string()]),
            ),
        ]));
        model.add_gapfilled_media(["ArgonneLB"]);
        model
    }

    #[test]
    fn file_layout() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let paths = save_model(&setup_model(&kb), dir.path().join("out")).unwrap();

        let info = fs::read_to_string(&paths.info).unwrap();
        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(lines[0], "id\tm1");
        assert_eq!(lines[1], "name\ttest_model");
        assert_eq!(lines[2], "organism_type\tstandard");
        assert!(lines[3].starts_with("created_on\t"));
        assert!(!info.ends_with('\n'));

        assert_eq!(
            fs::read_to_string(&paths.roles).unwrap(),
            "roleA\trxn1\nroleB\trxn1;rxn2\n"
        );
        assert_eq!(fs::read_to_string(&paths.reactions).unwrap(), "rxn1\nrxn2\n");
        assert_eq!(
            fs::read_to_string(&paths.compounds).unwrap(),
            "cpd00001\ncpd00002\n"
        );
        assert_eq!(fs::read_to_string(&paths.gapfilled_media).unwrap(), "ArgonneLB\n");
        assert_eq!(fs::read_to_string(&paths.gapfilled_reactions).unwrap(), "rxn2\n");
        assert!(paths.info.ends_with("test_model.info"));
    }

    #[test]
    fn save_is_idempotent_on_existing_dir() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let model = setup_model(&kb);
        save_model(&model, dir.path()).unwrap();
        save_model(&model, dir.path()).unwrap();
        assert!(FlatFilePaths::new(dir.path(), "test_model").roles.exists());
    }

    #[test]
    fn save_then_load() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let model = setup_model(&kb);
        save_model(&model, dir.path()).unwrap();

        let loaded = load_model(dir.path(), "test_model", &kb, &kb)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.id, model.id);
        assert_eq!(loaded.name, model.name);
        assert_eq!(
            loaded.reactions.keys().collect::<IndexSet<_>>(),
            model.reactions.keys().collect::<IndexSet<_>>()
        );
        assert_eq!(loaded.roles, model.roles);
        assert_eq!(loaded.gapfilled_media, model.gapfilled_media);
        assert_eq!(loaded.gf_reactions, IndexSet::from(["rxn2".to_string()]));
        assert_eq!(loaded.gf_reactions, model.gf_reactions);
        assert!(loaded.has_reaction("rxn2"));
        assert_eq!(
            loaded.compounds.keys().collect::<IndexSet<_>>(),
            model.compounds.keys().collect::<IndexSet<_>>()
        );
        assert_eq!(loaded.biomass_reaction.unwrap().id, "bio1");
    }

    #[test]
    fn compounds_file_is_not_the_source() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let paths = save_model(&setup_model(&kb), dir.path()).unwrap();
        fs::write(&paths.compounds, "cpd99999\n").unwrap();
        let loaded = load_model(dir.path(), "test_model", &kb, &kb)
            .unwrap()
            .unwrap();
        assert!(!loaded.compounds.contains_key("cpd99999"));
        assert_eq!(loaded.number_of_compounds(), 2);
    }

    #[test]
    fn unknown_reaction_is_skipped() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let paths = save_model(&setup_model(&kb), dir.path()).unwrap();
        fs::write(&paths.reactions, "rxn1\nrxn_gone\n").unwrap();
        let loaded = load_model(dir.path(), "test_model", &kb, &kb)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.number_of_reactions(), 1);
        assert!(loaded.has_reaction("rxn1"));
    }

    #[test]
    fn missing_name_yields_none() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let paths = save_model(&setup_model(&kb), dir.path()).unwrap();
        fs::write(
            &paths.info,
            "id\tm1\norganism_type\tstandard\ncreated_on\t2024-01-01T00:00:00",
        )
        .unwrap();
        assert!(load_model(dir.path(), "test_model", &kb, &kb)
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_roles_line() {
        let kb = stub();
        let dir = tempdir().unwrap();
        let paths = save_model(&setup_model(&kb), dir.path()).unwrap();
        fs::write(&paths.roles, "roleA\trxn1\nroleB without tab\n").unwrap();
        assert!(matches!(
            load_model(dir.path(), "test_model", &kb, &kb),
            Err(PersistenceError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn reserved_characters_are_refused() {
        let kb = stub();
        let dir = tempdir().unwrap();

        let mut model = setup_model(&kb);
        model.add_roles(IndexMap::from([(
            "Role\twith tab".to_string(),
            IndexSet::from(["rxn1".to_string()]),
        )]));
        assert!(matches!(
            save_model(&model, dir.path()),
            Err(PersistenceError::DelimiterInField { field: "role", .. })
        ));

        let mut model = setup_model(&kb);
        model.add_gapfilled_reactions(vec![Reaction::new_id_only("rxn;1")]);
        assert!(matches!(
            save_model(&model, dir.path()),
            Err(PersistenceError::DelimiterInField { field: "reaction id", .. })
        ));
        // Nothing was written
        assert!(!FlatFilePaths::new(dir.path(), "test_model").info.exists());

        // Semicolons are fine in role names, only the first tab splits a line
        let mut model = setup_model(&kb);
        model.add_roles(IndexMap::from([(
            "Aspartokinase; Homoserine dehydrogenase".to_string(),
            IndexSet::from(["rxn2".to_string()]),
        )]));
        save_model(&model, dir.path()).unwrap();
        let loaded = load_model(dir.path(), "test_model", &kb, &kb)
            .unwrap()
            .unwrap();
        assert!(loaded
            .roles
            .contains_key("Aspartokinase; Homoserine dehydrogenase"));
    }

    #[test]
    fn empty_values_are_refused() {
        let kb = stub();
        let dir = tempdir().unwrap();

        let mut model = setup_model(&kb);
        model.add_gapfilled_reactions([Reaction::new_id_only("")]);
        assert!(matches!(
            save_model(&model, dir.path()),
            Err(PersistenceError::EmptyField("reaction id"))
        ));

        let mut model = setup_model(&kb);
        model.name = String::new();
        assert!(matches!(
            save_model(&model, dir.path()),
            Err(PersistenceError::EmptyField("name"))
        ));

        let mut model = setup_model(&kb);
        model.add_gapfilled_media([""]);
        assert!(matches!(
            save_model(&model, dir.path()),
            Err(PersistenceError::EmptyField("gap-filled media"))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn migrate_to_json() {
        let kb = stub();
        let dir = tempdir().unwrap();
        save_model(&setup_model(&kb), dir.path()).unwrap();
        let document = ModelDocument::from_flat_files(dir.path(), "test_model").unwrap();
        assert_eq!(document.compounds.len(), 2);
        assert_eq!(document.roles["roleB"].len(), 2);
        let path = dir.path().join("test_model.json");
        fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();
        let loaded = Model::read_json(&path, &kb, &kb).unwrap().unwrap();
        assert_eq!(loaded.number_of_reactions(), 2);
    }
}
