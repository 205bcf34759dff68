//! End to end tests: assemble a model from roles, save it, and load it again

use indexmap::IndexSet;
use tempfile::tempdir;

use rsfba_core::io::flat_file::{load_model, save_model};
use rsfba_core::knowledge_base::memory::InMemoryKnowledgeBase;
use rsfba_core::knowledge_base::KnowledgeBaseIndex;
use rsfba_core::metabolism::compound::Compound;
use rsfba_core::metabolism::located_compound::LocatedCompound;
use rsfba_core::metabolism::reaction::{Direction, ReactionBuilder};
use rsfba_core::model::assembler::{ModelAssembler, UnmatchedReaction};

fn knowledge_base() -> InMemoryKnowledgeBase {
    let water = Compound::new("cpd00001", "H2O");
    let atp = Compound::new("cpd00002", "ATP");
    let adp = Compound::new("cpd00008", "ADP");
    let glucose = Compound::new("cpd00027", "D-Glucose");

    let mut rxn1 = ReactionBuilder::default()
        .id("rxn1".to_string())
        .direction(Direction::Forward)
        .build()
        .unwrap();
    rxn1.add_participant(LocatedCompound::new(&atp, "c"), -1.);
    rxn1.add_participant(LocatedCompound::new(&water, "c"), -1.);
    rxn1.add_participant(LocatedCompound::new(&adp, "c"), 1.);

    let mut rxn2 = ReactionBuilder::default()
        .id("rxn2".to_string())
        .build()
        .unwrap();
    rxn2.add_participant(LocatedCompound::new(&glucose, "e"), -1.);
    rxn2.add_participant(LocatedCompound::new(&glucose, "c"), 1.);

    let mut rxn4 = ReactionBuilder::default()
        .id("rxn4".to_string())
        .direction(Direction::Reverse)
        .build()
        .unwrap();
    rxn4.add_participant(LocatedCompound::new(&adp, "c"), -1.);
    rxn4.add_participant(LocatedCompound::new(&atp, "c"), 1.);

    let biomass = ReactionBuilder::default()
        .id("bio1".to_string())
        .name(Some("Biomass".to_string()))
        .build()
        .unwrap();

    InMemoryKnowledgeBase::new_empty()
        .with_compound(water)
        .with_compound(atp)
        .with_compound(adp)
        .with_compound(glucose)
        .with_reaction("standard", rxn1)
        .with_reaction("standard", rxn2)
        .with_reaction("standard", rxn4)
        .with_role("roleA", ["rxn1"])
        .with_role("roleB", ["rxn2", "rxn3"])
        .with_biomass("standard", biomass)
}

#[test]
fn assemble_save_load() {
    let kb = knowledge_base();
    let roles = IndexSet::from(["roleA".to_string(), "roleB".to_string()]);
    let assembly = ModelAssembler::new(&kb, &kb, &kb)
        .verbose(true)
        .from_roles(&roles, "Seed1.1", "pipeline_model", "standard")
        .unwrap();

    assert_eq!(
        assembly.unmatched,
        vec![UnmatchedReaction {
            role: "roleB".to_string(),
            reaction_id: "rxn3".to_string(),
        }]
    );
    let mut model = assembly.model;
    assert_eq!(model.number_of_reactions(), 2);
    assert_eq!(model.number_of_compounds(), 4);
    model.add_gapfilled_media(["ArgonneLB"]);
    model.add_gapfilled_reactions([kb.reactions["standard"]["rxn4"].clone()]);
    assert_eq!(model.number_of_reactions(), 3);

    let dir = tempdir().unwrap();
    save_model(&model, dir.path().join("models")).unwrap();
    let loaded = load_model(dir.path().join("models"), "pipeline_model", &kb, &kb)
        .unwrap()
        .unwrap();

    assert_eq!(loaded.id, "Seed1.1");
    assert_eq!(
        loaded.reactions.keys().collect::<IndexSet<_>>(),
        model.reactions.keys().collect::<IndexSet<_>>()
    );
    assert_eq!(loaded.roles, model.roles);
    assert_eq!(loaded.gapfilled_media, model.gapfilled_media);
    assert_eq!(loaded.gf_reactions, IndexSet::from(["rxn4".to_string()]));
    assert_eq!(loaded.gf_reactions, model.gf_reactions);
    assert_eq!(
        loaded.reactions["rxn4"].direction,
        model.reactions["rxn4"].direction
    );
    assert_eq!(loaded.number_of_compounds(), 4);
    assert_eq!(
        loaded.biomass_reaction.as_ref().unwrap().name.as_deref(),
        Some("Biomass")
    );
}

#[test]
fn knowledge_base_lookups_after_load() {
    let kb = knowledge_base();
    let mut index = KnowledgeBaseIndex::load(&kb, "standard").unwrap();
    let glucose = index.lookup_by_name("D-Glucose").unwrap();
    assert_eq!(glucose.id, "cpd00027");
    assert_eq!(index.index_stats().by_name_rebuilds, 1);

    let atp = index.lookup_by_id("cpd00002").unwrap();
    assert_eq!(atp.number_of_reactions(), 2);
    assert!(atp.has_reaction("rxn4"));
    assert!(!atp.common);

    let mut common = Compound::new("cpd00067", "H+");
    common.add_reactions((0..10).map(|i| format!("rxn{}", i)));
    assert!(common.is_common_with_limit(5));
    index.insert_compound(common);
    assert!(index.lookup_by_name("H+").unwrap().common);
    assert_eq!(index.index_stats().by_name_rebuilds, 2);
}
