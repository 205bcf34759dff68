//! Module providing the entities of the biochemistry knowledge base: compounds, located
//! compounds, reactions, enzymes and complexes.

pub mod compound;
pub mod enzyme;
pub mod located_compound;
pub mod reaction;
