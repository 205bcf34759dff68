//! Core rust implementation of rsfba, a crate for building genome scale metabolic models from
//! functional role annotations and a reference biochemistry knowledge base.
//!
//! The pipeline is
//! - load the biochemistry tables of an organism type into a
//!   [`KnowledgeBaseIndex`](knowledge_base::KnowledgeBaseIndex)
//! - resolve functional roles to reactions and assemble a [`Model`](model::model::Model) with
//!   the [`ModelAssembler`](model::assembler::ModelAssembler)
//! - save and reload the model with [`io::flat_file`] or [`io::json`]

pub mod configuration;
pub mod io;
pub mod knowledge_base;
pub mod metabolism;
pub mod model;
#[cfg(test)]
mod utils;
