//! Module providing the Model aggregate and its assembly from functional roles.

pub mod assembler;
pub mod model;
