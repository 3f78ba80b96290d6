//! Migration plan model.
//!
//! A plan maps activities of a source process definition onto activities of a
//! target definition. Instruction order is the order in which the mappings are
//! applied and is preserved verbatim through serialization.

pub mod converter;
pub mod plan;

pub use converter::{MigrationInstructionConverter, MigrationPlanConverter};
pub use plan::{MigrationInstruction, MigrationPlan, MigrationPlanBuilder};
