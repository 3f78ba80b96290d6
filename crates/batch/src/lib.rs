//! Batch configurations and their wire converters.
//!
//! A batch applies one operation to a list of target ids. The id list is kept
//! exactly as submitted: never deduplicated, never reordered. Splitting it into
//! chunks for parallel jobs happens elsewhere.

pub mod ids;
pub mod instruction;
pub mod migration;
pub mod modification;
pub mod restart;
pub mod retries;

pub use ids::{BatchConfiguration, DeleteHistoricDecisionInstancesConverter};
pub use instruction::{ModificationInstruction, ModificationInstructionConverter};
pub use migration::{MigrationBatchConfiguration, MigrationBatchConfigurationConverter};
pub use modification::{ModificationBatchConfiguration, ModificationBatchConfigurationConverter};
pub use restart::{RestartProcessInstancesBatchConfiguration, RestartProcessInstancesConverter};
pub use retries::{SetRetriesBatchConfiguration, SetRetriesBatchConfigurationConverter};

/// Common view over every batch configuration.
pub trait BatchIds {
    /// Target ids in submission order.
    fn ids(&self) -> &[String];
}
