//! Error types returned by the simulation core.
//!
//! Only recoverable conditions are represented here. A full entity, event or
//! watch table and a reference to an entity that is gone are both reported to
//! the caller, which decides what to do. Internal consistency violations (an
//! undersized query buffer) are not errors: they panic.

use thiserror::Error;

use crate::entity::Entity;

/// Errors produced by the entity manager, the scheduler and the collision watcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A fixed-capacity table has no free slot left.
    #[error("{table} table is full (capacity {capacity})")]
    AtCapacity {
        /// Name of the table that is full.
        table: &'static str,
        /// Number of slots of that table.
        capacity: usize,
    },

    /// The entity is out of range, deleted, or the handle is stale.
    #[error("entity {entity} does not exist")]
    NotFound {
        /// The handle that failed to resolve.
        entity: Entity,
    },
}
