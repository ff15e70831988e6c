//! # Dispatch Engine
//!
//! Business layer for the dispatch service: the booking lifecycle state
//! machine, the notification feed it drives, shared per-pair chat logs, and
//! the periodic day-ahead reminder sweep. The transport layer that
//! authenticates callers and parses requests lives outside this crate;
//! operations here receive an already authenticated [`Actor`](dispatch_core::models::user::Actor)
//! and typed payloads, and still enforce the actor-role preconditions of each
//! operation themselves.
//!
//! ## Architecture
//!
//! - **bookings**: lifecycle transitions and their notification side effects
//! - **notifications**: per-recipient notification feed
//! - **chat**: shared message logs keyed by unordered participant pairs
//! - **reminders**: the hourly reminder scanner and its scheduler
//! - **config**: environment-driven runtime settings

pub mod bookings;
pub mod chat;
pub mod config;
pub mod notifications;
pub mod reminders;

use std::path::Path;
use std::sync::Arc;

use dispatch_core::errors::{DispatchError, DispatchResult};
use dispatch_core::models::user::{Actor, Role};
use dispatch_db::Store;
use dispatch_db::directory::{FileDirectory, UserDirectory};

/// Shared dependencies for every engine operation: the record store plus the
/// three read-only user directories.
pub struct Engine {
    pub store: Store,
    pub clients: Arc<dyn UserDirectory>,
    pub staff: Arc<dyn UserDirectory>,
    pub admins: Arc<dyn UserDirectory>,
}

impl Engine {
    pub fn new(
        store: Store,
        clients: Arc<dyn UserDirectory>,
        staff: Arc<dyn UserDirectory>,
        admins: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            store,
            clients,
            staff,
            admins,
        }
    }

    /// Opens the store rooted at `data_dir` and wires up the file-backed user
    /// directories living next to the collections.
    pub async fn open(data_dir: impl AsRef<Path>) -> DispatchResult<Self> {
        let data_dir = data_dir.as_ref();
        let store = Store::open(data_dir).await?;
        Ok(Self {
            clients: Arc::new(FileDirectory::new(data_dir.join("clients.txt"))),
            staff: Arc::new(FileDirectory::new(data_dir.join("staff.txt"))),
            admins: Arc::new(FileDirectory::new(data_dir.join("admin.txt"))),
            store,
        })
    }
}

pub(crate) fn require_role(actor: &Actor, role: Role, operation: &str) -> DispatchResult<()> {
    if actor.role == role {
        Ok(())
    } else {
        Err(DispatchError::Unauthorized(format!(
            "{operation} requires the {role} role"
        )))
    }
}
