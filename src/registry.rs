// SPDX-License-Identifier: MIT

//! The Action Registry (§4.1): a thread-safe, insertion-ordered map from
//! slug to `Action`. Readers and writers are serialized; reads proceed in
//! parallel.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::action::{Action, ActionDescriptor};
use crate::error::ActionError;

/// Shared, read-mostly registry of registered actions.
pub struct Registry {
    actions: RwLock<IndexMap<String, Arc<Action>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { actions: RwLock::new(IndexMap::new()) }
    }

    /// Register an action. Returns `ALREADY_EXISTS` if the slug is taken;
    /// the first registration wins.
    pub async fn register(&self, action: Action) -> Result<(), ActionError> {
        let mut actions = self.actions.write().await;
        if actions.contains_key(&action.slug) {
            return Err(ActionError::AlreadyExists);
        }
        actions.insert(action.slug.clone(), Arc::new(action));
        Ok(())
    }

    /// Look up an action by slug.
    pub async fn get(&self, slug: &str) -> Result<Arc<Action>, ActionError> {
        self.actions.read().await.get(slug).cloned().ok_or(ActionError::NotFound)
    }

    /// List all registered actions in registration order.
    pub async fn list(&self) -> Vec<ActionDescriptor> {
        self.actions.read().await.values().map(|a| a.descriptor()).collect()
    }

    pub async fn len(&self) -> usize {
        self.actions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
