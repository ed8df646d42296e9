//! Infrastructure port interfaces.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Scope for workflow-node static data.
///
/// The webhook subscription id is owned by exactly one (workflow, node)
/// instance; the scope keys the store so trigger instances never share
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticDataScope {
    pub workflow_id: String,
    pub node_id: String,
}

impl StaticDataScope {
    pub fn new(workflow_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self { workflow_id: workflow_id.into(), node_id: node_id.into() }
    }
}

/// Key-value store for workflow-node scoped static data.
///
/// Implementations are provided by the host (typically persisted with the
/// workflow). Calls for one scope are never issued concurrently, so
/// implementations need interior mutability but no cross-call transactions.
pub trait StaticDataStore: Send + Sync {
    fn get(&self, scope: &StaticDataScope, key: &str) -> Option<String>;
    fn set(&self, scope: &StaticDataScope, key: &str, value: &str);
    fn remove(&self, scope: &StaticDataScope, key: &str);
}

/// In-memory store, used in tests and by embedders without persistence.
#[derive(Default)]
pub struct InMemoryStaticData {
    entries: Mutex<HashMap<(StaticDataScope, String), String>>,
}

impl InMemoryStaticData {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StaticDataStore for InMemoryStaticData {
    fn get(&self, scope: &StaticDataScope, key: &str) -> Option<String> {
        self.entries.lock().get(&(scope.clone(), key.to_string())).cloned()
    }

    fn set(&self, scope: &StaticDataScope, key: &str, value: &str) {
        self.entries.lock().insert((scope.clone(), key.to_string()), value.to_string());
    }

    fn remove(&self, scope: &StaticDataScope, key: &str) {
        self.entries.lock().remove(&(scope.clone(), key.to_string()));
    }
}
