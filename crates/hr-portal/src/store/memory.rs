use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{RealtimeStore, StoreError};

/// JSON tree held in process memory. Used for local runs, demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryRealtimeStore {
    root: Mutex<Value>,
}

impl InMemoryRealtimeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing tree.
    pub fn with_root(root: Value) -> Self {
        Self {
            root: Mutex::new(root),
        }
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Result<Value, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Value>, StoreError> {
        self.root
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn join(base: &str, relative: &str) -> String {
    let base = base.trim_matches('/');
    let relative = relative.trim_matches('/');
    match (base.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{relative}"),
    }
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, segment| node.as_object()?.get(*segment))
        .filter(|node| !node.is_null())
}

fn assign(root: &mut Value, path: &[&str], value: Value) {
    if value.is_null() {
        prune(root, path);
        return;
    }

    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };
        node = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), value);
    }
}

/// Removes the node at `path`; returns true when `node` itself is left empty.
fn prune(node: &mut Value, path: &[&str]) -> bool {
    let Some((first, rest)) = path.split_first() else {
        *node = Value::Null;
        return true;
    };

    let Value::Object(map) = node else {
        return false;
    };

    let remove_child = match map.get_mut(*first) {
        Some(child) if rest.is_empty() => {
            *child = Value::Null;
            true
        }
        Some(child) => prune(child, rest),
        None => false,
    };
    if remove_child {
        map.remove(*first);
    }
    map.is_empty()
}

#[async_trait]
impl RealtimeStore for InMemoryRealtimeStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.lock()?;
        Ok(lookup(&root, &segments(path)).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut root = self.lock()?;
        assign(&mut root, &segments(path), value);
        Ok(())
    }

    async fn update(&self, base: &str, changes: BTreeMap<String, Value>) -> Result<(), StoreError> {
        let mut root = self.lock()?;
        for (relative, value) in changes {
            let full = join(base, &relative);
            assign(&mut root, &segments(&full), value);
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let mut root = self.lock()?;
        prune(&mut root, &segments(path));
        Ok(())
    }
}
