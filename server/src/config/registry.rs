use std::collections::HashMap;
use std::sync::RwLock;

use log::warn;

use super::configuration::BroadcastConfig;

/// Identity of a configuration scope: one controller, handler or other
/// calling context that may carry its own broadcast settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The designated global-default context every inheritance chain
    /// terminates at
    pub fn global() -> Self {
        Self(String::new())
    }

    pub fn is_global(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ConfigRegistry

/// Hierarchical store of broadcast settings, resolved per calling context
/// with inheritance from the global default.
///
/// A context without a materialized configuration resolves to its nearest
/// configured ancestor (ultimately the global default). The first
/// [`configure`](ConfigRegistry::configure) call for a context deep-copies
/// that effective ancestor configuration; from then on the context's
/// values are independent, and later ancestor changes do not reach it.
///
/// Reads are lock-shared and expected to dominate; writes happen rarely,
/// at setup time, and never corrupt an in-flight read for another context.
#[derive(Default)]
pub struct ConfigRegistry {
    contexts: RwLock<HashMap<ContextId, BroadcastConfig>>,
    parents: RwLock<HashMap<ContextId, ContextId>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the inheritance edge from `child` outward to `parent`.
    /// Contexts without a declared parent inherit from the global default.
    pub fn set_parent(&self, child: &ContextId, parent: &ContextId) {
        let mut parents = self.parents.write().expect("config registry lock poisoned");
        parents.insert(child.clone(), parent.clone());
    }

    /// Returns the effective configuration snapshot for `context`.
    ///
    /// Walks the declared inheritance chain outward to the first
    /// materialized configuration, falling back to the global default
    /// (created with the fixed defaults on first use). Never mutates any
    /// materialized configuration.
    pub fn resolve(&self, context: &ContextId) -> BroadcastConfig {
        {
            let contexts = self.contexts.read().expect("config registry lock poisoned");
            let parents = self.parents.read().expect("config registry lock poisoned");

            let mut cursor = context.clone();
            let mut hops = 0usize;
            while !cursor.is_global() {
                if let Some(config) = contexts.get(&cursor) {
                    return config.clone();
                }
                cursor = parents
                    .get(&cursor)
                    .cloned()
                    .unwrap_or_else(ContextId::global);

                hops += 1;
                if hops > parents.len() {
                    warn!(
                        "inheritance cycle while resolving context {:?}, falling back to the global default",
                        context.as_str()
                    );
                    break;
                }
            }

            if let Some(global) = contexts.get(&ContextId::global()) {
                return global.clone();
            }
        }

        self.materialize_global()
    }

    /// Applies `mutator` to the configuration materialized for `context`
    /// and returns the resulting snapshot.
    ///
    /// On the first call for a context, the effective parent configuration
    /// is deep-copied in before the mutator runs; repeat calls keep
    /// mutating that same materialized configuration without re-copying.
    pub fn configure<F>(&self, context: &ContextId, mutator: F) -> BroadcastConfig
    where
        F: FnOnce(&mut BroadcastConfig),
    {
        // Resolve the inherited base before taking the write lock; the
        // entry call below keeps an already-materialized configuration.
        let base = if self.is_materialized(context) {
            None
        } else {
            Some(self.effective_parent(context))
        };

        let mut contexts = self.contexts.write().expect("config registry lock poisoned");
        let config = contexts
            .entry(context.clone())
            .or_insert_with(|| base.unwrap_or_default());
        mutator(config);
        config.clone()
    }

    /// Whether `context` carries its own materialized configuration
    pub fn is_materialized(&self, context: &ContextId) -> bool {
        let contexts = self.contexts.read().expect("config registry lock poisoned");
        contexts.contains_key(context)
    }

    fn effective_parent(&self, context: &ContextId) -> BroadcastConfig {
        if context.is_global() {
            return BroadcastConfig::default();
        }
        let parent = {
            let parents = self.parents.read().expect("config registry lock poisoned");
            parents
                .get(context)
                .cloned()
                .unwrap_or_else(ContextId::global)
        };
        self.resolve(&parent)
    }

    fn materialize_global(&self) -> BroadcastConfig {
        let mut contexts = self.contexts.write().expect("config registry lock poisoned");
        contexts
            .entry(ContextId::global())
            .or_insert_with(BroadcastConfig::default)
            .clone()
    }
}
