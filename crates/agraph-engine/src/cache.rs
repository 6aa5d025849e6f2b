//! Graph context registry.
//!
//! The cache holds at most one [`GraphContext`] per graph. Each context is
//! tagged with the [`Fingerprint`] of the snapshot it was built in; before
//! every lookup, contexts whose fingerprint differs from the current one
//! are dropped, so a caller never sees rows from an older snapshot.

use agraph_common::types::GraphOid;
use agraph_common::utils::error::{Error, Result};
use agraph_common::utils::hash::FxHashMap;
use agraph_core::source::{Fingerprint, GraphSource};
use agraph_core::{GraphContext, GraphContextConfig};
use serde::Serialize;
use tracing::{debug, info};

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Contexts built from the source.
    pub builds: u64,
    /// Lookups served by an existing context.
    pub reuses: u64,
    /// Contexts dropped because their snapshot went stale.
    pub invalidations: u64,
}

/// Session-owned registry of graph contexts.
#[derive(Debug)]
pub struct GraphCache {
    contexts: FxHashMap<GraphOid, GraphContext>,
    config: GraphContextConfig,
    stats: CacheStats,
}

impl GraphCache {
    /// Creates an empty cache that builds contexts with `config`.
    #[must_use]
    pub fn new(config: GraphContextConfig) -> Self {
        Self {
            contexts: FxHashMap::default(),
            config,
            stats: CacheStats::default(),
        }
    }

    /// Returns a context for graph `oid` that is valid in the source's
    /// current snapshot, building one if needed.
    ///
    /// Stale contexts of every graph are dropped first.
    ///
    /// # Errors
    ///
    /// Returns any error raised while building the context. The cache is
    /// left without an entry for `oid` in that case.
    pub fn manage<S: GraphSource + ?Sized>(
        &mut self,
        name: &str,
        oid: GraphOid,
        source: &S,
    ) -> Result<&GraphContext> {
        let current = source.current_fingerprint();
        self.sweep(&current);

        if self.contexts.contains_key(&oid) {
            self.stats.reuses += 1;
            debug!(graph = name, %oid, "reusing graph context");
        } else {
            let ctx = GraphContext::build(name, oid, current, source, &self.config)?;
            info!(
                graph = name,
                %oid,
                vertices = ctx.vertex_count(),
                edges = ctx.edge_count(),
                "built graph context"
            );
            self.stats.builds += 1;
            self.contexts.insert(oid, ctx);
        }

        self.contexts
            .get(&oid)
            .ok_or_else(|| Error::Internal(format!("graph context {oid} vanished from the cache")))
    }

    /// Drops every context not valid in `current`. Returns how many were
    /// dropped.
    pub fn sweep(&mut self, current: &Fingerprint) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(|oid, ctx| {
            let keep = ctx.is_valid_for(current);
            if !keep {
                info!(graph = ctx.name(), %oid, "dropping stale graph context");
            }
            keep
        });
        let dropped = before - self.contexts.len();
        self.stats.invalidations += dropped as u64;
        dropped
    }

    /// The cached context for `oid`, without checking its snapshot.
    #[must_use]
    pub fn find(&self, oid: GraphOid) -> Option<&GraphContext> {
        self.contexts.get(&oid)
    }

    /// Number of cached contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// True if no context is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Drops every context.
    pub fn clear(&mut self) {
        self.contexts.clear();
    }

    /// Usage counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agraph_adapters::MemoryGraphStore;
    use agraph_core::source::{LabelCatalog, LabelKind, SnapshotOracle};
    use agraph_core::{Value, encode};

    fn store() -> (MemoryGraphStore, GraphOid) {
        let mut store = MemoryGraphStore::new();
        let g = store.create_graph("g").unwrap();
        let v = store.create_label(g, "V", LabelKind::Vertex).unwrap();
        store
            .insert_vertex(v, encode(&Value::empty_object()).unwrap())
            .unwrap();
        store.commit();
        (store, g)
    }

    #[test]
    fn test_reuse_in_same_snapshot() {
        let (store, g) = store();
        let mut cache = GraphCache::new(GraphContextConfig::small());
        assert_eq!(cache.manage("g", g, &store).unwrap().vertex_count(), 1);
        cache.manage("g", g, &store).unwrap();
        assert_eq!(
            cache.stats(),
            CacheStats {
                builds: 1,
                reuses: 1,
                invalidations: 0
            }
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_drops_stale() {
        let (mut store, g) = store();
        let mut cache = GraphCache::new(GraphContextConfig::small());
        cache.manage("g", g, &store).unwrap();
        store.commit();
        assert_eq!(cache.sweep(&store.current_fingerprint()), 1);
        assert!(cache.is_empty());
        assert!(cache.find(g).is_none());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_failed_build_leaves_no_entry() {
        let (mut store, g) = store();
        let e = store.create_label(g, "E", LabelKind::Edge).unwrap();
        let dangling = agraph_common::GraphId::new(12345);
        store
            .insert_edge(e, dangling, dangling, encode(&Value::empty_object()).unwrap())
            .unwrap();
        let mut cache = GraphCache::new(GraphContextConfig::small());
        assert!(cache.manage("g", g, &store).is_err());
        assert!(cache.find(g).is_none());
        assert_eq!(cache.stats().builds, 0);
        assert_eq!(store.graph_oid("g"), Some(g));
    }

    #[test]
    fn test_clear() {
        let (store, g) = store();
        let mut cache = GraphCache::new(GraphContextConfig::small());
        cache.manage("g", g, &store).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
