//! Session management.

use agraph_adapters::MemoryGraphStore;
use agraph_common::types::{GraphId, GraphOid};
use agraph_common::utils::error::{Error, Result};
use agraph_core::agtype::graph::{build_edge, build_vertex};
use agraph_core::source::GraphSource;
use agraph_core::{GraphContext, Value};

use crate::cache::GraphCache;
use crate::config::Config;

/// A session reading graphs from one source.
///
/// The session owns its graph cache, so contexts are never shared between
/// sessions. Reads go through [`graph`](Self::graph), which revalidates the
/// cache against the source's current snapshot.
pub struct Session<S: GraphSource> {
    source: S,
    cache: GraphCache,
    config: Config,
}

impl<S: GraphSource> Session<S> {
    /// Creates a session over `source`.
    pub fn new(source: S, config: Config) -> Self {
        Self {
            cache: GraphCache::new(config.context_config()),
            source,
            config,
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the underlying source, for writes.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session's graph cache.
    pub fn cache(&self) -> &GraphCache {
        &self.cache
    }

    /// Drops every cached graph context.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn resolve(&self, name: &str) -> Result<GraphOid> {
        self.source
            .graph_oid(name)
            .ok_or_else(|| Error::InvalidValue(format!("graph \"{name}\" does not exist")))
    }

    /// Returns the context of graph `name` for the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph does not exist or its context fails
    /// to build.
    pub fn graph(&mut self, name: &str) -> Result<&GraphContext> {
        let oid = self.resolve(name)?;
        self.cache.manage(name, oid, &self.source)
    }

    /// Looks up a vertex of graph `name` as a vertex value.
    ///
    /// # Errors
    ///
    /// As for [`graph`](Self::graph).
    pub fn vertex(&mut self, graph: &str, id: GraphId) -> Result<Option<Value>> {
        let ctx = self.graph(graph)?;
        ctx.get_vertex_entry(id)
            .map(|v| build_vertex(v.id(), v.label(), Value::Binary(v.properties().clone())))
            .transpose()
    }

    /// Looks up an edge of graph `name` as an edge value.
    ///
    /// # Errors
    ///
    /// As for [`graph`](Self::graph).
    pub fn edge(&mut self, graph: &str, id: GraphId) -> Result<Option<Value>> {
        let ctx = self.graph(graph)?;
        ctx.get_edge_entry(id)
            .map(|e| {
                build_edge(
                    e.id(),
                    e.start_id(),
                    e.end_id(),
                    e.label(),
                    Value::Binary(e.properties().clone()),
                )
            })
            .transpose()
    }
}

impl Session<MemoryGraphStore> {
    /// A session over an empty in-memory store.
    #[must_use]
    pub fn in_memory(config: Config) -> Self {
        Self::new(MemoryGraphStore::new(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agraph_core::source::LabelKind;
    use agraph_core::{encode, from_text};

    #[test]
    fn test_unknown_graph() {
        let mut session = Session::in_memory(Config::for_testing());
        let err = session.graph("nope").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_vertex_and_edge_values() {
        let mut session = Session::in_memory(Config::for_testing());
        let store = session.source_mut();
        let g = store.create_graph("g").unwrap();
        let person = store.create_label(g, "Person", LabelKind::Vertex).unwrap();
        let knows = store.create_label(g, "KNOWS", LabelKind::Edge).unwrap();
        let props = encode(&from_text(r#"{"name": "ann"}"#).unwrap()).unwrap();
        let a = store.insert_vertex(person, props.clone()).unwrap();
        let b = store.insert_vertex(person, props).unwrap();
        let e = store
            .insert_edge(knows, a, b, encode(&Value::empty_object()).unwrap())
            .unwrap();

        let vertex = session.vertex("g", a).unwrap().unwrap();
        assert!(matches!(vertex, Value::Vertex(_)));
        assert_eq!(vertex.get("label"), Some(&Value::from("Person")));

        let edge = session.edge("g", e).unwrap().unwrap();
        assert_eq!(edge.get("start_id"), Some(&Value::from(a.as_i64())));
        assert_eq!(edge.get("end_id"), Some(&Value::from(b.as_i64())));
        assert!(session.vertex("g", GraphId::new(1)).unwrap().is_none());
        assert_eq!(session.cache().stats().builds, 1);
    }
}
