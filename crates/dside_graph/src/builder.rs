//! Append-only construction of a [`crate::Graph`].

use std::collections::{HashMap, HashSet};

use crate::{Edge, EdgeId, Graph, GraphError, PropertyValue, Vertex, VertexId};

/// Builds a [`Graph`] by appending vertices and edges, then freezes it.
///
/// Mirrors the "design-model file readers are out of scope" boundary: a
/// loader elsewhere in the system is expected to populate a `GraphBuilder`
/// from whatever input format it understands and hand the frozen [`Graph`]
/// to the orchestrator.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    by_identifier: HashMap<String, VertexId>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new vertex and return its handle. Identifiers must be
    /// unique within the graph; duplicates are reported at [`Self::build`].
    pub fn add_vertex<I, S>(&mut self, identifier: &str, traits: I) -> VertexId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            id,
            identifier: identifier.to_string(),
            traits: traits.into_iter().map(Into::into).collect(),
            properties: HashMap::new(),
        });
        // First registration wins the identifier->id mapping; duplicates
        // are still appended so `build()` can report them precisely.
        self.by_identifier.entry(identifier.to_string()).or_insert(id);
        id
    }

    /// Attach or replace a property on a vertex already added to this
    /// builder.
    pub fn set_property(&mut self, vertex: VertexId, key: &str, value: PropertyValue) {
        self.vertices[vertex.0 as usize]
            .properties
            .insert(key.to_string(), value);
    }

    /// Register an edge between two vertex handles returned by
    /// [`Self::add_vertex`].
    pub fn add_edge<I, S>(&mut self, source: VertexId, target: VertexId, traits: I) -> EdgeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_edge_with_ports(source, target, None, None, traits)
    }

    pub fn add_edge_with_ports<I, S>(
        &mut self,
        source: VertexId,
        target: VertexId,
        source_port: Option<String>,
        target_port: Option<String>,
        traits: I,
    ) -> EdgeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            source,
            target,
            source_port,
            target_port,
            traits: traits.into_iter().map(Into::into).collect(),
            properties: HashMap::new(),
        });
        id
    }

    /// Attach or replace a property on an edge already added to this
    /// builder.
    pub fn set_edge_property(&mut self, edge: EdgeId, key: &str, value: PropertyValue) {
        self.edges[edge.0 as usize]
            .properties
            .insert(key.to_string(), value);
    }

    /// Validate and freeze the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateIdentifier`] if two vertices share an
    /// identifier, or [`GraphError::DanglingEdge`] if an edge references a
    /// vertex handle outside the range this builder produced.
    pub fn build(self) -> Result<Graph, GraphError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for v in &self.vertices {
            if !seen.insert(v.identifier.as_str()) {
                return Err(GraphError::DuplicateIdentifier(v.identifier.clone()));
            }
        }
        let n = self.vertices.len();
        for e in &self.edges {
            if e.source.0 as usize >= n || e.target.0 as usize >= n {
                return Err(GraphError::DanglingEdge {
                    source: e.source.to_string(),
                    target: e.target.to_string(),
                });
            }
        }
        let mut adjacency = vec![Vec::new(); n];
        for e in &self.edges {
            adjacency[e.source.0 as usize].push(e.id);
        }
        Ok(Graph {
            vertices: self.vertices,
            edges: self.edges,
            adjacency,
            by_identifier: self.by_identifier,
        })
    }
}
