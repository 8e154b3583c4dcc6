//! The append-only graph description model
//!
//! A [`GraphDescription`] is filled in by a diagram definition and then handed,
//! immutable, to the render pipeline. Every `add_*` operation validates its
//! input against what has been declared so far, so a description that was
//! built without errors only needs [`GraphDescription::validate`] to check
//! forward references before it is serialized.

use std::collections::{HashMap, HashSet};

use log::debug;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::error::GraphError;
use crate::graph::types::{
    Attributes, Cluster, ClusterHandle, Direction, Edge, EdgeHandle, Element, Node, NodeHandle,
};

/// Separator between a cluster id and a node id in a qualified reference
pub const SCOPE_SEPARATOR: &str = "::";

#[derive(Debug, Clone)]
struct PlacedNode {
    node: Node,
    /// Index of the enclosing cluster, `None` at the top level
    scope: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Node(usize),
    Cluster(usize),
}

#[derive(Debug, Clone)]
struct ResolvedEdge {
    edge: Edge,
    source: Endpoint,
    target: Endpoint,
}

/// A child of a cluster, resolved to the element it names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Member {
    Node(usize),
    Cluster(usize),
}

#[derive(Debug, Clone)]
pub struct GraphDescription {
    name: String,
    title: Option<String>,
    direction: Direction,
    graph_attributes: Attributes,
    node_defaults: Attributes,
    edge_defaults: Attributes,
    nodes: Vec<PlacedNode>,
    edges: Vec<ResolvedEdge>,
    clusters: Vec<Cluster>,
    node_lookup: HashMap<(Option<usize>, String), usize>,
    cluster_lookup: HashMap<String, usize>,
    /// Nested cluster id -> enclosing cluster id, including clusters that
    /// were listed as children before being added
    cluster_parents: HashMap<String, String>,
}

impl GraphDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            direction: Direction::default(),
            graph_attributes: Attributes::new(),
            node_defaults: Attributes::new(),
            edge_defaults: Attributes::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            clusters: Vec::new(),
            node_lookup: HashMap::new(),
            cluster_lookup: HashMap::new(),
            cluster_parents: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn graph_attributes(&self) -> &Attributes {
        &self.graph_attributes
    }

    pub fn node_defaults(&self) -> &Attributes {
        &self.node_defaults
    }

    pub fn edge_defaults(&self) -> &Attributes {
        &self.edge_defaults
    }

    /// Add a node at the top level of the graph, or inside the cluster that
    /// already lists it as a child
    pub fn add_node(&mut self, node: Node) -> Result<NodeHandle, GraphError> {
        self.insert_node(None, node)
    }

    /// Add a node inside an already added cluster
    pub fn add_node_in(&mut self, cluster: &str, node: Node) -> Result<NodeHandle, GraphError> {
        let scope = *self
            .cluster_lookup
            .get(cluster)
            .ok_or_else(|| GraphError::UnknownScope {
                cluster: cluster.to_string(),
            })?;
        let id = node.id.clone();
        let handle = self.insert_node(Some(scope), node)?;
        if !self.clusters[scope].children.contains(&id) {
            self.clusters[scope].children.push(id);
        }
        Ok(handle)
    }

    fn insert_node(&mut self, scope: Option<usize>, node: Node) -> Result<NodeHandle, GraphError> {
        validate_id(&node.id)?;

        if self.cluster_lookup.contains_key(&node.id) {
            return Err(GraphError::DuplicateId {
                id: node.id,
                scope: "the graph as a cluster".to_string(),
            });
        }

        // A cluster added earlier may have listed this node as a child
        let listed_in = self
            .cluster_parents
            .get(&node.id)
            .and_then(|parent| self.cluster_lookup.get(parent))
            .copied();
        let scope = match (scope, listed_in) {
            (Some(requested), Some(listed)) if requested != listed => {
                return Err(GraphError::AlreadyGrouped {
                    id: node.id,
                    parent: self.clusters[listed].id.clone(),
                });
            }
            (None, Some(listed)) => Some(listed),
            (scope, _) => scope,
        };

        let key = (scope, node.id.clone());
        if self.node_lookup.contains_key(&key) {
            return Err(GraphError::DuplicateId {
                id: node.id,
                scope: self.scope_name(scope),
            });
        }

        debug!(graph = self.name.as_str(), node = node.id.as_str(); "Adding node");

        if listed_in.is_some() {
            self.cluster_parents.remove(&node.id);
        }

        let index = self.nodes.len();
        self.nodes.push(PlacedNode { node, scope });
        self.node_lookup.insert(key, index);
        Ok(NodeHandle(index))
    }

    /// Add an edge between two already declared nodes or clusters.
    ///
    /// Endpoints are resolved immediately; declaring an edge before its
    /// endpoints is an error.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeHandle, GraphError> {
        let source = self.resolve(&edge.source)?;
        let target = self.resolve(&edge.target)?;

        debug!(
            graph = self.name.as_str(),
            source = edge.source.as_str(),
            target = edge.target.as_str();
            "Adding edge"
        );

        let index = self.edges.len();
        self.edges.push(ResolvedEdge {
            edge,
            source,
            target,
        });
        Ok(EdgeHandle(index))
    }

    /// Add a cluster grouping existing top-level nodes and nested clusters.
    ///
    /// Children naming a top-level node move that node into the cluster. Any
    /// other child is a forward reference: a cluster added later becomes
    /// nested here, and a node added later is placed here.
    pub fn add_cluster(&mut self, cluster: Cluster) -> Result<ClusterHandle, GraphError> {
        validate_id(&cluster.id)?;

        if self.cluster_lookup.contains_key(&cluster.id) {
            return Err(GraphError::DuplicateId {
                id: cluster.id,
                scope: "the graph".to_string(),
            });
        }
        if self.nodes.iter().any(|placed| placed.node.id == cluster.id) {
            return Err(GraphError::DuplicateId {
                id: cluster.id,
                scope: "the graph as a node".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut grouped_nodes = Vec::new();
        let mut nested = Vec::new();

        for child in &cluster.children {
            validate_id(child)?;

            if !seen.insert(child.as_str()) {
                return Err(GraphError::DuplicateId {
                    id: child.clone(),
                    scope: format!("cluster '{}'", cluster.id),
                });
            }

            if *child == cluster.id {
                return Err(GraphError::Cycle {
                    cluster: cluster.id.clone(),
                    members: cluster.id.clone(),
                });
            }

            if let Some(&index) = self.node_lookup.get(&(None, child.clone())) {
                grouped_nodes.push(index);
                continue;
            }

            if let Some(placed) = self.nodes.iter().find(|placed| placed.node.id == *child) {
                return Err(GraphError::AlreadyGrouped {
                    id: child.clone(),
                    parent: self.scope_label(placed.scope),
                });
            }

            if let Some(parent) = self.cluster_parents.get(child) {
                return Err(GraphError::AlreadyGrouped {
                    id: child.clone(),
                    parent: parent.clone(),
                });
            }

            nested.push(child.as_str());
        }

        self.check_containment(&cluster.id, &nested)?;

        debug!(
            graph = self.name.as_str(),
            cluster = cluster.id.as_str(),
            children = cluster.children.len();
            "Adding cluster"
        );

        let index = self.clusters.len();
        for node_index in grouped_nodes {
            let id = self.nodes[node_index].node.id.clone();
            self.node_lookup.remove(&(None, id.clone()));
            self.node_lookup.insert((Some(index), id), node_index);
            self.nodes[node_index].scope = Some(index);
        }
        let nested: Vec<String> = nested.into_iter().map(str::to_string).collect();
        for child in nested {
            self.cluster_parents.insert(child, cluster.id.clone());
        }
        self.cluster_lookup.insert(cluster.id.clone(), index);
        self.clusters.push(cluster);

        Ok(ClusterHandle(index))
    }

    /// Reject the new containment edges if they close a loop.
    ///
    /// The existing relation is acyclic, so any strongly connected component
    /// with more than one member must run through the new cluster.
    fn check_containment(&self, cluster: &str, nested: &[&str]) -> Result<(), GraphError> {
        let mut containment: DiGraphMap<&str, ()> = DiGraphMap::new();
        for (child, parent) in &self.cluster_parents {
            containment.add_edge(parent.as_str(), child.as_str(), ());
        }
        for child in nested {
            containment.add_edge(cluster, *child, ());
        }

        let cycle = tarjan_scc(&containment)
            .into_iter()
            .find(|component| component.len() > 1 && component.contains(&cluster));

        if let Some(mut members) = cycle {
            members.sort_unstable();
            return Err(GraphError::Cycle {
                cluster: cluster.to_string(),
                members: members.join(", "),
            });
        }

        Ok(())
    }

    /// Set a visual attribute; a later write to the same key wins
    pub fn set_attribute(
        &mut self,
        element: Element,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), GraphError> {
        let graph = self.name.clone();
        let unknown = || GraphError::UnknownHandle { graph };

        let attributes = match element {
            Element::Graph => &mut self.graph_attributes,
            Element::NodeDefaults => &mut self.node_defaults,
            Element::EdgeDefaults => &mut self.edge_defaults,
            Element::Node(NodeHandle(index)) => {
                &mut self.nodes.get_mut(index).ok_or_else(unknown)?.node.attributes
            }
            Element::Edge(EdgeHandle(index)) => {
                &mut self.edges.get_mut(index).ok_or_else(unknown)?.edge.attributes
            }
            Element::Cluster(ClusterHandle(index)) => {
                &mut self.clusters.get_mut(index).ok_or_else(unknown)?.attributes
            }
        };

        attributes.insert(key.into(), value.into());
        Ok(())
    }

    /// Check references that could only be resolved once the build finished
    pub fn validate(&self) -> Result<(), GraphError> {
        for (index, cluster) in self.clusters.iter().enumerate() {
            for child in &cluster.children {
                if self.member(index, child).is_none() {
                    return Err(GraphError::UnknownMember {
                        cluster: cluster.id.clone(),
                        member: child.clone(),
                    });
                }
            }
        }

        for resolved in &self.edges {
            for endpoint in [resolved.source, resolved.target] {
                if let Endpoint::Cluster(index) = endpoint
                    && self.anchor_node(index).is_none()
                {
                    return Err(GraphError::EmptyClusterEndpoint {
                        cluster: self.clusters[index].id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle.0).map(|placed| &placed.node)
    }

    pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.edges.get(handle.0).map(|resolved| &resolved.edge)
    }

    pub fn cluster(&self, handle: ClusterHandle) -> Option<&Cluster> {
        self.clusters.get(handle.0)
    }

    /// Id of the cluster directly enclosing a node
    pub fn node_scope(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes
            .get(handle.0)
            .and_then(|placed| placed.scope)
            .map(|scope| self.clusters[scope].id.as_str())
    }

    /// Id of the cluster directly enclosing a cluster
    pub fn cluster_parent(&self, id: &str) -> Option<&str> {
        self.cluster_parents.get(id).map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|placed| &placed.node)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().map(|resolved| &resolved.edge)
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub(crate) fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index].node
    }

    pub(crate) fn cluster_at(&self, index: usize) -> &Cluster {
        &self.clusters[index]
    }

    /// Indices of top-level nodes in insertion order
    pub(crate) fn top_level_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, placed)| placed.scope.is_none())
            .map(|(index, _)| index)
    }

    /// Indices of clusters without a parent in insertion order
    pub(crate) fn top_level_clusters(&self) -> impl Iterator<Item = usize> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| !self.cluster_parents.contains_key(&cluster.id))
            .map(|(index, _)| index)
    }

    /// Children of a cluster in declaration order
    pub(crate) fn members(&self, cluster: usize) -> impl Iterator<Item = Member> + '_ {
        self.clusters[cluster]
            .children
            .iter()
            .filter_map(move |child| self.member(cluster, child))
    }

    fn member(&self, cluster: usize, child: &str) -> Option<Member> {
        if let Some(&index) = self.node_lookup.get(&(Some(cluster), child.to_string())) {
            return Some(Member::Node(index));
        }
        self.cluster_lookup
            .get(child)
            .filter(|_| self.cluster_parents.get(child) == Some(&self.clusters[cluster].id))
            .map(|&index| Member::Cluster(index))
    }

    /// Edges with their resolved endpoints in insertion order
    pub(crate) fn resolved_edges(&self) -> impl Iterator<Item = (&Edge, Endpoint, Endpoint)> {
        self.edges
            .iter()
            .map(|resolved| (&resolved.edge, resolved.source, resolved.target))
    }

    /// First node found depth-first inside a cluster
    pub(crate) fn anchor_node(&self, cluster: usize) -> Option<usize> {
        self.members(cluster).find_map(|member| match member {
            Member::Node(index) => Some(index),
            Member::Cluster(nested) => self.anchor_node(nested),
        })
    }

    /// Identifier a node is emitted under.
    ///
    /// Ids shared by nodes in different scopes are qualified with their
    /// cluster; everything else keeps its bare id.
    pub(crate) fn emitted_node_id(&self, index: usize) -> String {
        let placed = &self.nodes[index];
        let shared = self
            .nodes
            .iter()
            .filter(|other| other.node.id == placed.node.id)
            .count()
            > 1;

        match placed.scope {
            Some(scope) if shared => self.qualified_id(scope, &placed.node.id),
            _ => placed.node.id.clone(),
        }
    }

    fn resolve(&self, reference: &str) -> Result<Endpoint, GraphError> {
        let unknown = || GraphError::UnknownEndpoint {
            endpoint: reference.to_string(),
        };

        // `cluster::id` names a clustered node, `::id` a top-level one
        if let Some((scope, id)) = reference.split_once(SCOPE_SEPARATOR) {
            let scope = if scope.is_empty() {
                None
            } else {
                Some(*self.cluster_lookup.get(scope).ok_or_else(unknown)?)
            };
            return self
                .node_lookup
                .get(&(scope, id.to_string()))
                .map(|&index| Endpoint::Node(index))
                .ok_or_else(unknown);
        }

        if let Some(&index) = self.cluster_lookup.get(reference) {
            return Ok(Endpoint::Cluster(index));
        }

        let matches: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, placed)| placed.node.id == reference)
            .map(|(index, _)| index)
            .collect();

        match matches.as_slice() {
            [] => Err(unknown()),
            [index] => Ok(Endpoint::Node(*index)),
            _ => Err(GraphError::AmbiguousEndpoint {
                endpoint: reference.to_string(),
                candidates: matches
                    .iter()
                    .map(|&index| match self.nodes[index].scope {
                        Some(scope) => self.qualified_id(scope, reference),
                        None => format!("{SCOPE_SEPARATOR}{reference}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    fn qualified_id(&self, scope: usize, id: &str) -> String {
        format!("{}{SCOPE_SEPARATOR}{id}", self.clusters[scope].id)
    }

    fn scope_name(&self, scope: Option<usize>) -> String {
        match scope {
            Some(index) => format!("cluster '{}'", self.clusters[index].id),
            None => "the top level".to_string(),
        }
    }

    fn scope_label(&self, scope: Option<usize>) -> String {
        match scope {
            Some(index) => self.clusters[index].id.clone(),
            None => "the top level".to_string(),
        }
    }
}

fn validate_id(id: &str) -> Result<(), GraphError> {
    if id.is_empty() {
        return Err(GraphError::InvalidId {
            id: id.to_string(),
            reason: "identifiers cannot be empty",
        });
    }
    if id.contains(SCOPE_SEPARATOR) {
        return Err(GraphError::InvalidId {
            id: id.to_string(),
            reason: "identifiers cannot contain '::'",
        });
    }
    Ok(())
}
