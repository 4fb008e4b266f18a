//! # Skeleton Graph Arena
//!
//! Index-addressed roofline graph. Nodes carry 3D positions (y is the
//! wavefront height); arcs connect nodes and are labeled with the contour
//! edge bounding them on each side. Indices replace the pointer-cyclic
//! winged-edge structure of the source design, so event-driven mutation
//! never fights the borrow checker or dangling references.

use config::constants::VERTEX_MERGE_EPSILON;
use glam::DVec3;

/// Index of a node in the skeleton graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Index of an arc in the skeleton graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcId(pub u32);

/// A roofline vertex: footprint (x, z) plus wavefront height y.
#[derive(Debug, Clone)]
pub struct SkelNode {
    /// 3D position; `y` is the height at which the node was created.
    pub position: DVec3,
}

/// A roofline arc between two nodes.
///
/// `left_face` / `right_face` are contour edge indices: the facets grown
/// from those eave edges border this arc on each side.
#[derive(Debug, Clone)]
pub struct SkelArc {
    /// One endpoint.
    pub a: NodeId,
    /// The other endpoint.
    pub b: NodeId,
    /// Contour edge whose facet lies left of `a -> b`.
    pub left_face: u32,
    /// Contour edge whose facet lies right of `a -> b`.
    pub right_face: u32,
}

/// The roofline network produced by the wavefront.
#[derive(Debug, Clone, Default)]
pub struct SkeletonGraph {
    /// All nodes; the first N are the eave ring at height 0.
    pub nodes: Vec<SkelNode>,
    /// All arcs.
    pub arcs: Vec<SkelArc>,
}

impl SkeletonGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without merging. Used for the eave ring, whose vertices
    /// are known distinct.
    pub fn add_node(&mut self, position: DVec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SkelNode { position });
        id
    }

    /// Adds a node, reusing any existing node within merge tolerance.
    ///
    /// Simultaneous wavefront events (a pyramid apex, a hexagon peak) land
    /// on the same point from different source vertices; sharing one node
    /// keeps facet loops chainable by id.
    pub fn add_node_merged(&mut self, position: DVec3) -> NodeId {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.position.distance(position) < VERTEX_MERGE_EPSILON {
                return NodeId(i as u32);
            }
        }
        self.add_node(position)
    }

    /// Adds an arc. Self-loops (merged endpoints) and duplicates of an
    /// existing arc are dropped.
    pub fn add_arc(&mut self, a: NodeId, b: NodeId, left_face: u32, right_face: u32) {
        if a == b {
            return;
        }
        if self
            .arcs
            .iter()
            .any(|arc| (arc.a == a && arc.b == b) || (arc.a == b && arc.b == a))
        {
            return;
        }
        self.arcs.push(SkelArc {
            a,
            b,
            left_face,
            right_face,
        });
    }

    /// Position of a node.
    #[inline]
    pub fn position(&self, id: NodeId) -> DVec3 {
        self.nodes[id.0 as usize].position
    }

    /// Greatest node height in the graph.
    pub fn max_height(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.position.y)
            .fold(0.0, f64::max)
    }

    /// Chains the arcs labeled with `face` into a path from `from` to `to`.
    ///
    /// Returns the interior nodes of the path (excluding both endpoints),
    /// ordered from `from` towards `to`. Fails if the arcs do not form one
    /// unbranched chain between the endpoints.
    pub fn chain_face(&self, face: u32, from: NodeId, to: NodeId) -> Result<Vec<NodeId>, String> {
        let mut incident: Vec<(NodeId, NodeId)> = Vec::new();
        for arc in &self.arcs {
            if arc.left_face == face || arc.right_face == face {
                incident.push((arc.a, arc.b));
            }
        }
        if incident.is_empty() {
            return Err(format!("facet {face} has no skeleton arcs"));
        }

        let mut path = Vec::new();
        let mut current = from;
        let mut previous: Option<NodeId> = None;

        loop {
            let mut next: Option<NodeId> = None;
            for &(a, b) in &incident {
                let candidate = if a == current {
                    b
                } else if b == current {
                    a
                } else {
                    continue;
                };
                if Some(candidate) == previous {
                    continue;
                }
                if next.is_some() {
                    return Err(format!("facet {face} branches at node {}", current.0));
                }
                next = Some(candidate);
            }
            let Some(next) = next else {
                return Err(format!("facet {face} dead-ends at node {}", current.0));
            };
            if next == to {
                return Ok(path);
            }
            if path.len() > self.arcs.len() {
                return Err(format!("facet {face} does not close"));
            }
            path.push(next);
            previous = Some(current);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_nodes_share_an_id() {
        let mut graph = SkeletonGraph::new();
        let a = graph.add_node_merged(DVec3::new(1.0, 2.0, 3.0));
        let b = graph.add_node_merged(DVec3::new(1.0, 2.0, 3.0 + 1e-8));
        assert_eq!(a, b);
        assert_eq!(graph.nodes.len(), 1);
    }

    #[test]
    fn test_self_loop_arcs_are_dropped() {
        let mut graph = SkeletonGraph::new();
        let a = graph.add_node(DVec3::ZERO);
        graph.add_arc(a, a, 0, 1);
        assert!(graph.arcs.is_empty());
    }

    #[test]
    fn test_chain_face_orders_interior_nodes() {
        // Gable-style facet: eave (e0, e1), ridge (r0, r1).
        let mut graph = SkeletonGraph::new();
        let e0 = graph.add_node(DVec3::new(0.0, 0.0, 0.0));
        let e1 = graph.add_node(DVec3::new(10.0, 0.0, 0.0));
        let r1 = graph.add_node(DVec3::new(8.0, 2.0, 3.0));
        let r0 = graph.add_node(DVec3::new(2.0, 2.0, 3.0));
        graph.add_arc(e1, r1, 0, 1);
        graph.add_arc(r1, r0, 2, 0);
        graph.add_arc(r0, e0, 0, 3);

        let path = graph.chain_face(0, e1, e0).unwrap();
        assert_eq!(path, vec![r1, r0]);
    }

    #[test]
    fn test_chain_face_reports_broken_loops() {
        let mut graph = SkeletonGraph::new();
        let e0 = graph.add_node(DVec3::ZERO);
        let e1 = graph.add_node(DVec3::X);
        let stray = graph.add_node(DVec3::new(5.0, 1.0, 0.0));
        graph.add_arc(e1, stray, 0, 1);
        // Chain never reaches e0.
        assert!(graph.chain_face(0, e1, e0).is_err());
        // And a face with no arcs at all is explicit.
        assert!(graph.chain_face(9, e0, e1).is_err());
    }
}
