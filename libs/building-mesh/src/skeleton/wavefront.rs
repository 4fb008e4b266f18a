//! # Wavefront Propagation
//!
//! Event-driven construction of the straight skeleton. Every contour edge
//! owns an inward-moving wavefront edge; the sweep parameter is the roof
//! height, so an edge with slope `a` advances at `cot(a)` meters of plan
//! distance per meter of height and the skeleton nodes fall out with
//! `y = distance-to-eave * tan(slope)` for free.
//!
//! Two event kinds drive the sweep: an **edge event** fires when a
//! wavefront edge's endpoints meet (the edge has shrunk to nothing), a
//! **split event** fires when a reflex vertex runs into the moving offset
//! line of a non-adjacent edge and cuts the active loop in two. The queue
//! is lazily validated: stale events are recognized and skipped when
//! popped, never purged eagerly.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use config::constants::{EPSILON, MAX_SKELETON_EVENTS, VERTEX_MERGE_EPSILON};
use glam::{DVec2, DVec3};

use crate::error::MeshError;

use super::graph::{NodeId, SkeletonGraph};

/// One source contour edge, fixed for the whole sweep.
#[derive(Debug, Clone)]
pub(super) struct ContourEdge {
    /// Start vertex of the edge.
    pub origin: DVec2,
    /// Unit direction along the edge.
    pub dir: DVec2,
    /// Unit inward normal.
    pub normal: DVec2,
    /// Plan-offset speed per meter of height: `cot(slope)`.
    pub speed: f64,
}

/// A vertex of the moving wavefront.
#[derive(Debug, Clone)]
struct WfVertex {
    /// Position at creation time `t0`.
    pos: DVec2,
    /// Height at which this vertex was created.
    t0: f64,
    /// Plan velocity per meter of height.
    vel: DVec2,
    /// Skeleton node where this vertex's trace starts.
    node: NodeId,
    /// Contour edge bounding the facet on the left of the trace.
    left_face: u32,
    /// Contour edge bounding the facet on the right of the trace.
    right_face: u32,
    prev: usize,
    next: usize,
    alive: bool,
    reflex: bool,
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
    Edge { u: usize, w: usize },
    Split { u: usize, edge: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Event {
    t: f64,
    kind: EventKind,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.t.total_cmp(&other.t) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.t.total_cmp(&other.t)
    }
}

/// The active wavefront: contour data, vertex arena, event queue.
pub(super) struct Wavefront {
    edges: Vec<ContourEdge>,
    verts: Vec<WfVertex>,
    queue: BinaryHeap<Reverse<Event>>,
    live: usize,
}

impl Wavefront {
    /// Builds the initial wavefront from a counter-clockwise ring.
    ///
    /// Eave nodes are added to `graph` first, in ring order, so
    /// `NodeId(i)` is footprint vertex `i`.
    pub(super) fn new(
        ring: &[DVec2],
        edges: Vec<ContourEdge>,
        graph: &mut SkeletonGraph,
    ) -> Self {
        let n = ring.len();
        let mut wavefront = Self {
            edges,
            verts: Vec::with_capacity(n * 2),
            queue: BinaryHeap::new(),
            live: 0,
        };

        for (i, &p) in ring.iter().enumerate() {
            let node = graph.add_node(DVec3::new(p.x, 0.0, p.y));
            let left_face = ((i + n - 1) % n) as u32;
            let right_face = i as u32;
            let vel = wavefront.velocity(left_face, right_face);
            let reflex = wavefront.is_reflex(left_face, right_face);
            wavefront.verts.push(WfVertex {
                pos: p,
                t0: 0.0,
                vel,
                node,
                left_face,
                right_face,
                prev: (i + n - 1) % n,
                next: (i + 1) % n,
                alive: true,
                reflex,
            });
            wavefront.live += 1;
        }

        for u in 0..n {
            wavefront.push_edge_event(u);
            wavefront.push_split_events(u);
        }
        wavefront
    }

    fn velocity(&self, left_face: u32, right_face: u32) -> DVec2 {
        let ea = &self.edges[left_face as usize];
        let eb = &self.edges[right_face as usize];
        let det = ea.normal.perp_dot(eb.normal);
        if det.abs() < EPSILON {
            // Parallel roof planes meet in no unique line; keep the
            // wavefront moving with both constraints nearly satisfied.
            ea.normal * ((ea.speed + eb.speed) * 0.5)
        } else {
            DVec2::new(
                (ea.speed * eb.normal.y - eb.speed * ea.normal.y) / det,
                (eb.speed * ea.normal.x - ea.speed * eb.normal.x) / det,
            )
        }
    }

    fn is_reflex(&self, left_face: u32, right_face: u32) -> bool {
        self.edges[left_face as usize]
            .dir
            .perp_dot(self.edges[right_face as usize].dir)
            < -EPSILON
    }

    fn pos_at(&self, v: usize, t: f64) -> DVec2 {
        let vert = &self.verts[v];
        vert.pos + (t - vert.t0) * vert.vel
    }

    /// Height at which the wavefront edge behind `u` collapses, if ever.
    fn edge_event_time(&self, u: usize, w: usize) -> Option<f64> {
        let vu = &self.verts[u];
        let vw = &self.verts[w];
        let d = self.edges[vu.right_face as usize].dir;
        let base_u = vu.pos - vu.t0 * vu.vel;
        let base_w = vw.pos - vw.t0 * vw.vel;
        let c0 = (base_w - base_u).dot(d);
        let c1 = (vw.vel - vu.vel).dot(d);
        if c1 >= -EPSILON {
            return None; // gap is not shrinking
        }
        let t = -c0 / c1;
        if t + EPSILON < vu.t0.max(vw.t0) {
            return None;
        }
        Some(t)
    }

    fn push_edge_event(&mut self, u: usize) {
        let w = self.verts[u].next;
        if w == u {
            return;
        }
        if let Some(t) = self.edge_event_time(u, w) {
            self.queue.push(Reverse(Event {
                t,
                kind: EventKind::Edge { u, w },
            }));
        }
    }

    fn push_split_events(&mut self, u: usize) {
        if !self.verts[u].reflex {
            return;
        }
        let vu = self.verts[u].clone();
        let base = vu.pos - vu.t0 * vu.vel;
        for e in 0..self.edges.len() as u32 {
            if e == vu.left_face || e == vu.right_face {
                continue;
            }
            let edge = &self.edges[e as usize];
            let c0 = edge.normal.dot(base - edge.origin);
            let c1 = edge.normal.dot(vu.vel) - edge.speed;
            if c1 >= -EPSILON {
                continue; // vertex never catches this offset line
            }
            let t = -c0 / c1;
            if t + EPSILON < vu.t0 {
                continue;
            }
            self.queue.push(Reverse(Event {
                t,
                kind: EventKind::Split { u, edge: e },
            }));
        }
    }

    fn kill(&mut self, v: usize) {
        if self.verts[v].alive {
            self.verts[v].alive = false;
            self.live -= 1;
        }
    }

    fn spawn(
        &mut self,
        pos: DVec2,
        t: f64,
        node: NodeId,
        left_face: u32,
        right_face: u32,
        prev: usize,
        next: usize,
    ) -> usize {
        let vel = self.velocity(left_face, right_face);
        let reflex = self.is_reflex(left_face, right_face);
        let idx = self.verts.len();
        self.verts.push(WfVertex {
            pos,
            t0: t,
            vel,
            node,
            left_face,
            right_face,
            prev,
            next,
            alive: true,
            reflex,
        });
        self.verts[prev].next = idx;
        self.verts[next].prev = idx;
        self.live += 1;
        idx
    }

    fn loop_len(&self, start: usize) -> usize {
        let mut len = 1;
        let mut v = self.verts[start].next;
        while v != start && len <= self.verts.len() {
            len += 1;
            v = self.verts[v].next;
        }
        len
    }

    /// Emits the ridge arc between the last two vertices of a loop and
    /// retires them.
    fn terminate_pair(&mut self, a: usize, graph: &mut SkeletonGraph) {
        let b = self.verts[a].next;
        let (na, nb) = (self.verts[a].node, self.verts[b].node);
        graph.add_arc(na, nb, self.verts[a].left_face, self.verts[a].right_face);
        self.kill(a);
        self.kill(b);
    }

    /// Merges neighbors that sit on the event point into vertex `x`,
    /// emitting their arcs. Handles simultaneous events collapsing onto one
    /// node, like every edge of a regular polygon meeting at the peak.
    fn cascade_merge(&mut self, x: usize, t: f64, node: NodeId, graph: &mut SkeletonGraph) {
        let p = self.pos_at(x, t);
        loop {
            let prev = self.verts[x].prev;
            if prev == x || !self.verts[prev].alive {
                break;
            }
            if self.pos_at(prev, t).distance(p) >= VERTEX_MERGE_EPSILON {
                break;
            }
            let merged = self.verts[prev].clone();
            graph.add_arc(merged.node, node, merged.left_face, merged.right_face);
            self.kill(prev);
            self.verts[x].prev = merged.prev;
            self.verts[merged.prev].next = x;
            self.verts[x].left_face = merged.left_face;
        }
        loop {
            let next = self.verts[x].next;
            if next == x || !self.verts[next].alive {
                break;
            }
            if self.pos_at(next, t).distance(p) >= VERTEX_MERGE_EPSILON {
                break;
            }
            let merged = self.verts[next].clone();
            graph.add_arc(merged.node, node, merged.left_face, merged.right_face);
            self.kill(next);
            self.verts[x].next = merged.next;
            self.verts[merged.next].prev = x;
            self.verts[x].right_face = merged.right_face;
        }
        // Faces may have widened; the velocity must follow.
        let (lf, rf) = (self.verts[x].left_face, self.verts[x].right_face);
        self.verts[x].vel = self.velocity(lf, rf);
        self.verts[x].reflex = self.is_reflex(lf, rf);
    }

    fn handle_edge_event(&mut self, t: f64, u: usize, w: usize, graph: &mut SkeletonGraph) {
        if !self.verts[u].alive || !self.verts[w].alive || self.verts[u].next != w {
            return; // stale
        }
        // The pair may have been relinked since the event was queued;
        // accept only if the collapse time still matches.
        match self.edge_event_time(u, w) {
            Some(t2) if (t2 - t).abs() < 1e-7 => {}
            Some(t2) => {
                self.queue.push(Reverse(Event {
                    t: t2,
                    kind: EventKind::Edge { u, w },
                }));
                return;
            }
            None => return,
        }

        if self.verts[w].next == u {
            self.terminate_pair(u, graph);
            return;
        }

        let p = (self.pos_at(u, t) + self.pos_at(w, t)) * 0.5;
        let node = graph.add_node_merged(DVec3::new(p.x, t, p.y));
        graph.add_arc(
            self.verts[u].node,
            node,
            self.verts[u].left_face,
            self.verts[u].right_face,
        );
        graph.add_arc(
            self.verts[w].node,
            node,
            self.verts[w].left_face,
            self.verts[w].right_face,
        );

        let prev = self.verts[u].prev;
        let next = self.verts[w].next;
        let left_face = self.verts[u].left_face;
        let right_face = self.verts[w].right_face;
        self.kill(u);
        self.kill(w);
        let x = self.spawn(p, t, node, left_face, right_face, prev, next);

        self.cascade_merge(x, t, node, graph);
        self.settle(x, graph);
    }

    fn handle_split_event(&mut self, t: f64, u: usize, edge: u32, graph: &mut SkeletonGraph) {
        if !self.verts[u].alive {
            return;
        }
        let p = self.pos_at(u, t);
        let d = self.edges[edge as usize].dir;

        // Locate the live wavefront segment of the split edge within u's
        // loop and check the hit point lies inside it.
        let mut x = self.verts[u].next;
        let mut found: Option<usize> = None;
        while x != u {
            if self.verts[x].right_face == edge {
                let a = self.pos_at(x, t);
                let b = self.pos_at(self.verts[x].next, t);
                let s = (p - a).dot(d);
                let len = (b - a).dot(d);
                if s >= -VERTEX_MERGE_EPSILON && s <= len + VERTEX_MERGE_EPSILON {
                    found = Some(x);
                    break;
                }
            }
            x = self.verts[x].next;
        }
        let Some(x) = found else {
            return; // stale: the edge's wavefront is gone or elsewhere
        };
        let y = self.verts[x].next;

        let node = graph.add_node_merged(DVec3::new(p.x, t, p.y));
        graph.add_arc(
            self.verts[u].node,
            node,
            self.verts[u].left_face,
            self.verts[u].right_face,
        );

        let pu = self.verts[u].prev;
        let nu = self.verts[u].next;
        let u_left = self.verts[u].left_face;
        let u_right = self.verts[u].right_face;
        self.kill(u);

        // Loop A keeps prev(u) and the tail of the split edge.
        let w1 = self.spawn(p, t, node, u_left, edge, pu, y);
        // Loop B keeps the head of the split edge and next(u).
        let w2 = self.spawn(p, t, node, edge, u_right, x, nu);

        self.settle(w1, graph);
        if self.verts[w2].alive {
            self.settle(w2, graph);
        }
    }

    /// Post-event bookkeeping for a freshly created vertex: retire tiny
    /// loops, otherwise queue the events its new neighborhood can produce.
    fn settle(&mut self, x: usize, graph: &mut SkeletonGraph) {
        if !self.verts[x].alive {
            return;
        }
        if self.verts[x].next == x {
            self.kill(x);
            return;
        }
        if self.loop_len(x) == 2 {
            self.terminate_pair(x, graph);
            return;
        }
        let prev = self.verts[x].prev;
        self.push_edge_event(prev);
        self.push_edge_event(x);
        self.push_split_events(x);
    }

    /// Runs the sweep to completion.
    pub(super) fn propagate(&mut self, graph: &mut SkeletonGraph) -> Result<(), MeshError> {
        let mut processed = 0usize;
        while let Some(Reverse(event)) = self.queue.pop() {
            processed += 1;
            if processed > MAX_SKELETON_EVENTS {
                return Err(MeshError::skeleton("event budget exhausted"));
            }
            match event.kind {
                EventKind::Edge { u, w } => self.handle_edge_event(event.t, u, w, graph),
                EventKind::Split { u, edge } => {
                    self.handle_split_event(event.t, u, edge, graph)
                }
            }
            if self.live == 0 {
                break;
            }
        }
        if self.live != 0 {
            return Err(MeshError::skeleton(format!(
                "wavefront did not fully collapse ({} vertices left)",
                self.live
            )));
        }
        Ok(())
    }
}
