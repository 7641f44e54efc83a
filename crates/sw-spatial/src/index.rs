//! Neighbour radius queries.
//!
//! # Semantics
//!
//! A candidate is a neighbour of the reference agent iff
//!
//! - it is a different agent (compared by `AgentId`), and
//! - its Euclidean distance is **strictly** less than the radius.
//!
//! A candidate exactly `radius` away is not a neighbour.  Results are
//! returned in ascending `AgentId` order so every float sum built from them
//! is reproducible.
//!
//! # Spatial index
//!
//! [`NeighborIndex`] bulk-loads an R-tree (via `rstar`) over the frozen
//! previous-tick positions once per tick.  [`within_radius`] is the linear
//! O(n) reference scan with identical results, used by tests and handy for
//! very small populations.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use sw_core::{AgentId, Vec2};

// ── R-tree agent entry ────────────────────────────────────────────────────────

#[derive(Clone)]
struct AgentEntry {
    point: [f64; 2],
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NeighborIndex ─────────────────────────────────────────────────────────────

/// R-tree over agent positions, rebuilt each tick from the frozen buffer.
pub struct NeighborIndex {
    tree:      RTree<AgentEntry>,
    positions: Vec<Vec2>,
}

impl NeighborIndex {
    /// Bulk-load the index.  `positions[i]` belongs to `AgentId(i)`.
    pub fn build(positions: &[Vec2]) -> Self {
        let entries: Vec<AgentEntry> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| AgentEntry { point: p.as_array(), id: AgentId::from_index(i) })
            .collect();
        Self { tree: RTree::bulk_load(entries), positions: positions.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Neighbours of `agent` within `radius` of its indexed position.
    pub fn neighbors(&self, agent: AgentId, radius: f64) -> Vec<AgentId> {
        match self.positions.get(agent.index()) {
            Some(&center) => self.within(center, radius, Some(agent)),
            None => Vec::new(),
        }
    }

    /// Agents strictly within `radius` of `center`, skipping `exclude`.
    pub fn within(&self, center: Vec2, radius: f64, exclude: Option<AgentId>) -> Vec<AgentId> {
        if !(radius > 0.0) {
            return Vec::new();
        }
        let r2 = radius * radius;
        let mut out: Vec<AgentId> = self
            .tree
            // rstar's bound is inclusive; the strict test below drops the rim.
            .locate_within_distance(center.as_array(), r2)
            .filter(|e| Some(e.id) != exclude)
            .filter(|e| center.distance(self.positions[e.id.index()]) < radius)
            .map(|e| e.id)
            .collect();
        out.sort_unstable();
        out
    }
}

// ── Linear scan ───────────────────────────────────────────────────────────────

/// O(n) reference query with the same semantics as [`NeighborIndex::neighbors`].
pub fn within_radius(positions: &[Vec2], agent: AgentId, radius: f64) -> Vec<AgentId> {
    let Some(&center) = positions.get(agent.index()) else {
        return Vec::new();
    };
    positions
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != agent.index())
        .filter(|&(_, &p)| center.distance(p) < radius)
        .map(|(i, _)| AgentId::from_index(i))
        .collect()
}
