//! Goal sites.

use sw_core::{TargetId, Vec2};

/// A goal site.  `claimed` flips to `true` when the first agent arrives.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub id:       TargetId,
    pub position: Vec2,
    pub claimed:  bool,
}

impl Target {
    pub fn new(id: TargetId, position: Vec2) -> Self {
        Self { id, position, claimed: false }
    }

    /// Build one target per position, ids assigned in order.
    pub fn from_positions(positions: &[Vec2]) -> Vec<Target> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Target::new(TargetId::from_index(i), p))
            .collect()
    }
}

/// Nearest target not yet claimed.  Ties go to the first one in scan order.
pub fn nearest_unclaimed(from: Vec2, targets: &[Target]) -> Option<&Target> {
    nearest_by(from, targets.iter().filter(|t| !t.claimed))
}

/// Nearest target regardless of claim state.  Ties go to the first one.
pub fn nearest_target(from: Vec2, targets: &[Target]) -> Option<&Target> {
    nearest_by(from, targets.iter())
}

fn nearest_by<'a>(from: Vec2, candidates: impl Iterator<Item = &'a Target>) -> Option<&'a Target> {
    let mut best: Option<(&Target, f64)> = None;
    for t in candidates {
        let d = from.distance(t.position);
        // Strict `<` keeps the first of equally distant targets.
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((t, d));
        }
    }
    best.map(|(t, _)| t)
}
