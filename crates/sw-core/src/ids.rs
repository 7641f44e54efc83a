//! Typed indices for agents, obstacles and targets.
//!
//! Every entity is created at startup and lives for the whole run, so an id
//! is simply its position in the owning `Vec`.  Code compares ids, never
//! references, to decide whether two values describe the same entity.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Id of the entity stored at `index`.
            #[inline]
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Ids `0..count` in ascending order.
            pub fn range(count: usize) -> impl DoubleEndedIterator<Item = Self> {
                (0..count as u32).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

typed_id! {
    /// Index into the structure-of-arrays agent store.
    AgentId, "agent"
}

typed_id! {
    /// Index of an oscillating obstacle.
    ObstacleId, "obstacle"
}

typed_id! {
    /// Index of a goal site.
    TargetId, "target"
}
