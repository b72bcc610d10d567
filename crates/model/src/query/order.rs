use serde::{Deserialize, Serialize};

/// Order in which the cluster returns hits over a scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOrder {
    /// Index order, the cheapest order for a scroll.
    #[default]
    Index,

    /// Random order, scored per hit by the cluster.
    Random,
}
