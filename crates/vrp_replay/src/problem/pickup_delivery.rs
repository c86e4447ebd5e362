use serde::Serialize;

use crate::problem::node::NodeIdx;

/// A pickup and the delivery its load is dropped off at. Both nodes live in
/// the instance; the pair only references them.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickupDeliveryPair {
    pickup: NodeIdx,
    delivery: NodeIdx,
}

impl PickupDeliveryPair {
    pub fn new(pickup: NodeIdx, delivery: NodeIdx) -> Self {
        PickupDeliveryPair { pickup, delivery }
    }

    pub fn pickup(&self) -> NodeIdx {
        self.pickup
    }

    pub fn delivery(&self) -> NodeIdx {
        self.delivery
    }
}
