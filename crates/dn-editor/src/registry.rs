//! Lookup from node id to the node that owns it.
//!
//! Bindings only remember ids. When an event arrives the dispatcher asks
//! the registry for the node, so ownership stays with the caller.

use dn_core::{InteractiveNode, NodeId};
use std::collections::HashMap;

pub trait NodeRegistry {
    fn node_mut(&mut self, id: NodeId) -> Option<&mut dyn InteractiveNode>;
}

impl<N: InteractiveNode> NodeRegistry for Vec<N> {
    fn node_mut(&mut self, id: NodeId) -> Option<&mut dyn InteractiveNode> {
        self.iter_mut()
            .find(|n| n.id() == id)
            .map(|n| n as &mut dyn InteractiveNode)
    }
}

impl<N: InteractiveNode> NodeRegistry for HashMap<NodeId, N> {
    fn node_mut(&mut self, id: NodeId) -> Option<&mut dyn InteractiveNode> {
        self.get_mut(&id).map(|n| n as &mut dyn InteractiveNode)
    }
}
