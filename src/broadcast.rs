use std::sync::Arc;

use crate::interface_stack::InterfaceStack;
use crate::port::next_port_id;

/// A `Port` that fans a frame out to every registered `Interface`
/// except an optional ingress. The switch's miss-default and its
/// true-broadcast path both route through the single process-wide
/// `Broadcast` instance.
pub struct Broadcast {
    id: u64,
    stack: Arc<InterfaceStack>,
}

impl Broadcast {
    pub fn new(stack: Arc<InterfaceStack>) -> Self {
        Self {
            id: next_port_id(),
            stack,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Iterate the `InterfaceStack` in registration order, handing
    /// `frame` to each `Interface::send` in turn; the ingress filter
    /// naturally excludes the ingress interface.
    pub fn send(&self, frame: &[u8], ingress: Option<u64>) {
        for iface in self.stack.snapshot() {
            iface.send(frame, ingress);
        }
    }
}
