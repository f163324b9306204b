//! The common capability set shared by every frame sink known to the
//! switch: a physical [`Interface`](crate::interface::Interface), the
//! all-interfaces [`Broadcast`](crate::broadcast::Broadcast), and a
//! per-group [`Multicast`](crate::multicast::Multicast).
//!
//! Rather than model these as an inheritance hierarchy, `Port` is a
//! tagged variant over `Arc`-shared handles, dispatched by id. The id
//! is what the ingress filter compares against — never pointer
//! identity — so the "do not reflect a frame onto its ingress" check
//! is unambiguous across variants.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::broadcast::Broadcast;
use crate::interface::Interface;
use crate::multicast::Multicast;

static NEXT_PORT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate the next process-unique, monotonically increasing port id.
///
/// Id 0 is reserved (never handed out) so that `PortId` fields that
/// default to 0 can be distinguished from a real, constructed port.
pub fn next_port_id() -> u64 {
    NEXT_PORT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A frame sink. Cheap to clone: each variant wraps an `Arc`, so a
/// `Port` value is a shared handle, not an owner — ownership lives in
/// `InterfaceStack` (for `Interface`) or `MulticastStack` (for
/// `Multicast`).
#[derive(Clone)]
pub enum Port {
    Interface(Arc<Interface>),
    Broadcast(Arc<Broadcast>),
    Multicast(Arc<Multicast>),
}

impl Port {
    pub fn id(&self) -> u64 {
        match self {
            Port::Interface(i) => i.id(),
            Port::Broadcast(b) => b.id(),
            Port::Multicast(m) => m.id(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Port::Interface(i) => i.name().to_string(),
            Port::Broadcast(_) => "broadcast".to_string(),
            Port::Multicast(m) => format!("mcast({})", crate::frame::group_to_dotted(m.group())),
        }
    }

    /// Two ports are the same port iff their ids match.
    pub fn same(&self, other: &Port) -> bool {
        self.id() == other.id()
    }

    /// Send `frame`, suppressing delivery back onto `ingress` if this
    /// port's id matches it.
    pub fn send(&self, frame: &[u8], ingress: Option<u64>) {
        match self {
            Port::Interface(i) => i.send(frame, ingress),
            Port::Broadcast(b) => b.send(frame, ingress),
            Port::Multicast(m) => m.send(frame, ingress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_unique() {
        let a = next_port_id();
        let b = next_port_id();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
