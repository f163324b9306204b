use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use crate::interface::Interface;
use crate::port::next_port_id;

/// A `Port` that fans a frame out to the elected querier plus the
/// current member set for one IPv4 group. Holds a non-owning [`Weak`]
/// reference back to its owning [`MulticastStack`] so it can read the
/// live querier on every send and trigger `MulticastStack::cleanup`
/// after a member leaves — this is the "cyclic reference" the design
/// notes call out, broken by making the back-edge non-owning.
pub struct Multicast {
    id: u64,
    group: u32,
    members: RwLock<HashMap<u64, Arc<Interface>>>,
    stack: Weak<MulticastStack>,
}

impl Multicast {
    fn new(group: u32, stack: Weak<MulticastStack>) -> Self {
        Self {
            id: next_port_id(),
            group,
            members: RwLock::new(HashMap::new()),
            stack,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().expect("poisoned").is_empty()
    }

    pub fn members(&self) -> Vec<Arc<Interface>> {
        self.members.read().expect("poisoned").values().cloned().collect()
    }

    pub fn add(&self, iface: Arc<Interface>) {
        self.members.write().expect("poisoned").insert(iface.id(), iface);
    }

    /// Remove `iface_id` from the member set, then let the owning
    /// stack drop this group if it is now empty.
    pub fn remove(&self, iface_id: u64) {
        self.members.write().expect("poisoned").remove(&iface_id);
        if let Some(stack) = self.stack.upgrade() {
            stack.cleanup();
        }
    }

    /// Requires a recorded querier. Transmits to the querier first,
    /// then to every current member, applying the ingress filter each
    /// time. A non-ingress querier that is also a member receives the
    /// frame twice — the source this is ported from does the same,
    /// unconditionally; see DESIGN.md for the call to keep that
    /// behavior rather than deduplicate.
    pub fn send(&self, frame: &[u8], ingress: Option<u64>) {
        let Some(stack) = self.stack.upgrade() else {
            return;
        };
        let Some(querier) = stack.querier() else {
            return;
        };
        querier.send(frame, ingress);
        for member in self.members.read().expect("poisoned").values() {
            member.send(frame, ingress);
        }
    }
}

/// group→[`Multicast`] registry plus the single elected IGMP querier.
pub struct MulticastStack {
    groups: RwLock<HashMap<u32, Arc<Multicast>>>,
    querier: RwLock<Option<Arc<Interface>>>,
    broadcast: Arc<crate::broadcast::Broadcast>,
}

impl MulticastStack {
    pub fn new(broadcast: Arc<crate::broadcast::Broadcast>) -> Arc<Self> {
        Arc::new(Self {
            groups: RwLock::new(HashMap::new()),
            querier: RwLock::new(None),
            broadcast,
        })
    }

    pub fn querier(&self) -> Option<Arc<Interface>> {
        self.querier.read().expect("poisoned").clone()
    }

    /// Record `querier` as the elected IGMP querier (overwriting any
    /// prior election) and fan the query frame to every interface,
    /// with `querier` as ingress.
    pub fn send_query(&self, querier: Arc<Interface>, frame: &[u8]) {
        let id = querier.id();
        *self.querier.write().expect("poisoned") = Some(querier);
        self.broadcast.send(frame, Some(id));
    }

    /// Forward `frame` to the recorded querier, if any, applying the
    /// ingress filter. Silently dropped when no querier is recorded.
    pub fn send_response(&self, frame: &[u8], ingress: u64) {
        if let Some(querier) = self.querier() {
            querier.send(frame, Some(ingress));
        }
    }

    /// Get-or-create the [`Multicast`] for `group`. Requires a
    /// recorded querier; returns `None` otherwise without creating an
    /// entry.
    pub fn get_or_create(self: &Arc<Self>, group: u32) -> Option<Arc<Multicast>> {
        if self.querier().is_none() {
            return None;
        }
        let mut groups = self.groups.write().expect("poisoned");
        let entry = groups
            .entry(group)
            .or_insert_with(|| Arc::new(Multicast::new(group, Arc::downgrade(self))));
        Some(entry.clone())
    }

    pub fn find(&self, group: u32) -> Option<Arc<Multicast>> {
        self.groups.read().expect("poisoned").get(&group).cloned()
    }

    /// Remove and destroy every group whose member set is empty.
    pub fn cleanup(&self) {
        self.groups.write().expect("poisoned").retain(|_, m| !m.is_empty());
    }

    /// `GroupAddr  Ifaces` table: per group, the dotted address
    /// followed by `*querier-name, iface, …`.
    pub fn render(&self) -> String {
        let groups = self.groups.read().expect("poisoned");
        let querier = self.querier();
        let mut out = String::from("GroupAddr  Ifaces\n");
        let mut rows: Vec<(u32, Arc<Multicast>)> =
            groups.iter().map(|(&g, m)| (g, m.clone())).collect();
        rows.sort_by_key(|(g, _)| *g);
        for (group, mc) in rows {
            let mut names = Vec::new();
            if let Some(q) = &querier {
                names.push(format!("*{}", q.name()));
            }
            for member in mc.members() {
                names.push(member.name().to_string());
            }
            out.push_str(&format!(
                "{}\t{}\n",
                crate::frame::group_to_dotted(group),
                names.join(", ")
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_io::fake::FakeFrameIo;
    use crate::interface_stack::InterfaceStack;

    fn interface(name: &str) -> Arc<Interface> {
        Arc::new(Interface::new(name, Box::new(FakeFrameIo::new())))
    }

    fn stack() -> Arc<MulticastStack> {
        let ifaces = Arc::new(InterfaceStack::new());
        let bc = Arc::new(crate::broadcast::Broadcast::new(ifaces));
        MulticastStack::new(bc)
    }

    #[test]
    fn get_or_create_requires_querier() {
        let stack = stack();
        assert!(stack.get_or_create(0xE0010203).is_none());
        let a = interface("a");
        stack.send_query(a, &[0u8; 8]);
        assert!(stack.get_or_create(0xE0010203).is_some());
    }

    #[test]
    fn find_before_query_is_none_and_creates_nothing() {
        let stack = stack();
        assert!(stack.find(123).is_none());
        assert_eq!(stack.groups.read().unwrap().len(), 0);
    }

    #[test]
    fn later_query_overwrites_elected_querier() {
        let stack = stack();
        let a = interface("a");
        let b = interface("b");
        stack.send_query(a.clone(), &[0u8; 8]);
        assert_eq!(stack.querier().unwrap().id(), a.id());
        stack.send_query(b.clone(), &[0u8; 8]);
        assert_eq!(stack.querier().unwrap().id(), b.id());
    }

    #[test]
    fn remove_triggers_group_gc_when_empty() {
        let stack = stack();
        let querier = interface("q");
        stack.send_query(querier, &[0u8; 8]);
        let member = interface("m");
        let mc = stack.get_or_create(42).unwrap();
        mc.add(member.clone());
        assert!(stack.find(42).is_some());

        mc.remove(member.id());
        stack.cleanup();
        assert!(stack.find(42).is_none());
    }

    #[test]
    fn empty_group_present_implies_querier_was_once_observed() {
        let stack = stack();
        let querier = interface("q");
        stack.send_query(querier, &[0u8; 8]);
        let mc = stack.get_or_create(7).unwrap();
        assert!(mc.is_empty());
        assert!(stack.querier().is_some());
    }
}
