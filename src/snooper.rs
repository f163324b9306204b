//! IGMP message classification: mutates `MulticastStack`/`Multicast`
//! state in response to queries, reports, and leaves observed on the
//! wire. Invoked synchronously from the traffic loop — snooping never
//! spawns its own work.

use std::sync::Arc;

use crate::frame::{
    IgmpHeader, IGMP_LEAVE_GROUP, IGMP_MEMBERSHIP_QUERY, IGMP_V1_MEMBERSHIP_REPORT,
    IGMP_V2_MEMBERSHIP_REPORT,
};
use crate::interface::Interface;
use crate::multicast::MulticastStack;

/// Classify `igmp` (already confirmed to ride an IPv4-multicast,
/// IGMP-protocol frame) and mutate `stack` accordingly.
pub fn handle(
    stack: &Arc<MulticastStack>,
    iface: &Arc<Interface>,
    igmp: &IgmpHeader<'_>,
    frame: &[u8],
) {
    let group = igmp.group_key();
    let is_querier = stack.querier().map(|q| q.id()) == Some(iface.id());

    match igmp.msg_type() {
        IGMP_MEMBERSHIP_QUERY => stack.send_query(iface.clone(), frame),
        IGMP_V1_MEMBERSHIP_REPORT | IGMP_V2_MEMBERSHIP_REPORT => {
            if is_querier {
                return;
            }
            if let Some(mc) = stack.get_or_create(group) {
                mc.add(iface.clone());
            }
            stack.send_response(frame, iface.id());
        }
        IGMP_LEAVE_GROUP => {
            if let Some(mc) = stack.find(group) {
                mc.remove(iface.id());
            }
        }
        _ => {
            if is_querier {
                return;
            }
            if let Some(mc) = stack.get_or_create(group) {
                mc.add(iface.clone());
            }
        }
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

    fn igmp_frame(msg_type: u8, group: [u8; 4]) -> Vec<u8> {
        let mut f = vec![0u8; 8];
        f[0] = msg_type;
        f[4..8].copy_from_slice(&group);
        f
    }

    #[test]
    fn query_elects_sender_as_querier() {
        let stack = stack();
        let iface = interface("a");
        let frame = igmp_frame(IGMP_MEMBERSHIP_QUERY, [0, 0, 0, 0]);
        let igmp = IgmpHeader::new(&frame).unwrap();
        handle(&stack, &iface, &igmp, &frame);
        assert_eq!(stack.querier().unwrap().id(), iface.id());
    }

    #[test]
    fn report_from_querier_is_ignored() {
        let stack = stack();
        let querier = interface("q");
        stack.send_query(querier.clone(), &[0u8; 8]);

        let frame = igmp_frame(IGMP_V2_MEMBERSHIP_REPORT, [224, 1, 2, 3]);
        let igmp = IgmpHeader::new(&frame).unwrap();
        handle(&stack, &querier, &igmp, &frame);

        assert!(stack.find(igmp.group_key()).is_none());
    }

    #[test]
    fn report_joins_group_and_forwards_to_querier() {
        let stack = stack();
        let querier = interface("q");
        stack.send_query(querier.clone(), &[0u8; 8]);

        let reporter = interface("b");
        let frame = igmp_frame(IGMP_V2_MEMBERSHIP_REPORT, [224, 1, 2, 3]);
        let igmp = IgmpHeader::new(&frame).unwrap();
        handle(&stack, &reporter, &igmp, &frame);

        let mc = stack.find(igmp.group_key()).unwrap();
        assert_eq!(mc.members().len(), 1);
        assert_eq!(mc.members()[0].id(), reporter.id());
    }

    #[test]
    fn leave_removes_member_without_forwarding() {
        let stack = stack();
        let querier = interface("q");
        stack.send_query(querier, &[0u8; 8]);

        let reporter = interface("b");
        let report = igmp_frame(IGMP_V2_MEMBERSHIP_REPORT, [224, 1, 2, 3]);
        handle(&stack, &reporter, &IgmpHeader::new(&report).unwrap(), &report);

        let leave = igmp_frame(IGMP_LEAVE_GROUP, [224, 1, 2, 3]);
        handle(&stack, &reporter, &IgmpHeader::new(&leave).unwrap(), &leave);

        // Removing the last member empties the group, which triggers
        // MulticastStack::cleanup and GC's it immediately — there is no
        // stale empty group left to observe.
        assert!(stack.find(224u32 << 24 | 1 << 16 | 2 << 8 | 3).is_none());
    }

    #[test]
    fn leave_for_unknown_group_is_a_silent_no_op() {
        let stack = stack();
        let querier = interface("q");
        stack.send_query(querier.clone(), &[0u8; 8]);
        let leave = igmp_frame(IGMP_LEAVE_GROUP, [224, 9, 9, 9]);
        handle(&stack, &querier, &IgmpHeader::new(&leave).unwrap(), &leave);
        // No panic, nothing created.
        assert!(stack.find(0xE0090909).is_none());
    }
}
