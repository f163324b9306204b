//! The per-interface receive→classify→forward loop. One thread per
//! registered `Interface` runs one `TrafficLoop` until cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::broadcast::Broadcast;
use crate::cam::Cam;
use crate::frame::{EtherHeader, Ipv4Header, IgmpHeader, ETHERTYPE_IPV4, IP_PROTO_IGMP};
use crate::interface::Interface;
use crate::multicast::MulticastStack;
use crate::port::Port;
use crate::snooper;

/// Runs [`TrafficLoop::run`] on one interface until `cancel` is set.
/// Cheap to construct; holds only shared handles, no state of its own.
pub struct TrafficLoop {
    iface: Arc<Interface>,
    cam: Arc<Cam>,
    broadcast: Arc<Broadcast>,
    multicast: Arc<MulticastStack>,
}

impl TrafficLoop {
    pub fn new(
        iface: Arc<Interface>,
        cam: Arc<Cam>,
        broadcast: Arc<Broadcast>,
        multicast: Arc<MulticastStack>,
    ) -> Self {
        Self {
            iface,
            cam,
            broadcast,
            multicast,
        }
    }

    /// Block in `Interface::recv` and dispatch until `cancel` reads
    /// true. Checked once per received frame and once per spurious
    /// null recv, so cancellation is prompt without polling a timer.
    pub fn run(&self, cancel: &AtomicBool) {
        while !cancel.load(Ordering::Relaxed) {
            let Some((frame, _len)) = self.iface.recv() else {
                continue;
            };
            self.dispatch(&frame);
        }
    }

    fn dispatch(&self, frame: &[u8]) {
        let Some(eth) = EtherHeader::new(frame) else {
            return;
        };
        let dst = eth.dst();
        let src = eth.src();

        if dst.is_multicast() && eth.ethertype() == ETHERTYPE_IPV4 {
            if let Some(ip) = Ipv4Header::new(eth.payload()) {
                if ip.version() == 4 {
                    self.dispatch_multicast(&ip, frame);
                    return;
                }
            }
        }

        self.cam.insert(src, Port::Interface(self.iface.clone()));
        let port = self.cam.find(dst);
        port.send(frame, Some(self.iface.id()));
    }

    fn dispatch_multicast(&self, ip: &Ipv4Header<'_>, frame: &[u8]) {
        if ip.protocol() == IP_PROTO_IGMP {
            if let Some(payload) = ip.payload() {
                if let Some(igmp) = IgmpHeader::new(payload) {
                    snooper::handle(&self.multicast, &self.iface, &igmp, frame);
                }
            }
            return;
        }

        match self.multicast.find(ip.dst_addr_key()) {
            Some(mc) => mc.send(frame, Some(self.iface.id())),
            None => self.broadcast.send(frame, Some(self.iface.id())),
        }
    }
}
