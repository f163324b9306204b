use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::frame_io::FrameIoHandle;
use crate::port::next_port_id;

/// One physical NIC the switch bridges frames across.
///
/// Owns the capture/transmit handle bound to the NIC and four
/// monotonically non-decreasing traffic counters. Created by
/// [`InterfaceStack`](crate::interface_stack::InterfaceStack) at
/// startup; destroyed (capture handle released) at process exit.
pub struct Interface {
    id: u64,
    name: String,
    handle: Box<dyn FrameIoHandle>,
    recv_bytes: AtomicU64,
    recv_frames: AtomicU64,
    /// Sent counters are updated together with the transmit call under
    /// this single mutex, so a concurrent producer never observes the
    /// counters and the wire out of step.
    sent: Mutex<SentCounters>,
}

#[derive(Default, Clone, Copy)]
struct SentCounters {
    bytes: u64,
    frames: u64,
}

impl Interface {
    pub fn new(name: impl Into<String>, handle: Box<dyn FrameIoHandle>) -> Self {
        Self {
            id: next_port_id(),
            name: name.into(),
            handle,
            recv_bytes: AtomicU64::new(0),
            recv_frames: AtomicU64::new(0),
            sent: Mutex::new(SentCounters::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hand `frame` to the NIC unless `ingress` names this very
    /// interface. A call with `ingress = None` always transmits.
    pub fn send(&self, frame: &[u8], ingress: Option<u64>) {
        if ingress == Some(self.id) {
            return;
        }
        let mut counters = self.sent.lock().expect("sent-counter lock poisoned");
        self.handle.send(frame);
        counters.bytes += frame.len() as u64;
        counters.frames += 1;
    }

    /// Block until a frame is captured, or `None` on a spurious
    /// wakeup — the caller must retry.
    ///
    /// Asserts that the captured length matches the reported wire
    /// length: truncation is a fatal programming error, never a
    /// recoverable condition.
    pub fn recv(&self) -> Option<(Vec<u8>, usize)> {
        let (frame, wire_len) = self.handle.recv()?;
        assert_eq!(
            frame.len(),
            wire_len,
            "interface {}: captured length {} != wire length {}",
            self.name,
            frame.len(),
            wire_len
        );
        self.recv_bytes.fetch_add(frame.len() as u64, Ordering::Relaxed);
        self.recv_frames.fetch_add(1, Ordering::Relaxed);
        Some((frame, wire_len))
    }

    pub fn sent_bytes(&self) -> u64 {
        self.sent.lock().expect("sent-counter lock poisoned").bytes
    }

    pub fn sent_frames(&self) -> u64 {
        self.sent.lock().expect("sent-counter lock poisoned").frames
    }

    pub fn recv_bytes(&self) -> u64 {
        self.recv_bytes.load(Ordering::Relaxed)
    }

    pub fn recv_frames(&self) -> u64 {
        self.recv_frames.load(Ordering::Relaxed)
    }
}
