//! `FrameIO` — the raw packet capture/transmit collaborator.
//!
//! The core switch never talks to a NIC directly; it talks to this
//! trait. Production code is backed by `pnet_datalink`; tests use
//! [`FakeFrameIo`], an in-process double with no real sockets.

use std::sync::Mutex;

use pnet_datalink::Channel;

use crate::error::SwitchError;

/// Enumeration flags for a single host network device.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceFlags {
    pub loopback: bool,
}

/// One open capture/transmit handle bound to a NIC.
pub trait FrameIoHandle: Send + Sync {
    /// Block until a frame is captured, or return `None` on a spurious
    /// wakeup/timeout (the caller must retry). Returns the captured
    /// bytes together with the length reported by the capture layer;
    /// callers assert the two agree.
    fn recv(&self) -> Option<(Vec<u8>, usize)>;

    fn send(&self, bytes: &[u8]);
}

/// Enumerates devices, probes hardware addresses, and opens handles.
pub trait FrameIoFactory {
    fn list_devices() -> Result<Vec<(String, DeviceFlags)>, SwitchError>;
    fn hwaddr(name: &str) -> Result<[u8; 6], SwitchError>;
    fn open(name: &str) -> Result<Box<dyn FrameIoHandle>, SwitchError>;
}

/// A device is valid for switching iff its loopback flag is unset and
/// its hardware address is not all-zero.
pub fn is_valid_device(flags: DeviceFlags, hwaddr: [u8; 6]) -> bool {
    !flags.loopback && hwaddr != [0u8; 6]
}

/// `pnet_datalink`-backed [`FrameIoFactory`].
pub struct PnetFrameIo;

impl FrameIoFactory for PnetFrameIo {
    fn list_devices() -> Result<Vec<(String, DeviceFlags)>, SwitchError> {
        Ok(pnet_datalink::interfaces()
            .into_iter()
            .map(|i| {
                (
                    i.name.clone(),
                    DeviceFlags {
                        loopback: i.is_loopback(),
                    },
                )
            })
            .collect())
    }

    fn hwaddr(name: &str) -> Result<[u8; 6], SwitchError> {
        pnet_datalink::interfaces()
            .into_iter()
            .find(|i| i.name == name)
            .and_then(|i| i.mac)
            .map(|mac| mac.octets())
            .ok_or_else(|| SwitchError::HwAddrUnavailable {
                name: name.to_string(),
            })
    }

    fn open(name: &str) -> Result<Box<dyn FrameIoHandle>, SwitchError> {
        let iface = pnet_datalink::interfaces()
            .into_iter()
            .find(|i| i.name == name)
            .ok_or_else(|| SwitchError::OpenFailed {
                name: name.to_string(),
                reason: "no such device".to_string(),
            })?;

        let channel = pnet_datalink::channel(&iface, Default::default()).map_err(|e| {
            SwitchError::OpenFailed {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        let (tx, rx) = match channel {
            Channel::Ethernet(tx, rx) => (tx, rx),
            _ => {
                return Err(SwitchError::OpenFailed {
                    name: name.to_string(),
                    reason: "unsupported channel type".to_string(),
                })
            }
        };

        Ok(Box::new(PnetHandle {
            tx: Mutex::new(tx),
            rx: Mutex::new(rx),
        }))
    }
}

struct PnetHandle {
    tx: Mutex<Box<dyn pnet_datalink::DataLinkSender>>,
    rx: Mutex<Box<dyn pnet_datalink::DataLinkReceiver>>,
}

impl FrameIoHandle for PnetHandle {
    fn recv(&self) -> Option<(Vec<u8>, usize)> {
        let mut rx = self.rx.lock().expect("capture handle poisoned");
        match rx.next() {
            Ok(bytes) => Some((bytes.to_vec(), bytes.len())),
            Err(_) => None,
        }
    }

    fn send(&self, bytes: &[u8]) {
        let mut tx = self.tx.lock().expect("transmit handle poisoned");
        if let Some(Err(e)) = tx.send_to(bytes, None) {
            log::warn!("transmit failed: {e}");
        }
    }
}

/// An in-memory double for scenario tests: frames pushed with
/// `inject` are yielded by `recv`, and frames sent via `send` are
/// captured for assertions instead of reaching any socket.
///
/// Not part of the shipped library surface: reachable from unit tests
/// for free, and from `tests/` integration tests via the `testing`
/// feature enabled on the self dev-dependency in Cargo.toml.
#[cfg(any(test, feature = "testing"))]
pub mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    pub struct FakeFrameIo {
        inbox: StdMutex<VecDeque<Vec<u8>>>,
        pub sent: StdMutex<Vec<Vec<u8>>>,
    }

    impl FakeFrameIo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn inject(&self, frame: Vec<u8>) {
            self.inbox.lock().unwrap().push_back(frame);
        }
    }

    impl FrameIoHandle for FakeFrameIo {
        fn recv(&self) -> Option<(Vec<u8>, usize)> {
            let frame = self.inbox.lock().unwrap().pop_front()?;
            let len = frame.len();
            Some((frame, len))
        }

        fn send(&self, bytes: &[u8]) {
            self.sent.lock().unwrap().push(bytes.to_vec());
        }
    }
}
