//! Process-wide singleton wiring: the CAM, the interface registry,
//! broadcast, and the multicast stack, plus the worker threads bound
//! to them. One `Switch` per process.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

use crate::aging::AgingTask;
use crate::broadcast::Broadcast;
use crate::cam::{Cam, DEFAULT_CAPACITY};
use crate::config::Config;
use crate::interface::Interface;
use crate::interface_stack::InterfaceStack;
use crate::multicast::MulticastStack;
use crate::port::Port;
use crate::traffic::TrafficLoop;

/// Owns every process-wide singleton named in the design notes
/// (`InterfaceStack`, `Cam`, `Broadcast`, `MulticastStack`) and the
/// join handles of the workers bound to them. Constructed once at
/// startup with the interfaces already opened; torn down by
/// `shutdown`, which cancels every worker and joins it.
pub struct Switch {
    pub interfaces: Arc<InterfaceStack>,
    pub cam: Arc<Cam>,
    pub broadcast: Arc<Broadcast>,
    pub multicast: Arc<MulticastStack>,
    cancel: Arc<AtomicBool>,
    workers: RwLock<Vec<JoinHandle<()>>>,
}

impl Switch {
    /// Wire the singletons together. `CAM`'s default and broadcast
    /// ports both start out as the shared `Broadcast` port, per §3
    /// ("the default port, initially Broadcast").
    pub fn new() -> Arc<Self> {
        let interfaces = Arc::new(InterfaceStack::new());
        let broadcast = Arc::new(Broadcast::new(interfaces.clone()));
        let multicast = MulticastStack::new(broadcast.clone());
        let cam = Arc::new(Cam::new(
            DEFAULT_CAPACITY,
            Port::Broadcast(broadcast.clone()),
            Port::Broadcast(broadcast.clone()),
        ));
        Arc::new(Self {
            interfaces,
            cam,
            broadcast,
            multicast,
            cancel: Arc::new(AtomicBool::new(false)),
            workers: RwLock::new(Vec::new()),
        })
    }

    /// Register `iface` and spawn its traffic loop thread.
    pub fn add_interface(&self, iface: Arc<Interface>) {
        self.interfaces.register(iface.clone());
        let tl = TrafficLoop::new(
            iface,
            self.cam.clone(),
            self.broadcast.clone(),
            self.multicast.clone(),
        );
        let cancel = self.cancel.clone();
        let handle = std::thread::spawn(move || tl.run(&cancel));
        self.workers.write().expect("poisoned").push(handle);
    }

    /// Spawn the aging thread. Call once, after every interface has
    /// been registered via `add_interface`.
    pub fn spawn_aging(&self, cfg: Config) {
        let task = AgingTask::new(self.cam.clone(), self.multicast.clone(), cfg.cleanup_period_seconds);
        self.cam.set_min_ttl(cfg.min_ttl_seconds);
        let cancel = self.cancel.clone();
        let handle = std::thread::spawn(move || task.run(&cancel));
        self.workers.write().expect("poisoned").push(handle);
    }

    /// Signal cancellation to every worker and join them all. Workers
    /// poll `cancel` at their suspension points (recv, sleep slices),
    /// so this returns once the last frame/sleep in flight unwinds.
    pub fn shutdown(&self) {
        self.cancel.store(true, std::sync::atomic::Ordering::Relaxed);
        let mut workers = self.workers.write().expect("poisoned");
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}
