//! The learning CAM (content-addressable memory) table: a bounded
//! MAC→Port map with TTL aging and a miss default.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::sync::RwLock;
use std::time::Instant;

use crate::mac::Mac;
use crate::port::Port;

pub const DEFAULT_CAPACITY: usize = 512;
pub const DEFAULT_MIN_TTL_SECS: u64 = 300;

fn process_start() -> &'static Instant {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now)
}

/// Whole-second monotonic clock shared by `insert`, `find`, and
/// `cleanup` — a monotonic clock is explicitly acceptable provided all
/// three agree, which this function guarantees by construction.
fn now_secs() -> u64 {
    process_start().elapsed().as_secs()
}

enum Slot {
    Free,
    Occupied { mac: Mac, port: Port, ts: u64 },
}

struct Inner {
    slots: Vec<Slot>,
    map: HashMap<Mac, usize>,
    free: Vec<usize>,
}

/// Fixed-capacity MAC→Port table with TTL aging and a miss default.
///
/// Slot indices `1..=capacity` are the real storage; index `0` is
/// never placed in `free` or `map` and exists only so the invariant
/// "the map's image is a subset of `{1..C}`" has a slot to exclude.
pub struct Cam {
    capacity: usize,
    inner: RwLock<Inner>,
    min_ttl_secs: AtomicU64,
    default_port: RwLock<Port>,
    broadcast_port: Port,
}

impl Cam {
    pub fn new(capacity: usize, default_port: Port, broadcast_port: Port) -> Self {
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.push(Slot::Free); // index 0, never touched
        for _ in 1..=capacity {
            slots.push(Slot::Free);
        }
        Self {
            capacity,
            inner: RwLock::new(Inner {
                slots,
                map: HashMap::new(),
                free: (1..=capacity).collect(),
            }),
            min_ttl_secs: AtomicU64::new(DEFAULT_MIN_TTL_SECS),
            default_port: RwLock::new(default_port),
            broadcast_port,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_default_port(&self, port: Port) {
        *self.default_port.write().expect("poisoned") = port;
    }

    pub fn set_min_ttl(&self, secs: u64) {
        self.min_ttl_secs.store(secs, Ordering::Relaxed);
    }

    /// Learn or refresh the binding for `mac`. Silently drops broadcast
    /// MACs and new MACs observed while the table is full.
    pub fn insert(&self, mac: Mac, port: Port) {
        if mac.is_broadcast() {
            return;
        }
        let mut inner = self.inner.write().expect("poisoned");
        let now = now_secs();
        if let Some(&idx) = inner.map.get(&mac) {
            inner.slots[idx] = Slot::Occupied { mac, port, ts: now };
            return;
        }
        if let Some(idx) = inner.free.pop() {
            inner.slots[idx] = Slot::Occupied { mac, port, ts: now };
            inner.map.insert(mac, idx);
        }
        // else: table full and mac unknown — drop the observation.
    }

    /// Returns `Broadcast` for a broadcast MAC without touching the
    /// table; otherwise the learned port, or the default port on miss.
    /// A hit refreshes the entry's timestamp (access-based aging),
    /// which is why this takes the write lock rather than a read lock.
    pub fn find(&self, mac: Mac) -> Port {
        if mac.is_broadcast() {
            return self.broadcast_port.clone();
        }
        let mut inner = self.inner.write().expect("poisoned");
        let now = now_secs();
        if let Some(&idx) = inner.map.get(&mac) {
            if let Slot::Occupied { port, ts, .. } = &mut inner.slots[idx] {
                *ts = now;
                return port.clone();
            }
        }
        self.default_port.read().expect("poisoned").clone()
    }

    /// Drop every entry whose age has reached the minimum TTL,
    /// returning its slot to the free pool. Collects expired keys
    /// before mutating so the map is never iterated-while-erased.
    pub fn cleanup(&self) {
        let mut inner = self.inner.write().expect("poisoned");
        let ttl = self.min_ttl_secs.load(Ordering::Relaxed);
        let now = now_secs();
        let expired: Vec<Mac> = inner
            .map
            .iter()
            .filter_map(|(&mac, &idx)| match &inner.slots[idx] {
                Slot::Occupied { ts, .. } if now.saturating_sub(*ts) >= ttl => Some(mac),
                _ => None,
            })
            .collect();
        for mac in expired {
            if let Some(idx) = inner.map.remove(&mac) {
                inner.slots[idx] = Slot::Free;
                inner.free.push(idx);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `MAC address  Port  Age` table followed by `-- Total n / C --`.
    pub fn render(&self) -> String {
        let inner = self.inner.read().expect("poisoned");
        let now = now_secs();
        let mut out = String::from("MAC address  Port  Age\n");
        let mut rows: Vec<(Mac, String, u64)> = inner
            .map
            .iter()
            .filter_map(|(&mac, &idx)| match &inner.slots[idx] {
                Slot::Occupied { port, ts, .. } => Some((mac, port.name(), now.saturating_sub(*ts))),
                Slot::Free => None,
            })
            .collect();
        rows.sort_by_key(|(mac, _, _)| *mac);
        for (mac, port_name, age) in &rows {
            out.push_str(&format!("{mac}  {port_name}  {age}\n"));
        }
        out.push_str(&format!("-- Total {} / {} --\n", rows.len(), self.capacity));
        out
    }
}
