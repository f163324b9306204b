//! `ethersw` — a user-space learning Ethernet switch with IGMP
//! snooping. See `switch::Switch` for the process-wide wiring and
//! `traffic::TrafficLoop` / `snooper` for the per-frame data plane.

pub mod aging;
pub mod broadcast;
pub mod cam;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod frame_io;
pub mod interface;
pub mod interface_stack;
pub mod mac;
pub mod multicast;
pub mod port;
pub mod repl;
pub mod snooper;
pub mod switch;
pub mod traffic;
