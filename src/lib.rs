//! # Facility Bus Simulator
//!
//! A message-bus simulation of a building security and fire-suppression
//! network. Independent participants (sensors, actuator controllers, the
//! facility monitor, and a maintenance console) exchange typed messages
//! through a shared hub, each on its own fixed polling cadence.
//!
//! ## Quick Start
//!
//! ```rust
//! use facbus::hub::MessageHub;
//! use facbus::monitor::MonitorHandle;
//!
//! // Stand up a hub and the monitor state shared with the operator console.
//! let hub = MessageHub::new();
//! let monitor = MonitorHandle::new();
//!
//! // The monitor comes up armed.
//! assert!(monitor.status().intrusion.armed);
//! let _client = hub.client();
//! ```
//!
//! ## Architecture
//!
//! - [`bus`] - Message types, kind codes, and the bus client trait
//! - [`hub`] - In-process message hub with per-participant queues
//! - [`dispatch`] - The participant role trait and polling loop
//! - [`intrusion`] - Arm/disarm state machine and alarm lamp
//! - [`fire`] - Fire alarm and sprinkler escalation coordinator
//! - [`liveness`] - Heartbeat presence tracking
//! - [`monitor`] - The facility monitor participant
//! - [`roles`] - Field device and maintenance console participants

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bus;
pub mod dispatch;
pub mod fire;
pub mod hub;
pub mod intrusion;
pub mod liveness;
pub mod monitor;
pub mod roles;

pub use bus::{BusClient, BusError, Message, Outbox};
pub use dispatch::{DispatchLoop, Role};
pub use hub::{LocalBusClient, MessageHub};
pub use monitor::{FacilityMonitor, MonitorHandle, MonitorStatus};
