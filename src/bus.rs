use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message kind discriminators.
///
/// Kinds are opaque integers: each pair of communicating roles privately
/// agrees on a kind and a body encoding. The values are fixed for the whole
/// facility network and must not be reused across role pairs.
pub mod kind {
    /// Security sensor -> monitor: numeric sensor code as a string
    /// (`"0"` = none tripped, `"1"` = door, `"2"` = window, `"3"` = motion).
    pub const INTRUSION_REPORT: i32 = 3;
    /// Monitor -> security controller: actuator command token
    /// (`"D1"`, `"D0"`, `"W1"`, `"W0"`, `"M1"`, `"M0"`).
    pub const ACTUATOR_COMMAND: i32 = 6;
    /// Security controller -> security sensor: confirmation, body echoes the
    /// command token acted on.
    pub const ACTUATOR_CONFIRM: i32 = -6;
    /// Monitor -> fire actuators: fire alarm status, `"ON"` / `"OFF"`.
    pub const FIRE_ALARM: i32 = 12;
    /// Operator -> fire detector: force detector state, `"ON"` / `"OFF"`.
    pub const FIRE_DETECTOR_COMMAND: i32 = -12;
    /// Monitor -> sprinkler controller: `"ON"` / `"OFF"`.
    pub const SPRINKLER_COMMAND: i32 = 13;
    /// Sprinkler controller confirmation channel.
    pub const SPRINKLER_CONFIRM: i32 = -13;
    /// Fire detector -> monitor: `"ON"` while the detector reads fire.
    pub const FIRE_DETECTOR_REPORT: i32 = 22;
    /// Sprinkler controller -> interested parties: suppression started.
    pub const FIRE_SUPPRESSED: i32 = 44;
    /// Periodic `"name#description"` liveness announcement.
    pub const HEARTBEAT: i32 = -100;
    /// Shutdown signal. Participants finish draining the batch, unregister,
    /// and exit their loop.
    pub const TERMINAL: i32 = 99;
}

pub const BODY_ON: &str = "ON";
pub const BODY_OFF: &str = "OFF";

/// Maximum messages a participant may emit in one dispatch cycle.
pub const MAX_OUTBOX: usize = 32;

/// Messages queued for publication at the end of the current cycle.
pub type Outbox = heapless::Vec<Message, MAX_OUTBOX>;

/// A discriminated message exchanged over the facility bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: i32,
    pub body: String,
}

impl Message {
    pub fn new(kind: i32, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    /// Builds an `"ON"` / `"OFF"` bodied message for the given kind.
    pub fn on_off(kind: i32, on: bool) -> Self {
        Self::new(kind, if on { BODY_ON } else { BODY_OFF })
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == kind::TERMINAL
    }
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("participant is not registered with the message hub")]
    NotRegistered,
    #[error("registration with the message hub failed: {0}")]
    RegistrationFailed(String),
    #[error("bus transport failure: {0}")]
    Transport(String),
}

/// Contract consumed by every participant. The bus itself is an external
/// collaborator: this trait is the whole surface the coordination logic sees.
///
/// `fetch_pending` returns the full ordered backlog since the previous fetch,
/// possibly empty, possibly with several messages of the same kind. Callers
/// apply the batch strictly in order, so the last value wins for any state
/// variable set by a repeated kind within one cycle.
pub trait BusClient {
    fn register(&mut self) -> Result<(), BusError>;
    fn fetch_pending(&mut self) -> Result<Vec<Message>, BusError>;
    fn publish(&mut self, message: &Message) -> Result<(), BusError>;
    fn unregister(&mut self) -> Result<(), BusError>;
}
