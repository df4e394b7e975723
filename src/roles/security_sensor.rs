use super::{display_id, FIELD_DEVICE_POLL_PERIOD};
use crate::bus::{kind, Message, Outbox};
use crate::dispatch::Role;
use std::time::Duration;
use tracing::{debug, info};

/// Simulated door/window/motion sensor bank.
///
/// Trip flags are driven by the controller's confirmation tokens coming back
/// over the bus; each cycle the sensor posts a numeric report for every
/// tripped flag, or `"0"` when all are clear.
#[derive(Debug)]
pub struct SecuritySensor {
    door_tripped: bool,
    window_tripped: bool,
    motion_tripped: bool,
    id: u32,
}

impl SecuritySensor {
    pub fn new() -> Self {
        Self {
            door_tripped: false,
            window_tripped: false,
            motion_tripped: false,
            id: display_id(),
        }
    }

    pub fn tripped(&self) -> (bool, bool, bool) {
        (self.door_tripped, self.window_tripped, self.motion_tripped)
    }
}

impl Default for SecuritySensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Role for SecuritySensor {
    fn name(&self) -> &'static str {
        "security-sensor"
    }

    fn poll_period(&self) -> Duration {
        FIELD_DEVICE_POLL_PERIOD
    }

    fn heartbeat(&self) -> Option<String> {
        Some(format!(
            "SecuritySensor-{}#detects window break, door break, and motion",
            self.id
        ))
    }

    fn on_message(&mut self, message: &Message, _outbox: &mut Outbox) {
        if message.kind != kind::ACTUATOR_CONFIRM {
            return;
        }
        let token = message.body.as_str();
        match () {
            _ if token.eq_ignore_ascii_case("D1") => self.door_tripped = true,
            _ if token.eq_ignore_ascii_case("D0") => self.door_tripped = false,
            _ if token.eq_ignore_ascii_case("W1") => self.window_tripped = true,
            _ if token.eq_ignore_ascii_case("W0") => self.window_tripped = false,
            _ if token.eq_ignore_ascii_case("M1") => self.motion_tripped = true,
            _ if token.eq_ignore_ascii_case("M0") => self.motion_tripped = false,
            _ => debug!(token, "unrecognized confirmation token ignored"),
        }
    }

    fn on_poll(&mut self, outbox: &mut Outbox) {
        let mut any = false;
        if self.door_tripped {
            any = true;
            info!("door tripped");
            let _ = outbox.push(Message::new(kind::INTRUSION_REPORT, "1"));
        }
        if self.window_tripped {
            any = true;
            info!("window tripped");
            let _ = outbox.push(Message::new(kind::INTRUSION_REPORT, "2"));
        }
        if self.motion_tripped {
            any = true;
            info!("motion tripped");
            let _ = outbox.push(Message::new(kind::INTRUSION_REPORT, "3"));
        }
        if !any {
            debug!("no sensors tripped");
            let _ = outbox.push(Message::new(kind::INTRUSION_REPORT, "0"));
        }
    }
}
