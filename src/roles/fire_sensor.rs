use super::FIELD_DEVICE_POLL_PERIOD;
use crate::bus::{kind, Message, Outbox};
use crate::dispatch::Role;
use std::time::Duration;
use tracing::{debug, info};

/// Simulated fire detector.
///
/// Its reading is forced on or off over the bus; while reading fire it posts
/// an `"ON"` report every cycle so the monitor keeps seeing the condition.
#[derive(Debug, Default)]
pub struct FireSensor {
    detecting: bool,
}

impl FireSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detecting(&self) -> bool {
        self.detecting
    }
}

impl Role for FireSensor {
    fn name(&self) -> &'static str {
        "fire-sensor"
    }

    fn poll_period(&self) -> Duration {
        FIELD_DEVICE_POLL_PERIOD
    }

    fn on_message(&mut self, message: &Message, _outbox: &mut Outbox) {
        if message.kind != kind::FIRE_DETECTOR_COMMAND {
            return;
        }
        if message.body.eq_ignore_ascii_case("ON") {
            self.detecting = true;
        } else if message.body.eq_ignore_ascii_case("OFF") {
            self.detecting = false;
        }
    }

    fn on_poll(&mut self, outbox: &mut Outbox) {
        if self.detecting {
            info!("fire detected");
            let _ = outbox.push(Message::new(kind::FIRE_DETECTOR_REPORT, "ON"));
        } else {
            debug!("no fire");
        }
    }
}
