use super::FIELD_DEVICE_POLL_PERIOD;
use crate::bus::{kind, Message, Outbox};
use crate::dispatch::Role;
use std::time::Duration;
use tracing::info;

/// Sprinkler actuator controller.
///
/// Tracks the valve state from `"ON"`/`"OFF"` commands and announces
/// suppression start when the sprinkler activates.
#[derive(Debug, Default)]
pub struct SprinklerController {
    running: bool,
}

impl SprinklerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(&self) -> bool {
        self.running
    }
}

impl Role for SprinklerController {
    fn name(&self) -> &'static str {
        "sprinkler-controller"
    }

    fn poll_period(&self) -> Duration {
        FIELD_DEVICE_POLL_PERIOD
    }

    fn on_message(&mut self, message: &Message, outbox: &mut Outbox) {
        if message.kind != kind::SPRINKLER_COMMAND {
            return;
        }
        if message.body.eq_ignore_ascii_case("ON") {
            self.running = true;
            info!("received sprinkler on command");
            let _ = outbox.push(Message::new(kind::FIRE_SUPPRESSED, "ON"));
        } else if message.body.eq_ignore_ascii_case("OFF") {
            self.running = false;
            info!("received sprinkler off command");
        }
    }

    fn on_poll(&mut self, _outbox: &mut Outbox) {
        info!(
            lamp = if self.running { "sprinkler on" } else { "sprinkler off" },
            "sprinkler lamp status"
        );
    }
}
