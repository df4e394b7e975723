use super::{display_id, FIELD_DEVICE_POLL_PERIOD};
use crate::bus::{kind, Message, Outbox};
use crate::dispatch::Role;
use std::time::Duration;
use tracing::{debug, info};

/// Actuator controller for the three intrusion alarm devices.
///
/// Consumes command tokens, mirrors them into actuator state, and publishes a
/// confirmation echoing each token acted on. Lamp status is logged once per
/// cycle.
#[derive(Debug)]
pub struct SecurityController {
    door_on: bool,
    window_on: bool,
    motion_on: bool,
    id: u32,
}

impl SecurityController {
    pub fn new() -> Self {
        Self {
            door_on: false,
            window_on: false,
            motion_on: false,
            id: display_id(),
        }
    }

    pub fn actuator_states(&self) -> (bool, bool, bool) {
        (self.door_on, self.window_on, self.motion_on)
    }

    fn apply_token(&mut self, token: &str) -> bool {
        match () {
            _ if token.eq_ignore_ascii_case("D1") => {
                self.door_on = true;
                info!("received door alarm on command");
            }
            _ if token.eq_ignore_ascii_case("D0") => {
                self.door_on = false;
                info!("received door alarm off command");
            }
            _ if token.eq_ignore_ascii_case("W1") => {
                self.window_on = true;
                info!("received window alarm on command");
            }
            _ if token.eq_ignore_ascii_case("W0") => {
                self.window_on = false;
                info!("received window alarm off command");
            }
            _ if token.eq_ignore_ascii_case("M1") => {
                self.motion_on = true;
                info!("received motion alarm on command");
            }
            _ if token.eq_ignore_ascii_case("M0") => {
                self.motion_on = false;
                info!("received motion alarm off command");
            }
            _ => {
                debug!(token, "unrecognized actuator command ignored");
                return false;
            }
        }
        true
    }
}

impl Default for SecurityController {
    fn default() -> Self {
        Self::new()
    }
}

impl Role for SecurityController {
    fn name(&self) -> &'static str {
        "security-controller"
    }

    fn poll_period(&self) -> Duration {
        FIELD_DEVICE_POLL_PERIOD
    }

    fn heartbeat(&self) -> Option<String> {
        Some(format!(
            "SecurityController-{}#controls the security alarm actuators",
            self.id
        ))
    }

    fn on_message(&mut self, message: &Message, outbox: &mut Outbox) {
        if message.kind != kind::ACTUATOR_COMMAND {
            return;
        }
        if self.apply_token(&message.body) {
            let _ = outbox.push(Message::new(kind::ACTUATOR_CONFIRM, message.body.clone()));
        }
    }

    fn on_poll(&mut self, _outbox: &mut Outbox) {
        info!(
            door = if self.door_on { "Triggered" } else { "Intact" },
            window = if self.window_on { "Triggered" } else { "Intact" },
            motion = if self.motion_on { "Triggered" } else { "Intact" },
            "actuator lamp status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch_batch;

    #[test]
    fn test_valid_command_sets_state_and_confirms() {
        let mut controller = SecurityController::new();
        let batch = vec![Message::new(kind::ACTUATOR_COMMAND, "W1")];

        let (outbox, _) = dispatch_batch(&mut controller, &batch);

        assert_eq!(controller.actuator_states(), (false, true, false));
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].kind, kind::ACTUATOR_CONFIRM);
        assert_eq!(outbox[0].body, "W1");
    }

    #[test]
    fn test_repeated_kind_last_value_wins_confirms_each() {
        let mut controller = SecurityController::new();
        let batch = vec![
            Message::new(kind::ACTUATOR_COMMAND, "D1"),
            Message::new(kind::ACTUATOR_COMMAND, "D0"),
        ];

        let (outbox, _) = dispatch_batch(&mut controller, &batch);

        // Both commands are acted on in order; the last one determines the
        // final actuator state.
        assert_eq!(controller.actuator_states(), (false, false, false));
        let bodies: Vec<_> = outbox.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["D1", "D0"]);
    }

    #[test]
    fn test_unknown_token_is_not_confirmed() {
        let mut controller = SecurityController::new();
        let batch = vec![Message::new(kind::ACTUATOR_COMMAND, "Z9")];

        let (outbox, _) = dispatch_batch(&mut controller, &batch);

        assert_eq!(controller.actuator_states(), (false, false, false));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_other_kinds_ignored() {
        let mut controller = SecurityController::new();
        let batch = vec![Message::new(kind::SPRINKLER_COMMAND, "ON")];
        let (outbox, _) = dispatch_batch(&mut controller, &batch);
        assert!(outbox.is_empty());
    }
}
