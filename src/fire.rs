use crate::bus::{kind, Message, Outbox};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Window after which an unconfirmed, uncancelled alarm turns the sprinkler
/// on automatically.
pub const AUTO_ESCALATION_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireState {
    pub alarmed: bool,
    pub sprinkler_on: bool,
    pub confirmed: bool,
    pub cancelled: bool,
    /// Set exactly once per alarm episode; `None` whenever not alarmed.
    pub alarm_timestamp_ms: Option<u64>,
}

/// Fire-alarm / sprinkler lifecycle coordinator.
///
/// Event-driven and single-threaded: operator commands arrive between polls,
/// and `poll` performs the 10-second auto-escalation. Every transition
/// publishes the same fixed fire / sprinkler status messages regardless of
/// whether a human or the timeout drove it.
#[derive(Debug, Default)]
pub struct FireSprinklerCoordinator {
    state: FireState,
}

impl FireSprinklerCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FireState {
        &self.state
    }

    /// Raises the fire alarm and starts the confirmation window.
    /// A no-op (logged) when already alarmed: the timestamp is recorded once
    /// per episode.
    pub fn trigger_fire(&mut self, now_ms: u64, outbox: &mut Outbox) {
        if self.state.alarmed {
            info!("fire already alarmed");
            return;
        }
        self.state.alarmed = true;
        self.state.alarm_timestamp_ms = Some(now_ms);
        info!("fire alarm raised; confirm or cancel sprinkler action");
        let _ = outbox.push(Message::on_off(kind::FIRE_ALARM, true));
    }

    /// Operator confirmation: turns the sprinkler on.
    /// Fails (no state change) unless the alarm is active.
    pub fn confirm_sprinkler(&mut self, outbox: &mut Outbox) -> bool {
        if !self.state.alarmed {
            return false;
        }
        self.activate_sprinkler(outbox);
        info!("sprinkler confirmed on");
        true
    }

    /// Clears the alarm before any sprinkler action.
    /// Fails (no state change) unless the alarm is active.
    pub fn cancel_fire(&mut self, outbox: &mut Outbox) -> bool {
        if !self.state.alarmed {
            return false;
        }
        self.state = FireState::default();
        info!("fire alarm cancelled before sprinkler action");
        let _ = outbox.push(Message::on_off(kind::FIRE_ALARM, false));
        true
    }

    /// Turns a running sprinkler off and ends the episode.
    /// Fails (no state change) unless the sprinkler is on.
    pub fn cancel_sprinkler(&mut self, outbox: &mut Outbox) -> bool {
        if !self.state.sprinkler_on {
            return false;
        }
        self.state = FireState {
            cancelled: true,
            ..FireState::default()
        };
        info!("sprinkler turned off");
        let _ = outbox.push(Message::on_off(kind::SPRINKLER_COMMAND, false));
        true
    }

    /// Time-driven check, run once per cycle.
    ///
    /// Idempotent under repeated polling: once the sprinkler is on the
    /// `!sprinkler_on` guard prevents re-firing, so a manual confirmation
    /// racing the timeout cannot double-activate.
    pub fn poll(&mut self, now_ms: u64, outbox: &mut Outbox) {
        let expired = match self.state.alarm_timestamp_ms {
            Some(raised_at) => now_ms.saturating_sub(raised_at) >= AUTO_ESCALATION_DELAY_MS,
            None => false,
        };

        if self.state.alarmed && !self.state.sprinkler_on && !self.state.confirmed && expired {
            self.activate_sprinkler(outbox);
            info!("no operator input within 10s; sprinkler turned on automatically");
        }
    }

    fn activate_sprinkler(&mut self, outbox: &mut Outbox) {
        self.state.sprinkler_on = true;
        self.state.confirmed = true;
        self.state.cancelled = false;
        let _ = outbox.push(Message::on_off(kind::SPRINKLER_COMMAND, true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprinkler_on_count(outbox: &Outbox) -> usize {
        outbox
            .iter()
            .filter(|m| m.kind == kind::SPRINKLER_COMMAND && m.body == "ON")
            .count()
    }

    #[test]
    fn test_trigger_records_timestamp_once_per_episode() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();

        fire.trigger_fire(500, &mut outbox);
        assert_eq!(fire.state().alarm_timestamp_ms, Some(500));
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].kind, kind::FIRE_ALARM);
        assert_eq!(outbox[0].body, "ON");

        // Re-trigger while alarmed: no timestamp change, no republish.
        fire.trigger_fire(3000, &mut outbox);
        assert_eq!(fire.state().alarm_timestamp_ms, Some(500));
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn test_confirm_fails_without_alarm() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();

        assert!(!fire.confirm_sprinkler(&mut outbox));
        assert!(outbox.is_empty());
        assert_eq!(fire.state(), &FireState::default());
    }

    #[test]
    fn test_confirm_succeeds_while_alarmed() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();
        fire.trigger_fire(0, &mut outbox);

        assert!(fire.confirm_sprinkler(&mut outbox));
        let state = fire.state();
        assert!(state.sprinkler_on);
        assert!(state.confirmed);
        assert!(!state.cancelled);
        assert_eq!(sprinkler_on_count(&outbox), 1);
    }

    #[test]
    fn test_auto_escalation_fires_exactly_once() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();
        fire.trigger_fire(0, &mut outbox);

        // Repeated polling before the window expires does nothing.
        fire.poll(5_000, &mut outbox);
        fire.poll(9_999, &mut outbox);
        assert!(!fire.state().sprinkler_on);

        fire.poll(10_000, &mut outbox);
        assert!(fire.state().sprinkler_on);

        // Further polls must not republish.
        fire.poll(11_000, &mut outbox);
        fire.poll(60_000, &mut outbox);
        assert_eq!(sprinkler_on_count(&outbox), 1);
    }

    #[test]
    fn test_manual_confirm_suppresses_auto_escalation() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();
        fire.trigger_fire(0, &mut outbox);

        // Operator confirms at 9.9s, the timeout check runs at 10.1s.
        fire.poll(9_800, &mut outbox);
        assert!(fire.confirm_sprinkler(&mut outbox));
        fire.poll(10_100, &mut outbox);

        assert_eq!(sprinkler_on_count(&outbox), 1, "activated exactly once");
        assert!(fire.state().sprinkler_on);
    }

    #[test]
    fn test_cancel_before_confirm_resets_timestamp() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();
        fire.trigger_fire(0, &mut outbox);

        assert!(fire.cancel_fire(&mut outbox));
        assert_eq!(fire.state(), &FireState::default());
        assert_eq!(outbox.last().map(|m| (m.kind, m.body.as_str())),
            Some((kind::FIRE_ALARM, "OFF")));

        // A later auto-escalation check must not fire.
        fire.poll(60_000, &mut outbox);
        assert!(!fire.state().sprinkler_on);
        assert_eq!(sprinkler_on_count(&outbox), 0);
    }

    #[test]
    fn test_cancel_fire_fails_without_alarm() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();
        assert!(!fire.cancel_fire(&mut outbox));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_cancel_sprinkler_requires_running_sprinkler() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();

        assert!(!fire.cancel_sprinkler(&mut outbox));

        fire.trigger_fire(0, &mut outbox);
        assert!(!fire.cancel_sprinkler(&mut outbox), "alarmed but sprinkler off");

        fire.confirm_sprinkler(&mut outbox);
        assert!(fire.cancel_sprinkler(&mut outbox));

        let state = fire.state();
        assert!(!state.sprinkler_on);
        assert!(!state.alarmed);
        assert!(!state.confirmed);
        assert!(state.cancelled);
        assert_eq!(state.alarm_timestamp_ms, None);
    }

    #[test]
    fn test_confirmed_and_cancelled_mutually_exclusive() {
        let mut fire = FireSprinklerCoordinator::new();
        let mut outbox = Outbox::new();

        fire.trigger_fire(0, &mut outbox);
        fire.confirm_sprinkler(&mut outbox);
        assert!(fire.state().confirmed && !fire.state().cancelled);

        fire.cancel_sprinkler(&mut outbox);
        assert!(!fire.state().confirmed && fire.state().cancelled);

        // A fresh episode after cancellation clears the cancelled flag on
        // the next confirmation.
        fire.trigger_fire(100_000, &mut outbox);
        fire.confirm_sprinkler(&mut outbox);
        assert!(fire.state().confirmed && !fire.state().cancelled);
    }
}
