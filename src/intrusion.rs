use crate::bus::{kind, Message, Outbox};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The three intrusion sensors, in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    Door,
    Window,
    Motion,
}

impl SensorKind {
    /// Actuator command token for this sensor's tripped/clear state.
    pub fn command_token(self, tripped: bool) -> &'static str {
        match (self, tripped) {
            (SensorKind::Door, true) => "D1",
            (SensorKind::Door, false) => "D0",
            (SensorKind::Window, true) => "W1",
            (SensorKind::Window, false) => "W0",
            (SensorKind::Motion, true) => "M1",
            (SensorKind::Motion, false) => "M0",
        }
    }
}

/// Alarm lamp status shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmLamp {
    Ringing,
    Silent,
    Deactivated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrusionState {
    pub armed: bool,
    pub door_open: bool,
    pub window_broken: bool,
    pub motion_detected: bool,
}

impl IntrusionState {
    pub fn any_tripped(&self) -> bool {
        self.door_open || self.window_broken || self.motion_detected
    }
}

/// Armed/disarmed intrusion state machine.
///
/// All inputs are unconditionally accepted — there is no invalid transition.
/// While disarmed, sensor updates are recorded but emit nothing; the invariant
/// is that no actuator command leaves this machine unless it is armed.
#[derive(Debug)]
pub struct IntrusionMonitor {
    state: IntrusionState,
    lamp: AlarmLamp,
}

impl IntrusionMonitor {
    pub fn new() -> Self {
        Self {
            state: IntrusionState::default(),
            lamp: AlarmLamp::Deactivated,
        }
    }

    pub fn state(&self) -> &IntrusionState {
        &self.state
    }

    pub fn lamp(&self) -> AlarmLamp {
        self.lamp
    }

    /// Arms or disarms the system.
    ///
    /// On arming, trigger priority is evaluated in fixed order door, window,
    /// motion: the first tripped flag rings the lamp and emits that single
    /// actuator command — first match wins even when several sensors are
    /// already tripped. With nothing tripped the lamp is cleared. Disarming
    /// sets the deactivated status and suppresses all actuator output until
    /// re-armed.
    pub fn set_arm(&mut self, armed: bool, outbox: &mut Outbox) {
        self.state.armed = armed;

        if armed {
            info!("security system armed");
            let tripped = [SensorKind::Door, SensorKind::Window, SensorKind::Motion]
                .into_iter()
                .find(|&s| self.flag(s));

            match tripped {
                Some(sensor) => {
                    self.lamp = AlarmLamp::Ringing;
                    self.emit_command(sensor, true, outbox);
                }
                None => self.lamp = AlarmLamp::Silent,
            }
        } else {
            info!("security system disarmed");
            self.lamp = AlarmLamp::Deactivated;
        }
    }

    /// Records a sensor flag change.
    ///
    /// While armed, recomputes the aggregate alarm status and emits an
    /// actuator command for the changed sensor only — not a re-evaluation
    /// across all three. While disarmed the flag is recorded silently.
    pub fn set_sensor(&mut self, sensor: SensorKind, tripped: bool, outbox: &mut Outbox) {
        match sensor {
            SensorKind::Door => self.state.door_open = tripped,
            SensorKind::Window => self.state.window_broken = tripped,
            SensorKind::Motion => self.state.motion_detected = tripped,
        }
        info!(sensor = ?sensor, tripped, "sensor flag set");

        if self.state.armed {
            self.lamp = if self.state.any_tripped() {
                AlarmLamp::Ringing
            } else {
                AlarmLamp::Silent
            };
            self.emit_command(sensor, tripped, outbox);
        }
    }

    fn flag(&self, sensor: SensorKind) -> bool {
        match sensor {
            SensorKind::Door => self.state.door_open,
            SensorKind::Window => self.state.window_broken,
            SensorKind::Motion => self.state.motion_detected,
        }
    }

    fn emit_command(&self, sensor: SensorKind, tripped: bool, outbox: &mut Outbox) {
        let token = sensor.command_token(tripped);
        let _ = outbox.push(Message::new(kind::ACTUATOR_COMMAND, token));
        info!(sensor = ?sensor, token, "actuator command issued");
    }
}

impl Default for IntrusionMonitor {
    fn default() -> Self {
        Self::new()
    }
}
