use crate::bus::{kind, Message, Outbox};
use crate::dispatch::Role;
use crate::fire::{FireSprinklerCoordinator, FireState};
use crate::intrusion::{AlarmLamp, IntrusionMonitor, IntrusionState, SensorKind};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const MONITOR_POLL_PERIOD: Duration = Duration::from_millis(1000);

/// Snapshot of the monitor's state groups, for operator display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub intrusion: IntrusionState,
    pub lamp: AlarmLamp,
    pub fire: FireState,
}

/// The facility monitor: owns the intrusion state machine and the
/// fire/sprinkler coordinator, consumes sensor reports off the bus, and
/// queues every emitted actuator message for publication on its next cycle.
///
/// Operator commands and the background dispatch cycle both mutate this
/// struct; it is always held behind the [`MonitorHandle`] mutex so each
/// operation is a critical section over the whole state group.
#[derive(Debug)]
pub struct FacilityMonitor {
    intrusion: IntrusionMonitor,
    fire: FireSprinklerCoordinator,
    pending: Vec<Message>,
}

impl FacilityMonitor {
    /// The monitor comes up armed, matching facility commissioning procedure.
    pub fn new() -> Self {
        let mut monitor = Self {
            intrusion: IntrusionMonitor::new(),
            fire: FireSprinklerCoordinator::new(),
            pending: Vec::new(),
        };
        monitor.set_arm(true);
        monitor
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            intrusion: self.intrusion.state().clone(),
            lamp: self.intrusion.lamp(),
            fire: self.fire.state().clone(),
        }
    }

    pub fn set_arm(&mut self, armed: bool) {
        let mut outbox = Outbox::new();
        self.intrusion.set_arm(armed, &mut outbox);
        self.queue(outbox);
    }

    pub fn set_sensor(&mut self, sensor: SensorKind, tripped: bool) {
        let mut outbox = Outbox::new();
        self.intrusion.set_sensor(sensor, tripped, &mut outbox);
        self.queue(outbox);
    }

    /// Clears all three sensor flags, emitting per-sensor clear commands
    /// while armed.
    pub fn reset_sensors(&mut self) {
        self.set_sensor(SensorKind::Motion, false);
        self.set_sensor(SensorKind::Door, false);
        self.set_sensor(SensorKind::Window, false);
    }

    pub fn trigger_fire(&mut self, now_ms: u64) {
        let mut outbox = Outbox::new();
        self.fire.trigger_fire(now_ms, &mut outbox);
        self.queue(outbox);
    }

    pub fn confirm_sprinkler(&mut self) -> bool {
        let mut outbox = Outbox::new();
        let ok = self.fire.confirm_sprinkler(&mut outbox);
        self.queue(outbox);
        ok
    }

    pub fn cancel_fire(&mut self) -> bool {
        let mut outbox = Outbox::new();
        let ok = self.fire.cancel_fire(&mut outbox);
        self.queue(outbox);
        ok
    }

    pub fn cancel_sprinkler(&mut self) -> bool {
        let mut outbox = Outbox::new();
        let ok = self.fire.cancel_sprinkler(&mut outbox);
        self.queue(outbox);
        ok
    }

    /// Publishes the network-wide shutdown signal on the next cycle.
    pub fn halt(&mut self) {
        info!("halt requested; stopping the facility network");
        self.pending.push(Message::new(kind::TERMINAL, "XXX"));
    }

    /// Applies one bus message. Sensor reports are display-only at the
    /// monitor: flag state changes only through the operator setters.
    pub fn handle_message(&mut self, message: &Message) {
        match message.kind {
            kind::INTRUSION_REPORT if self.intrusion.state().armed => {
                match message.body.parse::<i32>() {
                    Ok(1) => info!("door trigger reported by sensor"),
                    Ok(2) => info!("window trigger reported by sensor"),
                    Ok(3) => info!("motion trigger reported by sensor"),
                    Ok(_) => debug!("no trigger reported by sensor"),
                    Err(e) => {
                        warn!(body = %message.body, error = %e, "malformed sensor code ignored");
                    }
                }
            }
            kind::FIRE_DETECTOR_REPORT if message.body.eq_ignore_ascii_case("ON") => {
                info!("fire trigger reported by detector");
            }
            _ => {}
        }
    }

    /// Time-driven checks, once per cycle.
    pub fn poll(&mut self, now_ms: u64) {
        let mut outbox = Outbox::new();
        self.fire.poll(now_ms, &mut outbox);
        self.queue(outbox);
    }

    /// Drains every message queued since the last cycle.
    pub fn take_pending(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.pending)
    }

    fn queue(&mut self, outbox: Outbox) {
        self.pending.extend(outbox);
    }
}

impl Default for FacilityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle over a [`FacilityMonitor`].
///
/// The background dispatch loop and the foreground operator console hold
/// clones of the same handle; every method locks the monitor for the whole
/// operation, so a console command can never observe or produce a
/// half-updated state.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    inner: Arc<Mutex<FacilityMonitor>>,
    start: Instant,
    id: u32,
}

impl MonitorHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FacilityMonitor::new())),
            start: Instant::now(),
            id: crate::roles::display_id(),
        }
    }

    pub fn status(&self) -> MonitorStatus {
        self.lock().status()
    }

    pub fn set_arm(&self, armed: bool) {
        self.lock().set_arm(armed);
    }

    pub fn set_door_open(&self, open: bool) {
        self.lock().set_sensor(SensorKind::Door, open);
    }

    pub fn set_window_broken(&self, broken: bool) {
        self.lock().set_sensor(SensorKind::Window, broken);
    }

    pub fn set_motion_detected(&self, detected: bool) {
        self.lock().set_sensor(SensorKind::Motion, detected);
    }

    pub fn reset_sensors(&self) {
        self.lock().reset_sensors();
    }

    pub fn trigger_fire(&self) {
        let now = self.now_ms();
        self.lock().trigger_fire(now);
    }

    pub fn confirm_sprinkler(&self) -> bool {
        self.lock().confirm_sprinkler()
    }

    pub fn cancel_fire(&self) -> bool {
        self.lock().cancel_fire()
    }

    pub fn cancel_sprinkler(&self) -> bool {
        self.lock().cancel_sprinkler()
    }

    pub fn halt(&self) {
        self.lock().halt();
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn lock(&self) -> MutexGuard<'_, FacilityMonitor> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MonitorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Role for MonitorHandle {
    fn name(&self) -> &'static str {
        "facility-monitor"
    }

    fn poll_period(&self) -> Duration {
        MONITOR_POLL_PERIOD
    }

    fn heartbeat(&self) -> Option<String> {
        Some(format!(
            "FacilityMonitor-{}#allows a guard to arm and disarm the security system",
            self.id
        ))
    }

    fn on_message(&mut self, message: &Message, _outbox: &mut Outbox) {
        self.lock().handle_message(message);
    }

    fn on_poll(&mut self, outbox: &mut Outbox) {
        let now = self.now_ms();
        let mut monitor = self.lock();
        monitor.poll(now);
        for message in monitor.take_pending() {
            let _ = outbox.push(message);
        }
    }
}
