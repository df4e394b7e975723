use crate::bus::{kind, Message, Outbox};
use crate::dispatch::Role;
use crate::liveness::{split_record, LivenessTracker};
use std::time::Duration;
use tracing::{info, warn};

/// Sleep between liveness sweeps.
pub(crate) const MAINTENANCE_POLL_PERIOD: Duration = Duration::from_millis(5000);

/// Watches heartbeat traffic and reports which participants are up.
///
/// Heartbeat bodies collected during a cycle are folded into the tracker when
/// the cycle's periodic check runs. A participant is up if its record arrived
/// this cycle and down if it was ever seen but did not. The console only
/// listens; it publishes nothing and sends no heartbeat of its own.
#[derive(Debug, Default)]
pub struct MaintenanceConsole {
    tracker: LivenessTracker,
    cycle_records: Vec<String>,
}

impl MaintenanceConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known_count(&self) -> usize {
        self.tracker.known_count()
    }
}

impl Role for MaintenanceConsole {
    fn name(&self) -> &'static str {
        "maintenance-console"
    }

    fn poll_period(&self) -> Duration {
        MAINTENANCE_POLL_PERIOD
    }

    fn on_message(&mut self, message: &Message, _outbox: &mut Outbox) {
        if message.kind == kind::HEARTBEAT {
            self.cycle_records.push(message.body.clone());
        }
    }

    fn on_poll(&mut self, _outbox: &mut Outbox) {
        let records = std::mem::take(&mut self.cycle_records);
        let report = self.tracker.observe_cycle(&records);

        info!("----- participant check start -----");
        for (i, record) in report.online.iter().enumerate() {
            let (name, description) = split_record(record);
            info!("{}. {} is on: {}", i + 1, name, description);
        }
        for record in &report.offline {
            let (name, _) = split_record(record);
            warn!("* {} is off", name);
        }
        info!("----- participant check end -----");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch_batch;

    #[test]
    fn test_heartbeats_accumulate_and_clear_each_cycle() {
        let mut console = MaintenanceConsole::new();
        let batch = vec![
            Message::new(kind::HEARTBEAT, "A#first"),
            Message::new(kind::HEARTBEAT, "B#second"),
        ];

        dispatch_batch(&mut console, &batch);
        assert_eq!(console.known_count(), 2);

        // Next cycle starts from an empty buffer.
        dispatch_batch(&mut console, &[]);
        assert_eq!(console.known_count(), 2);
        assert!(console.cycle_records.is_empty());
    }

    #[test]
    fn test_non_heartbeat_traffic_ignored() {
        let mut console = MaintenanceConsole::new();
        let batch = vec![Message::new(kind::INTRUSION_REPORT, "1")];
        dispatch_batch(&mut console, &batch);
        assert_eq!(console.known_count(), 0);
    }
}
