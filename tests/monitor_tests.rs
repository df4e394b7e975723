use facbus::bus::{kind, Message, Outbox};
use facbus::dispatch::dispatch_batch;
use facbus::intrusion::{AlarmLamp, SensorKind};
use facbus::monitor::{FacilityMonitor, MonitorHandle};
use facbus::Role;

fn pending_kinds(monitor: &mut FacilityMonitor) -> Vec<i32> {
    monitor.take_pending().iter().map(|m| m.kind).collect()
}

#[test]
fn test_tripped_sensor_while_armed_rings_and_commands() {
    let mut monitor = FacilityMonitor::new();

    monitor.set_sensor(SensorKind::Door, true);

    let status = monitor.status();
    assert!(status.intrusion.door_open);
    assert_eq!(status.lamp, AlarmLamp::Ringing);

    let pending = monitor.take_pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, kind::ACTUATOR_COMMAND);
    assert_eq!(pending[0].body, "D1");
}

#[test]
fn test_disarmed_monitor_records_but_stays_silent() {
    let mut monitor = FacilityMonitor::new();
    monitor.set_arm(false);
    monitor.take_pending();

    monitor.set_sensor(SensorKind::Window, true);
    monitor.set_sensor(SensorKind::Motion, true);

    let status = monitor.status();
    assert!(status.intrusion.window_broken);
    assert!(status.intrusion.motion_detected);
    assert_eq!(status.lamp, AlarmLamp::Deactivated);
    assert!(monitor.take_pending().is_empty());
}

#[test]
fn test_rearming_picks_the_highest_priority_tripped_sensor() {
    let mut monitor = FacilityMonitor::new();
    monitor.set_arm(false);
    monitor.set_sensor(SensorKind::Motion, true);
    monitor.set_sensor(SensorKind::Door, true);
    monitor.take_pending();

    monitor.set_arm(true);

    let pending = monitor.take_pending();
    assert_eq!(pending.len(), 1, "one command per arm transition");
    assert_eq!(pending[0].body, "D1", "door outranks motion");
    assert_eq!(monitor.status().lamp, AlarmLamp::Ringing);
}

#[test]
fn test_reset_sensors_clears_flags_and_silences_lamp() {
    let mut monitor = FacilityMonitor::new();
    monitor.set_sensor(SensorKind::Window, true);
    monitor.take_pending();

    monitor.reset_sensors();

    let status = monitor.status();
    assert!(!status.intrusion.any_tripped());
    assert_eq!(status.lamp, AlarmLamp::Silent);

    // Clear commands go out for every sensor, in reset order.
    let pending = monitor.take_pending();
    let bodies: Vec<_> = pending.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["M0", "D0", "W0"]);
}

#[test]
fn test_fire_auto_escalation_through_polling() {
    let mut monitor = FacilityMonitor::new();

    monitor.trigger_fire(0);
    assert_eq!(pending_kinds(&mut monitor), vec![kind::FIRE_ALARM]);

    monitor.poll(9_999);
    assert!(monitor.take_pending().is_empty());
    assert!(!monitor.status().fire.sprinkler_on);

    monitor.poll(10_500);
    let pending = monitor.take_pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, kind::SPRINKLER_COMMAND);
    assert_eq!(pending[0].body, "ON");
    assert!(monitor.status().fire.sprinkler_on);

    // Once on, further polls are quiet.
    monitor.poll(20_000);
    assert!(monitor.take_pending().is_empty());
}

#[test]
fn test_full_fire_episode_message_sequence() {
    let mut monitor = FacilityMonitor::new();

    monitor.trigger_fire(1_000);
    assert!(monitor.confirm_sprinkler());
    assert!(monitor.cancel_sprinkler());

    let pending = monitor.take_pending();
    let sequence: Vec<_> = pending
        .iter()
        .map(|m| (m.kind, m.body.as_str()))
        .collect();
    assert_eq!(
        sequence,
        vec![
            (kind::FIRE_ALARM, "ON"),
            (kind::SPRINKLER_COMMAND, "ON"),
            (kind::SPRINKLER_COMMAND, "OFF"),
        ]
    );
    assert!(!monitor.status().fire.alarmed);
}

#[test]
fn test_cancel_fire_without_alarm_is_rejected() {
    let mut monitor = FacilityMonitor::new();
    assert!(!monitor.cancel_fire());
    assert!(!monitor.confirm_sprinkler());
    assert!(!monitor.cancel_sprinkler());
    assert!(monitor.take_pending().is_empty());
}

#[test]
fn test_handle_terminal_via_dispatch_shuts_the_role_down() {
    let mut handle = MonitorHandle::new();

    let batch = vec![Message::new(kind::TERMINAL, "XXX")];
    let (_, done) = dispatch_batch(&mut handle, &batch);
    assert!(done);
}

#[test]
fn test_monitor_heartbeat_record_shape() {
    let handle = MonitorHandle::new();
    let record = handle.heartbeat().expect("monitor announces itself");
    let (name, description) = facbus::liveness::split_record(&record);
    assert!(name.starts_with("FacilityMonitor-"));
    assert!(!description.is_empty());
}

#[test]
fn test_dispatch_cycle_publishes_queued_operator_commands() {
    let mut handle = MonitorHandle::new();
    handle.set_door_open(true);

    let mut outbox = Outbox::new();
    handle.on_poll(&mut outbox);

    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, kind::ACTUATOR_COMMAND);
    assert_eq!(outbox[0].body, "D1");
}
