pub mod fire_sensor;
pub mod maintenance_console;
pub mod security_controller;
pub mod security_sensor;
pub mod sprinkler_controller;

pub use fire_sensor::FireSensor;
pub use maintenance_console::MaintenanceConsole;
pub use security_controller::SecurityController;
pub use security_sensor::SecuritySensor;
pub use sprinkler_controller::SprinklerController;

use std::time::Duration;

/// Sleep between cycles for sensors and controllers.
pub(crate) const FIELD_DEVICE_POLL_PERIOD: Duration = Duration::from_millis(2500);

/// Display-only participant id carried in heartbeat names. Derived from the
/// wall clock at startup; nothing depends on its distribution.
pub(crate) fn display_id() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0)
        % 21
}
