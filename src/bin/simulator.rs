use facbus::dispatch::{DispatchLoop, Role};
use facbus::hub::MessageHub;
use facbus::monitor::MonitorHandle;
use facbus::roles::{
    FireSensor, MaintenanceConsole, SecurityController, SecuritySensor, SprinklerController,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::info;

/// Headless demonstration run: stands up the whole facility network, walks
/// it through an intrusion and a fire with automatic sprinkler escalation,
/// then shuts everything down over the bus.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("🏛  Facility Network Simulator");
    println!("==============================");

    let hub = MessageHub::new();
    let monitor = MonitorHandle::new();

    let mut participants: Vec<JoinHandle<()>> = Vec::new();
    participants.push(spawn_participant(&hub, monitor.clone()));
    participants.push(spawn_participant(&hub, SecuritySensor::new()));
    participants.push(spawn_participant(&hub, SecurityController::new()));
    participants.push(spawn_participant(&hub, FireSensor::new()));
    participants.push(spawn_participant(&hub, SprinklerController::new()));
    participants.push(spawn_participant(&hub, MaintenanceConsole::new()));

    // Let everyone register and publish a first heartbeat.
    time::sleep(Duration::from_millis(1500)).await;
    info!(participants = hub.participant_count(), "network is up");

    info!("scenario: door break while armed");
    monitor.set_door_open(true);
    time::sleep(Duration::from_secs(6)).await;

    info!("scenario: guard resets the sensors");
    monitor.reset_sensors();
    time::sleep(Duration::from_secs(4)).await;

    info!("scenario: fire alarm with unattended escalation");
    monitor.trigger_fire();

    // Nobody confirms or cancels, so the sprinkler starts on its own after
    // the 10 second hold-off.
    time::sleep(Duration::from_secs(13)).await;
    let status = monitor.status();
    info!(
        sprinkler_on = status.fire.sprinkler_on,
        "escalation window elapsed"
    );

    info!("scenario: guard shuts the sprinkler off");
    monitor.cancel_sprinkler();
    time::sleep(Duration::from_secs(4)).await;

    monitor.halt();
    for handle in participants {
        let _ = handle.await;
    }

    println!("🏛  Facility network stopped");
    Ok(())
}

fn spawn_participant<R>(hub: &MessageHub, role: R) -> JoinHandle<()>
where
    R: Role + Send + 'static,
{
    let client = hub.client();
    tokio::spawn(async move {
        if let Err(e) = DispatchLoop::new(client, role).run().await {
            tracing::error!(error = %e, "participant exited with a bus error");
        }
    })
}
