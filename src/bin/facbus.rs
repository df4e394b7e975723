use clap::{App, Arg};
use colored::*;
use facbus::dispatch::DispatchLoop;
use facbus::hub::MessageHub;
use facbus::intrusion::AlarmLamp;
use facbus::monitor::MonitorHandle;
use facbus::roles::{
    FireSensor, MaintenanceConsole, SecurityController, SecuritySensor, SprinklerController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let matches = App::new("facbus")
        .version("0.1.0")
        .about("Facility security and fire-suppression network simulator")
        .arg(
            Arg::with_name("bus")
                .short("b")
                .long("bus")
                .value_name("ADDRESS")
                .help("Message hub address (informational; the hub runs in-process)")
                .takes_value(true)
                .default_value("local"),
        )
        .get_matches();

    let bus = matches.value_of("bus").unwrap();
    info!(bus, "starting the facility network");

    println!("{}", "🏛  Facility Security Console".bright_blue().bold());
    println!("{}", "=============================".bright_blue());

    let hub = MessageHub::new();
    let monitor = MonitorHandle::new();

    let mut participants: Vec<JoinHandle<()>> = Vec::new();
    participants.push(spawn_participant(&hub, monitor.clone()));
    participants.push(spawn_participant(&hub, SecuritySensor::new()));
    participants.push(spawn_participant(&hub, SecurityController::new()));
    participants.push(spawn_participant(&hub, FireSensor::new()));
    participants.push(spawn_participant(&hub, SprinklerController::new()));
    participants.push(spawn_participant(&hub, MaintenanceConsole::new()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_menu(&monitor);
        let Some(line) = lines.next_line().await? else {
            monitor.halt();
            break;
        };

        match line.trim() {
            "1" => {
                monitor.set_arm(true);
                println!("{}", "Security system armed".bright_green());
            }
            "2" => {
                monitor.set_arm(false);
                println!("{}", "Security system disarmed".yellow());
            }
            "3" => {
                monitor.set_motion_detected(true);
                println!("{}", "Motion trigger simulated".bright_cyan());
            }
            "4" => {
                monitor.set_door_open(true);
                println!("{}", "Door break trigger simulated".bright_cyan());
            }
            "5" => {
                monitor.set_window_broken(true);
                println!("{}", "Window break trigger simulated".bright_cyan());
            }
            "6" => {
                monitor.reset_sensors();
                println!("{}", "All intrusion sensors reset".bright_green());
            }
            "7" => {
                monitor.trigger_fire();
                println!(
                    "{}",
                    "Fire alarm raised; sprinkler starts in 10s unless confirmed or cancelled"
                        .bright_red()
                        .bold()
                );
            }
            "8" => {
                if monitor.confirm_sprinkler() {
                    println!("{}", "Sprinkler activation confirmed".bright_green());
                } else {
                    println!("{}", "No fire alarm to confirm against".yellow());
                }
            }
            "9" => {
                if monitor.cancel_fire() {
                    println!("{}", "Fire alarm cancelled".bright_green());
                } else {
                    println!("{}", "No fire alarm to cancel".yellow());
                }
            }
            "10" => {
                if monitor.cancel_sprinkler() {
                    println!("{}", "Sprinkler shut off".bright_green());
                } else {
                    println!("{}", "Sprinkler is not running".yellow());
                }
            }
            "s" | "S" => {
                println!("{}", serde_json::to_string_pretty(&monitor.status())?);
            }
            "x" | "X" => {
                monitor.halt();
                break;
            }
            "" => {}
            other => {
                println!("{} {}", "Unrecognized option:".yellow(), other);
            }
        }
    }

    println!("{}", "Stopping the facility network...".dimmed());
    for handle in participants {
        let _ = handle.await;
    }
    println!("{}", "🏛  Facility network stopped".bright_blue());

    Ok(())
}

fn spawn_participant<R>(hub: &MessageHub, role: R) -> JoinHandle<()>
where
    R: facbus::dispatch::Role + Send + 'static,
{
    let client = hub.client();
    tokio::spawn(async move {
        if let Err(e) = DispatchLoop::new(client, role).run().await {
            tracing::error!(error = %e, "participant exited with a bus error");
        }
    })
}

fn print_menu(monitor: &MonitorHandle) {
    let status = monitor.status();
    let armed = if status.intrusion.armed {
        "ARMED".bright_green()
    } else {
        "DISARMED".yellow()
    };
    let lamp = match status.lamp {
        AlarmLamp::Ringing => "RINGING".bright_red(),
        AlarmLamp::Silent => "silent".normal(),
        AlarmLamp::Deactivated => "deactivated".dimmed(),
    };
    let fire = if status.fire.sprinkler_on {
        "SPRINKLER ON".bright_red()
    } else if status.fire.alarmed {
        "ALARM".bright_red()
    } else {
        "clear".normal()
    };

    println!();
    println!(
        "{} security: {} | alarm lamp: {} | fire: {}",
        "Status".bright_white().bold(),
        armed,
        lamp,
        fire
    );
    println!("  1: arm system          2: disarm system");
    println!("  3: trip motion         4: trip door");
    println!("  5: trip window         6: reset sensors");
    println!("  7: trigger fire alarm  8: confirm sprinkler");
    println!("  9: cancel fire alarm  10: cancel sprinkler");
    println!("  s: dump monitor status  x: stop the network");
    print!("{}", "> ".bright_white());
    use std::io::Write;
    let _ = std::io::stdout().flush();
}
