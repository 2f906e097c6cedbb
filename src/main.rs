use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use log::{info, warn};

use pausa::{
    display::format_countdown,
    notify::DesktopNotifier,
    reminder::{ReminderController, ReminderEvent},
    HistoryDb, SettingsStore,
};

fn data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".local/share/pausa"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("pausa starting up...");

    let data_dir = data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

    let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);
    let history = HistoryDb::new(data_dir.join("history.sqlite3"))?;

    let controller = ReminderController::new(
        settings.clone(),
        Box::new(DesktopNotifier::new()),
        history.clone(),
    );
    let mut events = controller.subscribe();

    let window = settings.work_window();
    info!(
        "Work window {} - {}, every {} min",
        window.start_time.format("%H:%M"),
        window.end_time.format("%H:%M"),
        window.interval_minutes
    );

    let report = controller.set_enabled(true).await?;
    println!(
        "{} reminders scheduled for {} - {}",
        report.registered,
        window.start_time.format("%H:%M"),
        window.end_time.format("%H:%M"),
    );
    for error in &report.errors {
        warn!("reminder registration failed: {error}");
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ReminderEvent::CountdownTick(countdown)) => {
                    print!("\r{}        ", format_countdown(&countdown));
                    use std::io::Write;
                    let _ = std::io::stdout().flush();
                }
                Ok(ReminderEvent::BreakDue) => {
                    println!("\nBreak time! Take a moment away from the screen.");
                    if let Some(exercise) =
                        pausa::exercises::pick_random(&settings.enabled_categories())
                    {
                        println!("Suggested: {} - {}", exercise.name, exercise.description);
                    }
                }
                Ok(ReminderEvent::ScheduleUpdated { registered }) => {
                    info!("Schedule updated; {registered} reminders registered");
                }
                Err(err) => {
                    warn!("event stream closed: {err}");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\nShutting down");
                break;
            }
        }
    }

    controller.shutdown().await;
    Ok(())
}
