use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use log::{error, info};
use rusqlite::{params, Connection};
use tokio::sync::oneshot;

mod migrations;
mod models;

use migrations::run_migrations;
pub use models::{EntryStatus, HistoryEntry, HistoryStats, Period};

use crate::exercises::Category;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct HistoryDbInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for HistoryDbInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to history DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join history DB thread: {join_err:?}");
            }
        }
    }
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid datetime '{value}': {err}"))
}

fn status_from_str(value: &str) -> Result<EntryStatus> {
    match value {
        "Completed" => Ok(EntryStatus::Completed),
        "Skipped" => Ok(EntryStatus::Skipped),
        _ => Err(anyhow!("unknown entry status '{value}'")),
    }
}

fn category_from_str(value: &str) -> Result<Category> {
    Category::parse(value).ok_or_else(|| anyhow!("unknown category '{value}'"))
}

/// Exercise history storage. A single SQLite connection lives on a dedicated
/// worker thread; callers submit closures and await the reply.
#[derive(Clone)]
pub struct HistoryDb {
    inner: Arc<HistoryDbInner>,
    db_path: Arc<PathBuf>,
}

impl HistoryDb {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("pausa-history".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("History DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("History database thread shutting down");
            })
            .with_context(|| "failed to spawn history database worker thread")?;

        ready_rx
            .recv()
            .context("history database worker exited before signaling readiness")??;

        info!("History database initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(HistoryDbInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("History DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to history DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("history database thread terminated unexpectedly"))?
    }

    pub async fn insert_entry(&self, entry: &HistoryEntry) -> Result<()> {
        let record = entry.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO history (id, exercise_id, exercise_name, category, status, duration_secs, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.exercise_id,
                    record.exercise_name,
                    record.category.as_str(),
                    record.status.as_str(),
                    record.duration_secs,
                    record.completed_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert history entry")?;
            Ok(())
        })
        .await
    }

    /// Entries newest first, optionally limited to today or the last seven
    /// days relative to `now`.
    pub async fn list_entries(&self, period: Period, now: DateTime<Utc>) -> Result<Vec<HistoryEntry>> {
        let cutoff = period_cutoff(period, now).map(|dt| dt.to_rfc3339());
        self.execute(move |conn| {
            let mut entries = Vec::new();
            let mut push_row = |row: &rusqlite::Row<'_>| -> Result<()> {
                entries.push(HistoryEntry {
                    id: row.get(0)?,
                    exercise_id: row.get(1)?,
                    exercise_name: row.get(2)?,
                    category: category_from_str(&row.get::<_, String>(3)?)?,
                    status: status_from_str(&row.get::<_, String>(4)?)?,
                    duration_secs: row.get(5)?,
                    completed_at: parse_datetime(&row.get::<_, String>(6)?)?,
                });
                Ok(())
            };

            match cutoff {
                Some(cutoff) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, exercise_id, exercise_name, category, status, duration_secs, completed_at
                         FROM history
                         WHERE completed_at >= ?1
                         ORDER BY completed_at DESC",
                    )?;
                    let mut rows = stmt.query(params![cutoff])?;
                    while let Some(row) = rows.next()? {
                        push_row(row)?;
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, exercise_id, exercise_name, category, status, duration_secs, completed_at
                         FROM history
                         ORDER BY completed_at DESC",
                    )?;
                    let mut rows = stmt.query([])?;
                    while let Some(row) = rows.next()? {
                        push_row(row)?;
                    }
                }
            }

            Ok(entries)
        })
        .await
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<HistoryStats> {
        let today_start = day_start(now.date_naive()).to_rfc3339();
        let week_start = (now - Duration::days(7)).to_rfc3339();
        let today = now.date_naive();

        self.execute(move |conn| {
            let today_completed: u32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM history WHERE status = 'Completed' AND completed_at >= ?1",
                    params![today_start],
                    |row| row.get(0),
                )
                .context("failed to count today's completed entries")?;
            let today_skipped: u32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM history WHERE status = 'Skipped' AND completed_at >= ?1",
                    params![today_start],
                    |row| row.get(0),
                )
                .context("failed to count today's skipped entries")?;
            let weekly_completed: u32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM history WHERE status = 'Completed' AND completed_at >= ?1",
                    params![week_start],
                    |row| row.get(0),
                )
                .context("failed to count this week's completed entries")?;
            let total_secs: u32 = conn
                .query_row(
                    "SELECT COALESCE(SUM(duration_secs), 0) FROM history WHERE status = 'Completed'",
                    [],
                    |row| row.get(0),
                )
                .context("failed to sum exercise durations")?;

            let mut stmt = conn.prepare(
                "SELECT DISTINCT date(completed_at) FROM history
                 WHERE status = 'Completed'
                 ORDER BY 1 DESC",
            )?;
            let mut active_days = Vec::new();
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let day: String = row.get(0)?;
                active_days.push(
                    NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                        .map_err(|err| anyhow!("invalid date '{day}': {err}"))?,
                );
            }

            Ok(HistoryStats {
                today_completed,
                today_skipped,
                total_minutes: total_secs / 60,
                streak: streak_from(&active_days, today),
                weekly_completed,
            })
        })
        .await
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn period_cutoff(period: Period, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match period {
        Period::Today => Some(day_start(now.date_naive())),
        Period::Week => Some(now - Duration::days(7)),
        Period::All => None,
    }
}

/// Consecutive days with at least one completed exercise, ending today. A
/// run that ended yesterday still counts; older runs do not.
fn streak_from(active_days_desc: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(first) = active_days_desc.first() else {
        return 0;
    };

    let mut expected = if *first == today {
        today
    } else if today.pred_opt() == Some(*first) {
        *first
    } else {
        return 0;
    };

    let mut streak = 0;
    for day in active_days_desc {
        if *day != expected {
            break;
        }
        streak += 1;
        match expected.checked_sub_days(Days::new(1)) {
            Some(prev) => expected = prev,
            None => break,
        }
    }

    streak
}
