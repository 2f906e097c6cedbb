use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{Local, Utc};
use log::{error, info};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time,
};
use uuid::Uuid;

use crate::{
    exercises::Exercise,
    history::{EntryStatus, HistoryDb, HistoryEntry},
    notify::{
        register_reminders, NotificationService, RegistrationReport, ReminderContent, SpecStyle,
    },
    schedule::{countdown, Countdown, WorkWindow},
    settings::SettingsStore,
};

#[derive(Debug, Clone)]
pub enum ReminderEvent {
    CountdownTick(Countdown),
    BreakDue,
    ScheduleUpdated { registered: usize },
}

struct ControllerState {
    window: WorkWindow,
    last: Countdown,
}

/// Owns the reminder lifecycle: persists configuration changes, re-registers
/// the day's triggers with the notification service, and runs the one-second
/// ticker that feeds countdown updates to subscribers.
#[derive(Clone)]
pub struct ReminderController {
    state: Arc<Mutex<ControllerState>>,
    notifier: Arc<Mutex<Box<dyn NotificationService + Send>>>,
    settings: Arc<SettingsStore>,
    history: HistoryDb,
    events: broadcast::Sender<ReminderEvent>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl ReminderController {
    pub fn new(
        settings: Arc<SettingsStore>,
        notifier: Box<dyn NotificationService + Send>,
        history: HistoryDb,
    ) -> Self {
        let window = settings.work_window();
        let last = countdown(&window, Local::now().naive_local());
        let (events, _) = broadcast::channel(64);

        Self {
            state: Arc::new(Mutex::new(ControllerState { window, last })),
            notifier: Arc::new(Mutex::new(notifier)),
            settings,
            history,
            events,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReminderEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Countdown {
        let guard = self.state.lock().await;
        countdown(&guard.window, Local::now().naive_local())
    }

    /// Persists the new window, then clears and re-registers reminders with
    /// the notification service. Best effort: a partial registration failure
    /// is reported but the saved configuration stands.
    pub async fn apply_window(&self, window: WorkWindow) -> Result<RegistrationReport> {
        self.settings.update_work_window(window)?;

        let now = Local::now();
        let content = self.reminder_content();
        let report = {
            let mut notifier = self.notifier.lock().await;
            register_reminders(
                &mut **notifier,
                &window,
                now.date_naive(),
                now.naive_local(),
                SpecStyle::Calendar,
                &content,
            )
        };

        {
            let mut state = self.state.lock().await;
            state.window = window;
            state.last = countdown(&window, Local::now().naive_local());
        }

        if window.enabled {
            self.spawn_ticker().await;
        } else {
            self.cancel_ticker().await;
        }

        let _ = self.events.send(ReminderEvent::ScheduleUpdated {
            registered: report.registered,
        });

        Ok(report)
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<RegistrationReport> {
        let mut window = self.settings.work_window();
        window.enabled = enabled;
        self.apply_window(window).await
    }

    /// Records a finished guided exercise ("Complete" or "Skip").
    pub async fn record_exercise(&self, exercise: &Exercise, completed: bool) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            exercise_id: exercise.id.to_string(),
            exercise_name: exercise.name.to_string(),
            category: exercise.category,
            status: if completed {
                EntryStatus::Completed
            } else {
                EntryStatus::Skipped
            },
            duration_secs: exercise.duration_secs,
            completed_at: Utc::now(),
        };

        self.history.insert_entry(&entry).await?;
        info!(
            "Recorded {} exercise '{}' ({})",
            entry.status.as_str(),
            entry.exercise_name,
            entry.id
        );

        Ok(entry)
    }

    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let notifier = self.notifier.clone();
        let settings = self.settings.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            loop {
                interval.tick().await;

                let now = Local::now().naive_local();
                let (current, break_due) = {
                    let mut guard = state.lock().await;
                    if !guard.window.enabled {
                        break;
                    }
                    let next = countdown(&guard.window, now);
                    let due = boundary_crossed(&guard.last, &next);
                    guard.last = next;
                    (next, due)
                };

                if break_due {
                    let content = ReminderContent {
                        sound: settings.sound_enabled(),
                        ..Default::default()
                    };
                    if let Err(err) = notifier.lock().await.deliver(&content) {
                        error!("Failed to deliver break reminder: {err:#}");
                    }
                    let _ = events.send(ReminderEvent::BreakDue);
                }

                let _ = events.send(ReminderEvent::CountdownTick(current));
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    fn reminder_content(&self) -> ReminderContent {
        ReminderContent {
            sound: self.settings.sound_enabled(),
            ..Default::default()
        }
    }
}

/// True when the countdown has crossed a trigger instant between two
/// consecutive observations: entering the window fires the start-of-window
/// reminder, and a remaining value that grew back to a full interval means a
/// cycle boundary passed.
fn boundary_crossed(prev: &Countdown, next: &Countdown) -> bool {
    match (prev, next) {
        (Countdown::BeforeWindow { .. }, Countdown::InWindow { .. }) => true,
        (Countdown::InWindow { remaining_secs: a }, Countdown::InWindow { remaining_secs: b }) => {
            b > a
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{TriggerHandle, TriggerSpec};
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct MockInner {
        cancels: usize,
        scheduled: Vec<TriggerSpec>,
        delivered: usize,
    }

    #[derive(Clone, Default)]
    struct MockService {
        inner: Arc<StdMutex<MockInner>>,
    }

    impl NotificationService for MockService {
        fn cancel_all(&mut self) {
            let mut inner = self.inner.lock().unwrap();
            inner.cancels += 1;
            inner.scheduled.clear();
        }

        fn schedule(
            &mut self,
            spec: TriggerSpec,
            _content: &ReminderContent,
        ) -> Result<TriggerHandle> {
            let mut inner = self.inner.lock().unwrap();
            inner.scheduled.push(spec);
            Ok(TriggerHandle(inner.scheduled.len() as u64))
        }

        fn deliver(&mut self, _content: &ReminderContent) -> Result<()> {
            self.inner.lock().unwrap().delivered += 1;
            Ok(())
        }
    }

    fn temp_path(suffix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pausa-controller-{}-{suffix}", Uuid::new_v4()))
    }

    fn controller() -> (ReminderController, MockService) {
        let settings = Arc::new(SettingsStore::new(temp_path("settings.json")).unwrap());
        let history = HistoryDb::new(temp_path("history.sqlite3")).unwrap();
        let mock = MockService::default();
        let controller = ReminderController::new(settings, Box::new(mock.clone()), history);
        (controller, mock)
    }

    #[tokio::test]
    async fn apply_window_persists_and_registers() {
        let (controller, mock) = controller();
        let window = WorkWindow::new("09:00", "17:00", 60, true).unwrap();

        let report = controller.apply_window(window).await.unwrap();
        assert_eq!(report.requested, 8);
        assert_eq!(report.registered, 8);

        let inner = mock.inner.lock().unwrap();
        assert_eq!(inner.cancels, 1);
        assert_eq!(inner.scheduled.len(), 8);
        drop(inner);

        assert_eq!(controller.settings.work_window(), window);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn disabling_clears_registrations() {
        let (controller, mock) = controller();
        let window = WorkWindow::new("09:00", "17:00", 60, true).unwrap();
        controller.apply_window(window).await.unwrap();

        let report = controller.set_enabled(false).await.unwrap();
        assert_eq!(report.requested, 0);

        let inner = mock.inner.lock().unwrap();
        assert!(inner.scheduled.is_empty());
        drop(inner);

        assert!(!controller.settings.work_window().enabled);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn record_exercise_lands_in_history() {
        let (controller, _mock) = controller();
        let exercise = crate::exercises::find_by_id("stretch-2").unwrap();

        controller.record_exercise(exercise, true).await.unwrap();
        controller.record_exercise(exercise, false).await.unwrap();

        let entries = controller
            .history
            .list_entries(crate::history::Period::All, Utc::now())
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].exercise_name, "Shoulder Shrugs");
        assert_ne!(entries[0].status, entries[1].status);
        controller.shutdown().await;
    }

    #[test]
    fn boundary_detection_fires_on_window_entry_and_cycle_wrap() {
        let before = Countdown::BeforeWindow { remaining_secs: 1 };
        let in_full = Countdown::InWindow { remaining_secs: 3600 };
        let in_mid = Countdown::InWindow { remaining_secs: 1200 };

        assert!(boundary_crossed(&before, &in_full));
        assert!(boundary_crossed(&in_mid, &in_full));
        assert!(!boundary_crossed(&in_full, &in_mid));
        assert!(!boundary_crossed(&in_mid, &Countdown::AfterWindow));
        assert!(!boundary_crossed(&Countdown::Paused, &in_mid));
    }
}
