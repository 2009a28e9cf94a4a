//! Overlay runtime task.
//!
//! Drives the aggregator from three inputs: the service's event channel,
//! the settings/session watch channels, and two periodic timers (a 30 s
//! unconditional full refresh and a 1 s local tick that only runs while
//! a stopwatch is displayed). The rendered list is published through a
//! `watch` channel; consumers never touch the aggregator directly.
//!
//! Toggling the feature off tears the timers down rather than muting
//! them: the inner loop exits, the intervals are dropped, and the event
//! subscription is re-acquired fresh on re-enable. Dropping the returned
//! [`OverlayHandle`] aborts the task.

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::alert::{Alert, AlertId, Category};
use crate::service::{OverlayService, ServiceEvent};

use super::{AlertPatch, OverlayAggregator, OverlaySettings, TickInterpolator};

const FULL_REFRESH_SECS: u64 = 30;
const LOCAL_TICK_MS: u64 = 1000;

/// Spawns and owns the aggregation task.
pub struct OverlayRuntime;

impl OverlayRuntime {
    /// Start the runtime against a service.
    ///
    /// `events` is the service's publish/subscribe channel, `settings`
    /// and `session_active` are watch inputs owned by the caller.
    pub fn spawn<S: OverlayService>(
        service: S,
        events: broadcast::Receiver<ServiceEvent>,
        settings: watch::Receiver<OverlaySettings>,
        session_active: watch::Receiver<bool>,
    ) -> OverlayHandle {
        let (out_tx, out_rx) = watch::channel(Vec::new());
        let worker = Worker {
            service,
            aggregator: OverlayAggregator::new(),
            interpolator: TickInterpolator::new(),
            events,
            events_open: true,
            settings,
            session_active,
            out: out_tx,
        };
        let task = tokio::spawn(worker.run());
        OverlayHandle {
            alerts: out_rx,
            task,
        }
    }
}

/// Scoped handle to a running overlay task.
///
/// Dropping it aborts the task; no callback fires into a torn-down
/// context afterwards.
pub struct OverlayHandle {
    alerts: watch::Receiver<Vec<Alert>>,
    task: tokio::task::JoinHandle<()>,
}

impl OverlayHandle {
    /// Subscribe to the rendered alert list.
    pub fn alerts(&self) -> watch::Receiver<Vec<Alert>> {
        self.alerts.clone()
    }

    /// The most recently published list.
    pub fn current(&self) -> Vec<Alert> {
        self.alerts.borrow().clone()
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Worker<S: OverlayService> {
    service: S,
    aggregator: OverlayAggregator,
    interpolator: TickInterpolator,
    events: broadcast::Receiver<ServiceEvent>,
    events_open: bool,
    settings: watch::Receiver<OverlaySettings>,
    session_active: watch::Receiver<bool>,
    out: watch::Sender<Vec<Alert>>,
}

impl<S: OverlayService> Worker<S> {
    async fn run(mut self) {
        loop {
            if !self.settings.borrow().enabled {
                self.suspend();
                loop {
                    if self.settings.changed().await.is_err() {
                        return;
                    }
                    if self.settings.borrow().enabled {
                        break;
                    }
                }
                // Fresh subscription; events published while disabled are
                // stale and the first refresh below supersedes them.
                self.events = self.events.resubscribe();
                self.events_open = true;
            }
            if !self.enabled_loop().await {
                return;
            }
        }
    }

    /// Runs while enabled. Returns `false` when every input channel is
    /// gone and the task should end, `true` on disable (torn down and
    /// restarted by `run`).
    async fn enabled_loop(&mut self) -> bool {
        let mut refresh = interval(Duration::from_secs(FULL_REFRESH_SECS));
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut local = interval(Duration::from_millis(LOCAL_TICK_MS));
        local.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let has_stopwatch = self
                .aggregator
                .alerts()
                .iter()
                .any(|a| a.category == Category::Stopwatch);

            tokio::select! {
                // First tick fires immediately: the initial mount refresh.
                _ = refresh.tick() => {
                    self.full_refresh().await;
                }
                _ = local.tick(), if has_stopwatch => {
                    self.interpolator.local_tick(&mut self.aggregator, Utc::now().timestamp());
                    self.publish();
                }
                changed = self.settings.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                    if !self.settings.borrow().enabled {
                        return true;
                    }
                    self.full_refresh().await;
                }
                changed = self.session_active.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                    self.full_refresh().await;
                }
                event = self.events.recv(), if self.events_open => {
                    match event {
                        Ok(event) => self.handle_event(event).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "event channel lagged; forcing refresh");
                            self.full_refresh().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            // Service stopped publishing; periodic refresh
                            // remains the safety net.
                            self.events_open = false;
                        }
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: ServiceEvent) {
        match event {
            // Structural updates invalidate the whole set.
            ServiceEvent::TimersUpdated
            | ServiceEvent::AlarmsUpdated
            | ServiceEvent::RemindersUpdated
            | ServiceEvent::StopwatchUpdated
            | ServiceEvent::PomodoroStarted
            | ServiceEvent::PomodoroStopped
            | ServiceEvent::PomodoroPhaseChanged
            | ServiceEvent::SettingsUpdated => {
                self.full_refresh().await;
            }
            ServiceEvent::TimerTick { id, remaining } => {
                let id = AlertId::compose(Category::Timer, &id);
                if self
                    .interpolator
                    .push_tick(&mut self.aggregator, &id, remaining, None)
                {
                    self.publish();
                }
            }
            ServiceEvent::PomodoroTick {
                remaining,
                session,
                is_break,
            } => {
                let label = if is_break {
                    "Break".to_string()
                } else {
                    format!("Session {session}")
                };
                let patch = AlertPatch {
                    remaining: Some(remaining),
                    label: Some(label),
                };
                if self.aggregator.patch_category(Category::Pomodoro, patch) {
                    self.publish();
                }
            }
            // Badge/inhibitor state is consumer-facing, not part of the
            // alert set.
            ServiceEvent::SleepInhibitorChanged { .. }
            | ServiceEvent::MissedAlertsChanged { .. } => {}
        }
    }

    /// Fetch an authoritative snapshot and replace the list. Failures
    /// keep the last known state; the next trigger retries naturally.
    async fn full_refresh(&mut self) {
        match self.service.overlay_snapshot().await {
            Ok(snapshot) => {
                let now = Utc::now().timestamp();
                let settings = self.settings.borrow().clone();
                self.aggregator.replace_all(settings.apply(snapshot.alerts, now));
                self.interpolator.reset();
                self.publish();
            }
            Err(error) => {
                tracing::warn!(%error, "overlay snapshot fetch failed; keeping last known state");
            }
        }
    }

    /// Feature disabled: force the list empty and drop interpolation state.
    fn suspend(&mut self) {
        self.aggregator.clear();
        self.interpolator.reset();
        self.publish();
    }

    fn publish(&self) {
        let _ = self.out.send(self.aggregator.alerts().to_vec());
    }
}
