use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::SystemTime;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::callbacks::{BackgroundAudio, HealthCheckCallback, RestartCallback};
use super::config::{ListeningSessionConfig, ListeningSessionConfigUpdate};
use super::events::{SessionChange, SessionEvent};
use super::state::{ListeningMode, ListeningSessionState};

/// `last_error` recorded when the attempt cap is exceeded.
pub const MAX_RESTART_ERROR: &str = "Max restart attempts exceeded";

const EVENT_CAPACITY: usize = 64;

/// Supervises one continuous listening session.
///
/// Cheap to clone; every clone drives the same session. Timers run as tokio
/// tasks holding only a weak reference, so dropping the last handle ends them.
///
/// Invariants:
/// - at most one restart (timer or in-flight callback) is outstanding
/// - `stop()` cancels every timer before returning
/// - a restart that resolves after `stop()`/`start()` is discarded (epoch guard)
/// - nothing here panics or returns an error; failures only show up in state
#[derive(Clone)]
pub struct ListeningSessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    core: Mutex<Core>,
    events: broadcast::Sender<SessionEvent>,
}

struct Core {
    config: ListeningSessionConfig,
    state: ListeningSessionState,
    /// Bumped on every start and teardown; stale timers compare against it.
    epoch: u64,
    keep_alive: Option<CancellationToken>,
    restart_timer: Option<CancellationToken>,
    health_check: Option<HealthCheckCallback>,
    restart: Option<RestartCallback>,
    background_audio: Option<Arc<dyn BackgroundAudio>>,
    background_enabled: bool,
}

impl Core {
    fn is_current(&self, epoch: u64) -> bool {
        self.state.is_active && self.epoch == epoch
    }

    /// Cancel timers, invalidate in-flight work, release background audio.
    fn teardown(&mut self) {
        if let Some(token) = self.keep_alive.take() {
            token.cancel();
        }
        if let Some(token) = self.restart_timer.take() {
            token.cancel();
        }
        self.epoch += 1;
        self.state.restart_pending = false;
        self.set_background_audio(false);
    }

    fn set_background_audio(&mut self, enabled: bool) {
        if self.background_enabled == enabled {
            return;
        }
        let Some(audio) = self.background_audio.clone() else {
            return;
        };
        match audio.set_background_capture(enabled) {
            Ok(()) => self.background_enabled = enabled,
            Err(e) => warn!("Background audio toggle ({}) failed: {}", enabled, e),
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let core = self.core.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = core.keep_alive.take() {
            token.cancel();
        }
        if let Some(token) = core.restart_timer.take() {
            token.cancel();
        }
    }
}

impl Default for ListeningSessionManager {
    fn default() -> Self {
        Self::new(ListeningSessionConfig::default())
    }
}

impl ListeningSessionManager {
    pub fn new(config: ListeningSessionConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                core: Mutex::new(Core {
                    config,
                    state: ListeningSessionState::default(),
                    epoch: 0,
                    keep_alive: None,
                    restart_timer: None,
                    health_check: None,
                    restart: None,
                    background_audio: None,
                    background_enabled: false,
                }),
                events,
            }),
        }
    }

    // --- Collaborators (each setter replaces the previous one) ---

    pub fn set_health_check_callback<F>(&self, callback: F)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.lock().health_check = Some(Arc::new(callback));
    }

    pub fn set_restart_callback<F, Fut>(&self, callback: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let callback: RestartCallback = Arc::new(move || Box::pin(callback()));
        self.lock().restart = Some(callback);
    }

    pub fn set_background_audio(&self, audio: Arc<dyn BackgroundAudio>) {
        self.lock().background_audio = Some(audio);
    }

    /// State-change stream. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn get_state(&self) -> ListeningSessionState {
        self.lock().state.clone()
    }

    pub fn config(&self) -> ListeningSessionConfig {
        self.lock().config.clone()
    }

    // --- Lifecycle ---

    pub fn start(&self, mode: ListeningMode) {
        let mut core = self.lock();
        if core.state.is_active {
            info!(session = ?core.state.session_id, "Session already active; starting a fresh one");
            core.teardown();
        }

        core.epoch += 1;
        let session_id = Uuid::new_v4();
        core.state = ListeningSessionState {
            session_id: Some(session_id),
            is_active: true,
            mode,
            ..ListeningSessionState::default()
        };

        if mode == ListeningMode::Continuous {
            core.set_background_audio(true);
            if core.config.enable_keep_alive {
                self.arm_keep_alive(&mut core);
            }
        }

        info!(session = %session_id, %mode, "Listening session started");
        self.publish(&core, SessionChange::Started);
    }

    /// Idempotent. A restart already running is left to finish; its result is dropped.
    pub fn stop(&self) {
        let mut core = self.lock();
        let was_active = core.state.is_active;
        core.teardown();
        core.state.is_active = false;
        core.state.restart_attempts = 0;
        core.state.last_error = None;

        if was_active {
            info!(session = ?core.state.session_id, "Listening session stopped");
            self.publish(&core, SessionChange::Stopped);
        } else {
            debug!("stop() on inactive session");
        }
    }

    /// Error reported by the utterance pipeline. Triggers a restart right
    /// away instead of waiting for the next keep-alive tick.
    pub fn on_error(&self, message: &str) {
        let mut core = self.lock();
        if !core.state.is_active {
            debug!(error = message, "Ignoring error for inactive session");
            return;
        }

        warn!(session = ?core.state.session_id, error = message, "Recognizer error reported");
        core.state.last_error = Some(message.to_string());
        self.publish(
            &core,
            SessionChange::ErrorReported {
                message: message.to_string(),
            },
        );

        if core.config.auto_restart {
            self.schedule_restart(&mut core, message);
        }
    }

    pub fn update_config(&self, update: ListeningSessionConfigUpdate) {
        let mut core = self.lock();
        let before = core.config.clone();
        core.config.apply(update);

        let keep_alive_changed = before.enable_keep_alive != core.config.enable_keep_alive
            || before.keep_alive_interval_ms != core.config.keep_alive_interval_ms;
        if keep_alive_changed
            && core.state.is_active
            && core.state.mode == ListeningMode::Continuous
        {
            if let Some(token) = core.keep_alive.take() {
                token.cancel();
            }
            if core.config.enable_keep_alive {
                self.arm_keep_alive(&mut core);
            }
        }

        debug!(config = ?core.config, "Session config updated");
        self.publish(&core, SessionChange::ConfigUpdated);
    }

    /// One keep-alive tick. Public so drivers can force a check.
    pub fn check_health(&self) {
        let (callback, epoch) = {
            let core = self.lock();
            if !core.state.is_active {
                return;
            }
            match core.health_check.clone() {
                Some(cb) => (cb, core.epoch),
                None => {
                    warn!("No health check callback registered; skipping keep-alive tick");
                    return;
                }
            }
        };

        // Run outside the lock; the callback may read session state.
        let healthy = callback();

        let mut core = self.lock();
        if !core.is_current(epoch) {
            return;
        }

        if healthy {
            // Attempts belong to the outstanding restart until it resolves
            if core.state.restart_attempts > 0 && !core.state.restart_pending {
                info!(attempts = core.state.restart_attempts, "Recognizer healthy again");
                core.state.restart_attempts = 0;
                self.publish(&core, SessionChange::HealthRestored);
            }
        } else {
            warn!(session = ?core.state.session_id, "Health check failed");
            if core.config.auto_restart {
                self.schedule_restart(&mut core, "Health check failed");
            }
        }
    }

    // --- Internals ---

    fn lock(&self) -> MutexGuard<'_, Core> {
        self.inner.core.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sent while the lock is held so subscribers see mutations in order.
    fn publish(&self, core: &Core, change: SessionChange) {
        // Err only means nobody is subscribed
        let _ = self.inner.events.send(SessionEvent {
            change,
            state: core.state.clone(),
        });
    }

    fn arm_keep_alive(&self, core: &mut Core) {
        let token = CancellationToken::new();
        let period = core.config.keep_alive_interval();
        let weak = Arc::downgrade(&self.inner);
        let cancelled = token.clone();

        let spawned = spawn_timer(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(manager) = upgrade(&weak) else { break };
                        manager.check_health();
                    }
                }
            }
        });

        if spawned {
            debug!(interval_ms = period.as_millis() as u64, "Keep-alive armed");
            core.keep_alive = Some(token);
        }
    }

    /// Shared by failed health checks, reported errors and failed restarts.
    fn schedule_restart(&self, core: &mut Core, reason: &str) {
        if core.state.restart_pending {
            debug!(reason, "Restart already pending; not scheduling another");
            return;
        }
        if core.restart.is_none() {
            warn!(reason, "No restart callback registered; not scheduling a restart");
            return;
        }

        core.state.restart_attempts += 1;
        let attempt = core.state.restart_attempts;
        let max = core.config.max_restart_attempts;

        if attempt > max {
            error!(session = ?core.state.session_id, attempt, max, "Giving up on recognizer");
            core.teardown();
            core.state.is_active = false;
            core.state.restart_attempts = 0;
            core.state.last_error = Some(MAX_RESTART_ERROR.to_string());
            self.publish(core, SessionChange::GaveUp);
            return;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let delay = core.config.restart_delay();
        let epoch = core.epoch;
        let weak = Arc::downgrade(&self.inner);

        let spawned = spawn_timer(async move {
            tokio::select! {
                _ = cancelled.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            if let Some(manager) = upgrade(&weak) {
                manager.run_restart(epoch).await;
            }
        });
        if !spawned {
            return;
        }

        core.restart_timer = Some(token);
        core.state.restart_pending = true;
        info!(attempt, max, delay_ms = delay.as_millis() as u64, reason, "Restart scheduled");
        self.publish(core, SessionChange::RestartScheduled { attempt });
    }

    async fn run_restart(&self, epoch: u64) {
        let callback = {
            let mut core = self.lock();
            if !core.is_current(epoch) {
                return;
            }
            core.restart_timer = None;
            match core.restart.clone() {
                Some(cb) => cb,
                None => {
                    warn!("No restart callback registered; skipping restart");
                    core.state.restart_pending = false;
                    return;
                }
            }
        };

        let result = callback().await;

        let mut core = self.lock();
        if !core.is_current(epoch) {
            debug!("Discarding restart result for a stopped session");
            return;
        }
        core.state.restart_pending = false;

        match result {
            Ok(()) => {
                info!(session = ?core.state.session_id, "Recognizer restarted");
                core.state.last_restart = Some(SystemTime::now());
                core.state.last_error = None;
                self.publish(&core, SessionChange::Restarted);
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "Recognizer restart failed");
                core.state.last_error = Some(message.clone());
                self.publish(
                    &core,
                    SessionChange::RestartFailed {
                        error: message.clone(),
                    },
                );
                if core.config.auto_restart {
                    self.schedule_restart(&mut core, &message);
                }
            }
        }
    }
}

fn upgrade(weak: &Weak<Inner>) -> Option<ListeningSessionManager> {
    weak.upgrade().map(|inner| ListeningSessionManager { inner })
}

/// Timers need a tokio runtime; without one supervision is skipped, not a panic.
fn spawn_timer<F>(task: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
            true
        }
        Err(_) => {
            warn!("No tokio runtime available; session timer not started");
            false
        }
    }
}
