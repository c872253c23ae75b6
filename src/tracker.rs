use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const POLL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerEvent {
    LpPageView,
    LpClickButton,
    AcceptCookies,
    ShowCookies,
    TypPageView,
    TypGoService,
    TypCancel,
}

impl TrackerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackerEvent::LpPageView => "lp_page_view",
            TrackerEvent::LpClickButton => "lp_click_button",
            TrackerEvent::AcceptCookies => "accept_cookies",
            TrackerEvent::ShowCookies => "show_cookies",
            TrackerEvent::TypPageView => "typ_page_view",
            TrackerEvent::TypGoService => "typ_go_service",
            TrackerEvent::TypCancel => "typ_cancel",
        }
    }
}

/// the agency tracker global; it may attach after the page starts
pub trait AnalyticsHost: Send + Sync {
    fn is_loaded(&self) -> bool;

    fn track(
        &self,
        event: &str,
        properties: Option<&Value>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// host that writes events to the log, used when no external tracker is wired
pub struct LogAnalytics;

impl AnalyticsHost for LogAnalytics {
    fn is_loaded(&self) -> bool {
        true
    }

    fn track(
        &self,
        event: &str,
        properties: Option<&Value>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match properties {
            Some(props) => info!("[analytics] {} {}", event, props),
            None => info!("[analytics] {}", event),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Waiting,
    Ready,
    GaveUp,
}

struct TrackerState {
    readiness: Readiness,
    queue: VecDeque<(TrackerEvent, Option<Value>)>,
    fired: HashSet<String>,
}

/// per-page tracker: queues events until the host attaches and fires each
/// (name, properties) pair at most once
#[derive(Clone)]
pub struct TrackerSession {
    host: Arc<dyn AnalyticsHost>,
    state: Arc<Mutex<TrackerState>>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl TrackerSession {
    pub fn new(host: Arc<dyn AnalyticsHost>) -> Self {
        Self::with_polling(host, POLL_INTERVAL, POLL_TIMEOUT)
    }

    pub fn with_polling(
        host: Arc<dyn AnalyticsHost>,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            host,
            state: Arc::new(Mutex::new(TrackerState {
                readiness: Readiness::Waiting,
                queue: VecDeque::new(),
                fired: HashSet::new(),
            })),
            poll_interval,
            poll_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// checks the host right away and, if it is not there yet, polls in the
    /// background until it shows up or the timeout passes
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if self.try_flush() {
            return None;
        }

        let session = self.clone();
        Some(tokio::spawn(async move {
            let deadline = Instant::now() + session.poll_timeout;
            let mut interval = tokio::time::interval(session.poll_interval);
            // first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                if session.try_flush() {
                    return;
                }
                if Instant::now() >= deadline {
                    session.give_up();
                    return;
                }
            }
        }))
    }

    pub fn track(&self, event: TrackerEvent, properties: Option<Value>, allow_duplicates: bool) {
        {
            let mut state = self.lock();

            if !allow_duplicates {
                let key = Self::event_key(event, properties.as_ref());
                if !state.fired.insert(key) {
                    debug!("[Tracker] Event already fired, skipping: {}", event.name());
                    return;
                }
            }

            match state.readiness {
                Readiness::Ready => {}
                Readiness::Waiting => {
                    debug!("[Tracker] Event queued: {}", event.name());
                    state.queue.push_back((event, properties));
                    return;
                }
                Readiness::GaveUp => {
                    warn!("[Tracker] Tracker not available, dropping event: {}", event.name());
                    return;
                }
            }
        }

        // the host may call back into this session
        self.deliver(event, properties.as_ref());
    }

    /// fires the event once per session
    pub fn track_once(&self, event: TrackerEvent) {
        self.track(event, None, false);
    }

    pub fn is_ready(&self) -> bool {
        self.lock().readiness == Readiness::Ready
    }

    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// forgets which events were fired so they can fire again
    pub fn reset_fired_events(&self) {
        self.lock().fired.clear();
    }

    fn event_key(event: TrackerEvent, properties: Option<&Value>) -> String {
        let props = properties
            .map(|value| value.to_string())
            .unwrap_or_else(|| "{}".to_string());
        format!("{}:{}", event.name(), props)
    }

    fn try_flush(&self) -> bool {
        match self.lock().readiness {
            Readiness::Ready => return true,
            Readiness::GaveUp => return false,
            Readiness::Waiting => {}
        }
        if !self.host.is_loaded() {
            return false;
        }

        let pending: Vec<_> = {
            let mut state = self.lock();
            if state.readiness != Readiness::Waiting {
                return state.readiness == Readiness::Ready;
            }
            state.readiness = Readiness::Ready;
            state.queue.drain(..).collect()
        };

        info!("[Tracker] Tracker ready, flushing {} queued event(s)", pending.len());
        for (event, properties) in pending {
            self.deliver(event, properties.as_ref());
        }
        true
    }

    fn give_up(&self) {
        let mut state = self.lock();
        if state.readiness != Readiness::Waiting {
            return;
        }
        state.readiness = Readiness::GaveUp;
        let dropped = state.queue.len();
        state.queue.clear();
        warn!(
            "Tracker not loaded after {} seconds, dropped {} queued event(s)",
            self.poll_timeout.as_secs(),
            dropped
        );
    }

    fn deliver(&self, event: TrackerEvent, properties: Option<&Value>) {
        if !self.host.is_loaded() {
            warn!("Tracker not available for event: {}", event.name());
            return;
        }

        match self.host.track(event.name(), properties) {
            Ok(()) => info!("[Tracker] Event fired: {}", event.name()),
            Err(e) => error!("[Tracker] Error firing event {}: {}", event.name(), e),
        }
    }
}
