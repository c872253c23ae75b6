use log::{error, info};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::{ApiCallLog, RedeemClient, RedeemError, RedeemFlash};
use crate::config::AppConfig;
use crate::localization::Lang;
use crate::pages::{ConfirmationOutcome, ConfirmationPage, LandingPage};
use crate::router::{self, Page, Resolution, RouteSnapshot};
use crate::storage::{Storage, LANG_KEY};
use crate::telegram::TelegramBridge;
use crate::tracker::{AnalyticsHost, TrackerSession};

/// where the visitor ends up after a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: String,
    pub lang: Lang,
    pub page: Page,
    pub redirected: bool,
}

/// everything a page needs, created once at startup
pub struct App {
    config: AppConfig,
    local: Arc<dyn Storage>,
    bridge: Arc<TelegramBridge>,
    tracker: TrackerSession,
    client: Arc<RedeemClient>,
    flash: RedeemFlash,
    tracker_poll: Option<JoinHandle<()>>,
    started: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        local: Arc<dyn Storage>,
        session: Arc<dyn Storage>,
        bridge: TelegramBridge,
        analytics: Arc<dyn AnalyticsHost>,
    ) -> Result<Self, RedeemError> {
        let client = RedeemClient::with_timeout(
            config.redeem_endpoint.clone(),
            config.redeem_timeout,
            session.clone(),
        )?;

        Ok(Self {
            config,
            local,
            bridge: Arc::new(bridge),
            tracker: TrackerSession::new(analytics),
            client: Arc::new(client),
            flash: RedeemFlash::new(session),
            tracker_poll: None,
            started: false,
        })
    }

    /// host bootstrap and tracker readiness polling; safe to call more than once
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.bridge.init();
        self.tracker_poll = self.tracker.start();
        info!(
            "App started (telegram host: {}, tracker ready: {})",
            self.bridge.is_host_environment(),
            self.tracker.is_ready()
        );
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bridge(&self) -> &TelegramBridge {
        &self.bridge
    }

    pub fn tracker(&self) -> &TrackerSession {
        &self.tracker
    }

    pub fn call_log(&self) -> &ApiCallLog {
        self.client.call_log()
    }

    pub fn stored_lang(&self) -> Option<String> {
        self.local.get(LANG_KEY)
    }

    /// resolves the locale for `location`, persisting it when the resolver asks to
    pub fn navigate(&self, location: &str) -> Navigation {
        let snapshot =
            RouteSnapshot::from_location(location, self.stored_lang(), self.bridge.detect_lang());
        let resolution = router::resolve(&snapshot);

        if resolution.should_persist {
            self.persist_lang(resolution.lang);
        }

        info!(
            "Resolved {} to {} via {:?}{}",
            location,
            resolution.lang,
            resolution.source,
            resolution
                .redirect
                .as_deref()
                .map(|target| format!(", redirecting to {}", target))
                .unwrap_or_default()
        );

        Self::navigation(resolution)
    }

    fn navigation(resolution: Resolution) -> Navigation {
        Navigation {
            location: resolution.location(),
            lang: resolution.lang,
            page: resolution.page,
            redirected: resolution.redirect.is_some(),
        }
    }

    /// language selector: remember the choice and keep the current sub-route
    pub fn switch_language(&self, current_path: &str, lang: Lang) -> String {
        self.persist_lang(lang);
        router::switch_language(current_path, lang)
    }

    fn persist_lang(&self, lang: Lang) {
        if let Err(e) = self.local.set(LANG_KEY, lang.code()) {
            error!("Failed to persist language preference: {}", e);
        }
    }

    pub fn landing(&self, lang: Lang) -> LandingPage {
        LandingPage::new(
            lang,
            self.bridge.clone(),
            self.tracker.clone(),
            self.client.clone(),
            self.flash.clone(),
            self.config.launch.clone(),
            self.config.test_mode,
        )
    }

    pub fn confirmation(&self, lang: Lang) -> ConfirmationOutcome {
        ConfirmationPage::open(
            lang,
            &self.flash,
            self.tracker.clone(),
            &self.config.bot_url,
            self.config.test_mode,
        )
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.tracker_poll.take() {
            handle.abort();
        }
    }
}
