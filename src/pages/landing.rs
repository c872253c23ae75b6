use chrono::{DateTime, Utc};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{RedeemClient, RedeemFlash};
use crate::countdown::{CountdownTime, LaunchSchedule};
use crate::localization::Lang;
use crate::router::{Page, Route};
use crate::telegram::TelegramBridge;
use crate::tracker::{TrackerEvent, TrackerSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// result stored, go to the confirmation page
    Navigate(String),
    /// stay on the page and show the message under the button
    InlineError(&'static str),
    /// a claim is already in flight
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingView {
    pub lang: Lang,
    pub headline: &'static str,
    pub countdown: CountdownTime,
    pub cta_label: &'static str,
    pub cta_enabled: bool,
    pub test_banner: Option<&'static str>,
}

pub struct LandingPage {
    lang: Lang,
    bridge: Arc<TelegramBridge>,
    tracker: TrackerSession,
    client: Arc<RedeemClient>,
    flash: RedeemFlash,
    schedule: LaunchSchedule,
    test_mode: bool,
    redeeming: AtomicBool,
}

// re-enables the claim button however the claim ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl LandingPage {
    pub fn new(
        lang: Lang,
        bridge: Arc<TelegramBridge>,
        tracker: TrackerSession,
        client: Arc<RedeemClient>,
        flash: RedeemFlash,
        schedule: LaunchSchedule,
        test_mode: bool,
    ) -> Self {
        Self {
            lang,
            bridge,
            tracker,
            client,
            flash,
            schedule,
            test_mode,
            redeeming: AtomicBool::new(false),
        }
    }

    pub fn on_ready(&self) {
        self.tracker.track_once(TrackerEvent::LpPageView);
    }

    pub fn is_redeeming(&self) -> bool {
        self.redeeming.load(Ordering::SeqCst)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> CountdownTime {
        self.schedule.countdown_at(now)
    }

    pub fn view(&self, now: DateTime<Utc>) -> LandingView {
        LandingView {
            lang: self.lang,
            headline: self.lang.game_headline(),
            countdown: self.countdown(now),
            cta_label: self.lang.game_cta(),
            cta_enabled: !self.is_redeeming(),
            test_banner: self.test_mode.then(|| self.lang.test_mode_banner()),
        }
    }

    pub async fn claim(&self) -> ClaimOutcome {
        if self.redeeming.swap(true, Ordering::SeqCst) {
            return ClaimOutcome::Busy;
        }
        let _in_flight = InFlight(&self.redeeming);

        let user = match self.bridge.get_user() {
            Some(user) => user,
            None => {
                info!("Claim attempted without Telegram identity");
                return ClaimOutcome::InlineError(self.lang.error_missing_tg());
            }
        };

        self.tracker.track_once(TrackerEvent::LpClickButton);

        let result = self.client.redeem(&user.tg_id, self.lang).await;

        match self.flash.store(&result) {
            Ok(()) => ClaimOutcome::Navigate(Route::location(self.lang, Page::Confirmation)),
            Err(e) => {
                error!("Failed to store redeem result: {}", e);
                ClaimOutcome::InlineError(self.lang.error_network())
            }
        }
    }
}
