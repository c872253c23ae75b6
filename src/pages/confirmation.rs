use log::info;

use crate::api::{RedeemFlash, RedeemResult};
use crate::localization::Lang;
use crate::router::{Page, Route};
use crate::tracker::{TrackerEvent, TrackerSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationView {
    Success {
        title: &'static str,
        subtitle: &'static str,
        granted: Vec<String>,
        open_bot_label: &'static str,
        test_banner: Option<&'static str>,
    },
    Failure {
        title: &'static str,
        message: &'static str,
        retry_label: &'static str,
        test_banner: Option<&'static str>,
    },
}

pub enum ConfirmationOutcome {
    Show(ConfirmationPage),
    /// nothing to confirm, back to the landing page
    Redirect(String),
}

pub struct ConfirmationPage {
    lang: Lang,
    result: RedeemResult,
    tracker: TrackerSession,
    bot_url: String,
    test_mode: bool,
}

impl ConfirmationPage {
    /// consumes the pending redeem result; without one the visitor is sent back
    pub fn open(
        lang: Lang,
        flash: &RedeemFlash,
        tracker: TrackerSession,
        bot_url: &str,
        test_mode: bool,
    ) -> ConfirmationOutcome {
        let Some(result) = flash.take() else {
            info!("No redeem result pending, redirecting to landing page");
            return ConfirmationOutcome::Redirect(Route::location(lang, Page::Landing));
        };

        tracker.track_once(TrackerEvent::TypPageView);

        ConfirmationOutcome::Show(Self {
            lang,
            result,
            tracker,
            bot_url: bot_url.to_string(),
            test_mode,
        })
    }

    pub fn result(&self) -> &RedeemResult {
        &self.result
    }

    pub fn view(&self) -> ConfirmationView {
        let test_banner = self.test_mode.then(|| self.lang.test_mode_banner());
        match &self.result {
            RedeemResult::Ok { granted } => ConfirmationView::Success {
                title: self.lang.thank_title_ok(),
                subtitle: self.lang.thank_sub_ok(),
                granted: granted.clone(),
                open_bot_label: self.lang.thank_open_bot(),
                test_banner,
            },
            RedeemResult::NotOk { reason } => ConfirmationView::Failure {
                title: self.lang.thank_title_error(),
                message: self.lang.reason_message(reason),
                retry_label: self.lang.thank_retry(),
                test_banner,
            },
            RedeemResult::Error => ConfirmationView::Failure {
                title: self.lang.thank_title_error(),
                message: self.lang.error_generic(),
                retry_label: self.lang.thank_retry(),
                test_banner,
            },
        }
    }

    /// back to the landing page for another attempt
    pub fn retry(&self) -> String {
        self.tracker.track_once(TrackerEvent::TypCancel);
        Route::location(self.lang, Page::Landing)
    }

    pub fn open_bot(&self) -> String {
        self.tracker.track_once(TrackerEvent::TypGoService);
        self.bot_url.clone()
    }
}
