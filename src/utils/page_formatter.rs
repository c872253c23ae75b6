use crate::api::ApiCall;
use crate::countdown::{format_value, CountdownTime};
use crate::localization::Lang;
use crate::pages::{ConfirmationView, LandingView};
use crate::telegram::TelegramUser;

/// plain-text rendering of page views for the terminal
pub struct PageFormatter;

impl PageFormatter {
    pub fn countdown(lang: Lang, time: &CountdownTime) -> String {
        if time.is_expired {
            return lang.countdown_expired().to_string();
        }
        let [days, hours, minutes, seconds] = lang.countdown_labels();
        format!(
            "{} {}  {} {}  {} {}  {} {}",
            format_value(time.days),
            days,
            format_value(time.hours),
            hours,
            format_value(time.minutes),
            minutes,
            format_value(time.seconds),
            seconds
        )
    }

    pub fn landing(view: &LandingView) -> String {
        let mut lines = Vec::new();
        if let Some(banner) = view.test_banner {
            lines.push(format!("[{}]", banner));
        }
        lines.push(view.headline.to_string());
        lines.push(Self::countdown(view.lang, &view.countdown));
        let cta = if view.cta_enabled {
            format!("[ {} ]", view.cta_label)
        } else {
            "[ ... ]".to_string()
        };
        lines.push(cta);
        lines.push(Self::language_selector(view.lang));
        lines.join("\n")
    }

    /// every supported language by its native name, the active one bracketed
    pub fn language_selector(current: Lang) -> String {
        Lang::ALL
            .into_iter()
            .map(|lang| {
                if lang == current {
                    format!("[{}]", lang.display_name())
                } else {
                    lang.display_name().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn confirmation(view: &ConfirmationView) -> String {
        let mut lines = Vec::new();
        match view {
            ConfirmationView::Success {
                title,
                subtitle,
                granted,
                open_bot_label,
                test_banner,
            } => {
                if let Some(banner) = test_banner {
                    lines.push(format!("[{}]", banner));
                }
                lines.push(format!("✅ {}", title));
                lines.push(subtitle.to_string());
                for reward in granted {
                    lines.push(format!("• reward #{}", reward));
                }
                lines.push(format!("[ {} ]", open_bot_label));
            }
            ConfirmationView::Failure {
                title,
                message,
                retry_label,
                test_banner,
            } => {
                if let Some(banner) = test_banner {
                    lines.push(format!("[{}]", banner));
                }
                lines.push(format!("❌ {}", title));
                lines.push(message.to_string());
                lines.push(format!("[ {} ]", retry_label));
            }
        }
        lines.join("\n")
    }

    pub fn user(user: Option<&TelegramUser>) -> String {
        match user {
            Some(user) => format!(
                "tg_id={} username={} language_code={}",
                user.tg_id, user.username, user.language_code
            ),
            None => "No Telegram user data available".to_string(),
        }
    }

    pub fn api_calls(calls: &[ApiCall]) -> String {
        if calls.is_empty() {
            return "No API calls recorded".to_string();
        }
        calls
            .iter()
            .map(|call| {
                format!(
                    "{} {} {} {}\n  request:  {}\n  response: {}",
                    call.timestamp,
                    if call.is_success() { "✓" } else { "✗" },
                    call.status,
                    call.endpoint,
                    call.request,
                    call.response
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
