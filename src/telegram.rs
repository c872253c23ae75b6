use log::{info, warn};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::localization::Lang;

/// `initDataUnsafe.user` as injected by the Telegram client
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebAppUser {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InitDataUnsafe {
    pub user: Option<WebAppUser>,
}

/// the host-side `Telegram.WebApp` object
pub trait WebAppHost: Send + Sync {
    fn ready(&self);

    fn expand(&self);

    fn init_data_unsafe(&self) -> InitDataUnsafe;
}

/// read-only identity handed to the redeem flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramUser {
    pub tg_id: String,
    pub username: String,
    pub language_code: String,
}

pub struct TelegramBridge {
    host: Option<Arc<dyn WebAppHost>>,
    initialized: AtomicBool,
}

impl TelegramBridge {
    pub fn new(host: Option<Arc<dyn WebAppHost>>) -> Self {
        Self {
            host,
            initialized: AtomicBool::new(false),
        }
    }

    /// bridge for a page opened outside Telegram
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// signals the host that the app is ready and asks for the full viewport, once
    pub fn init(&self) {
        let Some(host) = &self.host else {
            return;
        };
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        host.ready();
        host.expand();
        info!("Telegram WebApp initialized");
    }

    pub fn is_host_environment(&self) -> bool {
        self.host.is_some()
    }

    pub fn get_user(&self) -> Option<TelegramUser> {
        let user = self.host.as_ref().and_then(|host| host.init_data_unsafe().user);

        let (user, id) = match user {
            Some(user) => match user.id {
                Some(id) if id != 0 => (user, id),
                _ => {
                    warn!("Telegram user data not available");
                    return None;
                }
            },
            None => {
                warn!("Telegram user data not available");
                return None;
            }
        };

        Some(TelegramUser {
            tg_id: id.to_string(),
            username: user
                .username
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("user_{}", id)),
            language_code: user
                .language_code
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| Lang::default().code().to_string()),
        })
    }

    /// maps the user's Telegram language onto the supported set
    pub fn detect_lang(&self) -> Lang {
        match self.get_user() {
            Some(user) => Lang::from_code(Some(&user.language_code)),
            None => Lang::default(),
        }
    }
}

/// host object built from a captured `initDataUnsafe` payload
#[derive(Debug, Default)]
pub struct StaticWebApp {
    init_data: InitDataUnsafe,
    ready_calls: AtomicUsize,
    expand_calls: AtomicUsize,
}

impl StaticWebApp {
    pub fn new(init_data: InitDataUnsafe) -> Self {
        Self {
            init_data,
            ready_calls: AtomicUsize::new(0),
            expand_calls: AtomicUsize::new(0),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn with_user(id: i64, username: Option<&str>, language_code: Option<&str>) -> Self {
        Self::new(InitDataUnsafe {
            user: Some(WebAppUser {
                id: Some(id),
                username: username.map(str::to_string),
                language_code: language_code.map(str::to_string),
                ..Default::default()
            }),
        })
    }

    pub fn ready_calls(&self) -> usize {
        self.ready_calls.load(Ordering::SeqCst)
    }

    pub fn expand_calls(&self) -> usize {
        self.expand_calls.load(Ordering::SeqCst)
    }
}

impl WebAppHost for StaticWebApp {
    fn ready(&self) {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn expand(&self) {
        self.expand_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn init_data_unsafe(&self) -> InitDataUnsafe {
        self.init_data.clone()
    }
}
