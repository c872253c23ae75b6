
use crate::localization::Lang;

pub const CONFIRMATION_SEGMENT: &str = "confirmation";

/// sub-route below the locale prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Confirmation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub prefix: Option<Lang>,
    pub page: Page,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let prefix = segments.first().and_then(|first| Lang::parse(first));
        let rest = if prefix.is_some() {
            &segments[1..]
        } else {
            &segments[..]
        };

        let page = match rest {
            [] => Page::Landing,
            [segment] if *segment == CONFIRMATION_SEGMENT => Page::Confirmation,
            _ => Page::Unknown,
        };

        Self { prefix, page }
    }

    /// canonical path for a page; unknown pages land on the locale root
    pub fn location(lang: Lang, page: Page) -> String {
        match page {
            Page::Confirmation => format!("/{}/{}", lang.code(), CONFIRMATION_SEGMENT),
            Page::Landing | Page::Unknown => format!("/{}", lang.code()),
        }
    }
}

/// splits `/es/confirmation?lang=pt` into path and query
pub fn split_location(location: &str) -> (String, Option<String>) {
    let location = location.split('#').next().unwrap_or("");
    let (path, query) = match location.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (location, None),
    };
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    (path, query)
}

fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangSource {
    Query,
    Path,
    Stored,
    Detected,
}

/// everything the resolver looks at, captured before any I/O
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSnapshot {
    pub path: String,
    pub query: Option<String>,
    pub stored: Option<String>,
    pub detected: Lang,
}

impl RouteSnapshot {
    pub fn from_location(location: &str, stored: Option<String>, detected: Lang) -> Self {
        let (path, query) = split_location(location);
        Self {
            path,
            query,
            stored,
            detected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub lang: Lang,
    pub source: LangSource,
    pub page: Page,
    /// history-replace target, None when the current path already matches
    pub redirect: Option<String>,
    pub should_persist: bool,
}

impl Resolution {
    pub fn location(&self) -> String {
        Route::location(self.lang, self.page)
    }
}

/// picks the active locale: `?lang=` override, then path prefix, then the
/// stored preference, then the Telegram-detected language
pub fn resolve(snapshot: &RouteSnapshot) -> Resolution {
    let route = Route::parse(&snapshot.path);

    let query_lang = snapshot
        .query
        .as_deref()
        .and_then(|query| query_param(query, "lang"))
        .and_then(|value| Lang::parse(&value));
    let stored_lang = snapshot.stored.as_deref().and_then(Lang::parse);

    let (lang, source) = if let Some(lang) = query_lang {
        (lang, LangSource::Query)
    } else if let Some(lang) = route.prefix {
        (lang, LangSource::Path)
    } else if let Some(lang) = stored_lang {
        (lang, LangSource::Stored)
    } else {
        (snapshot.detected, LangSource::Detected)
    };

    let should_persist = source != LangSource::Stored && stored_lang != Some(lang);

    let page = match route.page {
        Page::Unknown => Page::Landing,
        page => page,
    };

    let redirect = if route.prefix != Some(lang) || route.page == Page::Unknown {
        Some(Route::location(lang, page))
    } else {
        None
    };

    Resolution {
        lang,
        source,
        page,
        redirect,
        should_persist,
    }
}

/// language selector: same sub-route under the new prefix
pub fn switch_language(path: &str, lang: Lang) -> String {
    let (path, _) = split_location(path);
    Route::location(lang, Route::parse(&path).page)
}
