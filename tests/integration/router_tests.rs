use tg_promo::localization::Lang;
use tg_promo::router::{
    resolve, split_location, switch_language, LangSource, Page, Route, RouteSnapshot,
};

fn snapshot(location: &str, stored: Option<&str>, detected: Lang) -> RouteSnapshot {
    RouteSnapshot::from_location(location, stored.map(str::to_string), detected)
}

#[test]
fn test_query_override_redirects_to_locale_root() {
    for lang in Lang::ALL {
        let resolution = resolve(&snapshot(&format!("/?lang={}", lang), None, Lang::En));

        assert_eq!(resolution.lang, lang);
        assert_eq!(resolution.source, LangSource::Query);
        assert_eq!(resolution.redirect, Some(format!("/{}", lang)));
        assert!(resolution.should_persist);
    }
}

#[test]
fn test_query_override_keeps_confirmation_route() {
    for lang in Lang::ALL {
        let location = format!("/confirmation?lang={}", lang);
        let resolution = resolve(&snapshot(&location, None, Lang::En));

        assert_eq!(resolution.lang, lang);
        assert_eq!(resolution.page, Page::Confirmation);
        assert_eq!(resolution.redirect, Some(format!("/{}/confirmation", lang)));
    }

    let resolution = resolve(&snapshot("/en/confirmation?lang=pt", Some("en"), Lang::En));
    assert_eq!(resolution.redirect.as_deref(), Some("/pt/confirmation"));
}

#[test]
fn test_query_override_wins_over_path_and_storage() {
    let resolution = resolve(&snapshot("/es?lang=fr", Some("pt"), Lang::En));

    assert_eq!(resolution.lang, Lang::Fr);
    assert_eq!(resolution.redirect.as_deref(), Some("/fr"));
    assert!(resolution.should_persist);
}

#[test]
fn test_unsupported_query_value_falls_through() {
    for value in ["de", "EN", "", "english", "es-ES"] {
        let location = format!("/?lang={}", value);

        // to the path prefix
        let resolution = resolve(&snapshot(&format!("/pt?lang={}", value), None, Lang::En));
        assert_eq!(resolution.lang, Lang::Pt);
        assert_eq!(resolution.source, LangSource::Path);

        // to the stored preference
        let resolution = resolve(&snapshot(&location, Some("fr"), Lang::En));
        assert_eq!(resolution.lang, Lang::Fr);
        assert_eq!(resolution.source, LangSource::Stored);

        // to the detected locale
        let resolution = resolve(&snapshot(&location, None, Lang::Es));
        assert_eq!(resolution.lang, Lang::Es);
        assert_eq!(resolution.source, LangSource::Detected);
    }
}

#[test]
fn test_path_prefix_is_adopted_and_persisted_without_redirect() {
    let resolution = resolve(&snapshot("/es", Some("en"), Lang::Pt));

    assert_eq!(resolution.lang, Lang::Es);
    assert_eq!(resolution.source, LangSource::Path);
    assert_eq!(resolution.page, Page::Landing);
    assert_eq!(resolution.redirect, None);
    assert!(resolution.should_persist);

    // already stored, nothing to write
    let resolution = resolve(&snapshot("/es/confirmation", Some("es"), Lang::Pt));
    assert_eq!(resolution.redirect, None);
    assert!(!resolution.should_persist);
}

#[test]
fn test_stored_preference_used_at_root() {
    let resolution = resolve(&snapshot("/", Some("pt"), Lang::Es));

    assert_eq!(resolution.lang, Lang::Pt);
    assert_eq!(resolution.source, LangSource::Stored);
    assert_eq!(resolution.redirect.as_deref(), Some("/pt"));
    assert!(!resolution.should_persist);
}

#[test]
fn test_invalid_stored_preference_is_ignored() {
    let resolution = resolve(&snapshot("/", Some("klingon"), Lang::Fr));

    assert_eq!(resolution.lang, Lang::Fr);
    assert_eq!(resolution.source, LangSource::Detected);
    assert!(resolution.should_persist);
}

#[test]
fn test_detected_locale_from_telegram_language() {
    let detected = Lang::from_code(Some("es-ES"));
    let resolution = resolve(&snapshot("/", None, detected));
    assert_eq!(resolution.lang, Lang::Es);
    assert_eq!(resolution.redirect.as_deref(), Some("/es"));
    assert!(resolution.should_persist);

    let detected = Lang::from_code(Some("de-DE"));
    let resolution = resolve(&snapshot("/", None, detected));
    assert_eq!(resolution.lang, Lang::En);
    assert_eq!(resolution.redirect.as_deref(), Some("/en"));
}

#[test]
fn test_unknown_routes_land_on_locale_root() {
    let resolution = resolve(&snapshot("/es/does-not-exist", None, Lang::En));
    assert_eq!(resolution.lang, Lang::Es);
    assert_eq!(resolution.page, Page::Landing);
    assert_eq!(resolution.redirect.as_deref(), Some("/es"));

    let resolution = resolve(&snapshot("/de/confirmation", None, Lang::Pt));
    assert_eq!(resolution.lang, Lang::Pt);
    assert_eq!(resolution.redirect.as_deref(), Some("/pt"));
}

#[test]
fn test_redirect_target_resolves_without_further_redirect() {
    let first = resolve(&snapshot("/confirmation", None, Lang::Pt));
    let target = first.redirect.clone().unwrap();
    assert_eq!(target, "/pt/confirmation");

    let second = resolve(&snapshot(&target, Some("pt"), Lang::En));
    assert_eq!(second.lang, Lang::Pt);
    assert_eq!(second.redirect, None);
}

#[test]
fn test_route_parsing() {
    assert_eq!(
        Route::parse("/"),
        Route {
            prefix: None,
            page: Page::Landing
        }
    );
    assert_eq!(
        Route::parse("/fr/confirmation/"),
        Route {
            prefix: Some(Lang::Fr),
            page: Page::Confirmation
        }
    );
    assert_eq!(Route::parse("/fr/confirmation/extra").page, Page::Unknown);
    assert_eq!(Route::parse("/confirmation").prefix, None);
    assert_eq!(Route::location(Lang::Es, Page::Unknown), "/es");
}

#[test]
fn test_split_location() {
    assert_eq!(
        split_location("/es/confirmation?lang=pt#top"),
        ("/es/confirmation".to_string(), Some("lang=pt".to_string()))
    );
    assert_eq!(split_location("es"), ("/es".to_string(), None));
}

#[test]
fn test_switch_language_keeps_sub_route() {
    assert_eq!(switch_language("/en/confirmation", Lang::Fr), "/fr/confirmation");
    assert_eq!(switch_language("/en", Lang::Pt), "/pt");
    assert_eq!(switch_language("/en/unknown?x=1", Lang::Es), "/es");
}
