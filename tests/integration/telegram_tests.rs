use std::sync::Arc;
use tg_promo::localization::Lang;
use tg_promo::telegram::{
    InitDataUnsafe, StaticWebApp, TelegramBridge, TelegramUser, WebAppHost, WebAppUser,
};

fn bridge_with(web_app: StaticWebApp) -> (TelegramBridge, Arc<StaticWebApp>) {
    let web_app = Arc::new(web_app);
    let host: Arc<dyn WebAppHost> = web_app.clone();
    (TelegramBridge::new(Some(host)), web_app)
}

#[test]
fn test_user_projection() {
    let (bridge, _) = bridge_with(StaticWebApp::with_user(4242, Some("astral"), Some("pt-BR")));

    assert_eq!(
        bridge.get_user(),
        Some(TelegramUser {
            tg_id: "4242".to_string(),
            username: "astral".to_string(),
            language_code: "pt-BR".to_string(),
        })
    );
    assert_eq!(bridge.detect_lang(), Lang::Pt);
}

#[test]
fn test_missing_fields_get_fallbacks() {
    let (bridge, _) = bridge_with(StaticWebApp::with_user(7, None, None));

    let user = bridge.get_user().unwrap();
    assert_eq!(user.username, "user_7");
    assert_eq!(user.language_code, "en");
    assert_eq!(bridge.detect_lang(), Lang::En);
}

#[test]
fn test_no_user_without_numeric_id() {
    let (bridge, _) = bridge_with(StaticWebApp::new(InitDataUnsafe { user: None }));
    assert_eq!(bridge.get_user(), None);
    assert!(bridge.is_host_environment());

    let (bridge, _) = bridge_with(StaticWebApp::new(InitDataUnsafe {
        user: Some(WebAppUser {
            username: Some("ghost".to_string()),
            ..Default::default()
        }),
    }));
    assert_eq!(bridge.get_user(), None);

    let (bridge, _) = bridge_with(StaticWebApp::with_user(0, Some("zero"), Some("es")));
    assert_eq!(bridge.get_user(), None);
    assert_eq!(bridge.detect_lang(), Lang::En);
}

#[test]
fn test_detached_bridge() {
    let bridge = TelegramBridge::detached();

    assert!(!bridge.is_host_environment());
    assert_eq!(bridge.get_user(), None);
    assert_eq!(bridge.detect_lang(), Lang::En);
    bridge.init();
}

#[test]
fn test_init_signals_host_once() {
    let (bridge, web_app) = bridge_with(StaticWebApp::default());

    bridge.init();
    bridge.init();
    bridge.init();

    assert_eq!(web_app.ready_calls(), 1);
    assert_eq!(web_app.expand_calls(), 1);
}

#[test]
fn test_init_data_from_json() {
    let web_app = StaticWebApp::from_json(
        r#"{"user":{"id":99,"first_name":"Ana","language_code":"es-ES","is_premium":true}}"#,
    )
    .unwrap();
    let (bridge, _) = bridge_with(web_app);

    let user = bridge.get_user().unwrap();
    assert_eq!(user.tg_id, "99");
    assert_eq!(user.username, "user_99");
    assert_eq!(bridge.detect_lang(), Lang::Es);
}

#[test]
fn test_language_code_mapping() {
    assert_eq!(Lang::from_code(Some("es-ES")), Lang::Es);
    assert_eq!(Lang::from_code(Some("ES")), Lang::Es);
    assert_eq!(Lang::from_code(Some("pt-br")), Lang::Pt);
    assert_eq!(Lang::from_code(Some("fr-CA")), Lang::Fr);
    assert_eq!(Lang::from_code(Some("de-DE")), Lang::En);
    assert_eq!(Lang::from_code(Some("")), Lang::En);
    assert_eq!(Lang::from_code(None), Lang::En);
}
