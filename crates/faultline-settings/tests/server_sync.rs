use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use faultline_core::Configuration;
use faultline_settings::{SettingsError, SettingsHandlerError, SettingsManager};
use faultline_test::start_settings_mock;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn check_version_fetches_applies_and_persists_server_settings() {
    let (_server, client) = start_settings_mock(vec![Mock::given(method("GET"))
        .and(path("/api/v2/projects/config"))
        .and(query_param("v", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": 3,
            "settings": {
                "@@log:*": "Warn",
                "@@DataExclusions": "password",
            },
        })))
        .expect(1)])
    .await;
    client.config().set_setting("@@log:*", "Info");
    client.config().set_setting("LocalOnly", "true");

    let settings = SettingsManager::new(client.clone());
    let notifications = Arc::new(AtomicUsize::new(0));
    let captured = notifications.clone();
    settings.on_changed(Arc::new(move |_: &Configuration| {
        captured.fetch_add(1, Ordering::SeqCst);
        Ok::<(), SettingsHandlerError>(())
    }));

    let update = settings.check_version(3).await.unwrap().unwrap();
    assert_eq!(update.previous_version, 0);
    assert_eq!(update.version, 3);

    // The same announcement again must not reach the server; the mock expects a single call.
    assert!(settings.check_version(3).await.unwrap().is_none());

    let config = client.config();
    assert_eq!(config.setting("@@log:*").as_deref(), Some("Warn"));
    assert_eq!(config.setting("@@DataExclusions").as_deref(), Some("password"));
    assert_eq!(config.setting("LocalOnly").as_deref(), Some("true"));
    assert_eq!(settings.get_version().await.unwrap(), 3);
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_side_deletion_propagates_to_the_client() {
    let (_server, client) = start_settings_mock(vec![
        Mock::given(method("GET"))
            .and(path("/api/v2/projects/config"))
            .and(query_param("v", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "version": 1,
                "settings": { "a": "1", "b": "2" },
            })))
            .expect(1),
        Mock::given(method("GET"))
            .and(path("/api/v2/projects/config"))
            .and(query_param("v", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "version": 2,
                "settings": { "a": "9" },
            })))
            .expect(1),
    ])
    .await;

    let settings = SettingsManager::new(client.clone());
    settings.update_settings(None).await.unwrap();
    let update = settings.update_settings(None).await.unwrap();

    assert_eq!(update.removed, vec!["b".to_string()]);
    assert_eq!(client.config().setting("a").as_deref(), Some("9"));
    assert_eq!(client.config().setting("b"), None);
}

#[tokio::test]
async fn not_modified_response_leaves_settings_unchanged() {
    let (_server, client) = start_settings_mock(vec![Mock::given(method("GET"))
        .and(path("/api/v2/projects/config"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)])
    .await;
    client.config().set_setting("a", "1");

    let settings = SettingsManager::new(client.clone());
    let result = settings.update_settings(None).await;

    assert!(matches!(result, Err(SettingsError::Rejected { .. })));
    assert_eq!(client.config().setting("a").as_deref(), Some("1"));
    assert_eq!(settings.get_version().await.unwrap(), 0);
}
