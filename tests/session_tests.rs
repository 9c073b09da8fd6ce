use std::time::Duration;

use serde_json::json;
use taskmanager_client::auth::{route_decision, RouteDecision, SessionState};
use taskmanager_client::config::ClientOptions;
use taskmanager_client::store::Storage;
use taskmanager_client::TaskManager;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile_body(name: &str) -> serde_json::Value {
    json!({
        "id": 7,
        "name": name,
        "email": "dana@example.com",
        "code_id": "DANA7",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

async fn mock_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok-1" })),
        )
        .mount(server)
        .await;
}

#[test]
fn construction_surfaces_transport_errors_as_results() {
    assert!(TaskManager::new("http://localhost:8000").is_ok());
    assert!(TaskManager::with_storage(
        "http://localhost:8000",
        Storage::in_memory(),
        ClientOptions::default(),
    )
    .is_ok());
}

#[tokio::test]
async fn login_then_logout_returns_to_anonymous() {
    let server = MockServer::start().await;
    mock_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("Dana")))
        .mount(&server)
        .await;

    let client = TaskManager::new(&server.uri()).unwrap();
    let session = client.session();

    assert_eq!(session.snapshot().state, SessionState::Anonymous);

    let user = session.login("dana@example.com", "hunter2").await.unwrap();
    assert_eq!(user.name, "Dana");
    assert!(!user.is_derived());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_eq!(snapshot.token.as_deref(), Some("tok-1"));
    assert_eq!(client.storage().token().as_deref(), Some("tok-1"));
    assert!(client.storage().user().is_some());

    session.logout();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, SessionState::Anonymous);
    assert!(snapshot.token.is_none());
    assert!(snapshot.user.is_none());
    assert!(client.storage().token().is_none());
    assert!(client.storage().user().is_none());
}

#[tokio::test]
async fn login_falls_back_to_derived_user_when_profile_fetch_fails() {
    let server = MockServer::start().await;
    mock_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = TaskManager::new(&server.uri()).unwrap();
    let user = client
        .session()
        .login("dana@example.com", "hunter2")
        .await
        .unwrap();

    // The session still has a displayable identity.
    assert!(user.is_derived());
    assert_eq!(user.name, "dana");
    assert_eq!(client.session().snapshot().state, SessionState::Authenticated);
    assert_eq!(client.storage().user().unwrap().name, "dana");
}

#[tokio::test]
async fn rejected_credentials_leave_the_state_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let client = TaskManager::new(&server.uri()).unwrap();
    let err = client
        .session()
        .login("dana@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert_eq!(client.session().snapshot().state, SessionState::Anonymous);
    assert!(client.storage().token().is_none());
}

#[tokio::test]
async fn signup_registers_then_logs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "created" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    mock_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("Dana")))
        .mount(&server)
        .await;

    let client = TaskManager::new(&server.uri()).unwrap();
    let user = client
        .session()
        .signup("Dana", "dana@example.com", "hunter2")
        .await
        .unwrap();

    assert_eq!(user.name, "Dana");
    assert_eq!(client.session().snapshot().state, SessionState::Authenticated);
}

#[tokio::test]
async fn restore_is_authenticated_immediately_then_reflects_fresh_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(profile_body("Dana (fresh)"))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let storage = Storage::in_memory();
    storage.set_token("tok-old");
    storage.set_user(&taskmanager_client::auth::User::from_email("stale@example.com"));

    let client =
        TaskManager::with_storage(&server.uri(), storage, ClientOptions::default()).unwrap();
    let session = client.session();

    let check_optimistic = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let snapshot = session.snapshot();
        // Revalidation is still in flight: the cached pair is already live.
        assert_eq!(snapshot.state, SessionState::Authenticated);
        assert_eq!(snapshot.user.unwrap().name, "stale");
    };
    tokio::join!(session.restore(), check_optimistic);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_eq!(snapshot.user.unwrap().name, "Dana (fresh)");
    assert_eq!(client.storage().user().unwrap().name, "Dana (fresh)");
}

#[tokio::test]
async fn failed_revalidation_keeps_the_stale_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = Storage::in_memory();
    storage.set_token("tok-old");
    storage.set_user(&taskmanager_client::auth::User::from_email("stale@example.com"));

    let client =
        TaskManager::with_storage(&server.uri(), storage, ClientOptions::default()).unwrap();
    client.session().restore().await;

    let snapshot = client.session().snapshot();
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert_eq!(snapshot.user.unwrap().name, "stale");
    assert_eq!(client.storage().token().as_deref(), Some("tok-old"));
}

#[tokio::test]
async fn restore_without_persisted_session_is_anonymous() {
    let server = MockServer::start().await;
    let client = TaskManager::new(&server.uri()).unwrap();
    client.session().restore().await;
    assert_eq!(client.session().snapshot().state, SessionState::Anonymous);
}

#[tokio::test]
async fn any_401_tears_the_session_down_idempotently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("Dana")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/teams/my"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token expired" })),
        )
        .mount(&server)
        .await;

    let storage = Storage::in_memory();
    storage.set_token("tok-1");
    storage.set_user(&taskmanager_client::auth::User::from_email("dana@example.com"));

    let client =
        TaskManager::with_storage(&server.uri(), storage, ClientOptions::default()).unwrap();
    client.spawn_session_listener();
    client.session().restore().await;
    assert_eq!(client.session().snapshot().state, SessionState::Authenticated);

    // Two in-flight requests both resolve 401; teardown must be harmless
    // the second time around.
    let teams = client.teams();
    let (first, second) = tokio::join!(teams.my_teams(), teams.my_teams());
    assert!(first.unwrap_err().is_auth());
    assert!(second.unwrap_err().is_auth());

    // Give the listener a moment to observe the broadcast.
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(client.session().snapshot().state, SessionState::Anonymous);
    assert!(client.storage().token().is_none());
    assert!(client.storage().user().is_none());
}

#[tokio::test]
async fn route_guard_follows_session_state() {
    let server = MockServer::start().await;
    mock_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("Dana")))
        .mount(&server)
        .await;

    let client = TaskManager::new(&server.uri()).unwrap();
    let session = client.session();

    assert_eq!(
        route_decision(&session.snapshot()),
        RouteDecision::RedirectToLogin
    );

    session.login("dana@example.com", "hunter2").await.unwrap();
    assert_eq!(route_decision(&session.snapshot()), RouteDecision::Render);

    session.logout();
    assert_eq!(
        route_decision(&session.snapshot()),
        RouteDecision::RedirectToLogin
    );
}

#[tokio::test]
async fn refresh_user_overwrites_the_cached_copy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("Dana Renamed")))
        .mount(&server)
        .await;

    let storage = Storage::in_memory();
    storage.set_token("tok-1");
    storage.set_user(&taskmanager_client::auth::User::from_email("dana@example.com"));

    let client =
        TaskManager::with_storage(&server.uri(), storage, ClientOptions::default()).unwrap();
    client.session().restore().await;

    let user = client.session().refresh_user().await.unwrap();
    assert_eq!(user.name, "Dana Renamed");
    assert_eq!(client.storage().user().unwrap().name, "Dana Renamed");
}
