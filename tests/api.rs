use portfolio::server::{router, AppState};
use portfolio::{AvatarConfig, Config};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tempdir::TempDir;
use tokio::net::TcpListener;

const DISCORD_ID: &str = "394912002843344898";

struct TestApp {
    base: String,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestApp {
    async fn spawn() -> Self {
        portfolio::initialize();

        let dir = TempDir::new("portfolio_api").unwrap();
        let config = Config {
            port: 0,
            data_dir: dir.path().to_path_buf(),
            avatar: AvatarConfig::default(),
        };
        let state = AppState::new(&config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        Self {
            base: format!("http://{address}"),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .request(method, format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }
}

#[tokio::test]
async fn avatar_endpoint_returns_fallback_without_credential() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get(&format!("/discord-avatar?userId={DISCORD_ID}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "avatarUrl": "https://cdn.discordapp.com/embed/avatars/0.png",
            "username": "LORDX679",
            "discriminator": "0000"
        })
    );
}

#[tokio::test]
async fn avatar_endpoint_requires_user_id() {
    let app = TestApp::spawn().await;

    for path in ["/discord-avatar", "/discord-avatar?userId="] {
        let (status, body) = app.get(path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Discord User ID is required");
    }
}

#[tokio::test]
async fn user_lifecycle() {
    let app = TestApp::spawn().await;
    let user_path = format!("/api/users/{DISCORD_ID}");

    let (status, _) = app.get(&user_path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            reqwest::Method::POST,
            "/api/users",
            json!({ "discord_id": "", "username": "lord" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("discord_id"));

    let (status, created) = app
        .send(
            reqwest::Method::POST,
            "/api/users",
            json!({ "discord_id": DISCORD_ID, "username": "lord", "email": "LORD@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        created["avatar_url"],
        "https://cdn.discordapp.com/embed/avatars/0.png"
    );
    assert_eq!(created["email"], "lord@example.com");
    assert_eq!(created["is_active"], true);

    let (status, updated) = app
        .send(
            reqwest::Method::PUT,
            &user_path,
            json!({ "bio": "Rust and anime", "skills": ["Rust"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["bio"], "Rust and anime");
    assert_eq!(updated["skills"], json!(["Rust"]));

    let (status, fetched) = app.get(&user_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, _) = app
        .send(reqwest::Method::PUT, "/api/users/404", json!({ "bio": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_listing_modes() {
    let app = TestApp::spawn().await;

    for (title, featured, public) in [
        ("Portfolio", true, true),
        ("Secret", true, false),
        ("Bot", false, true),
    ] {
        let (status, _) = app
            .send(
                reqwest::Method::POST,
                "/api/projects",
                json!({
                    "user_id": DISCORD_ID,
                    "title": title,
                    "description": "Something I built",
                    "technologies": ["Rust"],
                    "featured": featured,
                    "is_public": public
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .send(
            reqwest::Method::POST,
            "/api/projects",
            json!({ "user_id": DISCORD_ID, "title": "", "description": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let (_, featured) = app.get("/api/projects?featured=true").await;
    assert_eq!(featured.as_array().unwrap().len(), 1);
    assert_eq!(featured[0]["title"], "Portfolio");

    let (_, mine) = app.get(&format!("/api/projects?userId={DISCORD_ID}")).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let (_, all) = app.get("/api/projects?limit=1").await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (_, all) = app.get("/api/projects?limit=oops").await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn contact_messages() {
    let app = TestApp::spawn().await;

    let (status, contact) = app
        .send(
            reqwest::Method::POST,
            "/api/contacts",
            json!({
                "name": "Visitor",
                "email": "visitor@example.com",
                "subject": "Hi",
                "message": "Great work"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contact["status"], "new");
    assert_eq!(contact["priority"], "medium");

    let id = contact["id"].as_str().unwrap();
    let (status, updated) = app
        .send(
            reqwest::Method::PUT,
            &format!("/api/contacts/{id}/status"),
            json!({ "status": "read" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "read");

    let (status, _) = app
        .send(
            reqwest::Method::PUT,
            "/api/contacts/unknown/status",
            json!({ "status": "read" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            reqwest::Method::PUT,
            &format!("/api/contacts/{id}/status"),
            json!({ "status": "bogus" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let response = app
        .client
        .post(format!("{}/api/contacts", app.base))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let (_, list) = app.get("/api/contacts").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["status"], "read");
}
