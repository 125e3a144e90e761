use inventory_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{auth::Claims, user::{Role, User}},
    infra::factory::{connect_sqlite, run_sqlite_migrations, sqlite_state},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-do-not-use";

pub struct TestUser {
    pub id: String,
    pub token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub admin: TestUser,
    pub foreman: TestUser,
    pub other_foreman: TestUser,
    pub technician: TestUser,
    pub other_technician: TestUser,
    pub finance: TestUser,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let pool = connect_sqlite(&db_url).await.expect("Failed to connect to test db");
        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: TEST_SECRET.to_string(),
            default_per_page: 20,
            max_per_page: 100,
            default_admin_username: "admin".to_string(),
        };

        let state = Arc::new(sqlite_state(config, pool.clone()));
        state.user_service.ensure_admin("admin").await.expect("Failed to seed admin");
        let admin = state.user_repo.find_by_username("admin").await.unwrap().expect("admin seeded");

        let router = create_router(state.clone());

        let mut app = Self {
            router,
            pool,
            db_filename,
            admin: TestUser { token: mint_token(&admin.id), id: admin.id },
            foreman: TestUser { id: String::new(), token: String::new() },
            other_foreman: TestUser { id: String::new(), token: String::new() },
            technician: TestUser { id: String::new(), token: String::new() },
            other_technician: TestUser { id: String::new(), token: String::new() },
            finance: TestUser { id: String::new(), token: String::new() },
            state,
        };
        app.foreman = app.seed_user("fred", Role::Foreman, Some(("Fred", "Foreman"))).await;
        app.other_foreman = app.seed_user("olga", Role::Foreman, None).await;
        app.technician = app.seed_user("tess", Role::Technician, Some(("Tess", "Tech"))).await;
        app.other_technician = app.seed_user("tom", Role::Technician, None).await;
        app.finance = app.seed_user("fiona", Role::Finance, None).await;
        app
    }

    pub async fn seed_user(&self, username: &str, role: Role, names: Option<(&str, &str)>) -> TestUser {
        let mut user = User::new(username.to_string(), role);
        if let Some((first, last)) = names {
            user.first_name = Some(first.to_string());
            user.last_name = Some(last.to_string());
            user.email = Some(format!("{username}@example.com"));
            user.phone = Some("555-0100".to_string());
        }
        let created = self.state.user_repo.create(&user).await.expect("Failed to seed user");
        TestUser { token: mint_token(&created.id), id: created.id }
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn call(&self, method: &str, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, Some(token), body).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn create_job(&self, token: &str, body: Value) -> Value {
        let (status, json) = self.call("POST", "/api/jobs", token, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "job creation failed: {json}");
        json["job"].clone()
    }

    pub async fn create_item(&self, sku: &str, category: Option<&str>) -> Value {
        let body = serde_json::json!({ "sku": sku, "name": format!("Item {sku}"), "category": category });
        let (status, json) = self.call("POST", "/api/inventory", &self.admin.token, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "item creation failed: {json}");
        json
    }

    pub async fn check_out(&self, token: &str, item_id: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", &format!("/api/inventory/{item_id}/check-out"), token, Some(body)).await
    }
}

pub fn mint_token(user_id: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::hours(1)).timestamp() as usize,
        iat: Some(now.timestamp() as usize),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap()
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
