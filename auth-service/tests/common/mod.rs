use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::TokenService;
use auth::UserId;
use auth_service::domain::post::errors::PostError;
use auth_service::domain::post::models::NewPost;
use auth_service::domain::post::models::Post;
use auth_service::domain::post::models::PostId;
use auth_service::domain::post::ports::PostRepository;
use auth_service::domain::user::models::NewUser;
use auth_service::domain::user::models::User;
use auth_service::domain::user::ports::UserRepository;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::http::router::AppState;
use auth_service::user::errors::UserError;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-for-token-signing";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-for-token-signing";
pub const ACCESS_TTL_SECS: i64 = 60;
pub const REFRESH_TTL_SECS: i64 = 3600;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    clock_offset: Arc<AtomicI64>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Server time can be moved forward by tests
        let start = Utc::now();
        let clock_offset = Arc::new(AtomicI64::new(0));
        let offset = Arc::clone(&clock_offset);
        let clock = move || -> DateTime<Utc> {
            start + Duration::seconds(offset.load(Ordering::SeqCst))
        };

        let tokens = Arc::new(
            TokenService::new(
                Arc::new(clock),
                Duration::seconds(ACCESS_TTL_SECS),
                Duration::seconds(REFRESH_TTL_SECS),
                ACCESS_SECRET,
                REFRESH_SECRET,
            )
            .expect("Failed to create token service"),
        );

        let users = Arc::new(InMemoryUserRepository::default());
        let posts = Arc::new(InMemoryPostRepository::default());
        let router = create_router(AppState::new(users, posts, tokens));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock_offset,
        }
    }

    /// Move the server clock forward
    pub fn advance_clock(&self, seconds: i64) {
        self.clock_offset.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user, log in, and return the access token
    pub async fn access_token_for(&self, name: &str, email: &str) -> String {
        self.register(name, email, "pass_word!").await;
        let response = self.login(email, "pass_word!").await;
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["accessToken"]
            .as_str()
            .expect("login returned no access token")
            .to_string()
    }

    /// Register a user and return the response body
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn refresh(&self, token: &str) -> reqwest::Response {
        self.post("/api/auth/refresh")
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Repository backed by a map, standing in for Postgres in API tests
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<u64, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let id = users.len() as u64 + 1;
        let created = User {
            id: UserId(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.as_u64()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }
}

/// Post store backed by a map, standing in for Postgres in API tests
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<HashMap<u64, Post>>,
    next_id: AtomicI64,
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        let created = Post {
            id: PostId(id),
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            updated_at: post.created_at,
        };
        self.posts.lock().unwrap().insert(id, created.clone());

        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Post>, PostError> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by_key(|post| post.id);
        Ok(posts)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError> {
        Ok(self.posts.lock().unwrap().get(&id.as_u64()).cloned())
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post.id.as_u64()) {
            Some(stored) => {
                *stored = post.clone();
                Ok(post)
            }
            None => Err(PostError::NotFound(post.id.to_string())),
        }
    }

    async fn delete(&self, id: PostId) -> Result<(), PostError> {
        self.posts
            .lock()
            .unwrap()
            .remove(&id.as_u64())
            .map(|_| ())
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }
}
