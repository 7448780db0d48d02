#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingCost;
use auth::PasswordHasher;
use auth::TokenCodec;
use bookmark_service::bookmark::errors::BookmarkError;
use bookmark_service::bookmark::models::Bookmark;
use bookmark_service::bookmark::models::BookmarkId;
use bookmark_service::bookmark::models::NewBookmark;
use bookmark_service::bookmark::ports::BookmarkRepository;
use bookmark_service::bookmark::service::BookmarkService;
use bookmark_service::domain::access::AccessGuard;
use bookmark_service::inbound::http::router::create_router;
use bookmark_service::user::errors::UserError;
use bookmark_service::user::models::NewUser;
use bookmark_service::user::models::User;
use bookmark_service::user::models::UserId;
use bookmark_service::user::ports::UserRepository;
use bookmark_service::user::service::UserService;
use chrono::Utc;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Shared in-memory tables standing in for Postgres.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    bookmarks: Mutex<Vec<Bookmark>>,
    next_user_id: Mutex<i64>,
    next_bookmark_id: Mutex<i64>,
}

impl MemoryStore {
    fn next_id(counter: &Mutex<i64>) -> i64 {
        let mut id = counter.lock().unwrap();
        *id += 1;
        *id
    }

    /// Flip the active flag of a stored user.
    pub fn set_active(&self, id: UserId, is_active: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.is_active = is_active;
        }
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.lock().unwrap().len()
    }
}

pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.store.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::DuplicateUsername(user.username.to_string()));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email.to_string()));
        }

        let created = User {
            id: UserId(MemoryStore::next_id(&self.store.next_user_id)),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_active: user.is_active,
            created_at: Utc::now(),
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.store.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let users = self.store.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.store.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.users.lock().unwrap().clone())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.store.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::DuplicateUsername(user.username.to_string()));
        }
        if users.iter().any(|u| u.id != user.id && u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email.to_string()));
        }

        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        *slot = user.clone();

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.store.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != *id);
        if users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        self.store
            .bookmarks
            .lock()
            .unwrap()
            .retain(|b| b.owner_id != *id);

        Ok(())
    }
}

pub struct InMemoryBookmarkRepository {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark, BookmarkError> {
        let created = Bookmark {
            id: BookmarkId(MemoryStore::next_id(&self.store.next_bookmark_id)),
            owner_id: bookmark.owner_id,
            title: bookmark.title,
            description: bookmark.description,
            url: bookmark.url,
            created_at: Utc::now(),
        };
        self.store.bookmarks.lock().unwrap().push(created.clone());

        Ok(created)
    }

    async fn find_for_owner(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let bookmarks = self.store.bookmarks.lock().unwrap();
        Ok(bookmarks
            .iter()
            .find(|b| b.id == *id && b.owner_id == *owner_id)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bookmark>, BookmarkError> {
        let bookmarks = self.store.bookmarks.lock().unwrap();
        Ok(bookmarks
            .iter()
            .filter(|b| b.owner_id == *owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, bookmark: Bookmark) -> Result<Bookmark, BookmarkError> {
        let mut bookmarks = self.store.bookmarks.lock().unwrap();
        let slot = bookmarks
            .iter_mut()
            .find(|b| b.id == bookmark.id)
            .ok_or(BookmarkError::NotFound(bookmark.id.to_string()))?;
        *slot = bookmark.clone();

        Ok(bookmark)
    }

    async fn delete(&self, id: &BookmarkId) -> Result<(), BookmarkError> {
        let mut bookmarks = self.store.bookmarks.lock().unwrap();
        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != *id);
        if bookmarks.len() == before {
            return Err(BookmarkError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<MemoryStore>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap Argon2 parameters keep the suite fast
        let hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Invalid hashing cost");
        let authenticator = Arc::new(Authenticator::with_parts(
            hasher,
            TokenCodec::new(TEST_SECRET),
            chrono::Duration::minutes(30),
        ));

        let store = Arc::new(MemoryStore::default());
        let user_repository = Arc::new(InMemoryUserRepository {
            store: Arc::clone(&store),
        });
        let bookmark_repository = Arc::new(InMemoryBookmarkRepository {
            store: Arc::clone(&store),
        });

        let access_guard = Arc::new(AccessGuard::new(
            Arc::clone(&authenticator),
            user_repository.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            user_repository,
            Arc::clone(&authenticator),
        ));
        let bookmark_service = Arc::new(BookmarkService::new(bookmark_repository));

        let router = create_router(user_service, bookmark_service, access_guard);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            authenticator,
            api_client: reqwest::Client::new(),
        }
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

    /// Register a user and return the response
    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/users")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Submit the login form and return the response
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/token")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a user, log in, and return `(user_id, access_token)`
    pub async fn register_and_login(&self, username: &str, password: &str) -> (i64, String) {
        let response = self
            .register(username, &format!("{}@example.com", username), password)
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        let user_id = body["data"]["id"].as_i64().expect("Missing user id");

        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        let token = body["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string();

        (user_id, token)
    }
}
