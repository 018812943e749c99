use std::collections::HashMap;
use std::sync::Arc;

use account_service::account::errors::DirectoryError;
use account_service::account::models::EmailAddress;
use account_service::account::models::NewUser;
use account_service::account::models::User;
use account_service::account::models::UserId;
use account_service::account::models::UserRecordPatch;
use account_service::account::ports::UserDirectory;
use account_service::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Utc;
use jsonwebtoken::Algorithm;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Signing secret shared by the app under test and the tokens tests forge
pub const TEST_SECRET: &[u8] = b"test-secret-key-for-signing-at-least-32-bytes";

pub const TEST_TTL_MINUTES: i64 = 30;

/// In-memory Directory used as the test double for the store.
///
/// Enforces the same one-account-per-email invariant as the Postgres
/// adapter so duplicate registrations surface identically.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DirectoryError::DuplicateEmail(
                user.email.as_str().to_string(),
            ));
        }

        let created = User {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(created.id.0, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.read().await.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn update_user(
        &self,
        id: &UserId,
        patch: UserRecordPatch,
    ) -> Result<Option<User>, DirectoryError> {
        let mut users = self.users.write().await;

        if let Some(new_email) = &patch.email {
            if users
                .values()
                .any(|u| u.id.0 != id.0 && u.email == *new_email)
            {
                return Err(DirectoryError::DuplicateEmail(
                    new_email.as_str().to_string(),
                ));
            }
        }

        let Some(user) = users.get_mut(&id.0) else {
            return Ok(None);
        };

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool, DirectoryError> {
        Ok(self.users.write().await.remove(&id.0).is_some())
    }
}

/// Test application that spawns a real server over an in-memory Directory
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
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

        let directory = Arc::new(InMemoryUserDirectory::default());
        // Cheapest valid cost keeps Argon2 fast under test
        let hasher = PasswordHasher::with_cost(1).expect("Failed to build hasher");
        let accounts = Arc::new(AccountService::new(directory, hasher));

        let tokens = Arc::new(
            TokenCodec::new(TEST_SECRET, Algorithm::HS256, TEST_TTL_MINUTES)
                .expect("Failed to build token codec"),
        );

        let router = create_router(accounts, tokens);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
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

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user and return the response body
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> serde_json::Value {
        let response = self
            .post("/api/register")
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Login and let the client's cookie store pick up the session cookie
    pub async fn login(&self, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse response")
    }
}
