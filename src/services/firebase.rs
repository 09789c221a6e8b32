use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::models::UserSkillProfile;
use crate::services::store::{decode_profile, profiles_from_snapshot, StoreError, UserStore};

/// Firebase Realtime Database REST client
///
/// Reads the `users` node through the database's REST surface:
/// - `GET {db}/{users}.json` for the whole community
/// - `GET {db}/{users}/{id}.json` for one member
/// - `GET {db}/{users}.json?shallow=true` as a cheap liveness probe
///
/// The database answers `null` for paths that hold no data.
pub struct FirebaseClient {
    base_url: String,
    users_path: String,
    auth_token: Option<String>,
    client: Client,
}

impl FirebaseClient {
    /// Create a new Firebase client
    pub fn new(
        base_url: String,
        users_path: String,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            users_path: users_path.trim_matches('/').to_string(),
            auth_token: auth_token.filter(|t| !t.is_empty()),
            client,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.users_path)
    }

    fn record_url(&self, user_id: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.base_url,
            self.users_path,
            urlencoding::encode(user_id)
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }

    async fn check_status(response: Response, action: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Firebase {} failed: {} - {}", action, status, body);
            return Err(StoreError::ApiError(format!("Failed to {}: {}", action, status)));
        }
        Ok(response)
    }
}

#[async_trait]
impl UserStore for FirebaseClient {
    async fn fetch_users(&self) -> Result<Vec<UserSkillProfile>, StoreError> {
        let url = self.collection_url();
        tracing::debug!("Fetching users from: {}", url);

        let response = self.get(&url).send().await?;
        let response = Self::check_status(response, "fetch users").await?;

        let snapshot: Value = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse users: {}", e)))?;

        let users = profiles_from_snapshot(snapshot);
        tracing::debug!("Fetched {} users", users.len());

        Ok(users)
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserSkillProfile>, StoreError> {
        if user_id.is_empty() {
            return Ok(None);
        }

        tracing::debug!("Fetching user: {}", user_id);

        let response = self.get(&self.record_url(user_id)).send().await?;
        let response = Self::check_status(response, "fetch user").await?;

        let record: Value = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse user: {}", e)))?;

        if record.is_null() {
            return Ok(None);
        }

        decode_profile(user_id, record)
            .map(Some)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to decode user {}: {}", user_id, e)))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let response = self
            .get(&self.collection_url())
            .query(&[("shallow", "true")])
            .send()
            .await?;
        Self::check_status(response, "probe users").await?;
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "firebase"
    }
}
