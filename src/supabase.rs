use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::User;

/// Client for the Supabase auth admin API and the `is_admin` RPC.
///
/// All requests carry the service-role key. No retry; errors from a single
/// call are surfaced to the caller, which decides whether to continue.
pub struct SupabaseAdminClient {
    http_client: Client,
    base_url: String,
    service_role_key: String,
}

/// Response envelope of GET /auth/v1/admin/users.
#[derive(Debug, Deserialize)]
struct ListUsersResponse {
    users: Vec<User>,
}

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Supabase error: {status}: {body}")]
    ApiError { status: u16, body: String },
}

impl SupabaseAdminClient {
    pub fn new(base_url: &str, service_role_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    /// List all registered users in service order.
    pub async fn list_users(&self) -> Result<Vec<User>, SupabaseError> {
        let url = format!("{}/auth/v1/admin/users", self.base_url);
        tracing::debug!("Listing users via {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("page", "1"), ("per_page", "1000")])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .map_err(|e| SupabaseError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let body: ListUsersResponse = response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))?;

        Ok(body.users)
    }

    /// Invoke the `is_admin` database function for one user.
    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool, SupabaseError> {
        let url = format!("{}/rest/v1/rpc/is_admin", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&json!({ "user_id": user_id }))
            .send()
            .await
            .map_err(|e| SupabaseError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))
    }

    /// Grant the admin role to a user by patching its app metadata.
    pub async fn promote_to_admin(&self, user_id: Uuid) -> Result<User, SupabaseError> {
        let url = format!("{}/auth/v1/admin/users/{}", self.base_url, user_id);
        tracing::debug!("Promoting user {} via {}", user_id, url);

        let response = self
            .http_client
            .put(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&json!({ "app_metadata": { "role": "admin" } }))
            .send()
            .await
            .map_err(|e| SupabaseError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupabaseError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
