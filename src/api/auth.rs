use reqwest::header::COOKIE;

use super::{ApiClient, ApiError};
use crate::types::RefreshResponse;

/// Token lifetime assumed when the server omits `maxAge`.
const DEFAULT_MAX_AGE_MILLIS: i64 = 60 * 60 * 1000;

impl ApiClient {
    /// Exchanges the stored refresh token for a new access token.
    ///
    /// The server reads the refresh token from the `refresh_token` cookie, the
    /// same way the browser session sends it, and answers with the new access
    /// token and its lifetime in milliseconds (`maxAge`). The new token is
    /// persisted; a failed write is logged and otherwise ignored because the
    /// in-memory token is already usable.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no refresh token is stored
    /// - [`ApiError::Refresh`] when the server rejects the refresh
    /// - [`ApiError::Http`] on network failures
    pub async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let refresh_token = {
            let tokens = self.tokens.lock().await;
            tokens.refresh_token().map(str::to_string)
        };
        let Some(refresh_token) = refresh_token else {
            return Err(ApiError::Unauthorized);
        };

        let response = self
            .http
            .get(format!("{}/refresh", self.base_url))
            .header(COOKIE, format!("refresh_token={refresh_token}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Refresh(format!(
                "server answered {}",
                response.status()
            )));
        }

        let refreshed = response
            .json::<RefreshResponse>()
            .await
            .map_err(|e| ApiError::Refresh(e.to_string()))?;
        if refreshed.access_token.is_empty() {
            return Err(ApiError::Refresh("empty access token".to_string()));
        }

        let max_age = if refreshed.max_age > 0 {
            refreshed.max_age
        } else {
            DEFAULT_MAX_AGE_MILLIS
        };

        let mut tokens = self.tokens.lock().await;
        tokens.replace_access_token(refreshed.access_token, max_age);
        if let Err(e) = tokens.persist().await {
            tracing::warn!(error = %e, "failed to persist refreshed token");
        }
        tracing::info!("access token refreshed");
        Ok(())
    }
}
