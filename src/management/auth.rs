use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{config, types::AuthToken};

pub struct TokenManager {
    token: Option<AuthToken>,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: AuthToken) -> Self {
        Self::at(config::token_path(), Some(token))
    }

    pub fn at(path: PathBuf, token: Option<AuthToken>) -> Self {
        TokenManager { token, path }
    }

    pub async fn load() -> Result<Self, String> {
        Self::load_from(&config::token_path()).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, String> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let token: AuthToken = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::at(path.to_path_buf(), Some(token)))
    }

    pub async fn persist(&self) -> Result<(), String> {
        let Some(token) = &self.token else {
            return Err("no token to persist".to_string());
        };
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// The access token, unless it is missing or past its expiry.
    pub fn access_token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .filter(|_| !self.is_expired())
            .map(|t| t.access_token.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .and_then(|t| t.refresh_token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn is_expired(&self) -> bool {
        match &self.token {
            Some(token) => Utc::now().timestamp_millis() >= token.expires_at,
            None => true,
        }
    }

    /// Swaps in a freshly issued access token, keeping the refresh token.
    pub fn replace_access_token(&mut self, access_token: String, max_age_millis: i64) {
        let expires_at = Utc::now().timestamp_millis() + max_age_millis;
        let refresh_token = self.token.as_ref().and_then(|t| t.refresh_token.clone());
        self.token = Some(AuthToken {
            access_token,
            refresh_token,
            expires_at,
        });
    }

    pub fn current_token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }
}
