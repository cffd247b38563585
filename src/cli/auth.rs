use chrono::Utc;

use crate::{
    config, error, info, management::TokenManager, success, types::AuthToken, warning,
};

/// Token lifetime assumed when none is given on the command line.
const DEFAULT_MAX_AGE_MILLIS: i64 = 60 * 60 * 1000;

/// Stores the given tokens, or sends the user to the login page to get them.
///
/// The API server keeps the Spotify session and hands out its tokens as
/// cookies after login. Without `access_token` the login page is opened in
/// the browser and the user is told how to pass the tokens back.
pub async fn auth(
    access_token: Option<String>,
    refresh_token: Option<String>,
    max_age_millis: Option<i64>,
) {
    let Some(access_token) = access_token.filter(|t| !t.is_empty()) else {
        let url = config::login_url();
        info!("Opening {} in your browser...", url);
        if let Err(e) = webbrowser::open(&url) {
            warning!("Cannot open browser ({}). Visit {} manually.", e, url);
        }
        info!("After logging in, copy the `access_token` and `refresh_token` cookies and run:");
        info!("  mixtape auth --access-token <TOKEN> --refresh-token <TOKEN>");
        return;
    };

    let max_age = max_age_millis
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_MAX_AGE_MILLIS);
    let token = AuthToken {
        access_token,
        refresh_token: refresh_token.filter(|t| !t.is_empty()),
        expires_at: Utc::now().timestamp_millis() + max_age,
    };

    let has_refresh = token.refresh_token.is_some();
    let tokens = TokenManager::new(token);
    if let Err(e) = tokens.persist().await {
        error!("Failed to store token. Err: {}", e);
    }

    success!("Token stored in {}", config::token_path().display());
    if !has_refresh {
        warning!("No refresh token given, you will need to log in again when the token expires.");
    }
}
