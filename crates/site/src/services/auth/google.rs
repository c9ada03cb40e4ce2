//! Google OAuth authorization-code flow.
//!
//! "Sign in with Google": redirect the browser to Google's consent
//! screen, then exchange the returned code for the user's identity. Only
//! identity is requested (openid/email/profile).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::GoogleConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

/// Errors that can occur during the Google OAuth flow.
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google rejected the code exchange.
    #[error("token exchange failed: {0}")]
    Exchange(String),

    /// The userinfo response is missing required fields.
    #[error("malformed userinfo response: {0}")]
    Parse(String),
}

/// Identity asserted by Google for a signed-in account.
#[derive(Debug, Clone)]
pub struct GoogleUser {
    pub email: String,
    pub name: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
}

impl GoogleOAuth {
    /// Create a client from configuration.
    ///
    /// The callback lands on `{base_url}/auth/google/callback`.
    #[must_use]
    pub fn new(config: &GoogleConfig, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: format!("{}/auth/google/callback", base_url.trim_end_matches('/')),
        }
    }

    /// Build the consent-screen URL for a CSRF state token.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        let mut url = url::Url::parse(AUTHORIZE_URL).expect("valid authorize URL");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("state", state);
        url.into()
    }

    /// Exchange an authorization code for the user's identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the exchange is rejected, the transport
    /// fails, or the userinfo response lacks an email.
    pub async fn fetch_user(&self, code: &str) -> Result<GoogleUser, GoogleAuthError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleAuthError::Exchange(body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GoogleAuthError::Parse(e.to_string()))?;

        let info: UserInfoResponse = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| GoogleAuthError::Parse(e.to_string()))?;

        let email = info
            .email
            .ok_or_else(|| GoogleAuthError::Parse("missing email".to_owned()))?;

        Ok(GoogleUser {
            email,
            name: info.name,
            email_verified: info.email_verified.unwrap_or(false),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> GoogleOAuth {
        GoogleOAuth::new(
            &GoogleConfig {
                client_id: "client-123".to_owned(),
                client_secret: SecretString::from("s3cr3t-value"),
            },
            "https://store.test",
        )
    }

    #[test]
    fn test_authorize_url_carries_state_and_redirect() {
        let url = client().authorize_url("state-abc");
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("google%2Fcallback"));
    }

    #[test]
    fn test_redirect_uri_strips_trailing_slash() {
        let client = GoogleOAuth::new(
            &GoogleConfig {
                client_id: "c".to_owned(),
                client_secret: SecretString::from("s"),
            },
            "https://store.test/",
        );
        assert_eq!(client.redirect_uri, "https://store.test/auth/google/callback");
    }
}
