//! AWX Authentication
//!
//! Handles authentication against the AWX API using either an OAuth2
//! personal access token or HTTP basic credentials.

use reqwest::RequestBuilder;
use std::fmt;

/// Environment variable holding the AWX API host
pub const HOST_ENV: &str = "AWX_HOST";
/// Environment variable holding the basic-auth username
pub const USERNAME_ENV: &str = "AWX_USERNAME";
/// Environment variable holding the basic-auth password
pub const PASSWORD_ENV: &str = "AWX_PASSWORD";
/// Environment variable holding an OAuth2 token
pub const TOKEN_ENV: &str = "AWX_TOKEN";
/// Environment variable disabling TLS verification
pub const INSECURE_ENV: &str = "AWX_INSECURE";

/// Credentials used for every AWX request
#[derive(Clone, PartialEq, Eq)]
pub enum AwxCredentials {
    /// No authentication header is sent
    Anonymous,
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// OAuth2 bearer token
    Token(String),
}

impl AwxCredentials {
    /// Pick credentials from the available settings.
    /// A token wins over a username/password pair.
    pub fn resolve(
        token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            return Self::Token(token);
        }
        match username.filter(|u| !u.is_empty()) {
            Some(username) => Self::Basic {
                username,
                password: password.unwrap_or_default(),
            },
            None => Self::Anonymous,
        }
    }

    /// Attach the credentials to an outgoing request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Anonymous => request,
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Token(token) => request.bearer_auth(token),
        }
    }
}

// Security: never print secrets, even in debug logs
impl fmt::Debug for AwxCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}

/// Read a non-empty environment variable
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the AWX host from the environment
pub fn host_from_env() -> Option<String> {
    env_var(HOST_ENV)
}

/// Parse a boolean-ish environment flag ("1", "true", "yes")
pub fn flag_from_env(name: &str) -> Option<bool> {
    env_var(name).map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_wins_over_basic() {
        let creds = AwxCredentials::resolve(
            Some("abc".to_string()),
            Some("admin".to_string()),
            Some("secret".to_string()),
        );
        assert_eq!(creds, AwxCredentials::Token("abc".to_string()));
    }

    #[test]
    fn test_empty_token_falls_back_to_basic() {
        let creds = AwxCredentials::resolve(
            Some(String::new()),
            Some("admin".to_string()),
            None,
        );
        assert_eq!(
            creds,
            AwxCredentials::Basic {
                username: "admin".to_string(),
                password: String::new(),
            }
        );
    }

    #[test]
    fn test_nothing_configured_is_anonymous() {
        assert_eq!(
            AwxCredentials::resolve(None, None, Some("pw".to_string())),
            AwxCredentials::Anonymous
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let basic = AwxCredentials::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let token = AwxCredentials::Token("tok-123".to_string());

        let rendered = format!("{:?} {:?}", basic, token);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("tok-123"));
    }
}
