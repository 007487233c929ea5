//! Google credentials.
//!
//! Daybell never runs the OAuth flow itself. It reads the token file written by
//! the authorization tool, or takes a static token from configuration. The
//! token file is re-read on every request so a token refreshed by the tool is
//! picked up without a restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daybell_core::config::GoogleConfig;
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::CredentialProvider;
use serde::Deserialize;

/// Token file layout (`google-token.json`).
#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: Option<String>,
    /// Epoch milliseconds.
    expiry_date: Option<i64>,
    refresh_token: Option<String>,
}

/// Contents of the token file at the moment it was read.
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub has_refresh_token: bool,
}

impl TokenSnapshot {
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DaybellError::auth(format!(
                "token file not found: {} (run the authorization tool first)",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let stored: StoredToken = serde_json::from_str(&content)
            .map_err(|e| DaybellError::auth(format!("token file {} is invalid: {e}", path.display())))?;

        let access_token = stored
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DaybellError::auth(format!("token file {} has no access_token", path.display()))
            })?;

        Ok(Self {
            access_token,
            expires_at: stored.expiry_date.and_then(DateTime::from_timestamp_millis),
            has_refresh_token: stored.refresh_token.is_some(),
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

#[derive(Debug, Clone)]
pub enum GoogleCredentials {
    /// Token supplied directly through configuration.
    Static(String),
    /// Token file, read again on each request.
    TokenFile(PathBuf),
}

impl GoogleCredentials {
    /// Resolve credentials from configuration. A token file that is missing or
    /// broken right now is only logged: it may be fixed before the next check.
    pub fn resolve(config: &GoogleConfig) -> Self {
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return GoogleCredentials::Static(token.trim().to_string());
        }
        Self::from_token_file(&config.resolved_token_path())
    }

    pub fn from_token_file(path: &Path) -> Self {
        if let Err(e) = TokenSnapshot::read(path) {
            tracing::warn!("⚠️ Google credentials not usable yet: {e}");
        }
        GoogleCredentials::TokenFile(path.to_path_buf())
    }

    fn token_at(&self, now: DateTime<Utc>) -> Result<String> {
        let path = match self {
            GoogleCredentials::Static(token) => return Ok(token.clone()),
            GoogleCredentials::TokenFile(path) => path,
        };

        let snapshot = TokenSnapshot::read(path)?;
        match snapshot.expires_at {
            Some(expiry) if snapshot.is_expired_at(now) => {
                let advice = if snapshot.has_refresh_token {
                    "refresh it with the authorization tool"
                } else {
                    "no refresh token stored, re-run authorization"
                };
                Err(DaybellError::auth(format!(
                    "access token in {} expired at {}; {advice}",
                    path.display(),
                    expiry.to_rfc3339()
                )))
            }
            _ => Ok(snapshot.access_token),
        }
    }
}

#[async_trait]
impl CredentialProvider for GoogleCredentials {
    async fn access_token(&self) -> Result<String> {
        self.token_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn write_token(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("google-token.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn token_json(access_token: &str, expires_at: DateTime<Utc>) -> String {
        format!(
            r#"{{"access_token":"{access_token}","refresh_token":"1//r","expiry_date":{}}}"#,
            expires_at.timestamp_millis()
        )
    }

    #[test]
    fn test_static_token_wins() {
        let config = GoogleConfig {
            token_path: "/does/not/exist.json".into(),
            access_token: Some("ya29.static".into()),
        };
        let creds = GoogleCredentials::resolve(&config);
        assert_eq!(creds.token_at(Utc::now()).unwrap(), "ya29.static");
    }

    #[test]
    fn test_missing_file_is_auth_error() {
        let creds = GoogleCredentials::from_token_file(Path::new("/does/not/exist.json"));
        let err = creds.token_at(Utc::now()).unwrap_err();
        assert!(matches!(err, DaybellError::Auth(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_valid_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_token(&dir, &token_json("ya29.file", Utc::now() + Duration::hours(1)));

        let snapshot = TokenSnapshot::read(&path).unwrap();
        assert!(snapshot.expires_at.is_some());
        assert!(snapshot.has_refresh_token);

        let creds = GoogleCredentials::from_token_file(&path);
        assert_eq!(creds.token_at(Utc::now()).unwrap(), "ya29.file");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_token(&dir, r#"{"access_token":"ya29.old","expiry_date":1000}"#);

        let creds = GoogleCredentials::from_token_file(&path);
        let err = creds.token_at(Utc::now()).unwrap_err();
        assert!(err.to_string().contains("expired"));
        assert!(err.to_string().contains("re-run authorization"));
    }

    #[test]
    fn test_refreshed_token_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let path = write_token(&dir, &token_json("ya29.day1", now + Duration::hours(1)));
        let creds = GoogleCredentials::from_token_file(&path);
        assert_eq!(creds.token_at(now).unwrap(), "ya29.day1");

        // The authorization tool rewrites the file overnight.
        write_token(&dir, &token_json("ya29.day2", now + Duration::hours(30)));
        assert_eq!(creds.token_at(now + Duration::hours(24)).unwrap(), "ya29.day2");
    }

    #[test]
    fn test_token_file_created_after_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google-token.json");
        let creds = GoogleCredentials::from_token_file(&path);
        assert!(creds.token_at(Utc::now()).is_err());

        write_token(&dir, &token_json("ya29.late", Utc::now() + Duration::hours(1)));
        assert_eq!(creds.token_at(Utc::now()).unwrap(), "ya29.late");
    }

    #[test]
    fn test_token_without_access_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_token(&dir, r#"{"refresh_token":"1//r"}"#);
        let err = TokenSnapshot::read(&path).unwrap_err();
        assert!(err.to_string().contains("no access_token"));
    }

    #[test]
    fn test_garbage_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_token(&dir, "not json");
        let err = GoogleCredentials::from_token_file(&path).token_at(Utc::now()).unwrap_err();
        assert!(matches!(err, DaybellError::Auth(_)));
        assert!(err.to_string().contains("invalid"));
    }
}
