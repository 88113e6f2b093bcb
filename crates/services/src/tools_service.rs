use std::sync::Arc;

use defenzo_core::password::{check_password_strength, PasswordReport};
use serde::Serialize;
use url::Url;

use crate::api::types::{PasswordCheckResult, ScanResult};
use crate::api::ApiClient;
use crate::error::ToolsServiceError;

/// The standalone security tools: URL scanning and password checking.
#[derive(Clone)]
pub struct ToolsService {
    api: Arc<ApiClient>,
}

#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordCheckRequest<'a> {
    password: &'a str,
}

impl ToolsService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Submits a URL for a reputation scan.
    ///
    /// The URL is validated locally first; only `http` and `https` are worth
    /// sending to the scanner.
    ///
    /// # Errors
    ///
    /// Returns `ToolsServiceError` for a malformed URL, an unsupported
    /// scheme, or a failed API call.
    pub async fn scan_url(&self, raw: &str) -> Result<ScanResult, ToolsServiceError> {
        let url = Url::parse(raw.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ToolsServiceError::UnsupportedScheme(
                url.scheme().to_owned(),
            ));
        }

        let result: ScanResult = self
            .api
            .post_json("/scan", &ScanRequest { url: url.as_str() })
            .await?;
        tracing::info!(url = %result.url, status = %result.status, "url scanned");
        Ok(result)
    }

    /// Checks a password against the server's strength rules.
    ///
    /// # Errors
    ///
    /// Returns `ToolsServiceError` on API failures; [`Self::check_password_offline`]
    /// is the fallback.
    pub async fn check_password(
        &self,
        password: &str,
    ) -> Result<PasswordCheckResult, ToolsServiceError> {
        Ok(self
            .api
            .post_json("/password-check", &PasswordCheckRequest { password })
            .await?)
    }

    /// The same strength check, computed locally. The criteria mirror the
    /// server's, so results agree.
    #[must_use]
    pub fn check_password_offline(&self, password: &str) -> PasswordReport {
        check_password_strength(password)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use defenzo_core::password::StrengthLabel;
    use storage::repository::InMemoryRepository;

    fn service() -> ToolsService {
        ToolsService::new(Arc::new(ApiClient::new(
            "http://localhost:0",
            Arc::new(InMemoryRepository::new()),
        )))
    }

    #[tokio::test]
    async fn scan_rejects_malformed_url() {
        let err = service().scan_url("not a url").await.unwrap_err();
        assert!(matches!(err, ToolsServiceError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn scan_rejects_non_http_scheme() {
        let err = service().scan_url("ftp://files.example").await.unwrap_err();
        match err {
            ToolsServiceError::UnsupportedScheme(scheme) => assert_eq!(scheme, "ftp"),
            other => panic!("expected UnsupportedScheme, got {other:?}"),
        }
    }

    #[test]
    fn offline_check_matches_core_rules() {
        let report = service().check_password_offline("Tr0ub4dor&horse!");
        assert_eq!(report.label, StrengthLabel::Strong);
    }
}
