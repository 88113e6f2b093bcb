use std::sync::Arc;

use defenzo_core::model::UserProfile;
use defenzo_core::password::{check_password_strength, StrengthLabel};
use storage::repository::SessionRepository;

use crate::api::types::{LoginRequest, ProfileUpdate, RegisterRequest, TokenResponse};
use crate::api::ApiClient;
use crate::error::AuthError;

/// Account lifecycle: register, login, profile, logout.
///
/// The bearer token lives in the session repository; every other service
/// picks it up through the shared [`ApiClient`].
#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
    session: Arc<dyn SessionRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, session: Arc<dyn SessionRepository>) -> Self {
        Self { api, session }
    }

    /// Whether a session token is currently stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on storage failures.
    pub async fn is_logged_in(&self) -> Result<bool, AuthError> {
        Ok(self.session.load_token().await?.is_some())
    }

    /// Creates an account, then logs in with the same credentials.
    ///
    /// The password is checked locally first; the server enforces the same
    /// rule, but rejecting weak passwords here saves a round trip and lets
    /// the caller show the suggestions.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` with improvement suggestions, or an
    /// API error from the registration call.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), AuthError> {
        let report = check_password_strength(password);
        if report.label == StrengthLabel::Weak {
            return Err(AuthError::WeakPassword(report.suggestions));
        }

        self.api
            .post_json_unit(
                "/register",
                &RegisterRequest {
                    email,
                    password,
                    full_name,
                },
            )
            .await?;
        self.login(email, password).await
    }

    /// Exchanges credentials for a token and stores it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on rejected credentials or storage failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let response: TokenResponse = self
            .api
            .post_json("/login", &LoginRequest { email, password })
            .await?;
        self.session.save_token(&response.token).await?;
        tracing::info!("logged in");
        Ok(())
    }

    /// Drops the stored token. Purely local; the server keeps no session state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on storage failures.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.clear_token().await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Fetches the current account profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when not authenticated or the request fails.
    pub async fn profile(&self) -> Result<UserProfile, AuthError> {
        Ok(self.api.get_json("/profile").await?)
    }

    /// Updates the profile's name and email, returning the server's copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when not authenticated or the request fails.
    pub async fn update_profile(
        &self,
        email: &str,
        full_name: &str,
    ) -> Result<UserProfile, AuthError> {
        Ok(self
            .api
            .put_json(
                "/profile",
                &ProfileUpdate {
                    email: email.to_owned(),
                    full_name: full_name.to_owned(),
                },
            )
            .await?)
    }

    /// Uploads a profile picture and returns the refreshed profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when not authenticated or the upload fails.
    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UserProfile, AuthError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str("application/octet-stream")
            .map_err(crate::error::ApiError::Http)?;
        let form = reqwest::multipart::Form::new().part("picture", part);
        Ok(self.api.post_multipart("/profile/picture", form).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn service() -> AuthService {
        let session: Arc<dyn SessionRepository> = Arc::new(InMemoryRepository::new());
        let api = Arc::new(ApiClient::new(
            "http://localhost:0",
            Arc::clone(&session),
        ));
        AuthService::new(api, session)
    }

    #[tokio::test]
    async fn register_rejects_weak_password_before_any_request() {
        // Base URL points nowhere; a network attempt would fail differently.
        let err = service()
            .register("a@b.c", "short", "Ada")
            .await
            .unwrap_err();
        match err {
            AuthError::WeakPassword(suggestions) => assert!(!suggestions.is_empty()),
            other => panic!("expected WeakPassword, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let svc = service();
        svc.session.save_token("jwt").await.unwrap();
        assert!(svc.is_logged_in().await.unwrap());

        svc.logout().await.unwrap();
        assert!(!svc.is_logged_in().await.unwrap());
    }
}
