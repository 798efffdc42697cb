use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use hyper_util::client::legacy::connect::HttpConnector;
use tracing::debug;
use yup_oauth2::{
    ServiceAccountAuthenticator, authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

pub(super) type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Build an authenticator from a service account key given as JSON text.
/// No token is requested until [`verify_authenticator`] or the first API call.
pub(super) async fn from_service_account(credentials: &str) -> Result<AuthType> {
    let key = yup_oauth2::parse_service_account_key(credentials)
        .map_err(|e| AppError::Auth(format!("Failed to parse service account key: {}", e)))?;

    debug!(client_email = %key.client_email, "Using service account");

    ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))
}

/// Trigger authentication by requesting a token
pub(super) async fn verify_authenticator(auth: &AuthType) -> Result<()> {
    auth.token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(())
}
