//! Verification of access tokens issued by the hosted auth provider.
//!
//! Handlers receive the caller as an explicit extractor argument
//! (`AuthenticatedUser` or `AdminUser`) instead of reading identity from
//! ambient state.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::config::AuthSettings;
use crate::error::ApiError;
use crate::routes::AppState;

/// Claims the provider puts in its access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub role: Option<String>,
}

/// Verifies HS256 access tokens and decides who is an admin
///
/// Without a configured secret no token is accepted.
pub struct AuthVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
    admin_emails: Vec<String>,
}

impl AuthVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let key = (!settings.jwt_secret.trim().is_empty())
            .then(|| DecodingKey::from_secret(settings.jwt_secret.as_bytes()));

        Self {
            key,
            validation,
            admin_emails: settings.admin_emails.iter().map(|e| e.trim().to_lowercase()).collect(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let Some(key) = &self.key else {
            tracing::warn!("Refused access token: no JWT secret configured");
            return Err(ApiError::Unauthorized("Sign-in is not available".to_string()));
        };

        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                ApiError::Unauthorized("Invalid or expired session".to_string())
            })
    }

    pub fn is_admin(&self, claims: &Claims) -> bool {
        if claims.app_metadata.role.as_deref() == Some("admin") {
            return true;
        }
        claims
            .email
            .as_deref()
            .map(|email| self.admin_emails.contains(&email.trim().to_lowercase()))
            .unwrap_or(false)
    }
}

/// Any signed-in user
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state not configured".to_string()))?;

    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Sign in to continue".to_string()))?;

    let claims = state.auth.verify(token)?;
    let is_admin = state.auth.is_admin(&claims);

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        is_admin,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Signed-in user with admin rights
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|user| {
            if user.is_admin {
                Ok(AdminUser(user))
            } else {
                tracing::warn!("Non-admin {} tried to reach {}", user.user_id, req.path());
                Err(ApiError::Forbidden("Admin access required".to_string()))
            }
        });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".to_string(),
            audience: Some("authenticated".to_string()),
            admin_emails: vec!["Partner@Firm.example".to_string()],
        }
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_role_claim_grants_admin() {
        let verifier = AuthVerifier::new(&settings());
        let claims = verifier
            .verify(&token(
                serde_json::json!({"sub": "u1", "aud": "authenticated", "exp": exp(), "app_metadata": {"role": "admin"}}),
                "test-secret",
            ))
            .unwrap();

        assert!(verifier.is_admin(&claims));
    }

    #[test]
    fn test_admin_email_list_is_case_insensitive() {
        let verifier = AuthVerifier::new(&settings());
        let claims = verifier
            .verify(&token(
                serde_json::json!({"sub": "u2", "aud": "authenticated", "exp": exp(), "email": "partner@firm.example"}),
                "test-secret",
            ))
            .unwrap();

        assert!(verifier.is_admin(&claims));
    }

    #[test]
    fn test_plain_user_is_not_admin() {
        let verifier = AuthVerifier::new(&settings());
        let claims = verifier
            .verify(&token(
                serde_json::json!({"sub": "u3", "aud": "authenticated", "exp": exp(), "email": "lp@example.com"}),
                "test-secret",
            ))
            .unwrap();

        assert!(!verifier.is_admin(&claims));
    }

    #[test]
    fn test_missing_secret_refuses_empty_key_tokens() {
        let verifier = AuthVerifier::new(&AuthSettings {
            jwt_secret: "  ".to_string(),
            ..settings()
        });
        let result = verifier.verify(&token(
            serde_json::json!({"sub": "u9", "aud": "authenticated", "exp": exp(), "app_metadata": {"role": "admin"}}),
            "",
        ));

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = AuthVerifier::new(&settings());
        let result = verifier.verify(&token(
            serde_json::json!({"sub": "u1", "aud": "authenticated", "exp": exp()}),
            "other-secret",
        ));

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
