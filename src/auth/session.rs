use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use tracing::{debug, info};

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, Claims, User},
};

#[derive(Debug, Default)]
struct AuthState {
    token: Option<String>,
    user: Option<User>,
}

/// Shared handle to the logged in student. Cloning shares the same state, so the
/// client and the front-end observe the same login and logout.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    state: Arc<RwLock<AuthState>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        if let Ok(mut lock) = session.state.write() {
            lock.token = Some(token.into());
        }
        session
    }

    pub fn set(&self, response: AuthResponse) -> Result<(), AuthError> {
        let mut lock = self.state.write().map_err(|_| AuthError::Lock)?;
        info!("Auth session established for user {}", response.user.id);
        lock.token = Some(response.token);
        lock.user = Some(response.user);
        Ok(())
    }

    pub fn set_user(&self, user: User) -> Result<(), AuthError> {
        let mut lock = self.state.write().map_err(|_| AuthError::Lock)?;
        lock.user = Some(user);
        Ok(())
    }

    pub fn clear(&self) {
        if let Ok(mut lock) = self.state.write() {
            debug!("Clearing auth session");
            *lock = AuthState::default();
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok().and_then(|lock| lock.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().ok().and_then(|lock| lock.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Reads `exp` from the held token. The signature is not checked, the server
    /// remains the authority on validity.
    pub fn expires_at(&self) -> Result<DateTime<Utc>, AuthError> {
        let token = self.token().ok_or(AuthError::MissingToken)?;
        let header = decode_header(&token)?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)?;
        let exp = data.claims.exp.ok_or(AuthError::InvalidExpiry)?;
        DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidExpiry)
    }

    /// True when the token expires within `buffer`, or its expiry cannot be read.
    pub fn is_expiring(&self, buffer: Duration) -> bool {
        match self.expires_at() {
            Ok(exp) => exp - buffer <= Utc::now(),
            Err(e) => {
                debug!("Treating token as expiring: {}", e);
                true
            }
        }
    }
}
