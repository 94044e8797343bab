//! Main authentication service implementation

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::domain::value_objects::auth_response::BEARER;
use crate::domain::value_objects::{LoginRequest, LoginResult, RefreshResult};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{SessionRepository, UserLookup};
use crate::services::credentials::CredentialVerifier;
use crate::services::session::SessionStore;
use crate::services::token::TokenCodec;

/// Authentication service for user login, refresh and logout
///
/// Session lifecycle: Anonymous → Authenticated (login) → Refreshed (any
/// number of refreshes) → LoggedOut (logout or logout_all).
pub struct AuthenticationService<U, S>
where
    U: UserLookup,
    S: SessionRepository,
{
    /// Read access to user accounts and permissions
    users: Arc<U>,
    /// Durable refresh-token sessions
    sessions: SessionStore<S>,
    /// Token signing and verification
    codec: Arc<TokenCodec>,
    /// Password checking
    verifier: CredentialVerifier,
}

impl<U, S> AuthenticationService<U, S>
where
    U: UserLookup,
    S: SessionRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `users` - Lookup for user accounts
    /// * `sessions` - Session store for refresh tokens
    /// * `codec` - Shared token codec
    /// * `verifier` - Password verifier
    pub fn new(
        users: Arc<U>,
        sessions: SessionStore<S>,
        codec: Arc<TokenCodec>,
        verifier: CredentialVerifier,
    ) -> Self {
        Self {
            users,
            sessions,
            codec,
            verifier,
        }
    }

    /// Log a user in with email and password
    ///
    /// This method:
    /// 1. Looks the user up by email
    /// 2. Verifies the password (a dummy check runs when the user is unknown)
    /// 3. Issues an access token with the user's permissions and a refresh token
    /// 4. Records a session for the refresh token
    ///
    /// Every credential failure yields the same `InvalidCredentials` error.
    /// A session that cannot be persisted fails the login.
    pub async fn login(&self, request: LoginRequest) -> DomainResult<LoginResult> {
        let LoginRequest {
            email,
            password,
            ip_address,
            user_agent,
        } = request;

        // Step 1: Find an active account
        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                self.verifier.dummy_verify_blocking(password).await;
                warn!("login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        // Step 2: Check the password
        let matches = self
            .verifier
            .verify_password_blocking(password, user.password_hash.clone())
            .await?;
        if !matches {
            warn!(user_id = user.id, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        // Step 3: Issue tokens
        let permissions = self.users.get_permissions(user.id).await?;
        let access_token = self.codec.create_access_token(user.id, permissions, None)?;
        let refresh_token = self.codec.create_refresh_token(user.id, None)?;

        // Step 4: Persist the session
        let session = self
            .sessions
            .create(
                user.id,
                &refresh_token,
                ip_address,
                user_agent,
                self.codec.refresh_ttl(),
            )
            .await?;

        info!(user_id = user.id, session_id = %session.id, "user logged in");

        Ok(LoginResult {
            user,
            access_token,
            refresh_token,
            token_type: BEARER,
            expires_in: self.codec.access_ttl().num_seconds(),
        })
    }

    /// Issue a new access token for a live refresh token
    ///
    /// The refresh token itself is not rotated and stays usable until it
    /// expires or is revoked. Permissions are re-read so changes since login
    /// take effect.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<RefreshResult> {
        let claims = self
            .codec
            .verify_refresh_token(refresh_token)
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;

        if !self.sessions.is_valid(refresh_token).await? {
            warn!(user_id = claims.user_id, "refresh rejected: session revoked or expired");
            return Err(AuthError::SessionRevokedOrExpired.into());
        }

        let permissions = self.users.get_permissions(claims.user_id).await?;
        let access_token = self
            .codec
            .create_access_token(claims.user_id, permissions, None)?;

        Ok(RefreshResult {
            access_token,
            token_type: BEARER,
            expires_in: self.codec.access_ttl().num_seconds(),
        })
    }

    /// Revoke the session behind a refresh token. Idempotent; returns whether
    /// a session matched.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<bool> {
        let found = self.sessions.revoke(refresh_token).await?;
        if found {
            info!("user logged out");
        }
        Ok(found)
    }

    /// Revoke every session of a user; returns how many were live
    pub async fn logout_all(&self, user_id: i64) -> DomainResult<usize> {
        self.sessions.revoke_all_for_user(user_id).await
    }

    /// Active sessions of a user, newest first
    pub async fn list_sessions(&self, user_id: i64) -> DomainResult<Vec<Session>> {
        self.sessions.list_active_for_user(user_id).await
    }

    /// Revoke one session owned by `user_id`
    ///
    /// Returns `false` when the session does not exist or belongs to another
    /// user; the two cases are indistinguishable to the caller.
    pub async fn revoke_session(&self, user_id: i64, session_id: Uuid) -> DomainResult<bool> {
        match self.sessions.find_by_id(session_id).await? {
            Some(session) if session.user_id == user_id => {
                let revoked = self.sessions.revoke_by_id(session_id).await?;
                info!(user_id, %session_id, "session revoked by owner");
                Ok(revoked)
            }
            _ => Ok(false),
        }
    }
}
