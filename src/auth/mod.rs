//! Admin gate.
//!
//! Every write goes through [`AdminGate::require_admin`]: the request must
//! carry a valid session and its email must be on the allowlist. The allowlist
//! comes from the `admin-allowlist` content block, or from configuration while
//! that block is absent or empty.

mod session;

pub use session::{token_from_headers, SessionKeys, SESSION_COOKIE};

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::db::ContentStore;
use crate::errors::AppError;
use crate::models::{AdminAllowlistContent, ContentSlug};
use crate::AppState;

/// Where the allowlist was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowlistSource {
    ContentBlock,
    Environment,
}

impl fmt::Display for AllowlistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowlistSource::ContentBlock => f.write_str("content block"),
            AllowlistSource::Environment => f.write_str("environment"),
        }
    }
}

/// Lowercased admin emails together with their source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAllowlist {
    pub emails: Vec<String>,
    pub source: AllowlistSource,
}

impl ResolvedAllowlist {
    pub fn contains(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.emails.iter().any(|allowed| *allowed == email)
    }
}

/// Email of the admin who passed the gate, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminEmail(pub String);

/// Decides who may write content.
pub struct AdminGate {
    store: Arc<ContentStore>,
    fallback: Option<String>,
    sessions: Option<SessionKeys>,
}

impl AdminGate {
    pub fn new(
        store: Arc<ContentStore>,
        fallback: Option<String>,
        sessions: Option<SessionKeys>,
    ) -> Self {
        Self {
            store,
            fallback,
            sessions,
        }
    }

    /// Resolve the allowlist: a non-empty `admin-allowlist` block wins, the
    /// configured list is the fallback.
    pub async fn resolve_allowed_admins(&self) -> Result<ResolvedAllowlist, AppError> {
        let slug = ContentSlug::AdminAllowlist.as_str();
        match self.store.try_fetch_content_block(slug).await {
            Ok(Some(block)) => {
                match serde_json::from_value::<AdminAllowlistContent>(block.data) {
                    Ok(list) if !list.emails.is_empty() => {
                        return Ok(ResolvedAllowlist {
                            emails: list.emails.iter().map(|e| e.to_lowercase()).collect(),
                            source: AllowlistSource::ContentBlock,
                        });
                    }
                    Ok(_) => tracing::debug!("Allowlist block is empty, using fallback"),
                    Err(e) => tracing::warn!("Allowlist block is unreadable, using fallback: {}", e),
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not read allowlist block, using fallback: {}", e),
        }

        let emails = self
            .fallback
            .as_deref()
            .map(parse_email_list)
            .unwrap_or_default();

        if emails.is_empty() {
            return Err(AppError::Configuration(
                "Admin allowlist not configured".to_string(),
            ));
        }

        Ok(ResolvedAllowlist {
            emails,
            source: AllowlistSource::Environment,
        })
    }

    /// Check `email` against the allowlist, ignoring case.
    pub async fn is_email_allowed(&self, email: &str) -> Result<bool, AppError> {
        let list = self.resolve_allowed_admins().await?;
        tracing::debug!("Checking {} against {} allowlist", email, list.source);
        Ok(list.contains(email))
    }

    /// Email of the signed-in user behind this request.
    pub fn current_user_email(&self, headers: &HeaderMap) -> Result<String, AppError> {
        let Some(sessions) = &self.sessions else {
            return Err(AppError::NotAuthenticated(
                "Authentication is not configured".to_string(),
            ));
        };

        token_from_headers(headers)
            .and_then(|token| sessions.verify(&token))
            .ok_or_else(|| AppError::NotAuthenticated("Not signed in".to_string()))
    }

    /// Require a signed-in admin; returns their email.
    pub async fn require_admin(&self, headers: &HeaderMap) -> Result<String, AppError> {
        let email = self.current_user_email(headers)?;

        if !self.is_email_allowed(&email).await? {
            tracing::warn!("Write attempt by non-admin {}", email);
            return Err(AppError::AccessDenied("Access denied".to_string()));
        }

        tracing::debug!("Admin {} authorized", email);
        Ok(email)
    }
}

/// Split a comma-separated list into trimmed, lowercased, non-empty emails.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Middleware that rejects the request unless the caller is an admin.
pub async fn admin_gate_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.gate.require_admin(request.headers()).await {
        Ok(email) => {
            request.extensions_mut().insert(AdminEmail(email));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
