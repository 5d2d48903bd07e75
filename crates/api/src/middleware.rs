//! API middleware.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use campusflow_core::{
    AdminCodeService, DirectoryService, DisruptionService, IdentityVerifier, ToneAnnotator,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Disruption lifecycle service.
    pub disruption_service: DisruptionService,
    /// User directory.
    pub directory_service: DirectoryService,
    /// Admin code redemption.
    pub admin_code_service: AdminCodeService,
    /// Tone annotator collaborator (for the standalone analyze endpoint).
    pub annotator: Arc<dyn ToneAnnotator>,
    /// Identity provider collaborator.
    pub identity_verifier: Arc<dyn IdentityVerifier>,
}

/// Authentication middleware.
///
/// Verifies the bearer credential and resolves the request actor (claims,
/// linked user record, effective role) exactly once; handlers read it from
/// request extensions. Requests without a valid credential simply carry no
/// actor, and the extractors reject them where authentication is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.identity_verifier.verify(token).await {
            Ok(claims) => match state.directory_service.resolve_actor(&claims).await {
                Ok(actor) => {
                    req.extensions_mut().insert(actor);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to resolve request actor");
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "Invalid bearer credential");
            }
        }
    }

    next.run(req).await
}
