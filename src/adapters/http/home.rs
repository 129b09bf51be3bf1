//! Home and current-user endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};

use super::middleware::RequireAuth;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeResponse {
    pub message: String,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// GET / - Liveness and greeting
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Welcome to rest-ws".to_string(),
        status: true,
    })
}

/// GET /api/v1/me - The caller behind the Bearer token
pub async fn me(RequireAuth(user): RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id.to_string(),
        email: user.email,
    })
}
