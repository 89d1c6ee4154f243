use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a brand-new token pair.
pub async fn refresh<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Json(body): Json<RefreshRequestBody>,
) -> Result<ApiSuccess<TokenPair>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    state
        .authentication
        .refresh(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequestBody {
    token: String,
}
