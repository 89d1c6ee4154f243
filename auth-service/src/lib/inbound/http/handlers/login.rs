use auth::Credentials;
use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn login<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<TokenPair>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let credentials = body.try_into_credentials()?;

    state
        .authentication
        .login(credentials)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair))
}

/// HTTP request body for logging in (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

impl LoginRequestBody {
    fn try_into_credentials(self) -> Result<Credentials, ApiError> {
        let email = EmailAddress::new(self.email)
            .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid email: {}", e)))?;
        if self.password.is_empty() {
            return Err(ApiError::UnprocessableEntity(
                "Password must not be empty".to_string(),
            ));
        }
        Ok(Credentials::new(email.as_str(), self.password))
    }
}
