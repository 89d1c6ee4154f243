use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::models::DeletePostCommand;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_post<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<u64>,
) -> Result<ApiSuccess<()>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    state
        .post_service
        .delete_post(DeletePostCommand {
            post_id: PostId(post_id),
            requested_by: caller.user_id,
        })
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
