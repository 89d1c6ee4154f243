use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::create_post::PostRequestBody;
use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_post<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<u64>,
    Json(body): Json<PostRequestBody>,
) -> Result<ApiSuccess<PostData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let (title, content) = body.try_into_parts()?;

    state
        .post_service
        .update_post(UpdatePostCommand {
            post_id: PostId(post_id),
            requested_by: caller.user_id,
            title,
            content,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
