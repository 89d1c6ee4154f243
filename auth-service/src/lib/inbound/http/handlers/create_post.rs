use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostTitle;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_post<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<PostRequestBody>,
) -> Result<ApiSuccess<PostData>, ApiError>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let (title, content) = body.try_into_parts()?;

    state
        .post_service
        .create_post(CreatePostCommand {
            author_id: caller.user_id,
            title,
            content,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

/// HTTP request body for creating or replacing a post (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostRequestBody {
    title: String,
    content: String,
}

impl PostRequestBody {
    pub(super) fn try_into_parts(self) -> Result<(PostTitle, PostContent), PostError> {
        Ok((PostTitle::new(self.title)?, PostContent::new(self.content)?))
    }
}
