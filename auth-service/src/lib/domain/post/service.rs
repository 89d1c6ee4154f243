use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::DeletePostCommand;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;

/// Domain service for posts.
///
/// Enforces authorship: updates and deletes are only applied for the user
/// who wrote the post.
pub struct PostService<PR>
where
    PR: PostRepository,
{
    repository: Arc<PR>,
}

impl<PR> PostService<PR>
where
    PR: PostRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }

    async fn owned_post(
        &self,
        id: PostId,
        requested_by: auth::UserId,
    ) -> Result<Post, PostError> {
        let post = self.get_post(id).await?;

        if !post.is_written_by(requested_by) {
            tracing::warn!(post_id = %id, user_id = %requested_by, "Post change refused");
            return Err(PostError::Forbidden {
                user: requested_by.to_string(),
                post: id.to_string(),
            });
        }

        Ok(post)
    }
}

#[async_trait]
impl<PR> PostServicePort for PostService<PR>
where
    PR: PostRepository,
{
    async fn create_post(&self, command: CreatePostCommand) -> Result<Post, PostError> {
        let post = self
            .repository
            .create(NewPost {
                author_id: command.author_id,
                title: command.title,
                content: command.content,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(post_id = %post.id, user_id = %post.author_id, "Post created");

        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, PostError> {
        self.repository.find_all().await
    }

    async fn get_post(&self, id: PostId) -> Result<Post, PostError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))
    }

    async fn update_post(&self, command: UpdatePostCommand) -> Result<Post, PostError> {
        let mut post = self
            .owned_post(command.post_id, command.requested_by)
            .await?;

        post.title = command.title;
        post.content = command.content;
        post.updated_at = Utc::now();

        let updated = self.repository.update(post).await?;
        tracing::info!(post_id = %updated.id, "Post updated");

        Ok(updated)
    }

    async fn delete_post(&self, command: DeletePostCommand) -> Result<(), PostError> {
        let post = self
            .owned_post(command.post_id, command.requested_by)
            .await?;

        self.repository.delete(post.id).await?;
        tracing::info!(post_id = %post.id, "Post deleted");

        Ok(())
    }
}
