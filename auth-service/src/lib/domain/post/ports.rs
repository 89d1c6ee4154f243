use async_trait::async_trait;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::DeletePostCommand;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Publish a post owned by the command's author.
    ///
    /// # Errors
    /// * `AuthorNotFound` - Author no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn create_post(&self, command: CreatePostCommand) -> Result<Post, PostError>;

    /// All posts, oldest first.
    async fn list_posts(&self) -> Result<Vec<Post>, PostError>;

    /// # Errors
    /// * `NotFound` - Post does not exist
    async fn get_post(&self, id: PostId) -> Result<Post, PostError>;

    /// Replace title and content of a post owned by the requester.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Forbidden` - Requester is not the author
    /// * `DatabaseError` - Database operation failed
    async fn update_post(&self, command: UpdatePostCommand) -> Result<Post, PostError>;

    /// Remove a post owned by the requester.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Forbidden` - Requester is not the author
    /// * `DatabaseError` - Database operation failed
    async fn delete_post(&self, command: DeletePostCommand) -> Result<(), PostError>;
}

/// Persistence operations for post aggregate.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    async fn create(&self, post: NewPost) -> Result<Post, PostError>;

    async fn find_all(&self) -> Result<Vec<Post>, PostError>;

    /// Optional post entity (None if not found)
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError>;

    /// Persist title, content and `updated_at` of an existing post.
    ///
    /// # Errors
    /// * `NotFound` - Post disappeared before the write
    async fn update(&self, post: Post) -> Result<Post, PostError>;

    /// # Errors
    /// * `NotFound` - Post disappeared before the write
    async fn delete(&self, id: PostId) -> Result<(), PostError>;
}
