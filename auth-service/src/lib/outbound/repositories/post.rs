use async_trait::async_trait;
use auth::UserId;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostTitle;
use crate::domain::post::ports::PostRepository;

/// Posts are soft-deleted: `deleted_at` is set and every read filters on it.
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    user_id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = PostError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(row.id)
            .map_err(|_| PostError::DatabaseError(format!("Invalid post id: {}", row.id)))?;
        let author_id = u64::try_from(row.user_id)
            .map_err(|_| PostError::DatabaseError(format!("Invalid user id: {}", row.user_id)))?;

        Ok(Post {
            id: PostId(id),
            author_id: UserId(author_id),
            title: PostTitle::new(row.title)?,
            content: PostContent::new(row.content)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn database_error(e: sqlx::Error) -> PostError {
    PostError::DatabaseError(e.to_string())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let author = post.author_id;
        let Some(user_id) = to_db_id(author.as_u64()) else {
            return Err(PostError::AuthorNotFound(author.to_string()));
        };

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (user_id, title, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return PostError::AuthorNotFound(author.to_string());
                }
            }
            database_error(e)
        })?;

        row.try_into()
    }

    async fn find_all(&self) -> Result<Vec<Post>, PostError> {
        sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, title, content, created_at, updated_at
            FROM posts
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Post::try_from)
        .collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError> {
        let Some(id) = to_db_id(id.as_u64()) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, title, content, created_at, updated_at
            FROM posts
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Post::try_from).transpose()
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let Some(id) = to_db_id(post.id.as_u64()) else {
            return Err(PostError::NotFound(post.id.to_string()));
        };

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $2, content = $3, updated_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.ok_or_else(|| PostError::NotFound(post.id.to_string()))?
            .try_into()
    }

    async fn delete(&self, id: PostId) -> Result<(), PostError> {
        let Some(db_id) = to_db_id(id.as_u64()) else {
            return Err(PostError::NotFound(id.to_string()));
        };

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(db_id)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
