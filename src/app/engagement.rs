use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::PageSlice;
use crate::domain::engagement::{Comment, UserPostRelation};
use crate::domain::user::AuthorInfo;
use crate::infra::db::Db;

const COMMENT_COLUMNS: &str = "c.id, c.post_id, c.body, c.created_at, c.updated_at, \
     u.id AS author_id, u.first_name AS author_first_name, u.last_name AS author_last_name";

/// Comments and the per-user like/bookmark relation rows.
#[derive(Clone)]
pub struct EngagementService {
    db: Db,
}

impl EngagementService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn comment_post(&self, author_id: Uuid, post_id: i64, body: String) -> Result<Comment> {
        let query = format!(
            "WITH c AS ( \
                INSERT INTO comments (author_id, post_id, body) VALUES ($1, $2, $3) \
                RETURNING * \
             ) \
             SELECT {COMMENT_COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        let row = sqlx::query(&query)
            .bind(author_id)
            .bind(post_id)
            .bind(body)
            .fetch_one(self.db.pool())
            .await?;

        comment_from_row(&row)
    }

    pub async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE c.id = $1"
        );
        let row = sqlx::query(&query)
            .bind(comment_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(comment_from_row).transpose()
    }

    pub async fn update_comment(&self, comment_id: i64, body: String) -> Result<Option<Comment>> {
        let query = format!(
            "WITH c AS ( \
                UPDATE comments SET body = $2, updated_at = now() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COMMENT_COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        let row = sqlx::query(&query)
            .bind(comment_id)
            .bind(body)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(comment_from_row).transpose()
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_comments(
        &self,
        post_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<PageSlice<Comment>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.db.pool())
            .await?;

        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY c.id ASC \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(post_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in &rows {
            comments.push(comment_from_row(row)?);
        }

        Ok(PageSlice {
            total,
            items: comments,
        })
    }

    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<PageSlice<Comment>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(self.db.pool())
            .await?;

        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE c.author_id = $1 \
             ORDER BY c.id ASC \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in &rows {
            comments.push(comment_from_row(row)?);
        }

        Ok(PageSlice {
            total,
            items: comments,
        })
    }

    /// Get-or-create the relation row for `(user_id, post_id)` and apply the
    /// given flags in one statement, so concurrent first requests from the
    /// same user still end with a single row.
    pub async fn upsert_relation(
        &self,
        user_id: Uuid,
        post_id: i64,
        like: Option<bool>,
        in_bookmarks: Option<bool>,
    ) -> Result<UserPostRelation> {
        let row = sqlx::query(
            "INSERT INTO user_post_relations (user_id, post_id, liked, in_bookmarks) \
             VALUES ($1, $2, COALESCE($3, FALSE), COALESCE($4, FALSE)) \
             ON CONFLICT (user_id, post_id) DO UPDATE \
             SET liked = COALESCE($3, user_post_relations.liked), \
                 in_bookmarks = COALESCE($4, user_post_relations.in_bookmarks) \
             RETURNING user_id, post_id, liked, in_bookmarks",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(like)
        .bind(in_bookmarks)
        .fetch_one(self.db.pool())
        .await?;

        Ok(UserPostRelation {
            user_id: row.try_get("user_id")?,
            post_id: row.try_get("post_id")?,
            liked: row.try_get("liked")?,
            in_bookmarks: row.try_get("in_bookmarks")?,
        })
    }
}

fn comment_from_row(row: &PgRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        author: AuthorInfo {
            id: row.try_get("author_id")?,
            first_name: row.try_get("author_first_name")?,
            last_name: row.try_get("author_last_name")?,
        },
        post_id: row.try_get("post_id")?,
        body: row.try_get("body")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
