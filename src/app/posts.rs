use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::PageSlice;
use crate::domain::post::{Post, PostChanges, PostFilter, PostStatus};
use crate::domain::user::AuthorInfo;
use crate::infra::db::Db;

/// Post columns plus the author and the live like/bookmark counts.
const POST_COLUMNS: &str = "p.id, p.title, p.body, p.status::text AS status, p.publish, \
     p.created_at, p.updated_at, \
     u.id AS author_id, u.first_name AS author_first_name, u.last_name AS author_last_name, \
     agg.likes_count, agg.bookmarks_count";

const POST_JOINS: &str = "JOIN users u ON u.id = p.author_id \
     CROSS JOIN LATERAL ( \
         SELECT COUNT(*) FILTER (WHERE r.liked) AS likes_count, \
                COUNT(*) FILTER (WHERE r.in_bookmarks) AS bookmarks_count \
         FROM user_post_relations r \
         WHERE r.post_id = p.id \
     ) agg";

// $1 author, $2 status, $3 search patterns; every pattern has to hit title or body.
const POST_FILTER: &str = "($1::uuid IS NULL OR p.author_id = $1) \
     AND ($2::text IS NULL OR p.status = $2::post_status) \
     AND NOT EXISTS ( \
         SELECT 1 FROM unnest($3::text[]) AS term \
         WHERE NOT (p.title ILIKE term ESCAPE '\\' OR p.body ILIKE term ESCAPE '\\') \
     )";

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub publish: Option<OffsetDateTime>,
}

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_post(&self, author_id: Uuid, post: NewPost) -> Result<Post> {
        let query = format!(
            "WITH p AS ( \
                INSERT INTO posts (author_id, title, body, status, publish) \
                VALUES ($1, $2, $3, $4::post_status, COALESCE($5, now())) \
                RETURNING * \
             ) \
             SELECT {POST_COLUMNS} FROM p {POST_JOINS}"
        );
        let row = sqlx::query(&query)
            .bind(author_id)
            .bind(post.title)
            .bind(post.body)
            .bind(post.status.as_db())
            .bind(post.publish)
            .fetch_one(self.db.pool())
            .await?;

        post_from_row(&row)
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts p {POST_JOINS} WHERE p.id = $1");
        let row = sqlx::query(&query)
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// Applies `changes` only while the stored post is a draft or the change
    /// itself makes it one. Returns `None` when no row matched that guard.
    pub async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Option<Post>> {
        let query = format!(
            "WITH p AS ( \
                UPDATE posts \
                SET title = COALESCE($2, title), \
                    body = COALESCE($3, body), \
                    status = COALESCE($4::post_status, status), \
                    publish = COALESCE($5, publish), \
                    updated_at = now() \
                WHERE id = $1 AND (status = 'draft' OR $4::text = 'draft') \
                RETURNING * \
             ) \
             SELECT {POST_COLUMNS} FROM p {POST_JOINS}"
        );
        let row = sqlx::query(&query)
            .bind(post_id)
            .bind(changes.title)
            .bind(changes.body)
            .bind(changes.status.map(|status| status.as_db()))
            .bind(changes.publish)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<PageSlice<Post>> {
        let patterns: Vec<String> = filter
            .search_terms
            .iter()
            .map(|term| format!("%{}%", escape_like_pattern(term)))
            .collect();
        let status = filter.status.map(|status| status.as_db());

        let count_query = format!("SELECT COUNT(*) FROM posts p WHERE {POST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.author_id)
            .bind(status)
            .bind(&patterns)
            .fetch_one(self.db.pool())
            .await?;

        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p {POST_JOINS} \
             WHERE {POST_FILTER} \
             ORDER BY {} \
             LIMIT $4 OFFSET $5",
            filter.ordering.order_by()
        );
        let rows = sqlx::query(&query)
            .bind(filter.author_id)
            .bind(status)
            .bind(&patterns)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in &rows {
            posts.push(post_from_row(row)?);
        }

        Ok(PageSlice {
            total,
            items: posts,
        })
    }
}

fn post_from_row(row: &PgRow) -> Result<Post> {
    let status: String = row.try_get("status")?;
    let status = PostStatus::from_db(&status)
        .ok_or_else(|| anyhow::anyhow!("unknown post status: {}", status))?;

    Ok(Post {
        id: row.try_get("id")?,
        author: AuthorInfo {
            id: row.try_get("author_id")?,
            first_name: row.try_get("author_first_name")?,
            last_name: row.try_get("author_last_name")?,
        },
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        status,
        publish: row.try_get("publish")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        likes_count: row.try_get("likes_count")?,
        bookmarks_count: row.try_get("bookmarks_count")?,
    })
}

fn escape_like_pattern(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
