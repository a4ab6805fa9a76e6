use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::user::AuthorInfo;

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub author: AuthorInfo,
    pub post_id: i64,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Comment {
    pub fn author_id(&self) -> Uuid {
        self.author.id
    }
}

/// Per (user, post) like and bookmark flags. At most one row per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPostRelation {
    pub user_id: Uuid,
    pub post_id: i64,
    pub liked: bool,
    pub in_bookmarks: bool,
}
