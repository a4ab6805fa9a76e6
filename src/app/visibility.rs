//! Response shapes for posts, comments and relations.
//!
//! Every endpoint has its own fixed shape; fields outside a shape are never
//! emitted. Where the shape depends on who is asking, the choice is made by
//! the `*_view` functions below rather than by trimming a generic record.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::engagement::{Comment, UserPostRelation};
use crate::domain::post::{Post, PostStatus};
use crate::domain::user::{AuthorInfo, Requester};

/// One page of results with absolute links to its neighbours.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListItem {
    pub id: i64,
    pub author: AuthorInfo,
    pub title: String,
    pub body: String,
    pub likes_count: i64,
    pub bookmarks_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
}

impl From<Post> for PostListItem {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            title: post.title,
            body: post.body,
            likes_count: post.likes_count,
            bookmarks_count: post.bookmarks_count,
            created: post.created_at,
            updated: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MyPostItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub likes_count: i64,
    pub bookmarks_count: i64,
    pub status: PostStatus,
}

impl From<Post> for MyPostItem {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            likes_count: post.likes_count,
            bookmarks_count: post.bookmarks_count,
            status: post.status,
        }
    }
}

/// Returned by create and update.
#[derive(Debug, Clone, Serialize)]
pub struct PostFull {
    pub id: i64,
    pub author: AuthorInfo,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub publish: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
}

impl From<Post> for PostFull {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            title: post.title,
            body: post.body,
            status: post.status,
            publish: post.publish,
            created: post.created_at,
            updated: post.updated_at,
        }
    }
}

/// Comment as embedded in a post detail.
#[derive(Debug, Clone, Serialize)]
pub struct PostComment {
    pub id: i64,
    pub author: AuthorInfo,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
}

impl From<Comment> for PostComment {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            body: comment.body,
            created: comment.created_at,
            updated: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PostDetail {
    /// The author already knows who wrote it, but sees the status.
    Owner {
        id: i64,
        title: String,
        body: String,
        status: PostStatus,
        likes_count: i64,
        bookmarks_count: i64,
        comments: Paginated<PostComment>,
    },
    Public {
        id: i64,
        author: AuthorInfo,
        title: String,
        body: String,
        likes_count: i64,
        bookmarks_count: i64,
        comments: Paginated<PostComment>,
    },
}

pub fn post_detail_view(
    post: Post,
    requester: &Requester,
    comments: Paginated<PostComment>,
) -> PostDetail {
    if requester.is(post.author_id()) {
        PostDetail::Owner {
            id: post.id,
            title: post.title,
            body: post.body,
            status: post.status,
            likes_count: post.likes_count,
            bookmarks_count: post.bookmarks_count,
            comments,
        }
    } else {
        PostDetail::Public {
            id: post.id,
            author: post.author,
            title: post.title,
            body: post.body,
            likes_count: post.likes_count,
            bookmarks_count: post.bookmarks_count,
            comments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentItem {
    pub id: i64,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
}

impl From<Comment> for CommentItem {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            body: comment.body,
            created: comment.created_at,
            updated: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommentDetail {
    Staff {
        id: i64,
        author: AuthorInfo,
        body: String,
        #[serde(with = "time::serde::rfc3339")]
        created: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339")]
        updated: OffsetDateTime,
    },
    Owner(CommentItem),
}

/// Staff see who wrote a comment; its author is the only other reader.
pub fn comment_detail_view(comment: Comment, requester: &Requester) -> CommentDetail {
    if requester.is_staff() {
        CommentDetail::Staff {
            id: comment.id,
            author: comment.author,
            body: comment.body,
            created: comment.created_at,
            updated: comment.updated_at,
        }
    } else {
        CommentDetail::Owner(comment.into())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationView {
    pub post: i64,
    pub like: bool,
    pub in_bookmarks: bool,
}

impl From<UserPostRelation> for RelationView {
    fn from(relation: UserPostRelation) -> Self {
        Self {
            post: relation.post_id,
            like: relation.liked,
            in_bookmarks: relation.in_bookmarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use uuid::Uuid;

    fn sample_post(author_id: Uuid) -> Post {
        let now = OffsetDateTime::now_utc();
        Post {
            id: 7,
            author: AuthorInfo {
                id: author_id,
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            },
            title: "Title".into(),
            body: "Body".into(),
            status: PostStatus::Draft,
            publish: now,
            created_at: now,
            updated_at: now,
            likes_count: 3,
            bookmarks_count: 1,
        }
    }

    fn sample_comment(author_id: Uuid) -> Comment {
        let now = OffsetDateTime::now_utc();
        Comment {
            id: 11,
            author: AuthorInfo {
                id: author_id,
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            },
            post_id: 7,
            body: "Nice".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn empty_comments() -> Paginated<PostComment> {
        Paginated {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    fn keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn owner_detail_hides_author_and_shows_status() {
        let author = Uuid::new_v4();
        let requester = Requester::User {
            id: author,
            is_staff: false,
        };
        let view = post_detail_view(sample_post(author), &requester, empty_comments());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(
            keys(&json),
            vec!["body", "bookmarks_count", "comments", "id", "likes_count", "status", "title"]
        );
        assert_eq!(json["status"], "DRAFT");
    }

    #[test]
    fn public_detail_shows_author_without_status() {
        let author = Uuid::new_v4();
        let view = post_detail_view(sample_post(author), &Requester::Anonymous, empty_comments());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(
            keys(&json),
            vec!["author", "body", "bookmarks_count", "comments", "id", "likes_count", "title"]
        );
        assert_eq!(json["author"]["first_name"], "Ada");
        assert_eq!(json["author"]["id"], author.to_string());
    }

    #[test]
    fn staff_comment_view_includes_author() {
        let author = Uuid::new_v4();
        let staff = Requester::User {
            id: Uuid::new_v4(),
            is_staff: true,
        };
        let owner = Requester::User {
            id: author,
            is_staff: false,
        };

        let staff_json = serde_json::to_value(comment_detail_view(sample_comment(author), &staff)).unwrap();
        let owner_json = serde_json::to_value(comment_detail_view(sample_comment(author), &owner)).unwrap();

        assert_eq!(keys(&staff_json), vec!["author", "body", "created", "id", "updated"]);
        assert_eq!(keys(&owner_json), vec!["body", "created", "id", "updated"]);
    }

    #[test]
    fn list_shapes_follow_their_allow_lists() {
        let post = sample_post(Uuid::new_v4());
        let list = serde_json::to_value(PostListItem::from(post.clone())).unwrap();
        let mine = serde_json::to_value(MyPostItem::from(post)).unwrap();

        assert_eq!(
            keys(&list),
            vec!["author", "body", "bookmarks_count", "created", "id", "likes_count", "title", "updated"]
        );
        assert_eq!(
            keys(&mine),
            vec!["body", "bookmarks_count", "id", "likes_count", "status", "title"]
        );
    }

    #[test]
    fn relation_view_exposes_only_post_and_flags() {
        let relation = UserPostRelation {
            user_id: Uuid::new_v4(),
            post_id: 7,
            liked: true,
            in_bookmarks: false,
        };
        let json = serde_json::to_value(RelationView::from(relation)).unwrap();

        assert_eq!(keys(&json), vec!["in_bookmarks", "like", "post"]);
        assert_eq!(json["like"], true);
    }
}
