use std::str::FromStr;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::user::AuthorInfo;

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub author: AuthorInfo,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub publish: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub likes_count: i64,
    pub bookmarks_count: i64,
}

impl Post {
    pub fn author_id(&self) -> Uuid {
        self.author.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Accepts the long names and the two-letter codes older clients send.
impl FromStr for PostStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DRAFT" | "DF" => Ok(Self::Draft),
            "PUBLISHED" | "PB" => Ok(Self::Published),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

impl PostStatus {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Column order for post listings. Insertion order unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrdering {
    #[default]
    Insertion,
    CreatedAsc,
    CreatedDesc,
}

impl PostOrdering {
    /// Parses an `ordering` query value. Unknown fields are ignored and the
    /// first recognised one wins.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Insertion;
        };
        value
            .split(',')
            .map(str::trim)
            .find_map(|field| match field {
                "created" => Some(Self::CreatedAsc),
                "-created" => Some(Self::CreatedDesc),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Insertion => "p.id ASC",
            Self::CreatedAsc => "p.created_at ASC, p.id ASC",
            Self::CreatedDesc => "p.created_at DESC, p.id DESC",
        }
    }
}

/// Filters shared by the public list and the author's own list.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub status: Option<PostStatus>,
    pub search_terms: Vec<String>,
    pub ordering: PostOrdering,
}

/// Splits a `search` value into terms on whitespace and commas.
pub fn search_terms(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<PostStatus>,
    pub publish: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_long_and_short_forms() {
        assert_eq!("DRAFT".parse::<PostStatus>(), Ok(PostStatus::Draft));
        assert_eq!("PB".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert_eq!(
            "draft".parse::<PostStatus>(),
            Err("\"draft\" is not a valid choice.".to_string())
        );
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"PUBLISHED\""
        );
    }

    #[test]
    fn status_db_values() {
        assert_eq!(PostStatus::from_db("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::from_db("published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::from_db("DF"), None);
        assert_eq!(PostStatus::Published.as_db(), "published");
    }

    #[test]
    fn ordering_ignores_unknown_fields() {
        assert_eq!(PostOrdering::parse(None), PostOrdering::Insertion);
        assert_eq!(PostOrdering::parse(Some("title")), PostOrdering::Insertion);
        assert_eq!(PostOrdering::parse(Some("created")), PostOrdering::CreatedAsc);
        assert_eq!(
            PostOrdering::parse(Some("title, -created")),
            PostOrdering::CreatedDesc
        );
    }

    #[test]
    fn search_splits_on_whitespace_and_commas() {
        assert_eq!(search_terms(Some("new  post,body")), vec!["new", "post", "body"]);
        assert!(search_terms(Some(" , ")).is_empty());
        assert!(search_terms(None).is_empty());
    }
}
