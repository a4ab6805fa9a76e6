//! Permission decisions for every blog action.
//!
//! Each handler describes what it is about to do as an [`Action`] and asks
//! [`decide`] whether the requester may do it. Denials surface as 403, never
//! as 404, so the existence of a resource is not hidden.

use uuid::Uuid;

use crate::domain::post::PostStatus;
use crate::domain::user::Requester;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadPost {
        author_id: Uuid,
        status: PostStatus,
    },
    UpdatePost {
        author_id: Uuid,
        current: PostStatus,
        requested: Option<PostStatus>,
    },
    DeletePost {
        author_id: Uuid,
    },
    CommentOnPost {
        author_id: Uuid,
        status: PostStatus,
    },
    ReadComment {
        author_id: Uuid,
    },
    UpdateComment {
        author_id: Uuid,
    },
    DeleteComment {
        author_id: Uuid,
    },
    UpsertRelation {
        post_author_id: Uuid,
        post_status: PostStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    fn from_bool(allowed: bool) -> Self {
        if allowed {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

pub fn decide(requester: &Requester, action: Action) -> Decision {
    let owner_or_staff = |owner: Uuid| requester.is(owner) || requester.is_staff();

    let allowed = match action {
        Action::ReadPost { author_id, status } => can_read_post(requester, author_id, status),
        // A published post only becomes editable when the edit itself moves it
        // back to draft.
        Action::UpdatePost {
            author_id,
            current,
            requested,
        } => {
            owner_or_staff(author_id)
                && (current == PostStatus::Draft || requested == Some(PostStatus::Draft))
        }
        Action::DeletePost { author_id } => owner_or_staff(author_id),
        Action::CommentOnPost { author_id, status } => {
            requester.user_id().is_some() && can_read_post(requester, author_id, status)
        }
        Action::ReadComment { author_id }
        | Action::UpdateComment { author_id }
        | Action::DeleteComment { author_id } => owner_or_staff(author_id),
        Action::UpsertRelation {
            post_author_id,
            post_status,
        } => requester.user_id().is_some() && can_read_post(requester, post_author_id, post_status),
    };

    Decision::from_bool(allowed)
}

fn can_read_post(requester: &Requester, author_id: Uuid, status: PostStatus) -> bool {
    match status {
        PostStatus::Published => true,
        PostStatus::Draft => requester.is(author_id) || requester.is_staff(),
    }
}
