//! Comment domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Data for a new comment row
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub review_id: i64,
    pub content: String,
}

/// Author summary embedded in comment reads
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentAuthor {
    pub id: i64,
    pub username: String,
}

/// Comment joined with its author
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentView {
    pub id: i64,
    pub review_id: i64,
    pub content: String,
    pub user: CommentAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
