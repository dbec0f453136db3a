use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
    /// Static page slugs offered in the navigation bar, in display order.
    pub nav_pages: Vec<String>,
    pub admin_username: String,
    pub admin_password: String,
}

/// Server-assigned post identifier.
///
/// json-server hands out numeric ids in older releases and string ids in
/// newer ones, so both shapes are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Num(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Num(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
}

impl Post {
    /// Full replacement body for an update. The date always comes from the
    /// stored post, never from the edited fields.
    pub fn replacement(&self, fields: PostFields) -> PostDraft {
        PostDraft {
            title: fields.title,
            summary: fields.summary,
            content: fields.content,
            author: fields.author,
            date: self.date.clone(),
        }
    }
}

/// Request body for create and update; the backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub date: String,
}

/// The user-editable part of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
}

impl PostFields {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            summary: post.summary.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        [&self.title, &self.summary, &self.content, &self.author]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    pub fn into_draft(self, date: String) -> PostDraft {
        PostDraft {
            title: self.title,
            summary: self.summary,
            content: self.content,
            author: self.author,
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub content: String,
}

/// The whole `/pages` document: one object keyed by slug.
pub type PageCollection = HashMap<String, Page>;

/// Current UTC calendar date as `YYYY-MM-DD`.
pub fn today_utc() -> String {
    let fmt = time::macros::format_description!("[year]-[month]-[day]");
    let today = time::OffsetDateTime::now_utc().date();
    today
        .format(&fmt)
        .unwrap_or_else(|_| today.to_string())
}
