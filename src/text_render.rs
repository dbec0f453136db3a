//! Plain-text rendering of the current view.
//!
//! Used by `--text` mode. Like the TUI, it is a pure function of the state.

use crate::app::state::{FormField, NO_POSTS};
use crate::app::{AppState, Content, View};

/// Pre-formatted lines for text output.
pub(crate) struct TextView {
    pub lines: Vec<String>,
}

pub(crate) fn render_lines(state: &AppState) -> TextView {
    let mut lines = Vec::new();

    if state.loading {
        lines.push("Loading...".to_string());
        return TextView { lines };
    }
    match state.content {
        Content::NotFound(msg) | Content::Failed(msg) => {
            lines.push(msg.to_string());
            return TextView { lines };
        }
        Content::Ready => {}
    }

    match &state.view {
        View::Home => {
            if state.posts.is_empty() {
                lines.push(NO_POSTS.to_string());
            }
            for post in &state.posts {
                lines.push(post.title.clone());
                lines.push(format!("  {}", post.date));
                lines.push(format!("  {}", post.summary));
                lines.push(String::new());
            }
        }
        View::Admin => {
            lines.push("Admin Panel".to_string());
            if state.posts.is_empty() {
                lines.push(NO_POSTS.to_string());
            }
            for post in &state.posts {
                lines.push(format!(
                    "[{}] {} ({}) by {}",
                    post.id, post.title, post.date, post.author
                ));
            }
        }
        View::PostDetail(id) => {
            if let Some(post) = state.find_post(id) {
                lines.push(post.title.clone());
                lines.push(format!("By {} on {}", post.author, post.date));
                lines.push(String::new());
                lines.extend(post.content.lines().map(str::to_string));
            }
        }
        View::StaticPage(_) => {
            if let Some(page) = state.page.as_ref() {
                lines.push(page.title.clone());
                lines.push(String::new());
                lines.extend(page.content.lines().map(str::to_string));
            }
        }
        View::AddPost | View::EditPost(_) => {
            lines.push(state.view.title());
            for field in FormField::ALL {
                lines.push(format!("{}: {}", field.label(), state.form.value(field)));
            }
        }
        View::Login => {
            lines.push(format!("Username: {}", state.login.username));
            lines.push(format!("Password: {}", "*".repeat(state.login.password.chars().count())));
        }
    }

    TextView { lines }
}
