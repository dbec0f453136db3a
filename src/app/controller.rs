//! View transitions.
//!
//! Every user action goes through [`Controller::begin`], which switches the view
//! and names the backend request to run, if any. When that request resolves its
//! [`Outcome`] goes through [`Controller::finish`], which may chain a follow-up
//! request (a mutation is always followed by a full list reload).

use super::state::{
    AppState, Content, PostForm, View, CREATE_FAILED, DELETE_FAILED, FIELDS_REQUIRED,
    LIST_LOAD_FAILED, LOGIN_FAILED, PAGE_LOAD_FAILED, PAGE_NOT_FOUND, POST_NOT_FOUND,
    UPDATE_FAILED,
};
use crate::backend::{ApiError, PostRepository};
use crate::model::{ClientConfig, Page, Post, PostDraft, PostFields, PostId};
use tracing::{info, warn};

/// User-initiated events, after key bindings have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowHome,
    OpenPost(PostId),
    OpenPage(String),
    OpenAdmin,
    OpenAddPost,
    OpenEditPost(PostId),
    OpenLogin,
    SubmitLogin,
    Logout,
    SubmitPost,
    CancelForm,
    RequestDelete(PostId),
    ConfirmDelete,
    DeclineDelete,
    DismissAlert,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    SelectNext,
    SelectPrev,
    ScrollDown,
    ScrollUp,
}

/// A single backend call the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Reload the list, then show it in `target` (home or admin).
    ListPosts { target: View },
    FetchPage { slug: String },
    CreatePost(PostDraft),
    UpdatePost { id: PostId, draft: PostDraft },
    DeletePost(PostId),
}

/// A resolved [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Posts {
        target: View,
        result: Result<Vec<Post>, ApiError>,
    },
    Page {
        slug: String,
        result: Result<Option<Page>, ApiError>,
    },
    Created(Result<Post, ApiError>),
    Updated(Result<Post, ApiError>),
    Deleted(Result<bool, ApiError>),
}

pub struct Controller {
    admin_username: String,
    admin_password: String,
    today: fn() -> String,
}

impl Controller {
    pub fn new(cfg: &ClientConfig) -> Self {
        Self {
            admin_username: cfg.admin_username.clone(),
            admin_password: cfg.admin_password.clone(),
            today: crate::model::today_utc,
        }
    }

    /// Replace the source of the submission date for new posts.
    pub fn with_clock(mut self, today: fn() -> String) -> Self {
        self.today = today;
        self
    }

    pub fn begin(&self, state: &mut AppState, action: Action) -> Option<Request> {
        match action {
            Action::ShowHome => Some(self.load_list(state, View::Home)),
            Action::OpenPost(id) => {
                let found = state.find_post(&id).is_some();
                state.show(View::PostDetail(id));
                if !found {
                    state.content = Content::NotFound(POST_NOT_FOUND);
                }
                None
            }
            Action::OpenPage(slug) => {
                state.show(View::StaticPage(slug.clone()));
                state.page = None;
                state.loading = true;
                Some(Request::FetchPage { slug })
            }
            Action::OpenAdmin => {
                if !state.session.is_authenticated() {
                    state.show(View::Login);
                    return None;
                }
                Some(self.load_list(state, View::Admin))
            }
            Action::OpenLogin => {
                state.login = Default::default();
                state.show(View::Login);
                None
            }
            Action::SubmitLogin => {
                let ok = state.login.username == self.admin_username
                    && state.login.password == self.admin_password;
                state.login.password.clear();
                if !ok {
                    warn!(username = %state.login.username, "login rejected");
                    state.session.log_out();
                    state.alert = Some(LOGIN_FAILED.into());
                    return None;
                }
                info!("admin session started");
                state.session.log_in();
                state.login = Default::default();
                Some(self.load_list(state, View::Admin))
            }
            Action::Logout => {
                state.session.log_out();
                state.info = "Logged out".into();
                Some(self.load_list(state, View::Home))
            }
            Action::OpenAddPost => {
                if !state.session.is_authenticated() {
                    state.show(View::Login);
                    return None;
                }
                state.form = PostForm {
                    return_to: return_target(&state.view),
                    ..Default::default()
                };
                state.show(View::AddPost);
                None
            }
            Action::OpenEditPost(id) => {
                if !state.session.is_authenticated() {
                    state.show(View::Login);
                    return None;
                }
                let fields = state.find_post(&id).map(PostFields::from_post);
                state.form = PostForm {
                    fields: fields.clone().unwrap_or_default(),
                    return_to: return_target(&state.view),
                    ..Default::default()
                };
                state.show(View::EditPost(id));
                if fields.is_none() {
                    state.content = Content::NotFound(POST_NOT_FOUND);
                }
                None
            }
            Action::SubmitPost => self.submit_post(state),
            Action::CancelForm => match &state.view {
                View::AddPost | View::EditPost(_) => {
                    let target = state.form.return_to.clone();
                    state.form = PostForm::default();
                    state.show(target);
                    None
                }
                View::Login => {
                    state.login = Default::default();
                    state.show(View::Home);
                    None
                }
                _ => None,
            },
            Action::RequestDelete(id) => {
                if !state.session.is_authenticated() {
                    state.show(View::Login);
                    return None;
                }
                state.confirm_delete = Some(id);
                None
            }
            Action::ConfirmDelete => state.confirm_delete.take().map(Request::DeletePost),
            Action::DeclineDelete => {
                state.confirm_delete = None;
                None
            }
            Action::DismissAlert => {
                state.alert = None;
                None
            }
            Action::Input(c) => {
                edit_focused(state, |s| s.push(c));
                None
            }
            Action::Backspace => {
                edit_focused(state, |s| {
                    s.pop();
                });
                None
            }
            Action::NextField => {
                match state.view {
                    View::AddPost | View::EditPost(_) => state.form.focus = state.form.focus.next(),
                    View::Login => state.login.toggle_focus(),
                    _ => {}
                }
                None
            }
            Action::PrevField => {
                match state.view {
                    View::AddPost | View::EditPost(_) => state.form.focus = state.form.focus.prev(),
                    View::Login => state.login.toggle_focus(),
                    _ => {}
                }
                None
            }
            Action::SelectNext => {
                if state.view.is_list() && state.selected + 1 < state.posts.len() {
                    state.selected += 1;
                }
                None
            }
            Action::SelectPrev => {
                if state.view.is_list() {
                    state.selected = state.selected.saturating_sub(1);
                }
                None
            }
            Action::ScrollDown => {
                state.scroll = state.scroll.saturating_add(1);
                None
            }
            Action::ScrollUp => {
                state.scroll = state.scroll.saturating_sub(1);
                None
            }
        }
    }

    pub fn finish(&self, state: &mut AppState, outcome: Outcome) -> Option<Request> {
        match outcome {
            Outcome::Posts { target, result } => {
                state.loading = false;
                // A list that resolves late still takes over the content region.
                state.show(target);
                match result {
                    Ok(posts) => {
                        info!(count = posts.len(), "posts loaded");
                        state.info = format!("Loaded {} post(s)", posts.len());
                        state.posts = posts;
                        state.clamp_selection();
                    }
                    Err(e) => {
                        warn!(status = ?e.status(), error = %e.detail(), "failed to fetch posts");
                        state.info = e.detail();
                        state.content = Content::Failed(LIST_LOAD_FAILED);
                    }
                }
                None
            }
            Outcome::Page { slug, result } => {
                state.loading = false;
                state.show(View::StaticPage(slug.clone()));
                match result {
                    Ok(Some(page)) => state.page = Some(page),
                    Ok(None) => {
                        info!(%slug, "page not found");
                        state.page = None;
                        state.content = Content::NotFound(PAGE_NOT_FOUND);
                    }
                    Err(e) => {
                        warn!(%slug, error = %e.detail(), "failed to fetch page");
                        state.info = e.detail();
                        state.page = None;
                        state.content = Content::Failed(PAGE_LOAD_FAILED);
                    }
                }
                None
            }
            Outcome::Created(result) => self.after_save(state, result, "created", CREATE_FAILED),
            Outcome::Updated(result) => self.after_save(state, result, "updated", UPDATE_FAILED),
            Outcome::Deleted(result) => match result {
                Ok(_) => {
                    state.info = "Post deleted".into();
                    Some(self.load_list(state, View::Admin))
                }
                Err(e) => {
                    warn!(error = %e.detail(), "failed to delete post");
                    state.info = e.detail();
                    state.alert = Some(DELETE_FAILED.into());
                    None
                }
            },
        }
    }

    fn load_list(&self, state: &mut AppState, target: View) -> Request {
        state.show(target.clone());
        state.loading = true;
        Request::ListPosts { target }
    }

    fn submit_post(&self, state: &mut AppState) -> Option<Request> {
        if state.form.submitting {
            return None;
        }
        if !state.form.fields.is_complete() {
            state.alert = Some(FIELDS_REQUIRED.into());
            return None;
        }
        let req = match &state.view {
            View::AddPost => {
                let draft = state.form.fields.clone().into_draft((self.today)());
                Request::CreatePost(draft)
            }
            View::EditPost(id) => {
                let Some(original) = state.find_post(id) else {
                    state.alert = Some(POST_NOT_FOUND.into());
                    return None;
                };
                let draft = original.replacement(state.form.fields.clone());
                Request::UpdatePost {
                    id: id.clone(),
                    draft,
                }
            }
            _ => return None,
        };
        state.form.submitting = true;
        state.info = "Publishing...".into();
        Some(req)
    }

    fn after_save(
        &self,
        state: &mut AppState,
        result: Result<Post, ApiError>,
        verb: &str,
        failure: &str,
    ) -> Option<Request> {
        state.form.submitting = false;
        match result {
            Ok(post) => {
                info!(id = %post.id, "post {verb}");
                state.info = format!("Post {verb}");
                let target = std::mem::take(&mut state.form).return_to;
                Some(self.load_list(state, target))
            }
            Err(e) => {
                warn!(error = %e.detail(), "failed to save post");
                state.info = e.detail();
                state.alert = Some(failure.into());
                None
            }
        }
    }
}

fn return_target(current: &View) -> View {
    if *current == View::Admin {
        View::Admin
    } else {
        View::Home
    }
}

fn edit_focused(state: &mut AppState, edit: impl FnOnce(&mut String)) {
    match state.view {
        View::AddPost | View::EditPost(_) if !state.form.submitting => {
            edit(state.form.focused_mut())
        }
        View::Login => edit(state.login.focused_mut()),
        _ => {}
    }
}

/// Run one request against the repository. Exactly one attempt.
pub async fn perform(repo: &dyn PostRepository, req: Request) -> Outcome {
    match req {
        Request::ListPosts { target } => Outcome::Posts {
            target,
            result: repo.list_posts().await,
        },
        Request::FetchPage { slug } => {
            let result = repo.fetch_page(&slug).await;
            Outcome::Page { slug, result }
        }
        Request::CreatePost(draft) => Outcome::Created(repo.create_post(&draft).await),
        Request::UpdatePost { id, draft } => Outcome::Updated(repo.update_post(&id, &draft).await),
        Request::DeletePost(id) => Outcome::Deleted(repo.delete_post(&id).await),
    }
}

/// Apply `action` and await every request it leads to, in order.
pub async fn drive(
    ctrl: &Controller,
    state: &mut AppState,
    repo: &dyn PostRepository,
    action: Action,
) {
    let mut next = ctrl.begin(state, action);
    while let Some(req) = next {
        let outcome = perform(repo, req).await;
        next = ctrl.finish(state, outcome);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
