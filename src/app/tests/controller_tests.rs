use super::*;
use crate::app::state::{FormField, NO_POSTS};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Page(String),
    Create(PostDraft),
    Update(PostId, PostDraft),
    Delete(PostId),
}

/// In-memory backend that records every call and can be told to fail.
struct MemoryRepo {
    posts: Mutex<Vec<Post>>,
    calls: Mutex<Vec<Call>>,
    fail_status: Mutex<Option<u16>>,
    next_id: Mutex<u64>,
}

impl MemoryRepo {
    fn with_posts(posts: Vec<Post>) -> Self {
        let next_id = posts
            .iter()
            .filter_map(|p| match p.id {
                PostId::Num(n) => Some(n),
                PostId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            posts: Mutex::new(posts),
            calls: Mutex::new(Vec::new()),
            fail_status: Mutex::new(None),
            next_id: Mutex::new(next_id),
        }
    }

    fn failing(status: u16) -> Self {
        let repo = Self::with_posts(Vec::new());
        *repo.fail_status.lock().unwrap() = Some(status);
        repo
    }

    fn set_failure(&self, status: Option<u16>) {
        *self.fail_status.lock().unwrap() = status;
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(ApiError::Status { status }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryRepo {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.record(Call::List)?;
        let mut posts = self.posts.lock().unwrap().clone();
        posts.reverse();
        Ok(posts)
    }

    async fn fetch_page(&self, slug: &str) -> Result<Option<Page>, ApiError> {
        self.record(Call::Page(slug.to_string()))?;
        Ok((slug == "about").then(|| Page {
            title: "About".into(),
            content: "Who we are.".into(),
        }))
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        self.record(Call::Create(draft.clone()))?;
        let mut next = self.next_id.lock().unwrap();
        let post = Post {
            id: PostId::Num(*next),
            title: draft.title.clone(),
            summary: draft.summary.clone(),
            content: draft.content.clone(),
            author: draft.author.clone(),
            date: draft.date.clone(),
        };
        *next += 1;
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<Post, ApiError> {
        self.record(Call::Update(id.clone(), draft.clone()))?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(ApiError::Status { status: 404 })?;
        post.title = draft.title.clone();
        post.summary = draft.summary.clone();
        post.content = draft.content.clone();
        post.author = draft.author.clone();
        post.date = draft.date.clone();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &PostId) -> Result<bool, ApiError> {
        self.record(Call::Delete(id.clone()))?;
        self.posts.lock().unwrap().retain(|p| &p.id != id);
        Ok(true)
    }
}

fn post(id: u64, title: &str, date: &str) -> Post {
    Post {
        id: PostId::Num(id),
        title: title.into(),
        summary: format!("{title} summary"),
        content: format!("{title} content"),
        author: "ann".into(),
        date: date.into(),
    }
}

fn seeded() -> MemoryRepo {
    MemoryRepo::with_posts(vec![
        post(1, "First", "2024-01-01"),
        post(2, "Second", "2024-02-01"),
        post(3, "Third", "2024-03-01"),
    ])
}

fn config() -> ClientConfig {
    ClientConfig {
        base_url: "http://localhost:3000".into(),
        timeout: Duration::from_secs(5),
        user_agent: "blog-cli/test".into(),
        nav_pages: vec!["about".into()],
        admin_username: "admin".into(),
        admin_password: "admin".into(),
    }
}

fn fixed_day() -> String {
    "2030-07-14".to_string()
}

fn controller() -> Controller {
    Controller::new(&config()).with_clock(fixed_day)
}

fn type_text(ctrl: &Controller, state: &mut AppState, text: &str) {
    for c in text.chars() {
        assert_eq!(ctrl.begin(state, Action::Input(c)), None);
    }
}

async fn logged_in(ctrl: &Controller, repo: &MemoryRepo) -> AppState {
    let mut state = AppState::default();
    ctrl.begin(&mut state, Action::OpenLogin);
    type_text(ctrl, &mut state, "admin");
    ctrl.begin(&mut state, Action::NextField);
    type_text(ctrl, &mut state, "admin");
    drive(ctrl, &mut state, repo, Action::SubmitLogin).await;
    assert_eq!(state.view, View::Admin);
    repo.clear_calls();
    state
}

fn fill_form(ctrl: &Controller, state: &mut AppState, values: [&str; 4]) {
    for (field, value) in FormField::ALL.iter().zip(values) {
        assert_eq!(state.form.focus, *field);
        type_text(ctrl, state, value);
        ctrl.begin(state, Action::NextField);
    }
}

#[tokio::test]
async fn home_shows_posts_in_server_order() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();

    let req = ctrl.begin(&mut state, Action::ShowHome);
    assert!(state.loading);
    assert_eq!(
        req,
        Some(Request::ListPosts {
            target: View::Home
        })
    );

    let outcome = perform(&repo, req.unwrap()).await;
    assert_eq!(ctrl.finish(&mut state, outcome), None);

    assert!(!state.loading);
    assert_eq!(state.view, View::Home);
    assert_eq!(state.content, Content::Ready);
    let titles: Vec<&str> = state.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
    assert_eq!(repo.calls(), vec![Call::List]);
}

#[tokio::test]
async fn initial_list_failure_leaves_cache_empty_and_shows_error() {
    let ctrl = controller();
    let repo = MemoryRepo::failing(503);
    let mut state = AppState::default();

    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    assert!(state.posts.is_empty());
    assert!(!state.loading);
    assert_eq!(state.view, View::Home);
    assert_eq!(
        state.content,
        Content::Failed("Error loading posts. Is the server running?")
    );
    assert_eq!(state.alert, None);
}

#[tokio::test]
async fn list_failure_keeps_previously_cached_posts() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;
    assert_eq!(state.posts.len(), 3);

    repo.set_failure(Some(500));
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    assert_eq!(state.posts.len(), 3);
    assert!(matches!(state.content, Content::Failed(_)));
}

#[tokio::test]
async fn open_post_uses_cache_without_request() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;
    repo.clear_calls();
    state.scroll = 7;

    let req = ctrl.begin(&mut state, Action::OpenPost(PostId::Num(2)));

    assert_eq!(req, None);
    assert_eq!(state.view, View::PostDetail(PostId::Num(2)));
    assert_eq!(state.content, Content::Ready);
    assert_eq!(state.scroll, 0);
    assert!(repo.calls().is_empty());
}

#[test]
fn open_unknown_post_shows_not_found() {
    let ctrl = controller();
    let mut state = AppState::default();

    ctrl.begin(&mut state, Action::OpenPost(PostId::Num(42)));

    assert_eq!(state.content, Content::NotFound("Post not found."));
}

#[tokio::test]
async fn static_page_found_missing_and_failed() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();

    drive(&ctrl, &mut state, &repo, Action::OpenPage("about".into())).await;
    assert_eq!(state.view, View::StaticPage("about".into()));
    assert_eq!(state.page.as_ref().map(|p| p.title.as_str()), Some("About"));
    assert_eq!(state.content, Content::Ready);

    drive(&ctrl, &mut state, &repo, Action::OpenPage("faq".into())).await;
    assert_eq!(state.page, None);
    assert_eq!(state.content, Content::NotFound("Page not found."));

    repo.set_failure(Some(500));
    drive(&ctrl, &mut state, &repo, Action::OpenPage("about".into())).await;
    assert_eq!(state.content, Content::Failed("Error loading page."));
}

#[tokio::test]
async fn login_with_admin_credentials_opens_admin() {
    let ctrl = controller();
    let repo = seeded();

    let state = logged_in(&ctrl, &repo).await;

    assert!(state.session.is_authenticated());
    assert_eq!(state.alert, None);
    assert_eq!(state.posts.len(), 3);
}

#[tokio::test]
async fn login_with_wrong_password_alerts_and_stays() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();
    ctrl.begin(&mut state, Action::OpenLogin);
    type_text(&ctrl, &mut state, "admin");
    ctrl.begin(&mut state, Action::NextField);
    type_text(&ctrl, &mut state, "hunter2");

    drive(&ctrl, &mut state, &repo, Action::SubmitLogin).await;

    assert!(!state.session.is_authenticated());
    assert_eq!(state.view, View::Login);
    assert_eq!(state.alert.as_deref(), Some("Invalid username or password."));
    assert!(repo.calls().is_empty());

    ctrl.begin(&mut state, Action::DismissAlert);
    assert_eq!(state.alert, None);
}

#[test]
fn admin_actions_require_login() {
    let ctrl = controller();
    for action in [
        Action::OpenAdmin,
        Action::OpenAddPost,
        Action::OpenEditPost(PostId::Num(1)),
        Action::RequestDelete(PostId::Num(1)),
    ] {
        let mut state = AppState::default();
        assert_eq!(ctrl.begin(&mut state, action), None);
        assert_eq!(state.view, View::Login);
        assert_eq!(state.confirm_delete, None);
    }
}

#[tokio::test]
async fn add_post_creates_once_with_todays_date_and_returns_to_admin() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;

    ctrl.begin(&mut state, Action::OpenAddPost);
    assert_eq!(state.view, View::AddPost);
    fill_form(&ctrl, &mut state, ["New", "Short", "Long body", "bob"]);

    drive(&ctrl, &mut state, &repo, Action::SubmitPost).await;

    let calls = repo.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        Call::Create(PostDraft {
            title: "New".into(),
            summary: "Short".into(),
            content: "Long body".into(),
            author: "bob".into(),
            date: "2030-07-14".into(),
        })
    );
    assert_eq!(calls[1], Call::List);
    assert_eq!(state.view, View::Admin);
    assert_eq!(state.posts[0].title, "New");
    assert!(!state.form.submitting);
}

#[tokio::test]
async fn add_post_from_home_returns_home() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    ctrl.begin(&mut state, Action::OpenAddPost);
    fill_form(&ctrl, &mut state, ["New", "Short", "Long body", "bob"]);
    drive(&ctrl, &mut state, &repo, Action::SubmitPost).await;

    assert_eq!(state.view, View::Home);
}

#[tokio::test]
async fn default_clock_stamps_current_utc_date() {
    let ctrl = Controller::new(&config());
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    ctrl.begin(&mut state, Action::OpenAddPost);
    fill_form(&ctrl, &mut state, ["t", "s", "c", "a"]);

    let req = ctrl.begin(&mut state, Action::SubmitPost);

    let Some(Request::CreatePost(draft)) = req else {
        panic!("expected create request, got {req:?}");
    };
    assert_eq!(draft.date, crate::model::today_utc());
    assert_eq!(draft.date.len(), 10);
}

#[tokio::test]
async fn incomplete_form_is_rejected_without_request() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    ctrl.begin(&mut state, Action::OpenAddPost);
    fill_form(&ctrl, &mut state, ["Title", "", "Body", "bob"]);

    drive(&ctrl, &mut state, &repo, Action::SubmitPost).await;

    assert!(repo.calls().is_empty());
    assert_eq!(state.view, View::AddPost);
    assert_eq!(state.alert.as_deref(), Some("Please fill in all fields."));
}

#[tokio::test]
async fn create_failure_alerts_and_reenables_form() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    ctrl.begin(&mut state, Action::OpenAddPost);
    fill_form(&ctrl, &mut state, ["New", "Short", "Long body", "bob"]);
    repo.set_failure(Some(500));

    let req = ctrl.begin(&mut state, Action::SubmitPost);
    assert!(state.form.submitting);
    assert_eq!(ctrl.begin(&mut state, Action::SubmitPost), None);

    let outcome = perform(&repo, req.expect("create request")).await;
    assert_eq!(ctrl.finish(&mut state, outcome), None);

    assert_eq!(repo.calls().len(), 1);
    assert!(!state.form.submitting);
    assert_eq!(state.view, View::AddPost);
    assert_eq!(state.form.fields.title, "New");
    assert_eq!(
        state.alert.as_deref(),
        Some("Failed to create post. Please try again.")
    );
}

#[tokio::test]
async fn update_failure_alerts_and_reenables_form() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    ctrl.begin(&mut state, Action::OpenEditPost(PostId::Num(2)));
    type_text(&ctrl, &mut state, " (revised)");
    repo.clear_calls();
    repo.set_failure(Some(503));

    let req = ctrl.begin(&mut state, Action::SubmitPost);
    assert!(state.form.submitting);
    let outcome = perform(&repo, req.expect("update request")).await;
    assert_eq!(ctrl.finish(&mut state, outcome), None);

    assert!(matches!(repo.calls().as_slice(), [Call::Update(..)]));
    assert!(!state.form.submitting);
    assert_eq!(state.view, View::EditPost(PostId::Num(2)));
    assert_eq!(state.form.fields.title, "Second (revised)");
    assert_eq!(
        state.alert.as_deref(),
        Some("Failed to update post. Please try again.")
    );
    assert_eq!(state.find_post(&PostId::Num(2)).map(|p| p.title.as_str()), Some("Second"));
}

#[tokio::test]
async fn edit_preserves_original_date() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;

    ctrl.begin(&mut state, Action::OpenEditPost(PostId::Num(2)));
    assert_eq!(state.view, View::EditPost(PostId::Num(2)));
    assert_eq!(state.form.fields.title, "Second");
    type_text(&ctrl, &mut state, " (revised)");

    drive(&ctrl, &mut state, &repo, Action::SubmitPost).await;

    let calls = repo.calls();
    let Call::Update(id, draft) = &calls[0] else {
        panic!("expected update, got {calls:?}");
    };
    assert_eq!(*id, PostId::Num(2));
    assert_eq!(draft.title, "Second (revised)");
    assert_eq!(draft.date, "2024-02-01");
    assert_eq!(calls[1], Call::List);
    assert_eq!(state.view, View::Admin);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;

    assert_eq!(
        ctrl.begin(&mut state, Action::RequestDelete(PostId::Num(1))),
        None
    );
    assert_eq!(state.confirm_delete, Some(PostId::Num(1)));
    drive(&ctrl, &mut state, &repo, Action::DeclineDelete).await;

    assert_eq!(state.confirm_delete, None);
    assert!(repo.calls().is_empty());
    assert_eq!(state.posts.len(), 3);
}

#[tokio::test]
async fn confirmed_delete_issues_one_delete_then_reloads() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;

    ctrl.begin(&mut state, Action::RequestDelete(PostId::Num(1)));
    drive(&ctrl, &mut state, &repo, Action::ConfirmDelete).await;

    assert_eq!(
        repo.calls(),
        vec![Call::Delete(PostId::Num(1)), Call::List]
    );
    assert_eq!(state.view, View::Admin);
    assert_eq!(state.posts.len(), 2);
    assert!(state.find_post(&PostId::Num(1)).is_none());
}

#[tokio::test]
async fn delete_failure_alerts_without_reload() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    repo.set_failure(Some(404));

    ctrl.begin(&mut state, Action::RequestDelete(PostId::Num(1)));
    drive(&ctrl, &mut state, &repo, Action::ConfirmDelete).await;

    assert_eq!(repo.calls(), vec![Call::Delete(PostId::Num(1))]);
    assert_eq!(
        state.alert.as_deref(),
        Some("Failed to delete post. Please try again.")
    );
}

#[tokio::test]
async fn late_list_response_overwrites_newer_navigation() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    let slow = ctrl.begin(&mut state, Action::ShowHome).expect("list request");
    let fast = ctrl
        .begin(&mut state, Action::OpenPage("about".into()))
        .expect("page request");

    let page = perform(&repo, fast).await;
    ctrl.finish(&mut state, page);
    assert_eq!(state.view, View::StaticPage("about".into()));

    let list = perform(&repo, slow).await;
    ctrl.finish(&mut state, list);
    assert_eq!(state.view, View::Home);
}

#[tokio::test]
async fn logout_clears_session_and_goes_home() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;

    drive(&ctrl, &mut state, &repo, Action::Logout).await;

    assert!(!state.session.is_authenticated());
    assert_eq!(state.view, View::Home);
}

#[tokio::test]
async fn cancel_form_returns_to_origin() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = logged_in(&ctrl, &repo).await;
    ctrl.begin(&mut state, Action::OpenAddPost);
    type_text(&ctrl, &mut state, "draft");

    assert_eq!(ctrl.begin(&mut state, Action::CancelForm), None);

    assert_eq!(state.view, View::Admin);
    assert!(state.form.fields.title.is_empty());
}

#[tokio::test]
async fn empty_list_is_ready_with_no_posts() {
    let ctrl = controller();
    let repo = MemoryRepo::with_posts(Vec::new());
    let mut state = AppState::default();

    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    assert_eq!(state.content, Content::Ready);
    assert!(state.posts.is_empty());
    assert_eq!(NO_POSTS, "No posts found.");
}

#[tokio::test]
async fn selection_stays_within_list() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    for _ in 0..5 {
        ctrl.begin(&mut state, Action::SelectNext);
    }
    assert_eq!(state.selected, 2);
    assert_eq!(state.selected_post().map(|p| p.title.as_str()), Some("First"));
    ctrl.begin(&mut state, Action::SelectPrev);
    assert_eq!(state.selected, 1);
}

#[tokio::test]
async fn returning_to_a_list_starts_at_the_first_post() {
    let ctrl = controller();
    let repo = seeded();
    let mut state = AppState::default();
    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;

    ctrl.begin(&mut state, Action::SelectNext);
    ctrl.begin(&mut state, Action::SelectNext);
    let id = state.selected_post().map(|p| p.id.clone()).expect("selected");
    ctrl.begin(&mut state, Action::OpenPost(id));
    ctrl.begin(&mut state, Action::ScrollDown);

    drive(&ctrl, &mut state, &repo, Action::ShowHome).await;
    assert_eq!(state.view, View::Home);
    assert_eq!(state.selected, 0);
    assert_eq!(state.scroll, 0);
    assert_eq!(state.selected_post().map(|p| p.title.as_str()), Some("Third"));
}
