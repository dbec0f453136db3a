use crate::model::{Page, Post, PostFields, PostId};

pub const LIST_LOAD_FAILED: &str = "Error loading posts. Is the server running?";
pub const PAGE_LOAD_FAILED: &str = "Error loading page.";
pub const POST_NOT_FOUND: &str = "Post not found.";
pub const PAGE_NOT_FOUND: &str = "Page not found.";
pub const NO_POSTS: &str = "No posts found.";
pub const CREATE_FAILED: &str = "Failed to create post. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update post. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete post. Please try again.";
pub const LOGIN_FAILED: &str = "Invalid username or password.";
pub const FIELDS_REQUIRED: &str = "Please fill in all fields.";

/// Every screen the client can show. Exactly one is current at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    PostDetail(PostId),
    StaticPage(String),
    AddPost,
    EditPost(PostId),
    Login,
    Admin,
}

impl View {
    pub fn title(&self) -> String {
        match self {
            View::Home => "Home".into(),
            View::PostDetail(_) => "Post".into(),
            View::StaticPage(slug) => format!("Page: {slug}"),
            View::AddPost => "Add New Post".into(),
            View::EditPost(_) => "Edit Post".into(),
            View::Login => "Login".into(),
            View::Admin => "Admin".into(),
        }
    }

    /// Views that show the cached post list.
    pub fn is_list(&self) -> bool {
        matches!(self, View::Home | View::Admin)
    }
}

/// What the content region shows once loading is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Ready,
    NotFound(&'static str),
    Failed(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn log_in(&mut self) {
        self.authenticated = true;
    }

    pub fn log_out(&mut self) {
        self.authenticated = false;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Summary,
    Content,
    Author,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Summary,
        FormField::Content,
        FormField::Author,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Summary => "Summary",
            FormField::Content => "Content",
            FormField::Author => "Author",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Summary,
            FormField::Summary => FormField::Content,
            FormField::Content => FormField::Author,
            FormField::Author => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Author,
            FormField::Summary => FormField::Title,
            FormField::Content => FormField::Summary,
            FormField::Author => FormField::Content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub fields: PostFields,
    pub focus: FormField,
    /// Set while a create/update is in flight; further submits are ignored.
    pub submitting: bool,
    /// Where a successful submit (or a cancel) lands.
    pub return_to: View,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            fields: PostFields::default(),
            focus: FormField::Title,
            submitting: false,
            return_to: View::Home,
        }
    }
}

impl PostForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.fields.title,
            FormField::Summary => &self.fields.summary,
            FormField::Content => &self.fields.content,
            FormField::Author => &self.fields.author,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Title => &mut self.fields.title,
            FormField::Summary => &mut self.fields.summary,
            FormField::Content => &mut self.fields.content,
            FormField::Author => &mut self.fields.author,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// The whole client state. Owned by one thread; render functions only borrow it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub content: Content,
    /// True between issuing a fetch and its resolution; gates the placeholder render.
    pub loading: bool,
    /// Last list fetched from the backend. Only trusted right after a fetch.
    pub posts: Vec<Post>,
    pub page: Option<Page>,
    pub session: Session,
    pub form: PostForm,
    pub login: LoginForm,
    /// Post awaiting delete confirmation.
    pub confirm_delete: Option<PostId>,
    /// Modal message; blocks other input until dismissed.
    pub alert: Option<String>,
    pub selected: usize,
    pub scroll: u16,
    pub info: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Home,
            content: Content::Ready,
            loading: false,
            posts: Vec::new(),
            page: None,
            session: Session::default(),
            form: PostForm::default(),
            login: LoginForm::default(),
            confirm_delete: None,
            alert: None,
            selected: 0,
            scroll: 0,
            info: String::new(),
        }
    }
}

impl AppState {
    pub fn find_post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.posts.get(self.selected)
    }

    /// Switch to `view`, overwriting the content region and scrolling to the top.
    /// List selection counts as scroll position and starts over at the first post.
    pub fn show(&mut self, view: View) {
        self.view = view;
        self.content = Content::Ready;
        self.scroll = 0;
        self.selected = 0;
    }

    pub(crate) fn clamp_selection(&mut self) {
        if self.posts.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.posts.len() {
            self.selected = self.posts.len() - 1;
        }
    }
}
