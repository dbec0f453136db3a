//! Key bindings: terminal key events to controller actions.

use crate::app::state::FormField;
use crate::app::{Action, AppState, Content, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyCommand {
    Quit,
    ToggleHelp,
    Act(Action),
    Ignore,
}

fn act(action: Action) -> KeyCommand {
    KeyCommand::Act(action)
}

pub(crate) fn map_key(state: &AppState, nav_pages: &[String], key: KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyCommand::Quit;
    }

    // A blocking alert swallows the next key.
    if state.alert.is_some() {
        return act(Action::DismissAlert);
    }

    if state.confirm_delete.is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => act(Action::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => act(Action::DeclineDelete),
            _ => KeyCommand::Ignore,
        };
    }

    match &state.view {
        View::AddPost | View::EditPost(_) if state.content == Content::Ready => {
            map_form_key(state, key, Action::SubmitPost)
        }
        View::Login => map_form_key(state, key, Action::SubmitLogin),
        _ => map_browse_key(state, nav_pages, key),
    }
}

fn map_form_key(state: &AppState, key: KeyEvent, submit: Action) -> KeyCommand {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => act(Action::CancelForm),
        (m, KeyCode::Char('s')) if m.contains(KeyModifiers::CONTROL) => act(submit),
        (_, KeyCode::Tab) => act(Action::NextField),
        (_, KeyCode::BackTab) => act(Action::PrevField),
        (_, KeyCode::Backspace) => act(Action::Backspace),
        (_, KeyCode::Enter) => {
            let multiline = state.view != View::Login && state.form.focus == FormField::Content;
            if multiline {
                act(Action::Input('\n'))
            } else {
                act(submit)
            }
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => act(Action::Input(c)),
        _ => KeyCommand::Ignore,
    }
}

fn map_browse_key(state: &AppState, nav_pages: &[String], key: KeyEvent) -> KeyCommand {
    let on_list = state.view.is_list();
    let selected_id = || state.selected_post().map(|p| p.id.clone());

    match key.code {
        KeyCode::Char('q') => KeyCommand::Quit,
        KeyCode::Char('?') => KeyCommand::ToggleHelp,
        KeyCode::Char('h') | KeyCode::Home => act(Action::ShowHome),
        KeyCode::Char('a') => act(Action::OpenAdmin),
        KeyCode::Char('n') => act(Action::OpenAddPost),
        KeyCode::Char('l') => {
            if state.session.is_authenticated() {
                act(Action::Logout)
            } else {
                act(Action::OpenLogin)
            }
        }
        KeyCode::Char('r') => match &state.view {
            View::Admin => act(Action::OpenAdmin),
            View::StaticPage(slug) => act(Action::OpenPage(slug.clone())),
            _ => act(Action::ShowHome),
        },
        KeyCode::Char(c @ '1'..='9') => {
            let idx = (c as usize) - ('1' as usize);
            nav_pages
                .get(idx)
                .map(|slug| act(Action::OpenPage(slug.clone())))
                .unwrap_or(KeyCommand::Ignore)
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => match state.view {
            View::Home => KeyCommand::Ignore,
            View::Admin => act(Action::ShowHome),
            View::AddPost | View::EditPost(_) => act(Action::CancelForm),
            _ => act(Action::ShowHome),
        },
        KeyCode::Enter if on_list => selected_id()
            .map(|id| act(Action::OpenPost(id)))
            .unwrap_or(KeyCommand::Ignore),
        KeyCode::Char('e') if state.view == View::Admin => selected_id()
            .map(|id| act(Action::OpenEditPost(id)))
            .unwrap_or(KeyCommand::Ignore),
        KeyCode::Char('d') if state.view == View::Admin => selected_id()
            .map(|id| act(Action::RequestDelete(id)))
            .unwrap_or(KeyCommand::Ignore),
        KeyCode::Down | KeyCode::Char('j') => {
            if on_list {
                act(Action::SelectNext)
            } else {
                act(Action::ScrollDown)
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if on_list {
                act(Action::SelectPrev)
            } else {
                act(Action::ScrollUp)
            }
        }
        _ => KeyCommand::Ignore,
    }
}

#[cfg(test)]
#[path = "tests/keys_tests.rs"]
mod tests;
