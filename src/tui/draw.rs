//! Screen rendering. Pure functions of `AppState`; nothing here mutates state.

use super::help::draw_help;
use super::layout::{centered_rect, push_wrapped_kv};
use crate::app::state::{FormField, LoginField, NO_POSTS};
use crate::app::{AppState, Content, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

pub(crate) fn draw(f: &mut Frame, state: &AppState, nav_pages: &[String], show_help: bool) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area);

    draw_nav(chunks[0], f, state, nav_pages);
    draw_content(chunks[1], f, state);
    draw_status(chunks[2], f, state);

    if let Some(id) = state.confirm_delete.as_ref() {
        let title = state
            .find_post(id)
            .map(|p| p.title.clone())
            .unwrap_or_else(|| id.to_string());
        draw_modal(
            area,
            f,
            "Confirm",
            vec![
                Line::from(format!("Delete \"{title}\"?")),
                Line::from(""),
                Line::from(vec![
                    Span::styled("y", Style::default().fg(Color::Magenta)),
                    Span::raw(" delete   "),
                    Span::styled("n", Style::default().fg(Color::Magenta)),
                    Span::raw(" keep"),
                ]),
            ],
        );
    }
    if let Some(msg) = state.alert.as_deref() {
        draw_modal(
            area,
            f,
            "Alert",
            vec![
                Line::from(Span::styled(
                    msg.to_string(),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key",
                    Style::default().fg(Color::Gray),
                )),
            ],
        );
    }
    if show_help {
        draw_help(centered_rect(70, 30, area), f);
    }
}

fn nav_index(view: &View, nav_pages: &[String]) -> usize {
    let admin_tab = nav_pages.len() + 1;
    match view {
        View::Home | View::PostDetail(_) => 0,
        View::StaticPage(slug) => nav_pages
            .iter()
            .position(|p| p == slug)
            .map(|i| i + 1)
            .unwrap_or(0),
        View::Admin | View::AddPost | View::EditPost(_) | View::Login => admin_tab,
    }
}

fn draw_nav(area: Rect, f: &mut Frame, state: &AppState, nav_pages: &[String]) {
    let mut titles = vec![Line::from("Home")];
    titles.extend(nav_pages.iter().map(|p| Line::from(p.clone())));
    titles.push(Line::from(if state.session.is_authenticated() {
        "Admin"
    } else {
        "Login"
    }));

    let tabs = Tabs::new(titles)
        .select(nav_index(&state.view, nav_pages))
        .block(Block::default().borders(Borders::ALL).title("blog-cli"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, area);
}

fn draw_content(area: Rect, f: &mut Frame, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(state.view.title());

    if state.loading {
        let p = Paragraph::new("Loading...")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }
    match state.content {
        Content::Failed(msg) => {
            let p = Paragraph::new(Span::styled(msg, Style::default().fg(Color::Red))).block(block);
            f.render_widget(p, area);
            return;
        }
        Content::NotFound(msg) => {
            f.render_widget(Paragraph::new(msg).block(block), area);
            return;
        }
        Content::Ready => {}
    }

    match &state.view {
        View::Home => draw_post_list(area, f, state, block, false),
        View::Admin => draw_post_list(area, f, state, block, true),
        View::PostDetail(id) => {
            let lines = state
                .find_post(id)
                .map(|post| {
                    let mut lines = vec![
                        Line::from(Span::styled(
                            post.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            format!("By {} on {}", post.author, post.date),
                            Style::default().fg(Color::Gray),
                        )),
                        Line::from(""),
                    ];
                    lines.extend(post.content.lines().map(|l| Line::from(l.to_string())));
                    lines
                })
                .unwrap_or_default();
            draw_document(area, f, state, block, lines);
        }
        View::StaticPage(_) => {
            let lines = state
                .page
                .as_ref()
                .map(|page| {
                    let mut lines = vec![
                        Line::from(Span::styled(
                            page.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(""),
                    ];
                    lines.extend(page.content.lines().map(|l| Line::from(l.to_string())));
                    lines
                })
                .unwrap_or_default();
            draw_document(area, f, state, block, lines);
        }
        View::AddPost | View::EditPost(_) => draw_post_form(area, f, state, block),
        View::Login => draw_login(area, f, state, block),
    }
}

fn draw_document(
    area: Rect,
    f: &mut Frame,
    state: &AppState,
    block: Block<'_>,
    lines: Vec<Line<'static>>,
) {
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    f.render_widget(p, area);
}

fn draw_post_list(area: Rect, f: &mut Frame, state: &AppState, block: Block<'_>, admin: bool) {
    if state.posts.is_empty() {
        f.render_widget(Paragraph::new(NO_POSTS).block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .posts
        .iter()
        .map(|post| {
            if admin {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("[{}] ", post.id), Style::default().fg(Color::Gray)),
                    Span::raw(post.title.clone()),
                    Span::styled(
                        format!("  {} by {}", post.date, post.author),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            } else {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        post.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        post.date.clone(),
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(post.summary.clone()),
                    Line::from(""),
                ])
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn field_block(label: &'static str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(label)
}

fn draw_post_form(area: Rect, f: &mut Frame, state: &AppState, block: Block<'_>) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    for (field, row) in FormField::ALL.iter().zip(rows.iter()) {
        let focused = state.form.focus == *field && !state.form.submitting;
        let p = Paragraph::new(state.form.value(*field).to_string())
            .wrap(Wrap { trim: false })
            .block(field_block(field.label(), focused));
        f.render_widget(p, *row);
    }

    let footer = if state.form.submitting {
        Line::from(Span::styled(
            "Publishing...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let submit = if state.view == View::AddPost {
            " Publish Post   "
        } else {
            " Save Changes   "
        };
        Line::from(vec![
            Span::styled("Ctrl-S", Style::default().fg(Color::Magenta)),
            Span::raw(submit),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(" Cancel"),
        ])
    };
    f.render_widget(Paragraph::new(footer), rows[4]);
}

fn draw_login(area: Rect, f: &mut Frame, state: &AppState, block: Block<'_>) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let form_area = centered_rect(60, 8, inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(form_area);

    let username = Paragraph::new(state.login.username.clone()).block(field_block(
        "Username",
        state.login.focus == LoginField::Username,
    ));
    let password = Paragraph::new("*".repeat(state.login.password.chars().count())).block(
        field_block("Password", state.login.focus == LoginField::Password),
    );
    f.render_widget(username, rows[0]);
    f.render_widget(password, rows[1]);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Magenta)),
            Span::raw(" Log in   "),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(" Cancel"),
        ])),
        rows[2],
    );
}

fn draw_status(area: Rect, f: &mut Frame, state: &AppState) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Session: ", Style::default().fg(Color::Gray)),
        if state.session.is_authenticated() {
            Span::styled("admin", Style::default().fg(Color::Green))
        } else {
            Span::raw("guest")
        },
        Span::raw("   "),
        Span::styled("Posts: ", Style::default().fg(Color::Gray)),
        Span::raw(state.posts.len().to_string()),
        Span::raw("   "),
        Span::styled("?", Style::default().fg(Color::Magenta)),
        Span::raw(" help"),
    ])];
    push_wrapped_kv(&mut lines, "Info", &state.info, area.width);

    let status = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_modal(area: Rect, f: &mut Frame, title: &'static str, lines: Vec<Line<'static>>) {
    let rect = centered_rect(50, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, rect);
}

#[cfg(test)]
#[path = "tests/draw_tests.rs"]
mod tests;
