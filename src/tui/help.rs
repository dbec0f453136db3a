use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn bind(keys: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(keys, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        bind("q / Ctrl-C", 3, "Quit"),
        bind("h", 12, "Home"),
        bind("1-9", 10, "Open page from the navigation bar"),
        bind("a", 12, "Admin panel (asks to log in first)"),
        bind("l", 12, "Log in / log out"),
        bind("r", 12, "Reload current view"),
        bind("?", 12, "Show this help"),
        Line::from(""),
        Line::from("Lists:"),
        bind("↑/↓ or j/k", 3, "Select post"),
        bind("Enter", 8, "Read post"),
        bind("n", 12, "New post"),
        bind("e", 12, "Edit selected (admin)"),
        bind("d", 12, "Delete selected (admin)"),
        Line::from(""),
        Line::from("Forms:"),
        bind("Tab", 10, "Next field"),
        bind("Enter", 8, "Submit (newline in Content)"),
        bind("Ctrl-S", 7, "Submit"),
        bind("Esc", 10, "Cancel"),
        Line::from(""),
        Line::from("Reading:"),
        bind("↑/↓ or j/k", 3, "Scroll"),
        bind("b / Esc", 6, "Back to home"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}
