use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::strings::{footer_line, FIELD_MAX_WIDTH, LABEL, PLACEHOLDER};
use crate::theme::THEME;

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(f.area());
    draw_prompt(f, rows[0], app);
    draw_footer(f, rows[1], app);
}

fn draw_prompt(f: &mut Frame, area: Rect, app: &App) {
    let label_w = (UnicodeWidthStr::width(LABEL) as u16).min(area.width);
    let field_w = area.width.saturating_sub(label_w).min(FIELD_MAX_WIDTH);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(label_w),
            Constraint::Length(field_w),
            Constraint::Min(0),
        ])
        .split(area);

    let label = Paragraph::new(Span::styled(LABEL, Style::default().fg(THEME.label)));
    f.render_widget(label, cols[0]);

    let field_area = cols[1];
    let field_style = Style::default().bg(THEME.field_bg).fg(THEME.field_fg);
    let (offset, cursor_col) = scroll_for_cursor(app.input.before_cursor(), field_area.width);

    let para = if app.input.is_empty() {
        let hint = Line::from(Span::styled(
            PLACEHOLDER,
            Style::default()
                .fg(THEME.placeholder_fg)
                .add_modifier(Modifier::DIM),
        ));
        Paragraph::new(hint).style(field_style)
    } else {
        Paragraph::new(app.input.text()).style(field_style).scroll((0, offset))
    };
    f.render_widget(para, field_area);

    if field_area.width > 0 {
        f.set_cursor_position(Position::new(field_area.x + cursor_col, field_area.y));
    }
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = Span::styled(footer_line(&app.history), Style::default().fg(THEME.hint));
    f.render_widget(Paragraph::new(line), area);
}

/// Horizontal scroll offset and on-screen cursor column so the cursor stays
/// inside a field `width` columns wide.
fn scroll_for_cursor(before_cursor: &str, width: u16) -> (u16, u16) {
    let prefix = UnicodeWidthStr::width(before_cursor).min(u16::MAX as usize) as u16;
    let last = width.saturating_sub(1);
    let offset = prefix.saturating_sub(last);
    (offset, prefix - offset)
}
