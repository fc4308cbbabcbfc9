//! UI rendering with Ratatui.

use crate::app::{App, AppState, EditForm, FormField, InputMode};
use acctkeep_core::{KeyValueStorage, RecordType, ValidationError};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Main render function.
pub fn render<S: KeyValueStorage>(frame: &mut Frame, app: &App<S>) {
    if app.state == AppState::Quit {
        return;
    }

    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    // Split into account list (40%) and detail/form (60%)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    render_account_list(frame, app, chunks[0]);
    match app.form {
        Some(ref form) => render_form(frame, app, form, chunks[1]),
        None => render_details(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, rows[1]);

    if app.input_mode == InputMode::Search {
        render_search_overlay(frame, app, area);
    }
}

/// Render the account list.
fn render_account_list<S: KeyValueStorage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let is_focused = app.input_mode == InputMode::Normal;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .title(" 🗂 Accounts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let accounts = app.store.accounts();
    if accounts.is_empty() {
        let message = Paragraph::new("No accounts yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(message, centered_rect(inner.width, 1, inner));
        return;
    }

    let items: Vec<ListItem> = accounts
        .iter()
        .enumerate()
        .map(|(i, account)| {
            let mark = if app.marked.contains(&account.id) { "✗" } else { " " };
            let has_errors = !app.store.validation_errors_for(&account.id).is_empty();
            let login = if account.login.is_empty() {
                "(no login)"
            } else {
                account.login.as_str()
            };

            let style = if i == app.selected_index {
                Style::default()
                    .bg(Color::Rgb(60, 60, 80))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if has_errors {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(Color::Red)),
                Span::styled(
                    format!("{:<5} ", account.record_type),
                    record_type_style(account.record_type),
                ),
                Span::styled(login.to_string(), style),
                Span::styled(
                    format!("  {}", account.label_text()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn record_type_style(record_type: RecordType) -> Style {
    match record_type {
        RecordType::Local => Style::default().fg(Color::Green),
        RecordType::Ldap => Style::default().fg(Color::Magenta),
    }
}

/// Render the read-only view of the selected account.
fn render_details<S: KeyValueStorage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default()
        .title(" 📋 Account Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(account) = app.store.accounts().get(app.selected_index) else {
        let message = Paragraph::new("Select an account from the list")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(message, centered_rect(50, 3, inner));
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Labels
            Constraint::Length(2), // Record type
            Constraint::Length(2), // Login
            Constraint::Length(2), // Password
            Constraint::Min(1),
            Constraint::Length(1), // Help line
        ])
        .split(inner);

    render_field(frame, "Labels", &account.label_text(), chunks[0], Color::White);
    render_field(frame, "Type", account.record_type.as_str(), chunks[1], Color::Magenta);
    render_field(frame, "Login", &account.login, chunks[2], Color::Green);
    let password = match account.password {
        Some(ref p) => display_password(p, app.mask_passwords),
        None => "(not stored)".to_string(),
    };
    render_field(frame, "Password", &password, chunks[3], Color::Yellow);

    let help = Paragraph::new(
        "a: add | e: edit | d: delete | space: mark | D: delete marked | /: search | q: quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[5]);
}

/// Render the edit form with its validation errors.
fn render_form<S: KeyValueStorage>(frame: &mut Frame, app: &App<S>, form: &EditForm, area: Rect) {
    let title = if form.is_new { " ✏ New Account " } else { " ✏ Edit Account " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = FormField::visible(form.data.record_type);
    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    let errors = app.form_errors();
    for (field, chunk) in fields.iter().zip(chunks.iter()) {
        let value = match field {
            FormField::Label => form.data.label.clone(),
            FormField::RecordType => format!("◂ {} ▸", form.data.record_type),
            FormField::Login => form.data.login.clone(),
            FormField::Password => display_password(&form.data.password, app.mask_passwords),
        };
        render_form_field(frame, *field, &value, form.focus == *field, errors, *chunk);
    }

    let help = Paragraph::new("Tab: next field | ←/→: record type | Enter: save | Esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[chunks.len() - 1]);
}

fn render_form_field(
    frame: &mut Frame,
    field: FormField,
    value: &str,
    focused: bool,
    errors: &[ValidationError],
    area: Rect,
) {
    let title = match field {
        FormField::Label => "Labels (separate with ;)",
        FormField::RecordType => "Record type",
        FormField::Login => "Login",
        FormField::Password => "Password",
    };
    let label_color = if focused { Color::Cyan } else { Color::DarkGray };
    let cursor = if focused && field != FormField::RecordType { "_" } else { "" };

    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().fg(label_color))),
        Line::from(vec![
            Span::styled("▸ ", Style::default().fg(label_color)),
            Span::styled(format!("{value}{cursor}"), Style::default().fg(Color::White)),
        ]),
    ];
    if let Some(error) = errors.iter().find(|e| e.field == field.name()) {
        lines.push(Line::from(Span::styled(
            error.message.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_field(frame: &mut Frame, label: &str, value: &str, area: Rect, color: Color) {
    let line = Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ]);
    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);
}

fn display_password(password: &str, mask: bool) -> String {
    if mask {
        "*".repeat(password.chars().count())
    } else {
        password.to_string()
    }
}

/// Render counts and the last status message.
fn render_status_bar<S: KeyValueStorage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let stats = app.store.get_account_stats();
    let mut spans = vec![Span::styled(
        format!(
            " {} accounts · {} local · {} LDAP · {} labels ",
            stats.total, stats.local, stats.ldap, stats.total_labels
        ),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];
    if !app.marked.is_empty() {
        spans.push(Span::styled(
            format!(" {} marked ", app.marked.len()),
            Style::default().fg(Color::Black).bg(Color::Red),
        ));
    }
    if let Some(ref message) = app.status_message {
        spans.push(Span::styled(format!(" {message}"), Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the search overlay.
fn render_search_overlay<S: KeyValueStorage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    // Center the search dialog
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 15.min(area.height.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    // Clear background
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 🔍 Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let input_line = Line::from(vec![
        Span::styled("▸ ", Style::default().fg(Color::Magenta)),
        Span::styled(&app.search_query, Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !app.search_results.is_empty() {
        let items: Vec<ListItem> = app
            .search_results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let style = if i == app.search_selected_index {
                    Style::default()
                        .bg(Color::Rgb(60, 40, 80))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled("🔑 ", Style::default()),
                    Span::styled(&result.display, style),
                ]);

                ListItem::new(line).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), chunks[1]);
    } else if !app.search_query.is_empty() {
        let no_results = Paragraph::new("No results found")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(no_results, chunks[1]);
    }
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctkeep_core::{AccountStore, MemoryStorage};
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn form_shows_validation_errors() {
        let mut app = App::new(AccountStore::new(MemoryStorage::new()), true);
        app.add_account();
        app.submit_form();

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Login is required"));
        assert!(text.contains("1 accounts"));
    }

    #[test]
    fn masked_password_is_not_rendered() {
        let mut app = App::new(AccountStore::new(MemoryStorage::new()), true);
        app.add_account();
        app.form_step(true);
        app.form_step(true);
        for c in "jdoe".chars() {
            app.form_input(c);
        }
        app.form_step(true);
        for c in "hunter2".chars() {
            app.form_input(c);
        }
        assert!(app.submit_form());

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("jdoe"));
        assert!(!text.contains("hunter2"));
    }
}
