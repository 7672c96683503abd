use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Frame,
};
use chrono::Utc;
use crate::mutations::MAX_TITLE_LEN;
use crate::views::{is_deadline_soon, local_time_label, time_left_label};
use super::app::{App, InputMode, Notice, Tab};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status / help
        ])
        .split(f.area());

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL).title("taskpad"))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Pending => render_pending(f, app, chunks[1]),
        Tab::Completed => render_completed(f, app, chunks[1]),
        Tab::Profile => render_profile(f, app, chunks[1]),
    }

    render_status(f, app, chunks[2]);

    if app.input_mode != InputMode::Normal {
        render_input(f, app);
    }
}

fn render_pending(f: &mut Frame, app: &mut App, area: Rect) {
    if app.pending.is_empty() {
        let empty = Paragraph::new("No pending tasks. Press 'a' to add one.")
            .block(Block::default().borders(Borders::ALL).title("Pending Tasks"));
        f.render_widget(empty, area);
        return;
    }

    let now = Utc::now();
    let rows: Vec<Row> = app
        .pending
        .iter()
        .map(|t| {
            let style = if is_deadline_soon(t, now) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(t.title.clone()),
                Cell::from(local_time_label(t.deadline.as_deref())),
                Cell::from(time_left_label(t, now)),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Min(25), Constraint::Length(18), Constraint::Length(14)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Title", "Deadline", "Time Left"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Pending Tasks"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.pending_state);
}

fn render_completed(f: &mut Frame, app: &mut App, area: Rect) {
    if app.completed.is_empty() {
        let empty = Paragraph::new("No completed tasks yet.")
            .block(Block::default().borders(Borders::ALL).title("Latest Completed Tasks"));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .completed
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.title.clone()),
                Cell::from(local_time_label(Some(&t.completed_at))),
                Cell::from("Completed"),
            ])
            .style(Style::default().fg(Color::Green))
        })
        .collect();

    let widths = [Constraint::Min(25), Constraint::Length(18), Constraint::Length(10)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Title", "Completed At", ""])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Latest Completed Tasks"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.completed_state);
}

fn render_profile(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let label = Style::default().fg(Color::Cyan);
    let details: Vec<Line> = match &app.profile {
        Some(p) => vec![
            Line::from(Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(vec![Span::styled("Email: ", label), Span::raw(p.email.clone())]),
            Line::from(vec![Span::styled("Role: ", label), Span::raw(p.role.clone())]),
            Line::from(vec![Span::styled("Picture: ", label), Span::raw(p.profile_picture.clone())]),
        ],
        None => vec![Line::from("No profile yet. Set one with `taskpad profile set`.")],
    };
    f.render_widget(
        Paragraph::new(details).block(Block::default().borders(Borders::ALL).title("Profile")),
        chunks[0],
    );

    let s = app.stats;
    let rows = vec![
        Row::new(vec!["Today's Tasks".to_string(), s.today_tasks.to_string()]),
        Row::new(vec!["Today Completed".to_string(), s.today_completed_tasks.to_string()]),
        Row::new(vec!["Pending Tasks".to_string(), s.pending_tasks.to_string()]),
        Row::new(vec!["All Completed".to_string(), s.completed_tasks.to_string()]),
        Row::new(vec!["Completion Rate".to_string(), format!("{}%", s.completion_rate)]),
    ];
    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(6)])
        .block(Block::default().borders(Borders::ALL).title("Statistics"));
    f.render_widget(table, chunks[1]);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.input_mode {
        InputMode::Normal => match app.tab {
            Tab::Pending => "q: Quit | Tab: Next View | a: Add | e: Edit | Space: Done | d: Del | r: Reload",
            Tab::Completed => "q: Quit | Tab: Next View | a: Add | d: Del | r: Reload",
            Tab::Profile => "q: Quit | Tab: Next View | r: Reload",
        },
        InputMode::Editing | InputMode::Adding => "Enter: Next / Save | Esc: Cancel",
    };

    let line = match &app.notice {
        Some(Notice::Info(msg)) => Line::from(vec![
            Span::styled(msg.clone(), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(help_text, Style::default().fg(Color::Gray)),
        ]),
        Some(Notice::Error(msg)) => Line::from(vec![
            Span::styled(msg.clone(), Style::default().fg(Color::Red)),
            Span::raw("  "),
            Span::styled(help_text, Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(Span::styled(help_text, Style::default().fg(Color::Gray))),
    };

    f.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn render_input(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 3, f.area());
    f.render_widget(Clear, area);

    let verb = if app.input_mode == InputMode::Editing { "Edit Task" } else { "Add Task" };
    let title = match app.form.step {
        0 => format!("{verb}: Title (max {MAX_TITLE_LEN} chars, {}/{MAX_TITLE_LEN})", app.input_buffer.chars().count()),
        1 => format!("{verb}: Description"),
        _ => format!("{verb}: Days until deadline (optional)"),
    };

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
