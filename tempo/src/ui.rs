use crate::app::{App, AppMode};
use crate::format::format_seconds_to_hhmmss;
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_active_task(f, chunks[1], app);
    draw_completed(f, chunks[2], app);
    draw_status_bar(f, chunks[3], app);

    match &app.mode {
        AppMode::NamingTask => draw_input_overlay(f, "New Task", &app.input_buffer, app),
        AppMode::RenamingTask => draw_input_overlay(f, "Rename Task", &app.input_buffer, app),
        AppMode::ShowHelp => draw_help_overlay(f, app),
        _ => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "TEMPO",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.dim)),
        ),
        area,
    );
}

fn draw_active_task(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(" Current ", Style::default().fg(theme.dim)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let Some(task) = &app.current else {
        f.render_widget(
            Paragraph::new("No active task. Press 's' to start one.")
                .style(Style::default().fg(theme.dim))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    };

    let (state_icon, state_color) = if task.is_paused {
        (icons.pause.as_str(), theme.paused)
    } else {
        (icons.play.as_str(), theme.running)
    };
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner_area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{state_icon} "), Style::default().fg(state_color)),
            Span::styled(
                task.name.clone(),
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center),
        v_chunks[0],
    );
    f.render_widget(
        Paragraph::new(format_seconds_to_hhmmss(task.elapsed_seconds))
            .style(Style::default().fg(state_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        v_chunks[1],
    );
}

fn draw_completed(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(" Completed ", Style::default().fg(theme.dim)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.completed.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing completed yet.")
                .style(Style::default().fg(theme.dim))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }

    // newest first
    let items: Vec<ListItem> = app
        .completed
        .iter()
        .rev()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", icons.done),
                    Style::default().fg(theme.running),
                ),
                Span::styled(task.name.clone(), Style::default().fg(theme.foreground)),
                Span::styled(
                    format!(
                        "  {}  finished {}",
                        format_seconds_to_hhmmss(task.duration_seconds),
                        format_end_time(task.end_time),
                    ),
                    Style::default().fg(theme.dim),
                ),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), inner_area);
}

fn format_end_time(end_time_millis: i64) -> String {
    DateTime::from_timestamp_millis(end_time_millis)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("NORMAL", theme.running),
        AppMode::NamingTask => ("NEW", theme.paused),
        AppMode::RenamingTask => ("RENAME", theme.accent),
        AppMode::ShowHelp => ("HELP", theme.accent),
    };
    let help = match app.mode {
        AppMode::Normal => "s:start │ space:pause/resume │ r:rename │ c:complete │ ?:help │ q:quit",
        AppMode::RenamingTask => "enter:confirm │ space/esc:cancel",
        _ => "enter:confirm │ esc:cancel",
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", mode_text),
                Style::default()
                    .bg(mode_color)
                    .fg(theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(help),
        ]))
        .style(Style::default().fg(theme.dim)),
        area,
    );
}

fn draw_input_overlay(f: &mut Frame, title: &str, input: &str, app: &App) {
    let theme = &app.config.theme;
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.paused))
        .border_type(BorderType::Double)
        .style(Style::default().bg(theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(theme.foreground)),
            Span::styled(input, Style::default().fg(theme.foreground)),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn draw_help_overlay(f: &mut Frame, app: &App) {
    let theme = &app.config.theme;
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let shortcuts = [
        ("s", "Start a new task"),
        ("Space", "Pause or resume the current task"),
        ("r", "Rename the current task"),
        ("c", "Complete the current task"),
        ("?", "Toggle this help"),
        ("q", "Save and quit"),
    ];
    let items: Vec<ListItem> = shortcuts
        .iter()
        .map(|(key, desc)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {key:<6}"), Style::default().fg(theme.accent)),
                Span::styled(*desc, Style::default().fg(theme.foreground)),
            ]))
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .title(" Keys ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
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
