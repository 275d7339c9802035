use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, InputMode, Screen};
use crate::engine::Sender;
use crate::filters::{FilterField, FilterSelection, UNSELECTED};
use crate::markdown;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Form => render_form_screen(app, frame, body_area),
        Screen::Chat => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let screen_label = match app.screen {
        Screen::Form => "Form",
        Screen::Chat => "Chat",
    };

    let title = Line::from(vec![
        Span::styled(" EduQuery ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("[{}] ", screen_label),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match (app.screen, app.input_mode) {
        (Screen::Form, InputMode::Normal) => {
            " q quit | Tab focus | j/k select | x clear | i edit question | s submit | c chat "
        }
        (Screen::Chat, InputMode::Normal) => {
            " q quit | Esc form | Tab focus | j/k select | x clear | i edit question "
        }
        (Screen::Form, InputMode::Editing) => " Esc done | Enter submit ",
        (Screen::Chat, InputMode::Editing) => " Esc done | Enter send ",
    };

    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}

/// Render the four filter selectors side by side.
fn render_filter_row(
    filters: &FilterSelection,
    focus: Focus,
    frame: &mut Frame,
    area: Rect,
) {
    let columns = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(area);

    for (field, column) in FilterField::all().into_iter().zip(columns.iter()) {
        render_filter_picker(filters, focus, field, frame, *column);
    }
}

fn render_filter_picker(
    filters: &FilterSelection,
    focus: Focus,
    field: FilterField,
    frame: &mut Frame,
    area: Rect,
) {
    let focused = focus.filter_field() == Some(field);
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let current = filters.get(field);
    let title = if current == UNSELECTED {
        format!(" {} ", field.label())
    } else {
        format!(" {}: {} ", field.label(), current)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let lines: Vec<Line> = field
        .options()
        .iter()
        .map(|option| {
            if *option == current {
                Line::from(Span::styled(
                    format!("> {}", option),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", option))
            }
        })
        .collect();

    let picker = Paragraph::new(Text::from(lines)).block(block);
    frame.render_widget(picker, area);
}

fn render_form_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [filter_area, question_area, submit_area, answer_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_filter_row(&app.form.filters, app.focus, frame, filter_area);

    render_question_input(
        &app.form_question,
        app.form_cursor,
        app.focus == Focus::Question,
        app.input_mode,
        frame,
        question_area,
    );

    // Submit control: disabled affordance while the request is outstanding
    let submitting = app.form.in_flight();
    let label = if submitting { " Submitting... " } else { " Submit (s) " };
    let button_style = if submitting {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(label, button_style),
    ]));
    frame.render_widget(button, submit_area);

    // Answer panel, overwritten on every request
    let answer_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Response ");

    let answer_text = if app.form.answer().is_empty() {
        if submitting {
            Text::from(Span::styled(
                "Waiting for the tutor...",
                Style::default().fg(Color::DarkGray).italic(),
            ))
        } else {
            Text::from(Span::styled(
                "Submit a question to see the answer here.",
                Style::default().fg(Color::DarkGray),
            ))
        }
    } else {
        Text::from(markdown::render_markdown(app.form.answer()))
    };

    let answer = Paragraph::new(answer_text)
        .block(answer_block)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll, 0));

    frame.render_widget(answer, answer_area);
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_column, filter_column] = Layout::horizontal([
        Constraint::Percentage(72),
        Constraint::Percentage(28),
    ])
    .areas(area);

    let [transcript_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(chat_column);

    // Inner size (minus borders) for wrap/scroll calculations
    app.chat_height = transcript_area.height.saturating_sub(2);
    app.chat_width = transcript_area.width.saturating_sub(2);

    render_transcript(app, frame, transcript_area);

    render_question_input(
        &app.chat_input,
        app.chat_cursor,
        app.focus == Focus::Question,
        app.input_mode,
        frame,
        input_area,
    );

    // Filters persist across turns; stack them in the side column
    let rows = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .split(filter_column);

    for (field, row) in FilterField::all().into_iter().zip(rows.iter()) {
        render_filter_picker(&app.chat.filters, app.focus, field, frame, *row);
    }
}

fn render_transcript(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" AI Tutor ");

    let text = if app.chat.turns().is_empty() && !app.chat.in_flight() {
        Text::from(Span::styled(
            "Pick your filters, then ask a question...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for turn in app.chat.turns() {
            match turn.sender {
                Sender::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )));
                    for line in turn.content.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                    lines.push(Line::default());
                }
                Sender::Ai => {
                    lines.push(Line::from(Span::styled(
                        "AI:",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                    lines.extend(markdown::render_markdown(&turn.content));
                    lines.push(Line::default());
                }
            }
        }

        // Thinking indicator after the last turn, animated ellipsis
        if app.chat.in_flight() {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("🤖 Thinking{}", dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let transcript = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_question_input(
    input: &str,
    cursor: usize,
    focused: bool,
    mode: InputMode,
    frame: &mut Frame,
    area: Rect,
) {
    let editing = focused && mode == InputMode::Editing;
    let border_color = if editing {
        Color::Yellow
    } else if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Question ");

    // Horizontal scroll keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor >= inner_width {
        cursor - inner_width + 1
    } else {
        0
    };

    let visible_text: String = input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let paragraph = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);
    frame.render_widget(paragraph, area);

    if editing {
        frame.set_cursor_position((
            area.x + 1 + (cursor - scroll_offset) as u16,
            area.y + 1,
        ));
    }
}
