use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus, InputMode, Screen};
use crate::engine::SendAction;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            drain_finished_requests(app).await;
        }
    }
    Ok(())
}

/// Move settled requests into their sessions. The flag clears on every
/// outcome, including a panicked task.
async fn drain_finished_requests(app: &mut App) {
    if app.form_task.as_ref().is_some_and(|t| t.is_finished()) {
        if let Some(task) = app.form_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!(e)),
            };
            app.form.complete(result);
            app.answer_scroll = 0;
        }
    }

    if app.chat_task.as_ref().is_some_and(|t| t.is_finished()) {
        if let Some(task) = app.chat_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!(e)),
            };
            app.chat.complete(result);
            app.scroll_chat_to_bottom();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Screen switching
        KeyCode::Char('c') => app.switch_screen(Screen::Chat),
        KeyCode::Char('f') => app.switch_screen(Screen::Form),
        KeyCode::Esc => {
            if app.screen == Screen::Chat {
                app.switch_screen(Screen::Form);
            }
        }

        // Focus cycle
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),

        // j/k change the focused filter, or scroll the output panel
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(field) = app.focus.filter_field() {
                app.active_session().filters.select_next(field);
            } else {
                scroll_output_down(app);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(field) = app.focus.filter_field() {
                app.active_session().filters.select_prev(field);
            } else {
                scroll_output_up(app);
            }
        }

        // Clear the focused filter back to unselected
        KeyCode::Char('x') => {
            if let Some(field) = app.focus.filter_field() {
                app.active_session().filters.clear(field);
            }
        }

        // Edit the question input
        KeyCode::Char('i') => {
            app.focus = Focus::Question;
            app.input_mode = InputMode::Editing;
            sync_cursor_to_end(app);
        }
        KeyCode::Enter => {
            if app.focus == Focus::Question {
                app.input_mode = InputMode::Editing;
                sync_cursor_to_end(app);
            }
        }

        // Submit from normal mode (form screen)
        KeyCode::Char('s') => {
            if app.screen == Screen::Form {
                submit_form(app);
            }
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => match app.screen {
            Screen::Form => submit_form(app),
            Screen::Chat => send_chat(app),
        },
        KeyCode::Backspace => {
            let (input, cursor) = input_of(app);
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let (input, cursor) = input_of(app);
            if *cursor < input.chars().count() {
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            let (_, cursor) = input_of(app);
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let (input, cursor) = input_of(app);
            *cursor = (*cursor + 1).min(input.chars().count());
        }
        KeyCode::Home => {
            let (_, cursor) = input_of(app);
            *cursor = 0;
        }
        KeyCode::End => {
            let (input, cursor) = input_of(app);
            *cursor = input.chars().count();
        }
        KeyCode::Char(c) => {
            let (input, cursor) = input_of(app);
            let byte_pos = char_to_byte_index(input, *cursor);
            input.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn input_of(app: &mut App) -> (&mut String, &mut usize) {
    match app.screen {
        Screen::Form => (&mut app.form_question, &mut app.form_cursor),
        Screen::Chat => (&mut app.chat_input, &mut app.chat_cursor),
    }
}

fn sync_cursor_to_end(app: &mut App) {
    let (input, cursor) = input_of(app);
    *cursor = input.chars().count();
}

fn scroll_output_down(app: &mut App) {
    match app.screen {
        Screen::Form => app.scroll_answer_down(),
        Screen::Chat => app.scroll_chat_down(),
    }
}

fn scroll_output_up(app: &mut App) {
    match app.screen {
        Screen::Form => app.scroll_answer_up(),
        Screen::Chat => app.scroll_chat_up(),
    }
}

/// Submit the form question. The question text is retained so it can be
/// edited and resubmitted; a submit while a request is outstanding is
/// rejected by the session guard.
fn submit_form(app: &mut App) {
    if let SendAction::Dispatch(request) = app.form.begin_send(&app.form_question) {
        let client = app.client.clone();
        app.form_task = Some(tokio::spawn(async move { client.ask(&request).await }));
        app.input_mode = InputMode::Normal;
    }
}

/// Send the chat input. The input clears on every path that appends a user
/// turn, including the missing-filters warning.
fn send_chat(app: &mut App) {
    match app.chat.begin_send(&app.chat_input) {
        SendAction::Dispatch(request) => {
            app.chat_input.clear();
            app.chat_cursor = 0;
            app.scroll_chat_to_bottom();

            let client = app.client.clone();
            app.chat_task = Some(tokio::spawn(async move { client.ask(&request).await }));
        }
        SendAction::Warned => {
            app.chat_input.clear();
            app.chat_cursor = 0;
            app.scroll_chat_to_bottom();
        }
        SendAction::Ignored | SendAction::Busy => {}
    }
}
