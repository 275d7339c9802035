use tokio::task::JoinHandle;

use crate::api::TutorClient;
use crate::config::Config;
use crate::engine::{Presentation, Session};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Focusable elements, shared by both screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Board,
    Language,
    ClassLevel,
    Subject,
    Question,
}

impl Focus {
    pub fn filter_field(&self) -> Option<FilterField> {
        match self {
            Focus::Board => Some(FilterField::Board),
            Focus::Language => Some(FilterField::Language),
            Focus::ClassLevel => Some(FilterField::ClassLevel),
            Focus::Subject => Some(FilterField::Subject),
            Focus::Question => None,
        }
    }

    fn next(self) -> Self {
        match self {
            Focus::Board => Focus::Language,
            Focus::Language => Focus::ClassLevel,
            Focus::ClassLevel => Focus::Subject,
            Focus::Subject => Focus::Question,
            Focus::Question => Focus::Board,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Board => Focus::Question,
            Focus::Language => Focus::Board,
            Focus::ClassLevel => Focus::Language,
            Focus::Subject => Focus::ClassLevel,
            Focus::Question => Focus::Subject,
        }
    }
}

/// A spawned request; drained on Tick once finished.
pub type PendingRequest = JoinHandle<anyhow::Result<Option<String>>>;

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub focus: Focus,

    pub client: TutorClient,

    // One session per screen; no state crosses between them.
    pub form: Session,
    pub chat: Session,

    // Form question is retained across submissions; chat input is cleared
    // as soon as a send appends its user turn.
    pub form_question: String,
    pub form_cursor: usize,
    pub chat_input: String,
    pub chat_cursor: usize,

    pub form_task: Option<PendingRequest>,
    pub chat_task: Option<PendingRequest>,

    // Scroll state
    pub answer_scroll: u16,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // 0-2 for the thinking ellipsis animation
    pub animation_frame: u8,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let client = TutorClient::new(&config.endpoint());
        let defaults = config.default_filters();

        Self {
            should_quit: false,
            screen: Screen::Form,
            input_mode: InputMode::Normal,
            focus: Focus::Board,

            client,

            form: Session::with_filters(Presentation::SingleAnswer, defaults.clone()),
            chat: Session::with_filters(Presentation::Transcript, defaults),

            form_question: String::new(),
            form_cursor: 0,
            chat_input: String::new(),
            chat_cursor: 0,

            form_task: None,
            chat_task: None,

            answer_scroll: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,
        }
    }

    /// The session behind the currently visible screen.
    pub fn active_session(&mut self) -> &mut Session {
        match self.screen {
            Screen::Form => &mut self.form,
            Screen::Chat => &mut self.chat,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.input_mode = InputMode::Normal;
            self.focus = match screen {
                Screen::Form => Focus::Board,
                Screen::Chat => Focus::Question,
            };
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Tick animation frame while a request is outstanding.
    pub fn tick_animation(&mut self) {
        if self.form.in_flight() || self.chat.in_flight() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_answer_up(&mut self) {
        self.answer_scroll = self.answer_scroll.saturating_sub(1);
    }

    pub fn scroll_answer_down(&mut self) {
        self.answer_scroll = self.answer_scroll.saturating_add(1);
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    /// Scroll the transcript so the newest turn (and the thinking indicator)
    /// is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for turn in self.chat.turns() {
            total_lines += 1; // Sender line ("You:" or "AI:")
            for line in turn.content.lines() {
                // Character count, not byte length, for UTF-8 content
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after each turn
        }

        // Room for the thinking indicator
        total_lines += 2;

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

}
