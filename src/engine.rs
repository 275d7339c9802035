//! Conversation engine shared by the form and chat screens.
//!
//! Both screens drive the same state machine (Idle <-> AwaitingResponse) and
//! differ only in presentation: the form keeps a single answer slot that each
//! request overwrites, the chat keeps an append-only transcript of turns.
//! The engine owns the in-flight guard, so a second send while a request is
//! outstanding is rejected at the data layer rather than left to the UI.

use anyhow::Result;

use crate::api::AskRequest;
use crate::filters::FilterSelection;

/// Shown when the chat is sent with any filter unselected.
pub const MISSING_FILTERS_WARNING: &str =
    "⚠️ Please select all filters before asking a question.";

/// Shown when a 2xx response carries no usable answer.
pub const CHAT_NO_ANSWER_FALLBACK: &str = "⚠️ No answer received from AI.";
pub const FORM_NO_ANSWER_FALLBACK: &str = "No response from API.";

pub const CHAT_ERROR_PREFIX: &str = "❌ Error: ";
pub const FORM_ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

/// One entry in the chat transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub sender: Sender,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// One answer slot, overwritten on every request (form screen).
    SingleAnswer,
    /// Append-only transcript of user/AI turns (chat screen).
    Transcript,
}

/// What a call to [`Session::begin_send`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendAction {
    /// A request is already outstanding; nothing changed.
    Busy,
    /// Empty or whitespace-only question (transcript only); nothing changed.
    Ignored,
    /// Filters incomplete (transcript only); a user turn and the warning
    /// turn were appended, no request goes out.
    Warned,
    /// Hand this request to the transport and call `complete` when settled.
    Dispatch(AskRequest),
}

pub struct Session {
    presentation: Presentation,
    pub filters: FilterSelection,
    turns: Vec<Turn>,
    answer: String,
    in_flight: bool,
}

impl Session {
    pub fn new(presentation: Presentation) -> Self {
        Self {
            presentation,
            filters: FilterSelection::new(),
            turns: Vec::new(),
            answer: String::new(),
            in_flight: false,
        }
    }

    pub fn with_filters(presentation: Presentation, filters: FilterSelection) -> Self {
        Self {
            filters,
            ..Self::new(presentation)
        }
    }

    /// True exactly while one request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// The transcript in insertion order (transcript presentation).
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The current answer slot (single-answer presentation).
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Run the send path for a question. On `Dispatch` the session is
    /// AwaitingResponse and the caller must eventually call [`complete`]
    /// with the settled result; every other action leaves it Idle.
    ///
    /// [`complete`]: Session::complete
    pub fn begin_send(&mut self, question: &str) -> SendAction {
        if self.in_flight {
            return SendAction::Busy;
        }

        match self.presentation {
            Presentation::SingleAnswer => {
                // The form validates nothing client-side; all fields may be
                // empty and the previous answer is discarded up front.
                self.answer.clear();
                self.in_flight = true;
                SendAction::Dispatch(AskRequest::new(&self.filters, question))
            }
            Presentation::Transcript => {
                if question.trim().is_empty() {
                    return SendAction::Ignored;
                }

                self.turns.push(Turn {
                    sender: Sender::User,
                    content: question.to_string(),
                });

                if !self.filters.is_complete() {
                    self.turns.push(Turn {
                        sender: Sender::Ai,
                        content: MISSING_FILTERS_WARNING.to_string(),
                    });
                    return SendAction::Warned;
                }

                self.in_flight = true;
                SendAction::Dispatch(AskRequest::new(&self.filters, question))
            }
        }
    }

    /// Apply a settled request. Clears the in-flight flag on every path.
    pub fn complete(&mut self, result: Result<Option<String>>) {
        self.in_flight = false;

        let content = match result {
            Ok(Some(answer)) => answer,
            Ok(None) => match self.presentation {
                Presentation::SingleAnswer => FORM_NO_ANSWER_FALLBACK.to_string(),
                Presentation::Transcript => CHAT_NO_ANSWER_FALLBACK.to_string(),
            },
            Err(e) => match self.presentation {
                Presentation::SingleAnswer => format!("{}{}", FORM_ERROR_PREFIX, e),
                Presentation::Transcript => format!("{}{}", CHAT_ERROR_PREFIX, e),
            },
        };

        match self.presentation {
            Presentation::SingleAnswer => self.answer = content,
            Presentation::Transcript => self.turns.push(Turn {
                sender: Sender::Ai,
                content,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterField;
    use anyhow::anyhow;

    fn complete_filters() -> FilterSelection {
        let mut filters = FilterSelection::new();
        filters.set(FilterField::Board, "CBSE");
        filters.set(FilterField::Language, "english");
        filters.set(FilterField::ClassLevel, "10");
        filters.set(FilterField::Subject, "math");
        filters
    }

    fn dispatched(session: &mut Session, question: &str) -> AskRequest {
        match session.begin_send(question) {
            SendAction::Dispatch(req) => req,
            other => panic!("expected Dispatch, got {:?}", other),
        }
    }

    // ── chat (transcript) ───────────────────────────────────────────

    #[test]
    fn test_chat_empty_question_is_a_no_op() {
        let mut session = Session::with_filters(Presentation::Transcript, complete_filters());

        assert_eq!(session.begin_send(""), SendAction::Ignored);
        assert_eq!(session.begin_send("   \n\t"), SendAction::Ignored);
        assert!(session.turns().is_empty());
        assert!(!session.in_flight());
    }

    #[test]
    fn test_chat_happy_path_appends_user_then_ai_turn() {
        let mut session = Session::with_filters(Presentation::Transcript, complete_filters());

        let req = dispatched(&mut session, "What is a prime number?");
        assert_eq!(req.board, "CBSE");
        assert_eq!(req.language, "english");
        assert_eq!(req.class_level, "10");
        assert_eq!(req.subject, "math");
        assert_eq!(req.question, "What is a prime number?");
        assert!(session.in_flight());
        assert_eq!(session.turns().len(), 1);

        session.complete(Ok(Some("A number with two divisors.".to_string())));

        assert!(!session.in_flight());
        let turns = session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].sender, Sender::User);
        assert_eq!(turns[0].content, "What is a prime number?");
        assert_eq!(turns[1].sender, Sender::Ai);
        assert_eq!(turns[1].content, "A number with two divisors.");
    }

    #[test]
    fn test_chat_incomplete_filters_warns_without_request() {
        let mut session = Session::new(Presentation::Transcript);
        session.filters.set(FilterField::Board, "CBSE");
        // language, class, subject left unselected

        assert_eq!(session.begin_send("Why is the sky blue?"), SendAction::Warned);

        let turns = session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].sender, Sender::User);
        assert_eq!(turns[0].content, "Why is the sky blue?");
        assert_eq!(turns[1].sender, Sender::Ai);
        assert_eq!(turns[1].content, MISSING_FILTERS_WARNING);
        assert!(!session.in_flight());
    }

    #[test]
    fn test_chat_request_failure_becomes_error_turn() {
        let mut session = Session::with_filters(Presentation::Transcript, complete_filters());

        dispatched(&mut session, "q");
        session.complete(Err(anyhow!("Network Error")));

        assert!(!session.in_flight());
        assert_eq!(session.turns()[1].content, "❌ Error: Network Error");
    }

    #[test]
    fn test_chat_missing_answer_uses_fallback() {
        let mut session = Session::with_filters(Presentation::Transcript, complete_filters());

        dispatched(&mut session, "q");
        session.complete(Ok(None));

        assert_eq!(session.turns()[1].content, CHAT_NO_ANSWER_FALLBACK);
    }

    #[test]
    fn test_chat_send_while_in_flight_is_rejected() {
        let mut session = Session::with_filters(Presentation::Transcript, complete_filters());

        dispatched(&mut session, "first");
        assert_eq!(session.begin_send("second"), SendAction::Busy);
        // The rejected send appended nothing.
        assert_eq!(session.turns().len(), 1);

        session.complete(Ok(Some("answer".to_string())));
        assert!(matches!(
            session.begin_send("second"),
            SendAction::Dispatch(_)
        ));
    }

    #[test]
    fn test_chat_earlier_turns_survive_later_sends() {
        let mut session = Session::with_filters(Presentation::Transcript, complete_filters());

        dispatched(&mut session, "one");
        session.complete(Ok(Some("answer one".to_string())));
        dispatched(&mut session, "two");
        session.complete(Err(anyhow!("boom")));

        let contents: Vec<&str> = session.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "answer one", "two", "❌ Error: boom"]);
    }

    // ── form (single answer) ────────────────────────────────────────

    #[test]
    fn test_form_sends_without_validation() {
        let mut session = Session::new(Presentation::SingleAnswer);

        // Everything empty is still a valid submission.
        let req = dispatched(&mut session, "");
        assert_eq!(req.board, "");
        assert_eq!(req.question, "");
        assert!(session.in_flight());
    }

    #[test]
    fn test_form_answer_is_overwritten_not_appended() {
        let mut session = Session::with_filters(Presentation::SingleAnswer, complete_filters());

        dispatched(&mut session, "q1");
        session.complete(Ok(Some("first answer".to_string())));
        assert_eq!(session.answer(), "first answer");

        dispatched(&mut session, "q2");
        // Previous answer is discarded as soon as the request goes out.
        assert_eq!(session.answer(), "");
        session.complete(Ok(Some("second answer".to_string())));
        assert_eq!(session.answer(), "second answer");
    }

    #[test]
    fn test_form_failure_sets_error_text() {
        let mut session = Session::new(Presentation::SingleAnswer);

        dispatched(&mut session, "q");
        session.complete(Err(anyhow!("Network Error")));

        assert!(!session.in_flight());
        assert_eq!(session.answer(), "Error: Network Error");
    }

    #[test]
    fn test_form_missing_answer_uses_fallback() {
        let mut session = Session::new(Presentation::SingleAnswer);

        dispatched(&mut session, "q");
        session.complete(Ok(None));

        assert_eq!(session.answer(), FORM_NO_ANSWER_FALLBACK);
    }

    #[test]
    fn test_form_submit_while_in_flight_is_rejected() {
        let mut session = Session::new(Presentation::SingleAnswer);

        dispatched(&mut session, "q");
        assert_eq!(session.begin_send("again"), SendAction::Busy);

        session.complete(Ok(Some("done".to_string())));
        assert!(!session.in_flight());
    }
}
