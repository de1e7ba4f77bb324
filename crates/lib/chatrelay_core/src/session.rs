//! Client-side chat session.
//!
//! A [`Session`] owns the transcript and drives one request at a time through
//! the `Idle → Sending → Idle` cycle. Rendering goes through [`ChatView`] and
//! the network through [`RelayTransport`], so the same state machine backs the
//! terminal client and the tests.
//!
//! Whatever the outcome of a send, the session leaves `Sending` with the
//! typing indicator hidden, input re-enabled and focus back on the input.

use tracing::{debug, warn};

use crate::client::{RelayTransport, TransportError};
use crate::turn::{Role, Transcript, Turn};
use crate::wire::{ChatRequest, ChatResponse};

/// Shown when the relay cannot be reached or answers with something unreadable.
pub const CONNECTION_ERROR: &str = "Error: Could not connect to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
}

/// Something the view displays in the conversation area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Turn(Turn),
    /// Bot-styled error line; not part of the transcript.
    Error(String),
}

impl Entry {
    pub fn text(&self) -> &str {
        match self {
            Entry::Turn(turn) => turn.content(),
            Entry::Error(text) => text,
        }
    }

    /// Whether the entry is styled as coming from the bot side.
    pub fn is_bot(&self) -> bool {
        match self {
            Entry::Turn(turn) => turn.role() == Role::Assistant,
            Entry::Error(_) => true,
        }
    }
}

/// UI surface driven by a session.
pub trait ChatView {
    fn render(&mut self, entry: &Entry);
    fn clear_input(&mut self);
    fn set_input_enabled(&mut self, enabled: bool);
    fn set_typing(&mut self, visible: bool);
    fn focus_input(&mut self);
}

/// Input to the session state machine.
#[derive(Debug)]
pub enum SessionEvent {
    /// The user pressed send with this input text.
    Submitted(String),
    /// The in-flight request finished.
    Completed(Result<ChatResponse, TransportError>),
}

/// What the caller must do after dispatching an event.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// Event had no effect.
    Ignored,
    /// Send this request to the relay, then dispatch `Completed`.
    Send(ChatRequest),
    /// The send cycle is over.
    Done(SubmitOutcome),
}

/// Result of one send cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, or a send was already in flight.
    Ignored,
    /// The assistant answered; the turn was appended to the transcript.
    Replied(Turn),
    /// The turn failed; carries the error line shown to the user.
    Failed(String),
}

pub struct Session<T, V> {
    transcript: Transcript,
    state: SessionState,
    transport: T,
    view: V,
}

impl<T, V> Session<T, V>
where
    T: RelayTransport,
    V: ChatView,
{
    pub fn new(transport: T, view: V) -> Self {
        Self {
            transcript: Transcript::new(),
            state: SessionState::Idle,
            transport,
            view,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Runs a full send cycle for `input`.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let Some(request) = self.begin(input) else {
            return SubmitOutcome::Ignored;
        };
        let result = self.transport.send(&request).await;
        self.complete(result)
    }

    /// Feeds one event into the state machine without touching the network.
    pub fn dispatch(&mut self, event: SessionEvent) -> Step {
        match event {
            SessionEvent::Submitted(input) => match self.begin(&input) {
                Some(request) => Step::Send(request),
                None => Step::Ignored,
            },
            SessionEvent::Completed(result) => match self.complete(result) {
                SubmitOutcome::Ignored => Step::Ignored,
                outcome => Step::Done(outcome),
            },
        }
    }

    fn begin(&mut self, input: &str) -> Option<ChatRequest> {
        if self.state == SessionState::Sending {
            debug!("send already in flight, ignoring submit");
            return None;
        }

        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        let turn = Turn::user(message);
        self.transcript.push(turn.clone());
        self.view.render(&Entry::Turn(turn));
        self.view.clear_input();

        self.state = SessionState::Sending;
        self.view.set_input_enabled(false);
        self.view.set_typing(true);

        debug!(turns = self.transcript.len(), "sending transcript");
        Some(ChatRequest::from(&self.transcript))
    }

    fn complete(&mut self, result: Result<ChatResponse, TransportError>) -> SubmitOutcome {
        if self.state != SessionState::Sending {
            debug!("completion without a send in flight, ignoring");
            return SubmitOutcome::Ignored;
        }

        self.view.set_typing(false);

        let outcome = match result {
            Ok(ChatResponse::Reply { reply }) if reply.role() == Role::Assistant => {
                self.transcript.push(reply.clone());
                if !reply.content().is_empty() {
                    self.view.render(&Entry::Turn(reply.clone()));
                }
                SubmitOutcome::Replied(reply)
            }
            Ok(ChatResponse::Reply { reply }) => {
                warn!(role = %reply.role(), "relay reply is not an assistant turn");
                self.fail(CONNECTION_ERROR.to_string())
            }
            Ok(ChatResponse::Error { error }) => {
                warn!(%error, "relay reported an error");
                self.fail(format!("Error: {error}"))
            }
            Err(e) => {
                warn!("relay request failed: {e}");
                self.fail(CONNECTION_ERROR.to_string())
            }
        };

        self.state = SessionState::Idle;
        self.view.set_input_enabled(true);
        self.view.focus_input();
        outcome
    }

    fn fail(&mut self, text: String) -> SubmitOutcome {
        self.view.render(&Entry::Error(text.clone()));
        SubmitOutcome::Failed(text)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Render(Entry),
        ClearInput,
        InputEnabled(bool),
        Typing(bool),
        Focus,
        Request(ChatRequest),
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    struct RecordingView {
        log: Log,
    }

    impl ChatView for RecordingView {
        fn render(&mut self, entry: &Entry) {
            self.log.lock().unwrap().push(Event::Render(entry.clone()));
        }
        fn clear_input(&mut self) {
            self.log.lock().unwrap().push(Event::ClearInput);
        }
        fn set_input_enabled(&mut self, enabled: bool) {
            self.log.lock().unwrap().push(Event::InputEnabled(enabled));
        }
        fn set_typing(&mut self, visible: bool) {
            self.log.lock().unwrap().push(Event::Typing(visible));
        }
        fn focus_input(&mut self) {
            self.log.lock().unwrap().push(Event::Focus);
        }
    }

    struct ScriptedTransport {
        log: Log,
        results: Mutex<VecDeque<Result<ChatResponse, TransportError>>>,
    }

    #[async_trait]
    impl RelayTransport for ScriptedTransport {
        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
            self.log.lock().unwrap().push(Event::Request(request.clone()));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected relay call")
        }
    }

    fn session(
        results: Vec<Result<ChatResponse, TransportError>>,
    ) -> (Session<ScriptedTransport, RecordingView>, Log) {
        let log: Log = Arc::default();
        let transport = ScriptedTransport {
            log: log.clone(),
            results: Mutex::new(results.into()),
        };
        let view = RecordingView { log: log.clone() };
        (Session::new(transport, view), log)
    }

    fn requests(log: &Log) -> Vec<ChatRequest> {
        log.lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Request(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn hello_round_trip() {
        let (mut session, log) = session(vec![Ok(ChatResponse::reply(Turn::assistant("Hi there")))]);

        let outcome = session.submit("Hello").await;

        assert_eq!(outcome, SubmitOutcome::Replied(Turn::assistant("Hi there")));
        assert_eq!(
            session.transcript().turns(),
            [Turn::user("Hello"), Turn::assistant("Hi there")]
        );
        assert_eq!(session.state(), SessionState::Idle);

        let request = ChatRequest {
            messages: vec![Turn::user("Hello")],
        };
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Event::Render(Entry::Turn(Turn::user("Hello"))),
                Event::ClearInput,
                Event::InputEnabled(false),
                Event::Typing(true),
                Event::Request(request),
                Event::Typing(false),
                Event::Render(Entry::Turn(Turn::assistant("Hi there"))),
                Event::InputEnabled(true),
                Event::Focus,
            ]
        );
    }

    #[tokio::test]
    async fn relay_error_is_rendered_and_input_restored() {
        let (mut session, log) =
            session(vec![Ok(ChatResponse::error("Error processing your request"))]);

        let outcome = session.submit("Hello").await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed("Error: Error processing your request".to_string())
        );
        assert_eq!(session.transcript().turns(), [Turn::user("Hello")]);

        let log = log.lock().unwrap();
        let tail = &log[log.len() - 4..];
        assert_eq!(
            tail,
            [
                Event::Typing(false),
                Event::Render(Entry::Error(
                    "Error: Error processing your request".to_string()
                )),
                Event::InputEnabled(true),
                Event::Focus,
            ]
        );
    }

    #[tokio::test]
    async fn offline_shows_connection_error() {
        let (mut session, log) = session(vec![Err(TransportError::Connect(
            "connection refused".to_string(),
        ))]);

        let outcome = session.submit("Hello").await;

        assert_eq!(outcome, SubmitOutcome::Failed(CONNECTION_ERROR.to_string()));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.state(), SessionState::Idle);

        let log = log.lock().unwrap();
        assert!(log.contains(&Event::Typing(false)));
        assert!(log.contains(&Event::Render(Entry::Error(CONNECTION_ERROR.to_string()))));
        assert_eq!(log.last(), Some(&Event::Focus));
        assert_eq!(log[log.len() - 2], Event::InputEnabled(true));
    }

    #[tokio::test]
    async fn malformed_response_shows_connection_error() {
        let (mut session, _log) = session(vec![Err(TransportError::Malformed(
            "expected value at line 1".to_string(),
        ))]);

        let outcome = session.submit("Hello").await;
        assert_eq!(outcome, SubmitOutcome::Failed(CONNECTION_ERROR.to_string()));
    }

    #[tokio::test]
    async fn blank_input_never_sends() {
        let (mut session, log) = session(vec![]);

        assert_eq!(session.submit("").await, SubmitOutcome::Ignored);
        assert_eq!(session.submit("   \t\n").await, SubmitOutcome::Ignored);

        assert!(session.transcript().is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn input_is_trimmed() {
        let (mut session, log) = session(vec![Ok(ChatResponse::reply(Turn::assistant("ok")))]);

        session.submit("  Hello  \n").await;

        assert_eq!(session.transcript().turns()[0], Turn::user("Hello"));
        assert_eq!(requests(&log)[0].messages[0], Turn::user("Hello"));
    }

    #[tokio::test]
    async fn payload_is_full_history_plus_new_turn() {
        let (mut session, log) = session(vec![
            Ok(ChatResponse::reply(Turn::assistant("Hi there"))),
            Ok(ChatResponse::error("upstream down")),
            Ok(ChatResponse::reply(Turn::assistant("Fine"))),
        ]);

        session.submit("Hello").await;
        session.submit("Still there?").await;
        session.submit("How are you?").await;

        let sent = requests(&log);
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].messages, [Turn::user("Hello")]);
        assert_eq!(
            sent[1].messages,
            [
                Turn::user("Hello"),
                Turn::assistant("Hi there"),
                Turn::user("Still there?"),
            ]
        );
        // The failed turn keeps its user message in history.
        assert_eq!(
            sent[2].messages,
            [
                Turn::user("Hello"),
                Turn::assistant("Hi there"),
                Turn::user("Still there?"),
                Turn::user("How are you?"),
            ]
        );
        assert_eq!(session.transcript().len(), 5);
    }

    #[tokio::test]
    async fn empty_reply_is_kept_but_not_rendered() {
        let (mut session, log) = session(vec![Ok(ChatResponse::reply(Turn::assistant("")))]);

        let outcome = session.submit("Hello").await;

        assert_eq!(outcome, SubmitOutcome::Replied(Turn::assistant("")));
        assert_eq!(session.transcript().len(), 2);

        let renders = log
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Event::Render(_)))
            .count();
        assert_eq!(renders, 1);
    }

    #[tokio::test]
    async fn non_assistant_reply_is_rejected() {
        let (mut session, _log) = session(vec![Ok(ChatResponse::reply(Turn::user("echo")))]);

        let outcome = session.submit("Hello").await;

        assert_eq!(outcome, SubmitOutcome::Failed(CONNECTION_ERROR.to_string()));
        assert_eq!(session.transcript().turns(), [Turn::user("Hello")]);
    }

    #[test]
    fn dispatch_rejects_submit_while_sending() {
        let (mut session, log) = session(vec![]);

        let step = session.dispatch(SessionEvent::Submitted("first".to_string()));
        assert!(matches!(step, Step::Send(_)));
        assert_eq!(session.state(), SessionState::Sending);

        let step = session.dispatch(SessionEvent::Submitted("second".to_string()));
        assert_eq!(step, Step::Ignored);
        assert_eq!(session.transcript().turns(), [Turn::user("first")]);

        let step = session.dispatch(SessionEvent::Completed(Ok(ChatResponse::reply(
            Turn::assistant("answer"),
        ))));
        assert_eq!(step, Step::Done(SubmitOutcome::Replied(Turn::assistant("answer"))));
        assert_eq!(session.state(), SessionState::Idle);

        // Exactly one disable/enable pair for the accepted submit.
        let toggles: Vec<bool> = log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::InputEnabled(on) => Some(*on),
                _ => None,
            })
            .collect();
        assert_eq!(toggles, [false, true]);
    }

    #[test]
    fn stray_completion_is_ignored() {
        let (mut session, log) = session(vec![]);

        let step = session.dispatch(SessionEvent::Completed(Ok(ChatResponse::reply(
            Turn::assistant("late"),
        ))));

        assert_eq!(step, Step::Ignored);
        assert!(session.transcript().is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn entries_know_their_side() {
        assert!(!Entry::Turn(Turn::user("hi")).is_bot());
        assert!(Entry::Turn(Turn::assistant("hi")).is_bot());
        assert!(Entry::Error(CONNECTION_ERROR.to_string()).is_bot());
        assert_eq!(Entry::Error("Error: x".to_string()).text(), "Error: x");
    }
}
