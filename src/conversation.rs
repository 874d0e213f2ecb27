//! Conversation history and the request cycle around it.
//!
//! Every model call carries the complete history. User turns are appended
//! before the call and stay even if the call fails; assistant turns are only
//! appended for successful replies.

use crate::chat_ui::{ChatEntry, ChatView, EntryKind, RequestId};
use crate::completion::CompletionBackend;
use crate::product::Product;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Persona given to the assistant at the start of every conversation
pub const SYSTEM_PROMPT: &str = "You are a helpful beauty and skincare advisor for L'Oréal products. Help users build routines and answer questions about products.";

/// Response budget for an ordinary chat turn
pub const CHAT_MAX_TOKENS: u32 = 500;

/// Response budget for routine generation
pub const ROUTINE_MAX_TOKENS: u32 = 800;

/// Request sentence shown to the user and appended to the routine prompt
pub const ROUTINE_REQUEST: &str =
    "Please create a skincare/beauty routine using my selected products.";

pub const THINKING_PLACEHOLDER: &str = "Thinking...";
pub const ROUTINE_PLACEHOLDER: &str = "Creating your personalized routine...";
pub const CHAT_FAILURE: &str =
    "Sorry, I couldn't get a response. Please check your API key and try again.";
pub const ROUTINE_FAILURE: &str =
    "Sorry, I couldn't generate a routine. Please check your API key and try again.";
pub const EMPTY_SELECTION_NOTICE: &str =
    "Please select at least one product before generating a routine.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only list of turns, opened by exactly one system turn
///
/// There is no length cap; turns are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Phase of the current outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl RequestState {
    fn can_advance_to(self, next: RequestState) -> bool {
        matches!(
            (self, next),
            (RequestState::Idle, RequestState::Sending)
                | (RequestState::Sending, RequestState::Succeeded)
                | (RequestState::Sending, RequestState::Failed)
                | (RequestState::Succeeded, RequestState::Idle)
                | (RequestState::Failed, RequestState::Idle)
        )
    }
}

/// How a send attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to send; no turn appended, no request made
    Ignored,
    /// A notice was shown instead of making a request
    Notice,
    /// The assistant replied and the reply was appended
    Replied(String),
    /// The request failed and an error line was shown
    Failed(String),
}

/// Build the model-facing prompt enumerating the selection
///
/// # Example
///
/// ```rust
/// use routine_builder::{routine_prompt, Product};
///
/// let products = vec![Product::new("Foam Wash", "X", "Cleanser").with_description("Gentle")];
/// let prompt = routine_prompt(&products);
/// assert!(prompt.contains("- Foam Wash (X) - Cleanser: Gentle"));
/// ```
pub fn routine_prompt(selection: &[Product]) -> String {
    let lines = selection
        .iter()
        .map(|p| {
            format!(
                "- {} ({}) - {}: {}",
                p.name,
                p.brand,
                p.category,
                p.description().unwrap_or("No description")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("User selected products:\n\n{}\n\n{}", lines, ROUTINE_REQUEST)
}

struct Exchange<'a> {
    placeholder: &'a str,
    reply_kind: EntryKind,
    failure: &'a str,
    max_tokens: u32,
}

/// Owner of the conversation history and its request cycle
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() {
/// use routine_builder::{ChatPanel, ConversationManager, CredentialSource, OpenAiClient, SYSTEM_PROMPT};
///
/// let backend = OpenAiClient::new(CredentialSource::default());
/// let mut conversation = ConversationManager::new(backend, SYSTEM_PROMPT);
/// let mut panel = ChatPanel::new();
///
/// conversation.send_user_message("  What goes first, serum or moisturizer?  ", &mut panel).await;
/// # }
/// ```
pub struct ConversationManager<B> {
    backend: B,
    history: ConversationHistory,
    state: RequestState,
}

impl<B: CompletionBackend> ConversationManager<B> {
    pub fn new(backend: B, system_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            history: ConversationHistory::new(system_prompt),
            state: RequestState::Idle,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send a chat message. Blank input is ignored.
    pub async fn send_user_message<V>(&mut self, text: &str, view: &mut V) -> SendOutcome
    where
        V: ChatView + ?Sized,
    {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        self.history.push(Turn::user(text));
        view.show_entry(ChatEntry::new(EntryKind::User, text));

        self.exchange(
            view,
            Exchange {
                placeholder: THINKING_PLACEHOLDER,
                reply_kind: EntryKind::Assistant,
                failure: CHAT_FAILURE,
                max_tokens: CHAT_MAX_TOKENS,
            },
        )
        .await
    }

    /// Ask for a routine built from `selection`
    ///
    /// The panel shows a short request while the model receives the full
    /// product enumeration. An empty selection shows a notice and sends nothing.
    pub async fn request_routine<V>(&mut self, selection: &[Product], view: &mut V) -> SendOutcome
    where
        V: ChatView + ?Sized,
    {
        if selection.is_empty() {
            view.show_entry(ChatEntry::new(EntryKind::Notice, EMPTY_SELECTION_NOTICE));
            return SendOutcome::Notice;
        }

        view.show_entry(ChatEntry::new(EntryKind::User, ROUTINE_REQUEST));
        self.history.push(Turn::user(routine_prompt(selection)));

        self.exchange(
            view,
            Exchange {
                placeholder: ROUTINE_PLACEHOLDER,
                reply_kind: EntryKind::Routine,
                failure: ROUTINE_FAILURE,
                max_tokens: ROUTINE_MAX_TOKENS,
            },
        )
        .await
    }

    async fn exchange<V>(&mut self, view: &mut V, exchange: Exchange<'_>) -> SendOutcome
    where
        V: ChatView + ?Sized,
    {
        let Self {
            backend,
            history,
            state,
        } = self;

        let id = RequestId::new();
        advance(state, RequestState::Sending);
        view.show_placeholder(id, exchange.placeholder);
        let mut in_flight = InFlight {
            id,
            state,
            view,
            settled: false,
        };

        let result = backend.complete(history.turns(), exchange.max_tokens).await;
        in_flight.view.clear_placeholder(id);

        let outcome = match result {
            Ok(reply) => {
                advance(in_flight.state, RequestState::Succeeded);
                info!(request = %id, turns = history.len(), "assistant replied");
                history.push(Turn::assistant(reply.clone()));
                in_flight
                    .view
                    .show_entry(ChatEntry::new(exchange.reply_kind, reply.clone()));
                SendOutcome::Replied(reply)
            }
            Err(e) => {
                advance(in_flight.state, RequestState::Failed);
                error!(request = %id, "completion request failed: {}", e);
                in_flight
                    .view
                    .show_entry(ChatEntry::new(EntryKind::Error, exchange.failure));
                SendOutcome::Failed(e.to_string())
            }
        };

        advance(in_flight.state, RequestState::Idle);
        in_flight.settled = true;
        outcome
    }
}

fn advance(state: &mut RequestState, next: RequestState) {
    debug_assert!(
        state.can_advance_to(next),
        "invalid request transition {:?} -> {:?}",
        state,
        next
    );
    debug!(from = ?state, to = ?next, "request state");
    *state = next;
}

/// A request between its placeholder and its outcome
///
/// If the request future is dropped before it settles, the placeholder is
/// cleared and the manager returns to `Idle` so the next send can proceed.
struct InFlight<'a, V: ChatView + ?Sized> {
    id: RequestId,
    state: &'a mut RequestState,
    view: &'a mut V,
    settled: bool,
}

impl<V: ChatView + ?Sized> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(request = %self.id, "completion request abandoned");
        self.view.clear_placeholder(self.id);
        *self.state = RequestState::Idle;
    }
}
