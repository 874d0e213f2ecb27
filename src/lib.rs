/*!
A product picker with a conversational routine advisor.

Users filter a static product catalog by category, select products into a
working set that survives restarts, inspect product details, and ask a chat
completion model for a routine built from their selection.

## Quick Start

```rust,no_run
# async fn example() {
use routine_builder::{
    Activation, CatalogLoader, CatalogSource, ChatPanel, ConversationManager, CredentialSource,
    MemoryStore, OpenAiClient, Session, Target, SYSTEM_PROMPT,
};

let loader = CatalogLoader::new(CatalogSource::parse("products.json"));
let backend = OpenAiClient::new(CredentialSource::Env("OPENAI_API_KEY".to_string()));
let conversation = ConversationManager::new(backend, SYSTEM_PROMPT);
let mut session = Session::new(loader, MemoryStore::new(), conversation);

session.choose_category("Cleanser").await;
session.activate_card(0, Activation::Pointer(Target::Card));

let mut panel = ChatPanel::new();
session.generate_routine(&mut panel).await;
# }
```

## Main Components

- [`SelectionManager`]: the selected products, persisted after every change
- [`CatalogLoader`] and [`filter_by_category`]: the product source
- [`CatalogView`] and [`Sidebar`]: what the card list and sidebar should show
- [`ProductModal`]: the product detail overlay
- [`ConversationManager`]: chat history and the completion request cycle
- [`OpenAiClient`]: the HTTP [`CompletionBackend`]
- [`ChatPanel`] and [`TerminalChat`]: [`ChatView`] implementations
*/

pub use catalog::{categories, filter_by_category, CatalogLoader, CatalogSource};
pub use chat_ui::{ChatEntry, ChatPanel, ChatView, EntryKind, PanelLine, RequestId, TerminalChat};
pub use completion::{CompletionBackend, CredentialSource, OpenAiClient, COMPLETIONS_ENDPOINT};
pub use config::Config;
pub use conversation::{
    routine_prompt, ConversationHistory, ConversationManager, RequestState, Role, SendOutcome,
    Turn, CHAT_MAX_TOKENS, ROUTINE_MAX_TOKENS, SYSTEM_PROMPT,
};
pub use error::{Error, Result};
pub use modal::{ModalContent, ModalFocus, ModalTarget, ProductModal};
pub use product::{CatalogPayload, Product, SelectionKey};
pub use render::{Activation, Card, CardAction, CatalogState, CatalogView, Key, Sidebar, Target};
pub use request::{CompletionRequest, CompletionResponse};
pub use selection::{SelectionChange, SelectionManager, SelectionSet, SelectionUpdate, Toggled};
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore, SelectionStore, SELECTION_KEY};

// Modules
pub mod catalog;
pub mod chat_ui;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod modal;
pub mod product;
pub mod render;
pub mod request;
pub mod selection;
pub mod session;
pub mod store;
pub mod terminal;
