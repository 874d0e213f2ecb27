//! One browsing session: catalog, selection, detail modal and conversation.
//!
//! All mutable state lives on [`Session`], which the front end owns and passes
//! by reference.

use crate::catalog::{categories, filter_by_category, CatalogLoader};
use crate::chat_ui::ChatView;
use crate::completion::CompletionBackend;
use crate::conversation::{ConversationManager, SendOutcome};
use crate::error::Result;
use crate::modal::ProductModal;
use crate::render::{Activation, CardAction, CatalogView, Sidebar};
use crate::selection::{SelectionChange, SelectionManager, SelectionUpdate};
use crate::store::KeyValueStore;
use tracing::error;

pub struct Session<S, B> {
    loader: CatalogLoader,
    catalog: CatalogView,
    sidebar: Sidebar,
    selection: SelectionManager<S>,
    modal: ProductModal,
    conversation: ConversationManager<B>,
}

impl<S: KeyValueStore, B: CompletionBackend> Session<S, B> {
    pub fn new(loader: CatalogLoader, store: S, conversation: ConversationManager<B>) -> Self {
        let selection = SelectionManager::new(store);
        let sidebar = Sidebar::from_selection(selection.selection());
        Self {
            loader,
            catalog: CatalogView::new(),
            sidebar,
            selection,
            modal: ProductModal::new(),
            conversation,
        }
    }

    pub fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn selection(&self) -> &SelectionManager<S> {
        &self.selection
    }

    pub fn modal(&self) -> &ProductModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ProductModal {
        &mut self.modal
    }

    pub fn conversation(&self) -> &ConversationManager<B> {
        &self.conversation
    }

    /// Categories currently present in the catalog
    ///
    /// A failed fetch also switches the catalog view to its error placeholder.
    pub async fn categories(&mut self) -> Result<Vec<String>> {
        match self.loader.fetch_all().await {
            Ok(products) => Ok(categories(&products)),
            Err(e) => {
                error!("error listing categories: {}", e);
                self.catalog.show_failed("");
                Err(e)
            }
        }
    }

    /// Mark `category` as loading and return the view to paint meanwhile
    pub fn show_loading(&mut self, category: &str) -> &CatalogView {
        self.catalog.show_loading(category);
        &self.catalog
    }

    /// Re-fetch the catalog and show the products of `category`
    ///
    /// Fetch failures are shown as the error placeholder and never propagate.
    pub async fn choose_category(&mut self, category: &str) {
        self.show_loading(category);
        self.load_category(category).await;
    }

    /// Fetch the catalog and fill the view for `category`
    pub async fn load_category(&mut self, category: &str) {
        match self.loader.fetch_all().await {
            Ok(products) => {
                let filtered = filter_by_category(&products, category);
                self.catalog
                    .render(category, filtered, self.selection.selection());
            }
            Err(e) => {
                error!("error loading products: {}", e);
                self.catalog.show_failed(category);
            }
        }
    }

    /// Handle an activation on the card at `index` of the current render pass
    pub fn activate_card(&mut self, index: usize, activation: Activation) -> Option<CardAction> {
        let action = self.catalog.activate(index, activation)?;
        match &action {
            CardAction::ToggleSelection(product) => {
                let update = self.selection.toggle(product);
                if let SelectionChange::Added(key) | SelectionChange::Removed(key) = &update.change
                {
                    self.catalog.set_selected(key, update.is_selected(key));
                }
                self.refresh_sidebar();
            }
            CardAction::OpenDetails(product) => self.modal.open(product),
        }
        Some(action)
    }

    /// Remove an entry from the sidebar by its (name, brand)
    pub fn remove_selected(&mut self, name: &str, brand: &str) -> SelectionUpdate {
        let update = self.selection.remove_by_key(name, brand);
        self.catalog.apply(&update);
        self.refresh_sidebar();
        update
    }

    /// Empty the selection. The caller has already asked the user to confirm.
    pub fn clear_selection(&mut self) -> SelectionUpdate {
        let update = self.selection.clear();
        self.catalog.apply(&update);
        self.refresh_sidebar();
        update
    }

    pub async fn send_message<V>(&mut self, text: &str, view: &mut V) -> SendOutcome
    where
        V: ChatView + ?Sized,
    {
        self.conversation.send_user_message(text, view).await
    }

    pub async fn generate_routine<V>(&mut self, view: &mut V) -> SendOutcome
    where
        V: ChatView + ?Sized,
    {
        self.conversation
            .request_routine(self.selection.selection().as_slice(), view)
            .await
    }

    fn refresh_sidebar(&mut self) {
        self.sidebar = Sidebar::from_selection(self.selection.selection());
    }
}
