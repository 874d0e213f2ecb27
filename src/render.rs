//! View model for the catalog cards and the selection sidebar.
//!
//! Card positions are only valid within one render pass. Anything that must
//! survive a re-render (selection highlight, removal from the sidebar) goes
//! through [`SelectionKey`].

use crate::product::{Product, SelectionKey};
use crate::selection::{SelectionSet, SelectionUpdate};

pub const INITIAL_PLACEHOLDER: &str = "Select a category to view products";
pub const LOADING_PLACEHOLDER: &str = "Loading products…";
pub const FAILED_PLACEHOLDER: &str = "Failed to load products. Please try again.";
pub const NO_SELECTION_PLACEHOLDER: &str = "No products selected";
pub const SELECTED_BADGE: &str = "Selected";

/// What the card area currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    /// No category chosen yet
    Initial,
    /// A category was chosen and the catalog is being fetched
    Loading { category: String },
    /// The category has no products
    Empty { category: String },
    /// Fetching the catalog failed
    Failed { category: String },
    /// Cards are on screen
    Showing { category: String },
}

/// One rendered product card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub product: Product,
    pub selected: bool,
}

impl Card {
    pub fn badge(&self) -> Option<&'static str> {
        self.selected.then_some(SELECTED_BADGE)
    }
}

/// Part of a card an activation landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Card,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

/// A user interaction with a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Pointer(Target),
    Key { key: Key, focus: Target },
}

/// What an activation asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    ToggleSelection(Product),
    OpenDetails(Product),
}

impl Activation {
    /// Map an activation to the target it triggers, if any
    ///
    /// Enter or Space on a focused card behaves like a click on it. Activations
    /// on the details affordance never toggle the selection.
    pub fn resolve(self) -> Option<Target> {
        match self {
            Activation::Pointer(target) => Some(target),
            Activation::Key {
                key: Key::Enter | Key::Space,
                focus,
            } => Some(focus),
            Activation::Key { .. } => None,
        }
    }
}

/// The card list plus its placeholder state
///
/// # Example
///
/// ```rust
/// use routine_builder::{Activation, CardAction, CatalogView, Product, SelectionSet, Target};
///
/// let mut view = CatalogView::new();
/// let products = vec![Product::new("Foam Wash", "X", "Cleanser")];
/// view.render("Cleanser", products, &SelectionSet::new());
///
/// let action = view.activate(0, Activation::Pointer(Target::Details));
/// assert!(matches!(action, Some(CardAction::OpenDetails(_))));
/// ```
#[derive(Debug, Clone)]
pub struct CatalogView {
    state: CatalogState,
    cards: Vec<Card>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            state: CatalogState::Initial,
            cards: Vec::new(),
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn show_loading(&mut self, category: &str) {
        self.cards.clear();
        self.state = CatalogState::Loading {
            category: category.to_string(),
        };
    }

    pub fn show_failed(&mut self, category: &str) {
        self.cards.clear();
        self.state = CatalogState::Failed {
            category: category.to_string(),
        };
    }

    /// Replace the cards, marking every product already in `selection`
    pub fn render(&mut self, category: &str, products: Vec<Product>, selection: &SelectionSet) {
        self.cards = products
            .into_iter()
            .map(|product| Card {
                selected: selection.contains(&product.key()),
                product,
            })
            .collect();
        self.state = if self.cards.is_empty() {
            CatalogState::Empty {
                category: category.to_string(),
            }
        } else {
            CatalogState::Showing {
                category: category.to_string(),
            }
        };
    }

    /// Informational text shown instead of cards, if any
    pub fn placeholder(&self) -> Option<String> {
        match &self.state {
            CatalogState::Initial => Some(INITIAL_PLACEHOLDER.to_string()),
            CatalogState::Loading { .. } => Some(LOADING_PLACEHOLDER.to_string()),
            CatalogState::Empty { category } => {
                Some(format!("No products found for \"{}\".", category))
            }
            CatalogState::Failed { .. } => Some(FAILED_PLACEHOLDER.to_string()),
            CatalogState::Showing { .. } => None,
        }
    }

    /// Resolve an activation on the card at `index` of the current render pass
    pub fn activate(&self, index: usize, activation: Activation) -> Option<CardAction> {
        let card = self.cards.get(index)?;
        match activation.resolve()? {
            Target::Card => Some(CardAction::ToggleSelection(card.product.clone())),
            Target::Details => Some(CardAction::OpenDetails(card.product.clone())),
        }
    }

    /// Mark or unmark the card showing `key`, if it is rendered
    pub fn set_selected(&mut self, key: &SelectionKey, selected: bool) {
        for card in self.cards.iter_mut().filter(|c| c.product.has_key(key)) {
            card.selected = selected;
        }
    }

    /// Bring every rendered card in line with a selection update
    pub fn apply(&mut self, update: &SelectionUpdate) {
        for card in &mut self.cards {
            card.selected = update.is_selected(&card.product.key());
        }
    }
}

/// One entry in the selection sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub key: SelectionKey,
    pub category: String,
}

/// The selection sidebar as it should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub entries: Vec<SidebarEntry>,
    pub clear_enabled: bool,
}

impl Sidebar {
    pub fn from_selection(selection: &SelectionSet) -> Self {
        Self {
            entries: selection
                .iter()
                .map(|p| SidebarEntry {
                    key: p.key(),
                    category: p.category.clone(),
                })
                .collect(),
            clear_enabled: !selection.is_empty(),
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.entries.is_empty().then_some(NO_SELECTION_PLACEHOLDER)
    }
}
