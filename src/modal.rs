use crate::product::Product;
use crate::render::Key;
use tracing::debug;

/// Fields shown in the detail overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub brand: String,
    pub image: String,
    pub image_alt: String,
    pub description: String,
}

impl ModalContent {
    fn from_product(product: &Product) -> Self {
        let image_alt = if product.name.is_empty() {
            "Product image".to_string()
        } else {
            product.name.clone()
        };
        Self {
            title: product.name.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            image_alt,
            description: product.description_or_placeholder().to_string(),
        }
    }
}

/// Where keyboard focus sits while the modal is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFocus {
    None,
    CloseControl,
}

/// Pointer targets inside the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTarget {
    Overlay,
    CloseControl,
    Content,
}

/// Detail overlay for a single product
///
/// The Escape listener is a flag rather than a list of handlers, so repeated
/// open/close cycles can never stack listeners.
///
/// # Example
///
/// ```rust
/// use routine_builder::{Key, Product, ProductModal};
///
/// let mut modal = ProductModal::new();
/// modal.open(&Product::new("Foam Wash", "X", "Cleanser"));
/// assert!(modal.is_visible());
///
/// modal.handle_key(Key::Escape);
/// assert!(!modal.is_visible());
/// ```
#[derive(Debug, Clone)]
pub struct ProductModal {
    content: Option<ModalContent>,
    visible: bool,
    focus: ModalFocus,
    escape_listener: bool,
}

impl Default for ProductModal {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductModal {
    pub fn new() -> Self {
        Self {
            content: None,
            visible: false,
            focus: ModalFocus::None,
            escape_listener: false,
        }
    }

    pub fn open(&mut self, product: &Product) {
        self.content = Some(ModalContent::from_product(product));
        self.visible = true;
        self.focus = ModalFocus::CloseControl;
        self.escape_listener = true;
        debug!(product = %product.key(), "opened product details");
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.focus = ModalFocus::None;
        self.escape_listener = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the overlay is exposed to assistive technology
    pub fn aria_hidden(&self) -> bool {
        !self.visible
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    pub fn focus(&self) -> ModalFocus {
        self.focus
    }

    pub fn has_escape_listener(&self) -> bool {
        self.escape_listener
    }

    /// Keyboard input while the modal is shown. Returns true if it closed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let dismiss = match key {
            Key::Escape => self.escape_listener,
            Key::Enter | Key::Space => self.visible && self.focus == ModalFocus::CloseControl,
            Key::Other => false,
        };
        if dismiss {
            self.close();
        }
        dismiss
    }

    /// Pointer input while the modal is shown. Returns true if it closed.
    pub fn handle_pointer(&mut self, target: ModalTarget) -> bool {
        let dismiss = self.visible && target != ModalTarget::Content;
        if dismiss {
            self.close();
        }
        dismiss
    }
}
