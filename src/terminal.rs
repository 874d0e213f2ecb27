use crate::modal::ProductModal;
use crate::render::{CatalogView, Key, Sidebar};
use colored::*;
use console::{Key as TermKey, Term};

/// Painter for the non-chat parts of the terminal UI
pub struct Screen {
    term: Term,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn print_welcome(&self) {
        let _ = self.term.clear_screen();
        println!("{}", "╔═══════════════════════════════════════════════════╗".bright_magenta());
        println!("{}", "║          ✨ Product Picker & Routine Advisor ✨    ║".bright_magenta());
        println!("{}", "╚═══════════════════════════════════════════════════╝".bright_magenta());
        println!();
        println!("{}", "How it works:".yellow());
        println!("  • {} - Pick a category and select products", "Browse".cyan());
        println!("  • {} - Review or remove what you picked", "Selection".cyan());
        println!("  • {} - Ask the advisor anything", "Chat".cyan());
        println!("  • {} - Get a routine for your selection", "Generate routine".cyan());
        println!();
        println!("{}", "Your selection is saved between sessions.".dimmed());
        println!("{}", "─".repeat(60).dimmed());
        println!();
    }

    pub fn print_catalog(&self, view: &CatalogView) {
        println!();
        if let Some(placeholder) = view.placeholder() {
            println!("  {}", placeholder.dimmed());
            println!();
            return;
        }
        for card in view.cards() {
            let marker = if card.selected { "●".green() } else { "○".dimmed() };
            let badge = card
                .badge()
                .map(|b| format!(" [{}]", b).green().bold().to_string())
                .unwrap_or_default();
            println!(
                "  {} {} {}{}",
                marker,
                card.product.name.bold(),
                card.product.brand.dimmed(),
                badge
            );
        }
        println!();
    }

    pub fn print_sidebar(&self, sidebar: &Sidebar) {
        println!("\n{}", "Selected products".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        if let Some(placeholder) = sidebar.placeholder() {
            println!("  {}", placeholder.dimmed());
        }
        for entry in &sidebar.entries {
            println!(
                "  • {} {} {}",
                entry.key.name.bold(),
                entry.key.brand.dimmed(),
                format!("({})", entry.category).dimmed()
            );
        }
        println!();
    }

    pub fn print_modal(&self, modal: &ProductModal) {
        let Some(content) = modal.content().filter(|_| modal.is_visible()) else {
            return;
        };
        println!();
        println!("{}", "┌──────────────────────────────────────────────┐".bright_blue());
        println!("  {}", content.title.bold());
        println!("  {}", content.brand.italic());
        if !content.image.is_empty() {
            println!("  {} {}", "Image:".dimmed(), content.image.underline());
        }
        println!();
        println!("  {}", content.description);
        println!("{}", "└──────────────────────────────────────────────┘".bright_blue());
        println!("  {}", "[ Close ]  (Enter or Esc)".cyan());
    }

    /// Block for one key press while a modal is shown
    pub fn read_modal_key(&self) -> Key {
        match self.term.read_key() {
            Ok(TermKey::Escape) => Key::Escape,
            Ok(TermKey::Enter) => Key::Enter,
            Ok(TermKey::Char(' ')) => Key::Space,
            Ok(_) => Key::Other,
            // Without a readable terminal there is no way to keep the modal up.
            Err(_) => Key::Escape,
        }
    }
}
