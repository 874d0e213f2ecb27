use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use routine_builder::terminal::Screen;
use routine_builder::{
    Activation, CatalogLoader, CompletionBackend, Config, ConversationManager, Error, FileStore,
    KeyValueStore, MemoryStore, Result, SendOutcome, Session, Target, TerminalChat, SYSTEM_PROMPT,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

type AppSession<B> = Session<Box<dyn KeyValueStore>, B>;

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Other(format!("Prompt failed: {}", e))
}

/// Pick a category, then work with its cards until the user goes back
async fn browse<B: CompletionBackend>(
    session: &mut AppSession<B>,
    screen: &Screen,
    theme: &ColorfulTheme,
) -> Result<()> {
    let categories = match session.categories().await {
        Ok(categories) if !categories.is_empty() => categories,
        Ok(_) => {
            println!("{}", "The catalog has no products.".yellow());
            return Ok(());
        }
        Err(_) => {
            screen.print_catalog(session.catalog());
            return Ok(());
        }
    };

    let Some(choice) = Select::with_theme(theme)
        .with_prompt("Choose a category")
        .items(&categories)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?
    else {
        return Ok(());
    };

    let category = &categories[choice];
    screen.print_catalog(session.show_loading(category));
    session.load_category(category).await;

    loop {
        screen.print_catalog(session.catalog());
        let cards = session.catalog().cards();
        if cards.is_empty() {
            return Ok(());
        }

        let mut items: Vec<String> = cards
            .iter()
            .map(|card| {
                let badge = card.badge().map(|b| format!("  [{}]", b)).unwrap_or_default();
                format!("{} - {}{}", card.product.name, card.product.brand, badge)
            })
            .collect();
        let back = items.len();
        items.push("← Back".to_string());

        let Some(index) = Select::with_theme(theme)
            .with_prompt("Products")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
        else {
            return Ok(());
        };
        if index == back {
            return Ok(());
        }

        let action = Select::with_theme(theme)
            .with_prompt(items[index].as_str())
            .items(&["Toggle selection", "View details", "Cancel"])
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        match action {
            Some(0) => {
                session.activate_card(index, Activation::Pointer(Target::Card));
                screen.print_sidebar(session.sidebar());
            }
            Some(1) => {
                session.activate_card(index, Activation::Pointer(Target::Details));
                while session.modal().is_visible() {
                    screen.print_modal(session.modal());
                    let key = screen.read_modal_key();
                    session.modal_mut().handle_key(key);
                }
            }
            _ => {}
        }
    }
}

/// Show the sidebar and offer to remove entries from it
fn review_selection<B: CompletionBackend>(
    session: &mut AppSession<B>,
    screen: &Screen,
    theme: &ColorfulTheme,
) -> Result<()> {
    loop {
        screen.print_sidebar(session.sidebar());
        let keys: Vec<_> = session
            .sidebar()
            .entries
            .iter()
            .map(|entry| entry.key.clone())
            .collect();
        if keys.is_empty() {
            return Ok(());
        }

        let mut items: Vec<String> = keys.iter().map(|key| format!("Remove {}", key)).collect();
        items.push("← Back".to_string());

        match Select::with_theme(theme)
            .with_prompt("Selected products")
            .items(&items)
            .default(keys.len())
            .interact_opt()
            .map_err(prompt_error)?
        {
            Some(index) if index < keys.len() => {
                let key = &keys[index];
                session.remove_selected(&key.name, &key.brand);
            }
            _ => return Ok(()),
        }
    }
}

/// Chat until the user submits an empty line
async fn chat<B: CompletionBackend>(
    session: &mut AppSession<B>,
    view: &mut TerminalChat,
    theme: &ColorfulTheme,
) -> Result<()> {
    println!("{}", "Ask the advisor anything. Submit an empty line to go back.".dimmed());
    loop {
        let input: String = Input::with_theme(theme)
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;

        if session.send_message(&input, view).await == SendOutcome::Ignored {
            return Ok(());
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("routine_builder=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    let store: Box<dyn KeyValueStore> = match &config.store_path {
        Some(path) => Box::new(FileStore::new(path)),
        None => {
            warn!("no home directory found; selections will not be saved");
            Box::new(MemoryStore::new())
        }
    };
    let conversation = ConversationManager::new(config.completion_client(), SYSTEM_PROMPT);
    let mut session = Session::new(CatalogLoader::new(config.catalog.clone()), store, conversation);

    let theme = ColorfulTheme::default();
    let screen = Screen::new();
    let mut chat_view = TerminalChat::new();

    screen.print_welcome();
    screen.print_catalog(session.catalog());
    screen.print_sidebar(session.sidebar());

    let menu = [
        "Browse a category",
        "View selected products",
        "Chat with the advisor",
        "Generate routine",
        "Clear all selections",
        "Quit",
    ];

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&menu)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        match choice {
            Some(0) => browse(&mut session, &screen, &theme).await?,
            Some(1) => review_selection(&mut session, &screen, &theme)?,
            Some(2) => chat(&mut session, &mut chat_view, &theme).await?,
            Some(3) => {
                session.generate_routine(&mut chat_view).await;
                println!();
            }
            Some(4) => {
                if !session.sidebar().clear_enabled {
                    println!("{}", "Nothing to clear.".dimmed());
                    continue;
                }
                let confirmed = Confirm::with_theme(&theme)
                    .with_prompt("Clear all saved selections?")
                    .default(false)
                    .interact()
                    .map_err(prompt_error)?;
                if confirmed {
                    session.clear_selection();
                    screen.print_sidebar(session.sidebar());
                }
            }
            _ => {
                println!("\n{}", "👋 Goodbye! Your selection has been saved.".yellow());
                break;
            }
        }
    }
    Ok(())
}
