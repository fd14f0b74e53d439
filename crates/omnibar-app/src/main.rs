//! Omnibar: composition root.
//!
//! Loads configuration, wires the stores, provider catalog and console host
//! into a search session, and drives it from stdin line commands.

mod cli;
mod repl;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use omnibar_core::{
    Engine, OmnibarConfig, OmnibarError, SearchEngines, Suggestion, TracingTelemetry,
    BOOKMARKS_ENGINE_ID, HISTORY_ENGINE_ID, TABS_ENGINE_ID,
};
use omnibar_providers::{CatalogData, PageEntry, ProviderSetBuilder, StaticCatalog, TabEntry};
use omnibar_session::{
    BrowserStore, InMemoryBrowserStore, InMemoryToolbarStore, LifecycleDependencies,
    LoadUrlRequest, SearchOrchestrator, SearchSession, SessionDependencies, SessionEvent,
    SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::CliArgs;
use repl::{parse_command, Command, ConsoleHost, HELP};

/// Resolve an engine id against the registry and the built-in capability
/// engines.
fn lookup_engine(registry: &SearchEngines, id: &str) -> Option<Engine> {
    match id {
        BOOKMARKS_ENGINE_ID => Some(Engine::bookmarks()),
        HISTORY_ENGINE_ID => Some(Engine::history()),
        TABS_ENGINE_ID => Some(Engine::tabs()),
        _ => registry.find(id).cloned(),
    }
}

fn load_catalog(path: &Path) -> Result<CatalogData, OmnibarError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn demo_catalog() -> CatalogData {
    CatalogData {
        history: vec![
            PageEntry::new("https://www.rust-lang.org", "Rust Programming Language"),
            PageEntry::new("https://duckduckgo.com/?q=tokio", "tokio at DuckDuckGo"),
        ],
        bookmarks: vec![
            PageEntry::new("https://docs.rs", "Docs.rs"),
            PageEntry::new("https://doc.rust-lang.org/book/", "The Rust Book"),
        ],
        open_tabs: vec![TabEntry {
            id: "tab2".to_string(),
            url: "https://crates.io".to_string(),
            title: "crates.io: Rust Package Registry".to_string(),
        }],
        recent_searches: vec!["rust borrow checker".to_string()],
        search_terms: vec!["rust async".to_string(), "rust analyzer".to_string()],
        ..CatalogData::default()
    }
}

fn print_state(state: &SessionState) {
    println!(
        "[{}] query=\"{}\" source={} visible={} providers={:?}",
        state.phase, state.query, state.engine_source, state.suggestions_visible, state.providers
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing so the configured level applies.
    let config_file = args.resolve_config_path();
    let loaded = OmnibarConfig::load(&config_file);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => OmnibarConfig::default(),
    };

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting omnibar v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    // Suggestion data.
    let catalog = match &args.catalog {
        Some(path) => {
            let data = load_catalog(path)?;
            tracing::info!(path = %path.display(), "Suggestion catalog loaded");
            data
        }
        None => demo_catalog(),
    };

    // Stores.
    let registry = config.search_engines();
    let preselected = match &args.engine {
        Some(id) => Some(
            lookup_engine(&registry, id).ok_or_else(|| OmnibarError::UnknownEngine(id.clone()))?,
        ),
        None => None,
    };
    let browser = Arc::new(InMemoryBrowserStore::new(registry.clone(), args.url.clone()));
    let toolbar = Arc::new(InMemoryToolbarStore::new());

    // Session.
    let open_tabs = catalog.open_tabs.iter().map(|t| t.id.clone()).collect();
    let host = Arc::new(ConsoleHost::new(open_tabs));
    let builder = ProviderSetBuilder::new(Arc::new(StaticCatalog::new(catalog)))
        .with_sponsored_regions(config.search.sponsored_regions.clone());
    let deps = SessionDependencies {
        browser_store: browser.clone(),
        toolbar_store: toolbar.clone(),
        engine_warmer: host.clone(),
        telemetry: Arc::new(TracingTelemetry),
        providers: builder,
    };
    let orchestrator = SearchOrchestrator::new(deps, config.suggestions);
    let session_id = orchestrator.session_id();
    let session = SearchSession::spawn(
        orchestrator,
        Duration::from_millis(config.search.query_debounce_ms),
    );
    session.attach(LifecycleDependencies::new(host.clone(), host))?;
    session.send(SessionEvent::Start {
        engine: preselected,
        private: args.private,
    })?;
    tracing::info!(session_id = %session_id, private = args.private, "Search session ready");

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state_rx = session.watch();
    let mut shown: Vec<Suggestion> = Vec::new();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = state_rx.wait_for(|s| s.is_terminated()) => break,
        };
        let Some(line) = line else {
            break;
        };

        match parse_command(&line) {
            Command::Type(text) => toolbar.type_text(&text),
            Command::Engine(id) => match lookup_engine(&browser.search_engines(), &id) {
                Some(engine) => toolbar.select_engine(engine),
                None => println!("unknown engine: {}", id),
            },
            Command::Show => {
                let state = session.state();
                print_state(&state);
                shown = if state.suggestions_visible {
                    state.providers.fetch_all(&state.query).await
                } else {
                    Vec::new()
                };
                for (i, suggestion) in shown.iter().enumerate() {
                    println!("  {:>2}. {} [{}]", i, suggestion.title, suggestion.provider_id);
                }
            }
            Command::Click(n) => match shown.get(n) {
                Some(s) => session.send(SessionEvent::SuggestionClicked(s.clone()))?,
                None => println!("no suggestion {}", n),
            },
            Command::Edit(n) => match shown.get(n) {
                Some(s) => session.send(SessionEvent::SuggestionSelectedForEdit(s.clone()))?,
                None => println!("no suggestion {}", n),
            },
            Command::Go(url) => {
                session.send(SessionEvent::LoadUrlRequested(LoadUrlRequest::url(url)))?
            }
            Command::Search(terms) => {
                session.send(SessionEvent::SearchRequested { terms, engine: None })?
            }
            Command::Tab(id) => session.send(SessionEvent::TabSelected(id))?,
            Command::Settings => session.send(SessionEvent::EngineSettingsRequested)?,
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
        }
    }

    let final_state = if session.state().is_terminated() {
        session.join().await
    } else {
        session.close().await
    };
    print_state(&final_state);
    tracing::info!(session_id = %session_id, "Omnibar shut down");

    Ok(())
}
