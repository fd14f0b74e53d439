//! Line commands for the interactive session and the console host that
//! stands in for a browser UI.

use std::io::Write;

use async_trait::async_trait;
use omnibar_core::OmnibarError;
use omnibar_session::{EngineWarmer, GatewayError, LoadUrlOrSearch, Navigator, UseCaseGateway};

pub const HELP: &str = "\
commands:
  type <text>      edit the query
  engine <id>      pick a search engine for this session
  show             list current suggestions
  click <n>        click suggestion n
  edit <n>         copy suggestion n into the query
  go <url>         load a URL
  search <terms>   search with the current engine
  tab <id>         switch to an open tab
  settings         open engine settings
  quit             abandon the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Engine(String),
    Show,
    Click(usize),
    Edit(usize),
    Go(String),
    Search(String),
    Tab(String),
    Settings,
    Quit,
    Help,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word, rest) {
        // An empty `type` clears the query.
        ("type", text) => Command::Type(text.to_string()),
        ("engine", id) if !id.is_empty() => Command::Engine(id.to_string()),
        ("show", _) => Command::Show,
        ("click", n) => n.parse().map(Command::Click).unwrap_or(Command::Help),
        ("edit", n) => n.parse().map(Command::Edit).unwrap_or(Command::Help),
        ("go", url) if !url.is_empty() => Command::Go(url.to_string()),
        ("search", terms) if !terms.is_empty() => Command::Search(terms.to_string()),
        ("tab", id) if !id.is_empty() => Command::Tab(id.to_string()),
        ("settings", _) => Command::Settings,
        ("quit" | "exit", _) => Command::Quit,
        _ => Command::Help,
    }
}

/// Host capabilities that report to the terminal.
///
/// Tab switches are only accepted for tabs the host knows to be open.
#[derive(Debug, Default, Clone)]
pub struct ConsoleHost {
    open_tabs: Vec<String>,
}

impl ConsoleHost {
    pub fn new(open_tabs: Vec<String>) -> Self {
        Self { open_tabs }
    }

    fn say(&self, line: &str) -> Result<(), GatewayError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line).map_err(OmnibarError::from)?;
        Ok(())
    }
}

#[async_trait]
impl UseCaseGateway for ConsoleHost {
    async fn load_url_or_search(&self, request: LoadUrlOrSearch) -> Result<(), GatewayError> {
        if request.term.trim().is_empty() {
            return Err(GatewayError::Rejected("nothing to load".to_string()));
        }
        if request.force_search {
            let engine = request
                .engine
                .as_ref()
                .map(|e| e.name.as_str())
                .unwrap_or("-");
            self.say(&format!(
                "=> search \"{}\" with {} (private: {})",
                request.term, engine, request.private
            ))
        } else {
            self.say(&format!("=> load {} (private: {})", request.term, request.private))
        }
    }

    async fn select_tab(&self, tab_id: &str) -> Result<(), GatewayError> {
        if !self.open_tabs.iter().any(|id| id == tab_id) {
            return Err(GatewayError::Rejected(format!("no open tab {}", tab_id)));
        }
        self.say(&format!("=> switch to tab {}", tab_id))
    }

    async fn navigate_to_engine_settings(&self) -> Result<(), GatewayError> {
        self.say("=> open search engine settings")
    }
}

impl Navigator for ConsoleHost {
    fn show_browser(&self) -> Result<(), GatewayError> {
        tracing::debug!("Browser surface shown");
        Ok(())
    }
}

#[async_trait]
impl EngineWarmer for ConsoleHost {
    async fn warm_up(&self, private: bool) -> Result<(), GatewayError> {
        tracing::debug!(private, "Browsing engine warmed up");
        Ok(())
    }
}
