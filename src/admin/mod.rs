//! The interactive collection administrator.

mod create;
mod delete;
pub mod render;

use anyhow::Result;
use std::future::Future;
use std::str::FromStr;
use tracing::{info, warn};

use crate::config::{AdminSettings, QdrantConfig};
use crate::console::{PromptError, Terminal};
use crate::qdrant::{CollectionService, CollectionSummary};
use crate::selection::{parse_selection, Selection, SelectionMode};

pub use create::{parse_distance_choice, parse_vector_size, VectorSizeError, DEFAULT_VECTOR_SIZE};
pub use delete::BatchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    List,
    Create,
    Details,
    Delete,
    Quit,
}

impl FromStr for MenuAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuAction::List),
            "2" => Ok(MenuAction::Create),
            "3" => Ok(MenuAction::Details),
            "4" => Ok(MenuAction::Delete),
            "5" => Ok(MenuAction::Quit),
            _ => Err(()),
        }
    }
}

const MENU: [&str; 5] = [
    "1. List collections",
    "2. Create collection",
    "3. Show details",
    "4. Delete collections",
    "5. Quit",
];

/// Drives the menu against a [`CollectionService`], talking to the user through a [`Terminal`].
pub struct Administrator<S, T> {
    service: S,
    terminal: T,
    settings: AdminSettings,
}

impl<S: CollectionService, T: Terminal> Administrator<S, T> {
    pub fn new(service: S, terminal: T, settings: AdminSettings) -> Self {
        Self {
            service,
            terminal,
            settings,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn say(&mut self, line: impl AsRef<str>) {
        self.terminal.write_line(line.as_ref());
    }

    fn say_all(&mut self, lines: Vec<String>) {
        for line in lines {
            self.terminal.write_line(&line);
        }
    }

    /// Run a remote call, giving up early if the user interrupts.
    async fn guarded<F: Future>(&self, call: F) -> Result<F::Output, PromptError> {
        tokio::select! {
            output = call => Ok(output),
            _ = self.terminal.interrupted() => Err(PromptError::Interrupted),
        }
    }

    /// Show where we are connecting and whether requests will be authenticated.
    pub fn print_banner(&mut self, config: &QdrantConfig) {
        self.say_all(render::header("QDRANT COLLECTION MANAGER"));
        self.say("Configuration:");
        self.say(format!("  • Host: {}:{}", config.host, config.port));
        self.say(format!(
            "  • User: {}",
            config.username.as_deref().unwrap_or("not configured")
        ));
        let auth = if config.credentials().is_some() {
            "configured"
        } else {
            "not configured"
        };
        self.say(format!("  • Auth: {auth}"));

        if config.credentials().is_none() {
            warn!("credentials not fully configured, requests will be unauthenticated");
            self.say("Warning: credentials not fully configured; requests will be unauthenticated");
        }
    }

    /// Check the service once; no retries.
    pub async fn test_connection(&mut self) -> bool {
        self.say("Testing connection...");
        match self.service.health_check().await {
            Ok(service) => {
                let version = service
                    .version
                    .map(|v| format!(" (version {v})"))
                    .unwrap_or_default();
                info!("connected to qdrant{version}");
                self.say(format!("Connected to Qdrant{version}"));
                if let Some(title) = service.title.filter(|t| !t.is_empty()) {
                    self.say(format!("  • Service: {title}"));
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "connection test failed");
                self.say(format!("Cannot connect to Qdrant: {e}"));
                false
            }
        }
    }

    /// Report how many collections exist and return the count.
    pub async fn report_collection_count(&mut self) -> Result<usize> {
        let collections = self.service.list_collections().await?;
        self.say(format!(
            "Connection OK. Collections: {}",
            collections.len()
        ));
        Ok(collections.len())
    }

    /// Run the menu loop until the user quits, interrupts at the menu, or input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let action = match self.prompt_menu().await {
                Ok(action) => action,
                Err(PromptError::Interrupted) | Err(PromptError::Closed) => {
                    self.say("Exiting...");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if action == MenuAction::Quit {
                break;
            }

            match self.perform(action).await {
                Ok(()) => {}
                Err(PromptError::Interrupted) | Err(PromptError::Closed) => {
                    self.say("Operation cancelled by user");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.say("Goodbye!");
        Ok(())
    }

    async fn prompt_menu(&mut self) -> Result<MenuAction, PromptError> {
        self.say("");
        self.say("MAIN MENU");
        self.say(render::rule());
        for entry in MENU {
            self.say(entry);
        }
        self.say(render::rule());

        loop {
            let choice = self.terminal.prompt("Select an option (1-5): ").await?;
            match choice.parse() {
                Ok(action) => return Ok(action),
                Err(()) => self.say("Please select a valid option (1-5)"),
            }
        }
    }

    async fn perform(&mut self, action: MenuAction) -> Result<(), PromptError> {
        match action {
            MenuAction::List => {
                self.say("Fetching collections...");
                if let Some(collections) = self.fetch_collections().await? {
                    self.say_all(render::listing(&collections));
                }
                Ok(())
            }
            MenuAction::Create => self.create().await,
            MenuAction::Details => self.inspect().await,
            MenuAction::Delete => self.delete().await,
            MenuAction::Quit => Ok(()),
        }
    }

    /// Fresh listing from the service; `None` (already reported) when the call fails.
    async fn fetch_collections(&mut self) -> Result<Option<Vec<CollectionSummary>>, PromptError> {
        match self.guarded(self.service.list_collections()).await? {
            Ok(collections) => Ok(Some(collections)),
            Err(e) => {
                warn!(error = %e, "listing collections failed");
                self.say(format!("Could not fetch collections: {e}"));
                Ok(None)
            }
        }
    }

    /// Fetch, display, and return a non-empty listing to select from.
    async fn listing_for(
        &mut self,
        mode: SelectionMode,
    ) -> Result<Option<Vec<CollectionSummary>>, PromptError> {
        let Some(collections) = self.fetch_collections().await? else {
            return Ok(None);
        };
        if collections.is_empty() {
            self.say(format!("No collections to {}", mode.verb()));
            return Ok(None);
        }
        self.say_all(render::listing(&collections));
        Ok(Some(collections))
    }

    /// Prompt until the input selects at least one collection, or the user cancels.
    async fn prompt_selection(
        &mut self,
        collections: &[CollectionSummary],
        mode: SelectionMode,
    ) -> Result<Option<Vec<String>>, PromptError> {
        let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();

        self.say(format!("Selection options to {}:", mode.verb()));
        self.say("• Single number: 1");
        self.say("• Several numbers: 1,3,5");
        if mode == SelectionMode::Delete {
            self.say("• Every collection: all or *");
        }
        self.say("• Back to menu: q or exit");

        loop {
            let input = self
                .terminal
                .prompt(&format!("Collections to {}: ", mode.verb()))
                .await?;
            match parse_selection(&input, &names, mode) {
                Ok(Selection::Cancel) => return Ok(None),
                Ok(Selection::Names(selected)) => return Ok(Some(selected)),
                Err(e) => self.say(e.to_string()),
            }
        }
    }

    async fn inspect(&mut self) -> Result<(), PromptError> {
        let Some(collections) = self.listing_for(SelectionMode::Inspect).await? else {
            return Ok(());
        };
        let Some(selected) = self
            .prompt_selection(&collections, SelectionMode::Inspect)
            .await?
        else {
            return Ok(());
        };

        for name in selected {
            self.say("");
            match self.guarded(self.service.collection_info(&name)).await? {
                Ok(info) => self.say_all(render::details(&name, &info)),
                Err(e) => {
                    warn!(collection = %name, error = %e, "fetching details failed");
                    self.say(format!("Could not fetch details of '{name}': {e}"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_action_parsing() {
        assert_eq!("1".parse(), Ok(MenuAction::List));
        assert_eq!(" 4 ".parse(), Ok(MenuAction::Delete));
        assert_eq!("5".parse(), Ok(MenuAction::Quit));
        assert_eq!("6".parse::<MenuAction>(), Err(()));
        assert_eq!("list".parse::<MenuAction>(), Err(()));
    }
}
