pub mod admin;
pub mod config;
pub mod console;
pub mod qdrant;
pub mod selection;

pub use admin::{Administrator, BatchOutcome};
pub use config::{AdminSettings, Config, ConfigError, QdrantConfig};
pub use console::{PromptError, StdTerminal, Terminal};
pub use qdrant::{CollectionService, QdrantClient, QdrantError};
pub use selection::{parse_selection, Selection, SelectionMode};
