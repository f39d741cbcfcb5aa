use thiserror::Error;
use tracing::{info, warn};

use super::{render, Administrator};
use crate::console::{confirm, PromptError, Terminal};
use crate::qdrant::{CollectionService, Distance, VectorParams};

pub const DEFAULT_VECTOR_SIZE: u64 = 1536;

/// Sizes above this need an explicit confirmation.
const LARGE_VECTOR_SIZE: u64 = 65536;

const SIZE_HINTS: [(&str, &str); 4] = [
    ("text-embedding-3-large", "3072"),
    ("text-embedding-3-small", "1536"),
    ("text-embedding-ada-002", "1536"),
    ("sentence-transformers (typical)", "384 or 768"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorSizeError {
    #[error("Please enter a valid number")]
    NotANumber,

    #[error("The size must be greater than 0")]
    NotPositive,
}

/// Empty input selects [`DEFAULT_VECTOR_SIZE`].
pub fn parse_vector_size(input: &str) -> Result<u64, VectorSizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(DEFAULT_VECTOR_SIZE);
    }
    let size: i64 = input.parse().map_err(|_| VectorSizeError::NotANumber)?;
    if size <= 0 {
        return Err(VectorSizeError::NotPositive);
    }
    Ok(size as u64)
}

/// Menu number (1-3) or metric name; empty input selects Cosine.
pub fn parse_distance_choice(input: &str) -> Option<Distance> {
    match input.trim() {
        "" | "1" => Some(Distance::Cosine),
        "2" => Some(Distance::Euclid),
        "3" => Some(Distance::Dot),
        other => match other.parse() {
            Ok(Distance::Manhattan) | Err(_) => None,
            Ok(distance) => Some(distance),
        },
    }
}

impl<S: CollectionService, T: Terminal> Administrator<S, T> {
    pub(super) async fn create(&mut self) -> Result<(), PromptError> {
        self.say("New collection");
        self.say(render::rule());

        let name = self.prompt_new_name().await?;
        let size = self.prompt_vector_size().await?;
        let distance = self.prompt_distance().await?;

        self.say("");
        self.say("Summary:");
        self.say(format!("• Name: {name}"));
        self.say(format!("• Vector size: {size}"));
        self.say(format!("• Distance: {distance}"));
        if !confirm(&mut self.terminal, "Create collection?").await? {
            self.say("Collection creation cancelled");
            return Ok(());
        }

        let params = VectorParams { size, distance };
        self.say(format!("Creating collection '{name}'..."));
        match self
            .guarded(self.service.create_collection(&name, &params))
            .await?
        {
            Ok(()) => {
                info!(collection = %name, size, %distance, "collection created");
                self.say(format!("Collection '{name}' created"));
            }
            Err(e) => {
                // The service is authoritative, including for duplicate names
                self.say(format!("Could not create collection '{name}': {e}"));
                return Ok(());
            }
        }

        self.say("Verifying the new collection...");
        tokio::time::sleep(self.settings.verify_delay).await;
        match self.guarded(self.service.collection_info(&name)).await? {
            Ok(info) => self.say_all(render::details(&name, &info)),
            Err(e) => {
                warn!(collection = %name, error = %e, "verification fetch failed");
                self.say(format!("Created, but could not fetch details of '{name}': {e}"));
            }
        }
        Ok(())
    }

    async fn prompt_new_name(&mut self) -> Result<String, PromptError> {
        loop {
            let name = self.terminal.prompt("Collection name: ").await?;
            if name.is_empty() {
                self.say("The name cannot be empty");
                continue;
            }

            // Re-fetched every time; the service still has the final word on duplicates
            match self.guarded(self.service.list_collections()).await? {
                Ok(existing) if existing.iter().any(|c| c.name == name) => {
                    self.say(format!("Collection '{name}' already exists"));
                    continue;
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "could not check for an existing collection"),
            }
            return Ok(name);
        }
    }

    async fn prompt_vector_size(&mut self) -> Result<u64, PromptError> {
        self.say("");
        self.say("Vector size (dimensions):");
        for (model, size) in SIZE_HINTS {
            self.say(format!("• {model}: {size}"));
        }

        loop {
            let input = self
                .terminal
                .prompt(&format!("Vector size [{DEFAULT_VECTOR_SIZE}]: "))
                .await?;
            let size = match parse_vector_size(&input) {
                Ok(size) => size,
                Err(e) => {
                    self.say(e.to_string());
                    continue;
                }
            };

            if size > LARGE_VECTOR_SIZE {
                self.say("That is a very large vector size");
                if !confirm(&mut self.terminal, "Continue?").await? {
                    continue;
                }
            }
            return Ok(size);
        }
    }

    async fn prompt_distance(&mut self) -> Result<Distance, PromptError> {
        self.say("");
        self.say("Distance function:");
        self.say("1. Cosine - recommended for text embeddings");
        self.say("2. Euclidean - classic euclidean distance");
        self.say("3. Dot - dot product, for normalised vectors");

        loop {
            let input = self.terminal.prompt("Distance function [1]: ").await?;
            match parse_distance_choice(&input) {
                Some(distance) => return Ok(distance),
                None => self.say("Invalid option. Choose 1, 2 or 3"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_size_default_and_bounds() {
        assert_eq!(parse_vector_size(""), Ok(1536));
        assert_eq!(parse_vector_size("  768 "), Ok(768));
        assert_eq!(parse_vector_size("100000"), Ok(100_000));
        assert_eq!(parse_vector_size("0"), Err(VectorSizeError::NotPositive));
        assert_eq!(parse_vector_size("-12"), Err(VectorSizeError::NotPositive));
        assert_eq!(parse_vector_size("big"), Err(VectorSizeError::NotANumber));
        assert_eq!(parse_vector_size("1.5"), Err(VectorSizeError::NotANumber));
    }

    #[test]
    fn test_distance_choice() {
        assert_eq!(parse_distance_choice(""), Some(Distance::Cosine));
        assert_eq!(parse_distance_choice("1"), Some(Distance::Cosine));
        assert_eq!(parse_distance_choice("2"), Some(Distance::Euclid));
        assert_eq!(parse_distance_choice("3"), Some(Distance::Dot));
        assert_eq!(parse_distance_choice("euclidean"), Some(Distance::Euclid));
        assert_eq!(parse_distance_choice("Dot"), Some(Distance::Dot));
        assert_eq!(parse_distance_choice("4"), None);
        assert_eq!(parse_distance_choice("manhattan"), None);
    }
}
