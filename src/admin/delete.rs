use tracing::{info, warn};

use super::{render, Administrator};
use crate::console::{confirm, PromptError, Terminal};
use crate::qdrant::{CollectionService, QdrantError};
use crate::selection::SelectionMode;

/// Per-item outcome of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    /// Never attempted because the user interrupted the batch
    pub skipped: Vec<String>,
}

impl BatchOutcome {
    /// Number of items that were actually attempted.
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

impl<S: CollectionService, T: Terminal> Administrator<S, T> {
    pub(super) async fn delete(&mut self) -> Result<(), PromptError> {
        let Some(collections) = self.listing_for(SelectionMode::Delete).await? else {
            return Ok(());
        };
        let Some(selected) = self
            .prompt_selection(&collections, SelectionMode::Delete)
            .await?
        else {
            return Ok(());
        };

        self.say_all(render::deletion_warning(&selected));
        if !confirm(&mut self.terminal, "Confirm deletion?").await? {
            self.say("Deletion cancelled by user");
            return Ok(());
        }

        let outcome = self.delete_batch(&selected).await;
        self.say_all(render::batch_results(&outcome));
        Ok(())
    }

    /// Delete a single collection.
    pub async fn delete_one(&self, name: &str) -> Result<(), QdrantError> {
        self.service.delete_collection(name).await
    }

    /// Delete `names` in order, recording each outcome as soon as its call returns.
    ///
    /// A failure never stops the batch. An interrupt is only honoured in the pause
    /// between two deletes; the remaining names are then reported as skipped.
    pub async fn delete_batch(&mut self, names: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let total = names.len();

        self.say("");
        self.say("Deleting...");
        self.say(render::rule());

        for (index, name) in names.iter().enumerate() {
            match self.delete_one(name).await {
                Ok(()) => {
                    info!(collection = %name, "collection deleted");
                    self.say(format!("[{}/{total}] Deleting '{name}'... ok", index + 1));
                    outcome.succeeded.push(name.clone());
                }
                Err(e) => {
                    warn!(collection = %name, error = %e, "collection delete failed");
                    self.say(format!(
                        "[{}/{total}] Deleting '{name}'... failed: {e}",
                        index + 1
                    ));
                    outcome.failed.push(name.clone());
                }
            }

            let remaining = &names[index + 1..];
            if remaining.is_empty() {
                break;
            }

            let interrupted = tokio::select! {
                _ = tokio::time::sleep(self.settings.delete_pacing) => false,
                _ = self.terminal.interrupted() => true,
            };
            if interrupted {
                self.say("Interrupted; remaining collections were not deleted");
                outcome.skipped.extend(remaining.iter().cloned());
                break;
            }
        }

        outcome
    }
}
