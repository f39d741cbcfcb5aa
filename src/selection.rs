//! Parsing of index-based collection selections typed at the prompt.

use thiserror::Error;

/// What the selection is for; only deletion accepts the "all" token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Inspect,
    Delete,
}

impl SelectionMode {
    pub fn verb(&self) -> &'static str {
        match self {
            SelectionMode::Inspect => "inspect",
            SelectionMode::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// User backed out of the action
    Cancel,
    /// Selected names, deduplicated, in order of first occurrence
    Names(Vec<String>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please enter a selection")]
    Empty,

    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("Number {index} is out of range (1-{max})")]
    OutOfRange { index: i64, max: usize },

    #[error("No valid collections were selected")]
    NothingSelected,
}

const CANCEL_TOKENS: [&str; 3] = ["q", "quit", "exit"];
const ALL_TOKENS: [&str; 3] = ["all", "*", "todas"];

/// Map `input` onto `names` (1-based). A single bad token rejects the whole input.
pub fn parse_selection<S: AsRef<str>>(
    input: &str,
    names: &[S],
    mode: SelectionMode,
) -> Result<Selection, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }

    let lowered = input.to_lowercase();
    if CANCEL_TOKENS.contains(&lowered.as_str()) {
        return Ok(Selection::Cancel);
    }

    let selected: Vec<String> = if mode == SelectionMode::Delete
        && ALL_TOKENS.contains(&lowered.as_str())
    {
        names.iter().map(|n| n.as_ref().to_string()).collect()
    } else {
        let mut selected: Vec<String> = Vec::new();
        for token in input.split(',').map(str::trim) {
            let index: i64 = token
                .parse()
                .map_err(|_| SelectionError::NotANumber(token.to_string()))?;
            if index < 1 || index as u64 > names.len() as u64 {
                return Err(SelectionError::OutOfRange {
                    index,
                    max: names.len(),
                });
            }
            let name = names[(index - 1) as usize].as_ref();
            if !selected.iter().any(|s| s == name) {
                selected.push(name.to_string());
            }
        }
        selected
    };

    if selected.is_empty() {
        return Err(SelectionError::NothingSelected);
    }
    Ok(Selection::Names(selected))
}
