use thiserror::Error;

/// Error kinds the core can produce, per the error-handling design.
///
/// `ClassifierMiss` and `SuggestionEmpty` are deliberately absent here —
/// they are not errors, just `wrong_cmd = true` / `Suggestion: None`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("terminal input closed: {0}")]
    InputError(#[source] std::io::Error),

    #[error("terminal write failed: {0}")]
    DisplayError(#[source] std::io::Error),

    #[error("failed to load {store}: {source}")]
    StoreLoadError {
        store: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("executor exited with code {code}")]
    ExecutorError { code: i32 },
}

pub type CoreResult<T> = Result<T, CoreError>;
