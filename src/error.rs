use thiserror::Error;

/// Failure taxonomy for everything that talks to the football API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightsError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream error{}: {message}", status_suffix(.status))]
    Upstream { status: Option<u16>, message: String },

    #[error("invalid upstream payload: {0}")]
    Decode(String),

    #[error("team not found: {query}")]
    TeamNotFound { query: String },

    #[error("team name is empty")]
    EmptyQuery,
}

pub type InsightsResult<T> = Result<T, InsightsError>;

impl InsightsError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Transport and upstream failures may succeed on a later attempt; a
    /// missing key, an empty query or an unknown team never will.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Upstream { .. } | Self::Decode(_)
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(msg) => format!("API is not configured: {msg}"),
            Self::Network(_) => {
                "Could not reach the football API. Check the connection and proxy settings."
                    .to_string()
            }
            Self::Upstream { message, .. } => message.clone(),
            Self::Decode(_) => "The football API returned an unexpected response.".to_string(),
            Self::TeamNotFound { .. } => {
                "Team not found. Try a more precise name.".to_string()
            }
            Self::EmptyQuery => "Enter a team name to search.".to_string(),
        }
    }
}

impl From<serde_json::Error> for InsightsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (http {s})")).unwrap_or_default()
}
