/// One line of the status log kept while listing decks or importing.
///
/// Operations collect these instead of printing, so the CLI can write them to
/// stderr while tests simply inspect them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Progress, counts, completion.
    Info(String),
    /// Something was dropped or looked odd, but the run went on.
    Warning(String),
    /// The run stopped. Always the last line of an aborted log.
    Error(String),
}

impl Feedback {
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    pub fn is_info(&self) -> bool {
        matches!(self, Self::Info(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Info(msg) | Self::Warning(msg) | Self::Error(msg) => msg,
        }
    }

    /// Mirror this line into the tracing output at the matching level.
    pub(crate) fn trace(&self) {
        match self {
            Self::Info(msg) => tracing::info!("{msg}"),
            Self::Warning(msg) => tracing::warn!("{msg}"),
            Self::Error(msg) => tracing::error!("{msg}"),
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info(msg) => write!(f, "{msg}"),
            Self::Warning(msg) => write!(f, "warning: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}
