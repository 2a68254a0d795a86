use thiserror::Error;

/// Misconfiguration that must stop the operation that hit it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown sort key `{0}`")]
    UnknownSortKey(String),

    #[error("league {0} is not part of the loaded roster")]
    UnknownLeague(u32),

    #[error("league {0} has no color in the palette")]
    UnmappedLeague(u32),

    #[error("unknown league color `{0}`")]
    UnknownColor(String),
}
