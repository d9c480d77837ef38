use thiserror::Error;

/// Reasons a proxy list line is rejected.
///
/// Rejected lines are skipped individually; they never abort parsing of the whole list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyLineError {
    /// Line does not have the `host:port` or `host:port:user:pass` shape.
    #[error("expected 2 or 4 colon-separated fields, found {0}")]
    FieldCount(usize),

    #[error("host is empty")]
    EmptyHost,

    /// Port is not a number in `1..=65535`.
    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("username is empty")]
    EmptyUsername,

    #[error("fields must not contain whitespace")]
    Whitespace,
}
