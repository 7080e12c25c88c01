use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlagError {
    /// `-h`, `-help` or `--help` given to a set that defines neither.
    #[error("flag: help requested")]
    Help,
    #[error("flag provided but not defined: -{0}")]
    Undefined(String),
    #[error("flag needs an argument: -{0}")]
    MissingArgument(String),
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    #[error("invalid boolean value {value:?} for -{name}: {reason}")]
    InvalidBool {
        name: String,
        value: String,
        reason: String,
    },
    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Matcher(#[from] clap::Error),
}

impl FlagError {
    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help)
    }
}
