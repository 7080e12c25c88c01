//! Per-command flag scopes with single-dash flag syntax.
//!
//! A [`FlagSet`] holds the named, typed flags of one command. Registering a
//! flag hands back a [`Flag`] bound to its destination; parsing an argument
//! list writes the parsed values through those bindings and returns the
//! positional arguments that remain.
//!
//! ```
//! use uio_flag::FlagSet;
//!
//! let mut flags = FlagSet::new("make");
//! let output = flags.string("o", "", "Output");
//! let parsed = flags.try_parse(&["-o", "high", "foobar"]).unwrap();
//! assert_eq!(output.get(), "high");
//! assert_eq!(parsed.args(), ["foobar"]);
//! ```
//!
//! Token matching is delegated to `clap`'s builder API; this crate owns the
//! syntax normalization in front of it and the diagnostics and usage text
//! behind it.

mod error;
mod flag;
mod parse;
mod set;
mod usage;

pub use crate::error::FlagError;
pub use crate::flag::Flag;
pub use crate::flag::FlagInfo;
pub use crate::set::FlagSet;
pub use crate::set::ParsedArgs;
