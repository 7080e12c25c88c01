//! A bare bones CLI made of named commands.
//!
//! An [`App`] is an ordered list of [`Command`]s. `argv[1]` selects a command
//! by name or alias, the command's own flags are parsed from the rest of the
//! arguments, and the command's handler gets whatever positionals remain.
//!
//! ```no_run
//! use uio_cli::App;
//! use uio_cli::Command;
//!
//! let mut make = Command::new("make").with_short("create uimage");
//! let output = make.flags().string("o", "", "Output");
//! let make = make.with_run(move |args| println!("make {} from {args:?}", output.get()));
//!
//! let list = Command::new("list")
//!     .with_short("list uimage")
//!     .with_alias("ls")
//!     .with_alias("l")
//!     .with_run(|args| println!("list {args:?}"));
//!
//! App::from_iter([make, list]).run(std::env::args());
//! ```

mod app;
mod command;
mod help;

pub use uio_flag::Flag;
pub use uio_flag::FlagSet;

pub use crate::app::App;
pub use crate::app::EXIT_FAILURE;
pub use crate::app::EXIT_SUCCESS;
pub use crate::command::Command;
