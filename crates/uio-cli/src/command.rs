use std::fmt;
use std::io::Write;

use uio_flag::FlagError;
use uio_flag::FlagSet;

type Handler = Box<dyn Fn(&[String])>;

/// A CLI command.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    short: String,
    run: Handler,
    flags: Option<FlagSet>,
}

impl Command {
    /// A command that matches `name` and does nothing until given a handler.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            short: String::new(),
            run: Box::new(|_| {}),
            flags: None,
        }
    }

    /// One-line description shown in the app's help listing.
    #[must_use]
    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Called with the positional arguments once the flags have parsed.
    #[must_use]
    pub fn with_run(mut self, run: impl Fn(&[String]) + 'static) -> Self {
        self.run = Box::new(run);
        self
    }

    /// Replaces the flag set with one built up front.
    #[must_use]
    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    /// Returns a modifiable flag set for this command, creating it on first
    /// use. If `argv[1]` selects this command, these flags are parsed.
    pub fn flags(&mut self) -> &mut FlagSet {
        let name = &self.name;
        self.flags.get_or_insert_with(|| FlagSet::new(name.clone()))
    }

    /// The flag set, if one has been created.
    pub fn flag_set(&self) -> Option<&FlagSet> {
        self.flags.as_ref()
    }

    /// Whether `token` is this command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|alias| alias == token)
    }

    /// Parses `args` (everything after the command name) and runs the handler
    /// with the positionals. Parse failures are reported to `err` by the flag
    /// set and the handler is skipped.
    pub(crate) fn dispatch<S: AsRef<str>>(
        &self,
        args: &[S],
        err: &mut dyn Write,
    ) -> Result<(), FlagError> {
        let empty;
        let flags = if let Some(flags) = &self.flags {
            flags
        } else {
            empty = FlagSet::new(self.name.clone());
            &empty
        };

        let parsed = flags.parse(args, err)?;
        tracing::debug!(command = %self.name, args = ?parsed.args(), "running command");
        (self.run)(parsed.args());
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("short", &self.short)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
