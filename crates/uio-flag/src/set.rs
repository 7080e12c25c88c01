use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use clap::Arg;
use clap::ArgAction;

use crate::error::FlagError;
use crate::flag;
use crate::flag::Flag;
use crate::flag::FlagInfo;
use crate::flag::Kind;
use crate::parse;
use crate::usage;

/// Id of the matcher argument collecting positionals. Flag names cannot
/// start with `-`, so it never collides.
const POSITIONAL: &str = "-args";

/// The flags of one command.
///
/// Flags are kept sorted by name, which is also the order of the usage text.
/// Registration panics on an empty name, a name starting with `-` or
/// containing `=`, and on redefinition.
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, FlagInfo>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> Flag<String> {
        self.bind(name, usage, default.to_string(), Kind::String, |e| e.to_string())
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> Flag<bool> {
        let flag = Flag::new(default);
        self.insert(FlagInfo::bool(name, usage, default, &flag));
        flag
    }

    /// Registers a boolean flag with no destination of its own; `apply` gets
    /// each value the command line gives it.
    pub fn bool_func(&mut self, name: &str, usage: &str, apply: impl Fn(bool) + 'static) {
        self.insert(FlagInfo::boolean(name, usage, false, apply));
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> Flag<i64> {
        self.bind(name, usage, default, Kind::Value("int"), flag::int_reason)
    }

    pub fn uint(&mut self, name: &str, default: u64, usage: &str) -> Flag<u64> {
        self.bind(name, usage, default, Kind::Value("uint"), flag::int_reason)
    }

    pub fn float(&mut self, name: &str, default: f64, usage: &str) -> Flag<f64> {
        self.bind(name, usage, default, Kind::Value("float"), flag::float_reason)
    }

    /// Registers a flag of any type that round-trips through text.
    pub fn value<T>(&mut self, name: &str, default: T, usage: &str) -> Flag<T>
    where
        T: FromStr + fmt::Display + Default + PartialEq + Clone + 'static,
        T::Err: fmt::Display,
    {
        self.bind(name, usage, default, Kind::Value("value"), |e| e.to_string())
    }

    fn bind<T>(
        &mut self,
        name: &str,
        usage: &str,
        default: T,
        kind: Kind,
        reason: fn(&T::Err) -> String,
    ) -> Flag<T>
    where
        T: FromStr + fmt::Display + Default + PartialEq + Clone + 'static,
    {
        let flag = Flag::new(default.clone());
        self.insert(FlagInfo::bound(name, usage, default, kind, &flag, reason));
        flag
    }

    fn insert(&mut self, info: FlagInfo) {
        let name = info.name().to_string();
        assert!(!name.is_empty(), "{}: flag name is empty", self.name);
        assert!(!name.starts_with('-'), "flag {name:?} begins with -");
        assert!(!name.contains('='), "flag {name:?} contains =");
        assert!(
            !self.flags.contains_key(&name),
            "{}: flag redefined: {name}",
            self.name
        );
        self.flags.insert(name, info);
    }

    pub fn lookup(&self, name: &str) -> Option<&FlagInfo> {
        self.flags.get(name)
    }

    /// Registered flags in name order.
    pub fn flags(&self) -> impl Iterator<Item = &FlagInfo> {
        self.flags.values()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// One entry per flag, as printed below the usage header.
    pub fn defaults(&self) -> String {
        usage::defaults(self)
    }

    /// The full usage block: header plus [`FlagSet::defaults`].
    pub fn usage(&self) -> String {
        usage::usage(self)
    }

    /// Parses `args`, which must not include the command name.
    ///
    /// On failure the error message (unless help was requested) and the usage
    /// block are written to `out` before the error is returned.
    pub fn parse<S: AsRef<str>>(
        &self,
        args: &[S],
        out: &mut dyn Write,
    ) -> Result<ParsedArgs, FlagError> {
        self.try_parse(args).inspect_err(|err| self.report(err, out))
    }

    /// Parses `args` without writing anything.
    pub fn try_parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParsedArgs, FlagError> {
        let argv = parse::normalize(self, args)?;
        let matches = self.matcher().try_get_matches_from(argv)?;

        let mut present: Vec<(usize, &FlagInfo, &String)> = Vec::new();
        for info in self.flags.values() {
            let Some(values) = matches.get_many::<String>(info.name()) else {
                continue;
            };
            let indices: Vec<usize> = matches
                .indices_of(info.name())
                .map(Iterator::collect)
                .unwrap_or_default();
            present.extend(values.enumerate().map(|(i, value)| {
                let index = indices.get(i).copied().unwrap_or_default();
                (index, info, value)
            }));
        }
        // every occurrence is applied in command-line order, so the last one
        // wins and the first bad value is the one reported
        present.sort_by_key(|(index, ..)| *index);

        let mut set = BTreeSet::new();
        for (_, info, value) in present {
            info.apply(value)
                .map_err(|reason| invalid_value(info, value, reason))?;
            set.insert(info.name().to_string());
        }

        let args: Vec<String> = matches
            .get_many::<String>(POSITIONAL)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        tracing::trace!(set = %self.name, flags = ?set, args = ?args, "parsed flags");
        Ok(ParsedArgs { args, set })
    }

    fn report(&self, err: &FlagError, out: &mut dyn Write) {
        let written = if err.is_help() {
            out.write_all(self.usage().as_bytes())
        } else {
            write!(out, "{err}\n{}", self.usage())
        };
        if let Err(io_err) = written {
            tracing::warn!(set = %self.name, error = %io_err, "failed to write usage");
        }
    }

    fn matcher(&self) -> clap::Command {
        let positional = Arg::new(POSITIONAL)
            .num_args(0..)
            .action(ArgAction::Append);

        let name = if self.name.is_empty() {
            String::from("flags")
        } else {
            self.name.clone()
        };

        self.flags.values().fold(
            clap::Command::new(name)
                .no_binary_name(true)
                .disable_help_flag(true)
                .disable_version_flag(true)
                .arg(positional),
            |cmd, info| {
                let arg = Arg::new(info.name().to_string())
                    .long(info.name().to_string())
                    .action(ArgAction::Append);
                let arg = if info.is_bool() {
                    arg.num_args(0..=1)
                        .require_equals(true)
                        .default_missing_value("true")
                } else {
                    arg.num_args(1).allow_hyphen_values(true)
                };
                cmd.arg(arg)
            },
        )
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("flags", &self.flags.values().collect::<Vec<_>>())
            .finish()
    }
}

fn invalid_value(info: &FlagInfo, value: &str, reason: String) -> FlagError {
    let name = info.name().to_string();
    let value = value.to_string();
    if info.is_bool() {
        FlagError::InvalidBool {
            name,
            value,
            reason,
        }
    } else {
        FlagError::InvalidValue {
            name,
            value,
            reason,
        }
    }
}

/// Outcome of a successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    args: Vec<String>,
    set: BTreeSet<String>,
}

impl ParsedArgs {
    /// Arguments left after the flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Whether `name` appeared on the command line.
    pub fn is_set(&self, name: &str) -> bool {
        self.set.contains(name)
    }
}
