use std::cell::RefCell;
use std::fmt;
use std::num::IntErrorKind;
use std::num::ParseFloatError;
use std::num::ParseIntError;
use std::rc::Rc;
use std::str::FromStr;

/// Handle to the destination of a registered flag.
///
/// Cloning the handle shares the destination, so a command handler can
/// capture a clone and read whatever the last parse stored.
pub struct Flag<T>(Rc<RefCell<T>>);

impl<T> Flag<T> {
    /// A destination not yet bound to any flag set.
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub(crate) fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Overwrites the destination, as if the flag had been parsed.
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }
}

impl<T: Clone> Flag<T> {
    /// Current value: the default until a parse sets it.
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Flag<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Flag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Flag").field(&*self.0.borrow()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Bool,
    String,
    Value(&'static str),
}

type Setter = Box<dyn Fn(&str) -> Result<(), String>>;

/// Metadata of a registered flag.
pub struct FlagInfo {
    name: String,
    usage: String,
    default: String,
    zero_default: bool,
    kind: Kind,
    setter: Setter,
}

impl FlagInfo {
    /// Binds `flag` to a text-parsed value; `reason` words a parse failure.
    pub(crate) fn bound<T>(
        name: &str,
        usage: &str,
        default: T,
        kind: Kind,
        flag: &Flag<T>,
        reason: fn(&T::Err) -> String,
    ) -> Self
    where
        T: FromStr + fmt::Display + Default + PartialEq + 'static,
    {
        let zero_default = default == T::default();
        let dest = flag.clone();
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            default: default.to_string(),
            zero_default,
            kind,
            setter: Box::new(move |raw| {
                let value = raw.parse::<T>().map_err(|e| reason(&e))?;
                dest.set(value);
                Ok(())
            }),
        }
    }

    pub(crate) fn bool(name: &str, usage: &str, default: bool, flag: &Flag<bool>) -> Self {
        let dest = flag.clone();
        Self::boolean(name, usage, default, move |value| dest.set(value))
    }

    /// A boolean flag that hands every parsed value to `apply`.
    pub(crate) fn boolean(
        name: &str,
        usage: &str,
        default: bool,
        apply: impl Fn(bool) + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            default: default.to_string(),
            zero_default: !default,
            kind: Kind::Bool,
            setter: Box::new(move |raw| {
                let value = parse_bool(raw).ok_or_else(|| PARSE_ERROR.to_string())?;
                apply(value);
                Ok(())
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Default value as text.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Boolean flags take no separate value argument.
    pub fn is_bool(&self) -> bool {
        self.kind == Kind::Bool
    }

    pub(crate) fn kind(&self) -> Kind {
        self.kind
    }

    pub(crate) fn has_zero_default(&self) -> bool {
        self.zero_default
    }

    pub(crate) fn apply(&self, raw: &str) -> Result<(), String> {
        (self.setter)(raw)
    }
}

impl fmt::Debug for FlagInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagInfo")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

const PARSE_ERROR: &str = "parse error";
const OUT_OF_RANGE: &str = "value out of range";

pub(crate) fn int_reason(err: &ParseIntError) -> String {
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => OUT_OF_RANGE.to_string(),
        _ => PARSE_ERROR.to_string(),
    }
}

pub(crate) fn float_reason(_: &ParseFloatError) -> String {
    PARSE_ERROR.to_string()
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
