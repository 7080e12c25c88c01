use crate::error::FlagError;
use crate::set::FlagSet;

const TERMINATOR: &str = "--";

/// Rewrites `args` into the form handed to the matcher: every flag as
/// `--name` or `--name=value`, followed by `--` and the positional arguments.
///
/// Flag parsing stops at the first non-flag argument, at a lone `-`, or after
/// a `--` terminator. Names are checked against the set here, so the matcher
/// only ever sees flags it knows.
pub(crate) fn normalize<S: AsRef<str>>(
    set: &FlagSet,
    args: &[S],
) -> Result<Vec<String>, FlagError> {
    let mut out = Vec::with_capacity(args.len() + 1);
    let mut rest = args.iter().map(AsRef::as_ref);

    while let Some(token) = rest.next() {
        if token == TERMINATOR {
            out.push(TERMINATOR.to_string());
            break;
        }
        if token.len() < 2 || !token.starts_with('-') {
            out.push(TERMINATOR.to_string());
            out.push(token.to_string());
            break;
        }

        let stripped = token.strip_prefix(TERMINATOR).unwrap_or(&token[1..]);
        if stripped.is_empty() || stripped.starts_with(['-', '=']) {
            return Err(FlagError::BadSyntax(token.to_string()));
        }

        let (name, value) = match stripped.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (stripped, None),
        };

        let Some(info) = set.lookup(name) else {
            if name == "h" || name == "help" {
                return Err(FlagError::Help);
            }
            return Err(FlagError::Undefined(name.to_string()));
        };

        match value {
            Some(value) => out.push(format!("--{name}={value}")),
            None if info.is_bool() => out.push(format!("--{name}")),
            None => {
                // the next argument is the value, whatever it looks like
                let value = rest
                    .next()
                    .ok_or_else(|| FlagError::MissingArgument(name.to_string()))?;
                out.push(format!("--{name}={value}"));
            }
        }
    }

    out.extend(rest.map(str::to_string));
    Ok(out)
}
