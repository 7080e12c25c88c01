use std::borrow::Cow;
use std::fmt::Write;

use crate::flag::FlagInfo;
use crate::flag::Kind;
use crate::set::FlagSet;

const CONTINUATION: &str = "\n    \t";

pub(crate) fn usage(set: &FlagSet) -> String {
    let mut out = if set.name().is_empty() {
        String::from("Usage:\n")
    } else {
        format!("Usage of {}:\n", set.name())
    };
    out.push_str(&defaults(set));
    out
}

pub(crate) fn defaults(set: &FlagSet) -> String {
    let mut out = String::new();
    for info in set.flags() {
        write_flag(&mut out, info);
    }
    out
}

fn write_flag(out: &mut String, info: &FlagInfo) {
    let (placeholder, usage) = unquote_usage(info);

    let mut line = format!("  -{}", info.name());
    if !placeholder.is_empty() {
        line.push(' ');
        line.push_str(&placeholder);
    }
    // short boolean flags keep their usage on the same line
    if line.len() <= 4 {
        line.push('\t');
    } else {
        line.push_str(CONTINUATION);
    }
    line.push_str(&usage.replace('\n', CONTINUATION));

    if !info.has_zero_default() {
        if info.kind() == Kind::String {
            let _ = write!(line, " (default {:?})", info.default_value());
        } else {
            let _ = write!(line, " (default {})", info.default_value());
        }
    }

    out.push_str(&line);
    out.push('\n');
}

/// Splits a back-quoted placeholder out of the usage text; "a `file` to
/// read" yields ("file", "a file to read"). Without one, the placeholder
/// comes from the flag type.
fn unquote_usage(info: &FlagInfo) -> (Cow<'_, str>, Cow<'_, str>) {
    let usage = info.usage();
    if let Some(start) = usage.find('`') {
        if let Some(len) = usage[start + 1..].find('`') {
            let end = start + 1 + len;
            let name = &usage[start + 1..end];
            let unquoted = format!("{}{}{}", &usage[..start], name, &usage[end + 1..]);
            return (Cow::Borrowed(name), Cow::Owned(unquoted));
        }
    }

    let placeholder = match info.kind() {
        Kind::Bool => "",
        Kind::String => "string",
        Kind::Value(name) => name,
    };
    (Cow::Borrowed(placeholder), Cow::Borrowed(usage))
}
