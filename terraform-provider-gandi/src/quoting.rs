//! Gandi returns `TXT`, `SPF` and `SRV` values as quoted string literals.
//! They are unquoted on read so they compare equal to the configured value.

use std::str::Chars;

/// Record types whose values come back quoted
pub fn is_quoted_type(record_type: &str) -> bool {
    ["TXT", "SPF", "SRV"]
        .iter()
        .any(|t| t.eq_ignore_ascii_case(record_type))
}

/// Value as shown to the user: unquoted for quoted types, raw when the
/// literal cannot be unquoted
pub fn display_value(record_type: &str, value: &str) -> String {
    if is_quoted_type(record_type) {
        unquote(value).unwrap_or_else(|| value.to_string())
    } else {
        value.to_string()
    }
}

/// Unquote a `"..."`, `'.'` or `` `...` `` literal with C-style escapes
pub fn unquote(literal: &str) -> Option<String> {
    let quote = literal.chars().next().filter(|c| matches!(c, '"' | '\'' | '`'))?;
    let body = literal.strip_prefix(quote)?.strip_suffix(quote)?;

    match quote {
        '`' => (!body.contains('`')).then(|| body.replace('\r', "")),
        '"' => unescape(body, quote),
        '\'' => unescape(body, quote).filter(|s| s.chars().count() == 1),
        _ => None,
    }
}

fn unescape(body: &str, quote: char) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\n' => return None,
            c if c == quote => return None,
            '\\' => out.push(escape(&mut chars, quote)?),
            c => out.push(c),
        }
    }
    Some(out)
}

fn escape(chars: &mut Chars<'_>, quote: char) -> Option<char> {
    let c = chars.next()?;
    let decoded = match c {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '\\' => '\\',
        c if c == quote => c,
        'x' => ascii(digits(chars, 2, 16, 0)?)?,
        'u' => char::from_u32(digits(chars, 4, 16, 0)?)?,
        'U' => char::from_u32(digits(chars, 8, 16, 0)?)?,
        '0'..='7' => ascii(digits(chars, 2, 8, c.to_digit(8)?)?)?,
        _ => return None,
    };
    Some(decoded)
}

/// Read `count` digits in `radix`, continuing from `acc`
fn digits(chars: &mut Chars<'_>, count: usize, radix: u32, acc: u32) -> Option<u32> {
    (0..count).try_fold(acc, |acc, _| {
        let digit = chars.next()?.to_digit(radix)?;
        acc.checked_mul(radix)?.checked_add(digit)
    })
}

/// Byte escapes above 0x7F would not be valid UTF-8 on their own
fn ascii(value: u32) -> Option<char> {
    u8::try_from(value)
        .ok()
        .filter(u8::is_ascii)
        .map(char::from)
}
