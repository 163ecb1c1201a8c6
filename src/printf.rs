//! printf-style interpolation of [`Value`] arguments.
//!
//! Directives follow `%[flags][width][.precision]verb`. Flags are `+`, `-`,
//! `#`, space and `0`; width and precision are decimal or `*` (taken from the
//! next argument). Bad directives never fail the call, they are written
//! inline as `%!verb(value)` markers.

use std::iter::Peekable;
use std::slice::Iter;
use std::str::Chars;

use crate::value::{display, Value};

/// Upper bound for width and precision, larger counts are rejected.
const MAX_COUNT: i64 = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    plus: bool,
    minus: bool,
    sharp: bool,
    space: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

enum Count {
    Absent,
    Given(i64),
    Bad,
}

enum Number {
    Int(i64),
    Uint(u64),
    Float(f64),
}

/// Interpolate printf-style `args` into `template`.
///
/// Supported verbs:
/// - `%v` default form, `%s` text, `%q` quoted text
/// - `%d` decimal, `%b` binary, `%o`/`%O` octal, `%x`/`%X` hex (integers,
///   or the bytes of a text value), `%c` character
/// - `%f`/`%F`, `%e`/`%E`, `%g`/`%G` floats
/// - `%t` booleans, `%%` a literal percent sign
///
/// Mismatches are written inline: `%!d(text)` for a wrong type or unknown
/// verb, `%!v(MISSING)` for a missing argument, a trailing
/// `%!(EXTRA ...)` for leftovers and `%!(NOVERB)` for a dangling `%`.
pub fn interpolate(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut directive = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '+' => directive.plus = true,
                '-' => directive.minus = true,
                '#' => directive.sharp = true,
                ' ' => directive.space = true,
                '0' => directive.zero = true,
                _ => break,
            }
            chars.next();
        }

        match read_count(&mut chars, &mut args) {
            Count::Absent => {}
            Count::Given(n) => {
                directive.minus |= n < 0;
                directive.width = Some(n.unsigned_abs() as usize);
            }
            Count::Bad => out.push_str("%!(BADWIDTH)"),
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            match read_count(&mut chars, &mut args) {
                Count::Absent => directive.precision = Some(0),
                Count::Given(n) if n >= 0 => directive.precision = Some(n as usize),
                Count::Given(_) => {}
                Count::Bad => out.push_str("%!(BADPREC)"),
            }
        }

        let verb = match chars.next() {
            Some(verb) => verb,
            None => {
                out.push_str("%!(NOVERB)");
                break;
            }
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        let arg = match args.next() {
            Some(arg) => arg,
            None => {
                out.push_str(&format!("%!{}(MISSING)", verb));
                continue;
            }
        };
        match format_arg(verb, &directive, arg) {
            Some(text) => out.push_str(&text),
            None => out.push_str(&format!("%!{}({})", verb, display(arg))),
        }
    }

    let extra: Vec<String> = args.map(display).collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

fn read_count(chars: &mut Peekable<Chars<'_>>, args: &mut Iter<'_, Value>) -> Count {
    if chars.peek() == Some(&'*') {
        chars.next();
        return match args.next().and_then(star_count) {
            Some(n) if n.abs() <= MAX_COUNT => Count::Given(n),
            _ => Count::Bad,
        };
    }
    let mut count: Option<i64> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(i64::from(digit)));
    }
    match count {
        None => Count::Absent,
        Some(n) if n <= MAX_COUNT => Count::Given(n),
        Some(_) => Count::Bad,
    }
}

/// Format one argument, `None` when the verb does not apply to it.
fn format_arg(verb: char, directive: &Directive, arg: &Value) -> Option<String> {
    match verb {
        'v' => Some(match number(arg) {
            Some(Number::Float(n)) => format_float(n, 'g', directive),
            Some(_) => {
                let (negative, magnitude) = integer(arg)?;
                format_integer(negative, magnitude, 10, "", directive)
            }
            None => pad(String::new(), display(arg), directive, false),
        }),
        'd' => {
            let (negative, magnitude) = integer(arg)?;
            Some(format_integer(negative, magnitude, 10, "", directive))
        }
        'b' => {
            let (negative, magnitude) = integer(arg)?;
            let prefix = if directive.sharp { "0b" } else { "" };
            Some(format_integer(negative, magnitude, 2, prefix, directive))
        }
        'o' | 'O' => {
            let (negative, magnitude) = integer(arg)?;
            let prefix = match (verb, directive.sharp) {
                ('O', _) => "0o",
                (_, true) => "0",
                _ => "",
            };
            Some(format_integer(negative, magnitude, 8, prefix, directive))
        }
        'x' | 'X' => {
            let prefix = match (verb, directive.sharp) {
                ('x', true) => "0x",
                ('X', true) => "0X",
                _ => "",
            };
            let text = match arg {
                Value::Text(text) => {
                    let hex: String = text.bytes().map(|b| format!("{:02x}", b)).collect();
                    pad(prefix.to_string(), hex, directive, false)
                }
                _ => {
                    let (negative, magnitude) = integer(arg)?;
                    format_integer(negative, magnitude, 16, prefix, directive)
                }
            };
            Some(if verb == 'X' { text.to_uppercase() } else { text })
        }
        'c' => {
            let (negative, magnitude) = integer(arg)?;
            if negative {
                return None;
            }
            let c = u32::try_from(magnitude)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            Some(pad(String::new(), c.to_string(), directive, false))
        }
        'e' | 'E' | 'f' | 'F' | 'g' | 'G' => match number(arg)? {
            Number::Float(n) => Some(format_float(n, verb, directive)),
            _ => None,
        },
        't' => {
            let flag = boolean(arg)?;
            Some(pad(String::new(), flag.to_string(), directive, false))
        }
        's' => Some(pad(String::new(), truncate(display(arg), directive.precision), directive, false)),
        'q' => {
            let text = truncate(display(arg), directive.precision);
            let quoted = serde_json::to_string(&text).unwrap_or(text);
            Some(pad(String::new(), quoted, directive, false))
        }
        _ => None,
    }
}

fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Int(n) => Some(Number::Int(*n)),
        Value::Uint(n) => Some(Number::Uint(*n)),
        Value::Float(n) => Some(Number::Float(*n)),
        Value::Structured(s) => match s.json()? {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Number::Int)
                .or_else(|| n.as_u64().map(Number::Uint))
                .or_else(|| n.as_f64().map(Number::Float)),
            _ => None,
        },
        _ => None,
    }
}

/// Sign and magnitude of an integer argument.
fn integer(value: &Value) -> Option<(bool, u64)> {
    match number(value)? {
        Number::Int(n) => Some((n < 0, n.unsigned_abs())),
        Number::Uint(n) => Some((false, n)),
        Number::Float(_) => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Structured(s) => s.json()?.as_bool(),
        _ => None,
    }
}

fn star_count(value: &Value) -> Option<i64> {
    match number(value)? {
        Number::Int(n) => Some(n),
        Number::Uint(n) => i64::try_from(n).ok(),
        Number::Float(_) => None,
    }
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    }
}

fn sign(negative: bool, directive: &Directive) -> &'static str {
    if negative {
        "-"
    } else if directive.plus {
        "+"
    } else if directive.space {
        " "
    } else {
        ""
    }
}

/// Pad `head` + `body` to the directive width. Zero padding goes between
/// the two and only applies when `zero_fill` is set.
fn pad(head: String, body: String, directive: &Directive, zero_fill: bool) -> String {
    let len = head.chars().count() + body.chars().count();
    let fill = match directive.width {
        Some(width) if width > len => width - len,
        _ => return head + &body,
    };
    if directive.minus {
        format!("{}{}{}", head, body, " ".repeat(fill))
    } else if directive.zero && zero_fill {
        format!("{}{}{}", head, "0".repeat(fill), body)
    } else {
        format!("{}{}{}", " ".repeat(fill), head, body)
    }
}

fn format_integer(negative: bool, magnitude: u64, radix: u32, prefix: &str, directive: &Directive) -> String {
    let mut digits = match radix {
        2 => format!("{:b}", magnitude),
        8 => format!("{:o}", magnitude),
        16 => format!("{:x}", magnitude),
        _ => magnitude.to_string(),
    };
    if let Some(precision) = directive.precision {
        if precision == 0 && magnitude == 0 {
            digits.clear();
        }
        if digits.len() < precision {
            digits = "0".repeat(precision - digits.len()) + &digits;
        }
    }
    let head = format!("{}{}", sign(negative, directive), prefix);
    pad(head, digits, directive, directive.precision.is_none())
}

/// Text used for NaN and the infinities.
pub(crate) fn non_finite(n: f64) -> &'static str {
    if n.is_nan() {
        "NaN"
    } else if n > 0.0 {
        "+Inf"
    } else {
        "-Inf"
    }
}

fn format_float(n: f64, verb: char, directive: &Directive) -> String {
    if !n.is_finite() {
        return pad(String::new(), non_finite(n).to_string(), directive, false);
    }
    let magnitude = n.abs();
    let body = match verb {
        'f' | 'F' => format!("{:.*}", directive.precision.unwrap_or(6), magnitude),
        'e' | 'E' => with_signed_exponent(&format!("{:.*e}", directive.precision.unwrap_or(6), magnitude)),
        _ => general(magnitude, directive.precision, directive.sharp),
    };
    let body = if verb.is_ascii_uppercase() {
        body.to_uppercase()
    } else {
        body
    };
    pad(sign(n.is_sign_negative(), directive).to_string(), body, directive, true)
}

/// `%g`: exponent form for large or small exponents, plain decimals
/// otherwise. Without a precision the shortest exact digits are used.
fn general(magnitude: f64, precision: Option<usize>, sharp: bool) -> String {
    match precision {
        None => {
            let scientific = format!("{:e}", magnitude);
            let exponent = exponent_of(&scientific);
            if !(-4..6).contains(&exponent) {
                with_signed_exponent(&scientific)
            } else {
                magnitude.to_string()
            }
        }
        Some(precision) => {
            let precision = precision.max(1);
            let scientific = format!("{:.*e}", precision - 1, magnitude);
            let exponent = exponent_of(&scientific);
            let text = if exponent < -4 || exponent >= precision as i32 {
                with_signed_exponent(&scientific)
            } else {
                format!("{:.*}", (precision as i32 - 1 - exponent) as usize, magnitude)
            };
            if sharp {
                text
            } else {
                trim_fraction(&text)
            }
        }
    }
}

fn exponent_of(scientific: &str) -> i32 {
    scientific
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse().ok())
        .unwrap_or(0)
}

/// `1.5e6` -> `1.5e+06`.
fn with_signed_exponent(scientific: &str) -> String {
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
        }
        None => scientific.to_string(),
    }
}

/// Drop trailing fraction zeros, keeping any exponent.
fn trim_fraction(text: &str) -> String {
    let (mantissa, exponent) = text.split_at(text.find('e').unwrap_or(text.len()));
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format!("{}{}", mantissa, exponent)
}
