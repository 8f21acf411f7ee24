//! Display formatting for response values and term exponents.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ExponentError {
    #[error("exponent {0} is not a whole or half-integer value")]
    NotHalfInteger(f64),
    #[error("exponent is not a finite number")]
    NotFinite,
    #[error("exponent {0} is too large to display")]
    OutOfRange(f64),
}

/// 2^63; the first magnitude an `i64` cannot hold.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A term exponent restricted to whole numbers and exact halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExponentDisplay {
    Whole(i64),
    /// `numerator / 2`, numerator always odd.
    Half { numerator: i64 },
}

impl ExponentDisplay {
    /// Markup fragment: plain digits, or a superscript numerator over a subscript 2.
    pub fn to_markup(&self) -> String {
        match self {
            ExponentDisplay::Whole(value) => value.to_string(),
            ExponentDisplay::Half { numerator } => format!(
                "<label class=\"fraction\"><sup>{numerator}</sup>&frasl;<sub>2</sub></label>"
            ),
        }
    }

    /// Subscript digits for surfaces that cannot render markup.
    pub fn to_unicode(&self) -> String {
        match self {
            ExponentDisplay::Whole(value) => subscript(&value.to_string()),
            ExponentDisplay::Half { numerator } => {
                format!("{}\u{2044}\u{2082}", subscript(&numerator.to_string()))
            }
        }
    }
}

impl fmt::Display for ExponentDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExponentDisplay::Whole(value) => write!(f, "{value}"),
            ExponentDisplay::Half { numerator } => write!(f, "{numerator}/2"),
        }
    }
}

pub fn format_exponent(value: f64) -> Result<ExponentDisplay, ExponentError> {
    if !value.is_finite() {
        return Err(ExponentError::NotFinite);
    }
    let doubled = value * 2.0;
    if doubled.abs() >= I64_LIMIT {
        return Err(ExponentError::OutOfRange(value));
    }
    if value.fract() == 0.0 {
        return Ok(ExponentDisplay::Whole(value as i64));
    }
    if doubled.fract() == 0.0 {
        return Ok(ExponentDisplay::Half {
            numerator: doubled as i64,
        });
    }
    Err(ExponentError::NotHalfInteger(value))
}

/// Markup form of [`format_exponent`].
pub fn format_fraction(value: f64) -> Result<String, ExponentError> {
    Ok(format_exponent(value)?.to_markup())
}

/// Renders a JSON value the way the viewer page shows it as cell text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                let float = number.as_f64().unwrap_or_default();
                if float.fract() == 0.0 && float.abs() < 1e15 {
                    format!("{}", float as i64)
                } else {
                    float.to_string()
                }
            }
        }
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn superscript(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '0' => '\u{2070}',
            '1' => '\u{00b9}',
            '2' => '\u{00b2}',
            '3' => '\u{00b3}',
            '4'..='9' => char::from_u32(0x2070 + (ch as u32 - '0' as u32)).unwrap_or(ch),
            '-' => '\u{207b}',
            other => other,
        })
        .collect()
}

pub fn subscript(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '0'..='9' => char::from_u32(0x2080 + (ch as u32 - '0' as u32)).unwrap_or(ch),
            '-' => '\u{208b}',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn whole_exponents_render_as_plain_numbers() {
        for n in 0..20 {
            assert_eq!(format_fraction(n as f64).expect("format"), n.to_string());
        }
    }

    #[test]
    fn half_exponents_render_doubled_numerator_over_two() {
        for n in 0..20i64 {
            let markup = format_fraction(n as f64 + 0.5).expect("format");
            assert_eq!(
                markup,
                format!(
                    "<label class=\"fraction\"><sup>{}</sup>&frasl;<sub>2</sub></label>",
                    2 * n + 1
                )
            );
        }
    }

    #[test]
    fn other_fractions_are_flagged() {
        assert_eq!(
            format_exponent(0.25),
            Err(ExponentError::NotHalfInteger(0.25))
        );
        assert_eq!(format_exponent(f64::NAN), Err(ExponentError::NotFinite));
    }

    #[test]
    fn exponents_beyond_integer_range_are_flagged() {
        assert_eq!(format_exponent(1e300), Err(ExponentError::OutOfRange(1e300)));
        assert_eq!(format_exponent(-1e300), Err(ExponentError::OutOfRange(-1e300)));
        assert_eq!(format_exponent(1e15), Ok(ExponentDisplay::Whole(1_000_000_000_000_000)));
    }

    #[test]
    fn plain_and_unicode_forms() {
        let half = format_exponent(2.5).expect("format");
        assert_eq!(half.to_string(), "5/2");
        assert_eq!(half.to_unicode(), "\u{2085}\u{2044}\u{2082}");
        assert_eq!(superscript("12"), "\u{00b9}\u{00b2}");
        assert_eq!(superscript("4"), "\u{2074}");
    }

    #[test]
    fn displays_json_values_like_cell_text() {
        assert_eq!(display_value(&json!("\u{2191}")), "\u{2191}");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(-1)), "-1");
        assert_eq!(display_value(&json!(1.0)), "1");
        assert_eq!(display_value(&json!(0.5)), "0.5");
        assert_eq!(display_value(&json!([1, "a"])), "1,a");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_markup("<b>&\""), "&lt;b&gt;&amp;&quot;");
    }
}
