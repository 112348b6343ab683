//! Masking engine
//!
//! Pure transformation of a raw PII value into its display form:
//!
//! | field               | partial                         | full                 |
//! | firstName/lastName  | first char + `***`              | `***`                |
//! | phone               | `555***67` over an 8+ digit run | every digit as `*`   |
//! | email               | `j***@domain`                   | `***@***`            |
//! | address             | first 3 chars + `***`           | `***`                |
//! | other               | first char + `***`              | `***`                |
//!
//! The function is total: malformed input degrades to a defined fallback
//! (usually the value unchanged) instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::field::FieldKind;
use crate::level::MaskLevel;

const MASK: &str = "***";
const MASKED_EMAIL: &str = "***@***";

/// Shortest digit run partial phone masking applies to: 3 kept, 3 hidden, 2 kept
static PHONE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{8,}").unwrap());

/// Mask `value` as a `field` at the given level.
pub fn mask(value: &str, field: &FieldKind, level: MaskLevel) -> String {
    if value.is_empty() {
        return String::new();
    }

    let field = field.canonical();
    match level {
        MaskLevel::None => value.to_string(),
        MaskLevel::Partial => mask_partial(value, &field),
        MaskLevel::Full => mask_full(value, &field),
    }
}

fn mask_partial(value: &str, field: &FieldKind) -> String {
    match field {
        FieldKind::FirstName | FieldKind::LastName | FieldKind::Other(_) => keep_prefix(value, 1),
        FieldKind::Phone => mask_phone_partial(value),
        FieldKind::Email => mask_email_partial(value),
        FieldKind::Address => keep_prefix(value, 3),
    }
}

fn mask_full(value: &str, field: &FieldKind) -> String {
    match field {
        FieldKind::Phone => value
            .chars()
            .map(|c| if c.is_ascii_digit() { '*' } else { c })
            .collect(),
        FieldKind::Email => MASKED_EMAIL.to_string(),
        FieldKind::FirstName | FieldKind::LastName | FieldKind::Address | FieldKind::Other(_) => {
            MASK.to_string()
        }
    }
}

/// First `n` characters followed by the mask; shorter values keep what they have.
fn keep_prefix(value: &str, n: usize) -> String {
    let mut out: String = value.chars().take(n).collect();
    out.push_str(MASK);
    out
}

fn mask_phone_partial(value: &str) -> String {
    let Some(run) = PHONE_DIGIT_RUN.find(value) else {
        // Too few consecutive digits to mask; shown as entered
        return value.to_string();
    };

    let digits = run.as_str();
    let mut out = String::with_capacity(value.len());
    out.push_str(&value[..run.start()]);
    out.push_str(&digits[..3]);
    out.push_str(MASK);
    out.push_str(&digits[digits.len() - 2..]);
    out.push_str(&value[run.end()..]);
    out
}

fn mask_email_partial(value: &str) -> String {
    match value.split_once('@') {
        Some((local, domain)) => {
            let mut out: String = local.chars().take(1).collect();
            out.push_str(MASK);
            out.push('@');
            out.push_str(domain);
            out
        }
        // Not an address; nothing to anchor the mask on
        None => value.to_string(),
    }
}
