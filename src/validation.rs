//! # Identifier Validation
//!
//! Format checks for the two identifiers the bot accepts. Both checks are
//! total over any input string and never trim; callers strip whitespace
//! before asking.

use regex::Regex;
use std::sync::LazyLock;

use crate::lookup::LookupKind;

/// 10 ASCII digits starting with 6, 7, 8 or 9.
/// Character classes are spelled out because `\d` also matches non-ASCII digits.
static PHONE_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[6-9][0-9]{9}$").expect("phone number pattern is a valid regex")
});

/// Exactly 12 ASCII digits.
static ID_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("id number pattern is a valid regex"));

/// Check whether `input` is a well-formed mobile phone number
pub fn is_phone_number(input: &str) -> bool {
    PHONE_NUMBER_PATTERN.is_match(input)
}

/// Check whether `input` is a well-formed 12-digit id number
pub fn is_id_number(input: &str) -> bool {
    ID_NUMBER_PATTERN.is_match(input)
}

/// Check `input` against the format of the given lookup kind
pub fn is_valid_for(kind: LookupKind, input: &str) -> bool {
    match kind {
        LookupKind::Phone => is_phone_number(input),
        LookupKind::Id => is_id_number(input),
    }
}

/// Infer which lookup an unprompted message asks for, from its shape alone.
///
/// Phone numbers are tested first; the two formats cannot overlap since
/// their lengths differ.
pub fn classify_identifier(input: &str) -> Option<LookupKind> {
    if is_phone_number(input) {
        Some(LookupKind::Phone)
    } else if is_id_number(input) {
        Some(LookupKind::Id)
    } else {
        None
    }
}
