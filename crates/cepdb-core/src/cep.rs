//! CEP (Brazilian postal code) syntactic validation.

/// Returns `true` iff `code` is exactly 8 ASCII digits with no separators.
///
/// Purely syntactic — a well-formed code may still be unknown to the
/// geocoding provider.
#[must_use]
pub fn is_valid_cep(code: &str) -> bool {
    code.len() == 8 && code.bytes().all(|b| b.is_ascii_digit())
}
