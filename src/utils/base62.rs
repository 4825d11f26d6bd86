//! Base62 codec for short tokens.
//!
//! Tokens are base-62 numbers read most-significant symbol first: the rightmost
//! symbol has place value `62^0`. The digit carried by each symbol comes from a
//! fixed substitution table instead of the natural `0-9A-Za-z` order, so
//! consecutive ids do not look consecutive once encoded.
//!
//! The table is part of the stored data format. Changing it invalidates every
//! token already handed out.

use thiserror::Error;

/// Number of symbols in the token alphabet.
pub const BASE: u128 = 62;

/// Digit -> symbol. `SYMBOLS[d]` is the symbol that carries digit `d`.
pub const SYMBOLS: [u8; 62] = *b"AaBbCcDd1EeFfGgHh2IiJjKkLl3MmNnOoPp4QqRrSsTt5UuVvWwXx6YyZz7890";

/// Marker for bytes outside the alphabet in [`DIGITS`].
const INVALID: u8 = u8::MAX;

/// Symbol -> digit, indexed by ASCII code. Inverse of [`SYMBOLS`].
const DIGITS: [u8; 128] = invert(&SYMBOLS);

const fn invert(symbols: &[u8; 62]) -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut digit = 0;
    while digit < symbols.len() {
        table[symbols[digit] as usize] = digit as u8;
        digit += 1;
    }
    table
}

/// Errors produced when decoding a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("empty token")]
    Empty,

    #[error("token value does not fit in 128 bits")]
    Overflow,
}

/// Returns the digit assigned to `symbol`, or `None` if it is not in the alphabet.
pub fn digit_of(symbol: char) -> Option<u8> {
    if !symbol.is_ascii() {
        return None;
    }
    match DIGITS[symbol as usize] {
        INVALID => None,
        digit => Some(digit),
    }
}

/// Returns the symbol that carries `digit`.
///
/// # Panics
///
/// Panics if `digit >= 62`.
pub fn symbol_of(digit: u8) -> char {
    SYMBOLS[digit as usize] as char
}

/// Returns `true` if every character of `token` belongs to the alphabet.
///
/// The empty string is vacuously valid; [`decode`] still rejects it.
pub fn is_valid_token(token: &str) -> bool {
    token.chars().all(|c| digit_of(c).is_some())
}

/// Encodes `id` into its shortest token.
///
/// Zero encodes to the single zero-digit symbol `"A"`.
pub fn encode(mut id: u128) -> String {
    if id == 0 {
        return symbol_of(0).to_string();
    }

    let mut buf = Vec::with_capacity(22);
    while id > 0 {
        buf.push(SYMBOLS[(id % BASE) as usize]);
        id /= BASE;
    }
    buf.reverse();

    buf.into_iter().map(char::from).collect()
}

/// Decodes `token` back into an id.
///
/// Leading zero-digit symbols do not change the value, so `"AAB"` and `"B"`
/// decode to the same id.
///
/// # Errors
///
/// - [`CodecError::Empty`] for the empty string
/// - [`CodecError::InvalidCharacter`] for any symbol outside the alphabet
/// - [`CodecError::Overflow`] if the value exceeds `u128::MAX`
pub fn decode(token: &str) -> Result<u128, CodecError> {
    if token.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut value: u128 = 0;
    for (position, character) in token.chars().enumerate() {
        let digit =
            digit_of(character).ok_or(CodecError::InvalidCharacter { character, position })?;

        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or(CodecError::Overflow)?;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_a_permutation_of_alphanumerics() {
        let symbols: HashSet<u8> = SYMBOLS.iter().copied().collect();
        assert_eq!(symbols.len(), 62);
        assert!(symbols.iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tables_agree_in_both_directions() {
        for digit in 0..62u8 {
            assert_eq!(digit_of(symbol_of(digit)), Some(digit));
        }
    }

    #[test]
    fn test_table_matches_stored_assignments() {
        assert_eq!(digit_of('A'), Some(0));
        assert_eq!(digit_of('a'), Some(1));
        assert_eq!(digit_of('1'), Some(8));
        assert_eq!(digit_of('2'), Some(17));
        assert_eq!(digit_of('Z'), Some(56));
        assert_eq!(digit_of('z'), Some(57));
        assert_eq!(digit_of('9'), Some(60));
        assert_eq!(digit_of('0'), Some(61));
    }

    #[test]
    fn test_encode_zero_is_first_symbol() {
        assert_eq!(encode(0), "A");
        assert_eq!(decode("A").unwrap(), 0);
    }

    #[test]
    fn test_rightmost_symbol_is_least_significant() {
        assert_eq!(decode("aA").unwrap(), 62);
        assert_eq!(decode("Aa").unwrap(), 1);
        assert_eq!(decode("00").unwrap(), 61 * 62 + 61);
        assert_eq!(encode(62), "aA");
        assert_eq!(encode(61), "0");
    }

    #[test]
    fn test_leading_zero_symbols_are_ignored() {
        assert_eq!(decode("AAB").unwrap(), decode("B").unwrap());
    }

    #[test]
    fn test_round_trip_across_ranges() {
        let samples = [
            1u128,
            61,
            62,
            63,
            3843,
            3844,
            56_800_235_583, // 62^6 - 1
            56_800_235_584,
            i64::MAX as u128,
            u64::MAX as u128,
            u128::MAX,
        ];

        for n in samples {
            assert_eq!(decode(&encode(n)).unwrap(), n, "round trip failed for {n}");
        }
    }

    #[test]
    fn test_sequential_ids_do_not_encode_to_sequential_symbols() {
        assert_eq!(encode(8), "1");
        assert_eq!(encode(9), "E");
        assert_eq!(encode(10), "e");
    }

    #[test]
    fn test_decode_rejects_characters_outside_alphabet() {
        assert_eq!(
            decode("ab-cd"),
            Err(CodecError::InvalidCharacter {
                character: '-',
                position: 2
            })
        );
        assert!(decode("abc_").is_err());
        assert!(decode("é").is_err());
        assert!(decode("a b").is_err());
    }

    #[test]
    fn test_decode_rejects_empty_token() {
        assert_eq!(decode(""), Err(CodecError::Empty));
    }

    #[test]
    fn test_decode_reports_overflow() {
        let too_long = "0".repeat(30);
        assert_eq!(decode(&too_long), Err(CodecError::Overflow));
    }

    #[test]
    fn test_is_valid_token() {
        assert!(is_valid_token("AbC123"));
        assert!(!is_valid_token("AbC12!"));
        assert!(!is_valid_token("favicon.ico"));
    }
}
