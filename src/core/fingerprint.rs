/*
 * Derives a compact, deterministic fingerprint from the display text of a page
 * item. Items on a modules page have no stable identifier of their own, so the
 * fingerprint of their title is what ties a checkbox to its stored state.
 *
 * The hash is the classic 31-multiplier rolling hash over UTF-16 code units,
 * truncated to a signed 32-bit integer after every step. States saved by
 * earlier versions of the page script are keyed by exactly these values, so the
 * fixed-width wraparound must not change.
 */
use std::fmt;

/// 32-bit signed fingerprint of an item's display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub i32);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>().map(Fingerprint)
    }
}

/*
 * Hashes `text` as-is. For each UTF-16 code unit `c`:
 * `acc = (acc << 5) - acc + c`, wrapping at 32 bits.
 */
pub fn fingerprint_text(text: &str) -> Fingerprint {
    let mut acc: i32 = 0;
    for unit in text.encode_utf16() {
        acc = acc
            .wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit));
    }
    Fingerprint(acc)
}

/*
 * Whitespace and line terminators as the page script's `String.trim` sees
 * them. Differs from `char::is_whitespace`: U+FEFF is trimmed, U+0085 is not.
 */
fn is_script_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{09}'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{20}'
            | '\u{A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{0A}'
            | '\u{0D}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Hashes an item title after trimming surrounding whitespace.
pub fn fingerprint_item_text(text: &str) -> Fingerprint {
    fingerprint_text(text.trim_matches(is_script_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_hashes_to_zero() {
        assert_eq!(fingerprint_text(""), Fingerprint(0));
    }

    #[test]
    fn test_known_values() {
        assert_eq!(fingerprint_text("A"), Fingerprint(65));
        assert_eq!(fingerprint_text("AB"), Fingerprint(2081));
        // Same values any Java-style String.hashCode would produce.
        assert_eq!(fingerprint_text("hello"), Fingerprint(99162322));
        assert_eq!(fingerprint_text("Hello World"), Fingerprint(-862545276));
    }

    #[test]
    fn test_long_text_wraps_instead_of_overflowing() {
        let title = "Module 12: Advanced Topics in Distributed Systems and Consensus";
        let fp = fingerprint_text(title);

        // Reference computed with 64-bit arithmetic reduced mod 2^32.
        let mut wide: u64 = 0;
        for unit in title.encode_utf16() {
            wide = (wide.wrapping_mul(31).wrapping_add(u64::from(unit))) & 0xFFFF_FFFF;
        }
        assert_eq!(fp.0, wide as u32 as i32);
    }

    #[test]
    fn test_deterministic_and_trimmed() {
        let a = fingerprint_item_text("  Week 1 - Introduction \n");
        let b = fingerprint_item_text("Week 1 - Introduction");
        assert_eq!(a, b);
        assert_eq!(a, fingerprint_text("Week 1 - Introduction"));
    }

    #[test]
    fn test_trim_matches_page_script_whitespace() {
        assert_eq!(fingerprint_text("Intro"), Fingerprint(70809164));
        assert_eq!(fingerprint_item_text("\u{feff}Intro\u{3000}"), Fingerprint(70809164));
        assert_eq!(fingerprint_item_text("\u{2028}Intro\u{a0}\t"), Fingerprint(70809164));
        // NEL is not whitespace to the page script, so it stays part of the title.
        assert_eq!(fingerprint_item_text("\u{85}Intro"), Fingerprint(-416481049));
        assert_eq!(fingerprint_item_text("Intro\u{85}"), fingerprint_text("Intro\u{85}"));
    }

    #[test]
    fn test_non_ascii_uses_utf16_code_units() {
        // U+00E9 is a single code unit, U+1F600 is a surrogate pair.
        assert_eq!(fingerprint_text("\u{e9}"), Fingerprint(0xE9));
        let expected = 0xD83Di32.wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(fingerprint_text("\u{1F600}"), Fingerprint(expected));
    }

    #[test]
    fn test_display_and_parse() {
        let fp = Fingerprint(-892741);
        assert_eq!(fp.to_string(), "-892741");
        assert_eq!("-892741".parse::<Fingerprint>().unwrap(), fp);
    }
}
