/*
 * Builds the keys under which toggle states are stored. A key combines the
 * page scope (the course number) with an item fingerprint, so identical item
 * titles in different courses do not share a record.
 */
use super::fingerprint::Fingerprint;
use std::fmt;

pub const KEY_SEPARATOR: char = '_';

/// Context identifier grouping the items of one page, e.g. a course number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(String);

impl Scope {
    /*
     * Accepts only non-empty ASCII digit strings. Keys are split on the first
     * separator, so a scope must never contain one.
     */
    pub fn new(id: &str) -> Option<Self> {
        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            Some(Scope(id.to_string()))
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn make_key(scope: &Scope, fingerprint: Fingerprint) -> StorageKey {
    StorageKey(format!("{scope}{KEY_SEPARATOR}{fingerprint}"))
}

/*
 * Recovers the scope and fingerprint from a raw key. Returns `None` for keys
 * that were not produced by `make_key`, which can happen for imported records.
 */
pub fn split_key(key: &str) -> Option<(Scope, Fingerprint)> {
    let (scope_part, fingerprint_part) = key.split_once(KEY_SEPARATOR)?;
    let scope = Scope::new(scope_part)?;
    let fingerprint = fingerprint_part.parse::<Fingerprint>().ok()?;
    Some((scope, fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::fingerprint_text;

    #[test]
    fn test_make_key_format() {
        let scope = Scope::new("12345").unwrap();
        assert_eq!(make_key(&scope, Fingerprint(88213)).as_str(), "12345_88213");
        assert_eq!(
            make_key(&scope, Fingerprint(-892741)).as_str(),
            "12345_-892741"
        );
    }

    #[test]
    fn test_split_key_round_trips() {
        let scope = Scope::new("987").unwrap();
        for fp in [Fingerprint(0), Fingerprint(i32::MIN), Fingerprint(i32::MAX)] {
            let key = make_key(&scope, fp);
            let (s, f) = split_key(key.as_str()).expect("key should split");
            assert_eq!(s, scope);
            assert_eq!(f, fp);
        }

        let fp = fingerprint_text("Week 3 - Quiz");
        let key = make_key(&scope, fp);
        assert_eq!(split_key(key.as_str()), Some((scope, fp)));
    }

    #[test]
    fn test_split_key_rejects_foreign_keys() {
        assert_eq!(split_key("a"), None);
        assert_eq!(split_key("abc_12"), None);
        assert_eq!(split_key("12_abc"), None);
        assert_eq!(split_key("_12"), None);
        assert_eq!(split_key("12_"), None);
    }

    #[test]
    fn test_scope_validation() {
        assert!(Scope::new("42").is_some());
        assert!(Scope::new("").is_none());
        assert!(Scope::new("4_2").is_none());
        assert!(Scope::new("abc").is_none());
    }
}
