/*
 * Extracts the page scope (the course number) from a page address such as
 * `https://example.instructure.com/courses/12345/modules`.
 *
 * A missing scope is treated as a startup precondition failure: callers are
 * expected to abort instead of falling back to some default scope, since that
 * would silently mix toggle states of unrelated courses.
 */
use super::storage_key::Scope;

const SCOPE_PATH_MARKER: &str = "courses/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    NoAddress,
    NotFound(String),
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::NoAddress => write!(
                f,
                "No page address given and no previously used address is remembered"
            ),
            ScopeError::NotFound(address) => {
                write!(f, "No course number found in page address: {address}")
            }
        }
    }
}

impl std::error::Error for ScopeError {}

pub type Result<T> = std::result::Result<T, ScopeError>;

/*
 * Returns the digits following the first `courses/` segment that is followed
 * by at least one digit.
 */
pub fn resolve_scope(address: &str) -> Result<Scope> {
    for (start, _) in address.match_indices(SCOPE_PATH_MARKER) {
        let rest = &address[start + SCOPE_PATH_MARKER.len()..];
        let digits_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if let Some(scope) = Scope::new(&rest[..digits_len]) {
            log::debug!("ScopeResolver: Resolved scope '{scope}' from '{address}'.");
            return Ok(scope);
        }
    }
    log::warn!("ScopeResolver: No scope in address '{address}'.");
    Err(ScopeError::NotFound(address.to_string()))
}
