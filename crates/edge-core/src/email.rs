//! Email detection for identifiers that may be either an email or a UUID.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("email pattern is valid")
});

/// Returns `true` if `value` looks like an email address.
///
/// The management API accepts either a developer's email or its UUID wherever
/// a developer is addressed; this is how the two are told apart.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
