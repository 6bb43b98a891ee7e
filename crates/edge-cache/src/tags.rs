//! Invalidation tag names shared across caches.

/// Tag carried by everything cached about one developer (by email).
pub fn developer_tag(email: &str) -> String {
    format!("developer:{email}")
}

/// Tag carried by everything cached about one company.
pub fn company_tag(name: &str) -> String {
    format!("company:{name}")
}

/// Tag carried by every membership value that lists `email`.
pub fn member_tag(email: &str) -> String {
    format!("member:{email}")
}

/// Tag of a team's membership value (`company:{name}`, `appgroup:{name}`).
pub fn team_tag(kind: &str, team: &str) -> String {
    format!("{kind}:{team}")
}

/// Tag of an owner's app-name index.
pub fn app_names_tag(owner_id: &str) -> String {
    format!("app_names:{owner_id}")
}
