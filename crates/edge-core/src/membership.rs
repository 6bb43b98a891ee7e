//! Team membership values.
//!
//! The management API only reads and writes a team's membership as a whole,
//! so a membership is modelled (and cached) as one composite value rather than
//! as individual member records.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A whole-team membership value.
pub trait MembershipObject: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Team kind, used to namespace cache keys and tags (`company`, `appgroup`).
    const KIND: &'static str;

    /// Email addresses of every member.
    fn member_emails(&self) -> Vec<&str>;
}

/// Members of a company, each with an optional role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMembership {
    members: BTreeMap<String, Option<String>>,
}

impl CompanyMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(|m| (m.into(), None)).collect(),
        }
    }

    pub fn add_member(&mut self, email: impl Into<String>, role: Option<String>) {
        self.members.insert(email.into(), role);
    }

    pub fn remove_member(&mut self, email: &str) -> bool {
        self.members.remove(email).is_some()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.members.contains_key(email)
    }

    pub fn role(&self, email: &str) -> Option<&str> {
        self.members.get(email).and_then(|r| r.as_deref())
    }

    pub fn members(&self) -> &BTreeMap<String, Option<String>> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl MembershipObject for CompanyMembership {
    const KIND: &'static str = "company";

    fn member_emails(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }
}

/// Members of an app group, each with a list of roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGroupMembership {
    members: BTreeMap<String, Vec<String>>,
}

impl AppGroupMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, email: impl Into<String>, roles: Vec<String>) {
        self.members.insert(email.into(), roles);
    }

    pub fn remove_member(&mut self, email: &str) -> bool {
        self.members.remove(email).is_some()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.members.contains_key(email)
    }

    /// Roles of a member; empty for non-members.
    pub fn roles(&self, email: &str) -> &[String] {
        self.members.get(email).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn members(&self) -> &BTreeMap<String, Vec<String>> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl MembershipObject for AppGroupMembership {
    const KIND: &'static str = "appgroup";

    fn member_emails(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }
}
