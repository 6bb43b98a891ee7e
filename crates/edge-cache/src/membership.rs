//! Two-tier cache of whole team memberships.
//!
//! ## Tiers
//!
//! - Memory tier: written permanently on every save and backfilled on a
//!   persistent hit
//! - Persistent tier: written with the configured [`MembershipExpiration`],
//!   or not at all when it is [`Disabled`](MembershipExpiration::Disabled)
//!
//! Every entry is tagged `member:{email}` for each member plus the team tag,
//! so a change to one developer drops every membership listing them.
//! Memberships are never patched: any mutation drops the team's entry and
//! the next read reloads it whole.

use std::marker::PhantomData;
use std::time::Duration;

use edge_core::{AppGroupMembership, CompanyMembership, MembershipObject};

use crate::backend::{CacheExpiry, DynBackend};
use crate::codec;
use crate::tags::{member_tag, team_tag};

/// Expiration policy of the persistent tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipExpiration {
    /// Nothing is written to the persistent tier.
    Disabled,
    /// Entries live until invalidated.
    Permanent,
    After(Duration),
}

impl MembershipExpiration {
    /// `0` disables the tier and negative values never expire.
    pub fn from_secs(secs: i64) -> Self {
        match secs {
            0 => Self::Disabled,
            s if s < 0 => Self::Permanent,
            s => Self::After(Duration::from_secs(s.unsigned_abs())),
        }
    }

    fn cache_expiry(self) -> Option<CacheExpiry> {
        match self {
            Self::Disabled => None,
            Self::Permanent => Some(CacheExpiry::Permanent),
            Self::After(ttl) => Some(CacheExpiry::After(ttl)),
        }
    }
}

/// Membership cache for one kind of team.
pub struct MembershipObjectCache<M> {
    memory: DynBackend,
    persistent: DynBackend,
    expiration: MembershipExpiration,
    _membership: PhantomData<fn(&M)>,
}

/// Company memberships.
pub type CompanyMembershipObjectCache = MembershipObjectCache<CompanyMembership>;

/// App group memberships.
pub type AppGroupMembershipObjectCache = MembershipObjectCache<AppGroupMembership>;

impl<M: MembershipObject> MembershipObjectCache<M> {
    pub fn new(memory: DynBackend, persistent: DynBackend, expiration: MembershipExpiration) -> Self {
        Self {
            memory,
            persistent,
            expiration,
            _membership: PhantomData,
        }
    }

    pub fn memory(&self) -> &DynBackend {
        &self.memory
    }

    pub fn persistent(&self) -> &DynBackend {
        &self.persistent
    }

    pub fn expiration(&self) -> MembershipExpiration {
        self.expiration
    }

    fn key(team: &str) -> String {
        format!("{}:{team}", M::KIND)
    }

    fn tags(team: &str, membership: &M) -> Vec<String> {
        membership
            .member_emails()
            .into_iter()
            .map(member_tag)
            .chain(std::iter::once(team_tag(M::KIND, team)))
            .collect()
    }

    async fn read(backend: &DynBackend, key: &str) -> Option<M> {
        let data = backend.get(key).await?;
        let membership = codec::decode_logged(&data, key);
        if membership.is_none() {
            backend.delete(key).await;
        }
        membership
    }

    pub async fn get_membership(&self, team: &str) -> Option<M> {
        let key = Self::key(team);
        if let Some(membership) = Self::read(&self.memory, &key).await {
            return Some(membership);
        }

        let membership = Self::read(&self.persistent, &key).await?;
        tracing::debug!(kind = M::KIND, team = %team, "membership backfilled from persistent tier");
        if let Some(value) = codec::encode_logged(&membership, &key) {
            self.memory
                .set(&key, value, CacheExpiry::Permanent, &Self::tags(team, &membership))
                .await;
        }
        Some(membership)
    }

    pub async fn save_membership(&self, team: &str, membership: &M) {
        let key = Self::key(team);
        let Some(value) = codec::encode_logged(membership, &key) else {
            return;
        };
        let tags = Self::tags(team, membership);
        if let Some(expiry) = self.expiration.cache_expiry() {
            self.persistent.set(&key, value.clone(), expiry, &tags).await;
        }
        self.memory
            .set(&key, value, CacheExpiry::Permanent, &tags)
            .await;
    }

    /// Drops the team's membership from both tiers.
    pub async fn remove_membership(&self, team: &str) {
        let key = Self::key(team);
        self.memory.invalidate(&key).await;
        self.persistent.invalidate(&key).await;
        crate::metrics::record_invalidation(M::KIND);
        tracing::debug!(kind = M::KIND, team = %team, "membership invalidated");
    }

    /// Drops every membership carrying one of `tags` from both tiers.
    pub async fn invalidate_memberships(&self, tags: &[String]) {
        if tags.is_empty() {
            return;
        }
        self.memory.invalidate_tags(tags).await;
        if self.persistent.capabilities().tag_invalidation {
            self.persistent.invalidate_tags(tags).await;
        } else {
            tracing::debug!(
                backend = self.persistent.backend_name(),
                "persistent tier cannot invalidate by tag"
            );
        }
        crate::metrics::record_invalidation(M::KIND);
    }
}
