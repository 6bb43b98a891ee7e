use std::sync::Arc;

use edge_cache::tags::developer_tag;
use edge_cache::{DeveloperCompaniesCache, EdgeCaches, MembershipObjectCache};
use edge_core::{AppGroupMembership, CompanyMembership, MembershipObject, TeamMembersClient};

use crate::ControllerResult;

/// Whole-membership controller for one kind of team.
///
/// Reads go through the membership cache. Mutation responses are not
/// guaranteed to hold the complete membership, so every mutation drops the
/// cached value instead of storing the response.
pub struct MembersController<M: MembershipObject> {
    client: Arc<dyn TeamMembersClient<M>>,
    cache: Arc<MembershipObjectCache<M>>,
    developer_companies: Arc<DeveloperCompaniesCache>,
}

pub type CompanyMembersController = MembersController<CompanyMembership>;

pub type AppGroupMembersController = MembersController<AppGroupMembership>;

impl<M: MembershipObject> MembersController<M> {
    pub fn new(
        client: Arc<dyn TeamMembersClient<M>>,
        cache: Arc<MembershipObjectCache<M>>,
        developer_companies: Arc<DeveloperCompaniesCache>,
    ) -> Self {
        Self {
            client,
            cache,
            developer_companies,
        }
    }

    pub fn cache(&self) -> &Arc<MembershipObjectCache<M>> {
        &self.cache
    }

    pub async fn get_members(&self, team: &str) -> ControllerResult<M> {
        if let Some(membership) = self.cache.get_membership(team).await {
            return Ok(membership);
        }
        let membership = self.client.get_members(team).await?;
        self.cache.save_membership(team, &membership).await;
        Ok(membership)
    }

    /// Adds or updates members. Returns the API response as is.
    pub async fn set_members(&self, team: &str, membership: &M) -> ControllerResult<M> {
        let response = self.client.set_members(team, membership).await?;
        self.cache.remove_membership(team).await;
        self.forget_teams_of(&membership.member_emails()).await;
        Ok(response)
    }

    pub async fn remove_member(&self, team: &str, email: &str) -> ControllerResult<()> {
        self.client.remove_member(team, email).await?;
        self.cache.remove_membership(team).await;
        self.forget_teams_of(&[email]).await;
        Ok(())
    }

    async fn forget_teams_of(&self, emails: &[&str]) {
        let tags: Vec<String> = emails.iter().map(|email| developer_tag(email)).collect();
        if !tags.is_empty() {
            self.developer_companies.invalidate(&tags).await;
        }
    }
}

impl MembersController<CompanyMembership> {
    pub fn for_companies(
        client: Arc<dyn TeamMembersClient<CompanyMembership>>,
        caches: &EdgeCaches,
    ) -> Self {
        Self::new(
            client,
            Arc::clone(&caches.company_memberships),
            Arc::clone(&caches.developer_companies),
        )
    }
}

impl MembersController<AppGroupMembership> {
    pub fn for_app_groups(
        client: Arc<dyn TeamMembersClient<AppGroupMembership>>,
        caches: &EdgeCaches,
    ) -> Self {
        Self::new(
            client,
            Arc::clone(&caches.appgroup_memberships),
            Arc::clone(&caches.developer_companies),
        )
    }
}
