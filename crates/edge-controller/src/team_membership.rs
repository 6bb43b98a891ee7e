use std::sync::Arc;

use edge_cache::EdgeCaches;
use edge_cache::tags::developer_tag;
use edge_core::{CompanyMembership, DeveloperCompaniesClient, MembershipObject};

use crate::ControllerResult;
use crate::members::CompanyMembersController;

/// Team membership operations in terms of developer emails.
///
/// A developer entity lists its companies, so every member change also
/// drops the affected developers and their cached company lists.
pub struct TeamMembershipManager {
    members: CompanyMembersController,
    companies_client: Arc<dyn DeveloperCompaniesClient>,
    caches: Arc<EdgeCaches>,
}

impl TeamMembershipManager {
    pub fn new(
        members: CompanyMembersController,
        companies_client: Arc<dyn DeveloperCompaniesClient>,
        caches: Arc<EdgeCaches>,
    ) -> Self {
        Self {
            members,
            companies_client,
            caches,
        }
    }

    /// Emails of the team's members.
    pub async fn get_members(&self, team: &str) -> ControllerResult<Vec<String>> {
        let membership = self.members.get_members(team).await?;
        Ok(membership
            .member_emails()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub async fn add_members(&self, team: &str, emails: &[String]) -> ControllerResult<()> {
        let membership = CompanyMembership::from_members(emails.iter().cloned());
        self.members.set_members(team, &membership).await?;
        self.invalidate_developers(emails).await;
        Ok(())
    }

    pub async fn remove_members(&self, team: &str, emails: &[String]) -> ControllerResult<()> {
        for email in emails {
            self.members.remove_member(team, email).await?;
        }
        self.invalidate_developers(emails).await;
        Ok(())
    }

    /// Names of the teams a developer is a member of.
    pub async fn get_teams(&self, email: &str) -> ControllerResult<Vec<String>> {
        if let Some(teams) = self.caches.developer_companies.get(email).await {
            return Ok(teams);
        }
        let teams = self.companies_client.get_companies(email).await?;
        self.caches.developer_companies.save(email, &teams).await;
        Ok(teams)
    }

    async fn invalidate_developers(&self, emails: &[String]) {
        if emails.is_empty() {
            return;
        }
        let tags: Vec<String> = emails.iter().map(|email| developer_tag(email)).collect();
        self.caches.developers.remove_entities(emails).await;
        self.caches.developers.backend().invalidate_tags(&tags).await;
        self.caches.developer_companies.invalidate(&tags).await;
    }
}
