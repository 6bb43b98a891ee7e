//! Team membership controllers against the fake API.

mod common;

use std::sync::Arc;

use common::{FakeEdge, caches};
use edge_cache::EdgeCaches;
use edge_controller::{
    AppGroupMembersController, CompanyMembersController, DeveloperController,
    TeamMembershipManager,
};
use edge_core::{AppGroupMembership, CompanyMembership};

fn manager(fake: &Arc<FakeEdge>, caches: &Arc<EdgeCaches>) -> TeamMembershipManager {
    TeamMembershipManager::new(
        CompanyMembersController::for_companies(fake.clone(), caches),
        fake.clone(),
        Arc::clone(caches),
    )
}

#[tokio::test]
async fn test_get_members_reads_through_once() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_company_members("acme", &["a@example.com", "b@example.com"]);
    let caches = caches();
    let members = CompanyMembersController::for_companies(fake.clone(), &caches);

    let first = members.get_members("acme").await.unwrap();
    let second = members.get_members("acme").await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(fake.calls("company_members.get"), 1);
}

#[tokio::test]
async fn test_set_members_never_caches_the_partial_response() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_company_members("acme", &["a@example.com"]);
    let caches = caches();
    let members = CompanyMembersController::for_companies(fake.clone(), &caches);
    members.get_members("acme").await.unwrap();

    let response = members
        .set_members("acme", &CompanyMembership::from_members(["b@example.com"]))
        .await
        .unwrap();
    assert_eq!(response.len(), 1);
    assert!(members.cache().get_membership("acme").await.is_none());

    let reloaded = members.get_members("acme").await.unwrap();
    assert!(reloaded.contains("a@example.com"));
    assert!(reloaded.contains("b@example.com"));
    assert_eq!(fake.calls("company_members.get"), 2);
}

#[tokio::test]
async fn test_remove_member_drops_the_membership() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_company_members("acme", &["a@example.com", "b@example.com"]);
    let caches = caches();
    let members = CompanyMembersController::for_companies(fake.clone(), &caches);
    members.get_members("acme").await.unwrap();

    members.remove_member("acme", "a@example.com").await.unwrap();

    let reloaded = members.get_members("acme").await.unwrap();
    assert!(!reloaded.contains("a@example.com"));
    assert_eq!(reloaded.len(), 1);
}

#[tokio::test]
async fn test_app_group_roles_are_cached() {
    let fake = FakeEdge::new();
    fake.add_appgroup_member("team-x", "a@example.com", &["admin", "viewer"]);
    let caches = caches();
    let members = AppGroupMembersController::for_app_groups(fake.clone(), &caches);

    let membership = members.get_members("team-x").await.unwrap();
    assert_eq!(membership.roles("a@example.com"), ["admin", "viewer"]);

    let mut update = AppGroupMembership::new();
    update.add_member("b@example.com", vec!["viewer".to_string()]);
    members.set_members("team-x", &update).await.unwrap();

    let reloaded = members.get_members("team-x").await.unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(fake.calls("appgroup_members.get"), 2);
}

#[tokio::test]
async fn test_kinds_do_not_collide_on_team_name() {
    let fake = FakeEdge::new();
    fake.add_company("shared");
    fake.add_company_members("shared", &["company@example.com"]);
    fake.add_appgroup_member("shared", "group@example.com", &[]);
    let caches = caches();
    let companies = CompanyMembersController::for_companies(fake.clone(), &caches);
    let groups = AppGroupMembersController::for_app_groups(fake.clone(), &caches);

    let company = companies.get_members("shared").await.unwrap();
    let group = groups.get_members("shared").await.unwrap();

    assert!(company.contains("company@example.com"));
    assert!(group.contains("group@example.com"));
    assert!(!group.contains("company@example.com"));
}

#[tokio::test]
async fn test_missing_team_is_not_cached() {
    let fake = FakeEdge::new();
    let caches = caches();
    let members = CompanyMembersController::for_companies(fake.clone(), &caches);

    assert!(members.get_members("nope").await.unwrap_err().is_not_found());
    assert!(members.get_members("nope").await.is_err());
    assert_eq!(fake.calls("company_members.get"), 2);
}

#[tokio::test]
async fn test_manager_lists_member_emails() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_company_members("acme", &["b@example.com", "a@example.com"]);
    let caches = caches();

    let emails = manager(&fake, &caches).get_members("acme").await.unwrap();

    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_teams_of_developer_follow_membership_changes() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_company("globex");
    fake.add_company_members("acme", &["jane@example.com"]);
    let caches = caches();
    let manager = manager(&fake, &caches);

    assert_eq!(manager.get_teams("jane@example.com").await.unwrap(), vec!["acme"]);
    assert_eq!(manager.get_teams("jane@example.com").await.unwrap(), vec!["acme"]);
    assert_eq!(fake.calls("developer_companies.get"), 1);

    manager
        .add_members("globex", &["jane@example.com".to_string()])
        .await
        .unwrap();
    assert_eq!(
        manager.get_teams("jane@example.com").await.unwrap(),
        vec!["acme", "globex"]
    );
    assert_eq!(fake.calls("developer_companies.get"), 2);

    manager
        .remove_members("acme", &["jane@example.com".to_string()])
        .await
        .unwrap();
    assert_eq!(manager.get_teams("jane@example.com").await.unwrap(), vec!["globex"]);
}

#[tokio::test]
async fn test_membership_change_evicts_the_developer() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_developer("uuid-1", "jane@example.com");
    let caches = caches();
    let developers = DeveloperController::new(fake.clone(), Arc::clone(&caches));
    developers.load("uuid-1").await.unwrap();

    manager(&fake, &caches)
        .add_members("acme", &["jane@example.com".to_string()])
        .await
        .unwrap();

    assert!(caches.developers.get_entity("uuid-1").await.is_none());
    assert!(caches.developers.get_entity("jane@example.com").await.is_none());
    developers.load("jane@example.com").await.unwrap();
    assert_eq!(fake.calls("developer.load"), 2);
}

#[tokio::test]
async fn test_membership_survives_in_the_persistent_tier() {
    let fake = FakeEdge::new();
    fake.add_company("acme");
    fake.add_company_members("acme", &["a@example.com"]);
    let caches = caches();
    let members = CompanyMembersController::for_companies(fake.clone(), &caches);
    members.get_members("acme").await.unwrap();

    caches.company_memberships.memory().delete_all().await;

    members.get_members("acme").await.unwrap();
    assert_eq!(fake.calls("company_members.get"), 1);
}
