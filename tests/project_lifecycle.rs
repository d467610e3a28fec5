//! End-to-end lifecycle tests over the in-memory AWX collection,
//! starting from YAML documents the way the CLI does.

mod common;

use common::InMemoryProjects;
use tawx::awx::projects::{ProjectApi, ProjectFilter, ScmType};
use tawx::resource::state::parse_document;
use tawx::resource::{ProjectAttributes, ProjectResourceHandler, ProjectState, ResourceError};

const INFRA: &str = r#"
name: infra
scm_type: git
scm_url: https://example/repo.git
organization_id: "3"
credential_id: ""
"#;

#[tokio::test]
async fn test_create_then_read_keeps_scm_url() {
    let api = InMemoryProjects::starting_at(42);
    let handler = ProjectResourceHandler::new(api.clone());
    let desired: ProjectAttributes = parse_document(INFRA).unwrap();

    let created = handler.create(&desired).await.unwrap();
    assert_eq!(created.id, "42");

    let read = handler.read("infra", 3).await.unwrap();
    assert_eq!(read.id, "42");
    assert_eq!(read.attributes.scm_url, "https://example/repo.git");
    assert_eq!(read.attributes.scm_type, ScmType::Git);

    // Empty credential reached the API as absent, not as 0
    let stored = api.get(42).await.unwrap();
    assert_eq!(stored.credential, None);
}

#[tokio::test]
async fn test_printed_state_feeds_back_into_update_and_delete() {
    let api = InMemoryProjects::starting_at(42);
    let handler = ProjectResourceHandler::new(api.clone());
    let desired: ProjectAttributes = parse_document(INFRA).unwrap();

    let created = handler.create(&desired).await.unwrap();

    // Round-trip the state through its JSON rendering, then edit it
    let printed = serde_json::to_string_pretty(&created).unwrap();
    let mut current: ProjectState = parse_document(&printed).unwrap();
    assert_eq!(current, created);

    current.attributes.scm_branch = "stable".to_string();
    current.attributes.scm_update_on_launch = true;
    current.attributes.credential_id = Some(11);

    let updated = handler.update(&current.id, &current.attributes).await.unwrap();
    assert_eq!(updated, current);

    handler
        .delete(&updated.id, updated.attributes.organization_id)
        .await
        .unwrap();
    assert_eq!(api.len().await, 0);

    let cleared = updated.cleared();
    assert!(cleared.id.is_empty());
    assert!(matches!(
        handler.delete("42", 3).await,
        Err(ResourceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_checks_organization() {
    let api = InMemoryProjects::starting_at(42);
    let handler = ProjectResourceHandler::new(api.clone());
    let desired: ProjectAttributes = parse_document(INFRA).unwrap();
    handler.create(&desired).await.unwrap();

    let err = handler.delete("42", 4).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Project with id 42 doesn't exist in the organization 4"
    );
    assert_eq!(api.len().await, 1);
}

#[tokio::test]
async fn test_import_matches_created_state() {
    let api = InMemoryProjects::starting_at(42);
    let handler = ProjectResourceHandler::new(api.clone());
    let desired: ProjectAttributes = parse_document(INFRA).unwrap();

    let created = handler.create(&desired).await.unwrap();
    let imported = handler.import("42").await.unwrap();
    assert_eq!(imported, created);
}

#[tokio::test]
async fn test_read_picks_first_of_several_matches() {
    let api = InMemoryProjects::starting_at(42);
    let desired: ProjectAttributes = parse_document(INFRA).unwrap();

    // Seed two records that break the uniqueness AWX normally guarantees
    api.seed(50, &desired.to_request()).await;
    api.seed(43, &desired.to_request()).await;
    assert_eq!(
        api.list_projects(&ProjectFilter::by_name("infra", 3)).await.unwrap().len(),
        2
    );

    let handler = ProjectResourceHandler::new(api);
    let state = handler.read("infra", 3).await.unwrap();
    assert_eq!(state.id, "43");
}

#[test]
fn test_non_numeric_credential_fails_before_any_call() {
    let document = INFRA.replace(r#"credential_id: """#, "credential_id: vault-key");
    let err = parse_document::<ProjectAttributes>(&document).unwrap_err();
    assert!(format!("{err:#}").contains("invalid reference"));
}
