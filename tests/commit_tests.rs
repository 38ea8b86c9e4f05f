//! Commits, their package manifests and repo ownership.

use fleet_store::db::Store;
use fleet_store::error::FleetError;
use fleet_store::models::commit::{BuildStatus, NewCommit, NewInstalledPackage};
use fleet_store::services::{CommitService, SeaOrmCommitService};

async fn open_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to open store")
}

fn package(name: &str) -> NewInstalledPackage {
    NewInstalledPackage {
        name: name.to_string(),
        arch: "x86_64".to_string(),
        release: "1.el9".to_string(),
        version: "1.0.0".to_string(),
        package_type: "rpm".to_string(),
        ..Default::default()
    }
}

fn build(org_id: &str) -> NewCommit {
    let mut commit = NewCommit::new(org_id, "111111");
    commit.name = "edge-image".to_string();
    commit.image_build_hash = "abc123".to_string();
    commit.os_tree_ref = "rhel/9/x86_64/edge".to_string();
    commit.build_number = 1;
    commit
}

#[tokio::test]
async fn commit_requires_org() {
    let store = open_store().await;
    let commits = SeaOrmCommitService::new(store.clone());

    let err = commits.create(build("")).await.unwrap_err();
    assert!(matches!(err, FleetError::MissingTenant { entity: "commit" }));

    let err = store.commit_repo().create(build("")).await.unwrap_err();
    assert!(matches!(err, FleetError::MissingTenant { .. }));
    assert!(store.commit_repo().list("").await.unwrap().is_empty());

    let created = commits.create(build("222222")).await.unwrap();
    assert_eq!(created.org_id, "222222");
    assert_eq!(created.status, "BUILDING");
    assert!(!created.changes_refs);
    assert_eq!(created.repo_id, None);
}

#[tokio::test]
async fn commit_keeps_installed_packages() {
    let store = open_store().await;
    let commits = SeaOrmCommitService::new(store.clone());

    let mut request = build("org-pkg");
    request.installed_packages = vec![package("vim"), package("bash")];
    let created = commits.create(request).await.unwrap();

    let installed = commits.installed_packages("org-pkg", created.id).await.unwrap();
    let names: Vec<&str> = installed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["bash", "vim"]);

    let err = commits.installed_packages("org-other", created.id).await.unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
}

#[tokio::test]
async fn status_updates_stay_within_org() {
    let store = open_store().await;
    let commits = SeaOrmCommitService::new(store.clone());

    let created = commits.create(build("org-status")).await.unwrap();

    let updated = commits
        .set_status("org-status", created.id, BuildStatus::Success)
        .await
        .unwrap();
    assert_eq!(updated.status, "SUCCESS");

    let err = commits
        .set_status("org-other", created.id, BuildStatus::Error)
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
    assert_eq!(
        commits.get("org-status", created.id).await.unwrap().status,
        "SUCCESS"
    );
}

#[tokio::test]
async fn commit_owns_one_repo_that_outlives_it() {
    let store = open_store().await;
    let commits = SeaOrmCommitService::new(store.clone());
    let org = "org-repo";

    let mut request = build(org);
    request.installed_packages = vec![package("systemd")];
    let created = commits.create(request).await.unwrap();
    assert!(commits.repo(org, created.id).await.unwrap().is_none());

    let repo = commits
        .attach_repo(org, created.id, "https://repos.example.com/org-repo/1")
        .await
        .unwrap();
    assert_eq!(repo.status, "BUILDING");
    assert_eq!(commits.get(org, created.id).await.unwrap().repo_id, Some(repo.id));

    let err = commits
        .attach_repo(org, created.id, "https://repos.example.com/second")
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::UniquenessConflict { entity: "repo", .. }));
    let attached = commits.repo(org, created.id).await.unwrap().unwrap();
    assert_eq!(attached.id, repo.id);
    assert!(matches!(
        commits.repo("org-other", created.id).await,
        Err(FleetError::NotFound { .. })
    ));

    let repo = commits
        .set_repo_status(org, created.id, BuildStatus::Success)
        .await
        .unwrap();
    assert_eq!(repo.status, "SUCCESS");

    commits.delete(org, created.id).await.unwrap();

    assert!(matches!(
        commits.get(org, created.id).await,
        Err(FleetError::NotFound { .. })
    ));
    assert!(commits.list(org).await.unwrap().is_empty());

    let survivor = store.commit_repo().get_repo_by_id(repo.id).await.unwrap();
    assert_eq!(survivor.url, "https://repos.example.com/org-repo/1");
}

#[tokio::test]
async fn register_package_is_idempotent() {
    let store = open_store().await;
    let commits = SeaOrmCommitService::new(store);

    let first = commits.register_package("podman").await.unwrap();
    let second = commits.register_package("podman").await.unwrap();
    assert_eq!(first.id, second.id);
}
