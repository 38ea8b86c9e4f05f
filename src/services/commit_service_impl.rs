//! `SeaORM` implementation of the `CommitService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::db::Store;
use crate::entities::{commits, installed_packages, packages, repos};
use crate::error::FleetError;
use crate::models::commit::{BuildStatus, NewCommit};
use crate::services::commit_service::CommitService;

pub struct SeaOrmCommitService {
    store: Store,
}

impl SeaOrmCommitService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommitService for SeaOrmCommitService {
    async fn create(&self, request: NewCommit) -> Result<commits::Model, FleetError> {
        if let Err(err) = request.validate_request() {
            warn!("Rejected commit for build {}: {}", request.image_build_hash, err);
            return Err(err);
        }

        self.store.commit_repo().create(request).await
    }

    async fn get(&self, org_id: &str, id: i32) -> Result<commits::Model, FleetError> {
        self.store.commit_repo().get(org_id, id).await
    }

    async fn list(&self, org_id: &str) -> Result<Vec<commits::Model>, FleetError> {
        self.store.commit_repo().list(org_id).await
    }

    async fn installed_packages(
        &self,
        org_id: &str,
        id: i32,
    ) -> Result<Vec<installed_packages::Model>, FleetError> {
        self.store.commit_repo().installed_packages(org_id, id).await
    }

    async fn set_status(
        &self,
        org_id: &str,
        id: i32,
        status: BuildStatus,
    ) -> Result<commits::Model, FleetError> {
        self.store.commit_repo().update_status(org_id, id, status).await
    }

    async fn attach_repo(
        &self,
        org_id: &str,
        id: i32,
        url: &str,
    ) -> Result<repos::Model, FleetError> {
        self.store.commit_repo().attach_repo(org_id, id, url).await
    }

    async fn repo(&self, org_id: &str, id: i32) -> Result<Option<repos::Model>, FleetError> {
        self.store.commit_repo().get_repo(org_id, id).await
    }

    async fn set_repo_status(
        &self,
        org_id: &str,
        id: i32,
        status: BuildStatus,
    ) -> Result<repos::Model, FleetError> {
        self.store
            .commit_repo()
            .update_repo_status(org_id, id, status)
            .await
    }

    async fn register_package(&self, name: &str) -> Result<packages::Model, FleetError> {
        self.store.commit_repo().ensure_package(name).await
    }

    async fn delete(&self, org_id: &str, id: i32) -> Result<(), FleetError> {
        self.store.commit_repo().delete(org_id, id).await
    }
}
