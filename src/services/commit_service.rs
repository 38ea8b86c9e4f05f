//! Domain service for OSTree commits and the repos that serve them.

use crate::entities::{commits, installed_packages, packages, repos};
use crate::error::FleetError;
use crate::models::commit::{BuildStatus, NewCommit};

#[async_trait::async_trait]
pub trait CommitService: Send + Sync {
    async fn create(&self, request: NewCommit) -> Result<commits::Model, FleetError>;

    async fn get(&self, org_id: &str, id: i32) -> Result<commits::Model, FleetError>;

    async fn list(&self, org_id: &str) -> Result<Vec<commits::Model>, FleetError>;

    async fn installed_packages(
        &self,
        org_id: &str,
        id: i32,
    ) -> Result<Vec<installed_packages::Model>, FleetError>;

    async fn set_status(
        &self,
        org_id: &str,
        id: i32,
        status: BuildStatus,
    ) -> Result<commits::Model, FleetError>;

    /// Creates the repo for a commit that has none yet.
    async fn attach_repo(
        &self,
        org_id: &str,
        id: i32,
        url: &str,
    ) -> Result<repos::Model, FleetError>;

    /// The commit's repo, if one has been attached.
    async fn repo(&self, org_id: &str, id: i32) -> Result<Option<repos::Model>, FleetError>;

    async fn set_repo_status(
        &self,
        org_id: &str,
        id: i32,
        status: BuildStatus,
    ) -> Result<repos::Model, FleetError>;

    async fn register_package(&self, name: &str) -> Result<packages::Model, FleetError>;

    /// Deletes the commit. Its repo is left in place.
    async fn delete(&self, org_id: &str, id: i32) -> Result<(), FleetError>;
}
