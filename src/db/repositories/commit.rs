use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::db::repositories::membership;
use crate::db::{hooks, timestamp};
use crate::entities::prelude::*;
use crate::entities::{commits, installed_packages, packages, repos};
use crate::error::{FleetError, FleetResult};
use crate::models::commit::{BuildStatus, NewCommit, NewInstalledPackage};

async fn find_live<C: ConnectionTrait>(
    conn: &C,
    org_id: &str,
    id: i32,
) -> FleetResult<commits::Model> {
    Commits::find_by_id(id)
        .filter(commits::Column::OrgId.eq(org_id))
        .filter(commits::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| FleetError::not_found("commit", id))
}

async fn find_repo<C: ConnectionTrait>(
    conn: &C,
    commit: &commits::Model,
) -> FleetResult<Option<repos::Model>> {
    let Some(repo_id) = commit.repo_id else {
        return Ok(None);
    };

    let repo = Repos::find_by_id(repo_id)
        .filter(repos::Column::DeletedAt.is_null())
        .one(conn)
        .await?;

    Ok(repo)
}

async fn insert_installed_package<C: ConnectionTrait>(
    conn: &C,
    package: &NewInstalledPackage,
    now: &str,
) -> FleetResult<installed_packages::Model> {
    let model = installed_packages::ActiveModel {
        name: Set(package.name.clone()),
        arch: Set(package.arch.clone()),
        release: Set(package.release.clone()),
        sigmd5: Set(package.sigmd5.clone()),
        signature: Set(package.signature.clone()),
        package_type: Set(package.package_type.clone()),
        version: Set(package.version.clone()),
        epoch: Set(package.epoch.clone()),
        created_at: Set(now.to_string()),
        updated_at: Set(now.to_string()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model)
}

/// Persistence for commits, their package manifests and their repos.
pub struct CommitRepository {
    conn: DatabaseConnection,
}

impl CommitRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Records the commit and its installed packages in one transaction.
    pub async fn create(&self, request: NewCommit) -> FleetResult<commits::Model> {
        hooks::before_create(&request)?;

        let txn = self.conn.begin().await?;
        let now = timestamp();

        let commit = commits::ActiveModel {
            name: Set(request.name),
            account: Set(request.account),
            org_id: Set(request.org_id),
            image_build_hash: Set(request.image_build_hash),
            image_build_parent_hash: Set(request.image_build_parent_hash),
            image_build_tar_url: Set(request.image_build_tar_url),
            os_tree_commit: Set(request.os_tree_commit),
            os_tree_parent_commit: Set(request.os_tree_parent_commit),
            os_tree_ref: Set(request.os_tree_ref),
            os_tree_parent_ref: Set(request.os_tree_parent_ref),
            build_date: Set(request.build_date),
            build_number: Set(request.build_number),
            blueprint_toml: Set(request.blueprint_toml),
            arch: Set(request.arch),
            compose_job_id: Set(request.compose_job_id),
            status: Set(request.status.as_str().to_string()),
            changes_refs: Set(request.changes_refs),
            repo_id: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut package_ids = Vec::with_capacity(request.installed_packages.len());
        for package in &request.installed_packages {
            package_ids.push(insert_installed_package(&txn, package, &now).await?.id);
        }
        membership::link_packages(&txn, commit.id, &package_ids).await?;

        txn.commit().await?;

        info!(
            org_id = %commit.org_id,
            "Recorded commit {} with {} installed packages",
            commit.id,
            package_ids.len()
        );
        Ok(commit)
    }

    pub async fn get(&self, org_id: &str, id: i32) -> FleetResult<commits::Model> {
        find_live(&self.conn, org_id, id).await
    }

    pub async fn list(&self, org_id: &str) -> FleetResult<Vec<commits::Model>> {
        let rows = Commits::find()
            .filter(commits::Column::OrgId.eq(org_id))
            .filter(commits::Column::DeletedAt.is_null())
            .order_by_desc(commits::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn installed_packages(
        &self,
        org_id: &str,
        id: i32,
    ) -> FleetResult<Vec<installed_packages::Model>> {
        let commit = find_live(&self.conn, org_id, id).await?;

        let rows = commit
            .find_related(InstalledPackages)
            .filter(installed_packages::Column::DeletedAt.is_null())
            .order_by_asc(installed_packages::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn update_status(
        &self,
        org_id: &str,
        id: i32,
        status: BuildStatus,
    ) -> FleetResult<commits::Model> {
        let commit = find_live(&self.conn, org_id, id).await?;

        let mut active = commit.into_active_model();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(timestamp());

        Ok(active.update(&self.conn).await?)
    }

    /// Creates the repo serving this commit. A commit owns at most one repo.
    pub async fn attach_repo(
        &self,
        org_id: &str,
        id: i32,
        url: &str,
    ) -> FleetResult<repos::Model> {
        let txn = self.conn.begin().await?;
        let commit = find_live(&txn, org_id, id).await?;

        if find_repo(&txn, &commit).await?.is_some() {
            return Err(FleetError::UniquenessConflict {
                entity: "repo",
                key: format!("commit {id}"),
            });
        }

        let now = timestamp();
        let repo = repos::ActiveModel {
            url: Set(url.to_string()),
            status: Set(BuildStatus::Building.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut active = commit.into_active_model();
        active.repo_id = Set(Some(repo.id));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(org_id, "Attached repo {} to commit {}", repo.id, id);
        Ok(repo)
    }

    pub async fn get_repo(&self, org_id: &str, id: i32) -> FleetResult<Option<repos::Model>> {
        let commit = find_live(&self.conn, org_id, id).await?;
        find_repo(&self.conn, &commit).await
    }

    pub async fn get_repo_by_id(&self, repo_id: i32) -> FleetResult<repos::Model> {
        Repos::find_by_id(repo_id)
            .filter(repos::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await?
            .ok_or_else(|| FleetError::not_found("repo", repo_id))
    }

    pub async fn update_repo_status(
        &self,
        org_id: &str,
        id: i32,
        status: BuildStatus,
    ) -> FleetResult<repos::Model> {
        let commit = find_live(&self.conn, org_id, id).await?;
        let repo = find_repo(&self.conn, &commit)
            .await?
            .ok_or_else(|| FleetError::not_found("repo", format!("commit {id}")))?;

        let mut active = repo.into_active_model();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(timestamp());

        Ok(active.update(&self.conn).await?)
    }

    /// Package names are global, not tenant-scoped.
    pub async fn ensure_package(&self, name: &str) -> FleetResult<packages::Model> {
        let existing = Packages::find()
            .filter(packages::Column::Name.eq(name))
            .one(&self.conn)
            .await?;
        if let Some(package) = existing {
            return Ok(package);
        }

        let now = timestamp();
        let package = packages::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(|e| FleetError::classify(e, "package", name))?;

        Ok(package)
    }

    /// Soft-deletes the commit after detaching its packages.
    ///
    /// The repo, if any, keeps existing on its own.
    pub async fn delete(&self, org_id: &str, id: i32) -> FleetResult<()> {
        let txn = self.conn.begin().await?;
        let commit = find_live(&txn, org_id, id).await?;

        hooks::before_delete_commit(&txn, commit.id).await?;

        let now = timestamp();
        let mut active = commit.into_active_model();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(org_id, "Deleted commit {}", id);
        Ok(())
    }
}
