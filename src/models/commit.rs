use std::fmt;

use crate::error::FleetResult;
use crate::models::tenancy::{TenantScoped, ensure_tenant};

/// Build state shared by commits and their repos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Building,
    Error,
    Success,
}

impl BuildStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "BUILDING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Package metadata captured from an image build.
#[derive(Debug, Clone, Default)]
pub struct NewInstalledPackage {
    pub name: String,
    pub arch: String,
    pub release: String,
    pub sigmd5: String,
    pub signature: String,
    pub package_type: String,
    pub version: String,
    pub epoch: Option<String>,
}

/// Request to record an OSTree commit produced by an image build.
#[derive(Debug, Clone)]
pub struct NewCommit {
    pub name: String,
    pub account: String,
    pub org_id: String,
    pub image_build_hash: String,
    pub image_build_parent_hash: String,
    pub image_build_tar_url: String,
    pub os_tree_commit: String,
    pub os_tree_parent_commit: String,
    pub os_tree_ref: String,
    pub os_tree_parent_ref: String,
    pub build_date: String,
    pub build_number: i32,
    pub blueprint_toml: String,
    pub arch: String,
    pub compose_job_id: String,
    pub status: BuildStatus,
    pub changes_refs: bool,
    pub installed_packages: Vec<NewInstalledPackage>,
}

impl NewCommit {
    pub fn new(org_id: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            account: account.into(),
            org_id: org_id.into(),
            image_build_hash: String::new(),
            image_build_parent_hash: String::new(),
            image_build_tar_url: String::new(),
            os_tree_commit: String::new(),
            os_tree_parent_commit: String::new(),
            os_tree_ref: String::new(),
            os_tree_parent_ref: String::new(),
            build_date: String::new(),
            build_number: 0,
            blueprint_toml: String::new(),
            arch: "x86_64".to_string(),
            compose_job_id: String::new(),
            status: BuildStatus::Building,
            changes_refs: false,
            installed_packages: Vec::new(),
        }
    }

    /// Only the tenant is mandatory for a commit.
    pub fn validate_request(&self) -> FleetResult<()> {
        ensure_tenant(self)
    }
}

impl TenantScoped for NewCommit {
    const KIND: &'static str = "commit";

    fn org_id(&self) -> &str {
        &self.org_id
    }
}
