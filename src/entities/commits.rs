use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "commits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub account: String,

    #[sea_orm(indexed)]
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

    /// `BUILDING`, `ERROR` or `SUCCESS`
    pub status: String,

    pub changes_refs: bool,

    pub repo_id: Option<i32>,

    pub created_at: String,

    pub updated_at: String,

    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repos::Entity",
        from = "Column::RepoId",
        to = "super::repos::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Repo,
    #[sea_orm(has_many = "super::commit_installed_packages::Entity")]
    CommitInstalledPackages,
}

impl Related<super::repos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repo.def()
    }
}

impl Related<super::commit_installed_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommitInstalledPackages.def()
    }
}

impl Related<super::installed_packages::Entity> for Entity {
    fn to() -> RelationDef {
        super::commit_installed_packages::Relation::InstalledPackage.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::commit_installed_packages::Relation::Commit.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
