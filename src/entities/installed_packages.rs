use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "installed_packages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub arch: String,
    pub release: String,
    pub sigmd5: String,
    pub signature: String,
    #[sea_orm(column_name = "type")]
    pub package_type: String,
    pub version: String,
    pub epoch: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::commit_installed_packages::Entity")]
    CommitInstalledPackages,
}

impl Related<super::commit_installed_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommitInstalledPackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
