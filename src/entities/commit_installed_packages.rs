use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "commit_installed_packages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub commit_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub installed_package_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commits::Entity",
        from = "Column::CommitId",
        to = "super::commits::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Commit,
    #[sea_orm(
        belongs_to = "super::installed_packages::Entity",
        from = "Column::InstalledPackageId",
        to = "super::installed_packages::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    InstalledPackage,
}

impl Related<super::commits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commit.def()
    }
}

impl Related<super::installed_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstalledPackage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
