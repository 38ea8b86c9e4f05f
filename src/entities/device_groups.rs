use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "device_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique per `org_id` among rows that are not soft-deleted.
    pub name: String,

    /// Fixed at creation.
    pub account: String,

    /// Fixed at creation.
    #[sea_orm(indexed)]
    pub org_id: String,

    /// `static` or `dynamic`. Fixed at creation.
    #[sea_orm(column_name = "type")]
    pub group_type: String,

    pub created_at: String,

    pub updated_at: String,

    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::device_group_devices::Entity")]
    DeviceGroupDevices,
}

impl Related<super::device_group_devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceGroupDevices.def()
    }
}

impl Related<super::devices::Entity> for Entity {
    fn to() -> RelationDef {
        super::device_group_devices::Relation::Device.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::device_group_devices::Relation::DeviceGroup.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
