use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Hardware identifier reported by the device
    #[sea_orm(unique)]
    pub uuid: String,

    pub account: String,

    #[sea_orm(indexed)]
    pub org_id: String,

    pub available_hash: Option<String>,

    pub current_hash: Option<String>,

    pub created_at: String,

    pub updated_at: String,

    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::device_group_devices::Entity")]
    DeviceGroupDevices,
}

impl Related<super::device_group_devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceGroupDevices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
