use sea_orm::entity::prelude::*;

/// Join table between groups and devices. A device appears at most once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "device_group_devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub device_group_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub device_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device_groups::Entity",
        from = "Column::DeviceGroupId",
        to = "super::device_groups::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    DeviceGroup,
    #[sea_orm(
        belongs_to = "super::devices::Entity",
        from = "Column::DeviceId",
        to = "super::devices::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Device,
}

impl Related<super::device_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceGroup.def()
    }
}

impl Related<super::devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
