use crate::entities::prelude::*;
use crate::entities::device_group_devices;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_from_entity<E>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await?;

    for mut index in schema.create_index_from_entity(entity) {
        manager.create_index(index.if_not_exists().to_owned()).await?;
    }

    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Parents before the join tables that reference them
        create_from_entity(manager, &schema, Repos).await?;
        create_from_entity(manager, &schema, Commits).await?;
        create_from_entity(manager, &schema, InstalledPackages).await?;
        create_from_entity(manager, &schema, CommitInstalledPackages).await?;
        create_from_entity(manager, &schema, Packages).await?;
        create_from_entity(manager, &schema, Devices).await?;
        create_from_entity(manager, &schema, DeviceGroups).await?;
        create_from_entity(manager, &schema, DeviceGroupDevices).await?;

        // A device belongs to at most one group
        manager
            .create_index(
                Index::create()
                    .name("idx_device_group_devices_device_id")
                    .table(DeviceGroupDevices)
                    .col(device_group_devices::Column::DeviceId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Group names are unique per org among live rows only, so a name can
        // be reused once the old group is soft-deleted.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_device_groups_org_id_name \
                 ON device_groups (org_id, name) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeviceGroupDevices).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeviceGroups).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CommitInstalledPackages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InstalledPackages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Commits).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repos).to_owned())
            .await?;

        Ok(())
    }
}
