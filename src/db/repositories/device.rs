use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::db::repositories::membership;
use crate::db::{hooks, timestamp};
use crate::entities::prelude::*;
use crate::entities::{device_groups, devices};
use crate::error::{FleetError, FleetResult};
use crate::models::device::NewDevice;

/// Inserts a device after the tenant guard. Shared with group creation.
pub(crate) async fn insert_device<C: ConnectionTrait>(
    conn: &C,
    request: &NewDevice,
) -> FleetResult<devices::Model> {
    hooks::before_create(request)?;

    let now = timestamp();
    let uuid = request.uuid.to_string();

    devices::ActiveModel {
        name: Set(request.name.clone()),
        uuid: Set(uuid.clone()),
        account: Set(request.account.clone()),
        org_id: Set(request.org_id.clone()),
        available_hash: Set(request.available_hash.clone()),
        current_hash: Set(request.current_hash.clone()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| FleetError::classify(e, "device", uuid))
}

/// Live device owned by `org_id`, or `NotFound`.
pub(crate) async fn find_live<C: ConnectionTrait>(
    conn: &C,
    org_id: &str,
    id: i32,
) -> FleetResult<devices::Model> {
    Devices::find_by_id(id)
        .filter(devices::Column::OrgId.eq(org_id))
        .filter(devices::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| FleetError::not_found("device", id))
}

pub struct DeviceRepository {
    conn: DatabaseConnection,
}

impl DeviceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, request: NewDevice) -> FleetResult<devices::Model> {
        let device = insert_device(&self.conn, &request).await?;
        info!(org_id = %device.org_id, uuid = %device.uuid, "Registered device {}", device.id);
        Ok(device)
    }

    pub async fn get(&self, org_id: &str, id: i32) -> FleetResult<devices::Model> {
        find_live(&self.conn, org_id, id).await
    }

    pub async fn find_by_uuid(
        &self,
        org_id: &str,
        uuid: &Uuid,
    ) -> FleetResult<Option<devices::Model>> {
        let device = Devices::find()
            .filter(devices::Column::Uuid.eq(uuid.to_string()))
            .filter(devices::Column::OrgId.eq(org_id))
            .filter(devices::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await?;

        Ok(device)
    }

    pub async fn list(&self, org_id: &str) -> FleetResult<Vec<devices::Model>> {
        let rows = Devices::find()
            .filter(devices::Column::OrgId.eq(org_id))
            .filter(devices::Column::DeletedAt.is_null())
            .order_by_asc(devices::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// The live group the device currently belongs to, if any.
    pub async fn group_of(
        &self,
        org_id: &str,
        id: i32,
    ) -> FleetResult<Option<device_groups::Model>> {
        let device = find_live(&self.conn, org_id, id).await?;

        let Some(group_id) = membership::group_id_of(&self.conn, device.id).await? else {
            return Ok(None);
        };

        let group = DeviceGroups::find_by_id(group_id)
            .filter(device_groups::Column::OrgId.eq(org_id))
            .filter(device_groups::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await?;

        Ok(group)
    }

    pub async fn update_hashes(
        &self,
        org_id: &str,
        id: i32,
        current_hash: Option<String>,
        available_hash: Option<String>,
    ) -> FleetResult<devices::Model> {
        let device = find_live(&self.conn, org_id, id).await?;

        let mut active: devices::ActiveModel = device.into();
        active.current_hash = Set(current_hash);
        active.available_hash = Set(available_hash);
        active.updated_at = Set(timestamp());

        Ok(active.update(&self.conn).await?)
    }

    /// Soft-deletes the device and drops its group membership.
    pub async fn delete(&self, org_id: &str, id: i32) -> FleetResult<()> {
        let txn = self.conn.begin().await?;

        let device = find_live(&txn, org_id, id).await?;
        membership::unlink_device(&txn, device.id).await?;

        let now = timestamp();
        let mut active: devices::ActiveModel = device.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(org_id, "Removed device {}", id);
        Ok(())
    }
}
