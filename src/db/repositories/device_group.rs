use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::info;

use crate::db::repositories::device::insert_device;
use crate::db::repositories::membership;
use crate::db::{hooks, timestamp};
use crate::entities::prelude::*;
use crate::entities::{device_groups, devices};
use crate::error::{FleetError, FleetResult};
use crate::models::device_group::{DeviceGroupUpdate, DeviceGroupWithDevices, NewDeviceGroup};

const ENTITY: &str = "device group";

async fn find_live<C: ConnectionTrait>(
    conn: &C,
    org_id: &str,
    id: i32,
) -> FleetResult<device_groups::Model> {
    DeviceGroups::find_by_id(id)
        .filter(device_groups::Column::OrgId.eq(org_id))
        .filter(device_groups::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| FleetError::not_found(ENTITY, id))
}

async fn load_members<C: ConnectionTrait>(
    conn: &C,
    group: &device_groups::Model,
) -> FleetResult<Vec<devices::Model>> {
    let rows = group
        .find_related(Devices)
        .filter(devices::Column::DeletedAt.is_null())
        .order_by_asc(devices::Column::Id)
        .all(conn)
        .await?;

    Ok(rows)
}

/// Persistence for device groups. Field validation is expected to have run
/// already; this layer only applies the lifecycle hooks.
pub struct DeviceGroupRepository {
    conn: DatabaseConnection,
}

impl DeviceGroupRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates the group and any new member devices in one transaction.
    pub async fn create(&self, request: NewDeviceGroup) -> FleetResult<DeviceGroupWithDevices> {
        hooks::before_create_device_group(&request)?;

        let txn = self.conn.begin().await?;
        let now = timestamp();

        let group = device_groups::ActiveModel {
            name: Set(request.name.clone()),
            account: Set(request.account.clone()),
            org_id: Set(request.org_id.clone()),
            group_type: Set(request.group_type.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| FleetError::classify(e, ENTITY, &request.name))?;

        let mut devices = Vec::with_capacity(request.devices.len());
        for device in &request.devices {
            devices.push(insert_device(&txn, device).await?);
        }

        let device_ids: Vec<i32> = devices.iter().map(|d| d.id).collect();
        membership::link_devices(&txn, group.id, &device_ids).await?;

        txn.commit().await?;

        info!(
            org_id = %group.org_id,
            "Created device group '{}' ({}) with {} devices",
            group.name,
            group.id,
            devices.len()
        );

        Ok(DeviceGroupWithDevices { group, devices })
    }

    pub async fn get(&self, org_id: &str, id: i32) -> FleetResult<DeviceGroupWithDevices> {
        let group = find_live(&self.conn, org_id, id).await?;
        let devices = load_members(&self.conn, &group).await?;
        Ok(DeviceGroupWithDevices { group, devices })
    }

    pub async fn find_by_name(
        &self,
        org_id: &str,
        name: &str,
    ) -> FleetResult<Option<device_groups::Model>> {
        let group = DeviceGroups::find()
            .filter(device_groups::Column::OrgId.eq(org_id))
            .filter(device_groups::Column::Name.eq(name))
            .filter(device_groups::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await?;

        Ok(group)
    }

    pub async fn list(&self, org_id: &str) -> FleetResult<Vec<device_groups::Model>> {
        let rows = DeviceGroups::find()
            .filter(device_groups::Column::OrgId.eq(org_id))
            .filter(device_groups::Column::DeletedAt.is_null())
            .order_by_asc(device_groups::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn members(&self, org_id: &str, id: i32) -> FleetResult<Vec<devices::Model>> {
        let group = find_live(&self.conn, org_id, id).await?;
        load_members(&self.conn, &group).await
    }

    /// Applies a rename and membership changes. Nothing else about a group
    /// can be changed through this call.
    pub async fn update(
        &self,
        org_id: &str,
        id: i32,
        update: DeviceGroupUpdate,
    ) -> FleetResult<DeviceGroupWithDevices> {
        let txn = self.conn.begin().await?;
        let group = find_live(&txn, org_id, id).await?;

        if let Some(name) = update.name.filter(|name| *name != group.name) {
            let mut active = group.clone().into_active_model();
            active.name = Set(name.clone());
            active.updated_at = Set(timestamp());
            active
                .update(&txn)
                .await
                .map_err(|e| FleetError::classify(e, ENTITY, name))?;
        }

        if !update.add_devices.is_empty() {
            let wanted: BTreeSet<i32> = update.add_devices.iter().copied().collect();
            let found = Devices::find()
                .filter(devices::Column::Id.is_in(wanted.iter().copied()))
                .filter(devices::Column::OrgId.eq(org_id))
                .filter(devices::Column::DeletedAt.is_null())
                .all(&txn)
                .await?;

            if let Some(missing) = wanted
                .iter()
                .find(|id| !found.iter().any(|device| device.id == **id))
            {
                return Err(FleetError::not_found("device", missing));
            }

            let current = membership::member_ids(&txn, group.id).await?;
            let ids: Vec<i32> = wanted
                .into_iter()
                .filter(|id| !current.contains(id))
                .collect();
            membership::link_devices(&txn, group.id, &ids)
                .await
                .map_err(|e| {
                    FleetError::classify(e, "device group membership", format!("{ids:?}"))
                })?;
        }

        membership::unlink_devices(&txn, group.id, &update.remove_devices).await?;

        txn.commit().await?;

        info!(org_id, "Updated device group {}", id);
        self.get(org_id, id).await
    }

    /// Writes back a full group model, as loaded and edited by a caller.
    ///
    /// Only the name actually changes; the pre-update hook pins the rest.
    pub async fn save(
        &self,
        org_id: &str,
        edited: device_groups::Model,
    ) -> FleetResult<device_groups::Model> {
        let txn = self.conn.begin().await?;
        let persisted = find_live(&txn, org_id, edited.id).await?;

        let name = edited.name.clone();
        let mut changes = edited.into_active_model().reset_all();
        hooks::before_update_device_group(&persisted, &mut changes);

        let saved = changes
            .update(&txn)
            .await
            .map_err(|e| FleetError::classify(e, ENTITY, name))?;

        txn.commit().await?;
        Ok(saved)
    }

    /// Cascades to the member devices, then soft-deletes the group.
    ///
    /// Returns how many devices were removed with it.
    pub async fn delete(&self, org_id: &str, id: i32) -> FleetResult<u64> {
        let txn = self.conn.begin().await?;
        let group = find_live(&txn, org_id, id).await?;

        let removed = hooks::before_delete_device_group(&txn, group.id).await?;

        let now = timestamp();
        let mut active = group.into_active_model();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(org_id, "Deleted device group {} and {} devices", id, removed);
        Ok(removed)
    }

    /// Runs only the pre-delete cascade. The group row stays in place.
    pub async fn run_before_delete(&self, org_id: &str, id: i32) -> FleetResult<u64> {
        let txn = self.conn.begin().await?;
        let group = find_live(&txn, org_id, id).await?;
        let removed = hooks::before_delete_device_group(&txn, group.id).await?;
        txn.commit().await?;
        Ok(removed)
    }
}
