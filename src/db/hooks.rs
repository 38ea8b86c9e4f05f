//! Checks and side effects that run around each mutation.
//!
//! Repositories call these explicitly inside the transaction of the mutation
//! they guard. A returned error aborts that transaction.

use sea_orm::{ActiveValue, ConnectionTrait};
use tracing::debug;

use crate::db::repositories::membership;
use crate::db::timestamp;
use crate::entities::device_groups;
use crate::error::{FleetError, FleetResult};
use crate::models::device_group::NewDeviceGroup;
use crate::models::tenancy::{TenantScoped, ensure_same_tenant, ensure_tenant};

/// Tenant guard for any org-scoped entity.
pub fn before_create<T: TenantScoped>(entity: &T) -> FleetResult<()> {
    ensure_tenant(entity)
}

/// Mandatory fields of a group and of the devices created with it.
pub fn before_create_device_group(group: &NewDeviceGroup) -> FleetResult<()> {
    ensure_tenant(group)?;

    if group.account.is_empty() {
        return Err(FleetError::AccountEmpty);
    }

    for device in &group.devices {
        ensure_tenant(device)?;
        ensure_same_tenant(&group.org_id, device)?;
    }

    Ok(())
}

/// Pins the fields that are fixed at creation to their persisted values.
///
/// Changes to `account`, `type`, `org_id`, `created_at` and `deleted_at` are
/// dropped without error; everything else in `changes` is written.
pub fn before_update_device_group(
    persisted: &device_groups::Model,
    changes: &mut device_groups::ActiveModel,
) {
    if let ActiveValue::Set(account) = &changes.account {
        if *account != persisted.account {
            debug!(group_id = persisted.id, "Ignoring account change on device group");
        }
    }
    if let ActiveValue::Set(group_type) = &changes.group_type {
        if *group_type != persisted.group_type {
            debug!(group_id = persisted.id, "Ignoring type change on device group");
        }
    }

    changes.id = ActiveValue::Unchanged(persisted.id);
    changes.account = ActiveValue::Unchanged(persisted.account.clone());
    changes.org_id = ActiveValue::Unchanged(persisted.org_id.clone());
    changes.group_type = ActiveValue::Unchanged(persisted.group_type.clone());
    changes.created_at = ActiveValue::Unchanged(persisted.created_at.clone());
    changes.deleted_at = ActiveValue::Unchanged(persisted.deleted_at.clone());
    changes.updated_at = ActiveValue::Set(timestamp());
}

/// Hard-deletes the group's members and their join rows.
///
/// The group row itself is left for the caller. Returns the number of
/// devices removed.
pub async fn before_delete_device_group<C: ConnectionTrait>(
    conn: &C,
    group_id: i32,
) -> FleetResult<u64> {
    let removed = membership::delete_members(conn, group_id)
        .await
        .map_err(|source| FleetError::CascadeFailure { group_id, source })?;

    debug!(group_id, removed, "Cleared device group members");
    Ok(removed)
}

/// Detaches the commit's package manifest. The commit's repo is not touched.
pub async fn before_delete_commit<C: ConnectionTrait>(
    conn: &C,
    commit_id: i32,
) -> FleetResult<u64> {
    let removed = membership::unlink_commit_packages(conn, commit_id).await?;
    debug!(commit_id, removed, "Detached installed packages from commit");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::models::device::NewDevice;
    use sea_orm::{ActiveModelTrait, IntoActiveModel};

    const LOCK_DEVICES: &str = "CREATE TRIGGER devices_locked BEFORE DELETE ON devices \
         BEGIN SELECT RAISE(ABORT, 'devices are locked'); END";

    fn persisted_group() -> device_groups::Model {
        device_groups::Model {
            id: 7,
            name: "test_group".to_string(),
            account: "111111".to_string(),
            org_id: "333333".to_string(),
            group_type: "dynamic".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
            deleted_at: None,
        }
    }

    async fn store_with_group(members: usize) -> (Store, i32) {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let devices = (0..members)
            .map(|i| {
                NewDevice::new(format!("edge-{i}"), uuid::Uuid::new_v4(), "111111", "222222")
            })
            .collect();
        let created = store
            .device_group_repo()
            .create(
                NewDeviceGroup::new("test_group", "111111", "222222", "static")
                    .with_devices(devices),
            )
            .await
            .unwrap();
        (store, created.group.id)
    }

    #[test]
    fn test_before_update_discards_fixed_fields() {
        let persisted = persisted_group();

        let mut edited = persisted.clone();
        edited.name = "new_test_group".to_string();
        edited.account = "222222".to_string();
        edited.org_id = "444444".to_string();
        edited.group_type = "static".to_string();

        let mut changes = edited.into_active_model().reset_all();
        before_update_device_group(&persisted, &mut changes);

        assert_eq!(changes.name, ActiveValue::Set("new_test_group".to_string()));
        assert_eq!(changes.account, ActiveValue::Unchanged("111111".to_string()));
        assert_eq!(changes.org_id, ActiveValue::Unchanged("333333".to_string()));
        assert_eq!(changes.group_type, ActiveValue::Unchanged("dynamic".to_string()));
        assert!(changes.updated_at.is_set());
    }

    #[test]
    fn test_before_create_device_group() {
        let group = NewDeviceGroup::new("g", "111111", "222222", "static").with_devices(vec![
            NewDevice::new("edge", uuid::Uuid::new_v4(), "111111", "222222"),
        ]);
        assert!(before_create_device_group(&group).is_ok());

        let missing_org = NewDeviceGroup::new("g", "111111", "", "static");
        assert!(matches!(
            before_create_device_group(&missing_org),
            Err(FleetError::MissingTenant { .. })
        ));

        let missing_account = NewDeviceGroup::new("g", "", "222222", "static");
        assert!(matches!(
            before_create_device_group(&missing_account),
            Err(FleetError::AccountEmpty)
        ));

        let foreign_device = NewDeviceGroup::new("g", "111111", "222222", "static")
            .with_devices(vec![NewDevice::new("edge", uuid::Uuid::new_v4(), "1", "999999")]);
        assert!(matches!(
            before_create_device_group(&foreign_device),
            Err(FleetError::TenantMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_before_delete_reports_cascade_failure() {
        let (store, id) = store_with_group(2).await;
        store.conn.execute_unprepared(LOCK_DEVICES).await.unwrap();

        let err = before_delete_device_group(&store.conn, id).await.unwrap_err();
        assert!(matches!(err, FleetError::CascadeFailure { group_id, .. } if group_id == id));
    }

    #[tokio::test]
    async fn test_before_delete_without_members_is_noop() {
        let (store, id) = store_with_group(0).await;

        assert_eq!(before_delete_device_group(&store.conn, id).await.unwrap(), 0);
        assert!(store.device_group_repo().get("222222", id).await.is_ok());
    }
}
