//! Join-table operations for group membership and commit package manifests.
//!
//! Every function is generic over the connection so it runs inside the
//! caller's transaction. Errors are returned raw; callers decide whether a
//! failure is a conflict or a cascade failure.

use crate::entities::prelude::*;
use crate::entities::{commit_installed_packages, device_group_devices, devices};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

pub async fn link_devices<C: ConnectionTrait>(
    conn: &C,
    group_id: i32,
    device_ids: &[i32],
) -> Result<u64, DbErr> {
    if device_ids.is_empty() {
        return Ok(0);
    }

    let rows = device_ids
        .iter()
        .map(|&device_id| device_group_devices::ActiveModel {
            device_group_id: Set(group_id),
            device_id: Set(device_id),
        });

    DeviceGroupDevices::insert_many(rows)
        .exec_without_returning(conn)
        .await
}

pub async fn unlink_devices<C: ConnectionTrait>(
    conn: &C,
    group_id: i32,
    device_ids: &[i32],
) -> Result<u64, DbErr> {
    if device_ids.is_empty() {
        return Ok(0);
    }

    let result = DeviceGroupDevices::delete_many()
        .filter(device_group_devices::Column::DeviceGroupId.eq(group_id))
        .filter(device_group_devices::Column::DeviceId.is_in(device_ids.iter().copied()))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Drops the membership row of a single device, whichever group it is in.
pub async fn unlink_device<C: ConnectionTrait>(conn: &C, device_id: i32) -> Result<u64, DbErr> {
    let result = DeviceGroupDevices::delete_many()
        .filter(device_group_devices::Column::DeviceId.eq(device_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

pub async fn member_ids<C: ConnectionTrait>(conn: &C, group_id: i32) -> Result<Vec<i32>, DbErr> {
    let rows = DeviceGroupDevices::find()
        .filter(device_group_devices::Column::DeviceGroupId.eq(group_id))
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|row| row.device_id).collect())
}

pub async fn group_id_of<C: ConnectionTrait>(
    conn: &C,
    device_id: i32,
) -> Result<Option<i32>, DbErr> {
    let row = DeviceGroupDevices::find()
        .filter(device_group_devices::Column::DeviceId.eq(device_id))
        .one(conn)
        .await?;

    Ok(row.map(|r| r.device_group_id))
}

/// Removes the group's join rows, then hard-deletes the member devices.
///
/// Returns the number of devices removed. A group without members is a no-op.
pub async fn delete_members<C: ConnectionTrait>(conn: &C, group_id: i32) -> Result<u64, DbErr> {
    let ids = member_ids(conn, group_id).await?;
    if ids.is_empty() {
        return Ok(0);
    }

    DeviceGroupDevices::delete_many()
        .filter(device_group_devices::Column::DeviceGroupId.eq(group_id))
        .exec(conn)
        .await?;

    let result = Devices::delete_many()
        .filter(devices::Column::Id.is_in(ids))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

pub async fn link_packages<C: ConnectionTrait>(
    conn: &C,
    commit_id: i32,
    package_ids: &[i32],
) -> Result<u64, DbErr> {
    if package_ids.is_empty() {
        return Ok(0);
    }

    let rows = package_ids
        .iter()
        .map(|&installed_package_id| commit_installed_packages::ActiveModel {
            commit_id: Set(commit_id),
            installed_package_id: Set(installed_package_id),
        });

    CommitInstalledPackages::insert_many(rows)
        .exec_without_returning(conn)
        .await
}

pub async fn unlink_commit_packages<C: ConnectionTrait>(
    conn: &C,
    commit_id: i32,
) -> Result<u64, DbErr> {
    let result = CommitInstalledPackages::delete_many()
        .filter(commit_installed_packages::Column::CommitId.eq(commit_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
