//! Domain service for device groups.
//!
//! Validates requests against the configured group rules before they reach
//! the repository.

use crate::entities::{device_groups, devices};
use crate::error::FleetError;
use crate::models::device_group::{DeviceGroupUpdate, DeviceGroupWithDevices, NewDeviceGroup};

#[async_trait::async_trait]
pub trait DeviceGroupService: Send + Sync {
    /// Validates and creates a group, with any new member devices.
    async fn create(&self, request: NewDeviceGroup) -> Result<DeviceGroupWithDevices, FleetError>;

    async fn get(&self, org_id: &str, id: i32) -> Result<DeviceGroupWithDevices, FleetError>;

    async fn list(&self, org_id: &str) -> Result<Vec<device_groups::Model>, FleetError>;

    async fn members(&self, org_id: &str, id: i32) -> Result<Vec<devices::Model>, FleetError>;

    /// Renames a group and/or changes its membership.
    async fn update(
        &self,
        org_id: &str,
        id: i32,
        update: DeviceGroupUpdate,
    ) -> Result<DeviceGroupWithDevices, FleetError>;

    /// Deletes the group together with its devices. Returns the device count.
    async fn delete(&self, org_id: &str, id: i32) -> Result<u64, FleetError>;
}
