//! `SeaORM` implementation of the `DeviceGroupService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::db::Store;
use crate::entities::{device_groups, devices};
use crate::error::FleetError;
use crate::models::device_group::{
    DeviceGroupUpdate, DeviceGroupWithDevices, GroupRules, NewDeviceGroup,
};
use crate::services::device_group_service::DeviceGroupService;

pub struct SeaOrmDeviceGroupService {
    store: Store,
    rules: GroupRules,
}

impl SeaOrmDeviceGroupService {
    #[must_use]
    pub const fn new(store: Store, rules: GroupRules) -> Self {
        Self { store, rules }
    }
}

#[async_trait]
impl DeviceGroupService for SeaOrmDeviceGroupService {
    async fn create(&self, request: NewDeviceGroup) -> Result<DeviceGroupWithDevices, FleetError> {
        if let Err(err) = request.validate_request(&self.rules) {
            warn!(org_id = %request.org_id, "Rejected device group '{}': {}", request.name, err);
            return Err(err);
        }

        for device in &request.devices {
            device.validate_request()?;
        }

        self.store.device_group_repo().create(request).await
    }

    async fn get(&self, org_id: &str, id: i32) -> Result<DeviceGroupWithDevices, FleetError> {
        self.store.device_group_repo().get(org_id, id).await
    }

    async fn list(&self, org_id: &str) -> Result<Vec<device_groups::Model>, FleetError> {
        self.store.device_group_repo().list(org_id).await
    }

    async fn members(&self, org_id: &str, id: i32) -> Result<Vec<devices::Model>, FleetError> {
        self.store.device_group_repo().members(org_id, id).await
    }

    async fn update(
        &self,
        org_id: &str,
        id: i32,
        update: DeviceGroupUpdate,
    ) -> Result<DeviceGroupWithDevices, FleetError> {
        if let Err(err) = update.validate(&self.rules) {
            warn!(org_id, "Rejected update of device group {}: {}", id, err);
            return Err(err);
        }

        if update.is_empty() {
            return self.get(org_id, id).await;
        }

        self.store.device_group_repo().update(org_id, id, update).await
    }

    async fn delete(&self, org_id: &str, id: i32) -> Result<u64, FleetError> {
        self.store.device_group_repo().delete(org_id, id).await
    }
}
