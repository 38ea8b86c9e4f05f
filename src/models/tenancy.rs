//! Tenant guard shared by every org-scoped entity.
//!
//! The check runs before any other validation and before any write.

use crate::entities::{commits, device_groups, devices};
use crate::error::{FleetError, FleetResult};

/// Anything that belongs to exactly one tenant.
pub trait TenantScoped {
    /// Entity name used in error messages.
    const KIND: &'static str;

    fn org_id(&self) -> &str;
}

/// Rejects an entity whose org id is empty.
pub fn ensure_tenant<T: TenantScoped>(entity: &T) -> FleetResult<()> {
    if entity.org_id().trim().is_empty() {
        return Err(FleetError::MissingTenant { entity: T::KIND });
    }
    Ok(())
}

/// Rejects an entity that belongs to a different tenant than `org_id`.
pub fn ensure_same_tenant<T: TenantScoped>(org_id: &str, entity: &T) -> FleetResult<()> {
    if entity.org_id() != org_id {
        return Err(FleetError::TenantMismatch {
            entity: T::KIND,
            expected: org_id.to_string(),
            found: entity.org_id().to_string(),
        });
    }
    Ok(())
}

impl TenantScoped for device_groups::Model {
    const KIND: &'static str = "device group";

    fn org_id(&self) -> &str {
        &self.org_id
    }
}

impl TenantScoped for devices::Model {
    const KIND: &'static str = "device";

    fn org_id(&self) -> &str {
        &self.org_id
    }
}

impl TenantScoped for commits::Model {
    const KIND: &'static str = "commit";

    fn org_id(&self) -> &str {
        &self.org_id
    }
}
