use uuid::Uuid;

use crate::error::FleetResult;
use crate::models::tenancy::{TenantScoped, ensure_tenant};

/// Request to register a device.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub uuid: Uuid,
    pub account: String,
    pub org_id: String,
    pub available_hash: Option<String>,
    pub current_hash: Option<String>,
}

impl NewDevice {
    pub fn new(
        name: impl Into<String>,
        uuid: Uuid,
        account: impl Into<String>,
        org_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid,
            account: account.into(),
            org_id: org_id.into(),
            available_hash: None,
            current_hash: None,
        }
    }

    #[must_use]
    pub fn with_hashes(mut self, current: Option<String>, available: Option<String>) -> Self {
        self.current_hash = current;
        self.available_hash = available;
        self
    }

    pub fn validate_request(&self) -> FleetResult<()> {
        ensure_tenant(self)
    }
}

impl TenantScoped for NewDevice {
    const KIND: &'static str = "device";

    fn org_id(&self) -> &str {
        &self.org_id
    }
}
