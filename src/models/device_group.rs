//! Device group requests and their validation rules.

use anyhow::Context;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::config::DeviceGroupConfig;
use crate::entities::{device_groups, devices};
use crate::error::{FleetError, FleetResult};
use crate::models::device::NewDevice;
use crate::models::tenancy::{TenantScoped, ensure_tenant};

pub const DEFAULT_NAME_PATTERN: &str = r"^[A-Za-z0-9]+[A-Za-z0-9\s_\-@\.]*$";

pub const DEFAULT_MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceGroupType {
    Static,
    Dynamic,
}

impl DeviceGroupType {
    pub const DEFAULT: Self = Self::Static;

    pub const ALL: [Self; 2] = [Self::Static, Self::Dynamic];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for DeviceGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DeviceGroupType> for String {
    fn from(value: DeviceGroupType) -> Self {
        value.as_str().to_string()
    }
}

fn default_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DEFAULT_NAME_PATTERN).expect("Invalid regex"))
}

/// Allowed group types and name format, usually built from `[device_groups]`.
#[derive(Debug, Clone)]
pub struct GroupRules {
    allowed_types: Vec<String>,
    name_pattern: Regex,
    max_name_length: usize,
}

impl GroupRules {
    pub fn new(
        allowed_types: Vec<String>,
        name_pattern: &str,
        max_name_length: usize,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            allowed_types,
            name_pattern: Regex::new(name_pattern)?,
            max_name_length,
        })
    }

    pub fn from_config(config: &DeviceGroupConfig) -> anyhow::Result<Self> {
        Self::new(
            config.allowed_types.clone(),
            &config.name_pattern,
            config.max_name_length,
        )
        .with_context(|| format!("Invalid device group name pattern: {}", config.name_pattern))
    }

    #[must_use]
    pub fn allows_type(&self, group_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == group_type)
    }

    #[must_use]
    pub fn allows_name(&self, name: &str) -> bool {
        name.chars().count() <= self.max_name_length && self.name_pattern.is_match(name)
    }

    fn type_error(&self) -> FleetError {
        FleetError::TypeInvalid {
            allowed: self.allowed_types.join(", "),
        }
    }
}

impl Default for GroupRules {
    fn default() -> Self {
        Self {
            allowed_types: DeviceGroupType::ALL.map(String::from).to_vec(),
            name_pattern: default_name_pattern().clone(),
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

/// Request to create a device group, optionally together with new member devices.
#[derive(Debug, Clone)]
pub struct NewDeviceGroup {
    pub name: String,
    pub account: String,
    pub org_id: String,
    pub group_type: String,
    pub devices: Vec<NewDevice>,
}

impl NewDeviceGroup {
    pub fn new(
        name: impl Into<String>,
        account: impl Into<String>,
        org_id: impl Into<String>,
        group_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
            org_id: org_id.into(),
            group_type: group_type.into(),
            devices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_devices(mut self, devices: Vec<NewDevice>) -> Self {
        self.devices = devices;
        self
    }

    /// Checks the request fields. The first failing rule is reported.
    ///
    /// Order: tenant, empty name, type, name format, account. Pure, so it can
    /// be called any number of times before persisting.
    pub fn validate_request(&self, rules: &GroupRules) -> FleetResult<()> {
        ensure_tenant(self)?;

        if self.name.is_empty() {
            return Err(FleetError::NameEmpty);
        }
        if !rules.allows_type(&self.group_type) {
            return Err(rules.type_error());
        }
        if !rules.allows_name(&self.name) {
            return Err(FleetError::NameInvalid);
        }
        if self.account.is_empty() {
            return Err(FleetError::AccountEmpty);
        }

        Ok(())
    }
}

impl TenantScoped for NewDeviceGroup {
    const KIND: &'static str = "device group";

    fn org_id(&self) -> &str {
        &self.org_id
    }
}

/// The only fields of a group that may change after creation.
#[derive(Debug, Clone, Default)]
pub struct DeviceGroupUpdate {
    pub name: Option<String>,
    pub add_devices: Vec<i32>,
    pub remove_devices: Vec<i32>,
}

impl DeviceGroupUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn add_devices(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.add_devices.extend(ids);
        self
    }

    #[must_use]
    pub fn remove_devices(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.remove_devices.extend(ids);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.add_devices.is_empty() && self.remove_devices.is_empty()
    }

    pub fn validate(&self, rules: &GroupRules) -> FleetResult<()> {
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err(FleetError::NameEmpty);
            }
            if !rules.allows_name(name) {
                return Err(FleetError::NameInvalid);
            }
        }
        Ok(())
    }
}

/// A group together with its current members.
#[derive(Debug, Clone)]
pub struct DeviceGroupWithDevices {
    pub group: device_groups::Model,
    pub devices: Vec<devices::Model>,
}
