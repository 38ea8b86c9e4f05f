pub use super::commit_installed_packages::Entity as CommitInstalledPackages;
pub use super::commits::Entity as Commits;
pub use super::device_group_devices::Entity as DeviceGroupDevices;
pub use super::device_groups::Entity as DeviceGroups;
pub use super::devices::Entity as Devices;
pub use super::installed_packages::Entity as InstalledPackages;
pub use super::packages::Entity as Packages;
pub use super::repos::Entity as Repos;
