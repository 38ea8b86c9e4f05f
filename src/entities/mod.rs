pub mod prelude;

pub mod commit_installed_packages;
pub mod commits;
pub mod device_group_devices;
pub mod device_groups;
pub mod devices;
pub mod installed_packages;
pub mod packages;
pub mod repos;
