pub mod commit_service;
pub use commit_service::CommitService;

pub mod commit_service_impl;
pub use commit_service_impl::SeaOrmCommitService;

pub mod device_group_service;
pub use device_group_service::DeviceGroupService;

pub mod device_group_service_impl;
pub use device_group_service_impl::SeaOrmDeviceGroupService;
