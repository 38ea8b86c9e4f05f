pub mod commit;
pub mod device;
pub mod device_group;
pub mod membership;
