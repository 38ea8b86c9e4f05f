use fleet_store::db::Store;
use fleet_store::error::FleetError;
use fleet_store::models::device::NewDevice;
use fleet_store::models::device_group::NewDeviceGroup;
use uuid::Uuid;

async fn open_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to open store")
}

#[tokio::test]
async fn device_registration_and_lookup() {
    let store = open_store().await;
    let devices = store.device_repo();
    let uuid = Uuid::new_v4();

    let created = devices
        .create(NewDevice::new("edge-01", uuid, "acct", "org-a"))
        .await
        .unwrap();

    let found = devices.find_by_uuid("org-a", &uuid).await.unwrap();
    assert_eq!(found.map(|d| d.id), Some(created.id));
    assert!(devices.find_by_uuid("org-b", &uuid).await.unwrap().is_none());

    let err = devices
        .create(NewDevice::new("edge-01-again", uuid, "acct", "org-a"))
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::UniquenessConflict { entity: "device", .. }));

    let err = devices
        .create(NewDevice::new("orphan", Uuid::new_v4(), "acct", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::MissingTenant { entity: "device" }));
}

#[tokio::test]
async fn device_hashes_update() {
    let store = open_store().await;
    let devices = store.device_repo();

    let created = devices
        .create(
            NewDevice::new("edge-02", Uuid::new_v4(), "acct", "org-a")
                .with_hashes(Some("booted".to_string()), None),
        )
        .await
        .unwrap();
    assert_eq!(created.current_hash.as_deref(), Some("booted"));
    assert_eq!(created.available_hash, None);

    let updated = devices
        .update_hashes(
            "org-a",
            created.id,
            Some("current".to_string()),
            Some("next".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(updated.current_hash.as_deref(), Some("current"));
    assert_eq!(updated.available_hash.as_deref(), Some("next"));
}

#[tokio::test]
async fn deleting_a_device_leaves_its_group() {
    let store = open_store().await;

    let group = store
        .device_group_repo()
        .create(
            NewDeviceGroup::new("lab", "acct", "org-a", "static").with_devices(vec![
                NewDevice::new("one", Uuid::new_v4(), "acct", "org-a"),
                NewDevice::new("two", Uuid::new_v4(), "acct", "org-a"),
            ]),
        )
        .await
        .unwrap();

    let gone = group.devices[0].id;
    let kept = group.devices[1].id;

    assert!(matches!(
        store.device_repo().delete("org-b", gone).await,
        Err(FleetError::NotFound { .. })
    ));

    store.device_repo().delete("org-a", gone).await.unwrap();

    let members = store
        .device_group_repo()
        .members("org-a", group.group.id)
        .await
        .unwrap();
    assert_eq!(members.iter().map(|d| d.id).collect::<Vec<_>>(), vec![kept]);
    assert!(store.device_repo().group_of("org-a", gone).await.is_err());
    assert_eq!(
        store
            .device_repo()
            .group_of("org-a", kept)
            .await
            .unwrap()
            .map(|g| g.id),
        Some(group.group.id)
    );
}
