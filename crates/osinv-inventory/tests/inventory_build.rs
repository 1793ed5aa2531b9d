use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use osinv_inventory::*;

// Mock implementations
struct StubSource {
    instances: Vec<Instance>,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(instances: Vec<Instance>) -> Arc<Self> {
        Arc::new(Self {
            instances,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstanceSource for StubSource {
    async fn list_instances(&self) -> Result<Vec<Instance>, InventoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.instances.clone())
    }
}

fn settings(tag: Option<&str>, value: Option<&str>, group: Option<&str>) -> InventorySettings {
    InventorySettings {
        environment_tag: tag.map(str::to_string),
        environment_value: value.map(str::to_string),
        base_group_name: group.map(str::to_string),
    }
}

fn fleet() -> Vec<Instance> {
    vec![
        Instance::new("11111111-aaaa", "web-1")
            .with_metadata("env", "prod")
            .with_metadata("role", "web")
            .with_address("private", InstanceAddress::v4("10.0.0.5")),
        Instance::new("22222222-bbbb", "stage-1")
            .with_metadata("env", "staging")
            .with_address("private", InstanceAddress::v4("10.0.0.6")),
    ]
}

#[tokio::test]
async fn test_end_to_end_document() {
    let source = StubSource::new(fleet());
    let collector = InventoryCollector::new(source.clone());

    let doc = collector
        .collect(
            &settings(Some("env"), Some("prod"), Some("openstack")),
            HostMode::PerInstance,
        )
        .await
        .unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(doc.group("openstack").unwrap().hosts, vec!["web-1"]);
    assert_eq!(doc.group("role_web").unwrap().hosts, vec!["web-1"]);
    assert_eq!(doc.hostvars().len(), 1);

    let rendered = doc.render().unwrap();
    assert!(!rendered.contains("stage-1"));

    let value: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["_meta"]["hostvars"]["web-1"]["ansible_host"], "10.0.0.5");
    assert_eq!(value["_meta"]["hostvars"]["web-1"]["openstack_metadata"]["role"], "web");
    assert_eq!(value["role_web"]["vars"]["group_tag"], "role");
    assert_eq!(value["role_web"]["vars"]["group_value"], "web");
    assert_eq!(value["openstack"]["vars"]["environment_tag"], "env");
}

#[tokio::test]
async fn test_missing_settings_fail_before_listing() {
    let cases = [
        settings(None, Some("prod"), Some("openstack")),
        settings(Some("env"), None, Some("openstack")),
        settings(Some("env"), Some("prod"), None),
        settings(Some(""), Some("prod"), Some("openstack")),
    ];

    for case in cases {
        let source = StubSource::new(fleet());
        let collector = InventoryCollector::new(source.clone());

        let err = collector
            .collect(&case, HostMode::PerInstance)
            .await
            .unwrap_err();

        assert!(err.is_config(), "expected config error for {case:?}, got {err:?}");
        assert_eq!(source.calls(), 0, "source was called for {case:?}");
    }
}

#[test]
fn test_untagged_instances_never_appear() {
    let config = InventoryConfig::new("env", "prod", "openstack").unwrap();
    let instances: Vec<Instance> = (0..5)
        .map(|i| {
            Instance::new(format!("id-{i}"), format!("other-{i}"))
                .with_metadata("role", "web")
                .with_address("private", InstanceAddress::v4(format!("10.0.1.{i}")))
        })
        .collect();

    let doc = osinv_inventory::collector::build(&config, &instances, HostMode::PerInstance);

    assert!(doc.hostvars().is_empty());
    assert!(doc.group("role_web").is_none());
    assert!(doc.groups().values().all(|g| g.hosts.is_empty()));
}

#[test]
fn test_every_metadata_pair_becomes_a_group() {
    let config = InventoryConfig::new("env", "prod", "openstack").unwrap();
    let instance = Instance::new("id-1", "app-1")
        .with_metadata("env", "prod")
        .with_metadata("role", "app")
        .with_metadata("zone", "az1")
        .with_metadata("owner", "team-a")
        .with_address("private", InstanceAddress::v4("10.0.0.8"));

    let doc = osinv_inventory::collector::build(
        &config,
        std::slice::from_ref(&instance),
        HostMode::PerInstance,
    );

    for (key, value) in &instance.metadata {
        let name = InventoryBuilder::group_name(key, value);
        if key == "env" {
            assert!(doc.group(&name).is_none());
            continue;
        }
        let group = doc.group(&name).unwrap();
        assert_eq!(group.count("app-1"), 1);
        assert_eq!(
            group.vars,
            GroupVars::Metadata {
                group_tag: key.clone(),
                group_value: value.clone(),
            }
        );
    }
    assert_eq!(doc.groups().len(), 4);
}
