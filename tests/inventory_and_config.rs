use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use podtui::config::{Config, Mode};
use podtui::core::{Inventory, OptionSource};
use podtui::dialog::container_create::OptionSnapshot;

fn demo_inventory() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("inventory.json5")
}

#[test]
fn demo_inventory_loads() {
    let inventory = Inventory::from_path(&demo_inventory()).unwrap();
    assert_eq!(inventory.list_images().unwrap().len(), 3);
    assert_eq!(inventory.list_pods().unwrap()[0].name, "web-pod");

    let snapshot = OptionSnapshot::load(&inventory);
    let labels: Vec<String> = snapshot.images.entries().into_iter().map(|e| e.label).collect();
    assert_eq!(labels, vec!["docker.io/library/nginx:1.27", "quay.io/fedora/fedora:40", "<none>"]);
    assert_eq!(snapshot.volume_names(), vec!["pgdata".to_string(), "cache".to_string()]);
}

#[test]
fn missing_inventory_is_an_error() {
    let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("absent.json5");
    let err = Inventory::from_path(&missing).unwrap_err();
    assert!(format!("{err}").contains("absent.json5"));
}

#[test]
fn explicit_config_path_must_exist() {
    let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("no-such-config.json5");
    assert!(Config::from_path(Some(&missing)).is_err());
}

#[test]
fn default_config_binds_dialog_keys() {
    let config = Config::default();
    assert_eq!(config.key_for_action(Mode::Global, &podtui::Action::Paste).as_deref(), Some("ctrl-v"));
    assert_eq!(
        config.key_for_action(Mode::ContainerCreate, &podtui::Action::ToggleSpace).as_deref(),
        Some("space")
    );
}
