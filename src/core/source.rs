//! Providers of the selectable resources shown in the create dialog.

use std::fs;
use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::core::models::{ImageSummary, NetworkSummary, PodSummary, VolumeSummary};

/// Enumerates the engine resources a new container can refer to.
///
/// The dialog calls each method once per activation. Implementations may fail
/// independently; a failed listing is treated as an empty one by the caller.
/// A list that has been returned must not be changed afterwards by the source.
pub trait OptionSource: Send + Sync {
    fn list_images(&self) -> Result<Vec<ImageSummary>>;
    fn list_pods(&self) -> Result<Vec<PodSummary>>;
    fn list_networks(&self) -> Result<Vec<NetworkSummary>>;
    fn list_volumes(&self) -> Result<Vec<VolumeSummary>>;
}

/// A fixed resource inventory, usually read from a JSON5 file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub images: Vec<ImageSummary>,
    #[serde(default)]
    pub pods: Vec<PodSummary>,
    #[serde(default)]
    pub networks: Vec<NetworkSummary>,
    #[serde(default)]
    pub volumes: Vec<VolumeSummary>,
}

impl Inventory {
    pub fn from_json5(text: &str) -> Result<Self> {
        json5::from_str(text).wrap_err("invalid inventory document")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read inventory {}", path.display()))?;
        Self::from_json5(&text)
    }
}

impl OptionSource for Inventory {
    fn list_images(&self) -> Result<Vec<ImageSummary>> {
        Ok(self.images.clone())
    }

    fn list_pods(&self) -> Result<Vec<PodSummary>> {
        Ok(self.pods.clone())
    }

    fn list_networks(&self) -> Result<Vec<NetworkSummary>> {
        Ok(self.networks.clone())
    }

    fn list_volumes(&self) -> Result<Vec<VolumeSummary>> {
        Ok(self.volumes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_from_json5() {
        let inventory = Inventory::from_json5(
            r#"{
                // comments are allowed
                images: [{ id: "a1", repository: "quay.io/app", tag: "v1" }],
                pods: [{ id: "p1", name: "frontend" }],
                networks: [{ name: "podman", driver: "bridge" }],
            }"#,
        )
        .unwrap();

        assert_eq!(inventory.images[0].display_name(), "quay.io/app:v1");
        assert_eq!(inventory.pods[0].name, "frontend");
        assert_eq!(inventory.networks[0].driver, "bridge");
        assert!(inventory.volumes.is_empty());
    }

    #[test]
    fn test_inventory_rejects_garbage() {
        assert!(Inventory::from_json5("{ images: 12 }").is_err());
    }
}
