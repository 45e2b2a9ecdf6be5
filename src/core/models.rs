//! Resource summaries reported by the container engine and the create request
//! assembled by the container create dialog.

use serde::{Deserialize, Serialize};

/// A locally stored image as reported by the engine's image listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub tag: String,
}

impl ImageSummary {
    pub fn new(id: impl Into<String>, repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Name shown in the image dropdown.
    ///
    /// Untagged images that the engine reports with a `<none>` id keep that
    /// marker; everything else is shown as `repository:tag`.
    pub fn display_name(&self) -> String {
        if self.id == "<none>" {
            return self.id.clone();
        }
        format!("{}:{}", self.repository, self.tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSummary {
    pub id: String,
    pub name: String,
}

impl PodSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub name: String,
    #[serde(default)]
    pub driver: String,
}

impl NetworkSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), driver: String::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub name: String,
    #[serde(default)]
    pub driver: String,
}

impl VolumeSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), driver: String::new() }
    }
}

/// Parameters for creating a container.
///
/// Every field is always present. An empty string or an empty list means
/// "use the engine default"; there is no separate marker for unset values.
/// Selections are already resolved to identities (image id, pod id, network
/// name), never to dropdown positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCreateOptions {
    pub name: String,
    pub image: String,
    pub pod: String,
    pub labels: Vec<String>,
    pub remove: bool,
    pub privileged: bool,
    pub timeout: String,
    pub work_dir: String,
    pub env_vars: Vec<String>,
    pub env_file: Vec<String>,
    pub env_merge: Vec<String>,
    pub unset_env: Vec<String>,
    pub env_host: bool,
    pub unset_env_all: bool,
    pub umask: String,
    pub user: String,
    pub host_users: Vec<String>,
    pub passwd_entry: String,
    pub group_entry: String,
    pub hostname: String,
    pub mac_address: String,
    pub ip_address: String,
    pub network: String,
    pub publish: Vec<String>,
    pub expose: Vec<String>,
    pub publish_all: bool,
    pub dns_server: Vec<String>,
    pub dns_options: Vec<String>,
    pub dns_search_domain: Vec<String>,
    pub volume: String,
    pub image_volume: String,
    pub mount: String,
    pub selinux_opts: Vec<String>,
    pub apparmor_profile: String,
    pub seccomp: String,
    pub sec_no_new_priv: bool,
    pub sec_mask: String,
    pub sec_unmask: String,
    pub health_cmd: String,
    pub health_interval: String,
    pub health_retries: String,
    pub health_start_period: String,
    pub health_timeout: String,
    pub health_on_failure: String,
    pub health_startup_cmd: String,
    pub health_startup_interval: String,
    pub health_startup_retries: String,
    pub health_startup_success: String,
    pub health_startup_timeout: String,
}
