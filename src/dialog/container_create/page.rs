//! Categories, their fields and the order in which Tab visits them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Every control on the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize)]
pub enum FieldId {
    // Container
    Name,
    Image,
    Pod,
    Labels,
    Privileged,
    Remove,
    Timeout,
    // Environment
    WorkDir,
    EnvVars,
    EnvFile,
    EnvMerge,
    UnsetEnv,
    EnvHost,
    UnsetEnvAll,
    Umask,
    // User and groups
    User,
    HostUsers,
    PasswdEntry,
    GroupEntry,
    // DNS
    DnsServers,
    DnsOptions,
    DnsSearch,
    // Health check
    HealthCmd,
    HealthStartupCmd,
    HealthOnFailure,
    HealthStartupSuccess,
    HealthStartPeriod,
    HealthInterval,
    HealthStartupInterval,
    HealthRetries,
    HealthStartupRetries,
    HealthTimeout,
    HealthStartupTimeout,
    // Network
    Hostname,
    IpAddress,
    MacAddress,
    Network,
    // Ports
    Publish,
    PublishAll,
    Expose,
    // Security
    SecLabel,
    Apparmor,
    Seccomp,
    SecMask,
    SecUnmask,
    SecNoNewPriv,
    // Volumes
    Volume,
    ImageVolume,
    Mount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FieldKind {
    Text,
    Toggle,
    Select,
}

/// How the text of a field becomes part of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// Space separated list
    Tokens,
    /// Passed through untouched
    Verbatim,
    /// Leading and trailing whitespace removed
    Trimmed,
}

/// Where a select gets its entries from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectSource {
    Images,
    Pods,
    Networks,
    ImageVolume,
    HealthOnFailure,
}

pub const IMAGE_VOLUME_OPTIONS: [&str; 4] = ["", "ignore", "tmpfs", "anonymous"];
pub const HEALTH_ON_FAILURE_OPTIONS: [&str; 4] = ["none", "kill", "restart", "stop"];

impl FieldId {
    pub fn kind(self) -> FieldKind {
        use FieldId::*;
        match self {
            Privileged | Remove | EnvHost | UnsetEnvAll | PublishAll | SecNoNewPriv => FieldKind::Toggle,
            Image | Pod | Network | ImageVolume | HealthOnFailure => FieldKind::Select,
            _ => FieldKind::Text,
        }
    }

    pub fn text_rule(self) -> TextRule {
        use FieldId::*;
        match self {
            Labels | EnvVars | EnvFile | EnvMerge | UnsetEnv | HostUsers | DnsServers | DnsOptions
            | DnsSearch | Publish | Expose | SecLabel => TextRule::Tokens,
            HealthCmd | HealthStartupCmd | HealthOnFailure | HealthStartupSuccess | HealthStartPeriod
            | HealthInterval | HealthStartupInterval | HealthRetries | HealthStartupRetries
            | HealthTimeout | HealthStartupTimeout => TextRule::Trimmed,
            _ => TextRule::Verbatim,
        }
    }

    pub fn select_source(self) -> Option<SelectSource> {
        match self {
            FieldId::Image => Some(SelectSource::Images),
            FieldId::Pod => Some(SelectSource::Pods),
            FieldId::Network => Some(SelectSource::Networks),
            FieldId::ImageVolume => Some(SelectSource::ImageVolume),
            FieldId::HealthOnFailure => Some(SelectSource::HealthOnFailure),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        use FieldId::*;
        match self {
            Name => "name:",
            Image => "image:",
            Pod => "pod:",
            Labels => "labels:",
            Privileged => "privileged:",
            Remove => "remove:",
            Timeout => "timeout:",
            WorkDir => "work dir:",
            EnvVars => "env vars:",
            EnvFile => "env file:",
            EnvMerge => "env merge:",
            UnsetEnv => "unset env:",
            EnvHost => "env host:",
            UnsetEnvAll => "unsetenv all",
            Umask => "umask:",
            User => "user:",
            HostUsers => "host user:",
            PasswdEntry => "passwd entry:",
            GroupEntry => "group entry:",
            DnsServers => "dns servers:",
            DnsOptions => "dns options:",
            DnsSearch => "dns search:",
            HealthCmd => "Command:",
            HealthStartupCmd => "Startup cmd:",
            HealthOnFailure => "On failure:",
            HealthStartupSuccess => "Startup success:",
            HealthStartPeriod => "Start period:",
            HealthInterval => "Interval:",
            HealthStartupInterval => "Startup interval:",
            HealthRetries => "Retries:",
            HealthStartupRetries => "Startup retries:",
            HealthTimeout => "Timeout:",
            HealthStartupTimeout => "Startup timeout:",
            Hostname => "hostname:",
            IpAddress => "ip address:",
            MacAddress => "mac address:",
            Network => "network:",
            Publish => "publish ports:",
            PublishAll => "publish all",
            Expose => "expose ports:",
            SecLabel => "label:",
            Apparmor => "apparmor:",
            Seccomp => "seccomp:",
            SecMask => "mask:",
            SecUnmask => "unmask:",
            SecNoNewPriv => "no new privileges",
            Volume => "volume:",
            ImageVolume => "image volume:",
            Mount => "mount:",
        }
    }
}

/// One page of the form.
///
/// `fields` is the Tab order; `rows` is what the page draws, one line per row
/// with the row's fields side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: &'static str,
    pub index: usize,
    pub fields: Vec<FieldId>,
    pub rows: Vec<Vec<FieldId>>,
}

impl Category {
    fn new(label: &'static str, index: usize, fields: &[FieldId], rows: &[&[FieldId]]) -> Self {
        Self {
            label,
            index,
            fields: fields.to_vec(),
            rows: rows.iter().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn position(&self, field: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// Width of the longest single-field label, used to align the page.
    pub fn label_width(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.len() == 1)
            .flatten()
            .map(|f| f.label().len())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    pub categories: Vec<Category>,
}

impl PageModel {
    /// The nine pages of the container create form.
    pub fn container_create() -> Self {
        use FieldId::*;
        let categories = vec![
            Category::new(
                "Container",
                0,
                &[Name, Image, Pod, Labels, Privileged, Remove, Timeout],
                &[&[Name], &[Image], &[Pod], &[Labels], &[Privileged, Remove, Timeout]],
            ),
            Category::new(
                "Environment",
                1,
                &[WorkDir, EnvVars, EnvFile, EnvMerge, UnsetEnv, EnvHost, UnsetEnvAll, Umask],
                &[
                    &[WorkDir],
                    &[EnvVars],
                    &[EnvFile],
                    &[EnvMerge],
                    &[UnsetEnv],
                    &[EnvHost, UnsetEnvAll, Umask],
                ],
            ),
            Category::new(
                "User and groups",
                2,
                &[User, HostUsers, PasswdEntry, GroupEntry],
                &[&[User], &[HostUsers], &[PasswdEntry], &[GroupEntry]],
            ),
            Category::new(
                "DNS Settings",
                3,
                &[DnsServers, DnsOptions, DnsSearch],
                &[&[DnsServers], &[DnsOptions], &[DnsSearch]],
            ),
            Category::new(
                "Health check",
                4,
                &[
                    HealthCmd,
                    HealthStartupCmd,
                    HealthOnFailure,
                    HealthStartupSuccess,
                    HealthStartPeriod,
                    HealthInterval,
                    HealthStartupInterval,
                    HealthRetries,
                    HealthStartupRetries,
                    HealthTimeout,
                    HealthStartupTimeout,
                ],
                &[
                    &[HealthCmd],
                    &[HealthStartupCmd],
                    &[HealthOnFailure, HealthStartupSuccess, HealthStartPeriod],
                    &[HealthInterval, HealthStartupInterval],
                    &[HealthRetries, HealthStartupRetries],
                    &[HealthTimeout, HealthStartupTimeout],
                ],
            ),
            Category::new(
                "Network Settings",
                5,
                &[Hostname, IpAddress, MacAddress, Network],
                &[&[Hostname], &[IpAddress], &[MacAddress], &[Network]],
            ),
            Category::new(
                "Ports Settings",
                6,
                &[Publish, PublishAll, Expose],
                &[&[Publish], &[PublishAll], &[Expose]],
            ),
            Category::new(
                "Security Options",
                7,
                &[SecLabel, Apparmor, Seccomp, SecMask, SecUnmask, SecNoNewPriv],
                &[&[SecLabel], &[Apparmor], &[Seccomp], &[SecMask], &[SecUnmask], &[SecNoNewPriv]],
            ),
            Category::new(
                "Volumes Settings",
                8,
                &[Volume, ImageVolume, Mount],
                &[&[Volume], &[ImageVolume], &[Mount]],
            ),
        ];
        Self { categories }
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Category index and focus position of a field.
    pub fn locate(&self, field: FieldId) -> Option<(usize, usize)> {
        self.categories
            .iter()
            .find_map(|c| c.position(field).map(|pos| (c.index, pos)))
    }

    pub fn field_counts(&self) -> Vec<usize> {
        self.categories.iter().map(|c| c.fields.len()).collect()
    }

    pub fn all_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.categories.iter().flat_map(|c| c.fields.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_field_in_exactly_one_category() {
        let model = PageModel::container_create();
        let mut seen: HashMap<FieldId, usize> = HashMap::new();
        for field in model.all_fields() {
            *seen.entry(field).or_default() += 1;
        }
        for field in FieldId::iter() {
            assert_eq!(seen.get(&field), Some(&1), "{field} placement");
        }
        assert_eq!(seen.len(), FieldId::iter().count());
    }

    #[test]
    fn test_focus_order_is_row_major() {
        let model = PageModel::container_create();
        for category in &model.categories {
            let flattened: Vec<FieldId> = category.rows.iter().flatten().copied().collect();
            assert_eq!(category.fields, flattened, "{}", category.label);
        }
    }

    #[test]
    fn test_indices_match_positions() {
        let model = PageModel::container_create();
        assert_eq!(model.categories.len(), 9);
        for (i, category) in model.categories.iter().enumerate() {
            assert_eq!(category.index, i);
            assert!(!category.fields.is_empty());
        }
        assert_eq!(model.categories[4].label, "Health check");
    }

    #[test]
    fn test_locate() {
        let model = PageModel::container_create();
        assert_eq!(model.locate(FieldId::Name), Some((0, 0)));
        assert_eq!(model.locate(FieldId::Timeout), Some((0, 6)));
        assert_eq!(model.locate(FieldId::HealthOnFailure), Some((4, 2)));
        assert_eq!(model.locate(FieldId::Mount), Some((8, 2)));
    }

    #[test]
    fn test_field_kinds_and_rules() {
        assert_eq!(FieldId::Image.kind(), FieldKind::Select);
        assert_eq!(FieldId::SecNoNewPriv.kind(), FieldKind::Toggle);
        assert_eq!(FieldId::SecLabel.kind(), FieldKind::Text);
        assert_eq!(FieldId::SecLabel.text_rule(), TextRule::Tokens);
        assert_eq!(FieldId::HealthOnFailure.text_rule(), TextRule::Trimmed);
        assert_eq!(FieldId::Name.text_rule(), TextRule::Verbatim);
        for field in FieldId::iter() {
            assert_eq!(field.select_source().is_some(), field.kind() == FieldKind::Select, "{field}");
        }
    }
}
