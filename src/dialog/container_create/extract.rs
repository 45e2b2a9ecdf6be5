//! Reading the form back into a [`ContainerCreateOptions`] request.

use tracing::debug;

use super::fields::{FieldSet, FieldWidget};
use super::options::OptionSnapshot;
use super::page::{Category, FieldId, PageModel, TextRule};
use crate::core::ContainerCreateOptions;

/// Split free text on ASCII spaces, dropping empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Tokens(Vec<String>),
    Flag(bool),
}

impl Extracted {
    fn into_text(self) -> String {
        match self {
            Extracted::Text(text) => text,
            Extracted::Tokens(tokens) => tokens.join(" "),
            Extracted::Flag(flag) => flag.to_string(),
        }
    }

    fn into_tokens(self) -> Vec<String> {
        match self {
            Extracted::Tokens(tokens) => tokens,
            Extracted::Text(text) => tokenize(&text),
            Extracted::Flag(_) => Vec::new(),
        }
    }

    fn into_flag(self) -> bool {
        matches!(self, Extracted::Flag(true))
    }
}

fn apply_rule(rule: TextRule, text: &str) -> Extracted {
    match rule {
        TextRule::Tokens => Extracted::Tokens(tokenize(text)),
        TextRule::Verbatim => Extracted::Text(text.to_string()),
        TextRule::Trimmed => Extracted::Text(text.trim().to_string()),
    }
}

/// Read-only view that turns widget state into typed values.
///
/// Dropdowns backed by the option source resolve their selection against the
/// snapshot taken when the dialog was shown, never against the source itself.
pub struct FieldExtractor<'a> {
    fields: &'a FieldSet,
    snapshot: &'a OptionSnapshot,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(fields: &'a FieldSet, snapshot: &'a OptionSnapshot) -> Self {
        Self { fields, snapshot }
    }

    pub fn extract(&self, field: FieldId) -> Extracted {
        match self.fields.get(&field) {
            Some(FieldWidget::Text(text)) => apply_rule(field.text_rule(), &text.value()),
            Some(FieldWidget::Toggle(toggle)) => Extracted::Flag(toggle.checked),
            Some(FieldWidget::Select(select)) => {
                let snapshot_identity = field
                    .select_source()
                    .and_then(|source| self.snapshot.identity_at(source, select.selected()));
                match snapshot_identity {
                    Some(identity) => apply_rule(field.text_rule(), &identity),
                    None => apply_rule(field.text_rule(), select.identity()),
                }
            }
            None => apply_rule(field.text_rule(), ""),
        }
    }

    pub fn extract_page(&self, category: &Category) -> Vec<(FieldId, Extracted)> {
        category
            .fields
            .iter()
            .map(|field| (*field, self.extract(*field)))
            .collect()
    }
}

/// Accumulates extracted values into a create request.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    opts: ContainerCreateOptions,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, field: FieldId, value: Extracted) -> &mut Self {
        use FieldId::*;
        let opts = &mut self.opts;
        match field {
            Name => opts.name = value.into_text(),
            Image => opts.image = value.into_text(),
            Pod => opts.pod = value.into_text(),
            Labels => opts.labels = value.into_tokens(),
            Privileged => opts.privileged = value.into_flag(),
            Remove => opts.remove = value.into_flag(),
            Timeout => opts.timeout = value.into_text(),
            WorkDir => opts.work_dir = value.into_text(),
            EnvVars => opts.env_vars = value.into_tokens(),
            EnvFile => opts.env_file = value.into_tokens(),
            EnvMerge => opts.env_merge = value.into_tokens(),
            UnsetEnv => opts.unset_env = value.into_tokens(),
            EnvHost => opts.env_host = value.into_flag(),
            UnsetEnvAll => opts.unset_env_all = value.into_flag(),
            Umask => opts.umask = value.into_text(),
            User => opts.user = value.into_text(),
            HostUsers => opts.host_users = value.into_tokens(),
            PasswdEntry => opts.passwd_entry = value.into_text(),
            GroupEntry => opts.group_entry = value.into_text(),
            DnsServers => opts.dns_server = value.into_tokens(),
            DnsOptions => opts.dns_options = value.into_tokens(),
            DnsSearch => opts.dns_search_domain = value.into_tokens(),
            HealthCmd => opts.health_cmd = value.into_text(),
            HealthStartupCmd => opts.health_startup_cmd = value.into_text(),
            HealthOnFailure => opts.health_on_failure = value.into_text(),
            HealthStartupSuccess => opts.health_startup_success = value.into_text(),
            HealthStartPeriod => opts.health_start_period = value.into_text(),
            HealthInterval => opts.health_interval = value.into_text(),
            HealthStartupInterval => opts.health_startup_interval = value.into_text(),
            HealthRetries => opts.health_retries = value.into_text(),
            HealthStartupRetries => opts.health_startup_retries = value.into_text(),
            HealthTimeout => opts.health_timeout = value.into_text(),
            HealthStartupTimeout => opts.health_startup_timeout = value.into_text(),
            Hostname => opts.hostname = value.into_text(),
            IpAddress => opts.ip_address = value.into_text(),
            MacAddress => opts.mac_address = value.into_text(),
            Network => opts.network = value.into_text(),
            Publish => opts.publish = value.into_tokens(),
            PublishAll => opts.publish_all = value.into_flag(),
            Expose => opts.expose = value.into_tokens(),
            SecLabel => opts.selinux_opts = value.into_tokens(),
            Apparmor => opts.apparmor_profile = value.into_text(),
            Seccomp => opts.seccomp = value.into_text(),
            SecMask => opts.sec_mask = value.into_text(),
            SecUnmask => opts.sec_unmask = value.into_text(),
            SecNoNewPriv => opts.sec_no_new_priv = value.into_flag(),
            Volume => opts.volume = value.into_text(),
            ImageVolume => opts.image_volume = value.into_text(),
            Mount => opts.mount = value.into_text(),
        }
        self
    }

    /// Extract and apply every field of every page.
    pub fn apply_all(
        &mut self,
        model: &PageModel,
        fields: &FieldSet,
        snapshot: &OptionSnapshot,
    ) -> &mut Self {
        let extractor = FieldExtractor::new(fields, snapshot);
        for category in &model.categories {
            for (field, value) in extractor.extract_page(category) {
                self.apply(field, value);
            }
            debug!("container create: extracted page {}", category.label);
        }
        self
    }

    pub fn build(self) -> ContainerCreateOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::PodSummary;
    use crate::dialog::container_create::fields::FieldValue;
    use crate::dialog::container_create::options::CandidateList;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("a=1 b=2"), vec!["a=1", "b=2"]);
        assert_eq!(tokenize("  x   y "), vec!["x", "y"]);
        assert_eq!(tokenize("dup dup"), vec!["dup", "dup"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
        // only the space character separates tokens
        assert_eq!(tokenize("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_tokenize_join_inverse() {
        let samples: [&[&str]; 7] = [
            &[],
            &["single"],
            &["k=v"],
            &["8080:80", "--flag", "k=v"],
            &["a=1", "b=2", "a=1"],
            &["127.0.0.1:5432:5432/tcp", "9090"],
            &["-e", "PATH=/usr/bin:/bin", "key-with-dash=x-y"],
        ];
        for sample in samples {
            let tokens: Vec<String> = sample.iter().map(|t| t.to_string()).collect();
            assert_eq!(tokenize(&tokens.join(" ")), tokens, "{sample:?}");
        }
    }

    #[test]
    fn test_text_rules() {
        let mut fields = FieldSet::new();
        fields.set_value(FieldId::Name, FieldValue::Text("  web ".into()));
        fields.set_value(FieldId::HealthInterval, FieldValue::Text("  30s ".into()));
        fields.set_value(FieldId::Publish, FieldValue::Text("8080:80  9090:90".into()));
        let snapshot = OptionSnapshot::default();
        let extractor = FieldExtractor::new(&fields, &snapshot);

        assert_eq!(extractor.extract(FieldId::Name), Extracted::Text("  web ".into()));
        assert_eq!(extractor.extract(FieldId::HealthInterval), Extracted::Text("30s".into()));
        assert_eq!(
            extractor.extract(FieldId::Publish),
            Extracted::Tokens(vec!["8080:80".into(), "9090:90".into()])
        );
        assert_eq!(extractor.extract(FieldId::PublishAll), Extracted::Flag(false));
        assert_eq!(extractor.extract(FieldId::HealthOnFailure), Extracted::Text("none".into()));
    }

    #[test]
    fn test_select_identity_comes_from_snapshot() {
        let snapshot = OptionSnapshot {
            pods: CandidateList::fetch(
                "pods",
                Ok(vec![PodSummary::new("p1", "frontend"), PodSummary::new("p2", "backend")]),
            ),
            ..Default::default()
        };
        let mut fields = FieldSet::new();
        fields.set_select_entries(FieldId::Pod, snapshot.pods.entries());
        let extractor = FieldExtractor::new(&fields, &snapshot);
        assert_eq!(extractor.extract(FieldId::Pod), Extracted::Text(String::new()));

        fields.set_value(FieldId::Pod, FieldValue::Select(2));
        let extractor = FieldExtractor::new(&fields, &snapshot);
        assert_eq!(extractor.extract(FieldId::Pod), Extracted::Text("p2".into()));
        assert_eq!(extractor.extract(FieldId::Image), Extracted::Text(String::new()));

        fields.set_value(FieldId::ImageVolume, FieldValue::Select(2));
        let extractor = FieldExtractor::new(&fields, &snapshot);
        assert_eq!(extractor.extract(FieldId::ImageVolume), Extracted::Text("tmpfs".into()));
    }

    #[test]
    fn test_extract_page_follows_focus_order() {
        let model = PageModel::container_create();
        let fields = FieldSet::new();
        let snapshot = OptionSnapshot::default();
        let extractor = FieldExtractor::new(&fields, &snapshot);
        let page: Vec<FieldId> = extractor
            .extract_page(&model.categories[6])
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(page, vec![FieldId::Publish, FieldId::PublishAll, FieldId::Expose]);
    }

    #[test]
    fn test_build_defaults() {
        let model = PageModel::container_create();
        let fields = FieldSet::new();
        let mut builder = RequestBuilder::new();
        builder.apply_all(&model, &fields, &OptionSnapshot::default());
        let opts = builder.build();
        assert_eq!(
            opts,
            ContainerCreateOptions {
                health_on_failure: "none".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_security_label_goes_to_selinux_opts() {
        let mut builder = RequestBuilder::new();
        builder
            .apply(FieldId::SecLabel, Extracted::Tokens(vec!["type:spc_t".into()]))
            .apply(FieldId::Remove, Extracted::Flag(true));
        let opts = builder.build();
        assert_eq!(opts.selinux_opts, vec!["type:spc_t".to_string()]);
        assert!(opts.remove);
    }
}
