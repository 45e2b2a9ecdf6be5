//! Per-activation snapshots of the resources offered in the dropdowns.

use color_eyre::Result;
use tracing::{debug, warn};

use super::fields::SelectEntry;
use super::page::SelectSource;
use crate::core::{ImageSummary, NetworkSummary, OptionSource, PodSummary, VolumeSummary};

/// A listed resource as it appears in a dropdown.
pub trait Candidate {
    fn label(&self) -> String;
    /// Value placed in the request when this entry is chosen.
    fn identity(&self) -> String;
}

impl Candidate for ImageSummary {
    fn label(&self) -> String {
        self.display_name()
    }

    fn identity(&self) -> String {
        self.id.clone()
    }
}

impl Candidate for PodSummary {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn identity(&self) -> String {
        self.id.clone()
    }
}

impl Candidate for NetworkSummary {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn identity(&self) -> String {
        self.name.clone()
    }
}

impl Candidate for VolumeSummary {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn identity(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList<T> {
    items: Vec<T>,
}

impl<T> Default for CandidateList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Candidate> CandidateList<T> {
    /// Keep the result of one listing call. A failed call is logged and
    /// leaves the list empty.
    pub fn fetch(kind: &str, listing: Result<Vec<T>>) -> Self {
        match listing {
            Ok(items) => {
                debug!("container create: {} {kind} available", items.len());
                Self { items }
            }
            Err(err) => {
                warn!("container create: failed to list {kind}: {err:#}");
                Self::default()
            }
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dropdown entries in listing order, without the unset entry.
    pub fn entries(&self) -> Vec<SelectEntry> {
        self.items
            .iter()
            .map(|item| SelectEntry::new(item.label(), item.identity()))
            .collect()
    }

    /// Identity for a dropdown position where 0 is the unset entry.
    pub fn identity_at(&self, select_index: usize) -> String {
        match select_index.checked_sub(1).and_then(|i| self.items.get(i)) {
            Some(item) => item.identity(),
            None => String::new(),
        }
    }
}

/// Everything fetched from the option source when the dialog was opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSnapshot {
    pub images: CandidateList<ImageSummary>,
    pub pods: CandidateList<PodSummary>,
    pub networks: CandidateList<NetworkSummary>,
    pub volumes: CandidateList<VolumeSummary>,
}

impl OptionSnapshot {
    pub fn load(source: &dyn OptionSource) -> Self {
        Self {
            images: CandidateList::fetch("images", source.list_images()),
            pods: CandidateList::fetch("pods", source.list_pods()),
            networks: CandidateList::fetch("networks", source.list_networks()),
            volumes: CandidateList::fetch("volumes", source.list_volumes()),
        }
    }

    /// Identity behind a position of a source-backed dropdown. Static
    /// dropdowns are not part of the snapshot and give `None`.
    pub fn identity_at(&self, source: SelectSource, select_index: usize) -> Option<String> {
        match source {
            SelectSource::Images => Some(self.images.identity_at(select_index)),
            SelectSource::Pods => Some(self.pods.identity_at(select_index)),
            SelectSource::Networks => Some(self.networks.identity_at(select_index)),
            SelectSource::ImageVolume | SelectSource::HealthOnFailure => None,
        }
    }

    /// Names shown as a hint on the volumes page.
    pub fn volume_names(&self) -> Vec<String> {
        self.volumes.items().iter().map(|v| v.label()).collect()
    }
}
