pub mod models;
pub mod source;

pub use models::{ContainerCreateOptions, ImageSummary, NetworkSummary, PodSummary, VolumeSummary};
pub use source::{Inventory, OptionSource};
