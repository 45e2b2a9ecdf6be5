pub mod container_create;

pub use container_create::ContainerCreateDialog;
