//! Configuration module
//!
//! The settings tree, its post-load validation, an explicit descriptor of
//! every field, and loading/saving of the persisted form.

pub mod descriptor;
pub mod holder;
pub mod loader;
pub mod schema;
pub mod validation;

pub use descriptor::{Bound, FieldDescriptor, FieldKind, Layout, SectionDescriptor, describe};
pub use holder::ConfigHolder;
pub use loader::{
    ConfigFormat, ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions,
    default_config_path,
};
pub use schema::*;
pub use validation::{FieldValue, PostLoad, Repair, RepairLog};
