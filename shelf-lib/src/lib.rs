//! The library layer: loads every entity into memory, binds them to the
//! background writer, and keeps references consistent across deletes and
//! renumbers.

pub mod collaborators;
pub mod error;
pub mod integrity;
pub mod library;
pub mod persistence;
pub mod registry;
pub mod settings;

pub use collaborators::{AssetStore, ImageDir, NoAssets, StaleFlag, StaleNotifier};
pub use error::LibraryError;
pub use library::{Collaborators, Library, LoadReport};
pub use persistence::Persistence;
pub use registry::Registry;
pub use settings::Settings;
