mod file;
mod memory;
mod settings_store;

pub use file::JsonFileSettingsStore;
pub use memory::InMemorySettingsStore;
pub use settings_store::{SettingsStore, SettingsStoreError};
