// Built-in finalize plugins

pub mod completion_plugin;
pub mod manifest_plugin;
pub mod prune_plugin;

pub use completion_plugin::CompletionPlugin;
pub use manifest_plugin::ManifestPlugin;
pub use prune_plugin::PrunePlugin;
