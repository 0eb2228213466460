// Core domain layer
pub mod models;
pub mod pruner;
pub mod plugin;
pub mod services;
pub mod interfaces;

pub use models::*;
pub use pruner::*;
pub use services::*;
pub use interfaces::*;
