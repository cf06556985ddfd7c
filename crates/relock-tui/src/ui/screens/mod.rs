//! Individual screen renderers

pub mod home;
pub mod locked;
pub mod settings;
pub mod setup;
