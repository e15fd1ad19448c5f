mod api;
mod config;
mod data_objects;
mod error;

pub use api::VoogApi;
pub use config::VoogConfig;
pub use data_objects::{BulkAction, BulkUpdate, VoogProduct, VoogStatus};
pub use error::VoogApiError;
