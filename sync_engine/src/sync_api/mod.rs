mod errors;
mod sync_flow_api;
mod sync_objects;

pub use errors::SyncError;
pub use sync_flow_api::SyncApi;
pub use sync_objects::{FailedIntent, SyncPlan, SyncReport, SyncRequest};
