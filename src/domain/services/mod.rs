mod app_state;
pub mod flow_map;
mod workflow_storage;

pub use app_state::*;
pub use workflow_storage::*;
