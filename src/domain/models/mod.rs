mod document;
mod error;
mod seed;
mod session;
mod step;
mod storage;

pub use document::*;
pub use error::*;
pub use seed::*;
pub use session::*;
pub use step::*;
pub use storage::*;
