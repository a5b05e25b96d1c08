pub mod key;
pub mod record;
pub mod registry;

pub use key::{ClientId, SessionId, SessionKey, Uid, OFFLINE_UID};
pub use record::{Session, SessionState, TranscodingPriority, TranscodingRequest};
pub use registry::SessionRegistry;
