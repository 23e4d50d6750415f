pub mod identity;

pub use identity::{identity_middleware, CallerId, USER_ID_HEADER};
