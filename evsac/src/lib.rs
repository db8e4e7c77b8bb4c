//! Entity access control for the evs platform.
//!
//! The [`Authorizer`] is the request scoped entry point: it holds the
//! caller's identity, the storage handle of the caller's tenant and the
//! data source memo shared by every check made on behalf of the request.

pub mod authorized;
pub mod authorizer;
pub mod error;
pub mod platform;

pub use authorized::{
    ActionFlags,
    Authorized,
};
pub use authorizer::{
    Authorizer,
    GateOptions,
};
pub use platform::Platform;
