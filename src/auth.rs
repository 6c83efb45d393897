//! Credentials, request signing, and the authentication interceptor.

pub mod credentials;
pub mod interceptor;
pub mod signer;

pub use credentials::*;
pub use interceptor::*;
pub use signer::*;
