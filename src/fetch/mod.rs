// src/fetch/mod.rs

pub mod credentials;
pub mod pagination;
pub mod session;

pub use credentials::CredentialRotator;
pub use session::Session;
