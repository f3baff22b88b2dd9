//! # clubcollab-shared
//!
//! Types shared by the store and client crates: id newtypes, club roles,
//! storage constants and credential helpers.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod types;
