//! Feeds serialized proof artifacts to an on-chain verifier.
//!
//! Artifacts are read from disk ([`artifact`]), cut into 256-bit words under a
//! per-argument byte order ([`codec`], [`layout`]) and passed to a `verify`
//! endpoint in estimate or execute mode ([`verifier`], [`rpc`]).

pub mod artifact;
pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod routes;
pub mod rpc;
pub mod types;
pub mod verifier;
