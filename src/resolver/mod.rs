//! Module source resolution.
//!
//! This is where a declared `source`/`version` pair becomes a provenance
//! record. The pipeline for one file is:
//!
//! ```text
//! ModuleBlock ──► FileAggregator ──► ModuleClassifier ──► EndpointClassifier
//!                      │                    │
//!                      │                    └──(ssh)──► split_git_location
//!                      ▼
//!                  FileData
//! ```
//!
//! # Example
//!
//! ```rust
//! use modsource::resolver::ModuleClassifier;
//! use modsource::types::Protocol;
//!
//! let classifier = ModuleClassifier::new();
//! let module = classifier.resolve("vpc", "terraform-aws-modules/vpc/aws", "5.0.0")?;
//! assert_eq!(module.protocol, Protocol::Registry);
//! # Ok::<(), modsource::ModSourceError>(())
//! ```

mod aggregate;
mod endpoint;
mod git;
mod module;

pub use aggregate::FileAggregator;
pub use endpoint::{Endpoint, EndpointClassifier, TransportEndpointParser};
pub use git::split_git_location;
pub use module::ModuleClassifier;
