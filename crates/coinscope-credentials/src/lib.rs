//! Credential storage for coinscope.
//!
//! - [`CredentialStore`] - Reads and writes `credentials.json`
//! - [`StoreError`] - Failures of the store's file operations

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod store;

pub use coinscope_types::{Credentials, Tier};
pub use store::{API_KEY_ENV, CredentialStore, Result, StoreError, TIER_ENV};
