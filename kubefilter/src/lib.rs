//! Helpers for filtering Kubernetes resources in automation tools
//!
//! This crate backs automation tooling that selects among candidate
//! Kubernetes objects: it parses `kubectl`-style label-selector
//! expressions, evaluates them against resource label maps or whole object
//! definitions, and interprets the tabular output of `helm plugin list`.
//! It deliberately stops short of talking to a cluster; fetching resources
//! and acting on match results belong to the caller.
//!
//! # Crate Features
//!
//! What functionality is provided by `kubefilter` is controlled by a number
//! of [Cargo features]. All feature flags are disabled by default, so in
//! order to use the crate, the user must enable one or more feature flags.
//! The following feature flags are available:
//!
//! - **filter**: Enables the [`filter`] module. Enabling this feature flag
//!   also enables the **selector** feature.
//! - **helm**: Enables the [`helm`] module.
//! - **selector**: Enables the [`selector`] module.
//!
//! [Cargo features]: https://doc.rust-lang.org/cargo/reference/features.html

#![deny(warnings, rust_2018_idioms, missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "filter")]
#[cfg_attr(docsrs, doc(cfg(feature = "filter")))]
pub mod filter;

#[cfg(feature = "helm")]
#[cfg_attr(docsrs, doc(cfg(feature = "helm")))]
pub mod helm;

#[cfg(feature = "selector")]
#[cfg_attr(docsrs, doc(cfg(feature = "selector")))]
pub mod selector;

#[cfg(feature = "filter")]
pub use self::filter::LabelFilter;

#[cfg(feature = "selector")]
pub use self::selector::{Requirement, Selector};
