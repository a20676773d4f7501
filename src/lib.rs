//! vip-node-labeler: Kubernetes node labels for virtual IP ownership
//!
//! This crate keeps a boolean label on each Kubernetes Node in sync with
//! whether that node currently holds a floating/virtual IP address.

pub mod config;
pub mod controller;
pub mod error;

pub use crate::error::{Error, Result};
