//! Runtime configuration helpers shared by the binary

use clap::ValueEnum;

use crate::error::{Error, Result};

/// Output format for log lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Resolve the name of the node to label
///
/// An explicit name wins, then the system hostname. In a pod, pass the node
/// name through `NODE_NAME` from the downward API (`spec.nodeName`): the pod
/// `HOSTNAME` is the pod name, not the node name.
pub fn resolve_node_name(explicit: Option<String>) -> Result<String> {
    resolve_node_name_with(explicit, || {
        hostname::get().ok().and_then(|h| h.into_string().ok())
    })
}

fn resolve_node_name_with<F>(explicit: Option<String>, system_hostname: F) -> Result<String>
where
    F: FnOnce() -> Option<String>,
{
    explicit
        .filter(|n| !n.is_empty())
        .or_else(system_hostname)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::ConfigError("unable to determine node name".to_string()))
}
