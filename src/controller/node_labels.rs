//! Node label reconciliation for virtual IP ownership
//!
//! Whenever leadership of the virtual IP moves, the node that gained or lost
//! the address gets a `kube-vip.io/has-ip=true` label added or removed. This
//! lets `kubectl get nodes --show-labels` show where the VIP currently lives.
//!
//! Each call performs one read and at most one JSON Patch. Failures are
//! logged and dropped. The next leadership change corrects any drift.

use std::collections::BTreeMap;

use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::node_api::NodeApi;
use crate::error::Result;

/// Label placed on the node currently holding the virtual IP
pub const NODE_LABEL_HAS_IP: &str = "kube-vip.io/has-ip";

/// [`NODE_LABEL_HAS_IP`] escaped as a JSON Pointer segment
pub const NODE_LABEL_HAS_IP_JSON_PATH: &str = "kube-vip.io~1has-ip";

/// Value written for the label
pub const NODE_LABEL_VALUE: &str = "true";

const LABELS_POINTER: &str = "/metadata/labels";

/// JSON Patch operation kinds used on node labels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
}

/// One entry of a JSON Patch document targeting a node label
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: String,
}

/// Change required to bring a node's label in line with VIP ownership
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAction {
    Add,
    Remove,
    None,
}

impl LabelAction {
    fn patch_op(self) -> Option<PatchOp> {
        match self {
            LabelAction::Add => Some(PatchOp::Add),
            LabelAction::Remove => Some(PatchOp::Remove),
            LabelAction::None => None,
        }
    }
}

/// Result of a single reconciliation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelOutcome {
    /// Action that was decided and, for Add/Remove, applied
    pub action: LabelAction,
    /// Labels reported by the API server after the call
    pub labels: BTreeMap<String, String>,
}

/// Escape a string for use as a single JSON Pointer segment (RFC 6901)
///
/// `~` must be replaced before `/`. Reversing the order would turn the `~`
/// produced by escaping `/` into `~01`.
///
/// The transform is not idempotent: escaping twice escapes the `~` that the
/// first pass introduced.
pub fn escape_json_pointer(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

/// JSON Pointer to a label under `/metadata/labels`
pub fn label_patch_path(label: &str) -> String {
    format!("{}/{}", LABELS_POINTER, escape_json_pointer(label))
}

/// Decide what to do with the label given the observed and desired state
///
/// A label already present on the leader is left alone. It is never
/// re-asserted.
pub fn decide_label_action(has_label: bool, is_leader: bool) -> LabelAction {
    match (has_label, is_leader) {
        (false, true) => LabelAction::Add,
        (true, false) => LabelAction::Remove,
        (true, true) | (false, false) => LabelAction::None,
    }
}

/// Build the one-element JSON Patch document for a label change
pub fn build_label_patch(op: PatchOp, label: &str) -> Vec<LabelPatchOperation> {
    vec![LabelPatchOperation {
        op,
        path: label_patch_path(label),
        value: NODE_LABEL_VALUE.to_string(),
    }]
}

/// Reconcile the VIP ownership label on `node_id`
///
/// `leader_id` is the node that currently owns the virtual IP. Errors from the
/// read, the patch serialization, or the patch call are returned unchanged.
pub async fn reconcile_node_label<A>(
    api: &A,
    label: &str,
    node_id: &str,
    leader_id: &str,
) -> Result<LabelOutcome>
where
    A: NodeApi + ?Sized,
{
    let node = api.get_node(node_id).await?;
    let labels = node.labels().clone();
    debug!("node {} labels: {:?}", node_id, labels);

    let has_label = labels.contains_key(label);
    let action = decide_label_action(has_label, node_id == leader_id);

    let Some(op) = action.patch_op() else {
        debug!("no node label change needed on {}", node_id);
        return Ok(LabelOutcome { action, labels });
    };

    match op {
        PatchOp::Add => debug!("setting node label `{}=true` on {}", label, node_id),
        PatchOp::Remove => debug!("removing node label `{}=true` on {}", label, node_id),
    }

    let patch = serde_json::to_vec(&build_label_patch(op, label))?;
    let updated = api.patch_node(node_id, &patch).await?;
    let labels = updated.labels().clone();
    debug!("updated node {} labels: {:?}", node_id, labels);

    Ok(LabelOutcome { action, labels })
}

/// Best-effort variant of [`reconcile_node_label`]
///
/// Any failure is logged with the node name and dropped. Nothing is reported
/// back to the caller.
pub async fn apply_node_label<A>(api: &A, label: &str, node_id: &str, leader_id: &str)
where
    A: NodeApi + ?Sized,
{
    match reconcile_node_label(api, label, node_id, leader_id).await {
        Ok(outcome) if outcome.action != LabelAction::None => {
            info!(
                "node {} label {} reconciled ({:?}, leader: {})",
                node_id, label, outcome.action, leader_id
            );
        }
        Ok(_) => {}
        Err(e) => {
            error!("can't reconcile label {} on node {}: {}", label, node_id, e);
        }
    }
}
