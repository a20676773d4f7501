//! Controller module for VIP node labelling
//!
//! This module contains the node API seam and the label reconciliation logic
//! invoked when virtual IP ownership changes.

pub mod node_api;
pub mod node_labels;

pub use node_api::{node_patch_request, KubeNodeApi, NodeApi, JSON_PATCH_CONTENT_TYPE};
pub use node_labels::{
    apply_node_label, build_label_patch, decide_label_action, escape_json_pointer,
    label_patch_path, reconcile_node_label, LabelAction, LabelOutcome, LabelPatchOperation,
    PatchOp, NODE_LABEL_HAS_IP, NODE_LABEL_HAS_IP_JSON_PATH, NODE_LABEL_VALUE,
};
