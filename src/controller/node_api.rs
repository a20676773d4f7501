//! Access to the cluster-scoped Node resource
//!
//! Reconciliation only needs two calls against the API server: read a node by
//! name and submit a JSON Patch against it. They sit behind [`NodeApi`] so the
//! reconciler can run against an in-memory fake in tests.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::{Api, Client, Resource};

use crate::error::Result;

/// Content type of an RFC 6902 patch body
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Read and JSON-patch Node objects by name
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Fetch the node with the given name
    async fn get_node(&self, name: &str) -> Result<Node>;

    /// Apply a serialized JSON Patch (`application/json-patch+json`) to the node
    async fn patch_node(&self, name: &str, patch: &[u8]) -> Result<Node>;
}

/// [`NodeApi`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeNodeApi {
    client: Client,
    api: Api<Node>,
}

impl KubeNodeApi {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client.clone()),
            client,
        }
    }
}

/// Build the PATCH request for a node, sending `patch` as the body unchanged
pub fn node_patch_request(name: &str, patch: &[u8]) -> Result<http::Request<Vec<u8>>> {
    let url = format!("{}/{}", Node::url_path(&(), None), name);
    let request = http::Request::patch(url)
        .header(http::header::CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
        .header(http::header::ACCEPT, "application/json")
        .body(patch.to_vec())
        .map_err(kube::Error::HttpError)?;
    Ok(request)
}

#[async_trait]
impl NodeApi for KubeNodeApi {
    async fn get_node(&self, name: &str) -> Result<Node> {
        Ok(self.api.get(name).await?)
    }

    async fn patch_node(&self, name: &str, patch: &[u8]) -> Result<Node> {
        let request = node_patch_request(name, patch)?;
        Ok(self.client.request::<Node>(request).await?)
    }
}
