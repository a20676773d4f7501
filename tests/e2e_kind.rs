use std::error::Error;
use std::process::{Command, Stdio};

use vip_node_labeler::controller::{
    reconcile_node_label, KubeNodeApi, LabelAction, NODE_LABEL_HAS_IP,
};

/// Returns true if the given binary is accessible in PATH.
fn tool_available(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

// ---------------------------------------------------------------------------
// E2E label reconciliation
//
// Moves the VIP label between the nodes of a real Kind cluster.
// Run with: cargo test --test e2e_kind -- --ignored
// ---------------------------------------------------------------------------

/// End-to-end test of the node label lifecycle:
///
/// 1. Start (or reuse) a Kind cluster.
/// 2. Label the first node as VIP owner.
/// 3. Repeat the call and verify it is a no-op.
/// 4. Move leadership away and verify the label is removed.
#[tokio::test]
#[ignore]
async fn e2e_node_label_lifecycle() -> Result<(), Box<dyn Error>> {
    for tool in &["kind", "kubectl", "docker"] {
        if !tool_available(tool) {
            eprintln!("Skipping e2e test: `{tool}` not found in PATH.");
            return Ok(());
        }
    }

    let cluster_name =
        std::env::var("KIND_CLUSTER_NAME").unwrap_or_else(|_| "vip-labeler-e2e".into());
    ensure_kind_cluster(&cluster_name)?;

    let node = run_cmd(
        "kubectl",
        &["get", "nodes", "-o", "jsonpath={.items[0].metadata.name}"],
    )?;
    assert!(!node.is_empty(), "cluster has no nodes");

    // Start from a clean node
    let unlabel = format!("{}-", NODE_LABEL_HAS_IP);
    run_cmd("kubectl", &["label", "node", &node, &unlabel])?;

    let client = kube::Client::try_default().await?;
    let api = KubeNodeApi::new(client);

    let outcome = reconcile_node_label(&api, NODE_LABEL_HAS_IP, &node, &node).await?;
    assert_eq!(outcome.action, LabelAction::Add);
    assert_eq!(node_label(&node)?, "true");

    let outcome = reconcile_node_label(&api, NODE_LABEL_HAS_IP, &node, &node).await?;
    assert_eq!(outcome.action, LabelAction::None);

    let outcome =
        reconcile_node_label(&api, NODE_LABEL_HAS_IP, &node, "some-other-node").await?;
    assert_eq!(outcome.action, LabelAction::Remove);
    assert_eq!(node_label(&node)?, "");

    let err = reconcile_node_label(&api, NODE_LABEL_HAS_IP, "no-such-node", "no-such-node")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

fn node_label(node: &str) -> Result<String, Box<dyn Error>> {
    let jsonpath = format!(
        "jsonpath={{.metadata.labels.{}}}",
        NODE_LABEL_HAS_IP.replace('.', "\\.")
    );
    run_cmd("kubectl", &["get", "node", node, "-o", &jsonpath])
}

fn ensure_kind_cluster(name: &str) -> Result<(), Box<dyn Error>> {
    let clusters = run_cmd("kind", &["get", "clusters"])?;
    if clusters.lines().any(|line| line.trim() == name) {
        return Ok(());
    }
    run_cmd("kind", &["create", "cluster", "--name", name])?;
    Ok(())
}

fn run_cmd(program: &str, args: &[&str]) -> Result<String, Box<dyn Error>> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Ok(kubeconfig) = std::env::var("KUBECONFIG") {
        cmd.env("KUBECONFIG", kubeconfig);
    }
    let output = cmd.output()?;
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "command failed: {} {:?}\nstdout:\n{}\nstderr:\n{}",
            program, args, stdout, stderr
        )
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
