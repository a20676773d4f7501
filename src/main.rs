use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vip_node_labeler::config::{resolve_node_name, LogFormat};
use vip_node_labeler::controller::{self, KubeNodeApi, NODE_LABEL_HAS_IP};
use vip_node_labeler::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the VIP label on one node
    Apply(ApplyArgs),
    /// Show version information
    Version,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Label key marking the VIP owner
    #[arg(long, env = "NODE_LABEL", default_value = NODE_LABEL_HAS_IP)]
    label: String,

    /// Node to reconcile; set from `spec.nodeName` in a pod (defaults to the system hostname)
    #[arg(long, env = "NODE_NAME")]
    node: Option<String>,

    /// Node currently holding the virtual IP
    #[arg(long, env = "VIP_LEADER")]
    leader: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("vip-node-labeler v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Apply(apply_args) => {
            init_tracing(args.log_format);
            run_apply(apply_args).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true))
            .init(),
    }
}

async fn run_apply(args: ApplyArgs) -> Result<(), Error> {
    let node = resolve_node_name(args.node)?;

    let client = kube::Client::try_default()
        .await
        .map_err(Error::KubeError)?;

    info!(
        "Reconciling label {} on node {} (leader: {})",
        args.label, node, args.leader
    );

    let api = KubeNodeApi::new(client);
    controller::apply_node_label(&api, &args.label, &node, &args.leader).await;

    Ok(())
}
