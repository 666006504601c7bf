// restore: reapply the last deployed Tiller release of a chart

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use restore_core::config::OutputFilter;
use restore_core::impls::Kubectl;
use restore_core::{RestoreConfig, Restorer};

#[derive(Parser)]
#[command(name = "restore")]
#[command(about = "restore last deployed release to original state", long_about = None)]
struct Cli {
    /// Name of the release to restore
    #[arg(value_name = "RELEASE_NAME")]
    release_name: String,

    /// Namespace of Tiller
    #[arg(long, default_value = "kube-system")]
    tiller_namespace: String,

    /// Label to select Tiller resources by
    #[arg(short, long, default_value = "OWNER=TILLER,STATUS=DEPLOYED")]
    label: String,

    /// Path to the kubeconfig file (kubectl resolves KUBECONFIG itself when unset)
    #[arg(long)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// kubectl binary used for queries and apply
    #[arg(long, default_value = "kubectl")]
    kubectl: PathBuf,

    /// File the manifest is written to while applying
    #[arg(long, default_value = "manifests.yaml")]
    manifest_path: PathBuf,

    /// Print kubectl "Warning:" lines too
    #[arg(long)]
    show_warnings: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> RestoreConfig {
        RestoreConfig {
            tiller_namespace: self.tiller_namespace.clone(),
            label: self.label.clone(),
            manifest_path: self.manifest_path.clone(),
            output_filter: if self.show_warnings {
                OutputFilter::show_all()
            } else {
                OutputFilter::default()
            },
            ..RestoreConfig::default()
        }
    }

    fn kubectl(&self) -> Kubectl {
        let mut kubectl = Kubectl::new().with_binary(&self.kubectl);
        if let Some(kubeconfig) = &self.kubeconfig {
            kubectl = kubectl.with_kubeconfig(kubeconfig);
        }
        if let Some(context) = &self.context {
            kubectl = kubectl.with_context(context);
        }
        kubectl
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // -l はそのまま kubectl に渡す（set-based selector も kubectl 側で解釈）
    let kubectl = cli.kubectl();
    let restorer = Restorer::new(&kubectl, &kubectl, cli.config());
    tracing::debug!(config = ?restorer.config(), "starting restore");

    let report = restorer
        .restore(&cli.release_name)
        .with_context(|| format!("failed to restore {}", cli.release_name))?;

    for line in &report.lines {
        println!("{line}");
    }
    Ok(())
}
