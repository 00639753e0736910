//! kubeoptic - Entry Point

use clap::Parser;
use kubeoptic::config::{self, CliOverrides, ResolvedConfig};
use kubeoptic::source::{Cluster, DemoCluster, KubectlCluster};
use kubeoptic::state::{AppState, Preselection, ViewerSettings};
use kubeoptic::view::{ColorConfig, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// kubeoptic - browse cluster workloads and tail their logs
#[derive(Parser, Debug)]
#[command(name = "kubeoptic")]
#[command(version)]
#[command(about = "Terminal dashboard for cluster contexts, namespaces, workloads and live logs")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Context to select initially (defaults to the current context)
    #[arg(long)]
    pub context: Option<String>,

    /// Namespace to select initially
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Use the built-in demo cluster instead of kubectl
    #[arg(long)]
    pub demo: bool,

    /// Start log streams with follow mode off
    #[arg(long)]
    pub no_follow: bool,

    /// Color theme
    #[arg(long, value_parser = ["default", "monochrome"])]
    pub theme: Option<String>,

    /// kubectl binary to run
    #[arg(long)]
    pub kubectl: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    fn cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            theme: self.theme.clone(),
            follow: self.no_follow.then_some(false),
            kubectl: self.kubectl.clone(),
        }
    }
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, config::ConfigError> {
    let file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(file)?;
    let with_env = config::apply_env_overrides(merged);
    Ok(config::apply_cli_overrides(with_env, args.cli_overrides()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    kubeoptic::logging::init(&config.log_file_path)?;
    info!(
        theme = %config.theme,
        follow = config.follow,
        demo = args.demo,
        kubectl = %config.kubectl.display(),
        "configuration resolved"
    );

    let cluster: Arc<dyn Cluster> = if args.demo {
        Arc::new(DemoCluster::new())
    } else {
        Arc::new(KubectlCluster::new(config.kubectl.clone(), config.tail_lines))
    };

    let theme = Theme::resolve(&config.theme, ColorConfig::from_env_and_args(args.no_color));
    let settings = ViewerSettings {
        follow: config.follow,
        wrap: config.wrap,
        show_timestamps: config.show_timestamps,
        read_timeout: config.read_timeout,
        save_dir: config.save_dir.clone(),
    };
    let app = AppState::new(config.keybindings, settings).with_preselection(Preselection {
        context: args.context,
        namespace: args.namespace,
    });

    kubeoptic::view::run(app, theme, cluster)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["kubeoptic", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["kubeoptic", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["kubeoptic"]);
        assert_eq!(args.config, None);
        assert_eq!(args.context, None);
        assert_eq!(args.namespace, None);
        assert!(!args.demo);
        assert!(!args.no_follow);
        assert_eq!(args.theme, None);
        assert_eq!(args.kubectl, None);
        assert!(!args.no_color);
        assert_eq!(args.cli_overrides(), CliOverrides::default());
    }

    #[test]
    fn test_selection_flags() {
        let args = Args::parse_from(["kubeoptic", "--context", "prod-eu", "-n", "payments"]);
        assert_eq!(args.context.as_deref(), Some("prod-eu"));
        assert_eq!(args.namespace.as_deref(), Some("payments"));
    }

    #[test]
    fn test_no_follow_overrides_follow() {
        let args = Args::parse_from(["kubeoptic", "--no-follow"]);
        assert_eq!(args.cli_overrides().follow, Some(false));
    }

    #[test]
    fn test_theme_accepts_known_values() {
        let args = Args::parse_from(["kubeoptic", "--theme", "monochrome"]);
        assert_eq!(args.theme.as_deref(), Some("monochrome"));
    }

    #[test]
    fn test_theme_invalid_rejects() {
        let result = Args::try_parse_from(["kubeoptic", "--theme", "neon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "kubeoptic",
            "--demo",
            "--no-color",
            "--kubectl",
            "/opt/bin/kubectl",
            "--config",
            "/tmp/kubeoptic.toml",
        ]);
        assert!(args.demo);
        assert!(args.no_color);
        assert_eq!(
            args.cli_overrides().kubectl,
            Some(PathBuf::from("/opt/bin/kubectl"))
        );
        assert_eq!(args.config, Some(PathBuf::from("/tmp/kubeoptic.toml")));
    }

    #[test]
    fn test_explicit_config_is_resolved() {
        let path = std::env::temp_dir().join("kubeoptic_main_config.toml");
        std::fs::write(&path, "theme = \"monochrome\"\nwrap = true\n").unwrap();
        let args = Args::parse_from([
            "kubeoptic".to_string(),
            "--config".to_string(),
            path.display().to_string(),
            "--no-follow".to_string(),
        ]);

        let config = resolve_config(&args).unwrap();

        assert_eq!(config.theme, "monochrome");
        assert!(config.wrap);
        assert!(!config.follow);
        std::fs::remove_file(&path).ok();
    }
}
