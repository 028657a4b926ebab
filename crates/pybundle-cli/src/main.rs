use clap::{Parser, Subcommand};
use pybundle::{
    commands::{
        bundle::{self, BundleCommand},
        config::{self, ConfigAction},
        tree::{self, TreeCommand},
    },
    logger, GlobalOpts,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pybundle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Bundle Python entry points into a standalone binary",
    long_about = "pybundle turns the scripts, gui-scripts and entry points of a pyproject.toml into a Rust command line that runs them on an embedded Python interpreter."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a standalone crate for a project and compile it
    Bundle(BundleCommand),
    /// Print the command tree a project would produce
    Tree(TreeCommand),
    /// Configure pybundle
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    let result = match cli.command {
        Commands::Bundle(cmd) => bundle::handle_bundle(cmd, &cli.global).map_err(|e| {
            if e.has_logged_output() {
                logger::show_log_path();
            }
            e.to_string()
        }),
        Commands::Tree(cmd) => tree::handle_tree(cmd).map_err(|e| e.to_string()),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(message) = result {
        logger::error(&message);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logger::verbosity_to_filter()));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
