use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use search_demo::{run_and_close, DemoError, DemoSettings, PropertyReader};
use search_demo_repository::{InMemoryConnector, OpenSearchConnector};
use search_demo_shared::AgeRange;

#[derive(Parser)]
#[command(name = "search-demo")]
#[command(about = "Create, seed, query and clean up a search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Properties file holding the cluster and index settings
    #[arg(
        long,
        env = "SEARCH_DEMO_CONFIG",
        default_value = "config.properties",
        global = true
    )]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo flow (default)
    Run(RunArgs),
    /// Read or update the properties file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Default)]
struct RunArgs {
    /// JSON array to seed the index with instead of the built-in samples
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Lower bound of the age range query
    #[arg(long, allow_hyphen_values = true)]
    from: Option<i64>,

    /// Upper bound of the age range query
    #[arg(long, allow_hyphen_values = true)]
    to: Option<i64>,

    /// Field matched by the delete step
    #[arg(long)]
    delete_field: Option<String>,

    /// Value matched by the delete step
    #[arg(long)]
    delete_value: Option<String>,

    /// Run against an in-memory cluster instead of a real one
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn apply(self, mut settings: DemoSettings) -> DemoSettings {
        if let Some(path) = self.data_file {
            settings.data_file = Some(path);
        }
        settings.query_range = AgeRange::new(
            self.from.unwrap_or(settings.query_range.from),
            self.to.unwrap_or(settings.query_range.to),
        );
        if let Some(field) = self.delete_field {
            settings.delete_field = field;
        }
        if let Some(value) = self.delete_value {
            settings.delete_value = value;
        }
        settings
    }
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the value stored for a key
    Get { key: String },
    /// Store a value and rewrite the file
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    let result = match command {
        Commands::Run(args) => run(&cli.config, args).await,
        Commands::Config(command) => config(&cli.config, command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "search-demo failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(config_path: &Path, args: RunArgs) -> Result<(), DemoError> {
    let dry_run = args.dry_run;
    let properties = PropertyReader::load(config_path);
    let settings = args.apply(DemoSettings::from_properties(&properties)?);

    info!(
        address = %settings.address,
        index = %settings.index_name,
        dry_run,
        "Starting search demo"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    let report = if dry_run {
        let connector =
            InMemoryConnector::new(&settings.address.cluster_name, settings.connector.clone());
        run_and_close(connector, &settings, shutdown).await?
    } else {
        let connector = OpenSearchConnector::connect(&settings.address, settings.connector.clone())?;
        run_and_close(connector, &settings, shutdown).await?
    };

    report.log_summary();
    Ok(())
}

fn config(config_path: &Path, command: ConfigCommand) -> Result<(), DemoError> {
    let mut properties = PropertyReader::load(config_path);

    match command {
        ConfigCommand::Get { key } => match properties.read(&key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(DemoError::config(format!(
                "`{}` is not set in {}",
                key,
                config_path.display()
            ))),
        },
        ConfigCommand::Set { key, value } => {
            if properties.write(&key, &value) {
                info!(key = %key, path = %config_path.display(), "Stored configuration value");
                Ok(())
            } else {
                Err(DemoError::config(format!(
                    "could not write {}",
                    config_path.display()
                )))
            }
        }
    }
}
