use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cypherweave::config::{BuilderConfig, CliConfig};
use cypherweave::eager_load::{synthesize, EagerLoadRequest};
use cypherweave::parameters::ParameterTable;
use cypherweave::query_builder::{Clause, QueryBuilder};
use cypherweave::runner::Row;
use std::io::Read;
use std::path::{Path, PathBuf};

/// cypherweave - compile structured query intent into parameterized Cypher
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (defaults to CYPHERWEAVE_* environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Unique parameter-name candidates tried before giving up
    #[arg(long, global = true)]
    max_name_attempts: Option<u32>,

    /// Width of generated parameter-name suffixes
    #[arg(long, global = true)]
    name_suffix_width: Option<u8>,

    /// Identifier bound to the eager-load root
    #[arg(long, global = true)]
    root_identifier: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON array of clause descriptors
    Build {
        /// Input file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Synthesize an eager-load statement from a JSON request
    Eager {
        /// Input file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Hydrate result rows of an eager-load request into nested entities
    Hydrate {
        /// Eager-load request the rows were produced by
        #[arg(long)]
        request: String,
        /// JSON array of rows, or `-` for stdin
        #[arg(long, default_value = "-")]
        rows: String,
    },
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        CliConfig {
            max_name_attempts: cli.max_name_attempts,
            name_suffix_width: cli.name_suffix_width,
            root_identifier: cli.root_identifier.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger - defaults to WARN level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let output = match &cli.command {
        Command::Build { input } => {
            let clauses: Vec<serde_json::Value> =
                serde_json::from_str(&read_input(input)?).context("clause input is not a JSON array")?;
            let clauses = clauses
                .into_iter()
                .map(Clause::from_json)
                .collect::<Result<Vec<_>, _>>()?;
            let statement =
                QueryBuilder::from_clauses(clauses, ParameterTable::with_naming(config.naming()))?
                    .build();
            serde_json::to_value(&statement)?
        }
        Command::Eager { input } => {
            let request = read_request(input, &config)?;
            let result = synthesize(&request, ParameterTable::with_naming(config.naming()))?;
            serde_json::to_value(&result)?
        }
        Command::Hydrate { request, rows } => {
            let request = read_request(request, &config)?;
            let result = synthesize(&request, ParameterTable::with_naming(config.naming()))?;
            let rows: Vec<Row> =
                serde_json::from_str(&read_input(rows)?).context("rows are not a JSON array of objects")?;
            serde_json::to_value(result.hydrate(&rows)?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<BuilderConfig> {
    let mut config = match &cli.config {
        Some(path) => BuilderConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BuilderConfig::from_env().unwrap_or_else(|e| {
            log::warn!("Ignoring invalid environment configuration: {}", e);
            BuilderConfig::default()
        }),
    };
    config.merge(CliConfig::from(cli))?;
    log::debug!("Using configuration: {:?}", config);
    Ok(config)
}

fn read_request(source: &str, config: &BuilderConfig) -> Result<EagerLoadRequest> {
    let mut request: EagerLoadRequest =
        serde_json::from_str(&read_input(source)?).context("invalid eager-load request")?;
    request
        .identifier
        .get_or_insert_with(|| config.root_identifier.clone());
    Ok(request)
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(Path::new(source)).with_context(|| format!("reading {}", source))
    }
}
