use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use infrastructure::LabConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "OPU/IVF lab records from the command line", long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override the backend base URL
    #[arg(long, env = "OPU_API_URL")]
    api_url: Option<String>,

    /// Override the bearer token
    #[arg(long, env = "OPU_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search clients by name or document
    Clients {
        query: String,
    },
    /// Production batch header
    #[command(subcommand)]
    Production(ProductionCommand),
    /// OPU rows of a production batch
    #[command(subcommand)]
    Opus(OpusCommand),
    /// Semen inventory and withdrawals
    #[command(subcommand)]
    Semen(SemenCommand),
}

#[derive(Subcommand, Debug)]
enum ProductionCommand {
    Show {
        #[arg(long)]
        client: i64,
        id: i64,
    },
    Create {
        #[arg(long)]
        client: i64,
        /// OPU date, YYYY-MM-DD
        #[arg(long)]
        fecha: chrono::NaiveDate,
        #[arg(long, default_value = "")]
        lugar: String,
        #[arg(long, default_value = "")]
        finca: String,
        #[arg(long, default_value = "")]
        observacion: String,
    },
}

#[derive(Subcommand, Debug)]
enum OpusCommand {
    List {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        production: i64,
    },
    /// Edit one row (or append one when --row is omitted) and save the grid
    Edit {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        production: i64,
        /// Zero-based row index
        #[arg(long)]
        row: Option<usize>,
        /// Field assignment, e.g. --set ctv=15
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },
    Remove {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        production: i64,
        #[arg(long)]
        row: usize,
    },
}

#[derive(Subcommand, Debug)]
enum SemenCommand {
    Inputs {
        #[arg(long)]
        client: i64,
        /// Zero-based page
        #[arg(long, default_value_t = 0)]
        page: u64,
        /// Only count straws of this bull in the balance
        #[arg(long)]
        bull: Option<i64>,
    },
    Withdraw {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        input: i64,
        /// New cumulative quantity taken
        #[arg(long)]
        taken: i64,
        #[arg(long)]
        remark: Option<String>,
        /// Link the output to this production batch
        #[arg(long)]
        production: Option<i64>,
    },
}

async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,opu_admin=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = LabConfig::load(&args.config_dir)?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(token) = args.token {
        config.api.token = Some(token);
    }
    debug!(config_dir = %args.config_dir, base_url = %config.api.base_url, "Configuration loaded");

    let services = commands::Services::connect(&config)?;

    match args.command {
        Command::Clients { query } => commands::search_clients(&services, &query).await,
        Command::Production(ProductionCommand::Show { client, id }) => {
            commands::show_production(&services, client, id).await
        }
        Command::Production(ProductionCommand::Create {
            client,
            fecha,
            lugar,
            finca,
            observacion,
        }) => {
            let mut draft = domain::ProductionDraft::new(client, fecha);
            draft.lugar = lugar;
            draft.finca = finca;
            draft.observacion = observacion;
            commands::create_production(&services, client, draft).await
        }
        Command::Opus(OpusCommand::List { client, production }) => {
            commands::list_opus(&services, client, production).await
        }
        Command::Opus(OpusCommand::Edit {
            client,
            production,
            row,
            assignments,
        }) => commands::edit_opus(&services, client, production, row, &assignments).await,
        Command::Opus(OpusCommand::Remove {
            client,
            production,
            row,
        }) => commands::remove_opus(&services, client, production, row).await,
        Command::Semen(SemenCommand::Inputs { client, page, bull }) => {
            commands::list_inputs(&services, client, page, bull).await
        }
        Command::Semen(SemenCommand::Withdraw {
            client,
            input,
            taken,
            remark,
            production,
        }) => {
            commands::withdraw(&services, client, input, taken, remark, production).await?;
            info!(input_id = input, "Withdrawal recorded");
            Ok(())
        }
    }
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(run()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
