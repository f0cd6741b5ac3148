mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "packlist",
    version,
    about = "Match, extract and validate shipment packing lists"
)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a packing list (xlsx, xls, ods, csv or pdf)
    Parse {
        /// Path to the packing list
        input_file: PathBuf,

        /// Dispatch location tag, echoed into the output
        #[arg(short, long, value_name = "TAG")]
        dispatch_location: Option<String>,

        /// Custom model catalog (JSON) instead of the built-in one
        #[arg(long, value_name = "FILE")]
        models: Option<PathBuf>,

        /// Custom ineligible-items rule file (JSON) instead of the built-in one
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// pdftotext binary used for PDF input
        #[arg(long, env = "PACKLIST_PDFTOTEXT", value_name = "PATH")]
        pdftotext: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the result envelope to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Inspect and validate model catalogs
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },
    /// Inspect and validate ineligible-item rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum ModelsAction {
    /// List models in dispatch order
    List {
        /// Custom model catalog (JSON)
        #[arg(long, value_name = "FILE")]
        models: Option<PathBuf>,
    },
    /// Describe one model's fields and behaviour
    Explain {
        /// Model id (e.g., "KESTREL1")
        id: String,

        /// Custom model catalog (JSON)
        #[arg(long, value_name = "FILE")]
        models: Option<PathBuf>,
    },
    /// Validate a custom model catalog
    Validate {
        /// Path to JSON catalog
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List the built-in ineligible-item rules
    List,
    /// Validate a custom rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            dispatch_location,
            models,
            rules,
            pdftotext,
            output,
            out,
        } => {
            commands::parse::run(commands::parse::ParseArgs {
                input_file,
                dispatch_location,
                models,
                rules,
                pdftotext,
                output,
                out,
            })
            .await
        }
        Commands::Models { action } => match action {
            ModelsAction::List { models } => commands::models::list(models.as_deref()),
            ModelsAction::Explain { id, models } => {
                commands::models::explain(&id, models.as_deref())
            }
            ModelsAction::Validate { file } => commands::models::validate(&file),
        },
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
