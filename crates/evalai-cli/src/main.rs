//! evalai CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "evalai",
    version,
    about = "Track subjects, answer scripts, and evaluation results"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the persisted state (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config file
    Init,

    /// Manage subjects
    Subject {
        #[command(subcommand)]
        action: SubjectAction,
    },

    /// Attach a scheme-of-evaluation PDF to a subject
    Scheme {
        /// Subject name
        #[arg(long)]
        subject: String,

        /// Path to the PDF document
        file: PathBuf,
    },

    /// Evaluate answer scripts with the configured scorer
    Evaluate {
        /// Subject name
        #[arg(long)]
        subject: String,

        /// Student name (defaults to each file name without extension)
        #[arg(long)]
        student_name: Option<String>,

        /// Student id (defaults to a timestamp)
        #[arg(long)]
        student_id: Option<String>,

        /// Pass threshold in percent (overrides config)
        #[arg(long)]
        pass_threshold: Option<u32>,

        /// Answer script files
        files: Vec<PathBuf>,
    },

    /// Overwrite a result with a manual evaluation
    Review {
        /// Result id to review
        result_id: String,

        /// Marks awarded
        #[arg(long, default_value = "")]
        marks: String,

        /// Maximum marks
        #[arg(long, default_value = "100")]
        max_marks: String,

        /// Reviewer comments
        #[arg(long, default_value = "")]
        comments: String,

        /// Pass threshold in percent (overrides config)
        #[arg(long)]
        pass_threshold: Option<u32>,
    },

    /// List evaluation results
    Results {
        /// Filter by student name or id
        #[arg(long)]
        search: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show pass-rate statistics
    Stats,

    /// Export all data as JSON
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },

    /// Permanently delete all data
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SubjectAction {
    /// Create a subject
    Add {
        /// Subject name
        name: String,
    },

    /// List subjects with their pass rates
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Subject { action } => match action {
            SubjectAction::Add { name } => commands::subject::add(&ctx, &name),
            SubjectAction::List => commands::subject::list(&ctx),
        },
        Commands::Scheme { subject, file } => commands::scheme::execute(&ctx, &subject, file).await,
        Commands::Evaluate {
            subject,
            student_name,
            student_id,
            pass_threshold,
            files,
        } => {
            commands::evaluate::execute(
                &ctx,
                &subject,
                student_name,
                student_id,
                pass_threshold,
                files,
            )
            .await
        }
        Commands::Review {
            result_id,
            marks,
            max_marks,
            comments,
            pass_threshold,
        } => commands::review::execute(&ctx, &result_id, marks, max_marks, comments, pass_threshold),
        Commands::Results { search, format } => {
            commands::results::execute(&ctx, search.as_deref(), &format)
        }
        Commands::Stats => commands::stats::execute(&ctx),
        Commands::Export { output } => commands::export::execute(&ctx, output),
        Commands::Clear { yes } => commands::clear::execute(&ctx, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
