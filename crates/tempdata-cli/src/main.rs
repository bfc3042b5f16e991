use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tempdata",
    about = "Inspect and manage flash temp data in a session store",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (reserved session key, session database path)
    #[arg(short, long, global = true, default_value = "tempdata.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the pending temp data of a session without consuming it
    Inspect {
        /// Session id
        session: String,
        /// Session database (default: [session].path from the config)
        #[arg(short, long)]
        db: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List sessions that hold temp data
    List {
        #[arg(short, long)]
        db: Option<String>,
    },
    /// Discard the pending temp data of a session
    Clear {
        session: String,
        #[arg(short, long)]
        db: Option<String>,
        /// Delete every value of the session, not just its temp data
        #[arg(long)]
        all: bool,
    },
    /// Generate a tempdata.toml scaffold
    Init {
        /// Directory to write tempdata.toml into
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Session database path recorded in the scaffold
        #[arg(long, default_value = "sessions.redb")]
        db: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tempdata=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { session, db, format } => {
            commands::inspect::inspect(&cli.config, db.as_deref(), &session, &format)
        }
        Commands::List { db } => {
            commands::inspect::list(&cli.config, db.as_deref())
        }
        Commands::Clear { session, db, all } => {
            commands::clear::clear(&cli.config, db.as_deref(), &session, all)
        }
        Commands::Init { path, db } => {
            commands::init::init(&path, &db)
        }
    }
}
