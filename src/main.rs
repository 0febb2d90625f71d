//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::commands::new::NewPostOptions;

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "A bilingual personal website and blog server", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List stored posts
    List {
        /// Only list posts in this language (en, fr)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Post language (en, fr)
        #[arg(short, long, default_value = "fr")]
        language: String,

        /// Author name (defaults to the configured author)
        #[arg(short, long)]
        author: Option<String>,

        /// Short summary shown in post lists
        #[arg(short, long, default_value = "")]
        summary: String,

        /// Markdown file with the post content
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Publication date, YYYY-MM-DD (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,tower_http=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let site = folio_rs::Site::new(&base_dir)?;
            tracing::info!("Serving site from {:?}", site.base_dir);
            site.serve(&ip, port).await?;
        }

        Commands::List { language } => {
            let site = folio_rs::Site::new(&base_dir)?;
            folio_rs::commands::list::run(&site, language.as_deref())?;
        }

        Commands::New {
            title,
            language,
            author,
            summary,
            file,
            date,
        } => {
            let site = folio_rs::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            folio_rs::commands::new::run(
                &site,
                &NewPostOptions {
                    title: &title,
                    author: author.as_deref(),
                    language: &language,
                    summary: &summary,
                    file: file.as_deref(),
                    date: date.as_deref(),
                },
            )?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
