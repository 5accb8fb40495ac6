//! Quill CLI - Command-line client for the Quill blogging service.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::App;
use quill_api::ListQuery;
use quill_config::{Config, Paths};

/// Quill CLI - Read, write, and manage blog posts from the terminal.
#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill CLI for the Quill blogging service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Sign in through the browser instead
        #[arg(long)]
        web: bool,
    },

    /// Register a new account
    Register,

    /// Logout and clear the stored session
    Logout,

    /// Check authentication status
    Status,

    /// Manage posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },

    /// Manage drafts
    Drafts {
        #[command(subcommand)]
        command: DraftCommands,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// List posts
    List {
        /// Full-text search filter
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by author ID
        #[arg(short, long)]
        author: Option<String>,
        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show a post
    Show {
        /// Post ID
        id: String,
    },
    /// Create a post
    Create {
        /// Post title
        #[arg(short, long)]
        title: String,
        /// Post content
        #[arg(short, long)]
        content: String,
        /// Short excerpt
        #[arg(short, long)]
        excerpt: Option<String>,
    },
    /// Update a post
    Update {
        /// Post ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        excerpt: Option<String>,
    },
    /// Delete a post
    Delete {
        /// Post ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print a shareable link for a post
    Share {
        /// Post ID
        id: String,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// List drafts
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show a draft
    Show {
        /// Draft ID
        id: String,
    },
    /// Create a draft
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        #[arg(short, long)]
        excerpt: Option<String>,
    },
    /// Update a draft
    Update {
        /// Draft ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        excerpt: Option<String>,
    },
    /// Delete a draft
    Delete {
        /// Draft ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Publish a draft as a post
    Publish {
        /// Draft ID
        id: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show a user
    Show {
        /// User ID
        id: String,
    },
    /// Show a user's stats
    Stats {
        /// User ID
        id: String,
    },
    /// Update a user profile
    Update {
        /// User ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        bio: Option<String>,
    },
    /// Delete a user account
    Delete {
        /// User ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (paths, config) = match bootstrap_config() {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    quill_config::init_logging(&level);

    let app = App::build(&paths, config);
    let format = cli.format;

    let result = match cli.command {
        Commands::Login { web } => commands::auth::login(&app, web, &format).await,
        Commands::Register => commands::auth::register(&app, &format).await,
        Commands::Logout => commands::auth::logout(&app, &format).await,
        Commands::Status => commands::auth::status(&app, &format).await,
        Commands::Posts { command } => match command {
            PostCommands::List {
                search,
                author,
                page,
                limit,
            } => {
                let query = ListQuery {
                    search,
                    author,
                    page,
                    limit,
                };
                commands::posts::list(&app, query, &format).await
            }
            PostCommands::Show { id } => commands::posts::show(&app, &id, &format).await,
            PostCommands::Create {
                title,
                content,
                excerpt,
            } => commands::posts::create(&app, title, content, excerpt, &format).await,
            PostCommands::Update {
                id,
                title,
                content,
                excerpt,
            } => commands::posts::update(&app, &id, title, content, excerpt, &format).await,
            PostCommands::Delete { id, yes } => {
                commands::posts::delete(&app, &id, yes, &format).await
            }
            PostCommands::Share { id } => commands::posts::share(&app, &id, &format).await,
        },
        Commands::Drafts { command } => match command {
            DraftCommands::List {
                search,
                page,
                limit,
            } => {
                let query = ListQuery {
                    search,
                    page,
                    limit,
                    ..Default::default()
                };
                commands::drafts::list(&app, query, &format).await
            }
            DraftCommands::Show { id } => commands::drafts::show(&app, &id, &format).await,
            DraftCommands::Create {
                title,
                content,
                excerpt,
            } => commands::drafts::create(&app, title, content, excerpt, &format).await,
            DraftCommands::Update {
                id,
                title,
                content,
                excerpt,
            } => commands::drafts::update(&app, &id, title, content, excerpt, &format).await,
            DraftCommands::Delete { id, yes } => {
                commands::drafts::delete(&app, &id, yes, &format).await
            }
            DraftCommands::Publish { id } => commands::drafts::publish(&app, &id, &format).await,
        },
        Commands::Users { command } => match command {
            UserCommands::List { search, limit } => {
                let query = ListQuery {
                    search,
                    limit,
                    ..Default::default()
                };
                commands::users::list(&app, query, &format).await
            }
            UserCommands::Show { id } => commands::users::show(&app, &id, &format).await,
            UserCommands::Stats { id } => commands::users::stats(&app, &id, &format).await,
            UserCommands::Update {
                id,
                name,
                email,
                bio,
            } => commands::users::update(&app, &id, name, email, bio, &format).await,
            UserCommands::Delete { id, yes } => {
                commands::users::delete(&app, &id, yes, &format).await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve paths and configuration for this run.
fn bootstrap_config() -> anyhow::Result<(Paths, Config)> {
    let paths = Paths::new()?;
    paths.ensure_dirs()?;
    let config = Config::load(&paths)?;
    Ok((paths, config))
}
