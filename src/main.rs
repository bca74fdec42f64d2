use anyhow::Result;
use clap::{Parser, Subcommand};
use pagesmith::{config, db, pages};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run database migrations and exit
    Init,
    /// Page administration
    Pages {
        #[command(subcommand)]
        command: PagesCommand,
    },
    /// Revision history administration
    Revisions {
        #[command(subcommand)]
        command: RevisionsCommand,
    },
}

#[derive(Debug, Subcommand)]
enum PagesCommand {
    /// List pages in navigation order
    List {
        /// Show archived pages instead
        #[arg(long)]
        archived: bool,
    },
    /// Print a page (canonical section view) by slug
    Show { slug: String },
    /// Create a page with a placeholder section
    Create {
        title: String,
        /// Slug override; defaults to a slugified title
        #[arg(long)]
        slug: Option<String>,
    },
    /// Delete a page and its revisions
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum RevisionsCommand {
    /// List a page's revision history, newest first
    List { page_id: String },
    /// Restore a revision onto the live page
    Restore { revision_id: String },
    /// Label a revision, or clear its label
    Label {
        revision_id: String,
        /// Label text; omit to clear
        label: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| format!("sqlite://{}/pagesmith.db", cfg.app.data_dir));
    let retention = cfg.app.revision_retention;

    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    match args.command {
        Command::Init => {
            info!("database initialized");
        }
        Command::Pages { command } => match command {
            PagesCommand::List { archived } => {
                let listing = if archived {
                    db::list_archived_pages(&pool).await?
                } else {
                    db::list_nav_pages(&pool).await?
                };
                for page in listing {
                    println!(
                        "{}  {:>3}  {}  ({})",
                        page.id,
                        page.nav_order,
                        page.nav_label.as_deref().unwrap_or(&page.title),
                        page.slug
                    );
                }
            }
            PagesCommand::Show { slug } => match db::get_page_by_slug(&pool, &slug).await? {
                Some(page) => {
                    println!("{}", serde_json::to_string_pretty(&page.sections())?);
                }
                None => println!("page '{}' not found", slug),
            },
            PagesCommand::Create { title, slug } => {
                let page = pages::create_page(&pool, &title, slug.as_deref(), retention).await?;
                println!("created page {} ({})", page.id, page.slug);
            }
            PagesCommand::Delete { id } => {
                if db::delete_page(&pool, &id).await? {
                    println!("deleted page {}", id);
                } else {
                    println!("page '{}' not found", id);
                }
            }
        },
        Command::Revisions { command } => match command {
            RevisionsCommand::List { page_id } => {
                for rev in pages::list_revisions(&pool, &page_id).await {
                    println!(
                        "{}  {}  {}{}",
                        rev.id,
                        rev.created_at.to_rfc3339(),
                        rev.label.as_deref().unwrap_or("-"),
                        if rev.is_current { "  (current)" } else { "" }
                    );
                }
            }
            RevisionsCommand::Restore { revision_id } => {
                match pages::restore_revision(&pool, &revision_id, retention).await? {
                    Some(page) => println!("restored page {} ({})", page.id, page.slug),
                    None => println!("revision '{}' not found", revision_id),
                }
            }
            RevisionsCommand::Label { revision_id, label } => {
                if db::set_revision_label(&pool, &revision_id, label.as_deref()).await? {
                    println!("labeled revision {}", revision_id);
                } else {
                    println!("revision '{}' not found", revision_id);
                }
            }
        },
    }
    Ok(())
}
