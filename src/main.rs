use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use shop_admin::cascade::DependentGroup;
use shop_admin::categories::{CategoryForm, CategoryManager};
use shop_admin::config::Config;
use shop_admin::currencies::CurrencyManager;
use shop_admin::models::{CategoryStatus, CurrencyPayload, Disposition, LoginPayload};
use shop_admin::tree::find_in_forest;
use shop_admin::utils::init_tracing;
use shop_admin::{ApiClient, DeletionCascade, SessionStore, TokenStorage, TreeViewState};

/// Shop administration from the terminal
#[derive(Parser, Debug)]
#[command(name = "shop-admin", version, about, long_about = None)]
struct Cli {
    /// Show request-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in with email and password, or store an externally issued token
    Login {
        #[arg(long, requires = "password", conflicts_with = "token")]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Manage currencies
    #[command(subcommand)]
    Currencies(CurrencyCommand),
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Print the category tree
    Tree {
        /// Collapse these category ids
        #[arg(long)]
        collapse: Vec<String>,
        /// Print the forest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a category
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<CategoryStatus>,
    },
    /// Update a category
    Edit {
        id: String,
        #[arg(long)]
        name: String,
        /// Move under this category; without it the current parent is kept
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,
        /// Make the category a root
        #[arg(long)]
        root: bool,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<CategoryStatus>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a category, choosing what happens to its products and subcategories
    Delete {
        id: String,
        /// `move:<category-id>` or `delete`
        #[arg(long, value_parser = parse_disposition)]
        products: Option<Disposition>,
        /// `move:<category-id>` or `delete`
        #[arg(long, value_parser = parse_disposition)]
        subcategories: Option<Disposition>,
    },
}

#[derive(Subcommand, Debug)]
enum CurrencyCommand {
    /// List currencies
    List,
    /// Create a currency
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        code: String,
    },
    /// Update a currency
    Edit {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        code: String,
    },
    /// Delete a currency
    Delete { id: String },
}

fn parse_status(value: &str) -> Result<CategoryStatus, String> {
    CategoryStatus::parse(value)
        .ok_or_else(|| format!("unknown status '{}', expected active, pending or inactive", value))
}

fn parse_disposition(value: &str) -> Result<Disposition, String> {
    match value.trim() {
        "delete" => Ok(Disposition::DeleteAll),
        "move" => Ok(Disposition::Move { target: None }),
        other => match other.strip_prefix("move:") {
            Some(target) if !target.trim().is_empty() => Ok(Disposition::Move {
                target: Some(target.trim().to_string()),
            }),
            _ => Err(format!(
                "invalid disposition '{}', expected move:<category-id> or delete",
                value
            )),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env().map_err(|e| anyhow!("Configuration error: {}", e))?;
    let storage = TokenStorage::new(config.session_path.clone());
    let session = SessionStore::hydrate(storage, config.session_ttl_secs)
        .await
        .context("Failed to restore session")?;
    let client = ApiClient::new(config.api_url.clone(), session.clone());

    match cli.command {
        Commands::Login {
            email,
            password,
            token,
        } => login(&session, &client, email, password, token).await,
        Commands::Logout => {
            session.logout().await?;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => {
            let profile = session.refresh_profile(&client).await?;
            match profile.name {
                Some(name) => println!("{} <{}>", name, profile.email),
                None => println!("{}", profile.email),
            }
            Ok(())
        }
        Commands::Categories(command) => run_categories(client, command).await,
        Commands::Currencies(command) => run_currencies(client, command).await,
    }
}

async fn login(
    session: &SessionStore,
    client: &ApiClient,
    email: Option<String>,
    password: Option<String>,
    token: Option<String>,
) -> Result<()> {
    if let Some(token) = token {
        session.set_token(token).await?;
        // The token alone says nothing about who we are.
        match session.refresh_profile(client).await {
            Ok(profile) => println!("Logged in as {}", profile.email),
            Err(e) => {
                tracing::warn!("token stored but profile lookup failed: {}", e);
                println!("Token stored");
            }
        }
        return Ok(());
    }

    let (Some(email), Some(password)) = (email, password) else {
        return Err(anyhow!("Provide --email and --password, or --token"));
    };
    let profile = session
        .login(client, LoginPayload { email, password })
        .await?;
    println!("Logged in as {}", profile.email);
    Ok(())
}

async fn run_categories(client: ApiClient, command: CategoryCommand) -> Result<()> {
    let mut manager = CategoryManager::new(client);

    match command {
        CategoryCommand::Tree { collapse, json } => {
            manager.load().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(manager.forest())?);
                return Ok(());
            }
            if manager.forest().is_empty() {
                println!("NO CATEGORIES");
                return Ok(());
            }
            let mut view = TreeViewState::new();
            for id in &collapse {
                view.set_open(id, false);
            }
            print!("{}", view.render_text(manager.forest()));
        }
        CategoryCommand::Add {
            name,
            parent,
            description,
            status,
        } => {
            let form = CategoryForm {
                name,
                description,
                status,
                parent,
                image: None,
            };
            let created = manager.create(&form).await?;
            println!("Created {} ({})", created.name, created.id);
        }
        CategoryCommand::Edit {
            id,
            name,
            parent,
            root,
            description,
            status,
            image,
        } => {
            let parent = match (parent, root) {
                (_, true) => None,
                (Some(parent), false) => Some(parent),
                (None, false) => {
                    manager.load().await?;
                    manager
                        .categories()
                        .iter()
                        .find(|c| c.id == id)
                        .ok_or_else(|| anyhow!("Category '{}' not found", id))?
                        .parent
                        .clone()
                }
            };
            let form = CategoryForm {
                name,
                description,
                status,
                parent,
                image,
            };
            let updated = manager.update(&id, &form).await?;
            println!("Updated {} ({})", updated.name, updated.id);
        }
        CategoryCommand::Delete {
            id,
            products,
            subcategories,
        } => {
            manager.load().await?;
            let node = find_in_forest(manager.forest(), &id)
                .ok_or_else(|| anyhow!("Category '{}' not found", id))?;

            let mut cascade = DeletionCascade::new();
            cascade.request_delete(node)?;
            if let Some(products) = products {
                cascade.set_disposition(DependentGroup::Products, products)?;
            }
            if let Some(subcategories) = subcategories {
                cascade.set_disposition(DependentGroup::Subcategories, subcategories)?;
            }

            if let Err(e) = manager.delete(&mut cascade).await {
                for group in [DependentGroup::Products, DependentGroup::Subcategories] {
                    if cascade.needs_target(group) {
                        let candidates = cascade.move_candidates(manager.forest(), group);
                        eprintln!("Targets for {}:", group.label());
                        for category in candidates {
                            eprintln!("  {} ({})", category.name, category.id);
                        }
                    }
                }
                return Err(e.into());
            }
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

async fn run_currencies(client: ApiClient, command: CurrencyCommand) -> Result<()> {
    let mut manager = CurrencyManager::new(client);

    match command {
        CurrencyCommand::List => {
            manager.load().await?;
            if manager.currencies().is_empty() {
                println!("NO CURRENCIES");
            }
            for currency in manager.currencies() {
                println!(
                    "{:<4} {:<4} {} ({})",
                    currency.code, currency.symbol, currency.name, currency.id
                );
            }
        }
        CurrencyCommand::Add { name, symbol, code } => {
            let created = manager
                .create(&CurrencyPayload { name, symbol, code })
                .await?;
            println!("Created {} ({})", created.code, created.id);
        }
        CurrencyCommand::Edit {
            id,
            name,
            symbol,
            code,
        } => {
            let updated = manager
                .update(&id, &CurrencyPayload { name, symbol, code })
                .await?;
            println!("Updated {} ({})", updated.code, updated.id);
        }
        CurrencyCommand::Delete { id } => {
            manager.delete(&id).await?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}
