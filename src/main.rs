use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ecycle::config::Config;

mod cli;

use cli::create::NewUser;
use cli::redeem::RedeemTarget;

#[derive(Parser)]
#[command(name = "ecycle")]
#[command(about = "E-Cycle - earn points for recycling e-waste and redeem them for coupons")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.ecycle/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User id to act as (defaults to settings.default_user)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ~/.ecycle/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create a user (guest by default)
    Create {
        /// Create the seeded demo account
        #[arg(long, conflicts_with_all = ["name", "email"])]
        demo: bool,

        /// Register a named user
        #[arg(long)]
        name: Option<String>,

        /// Email for the registered user
        #[arg(long, requires = "name")]
        email: Option<String>,
    },

    /// Show points, level, multiplier and impact
    Status,

    /// Record a drop-off, e.g. `deposit celulares=1 cables=2`
    Deposit {
        /// category=count pairs (celulares, baterias, laptops, cables)
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Spend points on a coupon or an arbitrary amount
    Redeem {
        /// Coupon id from `ecycle coupons`
        #[arg(long, conflicts_with = "cost", required_unless_present = "cost")]
        coupon: Option<String>,

        /// Number of points to spend
        #[arg(long)]
        cost: Option<u64>,
    },

    /// Show recent transactions
    History {
        /// Number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show achievement progress
    Achievements,

    /// List coupons (* = affordable)
    Coupons,

    /// Show unlocked and locked perks
    Perks,

    /// List stored users
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    if let Some(Commands::Init { force }) = cli.command {
        return cli::init::init_command(cli.config, force).await;
    }

    let config = Config::load(cli.config.as_deref())?;
    let service = cli::open_service(&config)?;
    let user = cli
        .user
        .unwrap_or_else(|| config.settings.default_user.clone());

    match cli.command {
        Some(Commands::Init { .. }) => {}
        Some(Commands::Create { demo, name, email }) => {
            let kind = match (demo, name) {
                (true, _) => NewUser::Demo,
                (false, Some(name)) => NewUser::Registered {
                    name,
                    email: email.unwrap_or_default(),
                },
                (false, None) => NewUser::Guest,
            };
            cli::create::create_command(&service, &config, cli.config, kind).await?;
        }
        Some(Commands::Deposit { items }) => {
            cli::deposit::deposit_command(&service, &user, &items).await?;
        }
        Some(Commands::Redeem { coupon, cost }) => {
            let target = match (coupon, cost) {
                (Some(id), _) => RedeemTarget::Coupon(id),
                (None, Some(cost)) => RedeemTarget::Cost(cost),
                (None, None) => anyhow::bail!("Pass --coupon or --cost"),
            };
            cli::redeem::redeem_command(&service, &user, target).await?;
        }
        Some(Commands::History { limit }) => {
            cli::status::history_command(&service, &user, limit).await?;
        }
        Some(Commands::Achievements) => {
            cli::status::achievements_command(&service, &user).await?;
        }
        Some(Commands::Coupons) => {
            cli::redeem::coupons_command(&service, &user).await?;
        }
        Some(Commands::Perks) => {
            cli::status::perks_command(&service, &user).await?;
        }
        Some(Commands::Users) => {
            cli::status::users_command(&service).await?;
        }
        Some(Commands::Status) | None => {
            cli::status::status_command(&service, &user).await?;
        }
    }

    Ok(())
}
