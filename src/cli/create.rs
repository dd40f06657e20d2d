//! Create command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use ecycle::config::Config;
use ecycle::service::RewardsService;

/// Which kind of user to create
pub enum NewUser {
    Guest,
    Demo,
    Registered { name: String, email: String },
}

/// Create a user and, unless it is the guest, make it the default
pub async fn create_command(
    service: &RewardsService,
    config: &Config,
    config_path: Option<PathBuf>,
    kind: NewUser,
) -> Result<()> {
    let user = match kind {
        NewUser::Guest => service.create_guest()?,
        NewUser::Demo => service.create_demo()?,
        NewUser::Registered { name, email } => {
            if name.trim().is_empty() {
                bail!("Name must not be empty");
            }
            service.register(name.trim(), email.trim())?
        }
    };

    println!("Created user {} ({})", user.id, user.level);

    if user.id != config.settings.default_user && user.id != ecycle::service::GUEST_ID {
        let path = config_path.unwrap_or_else(Config::global_config_path);
        let mut updated = config.clone();
        updated.settings.default_user = user.id.clone();
        match updated.save_to_file(&path) {
            Ok(()) => println!("Default user set in {}", path.display()),
            Err(e) => tracing::warn!("Failed to save default user: {:#}", e),
        }
    }

    Ok(())
}
