//! Deposit command implementation

use anyhow::{bail, Result};

use ecycle::domain::Deposit;
use ecycle::service::RewardsService;

/// Record a drop-off given as `category=count` pairs
pub async fn deposit_command(service: &RewardsService, user_id: &str, items: &[String]) -> Result<()> {
    let deposit = Deposit::parse_pairs(items)?;
    if deposit.is_empty() {
        bail!("Nothing to deposit. Use e.g. `ecycle deposit celulares=1 cables=2`.");
    }

    let outcome = service.deposit(user_id, &deposit)?;
    let receipt = &outcome.receipt;

    if outcome.is_noop() {
        println!("No rated items in this deposit, nothing recorded.");
        return Ok(());
    }

    println!(
        "+{} points ({} items, {} base x{})",
        receipt.awarded_points, receipt.item_count, receipt.base_points, receipt.multiplier
    );
    for id in &receipt.completed {
        if let Some(ach) = outcome.progression.achievement(id) {
            println!("Achievement completed: {}", ach.title);
        }
    }
    if let Some(level_up) = &receipt.level_up {
        println!("Level up: {} -> {}", level_up.old_level, level_up.new_level);
    }
    if receipt.tree_planted {
        println!("A tree was planted for this deposit.");
    }
    println!("Balance: {} points", outcome.progression.points);

    Ok(())
}
