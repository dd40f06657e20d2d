//! Read-only commands: status, history, achievements, perks, users

use anyhow::Result;

use ecycle::domain::TransactionKind;
use ecycle::rewards::{items_to_next_tier, unlocked_perks, LevelProgress};
use ecycle::service::RewardsService;

/// Show a user's balance, level and multiplier
pub async fn status_command(service: &RewardsService, user_id: &str) -> Result<()> {
    let user = service.load_or_guest(user_id)?;
    let rules = service.engine().rules();
    let progress = LevelProgress::new(&rules.levels, user.points, user.completed_achievements());

    println!("{} ({})", if user.name.is_empty() { &user.id } else { &user.name }, user.id);
    println!("  Points:      {}", user.points);
    println!("  Level:       {}", user.level);
    match progress.next {
        Some(next) => println!(
            "  Next level:  {} ({} points, {} achievements to go)",
            next, progress.points_needed, progress.achievements_needed
        ),
        None => println!("  Next level:  max level reached"),
    }

    let multiplier_note = if user.level.multipliers_locked() {
        " (locked until Ensamblador)"
    } else {
        ""
    };
    println!("  Multiplier:  {}x{}", user.active_multiplier, multiplier_note);
    match items_to_next_tier(&rules.multipliers, user.items_this_month) {
        Some(missing) => println!(
            "  This month:  {} items ({} more for next tier)",
            user.items_this_month, missing
        ),
        None => println!("  This month:  {} items (top tier)", user.items_this_month),
    }
    println!(
        "  Impact:      {:.1} kg CO2, {} trees",
        user.impact.co2_kg, user.impact.trees
    );

    Ok(())
}

/// Show the newest `limit` transactions
pub async fn history_command(service: &RewardsService, user_id: &str, limit: usize) -> Result<()> {
    let user = service.load_or_guest(user_id)?;
    if user.history.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    for tx in user.history.iter().take(limit) {
        let sign = match tx.kind {
            TransactionKind::Deposit => "+",
            TransactionKind::Redemption => "",
        };
        println!(
            "  {}  {:>6}  {}",
            tx.timestamp.format("%b %d, %Y"),
            format!("{}{}", sign, tx.points_delta),
            tx.label
        );
    }
    Ok(())
}

pub async fn achievements_command(service: &RewardsService, user_id: &str) -> Result<()> {
    let user = service.load_or_guest(user_id)?;
    println!(
        "Achievements ({}/{} completed):\n",
        user.completed_achievements(),
        user.achievements.len()
    );
    for ach in &user.achievements {
        let state = if ach.completed {
            "done".to_string()
        } else {
            format!("{}/{}", ach.progress, ach.max)
        };
        println!(
            "  [{:>5}] {} ({}, +{} pts)",
            state,
            ach.title,
            ach.category.label(),
            ach.reward_points
        );
        if !ach.description.is_empty() {
            println!("          {}", ach.description);
        }
    }
    Ok(())
}

pub async fn perks_command(service: &RewardsService, user_id: &str) -> Result<()> {
    let user = service.load_or_guest(user_id)?;
    let catalog = &service.engine().rules().perks;
    let unlocked = unlocked_perks(catalog, &user);

    for perk in catalog {
        let mark = if unlocked.iter().any(|p| p.id == perk.id) {
            "unlocked"
        } else {
            "locked"
        };
        println!("  {:<8} {}", mark, perk.title);
    }
    Ok(())
}

pub async fn users_command(service: &RewardsService) -> Result<()> {
    let ids = service.list_ids()?;
    if ids.is_empty() {
        println!("No users stored.");
    }
    for id in ids {
        println!("  {}", id);
    }
    Ok(())
}
