//! Redeem and coupon listing commands

use anyhow::Result;

use ecycle::rewards::affordable_coupons;
use ecycle::service::RewardsService;

/// What to pay for
pub enum RedeemTarget {
    Cost(u64),
    Coupon(String),
}

pub async fn redeem_command(
    service: &RewardsService,
    user_id: &str,
    target: RedeemTarget,
) -> Result<()> {
    let outcome = match &target {
        RedeemTarget::Cost(cost) => service.redeem(user_id, *cost)?,
        RedeemTarget::Coupon(id) => service.redeem_coupon(user_id, id)?,
    };

    if outcome.success {
        println!("Redeemed. Balance: {} points", outcome.progression.points);
    } else {
        println!(
            "Not enough points (balance: {}).",
            outcome.progression.points
        );
    }
    Ok(())
}

/// List the coupon catalog with affordability
pub async fn coupons_command(service: &RewardsService, user_id: &str) -> Result<()> {
    let user = service.load_or_guest(user_id)?;
    let catalog = &service.engine().rules().coupons;
    let affordable = affordable_coupons(catalog, &user);
    let mut coupons: Vec<_> = catalog.iter().collect();
    coupons.sort_by_key(|c| c.cost);

    println!("Balance: {} points\n", user.points);
    for coupon in coupons {
        let mark = if affordable.iter().any(|c| c.id == coupon.id) {
            "*"
        } else {
            " "
        };
        println!(
            "  {} {:<4} {:>6}  {} [{}]",
            mark, coupon.id, coupon.cost, coupon.title, coupon.category
        );
    }
    Ok(())
}
