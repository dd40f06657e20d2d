use serde::{Deserialize, Serialize};

use crate::domain::UserProgression;

/// A reward purchasable with points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub title: String,
    pub cost: u64,
    pub category: String,
}

impl Coupon {
    pub fn new(id: &str, title: &str, cost: u64, category: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            cost,
            category: category.to_string(),
        }
    }

    pub fn affordable_by(&self, user: &UserProgression) -> bool {
        user.points >= self.cost
    }
}

/// Coupons the user can pay for right now, cheapest first
pub fn affordable_coupons<'a>(catalog: &'a [Coupon], user: &UserProgression) -> Vec<&'a Coupon> {
    let mut coupons: Vec<_> = catalog.iter().filter(|c| c.affordable_by(user)).collect();
    coupons.sort_by_key(|c| c.cost);
    coupons
}
