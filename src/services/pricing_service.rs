use chrono::{DateTime, Months, Utc};

use crate::models::payment::Plan;

/// Fixed tax added on top of every plan price.
pub const TAX: f64 = 2.00;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub monthly: f64,
    pub annually: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            monthly: 7.00,
            annually: 36.00,
        }
    }
}

impl Pricing {
    pub fn plan_price(&self, plan: Plan) -> f64 {
        match plan {
            Plan::Monthly => self.monthly,
            Plan::Annually => self.annually,
        }
    }

    pub fn total(&self, plan: Plan) -> f64 {
        self.plan_price(plan) + TAX
    }
}

/// Subscription expiry: one calendar month or year from `from`.
pub fn expiry_date(plan: Plan, from: DateTime<Utc>) -> DateTime<Utc> {
    let months = match plan {
        Plan::Monthly => 1,
        Plan::Annually => 12,
    };
    from.checked_add_months(Months::new(months)).unwrap_or(from)
}
