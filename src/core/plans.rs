use crate::domain::model::Tier;
use serde::Serialize;

/// 價目表的一個方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub tier: Tier,
    pub display_name: &'static str,
    pub price_id: &'static str,
    /// 每月金額，單位為分
    pub monthly_amount_cents: u32,
    pub project_limit: u32,
}

impl Plan {
    pub fn requires_checkout(&self) -> bool {
        self.monthly_amount_cents > 0
    }

    pub fn formatted_price(&self) -> String {
        format!(
            "${}.{:02}",
            self.monthly_amount_cents / 100,
            self.monthly_amount_cents % 100
        )
    }
}

pub const PLANS: [Plan; 3] = [
    Plan {
        tier: Tier::Free,
        display_name: "Free",
        price_id: "price_free",
        monthly_amount_cents: 0,
        project_limit: crate::core::tier::FREE_PROJECT_LIMIT,
    },
    Plan {
        tier: Tier::Pro,
        display_name: "Professional",
        price_id: "price_pro",
        monthly_amount_cents: 1999,
        project_limit: crate::core::tier::PRO_PROJECT_LIMIT,
    },
    Plan {
        tier: Tier::Enterprise,
        display_name: "Enterprise",
        price_id: "price_enterprise",
        monthly_amount_cents: 4999,
        project_limit: crate::core::tier::ENTERPRISE_PROJECT_LIMIT,
    },
];

pub fn plan_for(tier: Tier) -> &'static Plan {
    match tier {
        Tier::Free => &PLANS[0],
        Tier::Pro => &PLANS[1],
        Tier::Enterprise => &PLANS[2],
    }
}

pub fn plan_for_price(price_id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|plan| plan.price_id == price_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_limits_agree_with_tier_mapping() {
        for tier in Tier::ALL {
            let plan = plan_for(tier);
            assert_eq!(plan.tier, tier);
            assert_eq!(plan.project_limit, tier.project_limit());
        }
    }

    #[test]
    fn test_free_plan_skips_checkout() {
        assert!(!plan_for(Tier::Free).requires_checkout());
        assert!(plan_for(Tier::Pro).requires_checkout());
    }

    #[test]
    fn test_price_lookup_and_formatting() {
        let plan = plan_for_price("price_enterprise").unwrap();
        assert_eq!(plan.display_name, "Enterprise");
        assert_eq!(plan.formatted_price(), "$49.99");
        assert_eq!(plan_for(Tier::Free).formatted_price(), "$0.00");
        assert!(plan_for_price("price_gold").is_none());
    }
}
