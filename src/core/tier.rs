use crate::domain::model::Tier;

pub const FREE_PROJECT_LIMIT: u32 = 3;
pub const PRO_PROJECT_LIMIT: u32 = 15;
/// 實質上無上限
pub const ENTERPRISE_PROJECT_LIMIT: u32 = 999;

impl Tier {
    pub fn project_limit(self) -> u32 {
        match self {
            Tier::Free => FREE_PROJECT_LIMIT,
            Tier::Pro => PRO_PROJECT_LIMIT,
            Tier::Enterprise => ENTERPRISE_PROJECT_LIMIT,
        }
    }
}

/// 以名稱查詢專案上限，未知等級一律回傳免費方案的上限
pub fn project_limit_by_tier(name: &str) -> u32 {
    Tier::from_name(name)
        .map(Tier::project_limit)
        .unwrap_or(FREE_PROJECT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tiers() {
        assert_eq!(project_limit_by_tier("free"), 3);
        assert_eq!(project_limit_by_tier("pro"), 15);
        assert_eq!(project_limit_by_tier("enterprise"), 999);
    }

    #[test]
    fn test_unknown_tier_defaults_to_free_limit() {
        assert_eq!(project_limit_by_tier("unknown"), 3);
        assert_eq!(project_limit_by_tier(""), 3);
        assert_eq!(project_limit_by_tier("premium"), 3);
    }

    #[test]
    fn test_enum_mapping_matches_name_mapping() {
        for tier in Tier::ALL {
            assert_eq!(tier.project_limit(), project_limit_by_tier(tier.as_str()));
        }
    }
}
