use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::Configuration;

/// How a resource's leave days relate to the configuration's public holidays.
///
/// - `Additional`: leaves are personal days on top of public holidays. A new
///   draft starts at zero leaves and negative values are rejected.
/// - `IncludesPublicHolidays`: leaves already count the public holidays. A new
///   draft starts at the holiday count and values below it are rejected.
///
/// Both policies give the same available days for a fresh draft.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeavePolicy {
    #[default]
    Additional,
    IncludesPublicHolidays,
}

impl LeavePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Additional => "additional",
            Self::IncludesPublicHolidays => "includes_public_holidays",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "additional" => Some(Self::Additional),
            "includes_public_holidays" => Some(Self::IncludesPublicHolidays),
            _ => None,
        }
    }

    /// Leave count a freshly seeded draft starts with.
    pub fn default_leaves(&self, config: &Configuration) -> i64 {
        match self {
            Self::Additional => 0,
            Self::IncludesPublicHolidays => i64::from(config.public_holidays),
        }
    }

    /// Smallest leave count accepted for a resource on `config`.
    pub fn minimum_leaves(&self, config: &Configuration) -> i64 {
        self.default_leaves(config)
    }

    pub fn validate_leaves(&self, config: &Configuration, leaves: i64) -> Result<()> {
        let minimum = self.minimum_leaves(config);
        if leaves < minimum {
            return Err(PlannerError::InvalidLeaves { leaves, minimum });
        }
        Ok(())
    }

    /// Working days left in the sprint after leaves and public holidays.
    pub fn available_days(&self, config: &Configuration, leaves: i64) -> i64 {
        let sprint = i64::from(config.available_days_per_sprint);
        match self {
            Self::Additional => sprint
                .saturating_sub(leaves)
                .saturating_sub(i64::from(config.public_holidays)),
            Self::IncludesPublicHolidays => sprint.saturating_sub(leaves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn config(days: u32, holidays: u32) -> Configuration {
        Configuration {
            id: Uuid::new_v4(),
            work_location: "Pune".to_string(),
            available_days_per_sprint: days,
            default_working_hours_per_day: 8,
            public_holidays: holidays,
        }
    }

    #[test]
    fn test_additional_rejects_negative_leaves() {
        let c = config(10, 2);
        assert!(LeavePolicy::Additional.validate_leaves(&c, 0).is_ok());
        assert!(matches!(
            LeavePolicy::Additional.validate_leaves(&c, -1),
            Err(PlannerError::InvalidLeaves {
                leaves: -1,
                minimum: 0
            })
        ));
    }

    #[test]
    fn test_includes_holidays_rejects_leaves_below_holidays() {
        let c = config(10, 2);
        let policy = LeavePolicy::IncludesPublicHolidays;
        assert!(policy.validate_leaves(&c, 2).is_ok());
        assert!(policy.validate_leaves(&c, 1).is_err());
    }

    #[test]
    fn test_policies_agree_on_fresh_drafts() {
        let c = config(10, 3);
        for policy in [LeavePolicy::Additional, LeavePolicy::IncludesPublicHolidays] {
            let leaves = policy.default_leaves(&c);
            assert_eq!(policy.available_days(&c, leaves), 7);
        }
    }

    #[test]
    fn test_round_trips_through_str() {
        for policy in [LeavePolicy::Additional, LeavePolicy::IncludesPublicHolidays] {
            assert_eq!(LeavePolicy::from_str(policy.as_str()), Some(policy));
        }
        assert_eq!(LeavePolicy::from_str("bogus"), None);
    }
}
