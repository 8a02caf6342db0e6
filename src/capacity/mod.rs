//! Capacity derivation.
//!
//! Turns a configuration plus a resource's raw inputs (hours per day, leave
//! days) into available days, available hours, man-day capacity and a story
//! point estimate:
//!
//! ```text
//! available_days  = sprint days - leaves - public holidays
//! available_hours = available_days * max_capacity_per_day
//! man_days        = round(available_hours / man-day hours)
//! story_points    = mapping[man_days] or 0
//! ```
//!
//! A freshly seeded draft counts man-days of [`MAN_DAY_HOURS`]; every later
//! edit divides by the configuration's default hours per day.
//!
//! Everything here is pure and deterministic. Rounding is half-up (ties go
//! toward positive infinity) and computed in integer arithmetic. Sums and
//! products saturate at the `i64` bounds. A configuration with zero hours per
//! day yields zero man-days instead of dividing by zero.

mod policy;

pub use policy::LeavePolicy;

use crate::error::Result;
use crate::models::{Configuration, FieldChange, ResourceDraft, StoryPointMappingRow};

/// Hours in a man-day when seeding a new draft.
pub const MAN_DAY_HOURS: u32 = 8;

/// The derived half of a resource draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedCapacity {
    pub available_days: i64,
    pub total_available_hours: i64,
    pub total_available_capacity: i64,
    pub story_points: i64,
}

/// Derives resource capacity under a fixed [`LeavePolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityEngine {
    policy: LeavePolicy,
}

impl CapacityEngine {
    pub fn new(policy: LeavePolicy) -> Self {
        Self { policy }
    }

    /// Seed a new draft from a configuration.
    ///
    /// Hours per day and sprint length are copied from the configuration,
    /// leaves start at the policy default, and the derived fields are filled in.
    /// Man-days here are always [`MAN_DAY_HOURS`] long.
    pub fn derive_defaults(
        &self,
        config: &Configuration,
        mapping: &[StoryPointMappingRow],
    ) -> ResourceDraft {
        let mut draft = ResourceDraft {
            location: config.work_location.clone(),
            max_capacity_per_day: config.default_working_hours_per_day,
            workdays_per_sprint: config.available_days_per_sprint,
            leaves: self.policy.default_leaves(config),
            ..Default::default()
        };
        let derived = self.derive_with(
            config,
            mapping,
            draft.max_capacity_per_day,
            draft.leaves,
            MAN_DAY_HOURS,
        );
        apply_derived(&mut draft, derived);
        draft
    }

    /// Apply one field edit to `current` and return the updated draft.
    ///
    /// Capacity and leave edits re-derive every computed field. Name and role
    /// edits are copied as-is. A leave count the policy rejects returns
    /// [`PlannerError::InvalidLeaves`](crate::PlannerError::InvalidLeaves)
    /// and produces no new draft.
    pub fn recompute(
        &self,
        config: &Configuration,
        mapping: &[StoryPointMappingRow],
        current: &ResourceDraft,
        change: FieldChange,
    ) -> Result<ResourceDraft> {
        let rederive = change.triggers_recompute();
        let mut next = current.clone();

        match change {
            FieldChange::ResourceName(name) => next.resource_name = name,
            FieldChange::Role(role) => next.role = role,
            FieldChange::MaxCapacityPerDay(hours) => next.max_capacity_per_day = hours,
            FieldChange::Leaves(leaves) => {
                self.policy.validate_leaves(config, leaves)?;
                next.leaves = leaves;
            }
        }

        if rederive {
            let derived = self.derive(config, mapping, next.max_capacity_per_day, next.leaves);
            apply_derived(&mut next, derived);
        }
        Ok(next)
    }

    /// Compute the derived fields for the given raw inputs, counting man-days
    /// of the configuration's default hours per day.
    pub fn derive(
        &self,
        config: &Configuration,
        mapping: &[StoryPointMappingRow],
        max_capacity_per_day: u32,
        leaves: i64,
    ) -> DerivedCapacity {
        self.derive_with(
            config,
            mapping,
            max_capacity_per_day,
            leaves,
            config.default_working_hours_per_day,
        )
    }

    fn derive_with(
        &self,
        config: &Configuration,
        mapping: &[StoryPointMappingRow],
        max_capacity_per_day: u32,
        leaves: i64,
        man_day_hours: u32,
    ) -> DerivedCapacity {
        let available_days = self.policy.available_days(config, leaves);
        let total_available_hours = available_days.saturating_mul(i64::from(max_capacity_per_day));
        let total_available_capacity = man_days(total_available_hours, man_day_hours);

        DerivedCapacity {
            available_days,
            total_available_hours,
            total_available_capacity,
            story_points: lookup_story_points(mapping, total_available_capacity),
        }
    }
}

fn apply_derived(draft: &mut ResourceDraft, derived: DerivedCapacity) {
    draft.available_days = derived.available_days;
    draft.total_available_hours = derived.total_available_hours;
    draft.total_available_capacity = derived.total_available_capacity;
    draft.story_points = derived.story_points;
}

/// Story points for the first row whose `days` equals `man_days`, or `0`.
pub fn lookup_story_points(mapping: &[StoryPointMappingRow], man_days: i64) -> i64 {
    mapping
        .iter()
        .find(|row| row.days == man_days)
        .map_or(0, |row| row.points)
}

/// Convert hours into man-days of `hours_per_day` hours each.
fn man_days(hours: i64, hours_per_day: u32) -> i64 {
    if hours_per_day == 0 {
        tracing::warn!("Configuration has zero working hours per day, capacity set to 0");
        return 0;
    }
    round_half_up(hours, i64::from(hours_per_day))
}

/// `round(numerator / denominator)` with ties toward positive infinity.
/// `denominator` must be positive.
fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    let (n, d) = (i128::from(numerator), i128::from(denominator));
    // |result| <= |numerator| for any positive denominator, so it fits.
    (2 * n + d).div_euclid(2 * d) as i64
}
