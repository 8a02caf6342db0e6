use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sprint capacity parameters for one work location.
///
/// `work_location` is the display label. Resources copy it at selection time,
/// so renaming or deleting a configuration leaves existing resources with the
/// old label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Stable identifier. Blobs written before ids existed get a fresh one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub work_location: String,
    pub available_days_per_sprint: u32,
    pub default_working_hours_per_day: u32,
    pub public_holidays: u32,
}

impl Configuration {
    pub fn new(id: Uuid, input: ConfigurationInput) -> Self {
        Self {
            id,
            work_location: input.work_location,
            available_days_per_sprint: input.available_days_per_sprint,
            default_working_hours_per_day: input.default_working_hours_per_day,
            public_holidays: input.public_holidays,
        }
    }

    /// Whether public holidays exceed the sprint length, which yields negative
    /// available days for every resource on this configuration.
    pub fn holidays_exceed_sprint(&self) -> bool {
        self.public_holidays > self.available_days_per_sprint
    }
}

/// Input for creating or replacing a configuration. Updates replace every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationInput {
    pub work_location: String,
    pub available_days_per_sprint: u32,
    pub default_working_hours_per_day: u32,
    pub public_holidays: u32,
}

impl Default for ConfigurationInput {
    /// The blank configuration form: a two-week sprint of eight-hour days.
    fn default() -> Self {
        Self {
            work_location: String::new(),
            available_days_per_sprint: 10,
            default_working_hours_per_day: 8,
            public_holidays: 0,
        }
    }
}

impl From<&Configuration> for ConfigurationInput {
    fn from(config: &Configuration) -> Self {
        Self {
            work_location: config.work_location.clone(),
            available_days_per_sprint: config.available_days_per_sprint,
            default_working_hours_per_day: config.default_working_hours_per_day,
            public_holidays: config.public_holidays,
        }
    }
}
