use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resource while it is being edited.
///
/// The raw inputs are `max_capacity_per_day` and `leaves`. The four derived
/// fields are recomputed by the capacity engine whenever one of those inputs
/// changes, and are stored as plain values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    pub resource_name: String,
    pub role: String,
    /// Work location label copied from the configuration at selection time.
    #[serde(default)]
    pub location: String,
    /// Hours per day this resource can work. Defaults from the configuration.
    pub max_capacity_per_day: u32,
    /// Sprint length copied from the configuration at selection time.
    pub workdays_per_sprint: u32,
    pub leaves: i64,
    pub available_days: i64,
    pub total_available_hours: i64,
    /// Capacity in man-days.
    pub total_available_capacity: i64,
    pub story_points: i64,
}

/// A saved resource.
///
/// The derived fields are a snapshot: later changes to the configuration or
/// the mapping table do not touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ResourceDraft,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(id: Uuid, fields: ResourceDraft) -> Self {
        Self {
            id,
            fields,
            updated_at: Utc::now(),
        }
    }
}

/// A single field edit on a [`ResourceDraft`].
///
/// Only `MaxCapacityPerDay` and `Leaves` trigger re-derivation. Name and role
/// edits are copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    ResourceName(String),
    Role(String),
    MaxCapacityPerDay(u32),
    Leaves(i64),
}

impl FieldChange {
    pub fn triggers_recompute(&self) -> bool {
        matches!(self, Self::MaxCapacityPerDay(_) | Self::Leaves(_))
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Self::ResourceName(_) => "resourceName",
            Self::Role(_) => "role",
            Self::MaxCapacityPerDay(_) => "maxCapacityPerDay",
            Self::Leaves(_) => "leaves",
        }
    }
}
