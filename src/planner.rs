//! The planner: configurations, the story point table and the resource roster
//! behind one object.
//!
//! A planner is loaded from a [`Database`] snapshot once, then every mutation
//! updates the in-memory store and writes the affected key back before
//! returning.

use uuid::Uuid;

use crate::capacity::CapacityEngine;
use crate::db::Database;
use crate::error::{PlannerError, Result};
use crate::models::*;
use crate::store::{ConfigStore, ResourceStore, StoryPointMapping};

pub struct Planner {
    db: Database,
    engine: CapacityEngine,
    configs: ConfigStore,
    mapping: StoryPointMapping,
    resources: ResourceStore,
}

impl Planner {
    /// Initialise all stores from the persisted snapshot.
    pub fn load(db: Database, engine: CapacityEngine) -> Result<Self> {
        let snapshot = db.load_snapshot()?;
        tracing::debug!(
            configs = snapshot.configs.len(),
            resources = snapshot.resources.len(),
            mapping_rows = snapshot.story_points_mapping.len(),
            "Loaded planner state"
        );

        Ok(Self {
            db,
            engine,
            configs: ConfigStore::from_records(snapshot.configs),
            mapping: StoryPointMapping::from_records(snapshot.story_points_mapping),
            resources: ResourceStore::from_records(snapshot.resources),
        })
    }

    pub fn engine(&self) -> &CapacityEngine {
        &self.engine
    }

    pub fn configs(&self) -> &ConfigStore {
        &self.configs
    }

    pub fn mapping(&self) -> &StoryPointMapping {
        &self.mapping
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    // ============================================================
    // Configurations
    // ============================================================

    pub fn add_config(&mut self, input: ConfigurationInput) -> Result<Configuration> {
        validate_config(&input)?;
        let config = Configuration::new(Uuid::new_v4(), input);
        warn_on_excess_holidays(&config);

        self.configs.add(config.clone());
        self.db.save_configs(self.configs.list())?;

        tracing::info!("Added configuration '{}'", config.work_location);
        Ok(config)
    }

    pub fn update_config(&mut self, id: Uuid, input: ConfigurationInput) -> Result<Configuration> {
        validate_config(&input)?;
        let config = self
            .configs
            .update(id, Configuration::new(id, input))?
            .clone();
        warn_on_excess_holidays(&config);

        self.db.save_configs(self.configs.list())?;
        Ok(config)
    }

    /// Remove a configuration. Resources created from it keep its label.
    pub fn remove_config(&mut self, id: Uuid) -> Result<Configuration> {
        let removed = self.configs.remove(id)?;
        self.db.save_configs(self.configs.list())?;

        let dangling = self.resources_at_location(&removed.work_location).count();
        if dangling > 0 {
            tracing::warn!(
                "Removed configuration '{}' is still referenced by {} resource(s)",
                removed.work_location,
                dangling
            );
        }
        Ok(removed)
    }

    /// The first configuration whose label matches `location`.
    pub fn config_for_location(&self, location: &str) -> Option<&Configuration> {
        self.configs
            .list()
            .iter()
            .find(|c| c.work_location == location)
    }

    fn config(&self, id: Uuid) -> Result<&Configuration> {
        self.configs
            .get(id)
            .ok_or(PlannerError::ConfigNotFound(id))
    }

    // ============================================================
    // Story point mapping
    // ============================================================

    pub fn add_mapping_row(&mut self, days: i64, points: i64) -> Result<StoryPointMappingRow> {
        let row = StoryPointMappingRow::new(days, points);
        self.mapping.add(row.clone());
        self.db.save_story_points_mapping(self.mapping.list())?;
        Ok(row)
    }

    /// Append a `0 → 0` row.
    pub fn add_empty_mapping_row(&mut self) -> Result<StoryPointMappingRow> {
        let id = self.mapping.add_row();
        self.db.save_story_points_mapping(self.mapping.list())?;
        self.mapping
            .get(id)
            .cloned()
            .ok_or(PlannerError::MappingRowNotFound(id))
    }

    pub fn update_mapping_row(
        &mut self,
        id: Uuid,
        days: i64,
        points: i64,
    ) -> Result<StoryPointMappingRow> {
        let row = self
            .mapping
            .update(id, StoryPointMappingRow { id, days, points })?
            .clone();
        self.db.save_story_points_mapping(self.mapping.list())?;
        Ok(row)
    }

    pub fn remove_mapping_row(&mut self, id: Uuid) -> Result<StoryPointMappingRow> {
        let removed = self.mapping.remove(id)?;
        self.db.save_story_points_mapping(self.mapping.list())?;
        Ok(removed)
    }

    pub fn reset_mapping(&mut self) -> Result<()> {
        self.mapping.reset();
        self.db.save_story_points_mapping(self.mapping.list())?;
        tracing::info!("Story point mapping reset to defaults");
        Ok(())
    }

    // ============================================================
    // Derivation
    // ============================================================

    /// A fresh draft seeded from the configuration with `config_id`.
    pub fn draft_for(&self, config_id: Uuid) -> Result<ResourceDraft> {
        let config = self.config(config_id)?;
        Ok(self.engine.derive_defaults(config, self.mapping.list()))
    }

    /// Apply one field edit to `draft` against the configuration with `config_id`.
    ///
    /// A capacity or leave edit also moves the draft onto that configuration:
    /// its location and sprint length are taken from it, so the saved label
    /// always names the configuration the numbers came from.
    pub fn apply_change(
        &self,
        config_id: Uuid,
        draft: &ResourceDraft,
        change: FieldChange,
    ) -> Result<ResourceDraft> {
        let config = self.config(config_id)?;
        if !change.triggers_recompute() || draft.location == config.work_location {
            return self
                .engine
                .recompute(config, self.mapping.list(), draft, change);
        }

        tracing::info!(
            "Re-deriving '{}' against configuration '{}' (was '{}')",
            draft.resource_name,
            config.work_location,
            draft.location
        );
        let mut rebound = draft.clone();
        rebound.location = config.work_location.clone();
        rebound.workdays_per_sprint = config.available_days_per_sprint;
        self.engine
            .recompute(config, self.mapping.list(), &rebound, change)
    }

    // ============================================================
    // Resources
    // ============================================================

    pub fn add_resource(&mut self, draft: ResourceDraft) -> Result<Resource> {
        validate_resource(&draft)?;
        let resource = Resource::new(Uuid::new_v4(), draft);

        self.resources.add(resource.clone());
        self.db.save_resources(self.resources.list())?;

        tracing::info!(
            "Added resource '{}' ({} story points)",
            resource.fields.resource_name,
            resource.fields.story_points
        );
        Ok(resource)
    }

    pub fn update_resource(&mut self, id: Uuid, draft: ResourceDraft) -> Result<Resource> {
        validate_resource(&draft)?;
        let resource = self.resources.update(id, Resource::new(id, draft))?.clone();
        self.db.save_resources(self.resources.list())?;
        Ok(resource)
    }

    pub fn remove_resource(&mut self, id: Uuid) -> Result<Resource> {
        let removed = self.resources.remove(id)?;
        self.db.save_resources(self.resources.list())?;
        tracing::info!("Removed resource '{}'", removed.fields.resource_name);
        Ok(removed)
    }

    fn resources_at_location<'a>(
        &'a self,
        location: &'a str,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources
            .list()
            .iter()
            .filter(move |r| r.fields.location == location)
    }
}

fn validate_config(input: &ConfigurationInput) -> Result<()> {
    if input.work_location.trim().is_empty() {
        return Err(PlannerError::MissingField("workLocation"));
    }
    Ok(())
}

fn validate_resource(draft: &ResourceDraft) -> Result<()> {
    if draft.resource_name.trim().is_empty() {
        return Err(PlannerError::MissingField("resourceName"));
    }
    if draft.role.trim().is_empty() {
        return Err(PlannerError::MissingField("role"));
    }
    Ok(())
}

fn warn_on_excess_holidays(config: &Configuration) {
    if config.holidays_exceed_sprint() {
        tracing::warn!(
            "Configuration '{}' has {} public holidays in a {}-day sprint; available days will be negative",
            config.work_location,
            config.public_holidays,
            config.available_days_per_sprint
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> Planner {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        Planner::load(db, CapacityEngine::default()).unwrap()
    }

    fn input(location: &str, days: u32, hours: u32, holidays: u32) -> ConfigurationInput {
        ConfigurationInput {
            work_location: location.to_string(),
            available_days_per_sprint: days,
            default_working_hours_per_day: hours,
            public_holidays: holidays,
        }
    }

    #[test]
    fn test_fresh_planner_has_default_mapping() {
        let planner = planner();
        assert!(planner.configs().is_empty());
        assert!(planner.resources().is_empty());
        assert_eq!(planner.mapping().len(), 10);
    }

    #[test]
    fn test_blank_location_is_rejected() {
        let mut planner = planner();
        let result = planner.add_config(input("  ", 10, 8, 0));
        assert!(matches!(result, Err(PlannerError::MissingField("workLocation"))));
        assert!(planner.configs().is_empty());
    }

    #[test]
    fn test_capacity_edit_moves_draft_to_config() {
        let mut planner = planner();
        let pune = planner.add_config(input("Pune", 10, 8, 1)).unwrap();
        let austin = planner.add_config(input("Austin", 12, 8, 0)).unwrap();
        let draft = planner.draft_for(pune.id).unwrap();

        let renamed = planner
            .apply_change(austin.id, &draft, FieldChange::Role("QA".to_string()))
            .unwrap();
        assert_eq!(renamed.location, "Pune");
        assert_eq!(renamed.workdays_per_sprint, 10);

        let moved = planner
            .apply_change(austin.id, &draft, FieldChange::Leaves(2))
            .unwrap();
        assert_eq!(moved.location, "Austin");
        assert_eq!(moved.workdays_per_sprint, 12);
        assert_eq!(moved.available_days, 10);
    }

    #[test]
    fn test_excess_holidays_are_accepted() {
        let mut planner = planner();
        let config = planner.add_config(input("Pune", 2, 8, 5)).unwrap();
        let draft = planner.draft_for(config.id).unwrap();
        assert_eq!(draft.available_days, -3);
    }

    #[test]
    fn test_resource_needs_name_and_role() {
        let mut planner = planner();
        let config = planner.add_config(input("Pune", 10, 8, 1)).unwrap();
        let mut draft = planner.draft_for(config.id).unwrap();

        assert!(matches!(
            planner.add_resource(draft.clone()),
            Err(PlannerError::MissingField("resourceName"))
        ));

        draft.resource_name = "Asha".to_string();
        assert!(matches!(
            planner.add_resource(draft.clone()),
            Err(PlannerError::MissingField("role"))
        ));

        draft.role = "Developer".to_string();
        let resource = planner.add_resource(draft).unwrap();
        assert_eq!(resource.fields.story_points, 8);
    }

    #[test]
    fn test_saved_resource_is_a_snapshot() {
        let mut planner = planner();
        let config = planner.add_config(input("Pune", 10, 8, 1)).unwrap();
        let mut draft = planner.draft_for(config.id).unwrap();
        draft.resource_name = "Asha".to_string();
        draft.role = "Developer".to_string();
        let resource = planner.add_resource(draft).unwrap();

        planner
            .update_config(config.id, input("Pune", 5, 8, 0))
            .unwrap();
        planner.reset_mapping().unwrap();

        let saved = planner.resources().get(resource.id).unwrap();
        assert_eq!(saved.fields.workdays_per_sprint, 10);
        assert_eq!(saved.fields.available_days, 9);
    }

    #[test]
    fn test_removing_config_leaves_resources_dangling() {
        let mut planner = planner();
        let config = planner.add_config(input("Pune", 10, 8, 1)).unwrap();
        let mut draft = planner.draft_for(config.id).unwrap();
        draft.resource_name = "Asha".to_string();
        draft.role = "Developer".to_string();
        planner.add_resource(draft).unwrap();

        planner.remove_config(config.id).unwrap();

        assert_eq!(planner.resources().len(), 1);
        assert_eq!(planner.resources().get_at(0).unwrap().fields.location, "Pune");
        assert!(planner.config_for_location("Pune").is_none());
        assert!(matches!(
            planner.draft_for(config.id),
            Err(PlannerError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_mapping_edits_change_lookups() {
        let mut planner = planner();
        let row = planner.add_empty_mapping_row().unwrap();
        assert_eq!((row.days, row.points), (0, 0));

        planner.update_mapping_row(row.id, 12, 13).unwrap();
        let config = planner.add_config(input("Austin", 12, 8, 0)).unwrap();
        assert_eq!(planner.draft_for(config.id).unwrap().story_points, 13);

        planner.remove_mapping_row(row.id).unwrap();
        assert_eq!(planner.draft_for(config.id).unwrap().story_points, 0);
    }
}
