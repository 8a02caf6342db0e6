use sprint_capacity::capacity::CapacityEngine;
use sprint_capacity::db::{Database, CONFIGS_KEY, RESOURCES_KEY, STORY_POINTS_MAPPING_KEY};
use sprint_capacity::models::*;
use sprint_capacity::planner::Planner;
use sprint_capacity::PlannerError;
use speculate2::speculate;

fn open_planner(db: &Database) -> Planner {
    Planner::load(db.clone(), CapacityEngine::default()).expect("Failed to load planner")
}

fn sprint_config(location: &str) -> ConfigurationInput {
    ConfigurationInput {
        work_location: location.to_string(),
        available_days_per_sprint: 10,
        default_working_hours_per_day: 8,
        public_holidays: 1,
    }
}

fn named_draft(planner: &Planner, config_id: uuid::Uuid, name: &str) -> ResourceDraft {
    let mut draft = planner.draft_for(config_id).expect("Failed to seed draft");
    draft.resource_name = name.to_string();
    draft.role = "Developer".to_string();
    draft
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "loading" {
        it "falls back to defaults when nothing is stored" {
            let snapshot = db.load_snapshot().expect("Load failed");
            assert!(snapshot.configs.is_empty());
            assert!(snapshot.resources.is_empty());
            assert_eq!(snapshot.story_points_mapping.len(), 10);
        }

        it "reads blobs written without ids" {
            db.put_value(
                CONFIGS_KEY,
                r#"[{"workLocation":"Pune","availableDaysPerSprint":10,"defaultWorkingHoursPerDay":8,"publicHolidays":1}]"#,
            ).expect("Write failed");
            db.put_value(STORY_POINTS_MAPPING_KEY, r#"[{"days":9,"points":21}]"#).expect("Write failed");

            let planner = open_planner(&db);
            let config = planner.configs().get_at(0).expect("Missing config");
            assert_eq!(config.work_location, "Pune");
            assert_eq!(planner.mapping().lookup(9), 21);

            let draft = planner.draft_for(config.id).expect("Failed to seed draft");
            assert_eq!(draft.story_points, 21);
        }

        it "refuses to load a corrupt blob" {
            db.put_value(RESOURCES_KEY, "{not json").expect("Write failed");
            let result = Planner::load(db.clone(), CapacityEngine::default());
            assert!(matches!(result, Err(PlannerError::Storage(_))));
        }
    }

    describe "persistence" {
        it "saves every store after each mutation" {
            let mut planner = open_planner(&db);
            let config = planner.add_config(sprint_config("Pune")).expect("Add failed");
            planner.add_mapping_row(11, 13).expect("Add failed");
            let draft = named_draft(&planner, config.id, "Asha");
            let resource = planner.add_resource(draft).expect("Add failed");

            let reloaded = open_planner(&db);
            assert_eq!(reloaded.configs().list(), planner.configs().list());
            assert_eq!(reloaded.mapping().list(), planner.mapping().list());
            assert_eq!(reloaded.resources().get(resource.id), Some(&resource));
        }

        it "persists removals" {
            let mut planner = open_planner(&db);
            let first = planner.add_config(sprint_config("Pune")).expect("Add failed");
            planner.add_config(sprint_config("Austin")).expect("Add failed");
            planner.remove_config(first.id).expect("Remove failed");

            let reloaded = open_planner(&db);
            assert_eq!(reloaded.configs().len(), 1);
            assert_eq!(reloaded.configs().get_at(0).unwrap().work_location, "Austin");
        }

        it "survives reopening a database file" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("planner.db");

            {
                let file_db = Database::open(path.clone()).expect("Open failed");
                file_db.migrate().expect("Migrate failed");
                let mut planner = open_planner(&file_db);
                planner.add_config(sprint_config("Chennai")).expect("Add failed");
            }

            let file_db = Database::open(path).expect("Reopen failed");
            file_db.migrate().expect("Migrate failed");
            let planner = open_planner(&file_db);
            assert_eq!(planner.configs().get_at(0).unwrap().work_location, "Chennai");
        }

        it "writes camelCase keys" {
            let mut planner = open_planner(&db);
            planner.add_config(sprint_config("Pune")).expect("Add failed");

            let raw = db.get_value(CONFIGS_KEY).expect("Read failed").expect("Missing key");
            assert!(raw.contains("\"workLocation\":\"Pune\""));
            assert!(raw.contains("\"defaultWorkingHoursPerDay\":8"));
        }
    }

    describe "positional access" {
        it "shifts later rows down after a removal" {
            let mut planner = open_planner(&db);
            planner.add_config(sprint_config("Pune")).expect("Add failed");
            let austin = planner.add_config(sprint_config("Austin")).expect("Add failed");

            let first = planner.configs().get_at(0).unwrap().id;
            planner.remove_config(first).expect("Remove failed");

            let now_first = planner.configs().get_at(0).unwrap();
            assert_eq!(now_first.id, austin.id);
            assert_eq!(now_first.work_location, "Austin");
        }
    }

    describe "resources" {
        it "derives the standard sprint" {
            let mut planner = open_planner(&db);
            let config = planner.add_config(sprint_config("Pune")).expect("Add failed");
            let resource = planner
                .add_resource(named_draft(&planner, config.id, "Asha"))
                .expect("Add failed");

            assert_eq!(resource.fields.available_days, 9);
            assert_eq!(resource.fields.total_available_hours, 72);
            assert_eq!(resource.fields.total_available_capacity, 9);
            assert_eq!(resource.fields.story_points, 8);
        }

        it "replaces a resource while keeping its id" {
            let mut planner = open_planner(&db);
            let config = planner.add_config(sprint_config("Pune")).expect("Add failed");
            let resource = planner
                .add_resource(named_draft(&planner, config.id, "Asha"))
                .expect("Add failed");

            let draft = planner
                .apply_change(config.id, &resource.fields, FieldChange::Leaves(2))
                .expect("Change failed");
            let updated = planner.update_resource(resource.id, draft).expect("Update failed");

            assert_eq!(updated.id, resource.id);
            assert_eq!(updated.fields.available_days, 7);
            assert_eq!(updated.fields.story_points, 5);
            assert_eq!(planner.resources().len(), 1);
        }

        it "reports unknown ids" {
            let mut planner = open_planner(&db);
            let missing = uuid::Uuid::new_v4();
            assert!(matches!(
                planner.remove_resource(missing),
                Err(PlannerError::ResourceNotFound(id)) if id == missing
            ));
        }
    }
}
