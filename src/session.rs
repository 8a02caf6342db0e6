//! The resource form workflow.
//!
//! A [`Session`] holds what a form front end would: the selected
//! configuration, the draft being edited and which dialog is open. It never
//! owns planner state; every operation takes the planner it acts on.

use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::models::{FieldChange, Resource, ResourceDraft};
use crate::planner::Planner;

/// Which panel is open.
///
/// `Closed` means the resource form is adding a new resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Editing(Uuid),
    ManagingConfig,
    ManagingMapping,
}

#[derive(Debug, Clone)]
pub struct Session {
    dialog: DialogState,
    selected_config: Option<Uuid>,
    draft: ResourceDraft,
}

impl Session {
    /// Start a session on the first configuration, if there is one.
    pub fn new(planner: &Planner) -> Self {
        let mut session = Self {
            dialog: DialogState::Closed,
            selected_config: None,
            draft: ResourceDraft::default(),
        };
        if let Ok(first) = planner.configs().get_at(0) {
            let id = first.id;
            if let Ok(draft) = planner.draft_for(id) {
                session.selected_config = Some(id);
                session.draft = draft;
            }
        }
        session
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn draft(&self) -> &ResourceDraft {
        &self.draft
    }

    pub fn selected_config(&self) -> Option<Uuid> {
        self.selected_config
    }

    /// Whether a resource can be created right now.
    pub fn can_create(&self) -> bool {
        self.selected_config.is_some()
    }

    /// Switch configuration and reseed the draft from it.
    pub fn select_config(&mut self, planner: &Planner, config_id: Uuid) -> Result<()> {
        self.draft = planner.draft_for(config_id)?;
        self.selected_config = Some(config_id);
        Ok(())
    }

    /// Apply one field edit. A rejected edit leaves the draft unchanged.
    pub fn change(&mut self, planner: &Planner, change: FieldChange) -> Result<&ResourceDraft> {
        let config_id = self.selected_config.ok_or(PlannerError::NoConfiguration)?;
        let field = change.field_name();
        self.draft = planner
            .apply_change(config_id, &self.draft, change)
            .inspect_err(|e| tracing::warn!("Rejected edit to {}: {}", field, e))?;
        Ok(&self.draft)
    }

    /// Load a saved resource into the form.
    ///
    /// The configuration matching the resource's location becomes the
    /// selection. A resource whose configuration was removed keeps the
    /// current selection, and its first capacity or leave edit moves it onto
    /// that configuration.
    pub fn begin_edit(&mut self, planner: &Planner, resource_id: Uuid) -> Result<()> {
        let resource = planner
            .resources()
            .get(resource_id)
            .ok_or(PlannerError::ResourceNotFound(resource_id))?;

        match planner.config_for_location(&resource.fields.location) {
            Some(config) => self.selected_config = Some(config.id),
            None => tracing::warn!(
                "No configuration named '{}'; capacity edits will move it to the current selection",
                resource.fields.location
            ),
        }
        self.draft = resource.fields.clone();
        self.dialog = DialogState::Editing(resource_id);
        Ok(())
    }

    /// Save the draft: update the resource being edited, or add a new one.
    /// The form is then reseeded and the dialog closed.
    ///
    /// Nothing is saved unless the selected configuration still exists.
    pub fn submit(&mut self, planner: &mut Planner) -> Result<Resource> {
        let config_id = self.selected_config.ok_or(PlannerError::NoConfiguration)?;
        let next = planner.draft_for(config_id)?;

        let saved = match self.dialog {
            DialogState::Editing(id) => planner.update_resource(id, self.draft.clone())?,
            _ => planner.add_resource(self.draft.clone())?,
        };

        self.draft = next;
        self.dialog = DialogState::Closed;
        Ok(saved)
    }

    /// Remove a resource, abandoning the edit if it was the one being edited.
    pub fn remove_resource(&mut self, planner: &mut Planner, resource_id: Uuid) -> Result<Resource> {
        let removed = planner.remove_resource(resource_id)?;
        if self.dialog == DialogState::Editing(resource_id) {
            self.cancel(planner);
        }
        Ok(removed)
    }

    /// Close any dialog and reset the form.
    pub fn cancel(&mut self, planner: &Planner) {
        self.dialog = DialogState::Closed;
        self.draft = self
            .selected_config
            .and_then(|id| planner.draft_for(id).ok())
            .unwrap_or_default();
    }

    pub fn open_config_manager(&mut self) {
        self.dialog = DialogState::ManagingConfig;
    }

    pub fn open_mapping_manager(&mut self) {
        self.dialog = DialogState::ManagingMapping;
    }

    /// Close the configuration or mapping panel.
    ///
    /// Re-resolves the selection, since the panel may have removed it.
    pub fn close_manager(&mut self, planner: &Planner) {
        let still_exists = self
            .selected_config
            .is_some_and(|id| planner.configs().get(id).is_some());
        if !still_exists {
            self.selected_config = planner.configs().get_at(0).ok().map(|c| c.id);
        }
        self.cancel(planner);
    }
}
