//! Domain models for the sprint capacity planner.
//!
//! # Core Concepts
//!
//! - [`Configuration`]: Sprint parameters for a work location (days per sprint,
//!   hours per day, public holidays). Resources copy these values when they
//!   are created, they never hold a live reference.
//! - [`StoryPointMappingRow`]: One row of the man-days to story points lookup table.
//! - [`ResourceDraft`]: A resource being edited. Its derived fields are kept in
//!   sync by the capacity engine on every relevant edit.
//! - [`Resource`]: A saved draft. Derived fields are a snapshot taken at save time.
//!
//! All models serialize with camelCase keys, which is the shape of the
//! persisted key/value blobs.

mod configuration;
mod mapping;
mod resource;

pub use configuration::*;
pub use mapping::*;
pub use resource::*;
