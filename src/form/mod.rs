//! The training form workflow: collect location, date, time range, type
//! and group selections, then create or update a training on the server.
//!
//! A new training is created first and its groups associated afterwards,
//! one call per group, against the id the create returned. Editing
//! modifies the training in place and then re-associates every selected
//! group against the existing id. Group association is additive: the
//! backend offers no removal call, so deselecting a group in edit mode
//! does not detach it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::api::{ApiError, RawTrainingData, RosterApi, SaveTrainingRequest};
use crate::models::{Group, Location, Training, TrainingType};
use crate::timefmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit,
}

/// How the form was closed, and whether the invoking view's data is now
/// stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormClose {
    Saved { training_id: i64 },
    Cancelled,
}

impl FormClose {
    pub fn refresh_needed(&self) -> bool {
        matches!(self, FormClose::Saved { .. })
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    /// The training itself was saved, but the association fan-out stopped
    /// partway. `remaining` lists the group ids not yet associated, in
    /// selection order, starting with the one that failed.
    #[error("Training {training_id} saved, but groups {remaining:?} were not associated")]
    PartialAssociation {
        training_id: i64,
        remaining: Vec<i64>,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// State of one open training form, new or edit.
pub struct TrainingForm {
    mode: FormMode,
    training_id: Option<i64>,
    locations: Vec<Location>,
    groups: Vec<Group>,
    selected_location_id: Option<i64>,
    selected_groups: Vec<i64>,
    selected_type: Option<TrainingType>,
    date: Option<NaiveDate>,
    start_hour: Option<NaiveTime>,
    end_hour: Option<NaiveTime>,
}

impl TrainingForm {
    /// Open the form in "new" mode, defaulting the date and both hours to
    /// the given current time. No groups are selected.
    pub fn new_training(now: NaiveDateTime) -> Self {
        Self {
            mode: FormMode::New,
            training_id: None,
            locations: Vec::new(),
            groups: Vec::new(),
            selected_location_id: None,
            selected_groups: Vec::new(),
            selected_type: None,
            date: Some(now.date()),
            start_hour: Some(now.time()),
            end_hour: Some(now.time()),
        }
    }

    /// Open the form in "edit" mode, pre-populated from an existing
    /// training: its location, date, start/end hours, type, and the exact
    /// set of group ids currently associated with it.
    pub fn edit(training: &Training) -> Self {
        Self {
            mode: FormMode::Edit,
            training_id: Some(training.id),
            locations: Vec::new(),
            groups: Vec::new(),
            selected_location_id: Some(training.location.id),
            selected_groups: training.group_ids(),
            selected_type: Some(training.kind),
            date: Some(training.start_time.date_naive()),
            start_hour: Some(training.start_time.time()),
            end_hour: Some(training.end_time.time()),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn training_id(&self) -> Option<i64> {
        self.training_id
    }

    /// Fetch the selectable locations and groups.
    pub async fn load_reference_data<A>(&mut self, api: &A) -> Result<(), FormError>
    where
        A: RosterApi + ?Sized,
    {
        self.locations = api.locations().await?;
        self.groups = api.groups().await?;
        Ok(())
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn select_location(&mut self, location_id: i64) {
        self.selected_location_id = Some(location_id);
    }

    pub fn selected_location_id(&self) -> Option<i64> {
        self.selected_location_id
    }

    pub fn select_type(&mut self, kind: TrainingType) {
        self.selected_type = Some(kind);
    }

    pub fn selected_type(&self) -> Option<TrainingType> {
        self.selected_type
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn set_start_hour(&mut self, start: NaiveTime) {
        self.start_hour = Some(start);
    }

    pub fn start_hour(&self) -> Option<NaiveTime> {
        self.start_hour
    }

    pub fn set_end_hour(&mut self, end: NaiveTime) {
        self.end_hour = Some(end);
    }

    pub fn end_hour(&self) -> Option<NaiveTime> {
        self.end_hour
    }

    /// Add a group to the selection. Selecting an already-selected group
    /// is a no-op; selection order is otherwise preserved.
    pub fn select_group(&mut self, group_id: i64) {
        if !self.selected_groups.contains(&group_id) {
            self.selected_groups.push(group_id);
        }
    }

    /// Remove a group from the selection. This only affects what gets
    /// associated on save; it cannot detach a group already on the server.
    pub fn deselect_group(&mut self, group_id: i64) {
        self.selected_groups.retain(|id| *id != group_id);
    }

    pub fn selected_groups(&self) -> &[i64] {
        &self.selected_groups
    }

    /// Validate and submit. Dispatches to the create or update path based
    /// on the form's mode.
    pub async fn save<A>(&self, api: &A) -> Result<FormClose, FormError>
    where
        A: RosterApi + ?Sized,
    {
        let request = self.build_request()?;

        match self.mode {
            FormMode::New => self.save_new(api, request).await,
            FormMode::Edit => self.update_existing(api, request).await,
        }
    }

    /// Close without saving. Never touches the network.
    pub fn cancel(&self) -> FormClose {
        FormClose::Cancelled
    }

    fn build_request(&self) -> Result<SaveTrainingRequest, FormError> {
        let location_id = self
            .selected_location_id
            .ok_or(FormError::MissingField("location"))?;
        let date = self.date.ok_or(FormError::MissingField("date"))?;
        let start = self.start_hour.ok_or(FormError::MissingField("start time"))?;
        let end = self.end_hour.ok_or(FormError::MissingField("end time"))?;
        let kind = self.selected_type.ok_or(FormError::MissingField("type"))?;

        Ok(SaveTrainingRequest {
            location_id,
            raw_training_data: RawTrainingData {
                id: self.training_id,
                start_time: timefmt::wire_timestamp(date, start),
                end_time: timefmt::wire_timestamp(date, end),
                kind,
            },
        })
    }

    async fn save_new<A>(&self, api: &A, request: SaveTrainingRequest) -> Result<FormClose, FormError>
    where
        A: RosterApi + ?Sized,
    {
        let training = api.create_training(&request).await?;

        self.associate_groups(api, training.id).await?;

        Ok(FormClose::Saved {
            training_id: training.id,
        })
    }

    async fn update_existing<A>(
        &self,
        api: &A,
        request: SaveTrainingRequest,
    ) -> Result<FormClose, FormError>
    where
        A: RosterApi + ?Sized,
    {
        let training_id = self
            .training_id
            .ok_or(FormError::MissingField("training id"))?;

        api.modify_training(&request).await?;

        // Every selected group is re-associated, including ones already on
        // the server. Deselected groups are left attached (see module docs).
        self.associate_groups(api, training_id).await?;

        Ok(FormClose::Saved { training_id })
    }

    async fn associate_groups<A>(&self, api: &A, training_id: i64) -> Result<(), FormError>
    where
        A: RosterApi + ?Sized,
    {
        for (index, group_id) in self.selected_groups.iter().enumerate() {
            if let Err(source) = api.add_group(*group_id, training_id).await {
                return Err(FormError::PartialAssociation {
                    training_id,
                    remaining: self.selected_groups[index..].to_vec(),
                    source,
                });
            }
        }

        Ok(())
    }
}
