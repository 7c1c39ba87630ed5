use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Mutex;

use rinkplan::api::{ApiError, RosterApi, SaveTrainingRequest};
use rinkplan::form::{FormClose, FormError, TrainingForm};
use rinkplan::models::{Group, Location, Training, TrainingType};

/// One observed API call, recorded in invocation order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Locations,
    Groups,
    Trainings,
    CreateTraining {
        location_id: i64,
        start_time: String,
        end_time: String,
        kind: TrainingType,
    },
    AddGroup {
        group_id: i64,
        training_id: i64,
    },
    ModifyTraining {
        id: Option<i64>,
        location_id: i64,
    },
}

/// In-memory roster backend that records every call it receives.
struct FakeRoster {
    calls: Mutex<Vec<Call>>,
    locations: Vec<Location>,
    groups: Vec<Group>,
    trainings: Vec<Training>,
    created_id: i64,
    fail_add_group: Option<i64>,
}

impl FakeRoster {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            locations: vec![location(1, "Main Rink"), location(2, "Studio")],
            groups: vec![group(1, "Novices"), group(2, "Juniors"), group(5, "Seniors")],
            trainings: Vec::new(),
            created_id: 42,
            fail_add_group: None,
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RosterApi for FakeRoster {
    async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        self.record(Call::Locations);
        Ok(self.locations.clone())
    }

    async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        self.record(Call::Groups);
        Ok(self.groups.clone())
    }

    async fn trainings(&self) -> Result<Vec<Training>, ApiError> {
        self.record(Call::Trainings);
        Ok(self.trainings.clone())
    }

    async fn create_training(&self, request: &SaveTrainingRequest) -> Result<Training, ApiError> {
        self.record(Call::CreateTraining {
            location_id: request.location_id,
            start_time: request.raw_training_data.start_time.clone(),
            end_time: request.raw_training_data.end_time.clone(),
            kind: request.raw_training_data.kind,
        });

        Ok(training(self.created_id, request.location_id, vec![]))
    }

    async fn add_group(&self, group_id: i64, training_id: i64) -> Result<(), ApiError> {
        if self.fail_add_group == Some(group_id) {
            return Err(ApiError::ServerError("association failed".to_string()));
        }

        self.record(Call::AddGroup {
            group_id,
            training_id,
        });
        Ok(())
    }

    async fn modify_training(&self, request: &SaveTrainingRequest) -> Result<(), ApiError> {
        self.record(Call::ModifyTraining {
            id: request.raw_training_data.id,
            location_id: request.location_id,
        });
        Ok(())
    }
}

fn location(id: i64, name: &str) -> Location {
    Location {
        id,
        name: name.to_string(),
    }
}

fn group(id: i64, name: &str) -> Group {
    Group {
        id,
        name: name.to_string(),
        members: vec![],
        coaches: vec![],
        trainings: vec![],
    }
}

fn training(id: i64, location_id: i64, groups: Vec<Group>) -> Training {
    Training {
        id,
        start_time: Utc.with_ymd_and_hms(2026, 8, 5, 18, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2026, 8, 5, 19, 30, 0).unwrap(),
        kind: TrainingType::Ice,
        location: location(location_id, "Main Rink"),
        groups,
    }
}

fn filled_new_form() -> TrainingForm {
    let now = NaiveDate::from_ymd_opt(2026, 8, 5)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let mut form = TrainingForm::new_training(now);
    form.select_location(1);
    form.select_type(TrainingType::Ice);
    form.set_start_hour(NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    form.set_end_hour(NaiveTime::from_hms_opt(19, 30, 0).unwrap());
    form
}

#[tokio::test]
async fn test_new_training_creates_then_associates_in_selection_order() {
    let api = FakeRoster::new();
    let mut form = filled_new_form();
    form.select_group(2);
    form.select_group(5);

    let close = form.save(&api).await.unwrap();

    assert_eq!(close, FormClose::Saved { training_id: 42 });
    assert!(close.refresh_needed());
    assert_eq!(
        api.calls(),
        vec![
            Call::CreateTraining {
                location_id: 1,
                start_time: "2026-08-05 18:00".to_string(),
                end_time: "2026-08-05 19:30".to_string(),
                kind: TrainingType::Ice,
            },
            Call::AddGroup {
                group_id: 2,
                training_id: 42,
            },
            Call::AddGroup {
                group_id: 5,
                training_id: 42,
            },
        ]
    );
}

#[tokio::test]
async fn test_associations_use_the_id_the_create_returned() {
    let mut api = FakeRoster::new();
    api.created_id = 99;

    let mut form = filled_new_form();
    form.select_group(2);

    let close = form.save(&api).await.unwrap();

    assert_eq!(close, FormClose::Saved { training_id: 99 });
    assert_eq!(
        api.calls()[1],
        Call::AddGroup {
            group_id: 2,
            training_id: 99,
        }
    );
}

#[tokio::test]
async fn test_edit_modifies_existing_id_and_reassociates_all_selected_groups() {
    let api = FakeRoster::new();
    let existing = training(7, 3, vec![group(1, "Novices")]);

    let mut form = TrainingForm::edit(&existing);
    form.select_group(3);

    let close = form.save(&api).await.unwrap();

    assert_eq!(close, FormClose::Saved { training_id: 7 });
    // Group 1 was already associated on the server; it is re-sent anyway.
    assert_eq!(
        api.calls(),
        vec![
            Call::ModifyTraining {
                id: Some(7),
                location_id: 3,
            },
            Call::AddGroup {
                group_id: 1,
                training_id: 7,
            },
            Call::AddGroup {
                group_id: 3,
                training_id: 7,
            },
        ]
    );
}

#[tokio::test]
async fn test_edit_prepopulates_selection_with_exactly_the_trainings_groups() {
    let existing = training(7, 3, vec![group(2, "Juniors"), group(5, "Seniors")]);

    let form = TrainingForm::edit(&existing);

    assert_eq!(form.selected_groups(), &[2, 5]);
}

#[tokio::test]
async fn test_cancel_issues_no_network_calls() {
    let api = FakeRoster::new();
    let form = filled_new_form();

    let close = form.cancel();

    assert_eq!(close, FormClose::Cancelled);
    assert!(!close.refresh_needed());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_missing_required_field_fails_before_any_call() {
    let api = FakeRoster::new();
    let now = NaiveDate::from_ymd_opt(2026, 8, 5)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let form = TrainingForm::new_training(now);

    let result = form.save(&api).await;

    assert!(matches!(result, Err(FormError::MissingField("location"))));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_association_failure_reports_created_id_and_remaining_groups() {
    let mut api = FakeRoster::new();
    api.fail_add_group = Some(5);

    let mut form = filled_new_form();
    form.select_group(2);
    form.select_group(5);
    form.select_group(1);

    let result = form.save(&api).await;

    match result {
        Err(FormError::PartialAssociation {
            training_id,
            remaining,
            ..
        }) => {
            assert_eq!(training_id, 42);
            assert_eq!(remaining, vec![5, 1]);
        }
        other => panic!("expected PartialAssociation, got {:?}", other),
    }

    // The create and the first association landed before the failure.
    assert_eq!(api.calls().len(), 2);
    assert_eq!(
        api.calls()[1],
        Call::AddGroup {
            group_id: 2,
            training_id: 42,
        }
    );
}

#[tokio::test]
async fn test_load_reference_data_fetches_locations_then_groups() {
    let api = FakeRoster::new();
    let mut form = filled_new_form();

    form.load_reference_data(&api).await.unwrap();

    assert_eq!(api.calls(), vec![Call::Locations, Call::Groups]);
    assert_eq!(form.locations().len(), 2);
    assert_eq!(form.groups().len(), 3);
}
