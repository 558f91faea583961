use roster_core::{
    FieldError, FormMode, KvStudentRepository, MemoryStore, RowAction, RowOutcome, Student,
    StudentInput, StudentService, SubmitError,
};

type Service = StudentService<KvStudentRepository<MemoryStore>>;

fn service() -> Service {
    StudentService::new(KvStudentRepository::new(MemoryStore::new()))
}

fn ann_input() -> StudentInput {
    StudentInput::new("Ann Lee", "101", "a@b.com", "1234567890")
}

#[test]
fn idle_submit_registers_trimmed_record_and_stays_idle() {
    let mut service = service();
    let input = StudentInput::new(" Ann Lee ", "101 ", " a@b.com", "1234567890");

    let next = service.submit(&FormMode::Idle, &input).unwrap();

    assert_eq!(next, FormMode::Idle);
    assert_eq!(
        service.list().unwrap(),
        vec![Student::new("Ann Lee", "101", "a@b.com", "1234567890")]
    );
}

#[test]
fn invalid_submit_reports_every_field_and_touches_nothing() {
    let mut service = service();
    let input = StudentInput::new("John123", "abc", "a@b", "12345");

    let err = service.submit(&FormMode::Idle, &input).unwrap_err();
    match err {
        SubmitError::Validation(errors) => {
            assert_eq!(errors.len(), 4);
            assert!(errors.contains(FieldError::InvalidName));
            assert!(errors.contains(FieldError::InvalidContact));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn duplicate_submit_is_blocking_with_user_message() {
    let mut service = service();
    service.submit(&FormMode::Idle, &ann_input()).unwrap();

    let err = service.submit(&FormMode::Idle, &ann_input()).unwrap_err();
    assert!(matches!(err, SubmitError::DuplicateId(ref id) if id == "101"));
    assert_eq!(err.user_message(), "Student ID already exists!");
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn edit_flow_populates_form_and_updates_in_place() {
    let mut service = service();
    service.submit(&FormMode::Idle, &ann_input()).unwrap();
    service
        .submit(
            &FormMode::Idle,
            &StudentInput::new("Bob Ray", "202", "bob@school.org", "0987654321"),
        )
        .unwrap();

    let (mode, mut input) = service.begin_edit("101").unwrap();
    assert_eq!(mode, FormMode::Editing("101".to_string()));
    assert_eq!(mode.submit_label(), "Update Student");
    assert_eq!(input, ann_input());

    input.name = "Ann Marie Lee".to_string();
    let next = service.submit(&mode, &input).unwrap();
    assert_eq!(next, FormMode::Idle);

    let listed = service.list().unwrap();
    assert_eq!(listed[0].name, "Ann Marie Lee");
    assert_eq!(listed[1].id, "202");
}

#[test]
fn editing_into_another_records_id_is_rejected() {
    let mut service = service();
    service.submit(&FormMode::Idle, &ann_input()).unwrap();
    service
        .submit(
            &FormMode::Idle,
            &StudentInput::new("Bob Ray", "202", "bob@school.org", "0987654321"),
        )
        .unwrap();

    let (mode, mut input) = service.begin_edit("101").unwrap();
    input.id = "202".to_string();
    let err = service.submit(&mode, &input).unwrap_err();
    assert!(matches!(err, SubmitError::DuplicateId(_)));
    assert_eq!(service.get("101").unwrap().unwrap().name, "Ann Lee");
}

#[test]
fn submitting_edit_for_vanished_record_returns_not_found() {
    let mut service = service();
    service.submit(&FormMode::Idle, &ann_input()).unwrap();
    let (mode, input) = service.begin_edit("101").unwrap();
    assert!(service.delete("101").unwrap());

    let err = service.submit(&mode, &input).unwrap_err();
    assert!(matches!(err, SubmitError::NotFound(ref id) if id == "101"));
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn begin_edit_on_unknown_id_is_not_found() {
    let service = service();
    let err = service.begin_edit("7").unwrap_err();
    assert!(matches!(err, SubmitError::NotFound(_)));
    assert_eq!(service.cancel_edit(), FormMode::Idle);
}

#[test]
fn row_actions_dispatch_by_id() {
    let mut service = service();
    service.submit(&FormMode::Idle, &ann_input()).unwrap();

    let view = service.render().unwrap();
    let [edit, delete] = view.rows[0].actions.clone();

    let outcome = service.dispatch(&edit).unwrap();
    assert_eq!(
        outcome,
        RowOutcome::Editing {
            mode: FormMode::Editing("101".to_string()),
            input: ann_input(),
        }
    );

    let outcome = service.dispatch(&delete).unwrap();
    assert_eq!(outcome, RowOutcome::Deleted { removed: true });

    let outcome = service.dispatch(&RowAction::Delete("101".into())).unwrap();
    assert_eq!(outcome, RowOutcome::Deleted { removed: false });

    let view = service.render().unwrap();
    assert!(view.rows.is_empty());
    assert!(view.empty_message.is_some());
}
