use chrono::Utc;
use uuid::Uuid;

use hackreg_domain::registration::{RegistrationForm, RegistrationPatch};
use hackreg_domain::team::TeamNumber;
use hackreg_domain::validation::{EmailPolicy, FormField};
use hackreg_registrations::domain::repository::OtpStore;
use hackreg_registrations::domain::types::MAX_TEAM_NUMBER_ATTEMPTS;
use hackreg_registrations::error::RegistrationServiceError;
use hackreg_registrations::infra::otp_store::MemoryOtpStore;
use hackreg_registrations::usecase::registration::{
    CreateRegistrationUseCase, ExportSnapshotUseCase, ListRegistrationsUseCase,
    UpdateRegistrationUseCase, allocate_team_number,
};
use hackreg_testing::fixture::{HEAD_EMAIL, sample_form, sample_form_for, sample_registration};

use crate::helpers::MockRegistrationRepo;

async fn verified_store(emails: &[&str]) -> MemoryOtpStore {
    let store = MemoryOtpStore::new();
    for email in emails {
        store.mark_verified(email, Utc::now()).await.unwrap();
    }
    store
}

fn create_usecase(
    repo: MockRegistrationRepo,
    otp: MemoryOtpStore,
) -> CreateRegistrationUseCase<MockRegistrationRepo, MemoryOtpStore> {
    CreateRegistrationUseCase {
        repo,
        otp,
        policy: EmailPolicy::default(),
    }
}

// ── CreateRegistration ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_registration_with_generated_team_number() {
    let repo = MockRegistrationRepo::empty();
    let records = repo.records_handle();
    let otp = verified_store(&[HEAD_EMAIL]).await;
    let uc = create_usecase(repo, otp.clone());

    let created = uc.execute(sample_form("Null Pointers")).await.unwrap();

    assert_eq!(created.team_name, "Null Pointers");
    assert!(
        created.team_number.as_str().parse::<TeamNumber>().is_ok(),
        "team number should be TEAM + 5 digits, got {}",
        created.team_number
    );
    assert!(!created.round2);
    assert!(!created.certificate_sent);
    assert_eq!(created.alt_contact, None);

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, created.id);
    assert!(
        !otp.is_verified(HEAD_EMAIL).await.unwrap(),
        "verification is spent by a successful registration"
    );
}

#[tokio::test]
async fn should_trim_submitted_fields() {
    let otp = verified_store(&[HEAD_EMAIL]).await;
    let uc = create_usecase(MockRegistrationRepo::empty(), otp);
    let form = RegistrationForm {
        team_name: "  Null Pointers ".into(),
        head_email: format!(" {HEAD_EMAIL} "),
        alt_contact: "   ".into(),
        ..sample_form("unused")
    };

    let created = uc.execute(form).await.unwrap();

    assert_eq!(created.team_name, "Null Pointers");
    assert_eq!(created.head_email, HEAD_EMAIL);
    assert_eq!(created.alt_contact, None);
}

#[tokio::test]
async fn should_reject_invalid_fields_without_writing() {
    let repo = MockRegistrationRepo::empty();
    let records = repo.records_handle();
    let otp = verified_store(&[HEAD_EMAIL]).await;
    let uc = create_usecase(repo, otp);
    let form = RegistrationForm {
        password: "short".into(),
        member2_reg: String::new(),
        ..sample_form("Null Pointers")
    };

    let result = uc.execute(form).await;

    let Err(RegistrationServiceError::Validation(fields)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    assert!(fields.contains(FormField::Password));
    assert!(fields.contains(FormField::Member2Reg));
    assert_eq!(fields.len(), 2);
    assert!(records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_unverified_email() {
    let repo = MockRegistrationRepo::empty();
    let records = repo.records_handle();
    let uc = create_usecase(repo, MemoryOtpStore::new());

    let result = uc.execute(sample_form("Null Pointers")).await;

    assert!(
        matches!(result, Err(RegistrationServiceError::EmailNotVerified)),
        "expected EmailNotVerified, got {result:?}"
    );
    assert!(records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_team_name_case_insensitively() {
    let existing = sample_registration("Null Pointers", 1);
    let repo = MockRegistrationRepo::new(vec![existing.clone()]);
    let records = repo.records_handle();
    let otp = verified_store(&[HEAD_EMAIL]).await;
    let uc = create_usecase(repo, otp.clone());

    let result = uc.execute(sample_form("  NULL pointers ")).await;

    assert!(
        matches!(result, Err(RegistrationServiceError::DuplicateTeamName)),
        "expected DuplicateTeamName, got {result:?}"
    );
    assert_eq!(*records.lock().unwrap(), vec![existing]);
    assert!(
        otp.is_verified(HEAD_EMAIL).await.unwrap(),
        "a rejected submission keeps the verification"
    );
}

#[tokio::test]
async fn should_admit_exactly_one_of_two_concurrent_same_name_submissions() {
    let second_email = "meera.22bce0002@vitapstudent.ac.in";
    let repo = MockRegistrationRepo::empty().with_stale_name_check();
    let records = repo.records_handle();
    let otp = verified_store(&[HEAD_EMAIL, second_email]).await;
    let uc = create_usecase(repo, otp);

    let (a, b) = tokio::join!(
        uc.execute(sample_form("Null Pointers")),
        uc.execute(sample_form_for("null pointers", second_email)),
    );

    let outcomes = [a, b];
    let ok = outcomes.iter().filter(|r| r.is_ok()).count();
    let dup = outcomes
        .iter()
        .filter(|r| matches!(r, Err(RegistrationServiceError::DuplicateTeamName)))
        .count();
    assert_eq!((ok, dup), (1, 1), "got {outcomes:?}");
    assert_eq!(records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_give_distinct_team_numbers_to_every_registration() {
    let emails: Vec<String> = (0..20)
        .map(|i| format!("head{i}@vitapstudent.ac.in"))
        .collect();
    let refs: Vec<&str> = emails.iter().map(String::as_str).collect();
    let otp = verified_store(&refs).await;
    let repo = MockRegistrationRepo::empty();
    let records = repo.records_handle();
    let uc = create_usecase(repo, otp);

    for (i, email) in emails.iter().enumerate() {
        uc.execute(sample_form_for(&format!("Team {i}"), email))
            .await
            .unwrap();
    }

    let records = records.lock().unwrap();
    let mut numbers: Vec<_> = records.iter().map(|r| r.team_number.clone()).collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 20, "team numbers must be unique");
}

#[tokio::test]
async fn should_redraw_team_number_when_insert_conflicts() {
    let repo = MockRegistrationRepo::empty().with_number_conflicts(3);
    let records = repo.records_handle();
    let otp = verified_store(&[HEAD_EMAIL]).await;
    let uc = create_usecase(repo, otp);

    uc.execute(sample_form("Null Pointers")).await.unwrap();

    assert_eq!(records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_fail_with_exhausted_when_every_insert_conflicts() {
    let repo =
        MockRegistrationRepo::empty().with_number_conflicts(MAX_TEAM_NUMBER_ATTEMPTS + 1);
    let records = repo.records_handle();
    let otp = verified_store(&[HEAD_EMAIL]).await;
    let uc = create_usecase(repo, otp);

    let result = uc.execute(sample_form("Null Pointers")).await;

    assert!(
        matches!(result, Err(RegistrationServiceError::TeamNumbersExhausted)),
        "expected TeamNumbersExhausted, got {result:?}"
    );
    assert!(records.lock().unwrap().is_empty());
}

// ── allocate_team_number ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_allocate_number_not_in_store() {
    let existing: Vec<_> = (0..50)
        .map(|i| sample_registration(&format!("Team {i}"), i))
        .collect();
    let repo = MockRegistrationRepo::new(existing.clone());

    let number = allocate_team_number(&repo).await.unwrap();

    assert!(existing.iter().all(|r| r.team_number != number));
}

#[tokio::test]
async fn should_give_up_when_no_team_number_is_free() {
    let repo = MockRegistrationRepo::empty().with_all_numbers_taken();
    let result = allocate_team_number(&repo).await;
    assert!(
        matches!(result, Err(RegistrationServiceError::TeamNumbersExhausted)),
        "expected TeamNumbersExhausted, got {result:?}"
    );
}

// ── ListRegistrations / ExportSnapshot ───────────────────────────────────────

#[tokio::test]
async fn should_list_newest_first_and_filter_round2() {
    let older = sample_registration("Older", 1);
    let mut newer = sample_registration("Newer", 2);
    newer.round2 = true;
    let uc = ListRegistrationsUseCase {
        repo: MockRegistrationRepo::new(vec![older.clone(), newer.clone()]),
    };

    let all = uc.execute(false).await.unwrap();
    assert_eq!(all, vec![newer.clone(), older]);

    let round2 = uc.execute(true).await.unwrap();
    assert_eq!(round2, vec![newer]);
}

#[tokio::test]
async fn should_export_snapshot_of_selected_records() {
    let plain = sample_registration("Plain", 1);
    let mut shortlisted = sample_registration("Say \"Hi\"", 2);
    shortlisted.round2 = true;
    let uc = ExportSnapshotUseCase {
        repo: MockRegistrationRepo::new(vec![plain, shortlisted]),
    };

    let all = uc.execute(false).await.unwrap();
    assert_eq!(all.lines().count(), 3, "header plus two rows");
    assert!(all.starts_with("teamName,headName,"));

    let round2 = uc.execute(true).await.unwrap();
    let lines: Vec<&str> = round2.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("\"Say \"\"Hi\"\"\""));
    assert!(lines[1].contains("\"YES\""));
}

#[tokio::test]
async fn should_export_empty_string_without_records() {
    let uc = ExportSnapshotUseCase {
        repo: MockRegistrationRepo::empty(),
    };
    assert_eq!(uc.execute(false).await.unwrap(), "");
}

// ── UpdateRegistration ───────────────────────────────────────────────────────

fn update_usecase(repo: MockRegistrationRepo) -> UpdateRegistrationUseCase<MockRegistrationRepo> {
    UpdateRegistrationUseCase {
        repo,
        policy: EmailPolicy::default(),
    }
}

#[tokio::test]
async fn should_toggle_round2_and_certificate_flags() {
    let existing = sample_registration("Null Pointers", 1);
    let uc = update_usecase(MockRegistrationRepo::new(vec![existing.clone()]));

    let updated = uc
        .execute(existing.id, RegistrationPatch::round2(true))
        .await
        .unwrap();
    assert!(updated.round2);
    assert!(!updated.certificate_sent);

    let updated = uc
        .execute(existing.id, RegistrationPatch::certificate_sent(true))
        .await
        .unwrap();
    assert!(updated.round2, "earlier flag is kept");
    assert!(updated.certificate_sent);
    assert_eq!(updated.team_number, existing.team_number);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_id() {
    let uc = update_usecase(MockRegistrationRepo::empty());
    let result = uc
        .execute(Uuid::now_v7(), RegistrationPatch::round2(true))
        .await;
    assert!(
        matches!(result, Err(RegistrationServiceError::RegistrationNotFound)),
        "expected RegistrationNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_missing_data_for_empty_patch() {
    let existing = sample_registration("Null Pointers", 1);
    let uc = update_usecase(MockRegistrationRepo::new(vec![existing.clone()]));
    let result = uc.execute(existing.id, RegistrationPatch::default()).await;
    assert!(
        matches!(result, Err(RegistrationServiceError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_edited_fields() {
    let existing = sample_registration("Null Pointers", 1);
    let uc = update_usecase(MockRegistrationRepo::new(vec![existing.clone()]));
    let patch = RegistrationPatch {
        head_email: Some("ravi@gmail.com".into()),
        ..Default::default()
    };

    let result = uc.execute(existing.id, patch).await;

    let Err(RegistrationServiceError::Validation(fields)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    assert!(fields.contains(FormField::HeadEmail));
}

#[tokio::test]
async fn should_reject_rename_onto_existing_team() {
    let a = sample_registration("Alpha", 1);
    let b = sample_registration("Beta", 2);
    let uc = update_usecase(MockRegistrationRepo::new(vec![a, b.clone()]));
    let patch = RegistrationPatch {
        team_name: Some(" ALPHA ".into()),
        ..Default::default()
    };

    let result = uc.execute(b.id, patch).await;

    assert!(
        matches!(result, Err(RegistrationServiceError::DuplicateTeamName)),
        "expected DuplicateTeamName, got {result:?}"
    );
}
