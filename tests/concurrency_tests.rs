//! Two reviewers racing on the same submitted sheet: exactly one terminal
//! transition commits, the loser observes the committed status. Uses an
//! on-disk database so each thread can hold its own connection.

mod common;
use common::{GrantAll, StubDirectory, config, day_of_week, monday, seed_assignment};
use std::thread;
use tempfile::tempdir;
use timesheet_approval::core::validator::EntryValidator;
use timesheet_approval::db::{events, initialize::init_db, pool::DbPool, store};
use timesheet_approval::models::event::ApprovalAction;
use timesheet_approval::{ApprovalWorkflow, EntryDraft, SheetStatus, WorkflowError};

const OWNER: i64 = 7;
const FIRST_SUPERVISOR: i64 = 42;
const SECOND_SUPERVISOR: i64 = 43;

#[test]
fn concurrent_approve_and_reject_commit_exactly_one_terminal_event() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("race.sqlite")
        .to_string_lossy()
        .to_string();

    // seed: a submitted sheet with two eligible supervisors
    let sheet_id = {
        let mut pool = DbPool::new(&db_path).unwrap();
        init_db(&pool.conn).unwrap();

        let refs = StubDirectory::all_active();
        let validator = EntryValidator::new(&refs, 24.0);
        let sheet = store::get_or_create(&mut pool.conn, OWNER, monday()).unwrap();
        store::add_entry(
            &mut pool.conn,
            &validator,
            sheet.id,
            &EntryDraft::billable(day_of_week(0), 8.0, 100, 200),
        )
        .unwrap();
        seed_assignment(&pool.conn, OWNER, FIRST_SUPERVISOR);
        seed_assignment(&pool.conn, OWNER, SECOND_SUPERVISOR);

        let workflow = ApprovalWorkflow::new(&refs, &GrantAll, config());
        workflow.submit(&mut pool.conn, sheet.id, OWNER).unwrap();
        sheet.id
    };

    let approve = {
        let db_path = db_path.clone();
        thread::spawn(move || {
            let mut pool = DbPool::new(&db_path).unwrap();
            let refs = StubDirectory::all_active();
            let workflow = ApprovalWorkflow::new(&refs, &GrantAll, config());
            workflow.approve(&mut pool.conn, sheet_id, FIRST_SUPERVISOR, None)
        })
    };
    let reject = {
        let db_path = db_path.clone();
        thread::spawn(move || {
            let mut pool = DbPool::new(&db_path).unwrap();
            let refs = StubDirectory::all_active();
            let workflow = ApprovalWorkflow::new(&refs, &GrantAll, config());
            workflow.reject(&mut pool.conn, sheet_id, SECOND_SUPERVISOR, "not this week")
        })
    };

    let outcomes = [approve.join().unwrap(), reject.join().unwrap()];
    let won = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(won, 1, "exactly one transition must commit");

    // the loser blocked on the sheet lock, then saw the committed status
    let lost = outcomes.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        lost,
        Err(WorkflowError::InvalidTransition { .. })
    ));

    let pool = DbPool::new(&db_path).unwrap();
    let sheet = store::load_sheet(&pool.conn, sheet_id).unwrap();
    assert!(matches!(
        sheet.status,
        SheetStatus::Approved | SheetStatus::Rejected
    ));

    let trail = events::events_for_sheet(&pool.conn, sheet_id).unwrap();
    let terminal = trail
        .iter()
        .filter(|e| matches!(e.action, ApprovalAction::Approve | ApprovalAction::Reject))
        .count();
    assert_eq!(terminal, 1, "event log must hold exactly one decision");
}

#[test]
fn retrying_a_committed_submit_is_rejected_not_duplicated() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("retry.sqlite")
        .to_string_lossy()
        .to_string();

    let mut pool = DbPool::new(&db_path).unwrap();
    init_db(&pool.conn).unwrap();

    let refs = StubDirectory::all_active();
    let validator = EntryValidator::new(&refs, 24.0);
    let workflow = ApprovalWorkflow::new(&refs, &GrantAll, config());

    let sheet = store::get_or_create(&mut pool.conn, OWNER, monday()).unwrap();
    store::add_entry(
        &mut pool.conn,
        &validator,
        sheet.id,
        &EntryDraft::non_billable(day_of_week(1), 4.0, 300),
    )
    .unwrap();

    workflow.submit(&mut pool.conn, sheet.id, OWNER).unwrap();

    // the caller timed out and replays the same logical action
    assert!(matches!(
        workflow.submit(&mut pool.conn, sheet.id, OWNER),
        Err(WorkflowError::InvalidTransition { .. })
    ));

    let trail = events::events_for_sheet(&pool.conn, sheet.id).unwrap();
    assert_eq!(trail.len(), 1, "the retry must not append a second event");
    assert_eq!(trail[0].action, ApprovalAction::Submit);
}
