//! Integration tests for the sync controller over a SQLite store.
//!
//! Drives full trigger sequences the way the UI does and checks the
//! in-memory snapshot against what is on disk.

use std::sync::Arc;

use chrono::NaiveTime;
use gantt::chart::parse_completion_label;
use gantt::store::{ChartStore, OwnerKey, SqliteChartStore};
use gantt::sync::{FormEcho, Session, SyncController, Trigger};
use gantt::{TaskForm, default_seed_tasks, render};

fn owner() -> OwnerKey {
    OwnerKey::new("default_user", "my_project")
}

fn open(dir: &tempfile::TempDir) -> Arc<SqliteChartStore> {
    Arc::new(SqliteChartStore::open(&dir.path().join("gantt.db")).expect("open store"))
}

fn controller(store: Arc<SqliteChartStore>) -> SyncController {
    SyncController::new(store).with_clock(Arc::new(|| {
        NaiveTime::from_hms_opt(17, 30, 0).expect("valid time")
    }))
}

fn form(name: &str, start: &str, end: &str, resource: &str, completion: i32) -> TaskForm {
    TaskForm {
        task_name: Some(name.to_owned()),
        start_date: Some(start.to_owned()),
        end_date: Some(end.to_owned()),
        resource: Some(resource.to_owned()),
        completion: Some(completion),
    }
}

/// Fresh database → seed → add → new session sees the added task.
#[test]
fn added_task_survives_new_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctl = controller(open(&dir));

    let mut first = Session::new(owner());
    let initial = ctl.handle(&mut first, Trigger::None);
    assert_eq!(initial.snapshot, default_seed_tasks());

    let added = ctl.handle(
        &mut first,
        Trigger::AddTask(form("Launch", "2025-12-08", "2025-12-10", "Ops", 10)),
    );
    assert_eq!(added.status, "Added: 'Launch'");
    assert_eq!(added.fields, FormEcho::cleared());

    // A second session (e.g. a browser reload) starts from the stored row.
    let ctl2 = controller(open(&dir));
    let mut second = Session::new(owner());
    let resumed = ctl2.handle(&mut second, Trigger::None);
    assert_eq!(resumed.snapshot, added.snapshot);
    assert_eq!(resumed.snapshot.len(), 7);
    assert_eq!(resumed.snapshot[6].resource, "Ops");
}

#[test]
fn reload_discards_unsaved_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(&dir);
    let ctl = controller(store.clone());
    let mut session = Session::new(owner());

    ctl.handle(&mut session, Trigger::ManualSave);
    let stored = store.load(&owner()).expect("saved");

    // Another writer replaces the row.
    let other = default_seed_tasks()[..2].to_vec();
    store.save(&owner(), &other).expect("save other");

    let resp = ctl.handle(&mut session, Trigger::Reload);
    assert_eq!(resp.snapshot, other);
    assert_ne!(resp.snapshot, stored);
}

/// Save-now and auto-save racing for the same row: whichever runs last wins.
#[test]
fn manual_and_auto_save_last_writer_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(&dir);
    let ctl = controller(store.clone());

    let mut a = Session::from_snapshot(owner(), default_seed_tasks());
    let mut b = Session::from_snapshot(owner(), default_seed_tasks()[..1].to_vec());

    let manual = ctl.handle(&mut a, Trigger::ManualSave);
    let auto = ctl.handle(&mut b, Trigger::AutoSaveTick);
    assert_eq!(manual.status, "Saved at 17:30:00");
    assert_eq!(auto.status, "Auto-saved at 17:30:00");
    assert_eq!(store.load(&owner()), Some(b.state().current_list().to_vec()));

    ctl.handle(&mut b, Trigger::AutoSaveTick);
    ctl.handle(&mut a, Trigger::ManualSave);
    assert_eq!(store.load(&owner()), Some(a.state().current_list().to_vec()));
}

#[test]
fn chart_labels_match_snapshot_completion() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctl = controller(open(&dir));
    let mut session = Session::new(owner());

    ctl.handle(
        &mut session,
        Trigger::AddTask(form("Stretch", "2025-12-01", "2025-11-30", "", 140)),
    );
    let resp = ctl.handle(&mut session, Trigger::None);

    let completions: Vec<i32> = resp.snapshot.iter().map(|t| t.completion).collect();
    let labels: Vec<i32> = resp
        .chart
        .bars
        .iter()
        .filter_map(|b| parse_completion_label(&b.label))
        .collect();
    assert_eq!(labels, completions);
    assert_eq!(resp.chart, render(&resp.snapshot));
    assert_eq!(resp.snapshot[6].resource, "Unassigned");
}

#[test]
fn sessions_for_different_projects_are_isolated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(&dir);
    let ctl = controller(store.clone());

    let mut roadmap = Session::new(OwnerKey::new("default_user", "roadmap"));
    ctl.handle(
        &mut roadmap,
        Trigger::AddTask(form("Only here", "2025-01-01", "2025-01-02", "Eng", 0)),
    );

    assert_eq!(store.load(&owner()), None);
    let mut main = Session::new(owner());
    let resp = ctl.handle(&mut main, Trigger::None);
    assert_eq!(resp.snapshot, default_seed_tasks());
}
