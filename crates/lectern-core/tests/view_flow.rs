use chrono::NaiveDate;
use lectern_core::lecture::{Lecture, Subject};
use lectern_core::projection::{Projection, project};
use lectern_core::state::{Action, GroupSelection, LectureBatch, ViewState};
use lectern_core::store::{Session, StateStore};
use lectern_core::view::{Direction, ViewMode};
use tempfile::tempdir;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn lecture(id: i64, date: NaiveDate, start: &str, end: &str) -> Lecture {
    Lecture {
        id,
        date,
        period: String::new(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        subject: Subject {
            id,
            name: format!("Subject {id}"),
            external_id: String::new(),
        },
        lecturers: Vec::new(),
        rooms: Vec::new(),
        groups: Vec::new(),
        colors: Vec::new(),
    }
}

#[test]
fn state_store_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let store = StateStore::open(temp.path()).expect("open state store");

    assert!(store.load_view_state().expect("load view state").is_none());
    assert!(store.load_session().expect("load session").is_none());

    let today = date(2026, 2, 8);
    let state = ViewState::initial(today)
        .apply(Action::SetViewMode(ViewMode::Week))
        .apply(Action::SelectGroup(Some(GroupSelection {
            id: 1,
            name: "PI23A".to_string(),
        })));
    store.save_view_state(&state).expect("save view state");

    let loaded = store
        .load_view_state()
        .expect("load view state")
        .expect("state present");
    assert_eq!(loaded, state);

    let session = Session {
        token: "token-123".to_string(),
        username: "jonas".to_string(),
    };
    store.save_session(&session).expect("save session");
    assert_eq!(store.load_session().expect("load session"), Some(session));

    store.clear_session().expect("clear session");
    assert!(store.load_session().expect("load session").is_none());
    store.clear_session().expect("clear session twice");
}

#[test]
fn week_flow_projects_accepted_batch() {
    let today = date(2026, 2, 4);
    let state = ViewState::initial(today)
        .apply(Action::JumpToDate(date(2026, 2, 8)))
        .apply(Action::SetViewMode(ViewMode::Week));

    let range = state.range();
    assert_eq!(range.from, date(2026, 2, 2));
    assert_eq!(range.to, date(2026, 2, 8));

    let batch = LectureBatch {
        range,
        group_id: None,
        lectures: vec![
            lecture(2, date(2026, 2, 2), "10:00", "11:30"),
            lecture(1, date(2026, 2, 2), "08:00", "09:30"),
            lecture(3, date(2026, 2, 6), "12:00", "13:30"),
        ],
    };
    assert!(state.accepts(&batch));

    let projection = project(state.view, &batch.lectures, state.anchor, today);
    let Projection::Week(week) = projection else {
        panic!("expected week projection");
    };

    assert_eq!(week.days[0].date, date(2026, 2, 2));
    assert_eq!(week.days[0].lectures.len(), 2);
    assert_eq!(week.days[0].lectures[0].id, 1);
    assert_eq!(week.days[0].lectures[1].id, 2);
    assert_eq!(week.days[4].lectures.len(), 1);
    assert!(week.days[6].lectures.is_empty());
}

#[test]
fn navigation_invalidates_pending_batches() {
    let today = date(2026, 2, 4);
    let state = ViewState::initial(today).apply(Action::SetViewMode(ViewMode::Week));

    let stale = LectureBatch {
        range: state.range(),
        group_id: None,
        lectures: Vec::new(),
    };
    assert!(state.accepts(&stale));

    let moved = state.apply(Action::Navigate(Direction::Next));
    assert!(!moved.accepts(&stale));
    assert_eq!(moved.anchor, date(2026, 2, 11));

    let back = moved.apply(Action::Navigate(Direction::Previous));
    assert_eq!(back.anchor, state.anchor);
    assert!(back.accepts(&stale));
}
