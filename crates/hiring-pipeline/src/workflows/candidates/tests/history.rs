use crate::workflows::candidates::{History, PipelineError};

#[test]
fn initial_state_cannot_be_undone_or_redone() {
    let mut history = History::new(vec![0]);

    assert_eq!(history.undo(), Err(PipelineError::NoPriorState));
    assert_eq!(history.redo(), Err(PipelineError::NoNextState));
    assert_eq!(history.current().state, vec![0]);
    assert_eq!(history.len(), 1);
}

#[test]
fn undo_and_redo_walk_the_pointer_without_dropping_entries() {
    let mut history = History::new(vec![0]);
    history.commit("first", vec![0, 1]);
    history.commit("second", vec![0, 1, 2]);

    assert_eq!(history.undo().expect("undo"), &vec![0, 1]);
    assert_eq!(history.undo().expect("undo"), &vec![0]);
    assert!(!history.can_undo());
    assert_eq!(history.len(), 3);

    assert_eq!(history.redo().expect("redo"), &vec![0, 1]);
    assert_eq!(history.redo().expect("redo"), &vec![0, 1, 2]);
    assert!(!history.can_redo());
}

#[test]
fn commit_after_undo_discards_redo_entries() {
    let mut history = History::new(vec![0]);
    history.commit("first", vec![1]);
    history.commit("second", vec![2]);
    history.undo().expect("undo");
    history.undo().expect("undo");

    history.commit("branch", vec![3]);

    assert_eq!(history.len(), 2);
    assert_eq!(history.redo(), Err(PipelineError::NoNextState));
    assert_eq!(history.undo().expect("undo"), &vec![0]);
}

#[test]
fn views_label_entries_and_mark_the_current_one() {
    let mut history = History::new(());
    history.commit("add person", ());
    history.commit("move person", ());
    history.undo().expect("undo");

    let views = history.views();
    let labels: Vec<_> = views.iter().map(|view| view.label.as_str()).collect();
    assert_eq!(labels, ["initial", "add person", "move person"]);
    let current: Vec<_> = views.iter().map(|view| view.current).collect();
    assert_eq!(current, [false, true, false]);
    assert!(views[0].committed_at <= views[2].committed_at);
}
