//! Deleting an imported declaration file and restoring it must not leave the
//! build stuck in the deleted state, in either build mode.

use kiln_config::BuildMode;
use kiln_conformance::{run_scenario_in, DELETE_RESTORE, DELETE_RESTORE_UPWARD};

#[test]
fn watch_mode_recovers_after_restore() {
    let run = run_scenario_in(DELETE_RESTORE, BuildMode::Watch).unwrap();
    assert_eq!(run.codes(), vec![vec![], vec![2307], vec![]]);

    let missing = &run.reports[1].diagnostics[0];
    assert_eq!(missing.file.as_deref(), Some("/a.ts"));
    assert_eq!(
        missing.message,
        "Cannot find module './module/b' or its corresponding type declarations."
    );
}

#[test]
fn batch_mode_recovers_after_restore() {
    let run = run_scenario_in(DELETE_RESTORE, BuildMode::Batch).unwrap();
    assert_eq!(run.codes(), vec![vec![], vec![2307], vec![]]);
}

#[test]
fn rounds_report_their_file_set_changes() {
    let run = run_scenario_in(DELETE_RESTORE, BuildMode::Watch).unwrap();
    let deleted: Vec<_> = run.reports[1].diff.deleted.iter().cloned().collect();
    let created: Vec<_> = run.reports[2].diff.created.iter().cloned().collect();
    assert_eq!(deleted, vec!["/module/b.d.ts"]);
    assert_eq!(created, vec!["/module/b.d.ts"]);
    assert!(run.reports[2].diff.deleted.is_empty());
}

#[test]
fn watch_mode_delivers_one_notification_per_change() {
    let run = run_scenario_in(DELETE_RESTORE, BuildMode::Watch).unwrap();
    let notified: Vec<usize> = run.reports.iter().map(|r| r.notifications).collect();
    // Deletion reaches the file watcher; the restore reaches the recursive
    // directory watcher installed for the failed import.
    assert_eq!(notified, vec![0, 1, 1]);
}

#[test]
fn transcript_prints_headers_and_only_nonempty_diagnostics() {
    let run = run_scenario_in(DELETE_RESTORE, BuildMode::Batch).unwrap();
    let lines: Vec<&str> = run.transcript.lines().collect();
    assert_eq!(lines[0], "ROUND 0 START");
    assert_eq!(lines[1], "ROUND 1 START");
    assert!(lines[2].starts_with("/a.ts(1,"), "{}", lines[2]);
    assert!(lines[2].contains("error TS2307"));
    assert_eq!(lines[3], "ROUND 2 START");
    assert_eq!(lines.len(), 4);
}

#[test]
fn each_round_stands_alone() {
    // Diagnostics never accumulate across rounds.
    let run = run_scenario_in(DELETE_RESTORE, BuildMode::Watch).unwrap();
    assert!(run.reports[2].diagnostics.is_empty());
    assert!(!run.reports[2].has_errors());
}

#[test]
fn upward_import_recovers_in_both_modes() {
    for mode in [BuildMode::Watch, BuildMode::Batch] {
        let run = run_scenario_in(DELETE_RESTORE_UPWARD, mode).unwrap();
        assert_eq!(run.codes(), vec![vec![], vec![2307], vec![]], "{mode:?}");
    }
}

#[test]
fn restore_outside_importer_directory_is_noticed() {
    let run = run_scenario_in(DELETE_RESTORE_UPWARD, BuildMode::Watch).unwrap();
    assert_eq!(run.reports[2].notifications, 1);
}
