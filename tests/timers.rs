mod helpers;
use helpers::*;
use linelog::timer::TIMER_SLOTS;
use linelog::{end_time, start_time, Level};

fn has_unit(l: &str) -> bool {
    l.contains(" ns]:") || l.contains(" µs]:") || l.contains(" ms]:") || l.contains(" s]:")
}

#[test]
fn start_end_reports_duration_once() {
    let _g = test_lock().lock().unwrap();
    reset_runtime();
    let buf = attach_mem_sink();

    start_time!("db-open");
    std::thread::sleep(std::time::Duration::from_millis(2));
    end_time!("db-open");

    let lines = lines_from(&buf);
    if linelog::ct_enabled(Level::Debug) {
        assert_eq!(lines.len(), 1);
        let l = &lines[0];
        assert!(l.contains("[DEBUG]"), "duration reports at DEBUG: {l}");
        assert!(l.contains("[timer]"), "timer records carry the group: {l}");
        assert!(l.ends_with("]: db-open"), "label follows the duration: {l}");
        assert!(has_unit(l), "one of the four unit forms: {l}");
    } else {
        assert!(lines.is_empty());
    }
}

#[test]
fn end_without_start_warns() {
    let _g = test_lock().lock().unwrap();
    reset_runtime();
    let buf = attach_mem_sink();

    end_time!("never-started");

    let lines = lines_from(&buf);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[WARN]"));
    assert!(lines[0].contains("end_time for unknown label: never-started"));
    assert!(!has_unit(&lines[0]), "no duration report for a missed pairing");
}

#[test]
fn slot_exhaustion_warns_and_skips_the_start() {
    let _g = test_lock().lock().unwrap();
    reset_runtime();
    let buf = attach_mem_sink();

    for i in 0..TIMER_SLOTS {
        start_time!(&format!("t{i}"));
    }
    assert!(lines_from(&buf).is_empty(), "filling the table is silent");

    start_time!("one-too-many");
    let lines = lines_from(&buf);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[WARN]") && lines[0].contains("no free timer slots"));

    // the overflowing label never started, so ending it is a miss
    end_time!("one-too-many");
    let lines = lines_from(&buf);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("unknown label: one-too-many"));
}

#[test]
fn restarting_a_label_reuses_its_slot() {
    let _g = test_lock().lock().unwrap();
    reset_runtime();
    let buf = attach_mem_sink();

    start_time!("retry");
    start_time!("retry"); // restart, same slot
    end_time!("retry");
    end_time!("retry"); // slot already freed

    let lines = lines_from(&buf);
    let warns = lines.iter().filter(|l| l.contains("[WARN]")).count();
    let debugs = lines.iter().filter(|l| l.contains("[DEBUG]")).count();
    if linelog::ct_enabled(Level::Debug) {
        assert_eq!(debugs, 1, "restart must not allocate a second slot");
    }
    assert_eq!(warns, 1, "second end has nothing left to match");
}

#[test]
fn timer_records_carry_the_call_site() {
    let _g = test_lock().lock().unwrap();
    reset_runtime();
    let buf = attach_mem_sink();

    start_time!("here");
    end_time!("here");

    if linelog::ct_enabled(Level::Debug) {
        let lines = lines_from(&buf);
        assert!(lines[0].contains("<timers.rs:"), "call site of the end_time! call: {}", lines[0]);
    }
}
