mod helpers;
use helpers::*;
use linelog::info;

#[test]
fn every_record_ends_with_exactly_one_newline() {
    let _g = test_lock().lock().unwrap();
    reset_runtime();
    let buf = attach_mem_sink();

    info!("line1");
    info!("line2");
    // a message that already carries its newline must not get a second one
    info!("line3\n");

    let bytes = buf.lock().unwrap().clone();
    assert!(!bytes.is_empty());
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 3);
    assert_eq!(*bytes.last().unwrap(), b'\n');

    let lines = lines_from(&buf);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("line1"));
    assert!(lines[1].ends_with("line2"));
    assert!(lines[2].ends_with("line3"));
}
