#[test]
fn writer_target_without_sink_does_not_panic() {
    linelog::set_target(linelog::Target::Writer);
    linelog::set_show_time(false);
    linelog::set_show_thread_id(false);
    linelog::info!("no-sink");
}
