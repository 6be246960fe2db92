use linelog::{end_time, info, scope_time, set_level, start_time, Level};

fn parse(input: &str) -> usize {
    scope_time!("parse");
    input.split_whitespace().count()
}

fn main() {
    set_level(Level::Trace);

    // explicit start/end pairing
    start_time!("load config");
    std::thread::sleep(std::time::Duration::from_millis(3));
    end_time!("load config");

    // scoped form; the report fires when the guard drops
    let words = parse("a few words to count");
    info!("parsed {words} words");

    // mismatched end: reported as a warning, not an error
    end_time!("never started");
}
