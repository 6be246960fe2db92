use linelog::{
    banner, debug, error, fatal, info, info_group, init_from_env, scope_time, set_level,
    set_show_file_line, set_show_thread_id, set_show_time, set_target, trace, warn, warn_group,
    Level, Target,
};

fn main() {
    // Initialize from environment (optional):
    //   LINELOG_LEVEL=debug LINELOG_COLOR=always LINELOG_SHOW_TID=1 LINELOG_SHOW_TIME=1
    set_level(Level::Trace); // runtime threshold
    set_target(Target::Stderr); // default
    set_show_file_line(true);
    set_show_thread_id(true);
    set_show_time(true);
    init_from_env();

    banner();

    trace!("hello {}", "world");
    debug!("hello {}", "world");
    info!("hello {}", "world");
    warn!("disk almost full: {}%", 92);
    error!("disk almost full: {}%", 92);
    fatal!("disk almost full: {}%", 92);

    warn_group!("startup", "low entropy seed; continuing anyway");

    scope_time!("pretend work", {
        std::thread::sleep(std::time::Duration::from_millis(50));
    });

    info_group!("net", "retry in {} ms", 200);
    error!("something went {}", "sideways");
}
