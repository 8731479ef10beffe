use env_logger::Env;

/// Routes `log` records to stderr at info level unless `RUST_LOG` says otherwise.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .try_init();
}
