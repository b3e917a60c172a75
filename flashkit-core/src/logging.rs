use std::path::PathBuf;

/// Initialize logging. When `log_file` is set, log lines go there; if the file
/// cannot be opened (permissions, readonly FS, etc.) we fall back to stderr
/// rather than aborting a flash over a log path.
pub fn init_with(log_file: Option<PathBuf>) {
    use env_logger::Target;

    let target = log_file
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| Target::Pipe(Box::new(file)))
        .unwrap_or(Target::Stderr);

    env_logger::Builder::from_default_env()
        .target(target)
        .filter_level(log::LevelFilter::Info)
        .init();
}
