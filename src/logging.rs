use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "pocket-desk";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 10;
pub const ENV_LOG_SPEC: &str = "POCKET_DESK_LOG";

/// Log files live next to the data files.
pub fn log_directory(data_dir: &Path) -> &Path {
    data_dir
}

/// `POCKET_DESK_LOG`, then `RUST_LOG`, then the build default.
pub fn log_spec(env: impl Fn(&str) -> Option<String>) -> String {
    let default_spec = if cfg!(debug_assertions) {
        "warn,pocket_desk_lib=debug,pocket_desk=debug"
    } else {
        "warn,pocket_desk_lib=info,pocket_desk=info"
    };
    env(ENV_LOG_SPEC)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env("RUST_LOG").filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| default_spec.to_string())
}

#[cfg(all(feature = "app", not(test)))]
pub fn init_logging(data_dir: &Path) -> Result<flexi_logger::LoggerHandle, flexi_logger::FlexiLoggerError> {
    use flexi_logger::{detailed_format, Cleanup, Criterion, FileSpec, Logger, Naming, WriteMode};

    std::fs::create_dir_all(data_dir)?;

    let spec = log_spec(|name| std::env::var(name).ok());

    // The console is the UI, so logs only ever go to files.
    let handle = Logger::try_with_str(spec)?
        .log_to_file(
            FileSpec::default()
                .directory(log_directory(data_dir))
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .start()?;

    install_panic_hook();

    log::info!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        log_directory(data_dir).display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(handle)
}

#[cfg(all(feature = "app", not(test)))]
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");
        let location = info
            .location()
            .map(|loc| format!("{loc}"))
            .unwrap_or_else(|| "<unknown>".to_string());
        log::error!("panic: payload={payload} location={location}");
        default_hook(info);
    }));
}
