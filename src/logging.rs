use std::path::PathBuf;

use flexi_logger::{style, FlexiLoggerError, Level};

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Fallback log spec if `RUST_LOG` is not set, e.g. `debug` or `simbot_report=trace`.
    pub spec: String,
    /// Also write to a file in `directory`.
    pub write_logs: bool,
    /// One timestamped file per run instead of overwriting `simbot.log`.
    pub persist_logs: bool,
    pub directory: PathBuf,
}

fn reduced_colored_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &flexi_logger::Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(
        w,
        "{} {:<5} {} {} {}",
        now.now().format("%H:%M:%S"),
        style(level, level),
        record.module_path().unwrap_or("<unnamed>"),
        style(level, ">"),
        &record.args(),
    )
}

fn fully_colored_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &flexi_logger::Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    let part1 = format!("{} {:<5} {} > ",
        now.now().format("%H:%M:%S"),
        level,
        record.module_path().unwrap_or("<unnamed>"),
    );
    write!(w, "{}{}",
        style(level, part1),
        style(level, &record.args()),
    )
}

fn colored_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &flexi_logger::Record,
) -> Result<(), std::io::Error> {
    match record.level() {
        Level::Error | Level::Warn => fully_colored_format(w, now, record),
        Level::Info | Level::Debug => reduced_colored_format(w, now, record),
        Level::Trace => fully_colored_format(w, now, record),
    }
}

fn file_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &flexi_logger::Record,
 ) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} - {} - {:<5} - {}",
        now.now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.module_path().unwrap_or("<unnamed>"),
        record.level(),
        &record.args(),
    )
}

pub fn init_logging(opts: &LogOptions) -> Result<(), FlexiLoggerError> {
    let mut logger = flexi_logger::Logger::with_env_or_str(&opts.spec)
        .set_palette("196;208;120;141;241".to_string()) // https://jonasjacek.github.io/colors/
        .format_for_stderr(colored_format)
        .format_for_stdout(colored_format);

    if opts.write_logs {
        logger = logger
            .print_message()
            .log_to_file()
            .format_for_files(file_format)
            .duplicate_to_stderr(flexi_logger::Duplicate::All)
            .directory(opts.directory.clone())
            .basename("simbot");
        if !opts.persist_logs {
            // fixed name, truncated on every start.
            logger = logger.suppress_timestamp();
        }
    }

    logger.start()?;

    // also log panics
    std::panic::set_hook(Box::new(|panic_info| {
        error!(target: "PANIC", "{}", panic_info);
    }));

    Ok(())
}
