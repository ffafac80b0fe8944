use std::io::stdout;
use std::panic::PanicHookInfo;
use std::sync::OnceLock;

use color_eyre::{config::PanicHook, Result};
use crossterm::{cursor, terminal::LeaveAlternateScreen};
use tracing::error;

static HOOKS: OnceLock<()> = OnceLock::new();

/// Install the color-eyre report hook and a panic handler.
///
/// The panic handler leaves raw mode before printing anything, logs the report with
/// ANSI codes stripped and exits with a failure status. Calling this twice is a no-op.
pub fn init() -> Result<()> {
    if HOOKS.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("The signup form crashed. The log file in the data directory has details.")
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        report(&panic_hook, info);
        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = HOOKS.set(());
    Ok(())
}

/// Leave the alternate screen without touching the event task; the runtime may be gone.
fn restore_terminal() {
    if crossterm::terminal::is_raw_mode_enabled().unwrap_or(false) {
        if let Err(err) = crossterm::execute!(stdout(), LeaveAlternateScreen, cursor::Show) {
            error!("Unable to leave alternate screen: {err:?}");
        }
        if let Err(err) = crossterm::terminal::disable_raw_mode() {
            error!("Unable to disable raw mode: {err:?}");
        }
    }
}

fn report(panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    let msg = format!("{}", panic_hook.panic_report(info));
    error!("Error: {}", strip_ansi_escapes::strip_str(&msg));

    #[cfg(not(debug_assertions))]
    {
        use human_panic::{handle_dump, metadata, print_msg};
        let metadata = metadata!();
        let file_path = handle_dump(&metadata, info);
        // stderr may already be closed
        let _ = print_msg(file_path, &metadata);
        eprintln!("{msg}");
    }

    #[cfg(debug_assertions)]
    {
        better_panic::Settings::auto()
            .most_recent_first(false)
            .lineno_suffix(true)
            .verbosity(better_panic::Verbosity::Full)
            .create_panic_handler()(info);
    }
}
