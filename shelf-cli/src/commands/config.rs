use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_lib::Settings;
use shelf_lib::settings::{load_settings_string, settings_path};

/// Show the effective settings and where they came from.
pub(crate) fn run_config_show(settings: &Settings) {
    let path = settings_path();

    log::info!("{}", "Settings".if_supports_color(Stdout, |t| t.bold()));
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    log::info!("  Database:          {}", settings.database_path.display());
    log::info!("  Images:            {}", settings.images_path.display());
    log::info!("  Write queue:       {}", settings.write_queue_capacity);
    log::info!("  Timestamp format:  {}", settings.timestamp_format);
    log::info!("  Datestamp format:  {}", settings.datestamp_format);
    match &settings.default_exe_dir {
        Some(dir) => log::info!("  Executables under: {}", dir.display()),
        None => log::info!(
            "  Executables under: {}",
            "(not set)".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }

    match settings.display_tab {
        Some(tab) => log::info!("  Displayed tab:     {tab}"),
        None => log::info!(
            "  Displayed tab:     {}",
            "(main view)".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }

    if let Some(contents) = load_settings_string() {
        log::info!("");
        log::info!("{}", "File contents".if_supports_color(Stdout, |t| t.bold()));
        for line in contents.lines() {
            log::info!("  {line}");
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}
