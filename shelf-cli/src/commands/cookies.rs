use std::collections::BTreeMap;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_lib::Library;

use crate::cli_types::CookieAction;
use crate::error::CliError;

fn mask_value(s: &str) -> String {
    match s.get(..2) {
        Some(prefix) if s.len() > 2 => format!("{prefix}****"),
        _ => "****".to_string(),
    }
}

pub(crate) async fn run_cookies(library: &mut Library, action: CookieAction) -> Result<(), CliError> {
    match action {
        CookieAction::List => {
            if library.cookies().is_empty() {
                log::info!("{}", "No cookies stored.".if_supports_color(Stdout, |t| t.dimmed()));
            }
            for (key, value) in library.cookies() {
                log::info!(
                    "  {} = {}",
                    key.if_supports_color(Stdout, |t| t.bold()),
                    mask_value(value),
                );
            }
        }
        CookieAction::Set { pairs } => {
            let cookies: BTreeMap<String, String> = pairs.into_iter().collect();
            let count = cookies.len();
            library.update_cookies(cookies).await?;
            log::info!("Stored {count} cookies");
        }
        CookieAction::Clear => {
            library.update_cookies(BTreeMap::new()).await?;
            log::info!("Cleared cookies");
        }
    }
    Ok(())
}
