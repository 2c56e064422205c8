//! Interactive mode for the server.
//!
//! Prompts for the bind address, port, data source and calendar offset,
//! starting from the environment configuration.

use dialoguer::{Confirm, Input};
use rescue_dashboard_query::clock::DashboardClock;

use crate::ServerError;
use crate::config::{ConfigError, ServerConfig};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the value from [`ServerConfig::from_env`], so
/// pressing enter throughout starts the same server the standalone binary
/// would.
///
/// # Errors
///
/// Returns [`ServerError`] if the entered port or offset is invalid, or if
/// the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("Kerala Rescue Dashboard Server");
    println!();

    let mut config = ServerConfig::from_env()?;

    config.bind_addr = prompt("Bind address", config.bind_addr);

    let port = prompt("Port", config.port.to_string());
    config.port = port
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort { value: port })?;

    config.data_source = prompt("Request table (path or URL)", config.data_source);

    let offset = prompt("Calendar UTC offset", config.clock.offset().to_string());
    config.clock = DashboardClock::from_offset_str(&offset).map_err(ConfigError::from)?;

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.bind_addr, config.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}

fn prompt(label: &str, default: String) -> String {
    let answer = Input::new()
        .with_prompt(label)
        .default(default.clone())
        .interact_text();
    answer_or_default(answer, label, default)
}

/// Falls back to `default` when the prompt could not be shown, e.g. when
/// stdin is not a terminal.
fn answer_or_default(answer: dialoguer::Result<String>, label: &str, default: String) -> String {
    answer.unwrap_or_else(|e| {
        log::warn!("{label} prompt failed ({e}); using '{default}'");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_prompt_falls_back_to_default() {
        let failed = Err(dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            "not a terminal",
        )));
        assert_eq!(answer_or_default(failed, "Port", "8080".to_owned()), "8080");
    }

    #[test]
    fn answered_prompt_is_kept() {
        assert_eq!(
            answer_or_default(Ok("9000".to_owned()), "Port", "8080".to_owned()),
            "9000"
        );
    }
}
