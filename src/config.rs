//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "widget-timer")]
#[command(about = "A home-screen countdown widget daemon")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File the per-widget preferences are kept in
    #[arg(long, default_value = "widget-timer-prefs.json")]
    pub prefs: PathBuf,

    /// Command played when a countdown reaches zero, e.g. `paplay alarm.oga`
    #[arg(long, num_args = 1.., value_name = "PROGRAM [ARGS]...")]
    pub alarm_command: Vec<String>,

    /// Track wake locks in-process instead of calling systemd-inhibit
    #[arg(long)]
    pub no_inhibit: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["widget-timer"]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.prefs, PathBuf::from("widget-timer-prefs.json"));
        assert!(config.alarm_command.is_empty());
        assert!(!config.no_inhibit);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_alarm_command_takes_arguments() {
        let config = Config::parse_from([
            "widget-timer",
            "--verbose",
            "--no-inhibit",
            "--alarm-command",
            "paplay",
            "/usr/share/sounds/alarm.oga",
        ]);
        assert_eq!(config.alarm_command, vec!["paplay", "/usr/share/sounds/alarm.oga"]);
        assert!(config.no_inhibit);
        assert_eq!(config.log_level(), "debug");
    }
}
