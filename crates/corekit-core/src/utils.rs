//! Shared utility functions for corekit crates

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over `dirs::home_dir()` so that
/// test harnesses and CI runners can redirect it.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or(Error::HomeDirNotFound)
}

/// Render a command line for logs and error messages
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_home_dir_from_env() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }

    #[test]
    fn test_display_command_quotes_spaced_args() {
        let args = vec![
            "-c".to_string(),
            "init; reset halt".to_string(),
            String::new(),
        ];
        assert_eq!(
            display_command("openocd", &args),
            "openocd -c \"init; reset halt\" \"\""
        );
    }
}
