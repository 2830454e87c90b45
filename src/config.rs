// Configuration layer: resolves the three run-time values the uploader
// needs (input file path, endpoint URL, license token) from command-line
// flags, environment variables and an optional JSON config file, and
// validates them before any file or network I/O happens.

use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::Password;
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;

/// Upload endpoint used when neither a flag, an environment variable nor
/// a config file names one.
pub const DEFAULT_ENDPOINT: &str = "https://www.lalal.ai/api/upload/";

const ENDPOINT_ENV: &str = "TRACKUP_ENDPOINT";
const LICENSE_ENV: &str = "TRACKUP_LICENSE";

/// Command-line arguments. Every value can also come from the environment
/// or a config file; flags win over both.
#[derive(Parser, Debug)]
#[command(name = "trackup", version, about = "Upload one audio file to the upload API and print the raw response")]
pub struct Args {
    /// Audio file to upload.
    pub file: Option<PathBuf>,

    /// Upload endpoint URL (falls back to $TRACKUP_ENDPOINT, the config
    /// file, then the built-in default).
    #[arg(long)]
    pub url: Option<String>,

    /// License token for the Authorization header (falls back to
    /// $TRACKUP_LICENSE, the config file, then ~/.trackup_license).
    #[arg(long)]
    pub token: Option<String>,

    /// JSON config file with optional file_path, endpoint_url, auth_token.
    #[arg(short, long)]
    pub config_path: Option<PathBuf>,

    /// Report upload failures without failing the process: exit 0 even
    /// when the request itself fails. File errors still exit 1.
    #[arg(long)]
    pub best_effort: bool,
}

/// Shape of the optional JSON config file.
#[derive(Deserialize, Debug, Default)]
pub struct ConfigFile {
    pub file_path: Option<PathBuf>,
    pub endpoint_url: Option<String>,
    pub auth_token: Option<String>,
}

/// Fully resolved, validated configuration for one run.
#[derive(Debug)]
pub struct Config {
    pub file_path: PathBuf,
    pub endpoint_url: Url,
    pub auth_token: String,
    pub best_effort: bool,
}

impl Config {
    /// Merge flags, environment, config file and the home-directory token
    /// file into a validated `Config`. Prompts for the token as a last
    /// resort so a bare `trackup song.mp3` still works interactively.
    pub fn resolve(args: Args) -> Result<Self> {
        let file = match &args.config_path {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        };

        let file_path = args
            .file
            .or(file.file_path)
            .context("No input file given; pass a path or set file_path in the config file")?;
        if file_path.as_os_str().is_empty() {
            bail!("Input file path is empty");
        }

        let endpoint = args
            .url
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .or(file.endpoint_url)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint_url = Url::parse(&endpoint)
            .with_context(|| format!("Invalid endpoint URL: {endpoint}"))?;

        let auth_token = match args
            .token
            .or_else(|| std::env::var(LICENSE_ENV).ok())
            .or(file.auth_token)
            .or_else(|| load_license().ok())
        {
            Some(token) => token.trim().to_string(),
            None => prompt_license()?,
        };
        if auth_token.is_empty() {
            bail!("License token is empty");
        }

        Ok(Config {
            file_path,
            endpoint_url,
            auth_token,
            best_effort: args.best_effort,
        })
    }
}

fn read_config_file(path: &PathBuf) -> Result<ConfigFile> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read config file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

/// Load a previously saved license token from the user's home directory.
fn load_license() -> Result<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let data = std::fs::read_to_string(dir.join(".trackup_license"))?;
    Ok(data.trim().to_string())
}

/// Save the license token so future runs can skip the prompt.
fn persist_license(token: &str) -> Result<()> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    std::fs::write(dir.join(".trackup_license"), token)?;
    Ok(())
}

/// Ask for the token interactively. `Password` keeps the input hidden in
/// the terminal since the token is a credential.
fn prompt_license() -> Result<String> {
    let token = Password::new()
        .with_prompt("License token")
        .interact()
        .context("No license token given and prompting failed")?;
    let token = token.trim().to_string();
    if !token.is_empty() {
        if let Err(err) = persist_license(&token) {
            tracing::debug!("could not persist license token: {err}");
        }
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("trackup").chain(argv.iter().copied()))
    }

    #[test]
    fn flags_resolve_directly() {
        let config = Config::resolve(args(&[
            "song.mp3",
            "--url",
            "http://localhost:9000/api/upload/",
            "--token",
            "abc123",
        ]))
        .unwrap();
        assert_eq!(config.file_path, PathBuf::from("song.mp3"));
        assert_eq!(config.endpoint_url.as_str(), "http://localhost:9000/api/upload/");
        assert_eq!(config.auth_token, "abc123");
        assert!(!config.best_effort);
    }

    #[test]
    fn endpoint_defaults_when_unset() {
        let config = Config::resolve(args(&["song.mp3", "--token", "abc123"])).unwrap();
        assert_eq!(config.endpoint_url.as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn token_is_trimmed() {
        let config = Config::resolve(args(&["song.mp3", "--token", " abc123\n"])).unwrap();
        assert_eq!(config.auth_token, "abc123");
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Config::resolve(args(&["song.mp3", "--token", "  "])).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = Config::resolve(args(&[
            "song.mp3",
            "--url",
            "not a url",
            "--token",
            "abc123",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint URL"));
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = Config::resolve(args(&["--token", "abc123"])).unwrap_err();
        assert!(err.to_string().contains("No input file"));
    }

    #[test]
    fn config_file_supplies_values() {
        let path = std::env::temp_dir().join(format!("trackup-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"file_path":"from-file.mp3","endpoint_url":"http://localhost:9000/api/upload/","auth_token":"filetoken"}"#,
        )
        .unwrap();

        let config = Config::resolve(args(&["--config-path", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.file_path, PathBuf::from("from-file.mp3"));
        assert_eq!(config.endpoint_url.as_str(), "http://localhost:9000/api/upload/");
        assert_eq!(config.auth_token, "filetoken");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn flags_win_over_config_file() {
        let path = std::env::temp_dir().join(format!("trackup-config-prec-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"file_path":"from-file.mp3","endpoint_url":"http://localhost:9000/api/upload/","auth_token":"filetoken"}"#,
        )
        .unwrap();

        let config = Config::resolve(args(&[
            "cli.mp3",
            "--config-path",
            path.to_str().unwrap(),
            "--url",
            "http://localhost:9001/api/upload/",
            "--token",
            "clitoken",
        ]))
        .unwrap();
        assert_eq!(config.file_path, PathBuf::from("cli.mp3"));
        assert_eq!(config.endpoint_url.as_str(), "http://localhost:9001/api/upload/");
        assert_eq!(config.auth_token, "clitoken");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unreadable_config_file_is_rejected() {
        let err = Config::resolve(args(&["--config-path", "/nonexistent/trackup.json"])).unwrap_err();
        assert!(err.to_string().contains("Unable to read config file"));
    }
}
