// Entrypoint for the CLI application.
// - Keeps `main` small: resolve config, read the file, perform the single
//   upload and print the bracket-delimited response body.
// - Returns `anyhow::Result` so failures print as `Error: ...` on stderr
//   and exit with status 1.

use clap::Parser;
use trackup_cli::api::{read_file_bytes, upload_filename, ApiClient};
use trackup_cli::config::{Args, Config};

fn main() -> anyhow::Result<()> {
    // Log lines go to stderr so stdout carries exactly the response body.
    // Quiet by default; RUST_LOG=trackup_cli=info turns on detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackup_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::resolve(Args::parse())?;

    // Read before any network work: a missing file must never produce a
    // request on the wire.
    let bytes = read_file_bytes(&config.file_path)?;
    let filename = upload_filename(&config.file_path).to_string();

    let api = ApiClient::new(&config)?;
    match api.upload(bytes, &filename) {
        Ok(body) => println!("[{body}]"),
        Err(err) if config.best_effort => eprintln!("Error: {err:#}"),
        Err(err) => return Err(err),
    }
    Ok(())
}
