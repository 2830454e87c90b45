// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules into the one-shot upload flow.
//
// Module responsibilities:
// - `config`: Resolves and validates the run-time values (input file,
//   endpoint URL, license token) from flags, environment and config file.
// - `api`: Encapsulates the HTTP interaction — one blocking POST of the
//   file bytes with the two headers the upload endpoint expects.
//
// Keeping this separation lets the integration tests exercise the upload
// path against a local mock server without going through the binary.
pub mod api;
pub mod config;
