use anyhow::Error;
use leadnorm_config::ConfigError;
use leadnorm_core::{CoreError, ParseError};
use leadnorm_generate::GenerateError;
use leadnorm_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

use crate::runner::RunError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(run_err) = cause.downcast_ref::<RunError>() {
            return ExitCode::from(match run_err {
                RunError::Settings(_) => EXIT_INVALID_INPUT,
                RunError::Scan(store_err) => store_exit_code(store_err),
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(generate_err) = cause.downcast_ref::<GenerateError>() {
            return ExitCode::from(generate_exit_code(generate_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(_parse_err) = cause.downcast_ref::<ParseError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(_json_err) = cause.downcast_ref::<serde_json::Error>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::InvalidId | StoreErrorKind::InvalidDataPath | StoreErrorKind::Core => {
            EXIT_INVALID_INPUT
        }
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::InvalidData
        | StoreErrorKind::Migration
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidValue { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn generate_exit_code(err: &GenerateError) -> u8 {
    match err {
        GenerateError::MissingApiKey(_) | GenerateError::Unavailable(_) => EXIT_INVALID_INPUT,
        GenerateError::EmptyResponse
        | GenerateError::Status { .. }
        | GenerateError::Decode(_) => EXIT_FAILURE,
        #[cfg(feature = "http-generation")]
        GenerateError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "http-generation")]
        GenerateError::Url(_) => EXIT_INVALID_INPUT,
    }
}
