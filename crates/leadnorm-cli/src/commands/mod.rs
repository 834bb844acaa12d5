use anyhow::Result;
use leadnorm_config::AppConfig;
use leadnorm_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod canon;
pub mod completions;
pub mod config;
pub mod import;
pub mod prompt;
pub mod run;
pub mod show;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
