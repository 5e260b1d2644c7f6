use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use fintrack_config::{Config, ConfigManager};
use shell_words::split;
use tracing::debug;

use crate::{
    app::FinanceApp,
    cli::commands::{CliContext, LoopControl},
    cli::output,
    errors::AppError,
};

/// Flags accepted before the command name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    /// Command and its arguments; empty means read commands from stdin.
    pub command: Vec<String>,
}

impl GlobalOptions {
    pub fn parse(args: Vec<String>) -> Result<Self, AppError> {
        let mut options = GlobalOptions::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--user" => options.user = Some(required_value(&mut iter, "--user")?),
                "--data-dir" => {
                    options.data_dir = Some(PathBuf::from(required_value(&mut iter, "--data-dir")?))
                }
                _ => {
                    options.command.push(arg);
                    options.command.extend(iter);
                    break;
                }
            }
        }
        Ok(options)
    }
}

fn required_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, AppError> {
    iter.next()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("`{flag}` needs a value")))
}

/// Runs one command from `args`, or every line of stdin when no command is given.
pub fn run_cli(args: Vec<String>) -> Result<(), AppError> {
    let options = GlobalOptions::parse(args)?;
    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let config_home = Config::default().resolve_data_root();
    let config_manager = ConfigManager::with_base_dir(config_home);
    let config = config_manager.load()?;
    crate::init_with_filter(config.log_filter.as_deref());

    let data_root = options
        .data_dir
        .clone()
        .unwrap_or_else(|| config.resolve_data_root());
    let user = options.user.as_deref().or_else(|| config.user_scope());
    debug!(data_root = %data_root.display(), user = ?user, "starting finance session");

    let app = FinanceApp::open_json(data_root.clone(), user)?;
    let mut context = CliContext::new(app, config, config_manager, data_root);

    match options.command.split_first() {
        Some((command, rest)) => {
            context.dispatch(&command.to_lowercase(), rest)?;
            Ok(())
        }
        None => run_script(&mut context),
    }
}

fn run_script(context: &mut CliContext) -> Result<(), AppError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => output::error(err),
        }
    }
    Ok(())
}

fn handle_line(context: &mut CliContext, line: &str) -> Result<LoopControl, AppError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = split(trimmed).map_err(|err| AppError::InvalidInput(err.to_string()))?;
    match tokens.split_first() {
        Some((command, args)) => context.dispatch(&command.to_lowercase(), args),
        None => Ok(LoopControl::Continue),
    }
}
