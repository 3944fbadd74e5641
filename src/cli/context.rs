use std::io;

use thiserror::Error;

use crate::{
    cli::{commands, output, registry::CommandRegistry},
    config::{Config, ConfigManager},
    core::services::{LedgerService, ServiceError},
    currency::AmountFormat,
    errors::LedgerError,
    ledger::TenantId,
    remarks::RemarkTagger,
    storage::{json_backend::StoragePaths, JsonLedgerStore},
    utils::paths::app_data_dir,
};

const FALLBACK_TENANT: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Error surfaced by the binary entry point.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// State shared by every command of one shell session.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) service: LedgerService,
    pub(crate) tenant: TenantId,
    pub(crate) tagger: RemarkTagger,
    pub(crate) amounts: AmountFormat,
    pub(crate) registry: CommandRegistry,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let store =
            JsonLedgerStore::with_retention(StoragePaths::under(&base), config.backup_retention)?;
        let tenant = TenantId::new(config.default_tenant.as_deref().unwrap_or(FALLBACK_TENANT))?;
        let tagger = RemarkTagger::new(config.vocabulary())?;
        let amounts = AmountFormat::from_config(&config);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            config_manager,
            config,
            service: LedgerService::new(Box::new(store)),
            tenant,
            tagger,
            amounts,
            registry,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub(crate) fn prompt(&self) -> String {
        format!("school-ledger [{}]> ", self.tenant)
    }

    /// Re-derives everything that depends on the configuration.
    pub(crate) fn apply_config(&mut self, config: Config) -> Result<(), CommandError> {
        self.tagger = RemarkTagger::new(config.vocabulary())?;
        self.amounts = AmountFormat::from_config(&config);
        self.config_manager.save(&config)?;
        self.config = config;
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            output::warning(format!("Unknown command `{command}`."));
            if let Some(best) = self.registry.suggest(command) {
                output::hint(format!("Did you mean `{best}`?"));
            }
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}
