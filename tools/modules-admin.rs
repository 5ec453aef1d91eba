//! Administer GraphQL API modules from the command line
//!
//! Reads one snapshot of the persisted state per invocation, prints effective
//! states and settings, and writes flags and settings through the state file.
//!
//! Usage:
//!   modules-admin [--config <path>] list [--category <category>] [--all]
//!   modules-admin status
//!   modules-admin setting <module> <key>
//!   modules-admin enable <module>
//!   modules-admin disable <module>
//!   modules-admin set <module> <key> <value>
//!   modules-admin reset <module> <key>
//!   modules-admin check

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use graphql_api_modules::module::settings::resolver;
use graphql_api_modules::utils::init_logging_from_config;
use graphql_api_modules::{
    EngineConfig, ModuleCategory, ModuleRegistry, ModuleState, SnapshotSource,
};

#[derive(Parser, Debug)]
#[command(name = "modules-admin")]
#[command(about = "Inspect and toggle GraphQL API modules")]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, short, env = "MODULES_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List modules by category
    List {
        /// Only this category (e.g. "endpoint", "access-control")
        #[arg(long)]
        category: Option<ModuleCategory>,

        /// Include hidden modules
        #[arg(long)]
        all: bool,
    },

    /// Effective state of every module
    Status,

    /// Effective value of one setting
    Setting { module: String, key: String },

    /// Persist the module's flag as on
    Enable { module: String },

    /// Persist the module's flag as off
    Disable { module: String },

    /// Persist a setting value
    Set {
        module: String,
        key: String,
        value: String,
    },

    /// Remove a persisted setting value
    Reset { module: String, key: String },

    /// Verify the catalogs and print the dependency order
    Check,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path),
        None => Ok(EngineConfig::default()),
    }
}

fn describe(state: &ModuleState) -> String {
    match state {
        ModuleState::Active => "active".to_string(),
        ModuleState::Disabled => "disabled".to_string(),
        ModuleState::Unsatisfied(group) => format!("inactive, requires {}", group),
    }
}

fn print_state(registry: &ModuleRegistry, config: &EngineConfig, module: &str) -> anyhow::Result<()> {
    let snapshot = config.state_store().snapshot()?;
    let mut pass = registry.resolution_pass(&snapshot.flags);
    let state = pass.state(module)?;
    println!("{}: {}", module, describe(&state));

    for dependent in registry.dependents_of(module)? {
        let dependent_state = pass.state(dependent.id().as_str())?;
        println!("  required by {}: {}", dependent.id(), describe(&dependent_state));
    }
    for warning in pass.warnings() {
        println!("warning: {}", warning);
    }
    Ok(())
}

fn run(cli: Cli, config: EngineConfig) -> anyhow::Result<()> {
    let registry = config.build_registry()?;
    let mut store = config.state_store();

    match cli.command {
        Command::List { category, all } => {
            let snapshot = store.snapshot()?;
            let report = registry.resolve_all(&snapshot.flags)?;
            let categories: Vec<ModuleCategory> = match category {
                Some(category) => vec![category],
                None => ModuleCategory::ALL.to_vec(),
            };

            for category in categories {
                let modules = if all {
                    registry.list_by_category(category)
                } else {
                    registry.list_visible_by_category(category)
                };
                if modules.is_empty() {
                    continue;
                }
                println!("{}", category);
                for module in modules {
                    let mark = if report.is_active(module.id().as_str()) == Some(true) {
                        "x"
                    } else {
                        " "
                    };
                    println!("  [{}] {} ({})", mark, module.name(), module.id());
                }
            }
        }

        Command::Status => {
            let snapshot = store.snapshot()?;
            let report = registry.resolve_all(&snapshot.flags)?;
            for (module, state) in &report.states {
                println!("{:<72} {}", module, describe(state));
            }
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
        }

        Command::Setting { module, key } => {
            let snapshot = store.snapshot()?;
            let active = registry.is_active(&module, &snapshot.flags)?;
            let resolved = registry.resolve_setting(&module, &key, &snapshot.settings, active)?;
            let option = registry.get(&module)?.id().setting_option_name(&key);
            println!("{}.{}: {:?}", module, key, resolved);
            if let Some(value) = resolved.or_global(&config.global_settings, &option) {
                println!("effective value: {}", value);
            }
        }

        Command::Enable { module } => {
            registry.set_enabled(&mut store, &module, true)?;
            print_state(&registry, &config, &module)?;
        }

        Command::Disable { module } => {
            registry.set_enabled(&mut store, &module, false)?;
            print_state(&registry, &config, &module)?;
        }

        Command::Set { module, key, value } => {
            let definition = resolver::definition(registry.get(&module)?, &key)?;
            let value = definition
                .parse_input(&value)
                .with_context(|| format!("Invalid value for {}.{}", module, key))?;
            registry.set_setting(&mut store, &module, &key, value)?;
            println!("{}.{} updated", module, key);
        }

        Command::Reset { module, key } => {
            registry.reset_setting(&mut store, &module, &key)?;
            println!("{}.{} reset to default", module, key);
        }

        Command::Check => {
            let analysis = registry.verify()?;
            println!("{} modules, dependency order:", registry.len());
            for module in &analysis.order {
                println!("  {}", module);
            }
            if !analysis.is_acyclic() {
                println!("modules on dependency cycles:");
                for module in &analysis.cyclic {
                    println!("  {}", module);
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging_from_config(config.logging.as_ref());

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
