//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{self, DocumentFormat};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{self, RenderStyle, Settings};
use crate::domain::{CompositeNode, SearchFlags};
use crate::tree_traits::TreeNodeConvert;

/// Loads settings and runs the selected command against stdout.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        ));
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let local_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| CliError::InvalidArgs(format!("current directory: {}", e)))?,
    };
    let settings = Settings::load(Some(&local_dir))?;
    if !settings.color {
        output::disable_colors();
    }
    debug!(?settings, "settings loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(command, &settings, &local_dir, &mut out)
}

/// Command line switch pair over a settings default; the last given switch wins.
fn resolve_flag(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

/// Runs one command, writing its output to `out`.
///
/// `local_dir` is the directory whose `.dagnode.toml` was considered.
#[instrument(level = "debug", skip(settings, out))]
pub fn dispatch(
    command: &Commands,
    settings: &Settings,
    local_dir: &Path,
    out: &mut impl Write,
) -> CliResult<()> {
    match command {
        Commands::Show { document, style } => {
            show(document, style.unwrap_or(settings.render), out)
        }
        Commands::Find {
            document,
            pattern,
            ignore_case,
            no_ignore_case,
        } => {
            let flags = SearchFlags::NONE.case_insensitive(resolve_flag(
                *ignore_case,
                *no_ignore_case,
                settings.case_insensitive,
            ));
            let root = application::load_tree(document)?;
            let found = application::find_by_name(&root, pattern, flags)?;
            write_nodes(&found, out)
        }
        Commands::Family {
            document,
            pattern,
            ignore_case,
            no_ignore_case,
        } => {
            let flags = SearchFlags::NONE.case_insensitive(resolve_flag(
                *ignore_case,
                *no_ignore_case,
                settings.case_insensitive,
            ));
            let root = application::load_tree(document)?;
            let found = application::find_by_family(&root, pattern, flags)?;
            write_nodes(&found, out)
        }
        Commands::Sort {
            document,
            attribute,
            reverse,
            no_reverse,
            json,
        } => {
            let root = application::load_tree(document)?;
            application::sort_tree(
                &root,
                attribute.as_deref(),
                resolve_flag(*reverse, *no_reverse, settings.reverse_order),
            );
            if *json {
                let rendered = application::render_document(&root, DocumentFormat::Json)?;
                writeln!(out, "{}", rendered)?;
                Ok(())
            } else {
                render(&root, settings.render, out)
            }
        }
        Commands::Attributes { document, name } => {
            let root = application::load_tree(document)?;
            let listing = application::attributes_of(&root, name)?;
            writeln!(out, "{}", output::header(&listing.node))?;
            for (key, value) in &listing.attributes {
                writeln!(out, "{}", output::detail(key, value))?;
            }
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                write!(out, "{}", settings.to_toml()?)?;
                Ok(())
            }
            ConfigCommands::Path => {
                match config::global_config_path() {
                    Some(path) => writeln!(out, "global: {}", path.display())?,
                    None => writeln!(out, "global: <unavailable>")?,
                }
                writeln!(out, "local:  {}", config::local_config_path(local_dir).display())?;
                Ok(())
            }
        },
        Commands::Completion { .. } => Err(CliError::InvalidArgs(
            "completion writes to stdout only".to_string(),
        )),
    }
}

fn show(document: &Path, style: RenderStyle, out: &mut impl Write) -> CliResult<()> {
    let root = application::load_tree(document)?;
    render(&root, style, out)
}

fn render(root: &CompositeNode, style: RenderStyle, out: &mut impl Write) -> CliResult<()> {
    match style {
        RenderStyle::List => write!(out, "{}", root.list_node())?,
        RenderStyle::Tree => write!(out, "{}", root.to_tree_string())?,
    }
    Ok(())
}

fn write_nodes(nodes: &[CompositeNode], out: &mut impl Write) -> CliResult<()> {
    if nodes.is_empty() {
        output::warning("no matching nodes");
    }
    for node in nodes {
        writeln!(
            out,
            "{}",
            output::node_line(&node.name(), node.family().as_str(), node.identity().get())
        )?;
    }
    Ok(())
}
