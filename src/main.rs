//! ReadmeGenius - Main Entry Point
//!
//! Command-line host for the README editor: preview rendering, toolbar
//! formatting, template creation and Markdown/HTML export.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use readme_genius::config::{load_config, save_config_silent, Settings};
use readme_genius::error::{Error, Result};
use readme_genius::export::ExportFormat;
use readme_genius::files::{is_markdown_file, load_markdown_file, write_artifact};
use readme_genius::markdown::{
    apply_format, render_with, SelectionRange, ToolbarCommand, ValuePrompt, TOOLBAR,
};
use readme_genius::state::{EditorSession, DEFAULT_TEMPLATE};

/// Application name constant.
const APP_NAME: &str = "ReadmeGenius";

#[derive(Parser)]
#[command(name = "readme-genius")]
#[command(version, about = "Write, preview and export README files", long_about = None)]
#[command(after_help = "EXAMPLES:
    readme-genius new README.md                       Start from the template
    readme-genius render README.md -o preview.html    Render the preview fragment
    readme-genius format README.md --action h2 --start 0 --in-place
    readme-genius export README.md --format html      Write README.html")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown file to an HTML fragment (the live preview)
    Render {
        /// Markdown file to render
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Write the HTML here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Export a Markdown file as Markdown or a standalone HTML page
    Export {
        /// Markdown file to export
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Export format: md or html
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Directory to write the export into
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Base name of the exported file
        #[arg(long, value_name = "BASE")]
        name: Option<String>,
    },

    /// Apply a toolbar formatting action to a selection
    Format {
        /// Markdown file to edit
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Action name (see `readme-genius actions`)
        #[arg(short, long, value_name = "NAME")]
        action: ToolbarCommand,

        /// Selection start (byte offset)
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Selection end (byte offset); defaults to the start
        #[arg(long)]
        end: Option<usize>,

        /// URL for link and image actions; prompted for when omitted
        #[arg(long)]
        url: Option<String>,

        /// Write the result back to INPUT
        #[arg(long, conflicts_with = "json")]
        in_place: bool,

        /// Print the new text and selection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default README template
    New {
        /// Where to write the template
        #[arg(value_name = "PATH", default_value = "README.md")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the available formatting actions
    Actions,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = load_config();
    info!("Starting {}", APP_NAME);

    match run(cli.command, &mut settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: &mut Settings) -> Result<()> {
    match command {
        Command::Render { input, output } => render(&input, output.as_deref(), settings),
        Command::Export {
            input,
            format,
            out_dir,
            name,
        } => export(&input, format, out_dir, name, settings),
        Command::Format {
            input,
            action,
            start,
            end,
            url,
            in_place,
            json,
        } => {
            let selection = SelectionRange::new(start, end.unwrap_or(start));
            format(&input, action, selection, url, in_place, json, settings)
        }
        Command::New { path, force } => new_template(&path, force),
        Command::Actions => {
            list_actions();
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn render(input: &Path, output: Option<&Path>, settings: &mut Settings) -> Result<()> {
    let (_, content) = load_markdown_file(input)?;
    settings.add_recent_file(input.to_path_buf());
    save_config_silent(settings);

    let html = render_with(&content, &settings.markdown_options());
    match output {
        Some(path) => fs::write(path, html).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        }),
        None => {
            print!("{html}");
            Ok(())
        }
    }
}

fn export(
    input: &Path,
    format: Option<ExportFormat>,
    out_dir: Option<PathBuf>,
    name: Option<String>,
    settings: &mut Settings,
) -> Result<()> {
    let (file_name, content) = load_markdown_file(input)?;
    let mut session = EditorSession::from_settings(settings);
    session.load_uploaded(&file_name, content);
    if let Some(name) = name {
        session.set_export_base(&name);
    }

    let format = format.unwrap_or(settings.default_export_format);
    let artifact = session.export(format);

    let dir = out_dir
        .or_else(|| settings.export_directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = write_artifact(&dir, &artifact)?;

    settings.add_recent_file(input.to_path_buf());
    save_config_silent(settings);

    println!("{}", path.display());
    Ok(())
}

fn format(
    input: &Path,
    command: ToolbarCommand,
    selection: SelectionRange,
    url: Option<String>,
    in_place: bool,
    json: bool,
    settings: &Settings,
) -> Result<()> {
    let (_, content) = load_markdown_file(input)?;
    let action = command.action();

    let result = match url {
        Some(url) => apply_format(&content, selection, &action, &mut Some(url)),
        None => {
            let mut ask = |prompt: &ValuePrompt| prompt_stdin(prompt, settings);
            apply_format(&content, selection, &action, &mut ask)
        }
    };

    if !result.applied {
        info!("'{}' was cancelled, nothing changed", command.label());
    }

    if json {
        let out = serde_json::to_string_pretty(&result)?;
        println!("{out}");
    } else if in_place {
        if result.applied {
            fs::write(input, &result.text).map_err(|e| Error::FileWrite {
                path: input.to_path_buf(),
                source: e,
            })?;
        }
        println!("{} {}", result.selection.start, result.selection.end);
    } else {
        print!("{}", result.text);
    }
    Ok(())
}

fn new_template(path: &Path, force: bool) -> Result<()> {
    if !is_markdown_file(path) {
        return Err(Error::InvalidFileType {
            path: path.to_path_buf(),
        });
    }
    if path.exists() && !force {
        return Err(Error::Application(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    fs::write(path, DEFAULT_TEMPLATE).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Wrote template to {}", path.display());
    Ok(())
}

fn list_actions() {
    let mut commands = TOOLBAR.to_vec();
    commands.push(ToolbarCommand::Strikethrough);
    for command in commands {
        println!("{:<14} {}", command.name(), command.label());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompting
// ─────────────────────────────────────────────────────────────────────────────

/// Ask for a value on stderr/stdin.
///
/// An empty answer takes the default; end of input cancels.
fn prompt_stdin(prompt: &ValuePrompt, settings: &Settings) -> Option<String> {
    let default = settings.prompt_default(prompt);
    eprint!("{} [{}] ", prompt.message, default);
    let _ = io::stderr().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => match line.trim() {
            "" => Some(default.to_string()),
            answer => Some(answer.to_string()),
        },
    }
}
