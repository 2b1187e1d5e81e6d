//! `ctrack` - CLI for coursetrack
//!
//! This binary plays the host page for one course page at a time: it loads
//! the page's sections from the store, delivers a single event and applies
//! the resulting updates on the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{debug, warn};

use coursetrack::backup::unescape_newlines;
use coursetrack::cli::{Cli, Command, ConfigCommand, EmphasisArg, PageArgs};
use coursetrack::nav::KeyPress;
use coursetrack::ui::FixedAnswer;
use coursetrack::{
    init_logging, Config, KeyValueStore, MemoryStore, Page, PageContext, PageLayout, Payload,
    Prompt, Role, Section, SectionStateManager, SqliteStore, Trigger, UiUpdate,
};

type HostPage = Page<Box<dyn KeyValueStore>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match &cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Stats(stats_cmd) => handle_stats(&config, stats_cmd.json),
        command => handle_page(&config, &cli.page, command),
    }
}

/// Terminal side of the page: where downloads go and who answers prompts.
struct Host {
    export_dir: PathBuf,
    prompt: Box<dyn Prompt>,
}

/// Asks on stdin; anything but `y` or `yes` declines.
struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    let path = config.database_path();
    match SqliteStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("Running without storage, nothing will persist: {e}");
            Box::new(MemoryStore::unavailable())
        }
    }
}

/// Sections named on the command line, then those with stored state.
fn page_sections(
    store: &dyn KeyValueStore,
    context: &PageContext,
    args: &PageArgs,
    target: Option<&str>,
) -> Vec<Section> {
    let mut ids = args.sections.clone();
    ids.extend(target.map(str::to_string));
    match store.keys() {
        Ok(keys) => ids.extend(context.section_ids_from_keys(keys)),
        Err(e) => warn!("Could not list stored sections: {e}"),
    }

    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    ids.into_iter().map(Section::new).collect()
}

fn handle_page(config: &Config, args: &PageArgs, command: &Command) -> anyhow::Result<()> {
    let store = open_store(config);
    let context = PageContext::new(args.page.clone(), args.title.clone());
    let sections = page_sections(store.as_ref(), &context, args, command.section());
    let manager = SectionStateManager::new(store, context, sections)
        .with_backup_suffix(config.export.file_suffix.clone());
    let mut page = Page::with_config(manager, PageLayout::sections_only(), config);

    for update in page.start() {
        debug!("Start: {update:?}");
    }

    let prompt: Box<dyn Prompt> = match command {
        Command::Clear(cmd) if cmd.yes => Box::new(FixedAnswer(true)),
        _ => Box::new(StdinPrompt),
    };
    let export_dir = match command {
        Command::Export(cmd) => cmd.output.clone(),
        _ => None,
    };
    let mut host = Host {
        export_dir: export_dir.unwrap_or_else(|| config.export_dir()),
        prompt,
    };

    if let Command::Status(status_cmd) = command {
        return print_status(&page, status_cmd.json);
    }

    for (role, trigger, payload) in events(command)? {
        let updates = page.dispatch(role, trigger, &payload, host.prompt.as_mut());
        apply(&mut page, &mut host, updates)?;
    }
    Ok(())
}

/// Events a command delivers to the page, in order.
fn events(command: &Command) -> anyhow::Result<Vec<(Role, Trigger, Payload)>> {
    let events = match command {
        Command::Complete(cmd) => vec![(
            Role::CompleteButton,
            Trigger::Click,
            Payload::Section(cmd.section.clone()),
        )],
        Command::Unmark(cmd) => vec![(
            Role::UnmarkButton,
            Trigger::Click,
            Payload::Section(cmd.section.clone()),
        )],
        Command::Note(cmd) => vec![(
            Role::NotesInput,
            Trigger::Input,
            Payload::Note {
                section: cmd.section.clone(),
                text: unescape_newlines(&cmd.text),
            },
        )],
        Command::Format(cmd) => {
            let button = match cmd.style {
                EmphasisArg::Bold => Role::BoldButton,
                EmphasisArg::Italic => Role::ItalicButton,
            };
            vec![
                (
                    Role::NotesInput,
                    Trigger::Select,
                    Payload::Selection {
                        section: cmd.section.clone(),
                        range: cmd.start..cmd.end,
                    },
                ),
                (button, Trigger::Click, Payload::Section(cmd.section.clone())),
            ]
        }
        Command::Clear(cmd) => vec![(
            Role::ClearButton,
            Trigger::Click,
            Payload::Section(cmd.section.clone()),
        )],
        Command::Export(_) => vec![(Role::ExportButton, Trigger::Click, Payload::None)],
        Command::Import(cmd) => {
            let contents = fs::read_to_string(&cmd.file)
                .with_context(|| format!("failed to read {}", cmd.file.display()))?;
            vec![(
                Role::ImportInput,
                Trigger::Change,
                Payload::File(Some(contents)),
            )]
        }
        Command::Key(cmd) => {
            let press = KeyPress::parse(&cmd.combo)
                .ok_or_else(|| anyhow!("unrecognized key combo: {}", cmd.combo))?;
            vec![(Role::Document, Trigger::KeyDown, Payload::Key(press))]
        }
        Command::Status(_) | Command::Stats(_) | Command::Config(_) => Vec::new(),
    };
    Ok(events)
}

fn apply(page: &mut HostPage, host: &mut Host, updates: Vec<UiUpdate>) -> anyhow::Result<()> {
    for update in updates {
        match update {
            UiUpdate::SectionStyle { section, status } => {
                println!("{section}: {}", status.label());
            }
            UiUpdate::NoteText { section, text } => println!("{section}: {text}"),
            UiUpdate::CharCount { section, count } => {
                println!("{section}: {count} characters");
            }
            UiUpdate::Alert { message } => println!("{message}"),
            UiUpdate::Download {
                file_name,
                contents,
            } => {
                fs::create_dir_all(&host.export_dir).with_context(|| {
                    format!("failed to create {}", host.export_dir.display())
                })?;
                let path = host.export_dir.join(file_name);
                fs::write(&path, contents)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Exported to {}", path.display());
            }
            UiUpdate::Click { role } => {
                let follow =
                    page.dispatch(role, Trigger::Click, &Payload::None, host.prompt.as_mut());
                apply(page, host, follow)?;
            }
            other => debug!("Ignored on terminal: {other:?}"),
        }
    }
    Ok(())
}

fn print_status(page: &HostPage, json: bool) -> anyhow::Result<()> {
    let manager = &page.manager;
    if json {
        let status = serde_json::json!({
            "page": manager.context().page_path,
            "title": manager.context().document_title,
            "sections": manager.sections(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("ctrack status: {}", manager.context().page_path);
    println!("------------------");
    if manager.sections().is_empty() {
        println!("No sections.");
    }
    for section in manager.sections() {
        let first_line = section.note_text().lines().next().unwrap_or("");
        println!(
            "{:<20} {:<15} {:>5}  {first_line}",
            section.id,
            section.status().label(),
            section.char_count()
        );
    }
    Ok(())
}

fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = SqliteStore::open(config.database_path())?;
    let stats = store.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("ctrack stats");
        println!("------------");
        println!("Database:      {}", store.path().display());
        println!("Entries:       {}", stats.total_entries);
        println!("Size (bytes):  {}", stats.db_size_bytes);
        match stats.last_updated {
            Some(when) => println!("Last updated:  {}", when.to_rfc3339()),
            None => println!("Last updated:  never"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
                println!("  File suffix:        {}", config.export.file_suffix);
                println!();
                println!("[Navigation]");
                println!(
                    "  Scroll step (px):   {}",
                    config.navigation.scroll_step_px
                );
                println!(
                    "  Navigate delay (ms): {}",
                    config.navigation.navigate_delay_ms
                );
                println!(
                    "  Anchor offset (px): {}",
                    config.navigation.anchor_offset_px
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
