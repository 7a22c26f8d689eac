use std::sync::Arc;

use anyhow::Context;
use campus_assistant::{Assistant, AssistantConfig, GeminiClient, Reply};
use campus_bridge::{Delivery, PromptState};
use campus_sdk::{Campus, CampusConfig, Collection};
use campus_store::Hydration;
use campus_types::{Record, RecordId, Role};
use colored::Colorize;
use serde_json::Value;

use crate::cli::*;

/// Run `$body` with `$c` bound to the collection named by `$name`.
macro_rules! with_collection {
    ($campus:expr, $name:expr, |$c:ident| $body:expr) => {
        match $name {
            CollectionName::Buildings => { let $c = $campus.buildings_mut(); $body }
            CollectionName::Courses => { let $c = $campus.courses_mut(); $body }
            CollectionName::Faculty => { let $c = $campus.faculty_mut(); $body }
            CollectionName::Students => { let $c = $campus.students_mut(); $body }
            CollectionName::Media => { let $c = $campus.media_mut(); $body }
            CollectionName::Events => { let $c = $campus.events_mut(); $body }
            CollectionName::Jobs => { let $c = $campus.jobs_mut(); $body }
        }
    };
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = CampusConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let format = cli.format;
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    let command = match cli.command {
        Command::Config => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Command::Chat(args) => return cmd_chat(&config, args).await,
        other => other,
    };

    let mut campus = Campus::from_config(&config)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;

    match command {
        Command::Status => cmd_status(&campus, format),
        Command::Login(args) => cmd_login(&mut campus, args),
        Command::Logout => {
            campus.logout()?;
            println!("{} Logged out.", "✓".green());
            Ok(())
        }
        Command::Whoami => cmd_whoami(&campus, format),
        Command::List(args) => with_collection!(campus, args.collection, |c| print_list(c, format)),
        Command::Put(args) => {
            campus.ensure_editor()?;
            with_collection!(campus, args.collection, |c| put_record(c, &args.json))
        }
        Command::Remove(args) => {
            campus.ensure_editor()?;
            let id = RecordId::parse(args.id.as_str())?;
            let removed = with_collection!(campus, args.collection, |c| c.remove(&id))?;
            if removed {
                println!("{} Removed {}", "✓".green(), id.to_string().yellow());
            } else {
                println!("No record {} in {:?}", id.to_string().yellow(), args.collection);
            }
            Ok(())
        }
        Command::Reset(args) => {
            campus.ensure_editor()?;
            with_collection!(campus, args.collection, |c| c.reset())?;
            println!("{} {:?} restored to the seed catalog", "✓".green(), args.collection);
            Ok(())
        }
        Command::Logo(args) => cmd_logo(&mut campus, args),
        Command::Attendance(args) => cmd_attendance(&mut campus, args),
        Command::Config | Command::Chat(_) => Ok(()),
    }
}

fn cmd_status(campus: &Campus, format: OutputFormat) -> anyhow::Result<()> {
    let status = campus.status();
    if format == OutputFormat::Json {
        let rows: Vec<Value> = status
            .iter()
            .map(|s| {
                serde_json::json!({
                    "key": s.key.as_str(),
                    "hydration": hydration_label(&s.hydration),
                    "dirty": s.dirty,
                    "len": s.len,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for s in &status {
        let state = match &s.hydration {
            Hydration::Restored => "stored".green(),
            Hydration::Absent => "default".dimmed(),
            Hydration::Corrupt { .. } => "corrupt, using default".red(),
            Hydration::Unavailable { .. } => "unreadable, using default".red(),
        };
        let len = s.len.map(|n| format!("{n} records")).unwrap_or_default();
        println!("  {:<20} {:<28} {}", s.key.as_str().bold(), state, len);
        if let Hydration::Corrupt { reason } | Hydration::Unavailable { reason } = &s.hydration {
            println!("  {:<20} {}", "", reason.dimmed());
        }
    }
    Ok(())
}

fn hydration_label(h: &Hydration) -> &'static str {
    match h {
        Hydration::Absent => "absent",
        Hydration::Restored => "restored",
        Hydration::Corrupt { .. } => "corrupt",
        Hydration::Unavailable { .. } => "unavailable",
    }
}

fn cmd_login(campus: &mut Campus, args: LoginArgs) -> anyhow::Result<()> {
    let role: Role = args.role.parse()?;
    let user = campus.login(&args.email, role)?;
    println!("{} Logged in as {} ({})", "✓".green().bold(), user.name.bold(), role.to_string().cyan());
    Ok(())
}

fn cmd_whoami(campus: &Campus, format: OutputFormat) -> anyhow::Result<()> {
    match (campus.current_user(), format) {
        (Some(user), OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(user)?),
        (Some(user), OutputFormat::Text) => {
            println!("{} <{}> {}", user.name.bold(), user.email, user.role.to_string().cyan())
        }
        (None, _) => println!("Not logged in."),
    }
    Ok(())
}

fn print_list<R: Record>(collection: &Collection<R>, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(collection.list())?);
        return Ok(());
    }
    if collection.is_empty() {
        println!("(empty)");
    }
    for record in collection.list() {
        println!("  {}  {}", record.id().to_string().yellow(), record.label());
    }
    Ok(())
}

/// Parse `json` as a record of type `R`, filling in an id if absent.
fn parse_record<R: Record>(json: &str) -> anyhow::Result<R> {
    let mut value: Value = serde_json::from_str(json).context("record is not valid JSON")?;
    let object = value
        .as_object_mut()
        .context("record must be a JSON object")?;
    object
        .entry("id")
        .or_insert_with(|| Value::String(RecordId::generate().to_string()));
    serde_json::from_value(value).context("record does not match the collection's fields")
}

fn put_record<R: Record>(collection: &mut Collection<R>, json: &str) -> anyhow::Result<()> {
    let record: R = parse_record(json)?;
    let id = record.id().clone();
    collection
        .upsert(record)
        .context("record was not saved")?;
    println!("{} Saved {}", "✓".green(), id.to_string().yellow());
    Ok(())
}

fn cmd_logo(campus: &mut Campus, args: LogoArgs) -> anyhow::Result<()> {
    if args.url.is_none() && !args.clear {
        match &campus.logo().url {
            Some(url) => println!("{url}"),
            None => println!("(built-in logo)"),
        }
        return Ok(());
    }
    campus.ensure_editor()?;
    campus.set_logo(args.url)?;
    println!("{} Logo updated", "✓".green());
    Ok(())
}

fn cmd_attendance(campus: &mut Campus, args: AttendanceArgs) -> anyhow::Result<()> {
    campus.sessions_mut().attach_student();
    match campus.start_attendance(args.course)? {
        Delivery::Delivered => println!("{} Session broadcast", "✓".green()),
        Delivery::Dropped => println!("{} No student view is listening", "!".yellow()),
    }

    match campus.sessions().prompt() {
        PromptState::Prompted(session) => {
            let course = session.course.as_deref().unwrap_or("class");
            println!(
                "  Student view: {} is taking attendance for {}",
                session.instructor.bold(),
                course.cyan()
            );
        }
        PromptState::Idle => println!("  Student view: idle"),
    }

    if !args.no_ack && campus.sessions().acknowledge().is_some() {
        println!("  {} Student marked present", "✓".green());
    }
    Ok(())
}

async fn cmd_chat(config: &CampusConfig, args: ChatArgs) -> anyhow::Result<()> {
    let client = GeminiClient::new(&config.assistant);
    let reply = ask(client, &config.assistant, &args.prompt.join(" ")).await;
    if reply.is_fallback() {
        println!("{}", reply.text().yellow());
    } else {
        println!("{}", reply.text());
    }
    Ok(())
}

/// The user only ever sees an answer or the fallback text, even when the
/// HTTP client could not be built.
async fn ask(
    client: campus_assistant::Result<GeminiClient>,
    config: &AssistantConfig,
    prompt: &str,
) -> Reply {
    match client {
        Ok(client) => Assistant::new(Arc::new(client), config.clone()).reply(prompt).await,
        Err(e) => {
            tracing::warn!(error = %e, "assistant client unavailable; using fallback");
            Reply::Fallback(config.fallback.clone())
        }
    }
}
