mod config;
mod db;
mod models;
mod render;
mod telemetry;
mod tracker;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use db::Database;
use models::{
    Application, ApplicationStatus, ConnectionType, DrillElement, GtmData, MockType,
    NetworkingStatus, Rating, StoryCategory,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracker::{
    today, Finding, Habit, NewApplication, NewContact, NewDrill, NewMock, NewStory, RecordKind,
};

#[derive(Parser)]
#[command(name = "gtm")]
#[command(about = "Job search tracker - applications, STAR stories, mocks, drills and networking")]
struct Cli {
    /// Database file (overrides GTM_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Track job applications
    App {
        #[command(subcommand)]
        command: AppCommands,
    },

    /// Manage STAR interview stories
    Story {
        #[command(subcommand)]
        command: StoryCommands,
    },

    /// Log practice interviews
    Mock {
        #[command(subcommand)]
        command: MockCommands,
    },

    /// Log timed system-design drills
    Drill {
        #[command(subcommand)]
        command: DrillCommands,
    },

    /// Track networking contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Daily habit checklist
    Rhythm {
        #[command(subcommand)]
        command: RhythmCommands,
    },

    /// Start date and weekly targets
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Show this week's progress against targets
    Progress {
        /// Any day in the week to report (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Print badge display config as JSON
    Badges,

    /// Report duplicate ids, duplicate days and dangling story references
    Validate,

    /// Export all tracker data as JSON
    Export {
        /// Output file (stdout if omitted)
        file: Option<PathBuf>,
    },

    /// Replace tracker data with a JSON export
    Import {
        /// JSON file produced by `gtm export`
        file: PathBuf,
    },

    /// List or restore earlier saved versions
    History {
        /// Number of versions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Restore the given version
        #[arg(long)]
        restore: Option<i64>,

        /// Keep only the newest N versions
        #[arg(long)]
        prune: Option<usize>,
    },
}

#[derive(Subcommand)]
enum AppCommands {
    /// Add an application
    Add {
        company: String,
        role: String,

        #[arg(short, long, default_value = "")]
        team: String,

        /// researching, applied, screen, technical, loop, offer, rejected, withdrawn
        #[arg(short, long)]
        status: Option<ApplicationStatus>,

        /// Date applied (YYYY-MM-DD)
        #[arg(long)]
        applied: Option<NaiveDate>,

        /// Who referred you, if anyone
        #[arg(long)]
        referral: Option<String>,

        #[arg(long)]
        manager: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(short, long, default_value = "")]
        notes: String,

        /// Story id that fits this role
        #[arg(long)]
        story: Option<String>,
    },

    /// List applications
    List {
        #[arg(short, long)]
        status: Option<ApplicationStatus>,

        /// Hide rejected and withdrawn applications
        #[arg(long)]
        open: bool,

        /// Group into status columns
        #[arg(long)]
        board: bool,
    },

    /// Show application details
    Show { id: String },

    /// Move an application to a new status
    Status {
        id: String,
        status: ApplicationStatus,
    },

    /// Delete an application
    Rm { id: String },
}

#[derive(Subcommand)]
enum StoryCommands {
    /// Add a STAR story
    Add {
        title: String,

        /// leadership, conflict, failure, impact, ambiguity, technical, stakeholder, delivery
        #[arg(short, long)]
        category: StoryCategory,

        #[arg(long, default_value = "")]
        situation: String,

        #[arg(long, default_value = "")]
        task: String,

        #[arg(long, default_value = "")]
        action: String,

        #[arg(long, default_value = "")]
        result: String,

        /// One-paragraph version
        #[arg(long, default_value = "")]
        condensed: String,

        /// Metric to quote (repeatable)
        #[arg(short, long = "metric")]
        metrics: Vec<String>,
    },

    /// List stories
    List {
        #[arg(short, long)]
        category: Option<StoryCategory>,
    },

    /// Show a story
    Show {
        id: String,

        /// Only the condensed version
        #[arg(long)]
        short: bool,
    },

    /// Record a practice run
    Practice { id: String },

    /// Delete a story
    Rm { id: String },
}

#[derive(Subcommand)]
enum MockCommands {
    /// Log a mock interview
    Add {
        topic: String,

        /// behavioral, system-design, product, case
        #[arg(short = 't', long = "type")]
        kind: MockType,

        #[arg(short, long, default_value = "")]
        partner: String,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Minutes
        #[arg(long, default_value = "45")]
        duration: u32,

        /// 1-5
        #[arg(short, long)]
        rating: Rating,

        #[arg(short, long, default_value = "")]
        feedback: String,

        /// Area to improve (repeatable)
        #[arg(short, long = "improve")]
        improvements: Vec<String>,
    },

    /// List mock interviews
    List {
        #[arg(short = 't', long = "type")]
        kind: Option<MockType>,
    },

    /// Delete a mock interview
    Rm { id: String },
}

#[derive(Subcommand)]
enum DrillCommands {
    /// Log a drill
    Add {
        topic: String,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Minutes
        #[arg(long, default_value = "45")]
        duration: u32,

        /// Element covered, by number or name (repeatable)
        #[arg(short, long = "element", value_parser = parse_drill_element)]
        elements: Vec<DrillElement>,

        /// 1-5
        #[arg(short, long)]
        rating: Rating,

        #[arg(short, long, default_value = "")]
        feedback: String,
    },

    /// List drills
    List,

    /// Show the ten drill elements
    Elements,

    /// Delete a drill
    Rm { id: String },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// Add a contact
    Add {
        name: String,

        #[arg(short, long, default_value = "")]
        company: String,

        #[arg(short, long, default_value = "")]
        role: String,

        /// recruiter, hiring-manager, employee, alumni
        #[arg(short = 't', long = "type")]
        connection_type: ConnectionType,

        #[arg(short, long)]
        status: Option<NetworkingStatus>,

        #[arg(long)]
        linkedin: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List contacts
    List {
        #[arg(short, long)]
        status: Option<NetworkingStatus>,
    },

    /// Move a contact to a new status
    Status {
        id: String,
        status: NetworkingStatus,
    },

    /// Delete a contact
    Rm { id: String },
}

#[derive(Subcommand)]
enum RhythmCommands {
    /// Mark habits done: applied, networked, drilled, story
    Check {
        habits: Vec<Habit>,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show recent days
    Show {
        #[arg(short, long, default_value = "7")]
        days: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetKind {
    Applications,
    Mocks,
    Drills,
    Networking,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show settings
    Show,

    /// Set a weekly target
    Target { kind: TargetKind, value: u32 },

    /// Set the search start date
    StartDate { date: NaiveDate },
}

fn parse_drill_element(s: &str) -> Result<DrillElement, String> {
    DrillElement::parse(s).ok_or_else(|| {
        format!(
            "unknown drill element '{}' (use 1-10 or a name from `gtm drill elements`)",
            s
        )
    })
}

/// Static output that must not create or touch the database file.
fn needs_storage(command: &Commands) -> bool {
    !matches!(command, Commands::Badges)
}

fn remove_record(db: &Database, kind: RecordKind, id: &str) -> Result<()> {
    let mut data = db.load()?;
    data.remove(kind, id)?;
    db.save(&mut data)?;
    info!(%kind, id, "removed record");
    println!("Removed {} {}.", kind, id);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.db)?;
    telemetry::init(&config.log_level)?;
    debug!(db = %config.db_path.display(), "resolved config");

    if !needs_storage(&cli.command) {
        println!("{}", serde_json::to_string_pretty(&render::badge_config_json())?);
        return Ok(());
    }

    let db = Database::open(&config.db_path)?.with_snapshot_keep(config.snapshot_keep);

    if !matches!(cli.command, Commands::Init) {
        db.ensure_initialized()?;
    }

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::App { command } => match command {
            AppCommands::Add {
                company,
                role,
                team,
                status,
                applied,
                referral,
                manager,
                url,
                notes,
                story,
            } => {
                let mut data = db.load()?;
                if let Some(story_id) = &story {
                    if data.story(story_id).is_none() {
                        warn!(story_id, "story fit references an unknown story");
                    }
                }
                let id = data.add_application(NewApplication {
                    company,
                    role,
                    team,
                    status,
                    applied_date: applied,
                    referral_path: referral,
                    hiring_manager: manager,
                    job_url: url,
                    notes,
                    story_fit: story,
                });
                db.save(&mut data)?;
                println!("Added application {}", id);
            }

            AppCommands::List {
                status,
                open,
                board,
            } => {
                let data = db.load()?;
                if data.applications.is_empty() {
                    println!("No applications found.");
                } else if board {
                    for (status, apps) in data.applications_by_status() {
                        if open && status.is_closed() {
                            continue;
                        }
                        println!("== {} ({})", status.badge().label, apps.len());
                        for app in apps {
                            println!("  {}  {} - {}", app.id, app.company, app.role);
                        }
                    }
                } else {
                    let mut apps: Vec<&Application> = data
                        .applications
                        .iter()
                        .filter(|a| status.is_none_or(|s| a.status == s))
                        .filter(|a| !open || !a.status.is_closed())
                        .collect();
                    apps.sort_by(|a, b| b.last_update.cmp(&a.last_update));
                    if apps.is_empty() {
                        println!("No applications found.");
                    } else {
                        print!("{}", render::application_table(&apps));
                    }
                }
            }

            AppCommands::Show { id } => {
                let data = db.load()?;
                match data.application(&id) {
                    Some(app) => {
                        let story = app.story_fit.as_deref().and_then(|s| data.story(s));
                        print!("{}", render::application_detail(app, story));
                    }
                    None => println!("Application {} not found.", id),
                }
            }

            AppCommands::Status { id, status } => {
                let mut data = db.load()?;
                let previous = data.set_application_status(&id, status)?;
                db.save(&mut data)?;
                println!("Moved {} from {} to {}.", id, previous, status);
            }

            AppCommands::Rm { id } => remove_record(&db, RecordKind::Application, &id)?,
        },

        Commands::Story { command } => match command {
            StoryCommands::Add {
                title,
                category,
                situation,
                task,
                action,
                result,
                condensed,
                metrics,
            } => {
                let mut data = db.load()?;
                let id = data.add_story(NewStory {
                    title,
                    category,
                    situation,
                    task,
                    action,
                    result,
                    condensed,
                    metrics,
                });
                db.save(&mut data)?;
                println!("Added story {}", id);
            }

            StoryCommands::List { category } => {
                let data = db.load()?;
                let stories: Vec<_> = data
                    .stories
                    .into_iter()
                    .filter(|s| category.is_none_or(|c| s.category == c))
                    .collect();
                if stories.is_empty() {
                    println!("No stories found.");
                } else {
                    print!("{}", render::story_table(&stories));
                }
            }

            StoryCommands::Show { id, short } => {
                let data = db.load()?;
                match data.story(&id) {
                    Some(story) => print!("{}", render::story_detail(story, short)),
                    None => println!("Story {} not found.", id),
                }
            }

            StoryCommands::Practice { id } => {
                let mut data = db.load()?;
                let count = data.record_practice(&id, today())?;
                db.save(&mut data)?;
                println!("Practiced {} ({} total).", id, count);
            }

            StoryCommands::Rm { id } => remove_record(&db, RecordKind::Story, &id)?,
        },

        Commands::Mock { command } => match command {
            MockCommands::Add {
                topic,
                kind,
                partner,
                date,
                duration,
                rating,
                feedback,
                improvements,
            } => {
                let mut data = db.load()?;
                let id = data.add_mock(NewMock {
                    kind,
                    date: date.unwrap_or_else(today),
                    partner,
                    topic,
                    duration,
                    feedback,
                    rating,
                    improvement_areas: improvements,
                });
                db.save(&mut data)?;
                println!("Logged mock interview {}", id);
            }

            MockCommands::List { kind } => {
                let data = db.load()?;
                let mut mocks: Vec<_> = data
                    .mocks
                    .into_iter()
                    .filter(|m| kind.is_none_or(|k| m.kind == k))
                    .collect();
                mocks.sort_by(|a, b| b.date.cmp(&a.date));
                if mocks.is_empty() {
                    println!("No mock interviews found.");
                } else {
                    print!("{}", render::mock_table(&mocks));
                }
            }

            MockCommands::Rm { id } => remove_record(&db, RecordKind::Mock, &id)?,
        },

        Commands::Drill { command } => match command {
            DrillCommands::Add {
                topic,
                date,
                duration,
                elements,
                rating,
                feedback,
            } => {
                let mut data = db.load()?;
                let id = data.add_drill(NewDrill {
                    date: date.unwrap_or_else(today),
                    topic,
                    duration,
                    elements_completed: elements,
                    rating,
                    feedback,
                });
                db.save(&mut data)?;
                println!("Logged drill {}", id);
            }

            DrillCommands::List => {
                let data = db.load()?;
                let mut drills = data.drills;
                drills.sort_by(|a, b| b.date.cmp(&a.date));
                if drills.is_empty() {
                    println!("No drills found.");
                } else {
                    print!("{}", render::drill_table(&drills));
                }
            }

            DrillCommands::Elements => print!("{}", render::drill_elements()),

            DrillCommands::Rm { id } => remove_record(&db, RecordKind::Drill, &id)?,
        },

        Commands::Contact { command } => match command {
            ContactCommands::Add {
                name,
                company,
                role,
                connection_type,
                status,
                linkedin,
                email,
                notes,
            } => {
                let mut data = db.load()?;
                let id = data.add_contact(NewContact {
                    name,
                    company,
                    role,
                    status,
                    linkedin_url: linkedin,
                    email,
                    connection_type,
                    notes,
                });
                db.save(&mut data)?;
                println!("Added contact {}", id);
            }

            ContactCommands::List { status } => {
                let data = db.load()?;
                let contacts: Vec<_> = data
                    .networking
                    .into_iter()
                    .filter(|c| status.is_none_or(|s| c.status == s))
                    .collect();
                if contacts.is_empty() {
                    println!("No contacts found.");
                } else {
                    print!("{}", render::contact_table(&contacts));
                }
            }

            ContactCommands::Status { id, status } => {
                let mut data = db.load()?;
                let previous = data.set_contact_status(&id, status)?;
                db.save(&mut data)?;
                println!("Moved {} from {} to {}.", id, previous, status);
            }

            ContactCommands::Rm { id } => remove_record(&db, RecordKind::Contact, &id)?,
        },

        Commands::Rhythm { command } => match command {
            RhythmCommands::Check {
                habits,
                date,
                notes,
            } => {
                let mut data = db.load()?;
                let line = render::rhythm_line(data.check_in(
                    date.unwrap_or_else(today),
                    &habits,
                    notes.as_deref(),
                ));
                db.save(&mut data)?;
                println!("{}", line);
            }

            RhythmCommands::Show { days } => {
                let data = db.load()?;
                let end = today();
                let start = end - Duration::days(days.saturating_sub(1) as i64);
                let mut entries: Vec<_> = data
                    .daily_rhythm
                    .iter()
                    .filter(|d| d.date >= start && d.date <= end)
                    .collect();
                entries.sort_by(|a, b| b.date.cmp(&a.date));
                if entries.is_empty() {
                    println!("No check-ins in the last {} day(s).", days);
                }
                for day in entries {
                    println!("{}", render::rhythm_line(day));
                }
            }
        },

        Commands::Settings { command } => {
            let mut data = db.load()?;
            match command {
                SettingsCommands::Show => {
                    let s = &data.settings;
                    println!("Start date: {}", s.start_date);
                    println!("Weekly targets:");
                    println!("  Applications: {}", s.weekly_targets.applications);
                    println!("  Mocks:        {}", s.weekly_targets.mocks);
                    println!("  Drills:       {}", s.weekly_targets.drills);
                    println!("  Networking:   {}", s.weekly_targets.networking);
                }

                SettingsCommands::Target { kind, value } => {
                    let targets = &mut data.settings.weekly_targets;
                    let slot = match kind {
                        TargetKind::Applications => &mut targets.applications,
                        TargetKind::Mocks => &mut targets.mocks,
                        TargetKind::Drills => &mut targets.drills,
                        TargetKind::Networking => &mut targets.networking,
                    };
                    *slot = value;
                    db.save(&mut data)?;
                    println!("Weekly target updated.");
                }

                SettingsCommands::StartDate { date } => {
                    data.settings.start_date = date;
                    db.save(&mut data)?;
                    println!("Start date set to {}.", date);
                }
            }
        }

        Commands::Progress { date } => {
            let data = db.load()?;
            let day = date.unwrap_or_else(today);
            let progress = data.weekly_progress(day);
            print!("{}", render::weekly_progress(&progress));
            if let Some(rhythm) = data.rhythm_for(day) {
                println!("\n{}", render::rhythm_line(rhythm));
            }
        }

        Commands::Badges => unreachable!("handled before opening the database"),

        Commands::Validate => {
            let data = db.load()?;
            let findings = data.integrity_report();
            if findings.is_empty() {
                println!("No problems found in {} record(s).", data.record_count());
            } else {
                for finding in &findings {
                    println!("  {}", finding);
                }
                println!("\n{} problem(s) found.", findings.len());
            }
        }

        Commands::Export { file } => {
            let data = db.load()?;
            let json = serde_json::to_string_pretty(&data)?;
            match file {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write to {}", path.display()))?;
                    println!("Exported {} record(s) to {}", data.record_count(), path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let (data, findings) = import_into(&db, &raw)
                .with_context(|| format!("Invalid tracker data in {}", file.display()))?;
            info!(file = %file.display(), "imported tracker data");
            println!("Imported {} record(s).", data.record_count());
            if !findings.is_empty() {
                println!("{} problem(s) found; run `gtm validate` for details.", findings.len());
            }
        }

        Commands::History {
            limit,
            restore,
            prune,
        } => {
            if let Some(id) = restore {
                let data = db.restore_snapshot(id)?;
                println!("Restored version #{} ({} record(s)).", id, data.record_count());
            } else if let Some(keep) = prune {
                let removed = db.prune_snapshots(keep)?;
                println!("Removed {} old version(s).", removed);
            } else {
                let snapshots = db.snapshots(limit)?;
                if snapshots.is_empty() {
                    println!("No earlier versions.");
                } else {
                    println!("{:<6} {:<20} {:>8} {:>10}", "ID", "SAVED", "RECORDS", "BYTES");
                    println!("{}", "-".repeat(47));
                    for snap in snapshots {
                        let records = snap
                            .record_count
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "?".to_string());
                        println!(
                            "{:<6} {:<20} {:>8} {:>10}",
                            snap.id, snap.captured_at, records, snap.bytes
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

/// Parses an untyped JSON document, rejecting values outside the closed sets or rating range.
/// Errors carry the line and column of the offending value.
fn import_data(raw: &str) -> Result<GtmData> {
    match raw.trim_start().chars().next() {
        Some('{') => {}
        Some(_) => return Err(anyhow!("Expected a JSON object at the top level")),
        None => return Err(anyhow!("File is empty")),
    }
    let data: GtmData = serde_json::from_str(raw)?;
    Ok(data)
}

/// Validates and stores an import, returning the advisory findings it carried.
fn import_into(db: &Database, raw: &str) -> Result<(GtmData, Vec<Finding>)> {
    let data = import_data(raw)?;
    let findings = data.integrity_report();
    for finding in &findings {
        warn!(%finding, "imported data has a problem");
    }
    let data = db.replace(data)?;
    Ok((data, findings))
}
