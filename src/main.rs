mod models;
mod roadmap;
mod scheduler;
mod store;

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use models::{Confidence, Difficulty, JsonOutput, MonthId, Status, StudyItem};
use roadmap::{compute_plan, current_phase};
use scheduler::{
    due_items, forecast, mark_status, phase_focus, submit_review, DASHBOARD_LIMIT, FORECAST_LIMIT,
};
use store::{Snapshot, Store};

#[derive(Parser)]
#[command(name = "algomaster")]
#[command(about = "A study-progress tracker with adaptive monthly roadmaps and spaced revision")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Act as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an empty store for the current month
    Init,

    /// Manage study items
    #[command(subcommand)]
    Item(ItemCommands),

    /// Show the three-phase roadmap for a month
    Plan {
        /// Month to plan (YYYY-MM), defaults to the current cycle
        #[arg(long, short)]
        month: Option<MonthId>,
    },

    /// Show which phase of the cycle today falls in
    Phase {
        /// Month to locate against (YYYY-MM), defaults to the current cycle
        #[arg(long, short)]
        month: Option<MonthId>,
    },

    /// List items due for spaced review, most urgent first
    Due,

    /// Show upcoming reviews that are not due yet
    Forecast {
        /// Maximum entries to show
        #[arg(long, short, default_value_t = FORECAST_LIMIT)]
        limit: usize,
    },

    /// Record a review with a new confidence rating
    Review {
        /// Item ID
        id: String,

        /// New self-rating: weak/medium/strong (or hard/medium/easy)
        #[arg(long, short)]
        confidence: String,
    },

    /// Show the phase-aware queue for today
    Focus,

    /// Show progress statistics for the current month
    Stats,
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Add a new item to the current month
    Add {
        /// Problem name
        name: String,

        /// Pattern/category, e.g. "Two Pointers"
        #[arg(long, short, default_value = "General")]
        pattern: String,

        /// Difficulty: easy/medium/hard
        #[arg(long, short)]
        difficulty: Option<String>,

        /// Day of the month the first attempt is scheduled for
        #[arg(long, short)]
        scheduled: Option<u32>,
    },

    /// List items in the current month
    List {
        /// Filter by status: not_started/attempted/solved
        #[arg(long, short)]
        status: Option<String>,
    },

    /// Mark an item solved, stamping the review clock
    Solve {
        /// Item ID
        id: String,

        /// Initial self-rating, defaults to medium
        #[arg(long, short)]
        confidence: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[derive(Debug, Serialize)]
struct StatsSummary {
    month: MonthId,
    total: usize,
    solved: usize,
    attempted: usize,
    not_started: usize,
    due_now: usize,
    avg_attempts: f64,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // The engine never reads the clock; "now" is fixed once here.
    let now = match cli.date {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };
    let today = now.date_naive();

    let store = Store::open(Store::default_path());
    let mut snapshot = store.load_or_init(MonthId::from_date(today))?;

    match cli.command {
        Commands::Init => {
            store.save(&snapshot)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Store initialized at: {}", store.path().display());
                println!("Current month: {}", snapshot.current_month.label());
            }
        }

        Commands::Item(item_cmd) => match item_cmd {
            ItemCommands::Add {
                name,
                pattern,
                difficulty,
                scheduled,
            } => {
                let month = snapshot.current_month;
                let mut item = StudyItem::new(snapshot.next_id(), &name, month);
                item.pattern = pattern;
                if let Some(d) = difficulty {
                    item.difficulty = Difficulty::from_str(&d).ok_or_else(|| {
                        format!("Invalid difficulty '{}'. Use: easy, medium, or hard", d)
                    })?;
                }
                if let Some(day) = scheduled {
                    let date = NaiveDate::from_ymd_opt(month.year(), month.month(), day)
                        .ok_or_else(|| format!("Day {} does not exist in {}", day, month))?;
                    item.scheduled_date = Some(date);
                }
                let id = item.id.clone();
                snapshot.items.push(item);
                store.save(&snapshot)?;

                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                            "id": id,
                            "name": name
                        })))?
                    );
                } else {
                    println!("Added item '{}' with ID: {}", name, id);
                }
            }

            ItemCommands::List { status } => {
                let filter = match status.as_deref() {
                    Some(s) => Some(Status::from_str(s).ok_or_else(|| {
                        format!(
                            "Invalid status '{}'. Use: not_started, attempted, or solved",
                            s
                        )
                    })?),
                    None => None,
                };
                let items: Vec<StudyItem> = snapshot
                    .month_items()
                    .into_iter()
                    .filter(|item| filter.map_or(true, |f| item.status == f))
                    .collect();

                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(&items))?);
                } else if items.is_empty() {
                    println!("No items found.");
                } else {
                    println!(
                        "{:<8} {:<35} {:<18} {:<12} CONFIDENCE",
                        "ID", "NAME", "PATTERN", "STATUS"
                    );
                    println!("{}", "-".repeat(85));
                    for item in items {
                        println!(
                            "{:<8} {:<35} {:<18} {:<12} {}",
                            item.id,
                            truncate(&item.name, 33),
                            truncate(&item.pattern, 16),
                            item.status.label(),
                            item.confidence.label()
                        );
                    }
                }
            }

            ItemCommands::Solve { id, confidence } => {
                let rating = match confidence.as_deref() {
                    Some(c) => Some(parse_confidence(c)?),
                    None => None,
                };
                let item = snapshot
                    .find_item(&id)
                    .ok_or_else(|| format!("No item with id '{}'", id))?;
                let mut updated = mark_status(item, Status::Solved, now);
                if let Some(rating) = rating {
                    updated.confidence = rating;
                }
                let summary = (updated.name.clone(), updated.confidence);
                snapshot.replace_item(updated)?;
                store.save(&snapshot)?;

                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
                } else {
                    println!("Marked '{}' solved ({} confidence).", summary.0, summary.1.label());
                }
            }
        },

        Commands::Plan { month } => {
            let month = month.unwrap_or(snapshot.current_month);
            let item_count = snapshot
                .items
                .iter()
                .filter(|item| item.month_id == month)
                .count();
            let plan = compute_plan(month, item_count);

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&plan))?);
            } else {
                println!("=== Roadmap: {} ===", month.label());
                println!(
                    "Days: {} total, {} buffer, {} working",
                    plan.total_days, plan.buffer_days, plan.working_days
                );
                println!(
                    "Daily target: {} weekday / {} weekend",
                    plan.daily_capacity.weekday, plan.daily_capacity.weekend
                );
                println!();
                println!(
                    "{:<3} {:<22} {:<12} {:<12} DAYS",
                    "ID", "PHASE", "START", "END"
                );
                println!("{}", "-".repeat(60));
                for phase in &plan.phases {
                    println!(
                        "{:<3} {:<22} {:<12} {:<12} {}",
                        phase.id, phase.name, phase.start_date, phase.end_date, phase.duration
                    );
                }
            }
        }

        Commands::Phase { month } => {
            let month = month.unwrap_or(snapshot.current_month);
            let item_count = snapshot
                .items
                .iter()
                .filter(|item| item.month_id == month)
                .count();
            let plan = compute_plan(month, item_count);
            let phase_id = current_phase(&plan, today);
            let phase = &plan.phases[usize::from(phase_id) - 1];

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(phase))?);
            } else {
                println!("Phase {} of {}: {}", phase.id, month.label(), phase.name);
                println!("Focus: {}", phase.focus);
                println!("Goal:  {}", phase.goal);
                println!("Runs {} to {}", phase.start_date, phase.end_date);
            }
        }

        Commands::Due => {
            let items = snapshot.month_items();
            let due = due_items(&items, now);

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&due))?);
            } else if due.is_empty() {
                println!("All caught up! Nothing is due for review.");
            } else {
                println!("{:<8} {:<35} {:<12} {:<10} SCORE", "ID", "NAME", "CONFIDENCE", "OVERDUE");
                println!("{}", "-".repeat(80));
                for entry in &due {
                    println!(
                        "{:<8} {:<35} {:<12} {:<10} {}",
                        entry.item.id,
                        truncate(&entry.item.name, 33),
                        entry.item.confidence.label(),
                        format!("{}d", entry.elapsed_days),
                        entry.score
                    );
                }
                println!();
                println!("Record a review with:");
                println!("  algomaster review <id> --confidence <weak|medium|strong>");
            }
        }

        Commands::Forecast { limit } => {
            let items = snapshot.month_items();
            let upcoming = forecast(&items, now, limit);

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&upcoming))?);
            } else if upcoming.is_empty() {
                println!("No upcoming reviews.");
            } else {
                println!("=== Coming Up Next ===");
                for entry in &upcoming {
                    println!(
                        "in {}d  {} ({})",
                        entry.days_until_due,
                        entry.item.name,
                        entry.item.confidence.label()
                    );
                }
            }
        }

        Commands::Review { id, confidence } => {
            let rating = parse_confidence(&confidence)?;
            let item = snapshot
                .find_item(&id)
                .ok_or_else(|| format!("No item with id '{}'", id))?;
            if item.status != Status::Solved {
                return Err(format!("Item '{}' has not been solved yet", id).into());
            }
            let updated = submit_review(item, rating, now);
            let next_due_in = updated.confidence.review_interval_days();
            let name = updated.name.clone();
            snapshot.replace_item(updated)?;
            store.save(&snapshot)?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Review recorded for '{}'.", name);
                println!("Rated {}: due again in {}d.", rating.label(), next_due_in);
            }
        }

        Commands::Focus => {
            let items = snapshot.month_items();
            let plan = compute_plan(snapshot.current_month, items.len());
            let focus = phase_focus(&items, &plan, now, DASHBOARD_LIMIT);

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&focus))?);
            } else {
                println!("=== {} ===", focus.title);
                println!("{}", focus.subtitle);
                println!();
                if focus.items.is_empty() {
                    println!("Nothing queued for today.");
                } else {
                    for item in &focus.items {
                        println!(
                            "{:<8} {} [{} / {}]",
                            item.id,
                            item.name,
                            item.difficulty.label(),
                            item.confidence.label()
                        );
                    }
                }
            }
        }

        Commands::Stats => {
            let items = snapshot.month_items();
            let solved = items.iter().filter(|i| i.status == Status::Solved).count();
            let attempted = items
                .iter()
                .filter(|i| i.status == Status::Attempted)
                .count();
            let total = items.len();
            let avg_attempts = if total == 0 {
                0.0
            } else {
                items.iter().map(|i| f64::from(i.attempts)).sum::<f64>() / total as f64
            };
            let stats = StatsSummary {
                month: snapshot.current_month,
                total,
                solved,
                attempted,
                not_started: total - solved - attempted,
                due_now: due_items(&items, now).len(),
                avg_attempts,
            };

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&stats))?);
            } else {
                println!("=== {} ===", stats.month.label());
                println!("Total items: {}", stats.total);
                println!("Solved: {}", stats.solved);
                println!("Attempted: {}", stats.attempted);
                println!("Not started: {}", stats.not_started);
                println!("Due for review: {}", stats.due_now);
                println!("Average attempts: {:.1}", stats.avg_attempts);
            }
        }
    }

    Ok(())
}

fn parse_confidence(s: &str) -> Result<Confidence, String> {
    Confidence::from_str(s)
        .filter(|c| *c != Confidence::None)
        .ok_or_else(|| format!("Invalid confidence '{}'. Use: weak, medium, or strong", s))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
