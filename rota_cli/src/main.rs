use chrono::{DateTime, Duration, Utc};
use rota_core::*;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rota")]
#[command(about = "Cyclic training schedule and activity tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long, global = true)]
    at: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's cycle day, plan, and streak (default)
    Today,

    /// Generate a fresh schedule for the whole cycle
    Plan {
        /// Training focus (all-weights, all-cardio, mix)
        #[arg(long)]
        focus: Option<Focus>,

        /// Number of rest days in the cycle
        #[arg(long)]
        rest_days: Option<u32>,

        /// Leave mobility work out of the plan
        #[arg(long)]
        no_mobility: bool,

        /// Dry run - show the plan without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the saved schedule
    Show,

    /// Find the next cycle day a workout is scheduled on
    Next { kind: WorkoutKind, id: String },

    /// Show history and next scheduled day for a workout
    Stats { kind: WorkoutKind, id: String },

    /// Record a completed workout
    Log { kind: WorkoutKind, id: String },

    /// Import sessions from a CSV archive
    Import { csv: PathBuf },

    /// Make a cycle day a rest day
    Rest { day: u32 },

    /// Add a workout to a cycle day
    Add {
        day: u32,
        kind: WorkoutKind,
        id: String,
    },

    /// Remove a workout from a cycle day
    Remove {
        day: u32,
        kind: WorkoutKind,
        id: String,
    },
}

/// Everything a command needs, resolved once in `main`
struct App {
    config: Config,
    data_dir: PathBuf,
    now: DateTime<Utc>,
}

impl App {
    fn schedule_path(&self) -> PathBuf {
        self.data_dir.join("schedule.json")
    }

    fn log_path(&self) -> PathBuf {
        self.data_dir.join("sessions.jsonl")
    }

    fn archive_path(&self) -> PathBuf {
        self.data_dir.join("archive.csv")
    }

    fn store(&self) -> JsonScheduleStore {
        JsonScheduleStore::new(self.schedule_path())
    }

    fn history(&self) -> Result<Vec<SessionRecord>> {
        load_history(&self.log_path(), Some(&self.archive_path()))
    }

    /// Saved schedule, or an empty one for the configured cycle
    fn schedule_or_empty(&self, cycle: &CycleConfig) -> Result<Schedule> {
        match self.store().load()? {
            Some(schedule) => Ok(schedule),
            None => Schedule::new(cycle.cycle_length),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    rota_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let app = App {
        config,
        data_dir,
        now: cli.at.unwrap_or_else(Utc::now),
    };

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Today => cmd_today(&app),
        Commands::Plan {
            focus,
            rest_days,
            no_mobility,
            dry_run,
        } => cmd_plan(&app, focus, rest_days, no_mobility, dry_run),
        Commands::Show => cmd_show(&app),
        Commands::Next { kind, id } => cmd_next(&app, WorkoutRef::new(kind, id)),
        Commands::Stats { kind, id } => cmd_stats(&app, WorkoutRef::new(kind, id)),
        Commands::Log { kind, id } => cmd_log(&app, WorkoutRef::new(kind, id)),
        Commands::Import { csv } => cmd_import(&app, csv),
        Commands::Rest { day } => cmd_rest(&app, day),
        Commands::Add { day, kind, id } => cmd_add(&app, day, WorkoutRef::new(kind, id)),
        Commands::Remove { day, kind, id } => cmd_remove(&app, day, WorkoutRef::new(kind, id)),
    }
}

fn cmd_today(app: &App) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let analytics = app.config.analytics()?;
    let today = analytics.today(app.now);

    let Some(schedule) = app.store().load()? else {
        println!("No schedule yet. Run `rota plan` to generate one.");
        return Ok(());
    };

    let (day, selections) = schedule.for_instant(&cycle, app.now)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DAY {} OF {}", day, cycle.cycle_length);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", today.format("%A, %B %-d"));
    println!();

    if selections.is_empty() {
        println!("  Nothing planned");
    }
    for selection in selections {
        println!("  → {}", selection.label());
    }

    let history = app.history()?;
    let streak = analytics.calculate_streak(&history, today);
    let weekly = analytics.weekly_count(&history, today);

    println!();
    println!("  Streak: {} {}", streak, plural(streak, "day", "days"));
    println!("  This week: {} active {}", weekly, plural(weekly, "day", "days"));
    println!();

    Ok(())
}

fn cmd_plan(
    app: &App,
    focus: Option<Focus>,
    rest_days: Option<u32>,
    no_mobility: bool,
    dry_run: bool,
) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let catalog = app.config.catalog()?;

    let mut preferences = app.config.preferences();
    if let Some(focus) = focus {
        preferences.focus = focus;
    }
    if let Some(rest_days) = rest_days {
        preferences.rest_days = rest_days;
    }
    if no_mobility {
        preferences.include_mobility = false;
    }

    let schedule = generate_schedule(cycle.cycle_length, &catalog, &preferences)?;
    display_schedule(&schedule);

    if dry_run {
        println!("\n[Dry run - schedule not saved]");
        return Ok(());
    }

    app.store().replace(&schedule)?;
    println!("\n✓ Schedule saved!");
    Ok(())
}

fn cmd_show(app: &App) -> Result<()> {
    match app.store().load()? {
        Some(schedule) => display_schedule(&schedule),
        None => println!("No schedule yet. Run `rota plan` to generate one."),
    }
    Ok(())
}

fn cmd_next(app: &App, workout: WorkoutRef) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let schedule = app.schedule_or_empty(&cycle)?;
    let (current_day, _) = schedule.for_instant(&cycle, app.now)?;

    match next_occurrence(&workout, &schedule, current_day, schedule.cycle_length()) {
        Some(day) => {
            let ahead = days_until(current_day, day, schedule.cycle_length());
            let date = local_date(app.now, cycle.timezone) + Duration::days(i64::from(ahead));
            println!(
                "Next {}: day {} (in {} {}, {})",
                workout,
                day,
                ahead,
                plural(ahead, "day", "days"),
                date
            );
        }
        None => println!("{} is not scheduled in this cycle", workout),
    }
    Ok(())
}

fn cmd_stats(app: &App, workout: WorkoutRef) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let analytics = app.config.analytics()?;
    let catalog = app.config.catalog()?;
    let schedule = app.schedule_or_empty(&cycle)?;
    let (current_day, _) = schedule.for_instant(&cycle, app.now)?;

    let history = app.history()?;
    let stats = analytics.template_stats(
        &workout,
        &history,
        &schedule,
        current_day,
        analytics.today(app.now),
    );

    let name = catalog
        .find(&workout)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| workout.to_string());

    println!();
    println!("  {}", name);
    println!("  {}", stats.summary);
    if let Some(last) = stats.last_session.as_ref().and_then(|s| s.completed_at) {
        println!("  Last: {}", local_date(last, cycle.timezone));
    }
    println!(
        "  This week: {} {}",
        stats.weekly_count,
        plural(stats.weekly_count, "day", "days")
    );
    match stats.next_scheduled_day {
        Some(day) => println!("  Next scheduled: day {}", day),
        None => println!("  Not scheduled in this cycle"),
    }
    println!();
    Ok(())
}

fn cmd_log(app: &App, workout: WorkoutRef) -> Result<()> {
    let catalog = app.config.catalog()?;
    if catalog.find(&workout).is_none() {
        tracing::warn!("{} is not in the catalog, logging anyway", workout);
    }

    let session = SessionRecord::completed(workout, app.now);
    let mut log = SessionLog::new(app.log_path());
    log.append(&session)?;

    println!("✓ Session logged!");
    Ok(())
}

fn cmd_import(app: &App, csv: PathBuf) -> Result<()> {
    let added = import_csv_into_log(&csv, &app.log_path())?;
    println!("✓ Imported {} {}", added, plural(added as u32, "session", "sessions"));
    Ok(())
}

fn cmd_rest(app: &App, day: u32) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let mut schedule = app.schedule_or_empty(&cycle)?;
    schedule.select_rest(day)?;
    app.store().replace(&schedule)?;

    println!("✓ Day {} is now a rest day", day);
    Ok(())
}

fn cmd_add(app: &App, day: u32, workout: WorkoutRef) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let catalog = app.config.catalog()?;
    let entry = catalog
        .find(&workout)
        .ok_or_else(|| Error::Other(format!("{} is not in the catalog", workout)))?;

    let mut schedule = app.schedule_or_empty(&cycle)?;
    let check = schedule.add_workout(day, entry.to_planned(workout.kind))?;
    app.store().replace(&schedule)?;

    println!("✓ Added {} to day {}", entry.name, day);
    if check.overtraining_risk {
        println!(
            "  ⚠ Day {} now holds {} workouts - watch your recovery",
            day,
            schedule.selections(day).len()
        );
    }
    Ok(())
}

fn cmd_remove(app: &App, day: u32, workout: WorkoutRef) -> Result<()> {
    let cycle = app.config.cycle_config()?;
    let mut schedule = app.schedule_or_empty(&cycle)?;

    if schedule.remove_workout(day, &workout)? {
        app.store().replace(&schedule)?;
        println!("✓ Removed {} from day {}", workout, day);
    } else {
        println!("Day {} does not include {}", day, workout);
    }
    Ok(())
}

fn display_schedule(schedule: &Schedule) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}-DAY CYCLE", schedule.cycle_length());
    println!("╰─────────────────────────────────────────╯");
    println!();

    for day_number in 1..=schedule.cycle_length() {
        let selections = schedule.selections(day_number);
        let labels: Vec<&str> = selections.iter().map(WorkoutSelection::label).collect();
        let shown = if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(" + ")
        };
        println!("  Day {:>2}  {}", day_number, shown);

        if validate_assignment(selections).is_ok_and(|c| c.overtraining_risk) {
            println!("          ⚠ {} workouts - watch your recovery", selections.len());
        }
    }
}

fn plural<'a>(count: u32, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
