/*!
MyFit CLI - Command-line interface for the MyFit fitness tracker store.

This CLI manages workouts, the exercise library and body progress entries
stored in a local data directory, and exports or imports whole-store backups.
*/

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use myfit_core::model::iso_millis;
use myfit_core::query::{self, ExerciseFilter};
use myfit_core::observability::{init_observability, DEFAULT_LOG_DIRECTIVE};
use myfit_core::{
    format_weight, open_store, DynStore, EntityRepository, Exercise, FitnessStore, Measurements,
    MuscleGroup, PersistOutcome, ProgressEntry, SetUpdate, StoreConfig, Workout,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use tracing::{error, info, warn};

type Store = FitnessStore<DynStore>;

#[derive(Parser)]
#[command(name = "myfit")]
#[command(about = "CLI for the MyFit fitness tracker")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Directory holding the data files
    #[arg(short, long, global = true, env = "MYFIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage workouts
    #[command(subcommand)]
    Workouts(WorkoutCommand),
    /// Manage the exercise library
    #[command(subcommand)]
    Exercises(ExerciseCommand),
    /// Manage body progress entries
    #[command(subcommand)]
    Progress(ProgressCommand),
    /// Write a backup of all data to a file
    Export {
        /// Directory the backup file is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Replace all data with the contents of a backup file
    Import {
        /// Backup file to read
        file: PathBuf,
    },
    /// Erase all data
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show workout and progress statistics
    Stats,
}

#[derive(Subcommand)]
enum WorkoutCommand {
    /// List workouts, newest first
    List {
        /// Only completed workouts
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        /// Only workouts not yet completed
        #[arg(long)]
        pending: bool,
        /// Only workouts on this local calendar day (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,
    },
    /// Show a workout with its exercises and sets
    Show { workout_id: String },
    /// Create an empty workout
    Create(CreateWorkoutArgs),
    /// Rename, re-date or annotate a workout
    Edit {
        workout_id: String,
        #[command(flatten)]
        changes: EditWorkoutArgs,
    },
    /// Flip a workout between completed and pending
    Toggle { workout_id: String },
    /// Delete a workout
    Delete {
        workout_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Add exercises from the library to a workout
    AddExercise {
        workout_id: String,
        #[arg(required = true)]
        exercise_ids: Vec<String>,
    },
    /// Remove an exercise entry from a workout
    RemoveExercise { workout_id: String, entry_id: String },
    /// Append a set to an exercise entry
    AddSet { workout_id: String, entry_id: String },
    /// Remove a set; an entry always keeps its last set
    RemoveSet {
        workout_id: String,
        entry_id: String,
        set_id: String,
    },
    /// Record reps, weight or duration for a set
    UpdateSet {
        workout_id: String,
        entry_id: String,
        set_id: String,
        #[arg(long)]
        reps: Option<u32>,
        /// Load in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Remove the recorded weight
        #[arg(long, conflicts_with = "weight")]
        clear_weight: bool,
        /// Duration in seconds
        #[arg(long)]
        time: Option<u32>,
    },
    /// Mark a set as completed
    CompleteSet {
        workout_id: String,
        entry_id: String,
        set_id: String,
        /// Mark the set as not completed instead
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Args)]
struct CreateWorkoutArgs {
    #[arg(short, long)]
    name: String,
    /// Date as YYYY-MM-DD or RFC 3339
    #[arg(long)]
    date: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct EditWorkoutArgs {
    #[arg(short, long)]
    name: Option<String>,
    /// Date as YYYY-MM-DD or RFC 3339
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

/// Body measurements in centimeters
#[derive(Args, Debug, Default)]
struct MeasurementArgs {
    #[arg(long)]
    chest: Option<f64>,
    #[arg(long)]
    waist: Option<f64>,
    #[arg(long)]
    hips: Option<f64>,
    #[arg(long)]
    biceps: Option<f64>,
    #[arg(long)]
    thighs: Option<f64>,
}

impl MeasurementArgs {
    fn is_empty(&self) -> bool {
        self.chest.is_none()
            && self.waist.is_none()
            && self.hips.is_none()
            && self.biceps.is_none()
            && self.thighs.is_none()
    }

    /// Overlay the given readings on `base`, keeping readings not given
    fn merge_into(self, base: Measurements) -> Measurements {
        Measurements {
            chest: self.chest.or(base.chest),
            waist: self.waist.or(base.waist),
            hips: self.hips.or(base.hips),
            biceps: self.biceps.or(base.biceps),
            thighs: self.thighs.or(base.thighs),
        }
    }
}

#[derive(Subcommand)]
enum ExerciseCommand {
    /// List exercises sorted by name
    List {
        /// Only exercises for this muscle group
        #[arg(short, long)]
        muscle_group: Option<MuscleGroup>,
        /// Case-insensitive match on name or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a custom exercise to the library
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        muscle_group: MuscleGroup,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Change an exercise in the library
    Edit {
        exercise_id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        muscle_group: Option<MuscleGroup>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Delete an exercise; workouts keep their references
    Delete {
        exercise_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ProgressCommand {
    /// List progress entries, newest first
    List,
    /// Record a progress entry
    Create {
        /// Date as YYYY-MM-DD or RFC 3339
        #[arg(long)]
        date: String,
        /// Body weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Body fat percentage
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        measurements: MeasurementArgs,
    },
    /// Change a progress entry
    Edit {
        entry_id: String,
        /// Date as YYYY-MM-DD or RFC 3339
        #[arg(long)]
        date: Option<String>,
        /// Body weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Body fat percentage
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        measurements: MeasurementArgs,
    },
    /// Delete a progress entry
    Delete {
        entry_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct WorkoutRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Exercises")]
    exercises: usize,
    #[tabled(rename = "Sets")]
    sets: String,
}

#[derive(Tabled)]
struct SetRow {
    #[tabled(rename = "Set ID")]
    id: String,
    #[tabled(rename = "Reps")]
    reps: u32,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Done")]
    done: String,
}

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Muscle Group")]
    muscle_group: String,
    #[tabled(rename = "Custom")]
    custom: String,
}

#[derive(Tabled)]
struct ProgressRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Body Fat")]
    body_fat: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_json)?;

    let config = create_store_config(&cli);
    let store = open_store(&config)
        .with_context(|| format!("Failed to open data directory {}", config.resolved_data_dir().display()))?;

    match cli.command {
        Commands::Workouts(command) => run_workout_command(&store, command)?,
        Commands::Exercises(command) => run_exercise_command(&store, command)?,
        Commands::Progress(command) => run_progress_command(&store, command)?,
        Commands::Export { output } => export_backup(&store, &output)?,
        Commands::Import { file } => import_backup(&store, &file)?,
        Commands::Reset { force } => reset_store(&store, force)?,
        Commands::Stats => show_stats(&store),
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) -> Result<(), anyhow::Error> {
    let default_directive = if verbose {
        "debug"
    } else {
        DEFAULT_LOG_DIRECTIVE
    };

    init_observability(json, default_directive)?;
    Ok(())
}

fn create_store_config(cli: &Cli) -> StoreConfig {
    match &cli.data_dir {
        Some(dir) => StoreConfig::file_in(dir),
        None => StoreConfig::default_file(),
    }
}

fn run_workout_command(store: &Store, command: WorkoutCommand) -> Result<(), anyhow::Error> {
    match command {
        WorkoutCommand::List {
            completed,
            pending,
            on,
        } => {
            let mut workouts = store.workouts().get_all();
            if let Some(day) = on {
                let day = parse_day(&day)?;
                workouts = query::workouts_on(&workouts, day, &Local)
                    .into_iter()
                    .cloned()
                    .collect();
            }

            let rows: Vec<WorkoutRow> = query::newest_first(&workouts)
                .into_iter()
                .filter(|w| !(completed && !w.completed) && !(pending && w.completed))
                .map(|w| WorkoutRow {
                    id: w.id.clone(),
                    name: w.name.clone(),
                    date: format_date(&w.date),
                    status: status_label(w.completed).to_string(),
                    exercises: w.exercises.len(),
                    sets: format!("{}/{}", w.completed_sets(), w.total_sets()),
                })
                .collect();

            if rows.is_empty() {
                println!("No workouts found");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        WorkoutCommand::Show { workout_id } => show_workout(store, &workout_id)?,
        WorkoutCommand::Create(args) => {
            let date = parse_date(&args.date)?;
            let mut workout = Workout::new(args.name, date);
            workout.description = args.description;
            workout.notes = args.notes;

            report(store.workouts().save(&workout), "Workout saved");
            println!("  ID: {}", workout.id);
        }
        WorkoutCommand::Edit {
            workout_id,
            changes,
        } => {
            let mut workout = load_workout(store, &workout_id)?;
            if changes.name.is_none()
                && changes.date.is_none()
                && changes.description.is_none()
                && changes.notes.is_none()
            {
                bail!("Nothing to change; pass --name, --date, --description or --notes");
            }

            if let Some(name) = changes.name {
                workout.name = name;
            }
            if let Some(date) = changes.date {
                workout.date = parse_date(&date)?;
            }
            if let Some(description) = changes.description {
                workout.description = non_empty(description);
            }
            if let Some(notes) = changes.notes {
                workout.notes = non_empty(notes);
            }
            report(store.workouts().save(&workout), "Workout updated");
        }
        WorkoutCommand::Toggle { workout_id } => {
            let mut workout = load_workout(store, &workout_id)?;
            let completed = workout.toggle_completed();
            report(
                store.workouts().save(&workout),
                &format!("Workout marked as {}", status_label(completed).to_lowercase()),
            );
        }
        WorkoutCommand::Delete { workout_id, force } => {
            let workout = load_workout(store, &workout_id)?;
            if !force && !confirm(&format!("delete workout '{}'", workout.name))? {
                println!("Deletion cancelled");
                return Ok(());
            }
            report(store.workouts().delete_by_id(&workout_id), "Workout deleted");
        }
        WorkoutCommand::AddExercise {
            workout_id,
            exercise_ids,
        } => {
            let mut workout = load_workout(store, &workout_id)?;
            let library = store.exercises().get_all();
            for exercise_id in &exercise_ids {
                if query::resolve_exercise(&library, exercise_id).is_none() {
                    bail!("Exercise not found: {exercise_id}");
                }
            }

            let added = workout.add_exercises(&exercise_ids);
            if added.is_empty() {
                println!("All exercises are already part of this workout");
                return Ok(());
            }
            report(
                store.workouts().save(&workout),
                &format!("Added {} exercise(s)", added.len()),
            );
            for entry_id in added {
                println!("  Entry ID: {entry_id}");
            }
        }
        WorkoutCommand::RemoveExercise {
            workout_id,
            entry_id,
        } => {
            let mut workout = load_workout(store, &workout_id)?;
            if !workout.remove_exercise(&entry_id) {
                bail!("Exercise entry not found: {entry_id}");
            }
            report(store.workouts().save(&workout), "Exercise removed");
        }
        WorkoutCommand::AddSet {
            workout_id,
            entry_id,
        } => {
            let mut workout = load_workout(store, &workout_id)?;
            let set_id = workout
                .add_set(&entry_id)
                .ok_or_else(|| anyhow!("Exercise entry not found: {entry_id}"))?;
            report(store.workouts().save(&workout), "Set added");
            println!("  Set ID: {set_id}");
        }
        WorkoutCommand::RemoveSet {
            workout_id,
            entry_id,
            set_id,
        } => {
            let mut workout = load_workout(store, &workout_id)?;
            if !workout.remove_set(&entry_id, &set_id) {
                bail!("Set {set_id} not found, or it is the only set of the exercise");
            }
            report(store.workouts().save(&workout), "Set removed");
        }
        WorkoutCommand::UpdateSet {
            workout_id,
            entry_id,
            set_id,
            reps,
            weight,
            clear_weight,
            time,
        } => {
            let mut updates = Vec::new();
            if let Some(reps) = reps {
                updates.push(SetUpdate::Reps(reps));
            }
            if weight.is_some() || clear_weight {
                updates.push(SetUpdate::Weight(weight));
            }
            if let Some(seconds) = time {
                updates.push(SetUpdate::Time(Some(seconds)));
            }
            if updates.is_empty() {
                bail!("Nothing to change; pass --reps, --weight, --clear-weight or --time");
            }

            let mut workout = load_workout(store, &workout_id)?;
            for update in updates {
                if !workout.update_set(&entry_id, &set_id, update) {
                    bail!("Set not found: {set_id}");
                }
            }
            report(store.workouts().save(&workout), "Set updated");
        }
        WorkoutCommand::CompleteSet {
            workout_id,
            entry_id,
            set_id,
            undo,
        } => {
            let mut workout = load_workout(store, &workout_id)?;
            if !workout.set_completed(&entry_id, &set_id, !undo) {
                bail!("Set not found: {set_id}");
            }
            let message = if undo {
                "Set marked as not completed"
            } else {
                "Set completed"
            };
            report(store.workouts().save(&workout), message);
        }
    }

    Ok(())
}

fn show_workout(store: &Store, workout_id: &str) -> Result<(), anyhow::Error> {
    info!("Showing workout: {}", workout_id);

    let workout = load_workout(store, workout_id)?;
    let library = store.exercises().get_all();

    println!("Workout Details:");
    println!("  ID: {}", workout.id);
    println!("  Name: {}", workout.name);
    println!("  Date: {}", format_date(&workout.date));
    println!("  Status: {}", status_label(workout.completed));
    if let Some(description) = &workout.description {
        println!("  Description: {description}");
    }
    if let Some(notes) = &workout.notes {
        println!("  Notes: {notes}");
    }
    println!(
        "  Sets: {}/{} completed, volume {} kg",
        workout.completed_sets(),
        workout.total_sets(),
        workout.total_volume()
    );

    for entry in workout.ordered_exercises() {
        let name = query::resolve_exercise(&library, &entry.exercise_id)
            .map(|e| e.name.as_str())
            .unwrap_or("(deleted exercise)");
        println!();
        println!("{}. {} [entry {}]", entry.order + 1, name, entry.id);

        let rows: Vec<SetRow> = entry
            .sets
            .iter()
            .map(|set| SetRow {
                id: set.id.clone(),
                reps: set.reps,
                weight: format_weight(set.weight),
                done: if set.completed { "✓" } else { "" }.to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}

fn run_exercise_command(store: &Store, command: ExerciseCommand) -> Result<(), anyhow::Error> {
    match command {
        ExerciseCommand::List {
            muscle_group,
            search,
        } => {
            let mut filter = ExerciseFilter::new();
            if let Some(group) = muscle_group {
                filter = filter.muscle_group(group);
            }
            if let Some(term) = search {
                filter = filter.search(term);
            }

            let exercises = store.exercises().get_all();
            let rows: Vec<ExerciseRow> = filter
                .apply(&exercises)
                .into_iter()
                .map(|e| ExerciseRow {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    muscle_group: e.muscle_group.to_string(),
                    custom: if e.custom_exercise == Some(true) { "yes" } else { "" }.to_string(),
                })
                .collect();

            if rows.is_empty() {
                println!("No exercises found");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        ExerciseCommand::Create {
            name,
            muscle_group,
            description,
            instructions,
        } => {
            let mut exercise = Exercise::new(name, muscle_group).custom();
            exercise.description = description;
            exercise.instructions = instructions;

            report(store.exercises().save(&exercise), "Exercise saved");
            println!("  ID: {}", exercise.id);
        }
        ExerciseCommand::Edit {
            exercise_id,
            name,
            muscle_group,
            description,
            instructions,
        } => {
            let mut exercise = store
                .exercises()
                .get_by_id(&exercise_id)
                .ok_or_else(|| anyhow!("Exercise not found: {exercise_id}"))?;
            if name.is_none()
                && muscle_group.is_none()
                && description.is_none()
                && instructions.is_none()
            {
                bail!("Nothing to change; pass --name, --muscle-group, --description or --instructions");
            }

            if let Some(name) = name {
                exercise.name = name;
            }
            if let Some(group) = muscle_group {
                exercise.muscle_group = group;
            }
            if let Some(description) = description {
                exercise.description = non_empty(description);
            }
            if let Some(instructions) = instructions {
                exercise.instructions = non_empty(instructions);
            }
            report(store.exercises().save(&exercise), "Exercise updated");
        }
        ExerciseCommand::Delete { exercise_id, force } => {
            let exercise = store
                .exercises()
                .get_by_id(&exercise_id)
                .ok_or_else(|| anyhow!("Exercise not found: {exercise_id}"))?;
            if !force && !confirm(&format!("delete exercise '{}'", exercise.name))? {
                println!("Deletion cancelled");
                return Ok(());
            }
            report(store.exercises().delete_by_id(&exercise_id), "Exercise deleted");
        }
    }

    Ok(())
}

fn run_progress_command(store: &Store, command: ProgressCommand) -> Result<(), anyhow::Error> {
    match command {
        ProgressCommand::List => {
            let entries = store.progress().get_all();
            let rows: Vec<ProgressRow> = query::progress_newest_first(&entries)
                .into_iter()
                .map(|e| ProgressRow {
                    id: e.id.clone(),
                    date: format_date(&e.date),
                    weight: format_weight(e.weight),
                    body_fat: e
                        .body_fat
                        .map(|pct| format!("{pct}%"))
                        .unwrap_or_else(|| "-".to_string()),
                    notes: e.notes.clone().unwrap_or_default(),
                })
                .collect();

            if rows.is_empty() {
                println!("No progress entries found");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        ProgressCommand::Create {
            date,
            weight,
            body_fat,
            notes,
            measurements,
        } => {
            let mut entry = ProgressEntry::new(parse_date(&date)?)
                .with_measurements(measurements.merge_into(Measurements::default()));
            entry.weight = weight;
            entry.body_fat = body_fat;
            entry.notes = notes;

            report(store.progress().save(&entry), "Progress entry saved");
            println!("  ID: {}", entry.id);
        }
        ProgressCommand::Edit {
            entry_id,
            date,
            weight,
            body_fat,
            notes,
            measurements,
        } => {
            let mut entry = store
                .progress()
                .get_by_id(&entry_id)
                .ok_or_else(|| anyhow!("Progress entry not found: {entry_id}"))?;
            if date.is_none()
                && weight.is_none()
                && body_fat.is_none()
                && notes.is_none()
                && measurements.is_empty()
            {
                bail!("Nothing to change");
            }

            if let Some(date) = date {
                entry.date = parse_date(&date)?;
            }
            if weight.is_some() {
                entry.weight = weight;
            }
            if body_fat.is_some() {
                entry.body_fat = body_fat;
            }
            if let Some(notes) = notes {
                entry.notes = non_empty(notes);
            }
            let base = entry.measurements.take().unwrap_or_default();
            entry = entry.with_measurements(measurements.merge_into(base));

            report(store.progress().save(&entry), "Progress entry updated");
        }
        ProgressCommand::Delete { entry_id, force } => {
            if store.progress().get_by_id(&entry_id).is_none() {
                bail!("Progress entry not found: {entry_id}");
            }
            if !force && !confirm(&format!("delete progress entry '{entry_id}'"))? {
                println!("Deletion cancelled");
                return Ok(());
            }
            report(store.progress().delete_by_id(&entry_id), "Progress entry deleted");
        }
    }

    Ok(())
}

fn export_backup(store: &Store, output: &Path) -> Result<(), anyhow::Error> {
    let backup = store.export_backup();
    let path = output.join(backup.suggested_filename());

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    std::fs::write(&path, backup.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Backup written to {}", path.display());
    println!(
        "  {} workouts, {} exercises, {} progress entries",
        backup.workouts.len(),
        backup.exercises.len(),
        backup.progress_entries.len()
    );
    Ok(())
}

fn import_backup(store: &Store, file: &Path) -> Result<(), anyhow::Error> {
    info!("Importing backup from {}", file.display());

    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match store.import_backup(&json) {
        Ok(import) => {
            report(import.outcome, "Backup imported");
            println!(
                "  {} workouts, {} exercises, {} progress entries",
                import.workouts, import.exercises, import.progress_entries
            );
            Ok(())
        }
        Err(e) => {
            error!("✗ Import failed: {}", e);
            Err(e.into())
        }
    }
}

fn reset_store(store: &Store, force: bool) -> Result<(), anyhow::Error> {
    if !force && !confirm("erase ALL workouts, exercises and progress entries")? {
        println!("Reset cancelled");
        return Ok(());
    }
    report(store.reset(), "All data erased");
    Ok(())
}

fn show_stats(store: &Store) {
    let workouts = store.workouts().get_all();
    let stats = store.summary();

    println!("Workouts:");
    println!("  Total: {}", stats.total);
    println!("  Completed: {}", stats.completed);
    println!("  Pending: {}", stats.pending());
    println!("  Completion rate: {:.0}%", stats.completion_rate());

    if let Some(next) = query::next_upcoming(&workouts, Utc::now()) {
        println!("  Next: {} on {}", next.name, format_date(&next.date));
    }
    for recent in query::recent_completed(&workouts, 3) {
        println!("  Recently completed: {} on {}", recent.name, format_date(&recent.date));
    }

    let series = query::weight_series(&store.progress().get_all());
    if let Some(latest) = series.iter().rev().find(|p| p.weight.is_some()) {
        println!("Progress:");
        println!(
            "  Latest weight: {} ({})",
            format_weight(latest.weight),
            format_date(&latest.date)
        );
        if let Some(first) = series.iter().find(|p| p.weight.is_some()) {
            if let (Some(start), Some(end)) = (first.weight, latest.weight) {
                println!("  Change since first entry: {:+.1} kg", end - start);
            }
        }
    }
}

fn load_workout(store: &Store, workout_id: &str) -> Result<Workout, anyhow::Error> {
    store
        .workouts()
        .get_by_id(workout_id)
        .ok_or_else(|| anyhow!("Workout not found: {workout_id}"))
}

/// Print the result of a write; a failed write leaves the command successful
fn report(outcome: PersistOutcome, success: &str) {
    match outcome {
        PersistOutcome::Persisted => println!("✓ {success}"),
        PersistOutcome::PersistFailed(reason) => {
            warn!("Write was not persisted: {}", reason);
            eprintln!("⚠ Changes could not be saved: {reason}");
        }
    }
}

fn confirm(action: &str) -> Result<bool, anyhow::Error> {
    print!("Are you sure you want to {action}? (y/N): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase().starts_with('y'))
}

fn status_label(completed: bool) -> &'static str {
    if completed {
        "Completed"
    } else {
        "Pending"
    }
}

/// An empty argument clears an optional text field
fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn parse_day(raw: &str) -> Result<NaiveDate, anyhow::Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid day '{raw}', expected YYYY-MM-DD"))
}

/// Accepts a calendar date (midnight UTC) or a full RFC 3339 timestamp
fn parse_date(raw: &str) -> Result<DateTime<Utc>, anyhow::Error> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("Invalid date: {raw}"))?;
        return Ok(Utc.from_utc_datetime(&midnight));
    }
    iso_millis::parse(raw).with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
