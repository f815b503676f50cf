/*!
The fitness store: the three entity repositories over one shared backend.

This is the primary interface of the crate. It hands out the workout,
exercise and progress repositories and implements the operations that touch
all three collections at once: backup export, backup import and reset.
*/

use crate::backup::{Backup, ImportReport};
use crate::model::{Exercise, ProgressEntry, Workout};
use crate::persistence::PersistOutcome;
use crate::query::WorkoutStats;
use crate::repository::{EntityRepository, StoreRepository};
use crate::storage::KeyValueStore;
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Workout repository over a shared store
pub type WorkoutRepository<S> = StoreRepository<Workout, Arc<S>>;
/// Exercise repository over a shared store
pub type ExerciseRepository<S> = StoreRepository<Exercise, Arc<S>>;
/// Progress entry repository over a shared store
pub type ProgressRepository<S> = StoreRepository<ProgressEntry, Arc<S>>;

/// Main entry point for reading and writing fitness data
///
/// # Example
/// ```rust
/// use myfit_core::{EntityRepository, Exercise, FitnessStore, MemoryStore, MuscleGroup};
///
/// let store = FitnessStore::new(MemoryStore::new());
/// let bench = Exercise::new("Bench Press", MuscleGroup::Chest);
///
/// assert!(store.exercises().save(&bench).is_persisted());
/// assert_eq!(store.exercises().get_by_id(&bench.id), Some(bench));
/// ```
#[derive(Debug)]
pub struct FitnessStore<S: KeyValueStore> {
    backend: Arc<S>,
    workouts: WorkoutRepository<S>,
    exercises: ExerciseRepository<S>,
    progress: ProgressRepository<S>,
}

impl<S: KeyValueStore> FitnessStore<S> {
    /// Create a store over the given backend
    pub fn new(backend: S) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    /// Create a store over a backend that is also used elsewhere
    pub fn from_shared(backend: Arc<S>) -> Self {
        Self {
            workouts: StoreRepository::new(Arc::clone(&backend)),
            exercises: StoreRepository::new(Arc::clone(&backend)),
            progress: StoreRepository::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Underlying key-value backend
    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn workouts(&self) -> &WorkoutRepository<S> {
        &self.workouts
    }

    pub fn exercises(&self) -> &ExerciseRepository<S> {
        &self.exercises
    }

    pub fn progress(&self) -> &ProgressRepository<S> {
        &self.progress
    }

    /// Snapshot all three collections into a backup document
    pub fn export_backup(&self) -> Backup {
        let backup = Backup::new(
            self.workouts.get_all(),
            self.exercises.get_all(),
            self.progress.get_all(),
        );
        info!(
            workouts = backup.workouts.len(),
            exercises = backup.exercises.len(),
            progress_entries = backup.progress_entries.len(),
            "exported backup"
        );
        backup
    }

    /// Replace all three collections with the contents of a backup document
    ///
    /// # Errors
    /// * `StoreError::InvalidBackup` - If the document is rejected; nothing is written
    pub fn import_backup(&self, json: &str) -> Result<ImportReport> {
        let backup = Backup::from_json(json).map_err(|e| {
            warn!(error = %e, "rejected backup import");
            e
        })?;
        Ok(self.restore(&backup))
    }

    /// Overwrite all three collections with an already validated backup
    pub fn restore(&self, backup: &Backup) -> ImportReport {
        let outcome = self
            .workouts
            .replace_all(&backup.workouts)
            .and(self.exercises.replace_all(&backup.exercises))
            .and(self.progress.replace_all(&backup.progress_entries));

        if let PersistOutcome::PersistFailed(reason) = &outcome {
            warn!(reason = %reason, "backup restored partially");
        } else {
            info!(
                workouts = backup.workouts.len(),
                exercises = backup.exercises.len(),
                progress_entries = backup.progress_entries.len(),
                "restored backup"
            );
        }

        ImportReport {
            workouts: backup.workouts.len(),
            exercises: backup.exercises.len(),
            progress_entries: backup.progress_entries.len(),
            outcome,
        }
    }

    /// Erase all data by writing three empty collections
    pub fn reset(&self) -> PersistOutcome {
        let outcome = self
            .workouts
            .replace_all(&[])
            .and(self.exercises.replace_all(&[]))
            .and(self.progress.replace_all(&[]));
        info!(outcome = %outcome, "reset all collections");
        outcome
    }

    /// Workout counts for the dashboard
    pub fn summary(&self) -> WorkoutStats {
        WorkoutStats::from_workouts(&self.workouts.get_all())
    }
}
