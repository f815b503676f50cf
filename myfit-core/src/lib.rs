/*!
# MyFit Core

Local store for a personal fitness tracker: workouts, exercises and body
progress measurements.

The crate provides:

- Typed records for workouts, exercises, sets and progress entries
- A pluggable key-value storage port with file and in-memory adapters
- A JSON persistence adapter that never fails a read and reports failed writes
- CRUD repositories per entity collection
- Workout editing, queries, and whole-store backup export/import

## Architecture

Each collection is stored as one JSON array under its own key. Repositories
read the whole collection, change it, and write it back; there are no
cross-collection transactions. References from workouts to exercises are by
id and may dangle after an exercise is deleted.

## Usage

```rust
use chrono::Utc;
use myfit_core::{EntityRepository, Exercise, FitnessStore, MemoryStore, MuscleGroup, Workout};

let store = FitnessStore::new(MemoryStore::new());

let squat = Exercise::new("Squat", MuscleGroup::Legs);
let _ = store.exercises().save(&squat);

let mut workout = Workout::new("Leg day", Utc::now());
workout.add_exercises([squat.id.as_str()]);
let outcome = store.workouts().save(&workout);
assert!(outcome.is_persisted());

let backup = store.export_backup();
assert_eq!(backup.workouts.len(), 1);
```
*/

pub mod backup;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod observability;
pub mod persistence;
pub mod query;
pub mod repository;
pub mod storage;
pub mod store;
pub mod workout;


pub use backup::{Backup, ImportReport};
pub use config::{open_store, StoreBackend, StoreConfig};
pub use error::{Result, StoreError};
pub use id::generate_id;
pub use model::{
    format_weight, Entity, Exercise, ExerciseSet, Measurements, MuscleGroup, ProgressEntry,
    Workout, WorkoutExercise,
};
pub use persistence::{PersistOutcome, Persistence};
pub use query::{ExerciseFilter, WorkoutStats};
pub use repository::{EntityRepository, StoreRepository};
pub use storage::{DynStore, FileStore, KeyValueStore, MemoryStore};
pub use store::FitnessStore;
pub use workout::SetUpdate;
