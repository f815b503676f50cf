/*!
Read-side helpers over loaded collections: filtering, sorting and summaries.

Repositories return collections in storage order; everything that needs a
particular order or subset goes through here.
*/

use crate::model::{Exercise, MuscleGroup, ProgressEntry, Workout};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Filter for the exercise library
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    /// Only exercises training this group
    pub muscle_group: Option<MuscleGroup>,
    /// Case-insensitive substring of the name or description
    pub search: Option<String>,
}

impl ExerciseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn muscle_group(mut self, group: MuscleGroup) -> Self {
        self.muscle_group = Some(group);
        self
    }

    pub fn search<S: Into<String>>(mut self, term: S) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn matches(&self, exercise: &Exercise) -> bool {
        if let Some(group) = self.muscle_group {
            if exercise.muscle_group != group {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                exercise.name.to_lowercase().contains(&term)
                    || exercise
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }

    /// Matching exercises sorted by name
    pub fn apply<'a>(&self, exercises: &'a [Exercise]) -> Vec<&'a Exercise> {
        let mut matching: Vec<&Exercise> =
            exercises.iter().filter(|e| self.matches(e)).collect();
        matching.sort_by(|a, b| compare_names(&a.name, &b.name));
        matching
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Exercises sorted by name
pub fn sorted_by_name(exercises: &[Exercise]) -> Vec<&Exercise> {
    ExerciseFilter::default().apply(exercises)
}

/// Look up the exercise an entry refers to
///
/// `None` means the exercise was deleted; callers show it as unavailable.
pub fn resolve_exercise<'a>(exercises: &'a [Exercise], exercise_id: &str) -> Option<&'a Exercise> {
    exercises.iter().find(|e| e.id == exercise_id)
}

/// Workouts newest first
pub fn newest_first(workouts: &[Workout]) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Workouts scheduled on a calendar day as seen in time zone `tz`
///
/// Pass `&chrono::Local` for the user's calendar, `&Utc` for stored dates as-is.
pub fn workouts_on<'a, Tz: TimeZone>(
    workouts: &'a [Workout],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Workout> {
    workouts
        .iter()
        .filter(|w| w.date.with_timezone(tz).date_naive() == day)
        .collect()
}

/// Most recent completed workouts, newest first
pub fn recent_completed(workouts: &[Workout], limit: usize) -> Vec<&Workout> {
    newest_first(workouts)
        .into_iter()
        .filter(|w| w.completed)
        .take(limit)
        .collect()
}

/// Earliest pending workout scheduled at or after `now`
pub fn next_upcoming(workouts: &[Workout], now: DateTime<Utc>) -> Option<&Workout> {
    workouts
        .iter()
        .filter(|w| !w.completed && w.date >= now)
        .min_by_key(|w| w.date)
}

/// Counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkoutStats {
    pub total: usize,
    pub completed: usize,
}

impl WorkoutStats {
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        Self {
            total: workouts.len(),
            completed: workouts.iter().filter(|w| w.completed).count(),
        }
    }

    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    /// Completed share in percent, zero when there are no workouts
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Progress entries newest first
pub fn progress_newest_first(entries: &[ProgressEntry]) -> Vec<&ProgressEntry> {
    let mut sorted: Vec<&ProgressEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// One point of the body-weight chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
}

/// Weight and body-fat readings in date order, skipping entries with neither
pub fn weight_series(entries: &[ProgressEntry]) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = entries
        .iter()
        .filter(|e| e.weight.is_some() || e.body_fat.is_some())
        .map(|e| ProgressPoint {
            date: e.date,
            weight: e.weight,
            body_fat: e.body_fat,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn exercise(name: &str, group: MuscleGroup, description: Option<&str>) -> Exercise {
        let mut exercise = Exercise::new(name, group);
        exercise.description = description.map(str::to_string);
        exercise
    }

    fn workout(name: &str, date: DateTime<Utc>, completed: bool) -> Workout {
        let mut workout = Workout::new(name, date);
        workout.completed = completed;
        workout
    }

    #[test]
    fn test_exercise_filter() {
        let exercises = vec![
            exercise("squat", MuscleGroup::Legs, None),
            exercise("Bench Press", MuscleGroup::Chest, Some("Flat barbell press")),
            exercise("Incline Press", MuscleGroup::Chest, None),
            exercise("Leg Press", MuscleGroup::Legs, None),
        ];

        let names = |found: Vec<&Exercise>| -> Vec<String> {
            found.into_iter().map(|e| e.name.clone()).collect()
        };

        assert_eq!(
            names(ExerciseFilter::new().apply(&exercises)),
            vec!["Bench Press", "Incline Press", "Leg Press", "squat"]
        );
        assert_eq!(
            names(ExerciseFilter::new().muscle_group(MuscleGroup::Chest).apply(&exercises)),
            vec!["Bench Press", "Incline Press"]
        );
        assert_eq!(
            names(ExerciseFilter::new().search("PRESS").apply(&exercises)),
            vec!["Bench Press", "Incline Press", "Leg Press"]
        );
        assert_eq!(
            names(ExerciseFilter::new().search("barbell").apply(&exercises)),
            vec!["Bench Press"]
        );
        assert_eq!(
            names(
                ExerciseFilter::new()
                    .muscle_group(MuscleGroup::Legs)
                    .search("press")
                    .apply(&exercises)
            ),
            vec!["Leg Press"]
        );
        assert_eq!(ExerciseFilter::new().search("   ").apply(&exercises).len(), 4);
    }

    #[test]
    fn test_resolve_exercise_tolerates_dangling() {
        let exercises = vec![exercise("Squat", MuscleGroup::Legs, None)];
        let id = exercises[0].id.clone();

        assert!(resolve_exercise(&exercises, &id).is_some());
        assert!(resolve_exercise(&exercises, "deleted").is_none());
    }

    #[test]
    fn test_workouts_on_day() {
        let workouts = vec![
            workout("a", at(1, 8), false),
            workout("b", at(1, 23), true),
            workout("c", at(2, 0), false),
        ];

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let found: Vec<&str> = workouts_on(&workouts, day, &Utc)
            .into_iter()
            .map(|w| w.name.as_str())
            .collect();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_workouts_on_day_in_other_time_zone() {
        let workouts = vec![
            workout("a", at(1, 8), false),
            workout("b", at(1, 23), true),
            workout("c", at(2, 0), false),
        ];
        let berlin_winter = FixedOffset::east_opt(3600).unwrap();

        // 23:00 UTC on the 1st is already the 2nd at UTC+1
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let found: Vec<&str> = workouts_on(&workouts, day, &berlin_winter)
            .into_iter()
            .map(|w| w.name.as_str())
            .collect();
        assert_eq!(found, vec!["b", "c"]);
    }

    #[test]
    fn test_recent_and_upcoming() {
        let workouts = vec![
            workout("old", at(1, 8), true),
            workout("newer", at(3, 8), true),
            workout("skipped", at(2, 8), false),
            workout("later", at(10, 8), false),
            workout("soon", at(5, 8), false),
        ];

        let recent: Vec<&str> = recent_completed(&workouts, 5)
            .into_iter()
            .map(|w| w.name.as_str())
            .collect();
        assert_eq!(recent, vec!["newer", "old"]);
        assert_eq!(recent_completed(&workouts, 1).len(), 1);

        let upcoming = next_upcoming(&workouts, at(4, 0)).unwrap();
        assert_eq!(upcoming.name, "soon");
        assert!(next_upcoming(&workouts, at(11, 0)).is_none());
    }

    #[test]
    fn test_workout_stats() {
        let workouts = vec![
            workout("a", at(1, 8), true),
            workout("b", at(2, 8), false),
            workout("c", at(3, 8), false),
            workout("d", at(4, 8), true),
        ];

        let stats = WorkoutStats::from_workouts(&workouts);
        assert_eq!(stats, WorkoutStats { total: 4, completed: 2 });
        assert_eq!(stats.pending(), 2);
        assert_eq!(stats.completion_rate(), 50.0);
        assert_eq!(WorkoutStats::default().completion_rate(), 0.0);
    }

    #[test]
    fn test_weight_series() {
        let entries = vec![
            ProgressEntry::new(at(3, 0)).with_weight(81.0),
            ProgressEntry::new(at(1, 0)).with_weight(82.0).with_body_fat(18.0),
            ProgressEntry::new(at(2, 0)).with_notes("no readings"),
        ];

        let series = weight_series(&entries);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].weight, Some(82.0));
        assert_eq!(series[0].body_fat, Some(18.0));
        assert_eq!(series[1].weight, Some(81.0));

        let newest = progress_newest_first(&entries);
        assert_eq!(newest[0].date, at(3, 0));
        assert_eq!(newest[2].date, at(1, 0));
    }
}
