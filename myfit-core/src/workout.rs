/*!
Editing operations on a workout's exercise entries and sets.

These mutate a [`Workout`] in memory only; persist the result with the
workout repository. Entry `order` values are kept contiguous from zero.
*/

use crate::model::{ExerciseSet, Workout, WorkoutExercise};
use crate::generate_id;

/// Reps given to a new set when there is nothing to copy from
pub const DEFAULT_REPS: u32 = 12;

/// Change to a single field of a set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetUpdate {
    Reps(u32),
    Weight(Option<f64>),
    Time(Option<u32>),
}

impl Workout {
    /// Append entries for the given exercises, skipping exercises already in the workout
    ///
    /// Each new entry starts with one incomplete set of [`DEFAULT_REPS`] reps.
    ///
    /// # Returns
    /// Ids of the newly created entries
    pub fn add_exercises<I, S>(&mut self, exercise_ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next_order = self
            .exercises
            .iter()
            .map(|entry| entry.order.saturating_add(1))
            .max()
            .unwrap_or(0);
        let mut added = Vec::new();

        for exercise_id in exercise_ids {
            let exercise_id = exercise_id.as_ref();
            if self.exercises.iter().any(|entry| entry.exercise_id == exercise_id) {
                continue;
            }

            let entry = WorkoutExercise {
                id: generate_id(),
                exercise_id: exercise_id.to_string(),
                sets: vec![ExerciseSet::new(DEFAULT_REPS, None)],
                order: next_order,
            };
            next_order = next_order.saturating_add(1);
            added.push(entry.id.clone());
            self.exercises.push(entry);
        }

        added
    }

    /// Remove an entry and renumber the remaining entries `0..n` in their current order
    ///
    /// # Returns
    /// True if an entry was removed
    pub fn remove_exercise(&mut self, entry_id: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|entry| entry.id != entry_id);
        let removed = self.exercises.len() != before;

        if removed {
            self.normalize_order();
        }
        removed
    }

    /// Sort entries by `order` and renumber them from zero
    pub fn normalize_order(&mut self) {
        self.exercises.sort_by_key(|entry| entry.order);
        for (index, entry) in self.exercises.iter_mut().enumerate() {
            entry.order = index as u32;
        }
    }

    /// Entries in execution order
    pub fn ordered_exercises(&self) -> Vec<&WorkoutExercise> {
        let mut entries: Vec<&WorkoutExercise> = self.exercises.iter().collect();
        entries.sort_by_key(|entry| entry.order);
        entries
    }

    pub fn entry(&self, entry_id: &str) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|entry| entry.id == entry_id)
    }

    pub fn entry_mut(&mut self, entry_id: &str) -> Option<&mut WorkoutExercise> {
        self.exercises.iter_mut().find(|entry| entry.id == entry_id)
    }

    /// Append a set to an entry, copying reps and weight from its last set
    ///
    /// # Returns
    /// Id of the new set, or `None` if the entry doesn't exist
    pub fn add_set(&mut self, entry_id: &str) -> Option<String> {
        let entry = self.entry_mut(entry_id)?;
        let (reps, weight) = match entry.sets.last() {
            Some(last) if last.reps > 0 => (last.reps, last.weight),
            Some(last) => (DEFAULT_REPS, last.weight),
            None => (DEFAULT_REPS, None),
        };

        let set = ExerciseSet::new(reps, weight);
        let id = set.id.clone();
        entry.sets.push(set);
        Some(id)
    }

    /// Remove a set from an entry
    ///
    /// An entry always keeps at least one set, so removing its only set is refused.
    ///
    /// # Returns
    /// True if the set was removed
    pub fn remove_set(&mut self, entry_id: &str, set_id: &str) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            return false;
        };
        if entry.sets.len() <= 1 {
            return false;
        }

        let before = entry.sets.len();
        entry.sets.retain(|set| set.id != set_id);
        entry.sets.len() != before
    }

    fn set_mut(&mut self, entry_id: &str, set_id: &str) -> Option<&mut ExerciseSet> {
        self.entry_mut(entry_id)?
            .sets
            .iter_mut()
            .find(|set| set.id == set_id)
    }

    /// Mark a set done or not done
    ///
    /// # Returns
    /// True if the set exists
    pub fn set_completed(&mut self, entry_id: &str, set_id: &str, completed: bool) -> bool {
        match self.set_mut(entry_id, set_id) {
            Some(set) => {
                set.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Change one field of a set
    ///
    /// # Returns
    /// True if the set exists
    pub fn update_set(&mut self, entry_id: &str, set_id: &str, update: SetUpdate) -> bool {
        let Some(set) = self.set_mut(entry_id, set_id) else {
            return false;
        };

        match update {
            SetUpdate::Reps(reps) => set.reps = reps,
            SetUpdate::Weight(weight) => set.weight = weight,
            SetUpdate::Time(time) => set.time = time,
        }
        true
    }

    /// Flip the workout's completed flag, independent of its sets
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|entry| entry.sets.len()).sum()
    }

    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|entry| entry.sets.iter())
            .filter(|set| set.completed)
            .count()
    }

    /// Sum of weight × reps over all sets
    pub fn total_volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|entry| entry.sets.iter())
            .map(ExerciseSet::volume)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn workout() -> Workout {
        Workout::new("Day A", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn orders(workout: &Workout) -> Vec<u32> {
        workout.ordered_exercises().into_iter().map(|e| e.order).collect()
    }

    #[test]
    fn test_add_exercises_skips_duplicates() {
        let mut workout = workout();

        let added = workout.add_exercises(["e1", "e2"]);
        assert_eq!(added.len(), 2);

        let added = workout.add_exercises(["e2", "e3"]);
        assert_eq!(added.len(), 1);

        let exercise_ids: Vec<&str> = workout
            .ordered_exercises()
            .into_iter()
            .map(|e| e.exercise_id.as_str())
            .collect();
        assert_eq!(exercise_ids, vec!["e1", "e2", "e3"]);
        assert_eq!(orders(&workout), vec![0, 1, 2]);
    }

    #[test]
    fn test_new_entry_has_default_set() {
        let mut workout = workout();
        let added = workout.add_exercises(["e1"]);

        let entry = workout.entry(&added[0]).unwrap();
        assert_eq!(entry.sets.len(), 1);
        assert_eq!(entry.sets[0].reps, DEFAULT_REPS);
        assert!(entry.sets[0].weight.is_none());
        assert!(!entry.sets[0].completed);
    }

    #[test]
    fn test_remove_exercise_renumbers() {
        let mut workout = workout();
        let added = workout.add_exercises(["e1", "e2", "e3", "e4"]);

        assert!(workout.remove_exercise(&added[1]));
        assert_eq!(orders(&workout), vec![0, 1, 2]);

        let exercise_ids: Vec<&str> = workout
            .ordered_exercises()
            .into_iter()
            .map(|e| e.exercise_id.as_str())
            .collect();
        assert_eq!(exercise_ids, vec!["e1", "e3", "e4"]);

        assert!(!workout.remove_exercise("missing"));
    }

    #[test]
    fn test_add_after_remove_continues_order() {
        let mut workout = workout();
        let added = workout.add_exercises(["e1", "e2"]);
        workout.remove_exercise(&added[0]);

        workout.add_exercises(["e3"]);
        assert_eq!(orders(&workout), vec![0, 1]);
    }

    #[test]
    fn test_add_after_maximal_stored_order() {
        let mut workout = workout();
        workout.add_exercises(["e1"]);
        workout.exercises[0].order = u32::MAX;

        let added = workout.add_exercises(["e2", "e3"]);
        assert_eq!(added.len(), 2);
        assert_eq!(workout.exercises.len(), 3);

        workout.normalize_order();
        assert_eq!(orders(&workout), vec![0, 1, 2]);
        assert_eq!(workout.ordered_exercises()[0].exercise_id, "e1");
    }

    #[test]
    fn test_add_set_copies_last_set() {
        let mut workout = workout();
        let entry_id = workout.add_exercises(["e1"]).remove(0);
        let first_set = workout.entry(&entry_id).unwrap().sets[0].id.clone();
        workout.update_set(&entry_id, &first_set, SetUpdate::Reps(8));
        workout.update_set(&entry_id, &first_set, SetUpdate::Weight(Some(80.0)));

        let new_set = workout.add_set(&entry_id).unwrap();

        let entry = workout.entry(&entry_id).unwrap();
        let set = entry.sets.iter().find(|s| s.id == new_set).unwrap();
        assert_eq!(set.reps, 8);
        assert_eq!(set.weight, Some(80.0));
        assert!(!set.completed);

        assert!(workout.add_set("missing").is_none());
    }

    #[test]
    fn test_add_set_after_zero_reps_uses_default() {
        let mut workout = workout();
        let entry_id = workout.add_exercises(["e1"]).remove(0);
        let first_set = workout.entry(&entry_id).unwrap().sets[0].id.clone();
        workout.update_set(&entry_id, &first_set, SetUpdate::Reps(0));

        workout.add_set(&entry_id);
        assert_eq!(workout.entry(&entry_id).unwrap().sets[1].reps, DEFAULT_REPS);
    }

    #[test]
    fn test_remove_set_keeps_last_one() {
        let mut workout = workout();
        let entry_id = workout.add_exercises(["e1"]).remove(0);
        let first_set = workout.entry(&entry_id).unwrap().sets[0].id.clone();

        assert!(!workout.remove_set(&entry_id, &first_set));

        let second_set = workout.add_set(&entry_id).unwrap();
        assert!(workout.remove_set(&entry_id, &first_set));

        let sets = &workout.entry(&entry_id).unwrap().sets;
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, second_set);
    }

    #[test]
    fn test_completion_is_independent() {
        let mut workout = workout();
        let entry_id = workout.add_exercises(["e1"]).remove(0);
        let set_id = workout.entry(&entry_id).unwrap().sets[0].id.clone();

        assert!(workout.toggle_completed());
        assert_eq!(workout.completed_sets(), 0);

        assert!(workout.set_completed(&entry_id, &set_id, true));
        assert!(!workout.toggle_completed());
        assert_eq!(workout.completed_sets(), 1);

        assert!(!workout.set_completed(&entry_id, "missing", true));
    }

    #[test]
    fn test_total_volume() {
        let mut workout = workout();
        let entry_id = workout.add_exercises(["e1"]).remove(0);
        let set_id = workout.entry(&entry_id).unwrap().sets[0].id.clone();
        workout.update_set(&entry_id, &set_id, SetUpdate::Weight(Some(50.0)));
        workout.add_set(&entry_id);

        assert_eq!(workout.total_sets(), 2);
        assert_eq!(workout.total_volume(), 2.0 * 50.0 * DEFAULT_REPS as f64);
    }
}
