/*!
Domain records persisted by the store.

All records serialize to camelCase JSON. Optional fields are omitted when
absent so that stored collections stay compatible with documents written by
earlier versions of the tracker.
*/

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// Storage key of the workout collection
pub const WORKOUTS_KEY: &str = "myfit-workouts";
/// Storage key of the exercise collection
pub const EXERCISES_KEY: &str = "myfit-exercises";
/// Storage key of the progress entry collection
pub const PROGRESS_KEY: &str = "myfit-progress";

/// A record that lives in its own persisted collection, identified by a string id
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Key of the collection this entity type is stored under
    const STORAGE_KEY: &'static str;

    /// Unique identifier of this record
    fn id(&self) -> &str;
}

/// Muscle group an exercise primarily trains
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Abs,
    FullBody,
    Cardio,
    Other,
}

impl MuscleGroup {
    /// All groups in display order
    pub const ALL: [MuscleGroup; 9] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Abs,
        MuscleGroup::FullBody,
        MuscleGroup::Cardio,
        MuscleGroup::Other,
    ];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::FullBody => "Full body",
            MuscleGroup::Cardio => "Cardio",
            MuscleGroup::Other => "Other",
        }
    }

    /// Wire name, as stored in JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Legs => "legs",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Abs => "abs",
            MuscleGroup::FullBody => "fullBody",
            MuscleGroup::Cardio => "cardio",
            MuscleGroup::Other => "other",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MuscleGroup {
    type Err = crate::StoreError;

    fn from_str(s: &str) -> crate::Result<Self> {
        MuscleGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::StoreError::validation(format!("Unknown muscle group: {s}")))
    }
}

/// A reusable exercise definition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_exercise: Option<bool>,
}

impl Exercise {
    /// Create an exercise with a freshly generated id
    pub fn new<S: Into<String>>(name: S, muscle_group: MuscleGroup) -> Self {
        Self {
            id: crate::generate_id(),
            name: name.into(),
            muscle_group,
            description: None,
            instructions: None,
            image_url: None,
            custom_exercise: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_instructions<S: Into<String>>(mut self, instructions: S) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Mark the exercise as user-defined
    pub fn custom(mut self) -> Self {
        self.custom_exercise = Some(true);
        self
    }
}

impl Entity for Exercise {
    const STORAGE_KEY: &'static str = EXERCISES_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// One performed set within a workout entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: String,
    pub reps: u32,
    /// Load in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Duration in seconds, for timed exercises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseSet {
    /// Create an incomplete set with a freshly generated id
    pub fn new(reps: u32, weight: Option<f64>) -> Self {
        Self {
            id: crate::generate_id(),
            reps,
            weight,
            time: None,
            completed: false,
            notes: None,
        }
    }

    /// Weight moved in this set, zero when unweighted
    pub fn volume(&self) -> f64 {
        self.weight.unwrap_or(0.0) * f64::from(self.reps)
    }
}

/// An exercise placed into a workout, with its sets
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: String,
    /// Non-owning reference to an [`Exercise`]; may dangle
    pub exercise_id: String,
    pub sets: Vec<ExerciseSet>,
    pub order: u32,
}

/// A named, dated training session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    pub completed: bool,
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Workout {
    /// Create an empty, pending workout with a freshly generated id
    pub fn new<S: Into<String>>(name: S, date: DateTime<Utc>) -> Self {
        Self {
            id: crate::generate_id(),
            name: name.into(),
            description: None,
            date,
            completed: false,
            exercises: Vec::new(),
            notes: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl Entity for Workout {
    const STORAGE_KEY: &'static str = WORKOUTS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body measurements in centimeters
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biceps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thighs: Option<f64>,
}

impl Measurements {
    pub fn is_empty(&self) -> bool {
        self.chest.is_none()
            && self.waist.is_none()
            && self.hips.is_none()
            && self.biceps.is_none()
            && self.thighs.is_none()
    }
}

/// A dated body-measurement snapshot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    /// Body weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Body fat percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Measurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProgressEntry {
    /// Create an entry with no readings and a freshly generated id
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            id: crate::generate_id(),
            date,
            weight: None,
            body_fat: None,
            measurements: None,
            photos: None,
            notes: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_body_fat(mut self, body_fat: f64) -> Self {
        self.body_fat = Some(body_fat);
        self
    }

    /// Attach measurements; an all-empty set is dropped
    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = (!measurements.is_empty()).then_some(measurements);
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl Entity for ProgressEntry {
    const STORAGE_KEY: &'static str = PROGRESS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Render a weight for display, `-` when absent
pub fn format_weight(weight: Option<f64>) -> String {
    match weight {
        Some(kg) => format!("{kg} kg"),
        None => "-".to_string(),
    }
}

/// Timestamps as `YYYY-MM-DDTHH:MM:SS.mmmZ`, accepting any RFC 3339 input
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn format(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|date| date.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_workout_wire_format() {
        let workout = Workout {
            id: "w1".to_string(),
            name: "Day A".to_string(),
            description: None,
            date: new_year(),
            completed: false,
            exercises: vec![WorkoutExercise {
                id: "we1".to_string(),
                exercise_id: "e1".to_string(),
                order: 0,
                sets: vec![ExerciseSet {
                    id: "s1".to_string(),
                    reps: 10,
                    weight: Some(60.0),
                    time: None,
                    completed: false,
                    notes: None,
                }],
            }],
            notes: None,
        };

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "w1",
                "name": "Day A",
                "date": "2024-01-01T00:00:00.000Z",
                "completed": false,
                "exercises": [{
                    "id": "we1",
                    "exerciseId": "e1",
                    "order": 0,
                    "sets": [{"id": "s1", "reps": 10, "weight": 60.0, "completed": false}]
                }]
            })
        );
    }

    #[test]
    fn test_exercise_accepts_original_documents() {
        let json = r#"{"id":"e1","name":"Bench Press","muscleGroup":"chest","customExercise":true}"#;
        let exercise: Exercise = serde_json::from_str(json).unwrap();

        assert_eq!(exercise.muscle_group, MuscleGroup::Chest);
        assert_eq!(exercise.custom_exercise, Some(true));
        assert!(exercise.description.is_none());
    }

    #[test]
    fn test_full_body_wire_name() {
        let json = serde_json::to_string(&MuscleGroup::FullBody).unwrap();
        assert_eq!(json, "\"fullBody\"");
        assert_eq!("fullbody".parse::<MuscleGroup>().unwrap(), MuscleGroup::FullBody);
        assert!("wings".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_date_accepts_offsets() {
        let json = r#"{"id":"p1","date":"2024-01-01T02:00:00+02:00","weight":80.5}"#;
        let entry: ProgressEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, new_year());
        assert_eq!(entry.weight, Some(80.5));
    }

    #[test]
    fn test_progress_entry_measurements() {
        let entry = ProgressEntry::new(new_year()).with_measurements(Measurements::default());
        assert!(entry.measurements.is_none());

        let entry = ProgressEntry::new(new_year()).with_measurements(Measurements {
            waist: Some(82.0),
            ..Measurements::default()
        });
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["measurements"], serde_json::json!({"waist": 82.0}));
    }

    #[test]
    fn test_set_volume() {
        assert_eq!(ExerciseSet::new(10, Some(60.0)).volume(), 600.0);
        assert_eq!(ExerciseSet::new(10, None).volume(), 0.0);
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(Some(62.5)), "62.5 kg");
        assert_eq!(format_weight(None), "-");
    }
}
