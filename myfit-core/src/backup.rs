/*!
Backup documents: all three collections in one JSON file.

Export reads every collection and stamps the document with the export time.
Import is all-or-nothing at the validation stage: a document missing any
collection, or holding one that does not decode, is rejected before anything
is written. Once accepted, the three collections are overwritten one after
another without a transaction, so a failed write can leave them out of step.
*/

use crate::model::{Exercise, ProgressEntry, Workout};
use crate::persistence::PersistOutcome;
use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Top-level fields every backup must carry
pub const REQUIRED_FIELDS: [&str; 3] = ["workouts", "exercises", "progressEntries"];

/// Full export of the store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub workouts: Vec<Workout>,
    pub exercises: Vec<Exercise>,
    pub progress_entries: Vec<ProgressEntry>,
    #[serde(with = "crate::model::iso_millis")]
    pub export_date: DateTime<Utc>,
}

impl Backup {
    /// Bundle the collections, stamped with the current time
    pub fn new(
        workouts: Vec<Workout>,
        exercises: Vec<Exercise>,
        progress_entries: Vec<ProgressEntry>,
    ) -> Self {
        Self {
            workouts,
            exercises,
            progress_entries,
            export_date: Utc::now(),
        }
    }

    /// Human-readable JSON with two-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(StoreError::Json)
    }

    /// File name offered for the download, e.g. `myfitness_backup_2024-01-31.json`
    pub fn suggested_filename(&self) -> String {
        format!(
            "myfitness_backup_{}.json",
            self.export_date.format("%Y-%m-%d")
        )
    }

    /// Parse and validate a backup document
    ///
    /// Each of `workouts`, `exercises` and `progressEntries` must be present,
    /// non-null, and decode into its record type. A missing or malformed
    /// `exportDate` is tolerated and replaced by the current time.
    ///
    /// # Errors
    /// * `StoreError::InvalidBackup` - If the document is not JSON, is not an
    ///   object, or any collection is missing or undecodable
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| StoreError::invalid_backup(format!("not valid JSON: {e}")))?;

        let Value::Object(mut fields) = document else {
            return Err(StoreError::invalid_backup("expected a JSON object"));
        };

        for field in REQUIRED_FIELDS {
            match fields.get(field) {
                None | Some(Value::Null) => {
                    return Err(StoreError::invalid_backup(format!(
                        "missing '{field}' collection"
                    )));
                }
                Some(_) => {}
            }
        }

        let workouts = take_collection(&mut fields, "workouts")?;
        let exercises = take_collection(&mut fields, "exercises")?;
        let progress_entries = take_collection(&mut fields, "progressEntries")?;

        let export_date = fields
            .get("exportDate")
            .and_then(Value::as_str)
            .and_then(|raw| crate::model::iso_millis::parse(raw).ok())
            .unwrap_or_else(Utc::now);

        Ok(Self {
            workouts,
            exercises,
            progress_entries,
            export_date,
        })
    }
}

fn take_collection<T: DeserializeOwned>(
    fields: &mut serde_json::Map<String, Value>,
    field: &str,
) -> Result<Vec<T>> {
    let value = fields.remove(field).unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| StoreError::invalid_backup(format!("'{field}' is malformed: {e}")))
}

/// What an accepted import wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub workouts: usize,
    pub exercises: usize,
    pub progress_entries: usize,
    /// First failed write, if any
    pub outcome: PersistOutcome,
}
