// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a task within the system.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: Allows conversion to/from JSON, which is
///    also the persisted on-disk representation of the collection.
/// - `Debug`: Enables displaying the structure for debugging (e.g., `println!("{:?}", task)`).
/// - `Clone`: Allows creating copies of the object.
/// - `PartialEq`: Field-for-field comparison, mainly for round-trip checks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,

    pub text: String,

    pub completed: bool,

    // Set once at creation and never touched again, even by edits.
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub priority: Priority,

    // We use NaiveDate because we are only interested in the day,
    // without a timezone. The historical format encodes "no due date"
    // as an empty string, so the field goes through `due_date_repr`.
    #[serde(default, with = "due_date_repr")]
    pub due_date: Option<NaiveDate>,

    // Fields this version does not know about are kept verbatim so a
    // load/save cycle never drops data written by another version.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// A task is overdue once its due date has passed while it is still open.
    /// Tasks without a due date are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => !self.completed && due < today,
            None => false,
        }
    }
}

/// Task priority. The variant order doubles as the display rank, so the
/// derived `Ord` sorts `High` before `Medium` before `Low`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Which part of the collection a read should see.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

/// Sort criterion for the displayed list. The serialized names match the
/// values the frontend sends (`createdAt`, `priority`, `dueDate`).
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Priority,
    DueDate,
}

/// Structure used to receive task creation data from the API.
/// It's a good practice to separate persisted models (`Task`)
/// from API models (`CreateTaskPayload`), as they may have different fields.
/// Here, `priority` and `due_date` are optional.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub text: String,
    // Medium when the client does not send a priority.
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "due_date_repr")]
    pub due_date: Option<NaiveDate>,
}

/// Structure used to receive task edit data from the API. An edit always
/// carries the full set of editable fields; `id`, `completed` and
/// `created_at` cannot be changed through it.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "due_date_repr")]
    pub due_date: Option<NaiveDate>,
}

/// Wire representation of the due date. The historical format uses an empty
/// string for "no due date", so absence serializes as `""` and both `""` and
/// `null` deserialize back to `None`.
pub mod due_date_repr {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(text) => text
                .parse::<NaiveDate>()
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
