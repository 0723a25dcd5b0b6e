use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// Wire and comparison format for department thresholds.
pub const THRESHOLD_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Department {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Engineering")]
    pub department_name: String,

    #[serde(serialize_with = "serialize_threshold")]
    #[schema(example = "09:00:00", value_type = String)]
    pub max_clock_in_time: NaiveTime,

    #[serde(serialize_with = "serialize_threshold")]
    #[schema(example = "17:00:00", value_type = String)]
    pub max_clock_out_time: NaiveTime,

    #[schema(example = "2024-01-01T08:00:00", value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,

    #[schema(example = "2024-01-01T08:00:00", value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
}

/// Validated fields for creating or rewriting a department.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentInput {
    pub department_name: String,
    pub max_clock_in_time: NaiveTime,
    pub max_clock_out_time: NaiveTime,
}

pub fn serialize_threshold<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(THRESHOLD_FORMAT))
}
