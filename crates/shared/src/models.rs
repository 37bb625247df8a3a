use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEventKind {
    Food,
    Activity,
    Water,
}

/// One immutable user action. Kind-specific fields are optional and treated
/// as zero by the aggregation engine when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: i64,
    pub user_id: i64,
    pub kind: LogEventKind,
    pub logged_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_heart_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewLogEvent {
    pub kind: LogEventKind,
    pub logged_at: Option<DateTime<Utc>>,
    pub food_name: Option<String>,
    pub meal_category: Option<String>,
    pub portion: Option<String>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub activity_kind: Option<String>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub calories_burned: Option<f64>,
    pub volume_ml: Option<f64>,
}

impl NewLogEvent {
    pub fn new(kind: LogEventKind) -> Self {
        Self {
            kind,
            logged_at: None,
            food_name: None,
            meal_category: None,
            portion: None,
            calories: None,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            activity_kind: None,
            duration_minutes: None,
            distance_km: None,
            avg_heart_rate: None,
            calories_burned: None,
            volume_ml: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub daily_calorie_target: f64,
    pub daily_water_target_ml: f64,
    pub time_zone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachMessage {
    pub id: i64,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: Uuid,
    pub messages: Vec<CoachMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFoodRequest {
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCoachMessageRequest {
    pub conversation_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCoachMessageResponse {
    pub user_message: CoachMessage,
    pub assistant_message: CoachMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFoodRequest {
    pub food_name: String,
    #[serde(default)]
    pub meal_category: Option<String>,
    #[serde(default)]
    pub portion: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogActivityRequest {
    pub activity_kind: String,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub avg_heart_rate: Option<f64>,
    #[serde(default)]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWaterRequest {
    pub volume_ml: f64,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
