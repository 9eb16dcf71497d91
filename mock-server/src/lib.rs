use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

const TITLE_MAX_LEN: usize = 200;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub topic: u64,
    pub date: String,
    pub minutes: i64,
    pub planned_minutes: i64,
    pub memo: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTopic {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTopic {
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRecord {
    pub topic: u64,
    pub date: Option<String>,
    pub minutes: Option<i64>,
    pub planned_minutes: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRecord {
    pub topic: Option<u64>,
    pub date: Option<String>,
    pub minutes: Option<i64>,
    pub planned_minutes: Option<i64>,
    /// Outer `None`: key absent. `Some(None)`: explicit `null`, clears the memo.
    #[serde(default, deserialize_with = "present")]
    pub memo: Option<Option<String>>,
}

/// Wrap a present value (including `null`) in `Some`; absent keys fall back
/// to `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Default)]
pub struct Store {
    next_topic_id: u64,
    next_record_id: u64,
    topics: BTreeMap<u64, Topic>,
    records: BTreeMap<u64, Record>,
}

impl Store {
    fn allocate_topic_id(&mut self) -> u64 {
        self.next_topic_id += 1;
        self.next_topic_id
    }

    fn allocate_record_id(&mut self) -> u64 {
        self.next_record_id += 1;
        self.next_record_id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error response: status plus a field-keyed JSON body.
type Rejection = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/topics/", get(list_topics).post(create_topic))
        .route(
            "/api/topics/{id}/",
            get(get_topic).patch(update_topic).delete(delete_topic),
        )
        .route("/api/records/", get(list_records).post(create_record))
        .route(
            "/api/records/{id}/",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found(kind: &str) -> Rejection {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": format!("No {kind} matches the given query.") })),
    )
}

fn invalid(field: &str, message: String) -> Rejection {
    (StatusCode::BAD_REQUEST, Json(json!({ field: [message] })))
}

fn validate_title(title: &str) -> Result<(), Rejection> {
    if title.trim().is_empty() {
        return Err(invalid("title", "This field may not be blank.".to_string()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(invalid(
            "title",
            format!("Ensure this field has no more than {TITLE_MAX_LEN} characters."),
        ));
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<NaiveDate, Rejection> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| invalid("date", "Date has wrong format. Use YYYY-MM-DD.".to_string()))
}

fn validate_topic_ref(store: &Store, topic: u64) -> Result<(), Rejection> {
    if store.topics.contains_key(&topic) {
        Ok(())
    } else {
        Err(invalid(
            "topic",
            format!("Invalid pk \"{topic}\" - object does not exist."),
        ))
    }
}

// --- topics ---

async fn list_topics(State(db): State<Db>) -> Json<Vec<Topic>> {
    let store = db.read().await;
    Json(store.topics.values().cloned().collect())
}

async fn create_topic(
    State(db): State<Db>,
    Json(input): Json<CreateTopic>,
) -> Result<(StatusCode, Json<Topic>), Rejection> {
    validate_title(&input.title)?;
    let mut store = db.write().await;
    let topic = Topic {
        id: store.allocate_topic_id(),
        title: input.title,
    };
    store.topics.insert(topic.id, topic.clone());
    tracing::debug!(id = topic.id, "topic created");
    Ok((StatusCode::CREATED, Json(topic)))
}

async fn get_topic(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Topic>, Rejection> {
    let store = db.read().await;
    store
        .topics
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Topic"))
}

async fn update_topic(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTopic>,
) -> Result<Json<Topic>, Rejection> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    let mut store = db.write().await;
    let topic = store.topics.get_mut(&id).ok_or_else(|| not_found("Topic"))?;
    if let Some(title) = input.title {
        topic.title = title;
    }
    Ok(Json(topic.clone()))
}

/// Deleting a topic removes the records that reference it.
async fn delete_topic(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store.topics.remove(&id).ok_or_else(|| not_found("Topic"))?;
    store.records.retain(|_, record| record.topic != id);
    tracing::debug!(id, "topic deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- records ---

/// Stored dates are normalised on write; unparseable ones sort last.
fn sort_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Newest date first; same-day records keep creation order.
async fn list_records(State(db): State<Db>) -> Json<Vec<Record>> {
    let store = db.read().await;
    let mut records: Vec<Record> = store.records.values().cloned().collect();
    records.sort_by_key(|r| (std::cmp::Reverse(sort_date(&r.date)), r.id));
    Json(records)
}

async fn create_record(
    State(db): State<Db>,
    Json(input): Json<CreateRecord>,
) -> Result<(StatusCode, Json<Record>), Rejection> {
    let date = match input.date {
        Some(date) => validate_date(&date)?,
        None => chrono::Local::now().date_naive(),
    }
    .format(DATE_FORMAT)
    .to_string();
    let mut store = db.write().await;
    validate_topic_ref(&store, input.topic)?;
    let record = Record {
        id: store.allocate_record_id(),
        topic: input.topic,
        date,
        minutes: input.minutes.unwrap_or(0),
        planned_minutes: input.planned_minutes.unwrap_or(0),
        memo: input.memo,
    };
    store.records.insert(record.id, record.clone());
    tracing::debug!(id = record.id, topic = record.topic, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Record>, Rejection> {
    let store = db.read().await;
    store
        .records
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("LearningRecord"))
}

async fn update_record(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateRecord>,
) -> Result<Json<Record>, Rejection> {
    let date = match &input.date {
        Some(date) => Some(validate_date(date)?.format(DATE_FORMAT).to_string()),
        None => None,
    };
    let mut store = db.write().await;
    if !store.records.contains_key(&id) {
        return Err(not_found("LearningRecord"));
    }
    if let Some(topic) = input.topic {
        validate_topic_ref(&store, topic)?;
    }
    let record = store
        .records
        .get_mut(&id)
        .ok_or_else(|| not_found("LearningRecord"))?;
    if let Some(topic) = input.topic {
        record.topic = topic;
    }
    if let Some(date) = date {
        record.date = date;
    }
    if let Some(minutes) = input.minutes {
        record.minutes = minutes;
    }
    if let Some(planned_minutes) = input.planned_minutes {
        record.planned_minutes = planned_minutes;
    }
    if let Some(memo) = input.memo {
        record.memo = memo;
    }
    Ok(Json(record.clone()))
}

async fn delete_record(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store
        .records
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("LearningRecord"))
}
