use crate::dates;
use crate::errors::{AppError, JournalError};
use crate::models::{
    parse_tags, DeleteResponse, Entry, EntryFilter, EntryRequest, EntryResponse, ListQuery,
    MoodRequest, MoodResponse, Notice, StatsResponse, Tag,
};
use crate::moods::{MonthGrid, MoodRecord};
use crate::state::AppState;
use crate::stats::build_stats;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let Query(query) = query?;
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<EntryFilter>()?,
        None => EntryFilter::All,
    };

    let store = state.store.lock().await;
    Ok(Json(store.list(&filter)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Entry>, AppError> {
    let Path(id) = id?;
    let store = state.store.lock().await;
    let entry = store.get(id).cloned().ok_or(JournalError::NotFound(id))?;
    Ok(Json(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let Json(payload) = payload?;
    let tags = parse_tags(&payload.tags)?;

    let mut store = state.store.lock().await;
    let entry = store.insert(&payload.content, tags).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            entry,
            notice: Notice::success("Gratitude entry saved!"),
        }),
    ))
}

pub async fn update_entry(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<Json<EntryResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let tags = parse_tags(&payload.tags)?;

    let mut store = state.store.lock().await;
    let entry = store.update(id, &payload.content, tags).await?;

    Ok(Json(EntryResponse {
        entry,
        notice: Notice::success("Gratitude entry updated."),
    }))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Path(id) = id?;
    let mut store = state.store.lock().await;
    store.delete(id).await?;

    Ok(Json(DeleteResponse {
        id,
        notice: Notice::success("Gratitude entry deleted."),
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.lock().await;
    Json(build_stats(store.entries()))
}

pub async fn get_tags() -> Json<Vec<Tag>> {
    Json(Tag::ALL.to_vec())
}

pub async fn list_moods(State(state): State<AppState>) -> Json<Vec<MoodRecord>> {
    let moods = state.moods.lock().await;
    Json(moods.records().to_vec())
}

pub async fn get_today_mood(State(state): State<AppState>) -> Json<Option<MoodRecord>> {
    let moods = state.moods.lock().await;
    Json(moods.for_day(dates::today()).cloned())
}

pub async fn log_mood(
    State(state): State<AppState>,
    payload: Result<Json<MoodRequest>, JsonRejection>,
) -> Result<Json<MoodResponse>, AppError> {
    let Json(payload) = payload?;

    let mut moods = state.moods.lock().await;
    let logged = moods.log_mood(payload.mood, payload.note).await?;

    Ok(Json(MoodResponse {
        logged,
        notice: Notice::success("Mood saved successfully!"),
    }))
}

pub async fn get_mood_month(State(state): State<AppState>) -> Json<MonthGrid> {
    let moods = state.moods.lock().await;
    Json(moods.month_grid(dates::today()))
}
