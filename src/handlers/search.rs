use axum::{
    extract::{path::ErrorKind, rejection::PathRejection, Path, RawQuery, State},
    http::Uri,
    response::Json,
    routing::get,
    Router,
};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::{
    auth::Caller,
    errors::Result,
    models::{ListingSummary, SearchCriteria, SearchParams, SearchResponse, SponsorSummary},
    query::{build_search_query, BindValue, QueryFragment},
    region, validation, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_listings))
        .route("/:query", get(search_listings))
}

fn parse_search_params(query: &str) -> SearchParams {
    let mut params = SearchParams::default();
    for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = Some(v.into_owned());
        match k.as_ref() {
            "limit" => params.limit = value,
            "offset" => params.offset = value,
            "userRegion" => params.user_region = value,
            "status" => params.status = value,
            "skills" => params.skills = value,
            _ => {}
        }
    }
    params
}

/// Lossily decoded last segment of the request path, used when the
/// `:query` parameter is not valid UTF-8 once percent-decoded.
fn raw_path_segment(uri: &Uri) -> String {
    let segment = uri.path().rsplit('/').next().unwrap_or_default();
    validation::decode_path_segment(segment)
}

fn format_values(values: &[&BindValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// GET /api/search/:query - ranked, paginated listing search
///
/// Query parameters:
/// - limit: page size (default 5)
/// - offset: rows to skip
/// - userRegion: region for anonymous callers
/// - status: comma separated OPEN, REVIEW, CLOSED
/// - skills: comma separated DEVELOPMENT, DESIGN, CONTENT, OTHER
pub async fn search_listings(
    State(state): State<AppState>,
    Caller(caller): Caller,
    path: std::result::Result<Path<String>, PathRejection>,
    uri: Uri,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<SearchResponse<ListingSummary>>> {
    let params = parse_search_params(raw_query.as_deref().unwrap_or(""));

    // Reject bad filters before anything touches the database
    let statuses = validation::parse_status_list(params.status.as_deref())?;
    let skills = validation::parse_skill_list(params.skills.as_deref())?;

    // `/api/search` has no segment; a segment that is not UTF-8 once decoded
    // is still searched, minus the bad bytes
    let raw_text = match path {
        Ok(Path(q)) => q,
        Err(PathRejection::FailedToDeserializePathParams(err))
            if matches!(err.kind(), ErrorKind::InvalidUtf8InPathParam { .. }) =>
        {
            tracing::debug!("Query segment is not valid UTF-8: {}", err);
            raw_path_segment(&uri)
        }
        Err(_) => String::new(),
    };
    let words = validation::split_words(&validation::sanitize_query(&raw_text));
    let page = validation::parse_page(
        params.limit.as_deref(),
        params.offset.as_deref(),
        state.max_limit,
    );

    let region = region::resolve_for_request(
        &state.db,
        caller.as_deref(),
        params.user_region.as_deref(),
    )
    .await?;

    tracing::info!(
        "🔍 SEARCH REQUEST: words={:?}, statuses={:?}, skills={:?}, region={}, limit={}, offset={:?}, signed_in={}",
        words,
        statuses.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        skills.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        region,
        page.limit,
        page.offset,
        caller.is_some()
    );

    let criteria = SearchCriteria {
        words,
        statuses,
        skills,
        region,
        page,
    };
    let query = build_search_query(&criteria);

    let query_start = std::time::Instant::now();
    let total_count = execute_count_query(&state.db, &query.count).await?;
    tracing::info!("⏱️  COUNT QUERY: {}ms", query_start.elapsed().as_millis());

    let search_start = std::time::Instant::now();
    let bounties = execute_search_query(&state.db, &query.data).await?;
    tracing::info!(
        "⏱️  SEARCH QUERY: {}ms (returned {} listings)",
        search_start.elapsed().as_millis(),
        bounties.len()
    );

    Ok(Json(SearchResponse {
        bounties,
        count: total_count.to_string(),
    }))
}

async fn execute_count_query(db: &PgPool, fragment: &QueryFragment) -> Result<i64> {
    tracing::debug!(
        "Executing count query: {} with values: [{}]",
        fragment.to_sql(),
        format_values(&fragment.values())
    );

    let mut builder = fragment.builder();
    let count = builder.build_query_scalar::<i64>().fetch_one(db).await?;
    Ok(count)
}

async fn execute_search_query(db: &PgPool, fragment: &QueryFragment) -> Result<Vec<ListingSummary>> {
    tracing::debug!(
        "Executing search query: {} with values: [{}]",
        fragment.to_sql(),
        format_values(&fragment.values())
    );

    let mut builder = fragment.builder();
    let rows = builder.build().fetch_all(db).await?;

    let mut listings = Vec::with_capacity(rows.len());
    for row in &rows {
        listings.push(listing_from_row(row)?);
    }
    Ok(listings)
}

fn listing_from_row(row: &PgRow) -> std::result::Result<ListingSummary, sqlx::Error> {
    Ok(ListingSummary {
        id: row.try_get("id")?,
        status: row.try_get("status")?,
        reward_amount: row.try_get("reward_amount")?,
        deadline: row.try_get("deadline")?,
        listing_type: row.try_get("listing_type")?,
        sponsor: SponsorSummary {
            name: row.try_get("sponsor_name")?,
            logo: row.try_get("sponsor_logo")?,
            is_verified: row.try_get("sponsor_is_verified")?,
        },
        title: row.try_get("title")?,
        token: row.try_get("token")?,
        slug: row.try_get("slug")?,
        application_type: row.try_get("application_type")?,
        is_winners_announced: row.try_get("is_winners_announced")?,
        description: row.try_get("description")?,
        compensation_type: row.try_get("compensation_type")?,
        min_reward_ask: row.try_get("min_reward_ask")?,
        max_reward_ask: row.try_get("max_reward_ask")?,
        updated_at: row.try_get("updated_at")?,
        winners_announced_at: row.try_get("winners_announced_at")?,
        is_featured: row.try_get("is_featured")?,
        comment_count: row.try_get("comment_count")?,
    })
}
