use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::{
    ActivityCounts, ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse,
    Profile, ScorePairRequest,
};
use crate::services::ActivityClient;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub activity: Option<Arc<ActivityClient>>,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/score", web::post().to(score_pair));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Use request-supplied counts, else fetch them for the given profiles
async fn resolve_activity(
    state: &AppState,
    supplied: Option<ActivityCounts>,
    profiles: &[&Profile],
) -> ActivityCounts {
    if let Some(counts) = supplied {
        return counts;
    }
    match &state.activity {
        Some(client) => {
            let ids: Vec<String> = profiles.iter().map(|p| p.id.clone()).collect();
            client.fetch_counts_or_empty(&ids).await
        }
        None => ActivityCounts::new(),
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "seeker": { "id": "string", "role": "founder", ... },
///   "pool": [{ "id": "string", "role": "developer", ... }],
///   "activityCounts": { "id": 3 },
///   "topK": 5
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let FindMatchesRequest {
        seeker,
        pool,
        activity_counts,
        top_k,
    } = req.into_inner();

    // Cap topK to prevent oversized responses; validation already rejected values below 1
    let top_k = top_k
        .and_then(|k| usize::try_from(k).ok())
        .unwrap_or(state.matching.default_top_k)
        .min(state.matching.max_top_k);

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "[{}] Finding matches for {} among {} candidates, top_k: {}",
        request_id,
        seeker.id,
        pool.len(),
        top_k
    );

    let candidates: Vec<&Profile> = pool.iter().collect();
    let activity = resolve_activity(&state, activity_counts, &candidates).await;

    let outcome = match state.matcher.find_matches(&seeker, &pool, &activity, top_k) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::info!("[{}] Rejected match request: {}", request_id, e);
            return bad_request("Invalid request", e.to_string());
        }
    };

    tracing::info!(
        "[{}] Returning {} matches and {} near matches for {} after {} passes",
        request_id,
        outcome.matches.len(),
        outcome.near_matches.len(),
        seeker.id,
        outcome.passes_run
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        request_id,
        matches: outcome.matches,
        near_matches: outcome.near_matches,
        passes_run: outcome.passes_run,
        total_candidates: outcome.candidates_considered,
    })
}

/// Score a single pair
///
/// POST /api/v1/matches/score
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let ScorePairRequest {
        seeker,
        candidate,
        activity_counts,
    } = req.into_inner();

    let activity = resolve_activity(&state, activity_counts, &[&candidate]).await;
    let result = state.matcher.score_pair(&seeker, &candidate, &activity);

    tracing::debug!(
        "Scored {} -> {}: {}",
        seeker.id,
        candidate.id,
        result.compatibility_score
    );

    HttpResponse::Ok().json(result)
}
