use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::filters::{ListingStatus, Region, SkillCategory};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub bounties: Vec<T>,
    /// Decimal string; the total can exceed what JSON numbers carry safely.
    pub count: String,
}

/// Raw query-string parameters, before validation. Repeated keys keep the last value.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub user_region: Option<String>, // `userRegion`
    pub status: Option<String>,      // comma separated OPEN,REVIEW,CLOSED
    pub skills: Option<String>,      // comma separated DEVELOPMENT,DESIGN,CONTENT,OTHER
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: Option<i64>,
}

/// Validated, request-scoped search input handed to the query builder.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub words: Vec<String>,
    pub statuses: Vec<ListingStatus>,
    pub skills: Vec<SkillCategory>,
    pub region: Region,
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorSummary {
    pub name: String,
    pub logo: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: String,
    pub status: String,
    pub reward_amount: Option<f64>,
    pub deadline: Option<NaiveDateTime>,
    #[serde(rename = "type")]
    pub listing_type: String,
    pub sponsor: SponsorSummary,
    pub title: String,
    pub token: Option<String>,
    pub slug: String,
    pub application_type: Option<String>,
    pub is_winners_announced: bool,
    pub description: Option<String>,
    pub compensation_type: Option<String>,
    pub min_reward_ask: Option<f64>,
    pub max_reward_ask: Option<f64>,
    pub updated_at: NaiveDateTime,
    pub winners_announced_at: Option<NaiveDateTime>,
    pub is_featured: bool,
    /// Active, non-archived, top-level comments that are not submissions.
    pub comment_count: i64,
}
