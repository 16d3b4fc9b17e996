//! SQL construction for listing search.
//!
//! Both statements share one WHERE clause, so the count query's bound values
//! are always a prefix of the data query's.

pub mod fragment;
pub mod predicate;
pub mod ranking;

pub use fragment::{BindValue, QueryFragment};

use crate::models::SearchCriteria;

const FROM_LISTINGS: &str = " FROM bounties b JOIN sponsors s ON b.sponsor_id = s.id WHERE ";

/// Column aliases the data query selects, in select-list order.
#[cfg(test)]
pub(crate) const LISTING_FIELDS: [&str; 21] = [
    "id",
    "status",
    "reward_amount",
    "deadline",
    "listing_type",
    "sponsor_name",
    "sponsor_logo",
    "sponsor_is_verified",
    "title",
    "token",
    "slug",
    "application_type",
    "is_winners_announced",
    "description",
    "compensation_type",
    "min_reward_ask",
    "max_reward_ask",
    "updated_at",
    "winners_announced_at",
    "is_featured",
    "comment_count",
];

const LISTING_COLUMNS: &str = r#"SELECT
    b.id,
    b.status,
    b.reward_amount,
    b.deadline,
    b.type AS listing_type,
    s.name AS sponsor_name,
    s.logo AS sponsor_logo,
    s.is_verified AS sponsor_is_verified,
    b.title,
    b.token,
    b.slug,
    b.application_type,
    b.is_winners_announced,
    b.description,
    b.compensation_type,
    b.min_reward_ask,
    b.max_reward_ask,
    b.updated_at,
    b.winners_announced_at,
    b.is_featured,
    (
        SELECT COUNT(*)
        FROM comments c
        WHERE c.listing_id = b.id
          AND c.is_active = TRUE
          AND c.is_archived = FALSE
          AND c.reply_to_id IS NULL
          AND c.type <> 'SUBMISSION'
    ) AS comment_count"#;

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub count: QueryFragment,
    pub data: QueryFragment,
}

pub fn build_search_query(criteria: &SearchCriteria) -> SearchQuery {
    let filter = predicate::where_clause(criteria);

    let mut count = QueryFragment::sql("SELECT COUNT(*) AS total_count");
    count.push(FROM_LISTINGS).append(filter.clone());

    let mut data = QueryFragment::sql(LISTING_COLUMNS);
    data.push(FROM_LISTINGS)
        .append(filter)
        .append(ranking::order_by())
        .append(ranking::pagination(&criteria.page));

    debug_assert_eq!(count.placeholder_count(), count.values().len());
    debug_assert_eq!(data.placeholder_count(), data.values().len());

    SearchQuery { count, data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingStatus, Page, Region, SkillCategory};

    fn criteria(page: Page) -> SearchCriteria {
        SearchCriteria {
            words: vec!["web3".to_string(), "script".to_string()],
            statuses: vec![ListingStatus::Open, ListingStatus::Review],
            skills: vec![SkillCategory::Design],
            region: Region::India,
            page,
        }
    }

    #[test]
    fn count_values_are_a_prefix_of_data_values() {
        let query = build_search_query(&criteria(Page { limit: 5, offset: Some(5) }));
        let count = query.count.values();
        let data = query.data.values();

        assert_eq!(data.len(), count.len() + 2);
        assert_eq!(&data[..count.len()], &count[..]);
        assert_eq!(data[count.len()], &BindValue::Int(5));
        assert_eq!(data[count.len() + 1], &BindValue::Int(5));
    }

    #[test]
    fn placeholders_match_values_in_both_statements() {
        for page in [Page { limit: 5, offset: None }, Page { limit: 7, offset: Some(14) }] {
            let query = build_search_query(&criteria(page));
            for fragment in [&query.count, &query.data] {
                let n = fragment.values().len();
                let sql = fragment.to_sql();
                assert!(sql.contains(&format!("${}", n)));
                assert!(!sql.contains(&format!("${}", n + 1)));
            }
        }
    }

    #[test]
    fn select_list_provides_every_listing_field() {
        let select = LISTING_COLUMNS.trim_start_matches("SELECT");
        let outputs: Vec<&str> = select
            .split(",\n")
            .map(|column| {
                let column = column.trim();
                match column.rsplit_once(" AS ") {
                    Some((_, alias)) => alias.trim(),
                    None => column.trim_start_matches("b."),
                }
            })
            .collect();
        assert_eq!(outputs, LISTING_FIELDS);
    }

    #[test]
    fn count_query_has_no_order_or_limit() {
        let query = build_search_query(&criteria(Page { limit: 5, offset: None }));
        let sql = query.count.to_sql();
        assert!(sql.starts_with("SELECT COUNT(*) AS total_count FROM bounties b"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn data_query_shares_the_count_where_clause() {
        let query = build_search_query(&criteria(Page { limit: 5, offset: None }));
        let count_sql = query.count.to_sql();
        let data_sql = query.data.to_sql();

        let count_where = &count_sql[count_sql.find(" WHERE ").unwrap()..];
        let data_where = &data_sql[data_sql.find(" FROM bounties").unwrap()..];
        assert!(data_where.contains(count_where));
        assert!(data_sql.ends_with(" LIMIT $7"));
    }
}
