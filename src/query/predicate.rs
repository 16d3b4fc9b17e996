use crate::catalog;
use crate::models::{ListingStatus, Region, SearchCriteria, SkillCategory};

use super::fragment::QueryFragment;

/// Current time as a naive UTC timestamp, comparable with `b.deadline`.
pub const NOW_UTC: &str = "(CURRENT_TIMESTAMP AT TIME ZONE 'UTC')";

/// Published, non-private listings only. Applied to every search.
pub fn visibility_floor() -> QueryFragment {
    QueryFragment::sql("b.is_published = TRUE AND b.is_private = FALSE")
}

/// Every word must appear in the title or the sponsor name, case-insensitively.
pub fn text_predicate(words: &[String]) -> QueryFragment {
    let per_word = words.iter().map(|word| {
        let mut fragment = QueryFragment::sql("strpos(lower(b.title), lower(");
        fragment
            .push_bind(word.as_str())
            .push(")) > 0 OR strpos(lower(s.name), lower(")
            .push_bind(word.as_str())
            .push(")) > 0");
        fragment
    });

    QueryFragment::join(per_word, " AND ").unwrap_or_else(|| QueryFragment::sql("1=1"))
}

fn status_condition(status: ListingStatus) -> QueryFragment {
    let sql = match status {
        ListingStatus::Open => format!("b.deadline > {}", NOW_UTC),
        ListingStatus::Review => {
            format!("b.deadline <= {} AND b.is_winners_announced = FALSE", NOW_UTC)
        }
        ListingStatus::Closed => "b.is_winners_announced = TRUE".to_string(),
    };
    QueryFragment::sql(sql)
}

/// Listings in any of the selected lifecycle buckets. `None` when unfiltered.
pub fn status_predicate(statuses: &[ListingStatus]) -> Option<QueryFragment> {
    QueryFragment::join(statuses.iter().map(|&s| status_condition(s)), " OR ")
}

/// Listings carrying any tag of any selected category. `None` when unfiltered.
pub fn skill_predicate(categories: &[SkillCategory]) -> Option<QueryFragment> {
    let per_tag = categories
        .iter()
        .flat_map(|&category| catalog::skill_tags(category).iter())
        .map(|tag| {
            let mut fragment =
                QueryFragment::sql("b.skills @> jsonb_build_array(jsonb_build_object('skills', ");
            fragment.push_bind(*tag).push("::text))");
            fragment
        });

    QueryFragment::join(per_tag, " OR ")
}

/// Listings targeted at `region`, plus GLOBAL listings which are visible everywhere.
pub fn region_predicate(region: Region) -> QueryFragment {
    let mut fragment = QueryFragment::sql("b.region = ");
    fragment
        .push_bind(region.as_str())
        .push(format!(" OR b.region = '{}'", Region::Global.as_str()));
    fragment
}

/// WHERE clause body shared by the count and data queries.
///
/// Bound values come out as: word pairs in word order, skill tags in
/// category-then-tag order, then the resolved region.
pub fn where_clause(criteria: &SearchCriteria) -> QueryFragment {
    let mut clause = visibility_floor();

    clause.push(" AND ").append(text_predicate(&criteria.words).parenthesized());

    if let Some(statuses) = status_predicate(&criteria.statuses) {
        clause.push(" AND ").append(statuses.parenthesized());
    }

    if let Some(skills) = skill_predicate(&criteria.skills) {
        clause.push(" AND ").append(skills.parenthesized());
    }

    clause.push(" AND ").append(region_predicate(criteria.region).parenthesized());
    clause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use crate::query::fragment::BindValue;

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            words: Vec::new(),
            statuses: Vec::new(),
            skills: Vec::new(),
            region: Region::Global,
            page: Page { limit: 5, offset: None },
        }
    }

    fn text(values: &[&BindValue]) -> Vec<String> {
        values
            .iter()
            .map(|value| match value {
                BindValue::Text(s) => s.clone(),
                BindValue::Int(i) => i.to_string(),
            })
            .collect()
    }

    #[test]
    fn no_words_is_always_true() {
        let fragment = text_predicate(&[]);
        assert_eq!(fragment.to_sql(), "1=1");
        assert_eq!(fragment.placeholder_count(), 0);
    }

    #[test]
    fn each_word_is_bound_twice_in_order() {
        let words = vec!["web3".to_string(), "script".to_string()];
        let fragment = text_predicate(&words);

        assert_eq!(
            text(&fragment.values()),
            vec!["web3", "web3", "script", "script"]
        );
        assert_eq!(
            fragment.to_sql(),
            "(strpos(lower(b.title), lower($1)) > 0 OR strpos(lower(s.name), lower($2)) > 0) \
             AND (strpos(lower(b.title), lower($3)) > 0 OR strpos(lower(s.name), lower($4)) > 0)"
        );
    }

    #[test]
    fn statuses_are_or_ed() {
        let fragment = status_predicate(&[ListingStatus::Open, ListingStatus::Closed]).unwrap();
        let sql = fragment.to_sql();
        assert!(sql.contains("b.deadline > (CURRENT_TIMESTAMP AT TIME ZONE 'UTC')"));
        assert!(sql.contains(") OR ("));
        assert!(sql.contains("b.is_winners_announced = TRUE"));
        assert_eq!(fragment.placeholder_count(), 0);
    }

    #[test]
    fn review_requires_passed_deadline_and_no_winners() {
        let sql = status_predicate(&[ListingStatus::Review]).unwrap().to_sql();
        assert_eq!(
            sql,
            "(b.deadline <= (CURRENT_TIMESTAMP AT TIME ZONE 'UTC') AND b.is_winners_announced = FALSE)"
        );
    }

    #[test]
    fn empty_filters_add_no_constraint() {
        assert!(status_predicate(&[]).is_none());
        assert!(skill_predicate(&[]).is_none());
    }

    #[test]
    fn design_filters_on_the_design_tag_only() {
        let fragment = skill_predicate(&[SkillCategory::Design]).unwrap();
        assert_eq!(text(&fragment.values()), vec!["Design"]);
        assert_eq!(
            fragment.to_sql(),
            "(b.skills @> jsonb_build_array(jsonb_build_object('skills', $1::text)))"
        );
    }

    #[test]
    fn skill_tags_follow_category_then_tag_order() {
        let fragment =
            skill_predicate(&[SkillCategory::Content, SkillCategory::Development]).unwrap();
        assert_eq!(
            text(&fragment.values()),
            vec!["Content", "Frontend", "Backend", "Blockchain", "Mobile"]
        );
        assert_eq!(fragment.to_sql().matches(" OR ").count(), 4);
    }

    #[test]
    fn region_always_admits_global() {
        let fragment = region_predicate(Region::India);
        assert_eq!(fragment.to_sql(), "b.region = $1 OR b.region = 'GLOBAL'");
        assert_eq!(text(&fragment.values()), vec!["INDIA"]);

        let global = region_predicate(Region::Global);
        assert_eq!(global.to_sql(), "b.region = $1 OR b.region = 'GLOBAL'");
    }

    #[test]
    fn floor_and_region_apply_without_any_filter() {
        let clause = where_clause(&criteria());
        assert_eq!(
            clause.to_sql(),
            "b.is_published = TRUE AND b.is_private = FALSE AND (1=1) \
             AND (b.region = $1 OR b.region = 'GLOBAL')"
        );
        assert_eq!(text(&clause.values()), vec!["GLOBAL"]);
    }

    #[test]
    fn values_are_words_then_tags_then_region() {
        let mut c = criteria();
        c.words = vec!["rust".to_string()];
        c.statuses = vec![ListingStatus::Open];
        c.skills = vec![SkillCategory::Other];
        c.region = Region::Germany;

        let clause = where_clause(&c);
        assert_eq!(
            text(&clause.values()),
            vec!["rust", "rust", "Other", "Growth", "Community", "GERMANY"]
        );
        assert_eq!(clause.placeholder_count(), 6);
        assert!(clause.to_sql().contains("$6"));
        assert!(!clause.to_sql().contains("$7"));
    }
}
