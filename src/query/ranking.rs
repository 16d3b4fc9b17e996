use crate::models::Page;

use super::fragment::QueryFragment;
use super::predicate::NOW_UTC;

/// Total order over listings: featured first, then upcoming deadlines
/// soonest-first, then passed deadlines most-recent-first, then most
/// recently updated, with the id as the final tie-break.
pub fn order_by() -> QueryFragment {
    QueryFragment::sql(format!(
        " ORDER BY b.is_featured DESC, \
         CASE WHEN b.deadline >= {now} THEN 1 ELSE 2 END, \
         CASE WHEN b.deadline >= {now} THEN b.deadline END ASC, \
         CASE WHEN b.deadline < {now} THEN b.deadline END DESC NULLS LAST, \
         b.updated_at DESC, \
         b.id ASC",
        now = NOW_UTC
    ))
}

/// LIMIT is always bound; OFFSET only when the caller asked for one.
pub fn pagination(page: &Page) -> QueryFragment {
    let mut fragment = QueryFragment::sql(" LIMIT ");
    fragment.push_bind(page.limit);
    if let Some(offset) = page.offset {
        fragment.push(" OFFSET ").push_bind(offset);
    }
    fragment
}
