use std::fmt;

use sqlx::{Postgres, QueryBuilder};

/// A value that travels to Postgres as a bound parameter, never as SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Text(s) => write!(f, "{:?}", s),
            BindValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Sql(String),
    Bind(BindValue),
}

/// SQL text with its bound values kept inline, in placeholder order.
///
/// A placeholder only ever comes into existence through [`push_bind`], so the
/// number of placeholders in the rendered text and the number of values can
/// not drift apart, and concatenating fragments keeps both in the same
/// left-to-right order. Rendering goes through sqlx's [`QueryBuilder`], which
/// numbers the `$n` placeholders as values are pushed.
///
/// [`push_bind`]: QueryFragment::push_bind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFragment {
    pieces: Vec<Piece>,
}

impl QueryFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment made of constant SQL only.
    pub fn sql(text: impl Into<String>) -> Self {
        let mut fragment = Self::new();
        fragment.push(text);
        fragment
    }

    /// Appends constant SQL. Must never contain caller-supplied text.
    pub fn push(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.pieces.last_mut() {
            Some(Piece::Sql(prev)) => prev.push_str(&text),
            _ => self.pieces.push(Piece::Sql(text)),
        }
        self
    }

    pub fn push_bind(&mut self, value: impl Into<BindValue>) -> &mut Self {
        self.pieces.push(Piece::Bind(value.into()));
        self
    }

    pub fn append(&mut self, other: QueryFragment) -> &mut Self {
        for piece in other.pieces {
            match piece {
                Piece::Sql(text) => {
                    self.push(text);
                }
                Piece::Bind(value) => {
                    self.pieces.push(Piece::Bind(value));
                }
            }
        }
        self
    }

    /// Wraps the fragment in parentheses so it can be combined safely.
    pub fn parenthesized(self) -> Self {
        let mut wrapped = QueryFragment::sql("(");
        wrapped.append(self);
        wrapped.push(")");
        wrapped
    }

    /// Joins fragments with `separator`, parenthesizing each one.
    /// Returns `None` when there is nothing to join.
    pub fn join(fragments: impl IntoIterator<Item = QueryFragment>, separator: &str) -> Option<Self> {
        let mut joined: Option<QueryFragment> = None;
        for fragment in fragments {
            match joined.as_mut() {
                None => joined = Some(fragment.parenthesized()),
                Some(acc) => {
                    acc.push(separator);
                    acc.append(fragment.parenthesized());
                }
            }
        }
        joined
    }

    pub fn values(&self) -> Vec<&BindValue> {
        self.pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::Bind(value) => Some(value),
                Piece::Sql(_) => None,
            })
            .collect()
    }

    /// Number of `$n` placeholders in the rendered SQL, including any that
    /// were written by hand into a text piece.
    pub fn placeholder_count(&self) -> usize {
        self.to_sql()
            .as_bytes()
            .windows(2)
            .filter(|pair| pair[0] == b'$' && pair[1].is_ascii_digit())
            .count()
    }

    /// Pushes text and binds onto an existing builder, continuing its numbering.
    pub fn push_into<'args>(&self, builder: &mut QueryBuilder<'args, Postgres>) {
        for piece in &self.pieces {
            match piece {
                Piece::Sql(text) => {
                    builder.push(text);
                }
                Piece::Bind(BindValue::Text(value)) => {
                    builder.push_bind(value.clone());
                }
                Piece::Bind(BindValue::Int(value)) => {
                    builder.push_bind(*value);
                }
            }
        }
    }

    pub fn builder(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("");
        self.push_into(&mut builder);
        builder
    }

    /// Rendered SQL text with `$n` placeholders, as Postgres will receive it.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        let mut index = 0;
        for piece in &self.pieces {
            match piece {
                Piece::Sql(text) => sql.push_str(text),
                Piece::Bind(_) => {
                    index += 1;
                    sql.push('$');
                    sql.push_str(&index.to_string());
                }
            }
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_numbered_in_push_order() {
        let mut fragment = QueryFragment::sql("a = ");
        fragment.push_bind("x").push(" AND b = ").push_bind(7i64);

        assert_eq!(fragment.to_sql(), "a = $1 AND b = $2");
        assert_eq!(
            fragment.values(),
            vec![&BindValue::Text("x".to_string()), &BindValue::Int(7)]
        );
        assert_eq!(fragment.placeholder_count(), 2);
    }

    #[test]
    fn appended_fragments_continue_numbering() {
        let mut left = QueryFragment::sql("a = ");
        left.push_bind("x");
        let mut right = QueryFragment::sql("b = ");
        right.push_bind("y");

        left.push(" AND ").append(right);
        assert_eq!(left.to_sql(), "a = $1 AND b = $2");
        assert_eq!(left.placeholder_count(), left.values().len());
    }

    #[test]
    fn hand_written_placeholder_is_counted_but_not_bound() {
        let mut fragment = QueryFragment::sql("a = $1 AND b = ");
        fragment.push_bind("y");
        assert_eq!(fragment.placeholder_count(), 2);
        assert_eq!(fragment.values().len(), 1);

        let mut many = QueryFragment::sql("x IN (");
        for i in 0..12i64 {
            if i > 0 {
                many.push(", ");
            }
            many.push_bind(i);
        }
        many.push(")");
        assert_eq!(many.placeholder_count(), 12);
    }

    #[test]
    fn join_parenthesizes_each_member() {
        let mut first = QueryFragment::sql("a = ");
        first.push_bind("x");
        let second = QueryFragment::sql("b IS NULL");

        let joined = QueryFragment::join([first, second], " OR ").unwrap();
        assert_eq!(joined.to_sql(), "(a = $1) OR (b IS NULL)");
    }

    #[test]
    fn join_of_nothing_is_none() {
        assert!(QueryFragment::join(Vec::new(), " AND ").is_none());
    }

    #[test]
    fn bound_text_never_reaches_the_sql() {
        let mut fragment = QueryFragment::sql("name = ");
        fragment.push_bind("'; DROP TABLE bounties; --");
        assert_eq!(fragment.to_sql(), "name = $1");
    }

    #[test]
    fn query_builder_rendering_matches_to_sql() {
        let mut fragment = QueryFragment::sql("SELECT 1 WHERE a = ");
        fragment.push_bind("x").push(" LIMIT ").push_bind(5i64);

        let builder = fragment.builder();
        assert_eq!(builder.sql(), fragment.to_sql());
    }
}
