//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for a known table.
//! Identifiers only ever come from `'static` table and field definitions; values are always `$n` parameters.

use super::params::BindValue;

/// Static description of a table: name, primary key, and the columns returned by SELECT.
#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub name: &'static str,
    pub pk: &'static str,
    pub columns: &'static [&'static str],
}

/// A field that may appear in the SET list of a partial update.
pub trait UpdatableField: Copy {
    fn column(self) -> &'static str;
}

/// One `column = $n` pair of an UPDATE.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment<F> {
    pub field: F,
    pub value: BindValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// `column ILIKE '%needle%'`
    Contains { column: &'static str, needle: String },
    /// `column IN (SELECT key FROM table WHERE label ILIKE '%needle%')`
    ContainsVia {
        column: &'static str,
        table: &'static str,
        key: &'static str,
        label: &'static str,
        needle: String,
    },
}

#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub order: Vec<(&'static str, SortDir)>,
    pub limit: Option<i64>,
    pub offset: i64,
}

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape LIKE metacharacters so the needle matches literally, then wrap in `%`.
pub fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by primary key.
pub fn select_by_id(table: &Table, id: BindValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(table),
        quoted(table.name),
        quoted(table.pk),
        n
    );
    q
}

/// SELECT list with conjunctive filters, ORDER BY, LIMIT and OFFSET.
pub fn select_list(table: &Table, list: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for f in &list.filters {
        match f {
            Filter::Contains { column, needle } => {
                let n = q.push_param(BindValue::text(contains_pattern(needle)));
                where_parts.push(format!("{} ILIKE ${} ESCAPE '\\'", quoted(column), n));
            }
            Filter::ContainsVia {
                column,
                table: other,
                key,
                label,
                needle,
            } => {
                let n = q.push_param(BindValue::text(contains_pattern(needle)));
                where_parts.push(format!(
                    "{} IN (SELECT {} FROM {} WHERE {} ILIKE ${} ESCAPE '\\')",
                    quoted(column),
                    quoted(key),
                    quoted(other),
                    quoted(label),
                    n
                ));
            }
        }
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let order_clause = if list.order.is_empty() {
        format!(" ORDER BY {}", quoted(table.pk))
    } else {
        let parts: Vec<String> = list
            .order
            .iter()
            .map(|(col, dir)| format!("{} {}", quoted(col), dir.keyword()))
            .collect();
        format!(" ORDER BY {}", parts.join(", "))
    };
    let limit_clause = match list.limit {
        Some(limit) => {
            let n = q.push_param(BindValue::Int8(limit));
            format!(" LIMIT ${}", n)
        }
        None => String::new(),
    };
    let n = q.push_param(BindValue::Int8(list.offset));
    let offset_clause = format!(" OFFSET ${}", n);
    q.sql = format!(
        "SELECT {} FROM {}{}{}{}{}",
        column_list(table),
        quoted(table.name),
        where_clause,
        order_clause,
        limit_clause,
        offset_clause
    );
    q
}

/// INSERT the given columns and return the generated primary key.
pub fn insert(table: &Table, values: Vec<(&'static str, BindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(table.pk)
    );
    q
}

/// UPDATE by id, SET exactly the given assignments plus `updated_at`.
/// Returns `None` for an empty assignment list; there is no statement to run.
pub fn update_by_id<F: UpdatableField>(
    table: &Table,
    assignments: &[Assignment<F>],
    id: BindValue,
) -> Option<QueryBuf> {
    if assignments.is_empty() {
        return None;
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(assignments.len() + 1);
    for a in assignments {
        let n = q.push_param(a.value.clone());
        sets.push(format!("{} = ${}", quoted(a.field.column()), n));
    }
    sets.push(format!("{} = CURRENT_TIMESTAMP", quoted("updated_at")));
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.pk),
        id_param,
        quoted(table.pk)
    );
    Some(q)
}

/// DELETE by id.
pub fn delete_by_id(table: &Table, id: BindValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(table.name),
        quoted(table.pk),
        n
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: Table = Table {
        name: "people",
        pk: "id",
        columns: &["id", "name", "team_id"],
    };

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum PersonField {
        Name,
        TeamId,
    }

    impl UpdatableField for PersonField {
        fn column(self) -> &'static str {
            match self {
                PersonField::Name => "name",
                PersonField::TeamId => "team_id",
            }
        }
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(contains_pattern("al"), "%al%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn list_without_filters_has_no_where() {
        let q = select_list(
            &PEOPLE,
            &ListQuery {
                limit: Some(10),
                ..Default::default()
            },
        );
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"team_id\" FROM \"people\" ORDER BY \"id\" LIMIT $1 OFFSET $2"
        );
        assert_eq!(q.params, vec![BindValue::Int8(10), BindValue::Int8(0)]);
    }

    #[test]
    fn list_filters_are_conjunctive_and_bound() {
        let q = select_list(
            &PEOPLE,
            &ListQuery {
                filters: vec![
                    Filter::Contains {
                        column: "name",
                        needle: "Al".into(),
                    },
                    Filter::ContainsVia {
                        column: "team_id",
                        table: "teams",
                        key: "id",
                        label: "label",
                        needle: "ops".into(),
                    },
                ],
                order: vec![("name", SortDir::Desc), ("id", SortDir::Desc)],
                limit: Some(2),
                offset: 4,
            },
        );
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"team_id\" FROM \"people\" \
             WHERE \"name\" ILIKE $1 ESCAPE '\\' \
             AND \"team_id\" IN (SELECT \"id\" FROM \"teams\" WHERE \"label\" ILIKE $2 ESCAPE '\\') \
             ORDER BY \"name\" DESC, \"id\" DESC LIMIT $3 OFFSET $4"
        );
        assert_eq!(
            q.params,
            vec![
                BindValue::text("%Al%"),
                BindValue::text("%ops%"),
                BindValue::Int8(2),
                BindValue::Int8(4),
            ]
        );
    }

    #[test]
    fn list_without_limit_only_binds_offset() {
        let q = select_list(&PEOPLE, &ListQuery::default());
        assert!(q.sql.ends_with("ORDER BY \"id\" OFFSET $1"));
        assert_eq!(q.params, vec![BindValue::Int8(0)]);
    }

    #[test]
    fn update_sets_exactly_the_given_fields() {
        let q = update_by_id(
            &PEOPLE,
            &[Assignment {
                field: PersonField::TeamId,
                value: BindValue::Int4(Some(3)),
            }],
            BindValue::Int4(Some(9)),
        )
        .expect("non-empty update");
        assert_eq!(
            q.sql,
            "UPDATE \"people\" SET \"team_id\" = $1, \"updated_at\" = CURRENT_TIMESTAMP WHERE \"id\" = $2 RETURNING \"id\""
        );
        assert_eq!(q.params, vec![BindValue::Int4(Some(3)), BindValue::Int4(Some(9))]);
    }

    #[test]
    fn update_binds_values_in_assignment_order() {
        let q = update_by_id(
            &PEOPLE,
            &[
                Assignment {
                    field: PersonField::Name,
                    value: BindValue::text("x'; DROP TABLE people; --"),
                },
                Assignment {
                    field: PersonField::TeamId,
                    value: BindValue::Int4(Some(1)),
                },
            ],
            BindValue::Int4(Some(2)),
        )
        .unwrap();
        assert!(!q.sql.contains("DROP"));
        assert!(q.sql.contains("\"name\" = $1, \"team_id\" = $2"));
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn empty_update_builds_nothing() {
        let q = update_by_id::<PersonField>(&PEOPLE, &[], BindValue::Int4(Some(1)));
        assert!(q.is_none());
    }

    #[test]
    fn insert_returns_primary_key() {
        let q = insert(
            &PEOPLE,
            vec![("name", BindValue::text("Ann")), ("team_id", BindValue::Int4(None))],
        );
        assert_eq!(
            q.sql,
            "INSERT INTO \"people\" (\"name\", \"team_id\") VALUES ($1, $2) RETURNING \"id\""
        );
        assert_eq!(q.params[1], BindValue::Int4(None));
    }

    #[test]
    fn select_and_delete_bind_id() {
        let q = select_by_id(&PEOPLE, BindValue::Int4(Some(5)));
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"team_id\" FROM \"people\" WHERE \"id\" = $1"
        );
        let q = delete_by_id(&PEOPLE, BindValue::Int4(Some(5)));
        assert_eq!(q.sql, "DELETE FROM \"people\" WHERE \"id\" = $1");
        assert_eq!(q.params, vec![BindValue::Int4(Some(5))]);
    }
}
