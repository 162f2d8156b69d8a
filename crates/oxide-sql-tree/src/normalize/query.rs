//! Query rendering: SELECT, set operations, WITH and FROM items.

use serde_json::{Map, Value};

use super::{collapse, insert_flag, literal_list, names, single, Normalizer};
use crate::ast::{Expr, JoinConstraint, Query, Select, SelectItem, SetExpr, TableAlias, TableRef, Top};

impl Normalizer {
    /// Renders a full query.
    pub(crate) fn query(&self, query: &Query) -> Value {
        let mut map = into_object(self.set_expr(&query.body));

        let conflict = (query.with.is_some() && map.contains_key("with"))
            || (!query.order_by.is_empty() && map.contains_key("orderby"))
            || (query.limit.is_some() && map.contains_key("limit"))
            || (query.offset.is_some() && map.contains_key("offset"));
        if conflict {
            let mut wrapper = Map::new();
            wrapper.insert("select".to_string(), Value::String("*".to_string()));
            wrapper.insert("from".to_string(), Value::Object(map));
            map = wrapper;
        }

        if let Some(with) = &query.with {
            let ctes = with
                .ctes
                .iter()
                .map(|cte| {
                    let mut entry = Map::new();
                    entry.insert("name".to_string(), Value::String(cte.name.clone()));
                    if !cte.columns.is_empty() {
                        entry.insert("columns".to_string(), names(&cte.columns));
                    }
                    entry.insert("value".to_string(), self.query(&cte.query));
                    Value::Object(entry)
                })
                .collect();
            map.insert("with".to_string(), collapse(ctes));
            insert_flag(&mut map, "recursive", with.recursive);
        }
        if !query.order_by.is_empty() {
            map.insert("orderby".to_string(), self.order_by(&query.order_by));
        }
        if let Some(limit) = &query.limit {
            map.insert("limit".to_string(), self.expr(limit));
        }
        if let Some(offset) = &query.offset {
            map.insert("offset".to_string(), self.expr(offset));
        }
        Value::Object(map)
    }

    fn set_expr(&self, body: &SetExpr) -> Value {
        match body {
            SetExpr::Select(select) => self.select(select),
            SetExpr::Query(query) => self.query(query),
            SetExpr::SetOperation { op, all, operands } => {
                let operands = operands.iter().map(|operand| self.set_expr(operand)).collect();
                single(op.name(*all), Value::Array(operands))
            }
        }
    }

    fn select(&self, select: &Select) -> Value {
        let mut map = Map::new();
        let columns = select.columns.iter().map(|item| self.select_item(item)).collect();
        let key = if select.distinct { "select_distinct" } else { "select" };
        map.insert(key.to_string(), collapse(columns));
        if let Some(top) = &select.top {
            map.insert("top".to_string(), self.top(top));
        }
        if !select.from.is_empty() {
            map.insert("from".to_string(), self.from(&select.from));
        }
        if let Some(condition) = &select.where_clause {
            map.insert("where".to_string(), self.expr(condition));
        }
        if !select.group_by.is_empty() {
            let groups = select
                .group_by
                .iter()
                .map(|expr| single("value", self.expr(expr)))
                .collect();
            map.insert("groupby".to_string(), collapse(groups));
        }
        if let Some(having) = &select.having {
            map.insert("having".to_string(), self.expr(having));
        }
        if let Some(qualify) = &select.qualify {
            map.insert("qualify".to_string(), self.expr(qualify));
        }
        Value::Object(map)
    }

    fn select_item(&self, item: &SelectItem) -> Value {
        let (expr, alias) = match item {
            SelectItem::Wildcard(None) => return Value::String("*".to_string()),
            SelectItem::Wildcard(Some(qualifier)) => {
                return Value::String(format!("{qualifier}.*"));
            }
            SelectItem::Expr { expr, alias } => (expr, alias),
        };

        let mut map = match expr {
            Expr::Window { function, window } => {
                let mut map = Map::new();
                map.insert("value".to_string(), self.expr(function));
                map.insert("over".to_string(), self.window(window));
                map
            }
            Expr::WithinGroup { function, order_by } => {
                let mut map = Map::new();
                map.insert("value".to_string(), self.expr(function));
                map.insert("within".to_string(), self.within(order_by));
                map
            }
            expr => {
                let mut map = Map::new();
                map.insert("value".to_string(), self.expr(expr));
                map
            }
        };
        if let Some(alias) = alias {
            map.insert("name".to_string(), Value::String(alias.clone()));
        }
        Value::Object(map)
    }

    /// Renders `TOP n [PERCENT] [WITH TIES]`.
    pub(crate) fn top(&self, top: &Top) -> Value {
        let quantity = self.expr(&top.quantity);
        match (top.percent, top.with_ties) {
            (false, false) => quantity,
            (true, false) => single("percent", quantity),
            (percent, true) => {
                let mut map = Map::new();
                map.insert(
                    if percent { "percent" } else { "value" }.to_string(),
                    quantity,
                );
                map.insert("with_ties".to_string(), Value::Bool(true));
                Value::Object(map)
            }
        }
    }

    /// Renders a FROM list with the collapsing rule.
    pub(crate) fn from(&self, items: &[TableRef]) -> Value {
        collapse(items.iter().map(|item| self.table_ref(item)).collect())
    }

    /// Renders one FROM item.
    pub(crate) fn table_ref(&self, table: &TableRef) -> Value {
        match table {
            TableRef::Table { name, alias } => {
                aliased(Value::String(name.to_string()), alias.as_ref())
            }
            TableRef::Derived { query, alias } => aliased(self.query(query), alias.as_ref()),
            TableRef::Function { call, alias } => aliased(self.expr(call), alias.as_ref()),
            TableRef::Lateral(inner) => single("lateral", self.table_ref(inner)),
            TableRef::LateralView {
                function,
                outer,
                table_alias,
                column_aliases,
            } => {
                let mut map = Map::new();
                let name = match (table_alias, column_aliases.is_empty()) {
                    (Some(table), false) => Some(single(table, names(column_aliases))),
                    (Some(table), true) => Some(Value::String(table.clone())),
                    (None, false) => Some(names(column_aliases)),
                    (None, true) => None,
                };
                if let Some(name) = name {
                    map.insert("name".to_string(), name);
                }
                map.insert("value".to_string(), self.expr(function));
                insert_flag(&mut map, "outer", *outer);
                single("lateral view", Value::Object(map))
            }
            TableRef::Join {
                join_type,
                table,
                constraint,
            } => {
                let mut map = Map::new();
                map.insert(join_type.name().to_string(), self.table_ref(table));
                match constraint {
                    JoinConstraint::On(condition) => {
                        map.insert("on".to_string(), self.expr(condition));
                    }
                    JoinConstraint::Using(columns) => {
                        map.insert("using".to_string(), names(columns));
                    }
                    JoinConstraint::None => {}
                }
                Value::Object(map)
            }
            TableRef::Pivot {
                aggregate,
                column,
                values,
                alias,
            } => {
                let mut map = Map::new();
                if let Some(alias) = alias {
                    map.insert("name".to_string(), Value::String(alias.clone()));
                }
                map.insert("aggregate".to_string(), self.expr(aggregate));
                map.insert("for".to_string(), self.expr(column));
                map.insert("in".to_string(), literal_list(self.exprs(values)));
                single("pivot", Value::Object(map))
            }
            TableRef::Unpivot {
                value,
                column,
                columns,
                alias,
            } => {
                let mut map = Map::new();
                if let Some(alias) = alias {
                    map.insert("name".to_string(), Value::String(alias.clone()));
                }
                map.insert("value".to_string(), self.expr(value));
                map.insert("for".to_string(), self.expr(column));
                map.insert(
                    "in".to_string(),
                    single("value", collapse(self.exprs(columns))),
                );
                single("unpivot", Value::Object(map))
            }
        }
    }
}

/// Unwraps an object, or keeps any other value under `"value"`.
fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Wraps a FROM item with its alias: `{"name": a, "value": item}`, or
/// `{"name": {a: cols}, "value": item}` when the alias lists columns.
fn aliased(value: Value, alias: Option<&TableAlias>) -> Value {
    let Some(alias) = alias else {
        return value;
    };
    let name = if alias.columns.is_empty() {
        Value::String(alias.name.clone())
    } else {
        single(&alias.name, names(&alias.columns))
    };
    let mut map = Map::new();
    map.insert("name".to_string(), name);
    map.insert("value".to_string(), value);
    Value::Object(map)
}
