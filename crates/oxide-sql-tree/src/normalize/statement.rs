//! Statement rendering: DML, DDL and commands.

use serde_json::{Map, Value};

use super::{collapse, insert_flag, literal, literal_list, names, single, Normalizer};
use crate::ast::{
    AlterTableAction, AlterTableStatement, Assignment, ColumnDef, ConstraintKind, CopyOption,
    CopyOptionValue, CopySource, CopyStatement, CreateIndexStatement, CreateTableStatement,
    CreateViewStatement, DeleteStatement, DropStatement, ForeignKeyRef, IndexColumn, IndexDef,
    InsertSource, InsertStatement, MergeAction, MergeClause, MergeStatement, SetScope, Statement,
    TableConstraint, UpdateStatement,
};

impl Normalizer {
    pub(super) fn render_statement(&self, statement: &Statement) -> Value {
        match statement {
            Statement::Query(query) => self.query(query),
            Statement::Insert(insert) => self.insert(insert),
            Statement::Update(update) => self.update(update),
            Statement::Delete(delete) => self.delete(delete),
            Statement::Merge(merge) => self.merge(merge),
            Statement::CreateTable(create) => single("create table", self.create_table(create)),
            Statement::CreateView(create) => single("create view", self.create_view(create)),
            Statement::CreateIndex(create) => single("create index", self.create_index(create)),
            Statement::AlterTable(alter) => single("alter table", self.alter_table(alter)),
            Statement::Drop(drop) => single("drop", drop_body(drop)),
            Statement::Copy(copy) => single("copy", self.copy(copy)),
            Statement::Explain { statement, format } => {
                let mut map = Map::new();
                map.insert("explain".to_string(), self.render_statement(statement));
                if let Some(format) = format {
                    map.insert("format".to_string(), Value::String(format.0.clone()));
                }
                Value::Object(map)
            }
            Statement::Describe(name) => single("describe", Value::String(name.to_string())),
            Statement::Set { scope, assignments } => {
                let mut values = Map::new();
                for (name, value) in assignments {
                    values.insert(name.clone(), self.expr(value));
                }
                let mut map = Map::new();
                map.insert("set".to_string(), Value::Object(values));
                if let Some(scope) = scope {
                    let scope = match scope {
                        SetScope::Session => "session",
                        SetScope::Global => "global",
                        SetScope::Local => "local",
                    };
                    map.insert("scope".to_string(), Value::String(scope.to_string()));
                }
                Value::Object(map)
            }
            Statement::Unset(parameters) => single("unset", names(parameters)),
            Statement::Use(name) => single("use", Value::String(name.to_string())),
        }
    }

    fn insert(&self, insert: &InsertStatement) -> Value {
        let mut map = Map::new();
        map.insert("insert".to_string(), Value::String(insert.table.to_string()));
        if !insert.columns.is_empty() {
            map.insert("columns".to_string(), names(&insert.columns));
        }
        match &insert.source {
            InsertSource::Values(rows) => {
                let mut rows: Vec<Value> = rows
                    .iter()
                    .map(|row| Value::Array(self.exprs(row)))
                    .collect();
                let values = if rows.len() == 1 {
                    rows.pop().unwrap_or(Value::Null)
                } else {
                    Value::Array(rows)
                };
                map.insert("values".to_string(), values);
            }
            InsertSource::Query(query) => {
                map.insert("query".to_string(), self.query(query));
            }
            InsertSource::DefaultValues => {
                map.insert("default_values".to_string(), Value::Bool(true));
            }
        }
        insert_flag(&mut map, "ignore", insert.ignore);
        insert_flag(&mut map, "overwrite", insert.overwrite);
        Value::Object(map)
    }

    fn update(&self, update: &UpdateStatement) -> Value {
        let mut map = Map::new();
        map.insert("update".to_string(), self.table_ref(&update.table));
        map.insert("set".to_string(), self.assignments(&update.assignments));
        if !update.from.is_empty() {
            map.insert("from".to_string(), self.from(&update.from));
        }
        if let Some(condition) = &update.where_clause {
            map.insert("where".to_string(), self.expr(condition));
        }
        Value::Object(map)
    }

    fn assignments(&self, assignments: &[Assignment]) -> Value {
        let mut map = Map::new();
        for assignment in assignments {
            map.insert(assignment.column.to_string(), self.expr(&assignment.value));
        }
        Value::Object(map)
    }

    fn delete(&self, delete: &DeleteStatement) -> Value {
        let mut map = Map::new();
        map.insert("delete".to_string(), self.from(&delete.targets));
        if !delete.from.is_empty() {
            map.insert("from".to_string(), self.from(&delete.from));
        }
        if let Some(condition) = &delete.where_clause {
            map.insert("where".to_string(), self.expr(condition));
        }
        if !delete.order_by.is_empty() {
            map.insert("orderby".to_string(), self.order_by(&delete.order_by));
        }
        if let Some(limit) = &delete.limit {
            map.insert("limit".to_string(), self.expr(limit));
        }
        insert_flag(&mut map, "low_priority", delete.low_priority);
        insert_flag(&mut map, "quick", delete.quick);
        insert_flag(&mut map, "ignore", delete.ignore);
        Value::Object(map)
    }

    fn merge(&self, merge: &MergeStatement) -> Value {
        let mut map = Map::new();
        let clauses = merge
            .clauses
            .iter()
            .map(|clause| self.merge_clause(clause))
            .collect();
        map.insert("merge".to_string(), collapse(clauses));
        if let Some(top) = &merge.top {
            map.insert("top".to_string(), self.top(top));
        }
        map.insert("target".to_string(), self.table_ref(&merge.target));
        map.insert("source".to_string(), self.table_ref(&merge.source));
        map.insert("on".to_string(), self.expr(&merge.on));
        Value::Object(map)
    }

    fn merge_clause(&self, clause: &MergeClause) -> Value {
        let mut map = Map::new();
        map.insert("when".to_string(), Value::String(clause.kind.name().to_string()));
        if let Some(condition) = &clause.condition {
            map.insert("condition".to_string(), self.expr(condition));
        }
        let action = match &clause.action {
            MergeAction::Update(assignments) => single("update", self.assignments(assignments)),
            MergeAction::Delete => single("delete", Value::Object(Map::new())),
            MergeAction::Insert { columns, values } => {
                let mut action = Map::new();
                action.insert("insert".to_string(), Value::Object(Map::new()));
                if !columns.is_empty() {
                    action.insert("columns".to_string(), names(columns));
                }
                action.insert("values".to_string(), Value::Array(self.exprs(values)));
                Value::Object(action)
            }
        };
        map.insert("then".to_string(), action);
        Value::Object(map)
    }

    fn create_table(&self, create: &CreateTableStatement) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(create.name.to_string()));
        if !create.columns.is_empty() {
            let columns = create.columns.iter().map(|column| self.column(column)).collect();
            map.insert("columns".to_string(), collapse(columns));
        }
        if !create.constraints.is_empty() {
            let constraints = create
                .constraints
                .iter()
                .map(|constraint| self.constraint(constraint))
                .collect();
            map.insert("constraint".to_string(), collapse(constraints));
        }
        insert_flag(&mut map, "temporary", create.temporary);
        insert_flag(&mut map, "transient", create.transient);
        if create.or_replace {
            map.insert("replace".to_string(), Value::Bool(true));
        } else if create.if_not_exists {
            map.insert("replace".to_string(), Value::Bool(false));
        }
        for option in &create.options {
            map.insert(option.name.clone(), self.expr(&option.value));
        }
        if let Some(query) = &create.query {
            map.insert("query".to_string(), self.query(query));
        }
        Value::Object(map)
    }

    fn column(&self, column: &ColumnDef) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(column.name.clone()));
        map.insert("type".to_string(), self.data_type(&column.data_type));
        if let Some(nullable) = column.nullable {
            map.insert("nullable".to_string(), Value::Bool(nullable));
        }
        if let Some(default) = &column.default {
            map.insert("default".to_string(), self.expr(default));
        }
        if let Some(on_update) = &column.on_update {
            map.insert("on_update".to_string(), self.expr(on_update));
        }
        if let Some(charset) = &column.character_set {
            map.insert("character_set".to_string(), Value::String(charset.clone()));
        }
        if let Some(collate) = &column.collate {
            map.insert("collate".to_string(), Value::String(collate.clone()));
        }
        if let Some(comment) = &column.comment {
            map.insert("comment".to_string(), literal(comment));
        }
        insert_flag(&mut map, "auto_increment", column.auto_increment);
        insert_flag(&mut map, "primary_key", column.primary_key);
        insert_flag(&mut map, "unique", column.unique);
        if let Some(references) = &column.references {
            map.insert("references".to_string(), references_value(references));
        }
        Value::Object(map)
    }

    fn constraint(&self, constraint: &TableConstraint) -> Value {
        let mut map = Map::new();
        if let Some(name) = &constraint.name {
            map.insert("name".to_string(), Value::String(name.clone()));
        }
        match &constraint.kind {
            ConstraintKind::PrimaryKey(index) => {
                map.insert("primary_key".to_string(), index_value(index));
            }
            ConstraintKind::Unique(index) => {
                map.insert("unique".to_string(), index_value(index));
            }
            ConstraintKind::Index(index) => {
                map.insert("index".to_string(), index_value(index));
            }
            ConstraintKind::ForeignKey {
                columns,
                references,
            } => {
                let mut foreign = Map::new();
                foreign.insert("columns".to_string(), names(columns));
                foreign.insert("references".to_string(), references_value(references));
                map.insert("foreign_key".to_string(), Value::Object(foreign));
            }
            ConstraintKind::Check(condition) => {
                map.insert("check".to_string(), self.expr(condition));
            }
        }
        Value::Object(map)
    }

    fn create_view(&self, create: &CreateViewStatement) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(create.name.to_string()));
        if !create.columns.is_empty() {
            map.insert("columns".to_string(), names(&create.columns));
        }
        map.insert("query".to_string(), self.query(&create.query));
        if create.or_replace {
            map.insert("replace".to_string(), Value::Bool(true));
        } else if create.if_not_exists {
            map.insert("replace".to_string(), Value::Bool(false));
        }
        insert_flag(&mut map, "temporary", create.temporary);
        if let Some(algorithm) = &create.algorithm {
            map.insert("algorithm".to_string(), Value::String(algorithm.clone()));
        }
        Value::Object(map)
    }

    fn create_index(&self, create: &CreateIndexStatement) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(create.name.clone()));
        map.insert("table".to_string(), Value::String(create.table.to_string()));
        map.insert("columns".to_string(), index_columns(&create.columns));
        insert_flag(&mut map, "unique", create.unique);
        if create.if_not_exists {
            map.insert("replace".to_string(), Value::Bool(false));
        }
        if let Some(using) = &create.using {
            map.insert("using".to_string(), Value::String(using.clone()));
        }
        Value::Object(map)
    }

    fn alter_table(&self, alter: &AlterTableStatement) -> Value {
        let actions = alter
            .actions
            .iter()
            .map(|action| match action {
                AlterTableAction::AddColumn(column) => single("add_column", self.column(column)),
                AlterTableAction::AddConstraint(constraint) => {
                    single("add_constraint", self.constraint(constraint))
                }
                AlterTableAction::DropColumn { name, if_exists } => {
                    let name = Value::String(name.clone());
                    let body = if *if_exists {
                        let mut map = Map::new();
                        map.insert("name".to_string(), name);
                        map.insert("if_exists".to_string(), Value::Bool(true));
                        Value::Object(map)
                    } else {
                        name
                    };
                    single("drop_column", body)
                }
                AlterTableAction::ModifyColumn(column) => {
                    single("modify_column", self.column(column))
                }
                AlterTableAction::RenameTable(name) => {
                    single("rename", Value::String(name.to_string()))
                }
                AlterTableAction::RenameColumn { from, to } => {
                    let mut map = Map::new();
                    map.insert("from".to_string(), Value::String(from.clone()));
                    map.insert("to".to_string(), Value::String(to.clone()));
                    single("rename_column", Value::Object(map))
                }
            })
            .collect();

        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(alter.name.to_string()));
        map.insert("action".to_string(), collapse(actions));
        Value::Object(map)
    }

    fn copy(&self, copy: &CopyStatement) -> Value {
        let mut map = Map::new();
        map.insert("into".to_string(), self.copy_source(&copy.into));
        if !copy.columns.is_empty() {
            map.insert("columns".to_string(), names(&copy.columns));
        }
        if let Some(from) = &copy.from {
            map.insert("from".to_string(), self.copy_source(from));
        }
        self.copy_options(&mut map, &copy.options);
        Value::Object(map)
    }

    fn copy_source(&self, source: &CopySource) -> Value {
        match source {
            CopySource::Location(path) => Value::String(path.clone()),
            CopySource::Literal(text) => literal(text),
            CopySource::Table(name) => Value::String(name.to_string()),
            CopySource::Query(query) => self.query(query),
        }
    }

    fn copy_options(&self, map: &mut Map<String, Value>, options: &[CopyOption]) {
        for option in options {
            let value = match &option.value {
                CopyOptionValue::Value(expr) => self.expr(expr),
                CopyOptionValue::Group(group) => {
                    let mut nested = Map::new();
                    self.copy_options(&mut nested, group);
                    Value::Object(nested)
                }
                CopyOptionValue::List(items) => literal_list(self.exprs(items)),
            };
            map.insert(option.name.clone(), value);
        }
    }
}

fn index_value(index: &IndexDef) -> Value {
    let mut map = Map::new();
    if let Some(name) = &index.name {
        map.insert("name".to_string(), Value::String(name.clone()));
    }
    map.insert("columns".to_string(), index_columns(&index.columns));
    if let Some(using) = &index.using {
        map.insert("using".to_string(), Value::String(using.clone()));
    }
    if let Some(comment) = &index.comment {
        map.insert("comment".to_string(), literal(comment));
    }
    Value::Object(map)
}

/// Index columns are bare names unless a prefix length or direction is
/// given.
fn index_columns(columns: &[IndexColumn]) -> Value {
    let columns = columns
        .iter()
        .map(|column| {
            if column.length.is_none() && column.direction.is_none() {
                return Value::String(column.name.clone());
            }
            let mut map = Map::new();
            map.insert("value".to_string(), Value::String(column.name.clone()));
            if let Some(length) = column.length {
                map.insert("length".to_string(), Value::from(length));
            }
            if let Some(direction) = column.direction {
                map.insert("sort".to_string(), Value::String(direction.name().to_string()));
            }
            Value::Object(map)
        })
        .collect();
    collapse(columns)
}

fn references_value(references: &ForeignKeyRef) -> Value {
    let mut map = Map::new();
    map.insert("table".to_string(), Value::String(references.table.to_string()));
    if !references.columns.is_empty() {
        map.insert("columns".to_string(), names(&references.columns));
    }
    if let Some(action) = &references.on_delete {
        map.insert("on_delete".to_string(), Value::String(action.clone()));
    }
    if let Some(action) = &references.on_update {
        map.insert("on_update".to_string(), Value::String(action.clone()));
    }
    Value::Object(map)
}

fn drop_body(drop: &DropStatement) -> Value {
    let names = drop
        .names
        .iter()
        .map(|name| Value::String(name.to_string()))
        .collect();
    let mut map = Map::new();
    map.insert(drop.object_type.name().to_string(), collapse(names));
    insert_flag(&mut map, "if_exists", drop.if_exists);
    insert_flag(&mut map, "cascade", drop.cascade);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ast::{BinaryOp, DataType, Expr, MergeMatch, ObjectName, ObjectType, TableRef};
    use crate::options::CallStyle;

    fn nested() -> Normalizer {
        Normalizer::new(CallStyle::Nested)
    }

    #[test]
    fn test_insert_single_row_is_a_list() {
        let insert = Statement::Insert(InsertStatement {
            table: ObjectName::simple("t"),
            columns: vec!["a".to_string(), "b".to_string()],
            source: InsertSource::Values(vec![vec![Expr::integer(1), Expr::string("x")]]),
            ignore: true,
            overwrite: false,
        });
        assert_eq!(
            nested().statement(&insert),
            json!({
                "insert": "t",
                "columns": ["a", "b"],
                "values": [1, {"literal": "x"}],
                "ignore": true,
            })
        );
    }

    #[test]
    fn test_delete_flags() {
        let delete = Statement::Delete(DeleteStatement {
            targets: vec![TableRef::table(ObjectName::simple("a"))],
            low_priority: true,
            ..DeleteStatement::default()
        });
        assert_eq!(
            nested().statement(&delete),
            json!({"delete": "a", "low_priority": true})
        );
    }

    #[test]
    fn test_merge_single_clause_collapses() {
        let merge = Statement::Merge(MergeStatement {
            top: None,
            target: TableRef::table(ObjectName::simple("t")),
            source: TableRef::table(ObjectName::simple("s")),
            on: Expr::binary(
                BinaryOp::Eq,
                Expr::Column(ObjectName(vec!["t".into(), "id".into()])),
                Expr::Column(ObjectName(vec!["s".into(), "id".into()])),
            ),
            clauses: vec![MergeClause {
                kind: MergeMatch::NotMatchedBySource,
                condition: None,
                action: MergeAction::Delete,
            }],
        });
        assert_eq!(
            nested().statement(&merge),
            json!({
                "merge": {"when": "not_matched_by_source", "then": {"delete": {}}},
                "target": "t",
                "source": "s",
                "on": {"eq": ["t.id", "s.id"]},
            })
        );
    }

    #[test]
    fn test_create_table_column_and_index() {
        let mut column = ColumnDef::new(
            "id",
            DataType::with_params("bigint", vec![Expr::integer(20)]),
        );
        column.nullable = Some(false);
        column.auto_increment = true;
        let create = Statement::CreateTable(CreateTableStatement {
            name: ObjectName::simple("industry_i18n"),
            if_not_exists: true,
            columns: vec![column],
            constraints: vec![TableConstraint {
                name: None,
                kind: ConstraintKind::Index(IndexDef {
                    name: Some("locale_id".to_string()),
                    columns: vec![
                        IndexColumn {
                            name: "master_id".to_string(),
                            length: None,
                            direction: None,
                        },
                        IndexColumn {
                            name: "locale".to_string(),
                            length: Some(255),
                            direction: None,
                        },
                    ],
                    using: None,
                    comment: None,
                }),
            }],
            ..CreateTableStatement::default()
        });
        assert_eq!(
            nested().statement(&create),
            json!({"create table": {
                "name": "industry_i18n",
                "columns": {
                    "name": "id",
                    "type": {"bigint": 20},
                    "nullable": false,
                    "auto_increment": true,
                },
                "constraint": {"index": {
                    "name": "locale_id",
                    "columns": ["master_id", {"value": "locale", "length": 255}],
                }},
                "replace": false,
            }})
        );
    }

    #[test]
    fn test_drop_and_describe() {
        let drop = Statement::Drop(DropStatement {
            object_type: ObjectType::Table,
            names: vec![ObjectName::simple("a"), ObjectName::simple("b")],
            if_exists: true,
            cascade: false,
        });
        assert_eq!(
            nested().statement(&drop),
            json!({"drop": {"table": ["a", "b"], "if_exists": true}})
        );
        let describe = Statement::Describe(ObjectName::simple("t"));
        assert_eq!(nested().statement(&describe), json!({"describe": "t"}));
    }

    #[test]
    fn test_copy_options() {
        let copy = Statement::Copy(CopyStatement {
            into: CopySource::Table(ObjectName::simple("load1")),
            columns: Vec::new(),
            from: Some(CopySource::Location("@%load1/data1/".to_string())),
            options: vec![
                CopyOption {
                    name: "files".to_string(),
                    value: CopyOptionValue::List(vec![
                        Expr::string("test1.csv"),
                        Expr::string("test2.csv"),
                    ]),
                },
                CopyOption {
                    name: "file_format".to_string(),
                    value: CopyOptionValue::Group(vec![CopyOption {
                        name: "type".to_string(),
                        value: CopyOptionValue::Value(Expr::Word("CSV".to_string())),
                    }]),
                },
            ],
        });
        assert_eq!(
            nested().statement(&copy),
            json!({"copy": {
                "into": "load1",
                "from": "@%load1/data1/",
                "files": {"literal": ["test1.csv", "test2.csv"]},
                "file_format": {"type": "CSV"},
            }})
        );
    }
}
