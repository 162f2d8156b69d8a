//! Expression rendering.

use serde_json::{Map, Number, Value};

use super::{collapse, insert_flag, literal, literal_list, single, Normalizer};
use crate::ast::{
    BinaryOp, DataType, Expr, FrameBound, FunctionCall, Literal, OrderByExpr, UnaryOp, WindowSpec,
};

impl Normalizer {
    /// Renders an expression.
    pub(crate) fn expr(&self, expr: &Expr) -> Value {
        match expr {
            Expr::Literal(value) => render_literal(value),
            Expr::Column(name) => Value::String(name.to_string()),
            Expr::Wildcard(None) => Value::String("*".to_string()),
            Expr::Wildcard(Some(qualifier)) => Value::String(format!("{qualifier}.*")),
            Expr::Variable(name) | Expr::Word(name) => Value::String(name.clone()),
            Expr::Binary { op, operands } => self.call(op.name(), self.exprs(operands), Map::new()),
            Expr::Unary { op, operand } => self.unary(*op, operand),
            Expr::Function(call) => self.function(call),
            Expr::Cast {
                expr,
                data_type,
                try_cast,
            } => {
                let name = if *try_cast { "try_cast" } else { "cast" };
                self.call(name, vec![self.expr(expr), self.data_type(data_type)], Map::new())
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                let mut branches: Vec<Value> = when_clauses
                    .iter()
                    .map(|(condition, result)| {
                        let condition = match operand {
                            Some(operand) => self.call(
                                BinaryOp::Eq.name(),
                                vec![self.expr(operand), self.expr(condition)],
                                Map::new(),
                            ),
                            None => self.expr(condition),
                        };
                        let mut branch = Map::new();
                        branch.insert("when".to_string(), condition);
                        branch.insert("then".to_string(), self.expr(result));
                        Value::Object(branch)
                    })
                    .collect();
                if let Some(otherwise) = else_clause {
                    branches.push(self.expr(otherwise));
                }
                single("case", collapse(branches))
            }
            Expr::Subquery(query) => self.query(query),
            Expr::Exists(query) => self.call("exists", vec![self.query(query)], Map::new()),
            Expr::IsNull { expr, negated } => {
                let name = if *negated { "exists" } else { "missing" };
                self.call(name, vec![self.expr(expr)], Map::new())
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                let name = if *negated { "nin" } else { "in" };
                let list = literal_list(self.exprs(list));
                self.call(name, vec![self.expr(expr), list], Map::new())
            }
            Expr::InSubquery {
                expr,
                query,
                negated,
            } => {
                let name = if *negated { "nin" } else { "in" };
                self.call(name, vec![self.expr(expr), self.query(query)], Map::new())
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let name = if *negated { "not_between" } else { "between" };
                let args = vec![self.expr(expr), self.expr(low), self.expr(high)];
                self.call(name, args, Map::new())
            }
            Expr::PathGet { base, path } => {
                let mut args = Vec::with_capacity(path.len() + 1);
                let mut base = base.as_ref();
                let mut inner_paths = Vec::new();
                while let Expr::PathGet {
                    base: inner,
                    path: inner_path,
                } = base
                {
                    inner_paths.push(inner_path);
                    base = inner;
                }
                args.push(self.expr(base));
                for segments in inner_paths.into_iter().rev() {
                    args.extend(self.exprs(segments));
                }
                args.extend(self.exprs(path));
                self.call("get", args, Map::new())
            }
            Expr::Window { function, window } => {
                let mut map = Map::new();
                map.insert("over".to_string(), self.window(window));
                map.insert("value".to_string(), self.expr(function));
                Value::Object(map)
            }
            Expr::WithinGroup { function, order_by } => {
                let mut map = Map::new();
                map.insert("within".to_string(), self.within(order_by));
                map.insert("value".to_string(), self.expr(function));
                Value::Object(map)
            }
            Expr::Interval { value, unit } => {
                let mut args = vec![self.expr(value)];
                if let Some(unit) = unit {
                    args.push(Value::String(unit.clone()));
                }
                self.call("interval", args, Map::new())
            }
            Expr::TypedString { data_type, value } => {
                self.call(data_type, vec![literal(value)], Map::new())
            }
            Expr::Tuple(items) => Value::Array(self.exprs(items)),
        }
    }

    pub(crate) fn exprs(&self, exprs: &[Expr]) -> Vec<Value> {
        exprs.iter().map(|expr| self.expr(expr)).collect()
    }

    fn unary(&self, op: UnaryOp, operand: &Expr) -> Value {
        match (op, operand) {
            (UnaryOp::Neg, Expr::Literal(Literal::Integer(n))) if *n != i64::MIN => {
                Value::from(-*n)
            }
            (UnaryOp::Neg, Expr::Literal(Literal::Float(f))) => float(-*f),
            _ => self.call(op.name(), vec![self.expr(operand)], Map::new()),
        }
    }

    fn function(&self, call: &FunctionCall) -> Value {
        let mut kwargs = Map::new();
        for (name, value) in &call.named_args {
            kwargs.insert(name.clone(), self.expr(value));
        }
        if call.distinct {
            kwargs.insert("distinct".to_string(), Value::Bool(true));
        }
        if !call.order_by.is_empty() {
            kwargs.insert("orderby".to_string(), self.order_by(&call.order_by));
        }
        if let Some(separator) = &call.separator {
            kwargs.insert("separator".to_string(), self.expr(separator));
        }
        self.call(&call.name, self.exprs(&call.args), kwargs)
    }

    /// Renders an ORDER BY list with the collapsing rule.
    pub(crate) fn order_by(&self, items: &[OrderByExpr]) -> Value {
        collapse(items.iter().map(|item| self.order_item(item)).collect())
    }

    fn order_item(&self, item: &OrderByExpr) -> Value {
        let mut map = Map::new();
        map.insert("value".to_string(), self.expr(&item.expr));
        if let Some(direction) = item.direction {
            map.insert("sort".to_string(), Value::String(direction.name().to_string()));
        }
        if let Some(nulls) = item.nulls {
            map.insert("nulls".to_string(), Value::String(nulls.name().to_string()));
        }
        Value::Object(map)
    }

    /// Renders the body of `OVER (..)`.
    pub(crate) fn window(&self, window: &WindowSpec) -> Value {
        let reference_only = window.partition_by.is_empty()
            && window.order_by.is_empty()
            && window.frame.is_none();
        if let (Some(name), true) = (&window.name, reference_only) {
            return Value::String(name.clone());
        }

        let mut map = Map::new();
        if let Some(name) = &window.name {
            map.insert("name".to_string(), Value::String(name.clone()));
        }
        if !window.partition_by.is_empty() {
            map.insert(
                "partitionby".to_string(),
                collapse(self.exprs(&window.partition_by)),
            );
        }
        if !window.order_by.is_empty() {
            map.insert("orderby".to_string(), self.order_by(&window.order_by));
        }
        if let Some(frame) = &window.frame {
            let mut bounds = Map::new();
            if let Some(min) = self.frame_bound(&frame.start) {
                bounds.insert("min".to_string(), min);
            }
            let end = frame.end.as_ref().unwrap_or(&FrameBound::CurrentRow);
            if let Some(max) = self.frame_bound(end) {
                bounds.insert("max".to_string(), max);
            }
            map.insert(frame.units.name().to_string(), Value::Object(bounds));
        }
        Value::Object(map)
    }

    /// Offsets relative to the current row; unbounded ends are omitted.
    fn frame_bound(&self, bound: &FrameBound) -> Option<Value> {
        match bound {
            FrameBound::UnboundedPreceding | FrameBound::UnboundedFollowing => None,
            FrameBound::CurrentRow => Some(Value::from(0)),
            FrameBound::Preceding(offset) => Some(self.unary(UnaryOp::Neg, offset)),
            FrameBound::Following(offset) => Some(self.expr(offset)),
        }
    }

    /// Renders the body of `WITHIN GROUP (..)`.
    pub(crate) fn within(&self, order_by: &[OrderByExpr]) -> Value {
        single("orderby", self.order_by(order_by))
    }

    /// Renders a column type. Types always use the nested shape:
    /// `{"varchar": 10}`, `{"int": {}}`, `{"decimal": [10, 2]}`.
    pub(crate) fn data_type(&self, data_type: &DataType) -> Value {
        let params = match data_type.params.len() {
            0 => Value::Object(Map::new()),
            _ => collapse(self.exprs(&data_type.params)),
        };
        let mut map = Map::new();
        map.insert(data_type.name.clone(), params);
        insert_flag(&mut map, "unsigned", data_type.unsigned);
        insert_flag(&mut map, "zerofill", data_type.zerofill);
        Value::Object(map)
    }
}

fn render_literal(value: &Literal) -> Value {
    match value {
        Literal::Integer(n) => Value::from(*n),
        Literal::UnsignedInteger(n) => Value::from(*n),
        Literal::Float(f) => float(*f),
        Literal::String(s) => literal(s),
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Null => single("null", Value::Object(Map::new())),
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}
