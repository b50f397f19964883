//! Expression rendering.

use crate::ast::expr::fill_template;
use crate::ast::Expr;
use crate::error::MatchResult;
use crate::schema::Schema;

use super::Render;

impl Render for Expr {
    fn render(&self, schema: &Schema) -> MatchResult<String> {
        Ok(match self {
            Expr::Column { table: Some(table), name } => schema.quote(&format!("{}.{}", table, name)),
            Expr::Column { table: None, name } => schema.qualify(name)?,
            Expr::Ident(name) => schema.quote(name),
            Expr::Raw(sql) => sql.clone(),
            Expr::Function { template, args } => {
                let rendered = args
                    .iter()
                    .map(|arg| arg.render(schema))
                    .collect::<MatchResult<Vec<String>>>()?;
                fill_template(template, rendered)
            }
            Expr::Alias { inner, name } => format!("{} AS {}", inner.render(schema)?, name),
            Expr::Sorted { inner, order } => format!("{} {}", inner.render(schema)?, order),
        })
    }
}
