//! Label text for each statement kind.
//!
//! One pure function per kind. Every expression that feeds a label must carry
//! its source text; a missing one is reported as [`FlowError::MalformedAst`].

use crate::ast::{
    AssignmentStatement, CallStatement, Expression, ForGenericStatement, ForNumericStatement,
    FunctionDeclaration, IfStatement, LocalStatement, RepeatStatement, ReturnStatement,
    TableConstructorExpression, WhileStatement,
};
use crate::error::{FlowError, FlowResult};

fn text<'a>(expr: &'a Expression, kind: &'static str, field: &'static str) -> FlowResult<&'a str> {
    expr.source()
        .ok_or_else(|| FlowError::malformed(kind, field))
}

fn join(exprs: &[Expression], kind: &'static str, field: &'static str) -> FlowResult<String> {
    let parts = exprs
        .iter()
        .map(|e| text(e, kind, field))
        .collect::<FlowResult<Vec<_>>>()?;
    Ok(parts.join(", "))
}

/// `if <condition>`, from the first clause only.
pub fn if_label(stmt: &IfStatement) -> FlowResult<String> {
    let condition = stmt
        .clauses
        .first()
        .and_then(|clause| clause.condition.as_ref())
        .ok_or_else(|| FlowError::malformed("IfStatement", "condition"))?;
    Ok(format!("if {}", text(condition, "IfStatement", "condition")?))
}

pub fn elseif_label(condition: &Expression) -> FlowResult<String> {
    Ok(format!(
        "elseif {}",
        text(condition, "IfStatement", "elseif condition")?
    ))
}

pub fn while_label(stmt: &WhileStatement) -> FlowResult<String> {
    Ok(format!(
        "while {}",
        text(&stmt.condition, "WhileStatement", "condition")?
    ))
}

pub fn repeat_label(_stmt: &RepeatStatement) -> String {
    "repeat".to_string()
}

pub fn until_label(stmt: &RepeatStatement) -> FlowResult<String> {
    Ok(format!(
        "until {}",
        text(&stmt.condition, "RepeatStatement", "condition")?
    ))
}

pub fn for_numeric_label(stmt: &ForNumericStatement) -> FlowResult<String> {
    const KIND: &str = "ForNumericStatement";
    let mut label = format!(
        "for {} = {}, {}",
        text(&stmt.variable, KIND, "variable")?,
        text(&stmt.start, KIND, "start")?,
        text(&stmt.end, KIND, "end")?,
    );
    if let Some(step) = &stmt.step {
        label.push_str(", ");
        label.push_str(text(step, KIND, "step")?);
    }
    Ok(label)
}

pub fn for_generic_label(stmt: &ForGenericStatement) -> FlowResult<String> {
    const KIND: &str = "ForGenericStatement";
    Ok(format!(
        "for {} in {}",
        join(&stmt.variables, KIND, "variables")?,
        join(&stmt.iterators, KIND, "iterators")?
    ))
}

pub fn function_label(stmt: &FunctionDeclaration) -> FlowResult<String> {
    const KIND: &str = "FunctionDeclaration";
    Ok(format!(
        "function {}({})",
        text(&stmt.name, KIND, "name")?,
        join(&stmt.parameters, KIND, "parameters")?
    ))
}

pub fn return_label(stmt: &ReturnStatement) -> FlowResult<String> {
    if stmt.arguments.is_empty() {
        return Ok("return".to_string());
    }
    Ok(format!(
        "return {}",
        join(&stmt.arguments, "ReturnStatement", "arguments")?
    ))
}

pub fn call_label(stmt: &CallStatement) -> FlowResult<String> {
    const KIND: &str = "CallStatement";
    Ok(format!(
        "call {}({})",
        text(&stmt.callee, KIND, "callee")?,
        join(&stmt.arguments, KIND, "arguments")?
    ))
}

pub fn assignment_label(stmt: &AssignmentStatement) -> FlowResult<String> {
    const KIND: &str = "AssignmentStatement";
    Ok(format!(
        "{} = {}",
        join(&stmt.variables, KIND, "variables")?,
        join(&stmt.values, KIND, "values")?
    ))
}

pub fn local_label(stmt: &LocalStatement) -> FlowResult<String> {
    const KIND: &str = "LocalStatement";
    let variables = join(&stmt.variables, KIND, "variables")?;
    if stmt.values.is_empty() {
        return Ok(format!("local {variables}"));
    }
    Ok(format!(
        "local {variables} = {}",
        join(&stmt.values, KIND, "values")?
    ))
}

pub fn table_label(expr: &TableConstructorExpression) -> FlowResult<String> {
    const KIND: &str = "TableConstructorExpression";
    let fields = expr
        .fields
        .iter()
        .map(|field| {
            let value = text(&field.value, KIND, "value")?;
            match &field.key {
                Some(key) => Ok(format!("{} = {value}", text(key, KIND, "key")?)),
                None => Ok(value.to_string()),
            }
        })
        .collect::<FlowResult<Vec<_>>>()?;
    if fields.is_empty() {
        return Ok("table { }".to_string());
    }
    Ok(format!("table {{ {} }}", fields.join(", ")))
}
