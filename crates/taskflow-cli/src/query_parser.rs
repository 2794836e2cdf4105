use std::str::FromStr;

use chrono::NaiveDate;
use pest::iterators::Pairs;
use pest::pratt_parser::PrattParser;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use crate::parser::parse_date;
use taskflow_core::models::TaskPriority;
use taskflow_core::query::{DueFilter, Filter, Operator, Query, TaskState};

#[derive(Parser)]
#[grammar = "filter.pest"]
pub struct FilterParser;

lazy_static::lazy_static! {
    static ref PRATT_PARSER: PrattParser<Rule> = {
        use pest::pratt_parser::{Assoc::*, Op};
        use Rule::*;

        PrattParser::new()
            .op(Op::infix(or, Left))
            .op(Op::infix(and, Left))
            .op(Op::prefix(not))
    };
}

#[derive(Error, Debug)]
pub enum QueryParseError {
    #[error("Pest parsing error: {0}")]
    Pest(#[from] Box<pest::error::Error<Rule>>),
    #[error("Invalid filter expression: {0}")]
    InvalidFilter(String),
    #[error("Unknown rule: {0:?}")]
    UnknownRule(Rule),
    #[error("Invalid status value: {0}")]
    InvalidStatus(String),
    #[error("Invalid priority value: {0}")]
    InvalidPriority(String),
    #[error("Invalid due value: {0}")]
    InvalidDue(String),
    #[error("Invalid recurring value: {0} (expected yes or no)")]
    InvalidRecurring(String),
}

fn build_filter(key: &str, value: &str, today: NaiveDate) -> Result<Filter, QueryParseError> {
    let filter = match key.to_lowercase().as_str() {
        "category" | "cat" => Filter::Category(value.to_string()),
        "search" | "text" => Filter::Search(value.to_string()),
        "status" => {
            let state = TaskState::from_str(value)
                .map_err(|_| QueryParseError::InvalidStatus(value.to_string()))?;
            Filter::Status(state)
        }
        "priority" => {
            let priority = TaskPriority::from_str(value)
                .map_err(|_| QueryParseError::InvalidPriority(value.to_string()))?;
            Filter::Priority(priority)
        }
        "due" => match value.to_lowercase().as_str() {
            "today" => Filter::Due(DueFilter::Today),
            "overdue" => Filter::Due(DueFilter::Overdue),
            _ => return Err(QueryParseError::InvalidDue(value.to_string())),
        },
        "before" | "after" => {
            let date = parse_date(value, today)
                .map_err(|_| QueryParseError::InvalidDue(value.to_string()))?;
            if key.eq_ignore_ascii_case("before") {
                Filter::Due(DueFilter::Before(date))
            } else {
                Filter::Due(DueFilter::After(date))
            }
        }
        "recurring" => match value.to_lowercase().as_str() {
            "yes" | "true" => Filter::Recurring(true),
            "no" | "false" => Filter::Recurring(false),
            _ => return Err(QueryParseError::InvalidRecurring(value.to_string())),
        },
        _ => {
            return Err(QueryParseError::InvalidFilter(format!(
                "Unknown filter key: {}",
                key
            )))
        }
    };
    Ok(filter)
}

fn build_ast(pairs: Pairs<Rule>, today: NaiveDate) -> Result<Query, QueryParseError> {
    PRATT_PARSER
        .map_primary(|primary| match primary.as_rule() {
            Rule::filter_expression => {
                let text = primary.as_str();
                let mut inner = primary.into_inner();
                let (key, value) = match (inner.next(), inner.next()) {
                    (Some(key), Some(value)) => (key.as_str(), value.as_str().trim_matches('"')),
                    _ => return Err(QueryParseError::InvalidFilter(text.to_string())),
                };
                Ok(Query::Filter(build_filter(key, value, today)?))
            }
            Rule::expression => build_ast(primary.into_inner(), today),
            rule => Err(QueryParseError::UnknownRule(rule)),
        })
        .map_prefix(|op, rhs| {
            let op_rule = op.as_rule();
            match op_rule {
                Rule::not => Ok(Query::Not(Box::new(rhs?))),
                _ => Err(QueryParseError::UnknownRule(op_rule)),
            }
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::and => Operator::And,
                Rule::or => Operator::Or,
                rule => return Err(QueryParseError::UnknownRule(rule)),
            };
            Ok(Query::Binary {
                op,
                left: Box::new(lhs?),
                right: Box::new(rhs?),
            })
        })
        .parse(pairs)
}

/// Parse a filter string into a [`Query`]. An empty string matches everything.
pub fn parse_query(input: &str, today: NaiveDate) -> Result<Query, QueryParseError> {
    let mut pairs = FilterParser::parse(Rule::filter_query, input).map_err(Box::new)?;
    let expression = pairs
        .next()
        .and_then(|query| query.into_inner().find(|p| p.as_rule() == Rule::expression));

    match expression {
        Some(expression) => build_ast(expression.into_inner(), today),
        None => Ok(Query::All),
    }
}
