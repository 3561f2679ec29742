//! User-supplied filter and ordering parsing.
//!
//! Constraints and sort columns arrive from the command line and end up in
//! SQL, so everything here is whitelist-based: column names and operators are
//! mapped to fixed static strings and values only ever reach the database as
//! bind parameters. Anything unrecognized is logged and dropped rather than
//! rejected with an error, so one bad filter cannot take down a scripted run.

use regex::Regex;
use tracing::warn;

/// Typed bind value for a parsed constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A validated `column op value` filter, ready to be appended to a query.
///
/// `column` and `op` are static strings from the whitelists below and are
/// safe to splice into SQL; `value` must be bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub op: &'static str,
    pub value: BindValue,
}

/// Value type expected for each filterable column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Int,
    Float,
    Text,
}

/// Columns users may filter on, with their canonical names and types.
const FILTER_COLUMNS: &[(&str, &str, ColumnKind)] = &[
    ("number", "number", ColumnKind::Int),
    ("designation", "designation", ColumnKind::Text),
    ("absolute_magnitude", "absolute_magnitude", ColumnKind::Float),
    ("mag", "absolute_magnitude", ColumnKind::Float),
];

/// Columns users may sort on.
const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("number", "number"),
    ("designation", "designation"),
    ("absolute_magnitude", "absolute_magnitude"),
    ("mag", "absolute_magnitude"),
    ("semimajor_axis", "semimajor_axis"),
    ("a", "semimajor_axis"),
];

fn sql_op(token: &str) -> Option<&'static str> {
    match token {
        "lt" | "<" => Some("<"),
        "lte" | "<=" => Some("<="),
        "gt" | ">" => Some(">"),
        "gte" | ">=" => Some(">="),
        "eq" | "=" | "==" => Some("="),
        "ne" | "!=" | "<>" => Some("!="),
        _ => None,
    }
}

/// Replace the unicode lookalikes that creep in through copy-paste (NBSP,
/// fullwidth comparison signs) with their ASCII forms.
fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{00a0}' | '\u{2007}' | '\u{202f}' => ' ',
            '\u{ff1c}' => '<',
            '\u{ff1e}' => '>',
            '\u{ff1d}' => '=',
            '\u{ff01}' => '!',
            _ => c,
        })
        .collect()
}

fn build_predicate(column: &str, op_token: &str, value: &str) -> Option<Predicate> {
    let (_, canonical, kind) = FILTER_COLUMNS
        .iter()
        .find(|(name, _, _)| *name == column)?;
    let op = sql_op(op_token)?;
    let value = match kind {
        ColumnKind::Int => BindValue::Int(value.parse().ok()?),
        ColumnKind::Float => BindValue::Float(value.parse().ok()?),
        ColumnKind::Text => BindValue::Text(value.to_string()),
    };
    Some(Predicate {
        column: canonical,
        op,
        value,
    })
}

/// Parse a user constraint string into a safe predicate.
///
/// Arguments
/// -----------------
/// * `raw`: one of the accepted spellings, e.g. `mag_lt_15`,
///   `number < 1000`, `designation eq Ceres`.
///
/// Return
/// ----------
/// * `Some(Predicate)` on success; `None` (with a warning logged) for an
///   unknown column, an unknown operator, or a value that does not parse as
///   the column's type.
pub fn parse_constraint(raw: &str) -> Option<Predicate> {
    let normalized = normalize(raw);
    let input = normalized.trim();
    if input.is_empty() {
        return None;
    }

    let underscore = Regex::new(r"^(\w+?)_(lt|lte|gt|gte|eq|ne)_(.+)$").unwrap();
    let symbolic = Regex::new(r"^\s*(\w+)\s*(<=|>=|!=|<>|==|<|>|=)\s*(.+?)\s*$").unwrap();

    let predicate = if let Some(caps) = underscore.captures(input) {
        build_predicate(&caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = symbolic.captures(input) {
        build_predicate(&caps[1], &caps[2], &caps[3])
    } else {
        // Whitespace-token form: `column op value`.
        let tokens: Vec<&str> = input.split_whitespace().collect();
        match tokens.as_slice() {
            [column, op, value] => build_predicate(column, op, value),
            _ => None,
        }
    };

    if predicate.is_none() {
        warn!("ignoring unparseable constraint {raw:?}");
    }
    predicate
}

/// Validate a user sort specification into a SQL ORDER BY fragment.
///
/// Accepts an optional `asc`/`desc` suffix (`mag desc`). Unknown columns fall
/// back to ordering by absolute magnitude, with a warning.
pub fn parse_order_by(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(raw) => raw,
        None => return "absolute_magnitude".to_string(),
    };
    let normalized = normalize(raw);
    let mut tokens = normalized.split_whitespace();
    let column = tokens.next().unwrap_or("");
    let direction = match tokens.next().map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => "",
        Some("desc") => " DESC",
        Some(_) => {
            warn!("ignoring unrecognized sort specification {raw:?}");
            return "absolute_magnitude".to_string();
        }
    };

    match ORDER_COLUMNS
        .iter()
        .find(|(name, _)| *name == column.to_ascii_lowercase())
    {
        Some((_, canonical)) => format!("{canonical}{direction}"),
        None => {
            warn!("ignoring unknown sort column {raw:?}");
            "absolute_magnitude".to_string()
        }
    }
}
