//! Creation-schema and PATCH-document validators.
//!
//! Both validators run over raw `serde_json::Value` documents so that
//! wrong-typed or out-of-range fields produce schema errors rather than
//! deserialization failures, and both report exactly one
//! [`SchemaViolation`] per call (first offending field/operation wins).
//! The `details` strings are part of the public API contract and must not be
//! reworded.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::SchemaViolation;
use crate::model::{Configuration, DbConfig};
use crate::patch::{PatchOp, PatchOperation};

/// The only fields addressable by a PATCH operation, in canonical order.
pub const ALLOWED_PATCH_PATHS: [&str; 5] = [
    "/dbConfig/host",
    "/dbConfig/port",
    "/dbConfig/database",
    "/dbConfig/username",
    "/dbConfig/password",
];

const DATABASE_MAX_LEN: usize = 63;
const PORT_MAX: i64 = 65_535;

/// RFC 1123 hostname: dot-separated labels of 1-63 alphanumeric/hyphen
/// characters, no leading or trailing hyphen per label, no empty label.
static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("hostname pattern compiles")
});

/// Characters a database name must not contain.
static DATABASE_FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/."$*<>:|?]"#).expect("database pattern compiles"));

/// Validate a full configuration document against the creation schema and
/// parse it into its typed form.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] encountered, with `path` pointing
/// at the offending field.
pub fn parse_config(value: &Value) -> Result<Configuration, SchemaViolation> {
    let Some(root) = value.as_object() else {
        return Err(SchemaViolation::new(r#""value" must be an object"#, ""));
    };

    let db = match root.get("dbConfig") {
        None => {
            return Err(SchemaViolation::new(
                r#""dbConfig" is required"#,
                "/dbConfig",
            ));
        }
        Some(value) => value.as_object().ok_or_else(|| {
            SchemaViolation::new(r#""dbConfig" must be an object"#, "/dbConfig")
        })?,
    };

    let host = parse_host(db)?;
    let port = parse_port(db)?;
    let database = parse_database(db)?;
    let username = parse_username(db)?;
    let password = parse_password(db)?;

    Ok(Configuration {
        db_config: DbConfig {
            host,
            port,
            database,
            username,
            password,
        },
    })
}

fn parse_host(db: &Map<String, Value>) -> Result<String, SchemaViolation> {
    const PATH: &str = "/dbConfig/host";

    let value = db
        .get("host")
        .ok_or_else(|| SchemaViolation::new(r#""host" is required"#, PATH))?;
    let host = value
        .as_str()
        .ok_or_else(|| SchemaViolation::new(r#""host" must be a string"#, PATH))?;

    if host.is_empty() {
        return Err(SchemaViolation::new(
            r#""host" is not allowed to be empty"#,
            PATH,
        ));
    }
    if host.len() > 255 || !HOSTNAME_RE.is_match(host) {
        return Err(SchemaViolation::new(
            r#""host" must be a valid hostname"#,
            PATH,
        ));
    }

    Ok(host.to_string())
}

fn parse_port(db: &Map<String, Value>) -> Result<u16, SchemaViolation> {
    const PATH: &str = "/dbConfig/port";

    let value = db
        .get("port")
        .ok_or_else(|| SchemaViolation::new(r#""port" is required"#, PATH))?;
    if !value.is_number() {
        return Err(SchemaViolation::new(r#""port" must be a number"#, PATH));
    }
    let port = value
        .as_i64()
        .ok_or_else(|| SchemaViolation::new(r#""port" must be an integer"#, PATH))?;

    if port < 1 {
        return Err(SchemaViolation::new(
            r#""port" must be larger than or equal to 1"#,
            PATH,
        ));
    }
    if port > PORT_MAX {
        return Err(SchemaViolation::new(
            r#""port" must be a valid port"#,
            PATH,
        ));
    }

    u16::try_from(port).map_err(|_| SchemaViolation::new(r#""port" must be a valid port"#, PATH))
}

fn parse_database(db: &Map<String, Value>) -> Result<String, SchemaViolation> {
    const PATH: &str = "/dbConfig/database";

    let value = db
        .get("database")
        .ok_or_else(|| SchemaViolation::new(r#""database" is required"#, PATH))?;
    let database = value
        .as_str()
        .ok_or_else(|| SchemaViolation::new(r#""database" must be a string"#, PATH))?;

    if database.is_empty() {
        return Err(SchemaViolation::new(
            r#""database" is not allowed to be empty"#,
            PATH,
        ));
    }
    if database.chars().count() > DATABASE_MAX_LEN {
        return Err(SchemaViolation::new(
            format!(
                r#""database" length must be less than or equal to {DATABASE_MAX_LEN} characters long"#
            ),
            PATH,
        ));
    }
    if DATABASE_FORBIDDEN_RE.is_match(database) {
        return Err(SchemaViolation::new(
            format!(r#""database" with value "{database}" matches the inverted database pattern"#),
            PATH,
        ));
    }

    Ok(database.to_string())
}

fn parse_username(db: &Map<String, Value>) -> Result<Option<String>, SchemaViolation> {
    const PATH: &str = "/dbConfig/username";

    let Some(value) = db.get("username") else {
        return Ok(None);
    };
    let username = value
        .as_str()
        .ok_or_else(|| SchemaViolation::new(r#""username" must be a string"#, PATH))?;

    if username.is_empty() {
        return Err(SchemaViolation::new(
            r#""username" is not allowed to be empty"#,
            PATH,
        ));
    }
    if !username.chars().all(char::is_alphanumeric) {
        return Err(SchemaViolation::new(
            r#""username" must only contain alpha-numeric characters"#,
            PATH,
        ));
    }

    Ok(Some(username.to_string()))
}

fn parse_password(db: &Map<String, Value>) -> Result<Option<String>, SchemaViolation> {
    let Some(value) = db.get("password") else {
        return Ok(None);
    };
    let password = value.as_str().ok_or_else(|| {
        SchemaViolation::new(r#""password" must be a string"#, "/dbConfig/password")
    })?;

    Ok(Some(password.to_string()))
}

/// Validate a PATCH document structurally and parse it into typed
/// operations. Field values are NOT checked against the creation schema
/// here; the merged candidate is re-validated separately.
///
/// # Errors
///
/// Returns a [`SchemaViolation`] for the first offending operation. When a
/// single field fails several alternatives (e.g. `value` is neither string
/// nor number), the alternative messages are joined with `" or "`.
pub fn validate_patch_document(value: &Value) -> Result<Vec<PatchOperation>, SchemaViolation> {
    let Some(items) = value.as_array() else {
        return Err(SchemaViolation::new(r#""value" must be an array"#, ""));
    };
    if items.is_empty() {
        return Err(SchemaViolation::new(
            r#""value" must contain at least 1 items"#,
            "",
        ));
    }

    let mut ops = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        ops.push(parse_operation(index, item)?);
    }
    Ok(ops)
}

fn parse_operation(index: usize, item: &Value) -> Result<PatchOperation, SchemaViolation> {
    let Some(fields) = item.as_object() else {
        return Err(SchemaViolation::new(
            format!(r#""{index}" must be of type object"#),
            format!("/{index}"),
        ));
    };

    let op = parse_op_field(index, fields)?;
    let path = parse_path_field(index, fields)?;
    let value = parse_value_field(index, fields)?;

    Ok(PatchOperation { op, path, value })
}

fn parse_op_field(index: usize, fields: &Map<String, Value>) -> Result<PatchOp, SchemaViolation> {
    let pointer = format!("/{index}/op");

    let value = fields
        .get("op")
        .ok_or_else(|| SchemaViolation::new(r#""op" is required"#, pointer.clone()))?;
    let op = value
        .as_str()
        .ok_or_else(|| SchemaViolation::new(r#""op" must be a string"#, pointer.clone()))?;

    if op == "replace" {
        Ok(PatchOp::Replace)
    } else {
        Err(SchemaViolation::new(
            r#""op" must be one of [replace]"#,
            pointer,
        ))
    }
}

fn parse_path_field(index: usize, fields: &Map<String, Value>) -> Result<String, SchemaViolation> {
    let pointer = format!("/{index}/path");

    let value = fields
        .get("path")
        .ok_or_else(|| SchemaViolation::new(r#""path" is required"#, pointer.clone()))?;
    let path = value
        .as_str()
        .ok_or_else(|| SchemaViolation::new(r#""path" must be a string"#, pointer.clone()))?;

    if ALLOWED_PATCH_PATHS.contains(&path) {
        Ok(path.to_string())
    } else {
        Err(SchemaViolation::new(
            format!(
                r#""path" must be one of [{}]"#,
                ALLOWED_PATCH_PATHS.join(", ")
            ),
            pointer,
        ))
    }
}

fn parse_value_field(index: usize, fields: &Map<String, Value>) -> Result<Value, SchemaViolation> {
    let pointer = format!("/{index}/value");

    let value = fields
        .get("value")
        .ok_or_else(|| SchemaViolation::new(r#""value" is required"#, pointer.clone()))?;

    if value.is_string() || value.is_number() {
        Ok(value.clone())
    } else {
        // Both type alternatives failed; report them joined, like the
        // original alternation did.
        Err(SchemaViolation::new(
            r#""value" must be a string or "value" must be a number"#,
            pointer,
        ))
    }
}
