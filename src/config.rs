//! Configuration layers parsed from TOML.
//!
//! A [`ChainMap`] is the natural shape for settings: user overrides in front,
//! shipped defaults behind. Nested tables flatten to dotted keys so every
//! layer is a plain `String -> String` map.

use crate::chain::{layer, ChainMap};
use crate::error::CollectionError;
use std::collections::HashMap;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Parses a TOML document into a flat map of dotted keys.
///
/// String values are unquoted; every other value keeps its TOML spelling.
///
/// # Errors
///
/// Returns `CollectionError::Config` if `text` is not valid TOML.
pub fn parse_layer(text: &str) -> Result<HashMap<String, String>, CollectionError> {
    let doc = text.parse::<DocumentMut>()?;
    let mut flat = HashMap::new();
    flatten_table(doc.as_table(), "", &mut flat);
    Ok(flat)
}

/// Builds a chain from TOML documents, highest priority first.
///
/// # Examples
///
/// ```
/// use sovran_collections::config;
/// # use sovran_collections::CollectionError;
///
/// let settings = config::layered(&[
///     r#"theme = "dark""#,
///     "theme = \"light\"\n[editor]\ntab_width = 4\n",
/// ])?;
///
/// assert_eq!(settings.get(&"theme".to_string())?, "dark");
/// assert_eq!(settings.get(&"editor.tab_width".to_string())?, "4");
/// # Ok::<(), CollectionError>(())
/// ```
///
/// # Errors
///
/// Returns `CollectionError::Config` for the first document that fails to parse.
pub fn layered(texts: &[&str]) -> Result<ChainMap<String, String>, CollectionError> {
    let layers = texts
        .iter()
        .map(|text| parse_layer(text).map(layer))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ChainMap::new(layers))
}

fn flatten_table(table: &Table, prefix: &str, out: &mut HashMap<String, String>) {
    for (key, item) in table.iter() {
        flatten_item(item, &join(prefix, key), out);
    }
}

fn flatten_item(item: &Item, path: &str, out: &mut HashMap<String, String>) {
    match item {
        Item::None => {}
        Item::Value(value) => flatten_value(value, path, out),
        Item::Table(table) => flatten_table(table, path, out),
        Item::ArrayOfTables(tables) => {
            for (i, table) in tables.iter().enumerate() {
                flatten_table(table, &join(path, &i.to_string()), out);
            }
        }
    }
}

fn flatten_value(value: &Value, path: &str, out: &mut HashMap<String, String>) {
    match value {
        Value::String(s) => {
            out.insert(path.to_string(), s.value().clone());
        }
        Value::InlineTable(table) => {
            for (key, inner) in table.iter() {
                flatten_value(inner, &join(path, key), out);
            }
        }
        other => {
            let mut bare = other.clone();
            bare.decor_mut().clear();
            out.insert(path.to_string(), bare.to_string());
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
