use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;

/// Find the first schema.org Recipe among the page's JSON-LD blocks.
///
/// Blocks are searched in document order. A block may hold a single object, an
/// array of objects, or an object with an `@graph` array. The recipe object is
/// returned exactly as parsed.
pub fn find_recipe(document: &Html) -> Option<Value> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    let scripts: Vec<_> = document.select(&selector).collect();
    debug!("JsonLd: Found {} JSON-LD script tags", scripts.len());

    for (index, script) in scripts.iter().enumerate() {
        let raw_json = script.text().collect::<String>();

        let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
            Ok(json_ld) => json_ld,
            Err(e) => {
                debug!("JsonLd: Failed to parse JSON-LD {index}: {e}");
                continue;
            }
        };

        let items: Vec<Value> = match json_ld {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("@graph") {
                Some(Value::Array(graph)) => graph,
                Some(_) => Vec::new(),
                None => vec![Value::Object(object)],
            },
            _ => Vec::new(),
        };

        if let Some(recipe) = items.into_iter().find(is_recipe_type) {
            debug!("JsonLd: Found recipe in script {index}");
            return Some(recipe);
        }
        debug!("JsonLd: No recipe found in script {index}");
    }

    None
}

fn is_recipe_type(value: &Value) -> bool {
    let is_recipe = |v: &Value| v.as_str().is_some_and(|s| s.eq_ignore_ascii_case("recipe"));

    match value.get("@type") {
        Some(Value::Array(types)) => types.iter().any(is_recipe),
        Some(type_value) => is_recipe(type_value),
        None => false,
    }
}
