//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::model::RootModel;

/// Prints root models in plain text format.
pub fn print_plain(roots: Option<&[RootModel]>) {
    match roots {
        None => println!("No root models found."),
        Some(roots) => {
            println!("ROOT MODELS ({}):", roots.len());
            for root in roots {
                println!("- {root}");
            }
        }
    }
}

/// Prints root models in JSON format.
///
/// `roots` serializes as `null` when no roots were found, mirroring the
/// library's "no roots" sentinel.
pub fn print_json(roots: Option<&[RootModel]>) {
    match serde_json::to_string_pretty(&json!({ "roots": roots })) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            // Fallback: output in a simpler format
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"roots\": null}}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots_serialize_with_span() {
        let roots = vec![RootModel::new(None, "Catalog", 4, 9)];
        let value = json!({ "roots": roots });
        assert_eq!(value["roots"][0]["name"], "Catalog");
        assert_eq!(value["roots"][0]["start_line"], 4);
        assert_eq!(value["roots"][0]["end_line"], 9);
    }

    #[test]
    fn test_absent_roots_serialize_as_null() {
        let roots: Option<&[RootModel]> = None;
        let value = json!({ "roots": roots });
        assert!(value["roots"].is_null());
    }
}
