//! System instruction for the stylist model.
//!
//! Rendered fresh for every call from the current catalog so the model can
//! only ground its picks in IDs that exist.

use askama::Template;
use lumistyle_core::{Catalog, Category, ProductId, Style};
use serde::Serialize;

/// Prompt text used when the shopper sends nothing but a photo.
pub const DEFAULT_USER_PROMPT: &str = "Provide fashion advice for my current look.";

/// System instruction template.
#[derive(Template)]
#[template(path = "stylist/system_instruction.txt")]
struct SystemInstructionTemplate<'a> {
    store_name: &'a str,
    catalog_json: &'a str,
}

/// Catalog fields the model sees for each product.
#[derive(Serialize)]
struct CatalogEntry<'a> {
    id: &'a ProductId,
    name: &'a str,
    style: Style,
    color: &'a str,
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    sizes: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    colors: Option<&'a [String]>,
}

/// Render the system instruction embedding the whole catalog.
#[must_use]
pub fn render_system_instruction(store_name: &str, catalog: &Catalog) -> String {
    let entries: Vec<CatalogEntry<'_>> = catalog
        .all()
        .iter()
        .map(|p| CatalogEntry {
            id: &p.id,
            name: &p.name,
            style: p.style,
            color: &p.color,
            category: p.category,
            sizes: p.available_sizes.as_deref(),
            colors: p.available_colors.as_deref(),
        })
        .collect();

    // Plain structs of strings and enums always serialize.
    let catalog_json = serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());

    SystemInstructionTemplate {
        store_name,
        catalog_json: &catalog_json,
    }
    .render()
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "System instruction template failed to render");
        format!(
            "You are a fashion stylist for \"{store_name}\". Recommend 1-3 items using ONLY \
             these catalog ids:\n{catalog_json}\nReply as JSON with \"message\" and \
             \"recommendedProductIds\"."
        )
    })
}

/// User text sent to the model; blank input gets a default prompt.
#[must_use]
pub fn user_prompt(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        DEFAULT_USER_PROMPT
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": "p1", "name": "Classic White Tee", "price": "29.99", "category": "Tops",
         "style": "Casual", "color": "White", "description": "A premium cotton basic.",
         "image": "https://example.com/p1.jpg", "availableSizes": ["S", "M"]},
        {"id": "p8", "name": "Silver Watch", "price": "250.00", "category": "Accessories",
         "style": "Formal", "color": "Silver", "description": "Timeless accessory.",
         "image": "https://example.com/p8.jpg"}
    ]"#;

    #[test]
    fn test_instruction_embeds_catalog_and_rules() {
        let catalog = Catalog::from_json(CATALOG).expect("catalog");
        let instruction = render_system_instruction("LumiStyle", &catalog);

        assert!(instruction.contains("\"LumiStyle\""));
        assert!(instruction.contains("\"id\": \"p1\""));
        assert!(instruction.contains("\"id\": \"p8\""));
        assert!(instruction.contains("\"category\": \"Accessories\""));
        assert!(instruction.contains("1-3 items"));
        assert!(instruction.contains("recommendedProductIds"));
    }

    #[test]
    fn test_instruction_omits_descriptions_and_prices() {
        let catalog = Catalog::from_json(CATALOG).expect("catalog");
        let instruction = render_system_instruction("LumiStyle", &catalog);

        assert!(!instruction.contains("A premium cotton basic."));
        assert!(!instruction.contains("29.99"));
        // Products without declared sizes carry no sizes key.
        assert_eq!(instruction.matches("\"sizes\"").count(), 1);
    }

    #[test]
    fn test_user_prompt_defaults_when_blank() {
        assert_eq!(user_prompt("   "), DEFAULT_USER_PROMPT);
        assert_eq!(user_prompt(" office party "), "office party");
    }
}
