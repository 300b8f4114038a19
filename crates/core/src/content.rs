//! Nested sub-entities carried inside a service document.
//!
//! These travel as JSON-encoded strings in multipart requests and are stored
//! as JSONB arrays. Each element is addressed by its position in the array
//! at request time.

use serde::{Deserialize, Serialize};

/// An element of a nested array that owns at most one image.
pub trait ImageSlot {
    fn image(&self) -> Option<&str>;
    fn set_image(&mut self, path: Option<String>);
}

/// A product variant listed under a service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A rich-content section rendered on a service page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Extra content blocks attached to a service.
///
/// A closed set of kinds; an unknown `kind` fails deserialization of the whole
/// array, which the binder treats like any other malformed array field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentBlock {
    Paragraph { text: String },
    BulletList { items: Vec<String> },
    Specification { label: String, value: String },
    Callout { text: String },
}

impl ImageSlot for SubProduct {
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn set_image(&mut self, path: Option<String>) {
        self.image = path;
    }
}

impl ImageSlot for ContentSection {
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn set_image(&mut self, path: Option<String>) {
        self.image = path;
    }
}

/// Every image path referenced by a nested array.
pub fn referenced_images<T: ImageSlot>(items: &[T]) -> impl Iterator<Item = &str> {
    items.iter().filter_map(ImageSlot::image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_tagged_by_kind() {
        let blocks: Vec<ContentBlock> = serde_json::from_str(
            r#"[{"kind":"paragraph","text":"Hi"},{"kind":"specification","label":"Width","value":"100mm"}]"#,
        )
        .unwrap();
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph { text: "Hi".into() },
                ContentBlock::Specification {
                    label: "Width".into(),
                    value: "100mm".into()
                },
            ]
        );
    }

    #[test]
    fn unknown_block_kind_is_rejected() {
        let parsed: Result<Vec<ContentBlock>, _> =
            serde_json::from_str(r#"[{"kind":"video","url":"x"}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn sub_product_fields_default_when_missing() {
        let items: Vec<SubProduct> = serde_json::from_str(r#"[{}]"#).unwrap();
        assert_eq!(items[0], SubProduct::default());
    }

    #[test]
    fn referenced_images_skips_empty_slots() {
        let sections = vec![
            ContentSection {
                image: Some("services/a.png".into()),
                ..Default::default()
            },
            ContentSection::default(),
        ];
        let refs: Vec<&str> = referenced_images(&sections).collect();
        assert_eq!(refs, vec!["services/a.png"]);
    }
}
