use std::path::Path;

use serde_json::Value;

use crate::error::{RagError, Result};

/// Pointers extracted from each city record in the bundled dataset
pub const DEFAULT_CITY_POINTERS: &[&str] = &[
    "/city",
    "/slug",
    "/han",
    "/mayor",
    "/area_code",
    "/population",
    "/city_emblem_image",
];

/// Source text ready for chunking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source_id: String,
    pub text: String,
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RagError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Whole file as one document
pub struct TextLoader;

impl TextLoader {
    pub async fn load(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        Ok(Document {
            source_id: source_name(path),
            text: read(path).await?,
        })
    }
}

/// Renders JSON records as `key: value` documents
///
/// The file holds a top-level array of records or a single record. Each record
/// becomes one document made of the values found at the configured pointers;
/// missing pointers are skipped.
pub struct JsonRecordLoader {
    pointers: Vec<String>,
}

impl JsonRecordLoader {
    pub fn new<I, S>(pointers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pointers: pointers.into_iter().map(Into::into).collect(),
        }
    }

    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Vec<Document>> {
        let path = path.as_ref();
        let raw = read(path).await?;
        self.load_str(&source_name(path), &raw).map_err(|e| match e {
            RagError::Load { reason, .. } => RagError::Load {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn load_str(&self, source: &str, raw: &str) -> Result<Vec<Document>> {
        let value: Value = serde_json::from_str(raw).map_err(|e| RagError::Load {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

        let records = match value {
            Value::Array(items) => items,
            record @ Value::Object(_) => vec![record],
            _ => {
                return Err(RagError::Load {
                    path: source.to_string(),
                    reason: "expected a JSON object or an array of objects".to_string(),
                })
            }
        };

        let documents = records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                let text = self.render(record);
                if text.is_empty() {
                    return None;
                }
                Some(Document {
                    source_id: format!("{}[{}]", source, i),
                    text,
                })
            })
            .collect();

        Ok(documents)
    }

    fn render(&self, record: &Value) -> String {
        self.pointers
            .iter()
            .filter_map(|pointer| {
                let value = record.pointer(pointer)?;
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let key = pointer.rsplit('/').next().unwrap_or(pointer);
                Some(format!("{}: {}", key, text))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for JsonRecordLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CITY_POINTERS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_configured_pointers() {
        let loader = JsonRecordLoader::new(["/city", "/mayor", "/population"]);
        let docs = loader
            .load_str(
                "city",
                r#"[{"city":"Kato","mayor":"Tanaka","population":40000,"extra":"x"}]"#,
            )
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source_id, "city[0]");
        assert_eq!(docs[0].text, "city: Kato\nmayor: Tanaka\npopulation: 40000");
    }

    #[test]
    fn test_single_object_and_missing_pointers() {
        let loader = JsonRecordLoader::new(["/city", "/han"]);
        let docs = loader.load_str("one", r#"{"city":"Kato","han":null}"#).unwrap();
        assert_eq!(docs[0].text, "city: Kato");

        let docs = loader.load_str("none", r#"[{"other":1}]"#).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_rejects_scalars_and_bad_json() {
        let loader = JsonRecordLoader::default();
        assert!(matches!(loader.load_str("x", "42"), Err(RagError::Load { .. })));
        assert!(matches!(loader.load_str("x", "{"), Err(RagError::Load { .. })));
    }
}
