//! Schema contract for generated study content
//!
//! The same description is sent to the model as a response constraint and
//! used locally to reject responses that do not honor it. Field
//! descriptions double as generation hints, so they are written in the
//! language of the generated content.

use crate::content::StudyContent;
use crate::error::{BibliaError, Result};
use serde_json::{json, Map, Value};

/// Fields that must be present and non-empty in every parsed study
pub const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "introduction",
    "key_verses",
    "sermon_body",
    "illustration_prompts",
    "hymns",
    "conclusion",
];

/// Optional top-level string fields; `null` is treated like absence
const OPTIONAL_STRING_FIELDS: &[&str] = &["theme", "practical_application"];

/// Primitive kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    String,
    Array,
}

impl SchemaKind {
    fn gemini_name(self) -> &'static str {
        match self {
            Self::Object => "OBJECT",
            Self::String => "STRING",
            Self::Array => "ARRAY",
        }
    }

    fn json_schema_name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Array => "array",
        }
    }
}

/// Declarative schema node
///
/// Pure data: a kind, an optional description, ordered properties for
/// objects, an item shape for arrays, and the required property names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub description: Option<&'static str>,
    pub properties: Vec<(&'static str, SchemaNode)>,
    pub items: Option<Box<SchemaNode>>,
    pub required: Vec<&'static str>,
}

impl SchemaNode {
    fn string(description: &'static str) -> Self {
        Self {
            kind: SchemaKind::String,
            description: Some(description),
            properties: Vec::new(),
            items: None,
            required: Vec::new(),
        }
    }

    fn plain_string() -> Self {
        Self {
            description: None,
            ..Self::string("")
        }
    }

    fn object(properties: Vec<(&'static str, SchemaNode)>) -> Self {
        Self {
            kind: SchemaKind::Object,
            description: None,
            properties,
            items: None,
            required: Vec::new(),
        }
    }

    fn array(items: SchemaNode, description: &'static str) -> Self {
        Self {
            kind: SchemaKind::Array,
            description: Some(description),
            properties: Vec::new(),
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    fn with_required(mut self, required: &[&'static str]) -> Self {
        self.required = required.to_vec();
        self
    }

    /// Look up a direct property by name
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, node)| node)
    }

    /// Render in the upper-case OpenAPI subset accepted by Gemini's
    /// `responseSchema`
    pub fn to_gemini_value(&self) -> Value {
        self.render(SchemaKind::gemini_name, true)
    }

    /// Render as standard JSON Schema
    pub fn to_json_schema(&self) -> Value {
        self.render(SchemaKind::json_schema_name, false)
    }

    fn render(&self, type_name: fn(SchemaKind) -> &'static str, ordering: bool) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(type_name(self.kind)));

        if let Some(description) = self.description {
            out.insert("description".to_string(), json!(description));
        }

        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, node)| (name.to_string(), node.render(type_name, ordering)))
                .collect();
            out.insert("properties".to_string(), Value::Object(properties));

            if ordering {
                let order: Vec<&str> = self.properties.iter().map(|(name, _)| *name).collect();
                out.insert("propertyOrdering".to_string(), json!(order));
            }
        }

        if let Some(items) = &self.items {
            out.insert("items".to_string(), items.render(type_name, ordering));
        }

        if !self.required.is_empty() {
            out.insert("required".to_string(), json!(self.required));
        }

        Value::Object(out)
    }
}

/// Describe the study content schema
///
/// # Examples
///
/// ```
/// use bibliaai::content::{describe, SchemaKind};
///
/// let schema = describe();
/// assert_eq!(schema.kind, SchemaKind::Object);
/// assert!(schema.required.contains(&"sermon_body"));
/// ```
pub fn describe() -> SchemaNode {
    let verse = SchemaNode::object(vec![
        ("reference", SchemaNode::string("Ex: João 3:16")),
        (
            "text",
            SchemaNode::string("O texto bíblico completo na versão Almeida."),
        ),
    ])
    .with_required(&["reference", "text"]);

    let hymn = SchemaNode::object(vec![
        ("title", SchemaNode::string("Título do hino")),
        (
            "number",
            SchemaNode::string("Número no Hinário Adventista do Sétimo Dia"),
        ),
        (
            "reason",
            SchemaNode::string("Breve razão teológica da escolha."),
        ),
    ])
    .with_required(&["title", "reason"]);

    SchemaNode::object(vec![
        (
            "title",
            SchemaNode::string("Um título criativo e espiritual para o sermão."),
        ),
        (
            "theme",
            SchemaNode::string("O tema central em poucas palavras."),
        ),
        (
            "introduction",
            SchemaNode::string("Uma introdução envolvente para o sermão que capte a atenção."),
        ),
        (
            "key_verses",
            SchemaNode::array(verse, "3 a 5 versículos chave para o estudo bíblico."),
        ),
        (
            "sermon_body",
            SchemaNode::string(
                "O TEXTO COMPLETO da pregação (não apenas esboço). Escreva o sermão inteiro, \
                 parágrafo por parágrafo, com retórica oral, pronto para ser lido ou pregado \
                 no púlpito. Use Markdown para estruturar.",
            ),
        ),
        (
            "illustration_prompts",
            SchemaNode::array(
                SchemaNode::plain_string(),
                "3 descrições visuais detalhadas e artísticas de cenas bíblicas ou metafóricas \
                 relacionadas ao tema para gerar imagens (Prompt em Inglês).",
            ),
        ),
        (
            "practical_application",
            SchemaNode::string("Como aplicar este estudo na vida moderna (3 pontos práticos)."),
        ),
        (
            "conclusion",
            SchemaNode::string(
                "Uma conclusão inspiradora e um apelo final ao coração (chamado).",
            ),
        ),
        (
            "hymns",
            SchemaNode::array(
                hymn,
                "Sugestão de 3 hinos específicos do Hinário Adventista do Sétimo Dia (HASD).",
            ),
        ),
    ])
    .with_required(REQUIRED_FIELDS)
}

/// Parse raw model output into [`StudyContent`]
///
/// # Errors
///
/// Returns [`BibliaError::Schema`] when the text is not a JSON object,
/// when a field has the wrong type, or when any of [`REQUIRED_FIELDS`] is
/// missing, `null`, blank, or an empty array.
///
/// # Examples
///
/// ```
/// use bibliaai::content::parse;
///
/// assert!(parse("not json").is_err());
/// assert!(parse(r#"{"title": "Graça"}"#).is_err());
/// ```
pub fn parse(raw: &str) -> Result<StudyContent> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| BibliaError::Schema(format!("response is not valid JSON: {}", e)))?;

    let Value::Object(mut object) = value else {
        return Err(BibliaError::Schema("response is not a JSON object".to_string()).into());
    };

    for field in REQUIRED_FIELDS {
        match object.get(*field) {
            None | Some(Value::Null) => {
                return Err(
                    BibliaError::Schema(format!("missing required field `{}`", field)).into(),
                );
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(BibliaError::Schema(format!("required field `{}` is empty", field)).into());
            }
            Some(Value::Array(items)) if items.is_empty() => {
                return Err(BibliaError::Schema(format!("required field `{}` is empty", field)).into());
            }
            _ => {}
        }
    }

    for field in OPTIONAL_STRING_FIELDS {
        if matches!(object.get(*field), Some(Value::Null)) {
            object.remove(*field);
        }
    }

    let content: StudyContent = serde_json::from_value(Value::Object(object))
        .map_err(|e| BibliaError::Schema(format!("response does not match schema: {}", e)))?;

    if content.theme.trim().is_empty() {
        tracing::debug!(title = %content.title, "Parsed study has no theme");
    }

    Ok(content)
}
