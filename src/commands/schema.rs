use crate::cli::SchemaDialect;
use crate::content;
use crate::error::Result;
use serde_json::Value;

/// Render the study response schema in `dialect`
pub fn render_schema(dialect: SchemaDialect) -> Value {
    let schema = content::describe();
    match dialect {
        SchemaDialect::Gemini => schema.to_gemini_value(),
        SchemaDialect::Json => schema.to_json_schema(),
    }
}

/// Print the study response schema
pub fn handle_schema(dialect: SchemaDialect) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&render_schema(dialect))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialects_differ_in_type_case() {
        assert_eq!(render_schema(SchemaDialect::Gemini)["type"], "OBJECT");
        assert_eq!(render_schema(SchemaDialect::Json)["type"], "object");
    }
}
