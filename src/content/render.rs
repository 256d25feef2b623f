//! Text renderings of a study
//!
//! Markdown export for printing or saving, the short share payload, and
//! hymn search links.

use crate::content::{Hymn, StudyContent};
use crate::error::Result;
use std::fmt::Write;
use url::Url;

const HYMN_SEARCH_BASE: &str = "https://www.youtube.com/results";

/// Render the full study as a Markdown document
pub fn to_markdown(content: &StudyContent) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}", content.title);
    if !content.theme.is_empty() {
        let _ = writeln!(out, "\n_Tema: {}_", content.theme);
    }

    let _ = writeln!(out, "\n## Introdução\n\n{}", content.introduction.trim());

    let _ = writeln!(out, "\n## Versículos Chave\n");
    for verse in &content.key_verses {
        let _ = writeln!(out, "> **{}**: {}\n", verse.reference, verse.text.trim());
    }

    let _ = writeln!(out, "## Pregação\n\n{}", content.sermon_body.trim());

    if !content.practical_application.is_empty() {
        let _ = writeln!(
            out,
            "\n## Aplicação Prática\n\n{}",
            content.practical_application.trim()
        );
    }

    let _ = writeln!(out, "\n## Conclusão\n\n{}", content.conclusion.trim());

    let _ = writeln!(out, "\n## Hinos Sugeridos\n");
    for hymn in &content.hymns {
        match &hymn.number {
            Some(number) => {
                let _ = writeln!(out, "- **{}** (nº {}): {}", hymn.title, number, hymn.reason);
            }
            None => {
                let _ = writeln!(out, "- **{}**: {}", hymn.title, hymn.reason);
            }
        }
    }

    out
}

/// Short text used when sharing a study
///
/// # Examples
///
/// ```
/// use bibliaai::content::{share_text, BibleVerse, Hymn, StudyContent};
///
/// let content = StudyContent {
///     title: "Fé".to_string(),
///     theme: "Confiança".to_string(),
///     introduction: "Intro".to_string(),
///     key_verses: vec![BibleVerse {
///         reference: "Hebreus 11:1".to_string(),
///         text: "Ora, a fé é o firme fundamento...".to_string(),
///     }],
///     sermon_body: "Corpo".to_string(),
///     illustration_prompts: vec!["faith".to_string()],
///     practical_application: String::new(),
///     conclusion: "Fim".to_string(),
///     hymns: vec![Hymn {
///         title: "Hino".to_string(),
///         number: None,
///         reason: "Razão".to_string(),
///     }],
/// };
/// let text = share_text(&content);
/// assert!(text.starts_with("*Estudo Bíblico: Fé*"));
/// assert!(text.contains("- Hebreus 11:1: Ora, a fé"));
/// ```
pub fn share_text(content: &StudyContent) -> String {
    let verses: Vec<String> = content
        .key_verses
        .iter()
        .map(|v| format!("- {}: {}", v.reference, v.text))
        .collect();

    format!(
        "*Estudo Bíblico: {}*\n\nTema: {}\n\n{}\n\nVersículos Chave:\n{}\n\nGerado via BibliaAI.",
        content.title,
        content.theme,
        content.introduction,
        verses.join("\n")
    )
}

/// YouTube search link for a hymn
pub fn hymn_search_url(hymn: &Hymn) -> Result<Url> {
    let query = format!(
        "Hinário Adventista {} {}",
        hymn.number.as_deref().unwrap_or(""),
        hymn.title
    );

    let url = Url::parse_with_params(HYMN_SEARCH_BASE, &[("search_query", query.as_str())])?;
    Ok(url)
}
