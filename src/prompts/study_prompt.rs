//! Study and sermon instruction
//!
//! Builds the natural-language instruction that accompanies the response
//! schema. The instruction asks for two parts, a Bible study and a complete
//! sermon, and pins translation, tone, hymnal and image-prompt language.

/// Generates the instruction for a study on `topic`
///
/// The topic is embedded verbatim between quotes.
///
/// # Examples
///
/// ```
/// use bibliaai::prompts::generate_study_prompt;
///
/// let prompt = generate_study_prompt("A Graça");
/// assert!(prompt.contains("\"A Graça\""));
/// assert!(prompt.contains("Inglês"));
/// ```
pub fn generate_study_prompt(topic: &str) -> String {
    format!(
        r#"Atue como um teólogo experiente e orador da Igreja Adventista do Sétimo Dia.

TAREFA:
Crie um conteúdo completo baseado na descrição/tema: "{topic}".

O conteúdo deve ser dividido em duas partes principais:
1. ESTUDO BÍBLICO: Versículos chave e base teológica sólida.
2. PREGAÇÃO INTEIRA: Um sermão textual completo (não apenas tópicos), escrito com eloquência, emoção e profundidade, pronto para ser pregado.

DIRETRIZES:
- Use a versão da Bíblia João Ferreira de Almeida.
- O tom deve ser solene, esperançoso e Cristo-cêntrico.
- PREGAÇÃO: Desenvolva a introdução, o desenvolvimento (pontos 1, 2, 3) e a conclusão de forma fluida e textual.
- HINOS: Selecione hinos clássicos do Hinário Adventista que existam no YouTube.
- IMAGENS: Crie prompts artísticos para ilustrar o sermão, escritos em Inglês. Todo o restante do conteúdo deve estar em Português.
"#,
        topic = topic
    )
}
