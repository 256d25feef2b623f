//! Prompts sent to the generative capability
//!
//! This module holds the persona used as system instruction, the study
//! instruction built around the user's topic, and the artistic style
//! prefix applied to every illustration prompt.
//!
//! Study content is written in Portuguese while illustration prompts are
//! requested in English; callers building new prompts must keep that split.

pub mod study_prompt;

pub use study_prompt::generate_study_prompt;

/// System instruction describing the persona of the content model
pub const PERSONA: &str = "Você é um mentor espiritual adventista, focado na Bíblia, na graça e na esperança do advento.";

/// Style prefix prepended to every illustration prompt
pub const ILLUSTRATION_STYLE_PREFIX: &str = "Biblical art style, oil painting, dramatic lighting, detailed, spiritual, masterpiece, 8k resolution: ";

/// Builds the prompt sent to the image capability
///
/// # Examples
///
/// ```
/// use bibliaai::prompts::build_illustration_prompt;
///
/// let prompt = build_illustration_prompt("A lamp shining in the dark");
/// assert!(prompt.starts_with("Biblical art style"));
/// assert!(prompt.ends_with("A lamp shining in the dark"));
/// ```
pub fn build_illustration_prompt(prompt: &str) -> String {
    format!("{}{}", ILLUSTRATION_STYLE_PREFIX, prompt)
}
