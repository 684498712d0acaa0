//! # Prompt
//!
//! Turns a raw channel post into the single user prompt sent to the rewrite backend.
//!
//! ## Format
//!
//! - **Persona**: fixed editorial instructions ([`EDITOR_PERSONA`]).
//! - **Text**: [`SECTION_TEXT`] followed by the sanitized post, verbatim.
//! - **Style** (optional): blank line, [`SECTION_STYLE`], then the per-chat style override.
//!
//! Source attribution is never part of the prompt; callers append it to the rewritten result
//! with [`attach_source`] so the backend cannot paraphrase it.
//!
//! ## External interactions
//!
//! - **Rewrite backend**: output of [`build_prompt`] is the only message of a chat completion.

mod sanitize;

pub use sanitize::sanitize;

/// Editorial persona for the news rewrite. Conversational with a formal register; the lead
/// carries the main fact; no explicit source means «сообщают СМИ».
pub const EDITOR_PERSONA: &str = "Ты — редактор экономического новостного телеграм-канала для мужчин 20–35 лет. \
Перепиши новость кратко и интересно.\n\
1. Тон: разговорный с элементами официального, простой и плавный текст.\n\
2. Первые 10 слов — самое важное и новое в новости.\n\
3. Если в тексте нет конкретного источника, укажи: «сообщают СМИ».\n\
4. Затем подробности и мнения экспертов, если они есть.\n\
5. Заверши итогом или второстепенной деталью.\n\
6. Не добавляй фактов, которых нет в тексте.";

/// Title that precedes the text to rewrite.
pub const SECTION_TEXT: &str = "Текст для переформулирования:";

/// Title of the optional style block.
pub const SECTION_STYLE: &str = "Дополнительные указания стиля:";

/// Label the caller puts in front of the source name on the rewritten result.
pub const SOURCE_LABEL: &str = "Текст из:";

/// Builds the rewrite prompt for already sanitized text.
///
/// The text is embedded unchanged. The style block is appended after a blank line only when
/// `style_override` has non-whitespace content.
pub fn build_prompt(sanitized_text: &str, style_override: Option<&str>) -> String {
    let mut prompt = format!("{EDITOR_PERSONA}\n\n{SECTION_TEXT}\n{sanitized_text}");
    if let Some(style) = style_override.filter(|s| !s.trim().is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(SECTION_STYLE);
        prompt.push('\n');
        prompt.push_str(style);
    }
    prompt
}

/// Appends `"\n\nТекст из: <source>"` to a rewritten result when a non-empty source is given.
pub fn attach_source(rewritten: String, source: Option<&str>) -> String {
    match source.filter(|s| !s.trim().is_empty()) {
        Some(source) => format!("{rewritten}\n\n{SOURCE_LABEL} {source}"),
        None => rewritten,
    }
}
