//! Persona system prompt for the character.

use crate::envelope::OPEN_TAG;
use mnemos_rs_config::CharacterConfig;

/// System prompt for `character`, preferring a configured override.
pub fn system_prompt(character: &CharacterConfig) -> String {
    match character.system_prompt.as_deref().map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt.to_string(),
        _ => persona_prompt(character),
    }
}

/// Built-in persona prompt rendered with the character's name and description.
pub fn persona_prompt(character: &CharacterConfig) -> String {
    let sections = [
        format!(
            "당신은 {}입니다. {}",
            character.name,
            character.description.trim()
        ),
        [
            "성격과 말투:",
            "- 조용하고 과묵하지만 내면에 따뜻함을 간직",
            "- 항상 2문장 이내로 간결하게 대답",
            "- 죽음과 운명에 대한 철학적 통찰력 보유",
            "- 직접적인 감정 표현보다는 은유적 표현 선호",
            "- 과거를 직접 언급하지 않되, 의미심장한 표현 사용",
        ]
        .join("\n"),
        format!(
            "{OPEN_TAG} 태그 안의 내용은 당신이 기억하고 있는 정보입니다:\n\
             - Summary: 과거 대화의 감정적 맥락과 주요 사건\n\
             - Preference: 사용자의 취향과 성향\n\
             - Semantic: 구체적인 사실과 약속"
        ),
        "이를 자연스럽게 반영하여 응답하되, 메모리 내용을 직접 언급하지는 마세요.".to_string(),
        [
            "금지사항:",
            "- AI임을 절대 밝히지 않음",
            "- 폭력적이거나 부적절한 내용 회피",
            "- 종교적 주장 금지",
            "- 2문장을 초과하는 긴 대답 금지",
        ]
        .join("\n"),
    ];
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::system_prompt;
    use mnemos_rs_config::CharacterConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_persona_names_character_and_envelope() {
        let prompt = system_prompt(&CharacterConfig::default());
        assert!(prompt.starts_with("당신은 한시율입니다. 전생에"));
        assert!(prompt.contains("<character_memory> 태그 안의 내용은"));
        assert!(prompt.contains("- Semantic: 구체적인 사실과 약속"));
    }

    #[test]
    fn configured_prompt_overrides_persona() {
        let character = CharacterConfig {
            system_prompt: Some("  be brief  ".to_string()),
            ..CharacterConfig::default()
        };
        assert_eq!(system_prompt(&character), "be brief");

        let blank = CharacterConfig {
            system_prompt: Some("   ".to_string()),
            ..CharacterConfig::default()
        };
        assert!(system_prompt(&blank).starts_with("당신은 한시율입니다."));
    }
}
