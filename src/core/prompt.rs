/// 固定指令模板，需求原文插在結尾
const INSTRUCTION: &str = "\nYou are a highly experienced QA engineer. For the following requirement, generate exactly 2 detailed test scenarios, \n\
each with 1-3 test cases. Each test case must include:\n\
\n\
- Title\n\
- Preconditions\n\
- Steps:\n\
\x20 1.\n\
\x20 2.\n\
\x20 3.\n\
- Expected Result\n\
\n\
Requirement:\n";

pub struct PromptBuilder;

impl PromptBuilder {
    /// 純函式：相同輸入永遠得到相同的 prompt
    pub fn build(requirement: &str) -> String {
        let mut prompt = String::with_capacity(INSTRUCTION.len() + requirement.len() + 1);
        prompt.push_str(INSTRUCTION);
        prompt.push_str(requirement);
        prompt.push('\n');
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_STORY: &str = "As a user, I should be able to log in using email and password.";

    #[test]
    fn test_prompt_embeds_requirement_verbatim() {
        let prompt = PromptBuilder::build(LOGIN_STORY);
        assert!(prompt.contains(LOGIN_STORY));
        assert!(prompt.ends_with(&format!("Requirement:\n{}\n", LOGIN_STORY)));
    }

    #[test]
    fn test_prompt_contains_structural_markers() {
        let prompt = PromptBuilder::build("As an admin, I want to export reports as PDF.");

        for marker in [
            "2 detailed test scenarios",
            "1-3 test cases",
            "Title",
            "Preconditions",
            "Steps",
            "Expected Result",
        ] {
            assert!(prompt.contains(marker), "missing marker: {}", marker);
        }
        assert!(prompt.contains("  1.\n  2.\n  3.\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let first = PromptBuilder::build(LOGIN_STORY);
        let second = PromptBuilder::build(LOGIN_STORY);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prompt_keeps_multiline_and_special_characters() {
        let requirement = "Line one {with braces}\n  - bullet ${NOT_AN_ENV_VAR}\n日本語の要件";
        let prompt = PromptBuilder::build(requirement);
        assert!(prompt.contains(requirement));
    }

    #[test]
    fn test_prompt_opens_with_role_instruction() {
        let prompt = PromptBuilder::build(LOGIN_STORY);
        assert!(prompt
            .trim_start()
            .starts_with("You are a highly experienced QA engineer."));
    }
}
