pub const VISION_SYSTEM: &str = include_str!("../data/prompts/vision_system.txt");
pub const VISION_USER: &str = include_str!("../data/prompts/vision_user.txt");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!VISION_SYSTEM.trim().is_empty());
        assert!(!VISION_USER.trim().is_empty());
    }
}
