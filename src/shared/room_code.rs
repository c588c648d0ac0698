use uuid::Uuid;

pub const ROOM_CODE_LENGTH: usize = 8;

pub fn generate_room_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(ROOM_CODE_LENGTH);
    code
}

pub fn sanitize_room_code(value: &str) -> Option<String> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .take(64)
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_short_hex_tokens() {
        let code = generate_room_code();
        assert_eq!(code.len(), ROOM_CODE_LENGTH);
        assert!(code.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(code, generate_room_code());
    }

    #[test]
    fn sanitize_trims_and_lowercases() {
        assert_eq!(sanitize_room_code("  AB12cd34 "), Some("ab12cd34".to_string()));
        assert_eq!(sanitize_room_code("   "), None);
    }
}
