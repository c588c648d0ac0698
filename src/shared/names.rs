pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

/// Collapses whitespace and caps the length. A name that is blank after
/// cleaning is rejected.
pub fn sanitize_player_name(name: &str) -> Option<String> {
    let cleaned = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(MAX_PLAYER_NAME_LENGTH).collect())
}
