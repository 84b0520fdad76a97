/// Shortens a value for error messages, keeping the head and noting how much was cut.
pub fn truncate_for_display(s: &str, limit: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= limit {
        return s.to_string();
    }
    let head: String = s.chars().take(limit).collect();
    format!("{head}...({} more chars)", char_count - limit)
}
