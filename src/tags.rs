/// Splits raw comma-separated input into tag names.
///
/// Names are trimmed, blanks are dropped, and repeats collapse onto the
/// first occurrence so the input order survives for display.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let name = part.trim();
        if !name.is_empty() && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}
