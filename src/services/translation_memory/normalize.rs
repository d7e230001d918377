pub fn normalize(text: &str) -> String {
    let mut s = text.trim().to_lowercase();

    s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    for ch in ['“', '”', '’', '‘', '…', '"', '\'', '(', ')'] {
        s = s.replace(ch, "");
    }

    s
}

// Material da chave de match: source normalizado + comment normalizado,
// separados por um byte que não ocorre em texto de UI.
pub fn match_key(source: &str, comment: Option<&str>) -> String {
    format!("{}\u{1f}{}", normalize(source), normalize(comment.unwrap_or("")))
}
