use super::model::TmEntry;
use super::{hash, normalize};

pub fn exact_match<'a>(
    entries: &'a [TmEntry],
    source_lang: &str,
    target_lang: &str,
    source: &str,
    comment: Option<&str>,
) -> Option<&'a TmEntry> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return None;
    }

    let key = normalize::match_key(source, comment);
    let h = hash::hash_key(&key);

    entries.iter().find(|e| {
        e.source_lang == source_lang
            && e.target_lang == target_lang
            && e.hash == h
            && normalize::match_key(&e.source, e.comment.as_deref()) == key
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, comment: Option<&str>, translation: &str) -> TmEntry {
        let key = normalize::match_key(source, comment);
        TmEntry {
            source_lang: "en_US".into(),
            target_lang: "es_ES".into(),
            source: source.into(),
            comment: comment.map(str::to_string),
            translation: translation.into(),
            normalized: normalize::normalize(source),
            hash: hash::hash_key(&key),
        }
    }

    #[test]
    fn exact_match_normalizes_whitespace_and_case() {
        let entries = vec![entry("Open file", None, "Abrir archivo")];
        let found = exact_match(&entries, "en_US", "es_ES", "  open   FILE ", None);
        assert_eq!(found.unwrap().translation, "Abrir archivo");
    }

    #[test]
    fn exact_match_respects_language_pair() {
        let entries = vec![entry("Open file", None, "Abrir archivo")];
        assert!(exact_match(&entries, "en_US", "pt_BR", "Open file", None).is_none());
    }

    #[test]
    fn exact_match_respects_comment() {
        let entries = vec![
            entry("Close", Some("Window menu"), "Cerrar ventana"),
            entry("Close", None, "Cerrar"),
        ];
        let with = exact_match(&entries, "en_US", "es_ES", "Close", Some("Window menu"));
        assert_eq!(with.unwrap().translation, "Cerrar ventana");
        let without = exact_match(&entries, "en_US", "es_ES", "Close", None);
        assert_eq!(without.unwrap().translation, "Cerrar");
    }

    #[test]
    fn empty_source_never_matches() {
        let entries = vec![entry("", None, "x")];
        assert!(exact_match(&entries, "en_US", "es_ES", "   ", None).is_none());
    }
}
