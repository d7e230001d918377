use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::catalog::Catalog;
use crate::model::message::TranslationState;
use crate::services::plurals;

#[derive(Debug, Serialize, Deserialize)]
pub struct QaIssue {
    pub context: String,
    pub source: String,
    pub code: String,
    pub message: String,
}

pub fn run(catalog: &Catalog) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    // %1..%99, %n e %Ln — os marcadores que o Qt substitui em runtime.
    let placeholder_re = Regex::new(r"%L?n|%\d{1,2}").unwrap();

    let has_language = !catalog.language.trim().is_empty();
    if !has_language {
        issues.push(QaIssue {
            context: String::new(),
            source: String::new(),
            code: "NO_LANGUAGE".to_string(),
            message: "Catálogo sem atributo language; checagens de numerus desativadas"
                .to_string(),
        });
    }

    for ctx in &catalog.contexts {
        let mut seen: HashSet<(&str, Option<&str>)> = HashSet::new();

        for m in &ctx.messages {
            // Entradas históricas não participam do QA.
            if matches!(
                m.state,
                TranslationState::Vanished | TranslationState::Obsolete
            ) {
                continue;
            }

            // Chave de unicidade dentro do contexto: (source, comment).
            if !seen.insert((m.source.as_str(), m.comment.as_deref())) {
                issues.push(QaIssue {
                    context: ctx.name.clone(),
                    source: m.source.clone(),
                    code: "DUPLICATE_MESSAGE".to_string(),
                    message: "Par (source, comment) repetido no mesmo contexto".to_string(),
                });
            }

            if m.source.trim().is_empty() {
                issues.push(QaIssue {
                    context: ctx.name.clone(),
                    source: m.source.clone(),
                    code: "EMPTY_SOURCE".to_string(),
                    message: "Mensagem com source vazio".to_string(),
                });
                continue;
            }

            if m.is_finished() && m.translation_is_empty() {
                issues.push(QaIssue {
                    context: ctx.name.clone(),
                    source: m.source.clone(),
                    code: "FINISHED_BUT_EMPTY".to_string(),
                    message: "Entrada finalizada com tradução vazia (deveria estar unfinished)"
                        .to_string(),
                });
                continue;
            }

            if m.numerus {
                if has_language && m.is_finished() {
                    let expected = plurals::form_count(&catalog.language);
                    if m.numerus_forms.len() != expected {
                        issues.push(QaIssue {
                            context: ctx.name.clone(),
                            source: m.source.clone(),
                            code: "NUMERUS_FORM_COUNT".to_string(),
                            message: format!(
                                "Esperadas {} numerusform para {}, encontradas {}",
                                expected,
                                catalog.language,
                                m.numerus_forms.len()
                            ),
                        });
                    }
                }
                // Formas no singular podem legitimamente omitir %n;
                // sem checagem de placeholder por forma.
                continue;
            }

            if !m.is_finished() {
                continue;
            }

            if m.translation.trim() == m.source.trim() {
                issues.push(QaIssue {
                    context: ctx.name.clone(),
                    source: m.source.clone(),
                    code: "SAME_AS_SOURCE".to_string(),
                    message: "Tradução idêntica ao texto original".to_string(),
                });
            }

            let missing: Vec<&str> = placeholder_re
                .find_iter(&m.source)
                .map(|mm| mm.as_str())
                .filter(|p| !m.translation.contains(p))
                .collect();
            if !missing.is_empty() {
                issues.push(QaIssue {
                    context: ctx.name.clone(),
                    source: m.source.clone(),
                    code: "PLACEHOLDER_MISMATCH".to_string(),
                    message: format!(
                        "Tradução não contém os marcadores do source: {}",
                        missing.join(", ")
                    ),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Context;
    use crate::model::message::Message;

    fn catalog_with(messages: Vec<Message>) -> Catalog {
        Catalog {
            version: "2.1".into(),
            language: "es_ES".into(),
            source_language: "en_US".into(),
            contexts: vec![Context {
                name: "MainWindow".into(),
                messages,
            }],
        }
    }

    fn codes(issues: &[QaIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn clean_catalog_has_no_issues() {
        let catalog = catalog_with(vec![Message {
            source: "Open %1".into(),
            translation: "Abrir %1".into(),
            ..Message::default()
        }]);
        assert!(run(&catalog).is_empty());
    }

    #[test]
    fn finished_but_empty_is_flagged() {
        let catalog = catalog_with(vec![Message {
            source: "Save".into(),
            ..Message::default()
        }]);
        assert_eq!(codes(&run(&catalog)), vec!["FINISHED_BUT_EMPTY"]);
    }

    #[test]
    fn unfinished_empty_is_allowed() {
        let catalog = catalog_with(vec![Message {
            source: "Save".into(),
            state: TranslationState::Unfinished,
            ..Message::default()
        }]);
        assert!(run(&catalog).is_empty());
    }

    #[test]
    fn duplicate_source_comment_pair_is_flagged() {
        let dup = Message {
            source: "Close".into(),
            translation: "Cerrar".into(),
            ..Message::default()
        };
        let catalog = catalog_with(vec![dup.clone(), dup]);
        assert_eq!(codes(&run(&catalog)), vec!["DUPLICATE_MESSAGE"]);
    }

    #[test]
    fn same_source_with_different_comment_is_not_duplicate() {
        let a = Message {
            source: "Close".into(),
            translation: "Cerrar".into(),
            ..Message::default()
        };
        let b = Message {
            comment: Some("Window menu".into()),
            ..a.clone()
        };
        let catalog = catalog_with(vec![a, b]);
        assert!(run(&catalog).is_empty());
    }

    #[test]
    fn vanished_duplicates_are_ignored() {
        let active = Message {
            source: "Close".into(),
            translation: "Cerrar".into(),
            ..Message::default()
        };
        let vanished = Message {
            state: TranslationState::Vanished,
            ..active.clone()
        };
        let catalog = catalog_with(vec![active, vanished]);
        assert!(run(&catalog).is_empty());
    }

    #[test]
    fn placeholder_mismatch_lists_missing_markers() {
        let catalog = catalog_with(vec![Message {
            source: "Installing file %1 of %2".into(),
            translation: "Instalando archivo %1".into(),
            ..Message::default()
        }]);
        let issues = run(&catalog);
        assert_eq!(codes(&issues), vec!["PLACEHOLDER_MISMATCH"]);
        assert!(issues[0].message.contains("%2"));
    }

    #[test]
    fn same_as_source_is_advisory() {
        let catalog = catalog_with(vec![Message {
            source: "OK".into(),
            translation: "OK".into(),
            ..Message::default()
        }]);
        assert_eq!(codes(&run(&catalog)), vec!["SAME_AS_SOURCE"]);
    }

    #[test]
    fn numerus_form_count_checked_against_language() {
        // es_ES espera 2 formas; só uma fornecida.
        let catalog = catalog_with(vec![Message {
            source: "%n file(s) remaining".into(),
            numerus: true,
            numerus_forms: vec!["Quedan %n archivos".into()],
            ..Message::default()
        }]);
        let issues = run(&catalog);
        assert_eq!(codes(&issues), vec!["NUMERUS_FORM_COUNT"]);
        assert!(issues[0].message.contains("Esperadas 2"));
    }

    #[test]
    fn missing_language_disables_numerus_check() {
        let mut catalog = catalog_with(vec![Message {
            source: "%n file(s) remaining".into(),
            numerus: true,
            numerus_forms: vec!["? %n".into()],
            ..Message::default()
        }]);
        catalog.language = String::new();
        assert_eq!(codes(&run(&catalog)), vec!["NO_LANGUAGE"]);
    }

    #[test]
    fn empty_source_is_flagged() {
        let catalog = catalog_with(vec![Message {
            source: "   ".into(),
            translation: "x".into(),
            ..Message::default()
        }]);
        assert_eq!(codes(&run(&catalog)), vec!["EMPTY_SOURCE"]);
    }
}
