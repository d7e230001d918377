use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::catalog::Catalog;
use crate::model::message::{Message, TranslationState};
use crate::services::plurals;

// Índice de consulta por (contexto, source, comment) — o contrato que o
// carregador de localização usa em runtime.
pub struct CatalogIndex<'a> {
    language: &'a str,
    entries: HashMap<(&'a str, &'a str, Option<&'a str>), &'a Message>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupResult {
    pub text: String,
    pub found: bool,
}

impl<'a> CatalogIndex<'a> {
    pub fn build(catalog: &'a Catalog) -> Self {
        let mut entries: HashMap<(&str, &str, Option<&str>), &Message> = HashMap::new();

        for ctx in &catalog.contexts {
            for m in &ctx.messages {
                // Entradas históricas nunca resolvem consultas.
                if matches!(
                    m.state,
                    TranslationState::Vanished | TranslationState::Obsolete
                ) {
                    continue;
                }
                entries
                    .entry((ctx.name.as_str(), m.source.as_str(), m.comment.as_deref()))
                    .or_insert(m);
            }
        }

        Self {
            language: catalog.language.as_str(),
            entries,
        }
    }

    // Consulta singular. Mensagens numerus resolvem com a forma de n = 1.
    pub fn tr(&self, context: &str, source: &str, comment: Option<&str>) -> LookupResult {
        self.resolve(context, source, comment, None)
    }

    // Consulta com contagem: escolhe a numerusform e substitui %n / %Ln.
    pub fn trn(&self, context: &str, source: &str, comment: Option<&str>, n: u64) -> LookupResult {
        self.resolve(context, source, comment, Some(n))
    }

    fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&'a Message> {
        if let Some(m) = self.entries.get(&(context, source, comment)) {
            return Some(m);
        }
        // Como no Qt: consulta com comment cai para a entrada sem comment.
        // A direção contrária não existe — desambiguado fica desambiguado.
        if comment.is_some() {
            return self.entries.get(&(context, source, None)).copied();
        }
        None
    }

    fn resolve(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: Option<u64>,
    ) -> LookupResult {
        let fallback = |n: Option<u64>| LookupResult {
            text: substitute_count(source, n),
            found: false,
        };

        let m = match self.find(context, source, comment) {
            Some(m) => m,
            None => return fallback(n),
        };

        // Só entradas finalizadas e preenchidas resolvem.
        if !m.is_finished() || m.translation_is_empty() {
            return fallback(n);
        }

        if m.numerus {
            let count = n.unwrap_or(1);
            let idx = plurals::form_index(self.language, count);
            // Catálogo com menos formas que a regra pede: usa a última.
            let form = m
                .numerus_forms
                .get(idx)
                .or_else(|| m.numerus_forms.last())
                .map(String::as_str)
                .unwrap_or(source);
            return LookupResult {
                text: substitute_count(form, Some(count)),
                found: true,
            };
        }

        LookupResult {
            text: substitute_count(&m.translation, n),
            found: true,
        }
    }
}

// %Ln seria o número formatado pelo locale no Qt; aqui entra em dígitos.
fn substitute_count(text: &str, n: Option<u64>) -> String {
    match n {
        Some(n) => {
            let digits = n.to_string();
            text.replace("%Ln", &digits).replace("%n", &digits)
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Context;

    fn catalog() -> Catalog {
        Catalog {
            version: "2.1".into(),
            language: "es_ES".into(),
            source_language: "en_US".into(),
            contexts: vec![Context {
                name: "MainWindow".into(),
                messages: vec![
                    Message {
                        source: "Open".into(),
                        translation: "Abrir".into(),
                        ..Message::default()
                    },
                    Message {
                        source: "Volume: %1%".into(),
                        comment: Some("Volume percentage (e.g. 50%)".into()),
                        translation: "Volumen: %1%".into(),
                        ..Message::default()
                    },
                    Message {
                        source: "Pending".into(),
                        state: TranslationState::Unfinished,
                        ..Message::default()
                    },
                    Message {
                        source: "Removed".into(),
                        translation: "Eliminado".into(),
                        state: TranslationState::Vanished,
                        ..Message::default()
                    },
                    Message {
                        source: "%n file(s) remaining".into(),
                        numerus: true,
                        numerus_forms: vec![
                            "Queda %n archivo".into(),
                            "Quedan %n archivos".into(),
                        ],
                        ..Message::default()
                    },
                ],
            }],
        }
    }

    #[test]
    fn tr_resolves_finished_entry() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "Open", None);
        assert_eq!(r.text, "Abrir");
        assert!(r.found);
    }

    #[test]
    fn tr_falls_back_to_source_when_missing() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "Quit", None);
        assert_eq!(r.text, "Quit");
        assert!(!r.found);

        let r = index.tr("OtherContext", "Open", None);
        assert_eq!(r.text, "Open");
        assert!(!r.found);
    }

    #[test]
    fn tr_with_comment_finds_disambiguated_entry() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr(
            "MainWindow",
            "Volume: %1%",
            Some("Volume percentage (e.g. 50%)"),
        );
        assert_eq!(r.text, "Volumen: %1%");
        assert!(r.found);
    }

    #[test]
    fn tr_with_unknown_comment_falls_back_to_plain_entry() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "Open", Some("no such comment"));
        assert_eq!(r.text, "Abrir");
        assert!(r.found);
    }

    #[test]
    fn tr_without_comment_does_not_match_disambiguated_entry() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "Volume: %1%", None);
        assert!(!r.found);
    }

    #[test]
    fn unfinished_entry_falls_back() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "Pending", None);
        assert_eq!(r.text, "Pending");
        assert!(!r.found);
    }

    #[test]
    fn vanished_entry_never_resolves() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "Removed", None);
        assert_eq!(r.text, "Removed");
        assert!(!r.found);
    }

    #[test]
    fn trn_picks_form_and_substitutes_count() {
        let c = catalog();
        let index = CatalogIndex::build(&c);

        let r = index.trn("MainWindow", "%n file(s) remaining", None, 1);
        assert_eq!(r.text, "Queda 1 archivo");

        let r = index.trn("MainWindow", "%n file(s) remaining", None, 5);
        assert_eq!(r.text, "Quedan 5 archivos");
    }

    #[test]
    fn trn_fallback_substitutes_count_in_source() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.trn("MainWindow", "%n update(s) found", None, 3);
        assert_eq!(r.text, "3 update(s) found");
        assert!(!r.found);
    }

    #[test]
    fn tr_on_numerus_message_uses_singular_form() {
        let c = catalog();
        let index = CatalogIndex::build(&c);
        let r = index.tr("MainWindow", "%n file(s) remaining", None);
        assert_eq!(r.text, "Queda 1 archivo");
        assert!(r.found);
    }
}
