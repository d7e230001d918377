use crate::model::catalog::Catalog;
use crate::model::message::{Message, TranslationState};
use crate::services::{
    ai,
    ai_types::AiRunReport,
    translation_memory::{hash, matcher, model::TmEntry, normalize, store},
};

use std::collections::HashSet;
use std::path::Path;

pub struct PipelineConfig<'a> {
    pub provider: &'a str,
    pub api_key: &'a str,
    pub model: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

#[derive(Debug, serde::Serialize)]
pub struct PipelineReport {
    pub used_tm: usize,
    pub used_ai: usize,
    pub ai_report: Option<AiRunReport>,
}

pub fn run(catalog: &mut Catalog, cfg: PipelineConfig) -> Result<PipelineReport, String> {
    run_with_store(catalog, cfg, store::default_path())
}

pub fn run_with_store(
    catalog: &mut Catalog,
    cfg: PipelineConfig,
    tm_path: &Path,
) -> Result<PipelineReport, String> {
    let mut tm_entries = store::load_from(tm_path);

    let mut used_tm = 0usize;
    let mut tm_missing = 0usize;

    // Fase 1: memória de tradução (match exato normalizado).
    for ctx in catalog.contexts.iter_mut() {
        for m in ctx.messages.iter_mut() {
            if !needs_fill(m) {
                continue;
            }

            if let Some(tm) = matcher::exact_match(
                &tm_entries,
                cfg.source_lang,
                cfg.target_lang,
                &m.source,
                m.comment.as_deref(),
            ) {
                m.translation = tm.translation.clone();
                m.state = TranslationState::Finished;
                used_tm += 1;
            } else {
                tm_missing += 1;
            }
        }
    }

    // Fase 2: IA só para o que sobrou sem TM.
    let mut ai_report: Option<AiRunReport> = None;
    let mut used_ai = 0usize;

    if tm_missing > 0 {
        let cfg_ai = ai::AiConfig {
            provider: cfg.provider,
            api_key: cfg.api_key,
            model: cfg.model,
            source_lang: cfg.source_lang,
            target_lang: cfg.target_lang,
        };

        let report = ai::translate_catalog(catalog, cfg_ai)?;
        used_ai = report.succeeded;

        // Só sucessos entram na TM; falha não polui a memória.
        let ok_keys: HashSet<(String, String, Option<String>)> = report
            .items
            .iter()
            .filter(|i| i.ok)
            .map(|i| (i.context.clone(), i.source.clone(), i.comment.clone()))
            .collect();

        for ctx in &catalog.contexts {
            for m in &ctx.messages {
                if !m.is_finished() || m.translation.trim().is_empty() {
                    continue;
                }
                let key = (ctx.name.clone(), m.source.clone(), m.comment.clone());
                if !ok_keys.contains(&key) {
                    continue;
                }

                let norm = normalize::normalize(&m.source);
                let h = hash::hash_key(&normalize::match_key(&m.source, m.comment.as_deref()));

                tm_entries.push(TmEntry {
                    source_lang: cfg.source_lang.to_string(),
                    target_lang: cfg.target_lang.to_string(),
                    source: m.source.clone(),
                    comment: m.comment.clone(),
                    translation: m.translation.clone(),
                    normalized: norm,
                    hash: h,
                });
            }
        }

        ai_report = Some(report);
    }

    store::save_to(tm_path, &tm_entries)?;

    Ok(PipelineReport {
        used_tm,
        used_ai,
        ai_report,
    })
}

fn needs_fill(m: &Message) -> bool {
    m.state == TranslationState::Unfinished && !m.numerus && !m.source.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Context;
    use tempfile::tempdir;

    fn tm_entry(source: &str, translation: &str) -> TmEntry {
        TmEntry {
            source_lang: "en_US".into(),
            target_lang: "es_ES".into(),
            source: source.into(),
            comment: None,
            translation: translation.into(),
            normalized: String::new(),
            hash: String::new(),
        }
    }

    fn cfg() -> PipelineConfig<'static> {
        PipelineConfig {
            provider: "openai",
            api_key: "test-key",
            model: "test-model",
            source_lang: "en_US",
            target_lang: "es_ES",
        }
    }

    #[test]
    fn tm_hit_fills_entry_without_ai() {
        let dir = tempdir().unwrap();
        let tm_path = dir.path().join("tm.json");
        store::save_to(&tm_path, &[tm_entry("Open file", "Abrir archivo")]).unwrap();

        let mut catalog = Catalog {
            language: "es_ES".into(),
            contexts: vec![Context {
                name: "MainWindow".into(),
                messages: vec![Message {
                    source: "Open file".into(),
                    state: TranslationState::Unfinished,
                    ..Message::default()
                }],
            }],
            ..Catalog::default()
        };

        let report = run_with_store(&mut catalog, cfg(), &tm_path).unwrap();

        assert_eq!(report.used_tm, 1);
        assert_eq!(report.used_ai, 0);
        assert!(report.ai_report.is_none());

        let m = &catalog.contexts[0].messages[0];
        assert_eq!(m.translation, "Abrir archivo");
        assert!(m.is_finished());
    }

    #[test]
    fn numerus_entries_are_left_for_humans() {
        let dir = tempdir().unwrap();
        let tm_path = dir.path().join("tm.json");

        let mut catalog = Catalog {
            language: "es_ES".into(),
            contexts: vec![Context {
                name: "MainWindow".into(),
                messages: vec![Message {
                    source: "%n file(s) remaining".into(),
                    numerus: true,
                    state: TranslationState::Unfinished,
                    ..Message::default()
                }],
            }],
            ..Catalog::default()
        };

        let report = run_with_store(&mut catalog, cfg(), &tm_path).unwrap();

        assert_eq!(report.used_tm, 0);
        assert_eq!(report.used_ai, 0);
        // Nenhuma entrada elegível → a fase de IA nem roda.
        assert!(report.ai_report.is_none());
        assert_eq!(
            catalog.contexts[0].messages[0].state,
            TranslationState::Unfinished
        );
    }

    #[test]
    fn finished_entries_are_untouched() {
        let dir = tempdir().unwrap();
        let tm_path = dir.path().join("tm.json");
        store::save_to(&tm_path, &[tm_entry("Open file", "OUTRA")]).unwrap();

        let mut catalog = Catalog {
            language: "es_ES".into(),
            contexts: vec![Context {
                name: "MainWindow".into(),
                messages: vec![Message {
                    source: "Open file".into(),
                    translation: "Abrir archivo".into(),
                    ..Message::default()
                }],
            }],
            ..Catalog::default()
        };

        let report = run_with_store(&mut catalog, cfg(), &tm_path).unwrap();
        assert_eq!(report.used_tm, 0);
        assert_eq!(catalog.contexts[0].messages[0].translation, "Abrir archivo");
    }
}
