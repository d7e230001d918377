use serde::{Deserialize, Serialize};

use crate::model::catalog::Catalog;
use crate::model::message::{Message, TranslationState};

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    pub numerus: usize,
}

impl Counts {
    fn add(&mut self, m: &Message) {
        self.total += 1;
        match m.state {
            TranslationState::Finished => self.finished += 1,
            TranslationState::Unfinished => self.unfinished += 1,
            TranslationState::Vanished => self.vanished += 1,
            TranslationState::Obsolete => self.obsolete += 1,
        }
        if m.numerus {
            self.numerus += 1;
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextStats {
    pub name: String,
    pub counts: Counts,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogStats {
    pub language: String,
    pub source_language: String,
    pub totals: Counts,
    pub contexts: Vec<ContextStats>,
}

pub fn collect(catalog: &Catalog) -> CatalogStats {
    let mut totals = Counts::default();
    let mut contexts = Vec::with_capacity(catalog.contexts.len());

    for ctx in &catalog.contexts {
        let mut counts = Counts::default();
        for m in &ctx.messages {
            counts.add(m);
            totals.add(m);
        }
        contexts.push(ContextStats {
            name: ctx.name.clone(),
            counts,
        });
    }

    CatalogStats {
        language: catalog.language.clone(),
        source_language: catalog.source_language.clone(),
        totals,
        contexts,
    }
}
