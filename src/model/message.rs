use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Message {
    #[serde(default)]
    pub source: String,

    // Comentário de desambiguação: duas mensagens com o mesmo source
    // no mesmo contexto são distintas se o comment for diferente.
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub extracomment: Option<String>,

    #[serde(default)]
    pub translatorcomment: Option<String>,

    #[serde(default)]
    pub translation: String,

    #[serde(default)]
    pub numerus: bool,

    // Usado no lugar de `translation` quando numerus == true.
    #[serde(default)]
    pub numerus_forms: Vec<String>,

    #[serde(default)]
    pub state: TranslationState,

    #[serde(default)]
    pub locations: Vec<Location>,
}

impl Message {
    pub fn is_finished(&self) -> bool {
        self.state == TranslationState::Finished
    }

    // Vazio no sentido do catálogo: numerus exige todas as formas preenchidas.
    pub fn translation_is_empty(&self) -> bool {
        if self.numerus {
            self.numerus_forms.is_empty()
                || self.numerus_forms.iter().any(|f| f.trim().is_empty())
        } else {
            self.translation.trim().is_empty()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    Finished,
    Unfinished,
    Vanished,
    Obsolete,
}

// Sem atributo type no XML, a mensagem é considerada finalizada.
impl Default for TranslationState {
    fn default() -> Self {
        TranslationState::Finished
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Location {
    #[serde(default)]
    pub filename: String,

    #[serde(default)]
    pub line: Option<usize>,
}
