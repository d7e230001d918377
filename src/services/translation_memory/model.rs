use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TmEntry {
    pub source_lang: String,
    pub target_lang: String,

    pub source: String,

    // Comentário de desambiguação faz parte da chave: o mesmo source
    // com comment diferente é outra linha de memória.
    #[serde(default)]
    pub comment: Option<String>,

    pub translation: String,

    #[serde(default)]
    pub normalized: String,

    #[serde(default)]
    pub hash: String,
}
