use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AiItemResult {
    pub context: String,
    pub source: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AiRunReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_numerus: usize,
    pub items: Vec<AiItemResult>,
}
