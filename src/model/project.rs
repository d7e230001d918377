use serde::{Deserialize, Serialize};

fn default_ai_prompt_preset() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub project_path: String,

    // Diretório onde vivem os arquivos .ts do projeto.
    #[serde(default, alias = "languages_dir")]
    pub catalogs_dir: String,

    #[serde(default, alias = "source_lang")]
    pub source_language: String,

    #[serde(default)]
    pub target_languages: Vec<String>,

    #[serde(default = "default_ai_prompt_preset")]
    pub ai_prompt_preset: String,

    #[serde(default)]
    pub ai_custom_prompt_text: String,
}
