#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ParseTs,
    LoadTs,
    RebuildTs,
    RunQa,
    Stats,
    Lookup,
    DetectEncoding,
    TranslateEntries,
    TranslateWithTm,
    ProjectList,
    ProjectCreate,
    ProjectOpen,
    ProjectSave,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "parse_ts" => Command::ParseTs,
            "load_ts" => Command::LoadTs,
            "rebuild_ts" => Command::RebuildTs,
            "run_qa" => Command::RunQa,
            "stats" => Command::Stats,
            "lookup" => Command::Lookup,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            "translate_entries" => Command::TranslateEntries,
            "translate_with_tm" => Command::TranslateWithTm,
            "project.list" => Command::ProjectList,
            "project.create" => Command::ProjectCreate,
            "project.open" => Command::ProjectOpen,
            "project.save" => Command::ProjectSave,
            _ => Command::Unknown,
        }
    }
}
