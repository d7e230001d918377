use serde_json::{json, Value};

use crate::model::catalog::Catalog;
use crate::model::project::ProjectInfo;
use crate::parsers::ts;
use crate::services::{ai, encoding, lookup, pipeline, project, qa, rebuild, stats};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload<'a>(req: &'a Value) -> &'a Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn str_field<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn catalog_from_payload(payload: &Value) -> Result<Catalog, String> {
    let v = payload
        .get("catalog")
        .cloned()
        .ok_or_else(|| "payload.catalog is required".to_string())?;
    serde_json::from_value(v).map_err(|e| format!("invalid payload.catalog: {e}"))
}

// Par de idiomas para tradução: o payload manda, os atributos do
// catálogo (sourcelanguage/language) servem de fallback.
fn language_pair(payload: &Value, catalog: &Catalog) -> Result<(String, String), String> {
    let source_lang = match str_field(payload, "source_lang") {
        "" => catalog.source_language.clone(),
        s => s.to_string(),
    };
    let target_lang = match str_field(payload, "target_lang") {
        "" => catalog.language.clone(),
        s => s.to_string(),
    };

    if target_lang.is_empty() {
        return Err(
            "payload.target_lang is required (catalog has no language attribute)".to_string(),
        );
    }

    Ok((source_lang, target_lang))
}

pub fn handle(input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    match Command::from(get_cmd(&req)) {
        Command::Ping => ok(id, json!({ "message": "linguist-core alive" })),

        Command::ParseTs => {
            let text = str_field(payload, "text");
            match ts::parse(text) {
                Ok(catalog) => ok(id, json!({ "catalog": catalog })),
                Err(e) => err(id, e),
            }
        }

        Command::LoadTs => {
            let path_str = str_field(payload, "path");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }
            let path = std::path::PathBuf::from(path_str);

            let text = match encoding::read_to_string(&path) {
                Ok(t) => t,
                Err(e) => return err(id, e),
            };
            match ts::parse(&text) {
                Ok(catalog) => ok(id, json!({ "catalog": catalog })),
                Err(e) => err(id, format!("{}: {}", path.display(), e)),
            }
        }

        Command::RebuildTs => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            match rebuild::rebuild(&catalog) {
                Ok(text) => ok(id, json!({ "text": text })),
                Err(e) => err(id, e),
            }
        }

        Command::RunQa => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            let issues = qa::run(&catalog);
            ok(id, json!({ "issues": issues }))
        }

        Command::Stats => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            let stats = stats::collect(&catalog);
            ok(id, json!({ "stats": stats }))
        }

        Command::Lookup => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            let context = str_field(payload, "context");
            let source = str_field(payload, "source");
            if source.is_empty() {
                return err(id, "payload.source is required");
            }
            let comment = payload.get("comment").and_then(|v| v.as_str());
            let n = payload.get("n").and_then(|v| v.as_u64());

            let index = lookup::CatalogIndex::build(&catalog);
            let result = match n {
                Some(n) => index.trn(context, source, comment, n),
                None => index.tr(context, source, comment),
            };
            ok(id, json!({ "text": result.text, "found": result.found }))
        }

        Command::DetectEncoding => {
            let path_str = str_field(payload, "path");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }
            let path = std::path::PathBuf::from(path_str);
            match encoding::detect_from_file(&path) {
                Ok(result) => ok(id, serde_json::to_value(result).unwrap_or(json!({}))),
                Err(e) => err(id, e),
            }
        }

        Command::TranslateEntries => {
            let provider = str_field(payload, "provider");
            let api_key = str_field(payload, "api_key");
            let model = str_field(payload, "model");

            if provider.is_empty() { return err(id, "payload.provider is required"); }
            if api_key.is_empty() { return err(id, "payload.api_key is required"); }
            if model.is_empty() { return err(id, "payload.model is required"); }

            let mut catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            let (source_lang, target_lang) = match language_pair(payload, &catalog) {
                Ok(pair) => pair,
                Err(e) => return err(id, e),
            };

            let cfg = ai::AiConfig {
                provider,
                api_key,
                model,
                source_lang: &source_lang,
                target_lang: &target_lang,
            };
            match ai::translate_catalog(&mut catalog, cfg) {
                Ok(report) => ok(id, json!({ "catalog": catalog, "report": report })),
                Err(e) => err(id, e),
            }
        }

        Command::TranslateWithTm => {
            let provider = str_field(payload, "provider");
            let api_key = str_field(payload, "api_key");
            let model = str_field(payload, "model");

            if provider.is_empty() { return err(id, "payload.provider is required"); }
            if api_key.is_empty() { return err(id, "payload.api_key is required"); }
            if model.is_empty() { return err(id, "payload.model is required"); }

            let mut catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            let (source_lang, target_lang) = match language_pair(payload, &catalog) {
                Ok(pair) => pair,
                Err(e) => return err(id, e),
            };

            let cfg = pipeline::PipelineConfig {
                provider,
                api_key,
                model,
                source_lang: &source_lang,
                target_lang: &target_lang,
            };
            match pipeline::run(&mut catalog, cfg) {
                Ok(report) => ok(id, json!({ "catalog": catalog, "report": report })),
                Err(e) => err(id, e),
            }
        }

        Command::ProjectList => ok(id, json!({ "projects": project::list_projects() })),

        Command::ProjectCreate => {
            let name = str_field(payload, "name").to_string();
            let catalogs_dir = str_field(payload, "catalogs_dir").to_string();
            let source_language = str_field(payload, "source_language").to_string();

            let target_languages: Vec<String> = payload
                .get("target_languages")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();

            if name.is_empty() { return err(id, "payload.name is required"); }
            if catalogs_dir.is_empty() { return err(id, "payload.catalogs_dir is required"); }

            match project::create_project(name, catalogs_dir, source_language, target_languages) {
                Ok(p) => ok(id, json!({ "project_path": p.project_path })),
                Err(e) => err(id, e),
            }
        }

        Command::ProjectOpen => {
            let project_path = str_field(payload, "project_path").to_string();
            if project_path.is_empty() {
                return err(id, "payload.project_path is required");
            }

            match project::open_project(project_path) {
                Ok(p) => ok(id, json!({ "project": p })),
                Err(e) => err(id, e),
            }
        }

        Command::ProjectSave => {
            let project_val = payload.get("project").cloned().unwrap_or(Value::Null);
            if project_val.is_null() {
                return err(id, "payload.project is required");
            }

            let p: ProjectInfo = match serde_json::from_value(project_val) {
                Ok(v) => v,
                Err(e) => return err(id, format!("invalid payload.project: {e}")),
            };

            match project::save_project(p) {
                Ok(saved) => ok(id, json!({ "project": saved })),
                Err(e) => err(id, e),
            }
        }

        Command::Unknown => err(id, "unknown command"),
    }
}
