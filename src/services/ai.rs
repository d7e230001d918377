use crate::model::catalog::Catalog;
use crate::model::message::{Message, TranslationState};
use crate::services::ai_types::{AiItemResult, AiRunReport};

use rand::{thread_rng, Rng};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;

use std::{thread, time::Duration};

pub struct AiConfig<'a> {
    pub provider: &'a str,
    pub api_key: &'a str,
    pub model: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

const MAX_RETRIES: usize = 3;
const BASE_DELAY_MS: u64 = 800;
const TIMEOUT_SECS: u64 = 60;

fn backoff(attempt: usize) -> Duration {
    let jitter: u64 = thread_rng().gen_range(0..200);
    let ms = BASE_DELAY_MS * (2_u64.pow(attempt as u32)) + jitter;
    Duration::from_millis(ms)
}

fn endpoint_for(provider: &str) -> Result<&'static str, String> {
    match provider {
        "openai" => Ok("https://api.openai.com/v1/chat/completions"),
        "deepseek" => Ok("https://api.deepseek.com/v1/chat/completions"),
        _ => Err("Unsupported provider".into()),
    }
}

// Preenche as entradas unfinished (não-numerus) do catálogo.
// Mensagens numerus exigiriam N formas coerentes por idioma; ficam
// para tradução humana e aparecem como skipped no relatório.
pub fn translate_catalog(catalog: &mut Catalog, cfg: AiConfig) -> Result<AiRunReport, String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .map_err(|e| e.to_string())?;

    let endpoint = endpoint_for(cfg.provider)?;

    let mut report = AiRunReport {
        succeeded: 0,
        failed: 0,
        skipped_numerus: 0,
        items: Vec::new(),
    };

    for ctx in catalog.contexts.iter_mut() {
        let ctx_name = ctx.name.clone();

        for m in ctx.messages.iter_mut() {
            if m.state != TranslationState::Unfinished {
                continue;
            }
            if m.numerus {
                report.skipped_numerus += 1;
                continue;
            }
            if m.source.trim().is_empty() {
                continue;
            }

            translate_one(&client, endpoint, &ctx_name, m, &cfg, &mut report);
        }
    }

    Ok(report)
}

fn translate_one(
    client: &Client,
    endpoint: &str,
    ctx_name: &str,
    m: &mut Message,
    cfg: &AiConfig,
    report: &mut AiRunReport,
) {
    let prompt = build_prompt(ctx_name, m, cfg);

    let body = json!({
        "model": cfg.model,
        "messages": [
            { "role": "system", "content": "You are a professional software UI translator." },
            { "role": "user", "content": prompt }
        ],
        "temperature": 0.3
    });

    let mut ok = false;
    let mut last_err: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        let res = client
            .post(endpoint)
            .bearer_auth(cfg.api_key)
            .json(&body)
            .send();

        match res {
            Ok(resp) => {
                let status = resp.status();

                // Lê como texto primeiro: não perde a mensagem de erro
                // quando o corpo não é JSON válido.
                let text = match resp.text() {
                    Ok(t) => t,
                    Err(err) => {
                        last_err = Some(err.to_string());
                        thread::sleep(backoff(attempt));
                        continue;
                    }
                };

                if !status.is_success() {
                    last_err = Some(extract_error_message(status, &text));
                    if should_retry_http(status) && attempt + 1 < MAX_RETRIES {
                        thread::sleep(backoff(attempt));
                        continue;
                    } else {
                        break;
                    }
                }

                let v: Result<serde_json::Value, _> = serde_json::from_str(&text);
                match v {
                    Ok(json) => {
                        if let Some(t) = json
                            .get("choices")
                            .and_then(|c| c.get(0))
                            .and_then(|c| c.get("message"))
                            .and_then(|mm| mm.get("content"))
                            .and_then(|c| c.as_str())
                        {
                            m.translation = t.trim().to_string();
                            m.state = TranslationState::Finished;

                            report.succeeded += 1;
                            report.items.push(AiItemResult {
                                context: ctx_name.to_string(),
                                source: m.source.clone(),
                                comment: m.comment.clone(),
                                ok: true,
                                error: None,
                            });

                            ok = true;
                            break;
                        } else {
                            last_err = Some(
                                "Invalid AI response: missing choices[0].message.content".into(),
                            );
                            if attempt + 1 < MAX_RETRIES {
                                thread::sleep(backoff(attempt));
                                continue;
                            }
                        }
                    }
                    Err(_) => {
                        last_err = Some("Invalid JSON from AI".into());
                        if attempt + 1 < MAX_RETRIES {
                            thread::sleep(backoff(attempt));
                            continue;
                        }
                    }
                }
            }
            Err(err) => {
                last_err = Some(err.to_string());
                if attempt + 1 < MAX_RETRIES {
                    thread::sleep(backoff(attempt));
                    continue;
                }
            }
        }
    }

    if !ok {
        report.failed += 1;
        report.items.push(AiItemResult {
            context: ctx_name.to_string(),
            source: m.source.clone(),
            comment: m.comment.clone(),
            ok: false,
            error: last_err,
        });
    }
}

fn should_retry_http(status: StatusCode) -> bool {
    // 408/429/5xx tipicamente são temporários
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    // Tenta padrão comum: { "error": { "message": "..." } } ou { "message": "..." }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    // Fallback: corpo bruto (limitado)
    let trimmed = body_text.trim();
    let snippet = if trimmed.len() > 400 {
        format!("{}...", &trimmed[..400])
    } else {
        trimmed.to_string()
    };

    format!("HTTP {}: {}", status.as_u16(), snippet)
}

fn build_prompt(ctx_name: &str, m: &Message, cfg: &AiConfig) -> String {
    let mut p = String::new();

    p.push_str(&format!(
        "Translate from {} to {}.\n",
        cfg.source_lang, cfg.target_lang
    ));

    if !ctx_name.trim().is_empty() {
        p.push_str(&format!("UI context: {}\n", ctx_name.trim()));
    }

    if let Some(comment) = &m.comment {
        if !comment.trim().is_empty() {
            p.push_str(&format!("Disambiguation: {}\n", comment.trim()));
        }
    }

    if let Some(note) = &m.extracomment {
        if !note.trim().is_empty() {
            p.push_str(&format!("Developer note: {}\n", note.trim()));
        }
    }

    p.push_str("Keep %1-style and %n placeholders exactly as written.\n");
    p.push_str("Text:\n");
    p.push_str(m.source.trim());

    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_for_known_providers() {
        assert!(endpoint_for("openai").is_ok());
        assert!(endpoint_for("deepseek").is_ok());
        assert!(endpoint_for("acme").is_err());
    }

    #[test]
    fn retry_only_on_transient_status() {
        assert!(should_retry_http(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry_http(StatusCode::BAD_GATEWAY));
        assert!(!should_retry_http(StatusCode::UNAUTHORIZED));
        assert!(!should_retry_http(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn extract_error_message_reads_nested_error() {
        let body = r#"{"error": {"message": "invalid api key"}}"#;
        let msg = extract_error_message(StatusCode::UNAUTHORIZED, body);
        assert_eq!(msg, "HTTP 401: invalid api key");
    }

    #[test]
    fn prompt_carries_context_and_disambiguation() {
        let m = Message {
            source: "Volume: %1%".into(),
            comment: Some("Volume percentage (e.g. 50%)".into()),
            ..Message::default()
        };
        let cfg = AiConfig {
            provider: "openai",
            api_key: "k",
            model: "m",
            source_lang: "en_US",
            target_lang: "es_ES",
        };
        let p = build_prompt("MainWindow", &m, &cfg);
        assert!(p.contains("UI context: MainWindow"));
        assert!(p.contains("Disambiguation: Volume percentage"));
        assert!(p.contains("%1-style"));
        assert!(p.ends_with("Volume: %1%"));
    }
}
