use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    // BOM resolve sozinho.
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return single("utf-16le", 0.99);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return single("utf-16be", 0.99);
    }

    // Declaração XML: um arquivo TS costuma dizer qual encoding usa.
    if let Some(declared) = xml_declared_encoding(bytes) {
        return EncodingDetectionResult {
            best: declared.clone(),
            confidence: 0.95,
            candidates: vec![
                EncodingCandidate {
                    name: declared,
                    confidence: 0.95,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.50,
                },
            ],
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // Ambiguidades clássicas de catálogos antigos: o TS pré-Unicode
    // assumia Latin-1, que o encoding_rs reporta como windows-1252.
    if best == "windows-1252" {
        candidates.push(EncodingCandidate {
            name: "iso-8859-1".into(),
            confidence: (confidence - 0.03).max(0.0),
        });
    }
    if best == "utf-8" {
        candidates.push(EncodingCandidate {
            name: "utf-8-sig".into(),
            confidence: (confidence - 0.20).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

// Lê o arquivo decodificando com o encoding detectado.
pub fn read_to_string(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    let detected = detect(&bytes);

    let label = match detected.best.as_str() {
        "utf-8-sig" => "utf-8",
        other => other,
    };
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8);

    // decode() já remove BOM quando presente.
    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(format!(
            "failed to decode {} as {}",
            path.display(),
            detected.best
        ));
    }

    Ok(text.into_owned())
}

fn single(name: &str, confidence: f32) -> EncodingDetectionResult {
    EncodingDetectionResult {
        best: name.into(),
        confidence,
        candidates: vec![EncodingCandidate {
            name: name.into(),
            confidence,
        }],
    }
}

fn xml_declared_encoding(bytes: &[u8]) -> Option<String> {
    // Lossy: a declaração é ASCII, o resto do cabeçalho pode não ser.
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(200)]);
    let head = head.as_ref();
    let decl_start = head.find("<?xml")?;
    let decl_end = head[decl_start..].find("?>")? + decl_start;
    let decl = &head[decl_start..decl_end];

    let at = decl.find("encoding")?;
    let rest = &decl[at + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = &rest[1..];
    let close = inner.find(quote)?;
    let name = inner[..close].trim().to_lowercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
