#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};

mod model;
mod parsers;
mod protocol;
mod services;

// Loop de protocolo: uma requisição JSON por linha no stdin, uma
// resposta por linha no stdout. stderr fica para diagnósticos.
fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        // Um handler que entra em pânico não pode derrubar o loop;
        // a GUI do outro lado continua esperando respostas.
        let result = std::panic::catch_unwind(|| protocol::handle(&line));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => serde_json::json!({
                "status": "error",
                "message": "internal core error"
            })
            .to_string(),
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
