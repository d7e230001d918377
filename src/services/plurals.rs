// Regras de numerus por idioma, no recorte que os catálogos reais usam.
// Idiomas fora da tabela caem no grupo do inglês (singular/plural).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Single,
    English,
    French,
    Russian,
    Polish,
    Czech,
    Lithuanian,
    Romanian,
}

fn rule_for(language: &str) -> Rule {
    let lang = language.trim();

    // Código completo decide antes do subtag primário (pt_BR != pt_PT).
    if lang == "pt_BR" || lang == "pt-BR" {
        return Rule::French;
    }

    let primary = lang
        .split(['_', '-'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match primary.as_str() {
        "ja" | "ko" | "zh" | "th" | "vi" | "id" | "ms" => Rule::Single,
        "fr" => Rule::French,
        "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Rule::Russian,
        "pl" => Rule::Polish,
        "cs" | "sk" => Rule::Czech,
        "lt" => Rule::Lithuanian,
        "ro" => Rule::Romanian,
        _ => Rule::English,
    }
}

// Quantas <numerusform> um catálogo nesse idioma deve ter por mensagem.
pub fn form_count(language: &str) -> usize {
    match rule_for(language) {
        Rule::Single => 1,
        Rule::English | Rule::French => 2,
        Rule::Russian | Rule::Polish | Rule::Czech | Rule::Lithuanian | Rule::Romanian => 3,
    }
}

// Índice da forma a usar para a contagem n.
pub fn form_index(language: &str, n: u64) -> usize {
    match rule_for(language) {
        Rule::Single => 0,
        Rule::English => {
            if n == 1 {
                0
            } else {
                1
            }
        }
        Rule::French => {
            if n <= 1 {
                0
            } else {
                1
            }
        }
        Rule::Russian => {
            if n % 10 == 1 && n % 100 != 11 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        Rule::Polish => {
            if n == 1 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        Rule::Czech => {
            if n == 1 {
                0
            } else if (2..=4).contains(&n) {
                1
            } else {
                2
            }
        }
        Rule::Lithuanian => {
            if n % 10 == 1 && !(11..=19).contains(&(n % 100)) {
                0
            } else if (2..=9).contains(&(n % 10)) && !(11..=19).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        Rule::Romanian => {
            if n == 1 {
                0
            } else if n == 0 || (1..=19).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
    }
}
