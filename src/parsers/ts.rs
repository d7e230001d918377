use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::model::catalog::{Catalog, Context};
use crate::model::message::{Location, Message, TranslationState};

// Campo textual em captura no momento. Texto fora de um campo conhecido
// (indentação, subárvores desconhecidas como <oldsource>) é descartado.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    ContextName,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

pub fn parse(text: &str) -> Result<Catalog, String> {
    let mut reader = Reader::from_str(text);

    let mut catalog = Catalog::default();
    let mut found_ts = false;

    let mut ctx: Option<Context> = None;
    let mut msg: Option<Message> = None;
    let mut forms: Vec<String> = Vec::new();

    let mut field: Option<Field> = None;
    let mut buf = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("invalid xml at offset {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"TS" => {
                    found_ts = true;
                    catalog.version = attr(&e, b"version")?.unwrap_or_default();
                    catalog.language = attr(&e, b"language")?.unwrap_or_default();
                    catalog.source_language = attr(&e, b"sourcelanguage")?.unwrap_or_default();
                }
                b"context" if found_ts => {
                    ctx = Some(Context::default());
                }
                b"name" if ctx.is_some() && msg.is_none() => {
                    start_field(&mut field, &mut buf, Field::ContextName);
                }
                b"message" if ctx.is_some() => {
                    let numerus =
                        matches!(attr(&e, b"numerus")?.as_deref(), Some("yes") | Some("true"));
                    msg = Some(Message {
                        numerus,
                        ..Message::default()
                    });
                    forms.clear();
                }
                b"location" if msg.is_some() => {
                    push_location(&e, msg.as_mut().unwrap())?;
                }
                b"source" if msg.is_some() => start_field(&mut field, &mut buf, Field::Source),
                b"comment" if msg.is_some() => start_field(&mut field, &mut buf, Field::Comment),
                b"extracomment" if msg.is_some() => {
                    start_field(&mut field, &mut buf, Field::ExtraComment);
                }
                b"translatorcomment" if msg.is_some() => {
                    start_field(&mut field, &mut buf, Field::TranslatorComment);
                }
                b"translation" if msg.is_some() => {
                    set_state(&e, msg.as_mut().unwrap())?;
                    start_field(&mut field, &mut buf, Field::Translation);
                }
                b"numerusform" if msg.is_some() => {
                    start_field(&mut field, &mut buf, Field::NumerusForm);
                }
                _ => {
                    // Elemento desconhecido: para de capturar; o texto
                    // da subárvore cai fora de qualquer campo.
                    field = None;
                }
            },

            Event::Empty(e) => match e.name().as_ref() {
                b"location" if msg.is_some() => {
                    push_location(&e, msg.as_mut().unwrap())?;
                }
                // <translation type="unfinished"/> — comum em catálogos reais.
                b"translation" if msg.is_some() => {
                    set_state(&e, msg.as_mut().unwrap())?;
                }
                b"numerusform" if msg.is_some() => {
                    forms.push(String::new());
                }
                // <byte value="x9"/>: caractere proibido no XML, codificado à parte.
                b"byte" if field.is_some() => push_byte(&e, &mut buf)?,
                _ => {}
            },

            Event::Text(t) => {
                if field.is_some() {
                    let piece = t.unescape().map_err(|e| {
                        format!("invalid xml at offset {}: {}", reader.buffer_position(), e)
                    })?;
                    buf.push_str(&piece);
                }
            }

            Event::CData(t) => {
                if field.is_some() {
                    buf.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }

            Event::End(e) => match e.name().as_ref() {
                b"name" => {
                    if field == Some(Field::ContextName) {
                        if let Some(c) = ctx.as_mut() {
                            c.name = std::mem::take(&mut buf);
                        }
                    }
                    field = None;
                }
                b"source" => {
                    if field == Some(Field::Source) {
                        if let Some(m) = msg.as_mut() {
                            m.source = std::mem::take(&mut buf);
                        }
                    }
                    field = None;
                }
                b"comment" => {
                    if field == Some(Field::Comment) {
                        if let Some(m) = msg.as_mut() {
                            m.comment = Some(std::mem::take(&mut buf));
                        }
                    }
                    field = None;
                }
                b"extracomment" => {
                    if field == Some(Field::ExtraComment) {
                        if let Some(m) = msg.as_mut() {
                            m.extracomment = Some(std::mem::take(&mut buf));
                        }
                    }
                    field = None;
                }
                b"translatorcomment" => {
                    if field == Some(Field::TranslatorComment) {
                        if let Some(m) = msg.as_mut() {
                            m.translatorcomment = Some(std::mem::take(&mut buf));
                        }
                    }
                    field = None;
                }
                b"numerusform" => {
                    if field == Some(Field::NumerusForm) {
                        forms.push(std::mem::take(&mut buf));
                    }
                    field = None;
                }
                b"translation" => {
                    if let Some(m) = msg.as_mut() {
                        if forms.is_empty() {
                            if field == Some(Field::Translation) {
                                m.translation = std::mem::take(&mut buf);
                            }
                        } else {
                            // Só espaço em branco aparece como texto direto
                            // quando há <numerusform> filhos; descarta.
                            m.numerus_forms = std::mem::take(&mut forms);
                        }
                    }
                    field = None;
                    buf.clear();
                }
                b"message" => {
                    if let (Some(c), Some(m)) = (ctx.as_mut(), msg.take()) {
                        c.messages.push(m);
                    }
                    field = None;
                }
                b"context" => {
                    if let Some(c) = ctx.take() {
                        catalog.contexts.push(c);
                    }
                    field = None;
                }
                _ => {}
            },

            Event::Eof => break,

            // Decl, DOCTYPE, comentários XML, PI: irrelevantes para o modelo.
            _ => {}
        }
    }

    if !found_ts {
        return Err("not a Qt Linguist TS document".into());
    }

    Ok(catalog)
}

fn start_field(field: &mut Option<Field>, buf: &mut String, next: Field) {
    *field = Some(next);
    buf.clear();
}

fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>, String> {
    for a in e.attributes() {
        let a = a.map_err(|e| format!("invalid attribute: {e}"))?;
        if a.key.as_ref() == key {
            let value = a
                .unescape_value()
                .map_err(|e| format!("invalid attribute value: {e}"))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn set_state(e: &BytesStart, m: &mut Message) -> Result<(), String> {
    m.state = match attr(e, b"type")?.as_deref() {
        None => TranslationState::Finished,
        Some("unfinished") => TranslationState::Unfinished,
        Some("vanished") => TranslationState::Vanished,
        Some("obsolete") => TranslationState::Obsolete,
        Some(other) => return Err(format!("unknown translation type: {other}")),
    };
    Ok(())
}

fn push_location(e: &BytesStart, m: &mut Message) -> Result<(), String> {
    let filename = attr(e, b"filename")?.unwrap_or_default();
    // Linhas relativas ("+3"/"-1") não são resolvidas; ficam sem número.
    let line = attr(e, b"line")?.and_then(|l| l.parse::<usize>().ok());
    m.locations.push(Location { filename, line });
    Ok(())
}

fn push_byte(e: &BytesStart, buf: &mut String) -> Result<(), String> {
    if let Some(value) = attr(e, b"value")? {
        let (radix, digits) = match value.strip_prefix('x') {
            Some(hex) => (16, hex),
            None => (10, value.as_str()),
        };
        if let Some(ch) = u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
        {
            buf.push(ch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?><!DOCTYPE TS><TS version="2.1" language="es_ES" sourcelanguage="en_US">
<context>
    <name>AboutDialog</name>
    <message>
        <location filename="../../src/frontend/aboutdialog.ui" line="14"/>
        <source>About</source>
        <translation>Acerca de</translation>
    </message>
    <message>
        <location filename="../../src/frontend/aboutdialog.ui" line="30"/>
        <source>&lt;html&gt;&lt;body&gt;&lt;p&gt;%1 | %2&lt;/p&gt;&lt;/body&gt;&lt;/html&gt;</source>
        <translation type="unfinished"/>
    </message>
</context>
<context>
    <name>MainWindow</name>
    <message>
        <location filename="../../src/frontend/main.cpp" line="2214"/>
        <source>Volume: %1%</source>
        <comment>Volume percentage (e.g. 50%)</comment>
        <translation>Volumen: %1%</translation>
    </message>
    <message numerus="yes">
        <location filename="../../src/frontend/main.cpp" line="2269"/>
        <source>%n file(s) remaining</source>
        <translation><numerusform>Queda %n archivo</numerusform><numerusform>Quedan %n archivos</numerusform></translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn parse_reads_header_and_contexts() {
        let catalog = parse(SAMPLE).unwrap();
        assert_eq!(catalog.version, "2.1");
        assert_eq!(catalog.language, "es_ES");
        assert_eq!(catalog.source_language, "en_US");
        assert_eq!(catalog.contexts.len(), 2);
        assert_eq!(catalog.contexts[0].name, "AboutDialog");
        assert_eq!(catalog.contexts[1].name, "MainWindow");
    }

    #[test]
    fn parse_reads_finished_message_with_location() {
        let catalog = parse(SAMPLE).unwrap();
        let m = &catalog.contexts[0].messages[0];
        assert_eq!(m.source, "About");
        assert_eq!(m.translation, "Acerca de");
        assert_eq!(m.state, TranslationState::Finished);
        assert_eq!(m.locations.len(), 1);
        assert_eq!(m.locations[0].filename, "../../src/frontend/aboutdialog.ui");
        assert_eq!(m.locations[0].line, Some(14));
    }

    #[test]
    fn parse_unescapes_entities_in_source() {
        let catalog = parse(SAMPLE).unwrap();
        let m = &catalog.contexts[0].messages[1];
        assert_eq!(m.source, "<html><body><p>%1 | %2</p></body></html>");
        assert_eq!(m.state, TranslationState::Unfinished);
        assert!(m.translation.is_empty());
    }

    #[test]
    fn parse_reads_disambiguation_comment() {
        let catalog = parse(SAMPLE).unwrap();
        let m = &catalog.contexts[1].messages[0];
        assert_eq!(m.comment.as_deref(), Some("Volume percentage (e.g. 50%)"));
    }

    #[test]
    fn parse_reads_numerus_forms() {
        let catalog = parse(SAMPLE).unwrap();
        let m = &catalog.contexts[1].messages[1];
        assert!(m.numerus);
        assert_eq!(
            m.numerus_forms,
            vec!["Queda %n archivo", "Quedan %n archivos"]
        );
        assert!(m.translation.is_empty());
    }

    #[test]
    fn parse_preserves_inner_whitespace() {
        let xml = "<TS version=\"2.1\" language=\"da\"><context><name>C</name>\
<message numerus=\"yes\"><source>%n file(s) installed\n</source>\
<translation><numerusform>%n fil installeret\n</numerusform><numerusform>%n filer installeret\n</numerusform></translation>\
</message></context></TS>";
        let catalog = parse(xml).unwrap();
        let m = &catalog.contexts[0].messages[0];
        assert_eq!(m.source, "%n file(s) installed\n");
        assert_eq!(m.numerus_forms[1], "%n filer installeret\n");
    }

    #[test]
    fn parse_skips_unknown_elements() {
        let xml = r#"<TS version="2.1"><context><name>C</name>
<message>
    <source>Open</source>
    <oldsource>Open file</oldsource>
    <extra-loc-blank>whatever</extra-loc-blank>
    <translation>Abrir</translation>
</message></context></TS>"#;
        let catalog = parse(xml).unwrap();
        let m = &catalog.contexts[0].messages[0];
        assert_eq!(m.source, "Open");
        assert_eq!(m.translation, "Abrir");
    }

    #[test]
    fn parse_reads_translator_and_extra_comments() {
        let xml = r#"<TS version="2.1"><context><name>C</name>
<message>
    <source>Save</source>
    <extracomment>Toolbar button</extracomment>
    <translatorcomment>revisar contexto</translatorcomment>
    <translation>Guardar</translation>
</message></context></TS>"#;
        let catalog = parse(xml).unwrap();
        let m = &catalog.contexts[0].messages[0];
        assert_eq!(m.extracomment.as_deref(), Some("Toolbar button"));
        assert_eq!(m.translatorcomment.as_deref(), Some("revisar contexto"));
    }

    #[test]
    fn parse_rejects_non_ts_document() {
        assert!(parse("<html><body/></html>").is_err());
        assert!(parse("not xml at all").is_err());
    }

    #[test]
    fn parse_rejects_broken_xml() {
        // Fechamento trocado: </TS> onde deveria vir </context>.
        assert!(parse("<TS version=\"2.1\"><context></TS>").is_err());
    }
}
