use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::catalog::Catalog;
use crate::model::message::{Message, TranslationState};

// Serializa o catálogo de volta para TS XML. A indentação é a nossa,
// não a do lupdate; o contrato é round-trip estrutural via parsers::ts.
pub fn rebuild(catalog: &Catalog) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped("TS")))
        .map_err(|e| e.to_string())?;

    let mut ts = BytesStart::new("TS");
    if !catalog.version.is_empty() {
        ts.push_attribute(("version", catalog.version.as_str()));
    }
    if !catalog.language.is_empty() {
        ts.push_attribute(("language", catalog.language.as_str()));
    }
    if !catalog.source_language.is_empty() {
        ts.push_attribute(("sourcelanguage", catalog.source_language.as_str()));
    }
    writer
        .write_event(Event::Start(ts))
        .map_err(|e| e.to_string())?;

    for ctx in &catalog.contexts {
        writer
            .write_event(Event::Start(BytesStart::new("context")))
            .map_err(|e| e.to_string())?;

        write_text_el(&mut writer, "name", &ctx.name)?;

        for m in &ctx.messages {
            write_message(&mut writer, m)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("context")))
            .map_err(|e| e.to_string())?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("TS")))
        .map_err(|e| e.to_string())?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    String::from_utf8(out).map_err(|e| e.to_string())
}

fn write_message(w: &mut Writer<Vec<u8>>, m: &Message) -> Result<(), String> {
    let mut start = BytesStart::new("message");
    if m.numerus {
        start.push_attribute(("numerus", "yes"));
    }
    w.write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;

    for loc in &m.locations {
        let mut el = BytesStart::new("location");
        if !loc.filename.is_empty() {
            el.push_attribute(("filename", loc.filename.as_str()));
        }
        if let Some(line) = loc.line {
            el.push_attribute(("line", line.to_string().as_str()));
        }
        w.write_event(Event::Empty(el)).map_err(|e| e.to_string())?;
    }

    write_text_el(w, "source", &m.source)?;
    if let Some(c) = &m.comment {
        write_text_el(w, "comment", c)?;
    }
    if let Some(c) = &m.extracomment {
        write_text_el(w, "extracomment", c)?;
    }
    if let Some(c) = &m.translatorcomment {
        write_text_el(w, "translatorcomment", c)?;
    }

    let mut tr = BytesStart::new("translation");
    match m.state {
        TranslationState::Finished => {}
        TranslationState::Unfinished => tr.push_attribute(("type", "unfinished")),
        TranslationState::Vanished => tr.push_attribute(("type", "vanished")),
        TranslationState::Obsolete => tr.push_attribute(("type", "obsolete")),
    }

    if m.numerus && !m.numerus_forms.is_empty() {
        w.write_event(Event::Start(tr)).map_err(|e| e.to_string())?;
        for form in &m.numerus_forms {
            write_text_el(w, "numerusform", form)?;
        }
        w.write_event(Event::End(BytesEnd::new("translation")))
            .map_err(|e| e.to_string())?;
    } else if m.translation.is_empty() {
        // Entrada sem texto (tipicamente type="unfinished"): elemento vazio,
        // igual ao lupdate. O texto original NÃO cai para a tradução aqui —
        // isso apagaria o estado pendente do arquivo.
        w.write_event(Event::Empty(tr)).map_err(|e| e.to_string())?;
    } else {
        w.write_event(Event::Start(tr)).map_err(|e| e.to_string())?;
        w.write_event(Event::Text(BytesText::new(&m.translation)))
            .map_err(|e| e.to_string())?;
        w.write_event(Event::End(BytesEnd::new("translation")))
            .map_err(|e| e.to_string())?;
    }

    w.write_event(Event::End(BytesEnd::new("message")))
        .map_err(|e| e.to_string())
}

fn write_text_el(w: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), String> {
    if text.is_empty() {
        return w
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(|e| e.to_string());
    }
    w.write_event(Event::Start(BytesStart::new(tag)))
        .map_err(|e| e.to_string())?;
    w.write_event(Event::Text(BytesText::new(text)))
        .map_err(|e| e.to_string())?;
    w.write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| e.to_string())
}
