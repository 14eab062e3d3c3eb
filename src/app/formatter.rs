//! Serializes a report into the requested output format and optionally
//! writes it to disk.

use crate::app::cli::OutputFormat;
use crate::app::models::Report;
use crate::app::projector::{self, NestedRecord, Node};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write as _;

/// Renders the report as text in the requested format.
///
/// CSV works straight off the flat header/rows; the structured formats
/// consume the projected nested records. A `vdf` request is not implemented
/// and falls through to the CSV rendering (with a diagnostic).
pub fn render(format: OutputFormat, report: &Report) -> Result<String> {
    match format {
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Json => {
            let records = projector::project_all(&report.header, &report.rows);
            serde_json::to_string(&records).context("failed to serialize JSON")
        }
        OutputFormat::Yml => {
            let records = projector::project_all(&report.header, &report.rows);
            serde_yaml_ng::to_string(&records).context("failed to serialize YAML")
        }
        OutputFormat::Xml => {
            let records = projector::project_all(&report.header, &report.rows);
            render_xml(&records)
        }
        OutputFormat::Vdf => {
            log::warn!("sorry, format `vdf` is not implemented yet, falling back to csv");
            render_csv(report)
        }
    }
}

/// Writes the rendered text to `file`, appending `.<format-tag>` when the
/// name carries no extension marker. The requested tag is used even when the
/// rendering fell back to CSV.
pub fn persist(text: &str, file: &str, format: OutputFormat) -> Result<()> {
    let path = if file.contains('.') {
        file.to_string()
    } else {
        format!("{file}.{}", format.tag())
    };
    let mut out = fs::File::create(&path).with_context(|| format!("failed to create {path}"))?;
    out.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

fn render_csv(report: &Report) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&report.header)
        .context("failed to write CSV header")?;
    for row in &report.rows {
        let rendered: Vec<String> = row.iter().map(ToString::to_string).collect();
        writer
            .write_record(&rendered)
            .context("failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .context("failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

fn render_xml(records: &[NestedRecord]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("result")))?;
    for record in records {
        writer.write_event(Event::Start(BytesStart::new("entry")))?;
        write_record(&mut writer, record)?;
        writer.write_event(Event::End(BytesEnd::new("entry")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("result")))?;
    String::from_utf8(writer.into_inner()).context("XML output was not UTF-8")
}

fn write_record(writer: &mut Writer<Vec<u8>>, record: &NestedRecord) -> Result<()> {
    for (key, node) in record {
        writer.write_event(Event::Start(BytesStart::new(key.as_str())))?;
        match node {
            Node::Leaf(value) => {
                writer.write_event(Event::Text(BytesText::new(&value.to_string())))?;
            }
            Node::Branch(map) => write_record(writer, map)?,
        }
        writer.write_event(Event::End(BytesEnd::new(key.as_str())))?;
    }
    Ok(())
}
