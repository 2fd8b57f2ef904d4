//! Kodi NFO descriptors
//!
//! Reading goes through `quick_xml::de`. Writing rewrites the event stream so
//! elements the updater does not own (actors, art, stream details) survive
//! byte for byte.

use dvdnfo_core::error::{DvdNfoError, Result};
use dvdnfo_core::updater::{DescriptorFields, DescriptorKind, DescriptorPatch};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::atomic::atomic_write;

const CATALOG_URL_TAG: &str = "dvd-netflix-url";

/// Top-level elements the updater reads
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDescriptor {
    title: Option<String>,
    year: Option<String>,
    premiered: Option<String>,
    plot: Option<String>,
    outline: Option<String>,
    genre: Vec<String>,
    rating: Option<String>,
    votes: Option<String>,
    #[serde(rename = "dvd-netflix-url")]
    catalog_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A descriptor file loaded into memory
#[derive(Debug, Clone)]
pub struct NfoDocument {
    path: PathBuf,
    kind: DescriptorKind,
    xml: String,
}

impl NfoDocument {
    /// Read a descriptor from disk
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let xml = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DvdNfoError::InvalidDescriptor {
                    path: path.clone(),
                    message: "file not found".to_string(),
                }
            } else {
                DvdNfoError::Io(e)
            }
        })?;
        debug!("Read descriptor {:?}", path);
        Self::from_xml(path, xml)
    }

    /// Wrap XML that will be saved to `path`
    pub fn from_xml(path: impl Into<PathBuf>, xml: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let xml = xml.into();
        let kind = root_kind(&xml).map_err(|message| DvdNfoError::InvalidDescriptor {
            path: path.clone(),
            message,
        })?;
        Ok(Self { path, kind, xml })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Fields the updater needs to look the title up and show a diff
    pub fn fields(&self) -> Result<DescriptorFields> {
        let raw: RawDescriptor =
            quick_xml::de::from_str(&self.xml).map_err(|e| DvdNfoError::InvalidDescriptor {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let year = non_empty(raw.year)
            .and_then(|y| y.parse::<i32>().ok())
            .or_else(|| {
                non_empty(raw.premiered)
                    .and_then(|p| p.get(..4).and_then(|y| y.parse::<i32>().ok()))
            });

        Ok(DescriptorFields {
            title: non_empty(raw.title),
            year,
            plot: non_empty(raw.plot),
            outline: non_empty(raw.outline),
            genres: raw
                .genre
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
            rating: non_empty(raw.rating),
            votes: non_empty(raw.votes),
            catalog_url: non_empty(raw.catalog_url),
        })
    }

    /// Apply a patch in memory
    pub fn apply(&mut self, patch: &DescriptorPatch) -> Result<()> {
        if !patch.touches_descriptor() {
            return Ok(());
        }
        self.xml = rewrite(&self.xml, patch)?;
        Ok(())
    }

    /// Replace the file on disk
    pub fn save(&self) -> Result<()> {
        atomic_write(&self.path, self.xml.as_bytes())?;
        info!("Saved descriptor {:?}", self.path);
        Ok(())
    }
}

fn xml_error(e: impl std::fmt::Display) -> DvdNfoError {
    DvdNfoError::Xml(e.to_string())
}

fn root_kind(xml: &str) -> std::result::Result<DescriptorKind, String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return DescriptorKind::from_root_tag(&name)
                    .ok_or_else(|| format!("unexpected root element <{}>", name));
            }
            Event::Eof => return Err("no root element".to_string()),
            _ => {}
        }
    }
}

/// One element the patch owns
struct Slot {
    tag: &'static str,
    value: String,
    /// Leave an existing element alone and only add when missing
    add_only: bool,
    done: bool,
}

enum Claim {
    Keep,
    Replace(String),
    Drop,
}

struct Slots(Vec<Slot>);

impl Slots {
    fn from_patch(patch: &DescriptorPatch) -> Self {
        let mut slots = Vec::new();
        let mut push = |tag: &'static str, value: Option<String>, add_only: bool| {
            if let Some(value) = value {
                slots.push(Slot {
                    tag,
                    value,
                    add_only,
                    done: false,
                });
            }
        };

        push("plot", patch.plot.clone(), false);
        push("outline", patch.outline.clone(), false);
        push("genre", patch.genre.clone(), false);
        push("rating", patch.rating.map(|r| format!("{:.1}", r.value)), false);
        push(
            "votes",
            patch.rating.and_then(|r| r.votes).map(|v| v.to_string()),
            false,
        );
        push(CATALOG_URL_TAG, patch.catalog_url.clone(), true);

        Self(slots)
    }

    /// Decide what happens to a top-level element named `name`.
    /// The first occurrence is replaced; later `genre` elements are dropped
    /// so exactly one remains.
    fn claim(&mut self, name: &[u8]) -> Claim {
        let Some(slot) = self.0.iter_mut().find(|s| s.tag.as_bytes() == name) else {
            return Claim::Keep;
        };
        if slot.done {
            return if slot.tag == "genre" { Claim::Drop } else { Claim::Keep };
        }
        slot.done = true;
        if slot.add_only {
            Claim::Keep
        } else {
            Claim::Replace(slot.value.clone())
        }
    }

    fn missing(&mut self) -> impl Iterator<Item = &mut Slot> + '_ {
        self.0.iter_mut().filter(|s| !s.done)
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn write_element(writer: &mut XmlWriter, start: BytesStart<'_>, value: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))
        .map_err(xml_error)?;
    writer.write_event(Event::End(end)).map_err(xml_error)?;
    Ok(())
}

fn flush(writer: &mut XmlWriter, held: &mut Option<Event<'_>>) -> Result<()> {
    if let Some(event) = held.take() {
        writer.write_event(event).map_err(xml_error)?;
    }
    Ok(())
}

fn append_missing(writer: &mut XmlWriter, slots: &mut Slots, indent: &str) -> Result<()> {
    for slot in slots.missing() {
        writer
            .write_event(Event::Text(BytesText::from_escaped(format!("\n{}", indent))))
            .map_err(xml_error)?;
        write_element(writer, BytesStart::new(slot.tag), &slot.value)?;
        slot.done = true;
    }
    Ok(())
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(|b| b.is_ascii_whitespace())
}

/// Rewrite `xml` with the patch applied to the root's children
fn rewrite(xml: &str, patch: &DescriptorPatch) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut slots = Slots::from_patch(patch);

    let mut depth = 0usize;
    // Whitespace before a top-level element, dropped along with that element
    let mut held: Option<Event<'_>> = None;
    let mut indent: Option<String> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Eof => break,
            Event::Text(text) if depth == 1 && is_blank(&text) => {
                flush(&mut writer, &mut held)?;
                if indent.is_none() {
                    let raw = String::from_utf8_lossy(&text);
                    indent = Some(raw.rsplit('\n').next().unwrap_or("").to_string());
                }
                held = Some(Event::Text(text));
            }
            Event::Start(start) if depth == 1 => match slots.claim(start.name().as_ref()) {
                Claim::Keep => {
                    flush(&mut writer, &mut held)?;
                    writer.write_event(Event::Start(start)).map_err(xml_error)?;
                    depth += 1;
                }
                Claim::Replace(value) => {
                    flush(&mut writer, &mut held)?;
                    reader.read_to_end(start.name()).map_err(xml_error)?;
                    write_element(&mut writer, start, &value)?;
                }
                Claim::Drop => {
                    held = None;
                    reader.read_to_end(start.name()).map_err(xml_error)?;
                }
            },
            Event::Empty(empty) if depth == 1 => match slots.claim(empty.name().as_ref()) {
                Claim::Keep => {
                    flush(&mut writer, &mut held)?;
                    writer.write_event(Event::Empty(empty)).map_err(xml_error)?;
                }
                Claim::Replace(value) => {
                    flush(&mut writer, &mut held)?;
                    write_element(&mut writer, empty, &value)?;
                }
                Claim::Drop => held = None,
            },
            Event::Empty(root) if depth == 0 => {
                let end = root.to_end().into_owned();
                writer.write_event(Event::Start(root)).map_err(xml_error)?;
                append_missing(&mut writer, &mut slots, "  ")?;
                writer
                    .write_event(Event::Text(BytesText::from_escaped("\n")))
                    .map_err(xml_error)?;
                writer.write_event(Event::End(end)).map_err(xml_error)?;
            }
            Event::Start(start) => {
                flush(&mut writer, &mut held)?;
                writer.write_event(Event::Start(start)).map_err(xml_error)?;
                depth += 1;
            }
            Event::End(end) => {
                if depth == 1 {
                    let indent = indent.clone().unwrap_or_else(|| "  ".to_string());
                    append_missing(&mut writer, &mut slots, &indent)?;
                    if held.is_none() {
                        writer
                            .write_event(Event::Text(BytesText::from_escaped("\n")))
                            .map_err(xml_error)?;
                    }
                }
                flush(&mut writer, &mut held)?;
                writer.write_event(Event::End(end)).map_err(xml_error)?;
                depth = depth.saturating_sub(1);
            }
            other => {
                flush(&mut writer, &mut held)?;
                writer.write_event(other).map_err(xml_error)?;
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}
