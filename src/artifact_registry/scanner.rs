//! Forward-only reader for `batch.xml` artifact descriptors.
//!
//! The scanner understands a deliberately small XML shape: one root element
//! followed by flat child elements. Each child contributes its local name and
//! its unprefixed `id` and `class` attributes. Anything nested inside a child
//! is skipped, and nothing after the root's end tag is read.

use quick_xml::NsReader;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufReader, Read};
use thiserror::Error;
use tracing::debug;

/// Namespace of the Java EE `batch.xml` schema.
pub const BATCH_XML_NAMESPACE: &str = "http://xmlns.jcp.org/xml/ns/javaee";

/// Local name of the `batch.xml` root element.
pub const BATCH_XML_ROOT: &str = "batch-artifacts";

/// Qualified name the document root must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedRoot {
    /// Namespace URI the root must be bound to.
    pub namespace: String,
    /// Local name of the root element.
    pub local_name: String,
}

impl Default for ExpectedRoot {
    fn default() -> Self {
        Self {
            namespace: BATCH_XML_NAMESPACE.to_owned(),
            local_name: BATCH_XML_ROOT.to_owned(),
        }
    }
}

impl fmt::Display for ExpectedRoot {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{{}}}{}", self.namespace, self.local_name)
    }
}

/// One child element of the descriptor root, as written.
///
/// Attribute values are unescaped but otherwise unvalidated; absent
/// attributes are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDeclaration {
    /// Local name of the element, used as the batch type tag.
    pub type_tag: String,
    /// Value of the `id` attribute.
    pub id: Option<String>,
    /// Value of the `class` attribute.
    pub class_name: Option<String>,
}

/// Errors raised while scanning a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorScanError {
    /// The first element is not the expected root.
    #[error("expecting root element {expected}, found {found}")]
    UnexpectedRoot {
        /// Root the scanner was configured for.
        expected: String,
        /// Qualified name actually found.
        found: String,
    },

    /// The document ended before any element.
    #[error("expecting root element {expected}, found end of document")]
    MissingRoot {
        /// Root the scanner was configured for.
        expected: String,
    },

    /// The document ended before the root element was closed.
    #[error("descriptor ended before root element {expected} was closed")]
    UnterminatedRoot {
        /// Root the scanner was configured for.
        expected: String,
    },

    /// An element or namespace name is not valid UTF-8.
    #[error("descriptor contains a name that is not valid UTF-8")]
    InvalidName(#[from] std::str::Utf8Error),

    /// The underlying XML reader failed.
    #[error("malformed descriptor: {0}")]
    Xml(#[from] quick_xml::Error),
}

enum ScanStep {
    Element {
        namespace: Option<String>,
        declaration: ArtifactDeclaration,
        end: Option<BytesEnd<'static>>,
    },
    End,
    Eof,
    Ignored,
}

/// Reads every artifact declaration from `reader`.
///
/// The reader is consumed and dropped before returning, whether or not the
/// scan succeeds.
///
/// # Errors
///
/// Returns [`DescriptorScanError`] when the root does not match `expected`,
/// the document has no root, the root is never closed, or the XML is
/// malformed.
pub fn scan_descriptor<R: Read>(
    reader: R,
    expected: &ExpectedRoot,
) -> Result<Vec<ArtifactDeclaration>, DescriptorScanError> {
    let mut xml = NsReader::from_reader(BufReader::new(reader));
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    let root_has_children = loop {
        buf.clear();
        match next_step(&mut xml, &mut buf)? {
            ScanStep::Element {
                namespace,
                declaration,
                end,
            } => {
                let is_expected = namespace.as_deref() == Some(expected.namespace.as_str())
                    && declaration.type_tag == expected.local_name;
                if !is_expected {
                    return Err(DescriptorScanError::UnexpectedRoot {
                        expected: expected.to_string(),
                        found: qualified(namespace.as_deref(), &declaration.type_tag),
                    });
                }
                break end.is_some();
            }
            ScanStep::Eof => {
                return Err(DescriptorScanError::MissingRoot {
                    expected: expected.to_string(),
                });
            }
            ScanStep::End | ScanStep::Ignored => {}
        }
    };

    let mut declarations = Vec::new();
    if root_has_children {
        loop {
            buf.clear();
            match next_step(&mut xml, &mut buf)? {
                ScanStep::Element {
                    declaration, end, ..
                } => {
                    if let Some(end_tag) = end {
                        skip_buf.clear();
                        xml.read_to_end_into(end_tag.name(), &mut skip_buf)?;
                    }
                    declarations.push(declaration);
                }
                ScanStep::End => break,
                ScanStep::Eof => {
                    return Err(DescriptorScanError::UnterminatedRoot {
                        expected: expected.to_string(),
                    });
                }
                ScanStep::Ignored => {}
            }
        }
    }

    debug!(
        declarations = declarations.len(),
        "scanned batch artifact descriptor"
    );
    Ok(declarations)
}

fn next_step<R: std::io::BufRead>(
    xml: &mut NsReader<R>,
    buf: &mut Vec<u8>,
) -> Result<ScanStep, DescriptorScanError> {
    let (resolved, event) = xml.read_resolved_event_into(buf)?;
    let namespace = match resolved {
        ResolveResult::Bound(Namespace(bytes)) => Some(std::str::from_utf8(bytes)?.to_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    };

    let step = match event {
        Event::Start(start) => ScanStep::Element {
            namespace,
            declaration: read_declaration(&start)?,
            end: Some(start.to_end().into_owned()),
        },
        Event::Empty(start) => ScanStep::Element {
            namespace,
            declaration: read_declaration(&start)?,
            end: None,
        },
        Event::End(_) => ScanStep::End,
        Event::Eof => ScanStep::Eof,
        _ => ScanStep::Ignored,
    };
    Ok(step)
}

fn read_declaration(start: &BytesStart<'_>) -> Result<ArtifactDeclaration, DescriptorScanError> {
    let type_tag = std::str::from_utf8(start.local_name().into_inner())?.to_owned();
    let mut id = None;
    let mut class_name = None;

    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.prefix().is_some() {
            continue;
        }
        let slot = match attribute.key.local_name().into_inner() {
            b"id" => &mut id,
            b"class" => &mut class_name,
            _ => continue,
        };
        *slot = Some(attribute.unescape_value()?.into_owned());
    }

    Ok(ArtifactDeclaration {
        type_tag,
        id,
        class_name,
    })
}

fn qualified(namespace: Option<&str>, local_name: &str) -> String {
    namespace.map_or_else(
        || local_name.to_owned(),
        |uri| format!("{{{uri}}}{local_name}"),
    )
}
