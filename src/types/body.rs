use imap_proto::{BodyContentCommon, BodyContentSinglePart, ContentEncoding};

/// An owned, simplified [`BODYSTRUCTURE`](https://tools.ietf.org/html/rfc3501#section-7.4.2)
/// tree.
///
/// Only what is needed to address parts for a later `FETCH` is kept; decoding is left to the
/// caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyStructure {
    /// A leaf part.
    Single {
        /// Media type, e.g. `TEXT`.
        media_type: String,
        /// Media subtype, e.g. `PLAIN`.
        subtype: String,
        /// Content parameters such as `CHARSET`, names upper-cased.
        params: Vec<(String, String)>,
        /// The `Content-ID`, if any.
        id: Option<String>,
        /// The content transfer encoding, upper-cased.
        encoding: String,
        /// Size in octets of the encoded part.
        octets: u32,
    },
    /// A `message/rfc822` part wrapping another body.
    Message {
        /// The `Content-ID`, if any.
        id: Option<String>,
        /// Size in octets of the encapsulated message.
        octets: u32,
        /// The encapsulated message's structure.
        body: Box<BodyStructure>,
    },
    /// A `multipart/*` part.
    Multipart {
        /// Multipart subtype, e.g. `MIXED`.
        subtype: String,
        /// The children, in order.
        parts: Vec<BodyStructure>,
    },
}

impl BodyStructure {
    /// The media type as `type/subtype`, lower-cased.
    pub fn mime_type(&self) -> String {
        match self {
            BodyStructure::Single {
                media_type,
                subtype,
                ..
            } => format!("{}/{}", media_type, subtype).to_ascii_lowercase(),
            BodyStructure::Message { .. } => "message/rfc822".to_string(),
            BodyStructure::Multipart { subtype, .. } => {
                format!("multipart/{}", subtype.to_ascii_lowercase())
            }
        }
    }

    /// Look up a content parameter of a leaf part, e.g. `charset`.
    pub fn param(&self, name: &str) -> Option<&str> {
        match self {
            BodyStructure::Single { params, .. } => params
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

fn params(common: &BodyContentCommon<'_>) -> Vec<(String, String)> {
    common
        .ty
        .params
        .iter()
        .flatten()
        .map(|(k, v)| (k.to_ascii_uppercase(), v.to_string()))
        .collect()
}

fn encoding(other: &BodyContentSinglePart<'_>) -> String {
    #[allow(unreachable_patterns)]
    match other.transfer_encoding {
        ContentEncoding::SevenBit => "7BIT".to_string(),
        ContentEncoding::EightBit => "8BIT".to_string(),
        ContentEncoding::Binary => "BINARY".to_string(),
        ContentEncoding::Base64 => "BASE64".to_string(),
        ContentEncoding::QuotedPrintable => "QUOTED-PRINTABLE".to_string(),
        ContentEncoding::Other(ref s) => s.to_ascii_uppercase(),
        _ => String::new(),
    }
}

impl<'a> From<&imap_proto::BodyStructure<'a>> for BodyStructure {
    fn from(b: &imap_proto::BodyStructure<'a>) -> Self {
        use imap_proto::BodyStructure as Raw;

        match b {
            Raw::Basic { common, other, .. } | Raw::Text { common, other, .. } => {
                BodyStructure::Single {
                    media_type: common.ty.ty.to_ascii_uppercase(),
                    subtype: common.ty.subtype.to_ascii_uppercase(),
                    params: params(common),
                    id: other.id.as_ref().map(|s| s.to_string()),
                    encoding: encoding(other),
                    octets: other.octets,
                }
            }
            Raw::Message { other, body, .. } => BodyStructure::Message {
                id: other.id.as_ref().map(|s| s.to_string()),
                octets: other.octets,
                body: Box::new(BodyStructure::from(&**body)),
            },
            Raw::Multipart { common, bodies, .. } => BodyStructure::Multipart {
                subtype: common.ty.subtype.to_ascii_uppercase(),
                parts: bodies.iter().map(BodyStructure::from).collect(),
            },
        }
    }
}
