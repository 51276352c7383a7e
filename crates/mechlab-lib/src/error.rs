use thiserror::Error;

use crate::model::Location;
use crate::rules::Denial;

/// Convenient result alias for the mechlab library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when catalog data fails validation while loading.
    #[error("invalid catalog data: {message}")]
    CatalogValidation { message: String },

    /// Raised when two catalog records share an identifier.
    #[error("duplicate {kind} id encountered in catalog: {id}")]
    DuplicateCatalogId { kind: &'static str, id: u32 },

    /// Raised when a chassis id is not present in the catalog.
    #[error("unknown chassis id: {id}")]
    UnknownChassis { id: u32 },

    /// Raised when a chassis name could not be found in the catalog.
    #[error("unknown chassis name: {name}{}", format_suggestions(.suggestions))]
    UnknownChassisName {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an item id is not present in the catalog.
    #[error("unknown item id: {id}")]
    UnknownItem { id: u32 },

    /// Raised when an upgrade id is not present in the catalog.
    #[error("unknown upgrade id: {id}")]
    UnknownUpgrade { id: u32 },

    /// Raised when a pod id is not present for the requested location.
    #[error("unknown pod id {id} for location {location}")]
    UnknownPod { id: u32, location: Location },

    /// A mutation was rejected by the constraint engine.
    #[error(transparent)]
    Denied(#[from] Denial),

    /// Raised when removing an item that is not equipped at the location.
    #[error("{item} is not equipped in {location}")]
    ItemNotEquipped { item: String, location: Location },

    /// Raised when removing a pilot module that is not equipped.
    #[error("module {module} is not equipped")]
    ModuleNotEquipped { module: String },

    /// Raised when a byte stream does not start with a supported header.
    #[error("unsupported loadout format: header byte {header:#04x}")]
    UnsupportedFormat { header: u8 },

    /// Raised when a byte stream ends before a fixed-width field.
    #[error("truncated loadout data: expected at least {expected} bytes, got {actual}")]
    TruncatedData { expected: usize, actual: usize },

    /// Raised when the compressed payload cannot be decoded structurally.
    #[error("malformed loadout stream: {message}")]
    MalformedStream { message: String },

    /// Raised when a loadout cannot be represented on the wire.
    #[error("failed to encode loadout: {message}")]
    Encoding { message: String },

    /// Raised when a Huffman code cannot be built from a frequency table.
    #[error("invalid huffman frequency table: {message}")]
    HuffmanTable { message: String },

    /// Raised when a link is not in a recognised textual form.
    #[error("unrecognised loadout link: {link}")]
    LinkFormat { link: String },

    /// Raised when the base64 payload of a link is invalid.
    #[error("invalid base64 in loadout link: {source}")]
    Base64Decode { source: base64::DecodeError },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True when the error describes content that could not be resolved or
    /// applied, as opposed to input that cannot be decoded at all.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownItem { .. }
                | Error::UnknownUpgrade { .. }
                | Error::UnknownPod { .. }
                | Error::Denied(_)
                | Error::ItemNotEquipped { .. }
                | Error::ModuleNotEquipped { .. }
        )
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
