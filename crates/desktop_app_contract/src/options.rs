//! Launch option bags and the typed open requests derived from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AppCapability;

/// Option key carrying a folder path for navigable apps.
pub const OPTION_PATH: &str = "path";
/// Option key carrying a file name.
pub const OPTION_FILE_NAME: &str = "fileName";
/// Option key carrying text content for a file.
pub const OPTION_CONTENT: &str = "content";
/// Option key carrying a media file path.
pub const OPTION_FILE_PATH: &str = "filePath";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Free-form launch option bag. Recognised keys are app-specific.
pub struct LaunchOptions(Map<String, Value>);

impl LaunchOptions {
    /// Creates an empty option bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from a JSON value, which must be an object or `null`.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("launch options must be a JSON object, got {other}")),
        }
    }

    /// Returns the options with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for `key`; non-string values are ignored.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns whether no options were supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `path` option.
    pub fn path(&self) -> Option<&str> {
        self.non_empty(OPTION_PATH)
    }

    /// `fileName` option.
    pub fn file_name(&self) -> Option<&str> {
        self.non_empty(OPTION_FILE_NAME)
    }

    /// `content` option. Empty content is meaningful (an empty file) and is kept.
    pub fn content(&self) -> Option<&str> {
        self.get_str(OPTION_CONTENT)
    }

    /// `filePath` option.
    pub fn file_path(&self) -> Option<&str> {
        self.non_empty(OPTION_FILE_PATH)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|value| !value.is_empty())
    }
}

impl From<Map<String, Value>> for LaunchOptions {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// App-specific open request produced by the launcher's option routing.
pub enum OpenRequest {
    /// Open with no arguments.
    Default,
    /// Open (or navigate) at a folder path.
    Path {
        /// Target path.
        path: String,
    },
    /// Open a text file.
    File {
        /// File name shown in the window title.
        file_name: Option<String>,
        /// File content to load.
        content: Option<String>,
    },
    /// Open a media file.
    Media {
        /// Display name of the media file.
        file_name: Option<String>,
        /// Location of the media file.
        file_path: Option<String>,
    },
}

impl OpenRequest {
    /// Capability a running app must declare to receive this request.
    pub fn required_capability(&self) -> Option<AppCapability> {
        match self {
            Self::Default => None,
            Self::Path { .. } => Some(AppCapability::Navigable),
            Self::File { .. } => Some(AppCapability::FileOpenable),
            Self::Media { .. } => Some(AppCapability::MediaOpenable),
        }
    }
}
