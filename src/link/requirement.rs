//! Typed library requirements.
//!
//! A requirement such as `libnvinfer.so.8` is split into the base name
//! including the trailing `.so.` (`libnvinfer.so.`) and the major version
//! (`8`). This is the only place library names are parsed; everything
//! downstream works with [`LibraryRequirement`].

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static REQUIREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(lib.+?\.so\.)(\d+)").expect("requirement regex is valid"));

/// A shared library the loader failed to find.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryRequirement {
    name: String,
    base_name: String,
    major_version: String,
}

/// A requirement string that does not look like `lib<name>.so.<major>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedName(pub String);

impl fmt::Display for MalformedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse library format: {}", self.0)
    }
}

impl LibraryRequirement {
    /// Parse a library file name.
    ///
    /// # Example
    ///
    /// ```
    /// use solink::link::LibraryRequirement;
    ///
    /// let req = LibraryRequirement::parse("libnvinfer_plugin.so.8").unwrap();
    /// assert_eq!(req.base_name(), "libnvinfer_plugin.so.");
    /// assert_eq!(req.major_version(), "8");
    /// assert!(LibraryRequirement::parse("nvinfer.dll").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, MalformedName> {
        let caps = REQUIREMENT_RE
            .captures(name)
            .ok_or_else(|| MalformedName(name.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            base_name: caps[1].to_string(),
            major_version: caps[2].to_string(),
        })
    }

    /// The full requirement as it appeared in the trace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name up to and including `.so.`.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Leading digits after `.so.`.
    pub fn major_version(&self) -> &str {
        &self.major_version
    }
}

impl fmt::Display for LibraryRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
