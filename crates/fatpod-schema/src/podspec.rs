//! Podspec metadata as printed by `pod spec cat`, and the link descriptor
//! derived from it.

use serde::Deserialize;
use std::collections::BTreeSet;

use crate::SchemaError;

/// Libraries every linked slice depends on, whatever the podspec declares.
pub const BASELINE_LIBRARIES: [&str; 2] = ["objc", "System"];

/// The subset of a podspec JSON document that the repackager reads.
///
/// Everything else in the document is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Podspec {
    /// Pod name, when present.
    #[serde(default)]
    pub name: Option<String>,
    /// Pod version, when present.
    #[serde(default)]
    pub version: Option<String>,
    /// Where the binary distribution is downloaded from.
    #[serde(default)]
    pub source: PodSource,
    /// Subspecs in declaration order.
    #[serde(default)]
    pub subspecs: Vec<Subspec>,
}

/// The `source` record of a podspec.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodSource {
    /// Archive URL for binary pods.
    #[serde(default)]
    pub http: Option<String>,
}

/// One entry of `subspecs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subspec {
    /// Subspec name.
    #[serde(default)]
    pub name: Option<String>,
    /// System frameworks this subspec links against.
    #[serde(default)]
    pub frameworks: StringList,
    /// System libraries this subspec links against (without the `lib` prefix).
    #[serde(default)]
    pub libraries: StringList,
}

/// A podspec attribute that may be written as one string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    /// `"frameworks": "CoreLocation"`
    One(String),
    /// `"frameworks": ["CoreLocation", "UIKit"]`
    Many(Vec<String>),
}

impl Default for StringList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl StringList {
    /// Iterate over the declared names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::One(one) => std::slice::from_ref(one),
            Self::Many(many) => many,
        };
        slice.iter().map(String::as_str)
    }
}

impl Podspec {
    /// Parse the JSON printed by `pod spec cat`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPodspec`] if the text is not a JSON object
    /// of the expected shape.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| SchemaError::InvalidPodspec(e.to_string()))?;
        // Every field is optional, so serde would also accept a sequence.
        if !value.is_object() {
            return Err(SchemaError::InvalidPodspec(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| SchemaError::InvalidPodspec(e.to_string()))
    }
}

/// Link requirements and download location of a binary pod.
///
/// Sets are ordered so that the generated link command line is deterministic
/// and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDescriptor {
    /// Archive to download.
    pub download_url: String,
    /// Union of every subspec's frameworks.
    pub frameworks: BTreeSet<String>,
    /// Union of every subspec's libraries plus [`BASELINE_LIBRARIES`].
    pub libraries: BTreeSet<String>,
}

impl DependencyDescriptor {
    /// Build a descriptor from explicit parts. Baseline libraries are added.
    pub fn new<F, L>(download_url: impl Into<String>, frameworks: F, libraries: L) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut libraries: BTreeSet<String> = libraries.into_iter().map(Into::into).collect();
        libraries.extend(BASELINE_LIBRARIES.iter().map(|l| (*l).to_string()));

        Self {
            download_url: download_url.into(),
            frameworks: frameworks.into_iter().map(Into::into).collect(),
            libraries,
        }
    }

    /// Flatten a podspec's subspecs into one descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingSourceUrl`] when `source.http` is absent or
    /// empty.
    pub fn from_podspec(spec: &Podspec) -> Result<Self, SchemaError> {
        let url = spec
            .source
            .http
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(SchemaError::MissingSourceUrl)?;

        let frameworks = spec.subspecs.iter().flat_map(|s| s.frameworks.iter());
        let libraries = spec.subspecs.iter().flat_map(|s| s.libraries.iter());

        Ok(Self::new(url, frameworks, libraries))
    }

    /// File name of the downloaded archive (last URL path segment).
    pub fn archive_name(&self) -> &str {
        crate::filename_from_url(&self.download_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS_SPEC: &str = r#"{
        "name": "GoogleMaps",
        "version": "2.1.0",
        "source": { "http": "https://dl.example.com/GoogleMaps-2.1.0.tar.gz" },
        "subspecs": [
            { "name": "Base", "frameworks": ["CoreLocation", "UIKit"], "libraries": ["z"] },
            { "name": "Maps", "frameworks": ["CoreLocation", "GLKit"], "libraries": "c++" },
            { "name": "Empty" }
        ]
    }"#;

    #[test]
    fn test_non_object_json_rejected() {
        for json in ["[]", "[null]", "\"GoogleMaps\"", "42"] {
            assert!(
                matches!(Podspec::from_json(json), Err(SchemaError::InvalidPodspec(_))),
                "{json}"
            );
        }
        assert!(Podspec::from_json("{}").is_ok());
    }

    #[test]
    fn test_union_of_subspecs() {
        let spec = Podspec::from_json(MAPS_SPEC).unwrap();
        let desc = DependencyDescriptor::from_podspec(&spec).unwrap();

        assert_eq!(
            desc.download_url,
            "https://dl.example.com/GoogleMaps-2.1.0.tar.gz"
        );
        let frameworks: Vec<_> = desc.frameworks.iter().map(String::as_str).collect();
        assert_eq!(frameworks, ["CoreLocation", "GLKit", "UIKit"]);
        let libraries: Vec<_> = desc.libraries.iter().map(String::as_str).collect();
        assert_eq!(libraries, ["System", "c++", "objc", "z"]);
    }

    #[test]
    fn test_baseline_libraries_without_declared_ones() {
        let desc = DependencyDescriptor::new(
            "https://x/y.tar.gz",
            ["CoreLocation"],
            Vec::<String>::new(),
        );
        assert!(desc.libraries.contains("objc"));
        assert!(desc.libraries.contains("System"));
        assert_eq!(desc.libraries.len(), 2);
    }

    #[test]
    fn test_missing_source_url() {
        let spec = Podspec::from_json(r#"{ "name": "NoSource", "subspecs": [] }"#).unwrap();
        assert!(matches!(
            DependencyDescriptor::from_podspec(&spec),
            Err(SchemaError::MissingSourceUrl)
        ));

        let spec = Podspec::from_json(r#"{ "source": { "http": "  " } }"#).unwrap();
        assert!(DependencyDescriptor::from_podspec(&spec).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Podspec::from_json("[INFO] not json"),
            Err(SchemaError::InvalidPodspec(_))
        ));
        assert!(Podspec::from_json(r#"{ "subspecs": 3 }"#).is_err());
    }

    #[test]
    fn test_archive_name() {
        let desc = DependencyDescriptor::new(
            "https://dl.example.com/pods/GoogleMaps-2.1.0.tar.gz",
            Vec::<String>::new(),
            Vec::<String>::new(),
        );
        assert_eq!(desc.archive_name(), "GoogleMaps-2.1.0.tar.gz");
    }
}
