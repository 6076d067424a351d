//! Framework bundle discovery and restructuring.
//!
//! The vendor archive ships static frameworks laid out as
//!
//! ```text
//! Subspecs/<X>/Frameworks/<Name>.framework/
//! ├── <Name> -> Versions/Current/<Name>
//! ├── Resources -> Versions/Current/Resources
//! └── Versions/
//!     ├── Current -> A
//!     └── A/
//!         ├── <Name>
//!         └── Resources/
//!             └── <Name>.bundle/Info.plist
//! ```
//!
//! [`FrameworkBundle::restructure`] turns the target framework into a dynamic
//! framework: the Info.plist and every resource move up to `Versions/A`, each
//! is linked from the framework root through `Versions/Current`, the
//! `Resources` directory disappears and the binary is replaced by the merged
//! universal dylib.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::tool::{self, ExternalTool};

pub const VERSION_DIR: &str = "Versions/A";
pub const CURRENT_VERSION: &str = "Versions/Current";
pub const RESOURCES: &str = "Resources";
pub const INFO_PLIST: &str = "Info.plist";

/// Component binaries and the target framework found in an extracted archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    /// The `<Name>.framework` directory that becomes the deliverable.
    pub framework_dir: PathBuf,
    /// `Versions/A/<X>` of every framework under `Subspecs/*/Frameworks`,
    /// sorted by path. Includes the target framework's own binary.
    pub inputs: Vec<PathBuf>,
}

/// Find every subspec framework and the one named `name`.
///
/// # Errors
///
/// Returns [`Error::BundleCorruption`] if there is no `Subspecs` directory, a
/// framework lacks its versioned binary, or no `<name>.framework` exists.
pub fn discover(bundle_root: &Path, name: &str) -> Result<BundleLayout> {
    let subspecs = bundle_root.join("Subspecs");
    if !subspecs.is_dir() {
        return Err(Error::corruption(&subspecs, "archive has no Subspecs directory"));
    }

    let mut framework_dir = None;
    let mut inputs = Vec::new();

    for entry in walkdir::WalkDir::new(&subspecs)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
    {
        let path = entry.path();
        let in_frameworks = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == "Frameworks");
        let is_framework = path.extension().is_some_and(|ext| ext == "framework");
        if !in_frameworks || !is_framework {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let binary = path.join(VERSION_DIR).join(stem);
        if binary.symlink_metadata().is_err() {
            return Err(Error::corruption(&binary, "framework binary missing"));
        }
        tracing::debug!(binary = %binary.display(), "found component");
        inputs.push(binary);

        if stem == name {
            framework_dir = Some(path.to_path_buf());
        }
    }

    let framework_dir = framework_dir.ok_or_else(|| {
        Error::corruption(&subspecs, format!("no {name}.framework under Subspecs/*/Frameworks"))
    })?;

    Ok(BundleLayout {
        framework_dir,
        inputs,
    })
}

/// A framework directory being rewritten into its distributable layout.
#[derive(Debug, Clone)]
pub struct FrameworkBundle {
    dir: PathBuf,
    name: String,
}

/// What [`FrameworkBundle::restructure`] checked before touching anything.
#[derive(Debug)]
struct Plan {
    /// `None` when `Versions/A/Info.plist` is already in place.
    info_plist_source: Option<PathBuf>,
    entries: Vec<String>,
}

impl FrameworkBundle {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<framework>/Versions/A`
    pub fn version_dir(&self) -> PathBuf {
        self.dir.join(VERSION_DIR)
    }

    /// `<framework>/Versions/A/Resources`
    pub fn resources_dir(&self) -> PathBuf {
        self.version_dir().join(RESOURCES)
    }

    /// `<framework>/Versions/A/<Name>`
    pub fn binary_path(&self) -> PathBuf {
        self.version_dir().join(&self.name)
    }

    /// Rewrite the bundle in place.
    ///
    /// Steps run strictly in order and the first failure aborts:
    ///
    /// 1. copy `Resources/<Name>.bundle/Info.plist` to `Versions/A/Info.plist`
    ///    (`Resources/Info.plist` when the bundle has none; skipped when
    ///    neither exists but `Versions/A/Info.plist` already does)
    /// 2. set its `CFBundleExecutable` to `<Name>`
    /// 3. link `Info.plist -> Versions/Current/Info.plist` at the root
    /// 4. move each resource entry to `Versions/A` and link it from the root
    /// 5. remove the empty `Resources` directory and the root `Resources` link
    /// 6. replace `Versions/A/<Name>` with `merged`
    ///
    /// Everything that can be checked up front is checked before step 1, so a
    /// bundle that was already restructured (or is otherwise malformed) is
    /// refused without being modified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BundleCorruption`] for any missing or unexpected entry,
    /// [`Error::ToolFailure`] if `plutil` fails.
    pub async fn restructure(
        &self,
        tool: &dyn ExternalTool,
        reporter: &dyn Reporter,
        merged: &Path,
    ) -> Result<()> {
        let plan = self.plan(merged)?;

        let info_plist = match &plan.info_plist_source {
            Some(source) => {
                reporter.info("Copying Info.plist ...");
                self.copy_info_plist(source)?
            }
            None => self.version_dir().join(INFO_PLIST),
        };

        reporter.info("Modifying Info.plist ...");
        self.patch_info_plist(tool, reporter, &info_plist).await?;

        reporter.info("Symlinking Info.plist ...");
        self.link_from_root(INFO_PLIST)?;

        reporter.info("Moving bundles out of Resources ...");
        self.relocate_resources(reporter, &plan.entries)?;

        reporter.info("Removing Resources directory and symlinks ...");
        self.remove_resources()?;

        reporter.info("Replacing binary ...");
        self.replace_binary(merged)?;

        tracing::info!(framework = %self.dir.display(), "restructured framework");
        Ok(())
    }

    fn plan(&self, merged: &Path) -> Result<Plan> {
        let current = self.dir.join(CURRENT_VERSION);
        if current.symlink_metadata().is_err() {
            return Err(Error::corruption(&current, "missing current-version link"));
        }

        let resources = self.resources_dir();
        if !resources.is_dir() {
            return Err(Error::corruption(
                &resources,
                "resource directory missing (bundle already restructured?)",
            ));
        }

        let bundle_plist = resources
            .join(format!("{}.bundle", self.name))
            .join(INFO_PLIST);
        let loose_plist = resources.join(INFO_PLIST);
        let promoted = self.version_dir().join(INFO_PLIST);
        let info_plist_source = if bundle_plist.is_file() {
            Some(bundle_plist)
        } else if loose_plist.is_file() {
            Some(loose_plist)
        } else if promoted.is_file() {
            None
        } else {
            return Err(Error::corruption(&bundle_plist, "no Info.plist to promote"));
        };

        if info_plist_source.is_some() && promoted.symlink_metadata().is_ok() {
            return Err(Error::corruption(&promoted, "already exists"));
        }
        let root_plist = self.dir.join(INFO_PLIST);
        if root_plist.symlink_metadata().is_ok() {
            return Err(Error::corruption(&root_plist, "already exists"));
        }

        let mut entries = Vec::new();
        let listing = std::fs::read_dir(&resources)
            .map_err(|e| Error::io(format!("Failed to list {}", resources.display()), e))?;
        for entry in listing {
            let entry = entry.map_err(|e| Error::io("Failed to read resource entry", e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                return Err(Error::corruption(entry.path(), "non UTF-8 resource name"));
            };
            if name != INFO_PLIST {
                for target in [self.version_dir().join(&name), self.dir.join(&name)] {
                    if target.symlink_metadata().is_ok() {
                        return Err(Error::corruption(
                            &target,
                            format!("resource '{name}' would overwrite an existing entry"),
                        ));
                    }
                }
            }
            entries.push(name);
        }
        entries.sort();

        let binary = self.binary_path();
        if binary.symlink_metadata().is_err() {
            return Err(Error::corruption(&binary, "framework binary missing"));
        }
        if !merged.is_file() {
            return Err(Error::corruption(merged, "merged binary missing"));
        }

        Ok(Plan {
            info_plist_source,
            entries,
        })
    }

    fn copy_info_plist(&self, source: &Path) -> Result<PathBuf> {
        let target = self.version_dir().join(INFO_PLIST);
        std::fs::copy(source, &target).map_err(|e| {
            Error::io(
                format!("Failed to copy {} to {}", source.display(), target.display()),
                e,
            )
        })?;
        Ok(target)
    }

    async fn patch_info_plist(
        &self,
        tool: &dyn ExternalTool,
        reporter: &dyn Reporter,
        plist: &Path,
    ) -> Result<()> {
        let args = vec![
            "-replace".to_string(),
            "CFBundleExecutable".to_string(),
            "-string".to_string(),
            self.name.clone(),
            plist.to_string_lossy().into_owned(),
        ];
        let output = tool::execute(tool, reporter, "plutil", &args).await?;
        if !output.success() {
            return Err(Error::ToolFailure {
                program: "plutil".to_string(),
                output: output.combined(),
            });
        }
        Ok(())
    }

    /// Create `<framework>/<entry> -> Versions/Current/<entry>`.
    fn link_from_root(&self, entry: &str) -> Result<()> {
        let link = self.dir.join(entry);
        let target = Path::new(CURRENT_VERSION).join(entry);
        symlink(&target, &link)
            .map_err(|e| Error::io(format!("Failed to symlink {}", link.display()), e))
    }

    fn relocate_resources(&self, reporter: &dyn Reporter, entries: &[String]) -> Result<()> {
        let resources = self.resources_dir();
        let version_dir = self.version_dir();

        for name in entries {
            let source = resources.join(name);

            // The promoted copy already sits at Versions/A/Info.plist with its
            // root link; the loose original would collide with it.
            if name == INFO_PLIST {
                tracing::warn!(path = %source.display(), "dropping loose Info.plist");
                reporter.warning(&format!(
                    "Dropping {} in favour of the promoted Versions/A/Info.plist",
                    source.display()
                ));
                std::fs::remove_file(&source).map_err(|e| {
                    Error::io(format!("Failed to remove {}", source.display()), e)
                })?;
                continue;
            }

            move_entry(&source, &version_dir.join(name))?;
            self.link_from_root(name)?;
        }
        Ok(())
    }

    fn remove_resources(&self) -> Result<()> {
        let resources = self.resources_dir();
        remove_empty_dir(&resources)?;

        let root_entry = self.dir.join(RESOURCES);
        match root_entry.symlink_metadata() {
            Ok(meta) if meta.file_type().is_symlink() => std::fs::remove_file(&root_entry)
                .map_err(|e| Error::io(format!("Failed to remove {}", root_entry.display()), e)),
            Ok(meta) if meta.is_dir() => remove_empty_dir(&root_entry),
            Ok(_) => Err(Error::corruption(&root_entry, "unexpected file named Resources")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(format!("Failed to stat {}", root_entry.display()), e)),
        }
    }

    fn replace_binary(&self, merged: &Path) -> Result<()> {
        let binary = self.binary_path();
        // `merged` may live on another filesystem.
        if std::fs::rename(merged, &binary).is_err() {
            std::fs::copy(merged, &binary).map_err(|e| {
                Error::io(format!("Failed to replace {}", binary.display()), e)
            })?;
            std::fs::remove_file(merged)
                .map_err(|e| Error::io(format!("Failed to remove {}", merged.display()), e))?;
        }
        Ok(())
    }
}

/// Move a file or directory, falling back to copy-and-delete.
fn move_entry(source: &Path, target: &Path) -> Result<()> {
    match std::fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(rename_err) => move_by_copy(source, target, &rename_err),
    }
}

/// Copy-and-delete move used when `rename` is refused.
fn move_by_copy(source: &Path, target: &Path, rename_err: &std::io::Error) -> Result<()> {
    tracing::debug!(source = %source.display(), error = %rename_err, "rename failed, copying");

    let parent = target
        .parent()
        .ok_or_else(|| Error::corruption(target, "no parent directory"))?;
    let options = fs_extra::dir::CopyOptions::new().copy_inside(true);
    fs_extra::move_items(&[source], parent, &options).map_err(|e| {
        Error::corruption(
            source,
            format!(
                "Failed to move to {} (rename: {rename_err}; copy: {e})",
                target.display()
            ),
        )
    })?;
    Ok(())
}

/// Remove a directory that must be empty by now.
///
/// A leftover entry means an earlier move silently failed, which is treated as
/// corruption rather than something to clean up.
fn remove_empty_dir(dir: &Path) -> Result<()> {
    let leftovers = std::fs::read_dir(dir)
        .map_err(|e| Error::io(format!("Failed to list {}", dir.display()), e))?
        .filter_map(std::result::Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    if !leftovers.is_empty() {
        return Err(Error::corruption(
            dir,
            format!("not empty after relocation: {}", leftovers.join(", ")),
        ));
    }

    std::fs::remove_dir(dir).map_err(|e| Error::io(format!("Failed to remove {}", dir.display()), e))
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "framework bundles require symlink support",
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use crate::reporter::fake::RecordingReporter;
    use crate::tool::ToolOutput;
    use crate::tool::fake::RecordingTool;
    use std::os::unix::fs::symlink;

    /// Build `<root>/<name>.framework` the way the vendor archive ships it.
    fn framework(root: &Path, name: &str, resources: &[&str]) -> FrameworkBundle {
        let dir = root.join(format!("{name}.framework"));
        let version = dir.join(VERSION_DIR);
        let res = version.join(RESOURCES);
        std::fs::create_dir_all(&res).unwrap();
        std::fs::write(version.join(name), "static\n").unwrap();
        symlink("A", dir.join("Versions/Current")).unwrap();
        symlink(format!("Versions/Current/{name}"), dir.join(name)).unwrap();
        symlink("Versions/Current/Resources", dir.join(RESOURCES)).unwrap();

        for entry in resources {
            if entry.ends_with(".bundle") {
                std::fs::create_dir_all(res.join(entry)).unwrap();
                std::fs::write(res.join(entry).join(INFO_PLIST), "bundle-plist\n").unwrap();
                std::fs::write(res.join(entry).join("icon.png"), "png").unwrap();
            } else {
                std::fs::write(res.join(entry), format!("{entry}\n")).unwrap();
            }
        }
        FrameworkBundle::new(dir, name)
    }

    fn merged(root: &Path) -> PathBuf {
        let path = root.join("merged.dylib");
        std::fs::write(&path, "x86_64 arm64\n").unwrap();
        path
    }

    fn link_target(path: &Path) -> PathBuf {
        std::fs::read_link(path).unwrap()
    }

    #[tokio::test]
    async fn test_restructure_google_maps_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "GoogleMaps", &["GoogleMaps.bundle", "GMSCoreResources.bundle"]);
        let tool = RecordingTool::new();

        fw.restructure(&tool, &NullReporter, &merged(tmp.path()))
            .await
            .unwrap();

        let version = fw.version_dir();
        for entry in ["GoogleMaps.bundle", "GMSCoreResources.bundle"] {
            assert!(version.join(entry).is_dir(), "{entry}");
            assert_eq!(
                link_target(&fw.dir().join(entry)),
                Path::new("Versions/Current").join(entry)
            );
            assert!(fw.dir().join(entry).join("icon.png").is_file());
        }
        assert_eq!(
            link_target(&fw.dir().join(INFO_PLIST)),
            PathBuf::from("Versions/Current/Info.plist")
        );
        let plist = std::fs::read_to_string(fw.dir().join(INFO_PLIST)).unwrap();
        assert!(plist.starts_with("bundle-plist"));
        assert!(plist.contains("CFBundleExecutable=GoogleMaps"));

        assert!(!fw.resources_dir().exists());
        assert!(fw.dir().join(RESOURCES).symlink_metadata().is_err());

        assert_eq!(
            std::fs::read_to_string(fw.binary_path()).unwrap(),
            "x86_64 arm64\n"
        );
        assert!(!tmp.path().join("merged.dylib").exists());

        let plutil = tool.calls_to("plutil");
        assert_eq!(plutil.len(), 1);
        assert_eq!(plutil[0][..4], ["-replace", "CFBundleExecutable", "-string", "GoogleMaps"]);
    }

    #[tokio::test]
    async fn test_bundle_and_loose_info_plist() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "A", &["A.bundle", "Info.plist"]);
        let reporter = RecordingReporter::default();

        fw.restructure(&RecordingTool::new(), &reporter, &merged(tmp.path()))
            .await
            .unwrap();

        let warnings = reporter.lines("warning");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Resources/Info.plist"));

        let version = fw.version_dir();
        assert!(version.join("A.bundle").is_dir());
        assert!(version.join(INFO_PLIST).is_file());
        for entry in ["A.bundle", INFO_PLIST] {
            let link = fw.dir().join(entry);
            assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
            assert_eq!(link_target(&link), Path::new(CURRENT_VERSION).join(entry));
            assert!(link.exists(), "{entry} should resolve");
        }
        assert!(!fw.resources_dir().exists());
    }

    #[tokio::test]
    async fn test_loose_info_plist_used_when_bundle_has_none() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "Kit", &["Info.plist", "strings.txt"]);

        fw.restructure(&RecordingTool::new(), &NullReporter, &merged(tmp.path()))
            .await
            .unwrap();

        let plist = std::fs::read_to_string(fw.version_dir().join(INFO_PLIST)).unwrap();
        assert!(plist.starts_with("Info.plist"));
        assert!(fw.version_dir().join("strings.txt").is_file());
    }

    #[tokio::test]
    async fn test_restructure_twice_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "GoogleMaps", &["GoogleMaps.bundle"]);
        fw.restructure(&RecordingTool::new(), &NullReporter, &merged(tmp.path()))
            .await
            .unwrap();

        let tool = RecordingTool::new();
        let err = fw
            .restructure(&tool, &NullReporter, &merged(tmp.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BundleCorruption { .. }));
        assert!(tool.calls().is_empty());
        assert!(fw.version_dir().join("GoogleMaps.bundle").is_dir());
        assert_eq!(
            std::fs::read_to_string(fw.binary_path()).unwrap(),
            "x86_64 arm64\n"
        );
    }

    #[tokio::test]
    async fn test_empty_resources_still_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "Solo", &[]);
        std::fs::write(fw.version_dir().join(INFO_PLIST), "versioned\n").unwrap();

        fw.restructure(&RecordingTool::new(), &NullReporter, &merged(tmp.path()))
            .await
            .unwrap();

        assert!(!fw.resources_dir().exists());
        assert!(fw.dir().join(RESOURCES).symlink_metadata().is_err());
        let plist = std::fs::read_to_string(fw.dir().join(INFO_PLIST)).unwrap();
        assert_eq!(plist, "versioned\nCFBundleExecutable=Solo\n");
    }

    #[tokio::test]
    async fn test_empty_resources_without_any_plist() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "Solo", &[]);

        let err = fw
            .restructure(&RecordingTool::new(), &NullReporter, &merged(tmp.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BundleCorruption { .. }));
        assert!(fw.resources_dir().is_dir());
    }

    #[test]
    fn test_move_by_copy_moves_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Resources/GoogleMaps.bundle");
        std::fs::create_dir_all(source.join("nested")).unwrap();
        std::fs::write(source.join("nested/icon.png"), "png").unwrap();
        let target = tmp.path().join("A/GoogleMaps.bundle");
        std::fs::create_dir_all(tmp.path().join("A")).unwrap();

        let cross_device = std::io::Error::other("Invalid cross-device link");
        move_by_copy(&source, &target, &cross_device).unwrap();

        assert!(!source.exists());
        assert_eq!(
            std::fs::read_to_string(target.join("nested/icon.png")).unwrap(),
            "png"
        );
    }

    #[test]
    fn test_move_failure_keeps_rename_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("missing.bundle");
        let target = tmp.path().join("A/missing.bundle");

        let rename_err = std::io::Error::other("Invalid cross-device link");
        let err = move_by_copy(&source, &target, &rename_err).unwrap_err();
        assert!(matches!(
            err,
            Error::BundleCorruption { ref reason, .. } if reason.contains("rename: Invalid cross-device link")
        ));

        let err = move_entry(&source, &target).unwrap_err();
        assert!(matches!(err, Error::BundleCorruption { ref reason, .. } if reason.contains("rename:")));
    }

    #[test]
    fn test_non_empty_resources_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Resources")).unwrap();
        std::fs::write(dir.path().join("Resources/stale.nib"), "").unwrap();

        let err = remove_empty_dir(&dir.path().join("Resources")).unwrap_err();
        assert!(matches!(err, Error::BundleCorruption { ref reason, .. } if reason.contains("stale.nib")));
    }

    #[tokio::test]
    async fn test_colliding_resource_is_refused_before_mutation() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "GoogleMaps", &["GoogleMaps.bundle", "Headers"]);
        std::fs::create_dir_all(fw.version_dir().join("Headers")).unwrap();

        let err = fw
            .restructure(&RecordingTool::new(), &NullReporter, &merged(tmp.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BundleCorruption { .. }));
        assert!(!fw.version_dir().join(INFO_PLIST).exists());
        assert!(fw.resources_dir().join("GoogleMaps.bundle").is_dir());
    }

    #[tokio::test]
    async fn test_plutil_failure_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let fw = framework(tmp.path(), "GoogleMaps", &["GoogleMaps.bundle"]);
        let tool = RecordingTool::new().failing(
            "plutil",
            None,
            ToolOutput::failed(1, "Info.plist: file does not exist or is not readable"),
        );

        let err = fw
            .restructure(&tool, &NullReporter, &merged(tmp.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ToolFailure { .. }));
        assert!(fw.resources_dir().join("GoogleMaps.bundle").is_dir());
        assert!(fw.dir().join(INFO_PLIST).symlink_metadata().is_err());
    }

    #[test]
    fn test_discover_components() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let base = root.join("Subspecs/Base/Frameworks");
        let maps = root.join("Subspecs/Maps/Frameworks");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::create_dir_all(&maps).unwrap();
        framework(&base, "GoogleMapsBase", &[]);
        framework(&maps, "GoogleMaps", &["GoogleMaps.bundle"]);
        framework(&maps, "GoogleMapsCore", &[]);

        let layout = discover(root, "GoogleMaps").unwrap();

        assert_eq!(layout.framework_dir, maps.join("GoogleMaps.framework"));
        assert_eq!(
            layout.inputs,
            vec![
                base.join("GoogleMapsBase.framework/Versions/A/GoogleMapsBase"),
                maps.join("GoogleMaps.framework/Versions/A/GoogleMaps"),
                maps.join("GoogleMapsCore.framework/Versions/A/GoogleMapsCore"),
            ]
        );
    }

    #[test]
    fn test_discover_missing_target() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("Subspecs/Base/Frameworks");
        std::fs::create_dir_all(&base).unwrap();
        framework(&base, "GoogleMapsBase", &[]);

        assert!(matches!(
            discover(tmp.path(), "GoogleMaps"),
            Err(Error::BundleCorruption { .. })
        ));
        assert!(discover(&tmp.path().join("nowhere"), "GoogleMaps").is_err());
    }
}
