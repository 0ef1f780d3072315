// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic for assembling Magisk font modules.
//!
//! Responsibilities:
//! - Turn override entries into target paths under `system/fonts/`.
//! - Render `module.prop` and the `customize.sh` / `post-fs-data.sh` hooks.
//! - Package everything into a ZIP held in memory until it is written out.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use zip::{CompressionMethod, DateTime, write::FileOptions};

use crate::logic::error::BuildError;
use crate::logic::identity::sanitize_id;
use crate::models::metadata::ModuleMetadata;
use crate::models::overrides::OverrideList;

pub const MODULE_PROP: &str = "module.prop";
pub const FONTS_DIR: &str = "system/fonts/";
pub const CUSTOMIZE_SCRIPT: &str = "customize.sh";
pub const POST_FS_DATA_SCRIPT: &str = "post-fs-data.sh";

/// `versionCode` is fixed; Magisk only uses it to order updates.
const VERSION_CODE: u32 = 1;
/// Mode of the archive file written to disk.
#[cfg(unix)]
const ARCHIVE_FILE_MODE: u32 = 0o644;
/// Extension appended to override entries that have none.
const DEFAULT_EXTENSION: &str = ".ttf";

const POST_FS_DATA_BODY: &str = r##"#!/system/bin/sh
MODDIR=${0%/*}

find "$MODDIR/system" -type f \( -name "*.ttf" -o -name "*.otf" \) | while read -r f; do
  t="${f#$MODDIR}"
  [ -f "$t" ] && mount -o bind "$f" "$t"
done
"##;

/// One file inside the generated module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Forward-slash path relative to the archive root.
    pub path: String,
    pub data: Arc<[u8]>,
    /// Stored with mode 0755 instead of 0644.
    pub executable: bool,
}

/// Fully assembled module, ready to be serialized.
#[derive(Clone, Debug)]
pub struct GeneratedArchive {
    file_name: String,
    entries: Vec<ArchiveEntry>,
    font_count: usize,
}

impl GeneratedArchive {
    /// Suggested download name, `<sanitized id>.zip`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Entries in archive order: manifest, fonts, install hook, boot hook.
    #[cfg(test)]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of distinct files under `system/fonts/`.
    pub fn font_count(&self) -> usize {
        self.font_count
    }

    /// Contents of the entry at `path`.
    #[cfg(test)]
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.data.as_ref())
    }

    /// Serialize the module into ZIP bytes.
    ///
    /// Timestamps are pinned so the same input always yields the same bytes.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for entry in &self.entries {
            let mode = if entry.executable { 0o755 } else { 0o644 };
            log::debug!("Adding {} ({} bytes)", entry.path, entry.data.len());
            zip.start_file(entry.path.as_str(), options.unix_permissions(mode))?;
            zip.write_all(&entry.data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Serialize and write the module to `output`.
    ///
    /// The bytes go to a temporary file next to `output` that is renamed into
    /// place, so a failed write never leaves a truncated archive behind.
    /// Parent directories for `output` are created if missing.
    pub fn write_to(&self, output: &Path) -> Result<()> {
        let bytes = self
            .to_zip_bytes()
            .context("Failed to assemble module archive")?;

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {:?}", dir))?;
        }

        let mut tmp = tempfile::Builder::new()
            .prefix(".fontmod-")
            .suffix(".zip.part")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        // Temp files start out owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(ARCHIVE_FILE_MODE))
                .with_context(|| format!("Failed to set permissions on {:?}", tmp.path()))?;
        }
        tmp.write_all(&bytes)
            .with_context(|| format!("Failed to write archive data for {:?}", output))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("Failed to flush archive data for {:?}", output))?;
        tmp.persist(output)
            .map_err(|err| err.error)
            .with_context(|| format!("Failed to write archive file {:?}", output))?;
        Ok(())
    }
}

/// Build a font module from the font bytes, metadata and override targets.
///
/// Blank metadata fields fall back to their defaults, except the author which
/// must be provided. Each surviving override gets its own copy of the font at
/// `system/fonts/<name>`; when two entries resolve to the same name the later
/// one replaces the earlier one.
///
/// # Errors
///
/// - [`BuildError::NoTargets`] when every override entry is blank.
/// - [`BuildError::InvalidTarget`] when an entry would leave `system/fonts/`.
/// - [`BuildError::MissingAuthor`] when the author is blank.
/// - [`BuildError::EmptyFont`] when `font_bytes` is empty.
pub fn build_module(
    font_bytes: &[u8],
    metadata: &ModuleMetadata,
    overrides: &OverrideList,
) -> Result<GeneratedArchive, BuildError> {
    let targets = target_file_names(overrides)?;
    let meta = metadata.with_defaults();
    if meta.author.is_empty() {
        return Err(BuildError::MissingAuthor);
    }
    if font_bytes.is_empty() {
        return Err(BuildError::EmptyFont);
    }

    let mut entries = vec![ArchiveEntry {
        path: MODULE_PROP.to_string(),
        data: Arc::from(render_module_prop(&meta).into_bytes()),
        executable: false,
    }];

    let font: Arc<[u8]> = Arc::from(font_bytes);
    let mut font_count = 0usize;
    for name in targets {
        let path = format!("{FONTS_DIR}{name}");
        let entry = ArchiveEntry {
            path,
            data: Arc::clone(&font),
            executable: false,
        };
        match entries.iter_mut().find(|existing| existing.path == entry.path) {
            Some(existing) => *existing = entry,
            None => {
                entries.push(entry);
                font_count += 1;
            }
        }
    }

    entries.push(ArchiveEntry {
        path: CUSTOMIZE_SCRIPT.to_string(),
        data: Arc::from(render_customize_script(&meta.name, font_count).into_bytes()),
        executable: true,
    });
    entries.push(ArchiveEntry {
        path: POST_FS_DATA_SCRIPT.to_string(),
        data: Arc::from(render_post_fs_data_script().into_bytes()),
        executable: true,
    });

    Ok(GeneratedArchive {
        file_name: archive_file_name(&meta.id),
        entries,
        font_count,
    })
}

/// Download name for a module id.
pub fn archive_file_name(id: &str) -> String {
    format!("{}.zip", sanitize_id(id))
}

/// Resolve every non-blank override entry into a filename below `system/fonts/`.
///
/// # Errors
///
/// [`BuildError::NoTargets`] when nothing survives, [`BuildError::InvalidTarget`]
/// for entries with empty, `.` or `..` path segments.
pub fn target_file_names(overrides: &OverrideList) -> Result<Vec<String>, BuildError> {
    let targets = overrides
        .cleaned()
        .iter()
        .map(|entry| target_file_name(entry))
        .collect::<Result<Vec<_>, _>>()?;

    if targets.is_empty() {
        return Err(BuildError::NoTargets);
    }
    Ok(targets)
}

fn target_file_name(entry: &str) -> Result<String, BuildError> {
    let normalized = entry.replace('\\', "/");
    let mut name = normalized.trim_start_matches('/').to_string();

    if !name.contains('.') {
        name.push_str(DEFAULT_EXTENSION);
    }

    let escapes = name
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if escapes {
        return Err(BuildError::InvalidTarget(entry.to_string()));
    }
    Ok(name)
}

/// Render `module.prop`. Lines are LF separated without a trailing newline.
pub fn render_module_prop(meta: &ModuleMetadata) -> String {
    [
        format!("id={}", single_line(&meta.id)),
        format!("name={}", single_line(&meta.name)),
        format!("version={}", single_line(&meta.version)),
        format!("versionCode={VERSION_CODE}"),
        format!("author={}", single_line(&meta.author)),
        format!("description={}", single_line(&meta.description)),
    ]
    .join("\n")
}

/// Render the install-time hook.
pub fn render_customize_script(name: &str, font_count: usize) -> String {
    let name = shell_quote_escape(&single_line(name));
    format!(
        "ui_print \"- Installing {name}...\"\n\
         ui_print \"- Overriding {font_count} font file(s)...\"\n\
         \n\
         set_perm_recursive $MODPATH/system 0 0 0755 0644 u:object_r:system_file:s0\n\
         ui_print \"- Done!\"\n"
    )
}

/// Render the boot-time hook that bind-mounts each bundled font over its system path.
pub fn render_post_fs_data_script() -> String {
    POST_FS_DATA_BODY.to_string()
}

// Keeps each manifest key on its own line.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Escape a value for use inside a double-quoted shell string.
fn shell_quote_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Read;

    use tempfile::TempDir;

    use super::*;

    const FONT: &[u8] = b"\x00\x01\x00\x00fake-font-data";

    fn metadata() -> ModuleMetadata {
        ModuleMetadata {
            id: "inter".into(),
            name: "Inter".into(),
            author: "Jane Doe".into(),
            version: "v2.1".into(),
            description: "Inter as system font".into(),
        }
    }

    fn overrides(entries: &[&str]) -> OverrideList {
        OverrideList::new(entries.iter().map(|s| s.to_string()).collect())
    }

    fn font_paths(archive: &GeneratedArchive) -> Vec<&str> {
        archive
            .entries()
            .iter()
            .map(|e| e.path.as_str())
            .filter(|p| p.starts_with(FONTS_DIR))
            .collect()
    }

    fn read_zip(bytes: Vec<u8>) -> HashMap<String, (Vec<u8>, Option<u32>)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut files = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            files.insert(file.name().to_string(), (data, file.unix_mode()));
        }
        files
    }

    #[test]
    fn blank_entries_are_dropped_and_missing_extension_defaults_to_ttf() {
        let archive = build_module(
            FONT,
            &metadata(),
            &overrides(&["Roboto-Regular", "Roboto-Bold.otf", "", "  "]),
        )
        .unwrap();

        assert_eq!(
            font_paths(&archive),
            vec!["system/fonts/Roboto-Regular.ttf", "system/fonts/Roboto-Bold.otf"]
        );
        assert_eq!(archive.font_count(), 2);
        assert_eq!(archive.get("system/fonts/Roboto-Bold.otf"), Some(FONT));
    }

    #[test]
    fn colliding_targets_keep_a_single_entry() {
        let archive = build_module(FONT, &metadata(), &overrides(&["A", "A", " A.ttf "])).unwrap();

        assert_eq!(font_paths(&archive), vec!["system/fonts/A.ttf"]);
        assert_eq!(archive.font_count(), 1);
    }

    #[test]
    fn all_blank_overrides_fail_with_no_targets() {
        for list in [overrides(&[]), overrides(&["", "   ", "\t"])] {
            let err = build_module(FONT, &metadata(), &list).unwrap_err();
            assert!(matches!(err, BuildError::NoTargets));
        }
    }

    #[test]
    fn blank_author_is_rejected() {
        let mut meta = metadata();
        meta.author = "   ".into();

        let err = build_module(FONT, &meta, &overrides(&["A"])).unwrap_err();
        assert!(matches!(err, BuildError::MissingAuthor));
    }

    #[test]
    fn empty_font_is_rejected() {
        let err = build_module(&[], &metadata(), &overrides(&["A"])).unwrap_err();
        assert!(matches!(err, BuildError::EmptyFont));
    }

    #[test]
    fn targets_escaping_font_dir_are_rejected() {
        for bad in ["../../bin/sh", "a/../b.ttf", "a//b.ttf", "./x.ttf"] {
            let err = build_module(FONT, &metadata(), &overrides(&[bad])).unwrap_err();
            assert!(matches!(err, BuildError::InvalidTarget(_)), "{bad}");
        }
    }

    #[test]
    fn backslashes_and_leading_slashes_are_normalized() {
        let archive =
            build_module(FONT, &metadata(), &overrides(&["\\sub\\Font", "/Other.otf"])).unwrap();

        assert_eq!(
            font_paths(&archive),
            vec!["system/fonts/sub/Font.ttf", "system/fonts/Other.otf"]
        );
    }

    #[test]
    fn module_prop_round_trips_metadata() {
        let meta = metadata();
        let archive = build_module(FONT, &meta, &overrides(&["A"])).unwrap();
        let prop = String::from_utf8(archive.get(MODULE_PROP).unwrap().to_vec()).unwrap();

        let parsed: Vec<(&str, &str)> = prop
            .lines()
            .map(|line| line.split_once('=').unwrap())
            .collect();

        assert_eq!(
            parsed,
            vec![
                ("id", "inter"),
                ("name", "Inter"),
                ("version", "v2.1"),
                ("versionCode", "1"),
                ("author", "Jane Doe"),
                ("description", "Inter as system font"),
            ]
        );
        assert!(!prop.ends_with('\n'));
    }

    #[test]
    fn blank_metadata_falls_back_to_defaults() {
        let meta = ModuleMetadata {
            author: "Someone".into(),
            ..Default::default()
        };
        let archive = build_module(FONT, &meta, &overrides(&["A"])).unwrap();
        let prop = String::from_utf8(archive.get(MODULE_PROP).unwrap().to_vec()).unwrap();

        assert!(prop.contains("id=custom_font\n"));
        assert!(prop.contains("name=Custom Font\n"));
        assert!(prop.contains("version=v1.0\n"));
        assert!(prop.ends_with("description=Custom font module"));
        assert_eq!(archive.file_name(), "custom_font.zip");
    }

    #[test]
    fn manifest_values_are_flattened_to_one_line() {
        let mut meta = metadata();
        meta.description = "line one\nline two".into();

        let prop = render_module_prop(&meta.with_defaults());
        assert!(prop.contains("description=line one line two"));
        assert_eq!(prop.lines().count(), 6);
    }

    #[test]
    fn archive_file_name_uses_sanitized_id() {
        let mut meta = metadata();
        meta.id = "My Font!".into();

        let archive = build_module(FONT, &meta, &overrides(&["A"])).unwrap();
        assert_eq!(archive.file_name(), "my_font_.zip");
    }

    #[test]
    fn customize_script_mentions_name_and_count_and_sets_permissions() {
        let script = render_customize_script("Inter", 3);

        assert!(script.contains("ui_print \"- Installing Inter...\""));
        assert!(script.contains("Overriding 3 font file(s)"));
        assert!(
            script.contains("set_perm_recursive $MODPATH/system 0 0 0755 0644 u:object_r:system_file:s0")
        );
    }

    #[test]
    fn customize_script_escapes_shell_metacharacters_in_name() {
        let script = render_customize_script("Evil \"$(rm -rf /)\" `x`", 1);

        assert!(script.contains(r#"Installing Evil \"\$(rm -rf /)\" \`x\`..."#));
    }

    #[test]
    fn post_fs_data_has_shebang_and_strip_prefix() {
        let script = render_post_fs_data_script();

        assert!(script.starts_with("#!/system/bin/sh\n"));
        assert!(script.contains("MODDIR=${0%/*}"));
        assert!(script.contains("${f#$MODDIR}"));
        assert!(script.contains("mount -o bind \"$f\" \"$t\""));
        assert!(!script.contains('\r'));
    }

    #[test]
    fn zip_contains_expected_layout_and_modes() {
        let archive =
            build_module(FONT, &metadata(), &overrides(&["Roboto-Regular", "Roboto-Bold"])).unwrap();
        let files = read_zip(archive.to_zip_bytes().unwrap());

        let mut names: Vec<&str> = files.keys().map(String::as_str).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "customize.sh",
                "module.prop",
                "post-fs-data.sh",
                "system/fonts/Roboto-Bold.ttf",
                "system/fonts/Roboto-Regular.ttf",
            ]
        );

        let (font, font_mode) = &files["system/fonts/Roboto-Bold.ttf"];
        assert_eq!(font.as_slice(), FONT);
        assert_eq!(font_mode.map(|m| m & 0o777), Some(0o644));

        let (script, script_mode) = &files["post-fs-data.sh"];
        assert!(script.starts_with(b"#!/system/bin/sh"));
        assert_eq!(script_mode.map(|m| m & 0o777), Some(0o755));
    }

    #[test]
    fn zip_output_is_deterministic() {
        let archive = build_module(FONT, &metadata(), &overrides(&["A", "B"])).unwrap();

        assert_eq!(archive.to_zip_bytes().unwrap(), archive.to_zip_bytes().unwrap());
    }

    #[test]
    fn write_to_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("nested").join("inter.zip");
        let archive = build_module(FONT, &metadata(), &overrides(&["A"])).unwrap();

        archive.write_to(&output).unwrap();

        let files = read_zip(fs::read(&output).unwrap());
        assert!(files.contains_key("system/fonts/A.ttf"));
    }

    #[test]
    fn write_to_replaces_existing_file_without_leftovers() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("inter.zip");
        fs::write(&output, vec![0xAA; 64 * 1024]).unwrap();
        let archive = build_module(FONT, &metadata(), &overrides(&["A"])).unwrap();

        archive.write_to(&output).unwrap();

        assert_eq!(fs::read(&output).unwrap(), archive.to_zip_bytes().unwrap());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&output).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, ARCHIVE_FILE_MODE);
        }
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["inter.zip"]);
    }

    #[test]
    fn failed_write_leaves_no_temp_file_behind() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("inter.zip");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("keep"), b"x").unwrap();
        let archive = build_module(FONT, &metadata(), &overrides(&["A"])).unwrap();

        assert!(archive.write_to(&output).is_err());

        assert!(output.join("keep").is_file());
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["inter.zip"]);
    }
}
