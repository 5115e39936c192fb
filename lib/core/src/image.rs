//! Image reference resolution
//!
//! Every lookup goes through [`DirListing::resolve`]: exact name, then a
//! case-insensitive match, then candidate names compared in a "clean" form
//! (lowercase, spaces and dashes folded to underscores). The load-time repair
//! pass, the per-request accessor and the file server all share it.

use crate::record::{is_missing, CatalogRecord, DEFAULT_IMAGE};
use ahash::{AHashMap, AHashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Fallback files tried, in order, when a requested image is not on disk
pub const DEFAULT_IMAGE_FILES: [&str; 4] = ["default.jpg", "default.png", "no-image.jpg", "placeholder.jpg"];

/// URL prefix under which images are served
pub const IMAGE_ROUTE: &str = "/api/images/";

pub fn has_image_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Normalize a declared image reference: blanks and null markers become the
/// default image, names without an image extension get `.jpg`.
pub fn standardize_image_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return DEFAULT_IMAGE.to_string();
    }
    if has_image_extension(trimmed) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.jpg")
    }
}

/// Lowercase with spaces and dashes replaced by underscores
pub fn clean_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// File names derived from a record's own name and brand
pub fn candidate_names(name: &str, brand: &str) -> Vec<String> {
    let name = clean_name(name);
    let brand = clean_name(brand);
    vec![
        format!("{name}.jpg"),
        format!("{brand}_{name}.jpg"),
        format!("{name}.png"),
        format!("{brand}.jpg"),
    ]
}

/// A plain file name that cannot escape the directory it is joined to
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Snapshot of the regular files in one directory
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    exact: AHashSet<String>,
    by_lower: AHashMap<String, String>,
    by_clean: AHashMap<String, String>,
}

impl DirListing {
    pub fn read(dir: &Path) -> std::io::Result<Self> {
        let mut names: Vec<String> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        // First name in sorted order wins when two files fold to the same key
        names.sort();

        let mut listing = Self::default();
        for name in names {
            listing
                .by_lower
                .entry(name.to_lowercase())
                .or_insert_with(|| name.clone());
            if has_image_extension(&name) {
                listing
                    .by_clean
                    .entry(clean_name(&name))
                    .or_insert_with(|| name.clone());
            }
            listing.exact.insert(name);
        }
        Ok(listing)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    pub fn find_exact(&self, filename: &str) -> Option<&str> {
        self.exact.get(filename).map(String::as_str)
    }

    pub fn find_case_insensitive(&self, filename: &str) -> Option<&str> {
        self.by_lower.get(&filename.to_lowercase()).map(String::as_str)
    }

    /// Resolve a file name against this directory, falling back to `candidates`
    pub fn resolve(&self, filename: &str, candidates: &[String]) -> Option<String> {
        let filename = filename.trim();
        if is_safe_filename(filename) {
            if let Some(found) = self
                .find_exact(filename)
                .or_else(|| self.find_case_insensitive(filename))
            {
                return Some(found.to_string());
            }
        }

        candidates
            .iter()
            .find_map(|candidate| self.by_clean.get(&clean_name(candidate)))
            .cloned()
    }
}

/// Resolve `filename` inside `dir`, trying `candidates` when it is absent.
///
/// Returns the actual on-disk name, or `None` if nothing matches or the
/// directory cannot be read.
pub fn resolve_in_dir(dir: &Path, filename: &str, candidates: &[String]) -> Option<String> {
    DirListing::read(dir).ok()?.resolve(filename, candidates)
}

/// Point every record at an image that exists in `dir`.
///
/// Records whose image cannot be found by name or by candidate get the
/// default image. When `dir` cannot be read the records are returned as they are.
pub fn repair_image_references(records: Vec<CatalogRecord>, dir: &Path) -> Vec<CatalogRecord> {
    let listing = match DirListing::read(dir) {
        Ok(listing) => listing,
        Err(e) => {
            warn!("Image folder {:?} not readable ({}), keeping declared image names", dir, e);
            return records;
        }
    };

    let mut replaced = 0usize;
    let mut defaulted = 0usize;
    let repaired = records
        .into_iter()
        .map(|record| {
            let candidates = candidate_names(&record.name, &record.brand);
            match listing.resolve(&record.image, &candidates) {
                Some(found) if found == record.image => record,
                Some(found) => {
                    debug!("Image for {:?}: {:?} -> {:?}", record.name, record.image, found);
                    replaced += 1;
                    CatalogRecord { image: found, ..record }
                }
                None => {
                    debug!("No image found for {:?}, using default", record.name);
                    defaulted += 1;
                    CatalogRecord {
                        image: DEFAULT_IMAGE.to_string(),
                        ..record
                    }
                }
            }
        })
        .collect();

    info!(
        "Image validation completed: {} files in {:?}, {} references replaced, {} defaulted",
        listing.len(),
        dir,
        replaced,
        defaulted
    );
    repaired
}

/// Servable URL for an image, checked against `dir` at call time
pub fn image_url(dir: &Path, filename: &str) -> String {
    let found = if filename.trim().is_empty() {
        None
    } else {
        resolve_in_dir(dir, filename, &[])
    };
    format!("{IMAGE_ROUTE}{}", found.as_deref().unwrap_or(DEFAULT_IMAGE))
}

/// Locates image files across an ordered list of directories
#[derive(Debug, Clone)]
pub struct ImageResolver {
    dirs: Vec<PathBuf>,
}

impl ImageResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Path of the file to serve for `filename`.
    ///
    /// Exact names win over case-insensitive ones across all directories;
    /// after that the default image files are tried in each directory.
    pub fn locate(&self, filename: &str) -> Option<PathBuf> {
        let filename = filename.trim();
        let listings: Vec<(&PathBuf, DirListing)> = self
            .dirs
            .iter()
            .filter_map(|dir| DirListing::read(dir).ok().map(|listing| (dir, listing)))
            .collect();

        if is_safe_filename(filename) {
            for (dir, listing) in &listings {
                if let Some(name) = listing.find_exact(filename) {
                    return Some(dir.join(name));
                }
            }
            for (dir, listing) in &listings {
                if let Some(name) = listing.find_case_insensitive(filename) {
                    return Some(dir.join(name));
                }
            }
        }

        for (dir, listing) in &listings {
            for default in DEFAULT_IMAGE_FILES {
                if let Some(name) = listing.find_exact(default) {
                    return Some(dir.join(name));
                }
            }
        }

        warn!("Image not found: {}", filename);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"img").unwrap();
    }

    fn record(name: &str, brand: &str, image: &str) -> CatalogRecord {
        CatalogRecord {
            name: name.to_string(),
            brand: brand.to_string(),
            link: None,
            connection: "Wired".to_string(),
            power: "Unknown".to_string(),
            battery_life: "Unknown".to_string(),
            buttons_type: "Mechanical".to_string(),
            size: "Medium".to_string(),
            shape: "Symmetrical".to_string(),
            category: "Gaming".to_string(),
            price: 1.0,
            weight: 1.0,
            dpi: 1.0,
            polling_rate: 1.0,
            buttons: 1.0,
            image: image.to_string(),
        }
    }

    #[test]
    fn test_standardize_image_name() {
        assert_eq!(standardize_image_name(""), "default.jpg");
        assert_eq!(standardize_image_name("  nan "), "default.jpg");
        assert_eq!(standardize_image_name("NONE"), "default.jpg");
        assert_eq!(standardize_image_name(" g502 "), "g502.jpg");
        assert_eq!(standardize_image_name("viper.PNG"), "viper.PNG");
        assert_eq!(standardize_image_name("pulsefire.webp"), "pulsefire.webp");
    }

    #[test]
    fn test_candidate_names() {
        let names = candidate_names("G Pro-X", "Logitech");
        assert_eq!(
            names,
            vec!["g_pro_x.jpg", "logitech_g_pro_x.jpg", "g_pro_x.png", "logitech.jpg"]
        );
    }

    #[test]
    fn test_resolve_in_dir_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Viper.JPG");
        touch(dir.path(), "g_pro_x.png");

        assert_eq!(resolve_in_dir(dir.path(), "Viper.JPG", &[]).as_deref(), Some("Viper.JPG"));
        assert_eq!(resolve_in_dir(dir.path(), "viper.jpg", &[]).as_deref(), Some("Viper.JPG"));
        let candidates = candidate_names("G Pro X", "Logitech");
        assert_eq!(
            resolve_in_dir(dir.path(), "missing.jpg", &candidates).as_deref(),
            Some("g_pro_x.png")
        );
        assert_eq!(resolve_in_dir(dir.path(), "missing.jpg", &[]), None);
        assert_eq!(resolve_in_dir(&dir.path().join("nope"), "Viper.JPG", &[]), None);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        assert_eq!(resolve_in_dir(dir.path(), "../a.jpg", &[]), None);
        assert_eq!(resolve_in_dir(dir.path(), "sub/a.jpg", &[]), None);
    }

    #[test]
    fn test_repair_image_references() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "viper.jpg");
        touch(dir.path(), "razer_deathadder.jpg");

        let records = vec![
            record("Viper", "Razer", "VIPER.jpg"),
            record("DeathAdder", "Razer", "da.jpg"),
            record("Orochi", "Razer", "orochi.jpg"),
        ];
        let repaired = repair_image_references(records, dir.path());
        assert_eq!(repaired[0].image, "viper.jpg");
        assert_eq!(repaired[1].image, "razer_deathadder.jpg");
        assert_eq!(repaired[2].image, DEFAULT_IMAGE);
    }

    #[test]
    fn test_repair_without_directory_keeps_names() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("Viper", "Razer", "viper.jpg")];
        let repaired = repair_image_references(records.clone(), &dir.path().join("missing"));
        assert_eq!(repaired, records);
    }

    #[test]
    fn test_image_url_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Viper.jpg");
        assert_eq!(image_url(dir.path(), "viper.jpg"), "/api/images/Viper.jpg");
        assert_eq!(image_url(dir.path(), "gone.jpg"), "/api/images/default.jpg");
        assert_eq!(image_url(dir.path(), "  "), "/api/images/default.jpg");
    }

    #[test]
    fn test_image_resolver_across_dirs() {
        let primary = tempfile::tempdir().unwrap();
        let secondary = tempfile::tempdir().unwrap();
        touch(primary.path(), "Viper.jpg");
        touch(secondary.path(), "viper.jpg");
        touch(secondary.path(), "placeholder.jpg");

        let resolver = ImageResolver::new(vec![primary.path().to_path_buf(), secondary.path().to_path_buf()]);
        assert_eq!(resolver.locate("viper.jpg"), Some(secondary.path().join("viper.jpg")));
        assert_eq!(resolver.locate("VIPER.JPG"), Some(primary.path().join("Viper.jpg")));
        assert_eq!(resolver.locate("gone.jpg"), Some(secondary.path().join("placeholder.jpg")));

        let empty = ImageResolver::new(vec![primary.path().join("nothing")]);
        assert_eq!(empty.locate("viper.jpg"), None);
    }
}
