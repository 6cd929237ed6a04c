//! Output directory scaffolding
//!
//! Writes the pages the bundler does not produce: the storefront preview page,
//! the admin home page and a minimal web manifest.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;

const APP_PAGE: &str = "app.html";
const MANIFEST: &str = "manifest.json";

/// Script loaded by the admin home page
const HOME_BUNDLE: &str = "home.min.js";

/// Write the scaffold files into the site root, creating it if needed
///
/// Returns the written paths. Existing files are overwritten.
pub fn write_scaffold(site: &SiteConfig) -> io::Result<Vec<PathBuf>> {
    let root = site.root_dir.as_path();
    std::fs::create_dir_all(root)?;

    let manifest = serde_json::to_string_pretty(&serde_json::json!({
        "name": "Nuvemshop App",
        "short_name": "App",
        "display": "standalone",
    }))
    .map_err(io::Error::other)?;

    let files = [
        (site.index_file.as_str(), storefront_page(&site.fallback_bundle)),
        (APP_PAGE, admin_page()),
        (MANIFEST, manifest),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        written.push(write_file(root, name, &content)?);
    }
    Ok(written)
}

fn write_file(root: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
    let path = root.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

fn storefront_page(bundle: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
	<meta charset="UTF-8">
	<meta name="viewport" content="width=device-width, initial-scale=1.0">
	<title>Nuvemshop App</title>
</head>
<body>
	<script type="module" src="/{bundle}"></script>
</body>
</html>"#
    )
}

fn admin_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
	<meta charset="UTF-8">
	<meta name="viewport" content="width=device-width, initial-scale=1.0">
	<title>Omafit App</title>
	<style>
		body {{ font-family: Arial, sans-serif; padding: 24px; }}
	</style>
</head>
<body>
	<h1>Omafit</h1>
	<p>Home do app ativa.</p>
	<script type="module" src="/{HOME_BUNDLE}"></script>
</body>
</html>"#
    )
}
