//! Static file resolver
//!
//! Maps a request path to a file inside the site root, confines it to that
//! root, and loads it together with its content type and cache policy.

use crate::config::SiteConfig;
use crate::http::{cache::CachePolicy, mime};
use crate::logger;
use hyper::body::Bytes;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Why a request path could not be served
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("path escapes the site root: {0}")]
    Forbidden(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Server {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file ready to be written to the response
#[derive(Debug, Clone)]
pub struct ServedFile {
    pub path: PathBuf,
    pub content: Bytes,
    pub content_type: &'static str,
    pub cache: CachePolicy,
}

/// Resolves request paths against a fixed root directory
#[derive(Debug, Clone)]
pub struct StaticResolver {
    root: PathBuf,
    index_file: String,
    fallback_bundle: String,
}

impl StaticResolver {
    /// Create a resolver; a relative root is anchored at the working directory
    pub fn new(site: &SiteConfig) -> io::Result<Self> {
        let root = if site.root_dir.is_absolute() {
            site.root_dir.clone()
        } else {
            std::env::current_dir()?.join(&site.root_dir)
        };

        Ok(Self {
            root: normalize(&root),
            index_file: site.index_file.clone(),
            fallback_bundle: site.fallback_bundle.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join the request path onto the root, rejecting anything that lands outside it
    ///
    /// Resolution is lexical: `.` segments are dropped and `..` pops one
    /// component, so the filesystem is never touched for a rejected path.
    pub fn confine(&self, request_path: &str) -> Result<PathBuf, ResolveError> {
        let relative = if request_path == "/" {
            self.index_file.as_str()
        } else {
            request_path
        };

        let mut resolved = self.root.clone();
        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    resolved.pop();
                }
                name => {
                    // A segment must be a single plain file name on every platform
                    let mut components = Path::new(name).components();
                    match (components.next(), components.next()) {
                        (Some(Component::Normal(_)), None) => resolved.push(name),
                        _ => return Err(ResolveError::Forbidden(request_path.to_string())),
                    }
                }
            }
        }

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(ResolveError::Forbidden(request_path.to_string()))
        }
    }

    /// Resolve and load the file for a request path
    ///
    /// A missing file requested as `/` or as a `.js` path is replaced by the
    /// fallback bundle when that exists.
    pub async fn resolve(&self, request_path: &str) -> Result<ServedFile, ResolveError> {
        let path = match self.confine(request_path) {
            Ok(path) => path,
            Err(e) => {
                logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
                return Err(e);
            }
        };

        let result = match self.load(path).await {
            Err(ResolveError::NotFound(missing)) if wants_fallback(request_path) => {
                match self.load(self.root.join(&self.fallback_bundle)).await {
                    Err(ResolveError::NotFound(_)) => Err(ResolveError::NotFound(missing)),
                    other => other,
                }
            }
            other => other,
        };

        if let Err(ResolveError::Server { path, source }) = &result {
            logger::log_error(&format!(
                "Failed to read file '{}': {source}",
                path.display()
            ));
        }

        result
    }

    async fn load(&self, path: PathBuf) -> Result<ServedFile, ResolveError> {
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| classify(path.clone(), e))?;

        let path = if metadata.is_dir() {
            path.join(&self.index_file)
        } else {
            path
        };

        let content = fs::read(&path).await.map_err(|e| classify(path.clone(), e))?;

        let extension = path.extension().and_then(|e| e.to_str());
        let content_type = mime::get_content_type(extension);
        let cache = CachePolicy::for_extension(extension);

        Ok(ServedFile {
            content: Bytes::from(content),
            content_type,
            cache,
            path,
        })
    }
}

fn wants_fallback(request_path: &str) -> bool {
    request_path == "/"
        || Path::new(request_path)
            .extension()
            .is_some_and(|ext| ext == "js")
}

fn classify(path: PathBuf, err: io::Error) -> ResolveError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => ResolveError::NotFound(path),
        _ => ResolveError::Server { path, source: err },
    }
}

/// Lexically drop `.` and fold `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
