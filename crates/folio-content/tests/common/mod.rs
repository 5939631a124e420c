//! Shared fixtures for content integration tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A temporary content root populated with sample documents.
pub struct ContentFixture {
    /// Owns the directory; dropped with the fixture.
    pub dir: TempDir,
}

impl ContentFixture {
    /// Creates an empty content root.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Creates a content root holding a small blog.
    pub fn blog() -> Self {
        let fixture = Self::new();
        fixture.write(
            "getting-started.mdx",
            "---\n\
             title: Getting Started\n\
             publishedAt: 2024-03-01\n\
             category: Guides\n\
             tags: [setup, \"first steps\"]\n\
             ---\n\n\
             # Introduction\n\n\
             Welcome to the guide.\n\n\
             ## Getting Started\n\n\
             ## Prerequisites\n\n\
             ```sh\n\
             # install\n\
             ```\n",
        );
        fixture.write(
            "posts/async-rust.md",
            "---\n\
             title: 'Async Rust: a tour'\n\
             publishedAt: 2024-05-10\n\
             categories: [Rust, Guides]\n\
             excerpt: Futures, executors, and you.\n\
             ---\n\n\
             # Futures\n\n\
             ### Pinning\n\n\
             ## Executors\n",
        );
        fixture.write(
            "posts/wip.mdx",
            "---\ntitle: Work in progress\nstatus: draft\npublishedAt: 2025-01-01\n---\nTBD",
        );
        fixture.write("posts/broken.mdx", "# Forgot the frontmatter\n");
        fixture.write(".hidden/secret.mdx", "---\ntitle: Hidden\n---\n");
        fixture
    }

    /// Writes a file relative to the root, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write fixture");
    }

    /// The content root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for ContentFixture {
    fn default() -> Self {
        Self::new()
    }
}
