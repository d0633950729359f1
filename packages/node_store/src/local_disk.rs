//! A coordination store kept in a local directory.
//!
//! Each node is a directory holding a `value` file and a `children`
//! directory with one subdirectory per child:
//!
//! ```text
//! <root>/value                     the root node's value
//! <root>/children/app/value        /app
//! <root>/children/app/children/db  /app/db
//! ```
//!
//! Keeping children in their own directory means no child name can collide
//! with the value file.

use std::{fs, io, path};

use bytes::Bytes;
use coordstore_ll::{Acl, LLError, NodeClient};

use crate::node_path::segments;

const VALUE_FILE: &str = "value";
const CHILDREN_DIR: &str = "children";

/// A [`NodeClient`] backed by a directory tree.
#[derive(Debug)]
pub struct LocalDiskClient {
    root: path::PathBuf,
}

impl LocalDiskClient {
    /// Open the store rooted at `root`, initializing the root node if needed.
    ///
    /// The directory must exist and be writable; this plays the part of
    /// connecting, so failing here is a connection failure.
    pub fn open(root: impl Into<path::PathBuf>) -> Result<LocalDiskClient, LLError> {
        let root = root.into();
        let attr = fs::metadata(&root).map_err(|error| {
            transport(format!("store root {} is not accessible: {}", root.display(), error))
        })?;

        if !attr.is_dir() {
            return Err(transport(format!(
                "store root {} must be a directory",
                root.display()
            )));
        }

        if attr.permissions().readonly() {
            return Err(transport(format!(
                "store root {} must be writable",
                root.display()
            )));
        }

        let root = root.canonicalize()?;
        fs::create_dir_all(root.join(CHILDREN_DIR))?;
        let value_file = root.join(VALUE_FILE);
        if !value_file.exists() {
            fs::write(&value_file, b"")?;
        }
        log::debug!("Opened local store at {}", root.display());
        Ok(LocalDiskClient { root })
    }

    pub fn root(&self) -> &path::Path {
        &self.root
    }

    fn node_dir(&self, segments: &[&str]) -> path::PathBuf {
        let mut dir = self.root.clone();
        for segment in segments {
            dir.push(CHILDREN_DIR);
            dir.push(segment);
        }
        dir
    }
}

fn transport(message: String) -> LLError {
    LLError::Transport(Box::new(io::Error::other(message)))
}

impl NodeClient for LocalDiskClient {
    fn exists(&mut self, path: &str) -> Result<bool, LLError> {
        let segments = segments(path)?;
        Ok(self.node_dir(&segments).is_dir())
    }

    fn get(&mut self, path: &str) -> Result<Option<Bytes>, LLError> {
        let segments = segments(path)?;
        let dir = self.node_dir(&segments);
        if !dir.is_dir() {
            return Ok(None);
        }
        log::debug!("Reading {}...", dir.display());
        match fs::read(dir.join(VALUE_FILE)) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            // A node whose value was never written holds the empty value.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Some(Bytes::new())),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), LLError> {
        let segments = segments(path)?;
        let dir = self.node_dir(&segments);
        if !dir.is_dir() {
            return Err(LLError::NoNode);
        }
        log::debug!("Writing {}...", dir.display());
        fs::write(dir.join(VALUE_FILE), &data)?;
        Ok(())
    }

    fn create(&mut self, path: &str, data: Bytes, _acl: &[Acl]) -> Result<(), LLError> {
        let segments = segments(path)?;
        let (_, parent) = segments.split_last().ok_or(LLError::NodeExists)?;
        if !self.node_dir(parent).is_dir() {
            return Err(LLError::NoNode);
        }

        let dir = self.node_dir(&segments);
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(LLError::NodeExists),
            Err(e) => return Err(e.into()),
        }
        log::debug!("Creating {}...", dir.display());
        fs::create_dir(dir.join(CHILDREN_DIR))?;
        fs::write(dir.join(VALUE_FILE), &data)?;
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), LLError> {
        let segments = segments(path)?;
        if segments.is_empty() {
            return Err(LLError::invalid_path("the root cannot be deleted"));
        }
        let dir = self.node_dir(&segments);
        if !dir.is_dir() {
            return Err(LLError::NoNode);
        }
        let children = dir.join(CHILDREN_DIR);
        if children.is_dir() && fs::read_dir(&children)?.next().is_some() {
            return Err(LLError::NotEmpty);
        }
        log::debug!("Removing {}...", dir.display());
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    fn children(&mut self, path: &str) -> Result<Vec<String>, LLError> {
        let segments = segments(path)?;
        let dir = self.node_dir(&segments);
        if !dir.is_dir() {
            return Err(LLError::NoNode);
        }
        let children = dir.join(CHILDREN_DIR);
        if !children.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&children)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::warn!(
                    "Skipping non UTF-8 child {:?} of {}",
                    name,
                    children.display()
                ),
            }
        }
        Ok(names)
    }
}
