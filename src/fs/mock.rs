use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::models::{EntryKind, FileStat};

use super::FileSystem;

/// Collaborator calls recorded by the mock.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Op {
    ReadFile,
    WriteFile,
    Stat,
    Unlink,
    Rename,
    ReadDir,
}

#[derive(Clone, Debug)]
enum Node {
    File { content: Vec<u8>, stamp: SystemTime },
    Dir,
}

/// In-memory filesystem with call recording and injectable failures.
#[derive(Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    nodes: BTreeMap<PathBuf, Node>,
    errors: HashMap<(Op, PathBuf), io::ErrorKind>,
    calls: Vec<(Op, PathBuf)>,
    clock: u64,
}

impl Inner {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.clock)
    }

    fn record(&mut self, op: Op, path: &Path) -> io::Result<()> {
        self.calls.push((op, path.to_path_buf()));
        match self.errors.get(&(op, path.to_path_buf())) {
            Some(kind) => Err(io::Error::new(*kind, format!("injected {op:?} failure"))),
            None => Ok(()),
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file", path.display()),
    )
}

impl MockFileSystem {
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let stamp = inner.tick();
        inner.nodes.insert(
            path.into(),
            Node::File {
                content: content.into(),
                stamp,
            },
        );
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.nodes.insert(path.into(), Node::Dir);
    }

    /// Make every `op` call against `path` fail with `kind`.
    pub fn set_error(&self, op: Op, path: impl Into<PathBuf>, kind: io::ErrorKind) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.errors.insert((op, path.into()), kind);
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let inner = self.inner.lock().expect("mock fs lock");
        match inner.nodes.get(path.as_ref()) {
            Some(Node::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn calls(&self) -> Vec<(Op, PathBuf)> {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.calls.clone()
    }

    pub fn calls_for(&self, op: Op) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter(|(called, _)| *called == op)
            .map(|(_, path)| path)
            .collect()
    }
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.record(Op::ReadFile, path)?;
        match inner.nodes.get(path) {
            Some(Node::File { content, .. }) => Ok(content.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "is a directory",
            )),
            None => Err(not_found(path)),
        }
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.record(Op::WriteFile, path)?;
        if let Some(Node::Dir) = inner.nodes.get(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "is a directory",
            ));
        }
        let stamp = inner.tick();
        inner.nodes.insert(
            path.to_path_buf(),
            Node::File {
                content: data.to_vec(),
                stamp,
            },
        );
        Ok(())
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.record(Op::Stat, path)?;
        match inner.nodes.get(path) {
            Some(Node::File { stamp, .. }) => Ok(FileStat {
                kind: EntryKind::File,
                modified: Some(*stamp),
                created: Some(*stamp),
                accessed: Some(*stamp),
            }),
            Some(Node::Dir) => Ok(FileStat {
                kind: EntryKind::Directory,
                modified: None,
                created: None,
                accessed: None,
            }),
            None => Err(not_found(path)),
        }
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.record(Op::Unlink, path)?;
        match inner.nodes.get(path) {
            Some(Node::File { .. }) => {
                inner.nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "is a directory",
            )),
            None => Err(not_found(path)),
        }
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.record(Op::Rename, from)?;
        let parent_is_dir = match to.parent() {
            Some(parent) => matches!(inner.nodes.get(parent), Some(Node::Dir)),
            None => false,
        };
        if !parent_is_dir {
            return Err(not_found(to));
        }
        let node = inner.nodes.remove(from).ok_or_else(|| not_found(from))?;
        inner.nodes.insert(to.to_path_buf(), node);
        Ok(())
    }

    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.record(Op::ReadDir, dir)?;
        if !matches!(inner.nodes.get(dir), Some(Node::Dir)) {
            return Err(not_found(dir));
        }
        Ok(inner
            .nodes
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }
}
