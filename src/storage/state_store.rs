use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use serde_json::Value;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, info};

use crate::{codec::Codec, model::Model};

pub const STATE_FILE_NAME: &str = "state.json";

/// Interface for abstracting storage of the model.
pub trait StateStore {
    type Handle: StateHandle;

    /// Opens the state for modification. The state stays locked until the handle is released.
    fn open(&self) -> impl Future<Output = Result<Self::Handle>>;

    /// Reads the current state without keeping it locked.
    fn snapshot(&self) -> impl Future<Output = Result<Model>>;
}

pub trait StateHandle {
    fn read_model(&mut self) -> impl Future<Output = Result<Model>>;

    /// Replaces the stored state with `model`.
    fn write_model(&mut self, model: &Model) -> impl Future<Output = Result<()>>;

    fn release(self) -> impl Future<Output = Result<()>>;
}

/// The main realization of [StateStore].
pub struct LocalStateStore {
    state_path: PathBuf,
}

impl LocalStateStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            state_path: dir.join(STATE_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }
}

impl StateStore for LocalStateStore {
    type Handle = StateFile;

    async fn open(&self) -> Result<Self::Handle> {
        let file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.state_path)
            .await
            .with_context(|| format!("Can't open state file {:?}", self.state_path))?;
        file.lock_exclusive()?;
        debug!("Locked {:?}", self.state_path);
        Ok(StateFile { file })
    }

    async fn snapshot(&self) -> Result<Model> {
        let mut file = match File::open(&self.state_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Model::default()),
            Err(e) => Err(e)?,
        };
        file.lock_shared()?;
        let model = read_model_from(&mut file).await;
        file.unlock_async().await?;
        model
    }
}

pub struct StateFile {
    file: File,
}

impl StateHandle for StateFile {
    async fn read_model(&mut self) -> Result<Model> {
        read_model_from(&mut self.file).await
    }

    async fn write_model(&mut self, model: &Model) -> Result<()> {
        let mut buffer = serde_json::to_vec_pretty(&model.to_entity())?;
        buffer.push(b'\n');

        self.file.rewind().await?;
        self.file.set_len(0).await?;
        self.file.write_all(&buffer).await?;
        self.file.flush().await?;
        self.file.sync_data().await?;
        info!(
            "Saved {} projects and {} todos",
            model.projects.len(),
            model.todos.len()
        );
        Ok(())
    }

    async fn release(self) -> Result<()> {
        self.file.unlock_async().await?;
        Ok(())
    }
}

/// An empty file is a fresh state. A file that can't be decoded is an error, it is never
/// silently replaced.
async fn read_model_from(file: &mut File) -> Result<Model> {
    file.rewind().await?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).await?;
    if contents.trim().is_empty() {
        debug!("State file is empty, starting fresh");
        return Ok(Model::default());
    }
    let value = serde_json::from_str::<Value>(&contents).context("State file is not valid JSON")?;
    let model = Model::decode(&value).context("State file has an unexpected shape")?;
    Ok(model)
}
