//! JSON 文件存储
//!
//! 每个文件保存一个 JSON 数组，按 4 空格缩进美化输出。
//! 文件不存在时视为空列表，目录在首次写入时创建。

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use task_push_core::error::{ErrorBuilder, ErrorCode, Result, TaskPushError};
use tracing::debug;

use crate::domain::model::{PushSubscription, Task};
use crate::domain::repository::{SubscriptionRepository, TaskRepository};
use crate::infrastructure::persistence::{SUBSCRIPTIONS_FILE, TASKS_FILE};

pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<T>> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.storage_error("failed to read store file", e)),
        };

        serde_json::from_slice(&content)
            .map_err(|e| self.storage_error("failed to parse store file", e))
    }

    /// 先写临时文件再重命名
    pub async fn save(&self, items: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error("failed to create data directory", e))?;
        }

        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        items
            .serialize(&mut serializer)
            .map_err(|e| self.storage_error("failed to serialize store", e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &buffer)
            .await
            .map_err(|e| self.storage_error("failed to write store file", e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.storage_error("failed to replace store file", e))?;

        debug!(path = %self.path.display(), items = items.len(), "Store saved");
        Ok(())
    }

    fn storage_error(&self, message: &str, err: impl ToString) -> TaskPushError {
        ErrorBuilder::new(ErrorCode::StorageError, message)
            .details(format!("{}: {}", self.path.display(), err.to_string()))
            .build_error()
    }
}

/// 基于 `tasks.json` 的任务仓储
pub struct JsonTaskRepository {
    store: JsonFileStore<Task>,
}

impl JsonTaskRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.as_ref().join(TASKS_FILE)),
        }
    }
}

#[async_trait]
impl TaskRepository for JsonTaskRepository {
    async fn load_tasks(&self) -> Result<Vec<Task>> {
        self.store.load().await
    }

    async fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.store.save(tasks).await
    }
}

/// 基于 `subscriptions.json` 的订阅仓储
pub struct JsonSubscriptionRepository {
    store: JsonFileStore<PushSubscription>,
}

impl JsonSubscriptionRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.as_ref().join(SUBSCRIPTIONS_FILE)),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for JsonSubscriptionRepository {
    async fn load_subscriptions(&self) -> Result<Vec<PushSubscription>> {
        self.store.load().await
    }

    async fn save_subscriptions(&self, subscriptions: &[PushSubscription]) -> Result<()> {
        self.store.save(subscriptions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str) -> Task {
        Task {
            name: name.to_string(),
            priority: "high".to_string(),
            duration: "30".to_string(),
            energy: "low".to_string(),
            deadline: "2025-06-01".to_string(),
            start_time: Some("10:00".to_string()),
        }
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path().join("nested"));
        assert!(repo.load_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saves_with_four_space_indent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let repo = JsonTaskRepository::new(&data_dir);

        repo.save_tasks(&[task("Buy milk")]).await.unwrap();

        let raw = std::fs::read_to_string(data_dir.join(TASKS_FILE)).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"name\": \"Buy milk\""));
        assert!(!data_dir.join("tasks.json.tmp").exists());
        assert_eq!(repo.load_tasks().await.unwrap(), vec![task("Buy milk")]);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SUBSCRIPTIONS_FILE), b"{not json").unwrap();
        let repo = JsonSubscriptionRepository::new(dir.path());

        let err = repo.load_subscriptions().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageError);
    }
}
