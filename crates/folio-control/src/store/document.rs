//! JSON file store for the site document and contact submissions.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::models::{self, Contact, InfoItem, Project, SiteDocument, Testimonial};
use super::StoreError;

const DOCUMENT_FILE: &str = "projects.json";
const CONTACTS_FILE: &str = "contacts.json";

/// Store backed by two JSON files in a data directory.
///
/// Every mutation is a read-modify-write of the whole file, serialised by a
/// single lock so concurrent requests cannot drop each other's changes.
/// Files are replaced atomically via a temporary sibling and a rename.
#[derive(Debug)]
pub struct DocumentStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Create a store rooted at `data_dir`. The directory is created on the
    /// first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn document_path(&self) -> PathBuf {
        self.data_dir.join(DOCUMENT_FILE)
    }

    fn contacts_path(&self) -> PathBuf {
        self.data_dir.join(CONTACTS_FILE)
    }

    /// Load the site document. A missing file is an empty document.
    pub async fn load(&self) -> Result<SiteDocument, StoreError> {
        read_json(&self.document_path()).await
    }

    /// Replace the whole site document.
    pub async fn replace(&self, document: &SiteDocument) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        write_json(&self.document_path(), document).await
    }

    /// Apply `f` to the current document and persist the result.
    pub async fn update<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SiteDocument) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.document_path();
        let mut document: SiteDocument = read_json(&path).await?;
        let result = f(&mut document);
        write_json(&path, &document).await?;
        Ok(result)
    }

    /// Insert or replace a project by id. Media URLs the incoming project
    /// leaves empty are kept from the stored one.
    pub async fn upsert_project(&self, project: Project) -> Result<Project, StoreError> {
        let id = project.id.clone();
        let saved = self
            .update(|doc| models::upsert(&mut doc.projects, project).clone())
            .await?;
        tracing::debug!(project_id = %id, "project stored");
        Ok(saved)
    }

    /// Remove a project by id, returning it if it existed.
    pub async fn delete_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        self.update(|doc| {
            let index = doc.projects.iter().position(|p| p.id == id)?;
            Some(doc.projects.remove(index))
        })
        .await
    }

    /// Insert or replace a testimonial by id.
    pub async fn upsert_testimonial(
        &self,
        testimonial: Testimonial,
    ) -> Result<Testimonial, StoreError> {
        self.update(|doc| models::upsert(&mut doc.testimonials, testimonial).clone())
            .await
    }

    /// Insert or replace an info section entry by id.
    pub async fn upsert_info(&self, info: InfoItem) -> Result<InfoItem, StoreError> {
        self.update(|doc| models::upsert(&mut doc.info_section, info).clone())
            .await
    }

    /// Load all contact submissions. A missing file is an empty list.
    pub async fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        read_json(&self.contacts_path()).await
    }

    /// Append a contact submission.
    pub async fn append_contact(&self, contact: Contact) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut contacts = self.contacts().await?;
        contacts.push(contact);
        write_json(&self.contacts_path(), &contacts).await
    }
}

async fn read_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut serialized = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    serialized.push(b'\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &serialized).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn project(id: &str, title: &str) -> Project {
        Project {
            id: id.to_string(),
            slug: id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_missing_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        assert_eq!(store.load().await.unwrap(), SiteDocument::default());
        assert!(store.contacts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_and_delete_project() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        store.upsert_project(project("p1", "One")).await.unwrap();
        store.upsert_project(project("p2", "Two")).await.unwrap();
        store.upsert_project(project("p1", "One again")).await.unwrap();

        let doc = store.load().await.unwrap();
        let titles: Vec<&str> = doc.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["One again", "Two"]);

        let removed = store.delete_project("p1").await.unwrap();
        assert_eq!(removed.map(|p| p.id), Some("p1".to_string()));
        assert!(store.delete_project("p1").await.unwrap().is_none());
        assert_eq!(store.load().await.unwrap().projects.len(), 1);
    }

    #[tokio::test]
    async fn test_written_file_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("nested"));
        store.upsert_project(project("p1", "One")).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("nested").join(DOCUMENT_FILE)).unwrap();
        assert!(raw.starts_with("{\n  \"projects\""));
        assert!(!dir.path().join("nested").join("projects.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_replace_keeps_unknown_sections() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let doc: SiteDocument = serde_json::from_value(json!({
            "projects": [],
            "faqs": [{"id": "faq-1"}]
        }))
        .unwrap();
        store.replace(&doc).await.unwrap();
        store
            .upsert_testimonial(Testimonial {
                id: "t1".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let raw: Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(DOCUMENT_FILE)).unwrap())
                .unwrap();
        assert_eq!(raw["faqs"][0]["id"], "faq-1");
        assert_eq!(raw["testimonials"][0]["id"], "t1");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DOCUMENT_FILE), b"{not json").unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(matches!(
            store.load().await,
            Err(StoreError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DocumentStore::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_info(InfoItem {
                        id: format!("info-{i}"),
                        ..Default::default()
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load().await.unwrap().info_section.len(), 16);
    }

    #[tokio::test]
    async fn test_append_contact() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        for n in 0..2 {
            store
                .append_contact(Contact {
                    id: format!("contact-{n}"),
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    phone: String::new(),
                    message: "Hello".into(),
                    timestamp: "2024-01-01T00:00:00.000Z".into(),
                    read: false,
                })
                .await
                .unwrap();
        }

        let contacts = store.contacts().await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[1].id, "contact-1");
    }
}
