use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use tinylink_core::error::StorageError;
use tinylink_core::repository::{LinkStore, OwnedLink, Ownership, OwnershipStore, Result, ShortLink};
use tinylink_core::{ShortCode, UserId};

/// In-memory implementation of the storage contracts using DashMap.
///
/// DashMap's sharded locks allow concurrent reads and writes to
/// different buckets without blocking. Both unique indexes (code primary
/// key and normalized-URL index) are enforced through the entry API so
/// check-and-insert is atomic per key, matching the constraint semantics
/// of the MySQL backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    links: DashMap<String, ShortLink>,
    url_index: DashMap<String, ShortCode>,
    owners: DashMap<(String, String), Timestamp>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        Ok(self.links.get(code.as_str()).map(|entry| entry.clone()))
    }

    async fn get_by_normalized_url(&self, normalized_url: &str) -> Result<Option<ShortLink>> {
        let Some(code) = self
            .url_index
            .get(normalized_url)
            .map(|entry| entry.clone())
        else {
            return Ok(None);
        };
        Ok(self.links.get(code.as_str()).map(|entry| entry.clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.links.contains_key(code.as_str()))
    }

    async fn insert_with_owner(&self, link: &ShortLink, owner: &Ownership) -> Result<()> {
        // Lock order is url_index then links, everywhere.
        match self.url_index.entry(link.normalized_url.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(link.normalized_url.clone())),
            Entry::Vacant(url_slot) => match self.links.entry(link.code.as_str().to_owned()) {
                Entry::Occupied(_) => Err(StorageError::Conflict(link.code.to_string())),
                Entry::Vacant(code_slot) => {
                    code_slot.insert(link.clone());
                    url_slot.insert(link.code.clone());
                    self.owners.insert(
                        (
                            owner.user_id.as_str().to_owned(),
                            owner.code.as_str().to_owned(),
                        ),
                        owner.created_at,
                    );
                    Ok(())
                }
            },
        }
    }
}

#[async_trait]
impl OwnershipStore for InMemoryRepository {
    async fn ownership_exists(&self, user: &UserId, code: &ShortCode) -> Result<bool> {
        let key = (user.as_str().to_owned(), code.as_str().to_owned());
        Ok(self.owners.contains_key(&key))
    }

    async fn insert_ownership(&self, owner: &Ownership) -> Result<()> {
        let key = (
            owner.user_id.as_str().to_owned(),
            owner.code.as_str().to_owned(),
        );
        match self.owners.entry(key) {
            Entry::Occupied(_) => Err(StorageError::Conflict(format!(
                "{}/{}",
                owner.user_id, owner.code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(owner.created_at);
                Ok(())
            }
        }
    }

    async fn delete_ownership(&self, user: &UserId, code: &ShortCode) -> Result<bool> {
        let key = (user.as_str().to_owned(), code.as_str().to_owned());
        Ok(self.owners.remove(&key).is_some())
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<OwnedLink>> {
        let mut owned: Vec<OwnedLink> = self
            .owners
            .iter()
            .filter(|entry| entry.key().0 == user.as_str())
            .filter_map(|entry| {
                let code = &entry.key().1;
                self.links.get(code.as_str()).map(|link| OwnedLink {
                    code: link.code.clone(),
                    normalized_url: link.normalized_url.clone(),
                    created_at: *entry.value(),
                })
            })
            .collect();

        // Most recent association first; code breaks ties deterministically.
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.as_str().cmp(b.code.as_str()))
        });
        Ok(owned)
    }
}
