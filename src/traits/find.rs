//! Find trait for fetching entities.

use async_trait::async_trait;
use serde::Serialize;

use crate::client::{ChargifyClient, NO_QUERY};
use crate::envelope;
use crate::error::{ChargifyError, Result};
use crate::traits::Resource;

/// Fetch one or many entities of a resource.
///
/// Every [`Resource`] gets this trait for free.
///
/// # Example
///
/// ```ignore
/// use chargify::{ChargifyClient, Find, Subscription};
///
/// let client = ChargifyClient::from_env()?;
/// let subscription = Subscription::find(&client, &(), 42).await?;
/// let active = Subscription::all(&client, &(), &[("state", "active")]).await?;
/// ```
#[async_trait]
pub trait Find: Resource {
    /// Fetch a single entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::NotFound`] if the API answers 404.
    async fn find(client: &ChargifyClient, scope: &Self::Scope, id: u64) -> Result<Self> {
        let path = format!("{}.json", Self::path_for(scope, id));

        let response = client
            .get(&path)
            .await
            .map_err(|e| e.or_not_found(Self::ENTITY_TYPE, id))?;
        let value = ChargifyClient::read_value(response).await?;
        let mut entity: Self = envelope::decode_one(value, Self::ELEMENT)?;
        entity.bind_scope(scope);
        Ok(entity)
    }

    /// Fetch every entity in the collection matching `query`.
    async fn all<Q>(client: &ChargifyClient, scope: &Self::Scope, query: &Q) -> Result<Vec<Self>>
    where
        Q: Serialize + Sync + ?Sized,
    {
        let path = format!("{}.json", Self::collection_path(scope));

        let response = client.get_with_query(&path, query).await?;
        let value = ChargifyClient::read_value(response).await?;
        let mut items: Vec<Self> = envelope::decode_many(value, Self::ELEMENT)?;
        for item in &mut items {
            item.bind_scope(scope);
        }
        tracing::debug!(count = items.len(), entity = Self::ENTITY_TYPE, "Fetched collection");
        Ok(items)
    }

    /// Fetch the first entity matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::NotFound`] if the collection is empty.
    async fn first<Q>(client: &ChargifyClient, scope: &Self::Scope, query: &Q) -> Result<Self>
    where
        Q: Serialize + Sync + ?Sized,
    {
        Self::all(client, scope, query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChargifyError::NotFound {
                entity_type: Self::ENTITY_TYPE,
                id: format!("first in {}", Self::collection_path(scope)),
            })
    }

    /// Fetch every entity in the collection.
    async fn all_unfiltered(client: &ChargifyClient, scope: &Self::Scope) -> Result<Vec<Self>> {
        Self::all(client, scope, NO_QUERY).await
    }
}

impl<T: Resource> Find for T {}
