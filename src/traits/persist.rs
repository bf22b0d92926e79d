//! Persist trait for saving, destroying and acting on entities.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::ChargifyClient;
use crate::envelope;
use crate::error::{ChargifyError, Result};
use crate::traits::Resource;

/// Create, update, delete and issue sub-actions against an entity.
///
/// The outbound payload of [`save`](Persist::save) is built from
/// [`Attributes`](Persist::Attributes), a separate input type. Read-only
/// projections that the API embeds in responses have no place in it, so they
/// can never be sent back.
#[async_trait]
pub trait Persist: Resource {
    /// Writable fields sent on create and update.
    type Attributes: Serialize + Send + Sync;

    /// The remote id, absent until the entity has been created.
    fn id(&self) -> Option<u64>;

    /// The scope this entity lives under.
    fn scope(&self) -> Self::Scope;

    /// Project the writable fields out of this entity.
    fn attributes(&self) -> Self::Attributes;

    /// Member path of this entity, `<prefix><collection>/<id>`.
    ///
    /// # Errors
    ///
    /// Returns [`ChargifyError::MissingId`] if the entity has no id.
    fn member_path(&self) -> Result<String> {
        let id = self.id().ok_or(ChargifyError::MissingId {
            entity_type: Self::ENTITY_TYPE,
        })?;
        Ok(Self::path_for(&self.scope(), id))
    }

    /// Create the entity (POST) if it has no id, update it (PUT) otherwise.
    ///
    /// On success `self` is replaced by the record the API returns.
    async fn save(&mut self, client: &ChargifyClient) -> Result<()> {
        tracing::debug!(entity = Self::ENTITY_TYPE, id = ?self.id(), "Saving");
        let body = envelope::wrap_root(Self::ELEMENT, &self.attributes())?;

        let response = match self.id() {
            None => {
                let path = format!("{}.json", Self::collection_path(&self.scope()));
                client.post(&path, &body).await?
            }
            Some(id) => {
                let path = format!("{}.json", self.member_path()?);
                client
                    .put(&path, &body)
                    .await
                    .map_err(|e| e.or_not_found(Self::ENTITY_TYPE, id))?
            }
        };

        let value = ChargifyClient::read_value(response).await?;
        if !value.is_null() {
            *self = envelope::decode_one(value, Self::ELEMENT)?;
        }
        Ok(())
    }

    /// Delete the entity.
    async fn destroy(&self, client: &ChargifyClient) -> Result<()> {
        let path = format!("{}.json", self.member_path()?);
        client
            .delete(&path)
            .await
            .map_err(|e| e.or_not_found(Self::ENTITY_TYPE, self.id().unwrap_or_default()))?;
        Ok(())
    }

    /// POST to the `name` sub-action of this entity.
    async fn post<Q, B>(
        &self,
        client: &ChargifyClient,
        name: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Value>
    where
        Q: Serialize + Sync + ?Sized,
        B: Serialize + Sync + ?Sized,
    {
        self.dispatch(client, Method::POST, name, query, body).await
    }

    /// PUT to the `name` sub-action of this entity.
    async fn put<Q, B>(
        &self,
        client: &ChargifyClient,
        name: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Value>
    where
        Q: Serialize + Sync + ?Sized,
        B: Serialize + Sync + ?Sized,
    {
        self.dispatch(client, Method::PUT, name, query, body).await
    }

    /// DELETE the `name` sub-action of this entity.
    async fn delete<Q, B>(
        &self,
        client: &ChargifyClient,
        name: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Value>
    where
        Q: Serialize + Sync + ?Sized,
        B: Serialize + Sync + ?Sized,
    {
        self.dispatch(client, Method::DELETE, name, query, body).await
    }

    #[doc(hidden)]
    async fn dispatch<Q, B>(
        &self,
        client: &ChargifyClient,
        method: Method,
        name: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Value>
    where
        Q: Serialize + Sync + ?Sized,
        B: Serialize + Sync + ?Sized,
    {
        let member_path = self.member_path()?;
        client
            .action(method, &member_path, name, query, body)
            .await
            .map_err(|e| e.or_not_found(Self::ENTITY_TYPE, self.id().unwrap_or_default()))
    }
}
