//! Resource trait and URL scoping.

use serde::de::DeserializeOwned;

/// Binds the URL prefix a resource lives under.
///
/// Top-level resources use `()`. Resources nested under a subscription use
/// [`SubscriptionScope`], so the owning id has to be supplied before any
/// request can be built.
pub trait Scope: std::fmt::Debug + Send + Sync {
    /// Path prefix, either empty or ending in `/`.
    fn prefix(&self) -> String;
}

impl Scope for () {
    fn prefix(&self) -> String {
        String::new()
    }
}

/// Scope for resources under `/subscriptions/:subscription_id/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionScope(pub u64);

impl SubscriptionScope {
    /// The owning subscription id.
    pub fn subscription_id(&self) -> u64 {
        self.0
    }
}

impl Scope for SubscriptionScope {
    fn prefix(&self) -> String {
        format!("subscriptions/{}/", self.0)
    }
}

/// A remote entity reachable through a predictable URL pattern.
///
/// # Example
///
/// ```ignore
/// impl Resource for Statement {
///     const ENTITY_TYPE: &'static str = "Statement";
///     const ELEMENT: &'static str = "statement";
///     const COLLECTION: &'static str = "statements";
///     type Scope = SubscriptionScope;
/// }
/// ```
pub trait Resource: DeserializeOwned + Send + Sync {
    /// Human-readable name used in errors.
    const ENTITY_TYPE: &'static str;

    /// Root element wrapping a single record on the wire.
    const ELEMENT: &'static str;

    /// Collection path segment.
    const COLLECTION: &'static str;

    /// Prefix that must be bound before the endpoint is well-formed.
    type Scope: Scope;

    /// `<prefix><collection>`
    fn collection_path(scope: &Self::Scope) -> String {
        format!("{}{}", scope.prefix(), Self::COLLECTION)
    }

    /// `<prefix><collection>/<id>`
    fn path_for(scope: &Self::Scope, id: u64) -> String {
        format!("{}/{}", Self::collection_path(scope), id)
    }

    /// Record the scope a decoded entity was fetched under.
    ///
    /// Called by [`Find`](crate::traits::Find) on every record it decodes.
    /// Nested records whose payload omits the owner take it from here.
    fn bind_scope(&mut self, _scope: &Self::Scope) {}
}
