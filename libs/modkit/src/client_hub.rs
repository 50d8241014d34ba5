//! Type-safe registry of shared service handles.
//!
//! Providers register an implementation once under an interface type
//! (usually a trait object such as `dyn AccountsApi`); consumers fetch it by
//! that type without knowing the concrete implementation.
//!
//! Key = `type_name::<T>()`, which works for `T = dyn Trait`.
//! Value = `Arc<T>` stored as `Box<dyn Any + Send + Sync>` and downcast on read.

use parking_lot::RwLock;
use std::{any::Any, collections::HashMap, sync::Arc};

#[derive(Debug, thiserror::Error)]
pub enum ClientHubError {
    #[error("client not found: type={type_name}")]
    NotFound { type_name: &'static str },

    #[error("type mismatch in hub for type={type_name}")]
    TypeMismatch { type_name: &'static str },
}

type Boxed = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct ClientHub {
    map: RwLock<HashMap<&'static str, Boxed>>,
}

impl ClientHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client` under the interface type `T`, replacing any previous
    /// registration. `Arc`s already handed out stay valid.
    pub fn register<T>(&self, client: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = std::any::type_name::<T>();
        self.map.write().insert(key, Box::new(client));
    }

    /// Fetch the client registered under `T`.
    ///
    /// # Errors
    /// [`ClientHubError::NotFound`] when nothing is registered under `T`.
    pub fn get<T>(&self) -> Result<Arc<T>, ClientHubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let r = self.map.read();
        let boxed = r
            .get(type_name)
            .ok_or(ClientHubError::NotFound { type_name })?;
        boxed
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(ClientHubError::TypeMismatch { type_name })
    }

    #[must_use]
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.map.read().contains_key(std::any::type_name::<T>())
    }
}

impl std::fmt::Debug for ClientHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.map.read();
        f.debug_struct("ClientHub")
            .field("types", &r.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_owned()
        }
    }

    struct French;
    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_owned()
        }
    }

    #[test]
    fn register_and_get_trait_object() {
        let hub = ClientHub::new();
        hub.register::<dyn Greeter>(Arc::new(English));

        let g = hub.get::<dyn Greeter>().unwrap();
        assert_eq!(g.greet(), "hello");
        assert!(hub.contains::<dyn Greeter>());
    }

    #[test]
    fn missing_client_is_not_found() {
        let hub = ClientHub::new();
        let Err(err) = hub.get::<dyn Greeter>() else {
            panic!("nothing was registered for Greeter");
        };
        assert!(matches!(err, ClientHubError::NotFound { .. }));
    }

    #[test]
    fn re_registration_overwrites() {
        let hub = ClientHub::new();
        hub.register::<dyn Greeter>(Arc::new(English));
        let old = hub.get::<dyn Greeter>().unwrap();

        hub.register::<dyn Greeter>(Arc::new(French));

        assert_eq!(hub.get::<dyn Greeter>().unwrap().greet(), "bonjour");
        assert_eq!(old.greet(), "hello");
    }
}
