//! # Service registry
//!
//! Process-wide singletons for the shop backend.
//!
//! Infrastructure handles (the MongoDB [`Database`](crate::db::Database) and the
//! [`RedisClient`](crate::caching::redis::RedisClient)) are created in `main` and
//! handed to [`ServiceLocator::set`]. Everything above them is a lazily built
//! singleton:
//!
//! - services carry `#[singleton_macro::service(name = "...")]`, which generates
//!   `instance()`, injects every `Arc<T>` field through [`ServiceLocator::get`]
//!   and submits a [`ServiceRegistration`];
//! - repositories use [`register_repository!`](crate::register_repository),
//!   which does the same but keeps the hand-written [`Repository::init`] so
//!   that each repository can create its collection indexes.
//!
//! [`ServiceLocator::initialize_all`] walks both `inventory` collections and
//! builds every component before the HTTP server accepts traffic.
//!
//! ```rust,ignore
//! #[service(name = "cart")]
//! pub struct CartService {
//!     cart_repo: Arc<CartRepository>,
//!     product_repo: Arc<ProductRepository>,
//! }
//!
//! let carts = CartService::instance();
//! assert_eq!(carts.name(), "cart_service");
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::core::errors::AppResult;
use crate::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

/// Business-logic singleton generated by `#[service]`.
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Data-access component bound to one MongoDB collection.
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    /// Runs once at startup; repositories create their indexes here.
    async fn init(&self) -> AppResult<()>;
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Arc<dyn Repository>,
    /// Same singleton, boxed as `Arc<Self>` for [`ServiceLocator::get`].
    pub instance: fn() -> Box<dyn Any + Send + Sync>,
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(RepositoryRegistration);
inventory::collect!(ServiceRegistration);

/// Declares `instance()` for a repository type and registers it for startup.
///
/// The type must provide a private `fn new() -> Self` and implement
/// [`Repository`]. The registration name must be `"<type name without the
/// Repository suffix, lowercased>_repository"` so that services can receive the
/// repository through [`ServiceLocator::get`].
///
/// # Examples
///
/// ```rust,ignore
/// crate::register_repository!(BrandRepository, "brand_repository");
///
/// let brands = BrandRepository::instance();
/// ```
#[macro_export]
macro_rules! register_repository {
    ($ty:ident, $name:literal) => {
        impl $ty {
            pub fn instance() -> std::sync::Arc<Self> {
                static INSTANCE: once_cell::sync::OnceCell<std::sync::Arc<$ty>> =
                    once_cell::sync::OnceCell::new();
                INSTANCE.get_or_init(|| std::sync::Arc::new(<$ty>::new())).clone()
            }
        }

        inventory::submit! {
            $crate::core::registry::RepositoryRegistration {
                name: $name,
                constructor: || -> std::sync::Arc<dyn $crate::core::registry::Repository> {
                    <$ty>::instance()
                },
                instance: || -> Box<dyn std::any::Any + Send + Sync> {
                    Box::new(<$ty>::instance())
                },
            }
        }
    };
}

/// Type-indexed store for infrastructure handles.
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
});

impl ServiceLocator {
    /// Registers an instance, replacing any previous one of the same type.
    ///
    /// Only infrastructure is set by hand; `main` does it before
    /// [`ServiceLocator::initialize_all`]:
    ///
    /// ```rust,ignore
    /// ServiceLocator::set(Arc::new(Database::new().await?));
    /// ServiceLocator::set(Arc::new(RedisClient::new().await?));
    /// ```
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        log::info!("📦 Registering: {}", short_type_name::<T>());
        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// Returns the registered instance of `T`, if any.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// Returns the instance of `T`.
    ///
    /// Infrastructure handles come from [`ServiceLocator::set`]. Repositories
    /// and services are resolved by type name against the `inventory`
    /// registrations: `ProductRepository` maps to `"product_repository"` and
    /// `CouponService` to `"coupon_service"`. This is what the `Arc<T>` field
    /// injection generated by `#[service]` calls.
    ///
    /// # Panics
    ///
    /// When `T` is neither set nor registered. Singletons resolve their
    /// dependencies in their constructors, so a miss is a wiring bug that
    /// surfaces during `initialize_all`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let db = ServiceLocator::get::<Database>();
    /// let coupons = ServiceLocator::get::<CouponService>();
    /// ```
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        if let Some(instance) = Self::try_get::<T>() {
            return instance;
        }
        match Self::resolve_registered::<T>() {
            Some(instance) => instance,
            None => panic!(
                "{} is not registered. Call ServiceLocator::set() before initialize_all()",
                short_type_name::<T>()
            ),
        }
    }

    fn resolve_registered<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let name = registry_name::<T>()?;
        let boxed = if name.ends_with("_repository") {
            inventory::iter::<RepositoryRegistration>()
                .find(|registration| registration.name == name)
                .map(|registration| (registration.instance)())
        } else {
            inventory::iter::<ServiceRegistration>()
                .find(|registration| registration.name == name)
                .map(|registration| (registration.constructor)())
        }?;
        boxed.downcast::<Arc<T>>().ok().map(|instance| *instance)
    }

    /// Builds every registered repository (creating its indexes) and then
    /// every registered service.
    ///
    /// Both lists are sorted by registration name so startup output is stable.
    ///
    /// # Errors
    ///
    /// The first index creation failure, as reported by the repository's
    /// [`Repository::init`].
    pub async fn initialize_all() -> AppResult<()> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let mut repositories: Vec<&RepositoryRegistration> =
            inventory::iter::<RepositoryRegistration>().collect();
        repositories.sort_by_key(|registration| registration.name);

        print_step_start(1, "Creating repositories and indexes");
        for registration in &repositories {
            print_sub_task(registration.name, "Creating...");
            let repository = (registration.constructor)();
            repository.init().await?;
            print_sub_task(registration.name, &format!("✓ {}", repository.collection_name()));
        }
        print_step_complete(1, "Repositories ready", repositories.len());

        let mut services: Vec<&ServiceRegistration> =
            inventory::iter::<ServiceRegistration>().collect();
        services.sort_by_key(|registration| registration.name);

        print_step_start(2, "Creating services");
        for registration in &services {
            let _instance = (registration.constructor)();
            print_sub_task(registration.name, "✓ Created");
        }
        print_step_complete(2, "Services ready", services.len());

        print_final_summary(repositories.len(), services.len());
        Ok(())
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// `FooRepository` -> `foo_repository`, `FooService` -> `foo_service`.
fn registry_name<T>() -> Option<String> {
    let short = short_type_name::<T>();
    if let Some(stem) = short.strip_suffix("Repository") {
        Some(format!("{}_repository", stem.to_lowercase()))
    } else {
        short
            .strip_suffix("Service")
            .map(|stem| format!("{}_service", stem.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(u32);

    #[test]
    fn test_set_then_get_returns_same_instance() {
        ServiceLocator::set(Arc::new(Marker(7)));

        let first = ServiceLocator::get::<Marker>();
        let second = ServiceLocator::get::<Marker>();

        assert_eq!(first.0, 7);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_try_get_unregistered_is_none() {
        struct NeverRegistered;
        assert!(ServiceLocator::try_get::<NeverRegistered>().is_none());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Marker>(), "Marker");
    }

    #[test]
    fn test_registry_name_from_type() {
        use crate::repositories::products::product_repo::ProductRepository;
        use crate::services::coupons::coupon_service::CouponService;

        assert_eq!(registry_name::<ProductRepository>().as_deref(), Some("product_repository"));
        assert_eq!(registry_name::<CouponService>().as_deref(), Some("coupon_service"));
        assert_eq!(registry_name::<Marker>(), None);
    }

    #[test]
    fn test_get_resolves_service_singleton() {
        use crate::services::auth::token_service::TokenService;

        let resolved = ServiceLocator::get::<TokenService>();

        assert!(Arc::ptr_eq(&resolved, &TokenService::instance()));
        assert_eq!(Service::name(resolved.as_ref()), "token_service");
    }

    #[test]
    fn test_every_service_is_registered_under_its_type_name() {
        let names: Vec<&str> = inventory::iter::<ServiceRegistration>()
            .map(|registration| registration.name)
            .collect();

        for expected in ["auth_service", "cart_service", "coupon_service", "order_service", "upload_service"] {
            assert!(names.contains(&expected), "{} missing from {:?}", expected, names);
        }
    }
}
