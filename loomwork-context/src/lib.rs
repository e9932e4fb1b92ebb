//! loomwork Application Context - configuration, profiles, events, and the
//! built IoC container, wrapped behind a single builder.
//!
//! # Core Features
//!
//! * **Application Context**: centralized application state management
//! * **Configuration Management**: hierarchical configuration with multiple sources
//! * **Environment Profiles**: per-environment property overlays
//! * **Event Broadcasting**: application-wide event system for decoupled communication
//! * **IoC Integration**: builds and owns a `loomwork_ioc::Container`
//! * **Type-Safe Configuration**: `#[config]` field coercion and `#[derive(Configuration)]` sections
//!
//! # Quick Start
//!
//! ```rust
//! use loomwork_context::ContextBuilder;
//!
//! let context = ContextBuilder::new()
//!     .with_property("app.name", "MyApp")
//!     .with_property("app.port", "8080")
//!     .build()
//!     .unwrap();
//!
//! let app_name = context.get_config("app.name");
//! let port: i64 = context.get_config_as("app.port").unwrap();
//!
//! println!("Starting {} on port {}", app_name, port);
//! ```
//!
//! ## Configuration from Files
//!
//! ### TOML Configuration
//!
//! ```rust,no_run
//! use loomwork_context::ContextBuilder;
//!
//! let context = ContextBuilder::new()
//!     .with_toml_config_file("config/app.toml")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ### YAML Configuration
//!
//! ```rust,no_run
//! use loomwork_context::ContextBuilder;
//!
//! let context = ContextBuilder::new()
//!     .with_yaml_config_file("config/app.yaml")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ### Properties Configuration
//!
//! ```rust,no_run
//! use loomwork_context::ContextBuilder;
//!
//! let context = ContextBuilder::new()
//!     .with_properties_config_file("config/app.properties")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ### Auto-Detection
//!
//! ```rust,no_run
//! use loomwork_context::ContextBuilder;
//!
//! // Format is auto-detected based on file extension.
//! let context = ContextBuilder::new()
//!     .with_config_file("config/app.yaml")
//!     .with_config_file("config/db.properties")
//!     .with_config_file("config/server.toml")
//!     .build()
//!     .unwrap();
//! ```
//!
//! If no config file is named explicitly, `build()` still looks for
//! `settings.properties` in the working directory as the lowest-precedence
//! file source; a missing file is not an error.
//!
//! ## Event System
//!
//! ```rust
//! use loomwork_context::{ContextBuilder, Event, EventListener};
//! use std::any::Any;
//!
//! #[derive(Debug, Clone)]
//! struct UserRegisteredEvent {
//!     pub user_id: u64,
//!     pub email: String,
//! }
//!
//! impl Event for UserRegisteredEvent {
//!     fn name(&self) -> &'static str {
//!         "UserRegistered"
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn into_any(self: Box<Self>) -> Box<dyn Any> {
//!         self
//!     }
//! }
//!
//! struct EmailNotificationListener;
//!
//! impl EventListener<UserRegisteredEvent> for EmailNotificationListener {
//!     fn on_event(&self, event: &UserRegisteredEvent) {
//!         println!("sending welcome email to user {} ({})", event.user_id, event.email);
//!     }
//! }
//!
//! let context = ContextBuilder::new().build().unwrap();
//! context.subscribe_to_events(EmailNotificationListener);
//!
//! let event = UserRegisteredEvent {
//!     user_id: 123,
//!     email: "user@example.com".to_string(),
//! };
//! context.publish_event(&event);
//! ```
//!
//! ## IoC Container Integration
//!
//! Every `#[derive(Component)]` type in the dependency graph is discovered,
//! constructed, and advanced through its lifecycle inside `build()`. Types
//! constructed outside the derive macro can still be registered directly
//! against the built container:
//!
//! ```rust
//! use loomwork_context::ContextBuilder;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct DatabaseService {
//!     connection_url: String,
//! }
//!
//! let context = ContextBuilder::new()
//!     .with_property("database.url", "postgres://localhost/myapp")
//!     .build()
//!     .unwrap();
//!
//! let db_service = Arc::new(DatabaseService {
//!     connection_url: context.get_config("database.url"),
//! });
//! context.container().register_component(db_service);
//!
//! let retrieved: Option<Arc<DatabaseService>> = context.get_component();
//! assert!(retrieved.is_some());
//! ```
//!
//! ## Environment Profiles
//!
//! ```rust
//! use loomwork_context::{ContextBuilder, Profile};
//! use std::collections::HashMap;
//!
//! let mut dev_props = HashMap::new();
//! dev_props.insert("database.url".to_string(), "postgres://localhost/dev".to_string());
//! dev_props.insert("logging.level".to_string(), "DEBUG".to_string());
//! let dev_profile = Profile::new("development", dev_props);
//!
//! let context = ContextBuilder::new()
//!     .with_profile(dev_profile)
//!     .with_active_profile("development")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(context.get_config("logging.level"), "DEBUG");
//! ```
//!
//! ## Configuration Sources Priority
//!
//! Highest to lowest precedence:
//!
//! 1. **Runtime Properties**: values set via `set_config()`
//! 2. **Active Profiles**: profile-specific configuration properties
//! 3. **Configuration Sources**: sources added via `with_config_source`/`with_property` (last added wins)
//! 4. **Properties File**: `with_config_file_location`, default `settings.properties`
//! 5. **`#[config]` field default**: the string literal declared on the field itself
//!
//! All file formats (TOML, YAML, properties) are flattened to dot-notation
//! keys (e.g. `app.name`, `database.host`) for uniform access.
//!
//! ## Context Lifecycle Events
//!
//! * `ContextInitializingEvent` — fired once the configuration manager and
//!   profiles are assembled, before the container is built.
//! * `ProfileActivatedEvent` — fired as each active profile is applied.
//! * `ContextInitializedEvent` — fired once the container has finished
//!   building (every managed component reached `Started`).
//! * `ConfigurationChangedEvent` — fired by `set_config` at runtime.
//!
//! ```rust
//! use loomwork_context::{ContextBuilder, ContextInitializedEvent, ContextAwareEventListener, ApplicationContext};
//!
//! struct StartupTasks;
//!
//! impl ContextAwareEventListener<ContextInitializedEvent> for StartupTasks {
//!     fn on_context_event(&self, event: &ContextInitializedEvent, context: &ApplicationContext) {
//!         println!("context initialized with {} sources", event.config_sources_count);
//!         println!("running in {} environment", context.environment());
//!     }
//! }
//!
//! // Subscriptions made on a built context only see events published after
//! // the subscription — use `subscribe_to_context_events` on a long-lived
//! // context for events published from then on, such as `ConfigurationChangedEvent`.
//! let context = ContextBuilder::new().build().unwrap();
//! context.subscribe_to_context_events(StartupTasks);
//! ```

pub mod bundle;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod profile;

// Re-export main types for convenience
pub use bundle::{Bundle, TypeIdBundle};
pub use config::{
    coerce_field, coerce_optional, ConfigCoerce, ConfigComponent, ConfigFactory, ConfigManager,
    ConfigSource, ConfigValue,
};
pub use context::{ApplicationContext, ContextBuilder};
pub use error::{ContextError, ContextResult};
pub use event::{
    AnyContextAwareEventListener, AnyEventListener, ConfigurationChangedEvent,
    ContextAwareEventListener, ContextInitializedEvent, ContextInitializingEvent, Event,
    EventListener, EventPublisher, ProfileActivatedEvent,
};
pub use profile::{Profile, ProfileManager};
