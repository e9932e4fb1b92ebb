//! Application context: the builder façade over [`loomwork_ioc::Container`],
//! plus the ambient configuration/profile/event infrastructure the container
//! itself has no notion of.
//!
//! Building a context discovers every `#[derive(Component)]` type via
//! `inventory`, constructs them in dependency order, and advances the whole
//! graph through its staged lifecycle, all inside [`ContextBuilder::build`] —
//! the container that comes out the other end is immutable afterwards (see
//! [`loomwork_ioc::Container`]).

use crate::bundle::Bundle;
use crate::config::{ConfigFactory, ConfigManager, ConfigSource, ConfigValue};
use crate::error::{ContextError, ContextResult};
use crate::event::{
    ConfigurationChangedEvent, ContextAwareEventListener, ContextInitializedEvent,
    ContextInitializingEvent, Event, EventListener, EventPublisher, ProfileActivatedEvent,
};
use crate::profile::Profile;
use dashmap::DashMap;
use loomwork_ioc::{Container, Injectable};
use std::any::TypeId;
use std::path::Path;
use std::sync::Arc;

/// Properties file consulted when no explicit location was set on the
/// builder — the lowest-precedence file-backed source in the binder's
/// precedence order, below profiles, sources, and runtime overrides.
const DEFAULT_CONFIG_FILE: &str = "settings.properties";

/// A type `put`/`put_bundle` named, checked against the discovered component
/// set once `build` has run the container through `inventory`.
#[derive(Debug, Clone, Copy)]
struct ExpectedType {
    type_id: TypeId,
    type_name: &'static str,
}

/// Builder for an [`ApplicationContext`].
///
/// # Examples
///
/// ```rust
/// use loomwork_context::{ContextBuilder, Profile};
/// use std::collections::HashMap;
///
/// let profile = Profile::new("development", HashMap::new());
///
/// let context = ContextBuilder::new()
///     .with_profile(profile)
///     .with_active_profile("development")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ContextBuilder {
    config_sources: Vec<ConfigSource>,
    active_profiles: Vec<String>,
    profiles: Vec<Profile>,
    properties: std::collections::HashMap<String, String>,
    config_file_location: Option<String>,
    extra_keys: Vec<(TypeId, &'static str, bool)>,
    expected_types: Vec<ExpectedType>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            active_profiles: Vec::new(),
            profiles: Vec::new(),
            properties: std::collections::HashMap::new(),
            config_file_location: None,
            extra_keys: Vec::new(),
            expected_types: Vec::new(),
        }
    }

    /// Adds a configuration source.
    pub fn with_config_source(mut self, source: ConfigSource) -> Self {
        self.config_sources.push(source);
        self
    }

    /// Loads configuration from a TOML file.
    pub fn with_toml_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.config_sources.push(ConfigSource::TomlFile(path_str));
        self
    }

    /// Loads configuration from a YAML file.
    pub fn with_yaml_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.config_sources.push(ConfigSource::YamlFile(path_str));
        self
    }

    /// Loads configuration from a Properties file.
    pub fn with_properties_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.config_sources
            .push(ConfigSource::PropertiesFile(path_str));
        self
    }

    /// Loads configuration from a file, auto-detecting its format from the
    /// extension.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.config_sources.push(ConfigSource::ConfigFile(path_str));
        self
    }

    /// Names the properties file the binder falls back to when a key has no
    /// programmatic override and no earlier source supplies it. Unlike
    /// [`Self::with_properties_config_file`], which adds an immediate source,
    /// this only changes which file fills the default-properties slot — it
    /// is still the lowest-precedence source, below every `#[config]` field's
    /// own declared default only if the key is entirely absent there too.
    pub fn with_config_file_location<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file_location = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Sets an active profile.
    pub fn with_active_profile(mut self, profile: impl Into<String>) -> Self {
        self.active_profiles.push(profile.into());
        self
    }

    /// Adds a profile.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Sets a property value, at the highest precedence of any source.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// `putParam(key, value)`: same as [`Self::with_property`], named to
    /// match the builder's key/value registration surface.
    pub fn put_param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_property(key, value)
    }

    /// `put(type T)`. Every `#[derive(Component)]` type is already
    /// discovered and registered under its own key via `inventory`
    /// regardless of whether `put` is ever called — there's no separate
    /// "register this type" step left to perform at the builder. What `put`
    /// still does is assert the type was actually discovered: `build` fails
    /// if `T` never shows up among the container's managed components,
    /// catching a type that forgot to derive `Component`.
    pub fn put<T: 'static>(mut self) -> Self {
        self.expected_types.push(ExpectedType {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        });
        self
    }

    /// `put(key K, type T)`: registers `T` under `key` with `overwrite =
    /// true`, applied on top of `T`'s own `#[component(inject_key = ..)]`
    /// declarations when the container is built.
    pub fn put_key<T: 'static>(mut self, key: &'static str) -> Self {
        self.extra_keys.push((TypeId::of::<T>(), key, true));
        self
    }

    /// `putBundle(bundle B)`: registers every type `B` enumerates exactly as
    /// a `put(type)` call would — including the same discovery check.
    pub fn put_bundle(mut self, bundle: &dyn Bundle) -> Self {
        for type_id in bundle.component_type_ids() {
            self.expected_types.push(ExpectedType {
                type_id,
                type_name: "<bundle member>",
            });
        }
        self
    }

    /// Builds the application context: assembles the configuration manager,
    /// activates profiles, builds the IoC container (discovering, creating,
    /// and starting every managed component), and materializes every
    /// `#[derive(Configuration)]` section.
    pub fn build(self) -> ContextResult<ApplicationContext> {
        let mut config_manager = ConfigManager::new();

        let config_file_location = self
            .config_file_location
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        config_manager.add_source(ConfigSource::ConfigFile(config_file_location))?;

        for source in self.config_sources {
            config_manager.add_source(source)?;
        }

        if !self.properties.is_empty() {
            config_manager.add_source(ConfigSource::Properties(self.properties))?;
        }

        for profile in self.profiles {
            config_manager.profile_manager_mut().add_profile(profile)?;
        }

        let event_publisher = EventPublisher::new();
        let mut active_profile_count = 0usize;
        for profile_name in self.active_profiles {
            config_manager
                .profile_manager_mut()
                .activate_profile(&profile_name)?;

            let properties_count = config_manager
                .profile_manager()
                .get_profile_properties_count(&profile_name);

            event_publisher.publish(&ProfileActivatedEvent {
                profile_name: profile_name.clone(),
                properties_count,
                timestamp: std::time::SystemTime::now(),
            });
            active_profile_count += 1;
        }

        event_publisher.publish(&ContextInitializingEvent {
            config_sources_count: config_manager.sources_count(),
            active_profiles_count: active_profile_count,
            timestamp: std::time::SystemTime::now(),
        });

        let config_manager = Arc::new(config_manager);

        let container = Container::build(config_manager.as_ref(), &self.extra_keys)
            .map_err(|e| ContextError::initialization_failed(format!("container build failed: {e}")))?;

        container.register_component(config_manager.clone());

        for factory in inventory::iter::<ConfigFactory> {
            let instance = (factory.create_fn)(config_manager.as_ref())?;
            container.register_component_by_type_id((factory.type_id)(), instance);
        }

        for expected in &self.expected_types {
            let discovered = container
                .injectables()
                .any(|(type_id, _)| type_id == expected.type_id);
            if !discovered {
                return Err(ContextError::initialization_failed(format!(
                    "type '{}' was put into the builder but was never discovered as a component -- did it forget #[derive(Component)]?",
                    expected.type_name
                )));
            }
        }

        let context = ApplicationContext {
            config_manager,
            event_publisher,
            container: Arc::new(container),
            runtime_properties: DashMap::new(),
        };

        context.event_publisher.publish_with_context(
            &ContextInitializedEvent {
                config_sources_count: context.config_manager.sources_count(),
                active_profiles_count: context.active_profiles().len(),
                timestamp: std::time::SystemTime::now(),
            },
            &context,
        );

        Ok(context)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Central hub for application-wide configuration, environment, events, and
/// the built [`Container`].
///
/// # Examples
///
/// ```rust
/// use loomwork_context::ContextBuilder;
///
/// let context = ContextBuilder::new()
///     .with_property("app.name", "MyApp")
///     .build()
///     .unwrap();
///
/// let app_name = context.get_config("app.name");
/// let container = context.container();
/// ```
pub struct ApplicationContext {
    config_manager: Arc<ConfigManager>,
    event_publisher: EventPublisher,
    container: Arc<Container>,
    /// Values set at runtime via [`Self::set_config`] — the highest
    /// precedence source, consulted before falling through to
    /// `config_manager`'s own stack.
    runtime_properties: DashMap<String, ConfigValue>,
}

impl ApplicationContext {
    /// Creates a builder for constructing an application context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Gets a configuration value by key, or an empty string if absent.
    pub fn get_config(&self, key: &str) -> String {
        if let Some(value) = self.runtime_properties.get(key) {
            if let Some(s) = value.as_string() {
                return s;
            }
        }
        self.config_manager.get_string_or_default(key, "")
    }

    /// Gets a configuration value parsed as `T`.
    pub fn get_config_as<T>(&self, key: &str) -> ContextResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let value = match self.runtime_properties.get(key).and_then(|v| v.as_string()) {
            Some(raw) => raw,
            None => self.config_manager.get_string(key)?,
        };
        value
            .parse::<T>()
            .map_err(|e| ContextError::invalid_configuration(key, e.to_string()))
    }

    /// Gets a configuration value, falling back to `default` if absent.
    pub fn get_config_or_default(&self, key: &str, default: &str) -> String {
        let value = self.get_config(key);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }

    /// Sets a configuration property at runtime, taking precedence over
    /// every source the context was built with.
    pub fn set_config(&self, key: &str, value: &str) {
        let old_value = self.get_config(key);
        let old_value_opt = if old_value.is_empty() {
            None
        } else {
            Some(old_value)
        };

        self.runtime_properties
            .insert(key.to_string(), ConfigValue::String(value.to_string()));

        self.event_publisher.publish(&ConfigurationChangedEvent {
            key: key.to_string(),
            old_value: old_value_opt,
            new_value: value.to_string(),
            timestamp: std::time::SystemTime::now(),
        });
    }

    /// Gets the built IoC container.
    pub fn container(&self) -> Arc<Container> {
        self.container.clone()
    }

    /// Gets the shared configuration manager.
    pub fn config_manager(&self) -> Arc<ConfigManager> {
        self.config_manager.clone()
    }

    /// Gets a managed or manually-registered component from the container.
    pub fn get_component<T: 'static + Send + Sync>(&self) -> Option<Arc<T>> {
        self.container.get::<T>()
    }

    /// Populates `target`'s `#[autowired]` fields from the container.
    pub fn inject<T: Injectable>(&self, target: &mut T) {
        self.container.inject(target);
    }

    /// Stops the container, driving every managed component to `Stopped`.
    pub fn stop(&self) -> ContextResult<()> {
        self.container
            .stop()
            .map_err(|e| ContextError::initialization_failed(format!("shutdown failed: {e}")))
    }

    /// Publishes an event to every registered listener.
    pub fn publish_event<T: Event + 'static>(&self, event: &T) {
        self.event_publisher.publish(event);
    }

    /// Subscribes a context-aware listener, which receives both the event
    /// and a reference to this context.
    pub fn subscribe_to_context_events<
        T: Event + 'static,
        L: ContextAwareEventListener<T> + 'static,
    >(
        &self,
        listener: L,
    ) {
        self.event_publisher.subscribe_context_aware(listener);
    }

    /// Subscribes a regular listener, which receives only the event.
    pub fn subscribe_to_events<T: Event + 'static, L: EventListener<T> + 'static>(
        &self,
        listener: L,
    ) {
        self.event_publisher.subscribe(listener);
    }

    /// Gets the active profiles.
    pub fn active_profiles(&self) -> Vec<String> {
        self.config_manager
            .profile_manager()
            .active_profiles()
            .to_vec()
    }

    /// Checks whether a specific profile is active.
    pub fn is_profile_active(&self, profile_name: &str) -> bool {
        self.active_profiles().contains(&profile_name.to_string())
    }

    /// A comma-joined summary of the active profiles, or `"default"` if none
    /// are active.
    pub fn environment(&self) -> String {
        let profiles = self.active_profiles();
        if profiles.is_empty() {
            "default".to_string()
        } else {
            profiles.join(",")
        }
    }
}
