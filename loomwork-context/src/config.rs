//! Configuration management system
//!
//! This module provides configuration management functionality for the loomwork context system.
//! It supports hierarchical configuration sources, property binding, type-safe configuration
//! access, and integration with environment profiles.

use crate::error::{ContextError, ContextResult};
use crate::profile::ProfileManager;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration file formats
#[derive(Debug, Clone, Copy)]
enum ConfigFileFormat {
    Toml,
    Yaml,
    Properties,
}

/// Configuration source types
/// 
/// `ConfigSource` represents different sources from which configuration
/// can be loaded, supporting various formats and locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Configuration from a TOML file
    TomlFile(String),
    /// Configuration from a YAML file
    YamlFile(String),
    /// Configuration from a Properties file
    PropertiesFile(String),
    /// Configuration from any file (auto-detect format)
    ConfigFile(String),
    /// Configuration from environment variables
    Environment,
    /// In-memory configuration properties
    Properties(HashMap<String, String>),
}

/// Configuration value types
/// 
/// `ConfigValue` represents different types of configuration values
/// that can be stored and retrieved from the configuration system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfigValue {
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Array of values
    Array(Vec<ConfigValue>),
    /// Nested object/map
    Object(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Converts the value to a string if possible
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigValue;
    /// 
    /// let value = ConfigValue::String("hello".to_string());
    /// assert_eq!(value.as_string(), Some("hello".to_string()));
    /// 
    /// let value = ConfigValue::Integer(42);
    /// assert_eq!(value.as_string(), Some("42".to_string()));
    /// ```
    pub fn as_string(&self) -> Option<String> {
        match self {
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
    
    /// Converts the value to an integer if possible
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigValue;
    /// 
    /// let value = ConfigValue::Integer(42);
    /// assert_eq!(value.as_integer(), Some(42));
    /// 
    /// let value = ConfigValue::String("123".to_string());
    /// assert_eq!(value.as_integer(), Some(123));
    /// ```
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
    
    /// Converts the value to a float if possible
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigValue;
    /// 
    /// let value = ConfigValue::Float(3.14);
    /// assert_eq!(value.as_float(), Some(3.14));
    /// 
    /// let value = ConfigValue::Integer(42);
    /// assert_eq!(value.as_float(), Some(42.0));
    /// ```
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
    
    /// Converts the value to a boolean if possible
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigValue;
    /// 
    /// let value = ConfigValue::Boolean(true);
    /// assert_eq!(value.as_boolean(), Some(true));
    /// 
    /// let value = ConfigValue::String("true".to_string());
    /// assert_eq!(value.as_boolean(), Some(true));
    /// ```
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            ConfigValue::String(s) => {
                match s.to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => Some(true),
                    "false" | "no" | "off" | "0" => Some(false),
                    _ => None,
                }
            }
            ConfigValue::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }
    
    /// Converts the value to an array if possible
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigValue;
    /// 
    /// let value = ConfigValue::Array(vec![
    ///     ConfigValue::String("a".to_string()),
    ///     ConfigValue::String("b".to_string()),
    /// ]);
    /// assert!(value.as_array().is_some());
    /// ```
    pub fn as_array(&self) -> Option<&Vec<ConfigValue>> {
        match self {
            ConfigValue::Array(arr) => Some(arr),
            _ => None,
        }
    }
    
    /// Converts the value to an object/map if possible
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigValue;
    /// use std::collections::HashMap;
    /// 
    /// let mut obj = HashMap::new();
    /// obj.insert("key".to_string(), ConfigValue::String("value".to_string()));
    /// 
    /// let value = ConfigValue::Object(obj);
    /// assert!(value.as_object().is_some());
    /// ```
    pub fn as_object(&self) -> Option<&HashMap<String, ConfigValue>> {
        match self {
            ConfigValue::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

/// Configuration manager
/// 
/// `ConfigManager` provides comprehensive configuration management functionality,
/// including loading from multiple sources, hierarchical property resolution,
/// type-safe access, and integration with environment profiles.
/// 
/// # Examples
/// 
/// ```rust
/// use loomwork_context::{ConfigManager, ConfigSource};
/// use std::collections::HashMap;
/// 
/// let mut manager = ConfigManager::new();
/// 
/// // Add configuration from properties
/// let mut props = HashMap::new();
/// props.insert("app.name".to_string(), "MyApp".to_string());
/// props.insert("app.port".to_string(), "8080".to_string());
/// 
/// manager.add_source(ConfigSource::Properties(props)).unwrap();
/// 
/// assert_eq!(manager.get_string("app.name").unwrap(), "MyApp");
/// assert_eq!(manager.get_integer("app.port").unwrap(), 8080);
/// ```
#[derive(Debug)]
pub struct ConfigManager {
    /// Configuration sources in order of precedence (last added has highest precedence)
    sources: Vec<ConfigSource>,
    /// Cached configuration values
    cache: DashMap<String, ConfigValue>,
    /// Profile manager for environment-specific configurations
    profile_manager: ProfileManager,
}

impl ConfigManager {
    /// Creates a new configuration manager
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigManager;
    /// 
    /// let manager = ConfigManager::new();
    /// ```
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cache: DashMap::new(),
            profile_manager: ProfileManager::new(),
        }
    }
    
    /// Adds a configuration source
    /// 
    /// Sources added later have higher precedence than those added earlier.
    /// 
    /// # Arguments
    /// 
    /// * `source` - The configuration source to add
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, ConfigSource};
    /// use std::collections::HashMap;
    /// 
    /// let mut manager = ConfigManager::new();
    /// let props = HashMap::new();
    /// 
    /// manager.add_source(ConfigSource::Properties(props)).unwrap();
    /// ```
    pub fn add_source(&mut self, source: ConfigSource) -> ContextResult<()> {
        self.sources.push(source);
        self.invalidate_cache();
        Ok(())
    }
    
    /// Loads configuration from a TOML file
    /// 
    /// # Arguments
    /// 
    /// * `path` - Path to the TOML configuration file
    /// 
    /// # Examples
    /// 
    /// ```rust,no_run
    /// use loomwork_context::ConfigManager;
    /// 
    /// let mut manager = ConfigManager::new();
    /// manager.load_from_toml_file("config/app.toml").unwrap();
    /// ```
    pub fn load_from_toml_file<P: AsRef<Path>>(&mut self, path: P) -> ContextResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.add_source(ConfigSource::TomlFile(path_str))
    }
    
    /// Loads configuration from a YAML file
    /// 
    /// # Arguments
    /// 
    /// * `path` - Path to the YAML configuration file
    /// 
    /// # Examples
    /// 
    /// ```rust,no_run
    /// use loomwork_context::ConfigManager;
    /// 
    /// let mut manager = ConfigManager::new();
    /// manager.load_from_yaml_file("config/app.yaml").unwrap();
    /// ```
    pub fn load_from_yaml_file<P: AsRef<Path>>(&mut self, path: P) -> ContextResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.add_source(ConfigSource::YamlFile(path_str))
    }
    
    /// Loads configuration from a Properties file
    /// 
    /// # Arguments
    /// 
    /// * `path` - Path to the Properties configuration file
    /// 
    /// # Examples
    /// 
    /// ```rust,no_run
    /// use loomwork_context::ConfigManager;
    /// 
    /// let mut manager = ConfigManager::new();
    /// manager.load_from_properties_file("config/app.properties").unwrap();
    /// ```
    pub fn load_from_properties_file<P: AsRef<Path>>(&mut self, path: P) -> ContextResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.add_source(ConfigSource::PropertiesFile(path_str))
    }
    
    /// Loads configuration from a file with automatic format detection
    /// 
    /// The format is detected based on the file extension:
    /// - `.toml` -> TOML format
    /// - `.yaml` or `.yml` -> YAML format  
    /// - `.properties` -> Properties format
    /// - Others -> Attempts to parse as TOML first, then YAML, then Properties
    /// 
    /// # Arguments
    /// 
    /// * `path` - Path to the configuration file
    /// 
    /// # Examples
    /// 
    /// ```rust,no_run
    /// use loomwork_context::ConfigManager;
    /// 
    /// let mut manager = ConfigManager::new();
    /// manager.load_from_config_file("config/app.yaml").unwrap();
    /// manager.load_from_config_file("config/database.properties").unwrap();
    /// manager.load_from_config_file("config/server.toml").unwrap();
    /// ```
    pub fn load_from_config_file<P: AsRef<Path>>(&mut self, path: P) -> ContextResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        self.add_source(ConfigSource::ConfigFile(path_str))
    }
    
    /// Gets a configuration value by key
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key (e.g., "database.url")
    /// 
    /// # Returns
    /// 
    /// The configuration value if found, `None` otherwise
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, ConfigSource};
    /// use std::collections::HashMap;
    /// 
    /// let mut manager = ConfigManager::new();
    /// let mut props = HashMap::new();
    /// props.insert("test.key".to_string(), "test.value".to_string());
    /// 
    /// manager.add_source(ConfigSource::Properties(props)).unwrap();
    /// 
    /// let value = manager.get("test.key");
    /// assert!(value.is_some());
    /// ```
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        // Check cache first
        if let Some(cached) = self.cache.get(key) {
            return Some(cached.clone());
        }
        
        // Check profile manager first (profiles have highest precedence)
        if let Some(profile_value) = self.profile_manager.get_property(key) {
            let value = ConfigValue::String(profile_value.to_string());
            self.cache.insert(key.to_string(), value.clone());
            return Some(value);
        }
        
        // Check sources in reverse order (last added has highest precedence)
        for source in self.sources.iter().rev() {
            if let Some(value) = self.get_from_source(source, key) {
                self.cache.insert(key.to_string(), value.clone());
                return Some(value);
            }
        }
        
        None
    }
    
    /// Gets a configuration value as a string
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// 
    /// # Returns
    /// 
    /// The configuration value as a string
    /// 
    /// # Errors
    /// 
    /// Returns an error if the key is not found or cannot be converted to a string
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, ConfigSource};
    /// use std::collections::HashMap;
    /// 
    /// let mut manager = ConfigManager::new();
    /// let mut props = HashMap::new();
    /// props.insert("app.name".to_string(), "MyApp".to_string());
    /// 
    /// manager.add_source(ConfigSource::Properties(props)).unwrap();
    /// 
    /// assert_eq!(manager.get_string("app.name").unwrap(), "MyApp");
    /// ```
    pub fn get_string(&self, key: &str) -> ContextResult<String> {
        self.get(key)
            .and_then(|v| v.as_string())
            .ok_or_else(|| ContextError::configuration_not_found(key))
    }
    
    /// Gets a configuration value as an integer
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// 
    /// # Returns
    /// 
    /// The configuration value as an integer
    /// 
    /// # Errors
    /// 
    /// Returns an error if the key is not found or cannot be converted to an integer
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, ConfigSource};
    /// use std::collections::HashMap;
    /// 
    /// let mut manager = ConfigManager::new();
    /// let mut props = HashMap::new();
    /// props.insert("app.port".to_string(), "8080".to_string());
    /// 
    /// manager.add_source(ConfigSource::Properties(props)).unwrap();
    /// 
    /// assert_eq!(manager.get_integer("app.port").unwrap(), 8080);
    /// ```
    pub fn get_integer(&self, key: &str) -> ContextResult<i64> {
        self.get(key)
            .and_then(|v| v.as_integer())
            .ok_or_else(|| ContextError::configuration_not_found(key))
    }
    
    /// Gets a configuration value as a float
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// 
    /// # Returns
    /// 
    /// The configuration value as a float
    /// 
    /// # Errors
    /// 
    /// Returns an error if the key is not found or cannot be converted to a float
    pub fn get_float(&self, key: &str) -> ContextResult<f64> {
        self.get(key)
            .and_then(|v| v.as_float())
            .ok_or_else(|| ContextError::configuration_not_found(key))
    }
    
    /// Gets a configuration value as a boolean
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// 
    /// # Returns
    /// 
    /// The configuration value as a boolean
    /// 
    /// # Errors
    /// 
    /// Returns an error if the key is not found or cannot be converted to a boolean
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, ConfigSource};
    /// use std::collections::HashMap;
    /// 
    /// let mut manager = ConfigManager::new();
    /// let mut props = HashMap::new();
    /// props.insert("app.debug".to_string(), "true".to_string());
    /// 
    /// manager.add_source(ConfigSource::Properties(props)).unwrap();
    /// 
    /// assert_eq!(manager.get_boolean("app.debug").unwrap(), true);
    /// ```
    pub fn get_boolean(&self, key: &str) -> ContextResult<bool> {
        self.get(key)
            .and_then(|v| v.as_boolean())
            .ok_or_else(|| ContextError::configuration_not_found(key))
    }
    
    /// Gets a configuration value with a default fallback
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// * `default` - The default value to return if key is not found
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigManager;
    /// 
    /// let manager = ConfigManager::new();
    /// 
    /// assert_eq!(manager.get_string_or_default("missing.key", "default"), "default");
    /// ```
    pub fn get_string_or_default(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }
    
    /// Gets an integer configuration value with a default fallback
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// * `default` - The default value to return if key is not found
    pub fn get_integer_or_default(&self, key: &str, default: i64) -> i64 {
        self.get_integer(key).unwrap_or(default)
    }
    
    /// Gets a boolean configuration value with a default fallback
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// * `default` - The default value to return if key is not found
    pub fn get_boolean_or_default(&self, key: &str, default: bool) -> bool {
        self.get_boolean(key).unwrap_or(default)
    }
    
    /// Gets a reference to the profile manager
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::ConfigManager;
    /// 
    /// let manager = ConfigManager::new();
    /// let profile_manager = manager.profile_manager();
    /// ```
    pub fn profile_manager(&self) -> &ProfileManager {
        &self.profile_manager
    }
    
    /// Gets a mutable reference to the profile manager
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, Profile};
    /// use std::collections::HashMap;
    /// 
    /// let mut manager = ConfigManager::new();
    /// let profile = Profile::new("development", HashMap::new());
    /// 
    /// manager.profile_manager_mut().add_profile(profile).unwrap();
    /// ```
    pub fn profile_manager_mut(&mut self) -> &mut ProfileManager {
        &mut self.profile_manager
    }
    
    /// Sets a configuration property
    /// 
    /// # Arguments
    /// 
    /// * `key` - The configuration key
    /// * `value` - The configuration value
    /// 
    /// # Examples
    /// 
    /// ```rust
    /// use loomwork_context::{ConfigManager, ConfigValue};
    /// 
    /// let mut manager = ConfigManager::new();
    /// manager.set("runtime.property", ConfigValue::String("value".to_string()));
    /// 
    /// assert_eq!(manager.get_string("runtime.property").unwrap(), "value");
    /// ```
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.cache.insert(key.to_string(), value);
    }
    
    /// Gets the number of configuration sources
    ///
    /// # Returns
    ///
    /// The total number of configuration sources
    pub fn sources_count(&self) -> usize {
        self.sources.len()
    }

    /// Gets a configuration value as a raw string, without the `ContextError`
    /// wrapping `get_string` uses — this is the method macro-generated
    /// `#[config]` field coercion and `ConfigLookup` call through.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_string())
    }
    
    /// Invalidates the configuration cache
    /// 
    /// This forces the manager to reload configuration values from sources
    /// on the next access.
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }
    
    // Helper method to get value from a specific source
    fn get_from_source(&self, source: &ConfigSource, key: &str) -> Option<ConfigValue> {
        match source {
            ConfigSource::Properties(props) => {
                props.get(key).map(|v| ConfigValue::String(v.clone()))
            }
            ConfigSource::Environment => {
                // Convert key to environment variable format (e.g., "app.port" -> "APP_PORT")
                let env_key = key.to_uppercase().replace('.', "_");
                std::env::var(&env_key)
                    .ok()
                    .map(|v| ConfigValue::String(v))
            }
            ConfigSource::TomlFile(path) => {
                self.load_file_config(path, ConfigFileFormat::Toml)
                    .and_then(|props| props.get(key).map(|v| ConfigValue::String(v.clone())))
            }
            ConfigSource::YamlFile(path) => {
                self.load_file_config(path, ConfigFileFormat::Yaml)
                    .and_then(|props| props.get(key).map(|v| ConfigValue::String(v.clone())))
            }
            ConfigSource::PropertiesFile(path) => {
                self.load_file_config(path, ConfigFileFormat::Properties)
                    .and_then(|props| props.get(key).map(|v| ConfigValue::String(v.clone())))
            }
            ConfigSource::ConfigFile(path) => {
                self.load_file_config_auto_detect(path)
                    .and_then(|props| props.get(key).map(|v| ConfigValue::String(v.clone())))
            }
        }
    }
    
    // Helper method to load configuration from file
    fn load_file_config(&self, path: &str, format: ConfigFileFormat) -> Option<HashMap<String, String>> {
        let content = std::fs::read_to_string(path).ok()?;
        
        match format {
            ConfigFileFormat::Toml => {
                let toml_value: toml::Value = toml::from_str(&content).ok()?;
                self.toml_value_to_config_map(&toml_value, "").ok()
            }
            ConfigFileFormat::Yaml => {
                let yaml_value: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
                self.yaml_value_to_config_map(&yaml_value, "").ok()
            }
            ConfigFileFormat::Properties => {
                self.parse_properties(&content).ok()
            }
        }
    }
    
    // Helper method to auto-detect file format and load configuration
    fn load_file_config_auto_detect(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_lower = path.to_lowercase();
        
        // Try to detect format by extension first
        if path_lower.ends_with(".toml") {
            return self.load_file_config(path, ConfigFileFormat::Toml);
        } else if path_lower.ends_with(".yaml") || path_lower.ends_with(".yml") {
            return self.load_file_config(path, ConfigFileFormat::Yaml);
        } else if path_lower.ends_with(".properties") {
            return self.load_file_config(path, ConfigFileFormat::Properties);
        }
        
        // If extension doesn't match known formats, try parsing in order: TOML, YAML, Properties
        if let Some(config) = self.load_file_config(path, ConfigFileFormat::Toml) {
            return Some(config);
        }
        
        if let Some(config) = self.load_file_config(path, ConfigFileFormat::Yaml) {
            return Some(config);
        }
        
        self.load_file_config(path, ConfigFileFormat::Properties)
    }
    
    // Helper method to convert YAML value to flat configuration map
    fn yaml_value_to_config_map(&self, value: &serde_yaml::Value, prefix: &str) -> ContextResult<HashMap<String, String>> {
        let mut map = HashMap::new();
        
        match value {
            serde_yaml::Value::Mapping(mapping) => {
                for (key, val) in mapping {
                    if let Some(key_str) = key.as_str() {
                        let full_key = if prefix.is_empty() {
                            key_str.to_string()
                        } else {
                            format!("{}.{}", prefix, key_str)
                        };
                        
                        match val {
                            serde_yaml::Value::Mapping(_) => {
                                // Recursively process nested mappings
                                let nested_map = self.yaml_value_to_config_map(val, &full_key)?;
                                map.extend(nested_map);
                            }
                            _ => {
                                // Convert primitive values to strings
                                map.insert(full_key, self.yaml_value_to_string(val));
                            }
                        }
                    }
                }
            }
            _ => {
                // For non-mapping values, use the prefix as the key
                if !prefix.is_empty() {
                    map.insert(prefix.to_string(), self.yaml_value_to_string(value));
                }
            }
        }
        
        Ok(map)
    }
    
    // Helper method to convert YAML value to string
    fn yaml_value_to_string(&self, value: &serde_yaml::Value) -> String {
        match value {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Sequence(arr) => {
                // Convert array to comma-separated string
                arr.iter()
                    .map(|v| self.yaml_value_to_string(v))
                    .collect::<Vec<_>>()
                    .join(",")
            }
            serde_yaml::Value::Null => "".to_string(),
            _ => format!("{:?}", value),
        }
    }
    
    // Helper method to parse Properties format
    fn parse_properties(&self, content: &str) -> ContextResult<HashMap<String, String>> {
        let mut map = HashMap::new();
        
        for line in content.lines() {
            let line = line.trim();
            
            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            
            // Find the first '=' or ':' separator
            if let Some(separator_pos) = line.find('=').or_else(|| line.find(':')) {
                let key = line[..separator_pos].trim().to_string();
                let value = line[separator_pos + 1..].trim().to_string();
                
                // Handle escaped characters and line continuations
                let processed_value = self.process_properties_value(&value);
                
                map.insert(key, processed_value);
            }
        }
        
        Ok(map)
    }
    
    // Helper method to process Properties file values (handle escaping, etc.)
    fn process_properties_value(&self, value: &str) -> String {
        // Basic processing - handle common escape sequences
        value
            .replace("\\n", "\n")
            .replace("\\t", "\t")
            .replace("\\r", "\r")
            .replace("\\\\", "\\")
    }
    fn toml_value_to_config_map(&self, value: &toml::Value, prefix: &str) -> ContextResult<HashMap<String, String>> {
        let mut map = HashMap::new();
        
        match value {
            toml::Value::Table(table) => {
                for (key, val) in table {
                    let full_key = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    
                    match val {
                        toml::Value::Table(_) => {
                            // Recursively process nested tables
                            let nested_map = self.toml_value_to_config_map(val, &full_key)?;
                            map.extend(nested_map);
                        }
                        _ => {
                            // Convert primitive values to strings
                            map.insert(full_key, self.toml_value_to_string(val));
                        }
                    }
                }
            }
            _ => {
                // For non-table values, use the prefix as the key
                if !prefix.is_empty() {
                    map.insert(prefix.to_string(), self.toml_value_to_string(value));
                }
            }
        }
        
        Ok(map)
    }
    
    // Helper method to convert TOML value to string
    fn toml_value_to_string(&self, value: &toml::Value) -> String {
        match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Array(arr) => {
                // Convert array to comma-separated string
                arr.iter()
                    .map(|v| self.toml_value_to_string(v))
                    .collect::<Vec<_>>()
                    .join(",")
            }
            _ => value.to_string(),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl loomwork_ioc::ConfigLookup for ConfigManager {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get_raw(key)
    }
}

/// Strict per-type coercion from a raw configuration string, used by both
/// `#[config]` fields on `#[derive(Component)]` structs and `#[derive(Configuration)]`
/// structs. Unlike `ConfigValue`'s lenient `as_*` methods, a value that does
/// not parse as `T` is a hard error rather than a silent `None`.
pub trait ConfigCoerce: Sized {
    fn coerce(raw: &str) -> Result<Self, String>;
}

macro_rules! impl_config_coerce_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigCoerce for $ty {
                fn coerce(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

impl_config_coerce_from_str!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char);

impl ConfigCoerce for String {
    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl ConfigCoerce for std::path::PathBuf {
    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(std::path::PathBuf::from(raw))
    }
}

impl ConfigCoerce for url::Url {
    fn coerce(raw: &str) -> Result<Self, String> {
        url::Url::parse(raw).map_err(|e| e.to_string())
    }
}

/// Booleans use a case-insensitive, lossy-permissive parse: anything other
/// than `"true"` coerces to `false` rather than failing, mirroring how the
/// rest of the scalar table treats malformed input as a hard error except
/// this one kind.
impl ConfigCoerce for bool {
    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(raw.eq_ignore_ascii_case("true"))
    }
}

/// Resolves a `#[config(name = ..., default = ...)]` field: looks the key up
/// via `config`, falling back to `default` when absent, and coerces whichever
/// raw string wins into `T`. A default that itself fails to coerce is a
/// configuration error, not a silent fallback to `T::default()` — a bad
/// `#[config]` default is a programmer error, not a runtime condition.
pub fn coerce_field<T: ConfigCoerce>(
    raw: Option<String>,
    default: &str,
) -> Result<T, loomwork_ioc::ComponentError> {
    let source = raw.unwrap_or_else(|| default.to_string());
    T::coerce(&source)
        .map_err(|e| loomwork_ioc::ComponentError::ConfigurationCoercion(format!("{source}: {e}")))
}

/// Resolves a `#[derive(Configuration)]` field: both the key and a usable
/// value are optional, so a missing key or a coercion failure is simply
/// `None` rather than an error — the struct's own field default (if any)
/// already ran before this is called.
pub fn coerce_optional<T: ConfigCoerce>(raw: String) -> Option<T> {
    T::coerce(&raw).ok()
}

/// The struct built by `#[derive(Configuration)]`: a configuration section
/// bound to a concrete struct rather than looked up key by key.
pub trait ConfigComponent: Sized {
    /// Builds an instance from the configuration manager, applying per-field
    /// defaults for any key that is absent or fails to coerce.
    fn from_config_manager(config_manager: &ConfigManager) -> ContextResult<Self>;

    /// The dotted key prefix this struct's fields are read from.
    fn config_module_key() -> &'static str;
}

/// Registered by `#[derive(Configuration)]`, analogous to `ComponentDefinition`
/// but for configuration-section structs rather than dependency-injected
/// components — these are created eagerly from the `ConfigManager` alone,
/// with no dependency graph involved.
pub struct ConfigFactory {
    pub type_id: fn() -> std::any::TypeId,
    pub create_fn: fn(&ConfigManager) -> ContextResult<std::sync::Arc<dyn std::any::Any + Send + Sync>>,
}

inventory::collect!(ConfigFactory);
