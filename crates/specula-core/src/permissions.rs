//! Reflection access policy
//!
//! Decides whether forced member access is allowed. Permissions resolve
//! from the most specific level to the least specific one:
//! class name, then package (exact entry, then the first matching wildcard
//! rule), then the global default.
//!
//! ## TOML Configuration
//!
//! ```toml
//! [reflect.permissions]
//! global = "ALL"
//! sealed = ["internal.secret"]
//!
//! [reflect.permissions.packages]
//! "com.example" = "ALL"
//! "plugins.*" = "PUBLIC_ONLY"
//! "untrusted.**" = "READ_PUBLIC|INVOKE_PUBLIC"
//!
//! [reflect.permissions.classes]
//! "com.example.Vault" = "READ_PUBLIC"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Reflection permission flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReflectionPermission(u8);

impl ReflectionPermission {
    /// No reflective access
    pub const NONE: Self = Self(0x00);
    /// Read public fields
    pub const READ_PUBLIC: Self = Self(0x01);
    /// Read non-public fields
    pub const READ_PRIVATE: Self = Self(0x02);
    /// Write public fields
    pub const WRITE_PUBLIC: Self = Self(0x04);
    /// Write non-public fields
    pub const WRITE_PRIVATE: Self = Self(0x08);
    /// Invoke public methods
    pub const INVOKE_PUBLIC: Self = Self(0x10);
    /// Invoke non-public methods
    pub const INVOKE_PRIVATE: Self = Self(0x20);

    /// READ_PUBLIC | READ_PRIVATE
    pub const READ_ALL: Self = Self(0x03);
    /// WRITE_PUBLIC | WRITE_PRIVATE
    pub const WRITE_ALL: Self = Self(0x0C);
    /// INVOKE_PUBLIC | INVOKE_PRIVATE
    pub const INVOKE_ALL: Self = Self(0x30);
    /// READ_PUBLIC | WRITE_PUBLIC | INVOKE_PUBLIC
    pub const PUBLIC_ONLY: Self = Self(0x15);
    /// Every flag
    pub const ALL: Self = Self(0x3F);

    /// Create from raw bits (unknown bits are dropped)
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if permission contains a flag
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of permissions
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Intersection of permissions
    pub const fn intersection(&self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Difference (remove flags)
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Read flag for a public or non-public field
    pub const fn read(public: bool) -> Self {
        if public {
            Self::READ_PUBLIC
        } else {
            Self::READ_PRIVATE
        }
    }

    /// Write flag for a public or non-public field
    pub const fn write(public: bool) -> Self {
        if public {
            Self::WRITE_PUBLIC
        } else {
            Self::WRITE_PRIVATE
        }
    }

    /// Invoke flag for a public or non-public method
    pub const fn invoke(public: bool) -> Self {
        if public {
            Self::INVOKE_PUBLIC
        } else {
            Self::INVOKE_PRIVATE
        }
    }

    /// Parse combined flags from a pipe-separated string
    /// (e.g. `"READ_PUBLIC|WRITE_PUBLIC"`)
    pub fn from_combined_str(s: &str) -> Option<Self> {
        s.split('|')
            .map(|part| part.trim().parse::<Self>().ok())
            .try_fold(Self::NONE, |acc, perm| perm.map(|p| acc.union(p)))
    }

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::NONE => "NONE",
            Self::READ_PUBLIC => "READ_PUBLIC",
            Self::READ_PRIVATE => "READ_PRIVATE",
            Self::WRITE_PUBLIC => "WRITE_PUBLIC",
            Self::WRITE_PRIVATE => "WRITE_PRIVATE",
            Self::INVOKE_PUBLIC => "INVOKE_PUBLIC",
            Self::INVOKE_PRIVATE => "INVOKE_PRIVATE",
            Self::READ_ALL => "READ_ALL",
            Self::WRITE_ALL => "WRITE_ALL",
            Self::INVOKE_ALL => "INVOKE_ALL",
            Self::PUBLIC_ONLY => "PUBLIC_ONLY",
            Self::ALL => "ALL",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for ReflectionPermission {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromStr for ReflectionPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let perm = match s.to_uppercase().as_str() {
            "NONE" => Self::NONE,
            "READ_PUBLIC" => Self::READ_PUBLIC,
            "READ_PRIVATE" => Self::READ_PRIVATE,
            "WRITE_PUBLIC" => Self::WRITE_PUBLIC,
            "WRITE_PRIVATE" => Self::WRITE_PRIVATE,
            "INVOKE_PUBLIC" => Self::INVOKE_PUBLIC,
            "INVOKE_PRIVATE" => Self::INVOKE_PRIVATE,
            "READ_ALL" => Self::READ_ALL,
            "WRITE_ALL" => Self::WRITE_ALL,
            "INVOKE_ALL" => Self::INVOKE_ALL,
            "PUBLIC_ONLY" => Self::PUBLIC_ONLY,
            "ALL" => Self::ALL,
            _ => {
                let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    Some(hex) => u8::from_str_radix(hex, 16),
                    None => s.parse::<u8>(),
                };
                return bits
                    .map(Self::from_bits)
                    .map_err(|_| format!("unknown permission '{}'", s));
            }
        };
        Ok(perm)
    }
}

impl fmt::Display for ReflectionPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// Package permission pattern
///
/// `a.b` matches exactly, `a.b.*` matches direct sub-packages of `a.b`,
/// `a.b.**` matches `a.b` and everything below it, `*` and `**` match
/// every package.
#[derive(Debug, Clone)]
pub struct PackageRule {
    /// Pattern (e.g. `"plugins.*"`)
    pub pattern: String,
    /// Permissions for matching packages
    pub permissions: ReflectionPermission,
}

impl PackageRule {
    /// Create a new rule
    pub fn new(pattern: impl Into<String>, permissions: ReflectionPermission) -> Self {
        Self {
            pattern: pattern.into(),
            permissions,
        }
    }

    /// Check if a package name matches this pattern
    pub fn matches(&self, package: &str) -> bool {
        package_matches(&self.pattern, package)
    }
}

fn package_matches(pattern: &str, package: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix(".**") {
        package == prefix
            || package
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'))
    } else if let Some(prefix) = pattern.strip_suffix(".*") {
        package
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|child| !child.is_empty() && !child.contains('.'))
    } else {
        pattern == package
    }
}

/// Errors raised while loading an access policy
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML or has the wrong shape
    #[error("Invalid policy configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A permission value could not be parsed
    #[error("Invalid permission value for {key}: {value}")]
    InvalidPermission {
        /// Configuration key
        key: String,
        /// Offending value
        value: String,
    },
}

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    reflect: ReflectSection,
}

#[derive(Debug, Default, Deserialize)]
struct ReflectSection {
    #[serde(default)]
    permissions: PermissionsSection,
}

#[derive(Debug, Default, Deserialize)]
struct PermissionsSection {
    global: Option<String>,
    #[serde(default)]
    sealed: Vec<String>,
    #[serde(default)]
    packages: toml::Table,
    #[serde(default)]
    classes: toml::Table,
}

/// Host access policy consulted by forced member access
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    /// Global default permissions
    global_default: ReflectionPermission,

    /// Class-level permissions: fully qualified class name -> permissions
    class_permissions: FxHashMap<String, ReflectionPermission>,

    /// Package-level permissions: exact package name -> permissions
    package_permissions: FxHashMap<String, ReflectionPermission>,

    /// Package wildcard rules, first match wins
    package_rules: Vec<PackageRule>,

    /// Sealed package patterns
    sealed_packages: Vec<String>,
}

impl AccessPolicy {
    /// Create a policy that allows everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any restriction is configured
    pub fn has_any_restrictions(&self) -> bool {
        self.global_default != ReflectionPermission::ALL
            || !self.class_permissions.is_empty()
            || !self.package_permissions.is_empty()
            || !self.package_rules.is_empty()
            || !self.sealed_packages.is_empty()
    }

    // ===== Global Permissions =====

    /// Set global default permissions
    pub fn set_global(&mut self, permissions: ReflectionPermission) {
        self.global_default = permissions;
    }

    /// Get global default permissions
    pub fn global(&self) -> ReflectionPermission {
        self.global_default
    }

    // ===== Class Permissions =====

    /// Set class-level permissions
    pub fn set_class(&mut self, class_name: &str, permissions: ReflectionPermission) {
        self.class_permissions.insert(class_name.to_string(), permissions);
    }

    /// Get class-level permissions (not resolved)
    pub fn class(&self, class_name: &str) -> Option<ReflectionPermission> {
        self.class_permissions.get(class_name).copied()
    }

    /// Clear class-level permissions
    pub fn clear_class(&mut self, class_name: &str) {
        self.class_permissions.remove(class_name);
    }

    // ===== Package Permissions =====

    /// Set permissions for a package; patterns containing `*` become rules
    pub fn set_package(&mut self, package: &str, permissions: ReflectionPermission) {
        if package.contains('*') {
            self.add_package_rule(PackageRule::new(package, permissions));
        } else {
            self.package_permissions.insert(package.to_string(), permissions);
        }
    }

    /// Add a wildcard package rule
    pub fn add_package_rule(&mut self, rule: PackageRule) {
        self.package_rules.push(rule);
    }

    /// Get package permissions with pattern matching
    pub fn package_resolved(&self, package: &str) -> Option<ReflectionPermission> {
        if let Some(perms) = self.package_permissions.get(package) {
            return Some(*perms);
        }
        self.package_rules
            .iter()
            .find(|rule| rule.matches(package))
            .map(|rule| rule.permissions)
    }

    // ===== Sealing =====

    /// Seal a package (or package pattern): its non-public members can no
    /// longer be made accessible
    pub fn seal_package(&mut self, pattern: &str) {
        if !self.sealed_packages.iter().any(|p| p == pattern) {
            self.sealed_packages.push(pattern.to_string());
        }
    }

    /// Check if a package is sealed
    pub fn is_sealed(&self, package: &str) -> bool {
        self.sealed_packages
            .iter()
            .any(|pattern| package_matches(pattern, package))
    }

    // ===== Permission Resolution =====

    /// Resolve permissions for a class, checking all levels
    pub fn resolve(&self, class_name: &str) -> ReflectionPermission {
        if let Some(perms) = self.class(class_name) {
            return perms;
        }

        let package = class_name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("");
        if let Some(perms) = self.package_resolved(package) {
            return perms;
        }

        self.global_default
    }

    /// Check if a specific permission is allowed for a class
    pub fn check(&self, class_name: &str, required: ReflectionPermission) -> bool {
        self.resolve(class_name).contains(required)
    }

    // ===== TOML Configuration =====

    /// Parse a policy from TOML
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut policy = Self::new();
        policy.load_from_toml(content)?;
        Ok(policy)
    }

    /// Merge a TOML document into this policy
    pub fn load_from_toml(&mut self, content: &str) -> Result<(), ConfigError> {
        let file: PolicyFile = toml::from_str(content)?;
        let section = file.reflect.permissions;

        if let Some(global) = section.global {
            self.global_default = parse_permission("global", &global)?;
        }

        for (package, value) in &section.packages {
            let perms = parse_permission_value(package, value)?;
            self.set_package(package, perms);
        }

        for (class_name, value) in &section.classes {
            let perms = parse_permission_value(class_name, value)?;
            self.set_class(class_name, perms);
        }

        for pattern in &section.sealed {
            self.seal_package(pattern);
        }

        Ok(())
    }

    /// Load a policy from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

fn parse_permission(key: &str, value: &str) -> Result<ReflectionPermission, ConfigError> {
    ReflectionPermission::from_combined_str(value).ok_or_else(|| ConfigError::InvalidPermission {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_permission_value(key: &str, value: &toml::Value) -> Result<ReflectionPermission, ConfigError> {
    match value {
        toml::Value::String(s) => parse_permission(key, s),
        toml::Value::Integer(bits) => u8::try_from(*bits)
            .map(ReflectionPermission::from_bits)
            .map_err(|_| ConfigError::InvalidPermission {
                key: key.to_string(),
                value: bits.to_string(),
            }),
        other => Err(ConfigError::InvalidPermission {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}
