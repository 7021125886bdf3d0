//! File-based router settings
//!
//! Applications that prefer configuration files over builder calls can keep
//! the adapter choice and the link styling in TOML:
//!
//! ```toml
//! [router]
//! active_class = "is-current"
//!
//! [adapter]
//! kind = "history"
//! base = "/app"
//! require_navigation_api = false
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use waymark_location::{
	BrowserWindow, HashAdapter, LocationAdapter, LocationError, MemoryAdapter, NavigationAdapter,
	NavigationAdapterOptions,
};
use waymark_router::RouterSettings;

/// Top-level settings
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
	#[serde(default)]
	pub router: RouterSection,

	#[serde(default)]
	pub adapter: AdapterSettings,
}

/// The `[router]` table
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSection {
	/// Class put on the link of the current route
	#[serde(default = "default_active_class")]
	pub active_class: String,
}

impl Default for RouterSection {
	fn default() -> Self {
		Self {
			active_class: default_active_class(),
		}
	}
}

fn default_active_class() -> String {
	RouterSettings::default().active_class
}

/// Which location backend drives the router
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
	/// Location in the URL fragment (`#/path`)
	#[default]
	Hash,
	/// In-process history, for embedded and test use
	Memory,
	/// History / Navigation API backed paths
	History,
}

/// The `[adapter]` table
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSettings {
	#[serde(default)]
	pub kind: AdapterKind,

	/// Starting location of the memory adapter
	#[serde(default = "default_initial_path")]
	pub initial_path: String,

	/// Path prefix the history adapter strips and adds
	#[serde(default)]
	pub base: String,

	/// Fail at startup when the Navigation API is missing instead of
	/// falling back to `pushState`/`popstate`
	#[serde(default)]
	pub require_navigation_api: bool,
}

impl Default for AdapterSettings {
	fn default() -> Self {
		Self {
			kind: AdapterKind::default(),
			initial_path: default_initial_path(),
			base: String::new(),
			require_navigation_api: false,
		}
	}
}

fn default_initial_path() -> String {
	"/".to_string()
}

impl Settings {
	/// Create new settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse settings from a TOML document
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		let settings: Settings = toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a `.toml` file
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();
		if path.extension().and_then(|s| s.to_str()) != Some("toml") {
			return Err(SettingsError::UnsupportedFormat(
				"Supported formats: .toml".to_string(),
			));
		}

		let contents = std::fs::read_to_string(&path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&contents)
	}

	/// Validate settings
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.router.active_class.trim().is_empty() {
			return Err(SettingsError::ValidationError(
				"router.active_class must not be empty".to_string(),
			));
		}

		if self.router.active_class.contains(char::is_whitespace) {
			return Err(SettingsError::ValidationError(format!(
				"router.active_class must be a single class name, got '{}'",
				self.router.active_class
			)));
		}

		if !self.adapter.initial_path.starts_with('/') {
			return Err(SettingsError::ValidationError(format!(
				"adapter.initial_path must start with '/', got '{}'",
				self.adapter.initial_path
			)));
		}

		Ok(())
	}

	/// The in-code router settings these settings describe
	pub fn router_settings(&self) -> RouterSettings {
		RouterSettings {
			active_class: self.router.active_class.clone(),
		}
	}

	/// Builds the configured location adapter.
	///
	/// The hash and history adapters need the browser window; the memory
	/// adapter ignores it.
	pub fn build_adapter(
		&self,
		window: Option<Rc<dyn BrowserWindow>>,
	) -> Result<Rc<dyn LocationAdapter>, SettingsError> {
		let adapter: Rc<dyn LocationAdapter> = match self.adapter.kind {
			AdapterKind::Memory => Rc::new(MemoryAdapter::new(&self.adapter.initial_path)),
			AdapterKind::Hash => {
				let window = window.ok_or(SettingsError::MissingWindow(AdapterKind::Hash))?;
				Rc::new(HashAdapter::new(window))
			}
			AdapterKind::History => {
				let window = window.ok_or(SettingsError::MissingWindow(AdapterKind::History))?;
				let options = NavigationAdapterOptions::new()
					.base(self.adapter.base.as_str())
					.require_navigation_api(self.adapter.require_navigation_api);
				Rc::new(NavigationAdapter::new(window, options)?)
			}
		};

		tracing::debug!(kind = ?self.adapter.kind, "Location adapter built from settings");
		Ok(adapter)
	}
}

/// Errors raised while loading settings or building from them
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Unsupported format: {0}")]
	UnsupportedFormat(String),

	#[error("The {0:?} adapter needs a browser window")]
	MissingWindow(AdapterKind),

	#[error(transparent)]
	Location(#[from] LocationError),
}
