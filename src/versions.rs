//! Pinned package versions.
//!
//! Every version the overlay writes into `package.json` comes from a
//! [`VersionRegistry`]. The built-in pins live in [`crate::constants::versions`];
//! users can override individual pins in the `[versions]` table of the global
//! configuration, e.g.
//!
//! ```toml
//! [versions]
//! angular = "^12.1.0"
//! "zone.js" = "~0.11.5"
//! ```

use std::collections::BTreeMap;

use anyhow::Result;

use crate::constants::versions;
use crate::core::NginitError;

/// A named version pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pin {
    /// `@angular/*` framework and build packages.
    Angular,
    /// `rxjs`.
    Rxjs,
    /// `tslib`.
    Tslib,
    /// `zone.js`.
    ZoneJs,
    /// `jest-preset-angular`.
    JestPresetAngular,
    /// Nx plugins such as `@nrwl/jest` and `@nrwl/cypress`.
    Nx,
    /// `jest`.
    Jest,
    /// `@types/jest`.
    JestTypes,
    /// `ts-jest`.
    TsJest,
    /// `cypress`.
    Cypress,
    /// `karma`.
    Karma,
    /// `karma-chrome-launcher`.
    KarmaChromeLauncher,
    /// `karma-coverage`.
    KarmaCoverage,
    /// `karma-jasmine`.
    KarmaJasmine,
    /// `karma-jasmine-html-reporter`.
    KarmaJasmineHtmlReporter,
    /// `protractor`.
    Protractor,
    /// `jasmine-core`.
    JasmineCore,
    /// `jasmine-spec-reporter`.
    JasmineSpecReporter,
    /// `@types/jasmine`.
    JasmineTypes,
    /// `@types/jasminewd2`.
    Jasminewd2Types,
}

impl Pin {
    /// All pins, in table order.
    pub const ALL: [Self; 20] = [
        Self::Angular,
        Self::Rxjs,
        Self::Tslib,
        Self::ZoneJs,
        Self::JestPresetAngular,
        Self::Nx,
        Self::Jest,
        Self::JestTypes,
        Self::TsJest,
        Self::Cypress,
        Self::Karma,
        Self::KarmaChromeLauncher,
        Self::KarmaCoverage,
        Self::KarmaJasmine,
        Self::KarmaJasmineHtmlReporter,
        Self::Protractor,
        Self::JasmineCore,
        Self::JasmineSpecReporter,
        Self::JasmineTypes,
        Self::Jasminewd2Types,
    ];

    /// Key used in the `[versions]` configuration table.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Angular => "angular",
            Self::Rxjs => "rxjs",
            Self::Tslib => "tslib",
            Self::ZoneJs => "zone.js",
            Self::JestPresetAngular => "jest-preset-angular",
            Self::Nx => "nx",
            Self::Jest => "jest",
            Self::JestTypes => "@types/jest",
            Self::TsJest => "ts-jest",
            Self::Cypress => "cypress",
            Self::Karma => "karma",
            Self::KarmaChromeLauncher => "karma-chrome-launcher",
            Self::KarmaCoverage => "karma-coverage",
            Self::KarmaJasmine => "karma-jasmine",
            Self::KarmaJasmineHtmlReporter => "karma-jasmine-html-reporter",
            Self::Protractor => "protractor",
            Self::JasmineCore => "jasmine-core",
            Self::JasmineSpecReporter => "jasmine-spec-reporter",
            Self::JasmineTypes => "@types/jasmine",
            Self::Jasminewd2Types => "@types/jasminewd2",
        }
    }

    /// Built-in version for this pin.
    pub const fn default_version(self) -> &'static str {
        match self {
            Self::Angular => versions::ANGULAR,
            Self::Rxjs => versions::RXJS,
            Self::Tslib => versions::TSLIB,
            Self::ZoneJs => versions::ZONE_JS,
            Self::JestPresetAngular => versions::JEST_PRESET_ANGULAR,
            Self::Nx => versions::NX,
            Self::Jest => versions::JEST,
            Self::JestTypes => versions::JEST_TYPES,
            Self::TsJest => versions::TS_JEST,
            Self::Cypress => versions::CYPRESS,
            Self::Karma => versions::KARMA,
            Self::KarmaChromeLauncher => versions::KARMA_CHROME_LAUNCHER,
            Self::KarmaCoverage => versions::KARMA_COVERAGE,
            Self::KarmaJasmine => versions::KARMA_JASMINE,
            Self::KarmaJasmineHtmlReporter => versions::KARMA_JASMINE_HTML_REPORTER,
            Self::Protractor => versions::PROTRACTOR,
            Self::JasmineCore => versions::JASMINE_CORE,
            Self::JasmineSpecReporter => versions::JASMINE_SPEC_REPORTER,
            Self::JasmineTypes => versions::JASMINE_TYPES,
            Self::Jasminewd2Types => versions::JASMINEWD2_TYPES,
        }
    }

    /// Looks up a pin by its configuration key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pin| pin.key() == key)
    }
}

/// Version table with optional per-pin overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRegistry {
    overrides: BTreeMap<Pin, String>,
}

impl VersionRegistry {
    /// Registry using only the built-in pins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a `[versions]` table.
    ///
    /// # Errors
    ///
    /// Returns [`NginitError::ConfigError`] when a key does not name a known
    /// pin or a version string is empty.
    pub fn from_overrides(table: &BTreeMap<String, String>) -> Result<Self> {
        let mut overrides = BTreeMap::new();
        for (key, version) in table {
            let pin = Pin::from_key(key).ok_or_else(|| NginitError::ConfigError {
                message: format!(
                    "Unknown version pin '{key}'. Known pins: {}",
                    Pin::ALL.iter().map(|p| p.key()).collect::<Vec<_>>().join(", ")
                ),
            })?;
            if version.trim().is_empty() {
                return Err(NginitError::ConfigError {
                    message: format!("Version pin '{key}' must not be empty"),
                }
                .into());
            }
            tracing::debug!(target: "versions", "Overriding {} with {}", key, version);
            overrides.insert(pin, version.clone());
        }
        Ok(Self {
            overrides,
        })
    }

    /// Effective version for `pin`.
    pub fn get(&self, pin: Pin) -> &str {
        self.overrides.get(&pin).map_or(pin.default_version(), String::as_str)
    }
}
