//! Karma and Jasmine setup.

use anyhow::Result;

use crate::manifest::DependencySet;
use crate::overlay::SubGenerator;
use crate::tree::Tree;
use crate::versions::{Pin, VersionRegistry};

const KARMA_CONFIG: &str = "karma.conf.js";

const KARMA_CONFIG_CONTENT: &str = r"// Karma configuration file, see link for more information
// https://karma-runner.github.io/1.0/config/configuration-file.html

const { join } = require('path');
const { constants } = require('karma');

module.exports = () => {
  return {
    basePath: '',
    frameworks: ['jasmine', '@angular-devkit/build-angular'],
    plugins: [
      require('karma-jasmine'),
      require('karma-chrome-launcher'),
      require('karma-jasmine-html-reporter'),
      require('karma-coverage'),
      require('@angular-devkit/build-angular/plugins/karma'),
    ],
    client: {
      jasmine: {},
      clearContext: false,
    },
    jasmineHtmlReporter: {
      suppressAll: true,
    },
    coverageReporter: {
      dir: join(__dirname, './coverage'),
      subdir: '.',
      reporters: [{ type: 'html' }, { type: 'text-summary' }],
    },
    reporters: ['progress', 'kjhtml'],
    port: 9876,
    colors: true,
    logLevel: constants.LOG_INFO,
    autoWatch: true,
    browsers: ['Chrome'],
    singleRun: true,
  };
};
";

pub(super) fn run(tree: &mut Tree, versions: &VersionRegistry) -> Result<()> {
    let mut manifest = super::load_manifest(SubGenerator::Karma, tree)?;
    let tooling = DependencySet::new()
        .dev("karma", versions.get(Pin::Karma))
        .dev("karma-chrome-launcher", versions.get(Pin::KarmaChromeLauncher))
        .dev("karma-coverage", versions.get(Pin::KarmaCoverage))
        .dev("karma-jasmine", versions.get(Pin::KarmaJasmine))
        .dev("karma-jasmine-html-reporter", versions.get(Pin::KarmaJasmineHtmlReporter))
        .dev("jasmine-core", versions.get(Pin::JasmineCore))
        .dev("@types/jasmine", versions.get(Pin::JasmineTypes));
    if tooling.apply_to(&mut manifest)? {
        manifest.save(tree)?;
    }

    if tree.exists(KARMA_CONFIG) {
        tracing::debug!(target: "generators", "{} already exists, leaving it alone", KARMA_CONFIG);
    } else {
        tree.write(KARMA_CONFIG, KARMA_CONFIG_CONTENT)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PackageJson;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_karma_setup() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name":"ws"}"#).unwrap();
        let mut tree = Tree::new(temp.path());
        run(&mut tree, &VersionRegistry::new()).unwrap();

        let manifest = PackageJson::load(&tree).unwrap();
        for package in ["karma", "karma-jasmine", "jasmine-core", "@types/jasmine"] {
            assert!(manifest.has_dev_dependency(package).unwrap(), "{package} missing");
        }
        let config = tree.read_to_string(KARMA_CONFIG).unwrap().unwrap();
        assert!(config.contains("frameworks: ['jasmine', '@angular-devkit/build-angular']"));
    }

    #[test]
    fn test_karma_requires_manifest() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        let err = run(&mut tree, &VersionRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("karma"));
    }
}
