//! Generator host double

use anyhow::Result;

use crate::core::NginitError;
use crate::generators::GeneratorHost;
use crate::overlay::SubGenerator;
use crate::tree::Tree;

/// Records sub-generator calls without touching the tree.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Generators run so far, in order
    pub calls: Vec<SubGenerator>,
    fail_on: Option<SubGenerator>,
}

impl RecordingHost {
    /// Host that fails when asked to run `generator`
    pub fn failing_on(generator: SubGenerator) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(generator),
        }
    }
}

impl GeneratorHost for RecordingHost {
    fn run(&mut self, generator: SubGenerator, _tree: &mut Tree) -> Result<()> {
        self.calls.push(generator);
        if self.fail_on == Some(generator) {
            return Err(NginitError::SubGeneratorFailed {
                generator: generator.name().to_string(),
                reason: "simulated failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
