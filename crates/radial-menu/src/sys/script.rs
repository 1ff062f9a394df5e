use radial::script::{ScriptError, ScriptHook, ScriptRunner};
use std::process::Command;

/// Runs scripts as `<shell> -c <source>`. Every run is its own process, so
/// nothing leaks from one script into the next.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl ScriptRunner for ShellRunner {
    fn run(&mut self, hook: &ScriptHook) -> Result<(), ScriptError> {
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(&hook.source)
            .env("RADIAL_SCRIPT_KIND", hook.kind.to_string())
            .env("RADIAL_LABEL", hook.label.as_str())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(ScriptError::Failed {
                status: status.to_string(),
            })
        }
    }
}
