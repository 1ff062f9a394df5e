use crate::model::{Label, SectionNode};
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Which gesture a script is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ScriptKind {
    Primary,
    Release,
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHook {
    pub kind: ScriptKind,
    pub label: Label,
    pub source: String,
}

impl ScriptHook {
    /// The script `node` binds to `kind`. A release without its own script
    /// runs the primary command. Blank scripts yield nothing.
    pub fn for_node(kind: ScriptKind, label: &Label, node: &SectionNode) -> Option<Self> {
        let source = match kind {
            ScriptKind::Primary => node.command.as_str(),
            ScriptKind::Release if node.on_release.trim().is_empty() => node.command.as_str(),
            ScriptKind::Release => node.on_release.as_str(),
            ScriptKind::Double => node.on_double.as_str(),
        };
        (!source.trim().is_empty()).then(|| Self {
            kind,
            label: label.clone(),
            source: source.to_string(),
        })
    }
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to start script: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Script exited with {status}")]
    Failed { status: String },
}

/// Runs user scripts. Each call gets a fresh namespace; nothing carries
/// over between runs.
pub trait ScriptRunner {
    fn run(&mut self, hook: &ScriptHook) -> Result<(), ScriptError>;
}

/// Runs `hook` and logs a failure with the script's role. Never propagates.
pub fn run_logged<R: ScriptRunner + ?Sized>(runner: &mut R, hook: &ScriptHook) -> bool {
    log::info!("Running {} script of '{}'", hook.kind, hook.label);
    match runner.run(hook) {
        Ok(()) => true,
        Err(e) => {
            log::error!("{} script of '{}' failed: {}", hook.kind, hook.label, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(command: &str, on_release: &str, on_double: &str) -> SectionNode {
        SectionNode {
            command: command.to_string(),
            on_release: on_release.to_string(),
            on_double: on_double.to_string(),
            ..SectionNode::default()
        }
    }

    #[test]
    fn test_release_falls_back_to_command() {
        let label = Label::new("Tools");
        let hook = ScriptHook::for_node(ScriptKind::Release, &label, &node("cmd", "  ", "")).unwrap();
        assert_eq!(hook.source, "cmd");
        assert_eq!(hook.kind, ScriptKind::Release);

        let hook = ScriptHook::for_node(ScriptKind::Release, &label, &node("cmd", "rel", "")).unwrap();
        assert_eq!(hook.source, "rel");
    }

    #[test]
    fn test_blank_scripts_do_not_run() {
        let label = Label::new("Tools");
        assert!(ScriptHook::for_node(ScriptKind::Double, &label, &node("cmd", "", "")).is_none());
        assert!(ScriptHook::for_node(ScriptKind::Primary, &label, &node("", "rel", "")).is_none());
    }

    #[test]
    fn test_run_logged_swallows_errors() {
        struct Failing;
        impl ScriptRunner for Failing {
            fn run(&mut self, _: &ScriptHook) -> Result<(), ScriptError> {
                Err(ScriptError::Failed {
                    status: "exit status: 1".to_string(),
                })
            }
        }
        let hook = ScriptHook {
            kind: ScriptKind::Primary,
            label: Label::new("x"),
            source: "false".to_string(),
        };
        assert!(!run_logged(&mut Failing, &hook));
        assert_eq!(ScriptKind::Double.to_string(), "double");
    }
}
