use serde::{Deserialize, Serialize};

/// A launchable command persisted to `launch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "type")]
    pub process_type: String,
    pub command: String,
    #[serde(rename = "args", default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub direct: bool,
    #[serde(default)]
    pub default: bool,
}

impl Process {
    pub fn new(process_type: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            process_type: process_type.into(),
            command: command.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetPlanEntry {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub processes: Vec<Process>,
    pub unmet: Vec<UnmetPlanEntry>,
}

impl BuildResult {
    pub fn process(&self, process_type: &str) -> Option<&Process> {
        self.processes
            .iter()
            .find(|p| p.process_type == process_type)
    }

    pub fn default_process(&self) -> Option<&Process> {
        self.processes.iter().find(|p| p.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_process_has_no_flags() {
        let process = Process::new("web", "/workspace/app/bin/start");
        assert_eq!(process.process_type, "web");
        assert!(process.arguments.is_empty());
        assert!(!process.direct);
        assert!(!process.default);
    }

    #[test]
    fn test_lookup() {
        let result = BuildResult {
            processes: vec![
                Process::new("task", "start"),
                Process {
                    default: true,
                    ..Process::new("web", "start")
                },
            ],
            unmet: vec![],
        };

        assert_eq!(result.process("task").map(|p| p.command.as_str()), Some("start"));
        assert!(result.process("reload").is_none());
        assert_eq!(
            result.default_process().map(|p| p.process_type.as_str()),
            Some("web")
        );
    }
}
