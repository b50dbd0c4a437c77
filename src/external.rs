//src/external.rs

use std::process::Command;

use crate::error::{Error, Result};

/// Renders a command the way a shell user would type it, for logging.
pub fn display_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Runs `cmd` to completion, failing on launch errors or a non-zero exit.
pub fn run_tool(cmd: &mut Command) -> Result<()> {
    let tool = cmd.get_program().to_string_lossy().into_owned();
    let status = cmd.status().map_err(|source| Error::Spawn {
        tool: tool.clone(),
        source,
    })?;

    if !status.success() {
        return Err(Error::ToolFailed { tool, status });
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let mut cmd = Command::new("/opt/seqtk/seqtk");
        cmd.args(["sample", "-s11", "a.fq", "100"]);
        assert_eq!(display_command(&cmd), "/opt/seqtk/seqtk sample -s11 a.fq 100");
    }

    #[test]
    fn test_nonzero_exit_is_tool_failed() {
        let err = run_tool(Command::new("sh").args(["-c", "exit 3"])).unwrap_err();
        match err {
            Error::ToolFailed { tool, status } => {
                assert_eq!(tool, "sh");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = run_tool(&mut Command::new("/no/such/tool-xyz")).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_success() {
        run_tool(&mut Command::new("true")).unwrap();
    }
}
