//! Push command implementation.
//!
//! The `envpull push` command uploads a local env file as
//! `{project}/{env}.env`, asking before it replaces a remote env.

use std::path::{Path, PathBuf};

use crate::cli::args::PushArgs;
use crate::env;
use crate::error::{EnvpullError, Result};
use crate::ui::{confirm, UserInterface};

use super::context::{Services, Workspace};
use super::dispatcher::{Command, CommandResult};

/// The push command implementation.
pub struct PushCommand {
    dir: PathBuf,
    args: PushArgs,
    services: Services,
}

impl PushCommand {
    /// Create a new push command.
    pub fn new(dir: &Path, args: PushArgs, services: Services) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
            services,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &PushArgs {
        &self.args
    }
}

impl Command for PushCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let local_file = self.dir.join(&self.args.file);
        let shown = self.args.file.display();
        if !local_file.is_file() {
            return Err(EnvpullError::LocalFileNotFound {
                path: self.args.file.clone(),
            });
        }

        let workspace = Workspace::load(&self.dir)?;
        let target = workspace.target(
            ui,
            self.args.source.as_deref(),
            &self.args.env,
            &local_file,
            "envpull push <source>",
        )?;
        let project = self.services.project.project_name()?;
        let data = env::read_file(target.local_file())?;
        let bucket = &target.source().bucket;
        let store = &self.services.store;

        if !self.args.force {
            match store.exists(bucket, &project, target.environment()) {
                Err(e) => ui.warning(&format!("Could not check if remote exists: {}", e)),
                Ok(true) => {
                    ui.warning(&format!(
                        "Remote {}/{}.env already exists in {}",
                        project,
                        target.environment(),
                        target.source_name()
                    ));
                    if !confirm(ui, "overwrite", "Overwrite?", false)? {
                        ui.info("Aborted");
                        return Ok(CommandResult::success());
                    }
                }
                Ok(false) => {}
            }
        }

        ui.info(&format!(
            "Pushing {} to {}/{}/{}.env...",
            shown,
            target.source_name(),
            project,
            target.environment()
        ));
        let mut spinner = ui.start_spinner("Uploading...");
        let uploaded = store.put(bucket, &project, target.environment(), &data);
        spinner.finish_and_clear();
        uploaded?;

        workspace.record(ui, &target);

        ui.success(&format!(
            "Pushed {} to {}/{}/{}.env ({} bytes)",
            shown,
            target.source_name(),
            project,
            target.environment(),
            data.len()
        ));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::context::testing::*;
    use crate::remote::MemoryStore;
    use crate::ui::MockUI;
    use std::fs;

    fn args(source: Option<&str>, env: &str) -> PushArgs {
        PushArgs {
            source: source.map(String::from),
            env: env.to_string(),
            ..Default::default()
        }
    }

    fn push_with(
        dir: &Path,
        store: &MemoryStore,
        args: PushArgs,
        ui: &mut MockUI,
    ) -> Result<CommandResult> {
        PushCommand::new(dir, args, services(dir, store)).execute(ui)
    }

    #[test]
    fn pushes_new_environment() {
        let temp = project_dir();
        fs::write(temp.path().join(".env"), "A=1\n").unwrap();
        let store = MemoryStore::new();
        let mut ui = MockUI::new();

        let result = push_with(temp.path(), &store, args(Some("simon"), "develop"), &mut ui);

        assert!(result.unwrap().success);
        assert_eq!(store.object(BUCKET, "api", "develop"), Some(b"A=1\n".to_vec()));
        assert!(ui.prompts_shown().is_empty());
        assert!(ui.has_info("Pushing .env to simon/api/develop.env..."));
        assert!(ui.has_success("Pushed .env to simon/api/develop.env (4 bytes)"));
        assert!(read_cache(temp.path()).contains("last_env: develop"));
    }

    #[test]
    fn missing_local_file_fails_first() {
        let temp = project_dir();
        let store = MemoryStore::new();
        let mut ui = MockUI::new();

        let err = push_with(temp.path(), &store, args(Some("simon"), "default"), &mut ui)
            .unwrap_err();

        assert_eq!(err.to_string(), "File '.env' not found");
    }

    #[test]
    fn existing_remote_declined() {
        let temp = project_dir();
        fs::write(temp.path().join(".env"), "NEW=1\n").unwrap();
        let store = MemoryStore::new();
        store.insert(BUCKET, "api", "default", b"OLD=1\n");
        let mut ui = MockUI::new();

        let result = push_with(temp.path(), &store, args(Some("simon"), "default"), &mut ui);

        assert!(result.is_ok());
        assert!(ui.has_warning("Remote api/default.env already exists in simon"));
        assert!(ui.has_info("Aborted"));
        assert_eq!(store.object(BUCKET, "api", "default"), Some(b"OLD=1\n".to_vec()));
        assert!(read_cache(temp.path()).is_empty());
    }

    #[test]
    fn existing_remote_confirmed() {
        let temp = project_dir();
        fs::write(temp.path().join(".env"), "NEW=1\n").unwrap();
        let store = MemoryStore::new();
        store.insert(BUCKET, "api", "default", b"OLD=1\n");
        let mut ui = MockUI::new();
        ui.set_prompt_response("overwrite", "y");

        push_with(temp.path(), &store, args(Some("simon"), "default"), &mut ui).unwrap();

        assert_eq!(store.object(BUCKET, "api", "default"), Some(b"NEW=1\n".to_vec()));
    }

    #[test]
    fn force_skips_remote_check() {
        let temp = project_dir();
        fs::write(temp.path().join(".env"), "NEW=1\n").unwrap();
        let store = MemoryStore::new();
        store.insert(BUCKET, "api", "default", b"OLD=1\n");
        store.fail_exists_checks();
        let mut ui = MockUI::new();
        let push_args = PushArgs {
            force: true,
            ..args(Some("simon"), "default")
        };

        push_with(temp.path(), &store, push_args, &mut ui).unwrap();

        assert!(ui.warnings().is_empty());
        assert_eq!(store.object(BUCKET, "api", "default"), Some(b"NEW=1\n".to_vec()));
    }

    #[test]
    fn failed_existence_check_only_warns() {
        let temp = project_dir();
        fs::write(temp.path().join(".env"), "A=1\n").unwrap();
        let store = MemoryStore::new();
        store.fail_exists_checks();
        let mut ui = MockUI::new();

        let result = push_with(temp.path(), &store, args(Some("simon"), "default"), &mut ui);

        assert!(result.is_ok());
        assert!(ui.has_warning("Could not check if remote exists"));
        assert_eq!(store.object(BUCKET, "api", "default"), Some(b"A=1\n".to_vec()));
    }

    #[test]
    fn uses_cached_source() {
        let temp = project_dir();
        write_cache(temp.path(), "last_source: team\nlast_env: staging\n");
        fs::write(temp.path().join(".env"), "A=1\n").unwrap();
        let store = MemoryStore::new();
        let mut ui = MockUI::new();

        push_with(temp.path(), &store, args(None, "default"), &mut ui).unwrap();

        assert!(ui.has_info("Using cached source: team"));
        assert_eq!(
            store.object("gs://team-envs", "api", "staging"),
            Some(b"A=1\n".to_vec())
        );
    }

    #[test]
    fn fails_without_source() {
        let temp = project_dir();
        fs::write(temp.path().join(".env"), "A=1\n").unwrap();
        let store = MemoryStore::new();
        let mut ui = MockUI::new();

        let err = push_with(temp.path(), &store, args(None, "default"), &mut ui).unwrap_err();

        assert!(err.to_string().contains("envpull push <source>"));
    }
}
