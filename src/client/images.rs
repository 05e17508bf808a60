//! Image operations, including observed builds.

use std::path::PathBuf;

use regex::Regex;
use tokio::time::Instant;

use crate::build::BuildObserver;
use crate::classify::{parse, Error};
use crate::exec;
use crate::resource::{Image, ImageDetail, ImageRef};
use crate::retry::{idle, Deadline};

use super::Docker;

/// Validated field accumulator for `image build`.
#[derive(Debug, Clone)]
pub struct BuildOpts {
    context_dir: PathBuf,
    dockerfile: Option<PathBuf>,
    tag: Option<ImageRef>,
    build_args: Vec<(String, String)>,
    pull: bool,
}

impl BuildOpts {
    /// Options for building from the given context directory.
    #[must_use]
    pub fn new(context_dir: impl Into<PathBuf>) -> Self {
        Self {
            context_dir: context_dir.into(),
            dockerfile: None,
            tag: None,
            build_args: Vec::new(),
            pull: false,
        }
    }

    /// Use a dockerfile outside the default location.
    #[must_use]
    pub fn dockerfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.dockerfile = Some(path.into());
        self
    }

    /// Tag the built image.
    #[must_use]
    pub fn tag(mut self, tag: ImageRef) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Add a build argument.
    #[must_use]
    pub fn build_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.build_args.push((key.into(), value.into()));
        self
    }

    /// Always attempt to pull newer base images.
    #[must_use]
    pub fn pull(mut self) -> Self {
        self.pull = true;
        self
    }

    /// The `image build` argument vector.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["image".to_string(), "build".to_string()];
        if let Some(dockerfile) = &self.dockerfile {
            args.push("--file".to_string());
            args.push(dockerfile.display().to_string());
        }
        if let Some(tag) = &self.tag {
            args.push("--tag".to_string());
            args.push(tag.to_string());
        }
        for (key, value) in &self.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{key}={value}"));
        }
        if self.pull {
            args.push("--pull".to_string());
        }
        args.push(self.context_dir.display().to_string());
        args
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The built image id, when the engine printed one.
    pub image_id: Option<String>,
    /// The full build log from stdout.
    pub output: String,
}

impl Docker {
    /// Build an image, observing both output streams live.
    ///
    /// The whole build is retried on transient failures within the
    /// deadline; the observer's accumulators are reset at the start of
    /// every attempt so output never mixes across attempts.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] for documented engine gaps (missing buildx,
    /// experimental-only flags), other classified errors as usual, and
    /// [`Error::Timeout`] when transient failures exhaust the deadline.
    pub async fn build_image(
        &self,
        opts: &BuildOpts,
        deadline: Deadline,
    ) -> Result<BuildReport, Error> {
        let inv = self.invocation(opts.to_args());
        let working_dir = inv
            .get_working_dir()
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        let mut observer = BuildObserver::new();
        let started = Instant::now();

        loop {
            let attempt_error = match self.build_attempt(&inv, &working_dir, &mut observer).await {
                Ok(report) => {
                    observer.completed();
                    return Ok(report);
                }
                Err(e) => e,
            };

            if !attempt_error.is_transient() {
                observer.completed();
                return Err(attempt_error);
            }
            if deadline.expired() {
                observer.completed();
                return Err(Error::Timeout {
                    waited: started.elapsed(),
                    last_error: Some(attempt_error.to_string()),
                });
            }

            tracing::warn!(error = %attempt_error, "build failed transiently, retrying");
            if let Err(interrupted) = idle(self.config().retry_interval(), self.cancel_token()).await
            {
                observer.completed();
                return Err(interrupted);
            }
        }
    }

    async fn build_attempt(
        &self,
        inv: &exec::Invocation,
        working_dir: &std::path::Path,
        observer: &mut BuildObserver,
    ) -> Result<BuildReport, Error> {
        let child = exec::spawn_piped(inv)?;
        observer.started(inv.command_line(), working_dir.to_path_buf(), child)?;
        observer.wait_until_completes().await?;

        if observer.passed() {
            return Ok(BuildReport {
                image_id: extract_image_id(observer.output(), observer.errors()),
                output: observer.output().to_string(),
            });
        }

        // A failed outcome always classifies to an error.
        Err(observer
            .diagnose(self.classifier(), &self.rules().build)
            .unwrap_or(Error::Interrupted))
    }

    /// Pull an image from its registry.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown reference, among others.
    pub async fn pull_image(&self, image: &ImageRef, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "image".to_string(),
            "pull".to_string(),
            image.to_string(),
        ]);
        self.run(&self.rules().images, &inv, deadline).await?;
        Ok(())
    }

    /// Remove an image.
    ///
    /// # Errors
    ///
    /// [`Error::InUse`] when a container still references it.
    pub async fn remove_image(
        &self,
        image: &ImageRef,
        force: bool,
        deadline: Deadline,
    ) -> Result<(), Error> {
        let mut args = vec!["image".to_string(), "rm".to_string()];
        if force {
            args.push("--force".to_string());
        }
        args.push(image.to_string());
        let inv = self.invocation(args);
        self.run(&self.rules().images, &inv, deadline).await?;
        Ok(())
    }

    /// List local images.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn list_images(&self, deadline: Deadline) -> Result<Vec<Image>, Error> {
        let inv = self.invocation(vec![
            "image".to_string(),
            "ls".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]);
        let result = self.run(&self.rules().images, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one image.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown reference, among others.
    pub async fn inspect_image(
        &self,
        image: &ImageRef,
        deadline: Deadline,
    ) -> Result<ImageDetail, Error> {
        let inv = self.invocation(vec![
            "image".to_string(),
            "inspect".to_string(),
            image.to_string(),
        ]);
        let result = self.run(&self.rules().images, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }
}

/// Pull the built image id out of the build log.
///
/// The classic builder prints `Successfully built <id>` on stdout; BuildKit
/// reports `writing image sha256:<digest>` on stderr.
fn extract_image_id(stdout: &str, stderr: &str) -> Option<String> {
    let classic = Regex::new(r"Successfully built ([0-9a-f]+)").expect("static pattern");
    if let Some(caps) = classic.captures(stdout) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }
    let buildkit = Regex::new(r"writing image sha256:([0-9a-f]+)").expect("static pattern");
    buildkit
        .captures(stderr)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args_end_with_context_dir() {
        let opts = BuildOpts::new("/src/app")
            .dockerfile("/src/app/Dockerfile.prod")
            .tag(ImageRef::new("team/app:1.2").unwrap())
            .build_arg("GIT_SHA", "abc123")
            .pull();

        let args = opts.to_args();
        assert_eq!(args[0], "image");
        assert_eq!(args[1], "build");
        assert!(args.contains(&"--pull".to_string()));
        assert!(args.contains(&"GIT_SHA=abc123".to_string()));
        assert_eq!(args.last().unwrap(), "/src/app");
    }

    #[test]
    fn extracts_classic_builder_id() {
        let id = extract_image_id("Step 5/5 : CMD [\"app\"]\nSuccessfully built 1a2b3c4d\n", "");
        assert_eq!(id.unwrap(), "1a2b3c4d");
    }

    #[test]
    fn extracts_buildkit_digest_from_stderr() {
        let id = extract_image_id("", "#8 writing image sha256:deadbeef done\n");
        assert_eq!(id.unwrap(), "deadbeef");
    }

    #[test]
    fn missing_id_is_none() {
        assert!(extract_image_id("no id here", "nothing").is_none());
    }
}
