//! This module exposes the hook integrations use to extend the database config.
//!
//! An integration implements [`DbIntegration`]; during setup it may register an additional
//! config file and seed file with [`DbSetupContext::extend_db`]. The registered config files are
//! then loaded and merged into the user config with [`load_integration_configs`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::config::DbConfigInput;

mod error;

pub use self::error::{IntegrationError, IntegrationResult};

/// An integration contributing to the database config.
#[async_trait]
pub trait DbIntegration: Send + Sync {
    /// Returns the name of the integration, used to report errors.
    fn name(&self) -> &str;

    /// Setup hook; the default implementation does not extend the config.
    async fn db_setup(&self, _ctx: &mut DbSetupContext) -> IntegrationResult<()> {
        Ok(())
    }
}

/// The location of a config or seed file: either a URL or a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entrypoint {
    Url(Url),
    Path(PathBuf),
}

impl Entrypoint {
    /// Returns the local path of the entrypoint.
    ///
    /// Only paths and `file:` URLs have a local path.
    pub fn to_path(&self) -> Option<PathBuf> {
        match self {
            Entrypoint::Path(path) => Some(path.clone()),
            Entrypoint::Url(url) if url.scheme() == "file" => url.to_file_path().ok(),
            Entrypoint::Url(_) => None,
        }
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entrypoint::Url(url) => write!(f, "{url}"),
            Entrypoint::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for Entrypoint {
    fn from(value: &str) -> Self {
        let looks_like_url = value.contains("://") || value.starts_with("file:");
        match Url::parse(value) {
            Ok(url) if looks_like_url => Entrypoint::Url(url),
            _ => Entrypoint::Path(PathBuf::from(value)),
        }
    }
}

impl From<String> for Entrypoint {
    fn from(value: String) -> Self {
        Entrypoint::from(value.as_str())
    }
}

impl From<Url> for Entrypoint {
    fn from(url: Url) -> Self {
        Entrypoint::Url(url)
    }
}

impl From<PathBuf> for Entrypoint {
    fn from(path: PathBuf) -> Self {
        Entrypoint::Path(path)
    }
}

/// The files an integration adds to the database config.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtendDbOptions {
    pub config_entrypoint: Option<Entrypoint>,
    pub seed_entrypoint: Option<Entrypoint>,
}

impl ExtendDbOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_entrypoint(mut self, entrypoint: impl Into<Entrypoint>) -> Self {
        self.config_entrypoint = Some(entrypoint.into());
        self
    }

    pub fn seed_entrypoint(mut self, entrypoint: impl Into<Entrypoint>) -> Self {
        self.seed_entrypoint = Some(entrypoint.into());
        self
    }
}

/// Context passed to [`DbIntegration::db_setup`].
#[derive(Debug, Default)]
pub struct DbSetupContext {
    extensions: Vec<ExtendDbOptions>,
}

impl DbSetupContext {
    /// Registers files extending the database config.
    pub fn extend_db(&mut self, options: ExtendDbOptions) {
        self.extensions.push(options);
    }
}

/// Files registered by an integration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrationExtension {
    /// Name of the integration which registered the files.
    pub integration: String,
    pub options: ExtendDbOptions,
}

/// Runs the setup hook of every integration, in order.
///
/// Returns the files registered by the integrations, in registration order.
pub async fn run_setup_hooks(
    integrations: &[Arc<dyn DbIntegration>],
) -> IntegrationResult<Vec<IntegrationExtension>> {
    let mut extensions = Vec::new();
    for integration in integrations {
        let mut ctx = DbSetupContext::default();
        debug!(integration = integration.name(), "running db setup hook");
        integration.db_setup(&mut ctx).await?;

        extensions.extend(ctx.extensions.into_iter().map(|options| IntegrationExtension {
            integration: integration.name().to_string(),
            options,
        }));
    }

    info!(
        integrations = integrations.len(),
        extensions = extensions.len(),
        "ran db setup hooks"
    );

    Ok(extensions)
}

/// Loads the config file registered by every extension and merges it into `base`.
pub fn load_integration_configs(
    mut base: DbConfigInput,
    extensions: &[IntegrationExtension],
) -> IntegrationResult<DbConfigInput> {
    for extension in extensions {
        let Some(entrypoint) = &extension.options.config_entrypoint else {
            continue;
        };
        let path = entrypoint
            .to_path()
            .ok_or_else(|| IntegrationError::UnsupportedEntrypoint(entrypoint.to_string()))?;

        debug!(
            integration = %extension.integration,
            path = %path.display(),
            "loading integration config"
        );
        let config_error = |source| IntegrationError::Config {
            integration: extension.integration.clone(),
            source,
        };
        let config = DbConfigInput::load(&path).map_err(config_error)?;
        base.merge(config).map_err(config_error)?;
    }

    Ok(base)
}

/// Returns the seed files registered by the extensions, in registration order.
pub fn seed_entrypoints(extensions: &[IntegrationExtension]) -> Vec<&Entrypoint> {
    extensions
        .iter()
        .filter_map(|extension| extension.options.seed_entrypoint.as_ref())
        .collect()
}

#[cfg(test)]
mod tests {

    use std::io::Write as _;

    use super::*;
    use crate::config::ConfigError;

    struct NoopIntegration;

    #[async_trait]
    impl DbIntegration for NoopIntegration {
        fn name(&self) -> &str {
            "noop"
        }
    }

    struct FilesIntegration {
        config: Entrypoint,
    }

    #[async_trait]
    impl DbIntegration for FilesIntegration {
        fn name(&self) -> &str {
            "files"
        }

        async fn db_setup(&self, ctx: &mut DbSetupContext) -> IntegrationResult<()> {
            tokio::task::yield_now().await;
            ctx.extend_db(
                ExtendDbOptions::new()
                    .config_entrypoint(self.config.clone())
                    .seed_entrypoint("./db/seed.rs"),
            );
            Ok(())
        }
    }

    struct FailingIntegration;

    #[async_trait]
    impl DbIntegration for FailingIntegration {
        fn name(&self) -> &str {
            "failing"
        }

        async fn db_setup(&self, _ctx: &mut DbSetupContext) -> IntegrationResult<()> {
            Err(IntegrationError::Setup {
                integration: self.name().to_string(),
                message: "missing credentials".to_string(),
            })
        }
    }

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("failed to create config file");
        file.write_all(content.as_bytes())
            .expect("failed to write config file");
        file
    }

    #[test]
    fn test_should_parse_entrypoints() {
        assert_eq!(
            Entrypoint::from("./db/config.toml"),
            Entrypoint::Path(PathBuf::from("./db/config.toml"))
        );
        assert!(matches!(
            Entrypoint::from("https://example.com/db/config.toml"),
            Entrypoint::Url(_)
        ));
        assert!(matches!(
            Entrypoint::from("file:///tmp/config.toml"),
            Entrypoint::Url(_)
        ));
        assert_eq!(
            Entrypoint::from("C:\\db\\config.toml"),
            Entrypoint::Path(PathBuf::from("C:\\db\\config.toml"))
        );
    }

    #[test]
    fn test_should_get_local_path_of_entrypoint() {
        assert_eq!(
            Entrypoint::from("db/config.toml").to_path(),
            Some(PathBuf::from("db/config.toml"))
        );
        assert_eq!(
            Entrypoint::from("file:///tmp/config.toml").to_path(),
            Some(PathBuf::from("/tmp/config.toml"))
        );
        assert_eq!(
            Entrypoint::from("https://example.com/config.toml").to_path(),
            None
        );
    }

    #[tokio::test]
    async fn test_should_run_hooks_in_order() {
        let integrations: Vec<Arc<dyn DbIntegration>> = vec![
            Arc::new(NoopIntegration),
            Arc::new(FilesIntegration {
                config: "./db/config.toml".into(),
            }),
        ];
        let extensions = run_setup_hooks(&integrations)
            .await
            .expect("failed to run hooks");

        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions[0].integration, "files");
        assert_eq!(
            seed_entrypoints(&extensions),
            vec![&Entrypoint::Path(PathBuf::from("./db/seed.rs"))]
        );
    }

    #[tokio::test]
    async fn test_should_stop_at_failing_hook() {
        let integrations: Vec<Arc<dyn DbIntegration>> =
            vec![Arc::new(FailingIntegration), Arc::new(NoopIntegration)];
        let result = run_setup_hooks(&integrations).await;
        assert!(matches!(
            result,
            Err(IntegrationError::Setup { integration, .. }) if integration == "failing"
        ));
    }

    #[tokio::test]
    async fn test_should_merge_integration_configs() {
        let file = config_file(
            r#"
[tables.Like.columns.post_id]
type = "number"
"#,
        );
        let integrations: Vec<Arc<dyn DbIntegration>> = vec![Arc::new(FilesIntegration {
            config: file.path().to_path_buf().into(),
        })];
        let extensions = run_setup_hooks(&integrations)
            .await
            .expect("failed to run hooks");

        let base = DbConfigInput::from_toml_str(
            r#"
[tables.Post.columns.id]
type = "number"
primary_key = true
"#,
        )
        .expect("failed to parse base config");
        let config = load_integration_configs(base, &extensions)
            .expect("failed to load integration configs")
            .resolve()
            .expect("failed to resolve");

        assert!(config.table("Post").is_some());
        assert!(config.table("Like").is_some());
    }

    #[test]
    fn test_should_not_merge_duplicated_table() {
        let file = config_file(
            r#"
[tables.Post.columns.title]
type = "text"
"#,
        );
        let extensions = vec![IntegrationExtension {
            integration: "blog".to_string(),
            options: ExtendDbOptions::new().config_entrypoint(file.path().to_path_buf()),
        }];
        let base = DbConfigInput::from_toml_str(
            r#"
[tables.Post.columns.id]
type = "number"
"#,
        )
        .expect("failed to parse base config");

        let result = load_integration_configs(base, &extensions);
        assert!(matches!(
            result,
            Err(IntegrationError::Config {
                integration,
                source: ConfigError::DuplicateTable(table),
            }) if integration == "blog" && table == "Post"
        ));
    }

    #[test]
    fn test_should_not_load_remote_config() {
        let extensions = vec![IntegrationExtension {
            integration: "remote".to_string(),
            options: ExtendDbOptions::new().config_entrypoint("https://example.com/config.toml"),
        }];
        let result = load_integration_configs(DbConfigInput::new(), &extensions);
        assert!(matches!(
            result,
            Err(IntegrationError::UnsupportedEntrypoint(url)) if url == "https://example.com/config.toml"
        ));
    }
}
