use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bp_registry::{HttpRegistry, InMemoryRegistry, RemoteRegistry};
use bp_server::RegistryServer;
use bp_session::{deploy, lookup, Session};
use bp_types::{AppId, DeploymentNamespace, ObjectId};
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use crate::blueprint_file::BlueprintFile;
use crate::cli::*;
use crate::config::CliConfig;
use crate::progress::ConsoleProgress;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref())?;
    match cli.command {
        Command::Plan(args) => cmd_plan(&config, args, cli.format).await,
        Command::Lookup(args) => cmd_lookup(&config, args, cli.format).await,
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Config => cmd_config(&config),
    }
}

/// Outcome of materializing one blueprint file.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub app_id: AppId,
    pub deployed_as: Option<String>,
    pub objects: BTreeMap<String, ObjectId>,
}

fn registry_for(config: &CliConfig, flag: Option<String>) -> anyhow::Result<Option<Arc<dyn RemoteRegistry>>> {
    match flag.or_else(|| config.registry_url.clone()) {
        Some(url) => {
            let registry = HttpRegistry::new(url.clone()).with_context(|| format!("connecting to {url}"))?;
            Ok(Some(Arc::new(registry)))
        }
        None => Ok(None),
    }
}

/// Materialize `file` against `registry`, deploying it as `name` if given.
pub async fn plan(
    config: &CliConfig,
    registry: Arc<dyn RemoteRegistry>,
    file: &Path,
    name: Option<&str>,
    namespace: DeploymentNamespace,
) -> anyhow::Result<PlanReport> {
    let blueprint = BlueprintFile::load(file)?.into_blueprint()?;
    let client = config.client.client(registry);

    if let Some(name) = name {
        let deployment = deploy(&client, blueprint, name, namespace).await?;
        return Ok(PlanReport {
            app_id: deployment.app_id,
            deployed_as: Some(deployment.name),
            objects: deployment.object_ids,
        });
    }

    let mut session = Session::init_new(blueprint, client, config.client.description.clone())
        .await?
        .with_progress(Box::new(ConsoleProgress));
    let created = session.create_all().await;
    if let Err(err) = session.disconnect().await {
        warn!(app_id = %session.app_id(), error = %err, "failed to disconnect plan session");
    }
    created?;
    Ok(PlanReport {
        app_id: session.app_id().clone(),
        deployed_as: None,
        objects: session.object_ids(),
    })
}

async fn cmd_plan(config: &CliConfig, args: PlanArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = registry_for(config, args.registry)?
        .unwrap_or_else(|| Arc::new(InMemoryRegistry::new()) as Arc<dyn RemoteRegistry>);
    let namespace = args.namespace.unwrap_or(config.client.namespace);
    let report = plan(config, registry, &args.file, args.name.as_deref(), namespace).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            match &report.deployed_as {
                Some(name) => println!("{} Deployed {} as {}", "✓".green().bold(), report.app_id.as_str().cyan(), name.yellow()),
                None => println!("{} Materialized {}", "✓".green().bold(), report.app_id.as_str().cyan()),
            }
            let width = report.objects.keys().map(String::len).max().unwrap_or(0);
            for (tag, object_id) in &report.objects {
                println!("  {:width$}  {}", tag.bold(), object_id.as_str().dimmed());
            }
        }
    }
    Ok(())
}

async fn cmd_lookup(config: &CliConfig, args: LookupArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = registry_for(config, args.registry)?
        .context("lookup needs a registry: pass --registry or set registry_url")?;
    let client = config.client.client(registry);
    let namespace = args.namespace.unwrap_or(config.client.namespace);
    let handle = lookup(&client, &args.app, args.tag.as_deref(), namespace).await?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "app": args.app, "tag": args.tag, "object_id": handle.object_id() })
        ),
        OutputFormat::Text => println!("{}", handle.object_id().as_str()),
    }
    Ok(())
}

async fn cmd_serve(config: CliConfig, args: ServeArgs) -> anyhow::Result<()> {
    let mut server_config = config.server;
    if let Some(bind) = args.bind {
        server_config.bind_addr = bind;
    }
    println!("Registry on {}", server_config.bind_addr.to_string().bold());
    RegistryServer::in_memory(server_config).serve().await?;
    Ok(())
}

fn cmd_config(config: &CliConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bp_protocol::{
        AppClientDisconnectRequest, AppCreateRequest, AppCreateResponse, AppDeployRequest,
        AppGetByDeploymentNameRequest, AppGetByDeploymentNameResponse, AppGetObjectsRequest,
        AppGetObjectsResponse, AppLookupObjectRequest, AppLookupObjectResponse, AppSetObjectsRequest,
        ObjectCreateRequest, ObjectCreateResponse,
    };
    use bp_registry::{RegistryError, RegistryResult};

    use super::*;

    fn write_blueprint(dir: &tempfile::TempDir, text: &str) -> std::path::PathBuf {
        let path = dir.path().join("blueprint.toml");
        std::fs::write(&path, text).unwrap();
        path
    }

    const CHAIN: &str = r#"
[[object]]
tag = "worker"
kind = "function"
image = { ref = "image" }

[[object]]
tag = "image"
kind = "image"
commands = ["pip install httpx"]

[[object]]
tag = "jobs"
kind = "queue"
"#;

    #[tokio::test]
    async fn plan_materializes_every_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_blueprint(&dir, CHAIN);
        let registry = Arc::new(InMemoryRegistry::new());

        let report = plan(&CliConfig::default(), registry.clone(), &path, None, DeploymentNamespace::Account)
            .await
            .unwrap();
        assert_eq!(report.objects.keys().collect::<Vec<_>>(), ["image", "jobs", "worker"]);
        assert_eq!(report.objects["worker"].as_str(), "fu-1");
        assert!(report.deployed_as.is_none());
        assert_eq!(registry.call_count("AppSetObjects"), 1);
        assert_eq!(registry.call_count("AppClientDisconnect"), 1);
    }

    #[tokio::test]
    async fn plan_with_name_deploys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_blueprint(&dir, CHAIN);
        let registry = Arc::new(InMemoryRegistry::new());

        let report = plan(&CliConfig::default(), registry.clone(), &path, Some("web"), DeploymentNamespace::Global)
            .await
            .unwrap();
        assert_eq!(report.deployed_as.as_deref(), Some("web"));
        assert_eq!(registry.deployment("web", DeploymentNamespace::Global), Some(report.app_id.clone()));

        let client = CliConfig::default().client.client(registry);
        let jobs = lookup(&client, "web", Some("jobs"), DeploymentNamespace::Global).await.unwrap();
        assert_eq!(jobs.object_id(), &report.objects["jobs"]);
    }

    #[tokio::test]
    async fn plan_failure_still_disconnects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_blueprint(&dir, CHAIN);
        let registry = Arc::new(InMemoryRegistry::new());
        registry.fail_object_create("image");

        plan(&CliConfig::default(), registry.clone(), &path, None, DeploymentNamespace::Account)
            .await
            .unwrap_err();
        assert_eq!(registry.call_count("AppSetObjects"), 0);
        assert_eq!(registry.call_count("AppClientDisconnect"), 1);
    }

    /// Delegates to an in-memory registry but refuses every disconnect.
    struct StickyRegistry(InMemoryRegistry);

    #[async_trait]
    impl RemoteRegistry for StickyRegistry {
        async fn app_create(&self, req: AppCreateRequest) -> RegistryResult<AppCreateResponse> {
            self.0.app_create(req).await
        }

        async fn app_get_objects(&self, req: AppGetObjectsRequest) -> RegistryResult<AppGetObjectsResponse> {
            self.0.app_get_objects(req).await
        }

        async fn app_set_objects(&self, req: AppSetObjectsRequest) -> RegistryResult<()> {
            self.0.app_set_objects(req).await
        }

        async fn app_client_disconnect(&self, _req: AppClientDisconnectRequest) -> RegistryResult<()> {
            Err(RegistryError::Unavailable("disconnect refused".into()))
        }

        async fn app_lookup_object(&self, req: AppLookupObjectRequest) -> RegistryResult<AppLookupObjectResponse> {
            self.0.app_lookup_object(req).await
        }

        async fn app_get_by_deployment_name(
            &self,
            req: AppGetByDeploymentNameRequest,
        ) -> RegistryResult<AppGetByDeploymentNameResponse> {
            self.0.app_get_by_deployment_name(req).await
        }

        async fn app_deploy(&self, req: AppDeployRequest) -> RegistryResult<()> {
            self.0.app_deploy(req).await
        }

        async fn object_create(&self, req: ObjectCreateRequest) -> RegistryResult<ObjectCreateResponse> {
            self.0.object_create(req).await
        }
    }

    #[tokio::test]
    async fn plan_reports_create_error_over_disconnect_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_blueprint(&dir, CHAIN);
        let registry = Arc::new(StickyRegistry(InMemoryRegistry::new()));
        registry.0.fail_object_create("image");

        let err = plan(&CliConfig::default(), registry, &path, None, DeploymentNamespace::Account)
            .await
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to create"), "{message}");
        assert!(!message.contains("disconnect refused"), "{message}");
    }

    #[tokio::test]
    async fn plan_succeeds_when_only_disconnect_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_blueprint(&dir, CHAIN);
        let registry = Arc::new(StickyRegistry(InMemoryRegistry::new()));

        let report = plan(&CliConfig::default(), registry.clone(), &path, None, DeploymentNamespace::Account)
            .await
            .unwrap();
        assert_eq!(report.objects.len(), 3);
        assert_eq!(registry.0.call_count("AppSetObjects"), 1);
    }

    #[test]
    fn registry_flag_overrides_config() {
        let config = CliConfig {
            registry_url: Some("http://config:7420".into()),
            ..CliConfig::default()
        };
        assert!(registry_for(&config, Some("http://flag:7420".into())).unwrap().is_some());
        assert!(registry_for(&CliConfig::default(), None).unwrap().is_none());
    }
}
