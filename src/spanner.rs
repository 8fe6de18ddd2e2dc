use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert};
use gcloud_spanner::statement::Statement;

use crate::models::Keyword;
use crate::store::{KeywordStore, StoreError, StoreResult};

const TABLE: &str = "keywords";
const TEXT_INDEX: &str = "keywords_by_text";

/// Fully qualified Spanner database name, parsed from the connection string
///
/// Format: `projects/{project}/instances/{instance}/databases/{database}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePath {
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl DatabasePath {
    pub fn project_path(&self) -> String {
        format!("projects/{}", self.project)
    }

    pub fn instance_path(&self) -> String {
        format!("{}/instances/{}", self.project_path(), self.instance)
    }
}

impl FromStr for DatabasePath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().trim_matches('/').split('/').collect();
        match parts.as_slice() {
            ["projects", project, "instances", instance, "databases", database]
                if !project.is_empty() && !instance.is_empty() && !database.is_empty() =>
            {
                Ok(DatabasePath {
                    project: project.to_string(),
                    instance: instance.to_string(),
                    database: database.to_string(),
                })
            }
            _ => bail!(
                "expected 'projects/<project>/instances/<instance>/databases/<database>', got '{}'",
                s
            ),
        }
    }
}

impl fmt::Display for DatabasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/databases/{}", self.instance_path(), self.database)
    }
}

/// Keyword store backed by a Spanner table
#[derive(Clone)]
pub struct SpannerKeywordStore {
    inner: Arc<Client>,
}

impl SpannerKeywordStore {
    /// Connect to the database named by `database_uri`
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST on its own.
    /// Missing instance, database, table or text index are created first.
    pub async fn connect(database_uri: &str, emulator_host: Option<&str>) -> Result<Self> {
        let path: DatabasePath = database_uri
            .parse()
            .context("SPANNER_DATABASE_URI is not a valid database path")?;

        auto_provision(&path, emulator_host.is_some()).await?;

        match emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let database_path = path.to_string();
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!("Successfully connected to Spanner database: {}", database_path);

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    async fn query_keywords(&self, statement: Statement) -> Result<Vec<Keyword>> {
        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query keywords from Spanner")?;

        let mut keywords = Vec::new();
        while let Some(row) = result_set.next().await? {
            keywords.push(Keyword {
                id: row.column_by_name("id")?,
                text: row.column_by_name("text")?,
                alert_count: row.column_by_name("alert_count")?,
            });
        }
        Ok(keywords)
    }
}

#[async_trait]
impl KeywordStore for SpannerKeywordStore {
    async fn list(&self) -> StoreResult<Vec<Keyword>> {
        let statement = Statement::new("SELECT id, text, alert_count FROM keywords");
        let keywords = self.query_keywords(statement).await?;

        tracing::debug!("Listed {} keywords", keywords.len());
        Ok(keywords)
    }

    async fn find_by_text(&self, text: &str) -> StoreResult<Option<Keyword>> {
        let mut statement =
            Statement::new("SELECT id, text, alert_count FROM keywords WHERE text = @text LIMIT 1");
        statement.add_param("text", &text.to_string());

        let keyword = self.query_keywords(statement).await?.into_iter().next();
        Ok(keyword)
    }

    async fn insert(&self, keyword: &Keyword) -> StoreResult<()> {
        let mutation = insert(
            TABLE,
            &["id", "text", "alert_count"],
            &[&keyword.id, &keyword.text, &keyword.alert_count],
        );

        match self.inner.apply(vec![mutation]).await {
            Ok(_) => {
                tracing::debug!("Inserted keyword with id: {}", keyword.id);
                Ok(())
            }
            // The unique index on text turns a lost check-then-insert race into this
            Err(SpannerError::GRPC(status)) if status.code() == Code::AlreadyExists => {
                Err(StoreError::Duplicate(keyword.text.clone()))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to insert keyword into Spanner")
                .into()),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mutation = delete(TABLE, Key::new(&id.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete keyword from Spanner")?;

        tracing::debug!("Deleted keyword with id: {}", id);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await.context("Failed to read health check row")?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results").into())
        }
    }
}

/// Create the instance, database, table and text index if they are missing
async fn auto_provision(path: &DatabasePath, emulator: bool) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    ensure_instance_exists(&admin_client, path, emulator).await?;
    ensure_database_exists(&admin_client, path).await?;
    ensure_schema_exists(&admin_client, path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Run `lookup`; only when it reports NOT_FOUND, run `create`
async fn get_or_create<T, L, C, F>(kind: &str, name: &str, lookup: L, create: C) -> Result<bool>
where
    L: Future<Output = std::result::Result<T, Status>>,
    C: FnOnce() -> F,
    F: Future<Output = Result<()>>,
{
    match lookup.await {
        Ok(_) => {
            tracing::info!("{} already exists: {}", kind, name);
            Ok(false)
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, name);
            create().await?;
            tracing::info!("{} created successfully: {}", kind, name);
            Ok(true)
        }
        Err(status) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind.to_lowercase(),
            status.message()
        )),
    }
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    path: &DatabasePath,
    emulator: bool,
) -> Result<()> {
    let instance_path = path.instance_path();
    let lookup = admin_client.instance().get_instance(
        GetInstanceRequest {
            name: instance_path.clone(),
            field_mask: None,
        },
        None,
    );

    get_or_create("Instance", &instance_path, lookup, move || async move {
        let project_path = path.project_path();
        let config_name = if emulator {
            "emulator-config"
        } else {
            "regional-us-central1"
        };

        let request = CreateInstanceRequest {
            parent: project_path.clone(),
            instance_id: path.instance.clone(),
            instance: Some(Instance {
                name: path.instance_path(),
                config: format!("{}/instanceConfigs/{}", project_path, config_name),
                display_name: format!("{} instance", path.instance),
                node_count: 1,
                ..Default::default()
            }),
        };

        admin_client
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?
            .wait(None)
            .await
            .context("Failed to create instance")?;
        Ok::<(), anyhow::Error>(())
    })
    .await?;
    Ok(())
}

async fn ensure_database_exists(admin_client: &AdminClient, path: &DatabasePath) -> Result<()> {
    let database_path = path.to_string();
    let lookup = admin_client.database().get_database(
        GetDatabaseRequest {
            name: database_path.clone(),
        },
        None,
    );

    get_or_create("Database", &database_path, lookup, move || async move {
        let request = CreateDatabaseRequest {
            parent: path.instance_path(),
            create_statement: format!("CREATE DATABASE `{}`", path.database),
            extra_statements: vec![],
            encryption_config: None,
            database_dialect: 1, // Google Standard SQL
            proto_descriptors: vec![],
        };

        admin_client
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;
        Ok::<(), anyhow::Error>(())
    })
    .await?;
    Ok(())
}

/// DDL still missing from the database, given its current statements
fn missing_schema_ddl(existing: &[String]) -> Vec<String> {
    let has = |kind: &str, name: &str| {
        let plain = format!("{} {}", kind, name);
        let quoted = format!("{} `{}`", kind, name);
        existing
            .iter()
            .any(|stmt| stmt.contains(&plain) || stmt.contains(&quoted))
    };

    let mut statements = Vec::new();
    if !has("CREATE TABLE", TABLE) {
        statements.push(
            format!(
                r#"
CREATE TABLE {TABLE} (
    id STRING(36) NOT NULL,
    text STRING(50) NOT NULL,
    alert_count INT64 NOT NULL DEFAULT (0),
) PRIMARY KEY (id)
"#
            )
            .trim()
            .to_string(),
        );
    }
    if !has("CREATE UNIQUE INDEX", TEXT_INDEX) {
        statements.push(format!(
            "CREATE UNIQUE INDEX {TEXT_INDEX} ON {TABLE} (text)"
        ));
    }
    statements
}

async fn ensure_schema_exists(admin_client: &AdminClient, path: &DatabasePath) -> Result<()> {
    let database_path = path.to_string();
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.clone(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let statements = missing_schema_ddl(&ddl_response.into_inner().statements);
    if statements.is_empty() {
        tracing::info!("Table '{}' and index '{}' already exist", TABLE, TEXT_INDEX);
        return Ok(());
    }

    tracing::info!("Applying {} schema statement(s)...", statements.len());

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path,
        statements,
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start schema creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create keyword schema")?;

    tracing::info!("Table '{}' and index '{}' are ready", TABLE, TEXT_INDEX);
    Ok(())
}
