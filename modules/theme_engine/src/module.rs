//! Module wiring and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::ThemeEngineApi;
use crate::domain::{EventPublisher, NoOpEventPublisher, Repositories, Service};
use crate::infra::files::FsThemeFileStore;
use crate::infra::packages::FsThemePackageReader;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::repositories::{
    SeaOrmBackupRepository, SeaOrmCustomizationRepository, SeaOrmFileHistoryRepository,
    SeaOrmGlobalSectionRepository, SeaOrmLayoutRepository, SeaOrmSectionRepository,
    SeaOrmTemplateRepository, SeaOrmThemeRepository,
};
use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Theme engine module: owns the domain service and exposes its native client and
/// REST routes
pub struct ThemeEngineModule {
    service: Arc<Service>,
}

impl ThemeEngineModule {
    /// Connect to `database_url`, run migrations and build the module
    pub async fn connect(database_url: &str, config: Config) -> Result<Self> {
        let conn = Database::connect(database_url).await?;
        Self::init(conn, config, Arc::new(NoOpEventPublisher)).await
    }

    /// Run migrations on `conn` and wire repositories, theme packages and theme files
    /// from `config`
    pub async fn init(
        conn: DatabaseConnection,
        config: Config,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self> {
        Migrator::up(&conn, None).await?;
        tracing::info!("Theme engine migrations completed");

        let conn = Arc::new(conn);
        let repos = Repositories {
            themes: Arc::new(SeaOrmThemeRepository::new(conn.clone())),
            templates: Arc::new(SeaOrmTemplateRepository::new(conn.clone())),
            sections: Arc::new(SeaOrmSectionRepository::new(conn.clone())),
            globals: Arc::new(SeaOrmGlobalSectionRepository::new(conn.clone())),
            customizations: Arc::new(SeaOrmCustomizationRepository::new(conn.clone())),
            layouts: Arc::new(SeaOrmLayoutRepository::new(conn.clone())),
            backups: Arc::new(SeaOrmBackupRepository::new(conn.clone())),
            file_history: Arc::new(SeaOrmFileHistoryRepository::new(conn)),
        };
        let packages = Arc::new(FsThemePackageReader::new(config.packages_root.clone()));
        let files = Arc::new(FsThemeFileStore::new(config.files_root.clone()));

        tracing::info!(
            packages_root = %config.packages_root.display(),
            files_root = %config.files_root.display(),
            schema_validation = config.enable_schema_validation,
            "Theme engine initialized"
        );
        let service = Arc::new(Service::new(repos, packages, files, event_publisher, config));
        Ok(Self { service })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules
    pub fn native_client(&self) -> Arc<dyn ThemeEngineApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        tracing::info!("Registering theme engine REST routes");
        crate::api::rest::register_routes(router, self.service.clone())
    }
}
