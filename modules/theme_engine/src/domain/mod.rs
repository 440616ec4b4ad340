//! Domain layer - business logic and services

pub mod block_tree;
pub mod diff;
pub mod events;
pub mod files;
pub mod package;
pub mod repository;
pub mod service;
pub mod settings_migration;
pub mod snapshot;
pub mod validation;

pub use events::{EventPublisher, NoOpEventPublisher, ThemeEvent};
pub use files::{FileStoreError, ThemeFileStore};
pub use package::{PackageError, ThemePackageReader};
pub use repository::{
    BackupRepository, CustomizationRepository, FileHistoryRepository, GlobalSectionRepository,
    LayoutRepository, SectionRepository, TemplateRepository, ThemeRepository,
};
pub use service::{Repositories, Service};
