//! Database migrations for the theme engine

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_themes::Migration),
            Box::new(m20260301_000002_create_templates::Migration),
            Box::new(m20260301_000003_create_global_sections::Migration),
            Box::new(m20260301_000004_create_customizations::Migration),
            Box::new(m20260301_000005_create_backups::Migration),
            Box::new(m20260301_000006_create_file_history::Migration),
        ]
    }
}

mod m20260301_000001_create_themes {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260301_000001_create_themes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Themes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Themes::Code)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Themes::Name).string().not_null())
                        .col(ColumnDef::new(Themes::Version).string().not_null())
                        .col(ColumnDef::new(Themes::PackageCode).string().not_null())
                        .col(ColumnDef::new(Themes::SettingsSchema).json().not_null())
                        .col(
                            ColumnDef::new(Themes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Themes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Themes {
        Table,
        Code,
        Name,
        Version,
        PackageCode,
        SettingsSchema,
        CreatedAt,
    }
}

mod m20260301_000002_create_templates {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260301_000002_create_templates"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StoreTemplates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StoreTemplates::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StoreTemplates::StoreId).uuid().not_null())
                        .col(ColumnDef::new(StoreTemplates::ThemeCode).string().not_null())
                        .col(ColumnDef::new(StoreTemplates::TemplateType).string().not_null())
                        .col(ColumnDef::new(StoreTemplates::Name).string().not_null())
                        .col(
                            ColumnDef::new(StoreTemplates::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StoreTemplates::Enabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(StoreTemplates::Settings).json().not_null())
                        .col(ColumnDef::new(StoreTemplates::SeoSettings).json().not_null())
                        .col(
                            ColumnDef::new(StoreTemplates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(StoreTemplates::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_store_templates_store_type")
                        .table(StoreTemplates::Table)
                        .col(StoreTemplates::StoreId)
                        .col(StoreTemplates::TemplateType)
                        .to_owned(),
                )
                .await?;

            // At most one default per (store, template type)
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS uq_store_templates_default \
                     ON store_templates (store_id, template_type) WHERE is_default",
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SectionInstances::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SectionInstances::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SectionInstances::TemplateId).uuid().not_null())
                        .col(ColumnDef::new(SectionInstances::SectionType).string().not_null())
                        .col(ColumnDef::new(SectionInstances::Position).integer().not_null())
                        .col(
                            ColumnDef::new(SectionInstances::Enabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(SectionInstances::Settings).json().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_section_instances_template")
                                .from(SectionInstances::Table, SectionInstances::TemplateId)
                                .to(StoreTemplates::Table, StoreTemplates::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_section_instances_template")
                        .table(SectionInstances::Table)
                        .col(SectionInstances::TemplateId)
                        .col(SectionInstances::Position)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SectionBlocks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SectionBlocks::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SectionBlocks::SectionId).uuid().not_null())
                        .col(ColumnDef::new(SectionBlocks::ParentId).uuid())
                        .col(ColumnDef::new(SectionBlocks::BlockType).string().not_null())
                        .col(ColumnDef::new(SectionBlocks::Position).integer().not_null())
                        .col(
                            ColumnDef::new(SectionBlocks::Enabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(SectionBlocks::Settings).json().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_section_blocks_section")
                                .from(SectionBlocks::Table, SectionBlocks::SectionId)
                                .to(SectionInstances::Table, SectionInstances::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_section_blocks_section")
                        .table(SectionBlocks::Table)
                        .col(SectionBlocks::SectionId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SectionBlocks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SectionInstances::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StoreTemplates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StoreTemplates {
        Table,
        Id,
        StoreId,
        ThemeCode,
        TemplateType,
        Name,
        IsDefault,
        Enabled,
        Settings,
        SeoSettings,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum SectionInstances {
        Table,
        Id,
        TemplateId,
        SectionType,
        Position,
        Enabled,
        Settings,
    }

    #[derive(DeriveIden)]
    enum SectionBlocks {
        Table,
        Id,
        SectionId,
        ParentId,
        BlockType,
        Position,
        Enabled,
        Settings,
    }
}

mod m20260301_000003_create_global_sections {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260301_000003_create_global_sections"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(GlobalSections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GlobalSections::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(GlobalSections::StoreId).uuid().not_null())
                        .col(ColumnDef::new(GlobalSections::ThemeCode).string().not_null())
                        .col(ColumnDef::new(GlobalSections::SectionType).string().not_null())
                        .col(
                            ColumnDef::new(GlobalSections::Enabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(GlobalSections::Settings).json().not_null())
                        .col(
                            ColumnDef::new(GlobalSections::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_global_sections_slot")
                        .table(GlobalSections::Table)
                        .col(GlobalSections::StoreId)
                        .col(GlobalSections::ThemeCode)
                        .col(GlobalSections::SectionType)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GlobalSections::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum GlobalSections {
        Table,
        Id,
        StoreId,
        ThemeCode,
        SectionType,
        Enabled,
        Settings,
        UpdatedAt,
    }
}

mod m20260301_000004_create_customizations {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260301_000004_create_customizations"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ThemeCustomizations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ThemeCustomizations::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ThemeCustomizations::StoreId).uuid().not_null())
                        .col(
                            ColumnDef::new(ThemeCustomizations::ThemeCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ThemeCustomizations::Settings).json().not_null())
                        .col(
                            ColumnDef::new(ThemeCustomizations::IsActive)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ThemeCustomizations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_theme_customizations_store_theme")
                        .table(ThemeCustomizations::Table)
                        .col(ThemeCustomizations::StoreId)
                        .col(ThemeCustomizations::ThemeCode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // At most one active theme per store
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS uq_theme_customizations_active \
                     ON theme_customizations (store_id) WHERE is_active",
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ThemeCustomizations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ThemeCustomizations {
        Table,
        Id,
        StoreId,
        ThemeCode,
        Settings,
        IsActive,
        UpdatedAt,
    }
}

mod m20260301_000005_create_backups {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260301_000005_create_backups"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ThemeBackups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ThemeBackups::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ThemeBackups::StoreId).uuid().not_null())
                        .col(ColumnDef::new(ThemeBackups::ThemeCode).string().not_null())
                        .col(ColumnDef::new(ThemeBackups::Name).string().not_null())
                        .col(ColumnDef::new(ThemeBackups::Description).text())
                        .col(ColumnDef::new(ThemeBackups::Settings).json().not_null())
                        .col(ColumnDef::new(ThemeBackups::Customizations).json().not_null())
                        .col(ColumnDef::new(ThemeBackups::Checksum).string().not_null())
                        .col(
                            ColumnDef::new(ThemeBackups::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_theme_backups_store_theme")
                        .table(ThemeBackups::Table)
                        .col(ThemeBackups::StoreId)
                        .col(ThemeBackups::ThemeCode)
                        .col(ThemeBackups::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ThemeBackups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ThemeBackups {
        Table,
        Id,
        StoreId,
        ThemeCode,
        Name,
        Description,
        Settings,
        Customizations,
        Checksum,
        CreatedAt,
    }
}

mod m20260301_000006_create_file_history {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260301_000006_create_file_history"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ThemeFileHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ThemeFileHistory::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ThemeFileHistory::StoreId).uuid().not_null())
                        .col(ColumnDef::new(ThemeFileHistory::ThemeCode).string().not_null())
                        .col(ColumnDef::new(ThemeFileHistory::FilePath).string().not_null())
                        .col(ColumnDef::new(ThemeFileHistory::Version).integer().not_null())
                        .col(ColumnDef::new(ThemeFileHistory::Content).text().not_null())
                        .col(ColumnDef::new(ThemeFileHistory::ChangeType).string().not_null())
                        .col(
                            ColumnDef::new(ThemeFileHistory::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_theme_file_history_version")
                        .table(ThemeFileHistory::Table)
                        .col(ThemeFileHistory::StoreId)
                        .col(ThemeFileHistory::ThemeCode)
                        .col(ThemeFileHistory::FilePath)
                        .col(ThemeFileHistory::Version)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ThemeFileHistory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ThemeFileHistory {
        Table,
        Id,
        StoreId,
        ThemeCode,
        FilePath,
        Version,
        Content,
        ChangeType,
        CreatedAt,
    }
}
