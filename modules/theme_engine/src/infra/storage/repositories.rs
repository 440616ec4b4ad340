//! SeaORM repository implementations
//!
//! Multi-row writes run inside a single database transaction.

use crate::contract::{
    Block, FileHistoryEntry, GlobalSection, SectionInstance, StoreTemplate, Theme, ThemeBackup,
    ThemeCustomization,
};
use crate::domain::repository::{
    BackupRepository, CustomizationRepository, FileHistoryRepository, GlobalSectionRepository,
    LayoutMode, LayoutOutcome, LayoutReplacement, LayoutRepository, MaterializedSection,
    SectionRepository, TemplateLayout, TemplateRepository, ThemeRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait,
    ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{
    file_history, global_section, section_block, section_instance, store_template, theme,
    theme_backup, theme_customization,
};

// ===== Theme Repository =====

pub struct SeaOrmThemeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmThemeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ThemeRepository for SeaOrmThemeRepository {
    async fn create(&self, model: &Theme) -> Result<Theme> {
        let active = theme::ActiveModel::try_from(model)?;
        theme::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(model.clone())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Theme>> {
        let result = theme::Entity::find_by_id(code.to_string())
            .one(&*self.db)
            .await?;
        result.map(Theme::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Theme>> {
        let results = theme::Entity::find()
            .order_by_asc(theme::Column::Code)
            .all(&*self.db)
            .await?;
        results.into_iter().map(Theme::try_from).collect()
    }

    async fn exists(&self, code: &str) -> Result<bool> {
        let count = theme::Entity::find()
            .filter(theme::Column::Code.eq(code))
            .count(&*self.db)
            .await?;
        Ok(count > 0)
    }
}

// ===== Template Repository =====

pub struct SeaOrmTemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTemplateRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TemplateRepository for SeaOrmTemplateRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreTemplate>> {
        let result = store_template::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_type(&self, store_id: Uuid, template_type: &str) -> Result<Vec<StoreTemplate>> {
        let results = store_template::Entity::find()
            .filter(store_template::Column::StoreId.eq(store_id))
            .filter(store_template::Column::TemplateType.eq(template_type))
            .order_by_desc(store_template::Column::IsDefault)
            .order_by_asc(store_template::Column::CreatedAt)
            .order_by_asc(store_template::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn list_for_store(
        &self,
        store_id: Uuid,
        theme_code: Option<&str>,
    ) -> Result<Vec<StoreTemplate>> {
        let mut query =
            store_template::Entity::find().filter(store_template::Column::StoreId.eq(store_id));
        if let Some(theme_code) = theme_code {
            query = query.filter(store_template::Column::ThemeCode.eq(theme_code));
        }

        let results = query
            .order_by_asc(store_template::Column::TemplateType)
            .order_by_desc(store_template::Column::IsDefault)
            .order_by_asc(store_template::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn create(&self, layout: &TemplateLayout) -> Result<StoreTemplate> {
        let txn = self.db.begin().await?;
        insert_layout(&txn, layout).await?;
        txn.commit().await?;
        Ok(layout.template.clone())
    }

    async fn update(&self, template: &StoreTemplate) -> Result<StoreTemplate> {
        let active = store_template::ActiveModel {
            id: Unchanged(template.id),
            name: Set(template.name.clone()),
            enabled: Set(template.enabled),
            settings: Set(template.settings.clone()),
            seo_settings: Set(template.seo_settings.clone()),
            updated_at: Set(template.updated_at),
            ..Default::default()
        };
        let updated = active.update(&*self.db).await?;
        Ok(updated.into())
    }

    async fn set_default(&self, template_id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let template = store_template::Entity::find_by_id(template_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("template {} not found", template_id))?;

        unset_default(&txn, template.store_id, &template.template_type).await?;
        store_template::Entity::update_many()
            .col_expr(store_template::Column::IsDefault, Expr::value(true))
            .col_expr(store_template::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(store_template::Column::Id.eq(template_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, template_id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        delete_templates(&txn, &[template_id]).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn replace_sections(
        &self,
        template_id: Uuid,
        sections: &[MaterializedSection],
    ) -> Result<()> {
        let txn = self.db.begin().await?;

        let existing: Vec<Uuid> = section_instance::Entity::find()
            .filter(section_instance::Column::TemplateId.eq(template_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|section| section.id)
            .collect();
        delete_sections(&txn, &existing).await?;

        for section in sections {
            insert_section(&txn, section).await?;
        }
        store_template::Entity::update_many()
            .col_expr(store_template::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(store_template::Column::Id.eq(template_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }
}

// ===== Section Repository =====

pub struct SeaOrmSectionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SectionRepository for SeaOrmSectionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SectionInstance>> {
        let result = section_instance::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_for_template(&self, template_id: Uuid) -> Result<Vec<SectionInstance>> {
        let results = section_instance::Entity::find()
            .filter(section_instance::Column::TemplateId.eq(template_id))
            .order_by_asc(section_instance::Column::Position)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, materialized: &MaterializedSection) -> Result<SectionInstance> {
        let txn = self.db.begin().await?;
        let template_id = materialized.section.template_id;

        let count = section_instance::Entity::find()
            .filter(section_instance::Column::TemplateId.eq(template_id))
            .count(&txn)
            .await?;
        let position = materialized.section.position.clamp(0, count as i32);

        section_instance::Entity::update_many()
            .col_expr(
                section_instance::Column::Position,
                Expr::col(section_instance::Column::Position).add(1),
            )
            .filter(section_instance::Column::TemplateId.eq(template_id))
            .filter(section_instance::Column::Position.gte(position))
            .exec(&txn)
            .await?;

        let mut placed = materialized.clone();
        placed.section.position = position;
        insert_section(&txn, &placed).await?;

        txn.commit().await?;
        Ok(placed.section)
    }

    async fn update(&self, section: &SectionInstance) -> Result<SectionInstance> {
        let active = section_instance::ActiveModel {
            id: Unchanged(section.id),
            enabled: Set(section.enabled),
            settings: Set(section.settings.clone()),
            ..Default::default()
        };
        let updated = active.update(&*self.db).await?;
        Ok(updated.into())
    }

    async fn delete_and_compact(&self, section_id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;
        let Some(section) = section_instance::Entity::find_by_id(section_id)
            .one(&txn)
            .await?
        else {
            return Ok(());
        };

        delete_sections(&txn, &[section_id]).await?;

        let remaining = section_instance::Entity::find()
            .filter(section_instance::Column::TemplateId.eq(section.template_id))
            .order_by_asc(section_instance::Column::Position)
            .all(&txn)
            .await?;
        for (index, row) in remaining.into_iter().enumerate() {
            set_position(&txn, row.id, index as i32).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn reorder(&self, template_id: Uuid, ordered_ids: &[Uuid]) -> Result<()> {
        let txn = self.db.begin().await?;
        for (index, id) in ordered_ids.iter().enumerate() {
            section_instance::Entity::update_many()
                .col_expr(section_instance::Column::Position, Expr::value(index as i32))
                .filter(section_instance::Column::Id.eq(*id))
                .filter(section_instance::Column::TemplateId.eq(template_id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn list_blocks(&self, section_ids: &[Uuid]) -> Result<Vec<Block>> {
        if section_ids.is_empty() {
            return Ok(Vec::new());
        }
        let results = section_block::Entity::find()
            .filter(section_block::Column::SectionId.is_in(section_ids.iter().copied()))
            .order_by_asc(section_block::Column::Position)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn find_blocks(&self, block_ids: &[Uuid]) -> Result<Vec<Block>> {
        if block_ids.is_empty() {
            return Ok(Vec::new());
        }
        let results = section_block::Entity::find()
            .filter(section_block::Column::Id.is_in(block_ids.iter().copied()))
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn replace_blocks(&self, section_id: Uuid, blocks: &[Block]) -> Result<()> {
        let txn = self.db.begin().await?;
        section_block::Entity::delete_many()
            .filter(section_block::Column::SectionId.eq(section_id))
            .exec(&txn)
            .await?;
        for block in blocks {
            section_block::Entity::insert(section_block::ActiveModel::from(block))
                .exec_without_returning(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}

// ===== Global Section Repository =====

pub struct SeaOrmGlobalSectionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmGlobalSectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GlobalSectionRepository for SeaOrmGlobalSectionRepository {
    async fn find(
        &self,
        store_id: Uuid,
        theme_code: &str,
        section_type: &str,
    ) -> Result<Option<GlobalSection>> {
        let result = global_section::Entity::find()
            .filter(global_section::Column::StoreId.eq(store_id))
            .filter(global_section::Column::ThemeCode.eq(theme_code))
            .filter(global_section::Column::SectionType.eq(section_type))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GlobalSection>> {
        let result = global_section::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, store_id: Uuid, theme_code: &str) -> Result<Vec<GlobalSection>> {
        let results = global_section::Entity::find()
            .filter(global_section::Column::StoreId.eq(store_id))
            .filter(global_section::Column::ThemeCode.eq(theme_code))
            .order_by_asc(global_section::Column::SectionType)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn upsert(&self, section: &GlobalSection) -> Result<GlobalSection> {
        let txn = self.db.begin().await?;
        let existing = global_section::Entity::find()
            .filter(global_section::Column::StoreId.eq(section.store_id))
            .filter(global_section::Column::ThemeCode.eq(&section.theme_code))
            .filter(global_section::Column::SectionType.eq(&section.section_type))
            .one(&txn)
            .await?;

        let mut stored = section.clone();
        match existing {
            Some(row) => {
                stored.id = row.id;
                let mut active = global_section::ActiveModel::from(&stored);
                active.id = Unchanged(row.id);
                global_section::Entity::update(active).exec(&txn).await?;
            }
            None => {
                global_section::Entity::insert(global_section::ActiveModel::from(&stored))
                    .exec_without_returning(&txn)
                    .await?;
            }
        }

        txn.commit().await?;
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        global_section::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Customization Repository =====

pub struct SeaOrmCustomizationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCustomizationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomizationRepository for SeaOrmCustomizationRepository {
    async fn find_active(&self, store_id: Uuid) -> Result<Option<ThemeCustomization>> {
        let result = theme_customization::Entity::find()
            .filter(theme_customization::Column::StoreId.eq(store_id))
            .filter(theme_customization::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find(&self, store_id: Uuid, theme_code: &str) -> Result<Option<ThemeCustomization>> {
        let result = theme_customization::Entity::find()
            .filter(theme_customization::Column::StoreId.eq(store_id))
            .filter(theme_customization::Column::ThemeCode.eq(theme_code))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn upsert(&self, customization: &ThemeCustomization) -> Result<ThemeCustomization> {
        let txn = self.db.begin().await?;
        let stored = upsert_customization(&txn, customization).await?;
        txn.commit().await?;
        Ok(stored)
    }

    async fn activate(&self, customization: &ThemeCustomization) -> Result<ThemeCustomization> {
        let txn = self.db.begin().await?;
        deactivate_customizations(&txn, customization.store_id).await?;
        let mut active = customization.clone();
        active.is_active = true;
        let stored = upsert_customization(&txn, &active).await?;
        txn.commit().await?;
        Ok(stored)
    }
}

// ===== Layout Repository =====

pub struct SeaOrmLayoutRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmLayoutRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LayoutRepository for SeaOrmLayoutRepository {
    async fn replace_layout(&self, replacement: &LayoutReplacement) -> Result<LayoutOutcome> {
        let txn = self.db.begin().await?;
        let mut outcome = LayoutOutcome::default();

        let mut query = store_template::Entity::find()
            .filter(store_template::Column::StoreId.eq(replacement.store_id));
        if replacement.mode == LayoutMode::ReplaceTheme {
            query = query.filter(store_template::Column::ThemeCode.eq(&replacement.theme_code));
        }
        let existing = query.all(&txn).await?;

        let kept_types: HashSet<String> = match replacement.mode {
            LayoutMode::ReplaceStore | LayoutMode::ReplaceTheme => {
                let ids: Vec<Uuid> = existing.iter().map(|row| row.id).collect();
                outcome.removed_templates = delete_templates(&txn, &ids).await?;
                HashSet::new()
            }
            LayoutMode::MergeMissing => existing
                .into_iter()
                .map(|row| row.template_type)
                .collect(),
        };

        for layout in &replacement.templates {
            let template_type = &layout.template.template_type;
            if kept_types.contains(template_type) {
                outcome.skipped_types.push(template_type.clone());
                continue;
            }
            insert_layout(&txn, layout).await?;
            outcome.inserted_types.push(template_type.clone());
        }

        if let Some(customization) = &replacement.customization {
            if customization.is_active {
                deactivate_customizations(&txn, customization.store_id).await?;
            }
            upsert_customization(&txn, customization).await?;
        }

        txn.commit().await?;
        Ok(outcome)
    }
}

// ===== Backup Repository =====

pub struct SeaOrmBackupRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmBackupRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BackupRepository for SeaOrmBackupRepository {
    async fn create(&self, backup: &ThemeBackup) -> Result<ThemeBackup> {
        theme_backup::Entity::insert(theme_backup::ActiveModel::from(backup))
            .exec_without_returning(&*self.db)
            .await?;
        Ok(backup.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ThemeBackup>> {
        let result = theme_backup::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, store_id: Uuid, theme_code: &str, limit: u64) -> Result<Vec<ThemeBackup>> {
        let results = theme_backup::Entity::find()
            .filter(theme_backup::Column::StoreId.eq(store_id))
            .filter(theme_backup::Column::ThemeCode.eq(theme_code))
            .order_by_desc(theme_backup::Column::CreatedAt)
            .order_by_desc(theme_backup::Column::Id)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== File History Repository =====

pub struct SeaOrmFileHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFileHistoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FileHistoryRepository for SeaOrmFileHistoryRepository {
    async fn append(&self, entry: &FileHistoryEntry) -> Result<FileHistoryEntry> {
        let txn = self.db.begin().await?;
        let latest = file_history::Entity::find()
            .filter(file_history::Column::StoreId.eq(entry.store_id))
            .filter(file_history::Column::ThemeCode.eq(&entry.theme_code))
            .filter(file_history::Column::FilePath.eq(&entry.file_path))
            .order_by_desc(file_history::Column::Version)
            .one(&txn)
            .await?;

        let mut stored = entry.clone();
        stored.version = latest.map(|row| row.version + 1).unwrap_or(1);
        file_history::Entity::insert(file_history::ActiveModel::from(&stored))
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileHistoryEntry>> {
        let result = file_history::Entity::find_by_id(id).one(&*self.db).await?;
        result.map(FileHistoryEntry::try_from).transpose()
    }

    async fn find_version(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        version: i32,
    ) -> Result<Option<FileHistoryEntry>> {
        let result = file_history::Entity::find()
            .filter(file_history::Column::StoreId.eq(store_id))
            .filter(file_history::Column::ThemeCode.eq(theme_code))
            .filter(file_history::Column::FilePath.eq(file_path))
            .filter(file_history::Column::Version.eq(version))
            .one(&*self.db)
            .await?;
        result.map(FileHistoryEntry::try_from).transpose()
    }

    async fn list_for_file(
        &self,
        store_id: Uuid,
        theme_code: &str,
        file_path: &str,
        limit: u64,
    ) -> Result<Vec<FileHistoryEntry>> {
        let results = file_history::Entity::find()
            .filter(file_history::Column::StoreId.eq(store_id))
            .filter(file_history::Column::ThemeCode.eq(theme_code))
            .filter(file_history::Column::FilePath.eq(file_path))
            .order_by_desc(file_history::Column::Version)
            .limit(limit)
            .all(&*self.db)
            .await?;
        results.into_iter().map(FileHistoryEntry::try_from).collect()
    }
}

// ===== Transaction helpers =====

async fn insert_layout<C: ConnectionTrait>(conn: &C, layout: &TemplateLayout) -> Result<()> {
    let template = &layout.template;
    if template.is_default {
        unset_default(conn, template.store_id, &template.template_type).await?;
    }
    store_template::Entity::insert(store_template::ActiveModel::from(template))
        .exec_without_returning(conn)
        .await?;
    for section in &layout.sections {
        insert_section(conn, section).await?;
    }
    Ok(())
}

async fn insert_section<C: ConnectionTrait>(conn: &C, section: &MaterializedSection) -> Result<()> {
    section_instance::Entity::insert(section_instance::ActiveModel::from(&section.section))
        .exec_without_returning(conn)
        .await?;
    for block in &section.blocks {
        section_block::Entity::insert(section_block::ActiveModel::from(block))
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

async fn unset_default<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    template_type: &str,
) -> Result<()> {
    store_template::Entity::update_many()
        .col_expr(store_template::Column::IsDefault, Expr::value(false))
        .filter(store_template::Column::StoreId.eq(store_id))
        .filter(store_template::Column::TemplateType.eq(template_type))
        .filter(store_template::Column::IsDefault.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

async fn set_position<C: ConnectionTrait>(conn: &C, section_id: Uuid, position: i32) -> Result<()> {
    section_instance::Entity::update_many()
        .col_expr(section_instance::Column::Position, Expr::value(position))
        .filter(section_instance::Column::Id.eq(section_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Delete sections with their blocks
async fn delete_sections<C: ConnectionTrait>(conn: &C, section_ids: &[Uuid]) -> Result<()> {
    if section_ids.is_empty() {
        return Ok(());
    }
    section_block::Entity::delete_many()
        .filter(section_block::Column::SectionId.is_in(section_ids.iter().copied()))
        .exec(conn)
        .await?;
    section_instance::Entity::delete_many()
        .filter(section_instance::Column::Id.is_in(section_ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(())
}

/// Delete templates with their sections and blocks; returns the number of templates
async fn delete_templates<C: ConnectionTrait>(conn: &C, template_ids: &[Uuid]) -> Result<u64> {
    if template_ids.is_empty() {
        return Ok(0);
    }
    let section_ids: Vec<Uuid> = section_instance::Entity::find()
        .filter(section_instance::Column::TemplateId.is_in(template_ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|section| section.id)
        .collect();
    delete_sections(conn, &section_ids).await?;

    let result = store_template::Entity::delete_many()
        .filter(store_template::Column::Id.is_in(template_ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

async fn deactivate_customizations<C: ConnectionTrait>(conn: &C, store_id: Uuid) -> Result<()> {
    theme_customization::Entity::update_many()
        .col_expr(theme_customization::Column::IsActive, Expr::value(false))
        .filter(theme_customization::Column::StoreId.eq(store_id))
        .filter(theme_customization::Column::IsActive.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

/// Insert or replace by (store, theme), keeping the existing row id
async fn upsert_customization<C: ConnectionTrait>(
    conn: &C,
    customization: &ThemeCustomization,
) -> Result<ThemeCustomization> {
    let existing = theme_customization::Entity::find()
        .filter(theme_customization::Column::StoreId.eq(customization.store_id))
        .filter(theme_customization::Column::ThemeCode.eq(&customization.theme_code))
        .one(conn)
        .await?;

    let mut stored = customization.clone();
    match existing {
        Some(row) => {
            stored.id = row.id;
            let mut active = theme_customization::ActiveModel::from(&stored);
            active.id = Unchanged(row.id);
            theme_customization::Entity::update(active).exec(conn).await?;
        }
        None => {
            theme_customization::Entity::insert(theme_customization::ActiveModel::from(&stored))
                .exec_without_returning(conn)
                .await?;
        }
    }
    Ok(stored)
}
