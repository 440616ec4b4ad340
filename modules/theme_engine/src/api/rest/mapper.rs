//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract::{self, BackupIntegrity};
use crate::domain::diff::{LineDiff, SettingDiff};
use uuid::Uuid;

// ===== Template conversions =====

impl From<contract::StoreTemplate> for StoreTemplateDto {
    fn from(template: contract::StoreTemplate) -> Self {
        Self {
            id: template.id,
            store_id: template.store_id,
            theme_code: template.theme_code,
            template_type: template.template_type,
            name: template.name,
            is_default: template.is_default,
            enabled: template.enabled,
            settings: template.settings,
            seo_settings: template.seo_settings,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

impl From<contract::Resolution> for ResolutionDto {
    fn from(resolution: contract::Resolution) -> Self {
        Self {
            persisted: resolution.is_persisted(),
            source: resolution.source.as_str().to_string(),
            template: resolution.template.into(),
        }
    }
}

impl From<UpdateTemplateRequest> for contract::TemplatePatch {
    fn from(req: UpdateTemplateRequest) -> Self {
        Self {
            name: req.name,
            enabled: req.enabled,
            settings: req.settings,
            seo_settings: req.seo_settings,
        }
    }
}

// ===== Section and block conversions =====

impl From<contract::SectionInstance> for SectionDto {
    fn from(section: contract::SectionInstance) -> Self {
        Self {
            id: section.id,
            template_id: section.template_id,
            section_type: section.section_type,
            position: section.position,
            enabled: section.enabled,
            settings: section.settings,
        }
    }
}

impl From<UpdateSectionRequest> for contract::SectionPatch {
    fn from(req: UpdateSectionRequest) -> Self {
        Self {
            enabled: req.enabled,
            settings: req.settings,
        }
    }
}

impl From<contract::NestedBlock> for BlockDto {
    fn from(block: contract::NestedBlock) -> Self {
        Self {
            id: Some(block.id),
            block_type: block.block_type,
            settings: block.settings,
            enabled: block.enabled,
            position: block.position,
            children: block.children.into_iter().map(Into::into).collect(),
        }
    }
}

/// New blocks get fresh ids; positions follow request order
impl From<BlockDto> for contract::NestedBlock {
    fn from(dto: BlockDto) -> Self {
        Self {
            id: dto.id.unwrap_or_else(Uuid::new_v4),
            block_type: dto.block_type,
            settings: dto.settings,
            enabled: dto.enabled,
            position: dto.position,
            children: dto.children.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<BlockDto> for contract::BlockDefinition {
    fn from(dto: BlockDto) -> Self {
        Self {
            block_type: dto.block_type,
            enabled: dto.enabled,
            settings: dto.settings,
            children: dto.children.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<SectionDefinitionDto> for contract::SectionDefinition {
    fn from(dto: SectionDefinitionDto) -> Self {
        Self {
            section_type: dto.section_type,
            enabled: dto.enabled,
            settings: dto.settings,
            blocks: dto.blocks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::ImportReport> for ImportReportDto {
    fn from(report: contract::ImportReport) -> Self {
        Self {
            imported: report.imported,
            failed: report
                .failed
                .into_iter()
                .map(|(index, error)| ImportFailureDto {
                    index,
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}

// ===== Compiled template conversions =====

impl From<contract::CompiledTemplate> for CompiledTemplateDto {
    fn from(compiled: contract::CompiledTemplate) -> Self {
        Self {
            template_type: compiled.template_type,
            template_id: compiled.template_id,
            source: compiled.source.as_str().to_string(),
            sections: compiled.sections.into_iter().map(Into::into).collect(),
            global_sections: compiled.global_sections.map(Into::into),
            warnings: compiled.warnings.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::CompiledSection> for CompiledSectionDto {
    fn from(section: contract::CompiledSection) -> Self {
        Self {
            id: section.id,
            section_type: section.section_type,
            settings: section.settings,
            enabled: section.enabled,
            position: section.position,
            blocks: section.blocks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::IntegrityWarning> for WarningDto {
    fn from(warning: contract::IntegrityWarning) -> Self {
        Self {
            subject: warning.subject,
            message: warning.message,
        }
    }
}

// ===== Global section conversions =====

impl From<contract::ResolvedGlobalSection> for GlobalSectionDto {
    fn from(section: contract::ResolvedGlobalSection) -> Self {
        let source = match section.source {
            contract::GlobalSource::Stored => "stored",
            contract::GlobalSource::ThemeDefault => "theme-default",
        };
        Self {
            id: section.id,
            section_type: section.section_type,
            enabled: section.enabled,
            settings: section.settings,
            blocks: section.blocks.into_iter().map(Into::into).collect(),
            source: source.to_string(),
        }
    }
}

impl From<contract::GlobalSectionSet> for GlobalSectionsDto {
    fn from(set: contract::GlobalSectionSet) -> Self {
        Self {
            announcement_bar: set.announcement_bar.map(Into::into),
            header: set.header.map(Into::into),
            footer: set.footer.map(Into::into),
            warnings: set.warnings.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::GlobalSection> for StoredGlobalSectionDto {
    fn from(section: contract::GlobalSection) -> Self {
        Self {
            id: section.id,
            store_id: section.store_id,
            theme_code: section.theme_code,
            section_type: section.section_type,
            enabled: section.enabled,
            settings: section.settings,
            updated_at: section.updated_at,
        }
    }
}

// ===== Theme conversions =====

impl From<contract::Theme> for ThemeDto {
    fn from(theme: contract::Theme) -> Self {
        Self {
            code: theme.code,
            name: theme.name,
            version: theme.version,
            package_code: theme.package_code,
            settings: theme
                .settings_schema
                .settings
                .into_iter()
                .map(|setting| setting.key)
                .collect(),
            created_at: theme.created_at,
        }
    }
}

impl From<contract::ThemeCustomization> for CustomizationDto {
    fn from(customization: contract::ThemeCustomization) -> Self {
        Self {
            id: customization.id,
            store_id: customization.store_id,
            theme_code: customization.theme_code,
            settings: customization.settings,
            is_active: customization.is_active,
            updated_at: customization.updated_at,
        }
    }
}

// ===== Preset conversions =====

impl From<ApplyPresetRequest> for contract::PresetOptions {
    fn from(req: ApplyPresetRequest) -> Self {
        Self {
            preserve_existing: req.preserve_existing,
        }
    }
}

impl From<contract::PresetOutcome> for PresetOutcomeDto {
    fn from(outcome: contract::PresetOutcome) -> Self {
        Self {
            preset_id: outcome.preset_id,
            theme_code: outcome.theme_code,
            created_templates: outcome.created_templates,
            skipped_templates: outcome.skipped_templates,
            removed_templates: outcome.removed_templates,
        }
    }
}

// ===== Backup conversions =====

impl From<contract::ThemeBackup> for BackupDto {
    fn from(backup: contract::ThemeBackup) -> Self {
        Self {
            id: backup.id,
            store_id: backup.store_id,
            theme_code: backup.theme_code,
            name: backup.name,
            description: backup.description,
            settings: backup.settings,
            customizations: backup.customizations,
            checksum: backup.checksum,
            created_at: backup.created_at,
        }
    }
}

impl From<contract::VerifiedBackup> for VerifiedBackupDto {
    fn from(verified: contract::VerifiedBackup) -> Self {
        let (intact, warning) = match verified.integrity {
            BackupIntegrity::Intact => (true, None),
            BackupIntegrity::Corrupted(warning) => (false, Some(warning.into())),
        };
        Self {
            backup: verified.backup.into(),
            intact,
            warning,
        }
    }
}

impl From<CreateBackupRequest> for contract::BackupOptions {
    fn from(req: CreateBackupRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

impl From<SettingDiff> for SettingDiffDto {
    fn from(diff: SettingDiff) -> Self {
        Self {
            key: diff.key,
            status: diff.status.as_str().to_string(),
            old_value: diff.old_value,
            new_value: diff.new_value,
        }
    }
}

// ===== File conversions =====

impl From<contract::FileHistoryEntry> for FileHistoryEntryDto {
    fn from(entry: contract::FileHistoryEntry) -> Self {
        Self {
            id: entry.id,
            path: entry.file_path,
            version: entry.version,
            content: entry.content,
            change_type: entry.change_type.as_str().to_string(),
            created_at: entry.created_at,
        }
    }
}

impl From<LineDiff> for LineDiffDto {
    fn from(diff: LineDiff) -> Self {
        Self {
            status: diff.status.as_str().to_string(),
            text: diff.text,
        }
    }
}
