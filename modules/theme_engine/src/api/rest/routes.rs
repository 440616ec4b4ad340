//! Route registration

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{delete, get, patch, post, put},
    Extension, Router,
};
use std::sync::Arc;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Rendering
        .route(
            "/stores/{store_id}/templates/{template_type}/resolve",
            get(handlers::resolve_template),
        )
        .route(
            "/stores/{store_id}/themes/{theme_code}/templates/{template_type}/compiled",
            get(handlers::get_compiled_template),
        )
        .route(
            "/stores/{store_id}/themes/{theme_code}/templates/{template_type}/materialize",
            post(handlers::materialize_template),
        )
        // Templates
        .route(
            "/stores/{store_id}/templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route(
            "/templates/{template_id}",
            get(handlers::get_template)
                .patch(handlers::update_template)
                .delete(handlers::delete_template),
        )
        .route(
            "/templates/{template_id}/default",
            post(handlers::set_default_template),
        )
        .route("/templates/{template_id}/reset", post(handlers::reset_template))
        // Sections and blocks
        .route("/templates/{template_id}/sections", post(handlers::add_section))
        .route(
            "/templates/{template_id}/sections/order",
            put(handlers::reorder_sections),
        )
        .route(
            "/templates/{template_id}/sections/import",
            post(handlers::import_sections),
        )
        .route(
            "/sections/{section_id}",
            patch(handlers::update_section).delete(handlers::delete_section),
        )
        .route(
            "/sections/{section_id}/blocks",
            get(handlers::get_section_blocks).put(handlers::save_section_blocks),
        )
        // Global sections
        .route(
            "/stores/{store_id}/themes/{theme_code}/global-sections",
            get(handlers::get_global_sections),
        )
        .route(
            "/stores/{store_id}/themes/{theme_code}/global-sections/{section_type}",
            put(handlers::save_global_section),
        )
        .route(
            "/global-sections/{section_id}",
            delete(handlers::delete_global_section),
        )
        // Themes
        .route(
            "/themes",
            get(handlers::list_themes).post(handlers::register_theme),
        )
        .route("/themes/{code}", get(handlers::get_theme))
        .route("/themes/{code}/duplicate", post(handlers::duplicate_theme))
        .route(
            "/stores/{store_id}/theme",
            get(handlers::get_active_customization).put(handlers::switch_theme),
        )
        // Presets
        .route(
            "/stores/{store_id}/presets/{preset_id}/apply",
            post(handlers::apply_preset),
        )
        // Backups
        .route(
            "/stores/{store_id}/themes/{theme_code}/backups",
            get(handlers::list_backups).post(handlers::create_backup),
        )
        .route("/backups/{backup_id}", get(handlers::get_backup))
        .route("/backups/{backup_id}/restore", post(handlers::restore_backup))
        .route(
            "/backups/{from_id}/diff/{to_id}",
            get(handlers::diff_backups),
        )
        // Theme files
        .route(
            "/stores/{store_id}/themes/{theme_code}/files",
            get(handlers::read_file).put(handlers::save_file),
        )
        .route(
            "/stores/{store_id}/themes/{theme_code}/files/history",
            get(handlers::list_file_history),
        )
        .route(
            "/stores/{store_id}/themes/{theme_code}/files/restore",
            post(handlers::restore_file),
        )
        .route(
            "/stores/{store_id}/themes/{theme_code}/files/diff",
            get(handlers::diff_file_versions),
        )
        .layer(Extension(service))
}
