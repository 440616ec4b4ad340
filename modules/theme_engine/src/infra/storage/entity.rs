//! SeaORM entities for database tables

/// Installed themes
pub mod theme {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "themes")]
    pub struct Model {
        /// Theme code (primary key)
        #[sea_orm(primary_key, auto_increment = false)]
        pub code: String,

        pub name: String,

        pub version: String,

        /// Package directory the theme reads its defaults from
        pub package_code: String,

        /// Settings schema snapshot as JSON
        pub settings_schema: Json,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Store templates (one default per store and template type)
pub mod store_template {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "store_templates")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub store_id: Uuid,

        pub theme_code: String,

        pub template_type: String,

        pub name: String,

        pub is_default: bool,

        pub enabled: bool,

        pub settings: Json,

        pub seo_settings: Json,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// One-to-many relationship with sections
        #[sea_orm(has_many = "super::section_instance::Entity")]
        Sections,
    }

    impl Related<super::section_instance::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Sections.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Sections placed in a template
pub mod section_instance {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "section_instances")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub template_id: Uuid,

        pub section_type: String,

        /// 0-based, contiguous within the template
        pub position: i32,

        pub enabled: bool,

        pub settings: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::store_template::Entity",
            from = "Column::TemplateId",
            to = "super::store_template::Column::Id",
            on_delete = "Cascade"
        )]
        Template,
        #[sea_orm(has_many = "super::section_block::Entity")]
        Blocks,
    }

    impl Related<super::store_template::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Template.def()
        }
    }

    impl Related<super::section_block::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Blocks.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Flat block rows; nesting is carried by `parent_id`
pub mod section_block {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "section_blocks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub section_id: Uuid,

        /// Parent block; not a foreign key so damaged trees can still be read
        pub parent_id: Option<Uuid>,

        pub block_type: String,

        /// Position within the sibling group
        pub position: i32,

        pub enabled: bool,

        pub settings: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::section_instance::Entity",
            from = "Column::SectionId",
            to = "super::section_instance::Column::Id",
            on_delete = "Cascade"
        )]
        Section,
    }

    impl Related<super::section_instance::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Section.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Header, footer and announcement bar per store and theme
pub mod global_section {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "global_sections")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub store_id: Uuid,

        pub theme_code: String,

        pub section_type: String,

        pub enabled: bool,

        /// Settings with blocks under `blocks`
        pub settings: Json,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Per-store theme settings; at most one active row per store
pub mod theme_customization {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "theme_customizations")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub store_id: Uuid,

        pub theme_code: String,

        pub settings: Json,

        pub is_active: bool,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Immutable theme backups
pub mod theme_backup {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "theme_backups")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub store_id: Uuid,

        pub theme_code: String,

        pub name: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,

        pub settings: Json,

        /// Layout snapshot (templates, sections, blocks)
        pub customizations: Json,

        /// SHA-256 hex of settings and customizations
        pub checksum: String,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Append-only theme file history
pub mod file_history {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "theme_file_history")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub store_id: Uuid,

        pub theme_code: String,

        pub file_path: String,

        /// Per-file counter starting at 1
        pub version: i32,

        #[sea_orm(column_type = "Text")]
        pub content: String,

        /// create | update | pre_restore | restore
        pub change_type: String,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
