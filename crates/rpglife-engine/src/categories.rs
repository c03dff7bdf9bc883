//! Custom categories, available once the user reaches the unlock level.

use tracing::debug;

use rpglife_core::enums::Feature;
use rpglife_core::gating::require_feature;
use rpglife_core::model::Category;
use rpglife_storage::NewCategory;

use crate::Engine;
use crate::context::ActionContext;
use crate::error::Result;

/// A category the acting user wants to create. Empty icon or color fall
/// back to the storage defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl Engine<'_> {
    pub fn create_category(&self, ctx: &ActionContext, draft: &CategoryDraft) -> Result<Category> {
        self.in_transaction(|tx| {
            let stats = tx.get_user_stats(ctx.user_id)?;
            require_feature(stats.level, Feature::CustomCategories)?;

            let category = tx.create_category(&NewCategory {
                user_id: ctx.user_id,
                name: draft.name.clone(),
                icon: draft.icon.clone(),
                color: draft.color.clone(),
            })?;
            debug!(category_id = category.id, "category created");
            Ok(category)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;
    use crate::testutil::*;
    use rpglife_core::gating::GateError;
    use rpglife_core::model::UserStats;
    use rpglife_storage::Storage;

    fn garden() -> CategoryDraft {
        CategoryDraft {
            name: "Garden".into(),
            icon: "🌱".into(),
            ..Default::default()
        }
    }

    #[test]
    fn locked_below_level_three() {
        let store = store();
        let ctx = user(&store, "ada");

        let err = engine(&store).create_category(&ctx, &garden()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Gate(GateError::FeatureLocked { required: 3, .. })
        ));
        assert_eq!(store.list_categories(ctx.user_id).unwrap().len(), 6);
    }

    #[test]
    fn created_at_level_three() {
        let store = store();
        let ctx = user(&store, "ada");
        set_stats(
            &store,
            &UserStats {
                total_xp: 900,
                level: 3,
                ..UserStats::new(ctx.user_id)
            },
        );

        let category = engine(&store).create_category(&ctx, &garden()).unwrap();
        assert_eq!(category.icon, "🌱");
        assert_eq!(category.color, rpglife_storage::sqlite::DEFAULT_CATEGORY_COLOR);
        assert_eq!(category.user_id, Some(ctx.user_id));
    }
}
