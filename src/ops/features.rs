//! Feature activation and inspection.

use anyhow::Result;
use log::info;
use uuid::Uuid;

use crate::api::constants::{APP_SIDELOADING_FEATURE_ID, KNOWN_FEATURES};
use crate::api::{ClientContext, FeatureScope};

/// An activated feature at some scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInfo {
    pub definition_id: Uuid,
    pub display_name: String,
}

/// List the features activated at the given scope.
pub async fn get_features(
    ctx: &mut ClientContext,
    scope: FeatureScope,
) -> Result<Vec<FeatureInfo>> {
    let features = ctx.features(scope);
    ctx.load_collection(features);
    ctx.execute_query().await?;

    let mut infos = Vec::new();
    for feature in ctx.items(features)? {
        let definition_id = ctx
            .opt_string_prop(feature, "DefinitionId")?
            .and_then(|s| Uuid::parse_str(&s).ok())
            .unwrap_or_else(Uuid::nil);
        let display_name = ctx
            .opt_string_prop(feature, "DisplayName")?
            .or_else(|| KNOWN_FEATURES.get(&definition_id).map(|s| s.to_string()))
            .unwrap_or_default();
        infos.push(FeatureInfo {
            definition_id,
            display_name,
        });
    }
    Ok(infos)
}

pub async fn activate_feature(
    ctx: &mut ClientContext,
    scope: FeatureScope,
    definition_id: Uuid,
    force: bool,
) -> Result<()> {
    info!("Activating feature {} at {} scope", definition_id, scope);
    let features = ctx.features(scope);
    ctx.activate_feature(features, definition_id, force);
    ctx.execute_query().await?;
    Ok(())
}

pub async fn deactivate_feature(
    ctx: &mut ClientContext,
    scope: FeatureScope,
    definition_id: Uuid,
    force: bool,
) -> Result<()> {
    info!("Deactivating feature {} at {} scope", definition_id, scope);
    let features = ctx.features(scope);
    ctx.deactivate_feature(features, definition_id, force);
    ctx.execute_query().await?;
    Ok(())
}

/// Toggle app side-loading on the site collection.
pub async fn set_app_sideloading(ctx: &mut ClientContext, on: bool) -> Result<()> {
    if on {
        activate_feature(ctx, FeatureScope::Site, APP_SIDELOADING_FEATURE_ID, false).await
    } else {
        deactivate_feature(ctx, FeatureScope::Site, APP_SIDELOADING_FEATURE_ID, false).await
    }
}
