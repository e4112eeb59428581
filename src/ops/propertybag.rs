//! Web property bag access.

use anyhow::Result;

use crate::api::{ClientContext, ObjectId};

/// Read one key from the web's property bag; `None` when the key is unset.
pub async fn get_property_bag_value(
    ctx: &mut ClientContext,
    web: ObjectId,
    key: &str,
) -> Result<Option<String>> {
    ctx.ensure_loaded(web, "AllProperties").await?;
    ctx.map_prop_entry(web, "AllProperties", key)
}

/// Write one key to the web's property bag in a single round trip.
pub async fn set_property_bag_value(
    ctx: &mut ClientContext,
    web: ObjectId,
    key: &str,
    value: &str,
) -> Result<()> {
    ctx.set_property_bag(web, key, value);
    ctx.update(web);
    ctx.execute_query().await?;
    Ok(())
}
