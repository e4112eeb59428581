//! Well-known SharePoint identifiers.
//!
//! Catalog template ids, publishing content type ids and feature definition
//! ids are an external contract of the platform; they are collected here
//! rather than reinvented or scattered through the ops modules.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use uuid::Uuid;

/// Batch endpoint relative to the site URL.
pub const PROCESS_QUERY_ENDPOINT: &str = "/_vti_bin/client.svc/ProcessQuery";

pub const SCHEMA_VERSION: &str = "15.0.0.0";
pub const LIBRARY_VERSION: &str = "16.0.0.0";
pub const APPLICATION_NAME: &str = "spo-cli";

/// Catalog list template ids.
pub mod catalogs {
    /// Master page gallery (master pages and page layouts).
    pub const MASTER_PAGE_GALLERY: u32 = 116;
    /// Theme file gallery (`_catalogs/theme`).
    pub const THEME_FILES: u32 = 123;
    /// Composite look gallery (theme options shown in "Change the look").
    pub const COMPOSITE_LOOKS: u32 = 124;
}

/// Publishing content type ids assigned when deploying gallery files.
pub mod content_types {
    pub const PAGE_LAYOUT: &str =
        "0x01010007FF3E057FA8AB4AA42FCB67B453FFC100E214EEE741181F4E9F7ACC43278EE811";
    pub const MASTER_PAGE: &str = "0x01010500B45822D4B60B7B40A2BFCC0995839404";
}

/// Master page applied when a composite look entry names none.
pub const DEFAULT_MASTER_PAGE: &str = "seattle.master";

/// Version folder under the theme files catalog.
pub const THEME_FOLDER_VERSION: &str = "15";

/// Display order given to composite look entries this tool creates.
pub const THEME_DISPLAY_ORDER: i64 = 11;

/// Themed site icon path relative to the web root.
pub const THEMED_SITE_ICON: &str = "siteIcon-2129F729.themedpng";

/// Feature definition id that enables app side-loading (site scope).
pub const APP_SIDELOADING_FEATURE_ID: Uuid = Uuid::from_u128(0xAE3A1339_61F5_4F8F_81A7_ABD2DA956A7D);

/// Display names for feature definition ids worth labelling in output.
pub static KNOWN_FEATURES: Lazy<HashMap<Uuid, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (APP_SIDELOADING_FEATURE_ID, "App side-loading"),
        (
            Uuid::from_u128(0xF6924D36_2FA8_4F0B_B16D_06B7250180FA),
            "SharePoint Server Publishing Infrastructure",
        ),
        (
            Uuid::from_u128(0x94C94CA6_B32F_4DA9_A9E3_1F3D343D7ECB),
            "SharePoint Server Publishing",
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sideloading_feature_id_formatting() {
        assert_eq!(
            APP_SIDELOADING_FEATURE_ID.to_string(),
            "ae3a1339-61f5-4f8f-81a7-abd2da956a7d"
        );
    }

    #[test]
    fn test_known_features_contains_sideloading() {
        assert_eq!(
            KNOWN_FEATURES.get(&APP_SIDELOADING_FEATURE_ID),
            Some(&"App side-loading")
        );
    }
}
