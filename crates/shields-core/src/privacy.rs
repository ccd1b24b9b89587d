use std::path::{Path, PathBuf};

/// Privacy features whose availability depends on local resources
pub struct PrivacyManager {
    regional_list: Option<PathBuf>,
}

impl PrivacyManager {
    #[must_use]
    pub fn new(regional_list: Option<PathBuf>) -> Self {
        Self { regional_list }
    }

    /// Check if a regional ad block list is present for this install
    #[must_use]
    pub fn is_regional_ad_block_available(&self) -> bool {
        self.regional_list.as_deref().is_some_and(Path::is_file)
    }
}
