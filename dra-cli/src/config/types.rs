use dra_models::{DeploymentMode, ModelSelection};
use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDraConfig {
    /// Route models through the locally hosted OpenAI-compatible proxies
    pub use_local_proxy: Option<bool>,

    #[serde(default)]
    pub models: ModelsConfigSection,
}

/// Per-tool model name overrides; unset tools keep their environment value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfigSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_research: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_generator: Option<String>,
}

impl ModelsConfigSection {
    /// Overlay values take precedence; `None` keeps the base value.
    pub fn merge(base: Self, overlay: Self) -> Self {
        Self {
            primary: overlay.primary.or(base.primary),
            research: overlay.research.or(base.research),
            browser: overlay.browser.or(base.browser),
            analyzer: overlay.analyzer.or(base.analyzer),
            summarizer: overlay.summarizer.or(base.summarizer),
            deep_research: overlay.deep_research.or(base.deep_research),
            image_analyzer: overlay.image_analyzer.or(base.image_analyzer),
            video_generator: overlay.video_generator.or(base.video_generator),
        }
    }

    /// Apply the configured names on top of `selection`.
    pub fn apply(&self, mut selection: ModelSelection) -> ModelSelection {
        let fields = [
            (&self.primary, &mut selection.primary),
            (&self.research, &mut selection.research),
            (&self.browser, &mut selection.browser),
            (&self.analyzer, &mut selection.analyzer),
            (&self.summarizer, &mut selection.summarizer),
            (&self.deep_research, &mut selection.deep_research),
            (&self.image_analyzer, &mut selection.image_analyzer),
            (&self.video_generator, &mut selection.video_generator),
        ];
        for (configured, target) in fields {
            if let Some(name) = configured {
                *target = name.clone();
            }
        }
        selection
    }
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DraConfig {
    /// Route models through the locally hosted OpenAI-compatible proxies
    #[serde(default)]
    pub use_local_proxy: bool,

    #[serde(default)]
    pub models: ModelsConfigSection,
}

impl DraConfig {
    pub fn mode(&self) -> DeploymentMode {
        DeploymentMode::from_flag(self.use_local_proxy)
    }
}
