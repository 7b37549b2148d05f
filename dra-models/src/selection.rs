//! Which registered model each agent tool runs on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::env::EnvSource;
use crate::registry::ModelRegistry;

const DEFAULT_PRIMARY: &str = "gpt-4.1";
const DEFAULT_ANALYZER: &str = "local-vllm";
const DEFAULT_DEEP_RESEARCH: &str = "o3-deep-research";
const IMAGE_ANALYZER: &str = "o3";
const VIDEO_GENERATOR: &str = "veo3";

/// Logical model names chosen for each tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub primary: String,
    pub research: String,
    pub browser: String,
    pub analyzer: String,
    pub summarizer: String,
    pub deep_research: String,
    pub image_analyzer: String,
    pub video_generator: String,
}

/// A tool whose model name is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedModel {
    pub tool: &'static str,
    pub name: String,
}

impl fmt::Display for UnresolvedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} model '{}' is not registered", self.tool, self.name)
    }
}

impl ModelSelection {
    /// Read the selection from `LOCAL_*_MODEL_NAME` variables.
    ///
    /// Secondary tools fall back to the primary model; the analyzer falls
    /// back to the vLLM model name.
    pub fn from_env(env: &impl EnvSource) -> Self {
        let primary = env.var_or("LOCAL_PRIMARY_MODEL_NAME", DEFAULT_PRIMARY);
        let vllm = env.var_or("LOCAL_VLLM_MODEL_NAME", DEFAULT_ANALYZER);
        Self {
            research: env.var_or("LOCAL_RESEARCH_MODEL_NAME", &primary),
            browser: env.var_or("LOCAL_BROWSER_MODEL_NAME", &primary),
            analyzer: env.var_or("LOCAL_ANALYZER_MODEL_NAME", &vllm),
            summarizer: env.var_or("LOCAL_SUMMARIZER_MODEL_NAME", &primary),
            deep_research: env.var_or("LOCAL_DEEP_RESEARCH_MODEL_NAME", DEFAULT_DEEP_RESEARCH),
            image_analyzer: IMAGE_ANALYZER.to_string(),
            video_generator: VIDEO_GENERATOR.to_string(),
            primary,
        }
    }

    /// `(tool, model name)` pairs in a stable order.
    pub fn tools(&self) -> [(&'static str, &str); 8] {
        [
            ("primary", self.primary.as_str()),
            ("research", self.research.as_str()),
            ("browser", self.browser.as_str()),
            ("analyzer", self.analyzer.as_str()),
            ("summarizer", self.summarizer.as_str()),
            ("deep_research", self.deep_research.as_str()),
            ("image_analyzer", self.image_analyzer.as_str()),
            ("video_generator", self.video_generator.as_str()),
        ]
    }

    /// Every tool whose model is missing from `registry`.
    pub fn validate(&self, registry: &ModelRegistry) -> Vec<UnresolvedModel> {
        self.tools()
            .into_iter()
            .filter(|(_, name)| !registry.contains(name))
            .map(|(tool, name)| UnresolvedModel {
                tool,
                name: name.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeploymentMode;
    use crate::env::EnvSnapshot;
    use crate::registry::init_models;

    #[test]
    fn defaults_follow_primary() {
        let selection = ModelSelection::from_env(&EnvSnapshot::new());
        assert_eq!(selection.primary, "gpt-4.1");
        assert_eq!(selection.research, "gpt-4.1");
        assert_eq!(selection.summarizer, "gpt-4.1");
        assert_eq!(selection.analyzer, "local-vllm");
        assert_eq!(selection.deep_research, "o3-deep-research");
    }

    #[test]
    fn overrides_are_read() {
        let env = EnvSnapshot::new()
            .with("LOCAL_PRIMARY_MODEL_NAME", "gpt-4o")
            .with("LOCAL_BROWSER_MODEL_NAME", "gpt-5")
            .with("LOCAL_VLLM_MODEL_NAME", "qwen-local");
        let selection = ModelSelection::from_env(&env);
        assert_eq!(selection.research, "gpt-4o");
        assert_eq!(selection.browser, "gpt-5");
        assert_eq!(selection.analyzer, "qwen-local");
    }

    #[test]
    fn local_proxy_lacks_video_generator() {
        let env = EnvSnapshot::new();
        let registry = init_models(DeploymentMode::LocalProxy, &env);
        let missing = ModelSelection::from_env(&env).validate(&registry);

        assert_eq!(
            missing,
            vec![UnresolvedModel {
                tool: "video_generator",
                name: "veo3".to_string(),
            }]
        );
    }

    #[test]
    fn remote_resolves_everything_but_deep_research() {
        let env = EnvSnapshot::new();
        let registry = init_models(DeploymentMode::Remote, &env);
        let missing: Vec<_> = ModelSelection::from_env(&env)
            .validate(&registry)
            .into_iter()
            .map(|m| m.tool)
            .collect();
        assert_eq!(missing, vec!["deep_research"]);
    }
}
