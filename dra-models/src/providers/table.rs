use super::{
    Branch, DefaultTiers, IdFallback, ModelName, ProviderDescriptor, ProxyModel, ProxyPlan,
    PublishedModel, PublishedPlan, Shape, VisionPlan,
};
use crate::ProviderFamily;
use crate::auth::CredentialVars;

const LOCAL_DEV_KEY: &str = "local-dev-key";

const OPENAI_LOCAL: CredentialVars = CredentialVars {
    local_key: "LOCAL_OPENAI_API_KEY",
    remote_key: "OPENAI_API_KEY",
    default_key: Some(LOCAL_DEV_KEY),
    local_base: "LOCAL_OPENAI_API_BASE",
    remote_base: "OPENAI_API_BASE",
    default_base: Some("http://ripper.lan:8000/v1"),
};

const OPENAI_REMOTE: CredentialVars = CredentialVars {
    local_key: "OPENAI_API_KEY",
    remote_key: "OPENAI_API_KEY",
    default_key: None,
    local_base: "OPENAI_API_BASE",
    remote_base: "OPENAI_API_BASE",
    default_base: Some("https://api.openai.com/v1"),
};

const OPENAI_TIERS: DefaultTiers = DefaultTiers {
    chat_var: "LOCAL_OPENAI_CHAT_MODEL_ID",
    chat_default: "local-openai",
    reasoner_var: Some("LOCAL_OPENAI_REASONER_MODEL_ID"),
    responses_var: Some("LOCAL_OPENAI_DEEP_RESEARCH_MODEL_ID"),
};

const fn proxied(name: &'static str, shape: Shape, id_var: &'static str, fallback: IdFallback) -> ProxyModel {
    ProxyModel {
        name: ModelName::Fixed(name),
        shape,
        id_var,
        fallback,
    }
}

const fn published(name: &'static str, id: &'static str, shape: Shape) -> PublishedModel {
    PublishedModel { name, id, shape }
}

const OPENAI: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::OpenAi,
    local_proxy: Branch::Proxy(ProxyPlan {
        credentials: OPENAI_LOCAL,
        tiers: Some(OPENAI_TIERS),
        models: &[
            proxied("gpt-4o", Shape::Chat, "LOCAL_GPT_4O_MODEL_ID", IdFallback::Chat),
            proxied("gpt-4.1", Shape::Chat, "LOCAL_GPT_4_1_MODEL_ID", IdFallback::Chat),
            proxied("o1", Shape::Chat, "LOCAL_O1_MODEL_ID", IdFallback::Chat),
            proxied(
                "gpt-4o-search-preview",
                Shape::Chat,
                "LOCAL_GPT_4O_SEARCH_MODEL_ID",
                IdFallback::Chat,
            ),
            proxied("gpt-5", Shape::Chat, "LOCAL_GPT_5_MODEL_ID", IdFallback::Chat),
            proxied("o3", Shape::Reasoner, "LOCAL_O3_MODEL_ID", IdFallback::Reasoner),
            proxied(
                "whisper",
                Shape::Transcription,
                "LOCAL_WHISPER_MODEL_ID",
                IdFallback::Literal("whisper-1"),
            ),
            proxied(
                "o3-deep-research",
                Shape::Response,
                "LOCAL_O3_DEEP_RESEARCH_MODEL_ID",
                IdFallback::Responses,
            ),
        ],
        vision: None,
    }),
    remote: Branch::Published(PublishedPlan {
        credentials: OPENAI_REMOTE,
        models: &[
            published("gpt-4o", "gpt-4o", Shape::Chat),
            published("gpt-4.1", "gpt-4.1", Shape::Chat),
            published("o1", "o1", Shape::Chat),
            published("o3", "o3", Shape::Chat),
            published("gpt-4o-search-preview", "gpt-4o-search-preview", Shape::Chat),
        ],
    }),
};

const ANTHROPIC: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::Anthropic,
    local_proxy: Branch::Skip("skipping Anthropic models in local proxy mode"),
    remote: Branch::Published(PublishedPlan {
        credentials: CredentialVars {
            local_key: "ANTHROPIC_API_KEY",
            remote_key: "ANTHROPIC_API_KEY",
            default_key: None,
            local_base: "ANTHROPIC_API_BASE",
            remote_base: "ANTHROPIC_API_BASE",
            default_base: Some("https://api.anthropic.com/v1"),
        },
        models: &[
            published("claude37-sonnet", "claude-3-7-sonnet-20250219", Shape::Chat),
            published(
                "claude37-sonnet-thinking",
                "claude-3-7-sonnet-20250219",
                Shape::Chat,
            ),
        ],
    }),
};

const VEO_ID: &str = "veo-3.0-generate-preview";

const GOOGLE: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::Google,
    local_proxy: Branch::Skip("skipping Google models in local proxy mode"),
    remote: Branch::Published(PublishedPlan {
        credentials: CredentialVars {
            local_key: "GOOGLE_API_KEY",
            remote_key: "GOOGLE_API_KEY",
            default_key: None,
            local_base: "GOOGLE_API_BASE",
            remote_base: "GOOGLE_API_BASE",
            default_base: Some("https://generativelanguage.googleapis.com/v1beta/openai"),
        },
        models: &[
            published("gemini-2.5-pro", "gemini-2.5-pro-preview-06-05", Shape::Chat),
            published(
                "veo3",
                VEO_ID,
                Shape::GenerateThenFetch { fetch_id: VEO_ID },
            ),
        ],
    }),
};

const QWEN_PLAN: PublishedPlan = PublishedPlan {
    credentials: CredentialVars {
        local_key: "LOCAL_HF_API_KEY",
        remote_key: "HF_TOKEN",
        default_key: None,
        local_base: "LOCAL_HF_API_BASE",
        remote_base: "HF_API_BASE",
        default_base: Some("https://router.huggingface.co/v1"),
    },
    models: &[
        published("qwen2.5-7b-instruct", "Qwen/Qwen2.5-7B-Instruct", Shape::Chat),
        published("qwen2.5-14b-instruct", "Qwen/Qwen2.5-14B-Instruct", Shape::Chat),
        published("qwen2.5-32b-instruct", "Qwen/Qwen2.5-32B-Instruct", Shape::Chat),
    ],
};

const QWEN: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::Qwen,
    local_proxy: Branch::Published(QWEN_PLAN),
    remote: Branch::Published(QWEN_PLAN),
};

const LANGCHAIN: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::LangChain,
    local_proxy: Branch::Proxy(ProxyPlan {
        credentials: CredentialVars {
            default_key: None,
            ..OPENAI_LOCAL
        },
        tiers: Some(DefaultTiers {
            reasoner_var: None,
            responses_var: None,
            ..OPENAI_TIERS
        }),
        models: &[
            proxied("langchain-gpt-4o", Shape::Chat, "LOCAL_GPT_4O_MODEL_ID", IdFallback::Chat),
            proxied(
                "langchain-gpt-4.1",
                Shape::Chat,
                "LOCAL_GPT_4_1_MODEL_ID",
                IdFallback::Chat,
            ),
            proxied("langchain-o3", Shape::Chat, "LOCAL_O3_MODEL_ID", IdFallback::Chat),
        ],
        vision: None,
    }),
    remote: Branch::Published(PublishedPlan {
        credentials: OPENAI_REMOTE,
        models: &[
            published("langchain-gpt-4o", "gpt-4o", Shape::Chat),
            published("langchain-gpt-4.1", "gpt-4.1", Shape::Chat),
            published("langchain-o3", "o3", Shape::Chat),
        ],
    }),
};

const VLLM_PLAN: ProxyPlan = ProxyPlan {
    credentials: CredentialVars {
        local_key: "LOCAL_VLLM_API_KEY",
        remote_key: "QWEN_API_KEY",
        default_key: Some(LOCAL_DEV_KEY),
        local_base: "LOCAL_VLLM_API_BASE",
        remote_base: "QWEN_API_BASE",
        default_base: Some("http://ripper2.lan:8000/v1"),
    },
    tiers: None,
    models: &[ProxyModel {
        name: ModelName::Env {
            var: "LOCAL_VLLM_MODEL_NAME",
            default: "local-vllm",
        },
        shape: Shape::Chat,
        id_var: "LOCAL_VLLM_MODEL_ID",
        fallback: IdFallback::Literal("Qwen"),
    }],
    vision: Some(VisionPlan {
        name_var: "LOCAL_VLLM_VISION_MODEL_NAME",
        id_var: "LOCAL_VLLM_VISION_MODEL_ID",
        credentials: CredentialVars {
            local_key: "LOCAL_VLLM_VISION_API_KEY",
            remote_key: "QWEN_VL_API_KEY",
            default_key: None,
            local_base: "LOCAL_VLLM_VISION_API_BASE",
            remote_base: "QWEN_VL_API_BASE",
            default_base: None,
        },
    }),
};

const VLLM: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::Vllm,
    local_proxy: Branch::Proxy(VLLM_PLAN),
    remote: Branch::Proxy(VLLM_PLAN),
};

const DEEPSEEK: ProviderDescriptor = ProviderDescriptor {
    family: ProviderFamily::DeepSeek,
    local_proxy: Branch::Skip("skipping DeepSeek models in local proxy mode"),
    remote: Branch::Unsupported("remote DeepSeek models are not supported"),
};

/// Every provider, in registration order.
pub static PROVIDERS: &[ProviderDescriptor] =
    &[OPENAI, ANTHROPIC, GOOGLE, QWEN, LANGCHAIN, VLLM, DEEPSEEK];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order_is_fixed() {
        let order: Vec<_> = PROVIDERS.iter().map(|d| d.family).collect();
        assert_eq!(
            order,
            vec![
                ProviderFamily::OpenAi,
                ProviderFamily::Anthropic,
                ProviderFamily::Google,
                ProviderFamily::Qwen,
                ProviderFamily::LangChain,
                ProviderFamily::Vllm,
                ProviderFamily::DeepSeek,
            ]
        );
    }

    #[test]
    fn langchain_shares_openai_local_variables() {
        let Branch::Proxy(plan) = LANGCHAIN.local_proxy else {
            panic!("langchain local branch should be a proxy plan");
        };
        assert_eq!(plan.credentials.local_key, OPENAI_LOCAL.local_key);
        assert_eq!(plan.credentials.default_key, None);
        assert_eq!(plan.credentials.default_base, OPENAI_LOCAL.default_base);
    }
}
