//! Model catalog
//!
//! The models the upstream providers offer for comparison. The catalog is
//! informational: it is listed by the API and the CLI, while the adapters
//! read their concrete model ids from configuration.

use serde::Serialize;

/// A model offered for comparison (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDef {
    /// Short stable identifier
    pub id: &'static str,
    /// Label shown to users
    pub label: &'static str,
    /// Upstream model id
    pub model: &'static str,
}

const MODELS: &[ModelDef] = &[
    ModelDef {
        id: "deepseek-r1",
        label: "DeepSeek R1 (free)",
        model: "deepseek/deepseek-r1:free",
    },
    ModelDef {
        id: "llama-33-70b",
        label: "Llama 3.3 70B Instruct (free)",
        model: "meta-llama/llama-3.3-70b-instruct:free",
    },
    ModelDef {
        id: "qwen3-coder",
        label: "Qwen3 Coder (free)",
        model: "qwen/qwen3-coder:free",
    },
    ModelDef {
        id: "deepseek-chat",
        label: "DeepSeek Chat v3 (free)",
        model: "deepseek/deepseek-chat-v3-0324:free",
    },
    ModelDef {
        id: "gemini-flash",
        label: "Gemini 1.5 Flash",
        model: "gemini-1.5-flash",
    },
];

/// All catalog entries
pub fn model_catalog() -> &'static [ModelDef] {
    MODELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = model_catalog().iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), model_catalog().len());
    }
}
