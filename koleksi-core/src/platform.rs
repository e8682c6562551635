/// Image-generation services a catalog entry can come from.
///
/// This enum centralizes platform identity: the stored key, the display
/// name, and the list of models each service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Tensor,
    Midjourney,
    Gemini,
    Piclumen,
    Leonardo,
}

/// All platform variants in display order.
const ALL_PLATFORMS: &[Platform] = &[
    Platform::Tensor,
    Platform::Midjourney,
    Platform::Gemini,
    Platform::Piclumen,
    Platform::Leonardo,
];

/// A named group of models, as shown in a grouped model picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelGroup {
    pub label: &'static str,
    pub models: &'static [&'static str],
}

const TENSOR_MODELS: &[ModelGroup] = &[
    ModelGroup {
        label: "Popular models",
        models: &["Flux.1-Dev-FP8", "HUBG_Realistic", "SD_2.1", "SDXL", "PONY"],
    },
    ModelGroup {
        label: "Other models",
        models: &["Illustrious", "DreamShaper", "RevAnimated", "RealisticVision"],
    },
];

const MIDJOURNEY_MODELS: &[ModelGroup] = &[ModelGroup {
    label: "Versions",
    models: &[
        "V7", "V6", "V5.2", "V5.1", "V5", "V4", "V3", "V2", "V1", "Niji V5", "Niji V4",
    ],
}];

const GEMINI_MODELS: &[ModelGroup] = &[ModelGroup {
    label: "Models",
    models: &["Gemini 2.5 Flash", "Gemini 2.5 Pro", "Custom Gem"],
}];

const PICLUMEN_MODELS: &[ModelGroup] = &[ModelGroup {
    label: "Models",
    models: &[
        "PicLumen Art V1",
        "PicLumen Realistic V2",
        "PicLumen Anime V2",
        "PicLumen Lineart V1",
        "Namiya",
        "FLUX.1 Kontext",
        "Primo",
        "Pony Diffusion V6",
        "FLUX.1-schnell",
        "FLUX.1-dev",
    ],
}];

const LEONARDO_MODELS: &[ModelGroup] = &[
    ModelGroup {
        label: "Preset Model Styles",
        models: &[
            "Cinematic Kino",
            "Concept Art",
            "Graphic Design",
            "Illustrative Albedo",
            "Leonardo Lightning",
            "Lifelike Vision",
            "Portrait Perfect",
            "Stock Photography",
        ],
    },
    ModelGroup {
        label: "Featured Models",
        models: &[
            "Lucid Realism",
            "GPT-Image-1",
            "FLUX.1 Kontext",
            "Phoenix 1.0",
            "Flux Dev",
            "Flux Schnell",
            "Phoenix 0.9",
            "Anime",
        ],
    },
];

/// VAEs offered for Tensor generations.
pub const TENSOR_VAES: &[ModelGroup] = &[
    ModelGroup {
        label: "Popular VAEs",
        models: &[
            "vae-ft-mse-840000-ema-pruned",
            "orangemix.vae",
            "kl-f8-anime2.vae",
        ],
    },
    ModelGroup {
        label: "Other VAEs",
        models: &["anything-v4.0.vae", "wd-1-5-vae"],
    },
];

/// Samplers accepted for Tensor generations.
pub const TENSOR_SAMPLERS: &[&str] = &[
    "euler",
    "euler_ancestral",
    "heun",
    "heunpp2",
    "dpm_2",
    "dpm_2_ancestral",
    "lms",
    "dpm_fast",
    "dpm_adaptive",
    "dpmpp_2s_ancestral",
    "dpmpp_sde_gpu",
    "dpmpp_2m",
    "dpmpp_2m_sde_gpu",
    "dpmpp_3m_sde_gpu",
    "ddpm",
    "lcm",
    "restart",
    "euler_dy",
    "euler_smea_dy",
    "ddim",
    "uni_pc",
    "uni_pc_bh2",
    "sde_multistep",
];

/// Schedulers accepted for Tensor generations.
pub const TENSOR_SCHEDULERS: &[&str] = &[
    "normal",
    "karras",
    "sgm_uniform",
    "exponential",
    "simple",
    "ddim_uniform",
    "beta",
    "linear quadratic",
];

impl Platform {
    /// Stored key, used in the database and in export files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Tensor => "tensor",
            Self::Midjourney => "midjourney",
            Self::Gemini => "gemini",
            Self::Piclumen => "piclumen",
            Self::Leonardo => "leonardo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tensor => "Tensor",
            Self::Midjourney => "Midjourney",
            Self::Gemini => "Gemini",
            Self::Piclumen => "Piclumen",
            Self::Leonardo => "Leonardo",
        }
    }

    /// Known models for this platform, grouped for display.
    pub fn model_groups(&self) -> &'static [ModelGroup] {
        match self {
            Self::Tensor => TENSOR_MODELS,
            Self::Midjourney => MIDJOURNEY_MODELS,
            Self::Gemini => GEMINI_MODELS,
            Self::Piclumen => PICLUMEN_MODELS,
            Self::Leonardo => LEONARDO_MODELS,
        }
    }

    /// All known models for this platform, flattened in display order.
    pub fn models(&self) -> impl Iterator<Item = &'static str> {
        self.model_groups()
            .iter()
            .flat_map(|group| group.models.iter().copied())
    }

    /// Whether `model` is one of this platform's listed models (exact match).
    pub fn is_known_model(&self, model: &str) -> bool {
        self.models().any(|known| known == model)
    }

    /// Model preselected when the user switches to this platform.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Tensor => "Flux.1-Dev-FP8",
            Self::Midjourney => "V7",
            Self::Gemini => "Gemini 2.5 Flash",
            Self::Piclumen => "PicLumen Realistic V2",
            Self::Leonardo => "Cinematic Kino",
        }
    }

    /// Only Tensor entries carry sampler settings and LoRA adapters.
    pub fn has_generation_settings(&self) -> bool {
        matches!(self, Self::Tensor)
    }

    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform: '{}'", self.0)
    }
}

impl std::error::Error for PlatformParseError {}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform from its stored key (case-insensitive, surrounding
    /// whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|platform| platform.key() == lower)
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

impl serde::Serialize for Platform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> serde::Deserialize<'de> for Platform {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
