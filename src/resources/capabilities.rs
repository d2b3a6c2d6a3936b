use std::collections::BTreeSet;

/// What the target renderer can run. Programs in other syntaxes or
/// languages compile but are flagged unsupported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderCapabilities {
    pub syntaxes: BTreeSet<String>,
    pub languages: BTreeSet<String>,
}

impl RenderCapabilities {
    pub fn new<S, L>(syntaxes: S, languages: L) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            syntaxes: syntaxes.into_iter().map(Into::into).collect(),
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_syntax_supported(&self, syntax: &str) -> bool {
        self.syntaxes.contains(syntax)
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        language == "unified" || self.languages.contains(language)
    }
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        Self::new(
            [
                "vs_1_1", "vs_2_0", "vs_2_x", "vs_3_0", "ps_2_0", "ps_2_x", "ps_3_0", "arbvp1",
                "arbfp1", "vp40", "fp40", "glsl", "glsles", "hlsl", "wgsl",
            ],
            ["glsl", "hlsl", "cg", "wgsl"],
        )
    }
}
