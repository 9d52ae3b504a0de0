//! Texture formats a Spout sender can advertise.

/// The `DXGI_FORMAT` values the binding understands.
///
/// Senders may advertise anything; formats outside this list are reported as
/// `None` by [`TextureFormat::from_dxgi`] and the receiver logs a warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba32Float,
    Rgba16Float,
    Rgba16Unorm,
    Rgb10A2Unorm,
    Rgba8Typeless,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba8Uint,
    Rgba8Snorm,
    Rgba8Sint,
    Bgra8Unorm,
    Bgra8UnormSrgb,
}

impl TextureFormat {
    pub fn from_dxgi(value: u32) -> Option<Self> {
        Some(match value {
            0x02 => Self::Rgba32Float,
            0x0a => Self::Rgba16Float,
            0x0b => Self::Rgba16Unorm,
            0x18 => Self::Rgb10A2Unorm,
            0x1b => Self::Rgba8Typeless,
            0x1c => Self::Rgba8Unorm,
            0x1d => Self::Rgba8UnormSrgb,
            0x1e => Self::Rgba8Uint,
            0x1f => Self::Rgba8Snorm,
            0x20 => Self::Rgba8Sint,
            0x57 => Self::Bgra8Unorm,
            0x5b => Self::Bgra8UnormSrgb,
            _ => return None,
        })
    }

    /// Typeless formats can't be sampled directly; hosts view them as UNORM.
    pub fn resolve_typeless(self) -> Self {
        match self {
            Self::Rgba8Typeless => Self::Rgba8Unorm,
            other => other,
        }
    }
}
