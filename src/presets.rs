//! Named sizes and color schemes, fixed at compile time.
use crate::error::ConfigError;
use crate::painter::{Color, Gradient};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
}

const fn res(name: &'static str, width: usize, height: usize) -> Resolution {
    Resolution {
        name,
        width,
        height,
    }
}

/// Landscape only: width is never smaller than height.
pub const RESOLUTIONS: &[Resolution] = &[
    res("480p", 640, 480),
    res("720p", 1280, 720),
    res("768p", 1024, 768),
    res("900p", 1600, 900),
    res("1080p", 1920, 1080),
    res("1440p", 2560, 1440),
    res("4k", 3840, 2160),
    res("8k", 7680, 4320),
    res("16k", 15360, 8640),
    res("32k", 30720, 17280),
    res("64k", 61440, 34560),
    res("iphoneSE", 1136, 640),
    res("iphone5", 1136, 640),
    res("iphone7", 1134, 750),
    res("iphone7+", 2208, 1242),
    res("ipadMini", 2048, 1536),
    res("ipadAir", 2048, 1536),
    res("ipadPro10", 2224, 1668),
    res("ipadPro12", 2732, 2048),
    res("iwatch1", 340, 272),
    res("iwatch2", 390, 312),
    res("twitter", 1024, 576),
    res("instagram", 1024, 768),
];

impl Resolution {
    pub fn find(name: &str) -> Result<Resolution, ConfigError> {
        RESOLUTIONS
            .iter()
            .find(|r| r.name == name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownResolution(name.to_string()))
    }
}

impl Default for Resolution {
    fn default() -> Self {
        RESOLUTIONS[0]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Colormap {
    pub name: &'static str,
    pub left: Color,
    pub right: Color,
}

pub const COLORMAPS: &[Colormap] = &[
    Colormap {
        name: "b&w",
        left: [0.0, 0.0, 0.0],
        right: [190.0, 190.0, 190.0],
    },
    Colormap {
        name: "red",
        left: [0.0, 20.0, 30.0],
        right: [210.0, 0.0, 10.0],
    },
    Colormap {
        name: "blue",
        left: [0.0, 24.0, 104.0],
        right: [163.0, 255.0, 252.0],
    },
];

impl Colormap {
    pub fn find(name: &str) -> Result<Colormap, ConfigError> {
        COLORMAPS
            .iter()
            .find(|c| c.name == name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownColormap(name.to_string()))
    }

    pub fn gradient(&self) -> Gradient {
        Gradient::new(self.left, self.right)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        COLORMAPS[0]
    }
}
