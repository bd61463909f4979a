/// Application-wide constants for rendering, favicon assembly, and output layout

pub mod render {
    /// Base render density used when none is given on the command line
    pub const DEFAULT_DENSITY: u32 = 300;

    /// Density at which one SVG user unit maps to one pixel
    pub const NATURAL_DPI: f32 = 72.0;

    /// Longest side of the intermediate raster, in pixels
    /// A 512px source at 2400 DPI would otherwise need a ~17000px pixmap
    pub const MAX_INTERMEDIATE_SIDE: u32 = 4096;

    /// Largest target size accepted from a target manifest
    pub const MAX_TARGET_SIZE: u32 = 4096;

    /// Targets up to this size use the high quality resampling kernel
    pub const SMALL_ICON_MAX_SIZE: u32 = 64;
}

pub mod favicon {
    /// File name of the bundled legacy icon
    pub const FILE_NAME: &str = "favicon.ico";

    /// Frame sizes packed into favicon.ico, in file order
    pub const FRAME_SIZES: [u32; 2] = [16, 32];
}

pub mod output {
    /// Output directory used when none is given on the command line
    pub const DEFAULT_DIR: &str = "public/icons";
}
