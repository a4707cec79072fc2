#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod families;
pub mod foundation;
pub mod pattern;
pub mod raster;

pub use batch::{
    driver::{
        BatchReport, CHIP_FILE, Family, PassFailure, TSHIRT_GRID_FILE, TextureBatchDriver,
        USER_FILE,
    },
    sink::{ContactSheet, ImageSink, MemorySink, PngDirSink},
};
pub use config::SpriteConfig;
pub use families::{
    chip::{ChipBody, ChipConfig, chip_body, render_chip},
    goal::{GoalConfig, GoalFrame, goal_frame, render_goal},
    tshirt::{TshirtConfig, TshirtLayout, render_tshirt, render_tshirt_outline},
    user::{UserConfig, render_user},
};
pub use foundation::core::{Edge, Line, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{SpriteError, SpriteResult};
pub use pattern::{
    branch::{Branch, BranchGenerator, PinSpec},
    connector::{connector_lines, draw_connectors, interval_count},
    recolor::{Connectivity, Marked, MarkedSurface, StripePattern, fill_stripes},
};
pub use raster::{
    draw::{
        ShapeStyle, draw_ellipse, draw_line, draw_polygon, draw_polyline, draw_rectangle,
        fill_circle,
    },
    surface::{RasterSurface, ResampleFilter},
    text::{FontProvider, SystemFontProvider, TextBounds, draw_text, measure_text},
};
