use plotters::style::RGBAColor;

/// Chart theme configuration
#[derive(Clone, Debug)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Outline drawn around bars
    pub edge_color: RGBAColor,
    /// Fill for single-series bars such as branch ages
    pub bar_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            edge_color: RGBAColor(255, 255, 255, 0.6),
            bar_color: RGBAColor(135, 206, 235, 0.9),
        }
    }
}

impl ChartTheme {
    /// Dark text on white, matching printed reports
    pub fn light() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(0, 0, 0, 0.9),
            grid_color: RGBAColor(128, 128, 128, 0.5),
            axis_color: RGBAColor(0, 0, 0, 0.9),
            edge_color: RGBAColor(0, 0, 0, 1.0),
            bar_color: RGBAColor(135, 206, 235, 1.0),
        }
    }
}

/// Chart style configuration
#[derive(Clone, Debug)]
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 15,
            caption_size: 30,
            margin: 10,
            label_area_size: 50,
        }
    }
}
