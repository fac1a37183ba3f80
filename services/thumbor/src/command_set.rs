//! Accumulated image transformations and their path encoding.
use std::fmt::{Display, Formatter};

use super::constants::*;

/// One side of a resize box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Target size in pixels. `0` asks the server to keep proportions.
    Pixels(i64),
    /// Keep the original image size on this axis.
    Orig,
}

impl Dimension {
    /// Mirror this side by making it negative. `orig` has no magnitude and is kept.
    fn flipped(self) -> Self {
        match self {
            Dimension::Pixels(v) if v > 0 => Dimension::Pixels(-v),
            v => v,
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Pixels(v) => write!(f, "{v}"),
            Dimension::Orig => f.write_str(DIMENSION_ORIG),
        }
    }
}

impl From<i64> for Dimension {
    fn from(v: i64) -> Self {
        Dimension::Pixels(v)
    }
}

impl From<i32> for Dimension {
    fn from(v: i32) -> Self {
        Dimension::Pixels(v.into())
    }
}

impl From<u32> for Dimension {
    fn from(v: u32) -> Self {
        Dimension::Pixels(v.into())
    }
}

/// The resize family a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeKind {
    /// `WxH`
    Plain,
    /// `fit-in/WxH`
    FitIn,
    /// `full-fit-in/WxH`
    FullFitIn,
    /// `adaptive-fit-in/WxH`
    AdaptiveFitIn,
}

impl ResizeKind {
    fn prefix(self) -> &'static str {
        match self {
            ResizeKind::Plain => "",
            ResizeKind::FitIn => "fit-in/",
            ResizeKind::FullFitIn => "full-fit-in/",
            ResizeKind::AdaptiveFitIn => "adaptive-fit-in/",
        }
    }
}

/// A resize directive. At most one is kept per [`CommandSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    /// Which resize family to use.
    pub kind: ResizeKind,
    /// Target width.
    pub width: Dimension,
    /// Target height.
    pub height: Dimension,
}

impl Resize {
    /// Render the resize segment, encoding flips as negative sizes.
    fn to_segment(self, flip_horizontal: bool, flip_vertical: bool) -> String {
        let width = if flip_horizontal {
            self.width.flipped()
        } else {
            self.width
        };
        let height = if flip_vertical {
            self.height.flipped()
        } else {
            self.height
        };

        format!("{}{}x{}", self.kind.prefix(), width, height)
    }
}

/// One argument of a filter call.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    /// Rendered as is.
    Str(String),
    /// Rendered in decimal.
    Int(i64),
    /// Rendered in its shortest decimal form, `1.0` becomes `1`.
    Float(f64),
    /// Rendered as `true` or `false`.
    Bool(bool),
}

impl Display for FilterArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterArg::Str(v) => f.write_str(v),
            FilterArg::Int(v) => write!(f, "{v}"),
            FilterArg::Float(v) => write!(f, "{v}"),
            FilterArg::Bool(v) => f.write_str(if *v { "true" } else { "false" }),
        }
    }
}

impl From<&str> for FilterArg {
    fn from(v: &str) -> Self {
        FilterArg::Str(v.to_string())
    }
}

impl From<String> for FilterArg {
    fn from(v: String) -> Self {
        FilterArg::Str(v)
    }
}

impl From<i64> for FilterArg {
    fn from(v: i64) -> Self {
        FilterArg::Int(v)
    }
}

impl From<i32> for FilterArg {
    fn from(v: i32) -> Self {
        FilterArg::Int(v.into())
    }
}

impl From<u32> for FilterArg {
    fn from(v: u32) -> Self {
        FilterArg::Int(v.into())
    }
}

impl From<f64> for FilterArg {
    fn from(v: f64) -> Self {
        FilterArg::Float(v)
    }
}

impl From<f32> for FilterArg {
    fn from(v: f32) -> Self {
        FilterArg::Float(v.into())
    }
}

impl From<bool> for FilterArg {
    fn from(v: bool) -> Self {
        FilterArg::Bool(v)
    }
}

/// A filter call such as `quality(80)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    name: String,
    args: Vec<FilterArg>,
}

impl Filter {
    /// Create a new filter call.
    pub fn new<A: Into<FilterArg>>(
        name: impl Into<String>,
        args: impl IntoIterator<Item = A>,
    ) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the filter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments in call order.
    pub fn args(&self) -> &[FilterArg] {
        &self.args
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// CommandSet accumulates the transformations requested for one image.
///
/// Mutators never validate ranges: the server is just as permissive, so
/// values like `quality(150)` are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSet {
    trim: Option<String>,
    crop: Option<String>,
    resize: Option<Resize>,
    halign: Option<String>,
    valign: Option<String>,
    smart_crop: bool,
    metadata_only: bool,
    flip_horizontal: bool,
    flip_vertical: bool,
    filters: Vec<Filter>,
}

impl CommandSet {
    /// Create an empty command set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim surrounding space from the image.
    ///
    /// The top-left pixel is taken as background colour unless
    /// `colour_source` says otherwise (`top-left` or `bottom-right`).
    pub fn trim(&mut self, colour_source: Option<&str>, tolerance: Option<i64>) {
        let mut trim = SEGMENT_TRIM.to_string();
        if let Some(source) = colour_source {
            trim.push(':');
            trim.push_str(source);
        }
        if let Some(tolerance) = tolerance {
            trim.push_str(&format!(":{tolerance}"));
        }
        self.trim = Some(trim);
    }

    /// Manually specify the crop window.
    pub fn crop(
        &mut self,
        top_left_x: i64,
        top_left_y: i64,
        bottom_right_x: i64,
        bottom_right_y: i64,
    ) {
        self.crop = Some(format!(
            "{top_left_x}x{top_left_y}:{bottom_right_x}x{bottom_right_y}"
        ));
    }

    /// Resize to the given box, replacing any previous resize.
    pub fn resize(&mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) {
        self.set_resize(ResizeKind::Plain, width.into(), height.into());
    }

    /// Fit the image in a box, replacing any previous resize.
    pub fn fit_in(&mut self, width: i64, height: i64) {
        self.set_resize(ResizeKind::FitIn, width.into(), height.into());
    }

    /// Fit the image by its smallest side, replacing any previous resize.
    pub fn full_fit_in(&mut self, width: i64, height: i64) {
        self.set_resize(ResizeKind::FullFitIn, width.into(), height.into());
    }

    /// Adaptive fit-in, replacing any previous resize.
    ///
    /// Behaves like fit-in but may swap the box to suit the image orientation.
    pub fn adaptive_fit_in(&mut self, width: i64, height: i64) {
        self.set_resize(ResizeKind::AdaptiveFitIn, width.into(), height.into());
    }

    fn set_resize(&mut self, kind: ResizeKind, width: Dimension, height: Dimension) {
        self.resize = Some(Resize {
            kind,
            width,
            height,
        });
    }

    /// Flip the image horizontally.
    ///
    /// Only visible when a resize is set.
    pub fn flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    /// Flip the image vertically.
    ///
    /// Only visible when a resize is set.
    pub fn flip_vertical(&mut self, flip: bool) {
        self.flip_vertical = flip;
    }

    /// Horizontal alignment: `left`, `center` or `right`.
    pub fn halign(&mut self, halign: impl Into<String>) {
        self.halign = Some(halign.into());
    }

    /// Vertical alignment: `top`, `middle` or `bottom`.
    pub fn valign(&mut self, valign: impl Into<String>) {
        self.valign = Some(valign.into());
    }

    /// Enable smart cropping. The server ignores alignment when this is on.
    pub fn smart_crop(&mut self, smart_crop: bool) {
        self.smart_crop = smart_crop;
    }

    /// Request JSON metadata instead of the image.
    pub fn metadata_only(&mut self, metadata_only: bool) {
        self.metadata_only = metadata_only;
    }

    /// Append a filter call. Order is kept and duplicates are allowed.
    pub fn add_filter<A: Into<FilterArg>>(
        &mut self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = A>,
    ) {
        self.push_filter(Filter::new(name, args));
    }

    /// Append an already built filter call.
    pub fn push_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Filters in call order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Render the command set into ordered path segments.
    ///
    /// The order is fixed: meta, trim, crop, resize, halign, valign,
    /// smart, filters.
    pub fn to_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();

        if self.metadata_only {
            segments.push(SEGMENT_META.to_string());
        }
        if let Some(trim) = &self.trim {
            segments.push(trim.clone());
        }
        if let Some(crop) = &self.crop {
            segments.push(crop.clone());
        }
        if let Some(resize) = self.resize {
            segments.push(resize.to_segment(self.flip_horizontal, self.flip_vertical));
        }
        if let Some(halign) = &self.halign {
            segments.push(halign.clone());
        }
        if let Some(valign) = &self.valign {
            segments.push(valign.clone());
        }
        if self.smart_crop {
            segments.push(SEGMENT_SMART.to_string());
        }
        if !self.filters.is_empty() {
            let mut s = SEGMENT_FILTERS.to_string();
            for filter in &self.filters {
                s.push_str(&format!(":{filter}"));
            }
            segments.push(s);
        }

        segments
    }
}

// Convenience methods for common filters
impl CommandSet {
    /// Set JPEG quality (1-100).
    pub fn quality(&mut self, quality: i64) {
        self.add_filter("quality", [quality]);
    }

    /// Convert to `webp`, `jpeg`, `png`, `gif`, `avif` or `heic`.
    pub fn format(&mut self, format: &str) {
        self.add_filter("format", [format]);
    }

    /// Convert to WebP.
    pub fn webp(&mut self) {
        self.format("webp");
    }

    /// Convert to AVIF.
    pub fn avif(&mut self) {
        self.format("avif");
    }

    /// Blur with the given radius and optional sigma.
    pub fn blur(&mut self, radius: i64, sigma: Option<i64>) {
        match sigma {
            Some(sigma) => self.add_filter("blur", [radius, sigma]),
            None => self.add_filter("blur", [radius]),
        }
    }

    /// Adjust brightness (-100 to 100).
    pub fn brightness(&mut self, amount: i64) {
        self.add_filter("brightness", [amount]);
    }

    /// Adjust contrast (-100 to 100).
    pub fn contrast(&mut self, amount: i64) {
        self.add_filter("contrast", [amount]);
    }

    /// Convert to grayscale.
    pub fn grayscale(&mut self) {
        self.add_filter("grayscale", no_args());
    }

    /// Rotate by 0, 90, 180 or 270 degrees.
    pub fn rotate(&mut self, angle: i64) {
        self.add_filter("rotate", [angle]);
    }

    /// Sharpen the image.
    pub fn sharpen(&mut self, amount: f64, radius: f64, luminance_only: bool) {
        self.add_filter(
            "sharpen",
            [
                FilterArg::from(amount),
                FilterArg::from(radius),
                FilterArg::from(luminance_only),
            ],
        );
    }

    /// Add noise (0-100).
    pub fn noise(&mut self, amount: i64) {
        self.add_filter("noise", [amount]);
    }

    /// Add a watermark. Negative positions count from the right or bottom.
    pub fn watermark(&mut self, image_url: &str, x: i64, y: i64, alpha: i64) {
        self.add_filter(
            "watermark",
            [
                FilterArg::from(image_url),
                FilterArg::from(x),
                FilterArg::from(y),
                FilterArg::from(alpha),
            ],
        );
    }

    /// Fill empty space with a hex colour, `auto`, `blur` or `transparent`.
    pub fn fill(&mut self, colour: &str) {
        self.add_filter("fill", [colour]);
    }

    /// Round the corners, optionally over an RGB background.
    pub fn round_corners(&mut self, radius: i64, background: Option<(i64, i64, i64)>) {
        match background {
            Some((red, green, blue)) => {
                self.add_filter("round_corner", [radius, red, green, blue])
            }
            None => self.add_filter("round_corner", [radius]),
        }
    }

    /// Remove EXIF metadata.
    pub fn strip_exif(&mut self) {
        self.add_filter("strip_exif", no_args());
    }

    /// Remove the ICC colour profile.
    pub fn strip_icc(&mut self) {
        self.add_filter("strip_icc", no_args());
    }

    /// Never upscale images smaller than the requested box.
    pub fn no_upscale(&mut self) {
        self.add_filter("no_upscale", no_args());
    }

    /// Adjust saturation (0.0 to 2.0, 1.0 keeps it).
    pub fn saturation(&mut self, amount: f64) {
        self.add_filter("saturation", [amount]);
    }

    /// Adjust the RGB channels (-100 to 100 each).
    pub fn rgb(&mut self, red: i64, green: i64, blue: i64) {
        self.add_filter("rgb", [red, green, blue]);
    }

    /// Limit the output file size.
    pub fn max_bytes(&mut self, bytes: i64) {
        self.add_filter("max_bytes", [bytes]);
    }

    /// Apply histogram equalization.
    pub fn equalize(&mut self) {
        self.add_filter("equalize", no_args());
    }

    /// Apply a convolution matrix given row by row.
    pub fn convolution(&mut self, matrix: &[f64], columns: i64, normalize: bool) {
        let matrix = matrix
            .iter()
            .map(|v| FilterArg::from(*v).to_string())
            .collect::<Vec<_>>()
            .join(";");
        self.add_filter(
            "convolution",
            [
                FilterArg::from(matrix),
                FilterArg::from(columns),
                FilterArg::from(normalize),
            ],
        );
    }
}

fn no_args() -> [FilterArg; 0] {
    []
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_command_set() {
        assert!(CommandSet::new().to_segments().is_empty());
    }

    #[test]
    fn test_segment_order_ignores_call_order() {
        let mut cs = CommandSet::new();
        cs.quality(80);
        cs.smart_crop(true);
        cs.valign("top");
        cs.halign("left");
        cs.fit_in(640, 480);
        cs.crop(10, 20, 100, 200);
        cs.trim(None, None);
        cs.metadata_only(true);

        assert_eq!(
            cs.to_segments(),
            vec![
                "meta",
                "trim",
                "10x20:100x200",
                "fit-in/640x480",
                "left",
                "top",
                "smart",
                "filters:quality(80)",
            ]
        );
    }

    #[test]
    fn test_trim() {
        let cases: Vec<(Option<&str>, Option<i64>, &str)> = vec![
            (None, None, "trim"),
            (Some("bottom-right"), None, "trim:bottom-right"),
            (None, Some(50), "trim:50"),
            (Some("top-left"), Some(10), "trim:top-left:10"),
        ];

        for (source, tolerance, expected) in cases {
            let mut cs = CommandSet::new();
            cs.trim(source, tolerance);
            assert_eq!(cs.to_segments(), vec![expected]);
        }
    }

    #[test]
    fn test_crop_is_not_validated() {
        let mut cs = CommandSet::new();
        cs.crop(100, 200, 10, 20);
        assert_eq!(cs.to_segments(), vec!["100x200:10x20"]);
    }

    #[test]
    fn test_last_resize_wins() {
        let mut cs = CommandSet::new();
        cs.fit_in(640, 480);
        cs.full_fit_in(800, 600);
        assert_eq!(cs.to_segments(), vec!["full-fit-in/800x600"]);

        cs.adaptive_fit_in(300, 200);
        assert_eq!(cs.to_segments(), vec!["adaptive-fit-in/300x200"]);

        cs.resize(320, Dimension::Orig);
        assert_eq!(cs.to_segments(), vec!["320xorig"]);

        cs.fit_in(10, 20);
        assert_eq!(cs.to_segments(), vec!["fit-in/10x20"]);
    }

    #[test]
    fn test_flip_fit_in() {
        let mut cs = CommandSet::new();
        cs.fit_in(640, 480);
        cs.flip_horizontal(true);
        assert_eq!(cs.to_segments(), vec!["fit-in/-640x480"]);

        cs.flip_vertical(true);
        assert_eq!(cs.to_segments(), vec!["fit-in/-640x-480"]);

        cs.flip_horizontal(false);
        assert_eq!(cs.to_segments(), vec!["fit-in/640x-480"]);
    }

    #[test]
    fn test_flip_fit_in_families() {
        let mut cs = CommandSet::new();
        cs.flip_horizontal(true);
        cs.flip_vertical(true);

        cs.full_fit_in(800, 600);
        assert_eq!(cs.to_segments(), vec!["full-fit-in/-800x-600"]);

        cs.adaptive_fit_in(300, 200);
        assert_eq!(cs.to_segments(), vec!["adaptive-fit-in/-300x-200"]);
    }

    #[test]
    fn test_flip_keeps_already_negative_sizes() {
        let mut cs = CommandSet::new();
        cs.fit_in(-640, 0);
        cs.flip_horizontal(true);
        cs.flip_vertical(true);
        assert_eq!(cs.to_segments(), vec!["fit-in/-640x0"]);
    }

    #[test]
    fn test_flip_plain_resize_skips_orig() {
        let mut cs = CommandSet::new();
        cs.resize(Dimension::Orig, 480);
        cs.flip_vertical(true);
        assert_eq!(cs.to_segments(), vec!["origx-480"]);

        cs.flip_horizontal(true);
        assert_eq!(cs.to_segments(), vec!["origx-480"]);

        cs.resize(320, 240);
        assert_eq!(cs.to_segments(), vec!["-320x-240"]);
    }

    #[test]
    fn test_flip_without_resize_is_ignored() {
        let mut cs = CommandSet::new();
        cs.flip_horizontal(true);
        cs.flip_vertical(true);
        assert!(cs.to_segments().is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut cs = CommandSet::new();
        cs.fit_in(640, 480);
        cs.flip_horizontal(true);
        cs.quality(80);

        let first = cs.to_segments();
        assert_eq!(first, cs.to_segments());
        assert_eq!(first, vec!["fit-in/-640x480", "filters:quality(80)"]);
    }

    #[test]
    fn test_filter_args() {
        let cases = vec![
            (Filter::new("grayscale", no_args()), "grayscale()"),
            (Filter::new("brightness", [50]), "brightness(50)"),
            (Filter::new("brightness", ["50"]), "brightness(50)"),
            (Filter::new("saturation", [1.5]), "saturation(1.5)"),
            (Filter::new("saturation", [1.0]), "saturation(1)"),
            (
                Filter::new(
                    "sharpen",
                    [FilterArg::from(2.5), FilterArg::from(0.5), FilterArg::from(true)],
                ),
                "sharpen(2.5,0.5,true)",
            ),
            (Filter::new("flag", [false]), "flag(false)"),
        ];

        for (filter, expected) in cases {
            assert_eq!(filter.to_string(), expected);
        }
    }

    #[test]
    fn test_filters_keep_order_and_duplicates() {
        let mut cs = CommandSet::new();
        cs.brightness(50);
        cs.contrast(20);
        cs.brightness(50);
        assert_eq!(cs.filters().len(), 3);
        assert_eq!(
            cs.to_segments(),
            vec!["filters:brightness(50):contrast(20):brightness(50)"]
        );
    }

    #[test]
    fn test_convenience_filters() {
        let cases: Vec<(fn(&mut CommandSet), &str)> = vec![
            (|cs: &mut CommandSet| cs.quality(150), "quality(150)"),
            (|cs: &mut CommandSet| cs.format("png"), "format(png)"),
            (|cs: &mut CommandSet| cs.webp(), "format(webp)"),
            (|cs: &mut CommandSet| cs.avif(), "format(avif)"),
            (|cs: &mut CommandSet| cs.blur(2, None), "blur(2)"),
            (|cs: &mut CommandSet| cs.blur(2, Some(3)), "blur(2,3)"),
            (|cs: &mut CommandSet| cs.brightness(-10), "brightness(-10)"),
            (|cs: &mut CommandSet| cs.contrast(20), "contrast(20)"),
            (|cs: &mut CommandSet| cs.grayscale(), "grayscale()"),
            (|cs: &mut CommandSet| cs.rotate(90), "rotate(90)"),
            (|cs: &mut CommandSet| cs.sharpen(2.0, 1.5, false), "sharpen(2,1.5,false)"),
            (|cs: &mut CommandSet| cs.noise(40), "noise(40)"),
            (
                |cs: &mut CommandSet| cs.watermark("https://example.com/logo.png", -10, -10, 50),
                "watermark(https://example.com/logo.png,-10,-10,50)",
            ),
            (|cs: &mut CommandSet| cs.fill("blur"), "fill(blur)"),
            (|cs: &mut CommandSet| cs.round_corners(20, None), "round_corner(20)"),
            (
                |cs: &mut CommandSet| cs.round_corners(20, Some((255, 255, 255))),
                "round_corner(20,255,255,255)",
            ),
            (|cs: &mut CommandSet| cs.strip_exif(), "strip_exif()"),
            (|cs: &mut CommandSet| cs.strip_icc(), "strip_icc()"),
            (|cs: &mut CommandSet| cs.no_upscale(), "no_upscale()"),
            (|cs: &mut CommandSet| cs.saturation(0.5), "saturation(0.5)"),
            (|cs: &mut CommandSet| cs.rgb(10, -20, 30), "rgb(10,-20,30)"),
            (|cs: &mut CommandSet| cs.max_bytes(75000), "max_bytes(75000)"),
            (|cs: &mut CommandSet| cs.equalize(), "equalize()"),
            (
                |cs: &mut CommandSet| {
                    let matrix = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
                    cs.convolution(&matrix, 3, false)
                },
                "convolution(-1;-1;-1;-1;8;-1;-1;-1;-1,3,false)",
            ),
        ];

        for (apply, expected) in cases {
            let mut cs = CommandSet::new();
            apply(&mut cs);
            assert_eq!(cs.to_segments(), vec![format!("filters:{expected}")]);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut cs = CommandSet::new();
        cs.fit_in(640, 480);

        let mut other = cs.clone();
        other.quality(80);
        other.flip_horizontal(true);

        assert_eq!(cs.to_segments(), vec!["fit-in/640x480"]);
        assert_eq!(
            other.to_segments(),
            vec!["fit-in/-640x480", "filters:quality(80)"]
        );
    }
}
