use std::fmt::{Debug, Display, Formatter};

use thumbsign_core::utils::Redact;
use thumbsign_core::Result;

use super::command::Command;
use super::command_set::{CommandSet, Dimension, FilterArg};
use super::url::ThumborUrl;

/// UrlBuilder collects transformations for one image and renders the final URL.
///
/// Every method consumes the builder and returns it, so calls can be chained.
/// Cloning a builder copies its commands: the clones evolve independently.
///
/// ```
/// use thumbsign_thumbor::Thumbor;
///
/// let url = Thumbor::new("http://thumbor.example.com", None)
///     .url("https://example.com/images/test.jpg")
///     .fit_in(640, 480)
///     .smart_crop(true)
///     .quality(80)
///     .to_string();
///
/// assert_eq!(
///     url,
///     "http://thumbor.example.com/unsafe/fit-in/640x480/smart/filters:quality(80)/https://example.com/images/test.jpg"
/// );
/// ```
#[derive(Clone)]
pub struct UrlBuilder {
    server: String,
    secret: Option<String>,
    original: String,
    commands: CommandSet,
}

impl UrlBuilder {
    /// Create a new builder for the `original` image.
    pub fn new(
        server: impl Into<String>,
        secret: Option<String>,
        original: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            secret,
            original: original.into(),
            commands: CommandSet::new(),
        }
    }

    /// Commands collected so far.
    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// Apply a typed command.
    pub fn apply(mut self, command: Command) -> Self {
        self.commands.apply(command);
        self
    }

    /// Parse a command like `fit_in(640,480)` and apply it.
    ///
    /// Fails with [`ErrorKind::UnknownOperation`](thumbsign_core::ErrorKind::UnknownOperation)
    /// if the name is not a known command.
    pub fn call(self, command: &str) -> Result<Self> {
        Ok(self.apply(command.parse()?))
    }

    /// Build the [`ThumborUrl`] for the current commands.
    pub fn build(&self) -> ThumborUrl {
        ThumborUrl::new(
            self.server.clone(),
            self.secret.clone(),
            self.original.clone(),
            self.commands.to_segments(),
        )
    }

    /// Trim surrounding space. See [`CommandSet::trim`].
    pub fn trim(mut self, colour_source: Option<&str>, tolerance: Option<i64>) -> Self {
        self.commands.trim(colour_source, tolerance);
        self
    }

    /// Manually specify the crop window.
    pub fn crop(
        mut self,
        top_left_x: i64,
        top_left_y: i64,
        bottom_right_x: i64,
        bottom_right_y: i64,
    ) -> Self {
        self.commands
            .crop(top_left_x, top_left_y, bottom_right_x, bottom_right_y);
        self
    }

    /// Resize to `WxH`. Use `0` for proportional and [`Dimension::Orig`] for original size.
    pub fn resize(mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.commands.resize(width, height);
        self
    }

    /// Fit in a box.
    pub fn fit_in(mut self, width: i64, height: i64) -> Self {
        self.commands.fit_in(width, height);
        self
    }

    /// Fit by the smallest side.
    pub fn full_fit_in(mut self, width: i64, height: i64) -> Self {
        self.commands.full_fit_in(width, height);
        self
    }

    /// Adaptive fit-in.
    pub fn adaptive_fit_in(mut self, width: i64, height: i64) -> Self {
        self.commands.adaptive_fit_in(width, height);
        self
    }

    /// Flip horizontally.
    pub fn flip_horizontal(mut self, flip: bool) -> Self {
        self.commands.flip_horizontal(flip);
        self
    }

    /// Flip vertically.
    pub fn flip_vertical(mut self, flip: bool) -> Self {
        self.commands.flip_vertical(flip);
        self
    }

    /// Horizontal alignment.
    pub fn halign(mut self, halign: impl Into<String>) -> Self {
        self.commands.halign(halign);
        self
    }

    /// Vertical alignment.
    pub fn valign(mut self, valign: impl Into<String>) -> Self {
        self.commands.valign(valign);
        self
    }

    /// Smart cropping.
    pub fn smart_crop(mut self, smart_crop: bool) -> Self {
        self.commands.smart_crop(smart_crop);
        self
    }

    /// Metadata instead of the image.
    pub fn metadata_only(mut self, metadata_only: bool) -> Self {
        self.commands.metadata_only(metadata_only);
        self
    }

    /// Append a filter call.
    pub fn add_filter<A: Into<FilterArg>>(
        mut self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = A>,
    ) -> Self {
        self.commands.add_filter(name, args);
        self
    }

    /// `quality(n)`
    pub fn quality(mut self, quality: i64) -> Self {
        self.commands.quality(quality);
        self
    }

    /// `format(name)`
    pub fn format(mut self, format: &str) -> Self {
        self.commands.format(format);
        self
    }

    /// `format(webp)`
    pub fn webp(mut self) -> Self {
        self.commands.webp();
        self
    }

    /// `format(avif)`
    pub fn avif(mut self) -> Self {
        self.commands.avif();
        self
    }

    /// `blur(radius[,sigma])`
    pub fn blur(mut self, radius: i64, sigma: Option<i64>) -> Self {
        self.commands.blur(radius, sigma);
        self
    }

    /// `brightness(n)`
    pub fn brightness(mut self, amount: i64) -> Self {
        self.commands.brightness(amount);
        self
    }

    /// `contrast(n)`
    pub fn contrast(mut self, amount: i64) -> Self {
        self.commands.contrast(amount);
        self
    }

    /// `grayscale()`
    pub fn grayscale(mut self) -> Self {
        self.commands.grayscale();
        self
    }

    /// `rotate(angle)`
    pub fn rotate(mut self, angle: i64) -> Self {
        self.commands.rotate(angle);
        self
    }

    /// `sharpen(amount,radius,luminance_only)`
    pub fn sharpen(mut self, amount: f64, radius: f64, luminance_only: bool) -> Self {
        self.commands.sharpen(amount, radius, luminance_only);
        self
    }

    /// `noise(n)`
    pub fn noise(mut self, amount: i64) -> Self {
        self.commands.noise(amount);
        self
    }

    /// `watermark(url,x,y,alpha)`
    pub fn watermark(mut self, image_url: &str, x: i64, y: i64, alpha: i64) -> Self {
        self.commands.watermark(image_url, x, y, alpha);
        self
    }

    /// `fill(colour)`
    pub fn fill(mut self, colour: &str) -> Self {
        self.commands.fill(colour);
        self
    }

    /// `round_corner(radius[,r,g,b])`
    pub fn round_corners(mut self, radius: i64, background: Option<(i64, i64, i64)>) -> Self {
        self.commands.round_corners(radius, background);
        self
    }

    /// `strip_exif()`
    pub fn strip_exif(mut self) -> Self {
        self.commands.strip_exif();
        self
    }

    /// `strip_icc()`
    pub fn strip_icc(mut self) -> Self {
        self.commands.strip_icc();
        self
    }

    /// `no_upscale()`
    pub fn no_upscale(mut self) -> Self {
        self.commands.no_upscale();
        self
    }

    /// `saturation(f)`
    pub fn saturation(mut self, amount: f64) -> Self {
        self.commands.saturation(amount);
        self
    }

    /// `rgb(r,g,b)`
    pub fn rgb(mut self, red: i64, green: i64, blue: i64) -> Self {
        self.commands.rgb(red, green, blue);
        self
    }

    /// `max_bytes(n)`
    pub fn max_bytes(mut self, bytes: i64) -> Self {
        self.commands.max_bytes(bytes);
        self
    }

    /// `equalize()`
    pub fn equalize(mut self) -> Self {
        self.commands.equalize();
        self
    }

    /// `convolution(matrix,columns,normalize)`
    pub fn convolution(mut self, matrix: &[f64], columns: i64, normalize: bool) -> Self {
        self.commands.convolution(matrix, columns, normalize);
        self
    }
}

impl Display for UrlBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.build(), f)
    }
}

impl Debug for UrlBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlBuilder")
            .field("server", &self.server)
            .field("secret", &Redact::from(&self.secret))
            .field("original", &self.original)
            .field("commands", &self.commands)
            .finish()
    }
}
